//! The in-process engine: C9 (stream/filter façade), C10 (proxy/resource
//! registry), and C11 (type/id mapper) from spec.md, built on top of
//! `graph`/`scheduler`/`bufferpool`/`workqueue`.
//!
//! [`Core`] is the owning object; [`Stream`]/[`Filter`] are borrowed,
//! ergonomic views into one of `Core`'s nodes, matching the teacher's
//! `crates/client/src/stream.rs` split between a `Stream` struct and the
//! `StreamInner` state it's a handle onto.

mod config;
pub use self::config::{Config, ConfigBuilder, RealtimePolicy};

mod listeners;
pub use self::listeners::{ListenerId, Listeners};

mod registry;
pub use self::registry::{Global, Permissions, Proxy, Registry, RegistryEvent, Resource};

mod typemap;
pub use self::typemap::TypeMap;

mod transport;
pub use self::transport::{NullTransport, Transport};

mod stream;
pub use self::stream::{Filter, Stream, StreamConnectFlags, StreamEvent, StreamId};

mod context;
pub use self::context::{Core, ProcessFn};

pub use scheduler::ProcessStatus;
