//! The graph data model (C6) and node lifecycle state machine (C7).
//!
//! A [`Graph`] owns every [`Node`], [`Port`] and [`Link`] by id, in
//! [`collections::Map`]s so that ids stay stable across removal and reuse.
//! Raw-pointer adjacency (as the original's `spa_graph_node`/`spa_graph_port`
//! intrusive lists use) is replaced throughout with id-indexed lookups, per
//! the "arena + index instead of pointer graph" redesign.

mod state;
pub use self::state::{NodeState, StateError};

mod direction;
pub use self::direction::Direction;

mod port;
pub use self::port::{Port, PortFlags};

mod link;
pub use self::link::Link;

mod io;
pub use self::io::{BufferIo, IoArea, IoStatus, IoType};

mod node;
pub use self::node::{Node, NodeFlags};

mod graph;
pub use self::graph::{Graph, GraphError};
