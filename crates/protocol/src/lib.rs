#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod error;
pub use self::error::Error;

#[cfg(feature = "alloc")]
pub mod events;

#[cfg(feature = "std")]
pub mod poll;
#[cfg(feature = "std")]
pub use self::poll::Poll;

#[cfg(feature = "std")]
mod event_fd;
#[cfg(feature = "std")]
pub use self::event_fd::EventFd;

#[cfg(feature = "std")]
mod timer_fd;
#[cfg(feature = "std")]
pub use self::timer_fd::TimerFd;

#[cfg(feature = "std")]
pub mod event_loop;
#[cfg(feature = "std")]
pub use self::event_loop::EventLoop;

pub mod ids;
pub use self::ids::Ids;

mod prop;
pub use self::prop::Prop;

#[cfg(feature = "alloc")]
pub mod properties;
#[cfg(feature = "alloc")]
pub use self::properties::Properties;
