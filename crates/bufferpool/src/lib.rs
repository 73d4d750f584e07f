//! FD-passing shared-memory buffer pools: C3 of the media graph core.
//!
//! A [`BufferPool`] allocates a fixed number of fixed-size buffers up
//! front, each backed either by `memfd`-mapped shared memory (so the
//! region's fd can be handed to a peer process) or, when only
//! [`DataType::MemPtr`] is requested, by a plain heap allocation private
//! to this process. Ownership of individual buffers cycles through
//! [`BufferState::Free`] -> [`BufferState::InFlight`] ->
//! [`BufferState::Returned`] -> back to `Free`, matching spec §4.3/§5.

mod region;
pub use self::region::MemRegion;

mod pool;
pub use self::pool::{Buffer, BufferPool, BufferState, Chunk, Data, DataType, Meta, MetaType, PoolStats};
