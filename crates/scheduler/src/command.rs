/// Out-of-band control commands a node can receive between cycles,
/// mirroring the command set in `command-node.h`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Stop driving the node; it stays negotiated but idle.
    Pause,
    /// Start driving the node.
    Start,
    /// Discard any buffered data without processing it.
    Flush,
    /// Finish processing buffered data, then pause.
    Drain,
    /// A marker injected into the data stream at a specific position, for
    /// synchronization points downstream consumers can react to.
    Marker { position: u64 },
    /// The driver's notion of the transport clock changed; propagated to
    /// every node before the next cycle runs.
    ClockUpdate { rate_num: u32, rate_denom: u32, position: u64 },
}
