use std::time::Instant;

use crate::{Direction, NodeState};

/// Static capability flags for a node, mirroring `spa_node_flags`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeFlags(u32);

impl NodeFlags {
    pub const NONE: Self = Self(0);
    /// The node can add/remove input ports at runtime.
    pub const IN_DYNAMIC_PORTS: Self = Self(1 << 0);
    /// The node can add/remove output ports at runtime.
    pub const OUT_DYNAMIC_PORTS: Self = Self(1 << 1);
    /// The node's `process` callback must run on the realtime thread.
    pub const RT: Self = Self(1 << 2);
    /// The node may complete its `process` call asynchronously rather than
    /// returning a result inline (spec's async completion token pattern).
    pub const ASYNC: Self = Self(1 << 3);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl core::ops::BitOr for NodeFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// A processing node: owns zero or more input/output ports, and exposes a
/// lifecycle state the scheduler and idle-suspend timer drive.
#[derive(Debug)]
pub struct Node {
    pub id: u32,
    pub name: String,
    pub flags: NodeFlags,
    state: NodeState,
    /// Whether this node is the cycle driver (spec §4.8: exactly one
    /// driver per connected graph component).
    pub driver: bool,
    input_ports: Vec<u32>,
    output_ports: Vec<u32>,
    /// Number of non-optional ports per direction, per spec.md §3/§4.6:
    /// "increments `required[d]` if the port lacks the optional flag".
    /// Indexed by [`Direction`] (`Input = 0`, `Output = 1`).
    required: [u32; 2],
    /// Ports of each direction the scheduler currently considers ready
    /// this cycle; always `<= required[d]` (spec.md §3/§8's invariant).
    ready: [u32; 2],
    /// When this node most recently entered `Idle`, for the idle-suspend
    /// policy (spec.md §4.7): `None` whenever the node isn't currently
    /// `Idle`, so a sweep only ever has to compare against "now".
    idle_since: Option<Instant>,
}

impl Node {
    pub(crate) fn new(id: u32, name: impl Into<String>, flags: NodeFlags) -> Self {
        Self {
            id,
            name: name.into(),
            flags,
            state: NodeState::Creating,
            driver: false,
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            required: [0, 0],
            ready: [0, 0],
            idle_since: None,
        }
    }

    #[inline]
    pub fn state(&self) -> NodeState {
        self.state
    }

    /// Attempt a state transition, logging and returning an error if it
    /// isn't reachable from the current state.
    ///
    /// Entering `Idle` starts the idle-suspend clock ([`Self::idle_since`]);
    /// leaving it (to `Running` via `Start`, per spec.md §4.7: "Any `Start`
    /// request cancels the pending suspension") clears it.
    pub fn set_state(&mut self, to: NodeState) -> Result<(), crate::StateError> {
        self.state.validate(to)?;

        if self.state != to {
            tracing::debug!(node = self.id, from = ?self.state, to = ?to, "node state transition");
        }

        self.idle_since = (to == NodeState::Idle).then(Instant::now);
        self.state = to;
        Ok(())
    }

    /// How long this node has continuously been `Idle`, or `None` if it
    /// isn't currently `Idle`.
    #[inline]
    pub fn idle_for(&self, now: Instant) -> Option<core::time::Duration> {
        self.idle_since.map(|since| now.saturating_duration_since(since))
    }

    #[inline]
    pub fn input_ports(&self) -> &[u32] {
        &self.input_ports
    }

    #[inline]
    pub fn output_ports(&self) -> &[u32] {
        &self.output_ports
    }

    pub(crate) fn add_port(&mut self, direction: crate::Direction, port_id: u32) {
        match direction {
            crate::Direction::Input => self.input_ports.push(port_id),
            crate::Direction::Output => self.output_ports.push(port_id),
        }
    }

    pub(crate) fn remove_port(&mut self, direction: crate::Direction, port_id: u32) {
        match direction {
            crate::Direction::Input => self.input_ports.retain(|&id| id != port_id),
            crate::Direction::Output => self.output_ports.retain(|&id| id != port_id),
        }
    }

    /// Number of non-optional ports of `direction` — the count the
    /// scheduler must see `ready(direction)` reach before this node's
    /// trigger condition fires (spec.md §3/§4.6).
    #[inline]
    pub fn required(&self, direction: Direction) -> u32 {
        self.required[direction as usize]
    }

    /// How many of `direction`'s required ports the scheduler currently
    /// considers satisfied this cycle. Always `<= required(direction)`.
    #[inline]
    pub fn ready(&self, direction: Direction) -> u32 {
        self.ready[direction as usize]
    }

    pub(crate) fn incr_required(&mut self, direction: Direction) {
        self.required[direction as usize] += 1;
    }

    pub(crate) fn decr_required(&mut self, direction: Direction) {
        let slot = &mut self.required[direction as usize];
        *slot = slot.saturating_sub(1);
    }

    /// Reset `direction`'s ready count to zero, at the start of a new
    /// scheduler cycle.
    pub(crate) fn reset_ready(&mut self, direction: Direction) {
        self.ready[direction as usize] = 0;
    }

    /// Record one more of `direction`'s required ports becoming ready this
    /// cycle, clamped so `ready(direction)` never exceeds
    /// `required(direction)` even if called once too often. Returns the
    /// new ready count.
    pub(crate) fn incr_ready(&mut self, direction: Direction) -> u32 {
        let idx = direction as usize;

        if self.ready[idx] < self.required[idx] {
            self.ready[idx] += 1;
        }

        self.ready[idx]
    }
}
