use std::fmt;

/// A node's lifecycle state (C7).
///
/// ```text
///        .------------------------------.
///        v                              |
/// Creating -> Suspended <-> Idle <-> Running
///    |            ^           ^         |
///    '-- Error <--'-----------'---------'
/// ```
///
/// `Idle` and `Running` both represent a fully negotiated node; the
/// difference is whether its `process` callback is currently being driven
/// by the scheduler. A node left `Idle` past the configured idle-suspend
/// timeout drops back to `Suspended`, releasing its buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeState {
    Error,
    Creating,
    Suspended,
    Idle,
    Running,
}

/// An attempted transition that isn't reachable from the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateError {
    pub from: NodeState,
    pub to: NodeState,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot transition node from {:?} to {:?}", self.from, self.to)
    }
}

impl std::error::Error for StateError {}

impl NodeState {
    /// Validate and describe a transition from `self` to `to`, without
    /// performing it. Any state may transition to `Error`.
    pub fn validate(self, to: NodeState) -> Result<(), StateError> {
        use NodeState::*;

        let ok = match (self, to) {
            (_, Error) => true,
            (Creating, Suspended) => true,
            (Suspended, Idle) => true,
            (Idle, Suspended) => true,
            (Idle, Running) => true,
            (Running, Idle) => true,
            (Error, Suspended) => true,
            (from, to) if from == to => true,
            _ => false,
        };

        if ok {
            Ok(())
        } else {
            Err(StateError { from: self, to })
        }
    }

    /// Whether the node is fully negotiated and has buffers allocated,
    /// i.e. it can be driven by the scheduler (`Idle` or `Running`).
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, NodeState::Idle | NodeState::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NodeState::*;

    #[test]
    fn lifecycle_happy_path() {
        assert!(Creating.validate(Suspended).is_ok());
        assert!(Suspended.validate(Idle).is_ok());
        assert!(Idle.validate(Running).is_ok());
        assert!(Running.validate(Idle).is_ok());
        assert!(Idle.validate(Suspended).is_ok());
    }

    #[test]
    fn cannot_skip_straight_to_running() {
        assert!(Creating.validate(Running).is_err());
        assert!(Suspended.validate(Running).is_err());
    }

    #[test]
    fn any_state_can_fault() {
        for state in [Error, Creating, Suspended, Idle, Running] {
            assert!(state.validate(Error).is_ok());
        }
    }

    #[test]
    fn error_only_recovers_via_suspended() {
        assert!(Error.validate(Suspended).is_ok());
        assert!(Error.validate(Idle).is_err());
        assert!(Error.validate(Running).is_err());
    }
}
