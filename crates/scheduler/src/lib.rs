//! The realtime pull/push scheduler (C8).
//!
//! The driver node starts a cycle; every node's `process` result
//! decrements its successors' pending counters exactly as
//! `crates/client/src/activation.rs`'s `signal_v0`/`signal_v1` decrement a
//! peer's pending count across a process boundary — here the "peer" is
//! just another node in the same graph, so the trigger rule is identical
//! but the hop is an in-process queue push instead of an eventfd write.
//! Nodes not yet satisfied when visited fall onto a pending list and are
//! revisited once something else completes, per
//! `graph-scheduler6.h` (the latest scheduler revision in the original
//! sources).

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

use graph::{Direction, Graph, PortFlags};

mod command;
pub use self::command::Command;

/// Per-node activation bookkeeping the scheduler maintains alongside the
/// graph. Kept separate from `graph::Node` because it's scheduler-private
/// runtime state, not part of the node's identity.
#[derive(Debug)]
struct Activation {
    /// Number of not-yet-finished predecessors this cycle.
    pending: AtomicU32,
    /// The node's original required count, used to reset `pending` at the
    /// start of the next cycle.
    required: u32,
    status: AtomicU8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ActivationStatus {
    NotTriggered = 0,
    Triggered = 1,
    Awake = 2,
    Finished = 3,
    Inactive = 4,
}

impl ActivationStatus {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => Self::Triggered,
            2 => Self::Awake,
            3 => Self::Finished,
            4 => Self::Inactive,
            _ => Self::NotTriggered,
        }
    }
}

/// The result a node's `process` callback reports for this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessStatus {
    /// Finished, output buffers are ready for the next hop.
    Completed,
    /// Still waiting on an asynchronous operation (C4 work queue); the
    /// scheduler leaves the node's successors un-triggered until a later
    /// call reports `Completed`.
    Pending,
    /// The node over/underran its buffer and should be counted as an
    /// xrun by the caller (spec §8 Xrun handling) but the cycle continues.
    Xrun,
}

#[derive(Debug)]
pub enum SchedulerError {
    UnknownDriver(u32),
    Graph(graph::GraphError),
}

impl std::fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchedulerError::UnknownDriver(id) => write!(f, "driver node {id} has no registered activation"),
            SchedulerError::Graph(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SchedulerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SchedulerError::Graph(err) => Some(err),
            SchedulerError::UnknownDriver(_) => None,
        }
    }
}

impl From<graph::GraphError> for SchedulerError {
    fn from(err: graph::GraphError) -> Self {
        SchedulerError::Graph(err)
    }
}

/// Drives one connected component of the graph from a single designated
/// driver node.
#[derive(Debug, Default)]
pub struct Scheduler {
    activations: HashMap<u32, Activation>,
    /// Nodes whose pending count reached zero and are ready to run this
    /// cycle.
    ready: VecDeque<u32>,
    /// Nodes visited but not yet satisfied — the pending-list fallback.
    pending_list: Vec<u32>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a node with the scheduler, reading its
    /// required-input-port count straight off the graph model (spec.md
    /// §3/§4.6's `required[Input]`, maintained by [`Graph::add_port`]
    /// counting every *non-optional* input port) rather than counting
    /// connected predecessor edges, so an `Optional` input port never
    /// gates the node's trigger condition even while linked.
    pub fn add_node(&mut self, graph: &Graph, node_id: u32) -> Result<(), SchedulerError> {
        let required = graph.node(node_id)?.required(Direction::Input);

        self.activations.insert(
            node_id,
            Activation {
                pending: AtomicU32::new(required),
                required,
                status: AtomicU8::new(ActivationStatus::NotTriggered as u8),
            },
        );

        Ok(())
    }

    pub fn remove_node(&mut self, node_id: u32) {
        self.activations.remove(&node_id);
        self.pending_list.retain(|&id| id != node_id);
    }

    pub fn status(&self, node_id: u32) -> Option<ActivationStatus> {
        self.activations
            .get(&node_id)
            .map(|a| ActivationStatus::from_raw(a.status.load(Ordering::Acquire)))
    }

    /// Reset every node's pending/ready counters and seed the ready queue
    /// with `driver`, starting a new cycle. Pairs with [`Self::next_ready`]
    /// and [`Self::finish_node`] for callers that need to drive each
    /// node's `process_input`/`process_output` themselves instead of
    /// through a single opaque closure (see [`Self::run_cycle`]).
    pub fn start_cycle(&mut self, graph: &mut Graph, driver: u32) -> Result<(), SchedulerError> {
        if !self.activations.contains_key(&driver) {
            return Err(SchedulerError::UnknownDriver(driver));
        }

        for (&node_id, activation) in self.activations.iter() {
            activation.pending.store(activation.required, Ordering::Release);
            activation.status.store(ActivationStatus::NotTriggered as u8, Ordering::Release);

            if let Ok(node) = graph.node_mut(node_id) {
                node.reset_ready(Direction::Input);
            }
        }

        self.ready.clear();
        self.ready.push_back(driver);
        self.pending_list.clear();
        Ok(())
    }

    /// Pop the next node ready to run this cycle, marking its activation
    /// `Awake`.
    pub fn next_ready(&mut self) -> Option<u32> {
        let node_id = self.ready.pop_front()?;

        if let Some(activation) = self.activations.get(&node_id) {
            activation.status.store(ActivationStatus::Awake as u8, Ordering::Release);
        }

        Some(node_id)
    }

    /// Record the outcome of processing `node_id` this cycle: a
    /// `Completed`/`Xrun` result triggers its successors and reports `true`
    /// (the node counts as finished); `Pending` parks it on the pending
    /// list (spec §4.8's async completion path, driven by the C4 work
    /// queue) and reports `false`.
    pub fn finish_node(&mut self, graph: &mut Graph, node_id: u32, status: ProcessStatus) -> bool {
        let Some(activation) = self.activations.get(&node_id) else {
            tracing::warn!(node_id, "scheduled node has no activation, dropping");
            return false;
        };

        match status {
            ProcessStatus::Completed => {
                activation.status.store(ActivationStatus::Finished as u8, Ordering::Release);
                self.trigger_successors(graph, node_id);
                true
            }
            ProcessStatus::Xrun => {
                tracing::warn!(node_id, "node reported an xrun this cycle");
                activation.status.store(ActivationStatus::Finished as u8, Ordering::Release);
                self.trigger_successors(graph, node_id);
                true
            }
            ProcessStatus::Pending => {
                // Port of the pending-list fallback: this node isn't
                // done, so its successors stay un-triggered until a
                // later drive of the cycle completes it.
                self.pending_list.push(node_id);
                false
            }
        }
    }

    /// Run one full cycle starting from `driver`, calling `process` for
    /// every node that becomes ready, in pull order: the driver first,
    /// then downstream nodes as their predecessors complete. A thin
    /// convenience wrapper over [`Self::start_cycle`]/[`Self::next_ready`]/
    /// [`Self::finish_node`] for callers whose `process` closure doesn't
    /// need to re-enter the owner of `graph`/`self` itself.
    ///
    /// `process` receives the node id and must return its
    /// [`ProcessStatus`]; pending nodes are left for a future cycle.
    pub fn run_cycle(
        &mut self,
        graph: &mut Graph,
        driver: u32,
        mut process: impl FnMut(u32) -> ProcessStatus,
    ) -> Result<Vec<u32>, SchedulerError> {
        self.start_cycle(graph, driver)?;

        let mut completed = Vec::new();

        while let Some(node_id) = self.next_ready() {
            let status = process(node_id);

            if self.finish_node(graph, node_id, status) {
                completed.push(node_id);
            }
        }

        if !self.pending_list.is_empty() {
            tracing::trace!(count = self.pending_list.len(), "nodes left pending this cycle");
        }

        Ok(completed)
    }

    /// Decrement every downstream node's pending count, skipping input
    /// ports flagged `Optional` (spec.md §3: `required[d]` only counts
    /// non-optional ports, so an optional peer must never gate its node's
    /// trigger condition even though the link still exists). Any successor
    /// that reaches zero becomes ready. This is the in-process analogue of
    /// `trigger_link_v1`: fetch_sub, then act only on the thread that
    /// observes the count hit zero.
    fn trigger_successors(&mut self, graph: &mut Graph, node_id: u32) {
        let Ok(node) = graph.node(node_id) else { return };
        let output_ports: Vec<u32> = node.output_ports().to_vec();

        for port_id in output_ports {
            let Ok(port) = graph.port(port_id) else { continue };
            let link_ids: Vec<u32> = port.links().to_vec();

            for link_id in link_ids {
                let Ok(link) = graph.link(link_id) else { continue };
                let successor = link.input_node;
                let input_port_id = link.input_port;

                let Ok(input_port) = graph.port(input_port_id) else { continue };

                if input_port.flags.contains(PortFlags::OPTIONAL) {
                    continue;
                }

                let Some(activation) = self.activations.get(&successor) else { continue };
                let pending = activation.pending.fetch_sub(1, Ordering::AcqRel);

                if let Ok(successor_node) = graph.node_mut(successor) {
                    successor_node.incr_ready(Direction::Input);
                }

                if pending == 1 {
                    activation.status.store(ActivationStatus::Triggered as u8, Ordering::Release);
                    self.ready.push_back(successor);
                }
            }
        }
    }

    /// Re-queue every node still on the pending list — called once an
    /// async completion (C4 work queue) resolves. Returns the nodes that
    /// should be re-driven.
    pub fn drain_pending(&mut self) -> Vec<u32> {
        std::mem::take(&mut self.pending_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph::{NodeFlags, PortFlags};

    fn line_graph() -> (Graph, u32, u32) {
        let mut g = Graph::new();
        let a = g.add_node("driver", NodeFlags::NONE);
        let out_a = g.add_port(a, Direction::Output, "out", PortFlags::NONE).unwrap();

        let b = g.add_node("sink", NodeFlags::NONE);
        let in_b = g.add_port(b, Direction::Input, "in", PortFlags::NONE).unwrap();

        g.add_link(out_a, in_b).unwrap();
        (g, a, b)
    }

    #[test]
    fn pulls_downstream_node_after_driver_completes() {
        let (mut graph, driver, sink) = line_graph();
        let mut sched = Scheduler::new();
        sched.add_node(&graph, driver).unwrap();
        sched.add_node(&graph, sink).unwrap();

        let mut order = Vec::new();
        let completed = sched
            .run_cycle(&mut graph, driver, |id| {
                order.push(id);
                ProcessStatus::Completed
            })
            .unwrap();

        assert_eq!(order, vec![driver, sink]);
        assert_eq!(completed, vec![driver, sink]);
        assert_eq!(sched.status(sink), Some(ActivationStatus::Finished));
    }

    #[test]
    fn pending_node_is_not_triggered_until_drained() {
        let (mut graph, driver, sink) = line_graph();
        let mut sched = Scheduler::new();
        sched.add_node(&graph, driver).unwrap();
        sched.add_node(&graph, sink).unwrap();

        let completed = sched.run_cycle(&mut graph, driver, |_| ProcessStatus::Pending).unwrap();
        assert!(completed.is_empty());

        let pending = sched.drain_pending();
        assert_eq!(pending, vec![driver]);
    }

    #[test]
    fn unknown_driver_is_an_error() {
        let (mut graph, _, _) = line_graph();
        let mut sched = Scheduler::new();
        let err = sched.run_cycle(&mut graph, 999, |_| ProcessStatus::Completed);
        assert!(matches!(err, Err(SchedulerError::UnknownDriver(999))));
    }

    #[test]
    fn node_with_two_predecessors_waits_for_both() {
        let mut graph = Graph::new();
        let a = graph.add_node("a", NodeFlags::NONE);
        let out_a = graph.add_port(a, Direction::Output, "out", PortFlags::NONE).unwrap();
        let b = graph.add_node("b", NodeFlags::NONE);
        let out_b = graph.add_port(b, Direction::Output, "out", PortFlags::NONE).unwrap();

        let c = graph.add_node("c", NodeFlags::NONE);
        let in_c1 = graph.add_port(c, Direction::Input, "in1", PortFlags::NONE).unwrap();
        let in_c2 = graph.add_port(c, Direction::Input, "in2", PortFlags::NONE).unwrap();

        graph.add_link(out_a, in_c1).unwrap();
        graph.add_link(out_b, in_c2).unwrap();

        let mut sched = Scheduler::new();
        sched.add_node(&graph, a).unwrap();
        sched.add_node(&graph, b).unwrap();
        sched.add_node(&graph, c).unwrap();

        // Drive from `a` only: `c` has two predecessors (a, b) but `b`
        // never runs this cycle, so `c` must stay pending.
        let completed = sched.run_cycle(&mut graph, a, |_| ProcessStatus::Completed).unwrap();
        assert_eq!(completed, vec![a]);
        assert_eq!(sched.status(c), Some(ActivationStatus::NotTriggered));
    }
}
