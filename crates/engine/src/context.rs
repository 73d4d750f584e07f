//! `Core`: the engine-side object that owns the graph, scheduler, buffer
//! pools and registry, tying C6-C12 together behind the client-facing
//! façade in [`crate::stream`].
//!
//! Grounded on `crates/client/src/state.rs`'s `CoreState`/`ClientState`
//! split: there, one struct owned the `GlobalMap`, the node/port tables and
//! the pending-work bookkeeping for a single wire connection. `Core` plays
//! the same role in-process, for every connection at once, since spec.md
//! §1 treats the client/transport handle as opaque rather than modeling a
//! single wire peer.

use std::collections::HashMap;

use anyhow::{Context as _, Result, bail};
use bufferpool::{BufferPool, DataType};
use graph::{Direction, Graph, GraphError, Node, NodeFlags, NodeState, PortFlags};
use scheduler::{ProcessStatus, Scheduler};
use workqueue::{WorkQueue, WorkResult};

use crate::config::Config;
use crate::registry::Registry;
use crate::stream::{StreamEvent, StreamId, StreamState};
use crate::typemap::TypeMap;

/// A node's `process_input`/`process_output` callback (spec.md §3), driven
/// by the scheduler once per cycle when the node becomes ready. Takes
/// `&mut Core` rather than closing over it, so [`Core::run_cycle`] can call
/// it without the closure itself holding a conflicting borrow of `self`.
pub type ProcessFn = Box<dyn FnMut(&mut Core, u32) -> ProcessStatus>;

/// Per-node capability registry: the scheduler only ever sees a node id, so
/// its actual `process_input`/`process_output` behavior lives here instead
/// of on [`graph::Node`] (kept as plain data per the "polymorphic interface
/// via function table, not a trait object on the node" split). A node with
/// no entry, or with one side unset, falls back to
/// [`Core::default_process_output`]/[`Core::default_process_input`].
#[derive(Default)]
struct NodeImpl {
    process_output: Option<ProcessFn>,
    process_input: Option<ProcessFn>,
}

/// The engine-side object a demo binary or test harness constructs once
/// and keeps for the lifetime of the process.
///
/// `Core` is deliberately not `Clone`/`Send`-bound beyond what its fields
/// already are: spec.md §5 puts graph mutation on a single control-plane
/// thread (the main loop), so nothing here needs its own locking.
pub struct Core {
    pub(crate) graph: Graph,
    scheduler: Scheduler,
    pub(crate) streams: collections::Map<StreamState>,
    /// One pool per negotiated endpoint. Linked ports share a pool keyed
    /// by their link id (spec.md §3: "the *same* pool object is referenced
    /// by both endpoints"); an unlinked port that still negotiated buffers
    /// (e.g. `AllocBuffers` wasn't requested but no peer exists yet) gets
    /// a private pool keyed by its own port id.
    pools: HashMap<u32, BufferPool>,
    port_pool_key: HashMap<u32, u32>,
    node_impls: HashMap<u32, NodeImpl>,
    work_queue: WorkQueue<Box<dyn FnOnce(u32, i32)>>,
    pub registry: Registry,
    pub type_map: TypeMap,
    config: Config,
    driver: Option<u32>,
}

impl Core {
    pub fn new(config: Config) -> Self {
        Self {
            graph: Graph::new(),
            scheduler: Scheduler::new(),
            streams: collections::Map::new(),
            pools: HashMap::new(),
            port_pool_key: HashMap::new(),
            node_impls: HashMap::new(),
            work_queue: WorkQueue::new(),
            registry: Registry::new(),
            type_map: TypeMap::new(),
            config,
            driver: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Create a new, unconnected [`crate::stream::Stream`] and return its
    /// handle, per spec.md §6's `stream_new_simple`.
    pub fn create_stream(&mut self, direction: Direction) -> StreamId {
        self.create_stream_state(Some(direction))
    }

    /// Create a new, unconnected [`crate::stream::Filter`], per spec.md
    /// §6's `filter_new_simple`.
    pub fn create_filter(&mut self) -> StreamId {
        self.create_stream_state(None)
    }

    pub(crate) fn add_node(&mut self, name: impl Into<String>, flags: NodeFlags) -> u32 {
        let id = self.graph.add_node(name, flags);

        if let Err(err) = self.scheduler.add_node(&self.graph, id) {
            tracing::warn!(node = id, %err, "scheduler rejected newly created node");
        }

        id
    }

    pub(crate) fn add_port(
        &mut self,
        node_id: u32,
        direction: Direction,
        name: impl Into<String>,
        flags: PortFlags,
    ) -> Result<u32> {
        Ok(self.graph.add_port(node_id, direction, name, flags)?)
    }

    /// Link an output port to an input port, sharing one buffer pool
    /// between both sides per spec.md §3's I/O-area sharing invariant, and
    /// refresh both endpoints' scheduler `required` counts since an extra
    /// predecessor edge now exists.
    pub(crate) fn link(&mut self, output_node: u32, output_port: u32, input_node: u32, input_port: u32) -> Result<u32> {
        let link_id = self.graph.add_link(output_port, input_port)?;

        self.port_pool_key.insert(output_port, link_id);
        self.port_pool_key.insert(input_port, link_id);

        self.scheduler.add_node(&self.graph, output_node).map_err(anyhow::Error::msg)?;
        self.scheduler.add_node(&self.graph, input_node).map_err(anyhow::Error::msg)?;

        tracing::debug!(link_id, output_node, output_port, input_node, input_port, "linked ports");
        Ok(link_id)
    }

    /// Register `node_id`'s `process_output` callback (spec.md §3),
    /// replacing [`Self::default_process_output`] for this node. Called
    /// once per cycle, after the node's predecessors have run, with the
    /// node id so the callback can look up its own ports/state.
    pub fn set_process_output(&mut self, node_id: u32, f: impl FnMut(&mut Core, u32) -> ProcessStatus + 'static) {
        self.node_impls.entry(node_id).or_default().process_output = Some(Box::new(f));
    }

    /// Register `node_id`'s `process_input` callback (spec.md §3),
    /// replacing [`Self::default_process_input`] for this node.
    pub fn set_process_input(&mut self, node_id: u32, f: impl FnMut(&mut Core, u32) -> ProcessStatus + 'static) {
        self.node_impls.entry(node_id).or_default().process_input = Some(Box::new(f));
    }

    pub(crate) fn set_driver(&mut self, node_id: u32) {
        if let Ok(node) = self.graph.node_mut(node_id) {
            node.driver = true;
        }

        self.driver = Some(node_id);
        tracing::info!(node_id, "designated driver node");
    }

    /// Negotiate format/buffer parameters for `node_id`'s ports and
    /// allocate their pools, per spec.md §4.7's Creating -> Suspended ->
    /// Idle transitions.
    ///
    /// Modeled as a work-queue item with an immediately-ready sequence
    /// (spec.md §4.4: "items with `sequence = Invalid` are ready to fire
    /// immediately") so the same causal-ordering machinery a real
    /// remote-endpoint round trip would need is exercised here too, even
    /// though this engine never actually waits on one.
    pub(crate) fn node_negotiate(&mut self, node_id: u32) -> Result<()> {
        self.transition(node_id, NodeState::Suspended)?;

        let ports: Vec<(u32, Direction)> = {
            let node = self.graph.node(node_id)?;
            node.input_ports()
                .iter()
                .map(|&id| (id, Direction::Input))
                .chain(node.output_ports().iter().map(|&id| (id, Direction::Output)))
                .collect()
        };

        for (port_id, _direction) in ports {
            if self.port_pool_key.contains_key(&port_id) && self.pools.contains_key(&self.port_pool_key[&port_id]) {
                // Shared pool already allocated by `link`.
                continue;
            }

            let pool = BufferPool::allocate(self.config.buffer_pool_count, self.config.buffer_pool_size, DataType::MemFd)
                .with_context(|| format!("allocating buffer pool for port {port_id}"))?;

            self.port_pool_key.insert(port_id, port_id);
            self.pools.insert(port_id, pool);
        }

        self.work_queue.add(node_id, WorkResult::Ready(0), Box::new(|_, _| {}));

        self.transition(node_id, NodeState::Idle)
    }

    pub(crate) fn node_start(&mut self, node_id: u32) -> Result<()> {
        self.transition(node_id, NodeState::Running)
    }

    pub fn node_pause(&mut self, node_id: u32) -> Result<()> {
        self.transition(node_id, NodeState::Idle)
    }

    /// Drop a node's negotiated buffers and return it to `Suspended`, per
    /// spec.md §4.7's idle-suspend policy.
    pub fn node_suspend(&mut self, node_id: u32) -> Result<()> {
        let ports: Vec<u32> = {
            let node = self.graph.node(node_id)?;
            node.input_ports().iter().chain(node.output_ports()).copied().collect()
        };

        for port_id in ports {
            if let Some(&pool_key) = self.port_pool_key.get(&port_id) {
                let shared = self
                    .port_pool_key
                    .iter()
                    .filter(|(_, &key)| key == pool_key)
                    .count();

                if shared <= 1 {
                    self.pools.remove(&pool_key);
                }

                self.port_pool_key.remove(&port_id);
            }
        }

        self.transition(node_id, NodeState::Suspended)
    }

    /// Suspend every node that has been `Idle` for at least
    /// [`Config::idle_suspend_timeout`], releasing their buffer pools.
    ///
    /// Spec.md §4.7: "when a node enters `Idle` and remains idle for a
    /// configurable wall-clock interval (default 3 s), the state machine
    /// issues `Suspend`". Meant to be driven periodically off the event
    /// loop's timer queue (see `src/rt.rs`); a node that receives a
    /// `Start` before this runs next simply won't be in the returned list
    /// (spec.md §8 (S6): "Any `Start` request cancels the pending
    /// suspension" — `node_start`'s transition to `Running` already clears
    /// the node's idle clock, see [`graph::Node::set_state`]).
    pub fn sweep_idle_timeouts(&mut self, now: std::time::Instant) -> Vec<u32> {
        let timed_out = self.graph.idle_timed_out(now, self.config.idle_suspend_timeout);

        for &node_id in &timed_out {
            if let Err(err) = self.node_suspend(node_id) {
                tracing::warn!(node_id, %err, "idle-suspend sweep failed to suspend node");
            }
        }

        timed_out
    }

    fn transition(&mut self, node_id: u32, to: NodeState) -> Result<()> {
        let node = self.graph.node_mut(node_id)?;
        node.set_state(to)?;
        Ok(())
    }

    pub(crate) fn dequeue_pool_buffer(&mut self, port_id: u32) -> Option<u32> {
        let pool_key = self.port_pool_key.get(&port_id).copied()?;
        self.pools.get_mut(&pool_key)?.dequeue().map(|buffer| buffer.id)
    }

    pub(crate) fn queue_pool_buffer(&mut self, port_id: u32, buffer_id: u32) -> Result<()> {
        let pool_key = self.port_pool_key.get(&port_id).copied().context("port has no buffer pool")?;
        self.pools.get_mut(&pool_key).context("stale pool key")?.queue(buffer_id)?;
        self.publish_io(port_id, buffer_id);
        Ok(())
    }

    /// Publish the I/O area status spec.md §4.8 calls "the scheduler's
    /// primary edge signal": a producer (output port) queuing a buffer
    /// means the peer now `HaveBuffer`; a consumer (input port) queuing
    /// one back means it has consumed it and `NeedBuffer` again.
    fn publish_io(&mut self, port_id: u32, buffer_id: u32) {
        let Ok(port) = self.graph.port(port_id) else { return };
        let direction = port.direction;

        let Ok(io) = self.graph.port_io_mut(port_id) else {
            return; // unlinked port: no peer to observe the signal.
        };

        io.buffer_id = buffer_id;
        io.status = match direction {
            Direction::Output => graph::IoStatus::HaveBuffer,
            Direction::Input => graph::IoStatus::NeedBuffer,
        };
    }

    pub(crate) fn pool_for_port_mut(&mut self, port_id: u32) -> Option<&mut BufferPool> {
        let pool_key = *self.port_pool_key.get(&port_id)?;
        self.pools.get_mut(&pool_key)
    }

    /// Run one scheduler cycle from the designated driver node, per
    /// spec.md §4.8. Reclaims every completed node's port pools (moving
    /// `Returned` buffers back to `Free`) and fires the `Process` event to
    /// any stream/filter whose node ran this cycle.
    ///
    /// Drives the scheduler's stepping API (`start_cycle`/`next_ready`/
    /// `finish_node`) rather than its single-closure `run_cycle`, since
    /// [`Self::process_node`] needs `&mut self` and can't be handed to the
    /// scheduler as a closure while `self.scheduler` is itself borrowed.
    #[tracing::instrument(skip(self), fields(driver = ?self.driver))]
    pub fn run_cycle(&mut self) -> Result<Vec<u32>> {
        let driver = self.driver.context("no driver node configured for this graph")?;

        self.scheduler
            .start_cycle(&mut self.graph, driver)
            .map_err(|err| anyhow::anyhow!("{err}"))?;

        let mut completed = Vec::new();

        while let Some(node_id) = self.scheduler.next_ready() {
            let status = self.process_node(node_id);

            if self.scheduler.finish_node(&mut self.graph, node_id, status) {
                completed.push(node_id);
            }
        }

        for &node_id in &completed {
            let ports: Vec<u32> = match self.graph.node(node_id) {
                Ok(node) => node.input_ports().iter().chain(node.output_ports()).copied().collect(),
                Err(_) => Vec::new(),
            };

            for port_id in ports {
                if let Some(pool) = self.pool_for_port_mut(port_id) {
                    pool.reclaim();
                }
            }

            if let Some((_, stream)) = self.streams.iter_mut().find(|(_, s)| s.node_id == node_id) {
                stream.listeners.emit(&StreamEvent::Process);
            }
        }

        Ok(completed)
    }

    /// Run `node_id`'s `process_output` then `process_input` (spec.md §3
    /// lists both on every node; a pure source/sink only exercises one
    /// side, since the other side's port list is empty), merging their two
    /// [`ProcessStatus`] results into the one the scheduler needs.
    fn process_node(&mut self, node_id: u32) -> ProcessStatus {
        let output_status = self.run_process_output(node_id);
        let input_status = self.run_process_input(node_id);
        Self::merge_status(output_status, input_status)
    }

    /// Take-then-restore: a registered callback needs `&mut Core` to run,
    /// which conflicts with leaving it borrowed inside `self.node_impls`,
    /// so it's removed from the map for the call and put back afterwards.
    fn run_process_output(&mut self, node_id: u32) -> ProcessStatus {
        let callback = self.node_impls.get_mut(&node_id).and_then(|imp| imp.process_output.take());

        let (status, callback) = match callback {
            Some(mut f) => {
                let status = f(self, node_id);
                (status, Some(f))
            }
            None => (self.default_process_output(node_id), None),
        };

        if let Some(f) = callback {
            self.node_impls.entry(node_id).or_default().process_output = Some(f);
        }

        status
    }

    fn run_process_input(&mut self, node_id: u32) -> ProcessStatus {
        let callback = self.node_impls.get_mut(&node_id).and_then(|imp| imp.process_input.take());

        let (status, callback) = match callback {
            Some(mut f) => {
                let status = f(self, node_id);
                (status, Some(f))
            }
            None => (self.default_process_input(node_id), None),
        };

        if let Some(f) = callback {
            self.node_impls.entry(node_id).or_default().process_input = Some(f);
        }

        status
    }

    /// Xrun beats Pending beats Completed, so a node with one misbehaving
    /// port still reports the worst outcome for the cycle.
    fn merge_status(a: ProcessStatus, b: ProcessStatus) -> ProcessStatus {
        match (a, b) {
            (ProcessStatus::Xrun, _) | (_, ProcessStatus::Xrun) => ProcessStatus::Xrun,
            (ProcessStatus::Pending, _) | (_, ProcessStatus::Pending) => ProcessStatus::Pending,
            _ => ProcessStatus::Completed,
        }
    }

    /// Default `process_output`, for nodes with no registered callback:
    /// dequeue a free buffer for every output port and publish it
    /// immediately (spec.md §4.8's `HaveBuffer` edge signal). A port whose
    /// pool is starved (no free buffer this cycle) is left at
    /// `NeedBuffer` and the node reports `Pending` rather than `Completed`,
    /// which is what lets spec §8 (S4)'s starvation case actually occur —
    /// previously every node was marked `Completed` unconditionally.
    fn default_process_output(&mut self, node_id: u32) -> ProcessStatus {
        let output_ports: Vec<u32> = match self.graph.node(node_id) {
            Ok(node) => node.output_ports().to_vec(),
            Err(_) => return ProcessStatus::Completed,
        };

        if output_ports.is_empty() {
            return ProcessStatus::Completed;
        }

        let mut status = ProcessStatus::Completed;

        for port_id in output_ports {
            match self.dequeue_pool_buffer(port_id) {
                Some(buffer_id) => {
                    if let Err(err) = self.queue_pool_buffer(port_id, buffer_id) {
                        tracing::warn!(node_id, port_id, %err, "failed to publish output buffer");
                        status = ProcessStatus::Xrun;
                    }
                }
                None => {
                    tracing::trace!(node_id, port_id, "output pool starved, node needs a buffer");

                    if let Ok(io) = self.graph.port_io_mut(port_id) {
                        io.status = graph::IoStatus::NeedBuffer;
                    }

                    if status == ProcessStatus::Completed {
                        status = ProcessStatus::Pending;
                    }
                }
            }
        }

        status
    }

    /// Default `process_input`, for nodes with no registered callback:
    /// consume whatever buffer each input port's shared I/O area currently
    /// publishes (`HaveBuffer`), resetting it to `NeedBuffer`; a port still
    /// waiting on its producer (spec §8 (S4): starved) leaves the node
    /// `Pending` for this cycle instead of completing regardless.
    fn default_process_input(&mut self, node_id: u32) -> ProcessStatus {
        let input_ports: Vec<u32> = match self.graph.node(node_id) {
            Ok(node) => node.input_ports().to_vec(),
            Err(_) => return ProcessStatus::Completed,
        };

        if input_ports.is_empty() {
            return ProcessStatus::Completed;
        }

        let mut status = ProcessStatus::Completed;

        for port_id in input_ports {
            let have_buffer = matches!(
                self.graph.port_io(port_id).map(|io| io.status),
                Ok(graph::IoStatus::HaveBuffer)
            );

            if have_buffer {
                if let Ok(io) = self.graph.port_io_mut(port_id) {
                    io.status = graph::IoStatus::NeedBuffer;
                }
            } else if status == ProcessStatus::Completed {
                status = ProcessStatus::Pending;
            }
        }

        status
    }

    /// Complete a previously queued async negotiation step, per spec.md
    /// §4.4's `complete(object, seq, res)`.
    pub fn complete_work(&mut self, object: u32, seq: u32, res: i32) {
        self.work_queue.complete(object, seq, res);
    }

    /// Remove a node and every port/link attached to it, tearing down its
    /// buffer pools and scheduler activation along the way.
    pub fn remove_node(&mut self, node_id: u32) -> Result<(), GraphError> {
        self.scheduler.remove_node(node_id);
        self.node_impls.remove(&node_id);
        self.work_queue.cancel(node_id, None);

        let ports: Vec<u32> = self
            .graph
            .node(node_id)
            .map(|node| node.input_ports().iter().chain(node.output_ports()).copied().collect())
            .unwrap_or_default();

        for port_id in ports {
            self.port_pool_key.remove(&port_id);
        }

        self.graph.remove_node(node_id)
    }

    pub fn node(&self, node_id: u32) -> Result<&Node, GraphError> {
        self.graph.node(node_id)
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_pull_graph(core: &mut Core) -> (u32, u32, u32, u32) {
        let source = core.add_node("source", NodeFlags::NONE);
        let out_port = core.add_port(source, Direction::Output, "out", PortFlags::NONE).unwrap();

        let sink = core.add_node("sink", NodeFlags::NONE);
        let in_port = core.add_port(sink, Direction::Input, "in", PortFlags::NONE).unwrap();

        core.link(source, out_port, sink, in_port).unwrap();
        core.set_driver(source);

        core.node_negotiate(source).unwrap();
        core.node_start(source).unwrap();
        core.node_negotiate(sink).unwrap();
        core.node_start(sink).unwrap();

        (source, out_port, sink, in_port)
    }

    #[test]
    fn queuing_an_output_buffer_publishes_have_buffer_to_the_peer() {
        let mut core = Core::default();
        let (_, out_port, _, in_port) = build_pull_graph(&mut core);

        let buffer_id = core.dequeue_pool_buffer(out_port).unwrap();
        core.queue_pool_buffer(out_port, buffer_id).unwrap();

        let io = core.graph.port_io(in_port).unwrap();
        assert_eq!(io.status, graph::IoStatus::HaveBuffer);
        assert_eq!(io.buffer_id, buffer_id);
    }

    #[test]
    fn linked_ports_share_one_buffer_pool() {
        let mut core = Core::default();
        let (_, out_port, _, in_port) = build_pull_graph(&mut core);

        assert_eq!(core.port_pool_key[&out_port], core.port_pool_key[&in_port]);
    }

    #[test]
    fn run_cycle_drives_both_nodes() {
        let mut core = Core::default();
        let (source, _, sink, _) = build_pull_graph(&mut core);

        let completed = core.run_cycle().unwrap();
        assert_eq!(completed, vec![source, sink]);
    }

    #[test]
    fn run_cycle_without_driver_is_an_error() {
        let mut core = Core::default();
        assert!(core.run_cycle().is_err());
    }

    #[test]
    fn suspend_releases_the_negotiated_pool() {
        let mut core = Core::default();
        let (source, out_port, _, _) = build_pull_graph(&mut core);

        core.node_suspend(source).unwrap();
        assert!(core.pool_for_port_mut(out_port).is_none());
        assert_eq!(core.node(source).unwrap().state(), NodeState::Suspended);
    }

    #[test]
    fn idle_sweep_suspends_only_after_the_configured_timeout() {
        let config = Config::builder().idle_suspend_timeout(std::time::Duration::from_millis(10)).build();
        let mut core = Core::new(config);

        let node = core.add_node("lonely", NodeFlags::NONE);
        core.node_negotiate(node).unwrap(); // leaves the node Idle, never Start'd.
        assert_eq!(core.node(node).unwrap().state(), NodeState::Idle);

        let now = std::time::Instant::now();
        assert!(core.sweep_idle_timeouts(now).is_empty());
        assert_eq!(core.node(node).unwrap().state(), NodeState::Idle);

        let later = now + std::time::Duration::from_millis(50);
        assert_eq!(core.sweep_idle_timeouts(later), vec![node]);
        assert_eq!(core.node(node).unwrap().state(), NodeState::Suspended);
    }

    #[test]
    fn starting_a_node_cancels_its_pending_idle_suspension() {
        let config = Config::builder().idle_suspend_timeout(std::time::Duration::from_millis(10)).build();
        let mut core = Core::new(config);

        let node = core.add_node("revived", NodeFlags::NONE);
        core.node_negotiate(node).unwrap();
        core.node_start(node).unwrap();

        let later = std::time::Instant::now() + std::time::Duration::from_secs(1);
        assert!(core.sweep_idle_timeouts(later).is_empty());
        assert_eq!(core.node(node).unwrap().state(), NodeState::Running);
    }
}
