//! Stream / Filter façade (C9), spec.md §4.9.
//!
//! Grounded on `crates/client/src/stream.rs`'s event surface (`StreamEvent`
//! there already names most of `state_changed`/`param_changed`/
//! `add_buffer`/`remove_buffer`/`process`/`drained`/`trigger_done`) and its
//! `RTProcess` vs. posted-to-user-loop dispatch split. Unlike the teacher's
//! `Stream`, which *is* the whole wire connection, this façade is a thin
//! handle into [`crate::context::Core`]'s owned node/port/pool state — the
//! engine has no wire connection to be.

use anyhow::{Context as _, Result, bail, ensure};
use graph::{Direction, NodeState};

use crate::context::Core;
use crate::listeners::{ListenerId, Listeners};

/// Flags accepted by [`Core::stream_connect`]/[`Core::filter_connect`],
/// matching spec.md §6's bit values exactly so callers can compose them the
/// same way the original API does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConnectFlags(u32);

impl StreamConnectFlags {
    pub const NONE: Self = Self(0);
    pub const AUTOCONNECT: Self = Self(0x01);
    pub const MAP_BUFFERS: Self = Self(0x02);
    pub const RT_PROCESS: Self = Self(0x04);
    pub const ALLOC_BUFFERS: Self = Self(0x08);
    pub const INACTIVE_START: Self = Self(0x10);
    pub const DRIVER: Self = Self(0x20);
    pub const ASYNC: Self = Self(0x40);
    pub const EXCLUSIVE: Self = Self(0x80);
    pub const NO_CONVERT: Self = Self(0x100);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl core::ops::BitOr for StreamConnectFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Events delivered to a stream/filter's listeners.
///
/// `Process` runs on the data loop thread when [`StreamConnectFlags::RT_PROCESS`]
/// is set; otherwise [`Core`] posts it to the main loop's work queue instead
/// (spec.md §4.9: "The `process` callback runs on the data loop thread when
/// `RTProcess` is set; otherwise it is posted to the user loop").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StreamEvent {
    StateChanged { from: NodeState, to: NodeState },
    ParamChanged { id: u32 },
    AddBuffer { port_id: u32, buffer_id: u32 },
    RemoveBuffer { port_id: u32, buffer_id: u32 },
    Process,
    Drained,
    TriggerDone,
}

/// One port owned by a [`StreamState`], with its allocated buffer pool (if
/// [`StreamConnectFlags::ALLOC_BUFFERS`] wasn't requested by the user) or a
/// marker that buffers are user-supplied.
pub(crate) struct StreamPort {
    pub port_id: u32,
    pub direction: Direction,
    pub user_allocated: bool,
}

pub(crate) struct StreamState {
    pub node_id: u32,
    pub flags: StreamConnectFlags,
    /// `Some(d)` for a [`Stream`] (single-direction, spec.md §4.9); `None`
    /// for a [`Filter`], which may mix directions across its ports.
    pub fixed_direction: Option<Direction>,
    pub ports: Vec<StreamPort>,
    pub listeners: Listeners<StreamEvent>,
}

impl StreamState {
    fn primary_port(&self) -> Option<u32> {
        self.ports.first().map(|p| p.port_id)
    }

    fn port(&self, port_id: u32) -> Option<&StreamPort> {
        self.ports.iter().find(|p| p.port_id == port_id)
    }
}

/// Handle identifying a stream or filter created via [`Core::create_stream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct StreamId(pub(crate) u32);

impl StreamId {
    /// The underlying node id backing this stream or filter.
    #[inline]
    pub fn index(&self) -> u32 {
        self.0
    }
}

/// A borrowed, ergonomic view of one stream owned by a [`Core`].
///
/// `Stream` owns exactly one node with a single port direction and one or
/// more ports, per spec.md §4.9. Obtained from [`Core::stream`].
pub struct Stream<'a> {
    pub(crate) core: &'a mut Core,
    pub(crate) id: StreamId,
}

impl<'a> Stream<'a> {
    /// Ask the engine to create and link this stream's node, per spec.md
    /// §4.9's `connect(direction, target, flags, params)`.
    pub fn connect(&mut self, direction: Direction, target: Option<u32>, flags: StreamConnectFlags) -> Result<()> {
        self.core.stream_connect(self.id, direction, target, flags)
    }

    /// Return the next free buffer with an empty chunk (output) or a filled
    /// one (input), or `None` if the caller would have to block.
    pub fn dequeue_buffer(&mut self) -> Option<u32> {
        self.core.stream_dequeue_buffer(self.id)
    }

    /// Return a buffer to the engine so the peer may consume it or the
    /// pool may reuse it.
    pub fn queue_buffer(&mut self, buffer_id: u32) -> Result<()> {
        self.core.stream_queue_buffer(self.id, buffer_id)
    }

    pub fn add_listener(&mut self, callback: impl FnMut(&StreamEvent) + 'static) -> ListenerId {
        self.core.stream_add_listener(self.id, callback)
    }

    pub fn state(&self) -> Option<NodeState> {
        self.core.stream_state_query(self.id)
    }
}

/// A borrowed, ergonomic view of one filter owned by a [`Core`].
///
/// `Filter` generalises [`Stream`] to multiple ports in both directions,
/// per spec.md §4.9.
pub struct Filter<'a> {
    pub(crate) core: &'a mut Core,
    pub(crate) id: StreamId,
}

impl<'a> Filter<'a> {
    pub fn connect(&mut self, flags: StreamConnectFlags) -> Result<()> {
        self.core.filter_connect(self.id, flags)
    }

    pub fn add_port(&mut self, direction: Direction, name: impl Into<String>) -> Result<u32> {
        self.core.filter_add_port(self.id, direction, name)
    }

    pub fn add_listener(&mut self, callback: impl FnMut(&StreamEvent) + 'static) -> ListenerId {
        self.core.stream_add_listener(self.id, callback)
    }

    /// Shortcut for dequeue-get-data-requeue of a single DSP frame, per
    /// spec.md §4.9. `n_samples * stride` bytes (16-bit stereo stride,
    /// matching `old/src/mixer.rs`'s `on_process_playback`) are handed to
    /// `write`, then the chunk is sized and the buffer requeued
    /// automatically — the caller never sees the raw dequeue/queue pair.
    pub fn get_dsp_buffer(&mut self, port_id: u32, n_samples: u32, write: impl FnOnce(&mut [u8])) -> Result<()> {
        self.core.filter_get_dsp_buffer(self.id, port_id, n_samples, write)
    }
}

impl Core {
    /// Create a new, unconnected stream or filter and return its handle.
    pub(crate) fn create_stream_state(&mut self, fixed_direction: Option<Direction>) -> StreamId {
        let node_id = self.add_node("stream", graph::NodeFlags::NONE);

        let id = self.streams.insert(StreamState {
            node_id,
            flags: StreamConnectFlags::NONE,
            fixed_direction,
            ports: Vec::new(),
            listeners: Listeners::new(),
        });

        StreamId(id)
    }

    fn stream_state(&self, id: StreamId) -> Result<&StreamState> {
        self.streams.get(id.0).context("unknown stream")
    }

    fn stream_state_mut(&mut self, id: StreamId) -> Result<&mut StreamState> {
        self.streams.get_mut(id.0).context("unknown stream")
    }

    /// Borrow a stream by handle for ergonomic method calls.
    pub fn stream(&mut self, id: StreamId) -> Stream<'_> {
        Stream { core: self, id }
    }

    /// Borrow a filter by handle for ergonomic method calls.
    pub fn filter(&mut self, id: StreamId) -> Filter<'_> {
        Filter { core: self, id }
    }

    pub(crate) fn stream_connect(
        &mut self,
        id: StreamId,
        direction: Direction,
        target: Option<u32>,
        flags: StreamConnectFlags,
    ) -> Result<()> {
        let node_id = self.stream_state(id)?.node_id;
        let port_name = match direction {
            Direction::Input => "input",
            Direction::Output => "output",
        };
        let port_id = self.add_port(node_id, direction, port_name, graph::PortFlags::NONE)?;

        {
            let state = self.stream_state_mut(id)?;
            ensure!(state.ports.is_empty(), "stream already connected");
            state.flags = flags;
            state.ports.push(StreamPort {
                port_id,
                direction,
                user_allocated: flags.contains(StreamConnectFlags::ALLOC_BUFFERS),
            });
        }

        if flags.contains(StreamConnectFlags::AUTOCONNECT) {
            if let Some(target_node) = target {
                self.autoconnect_stream(node_id, port_id, direction, target_node)?;
            }
        }

        if flags.contains(StreamConnectFlags::DRIVER) {
            self.set_driver(node_id);
        }

        if !flags.contains(StreamConnectFlags::INACTIVE_START) {
            self.node_negotiate(node_id)?;
            self.node_start(node_id)?;
        }

        Ok(())
    }

    fn autoconnect_stream(&mut self, node_id: u32, port_id: u32, direction: Direction, target_node: u32) -> Result<()> {
        let peer_direction = direction.opposite();

        let peer_port = match peer_direction {
            Direction::Input => self.graph.node(target_node).context("unknown autoconnect target")?.input_ports().first().copied(),
            Direction::Output => self.graph.node(target_node).context("unknown autoconnect target")?.output_ports().first().copied(),
        }
        .context("autoconnect target has no matching port")?;

        match direction {
            Direction::Output => {
                self.link(node_id, port_id, target_node, peer_port)?;
            }
            Direction::Input => {
                self.link(target_node, peer_port, node_id, port_id)?;
            }
        }

        Ok(())
    }

    pub(crate) fn filter_connect(&mut self, id: StreamId, flags: StreamConnectFlags) -> Result<()> {
        let node_id = self.stream_state(id)?.node_id;
        self.stream_state_mut(id)?.flags = flags;

        if flags.contains(StreamConnectFlags::DRIVER) {
            self.set_driver(node_id);
        }

        if !flags.contains(StreamConnectFlags::INACTIVE_START) {
            self.node_negotiate(node_id)?;
            self.node_start(node_id)?;
        }

        Ok(())
    }

    pub(crate) fn filter_add_port(&mut self, id: StreamId, direction: Direction, name: impl Into<String>) -> Result<u32> {
        let node_id = self.stream_state(id)?.node_id;
        let port_id = self.add_port(node_id, direction, name, graph::PortFlags::NONE)?;

        let flags = self.stream_state(id)?.flags;
        let state = self.stream_state_mut(id)?;
        state.ports.push(StreamPort {
            port_id,
            direction,
            user_allocated: flags.contains(StreamConnectFlags::ALLOC_BUFFERS),
        });

        Ok(port_id)
    }

    pub(crate) fn stream_dequeue_buffer(&mut self, id: StreamId) -> Option<u32> {
        let port_id = self.stream_state(id).ok()?.primary_port()?;
        self.dequeue_pool_buffer(port_id)
    }

    pub(crate) fn stream_queue_buffer(&mut self, id: StreamId, buffer_id: u32) -> Result<()> {
        let port_id = self.stream_state(id)?.primary_port().context("stream has no ports")?;
        self.queue_pool_buffer(port_id, buffer_id)?;
        self.emit_stream_event(id, StreamEvent::TriggerDone);
        Ok(())
    }

    pub(crate) fn filter_get_dsp_buffer(
        &mut self,
        id: StreamId,
        port_id: u32,
        n_samples: u32,
        write: impl FnOnce(&mut [u8]),
    ) -> Result<()> {
        {
            let state = self.stream_state(id)?;
            state.port(port_id).context("unknown filter port")?;
        }

        const STRIDE: u32 = 4; // 16-bit stereo, matching old/src/mixer.rs's on_process_playback

        let Some(buffer_id) = self.dequeue_pool_buffer(port_id) else {
            bail!("no free buffer for port {port_id}");
        };

        let requested = (n_samples * STRIDE) as usize;

        let pool = self.pool_for_port_mut(port_id).context("no buffer pool for port")?;
        let buffer = pool.get_mut(buffer_id).context("stale buffer id")?;
        let data = buffer.datas.first_mut().context("buffer has no data planes")?;

        let slice = data.as_mut_slice();
        let len = requested.min(slice.len());
        write(&mut slice[..len]);

        data.chunk.offset = 0;
        data.chunk.stride = STRIDE as i32;
        data.chunk.size = len as u32;

        self.queue_pool_buffer(port_id, buffer_id)?;
        self.emit_stream_event(id, StreamEvent::TriggerDone);
        Ok(())
    }

    pub(crate) fn stream_add_listener(&mut self, id: StreamId, callback: impl FnMut(&StreamEvent) + 'static) -> ListenerId {
        match self.stream_state_mut(id) {
            Ok(state) => state.listeners.add(callback),
            Err(_) => ListenerId::INVALID,
        }
    }

    pub(crate) fn stream_state_node(&self, id: StreamId) -> Option<u32> {
        self.streams.get(id.0).map(|s| s.node_id)
    }

    pub(crate) fn stream_state_query(&self, id: StreamId) -> Option<NodeState> {
        let node_id = self.stream_state_node(id)?;
        self.graph.node(node_id).map(|n| n.state())
    }

    pub(crate) fn emit_stream_event(&mut self, id: StreamId, event: StreamEvent) {
        if let Ok(state) = self.stream_state_mut(id) {
            state.listeners.emit(&event);
        }
    }
}
