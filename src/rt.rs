//! The realtime data loop thread.
//!
//! Grounded on `old/src/mixer.rs`'s `Handle`/`Mixer` split (an
//! `mpsc`-fed task queue drained on a loop wakeup) and `src/web.rs`'s
//! `Handle`/`Server` split for graceful shutdown. Unlike the teacher, this
//! loop drives `engine::Core`'s scheduler instead of a real libpipewire
//! main loop: `protocol::EventLoop` supplies the timer (cycle tick) and
//! io-wakeup (command dispatch) primitives spec.md §4.5 describes.

use std::cell::RefCell;
use std::io;
use std::os::fd::AsRawFd;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use anyhow::Result;
use engine::{Config, Core, ProcessStatus, StreamConnectFlags};
use graph::{Direction, NodeFlags, PortFlags};
use protocol::poll::Interest;
use protocol::{EventFd, EventLoop};
use serde::Serialize;
use tokio::sync::oneshot;

/// How often the data loop drives one scheduler cycle. The teacher's real
/// counterpart is paced by a hardware interrupt from the driver node;
/// nothing here owns real hardware, so a fixed tick stands in for it.
const CYCLE_INTERVAL: Duration = Duration::from_millis(10);

/// Summary of one graph node, returned to the control plane.
#[derive(Debug, Serialize)]
pub struct NodeSummary {
    pub id: u32,
    pub name: String,
    pub state: String,
}

/// A request the control plane (HTTP handlers) sends to the data loop.
///
/// Each variant carries a [`oneshot::Sender`] for its reply, matching the
/// request/response shape spec.md §4.4's work queue gives async graph
/// operations, collapsed to a single hop since nothing here crosses a real
/// wire.
pub enum Command {
    ListNodes(oneshot::Sender<Vec<NodeSummary>>),
    CreatePlaybackStream(oneshot::Sender<Result<u32>>),
    TriggerCycle(oneshot::Sender<Result<Vec<u32>>>),
}

/// A cloneable handle to the running data loop.
#[derive(Clone)]
pub struct Handle {
    tx: Sender<Command>,
    wakeup: Arc<EventFd>,
}

impl Handle {
    /// Send a command to the data loop and wake it if it's blocked in
    /// `iterate`.
    pub fn send(&self, command: Command) -> io::Result<()> {
        // The mpsc send can only fail if the loop thread has already
        // exited, in which case there's nothing left to wake.
        if self.tx.send(command).is_err() {
            return Ok(());
        }

        self.wakeup.write(1)?;
        Ok(())
    }
}

/// Demo wiring created once at startup: a driver "tone" source node with a
/// DSP output port, linked to a "speaker" sink node, per spec.md §8's (S4)
/// two-node pull scenario.
fn seed_demo_graph(core: &mut Core) -> Result<()> {
    let source = core.add_node("demo-tone", NodeFlags::RT);
    let source_port = core.add_port(source, Direction::Output, "out", PortFlags::NONE)?;

    let sink = core.add_node("demo-speaker", NodeFlags::RT);
    let sink_port = core.add_port(sink, Direction::Input, "in", PortFlags::NONE)?;

    core.link(source, source_port, sink, sink_port)?;
    core.set_driver(source);

    core.node_negotiate(source)?;
    core.node_start(source)?;
    core.node_negotiate(sink)?;
    core.node_start(sink)?;

    // The demo's actual `process_output` (spec.md §3): pull a free buffer
    // from the port's pool, fill it with one period of tone, and publish
    // it, the same `HaveBuffer`/`NeedBuffer` edge signal a real node's
    // callback would drive. Run by the scheduler once per cycle rather
    // than ahead of it, so a starved pool reports `Pending` instead of the
    // cycle silently marking the node `Completed` regardless.
    let mut tone_phase = 0.0f32;
    core.set_process_output(source, move |core, _node_id| write_tone_buffer(core, source_port, &mut tone_phase));

    Ok(())
}

/// Fill one DSP period with a 440 Hz tone, 16-bit stereo — the same
/// sine-accumulator shape `old/src/mixer.rs`'s `on_process_playback` used,
/// minus the FFI buffer plumbing.
fn write_tone(buf: &mut [u8], phase: &mut f32) {
    const RATE: f32 = 48_000.0;
    const FREQ: f32 = 440.0;
    const TAU: f32 = core::f32::consts::PI * 2.0;

    for frame in buf.chunks_exact_mut(4) {
        *phase += TAU * FREQ / RATE;
        if *phase >= TAU {
            *phase -= TAU;
        }

        let sample = (phase.sin() * i16::MAX as f32 * 0.1) as i16;
        let bytes = sample.to_le_bytes();
        frame[0..2].copy_from_slice(&bytes);
        frame[2..4].copy_from_slice(&bytes);
    }
}

/// `process_output` for the demo tone source: dequeue a free buffer,
/// fill it with one period of tone, and publish it. Reports `Pending`
/// when the port's pool is starved (every buffer still in flight with a
/// peer), the S4 starvation case spec.md §8 describes, rather than
/// pretending the node always completes.
fn write_tone_buffer(core: &mut Core, source_port: u32, tone_phase: &mut f32) -> ProcessStatus {
    let Some(buffer_id) = core.dequeue_pool_buffer(source_port) else {
        return ProcessStatus::Pending;
    };

    if let Some(pool) = core.pool_for_port_mut(source_port) {
        if let Some(buffer) = pool.get_mut(buffer_id) {
            if let Some(data) = buffer.datas.first_mut() {
                let slice = data.as_mut_slice();
                write_tone(slice, tone_phase);
                data.chunk.offset = 0;
                data.chunk.stride = 4;
                data.chunk.size = slice.len() as u32;
            }
        }
    }

    match core.queue_pool_buffer(source_port, buffer_id) {
        Ok(()) => ProcessStatus::Completed,
        Err(err) => {
            tracing::warn!(%err, "failed to publish demo tone buffer");
            ProcessStatus::Xrun
        }
    }
}

fn handle_command(core: &mut Core, command: Command) {
    match command {
        Command::ListNodes(reply) => {
            let nodes = core
                .graph()
                .nodes()
                .map(|(id, node)| NodeSummary {
                    id,
                    name: node.name.clone(),
                    state: format!("{:?}", node.state()),
                })
                .collect();
            let _ = reply.send(nodes);
        }
        Command::CreatePlaybackStream(reply) => {
            let result = (|| {
                let stream_id = core.create_stream(Direction::Output);
                core.stream(stream_id)
                    .connect(Direction::Output, None, StreamConnectFlags::RT_PROCESS)?;
                Ok(stream_id.index())
            })();
            let _ = reply.send(result);
        }
        Command::TriggerCycle(reply) => {
            let _ = reply.send(core.run_cycle());
        }
    }
}

/// Spawn the realtime data loop thread and return a [`Handle`] to it.
pub fn spawn(config: Config) -> io::Result<Handle> {
    let (tx, rx): (Sender<Command>, Receiver<Command>) = channel();
    let wakeup = Arc::new(EventFd::new(0)?);
    let wakeup_for_loop = wakeup.clone();

    std::thread::Builder::new()
        .name("mediagraphd-rt".into())
        .spawn(move || {
            if let Err(err) = run(config, rx, wakeup_for_loop) {
                tracing::error!(%err, "data loop exited with an error");
            }
        })?;

    Ok(Handle { tx, wakeup })
}

fn run(config: Config, rx: Receiver<Command>, wakeup: Arc<EventFd>) -> Result<()> {
    let mut core = Core::new(config);
    seed_demo_graph(&mut core)?;

    let state = Rc::new(RefCell::new(core));
    let mut event_loop = EventLoop::new()?;

    let dispatch_state = state.clone();
    event_loop.add_io(wakeup.as_raw_fd(), Interest::READ, move |_| {
        let _ = wakeup.read();

        while let Ok(command) = rx.try_recv() {
            let mut core = dispatch_state.borrow_mut();
            handle_command(&mut core, command);
        }
    })?;

    let cycle_state = state.clone();
    event_loop.add_timer(CYCLE_INTERVAL, Some(CYCLE_INTERVAL), move || {
        let mut core = cycle_state.borrow_mut();

        if let Err(err) = core.run_cycle() {
            tracing::trace!(%err, "cycle skipped");
        }
    })?;

    // Idle-suspend sweep (spec.md §4.7): polled on its own cadence rather
    // than folded into the cycle timer above, since a node can go idle
    // without a cycle ever running again to notice.
    let idle_sweep_interval = Duration::from_secs(1);
    let idle_state = state.clone();
    event_loop.add_timer(idle_sweep_interval, Some(idle_sweep_interval), move || {
        let mut core = idle_state.borrow_mut();

        for node_id in core.sweep_idle_timeouts(std::time::Instant::now()) {
            tracing::info!(node_id, "idle-suspended node");
        }
    })?;

    tracing::info!("data loop started");

    loop {
        event_loop.iterate(Some(Duration::from_millis(100)))?;
    }
}
