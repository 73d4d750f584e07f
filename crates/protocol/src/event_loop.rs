//! Event loop and sorted timer queue, per spec.md §4.5.
//!
//! Grounded on `pinos/client/loop.h` and the `Poll`/`EventFd`/`TimerFd`
//! primitives above, which already implement the fd-poll, userspace-wakeup
//! and single-timer building blocks spec.md names. What's added here is the
//! queue that multiplexes many logical timers onto the one `TimerFd` a loop
//! may arm at a time: entries are kept sorted by absolute deadline, and the
//! underlying timer is only ever rearmed when the head of the queue changes.

use std::boxed::Box;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::os::fd::{AsRawFd, RawFd};
use std::time::{Duration, Instant};
use std::vec::Vec;

use crate::poll::{Interest, Poll, PollEvent, Token};
use crate::{EventFd, TimerFd};

/// Handle identifying a source registered with an [`EventLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct SourceId(u64);

/// The reserved token used for the loop's single underlying [`TimerFd`].
/// Ordinary sources are identified by their [`SourceId`] instead, so this
/// value is never handed out by [`EventLoop::add_io`]/`add_event`/`add_signal`.
const TIMER_TOKEN: Token = Token::new(u64::MAX);

enum Source {
    Io {
        fd: RawFd,
        callback: Box<dyn FnMut(Interest)>,
    },
    /// Userspace wakeup, counted via the `EventFd`'s 64-bit counter.
    Event {
        fd: EventFd,
        callback: Box<dyn FnMut(u64)>,
    },
    /// Same underlying mechanism as [`Source::Event`]; kept as a distinct
    /// variant so loop diagnostics can tell the two apart.
    Signal {
        fd: EventFd,
        callback: Box<dyn FnMut(u64)>,
    },
}

struct TimerEntry {
    id: SourceId,
    interval: Option<Duration>,
    callback: Box<dyn FnMut()>,
}

/// A single-threaded event loop multiplexing io, userspace-event and timer
/// sources onto one `epoll` instance and one `TimerFd`.
///
/// One loop instance is associated with one thread — the data loop is
/// expected to run on a dedicated realtime thread, per spec.md §4.5; nothing
/// here is `Send`/`Sync`.
pub struct EventLoop {
    poll: Poll,
    sources: HashMap<u64, Source>,
    timers: BTreeMap<(Instant, u64), TimerEntry>,
    timer_fd: TimerFd,
    next_id: u64,
}

impl EventLoop {
    /// Construct a new, empty event loop.
    pub fn new() -> io::Result<Self> {
        let mut poll = Poll::new()?;
        let timer_fd = TimerFd::new()?;
        poll.add(timer_fd.as_raw_fd(), TIMER_TOKEN, Interest::READ)?;

        Ok(Self {
            poll,
            sources: HashMap::new(),
            timers: BTreeMap::new(),
            timer_fd,
            next_id: 0,
        })
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Register interest in a raw file descriptor. The loop does not take
    /// ownership of `fd`; the caller must keep it alive and eventually call
    /// [`Self::destroy_source`].
    pub fn add_io(
        &mut self,
        fd: RawFd,
        interest: Interest,
        callback: impl FnMut(Interest) + 'static,
    ) -> io::Result<SourceId> {
        let id = self.alloc_id();
        self.poll.add(fd, Token::new(id), interest)?;
        self.sources.insert(
            id,
            Source::Io {
                fd,
                callback: Box::new(callback),
            },
        );
        Ok(SourceId(id))
    }

    /// Register a userspace wakeup source backed by an `eventfd`'s unsigned
    /// 64-bit counter. Trigger it from any thread with [`Self::signal_event`].
    pub fn add_event(&mut self, callback: impl FnMut(u64) + 'static) -> io::Result<SourceId> {
        let id = self.alloc_id();
        let fd = EventFd::new(0)?;
        self.poll.add(fd.as_raw_fd(), Token::new(id), Interest::READ)?;
        self.sources.insert(
            id,
            Source::Event {
                fd,
                callback: Box::new(callback),
            },
        );
        Ok(SourceId(id))
    }

    /// Register a signal source. Modeled identically to [`Self::add_event`]
    /// (the loop multiplexes everything over `epoll`, not `signalfd`); the
    /// distinction exists so callers and logs can tell apart "woken by user
    /// code" from "woken by a delivered signal".
    pub fn add_signal(&mut self, callback: impl FnMut(u64) + 'static) -> io::Result<SourceId> {
        let id = self.alloc_id();
        let fd = EventFd::new(0)?;
        self.poll.add(fd.as_raw_fd(), Token::new(id), Interest::READ)?;
        self.sources.insert(
            id,
            Source::Signal {
                fd,
                callback: Box::new(callback),
            },
        );
        Ok(SourceId(id))
    }

    /// Signal an event or signal source, waking the loop if it's blocked in
    /// [`Self::iterate`].
    pub fn signal_event(&mut self, id: SourceId) -> io::Result<()> {
        match self.sources.get_mut(&id.0) {
            Some(Source::Event { fd, .. } | Source::Signal { fd, .. }) => {
                fd.write(1)?;
                Ok(())
            }
            _ => Err(io::Error::new(io::ErrorKind::NotFound, "not an event source")),
        }
    }

    /// Schedule `callback` to run once after `delay`, or repeatedly every
    /// `interval` (`None` for a one-shot timer).
    pub fn add_timer(
        &mut self,
        delay: Duration,
        interval: Option<Duration>,
        callback: impl FnMut() + 'static,
    ) -> io::Result<SourceId> {
        let id = SourceId(self.alloc_id());
        let deadline = Instant::now() + delay;
        let was_head = self.timers.keys().next().copied();

        self.timers.insert(
            (deadline, id.0),
            TimerEntry {
                id,
                interval,
                callback: Box::new(callback),
            },
        );

        if self.timers.keys().next().copied() != was_head {
            self.rearm_timer()?;
        }

        Ok(id)
    }

    /// Remove a previously registered source (io, event, signal or timer).
    pub fn destroy_source(&mut self, id: SourceId) -> io::Result<()> {
        if let Some(source) = self.sources.remove(&id.0) {
            match source {
                Source::Io { fd, .. } => {
                    self.poll.delete(fd, Token::new(id.0), Interest::EMPTY)?;
                }
                Source::Event { fd, .. } | Source::Signal { fd, .. } => {
                    self.poll.delete(fd.as_raw_fd(), Token::new(id.0), Interest::EMPTY)?;
                }
            }
            return Ok(());
        }

        let was_head = self.timers.keys().next().copied();
        self.timers.retain(|_, entry| entry.id != id);

        if self.timers.keys().next().copied() != was_head {
            self.rearm_timer()?;
        }

        Ok(())
    }

    /// Rearm the single underlying `TimerFd` to fire at the current head of
    /// the sorted timer queue, or disarm it if the queue is empty.
    fn rearm_timer(&mut self) -> io::Result<()> {
        let Some(((deadline, _), _)) = self.timers.iter().next() else {
            self.timer_fd.set_timeout(Duration::ZERO)?;
            return Ok(());
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        self.timer_fd.set_timeout(remaining)
    }

    /// Pop and run every timer entry whose deadline has passed, rearming
    /// repeating entries and rearming the underlying timer to the new head.
    fn drain_expired_timers(&mut self) {
        let now = Instant::now();

        loop {
            let Some((&(deadline, seq), _)) = self.timers.iter().next() else {
                break;
            };

            if deadline > now {
                break;
            }

            let Some(mut entry) = self.timers.remove(&(deadline, seq)) else {
                break;
            };

            (entry.callback)();

            if let Some(interval) = entry.interval {
                let next_deadline = Instant::now() + interval;
                self.timers.insert((next_deadline, seq), entry);
            }
        }

        let _ = self.rearm_timer();
    }

    /// Run one pass: block for at most `timeout` (or indefinitely if
    /// `None`), then dispatch every ready io/event/signal/timer source.
    /// Returns the number of sources dispatched.
    pub fn iterate(&mut self, timeout: Option<Duration>) -> io::Result<usize> {
        let timeout_ms = match timeout {
            Some(d) => i32::try_from(d.as_millis()).unwrap_or(i32::MAX),
            None => -1,
        };

        let mut events: Vec<PollEvent> = Vec::with_capacity(8);
        self.poll.poll(&mut events, timeout_ms)?;

        let mut dispatched = 0;

        for event in events {
            if event.token == TIMER_TOKEN {
                // Drain the expiry counter; the actual work happens below.
                let _ = self.timer_fd.read();
                self.drain_expired_timers();
                dispatched += 1;
                continue;
            }

            let id = event.token.value();

            match self.sources.get_mut(&id) {
                Some(Source::Io { callback, .. }) => {
                    callback(event.interest);
                    dispatched += 1;
                }
                Some(Source::Event { fd, callback } | Source::Signal { fd, callback }) => {
                    if let Some(count) = fd.read()? {
                        callback(count);
                        dispatched += 1;
                    }
                }
                None => {}
            }
        }

        Ok(dispatched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn event_source_wakes_and_dispatches() {
        let mut event_loop = EventLoop::new().unwrap();
        let seen = Rc::new(RefCell::new(0u64));
        let seen_cb = seen.clone();

        let id = event_loop
            .add_event(move |count| {
                *seen_cb.borrow_mut() += count;
            })
            .unwrap();

        event_loop.signal_event(id).unwrap();
        let dispatched = event_loop.iterate(Some(Duration::from_millis(100))).unwrap();

        assert_eq!(dispatched, 1);
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn timer_fires_after_delay() {
        let mut event_loop = EventLoop::new().unwrap();
        let fired = Rc::new(RefCell::new(false));
        let fired_cb = fired.clone();

        event_loop
            .add_timer(Duration::from_millis(10), None, move || {
                *fired_cb.borrow_mut() = true;
            })
            .unwrap();

        let mut iterations = 0;

        while !*fired.borrow() && iterations < 20 {
            event_loop.iterate(Some(Duration::from_millis(50))).unwrap();
            iterations += 1;
        }

        assert!(*fired.borrow());
    }

    #[test]
    fn destroying_the_head_timer_rearms_to_the_next_one() {
        let mut event_loop = EventLoop::new().unwrap();
        let order = Rc::new(RefCell::new(Vec::new()));

        let order_a = order.clone();
        let a = event_loop
            .add_timer(Duration::from_millis(5), None, move || {
                order_a.borrow_mut().push("a");
            })
            .unwrap();

        let order_b = order.clone();
        event_loop
            .add_timer(Duration::from_millis(15), None, move || {
                order_b.borrow_mut().push("b");
            })
            .unwrap();

        event_loop.destroy_source(a).unwrap();

        let mut iterations = 0;

        while order.borrow().len() < 1 && iterations < 20 {
            event_loop.iterate(Some(Duration::from_millis(50))).unwrap();
            iterations += 1;
        }

        assert_eq!(*order.borrow(), vec!["b"]);
    }
}
