//! An async work queue: a FIFO of pending completions keyed by
//! `(object, sequence)`, ported from `pipewire/server/work-queue.c`.
//!
//! Work items are added as a request is sent out (e.g. "port format applied,
//! waiting for the peer to ack sequence 4") and completed out of band when
//! the result comes back. A queued item can be ready for three different
//! reasons (spec.md §4.4): fired immediately, unblocked by a matching
//! `complete(object, seq, res)`, or — the original's `SPA_RESULT_WAIT_SYNC`
//! branch — simply waiting for every item ahead of it to clear, independent
//! of any sequence number. That last kind is the only one gated on queue
//! position; the other two dispatch as soon as they're ready even if an
//! older item is still outstanding ahead of them, matching
//! `process_work_queue`'s single forward pass over the whole list.

use std::collections::VecDeque;

use slab::Slab;

/// Identifies a queued item, returned by [`WorkQueue::add`] and accepted by
/// [`WorkQueue::cancel`] to target one item rather than every item for an
/// object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorkId(usize);

/// How a queued item becomes ready to dispatch, per spec.md §4.4's work
/// item invariant ("items with `sequence = Invalid` are ready to fire
/// immediately; items with `result = Busy` may only fire when they are at
/// the head of the list").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkResult {
    /// Ready immediately; dispatched on the next drain with this result
    /// code.
    Ready(i32),
    /// Waits until a matching `complete(object, seq, res)` call.
    Async(u32),
    /// Waits until this item reaches the head of the queue, independent of
    /// any sequence (`pw_work_queue_add`'s `SPA_RESULT_WAIT_SYNC` branch).
    Busy,
}

#[derive(Debug)]
struct Item<F> {
    object: u32,
    /// `Some(seq)` while waiting on [`WorkQueue::complete`]; cleared (by a
    /// completion, or by [`WorkQueue::cancel`] forcing the slot ready) once
    /// the item no longer depends on an external sequence.
    waiting: Option<u32>,
    busy: bool,
    res: i32,
    callback: Option<F>,
}

/// A FIFO work queue keyed by `(object, sequence)`.
///
/// `F` is the completion callback, invoked with the result code handed to
/// [`WorkQueue::complete`] (or the `Ready` result code the item was added
/// with).
#[derive(Debug)]
pub struct WorkQueue<F> {
    items: Slab<Item<F>>,
    order: VecDeque<usize>,
}

impl<F> WorkQueue<F>
where
    F: FnOnce(u32, i32),
{
    pub fn new() -> Self {
        Self {
            items: Slab::new(),
            order: VecDeque::new(),
        }
    }

    /// Queue a callback for `object`, readied per `result` (see
    /// [`WorkResult`]). Items that aren't waiting on an async sequence are
    /// dispatched immediately if eligible, same as the original signalling
    /// its wakeup event for every `add` except a deferred async one.
    pub fn add(&mut self, object: u32, result: WorkResult, callback: F) -> WorkId {
        let (waiting, busy, res) = match result {
            WorkResult::Ready(res) => (None, false, res),
            WorkResult::Async(seq) => (Some(seq), false, 0),
            WorkResult::Busy => (None, true, 0),
        };

        let key = self.items.insert(Item {
            object,
            waiting,
            busy,
            res,
            callback: Some(callback),
        });
        self.order.push_back(key);

        tracing::trace!(object, ?result, "queued work item");

        if !matches!(result, WorkResult::Async(_)) {
            self.dispatch();
        }

        WorkId(key)
    }

    /// Resolve the item waiting on `(object, seq)`, then dispatch whatever
    /// is now eligible. Unlike [`Self::cancel`], a completion only clears
    /// the *sequence* wait on a matching item — `busy` items still have to
    /// reach the head of the queue afterward.
    pub fn complete(&mut self, object: u32, seq: u32, res: i32) {
        let Some(&key) = self
            .order
            .iter()
            .find(|&&key| self.items[key].object == object && self.items[key].waiting == Some(seq))
        else {
            tracing::warn!(object, seq, "completed unknown work item");
            return;
        };

        let item = &mut self.items[key];
        item.waiting = None;
        item.res = res;

        self.dispatch();
    }

    /// Cancel work for `object`: null out the matching item(s)' callback
    /// so nothing runs, but leave the slot(s) in the queue to be dispatched
    /// in their normal FIFO order (spec.md §4.4/§5: "becomes a no-op but
    /// the slot is still dispatched"), the same as `pw_work_queue_cancel`
    /// clearing `func` without removing the list entry. Also clears any
    /// pending sequence wait, since the original forces `item->seq =
    /// SPA_ID_INVALID` at the same time — a cancelled item no longer has
    /// anything to wait for.
    ///
    /// `id` narrows the cancellation to one item (as returned by
    /// [`Self::add`]); `None` cancels every outstanding item for `object`.
    pub fn cancel(&mut self, object: u32, id: Option<WorkId>) {
        let mut touched = false;

        for &key in &self.order {
            let item = &mut self.items[key];
            let matches_id = match id {
                Some(WorkId(target)) => target == key,
                None => true,
            };

            if item.object == object && matches_id && item.callback.is_some() {
                item.callback = None;
                item.waiting = None;
                touched = true;
            }
        }

        if touched {
            self.dispatch();
        }
    }

    /// Number of items still queued (dispatched entries are removed
    /// outright, so this only ever counts outstanding work).
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// One forward pass over the queue, mirroring `process_work_queue`:
    /// an item still waiting on a sequence is left in place; a `busy` item
    /// only fires once it is the literal front of `order` (so it stays
    /// blocked behind any earlier item, dispatched or not); everything
    /// else fires as soon as it's visited, regardless of position, letting
    /// a ready item dispatch ahead of an older item still waiting on its
    /// own sequence.
    fn dispatch(&mut self) {
        let snapshot: Vec<usize> = self.order.iter().copied().collect();

        for key in snapshot {
            if !self.items.contains(key) {
                continue; // already dispatched earlier in this pass
            }

            let ready = {
                let item = &self.items[key];
                item.waiting.is_none() && (!item.busy || self.order.front() == Some(&key))
            };

            if !ready {
                continue;
            }

            self.order.retain(|&k| k != key);
            let mut item = self.items.remove(key);

            if let Some(callback) = item.callback.take() {
                callback(item.object, item.res);
            }
        }
    }
}

impl<F> Default for WorkQueue<F>
where
    F: FnOnce(u32, i32),
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn async_items_complete_out_of_insertion_order() {
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();

        let l = log.clone();
        queue.add(1, WorkResult::Async(10), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        let l = log.clone();
        queue.add(2, WorkResult::Async(20), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        queue.complete(2, 20, 0);
        queue.complete(1, 10, -1);

        assert_eq!(*log.borrow(), vec![(2, 0), (1, -1)]);
        assert!(queue.is_empty());
    }

    #[test]
    fn ready_result_completes_immediately() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();

        let l = log.clone();
        queue.add(5, WorkResult::Ready(0), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        assert_eq!(*log.borrow(), vec![(5, 0)]);
        assert!(queue.is_empty());
    }

    /// spec.md §8 (S5): a later `Ready` item fires immediately even though
    /// an older item ahead of it is still waiting on its own sequence.
    #[test]
    fn ready_item_fires_even_behind_a_pending_async_item() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();

        let l = log.clone();
        queue.add(1, WorkResult::Async(7), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        let l = log.clone();
        queue.add(1, WorkResult::Ready(0), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        assert_eq!(*log.borrow(), vec![(1, 0)]);

        queue.complete(1, 7, -1);
        assert_eq!(*log.borrow(), vec![(1, 0), (1, -1)]);
    }

    /// A `Busy` item, unlike `Ready`, has to wait for every item ahead of
    /// it to clear first, even though it isn't itself waiting on a
    /// sequence.
    #[test]
    fn busy_item_only_fires_once_it_is_the_head() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();

        let l = log.clone();
        queue.add(1, WorkResult::Async(7), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        let l = log.clone();
        queue.add(1, WorkResult::Busy, Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        assert!(log.borrow().is_empty());

        queue.complete(1, 7, 0);
        assert_eq!(*log.borrow(), vec![(1, 0), (1, 0)]);
    }

    #[test]
    fn cancel_without_an_id_clears_every_item_for_the_object() {
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();
        queue.add(1, WorkResult::Async(1), Box::new(|_, _| {}));
        queue.add(1, WorkResult::Async(2), Box::new(|_, _| {}));
        queue.add(2, WorkResult::Async(1), Box::new(|_, _| {}));

        queue.cancel(1, None);
        assert_eq!(queue.len(), 1);
    }

    /// spec.md §4.4/§5: cancelling becomes a no-op, but the slot still
    /// drains on its own turn rather than being ripped out of the queue.
    #[test]
    fn cancel_nulls_the_callback_but_the_slot_still_drains() {
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();
        let ran = Rc::new(RefCell::new(false));

        let r = ran.clone();
        let id = queue.add(1, WorkResult::Async(9), Box::new(move |_, _| *r.borrow_mut() = true));

        queue.cancel(1, Some(id));

        assert!(!*ran.borrow());
        assert!(queue.is_empty());
    }

    /// Cancelling one id leaves the object's other outstanding items alone.
    #[test]
    fn cancel_with_an_id_only_touches_that_item() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue: WorkQueue<Box<dyn FnOnce(u32, i32)>> = WorkQueue::new();

        let l = log.clone();
        let cancelled = queue.add(1, WorkResult::Async(1), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        let l = log.clone();
        queue.add(1, WorkResult::Async(2), Box::new(move |obj, res| l.borrow_mut().push((obj, res))));

        queue.cancel(1, Some(cancelled));
        queue.complete(1, 2, 0);

        assert_eq!(*log.borrow(), vec![(1, 0)]);
        assert!(queue.is_empty());
    }
}
