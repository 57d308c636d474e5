use crate::bridge::task::Continuation;

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::{Condvar, Mutex};

/// An entry in the continuation queue.
///
/// Work slots carry continuations scheduled onto the pump. The sentinel
/// slot is pushed exactly once, when the originating operation completes,
/// and marks the point past which queued work no longer runs on the
/// pumping thread.
enum Slot {
    Work(Arc<dyn Continuation>),
    Sentinel,
}

/// The pump's continuation queue.
///
/// A blocking multi-producer/single-consumer queue of continuations.
/// Producers are any threads that schedule work through the captured
/// dispatcher (wakers, dispatcher handles); the sole consumer is the
/// thread running the pump loop.
///
/// Closing is a one-way transition. Once closed, the queue refuses new
/// work by handing it back to the caller, which redirects it externally
/// instead of running it on a thread that has already moved on.
pub(crate) struct WorkQueue {
    /// Ordered slots protected by a mutex.
    inner: Mutex<Inner>,

    /// Wakes the consumer when a slot arrives.
    condvar: Condvar,
}

struct Inner {
    /// Pending slots in submission order.
    slots: VecDeque<Slot>,

    /// Whether the queue has stopped accepting work.
    closed: bool,
}

impl WorkQueue {
    /// Creates an empty, open queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                slots: VecDeque::new(),
                closed: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Appends a continuation to the queue.
    ///
    /// Returns the continuation back to the caller if the queue is
    /// closed. Scheduling must never be observably fatal to the
    /// scheduling party, so the caller is expected to redirect the
    /// returned work rather than drop it.
    pub(crate) fn push(
        &self,
        work: Arc<dyn Continuation>,
    ) -> Result<(), Arc<dyn Continuation>> {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return Err(work);
        }

        inner.slots.push_back(Slot::Work(work));
        drop(inner);

        self.condvar.notify_one();
        Ok(())
    }

    /// Pushes the completion sentinel.
    ///
    /// Work queued ahead of the sentinel still runs on the pumping
    /// thread; work queued behind it is redirected when the sentinel is
    /// observed. Has no effect on a queue that is already closed.
    pub(crate) fn complete(&self) {
        let mut inner = self.inner.lock().unwrap();

        if inner.closed {
            return;
        }

        inner.slots.push_back(Slot::Sentinel);
        drop(inner);

        self.condvar.notify_one();
    }

    /// Removes the next continuation, blocking until one is available.
    ///
    /// Returns `None` once the sentinel is reached (marking the queue
    /// closed) or when the queue was closed while empty.
    pub(crate) fn next(&self) -> Option<Arc<dyn Continuation>> {
        let mut inner = self.inner.lock().unwrap();

        loop {
            if let Some(slot) = inner.slots.pop_front() {
                match slot {
                    Slot::Work(work) => return Some(work),
                    Slot::Sentinel => {
                        inner.closed = true;
                        return None;
                    }
                }
            }

            if inner.closed {
                return None;
            }

            inner = self.condvar.wait(inner).unwrap();
        }
    }

    /// Closes the queue and drains whatever never got to run.
    ///
    /// The returned continuations are the ones that must be redirected
    /// to an outer dispatcher. Closing an already-closed queue returns
    /// any stragglers that slipped in between the sentinel and the
    /// close, which is an empty list in the common case.
    pub(crate) fn close(&self) -> Vec<Arc<dyn Continuation>> {
        let mut inner = self.inner.lock().unwrap();

        inner.closed = true;

        let mut leftovers = Vec::with_capacity(inner.slots.len());
        while let Some(slot) = inner.slots.pop_front() {
            if let Slot::Work(work) = slot {
                leftovers.push(work);
            }
        }

        leftovers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Probe(AtomicUsize);

    impl Continuation for Probe {
        fn resume(self: Arc<Self>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn probe() -> Arc<Probe> {
        Arc::new(Probe(AtomicUsize::new(0)))
    }

    #[test]
    fn drains_in_submission_order() {
        let queue = WorkQueue::new();
        let (a, b) = (probe(), probe());

        assert!(queue.push(a.clone()).is_ok());
        assert!(queue.push(b.clone()).is_ok());

        let first = queue.next().unwrap();
        first.resume();
        assert_eq!(a.0.load(Ordering::SeqCst), 1);
        assert_eq!(b.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn sentinel_splits_the_queue() {
        let queue = WorkQueue::new();
        let (before, after) = (probe(), probe());

        assert!(queue.push(before.clone()).is_ok());
        queue.complete();
        assert!(queue.push(after.clone()).is_ok());

        assert!(queue.next().is_some());
        assert!(queue.next().is_none());

        let leftovers = queue.close();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn push_after_close_returns_the_work() {
        let queue = WorkQueue::new();
        queue.close();

        assert!(queue.push(probe()).is_err());
    }

    #[test]
    fn close_is_idempotent() {
        let queue = WorkQueue::new();
        assert!(queue.push(probe()).is_ok());

        assert_eq!(queue.close().len(), 1);
        assert_eq!(queue.close().len(), 0);
    }
}
