use crate::bridge::task::Continuation;

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex};

/// The shared pool's submission queue.
///
/// A blocking multi-producer/multi-consumer queue: producers are
/// whichever threads submit or redirect continuations, consumers are the
/// pool's worker threads. Items are taken in submission order; the queue
/// lives as long as the process and is never closed.
pub(crate) struct SharedQueue {
    /// Pending continuations in submission order.
    queue: Mutex<VecDeque<Arc<dyn Continuation>>>,

    /// Wakes a parked worker when a continuation arrives.
    condvar: Condvar,
}

impl SharedQueue {
    /// Creates an empty queue.
    pub(crate) fn new() -> Self {
        Self {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    /// Appends a continuation and wakes a parked worker.
    pub(crate) fn push(&self, work: Arc<dyn Continuation>) {
        self.queue.lock().unwrap().push_back(work);
        self.condvar.notify_one();
    }

    /// Removes the next continuation, parking until one is available.
    pub(crate) fn take(&self) -> Arc<dyn Continuation> {
        let mut queue = self.queue.lock().unwrap();

        loop {
            if let Some(work) = queue.pop_front() {
                return work;
            }

            queue = self.condvar.wait(queue).unwrap();
        }
    }
}
