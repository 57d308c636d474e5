use crate::pool::queue::SharedQueue;

use std::sync::Arc;

/// A worker thread in the shared pool.
///
/// Workers take continuations from the shared queue one at a time and
/// resume them. There is no local queue and no stealing: the pool only
/// picks up work the pumping threads could not run themselves, so a
/// single shared queue is enough.
pub(crate) struct Worker {
    /// Handle to the shared submission queue.
    queue: Arc<SharedQueue>,
}

impl Worker {
    /// Creates a worker draining `queue`.
    pub(crate) fn new(queue: Arc<SharedQueue>) -> Self {
        Self { queue }
    }

    /// Runs the worker loop.
    ///
    /// Parks on the shared queue and resumes continuations as they
    /// arrive. The pool lives as long as the process, so the loop never
    /// exits.
    pub(crate) fn run(&self) {
        loop {
            self.queue.take().resume();
        }
    }
}
