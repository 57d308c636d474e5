//! The shared fallback worker pool.
//!
//! Continuations that can no longer run on a pumping thread (orphaned
//! background work, items scheduled through a stale dispatcher handle)
//! are submitted here so they still eventually execute. Work spawned
//! with no dispatcher installed on the calling thread lands here too.
//!
//! The pool is started lazily on first use and lives for the rest of
//! the process. It makes no ordering guarantee beyond taking items from
//! its queue in submission order; with several workers, execution may
//! overlap.

mod queue;
mod worker;

use crate::bridge::dispatcher::Dispatcher;
use crate::bridge::task::Continuation;
use crate::pool::queue::SharedQueue;
use crate::pool::worker::Worker;

use log::trace;
use std::sync::{Arc, OnceLock};
use std::thread;

/// The process-wide pool instance.
static SHARED: OnceLock<Arc<Pool>> = OnceLock::new();

/// Returns the shared pool, starting it on first use.
///
/// The worker count is fixed at startup to the number of available
/// logical CPUs, falling back to `1` if unavailable.
pub(crate) fn shared() -> Arc<Pool> {
    SHARED
        .get_or_init(|| {
            let threads = thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);

            Arc::new(Pool::start(threads))
        })
        .clone()
}

/// The shared worker pool.
///
/// Owns the submission queue; the worker threads it spawns are detached
/// and run for the rest of the process, so no join handles are kept.
pub(crate) struct Pool {
    /// Submission queue shared by all workers.
    queue: Arc<SharedQueue>,
}

impl Pool {
    /// Starts a pool with the given number of worker threads.
    fn start(threads: usize) -> Self {
        let queue = Arc::new(SharedQueue::new());

        for _ in 0..threads {
            let worker = Worker::new(queue.clone());

            thread::spawn(move || {
                worker.run();
            });
        }

        trace!("shared pool started with {threads} worker(s)");

        Self { queue }
    }
}

impl Dispatcher for Pool {
    /// Submits a continuation to the pool.
    ///
    /// The pool accepts work unconditionally; submission never fails.
    fn schedule(&self, work: Arc<dyn Continuation>) {
        self.queue.push(work);
    }
}
