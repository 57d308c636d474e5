use crate::bridge::dispatcher::Dispatcher;
use crate::bridge::queue::WorkQueue;
use crate::bridge::task::Continuation;
use crate::pool;

use log::trace;
use std::sync::Arc;
use std::thread::{self, ThreadId};

/// The captured execution context of one blocking call.
///
/// While installed as the current dispatcher, the pump intercepts every
/// continuation scheduled by the in-flight operation and serializes it
/// onto the calling thread, in submission order, until the operation
/// completes.
///
/// Continuations that arrive after completion, belonging to background
/// work the operation spawned but never waited on, are redirected to the
/// parent dispatcher (the enclosing blocking call, when nested) or to
/// the shared worker pool, so they still eventually run. They are never
/// dropped and never run on the calling thread once it has moved on.
pub(crate) struct Pump {
    /// Continuations waiting their turn on the calling thread.
    queue: Arc<WorkQueue>,

    /// Dispatcher that was current when the blocking call began.
    ///
    /// Used only for redirecting post-completion overflow.
    parent: Option<Arc<dyn Dispatcher>>,

    /// The calling thread, which is the queue's sole consumer.
    owner: ThreadId,
}

impl Pump {
    /// Creates a pump owned by the calling thread.
    pub(crate) fn new(parent: Option<Arc<dyn Dispatcher>>) -> Self {
        Self {
            queue: Arc::new(WorkQueue::new()),
            parent,
            owner: thread::current().id(),
        }
    }

    /// Shared reference to the pump's queue.
    pub(crate) fn queue(&self) -> Arc<WorkQueue> {
        self.queue.clone()
    }

    /// Runs the pump loop on the calling thread.
    ///
    /// Pops one continuation at a time and resumes it, strictly in
    /// enqueue order, until the completion sentinel is observed. Work
    /// queued by continuations themselves lands behind already-queued
    /// work and is drained in turn; the sentinel is only pushed at the
    /// originating operation's own completion, which happens before any
    /// sentinel insertion.
    pub(crate) fn run(&self) {
        while let Some(work) = self.queue.next() {
            work.resume();
        }

        self.shutdown();
    }

    /// Closes the queue and redirects whatever never got to run.
    ///
    /// Safe to call more than once; later calls only pick up stragglers
    /// that slipped in between the sentinel and the close.
    pub(crate) fn shutdown(&self) {
        let leftovers = self.queue.close();

        if !leftovers.is_empty() {
            trace!(
                "pump closing with {} orphaned continuation(s), redirecting",
                leftovers.len()
            );
        }

        for work in leftovers {
            self.redirect(work);
        }
    }

    /// Hands a continuation to the parent dispatcher, or to the shared
    /// worker pool when the blocking call was not nested.
    fn redirect(&self, work: Arc<dyn Continuation>) {
        match &self.parent {
            Some(parent) => parent.schedule(work),
            None => pool::shared().schedule(work),
        }
    }
}

impl Dispatcher for Pump {
    /// Appends a continuation to the pump's queue.
    ///
    /// Once the queue is closed the item is redirected instead; the
    /// scheduling party never observes a failure either way.
    fn schedule(&self, work: Arc<dyn Continuation>) {
        if let Err(work) = self.queue.push(work) {
            self.redirect(work);
        }
    }

    fn owner(&self) -> Option<ThreadId> {
        Some(self.owner)
    }
}
