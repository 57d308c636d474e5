use crate::bridge::context;
use crate::bridge::task::Continuation;
use crate::error::DispatchError;

use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, ThreadId};

/// A destination for scheduled continuations.
///
/// The `Dispatcher` trait is the seam between the code that schedules
/// work (wakers, `spawn`, dispatcher handles) and the code that runs it
/// (the pump loop on a blocking thread, or the shared worker pool).
pub(crate) trait Dispatcher: Send + Sync {
    /// Queues a continuation for later execution.
    ///
    /// Scheduling must always succeed from the caller's point of view:
    /// implementations that can no longer run work themselves hand the
    /// continuation to another dispatcher instead of failing.
    fn schedule(&self, work: Arc<dyn Continuation>);

    /// The thread this dispatcher drains on, when it is bound to one.
    ///
    /// Used to reject synchronous dispatch from the draining thread
    /// itself, which could never complete.
    fn owner(&self) -> Option<ThreadId> {
        None
    }
}

/// Returns a handle to the dispatcher currently installed on this
/// thread, if a blocking call is pumping here.
pub fn current() -> Option<DispatcherHandle> {
    context::current().map(|inner| DispatcherHandle { inner })
}

/// A shareable handle to a dispatcher.
///
/// The handle stays valid after the blocking call that created the
/// dispatcher has returned: work scheduled through a stale handle is
/// redirected to an outer dispatcher or to the shared worker pool, so
/// it still eventually runs.
#[derive(Clone)]
pub struct DispatcherHandle {
    /// The dispatcher this handle schedules onto.
    inner: Arc<dyn Dispatcher>,
}

impl DispatcherHandle {
    /// Schedules a callback to run on this dispatcher.
    ///
    /// The callback is queued behind previously scheduled work and runs
    /// on the dispatcher's thread in submission order. It never runs
    /// synchronously inside this call.
    pub fn schedule<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.schedule(Arc::new(Callback::new(callback)));
    }

    /// Schedules a callback and blocks until it has run.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::ReentrantDispatch`] when the target
    /// dispatcher is draining on the calling thread: the thread cannot
    /// both wait for the callback and be the one to run it. The error is
    /// reported immediately, before anything is queued.
    pub fn dispatch_sync<F>(&self, callback: F) -> Result<(), DispatchError>
    where
        F: FnOnce() + Send + 'static,
    {
        if self.inner.owner() == Some(thread::current().id()) {
            return Err(DispatchError::ReentrantDispatch);
        }

        let signal = Arc::new(SyncSignal::new(callback));
        self.inner.schedule(signal.clone());
        signal.wait();

        Ok(())
    }
}

/// A queued closure.
struct Callback {
    /// Taken on resume; a callback runs at most once.
    callback: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Callback {
    fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
        }
    }
}

impl Continuation for Callback {
    fn resume(self: Arc<Self>) {
        if let Some(callback) = self.callback.lock().unwrap().take() {
            callback();
        }
    }
}

/// A queued closure paired with a completion signal.
///
/// Used by [`DispatcherHandle::dispatch_sync`]: the scheduling thread
/// blocks on [`SyncSignal::wait`] until whichever dispatcher ends up
/// running the continuation has invoked the callback.
struct SyncSignal {
    /// Taken on resume; runs at most once.
    callback: Mutex<Option<Box<dyn FnOnce() + Send>>>,

    /// Whether the callback has run.
    done: Mutex<bool>,

    /// Wakes the waiting thread once the callback has run.
    condvar: Condvar,
}

impl SyncSignal {
    fn new<F>(callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            callback: Mutex::new(Some(Box::new(callback))),
            done: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Blocks until the callback has run.
    fn wait(&self) {
        let mut done = self.done.lock().unwrap();

        while !*done {
            done = self.condvar.wait(done).unwrap();
        }
    }
}

impl Continuation for SyncSignal {
    fn resume(self: Arc<Self>) {
        if let Some(callback) = self.callback.lock().unwrap().take() {
            callback();
        }

        *self.done.lock().unwrap() = true;
        self.condvar.notify_all();
    }
}
