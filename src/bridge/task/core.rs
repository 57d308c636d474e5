use super::state::{COMPLETE, IDLE, NOTIFIED, POLLING, SCHEDULED};
use super::JoinHandle;
use crate::bridge::context;
use crate::bridge::dispatcher::Dispatcher;
use crate::bridge::task::waker::operation_waker;
use crate::pool;

use std::cell::UnsafeCell;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// A unit of work that can be resumed by a dispatcher.
///
/// The `Continuation` trait abstracts over what a queued item does when
/// its turn comes, letting the pump and the pool manage a heterogeneous
/// queue through `Arc<dyn Continuation>`: re-polls of suspended
/// operations, plain callbacks, and synchronous dispatch signals.
pub(crate) trait Continuation: Send + Sync {
    /// Runs the continuation. Called by whichever dispatcher it was
    /// queued on when the item reaches the front of the queue.
    fn resume(self: Arc<Self>);
}

/// A deferred operation driven by the bridge.
///
/// An `Operation` is the container for a `Future`. It coordinates the
/// future's lifecycle: its execution state, re-scheduling on wake-ups,
/// result storage, and the completion callback the pump uses to learn
/// that the originating operation has finished.
pub(crate) struct Operation<T> {
    /// The underlying future.
    ///
    /// Wrapped in `UnsafeCell` for interior mutability during polls, and
    /// `Pin<Box<...>>` so the future stays pinned in memory.
    future: UnsafeCell<Pin<Box<dyn Future<Output = T> + Send>>>,

    /// Storage for the value produced by the future upon completion.
    pub(crate) result: UnsafeCell<Option<T>>,

    /// The current lifecycle state (IDLE, POLLING, etc.).
    pub(crate) state: AtomicUsize,

    /// The dispatcher re-polls are scheduled onto.
    ///
    /// For the originating operation of a blocking call this is the
    /// pump; for background work it is whichever dispatcher was current
    /// at spawn time. A closed pump redirects, so scheduling onto it
    /// stays valid for the whole life of the operation.
    scheduler: Arc<dyn Dispatcher>,

    /// Wakers of `JoinHandle`s awaiting this operation.
    pub(crate) waiters: Mutex<Vec<Waker>>,

    /// Invoked inline, at most once, at the moment of completion.
    ///
    /// Runs at the completion site itself without touching the ambient
    /// dispatcher slot; the pump registers its shutdown sentinel here.
    on_complete: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

unsafe impl<T: Send> Send for Operation<T> {}
unsafe impl<T: Send> Sync for Operation<T> {}

impl<T: Send + 'static> Operation<T> {
    /// Creates a new operation from a future.
    ///
    /// The operation starts in the `SCHEDULED` state: the caller either
    /// resumes it directly (the blocking call's first poll) or queues it
    /// onto the dispatcher it was created under.
    pub(crate) fn new<F>(future: F, scheduler: Arc<dyn Dispatcher>) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            future: UnsafeCell::new(Box::pin(future)),
            result: UnsafeCell::new(None),
            state: AtomicUsize::new(SCHEDULED),
            scheduler,
            waiters: Mutex::new(Vec::new()),
            on_complete: Mutex::new(None),
        }
    }

    /// Whether the operation has run to completion.
    pub(crate) fn is_complete(&self) -> bool {
        self.state.load(Ordering::Acquire) == COMPLETE
    }

    /// Registers the callback invoked at the moment of completion.
    ///
    /// Must be registered while the operation is still pending and
    /// before it can be resumed by another party; the blocking call does
    /// so after the first poll and before entering the pump loop, while
    /// every later poll can only happen on the pump thread itself.
    pub(crate) fn set_on_complete<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        *self.on_complete.lock().unwrap() = Some(Box::new(callback));
    }

    /// Takes the completed operation's result.
    ///
    /// # Panics
    ///
    /// Panics if the operation has not completed or the result was
    /// already taken.
    pub(crate) fn take_result(&self) -> T {
        assert!(self.is_complete(), "operation still pending");

        unsafe { (*self.result.get()).take() }.expect("result already taken")
    }

    /// Polls the operation once.
    ///
    /// Transitions the operation to `POLLING`, polls the inner future,
    /// and handles the resulting state:
    /// - `Poll::Pending`: back to `IDLE`, or rescheduled if a wake-up
    ///   arrived during the poll (`NOTIFIED`).
    /// - `Poll::Ready`: stores the result, wakes `JoinHandle` waiters,
    ///   and invokes the completion callback inline.
    pub(crate) fn resume(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        // Only a queued or freshly notified operation may be polled.
        if current != SCHEDULED && current != NOTIFIED {
            return;
        }

        // Transition to POLLING. This ensures exclusive access to the UnsafeCell.
        if self
            .state
            .compare_exchange(current, POLLING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        let waker = operation_waker(self.clone());
        let mut cx = Context::from_waker(&waker);

        // Safety: the POLLING state guarantees no other thread is polling this future.
        let poll = unsafe { (&mut *self.future.get()).as_mut().poll(&mut cx) };

        match poll {
            Poll::Pending => {
                if self
                    .state
                    .compare_exchange(POLLING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while polling; queue the re-poll so the wake-up is not lost.
                    self.state.store(SCHEDULED, Ordering::Release);
                    self.scheduler.schedule(self.clone());
                }
            }
            Poll::Ready(value) => {
                unsafe {
                    *self.result.get() = Some(value);
                }
                self.state.store(COMPLETE, Ordering::Release);

                let waiters = self.waiters.lock().unwrap();
                for waiter in waiters.iter() {
                    waiter.wake_by_ref();
                }
                drop(waiters);

                if let Some(callback) = self.on_complete.lock().unwrap().take() {
                    callback();
                }
            }
        }
    }

    /// Signals the operation to be re-polled.
    ///
    /// If the operation is `IDLE`, it moves to `SCHEDULED` and is queued
    /// onto its dispatcher. If it is `POLLING`, it moves to `NOTIFIED`
    /// so the poll in progress reschedules it on return.
    pub(crate) fn wake(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, SCHEDULED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.scheduler.schedule(self.clone());
                        return;
                    }
                }
                POLLING => {
                    if self
                        .state
                        .compare_exchange(POLLING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                // Already queued, notified, or finished; nothing to do.
                SCHEDULED | NOTIFIED | COMPLETE => return,
                _ => return,
            }
        }
    }
}

impl<T: Send + 'static> Continuation for Operation<T> {
    fn resume(self: Arc<Self>) {
        Operation::resume(self)
    }
}

/// Spawns a future as background work.
///
/// The future is scheduled onto the current dispatcher: while a blocking
/// call is pumping on this thread, the work runs there, serialized with
/// the call's other continuations. With no dispatcher installed it is
/// submitted to the shared worker pool instead.
///
/// The returned [`JoinHandle`] resolves to the future's output. Dropping
/// the handle does not stop the work; work that is never awaited keeps
/// running and, if the blocking call finishes first, is handed off to an
/// outer dispatcher or the pool.
pub fn spawn<F, T>(future: F) -> JoinHandle<T>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    let scheduler: Arc<dyn Dispatcher> = match context::current() {
        Some(dispatcher) => dispatcher,
        None => pool::shared(),
    };

    let operation = Arc::new(Operation::new(future, scheduler.clone()));
    scheduler.schedule(operation.clone());

    JoinHandle { operation }
}
