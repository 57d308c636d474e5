use super::state::COMPLETE;
use super::Operation;

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::task::{Context, Poll};

/// A handle to spawned background work.
///
/// A `JoinHandle` allows awaiting the result of work started with
/// [`spawn`](super::spawn). It implements [`Future`] and resolves once
/// the underlying operation has completed.
///
/// Dropping the `JoinHandle` does **not** stop the work; it only
/// discards the ability to observe its result.
pub struct JoinHandle<T> {
    /// Shared reference to the underlying operation.
    pub(crate) operation: Arc<Operation<T>>,
}

impl<T> Future for JoinHandle<T> {
    /// The output of the spawned work.
    type Output = T;

    /// Polls the join handle.
    ///
    /// If the operation has already completed, its result is returned
    /// immediately. Otherwise the current waker is registered and the
    /// future returns `Poll::Pending`.
    ///
    /// The state is re-checked **after** registering the waker to avoid
    /// missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        if self.operation.state.load(Ordering::Acquire) == COMPLETE {
            let value = unsafe {
                (*self.operation.result.get())
                    .take()
                    .expect("result already taken")
            };
            return Poll::Ready(value);
        }

        self.operation
            .waiters
            .lock()
            .unwrap()
            .push(cx.waker().clone());

        if self.operation.state.load(Ordering::Acquire) == COMPLETE {
            let value = unsafe {
                (*self.operation.result.get())
                    .take()
                    .expect("result already taken")
            };

            return Poll::Ready(value);
        }

        Poll::Pending
    }
}
