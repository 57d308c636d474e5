use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A future that yields execution back to the dispatcher exactly once.
struct YieldOnce(bool);

impl Future for YieldOnce {
    type Output = ();

    /// Polls the yield future.
    ///
    /// On the first poll, the operation yields by scheduling itself to
    /// be polled again and returning `Poll::Pending`. On the second
    /// poll, the future completes.
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if !self.0 {
            self.0 = true;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }

        Poll::Ready(())
    }
}

/// Yields execution back to the current dispatcher.
///
/// Under a pumping blocking call, the operation is requeued behind
/// whatever continuations are already waiting, so they all make progress
/// before the current operation continues. The function yields exactly
/// once.
///
/// # Examples
///
/// ```rust,ignore
/// async fn operation() {
///     // Allow already-queued continuations to run
///     fermata::yield_now().await;
/// }
/// ```
pub async fn yield_now() {
    YieldOnce(false).await
}
