use crate::bridge::context;
use crate::bridge::pump::Pump;
use crate::bridge::task::Operation;

use log::trace;
use std::future::Future;
use std::sync::Arc;

/// Runs a future to completion, blocking the current thread.
///
/// The future is started on the calling thread, and every continuation
/// it schedules (its own re-polls and any background work spawned while
/// it runs) is serialized onto that same thread, in submission order,
/// until the future finishes. No worker thread is needed to drive the
/// call, only to pick up work the future left behind.
///
/// While the call is pumping, it is the thread's current dispatcher:
/// [`spawn`](crate::task::spawn) routes here and
/// [`current`](crate::current) returns a handle to it. Calls may nest; a
/// `block_on` inside a continuation pumps its own queue and hands any
/// overflow back to the enclosing call.
///
/// Background work the future never waited on is redirected to the
/// enclosing call or the shared worker pool when this call returns.
///
/// # Panics
///
/// A panic inside the future propagates to the caller from the poll
/// site. The thread's previous dispatcher is reinstated on every exit
/// path, panics included.
///
/// # Examples
///
/// ```rust,ignore
/// let result = fermata::block_on(async {
///     42
/// });
/// assert_eq!(result, 42);
/// ```
pub fn block_on<F>(future: F) -> F::Output
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let parent = context::current();
    let pump = Arc::new(Pump::new(parent));

    // Restores the previous dispatcher and closes the queue on every
    // exit path, unwinding included. Declared queue-guard first so the
    // dispatcher slot is already restored when leftovers are redirected.
    let _shutdown = PumpGuard(pump.clone());
    let _context = context::enter(pump.clone());

    let operation = Arc::new(Operation::new(future, pump.clone()));

    // Start the operation on the calling thread.
    operation.clone().resume();

    if operation.is_complete() {
        // Finished synchronously: skip the blocking wait and hand any
        // continuations it already scheduled straight to the outside.
        trace!("operation completed on first poll, skipping pump loop");
        pump.shutdown();
    } else {
        // The sentinel is pushed inline at the completion site, after
        // which the loop drains what was already queued and stops.
        let queue = pump.queue();
        operation.set_on_complete(move || queue.complete());

        pump.run();
    }

    operation.take_result()
}

/// Closes the pump when the blocking call exits.
///
/// The happy paths shut the pump down explicitly; this guard covers
/// unwinding out of a continuation mid-drain, so queued work is still
/// redirected rather than lost.
struct PumpGuard(Arc<Pump>);

impl Drop for PumpGuard {
    fn drop(&mut self) {
        self.0.shutdown();
    }
}
