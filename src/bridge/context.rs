use crate::bridge::dispatcher::Dispatcher;

use std::cell::RefCell;
use std::sync::Arc;

thread_local! {
    /// Thread-local slot holding the current dispatcher.
    ///
    /// This is set while a blocking call is pumping on the thread and
    /// allows scheduling code (wakers, `spawn`, dispatcher handles) to
    /// reach the captured context without explicit parameter passing.
    static CURRENT_DISPATCHER: RefCell<Option<Arc<dyn Dispatcher>>> =
        const { RefCell::new(None) };
}

/// Returns the dispatcher currently installed on this thread, if any.
pub(crate) fn current() -> Option<Arc<dyn Dispatcher>> {
    CURRENT_DISPATCHER.with(|cell| cell.borrow().clone())
}

/// Installs `dispatcher` as the current dispatcher for this thread.
///
/// The previously installed dispatcher (if any) is captured in the
/// returned guard and reinstated when the guard is dropped. Restoration
/// is tied to the guard rather than to a closure so that it also runs
/// when the scope unwinds, keeping the slot consistent for whatever the
/// caller's thread does next.
pub(crate) fn enter(dispatcher: Arc<dyn Dispatcher>) -> ContextGuard {
    let previous = CURRENT_DISPATCHER.with(|cell| cell.replace(Some(dispatcher)));

    ContextGuard { previous }
}

/// Restores the previously installed dispatcher on drop.
pub(crate) struct ContextGuard {
    /// Dispatcher that was current before [`enter`].
    previous: Option<Arc<dyn Dispatcher>>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT_DISPATCHER.with(|cell| cell.replace(previous));
    }
}
