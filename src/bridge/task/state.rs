/// Operation is suspended and not scheduled.
///
/// The future returned `Pending` and is waiting for a waker to fire.
pub(crate) const IDLE: usize = 0;

/// Operation is queued as a continuation.
///
/// A re-poll has been scheduled onto a dispatcher and is waiting its
/// turn in submission order.
pub(crate) const SCHEDULED: usize = 1;

/// Operation is currently being polled.
///
/// At most one thread may observe this state at a time.
pub(crate) const POLLING: usize = 2;

/// Operation has completed.
///
/// The future returned `Ready` and will not be polled again.
pub(crate) const COMPLETE: usize = 3;

/// Operation was woken while being polled.
///
/// The poll in progress must reschedule the operation once it returns,
/// so the wake-up is not lost.
pub(crate) const NOTIFIED: usize = 4;
