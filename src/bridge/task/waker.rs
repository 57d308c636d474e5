use crate::bridge::task::Operation;

use std::mem;
use std::sync::Arc;
use std::task::{RawWaker, RawWakerVTable, Waker};

/// Returns the `RawWakerVTable` for an operation producing `T`.
///
/// The vtable defines how the bridge interacts with the operation when
/// the waker is cloned, woken, woken by reference, or dropped.
///
/// # Safety
///
/// All functions in the vtable must uphold the invariants required by
/// [`RawWaker`], in particular:
/// - reference counts must be correctly managed,
/// - the operation must remain valid for the lifetime of the waker.
fn vtable<T: Send + 'static>() -> &'static RawWakerVTable {
    &RawWakerVTable::new(
        clone_raw::<T>,
        wake_raw::<T>,
        wake_by_ref_raw::<T>,
        drop_raw::<T>,
    )
}

/// Creates a [`Waker`] tied to an operation.
///
/// Waking schedules the operation as a continuation on the dispatcher it
/// was started under.
///
/// # Safety
///
/// The pointer stored inside the `RawWaker` originates from
/// `Arc::into_raw` and follows proper reference counting semantics
/// through the vtable functions below.
pub(crate) fn operation_waker<T: Send + 'static>(operation: Arc<Operation<T>>) -> Waker {
    unsafe {
        Waker::from_raw(RawWaker::new(
            Arc::into_raw(operation) as *const (),
            vtable::<T>(),
        ))
    }
}

/// Clones the raw waker.
///
/// Increments the reference count of the underlying `Arc<Operation<T>>`
/// and returns a new `RawWaker` pointing to the same operation.
fn clone_raw<T: Send + 'static>(ptr: *const ()) -> RawWaker {
    let arc = unsafe { Arc::<Operation<T>>::from_raw(ptr as *const Operation<T>) };
    let cloned = arc.clone();
    mem::forget(arc);

    RawWaker::new(Arc::into_raw(cloned) as *const (), vtable::<T>())
}

/// Wakes the operation and consumes the waker.
///
/// Transfers ownership of the `Arc<Operation<T>>` and calls
/// [`Operation::wake`], potentially queuing a re-poll.
fn wake_raw<T: Send + 'static>(ptr: *const ()) {
    let arc = unsafe { Arc::<Operation<T>>::from_raw(ptr as *const Operation<T>) };
    arc.wake();
}

/// Wakes the operation without consuming the waker.
///
/// The underlying `Arc<Operation<T>>` is cloned to preserve the original
/// reference count.
fn wake_by_ref_raw<T: Send + 'static>(ptr: *const ()) {
    let arc = unsafe { Arc::<Operation<T>>::from_raw(ptr as *const Operation<T>) };
    arc.clone().wake();
    mem::forget(arc);
}

/// Drops the raw waker.
///
/// Decrements the reference count of the underlying `Arc<Operation<T>>`.
fn drop_raw<T: Send + 'static>(ptr: *const ()) {
    unsafe { Arc::<Operation<T>>::from_raw(ptr as *const Operation<T>) };
}
