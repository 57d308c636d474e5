mod common;

use fermata::DispatchError;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_reentrant_dispatch_is_rejected() {
    fermata::block_on(async {
        let dispatcher = fermata::current().expect("pump installed");

        let outcome = dispatcher.dispatch_sync(|| {});

        assert_eq!(outcome, Err(DispatchError::ReentrantDispatch));
        assert_eq!(
            outcome.unwrap_err().to_string(),
            "synchronous dispatch into the dispatcher running on the current thread"
        );
    });
}

#[test]
fn test_reentrant_dispatch_after_a_suspension_is_rejected() {
    fermata::block_on(async {
        common::delay(Duration::from_millis(10)).await;

        let dispatcher = fermata::current().expect("pump installed");

        assert_eq!(
            dispatcher.dispatch_sync(|| {}),
            Err(DispatchError::ReentrantDispatch)
        );
    });
}

#[test]
fn test_reentrant_dispatch_from_a_continuation_is_rejected() {
    let outcome: Arc<Mutex<Option<Result<(), DispatchError>>>> = Arc::new(Mutex::new(None));
    let recorder = outcome.clone();

    fermata::block_on(async move {
        let dispatcher = fermata::current().expect("pump installed");

        dispatcher.schedule(move || {
            let inner = fermata::current().expect("pump still installed");
            *recorder.lock().unwrap() = Some(inner.dispatch_sync(|| {}));
        });

        common::delay(Duration::from_millis(50)).await;
    });

    assert_eq!(
        *outcome.lock().unwrap(),
        Some(Err(DispatchError::ReentrantDispatch))
    );
}

#[test]
fn test_cross_thread_dispatch_runs_on_the_pump_thread() {
    let caller = thread::current().id();
    let ran_on = Arc::new(Mutex::new(None));
    let recorder = ran_on.clone();

    fermata::block_on(async move {
        let dispatcher = fermata::current().expect("pump installed");
        let (done, done_handle) = common::trigger();

        let worker = thread::spawn(move || {
            let outcome = dispatcher.dispatch_sync(move || {
                *recorder.lock().unwrap() = Some(thread::current().id());
                done_handle.set();
            });

            assert_eq!(outcome, Ok(()));
        });

        // Completes only once the dispatched callback has run, which
        // keeps the pump alive until then.
        done.await;

        worker.join().unwrap();
    });

    assert_eq!(*ran_on.lock().unwrap(), Some(caller));
}
