mod common;

use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};
use std::time::Duration;

#[test]
fn test_nested_blocking_calls_complete() {
    let value = fermata::block_on(async {
        fermata::yield_now().await;

        let inner = fermata::block_on(async {
            common::delay(Duration::from_millis(10)).await;
            7
        });

        inner + 1
    });

    assert_eq!(value, 8);
}

#[test]
fn test_deeply_nested_calls() {
    let value = fermata::block_on(async {
        fermata::block_on(async {
            fermata::block_on(async {
                common::delay(Duration::from_millis(10)).await;
                1
            }) + 1
        }) + 1
    });

    assert_eq!(value, 3);
}

#[test]
fn test_inner_call_restores_the_outer_dispatcher() {
    fermata::block_on(async {
        fermata::block_on(async {});

        assert!(fermata::current().is_some());
    });

    assert!(fermata::current().is_none());
}

#[test]
fn test_inner_overflow_redirects_to_the_outer_call() {
    let caller = thread::current().id();
    let seen: Arc<Mutex<Option<ThreadId>>> = Arc::new(Mutex::new(None));
    let recorder = seen.clone();

    let value = fermata::block_on(async move {
        // The inner call completes on its first poll but leaves a
        // continuation queued; that overflow belongs to the outer call.
        fermata::block_on(async move {
            let dispatcher = fermata::current().expect("inner pump installed");
            dispatcher.schedule(move || {
                *recorder.lock().unwrap() = Some(thread::current().id());
            });
        });

        // Keep the outer call pumping so the redirected continuation
        // runs here rather than on the shared pool.
        common::delay(Duration::from_millis(100)).await;

        5
    });

    assert_eq!(value, 5);
    assert_eq!(*seen.lock().unwrap(), Some(caller));
}
