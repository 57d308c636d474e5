mod common;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

#[test]
fn test_panic_before_any_suspension_propagates() {
    let result = catch_unwind(AssertUnwindSafe(|| {
        fermata::block_on(async {
            panic!("early failure");
        })
    }));

    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<&str>().copied();
    assert_eq!(message, Some("early failure"));
}

#[test]
fn test_panic_after_a_suspension_propagates() {
    let result = catch_unwind(AssertUnwindSafe(|| {
        fermata::block_on(async {
            common::delay(Duration::from_millis(10)).await;
            panic!("late failure");
        })
    }));

    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<&str>().copied();
    assert_eq!(message, Some("late failure"));
}

#[test]
fn test_dispatcher_slot_restored_after_a_panic() {
    assert!(fermata::current().is_none());

    let result = catch_unwind(AssertUnwindSafe(|| {
        fermata::block_on(async {
            common::delay(Duration::from_millis(10)).await;
            panic!("failure");
        })
    }));

    assert!(result.is_err());
    assert!(fermata::current().is_none());
}

#[test]
fn test_error_values_are_returned_not_raised() {
    let result = fermata::block_on(async {
        common::delay(Duration::from_millis(10)).await;
        Err::<i32, String>(String::from("expected"))
    });

    assert_eq!(result, Err(String::from("expected")));
}
