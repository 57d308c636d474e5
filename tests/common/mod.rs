#![allow(dead_code)]

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::{Duration, Instant};

/// A future that completes after `duration`, woken from a timer thread.
///
/// The timer thread is started on first poll, so the wake-up always
/// crosses threads and exercises the marshaling path.
pub struct Delay {
    shared: Arc<Mutex<DelayState>>,
    duration: Duration,
    started: bool,
}

struct DelayState {
    elapsed: bool,
    waker: Option<Waker>,
}

/// Completes after `duration` on a dedicated timer thread.
pub fn delay(duration: Duration) -> Delay {
    Delay {
        shared: Arc::new(Mutex::new(DelayState {
            elapsed: false,
            waker: None,
        })),
        duration,
        started: false,
    }
}

impl Future for Delay {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();

        let mut state = this.shared.lock().unwrap();

        if state.elapsed {
            return Poll::Ready(());
        }

        state.waker = Some(cx.waker().clone());
        drop(state);

        if !this.started {
            this.started = true;

            let shared = this.shared.clone();
            let duration = this.duration;

            thread::spawn(move || {
                thread::sleep(duration);

                let mut state = shared.lock().unwrap();
                state.elapsed = true;
                let waker = state.waker.take();
                drop(state);

                if let Some(waker) = waker {
                    waker.wake();
                }
            });
        }

        Poll::Pending
    }
}

/// A future completed externally through its [`TriggerHandle`].
pub struct Trigger {
    shared: Arc<Mutex<TriggerState>>,
}

/// Completes the paired [`Trigger`] from any thread.
pub struct TriggerHandle {
    shared: Arc<Mutex<TriggerState>>,
}

struct TriggerState {
    set: bool,
    waker: Option<Waker>,
}

/// Creates a future/handle pair; the future completes once the handle
/// is set.
pub fn trigger() -> (Trigger, TriggerHandle) {
    let shared = Arc::new(Mutex::new(TriggerState {
        set: false,
        waker: None,
    }));

    (
        Trigger {
            shared: shared.clone(),
        },
        TriggerHandle { shared },
    )
}

impl TriggerHandle {
    pub fn set(&self) {
        let mut state = self.shared.lock().unwrap();
        state.set = true;
        let waker = state.waker.take();
        drop(state);

        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl Future for Trigger {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut state = self.shared.lock().unwrap();

        if state.set {
            return Poll::Ready(());
        }

        state.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}

/// Polls `condition` until it holds, panicking after `timeout`.
pub fn wait_until(mut condition: impl FnMut() -> bool, timeout: Duration) {
    let deadline = Instant::now() + timeout;

    while !condition() {
        assert!(Instant::now() < deadline, "condition not met in time");
        thread::sleep(Duration::from_millis(5));
    }
}
