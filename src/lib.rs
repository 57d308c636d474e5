//! # Fermata
//!
//! **Fermata** is a synchronous bridge for asynchronous work, designed as
//! the sync-entry layer for the **Nebula** ecosystem.
//!
//! Unlike a general-purpose runtime, Fermata solves one problem: a caller
//! with only a blocking thread must run a future to completion and get
//! its result, without standing up a thread-pool-driven event loop. The
//! calling thread itself becomes the executor for the duration of the
//! call: a captured dispatcher intercepts every continuation the future
//! schedules, and a pump loop drains them one at a time, in submission
//! order, until the future finishes.
//!
//! Fermata is built around three guarantees:
//!
//! - **Strict FIFO** — continuations run in the exact order they were
//!   scheduled, with no concurrency under one blocking call
//! - **Nothing is stranded** — background work the future never awaited
//!   is handed off to the enclosing call or a shared worker pool when
//!   the call returns, never dropped
//! - **No silent deadlock** — synchronous dispatch into the thread's own
//!   pump is rejected with an error instead of hanging
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! fn main() {
//!     let value = fermata::block_on(async {
//!         // Kick off background work; it runs on this same thread,
//!         // interleaved with the continuations below.
//!         let handle = fermata::task::spawn(async { 40 });
//!
//!         handle.await + 2
//!     });
//!
//!     assert_eq!(value, 42);
//! }
//! ```
//!
//! ## Entry points
//!
//! - [`block_on`] — run a future to completion on the calling thread
//! - [`task::spawn`] — schedule background work onto the current
//!   dispatcher
//! - [`current`] — a handle to the dispatcher pumping on this thread
//! - [`yield_now`] — let already-queued continuations run first

mod bridge;
mod error;
mod pool;

pub use bridge::core::block_on;
pub use bridge::dispatcher::{DispatcherHandle, current};
pub use bridge::task;
pub use bridge::yield_now::yield_now;
pub use error::DispatchError;
