use thiserror::Error;

/// Errors reported by dispatcher operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// A synchronous dispatch targeted the dispatcher that is draining on
    /// the calling thread.
    ///
    /// The calling thread is the one responsible for running the queued
    /// work, so blocking it until that work has run can never make
    /// progress. The attempt is rejected immediately instead.
    #[error("synchronous dispatch into the dispatcher running on the current thread")]
    ReentrantDispatch,
}
