use thiserror::Error;

/// Error kind for the synchronous entry points of the runtime.
///
/// Every variant is recoverable at the caller and leaves the runtime fully
/// operational; there is no asynchronous error channel, and no error is ever
/// raised by the scheduling layer during task execution.
#[derive(Debug, Error, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RuntimeError {
    /// An access list references a handle that was never registered or has
    /// already been unregistered.
    #[error("access list references an unregistered handle")]
    UnknownHandle,
    /// An access list names the same handle more than once, or carries an
    /// explicit [`AccessMode::None`](crate::AccessMode::None) entry.
    #[error("malformed access list (duplicate handle or `None` mode)")]
    InvalidAccess,
    /// `unregister` was called while tasks still hold accesses on the
    /// handle.
    #[error("handle still has outstanding accesses")]
    HandleBusy,
    /// The runtime has been shut down and no longer accepts submissions.
    #[error("runtime has been shut down")]
    Shutdown,
}
