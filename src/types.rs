use core::cell::UnsafeCell;
use derive_more::{Deref, DerefMut, Display};
use indexmap::IndexMap as _IndexMap;
use rustc_hash::FxBuildHasher;

/// A minimal `UnsafeCell` wrapper that is `Sync` when `T: Send`.
///
/// Used by [`Data`](crate::data::Data) to share a payload across worker
/// threads. Correctness is ensured by scheduling: the dependency resolver
/// never lets two conflicting kernels (at least one writer) run at the same
/// time, so access to the cell follows a mutex-like discipline without a
/// mutex.
#[derive(Debug, Deref, DerefMut)]
#[repr(transparent)]
pub(crate) struct SyncUnsafeCell<T>(UnsafeCell<T>);

// SAFETY: Conflicting accesses to the cell are serialized by the scheduler,
// so at any instant at most one thread holds a mutable view of the value,
// which is what `T: Send` permits.
unsafe impl<T: Send> Sync for SyncUnsafeCell<T> {}

impl<T> SyncUnsafeCell<T> {
    pub(crate) fn new(val: T) -> Self {
        Self(UnsafeCell::new(val))
    }
}

/// Unique identifier of a submitted task.
///
/// Identifiers are assigned by the runtime at submission from a strictly
/// increasing counter, so comparing two `TaskId`s compares their submission
/// order. The stream of assigned ids is dense: a failed submission does not
/// consume an id.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("T{_0}")]
#[repr(transparent)]
pub struct TaskId(u64);

impl TaskId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The numeric value of the identifier; equals the number of tasks
    /// submitted before this one.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Index of a worker thread, in `0..num_workers`.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[display("W{_0}")]
#[repr(transparent)]
pub struct WorkerId(usize);

impl WorkerId {
    /// Wrap a worker index. The index must be below the worker count of the
    /// runtime the id is used with.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The wrapped index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Opaque token identifying a registered data handle.
///
/// Obtained from [`Runtime::register`](crate::Runtime::register) (directly
/// or through [`Data::handle`](crate::data::Data::handle)) and passed back in
/// task access lists. The token stays valid until the handle is
/// unregistered; tokens are never reused within one runtime.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, Hash)]
#[display("H{_0}")]
#[repr(transparent)]
pub struct Handle(u64);

impl Handle {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// How a task uses a handle in its access list.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AccessMode {
    /// The kernel only reads the data behind the handle. Reads by different
    /// tasks may run concurrently.
    Read,
    /// The kernel may mutate the data behind the handle. A write excludes
    /// every other access to the same handle.
    Write,
    /// The task does not touch the handle. Meaningful only when an access
    /// list is assembled generically; submitting an explicit `None` entry is
    /// rejected, and no `None` entry is ever stored per handle.
    None,
}

/// `IndexMap` keyed with the fast `rustc_hash` hasher.
pub(crate) type IndexMap<K, V> = _IndexMap<K, V, FxBuildHasher>;
