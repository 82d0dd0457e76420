//! Typed payload container coupling a registered handle with its memory.
//!
//! The runtime tracks dependencies over opaque [`Handle`] tokens and knows
//! nothing about payloads; kernels reach the actual memory by capturing a
//! clone of the [`Data`] container that
//! [`Runtime::register`](crate::Runtime::register) returned. The container
//! gives out plain references without locking: exclusivity is exactly what
//! the scheduler already guarantees for a kernel that declared the matching
//! access, so the accessors only have to state that contract, not enforce
//! it.

use crate::{
    sync::Arc,
    types::{Handle, SyncUnsafeCell},
};
use core::fmt;

/// A shared data object: the registered [`Handle`] token plus the payload
/// it stands for.
///
/// Cloning is cheap and shares the payload; clones are how kernels capture
/// the data they declared in their access list.
pub struct Data<T> {
    handle: Handle,
    cell: Arc<SyncUnsafeCell<T>>,
}

impl<T> Data<T> {
    pub(crate) fn new(handle: Handle, value: T) -> Self {
        Self {
            handle,
            cell: Arc::new(SyncUnsafeCell::new(value)),
        }
    }

    /// The handle token to put in an access list when submitting a task
    /// that touches this data.
    #[must_use]
    pub const fn handle(&self) -> Handle {
        self.handle
    }

    /// Read the payload.
    ///
    /// # Safety
    ///
    /// Must only be called from inside a kernel whose task declared `Read`
    /// or `Write` on [`self.handle()`](Self::handle) — the scheduler then
    /// guarantees no concurrent writer exists for the duration of the
    /// kernel — or from outside any kernel while no task accessing the
    /// handle is pending or active (e.g. after
    /// [`wait_for_all`](crate::Runtime::wait_for_all)). Anywhere else the
    /// read may race with a writer.
    #[must_use]
    pub unsafe fn read(&self) -> &T {
        // SAFETY: No writer runs concurrently per the caller's contract.
        unsafe { &*self.cell.get() }
    }

    /// Mutably access the payload.
    ///
    /// # Safety
    ///
    /// Must only be called from inside a kernel whose task declared `Write`
    /// on [`self.handle()`](Self::handle) — the scheduler then guarantees
    /// the kernel is the only access of any kind for its duration — or from
    /// outside any kernel while no task accessing the handle is pending or
    /// active. The returned reference must not outlive that window, and no
    /// other reference obtained through [`read`](Self::read) or `write` may
    /// coexist with it.
    #[must_use]
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn write(&self) -> &mut T {
        // SAFETY: This task is the sole accessor per the caller's contract.
        unsafe { &mut *self.cell.get() }
    }
}

impl<T> Clone for Data<T> {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle,
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for Data<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}
