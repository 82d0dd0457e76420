use crate::{
    error::RuntimeError,
    types::{AccessMode, Handle, TaskId},
};
use core::fmt;

/// The user-provided computation of a task.
///
/// Kernels take no runtime-visible arguments; anything they need (including
/// [`Data`](crate::data::Data) payloads) is captured at submission. The
/// runtime never inspects a kernel's effects.
pub(crate) type Kernel = Box<dyn FnOnce() + Send + 'static>;

/// Immutable record of one submitted task: its identifier, its kernel, and
/// the handles it accesses with their modes.
///
/// Descriptors live in exactly one worker queue from submission until the
/// worker pops them for execution.
pub(crate) struct Task {
    pub(crate) id: TaskId,
    pub(crate) kernel: Kernel,
    pub(crate) accesses: Vec<(Handle, AccessMode)>,
}

impl Task {
    /// Validate the shape of an access list before any id is assigned or
    /// any per-handle state is touched.
    ///
    /// Rejected with [`RuntimeError::InvalidAccess`]:
    /// - the same handle appearing more than once, whatever the modes;
    /// - an explicit [`AccessMode::None`] entry.
    ///
    /// Handle registration is checked separately against the registry.
    pub(crate) fn check_access_list(
        accesses: &[(Handle, AccessMode)],
    ) -> Result<(), RuntimeError> {
        for (pos, &(handle, mode)) in accesses.iter().enumerate() {
            if mode == AccessMode::None {
                return Err(RuntimeError::InvalidAccess);
            }
            if accesses[..pos].iter().any(|&(seen, _)| seen == handle) {
                return Err(RuntimeError::InvalidAccess);
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("accesses", &self.accesses)
            .finish_non_exhaustive()
    }
}
