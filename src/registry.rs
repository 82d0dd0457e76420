use crate::{
    error::RuntimeError,
    types::{AccessMode, Handle, IndexMap, TaskId},
};
use std::collections::BTreeSet;

/// Outstanding accesses recorded against one handle.
///
/// Both sets hold ids of tasks that have been submitted but not yet
/// terminated. `writers` is a subset of `accessors`; keeping the two ordered
/// sets makes the aggregates the resolver needs (`min_writer`,
/// `min_accessor`) a first-element lookup.
#[derive(Debug, Default)]
struct HandleState {
    writers: BTreeSet<TaskId>,
    accessors: BTreeSet<TaskId>,
}

impl HandleState {
    fn is_idle(&self) -> bool {
        self.accessors.is_empty()
    }
}

/// The data handle registry: stable identities for shared data objects plus
/// the per-handle dependency state the resolver reads.
///
/// Mutated at submission (`record_access`) and at task termination
/// (`clear_access`); both happen under the runtime lock, which is also the
/// synchronization that orders a terminated kernel's memory effects before
/// any later conflicting kernel.
#[derive(Debug)]
pub(crate) struct Registry {
    handles: IndexMap<Handle, HandleState>,
    next_handle: u64,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            handles: IndexMap::default(),
            next_handle: 0,
        }
    }

    /// Create a new handle with an empty outstanding-access list.
    pub(crate) fn register(&mut self) -> Handle {
        let handle = Handle::new(self.next_handle);
        self.next_handle += 1;
        self.handles.insert(handle, HandleState::default());
        handle
    }

    /// Drop a handle. Fails with [`RuntimeError::HandleBusy`] while any
    /// submitted task still holds an access on it.
    pub(crate) fn unregister(&mut self, handle: Handle) -> Result<(), RuntimeError> {
        let state = self
            .handles
            .get(&handle)
            .ok_or(RuntimeError::UnknownHandle)?;
        if !state.is_idle() {
            return Err(RuntimeError::HandleBusy);
        }
        self.handles.swap_remove(&handle);
        Ok(())
    }

    pub(crate) fn contains(&self, handle: Handle) -> bool {
        self.handles.contains_key(&handle)
    }

    /// Record a submitted access. The handle must be registered and the mode
    /// must be `Read` or `Write`; both are validated on the submission path
    /// before any state is touched.
    pub(crate) fn record_access(&mut self, handle: Handle, task: TaskId, mode: AccessMode) {
        let state = self
            .handles
            .get_mut(&handle)
            .expect("record_access: handle vanished after validation");
        match mode {
            AccessMode::Read => {}
            AccessMode::Write => {
                state.writers.insert(task);
            }
            AccessMode::None => unreachable!("record_access: `None` rejected at submission"),
        }
        state.accessors.insert(task);
    }

    /// Remove the entries a terminated task owned on one of its handles.
    pub(crate) fn clear_access(&mut self, handle: Handle, task: TaskId) {
        let state = self
            .handles
            .get_mut(&handle)
            .expect("clear_access: handle unregistered while access outstanding");
        state.writers.remove(&task);
        let removed = state.accessors.remove(&task);
        debug_assert!(removed, "clear_access: access was never recorded");
    }

    /// Minimum id among unfinished tasks writing `handle`, if any.
    pub(crate) fn min_writer(&self, handle: Handle) -> Option<TaskId> {
        self.handles[&handle].writers.first().copied()
    }

    /// Minimum id among unfinished tasks accessing `handle` in any mode.
    pub(crate) fn min_accessor(&self, handle: Handle) -> Option<TaskId> {
        self.handles[&handle].accessors.first().copied()
    }
}
