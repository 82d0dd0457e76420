//! Readiness of the head of a worker's queue.
//!
//! A worker only ever asks about its head, and heads are visited in task-id
//! order, so readiness can be decided from the per-handle aggregates alone:
//! for every handle `H` the registry knows the minimum id among unfinished
//! writers (`min_writer`) and among unfinished accessors of any mode
//! (`min_accessor`). Since the head's own accesses were recorded at
//! submission, its own id participates in those minima and the comparisons
//! below are against `>=` rather than `>`.

use crate::{registry::Registry, task::Task, types::AccessMode};

/// Whether `task` may start now, given the current state of the handles it
/// accesses.
///
/// `task` must be the head of its worker's queue. It is ready iff for every
/// entry of its access list:
/// - `Read` on `H`: no unfinished task with a smaller id writes `H`, i.e.
///   `min_writer(H) >= task.id`;
/// - `Write` on `H`: no unfinished task with a smaller id touches `H` at
///   all, i.e. `min_accessor(H) >= task.id`.
///
/// A task with an empty access list is always ready.
pub(crate) fn is_ready(registry: &Registry, task: &Task) -> bool {
    task.accesses.iter().all(|&(handle, mode)| {
        let blocking_min = match mode {
            AccessMode::Read => registry.min_writer(handle),
            AccessMode::Write => registry.min_accessor(handle),
            AccessMode::None => unreachable!("`None` entries are rejected at submission"),
        };
        blocking_min.is_none_or(|min| min >= task.id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Handle, TaskId};

    fn task(id: u64, accesses: &[(Handle, AccessMode)]) -> Task {
        Task {
            id: TaskId::new(id),
            kernel: Box::new(|| {}),
            accesses: accesses.to_vec(),
        }
    }

    /// Submit-time recording for a task the tests reason about.
    fn record(registry: &mut Registry, task: &Task) {
        for &(handle, mode) in &task.accesses {
            registry.record_access(handle, task.id, mode);
        }
    }

    #[test]
    fn empty_access_list_is_always_ready() {
        let registry = Registry::new();
        assert!(is_ready(&registry, &task(7, &[])));
    }

    #[test]
    fn own_accesses_do_not_block() {
        let mut registry = Registry::new();
        let h = registry.register();
        let t = task(0, &[(h, AccessMode::Write)]);
        record(&mut registry, &t);
        assert!(is_ready(&registry, &t));
    }

    #[test]
    fn read_waits_for_earlier_writer_only() {
        let mut registry = Registry::new();
        let h = registry.register();
        let writer = task(0, &[(h, AccessMode::Write)]);
        let reader = task(1, &[(h, AccessMode::Read)]);
        record(&mut registry, &writer);
        record(&mut registry, &reader);

        assert!(!is_ready(&registry, &reader));
        registry.clear_access(h, writer.id);
        assert!(is_ready(&registry, &reader));
    }

    #[test]
    fn concurrent_reads_do_not_block_each_other() {
        let mut registry = Registry::new();
        let h = registry.register();
        let first = task(0, &[(h, AccessMode::Read)]);
        let second = task(1, &[(h, AccessMode::Read)]);
        record(&mut registry, &first);
        record(&mut registry, &second);

        assert!(is_ready(&registry, &first));
        assert!(is_ready(&registry, &second));
    }

    #[test]
    fn write_waits_for_earlier_reader() {
        let mut registry = Registry::new();
        let h = registry.register();
        let reader = task(0, &[(h, AccessMode::Read)]);
        let writer = task(1, &[(h, AccessMode::Write)]);
        record(&mut registry, &reader);
        record(&mut registry, &writer);

        assert!(!is_ready(&registry, &writer));
        registry.clear_access(h, reader.id);
        assert!(is_ready(&registry, &writer));
    }

    #[test]
    fn one_blocked_handle_blocks_the_task() {
        let mut registry = Registry::new();
        let free = registry.register();
        let contended = registry.register();
        let writer = task(0, &[(contended, AccessMode::Write)]);
        let gemm = task(
            1,
            &[(free, AccessMode::Read), (contended, AccessMode::Read)],
        );
        record(&mut registry, &writer);
        record(&mut registry, &gemm);

        assert!(!is_ready(&registry, &gemm));
        registry.clear_access(contended, writer.id);
        assert!(is_ready(&registry, &gemm));
    }
}
