use crate::types::{TaskId, WorkerId};

/// Deterministic assignment of tasks to workers.
///
/// The mapping is consulted exactly once per submitted task and must be a
/// pure total function into `0..num_workers`, fixed for the runtime's
/// lifetime. Determinism is what lets each worker decide readiness from its
/// own queue and the per-handle aggregates alone, with no central scheduler.
///
/// Automatically implemented for `Fn(TaskId) -> WorkerId` closures, so a
/// custom placement policy is one lambda away:
///
/// ```
/// use inorder::{Runtime, TaskId, WorkerId};
///
/// let block_cyclic = |task: TaskId| WorkerId::new((task.get() as usize / 4) % 2);
/// let mut rt = Runtime::new(2, block_cyclic);
/// rt.shutdown();
/// ```
pub trait Mapping: Send + Sync + 'static {
    /// The worker that will execute `task`.
    fn assign(&self, task: TaskId) -> WorkerId;
}

impl<F> Mapping for F
where
    F: Fn(TaskId) -> WorkerId + Send + Sync + 'static,
{
    fn assign(&self, task: TaskId) -> WorkerId {
        self(task)
    }
}

/// The canonical mapping: task `t` runs on worker `t mod num_workers`.
#[derive(Debug, Copy, Clone)]
pub struct RoundRobin {
    num_workers: usize,
}

impl RoundRobin {
    /// A round-robin mapping over `num_workers` workers.
    ///
    /// # Panics
    ///
    /// Panics if `num_workers` is zero.
    #[must_use]
    pub const fn new(num_workers: usize) -> Self {
        assert!(num_workers > 0, "round-robin over zero workers");
        Self { num_workers }
    }
}

impl Mapping for RoundRobin {
    fn assign(&self, task: TaskId) -> WorkerId {
        WorkerId::new((task.get() % self.num_workers as u64) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_robin_cycles_over_workers() {
        let map = RoundRobin::new(3);
        let assigned: Vec<_> = (0..7)
            .map(|id| map.assign(TaskId::new(id)).index())
            .collect();
        assert_eq!(assigned, [0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn single_worker_takes_everything() {
        let map = RoundRobin::new(1);
        assert_eq!(map.assign(TaskId::new(0)), WorkerId::new(0));
        assert_eq!(map.assign(TaskId::new(991)), WorkerId::new(0));
    }

    #[test]
    fn closures_are_mappings() {
        let map = |task: TaskId| WorkerId::new(usize::from(task.get() >= 10));
        assert_eq!(map.assign(TaskId::new(2)), WorkerId::new(0));
        assert_eq!(map.assign(TaskId::new(10)), WorkerId::new(1));
    }
}
