use crate::{
    resolver,
    runtime::{Inner, Shared},
    task::Task,
    types::{TaskId, WorkerId},
};
use std::{
    collections::VecDeque,
    panic::{self, AssertUnwindSafe},
    process,
};
use tracing::{debug, error, trace};

/// What a worker is doing right now.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum WorkerState {
    /// No task is running on this worker.
    Idle,
    /// The worker popped its head and is running the task's kernel.
    Executing(TaskId),
    /// The worker observed shutdown with an empty queue and exited its loop.
    Stopped,
}

/// Per-worker scheduling state: the pending queue and the state tag.
///
/// The queue is FIFO in submission order. The submitter appends under the
/// runtime lock and only the owning worker pops, so the queue is strictly
/// ordered by task id and the head is the only execution candidate.
#[derive(Debug)]
pub(crate) struct WorkerSlot {
    pub(crate) queue: VecDeque<Task>,
    pub(crate) state: WorkerState,
}

impl WorkerSlot {
    pub(crate) fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            state: WorkerState::Idle,
        }
    }
}

/// The worker thread loop.
///
/// Pops and runs the head of this worker's queue whenever the resolver
/// reports it ready; parks on the runtime condition variable otherwise.
/// Kernels run with no runtime lock held. Exits once shutdown is requested
/// and the queue has drained.
pub(crate) fn run(inner: &Inner, id: WorkerId) {
    let mut shared = inner.lock_shared();
    debug!(worker = %id, "worker started");
    loop {
        let Shared {
            registry, workers, ..
        } = &mut *shared;
        let slot = &mut workers[id.index()];
        let head_ready = match slot.queue.front() {
            Some(head) => resolver::is_ready(registry, head),
            None => false,
        };

        if head_ready {
            let task = slot.queue.pop_front().expect("ready head vanished");
            slot.state = WorkerState::Executing(task.id);
            drop(shared);

            trace!(task = %task.id, worker = %id, "executing task");
            let Task { id: tid, kernel, accesses } = task;
            if panic::catch_unwind(AssertUnwindSafe(kernel)).is_err() {
                // Recovery is out of scope: a trapped kernel takes the
                // process down rather than leaving dependents blocked
                // forever.
                error!(task = %tid, worker = %id, "kernel panicked, aborting");
                process::abort();
            }

            shared = inner.lock_shared();
            for &(handle, _) in &accesses {
                shared.registry.clear_access(handle, tid);
            }
            shared.workers[id.index()].state = WorkerState::Idle;
            shared.outstanding -= 1;
            trace!(task = %tid, worker = %id, "task terminated");
            if shared.outstanding == 0 {
                inner.quiesce_cv.notify_all();
            }
            // The cleared accesses may have unblocked other workers' heads.
            inner.tasks_cv.notify_all();
            continue;
        }

        if shared.shutdown && shared.workers[id.index()].queue.is_empty() {
            shared.workers[id.index()].state = WorkerState::Stopped;
            debug!(worker = %id, "worker stopped");
            return;
        }

        shared = inner
            .tasks_cv
            .wait(shared)
            .expect("runtime state lock poisoned");
    }
}
