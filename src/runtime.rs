use crate::{
    data::Data,
    error::RuntimeError,
    mapping::Mapping,
    registry::Registry,
    sync::{Arc, Condvar, JoinHandle, Mutex, MutexGuard, spawn_worker},
    task::Task,
    types::{AccessMode, Handle, TaskId, WorkerId},
    worker::{self, WorkerSlot},
};
use tracing::{debug, trace};

/// The state every entry point and every worker mutates, behind one lock.
///
/// Keeping the registry, the queues, the id counter, and the outstanding
/// counter under the same mutex gives the required happens-before edge for
/// free: a kernel's effects are published by the release of the lock at
/// termination and observed by the acquire at the next conflicting task's
/// readiness check, and the quiescence counter cannot miss a wakeup.
#[derive(Debug)]
pub(crate) struct Shared {
    pub(crate) registry: Registry,
    pub(crate) workers: Vec<WorkerSlot>,
    pub(crate) next_task: u64,
    pub(crate) outstanding: usize,
    pub(crate) shutdown: bool,
}

pub(crate) struct Inner {
    pub(crate) shared: Mutex<Shared>,
    /// Parked workers wait here; notified on every termination, submission,
    /// and shutdown request.
    pub(crate) tasks_cv: Condvar,
    /// `wait_for_all` waits here; notified when the outstanding counter
    /// reaches zero.
    pub(crate) quiesce_cv: Condvar,
    pub(crate) mapping: Box<dyn Mapping>,
    pub(crate) num_workers: usize,
}

impl Inner {
    pub(crate) fn lock_shared(&self) -> MutexGuard<'_, Shared> {
        self.shared.lock().expect("runtime state lock poisoned")
    }
}

/// A sequential-task-flow runtime over a fixed pool of worker threads.
///
/// Tasks are submitted in a total order and annotated with the handles they
/// access; each task is routed to one worker by a deterministic
/// [`Mapping`] and each worker executes its tasks strictly in submission
/// order, starting a task only once every earlier conflicting task has
/// terminated. Together this yields sequential consistency and data-race
/// freedom without a central scheduler: a worker decides readiness from its
/// own queue head and two per-handle aggregates.
///
/// Submission entry points take `&self` and are serialized by the runtime
/// lock, so submitting from several threads is safe; the id counter then
/// interleaves their streams in lock-acquisition order. The intended model
/// remains a single control thread issuing the task stream.
///
/// Dropping the runtime shuts it down: it waits for all submitted tasks and
/// joins the workers.
#[must_use]
pub struct Runtime {
    inner: Arc<Inner>,
    workers: Vec<JoinHandle<()>>,
}

impl core::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Runtime")
            .field("num_workers", &self.inner.num_workers)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Start a runtime with `num_workers` worker threads and the given
    /// task-to-worker mapping.
    ///
    /// # Panics
    ///
    /// Panics if `num_workers` is zero.
    pub fn new(num_workers: usize, mapping: impl Mapping) -> Self {
        assert!(num_workers > 0, "runtime needs at least one worker");
        let inner = Arc::new(Inner {
            shared: Mutex::new(Shared {
                registry: Registry::new(),
                workers: (0..num_workers).map(|_| WorkerSlot::new()).collect(),
                next_task: 0,
                outstanding: 0,
                shutdown: false,
            }),
            tasks_cv: Condvar::new(),
            quiesce_cv: Condvar::new(),
            mapping: Box::new(mapping),
            num_workers,
        });
        let workers = (0..num_workers)
            .map(|index| {
                let inner = Arc::clone(&inner);
                spawn_worker(format!("worker-{index}"), move || {
                    worker::run(&inner, WorkerId::new(index));
                })
            })
            .collect();
        debug!(num_workers, "runtime started");
        Self { inner, workers }
    }

    /// The size of the worker pool.
    #[must_use]
    pub fn num_workers(&self) -> usize {
        self.inner.num_workers
    }

    /// Register a shared data object and get back the [`Data`] container
    /// coupling its handle token with the payload.
    ///
    /// The runtime itself only tracks the token; kernels reach the payload
    /// through clones of the returned container.
    pub fn register<T: Send>(&self, value: T) -> Data<T> {
        let handle = self.inner.lock_shared().registry.register();
        trace!(%handle, "registered handle");
        Data::new(handle, value)
    }

    /// Unregister a handle.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::UnknownHandle`] if the token was never registered
    ///   here or is already unregistered.
    /// - [`RuntimeError::HandleBusy`] if submitted tasks still hold accesses
    ///   on the handle; wait for them (e.g. [`wait_for_all`](Self::wait_for_all))
    ///   and retry.
    pub fn unregister(&self, handle: Handle) -> Result<(), RuntimeError> {
        self.inner.lock_shared().registry.unregister(handle)?;
        trace!(%handle, "unregistered handle");
        Ok(())
    }

    /// Submit a task: a kernel plus the list of handles it accesses and the
    /// mode of each access.
    ///
    /// The task gets the next identifier in the submission order, is routed
    /// to the worker chosen by the mapping, and is appended to that worker's
    /// queue. It will start only when it reaches the head of the queue and
    /// every earlier conflicting task has terminated. The kernel must
    /// confine itself to the accesses it declares here.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::Shutdown`] after [`shutdown`](Self::shutdown) was
    ///   requested.
    /// - [`RuntimeError::InvalidAccess`] if the access list repeats a handle
    ///   or carries an [`AccessMode::None`] entry.
    /// - [`RuntimeError::UnknownHandle`] if the access list references an
    ///   unregistered handle.
    ///
    /// A failed submission consumes no task identifier.
    ///
    /// # Panics
    ///
    /// Panics if the mapping sends the task to a worker index outside the
    /// pool, which breaks the mapping contract.
    pub fn submit<F>(
        &self,
        kernel: F,
        accesses: &[(Handle, AccessMode)],
    ) -> Result<TaskId, RuntimeError>
    where
        F: FnOnce() + Send + 'static,
    {
        Task::check_access_list(accesses)?;

        let mut shared = self.inner.lock_shared();
        if shared.shutdown {
            return Err(RuntimeError::Shutdown);
        }
        if accesses
            .iter()
            .any(|&(handle, _)| !shared.registry.contains(handle))
        {
            return Err(RuntimeError::UnknownHandle);
        }

        let id = TaskId::new(shared.next_task);
        shared.next_task += 1;
        let worker = self.inner.mapping.assign(id);
        assert!(
            worker.index() < self.inner.num_workers,
            "mapping sent {id} to nonexistent {worker}",
        );

        for &(handle, mode) in accesses {
            shared.registry.record_access(handle, id, mode);
        }
        shared.outstanding += 1;
        shared.workers[worker.index()].queue.push_back(Task {
            id,
            kernel: Box::new(kernel),
            accesses: accesses.to_vec(),
        });
        drop(shared);

        trace!(task = %id, worker = %worker, "submitted task");
        self.inner.tasks_cv.notify_all();
        Ok(id)
    }

    /// Block until every submitted task has terminated: no worker has
    /// pending or active tasks.
    ///
    /// Returns immediately when nothing is outstanding. Tasks submitted
    /// after this returns are waited for by the next call.
    pub fn wait_for_all(&self) {
        let mut shared = self.inner.lock_shared();
        while shared.outstanding != 0 {
            shared = self
                .inner
                .quiesce_cv
                .wait(shared)
                .expect("runtime state lock poisoned");
        }
    }

    /// Shut the runtime down: wait for all submitted tasks, then stop and
    /// join the workers.
    ///
    /// Afterwards [`submit`](Self::submit) fails with
    /// [`RuntimeError::Shutdown`]. Calling this again is a no-op; dropping
    /// the runtime calls it implicitly. A running kernel is never
    /// interrupted.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.wait_for_all();
        self.inner.lock_shared().shutdown = true;
        self.inner.tasks_cv.notify_all();
        for worker in self.workers.drain(..) {
            worker.join().expect("worker thread panicked");
        }
        debug!("runtime shut down");
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
