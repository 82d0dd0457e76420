//! Sequential task flow runtime with per-worker in-order execution.
//!
//! This crate executes a dynamically submitted stream of tasks on a pool of
//! worker threads under dependency and consistency guarantees strong enough
//! for fine-grained numeric workloads (tiled LU, tiled GEMM), where task
//! granularity approaches scheduler overhead. It:
//! - Tracks dependencies over registered data handles annotated with
//!   read/write access modes, not over an explicit task graph.
//! - Assigns every task a strictly increasing identifier at submission; the
//!   identifier stream is the sequential order all guarantees refer to.
//! - Routes each task to one worker through a deterministic mapping, so
//!   readiness is decided from worker-local knowledge plus two per-handle
//!   aggregates, with no central scheduler hotspot.
//! - Has each worker execute its tasks strictly in submission order,
//!   starting a task only once every earlier conflicting task has
//!   terminated.
//!
//! Key modules:
//! - `runtime`: the [`Runtime`] itself — construction, task submission, the
//!   quiescence barrier, shutdown.
//! - `data`: the [`Data`] container pairing a registered handle token with
//!   the payload kernels capture.
//! - `mapping`: the [`Mapping`] trait and the canonical [`RoundRobin`]
//!   placement.
//! - `registry`, `resolver`, `worker`: per-handle outstanding-access state,
//!   the head-readiness predicate, and the worker thread loop.
//!
//! Quick start:
//!
//! ```
//! use inorder::{AccessMode, RoundRobin, Runtime};
//!
//! let mut rt = Runtime::new(2, RoundRobin::new(2));
//! let total = rt.register(0_u64);
//!
//! for _ in 0..10 {
//!     let total = total.clone();
//!     let access = [(total.handle(), AccessMode::Write)];
//!     rt.submit(move || unsafe { *total.write() += 1 }, &access)
//!         .unwrap();
//! }
//!
//! rt.wait_for_all();
//! // All ten writes are ordered by their submission ids.
//! assert_eq!(unsafe { *total.read() }, 10);
//! rt.shutdown();
//! ```
//!
//! Two concurrently running tasks never conflict on a handle (at least one
//! writer), and the observable order of effects on any handle is the
//! submission order of the tasks accessing it. `wait_for_all` returns once
//! no worker has pending or active tasks.
//!
//! Out of scope by design: preemption, task stealing, priorities,
//! persistence, distributed operation, and recovery from kernel faults.

/// Typed payload container for registered handles.
pub mod data;
/// Error kinds returned by the synchronous entry points.
pub mod error;
/// Deterministic task-to-worker placement.
pub mod mapping;
mod registry;
mod resolver;
/// The runtime: submission, the quiescence barrier, shutdown.
pub mod runtime;
mod sync;
mod task;
/// Identifier newtypes and access modes.
pub mod types;
mod worker;

pub use crate::{
    data::Data,
    error::RuntimeError,
    mapping::{Mapping, RoundRobin},
    runtime::Runtime,
    types::{AccessMode, Handle, TaskId, WorkerId},
};
