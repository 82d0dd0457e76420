//! Property-based checks of the scheduling invariants.
//!
//! Random task streams are generated over a small handle set, executed for
//! real on a worker pool, and the recorded execution spans are checked
//! offline: every task runs exactly once, conflicting accesses to a handle
//! never overlap, and conflicting tasks retire in submission order.
#![cfg(not(feature = "loom"))]

use inorder::{AccessMode, Data, RoundRobin, Runtime};
use proptest::prelude::*;
use std::{
    sync::{Arc, Mutex},
    thread,
    time::Instant,
};

const NUM_HANDLES: usize = 6;
const NUM_WORKERS: usize = 3;

/// One generated task: up to three `(handle index, is_write)` accesses.
/// Duplicate handle indices are dropped at submission (first entry wins) so
/// every submitted list is valid.
fn task_stream() -> impl Strategy<Value = Vec<Vec<(usize, bool)>>> {
    prop::collection::vec(
        prop::collection::vec((0..NUM_HANDLES, any::<bool>()), 0..=3),
        1..=40,
    )
}

struct Span {
    task: usize,
    accesses: Vec<(usize, AccessMode)>,
    worker: String,
    start: Instant,
    end: Instant,
}

fn run_stream(stream: &[Vec<(usize, bool)>]) -> Vec<Span> {
    let mut rt = Runtime::new(NUM_WORKERS, RoundRobin::new(NUM_WORKERS));
    let handles: Vec<Data<()>> = (0..NUM_HANDLES).map(|_| rt.register(())).collect();
    let spans = Arc::new(Mutex::new(Vec::with_capacity(stream.len())));

    for (task, raw_accesses) in stream.iter().enumerate() {
        let mut accesses: Vec<(usize, AccessMode)> = Vec::new();
        for &(idx, is_write) in raw_accesses {
            if accesses.iter().all(|&(seen, _)| seen != idx) {
                let mode = if is_write {
                    AccessMode::Write
                } else {
                    AccessMode::Read
                };
                accesses.push((idx, mode));
            }
        }
        let access_list: Vec<_> = accesses
            .iter()
            .map(|&(idx, mode)| (handles[idx].handle(), mode))
            .collect();
        let spans = Arc::clone(&spans);
        rt.submit(
            move || {
                let start = Instant::now();
                let end = Instant::now();
                spans.lock().unwrap().push(Span {
                    task,
                    accesses,
                    worker: thread::current().name().unwrap().to_owned(),
                    start,
                    end,
                });
            },
            &access_list,
        )
        .unwrap();
    }
    rt.wait_for_all();
    rt.shutdown();

    let mut spans = Arc::into_inner(spans).unwrap().into_inner().unwrap();
    spans.sort_by_key(|span| span.task);
    spans
}

fn writes(span: &Span, handle: usize) -> bool {
    span.accesses
        .iter()
        .any(|&(idx, mode)| idx == handle && mode == AccessMode::Write)
}

fn touches(span: &Span, handle: usize) -> bool {
    span.accesses.iter().any(|&(idx, _)| idx == handle)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn scheduled_streams_uphold_stf_invariants(stream in task_stream()) {
        let spans = run_stream(&stream);

        // Every submitted task ran exactly once.
        prop_assert_eq!(spans.len(), stream.len());
        for (expected, span) in spans.iter().enumerate() {
            prop_assert_eq!(span.task, expected);
        }

        // Conflicting accesses to a handle never overlap in time and retire
        // in submission order.
        for handle in 0..NUM_HANDLES {
            let users: Vec<&Span> = spans.iter().filter(|span| touches(span, handle)).collect();
            for (pos, first) in users.iter().enumerate() {
                for second in &users[pos + 1..] {
                    if writes(first, handle) || writes(second, handle) {
                        prop_assert!(
                            first.end <= second.start,
                            "tasks {} and {} conflicted on handle {}",
                            first.task,
                            second.task,
                            handle,
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn round_robin_partition_matches_the_mapping(stream in task_stream()) {
        let spans = run_stream(&stream);

        // Task `t` ran on worker `t mod NUM_WORKERS`, whatever the handle
        // traffic looked like.
        for span in &spans {
            let expected = format!("worker-{}", span.task % NUM_WORKERS);
            prop_assert_eq!(&span.worker, &expected);
        }
    }
}
