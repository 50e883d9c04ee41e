//! Bounded worker pool for scan units.
//!
//! Rayon normally uses a global pool. A scan builds its own pool sized to
//! the work at hand, so concurrent scans never fight over (or fail to
//! initialise) the global one. If a pool cannot be built the jobs run
//! serially on the calling thread.

use crossbeam_channel as channel;
use rayon::ThreadPool;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A fixed-size pool that streams job results back as they complete
pub(crate) struct WorkerPool {
    pool: Option<ThreadPool>,
}

impl WorkerPool {
    pub(crate) fn new(threads: usize) -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("blankscan-worker-{i}"))
            .build()
            .ok();
        Self { pool }
    }

    /// A pool that runs everything on the calling thread
    #[cfg(test)]
    pub(crate) fn serial() -> Self {
        Self { pool: None }
    }

    pub(crate) fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::current_num_threads)
    }

    /// Run `work` on every job and hand each result to `collect` on the
    /// calling thread, in completion order.
    ///
    /// `collect` receives the job's index and either its result or the
    /// panic message if the job panicked. Returns once every job has
    /// reported.
    pub(crate) fn run<J, R, F, C>(&self, jobs: Vec<J>, work: F, mut collect: C)
    where
        J: Send,
        R: Send,
        F: Fn(J) -> R + Sync,
        C: FnMut(usize, Result<R, String>),
    {
        let Some(pool) = &self.pool else {
            for (idx, job) in jobs.into_iter().enumerate() {
                collect(idx, guarded(|| work(job)));
            }
            return;
        };

        let (tx, rx) = channel::unbounded::<(usize, Result<R, String>)>();
        let work = &work;
        pool.in_place_scope(|scope| {
            for (idx, job) in jobs.into_iter().enumerate() {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    // The receiver outlives the scope, so send cannot fail
                    let _ = tx.send((idx, guarded(|| work(job))));
                });
            }
            drop(tx);

            // Ends once every spawned job has dropped its sender
            for (idx, result) in rx.iter() {
                collect(idx, result);
            }
        });
    }
}

fn guarded<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(payload.as_ref()))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_every_job_reports_once() {
        let pool = WorkerPool::new(4);
        let mut seen = BTreeMap::new();
        pool.run((0..100u32).collect(), |n| n * 2, |idx, result| {
            assert!(seen.insert(idx, result.unwrap()).is_none());
        });
        assert_eq!(seen.len(), 100);
        assert_eq!(seen[&7], 14);
    }

    #[test]
    fn test_panic_is_captured() {
        let pool = WorkerPool::new(2);
        let mut results = Vec::new();
        pool.run(
            vec![1u32, 2, 3],
            |n| {
                if n == 2 {
                    panic!("bad unit {n}");
                }
                n
            },
            |idx, result| results.push((idx, result)),
        );
        results.sort_by_key(|(idx, _)| *idx);
        assert_eq!(results[0].1, Ok(1));
        assert_eq!(results[1].1, Err("bad unit 2".to_string()));
        assert_eq!(results[2].1, Ok(3));
    }

    #[test]
    fn test_serial_fallback() {
        let pool = WorkerPool::serial();
        assert_eq!(pool.threads(), 1);
        let mut order = Vec::new();
        pool.run(vec!["a", "b", "c"], str::len, |idx, _| order.push(idx));
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_job_list() {
        let pool = WorkerPool::new(1);
        let mut called = false;
        pool.run(Vec::<u8>::new(), |b| b, |_, _| called = true);
        assert!(!called);
    }
}
