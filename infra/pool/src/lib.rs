//! # Pool
//!
//! The worker pool shared by every parallel loop of the simulator.
//!
//! Two execution modes are offered:
//! * **Tasks**: `'static` closures pushed onto persistent workers with [`ThreadPool::push`],
//!   awaited individually through a [`TaskHandle`] or all at once with
//!   [`ThreadPool::wait_for_tasks`]. Used for independent simulation replicas.
//! * **Scoped jobs**: borrowed work items (typically `&mut` chunks of particle storage)
//!   executed by [`ThreadPool::map_scoped`] / [`ThreadPool::run_scoped`]. Jobs are pulled
//!   from a shared queue by at most [`ThreadPool::size`] scoped threads, so uneven chunks
//!   balance out. Results come back in job order.
//!
//! Loops are split into [`ThreadPool::granularity`] (twice the worker count) chunks.
//!
//! Panics inside tasks are caught and surfaced as [`PoolError::TaskPanicked`]. The release
//! profile aborts on panic, so this only applies to unwinding builds (tests, benches).
//!
//! ## Example
//!
//! ```rust
//! use ctiprd_pool::{PoolConfig, ThreadPool};
//!
//! let pool = ThreadPool::new(&PoolConfig::default().with_worker_threads(2))?;
//! let handle = pool.push(|| 6 * 7);
//! assert_eq!(handle.wait()?, 42);
//!
//! let mut data = vec![1_u32; 100];
//! let chunks: Vec<&mut [u32]> = data.chunks_mut(10).collect();
//! pool.run_scoped(chunks, |chunk| chunk.iter_mut().for_each(|x| *x *= 2))?;
//! assert!(data.iter().all(|&x| x == 2));
//! # Ok::<(), ctiprd_pool::PoolError>(())
//! ```

mod config;
mod error;

pub use crate::config::{PoolConfig, WORKER_THREADS_ENV, detect_worker_threads};
pub use crate::error::{PoolError, PoolErrorExt};

use crate::error::panic_message;
use crossbeam_channel::{Receiver, Sender};
use parking_lot::{Condvar, Mutex};
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use tracing::{debug, trace, warn};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Splits `0..len` into at most `parts` contiguous, non-empty ranges whose sizes differ by at most one.
#[must_use]
pub fn partition(len: usize, parts: usize) -> Vec<Range<usize>> {
    let parts = parts.clamp(1, len.max(1));
    let base = len / parts;
    let extra = len % parts;
    let mut ranges = Vec::with_capacity(parts);
    let mut start = 0;
    for i in 0..parts {
        let end = start + base + usize::from(i < extra);
        if end > start {
            ranges.push(start..end);
        }
        start = end;
    }
    ranges
}

/// Blocks of [`ThreadPool::parallelize_loop`]: `blocks` ranges of `len / blocks` indices each,
/// the last one extended to `last`. Ranges shorter than `blocks` get one block per index.
#[must_use]
pub fn loop_blocks(first: usize, last: usize, blocks: usize) -> Vec<Range<usize>> {
    let (first, last) = if first > last { (last, first) } else { (first, last) };
    let len = last - first;
    if len == 0 {
        return Vec::new();
    }
    let mut blocks = blocks.max(1);
    let mut block = len / blocks;
    if block == 0 {
        block = 1;
        blocks = len;
    }
    (0..blocks)
        .map(|i| {
            let start = first + i * block;
            let end = if i + 1 == blocks { last } else { start + block };
            start..end
        })
        .collect()
}

#[derive(Debug, Default)]
struct Pending {
    count: Mutex<usize>,
    idle: Condvar,
}

impl Pending {
    fn begin(&self) {
        *self.count.lock() += 1;
    }

    fn finish(&self) {
        let mut count = self.count.lock();
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.idle.notify_all();
        }
    }

    fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.idle.wait(&mut count);
        }
    }
}

/// Result slot of a task pushed with [`ThreadPool::push`].
pub struct TaskHandle<R> {
    receiver: Receiver<Result<R, PoolError>>,
}

impl<R> TaskHandle<R> {
    /// Blocks until the task finished and returns its value.
    ///
    /// # Errors
    /// [`PoolError::TaskPanicked`] if the task panicked, [`PoolError::Disconnected`] if the
    /// pool went away before the task ran.
    pub fn wait(self) -> Result<R, PoolError> {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(PoolError::Disconnected {
                message: "task dropped before completion".into(),
                context: None,
            })
        })
    }

    /// Returns the result if the task already finished, without blocking.
    #[must_use]
    pub fn try_wait(&self) -> Option<Result<R, PoolError>> {
        self.receiver.try_recv().ok()
    }
}

impl<R> std::fmt::Debug for TaskHandle<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle").field("ready", &!self.receiver.is_empty()).finish()
    }
}

/// Fixed-size pool of named worker threads.
pub struct ThreadPool {
    config: PoolConfig,
    sender: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    pending: Arc<Pending>,
}

impl ThreadPool {
    /// Starts `config.worker_threads` workers (clamped, see [`PoolConfig`]).
    ///
    /// # Errors
    /// Returns [`PoolError::Spawn`] if a worker thread cannot be created.
    pub fn new(config: &PoolConfig) -> Result<Self, PoolError> {
        let config = config.normalized();
        let (sender, receiver) = crossbeam_channel::unbounded::<Job>();

        let mut workers = Vec::with_capacity(config.worker_threads);
        for i in 0..config.worker_threads {
            let receiver = receiver.clone();
            let handle = std::thread::Builder::new()
                .name(format!("{}-{i}", config.thread_name))
                .stack_size(config.stack_size)
                .spawn(move || worker_loop(&receiver))
                .context(format!("worker {i} of {}", config.worker_threads))?;
            workers.push(handle);
        }

        debug!(
            threads = config.worker_threads,
            stack = config.stack_size,
            name = %config.thread_name,
            "Worker pool started"
        );

        Ok(Self { config, sender: Some(sender), workers, pending: Arc::default() })
    }

    /// Convenience constructor with default settings and `threads` workers.
    ///
    /// # Errors
    /// Returns [`PoolError::Spawn`] if a worker thread cannot be created.
    pub fn with_threads(threads: usize) -> Result<Self, PoolError> {
        Self::new(&PoolConfig::default().with_worker_threads(threads))
    }

    /// Number of worker threads.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.config.worker_threads
    }

    /// Number of chunks a parallel loop is split into.
    #[must_use]
    pub const fn granularity(&self) -> usize {
        2 * self.config.worker_threads
    }

    #[must_use]
    pub const fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Queues a task on the persistent workers.
    pub fn push<F, R>(&self, task: F) -> TaskHandle<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (tx, receiver) = crossbeam_channel::bounded(1);
        let pending = Arc::clone(&self.pending);
        pending.begin();

        let job: Job = Box::new(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task)).map_err(|payload| {
                PoolError::TaskPanicked { message: panic_message(&*payload), context: None }
            });
            // the handle may have been dropped; the result is simply discarded then
            let _ = tx.send(outcome);
            pending.finish();
        });

        match &self.sender {
            Some(sender) => {
                if let Err(rejected) = sender.send(job) {
                    drop(rejected);
                    self.pending.finish();
                }
            },
            None => self.pending.finish(),
        }

        TaskHandle { receiver }
    }

    /// Blocks until every task pushed so far has completed.
    pub fn wait_for_tasks(&self) {
        self.pending.wait();
    }

    /// Runs `f` on every job using scoped threads and returns the results in job order.
    ///
    /// With a single worker or a single job everything runs on the calling thread.
    ///
    /// # Errors
    /// [`PoolError::TaskPanicked`] if any job panicked, [`PoolError::Spawn`] if a scoped
    /// thread could not be started.
    pub fn map_scoped<J, R, F>(&self, jobs: Vec<J>, f: F) -> Result<Vec<R>, PoolError>
    where
        J: Send,
        R: Send,
        F: Fn(J) -> R + Sync,
    {
        let n_threads = self.size().min(jobs.len());
        if n_threads <= 1 {
            return panic::catch_unwind(AssertUnwindSafe(|| jobs.into_iter().map(&f).collect()))
                .map_err(|payload| PoolError::TaskPanicked {
                    message: panic_message(&*payload),
                    context: Some("inline job".into()),
                });
        }

        let n_jobs = jobs.len();
        let (tx, rx) = crossbeam_channel::bounded(n_jobs);
        for item in jobs.into_iter().enumerate() {
            tx.send(item).map_err(|_| PoolError::Disconnected {
                message: "scoped job queue closed".into(),
                context: None,
            })?;
        }
        drop(tx);

        let f = &f;
        let rx = &rx;
        let name = &self.config.thread_name;
        let stack_size = self.config.stack_size;

        let collected = crossbeam_utils::thread::scope(|scope| {
            let mut handles = Vec::with_capacity(n_threads);
            for i in 0..n_threads {
                let handle = scope
                    .builder()
                    .name(format!("{name}-scoped-{i}"))
                    .stack_size(stack_size)
                    .spawn(move |_| {
                        let mut out = Vec::new();
                        while let Ok((ix, job)) = rx.recv() {
                            out.push((ix, f(job)));
                        }
                        out
                    })
                    .context("scoped worker")?;
                handles.push(handle);
            }

            let mut results = Vec::with_capacity(n_jobs);
            for handle in handles {
                let part = handle.join().map_err(|payload| PoolError::TaskPanicked {
                    message: panic_message(&*payload),
                    context: Some("scoped job".into()),
                })?;
                results.extend(part);
            }
            Ok::<_, PoolError>(results)
        })
        .map_err(|payload| PoolError::TaskPanicked {
            message: panic_message(&*payload),
            context: Some("scoped job".into()),
        })??;

        trace!(jobs = n_jobs, threads = n_threads, "Scoped jobs finished");

        let mut ordered = collected;
        ordered.sort_unstable_by_key(|(ix, _)| *ix);
        Ok(ordered.into_iter().map(|(_, r)| r).collect())
    }

    /// Like [`ThreadPool::map_scoped`] for side-effecting jobs.
    ///
    /// # Errors
    /// See [`ThreadPool::map_scoped`].
    pub fn run_scoped<J, F>(&self, jobs: Vec<J>, f: F) -> Result<(), PoolError>
    where
        J: Send,
        F: Fn(J) + Sync,
    {
        self.map_scoped(jobs, f).map(|_| ())
    }

    /// Splits `first..last` into [`ThreadPool::size`] blocks and runs `f(start, end)` per block.
    /// A reversed range is swapped; see [`loop_blocks`] for the block layout.
    ///
    /// # Errors
    /// See [`ThreadPool::map_scoped`].
    pub fn parallelize_loop<F>(&self, first: usize, last: usize, f: F) -> Result<(), PoolError>
    where
        F: Fn(usize, usize) + Sync,
    {
        let blocks = loop_blocks(first, last, self.size());
        if blocks.is_empty() {
            return Ok(());
        }
        self.run_scoped(blocks, |r| f(r.start, r.end))
    }

    /// Waits for outstanding tasks, then stops and joins all workers.
    pub fn shutdown(self) {
        self.wait_for_tasks();
        drop(self);
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("config", &self.config)
            .field("workers", &self.workers.len())
            .field("pending", &*self.pending.count.lock())
            .finish()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        drop(self.sender.take());
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                warn!("Worker thread terminated abnormally");
            }
        }
        debug!(name = %self.config.thread_name, "Worker pool stopped");
    }
}

fn worker_loop(receiver: &Receiver<Job>) {
    while let Ok(job) = receiver.recv() {
        job();
    }
    trace!("Worker exiting, queue closed");
}
