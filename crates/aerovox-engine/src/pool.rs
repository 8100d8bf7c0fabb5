//! Fixed-size voxelization worker pool.
//!
//! Every worker runs the same loop: pop an item from the shared
//! [`BlockingTaskQueue`], run it if it is a job, exit if it is poison.
//! Callers never address a specific worker.
//!
//! [`VoxelizationPool::shutdown`] pushes exactly one poison item per live
//! worker and joins them all. Jobs queued before shutdown sit ahead of the
//! poison in the FIFO and still run; a job already running completes
//! normally. There is no cancellation.
//!
//! A panicking job is caught on the worker, logged, and counted. The
//! worker keeps serving the queue, so one bad pass never shrinks the pool.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crate::config::{ConfigError, PoolConfig};
use crate::metrics::{PoolCounters, PoolMetrics};
use crate::queue::BlockingTaskQueue;

/// A unit of voxelization work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// What travels through the pool's queue.
enum WorkItem {
    Run(Job),
    Poison,
}

// ── Error types ──────────────────────────────────────────────────

/// Error queueing work on the pool.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    /// The pool has shut down.
    Shutdown,
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shutdown => write!(f, "voxelization pool has shut down"),
        }
    }
}

impl std::error::Error for SubmitError {}

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`VoxelizationPool::shutdown`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Worker threads joined cleanly.
    pub workers_joined: usize,
    /// Worker threads whose join reported a panic.
    pub workers_panicked: usize,
    /// Total time spent draining and joining.
    pub total_ms: u64,
}

// ── VoxelizationPool ─────────────────────────────────────────────

/// An explicitly owned pool of voxelization workers.
pub struct VoxelizationPool {
    queue: BlockingTaskQueue<WorkItem>,
    workers: Vec<JoinHandle<()>>,
    counters: Arc<PoolCounters>,
    running: bool,
}

impl VoxelizationPool {
    /// Spawn `config.resolved_worker_count()` workers.
    ///
    /// If any spawn fails, the workers already started are shut down
    /// before the error is returned.
    pub fn new(config: &PoolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let worker_count = config.resolved_worker_count();

        let mut pool = Self {
            queue: BlockingTaskQueue::new(),
            workers: Vec::with_capacity(worker_count),
            counters: Arc::new(PoolCounters::default()),
            running: true,
        };

        for i in 0..worker_count {
            let queue = pool.queue.clone();
            let counters = Arc::clone(&pool.counters);
            let spawned = thread::Builder::new()
                .name(format!("aerovox-voxel-{i}"))
                .spawn(move || worker_loop(i, &queue, &counters));
            match spawned {
                Ok(handle) => pool.workers.push(handle),
                Err(e) => {
                    pool.shutdown();
                    return Err(ConfigError::ThreadSpawnFailed {
                        reason: format!("voxel worker {i}: {e}"),
                    });
                }
            }
        }

        log::debug!("voxelization pool started with {worker_count} workers");
        Ok(pool)
    }

    /// Queue one job for whichever worker is free first.
    pub fn queue_voxelization<F>(&self, job: F) -> Result<(), SubmitError>
    where
        F: FnOnce() + Send + 'static,
    {
        if !self.running {
            return Err(SubmitError::Shutdown);
        }
        self.counters.record_queued();
        self.queue.push(WorkItem::Run(Box::new(job)));
        Ok(())
    }

    /// Number of live workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool still accepts jobs.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Snapshot of the pool's counters.
    pub fn metrics(&self) -> PoolMetrics {
        self.counters.snapshot(self.workers.len(), self.queue.len())
    }

    /// Stop accepting jobs, poison every worker, and join them.
    ///
    /// Blocks until every worker has consumed its poison item. Calling
    /// this again returns an empty report.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if !self.running && self.workers.is_empty() {
            return ShutdownReport::default();
        }
        self.running = false;
        let start = Instant::now();

        for _ in 0..self.workers.len() {
            self.queue.push(WorkItem::Poison);
        }

        let mut workers_joined = 0;
        let mut workers_panicked = 0;
        for handle in self.workers.drain(..) {
            if handle.join().is_ok() {
                workers_joined += 1;
            } else {
                workers_panicked += 1;
            }
        }

        let total_ms = start.elapsed().as_millis() as u64;
        log::debug!(
            "voxelization pool stopped: {workers_joined} joined, \
             {workers_panicked} panicked in {total_ms} ms"
        );
        ShutdownReport {
            workers_joined,
            workers_panicked,
            total_ms,
        }
    }
}

impl Drop for VoxelizationPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for VoxelizationPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelizationPool")
            .field("workers", &self.workers.len())
            .field("running", &self.running)
            .field("queue_depth", &self.queue.len())
            .finish()
    }
}

fn worker_loop(index: usize, queue: &BlockingTaskQueue<WorkItem>, counters: &PoolCounters) {
    log::debug!("voxel worker {index} started");
    loop {
        match queue.pop_blocking() {
            WorkItem::Run(job) => {
                let outcome = panic::catch_unwind(AssertUnwindSafe(job));
                if let Err(payload) = &outcome {
                    log::error!(
                        "voxel worker {index}: job panicked: {}",
                        panic_message(payload.as_ref())
                    );
                }
                counters.record_executed(outcome.is_err());
            }
            WorkItem::Poison => break,
        }
    }
    log::debug!("voxel worker {index} exiting");
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
