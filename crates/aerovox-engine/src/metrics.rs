//! Counters for the voxelization pool.
//!
//! [`PoolMetrics`] is a point-in-time snapshot; the live counters are
//! atomics shared between the pool handle and its workers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of pool activity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolMetrics {
    /// Worker threads still running.
    pub worker_count: usize,
    /// Jobs accepted by `queue_voxelization` since construction.
    pub jobs_queued: u64,
    /// Jobs that ran to completion or panicked.
    pub jobs_executed: u64,
    /// Jobs whose closure panicked (subset of `jobs_executed`).
    pub jobs_panicked: u64,
    /// Items waiting in the task queue at snapshot time.
    pub queue_depth: usize,
}

#[derive(Debug, Default)]
pub(crate) struct PoolCounters {
    queued: AtomicU64,
    executed: AtomicU64,
    panicked: AtomicU64,
}

impl PoolCounters {
    pub(crate) fn record_queued(&self) {
        self.queued.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_executed(&self, panicked: bool) {
        if panicked {
            self.panicked.fetch_add(1, Ordering::Relaxed);
        }
        // Release so a reader that sees the count also sees the job's effects.
        self.executed.fetch_add(1, Ordering::Release);
    }

    pub(crate) fn snapshot(&self, worker_count: usize, queue_depth: usize) -> PoolMetrics {
        PoolMetrics {
            worker_count,
            jobs_queued: self.queued.load(Ordering::Relaxed),
            jobs_executed: self.executed.load(Ordering::Acquire),
            jobs_panicked: self.panicked.load(Ordering::Relaxed),
            queue_depth,
        }
    }
}
