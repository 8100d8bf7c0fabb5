//! Host-side orchestration of voxelization passes.
//!
//! A [`VoxelSession`] lives on the host thread and is ticked once per
//! frame. Each tick pumps main-thread requests from the workers, folds
//! finished passes into the current [`AreaRulingSummary`], and starts a new
//! pass when the throttle says one is due and none is running.
//!
//! The geometric kernel itself is a collaborator behind the
//! [`GeometryKernel`] trait.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::{Duration, Instant};

use aerovox_core::{SonicSummary, VoxelSliceData};
use aerovox_dynamics::{aggregate, AreaRulingSummary};
use crossbeam_channel::{Receiver, Sender};

use crate::config::{ConfigError, SessionConfig};
use crate::dispatch::{DispatchError, MainThreadDispatcher, MainThreadHandle, PumpReport};
use crate::metrics::PoolMetrics;
use crate::pool::{panic_message, ShutdownReport, SubmitError, VoxelizationPool};
use crate::throttle::VoxelUpdateThrottle;

// ── Kernel seam ──────────────────────────────────────────────────

/// Slices the vehicle into cross-sections. Runs on a pool worker.
///
/// Host APIs must go through `host`; the call blocks until the host's next
/// tick services it.
pub trait GeometryKernel: Send + Sync + 'static {
    /// Produce one pass of slice data.
    fn voxelize(&self, host: &MainThreadHandle) -> Result<VoxelPass, KernelError>;
}

/// Output of one voxelization pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoxelPass {
    /// Per-slice samples, slice 0 farthest along the axis.
    pub slices: VoxelSliceData,
    /// Slice thickness (m).
    pub section_thickness: f64,
    /// Axis position of the last slice (m).
    pub first_section_offset: f64,
    /// Transonic figures from the aerodynamic model.
    pub sonic: SonicSummary,
}

/// Why a voxelization pass produced nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum KernelError {
    /// Some part geometry is still loading; retry later.
    GeometryNotReady,
    /// A main-thread request failed.
    Host(DispatchError),
    /// The kernel panicked.
    Panicked {
        /// Panic message.
        message: String,
    },
    /// Any other kernel failure.
    Failed {
        /// Description from the kernel.
        reason: String,
    },
}

impl std::fmt::Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GeometryNotReady => write!(f, "geometry not ready"),
            Self::Host(e) => write!(f, "host dispatch: {e}"),
            Self::Panicked { message } => write!(f, "kernel panicked: {message}"),
            Self::Failed { reason } => write!(f, "voxelization failed: {reason}"),
        }
    }
}

impl std::error::Error for KernelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DispatchError> for KernelError {
    fn from(e: DispatchError) -> Self {
        Self::Host(e)
    }
}

// ── TickReport ───────────────────────────────────────────────────

/// What one [`VoxelSession::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Main-thread requests serviced.
    pub pumped: PumpReport,
    /// Passes folded into the summary.
    pub passes_completed: usize,
    /// Passes that came back with an error.
    pub passes_failed: usize,
    /// Whether a new pass was queued.
    pub pass_started: bool,
}

struct PassOutcome {
    result: Result<VoxelPass, KernelError>,
    elapsed: Duration,
}

// ── VoxelSession ─────────────────────────────────────────────────

/// Pool, dispatcher and throttle for one edited vehicle.
///
/// Pinned to the thread that created it (it owns the
/// [`MainThreadDispatcher`]).
pub struct VoxelSession<K: GeometryKernel> {
    kernel: Arc<K>,
    pool: VoxelizationPool,
    dispatcher: MainThreadDispatcher,
    throttle: VoxelUpdateThrottle,
    completions_tx: Sender<PassOutcome>,
    completions_rx: Receiver<PassOutcome>,
    in_flight: bool,
    summary: AreaRulingSummary,
    passes_applied: u64,
}

impl<K: GeometryKernel> VoxelSession<K> {
    /// Start the pool and bind the dispatcher to the calling thread.
    pub fn new(kernel: K, config: &SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let throttle = VoxelUpdateThrottle::new(&config.throttle)?;
        let pool = VoxelizationPool::new(&config.pool)?;
        let (completions_tx, completions_rx) = crossbeam_channel::unbounded();
        Ok(Self {
            kernel: Arc::new(kernel),
            pool,
            dispatcher: MainThreadDispatcher::new(),
            throttle,
            completions_tx,
            completions_rx,
            in_flight: false,
            summary: AreaRulingSummary::default(),
            passes_applied: 0,
        })
    }

    /// The vehicle changed; schedule a pass.
    pub fn request_update(&mut self) {
        self.throttle.request_update();
    }

    /// Per-frame work. Call once per host tick.
    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport {
            pumped: self.dispatcher.pump_pending_tasks(),
            ..Default::default()
        };

        while let Ok(outcome) = self.completions_rx.try_recv() {
            self.in_flight = false;
            match outcome.result {
                Ok(pass) => {
                    log::info!(
                        "voxelization time (ms): {}, {} slices",
                        outcome.elapsed.as_millis(),
                        pass.slices.len()
                    );
                    self.summary = aggregate(
                        &pass.slices,
                        pass.section_thickness,
                        pass.first_section_offset,
                        pass.sonic,
                    );
                    self.passes_applied += 1;
                    report.passes_completed += 1;
                }
                Err(e) => {
                    log::warn!("voxelization pass failed, keeping previous cross-sections: {e}");
                    self.throttle.defer();
                    report.passes_failed += 1;
                }
            }
        }

        if self.throttle.on_tick() {
            if self.in_flight {
                self.throttle.defer();
            } else {
                match self.start_pass() {
                    Ok(()) => report.pass_started = true,
                    Err(e) => {
                        log::warn!("could not queue voxelization pass: {e}");
                        self.throttle.defer();
                    }
                }
            }
        }

        report
    }

    fn start_pass(&mut self) -> Result<(), SubmitError> {
        let kernel = Arc::clone(&self.kernel);
        let host = self.dispatcher.handle();
        let completions = self.completions_tx.clone();
        self.pool.queue_voxelization(move || {
            let start = Instant::now();
            let result = panic::catch_unwind(AssertUnwindSafe(|| kernel.voxelize(&host)))
                .unwrap_or_else(|payload| {
                    Err(KernelError::Panicked {
                        message: panic_message(payload.as_ref()),
                    })
                });
            let _ = completions.send(PassOutcome {
                result,
                elapsed: start.elapsed(),
            });
        })?;
        self.in_flight = true;
        log::debug!("voxelization pass queued");
        Ok(())
    }

    /// Cross-sections from the latest successful pass.
    pub fn summary(&self) -> &AreaRulingSummary {
        &self.summary
    }

    /// Successful passes folded in so far.
    pub fn passes_applied(&self) -> u64 {
        self.passes_applied
    }

    /// Whether a pass is queued or running.
    pub fn is_pass_in_flight(&self) -> bool {
        self.in_flight
    }

    /// The update throttle.
    pub fn throttle(&self) -> &VoxelUpdateThrottle {
        &self.throttle
    }

    /// Pool counters.
    pub fn pool_metrics(&self) -> PoolMetrics {
        self.pool.metrics()
    }

    /// Main-thread requests waiting for the next tick.
    pub fn pending_host_tasks(&self) -> usize {
        self.dispatcher.pending_len()
    }

    /// A handle for other host-API consumers running on the pool.
    pub fn host_handle(&self) -> MainThreadHandle {
        self.dispatcher.handle()
    }

    /// Close the dispatcher and join the pool.
    ///
    /// Workers blocked on a main-thread request are released with
    /// [`DispatchError::Abandoned`] first, so a pass stuck waiting for a
    /// tick cannot hold up the join.
    pub fn shutdown(&mut self) -> ShutdownReport {
        self.dispatcher.close();
        self.pool.shutdown()
    }
}

impl<K: GeometryKernel> Drop for VoxelSession<K> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<K: GeometryKernel> std::fmt::Debug for VoxelSession<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoxelSession")
            .field("pool", &self.pool)
            .field("throttle", &self.throttle)
            .field("in_flight", &self.in_flight)
            .field("passes_applied", &self.passes_applied)
            .finish()
    }
}
