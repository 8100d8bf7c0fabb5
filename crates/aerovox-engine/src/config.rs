//! Pool, throttle and session configuration, validation, and error types.

use std::error::Error;
use std::fmt;

/// Worker count used when the platform cannot report its parallelism.
pub const FALLBACK_WORKER_COUNT: usize = 8;

/// Upper bound on voxelization workers.
pub const MAX_WORKER_COUNT: usize = 64;

// ── PoolConfig ─────────────────────────────────────────────────────

/// Configuration for [`VoxelizationPool`](crate::pool::VoxelizationPool).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, falling back to 8).
    pub worker_count: Option<usize>,
}

impl PoolConfig {
    /// Pool with exactly `n` workers.
    pub fn with_workers(n: usize) -> Self {
        Self {
            worker_count: Some(n),
        }
    }

    /// Reject configurations that could never run a job.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_count == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        let n = match self.worker_count {
            Some(n) => n,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(FALLBACK_WORKER_COUNT),
        };
        n.clamp(1, MAX_WORKER_COUNT)
    }
}

// ── ThrottleConfig ─────────────────────────────────────────────────

/// Configuration for [`VoxelUpdateThrottle`](crate::throttle::VoxelUpdateThrottle).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Minimum host ticks between two voxelization passes. Default: 10.
    ///
    /// Deferred updates re-arm at `min_ticks_per_update - 2`, so the value
    /// must be at least 2.
    pub min_ticks_per_update: u32,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_ticks_per_update: 10,
        }
    }
}

impl ThrottleConfig {
    /// Check the minimum interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_ticks_per_update < 2 {
            return Err(ConfigError::ThrottleTooTight {
                configured: self.min_ticks_per_update,
            });
        }
        Ok(())
    }
}

// ── SessionConfig ──────────────────────────────────────────────────

/// Configuration for [`VoxelSession`](crate::session::VoxelSession).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Worker pool settings.
    pub pool: PoolConfig,
    /// Update rate limiting.
    pub throttle: ThrottleConfig,
}

impl SessionConfig {
    /// Validate every sub-configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pool.validate()?;
        self.throttle.validate()
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while validating configuration or starting threads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An explicit worker count of zero.
    ZeroWorkers,
    /// `min_ticks_per_update` is below 2.
    ThrottleTooTight {
        /// The configured value.
        configured: u32,
    },
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroWorkers => write!(f, "worker_count must be at least 1"),
            Self::ThrottleTooTight { configured } => {
                write!(f, "min_ticks_per_update {configured} is below minimum of 2")
            }
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}
