//! Test fixtures and helpers for Aerovox development.
//!
//! Provides a representative light-aircraft derivative set and trim
//! condition, a fuselage-shaped slice distribution, and small
//! synchronization helpers for pool and dispatcher tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fuselage_slices, light_aircraft_derivatives, light_aircraft_trim, LIGHT_AIRCRAFT_U0,
};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Route `log` output through the test harness's captured stdout.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Shared counter handed to jobs so a test can see how many ran.
#[derive(Clone, Debug, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one call.
    pub fn bump(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// A `'static` closure that bumps this counter once.
    pub fn job(&self) -> impl FnOnce() + Send + 'static {
        let counter = self.clone();
        move || counter.bump()
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
///
/// Returns whether the condition was observed.
pub fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_jobs_share_state() {
        let counter = CallCounter::new();
        let a = counter.job();
        let b = counter.job();
        a();
        b();
        assert_eq!(counter.get(), 2);
    }

    #[test]
    fn wait_until_times_out() {
        assert!(!wait_until(Duration::from_millis(5), || false));
        assert!(wait_until(Duration::from_millis(5), || true));
    }
}
