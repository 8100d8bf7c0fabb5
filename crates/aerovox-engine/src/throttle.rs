//! Rate limiting of re-voxelization requests.
//!
//! Geometry edits arrive in bursts (dragging a part fires one event per
//! frame). The throttle counts host ticks since the last pass and only lets
//! a queued update through once at least `min_ticks_per_update` ticks have
//! passed. A request that lands after a long quiet period is pulled back to
//! fire two ticks later, so a burst collapses into one pass.

use crate::config::{ConfigError, ThrottleConfig};

/// Tick-counting limiter for voxelization passes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelUpdateThrottle {
    min_ticks: u32,
    ticks_since_update: u32,
    queued: bool,
}

impl VoxelUpdateThrottle {
    /// Throttle with nothing queued and the interval already elapsed.
    pub fn new(config: &ThrottleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            min_ticks: config.min_ticks_per_update,
            ticks_since_update: config.min_ticks_per_update,
            queued: false,
        })
    }

    /// Ask for a pass.
    pub fn request_update(&mut self) {
        // The counter saturates at the limit, so "at the limit" means idle.
        if self.ticks_since_update >= self.min_ticks {
            self.ticks_since_update = self.rearm_point();
        }
        self.queued = true;
    }

    /// Advance one host tick. Returns `true` when a pass should start now.
    pub fn on_tick(&mut self) -> bool {
        if self.ticks_since_update < self.min_ticks {
            self.ticks_since_update += 1;
            false
        } else if self.queued {
            self.ticks_since_update = 0;
            self.queued = false;
            true
        } else {
            false
        }
    }

    /// The pass could not start (geometry not ready, pass already in
    /// flight, kernel failure). Retry two ticks after the limit.
    pub fn defer(&mut self) {
        self.ticks_since_update = self.rearm_point();
        self.queued = true;
    }

    /// Whether an update is waiting.
    pub fn is_queued(&self) -> bool {
        self.queued
    }

    /// Ticks counted since the last pass started.
    pub fn ticks_since_update(&self) -> u32 {
        self.ticks_since_update
    }

    fn rearm_point(&self) -> u32 {
        self.min_ticks - 2
    }
}

impl Default for VoxelUpdateThrottle {
    fn default() -> Self {
        let min_ticks = ThrottleConfig::default().min_ticks_per_update;
        Self {
            min_ticks,
            ticks_since_update: min_ticks,
            queued: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle(min: u32) -> VoxelUpdateThrottle {
        VoxelUpdateThrottle::new(&ThrottleConfig {
            min_ticks_per_update: min,
        })
        .unwrap()
    }

    /// Ticks until `on_tick` fires, up to `limit`.
    fn ticks_to_fire(t: &mut VoxelUpdateThrottle, limit: u32) -> Option<u32> {
        (1..=limit).find(|_| t.on_tick())
    }

    #[test]
    fn idle_throttle_never_fires() {
        let mut t = throttle(10);
        assert_eq!(ticks_to_fire(&mut t, 100), None);
    }

    #[test]
    fn first_request_fires_after_debounce() {
        let mut t = throttle(10);
        t.request_update();
        assert_eq!(t.ticks_since_update(), 8);
        assert_eq!(ticks_to_fire(&mut t, 100), Some(3));
        assert!(!t.is_queued());
        assert_eq!(t.ticks_since_update(), 0);
    }

    #[test]
    fn request_soon_after_a_pass_waits_for_the_interval() {
        let mut t = throttle(10);
        t.request_update();
        assert!(ticks_to_fire(&mut t, 100).is_some());
        t.request_update();
        // Counter goes 0 → 10 over ten ticks, fires on the eleventh.
        assert_eq!(ticks_to_fire(&mut t, 100), Some(11));
    }

    #[test]
    fn request_after_long_quiet_is_debounced() {
        let mut t = throttle(10);
        t.request_update();
        assert!(ticks_to_fire(&mut t, 100).is_some());
        for _ in 0..25 {
            assert!(!t.on_tick());
        }
        assert_eq!(t.ticks_since_update(), 10);
        t.request_update();
        assert_eq!(t.ticks_since_update(), 8);
        assert_eq!(ticks_to_fire(&mut t, 100), Some(3));
    }

    #[test]
    fn burst_of_requests_yields_one_pass() {
        let mut t = throttle(4);
        t.request_update();
        assert_eq!(ticks_to_fire(&mut t, 10), Some(3));
        let mut fired = 0;
        for _ in 0..4 {
            t.request_update();
            if t.on_tick() {
                fired += 1;
            }
        }
        assert_eq!(fired, 0);
        assert_eq!(ticks_to_fire(&mut t, 10), Some(1));
        assert_eq!(ticks_to_fire(&mut t, 10), None);
    }

    #[test]
    fn defer_retries_two_ticks_after_limit() {
        let mut t = throttle(10);
        t.defer();
        assert!(t.is_queued());
        assert_eq!(ticks_to_fire(&mut t, 100), Some(3));
    }

    #[test]
    fn config_is_validated() {
        assert!(VoxelUpdateThrottle::new(&ThrottleConfig {
            min_ticks_per_update: 0
        })
        .is_err());
        assert_eq!(VoxelUpdateThrottle::default(), throttle(10));
    }
}
