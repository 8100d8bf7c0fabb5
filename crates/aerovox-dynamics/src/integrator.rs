//! Fixed-step classical Runge–Kutta integration of `ẋ = A·x`.
//!
//! The solver is stateless: every call allocates its own [`Trajectory`]
//! and the arithmetic is a fixed sequence of operations, so identical
//! inputs give bit-identical outputs.
//!
//! Sample times are computed as `k·dt` rather than by accumulating `dt`,
//! so the time axis does not drift over long runs.

use aerovox_core::{IntegrationError, StateMatrix, StateVector, Trajectory, STATE_DIM};

/// Upper bound on samples per run; guards against `dt` typos like 1e-12.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Slack when deciding whether `duration` lands on a step boundary.
const STEP_EPSILON: f64 = 1e-9;

/// Number of samples a run over `[0, duration]` at step `dt` produces.
///
/// Includes `t = 0` and every `k·dt` that does not exceed `duration`
/// (with a relative slack of 1e-9 steps so `10.0 / 0.1` yields 101
/// samples despite rounding).
pub fn sample_count(dt: f64, duration: f64) -> Result<usize, IntegrationError> {
    if !dt.is_finite() || dt <= 0.0 {
        return Err(IntegrationError::InvalidStep { dt });
    }
    if !duration.is_finite() || duration < 0.0 {
        return Err(IntegrationError::InvalidDuration { duration });
    }
    let steps = (duration / dt + STEP_EPSILON).floor();
    let samples = steps + 1.0;
    if samples > MAX_SAMPLES as f64 {
        return Err(IntegrationError::TooManySamples { samples });
    }
    Ok(samples as usize)
}

/// Integrate `ẋ = A·x` from `initial` over `[0, duration]` at step `dt`.
///
/// The first sample is the initial state at `t = 0`.
pub fn integrate(
    a: &StateMatrix,
    initial: &StateVector,
    dt: f64,
    duration: f64,
) -> Result<Trajectory, IntegrationError> {
    let samples = sample_count(dt, duration)?;
    if let Some(channel) = initial.iter().position(|v| !v.is_finite()) {
        return Err(IntegrationError::NonFiniteState { channel });
    }

    let mut trajectory = Trajectory::with_capacity(samples);
    let mut x = *initial;
    trajectory.push(0.0, &x);
    for k in 1..samples {
        x = rk4_step(a, &x, dt);
        trajectory.push(k as f64 * dt, &x);
    }
    Ok(trajectory)
}

/// One classical RK4 step of `ẋ = A·x`.
pub fn rk4_step(a: &StateMatrix, x: &StateVector, dt: f64) -> StateVector {
    let half = 0.5 * dt;
    let k1 = a.mul_vec(x);
    let k2 = a.mul_vec(&axpy(x, half, &k1));
    let k3 = a.mul_vec(&axpy(x, half, &k2));
    let k4 = a.mul_vec(&axpy(x, dt, &k3));

    let sixth = dt / 6.0;
    let mut next = [0.0; STATE_DIM];
    for i in 0..STATE_DIM {
        next[i] = x[i] + sixth * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    next
}

/// `x + s·y`.
fn axpy(x: &StateVector, s: f64, y: &StateVector) -> StateVector {
    std::array::from_fn(|i| x[i] + s * y[i])
}
