//! Transient-response preview: assemble, integrate, and prepare display
//! series.
//!
//! The integrator's contract stops at the raw [`Trajectory`]. This module
//! is the glue the editor display uses: it converts angular channels to
//! degrees, clamps every series to ±[`DISPLAY_CLAMP`], and keeps the last
//! good response on screen when a new run fails.

use std::error::Error;
use std::fmt;

use aerovox_core::{
    AssemblyError, IntegrationError, MotionAxis, StabilityDerivatives, StateMatrix, StateVector,
    Trajectory, TrimCondition, STATE_DIM,
};
use indexmap::IndexMap;

use crate::assembler::{assemble_lateral, assemble_longitudinal};
use crate::integrator::integrate;

/// Symmetric bound applied to every display series.
pub const DISPLAY_CLAMP: f64 = 50.0;

const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

// ── Settings ────────────────────────────────────────────────────

/// Inputs for one transient run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransientSettings {
    /// Simulated time span (s). Default: 10.
    pub end_time: f64,
    /// Fixed integration step (s). Default: 0.01.
    pub dt: f64,
    /// Initial perturbation state. Default: all zero.
    pub initial_state: StateVector,
}

impl Default for TransientSettings {
    fn default() -> Self {
        Self {
            end_time: 10.0,
            dt: 0.01,
            initial_state: [0.0; STATE_DIM],
        }
    }
}

// ── SimulationError ─────────────────────────────────────────────

/// A transient run failed before producing a response.
#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// The state matrix could not be built.
    Assembly(AssemblyError),
    /// The integrator rejected its inputs.
    Integration(IntegrationError),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assembly(e) => write!(f, "assembly: {e}"),
            Self::Integration(e) => write!(f, "integration: {e}"),
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Assembly(e) => Some(e),
            Self::Integration(e) => Some(e),
        }
    }
}

impl From<AssemblyError> for SimulationError {
    fn from(e: AssemblyError) -> Self {
        Self::Assembly(e)
    }
}

impl From<IntegrationError> for SimulationError {
    fn from(e: IntegrationError) -> Self {
        Self::Integration(e)
    }
}

// ── TransientResponse ───────────────────────────────────────────

/// Result of one transient run, ready for display.
#[derive(Clone, Debug, PartialEq)]
pub struct TransientResponse {
    /// Which motion was simulated.
    pub axis: MotionAxis,
    /// The assembled `A`.
    pub matrix: StateMatrix,
    /// Raw integrator output in SI units and radians.
    pub trajectory: Trajectory,
    /// Display series keyed by channel label, in state order.
    pub series: IndexMap<&'static str, Vec<f64>>,
}

impl TransientResponse {
    /// The shared time axis of every series.
    pub fn time(&self) -> &[f64] {
        self.trajectory.time()
    }
}

/// Display scale per channel: velocities stay in m/s, angles and rates
/// go to degrees.
fn display_scales(axis: MotionAxis) -> [f64; STATE_DIM] {
    match axis {
        MotionAxis::Longitudinal => [1.0, 1.0, RAD_TO_DEG, RAD_TO_DEG],
        MotionAxis::Lateral => [RAD_TO_DEG; STATE_DIM],
    }
}

/// Multiply every value by `factor` and clamp to `[-bound, bound]`.
pub fn scale_and_clamp(values: &[f64], factor: f64, bound: f64) -> Vec<f64> {
    values
        .iter()
        .map(|v| (v * factor).clamp(-bound, bound))
        .collect()
}

/// Run the longitudinal transient `(w, u, q, θ)`.
pub fn simulate_longitudinal(
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
    settings: &TransientSettings,
) -> Result<TransientResponse, SimulationError> {
    simulate(MotionAxis::Longitudinal, derivs, trim, settings)
}

/// Run the lateral transient `(β, p, r, φ)`.
pub fn simulate_lateral(
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
    settings: &TransientSettings,
) -> Result<TransientResponse, SimulationError> {
    simulate(MotionAxis::Lateral, derivs, trim, settings)
}

/// Run the transient for `axis`.
pub fn simulate(
    axis: MotionAxis,
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
    settings: &TransientSettings,
) -> Result<TransientResponse, SimulationError> {
    let matrix = match axis {
        MotionAxis::Longitudinal => assemble_longitudinal(derivs, trim)?,
        MotionAxis::Lateral => assemble_lateral(derivs, trim)?,
    };
    log::debug!("{axis} state matrix:\n{matrix}");

    let trajectory = integrate(&matrix, &settings.initial_state, settings.dt, settings.end_time)?;

    let series = axis
        .channel_labels()
        .into_iter()
        .zip(display_scales(axis))
        .enumerate()
        .map(|(c, (label, scale))| {
            (
                label,
                scale_and_clamp(trajectory.channel(c), scale, DISPLAY_CLAMP),
            )
        })
        .collect();

    Ok(TransientResponse {
        axis,
        matrix,
        trajectory,
        series,
    })
}

// ── TransientPreview ────────────────────────────────────────────

/// The responses currently on display.
///
/// A failed run never blanks the display: the previous response for that
/// axis stays, and the failure is kept as a diagnostic message.
#[derive(Clone, Debug, Default)]
pub struct TransientPreview {
    longitudinal: Option<TransientResponse>,
    lateral: Option<TransientResponse>,
    diagnostic: Option<String>,
}

impl TransientPreview {
    /// Empty preview.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the outcome of a run for `axis`.
    ///
    /// Returns `true` if the display changed.
    pub fn apply(
        &mut self,
        axis: MotionAxis,
        outcome: Result<TransientResponse, SimulationError>,
    ) -> bool {
        match outcome {
            Ok(response) => {
                self.diagnostic = None;
                *self.slot_mut(axis) = Some(response);
                true
            }
            Err(e) => {
                log::warn!("{axis} transient run failed, keeping previous response: {e}");
                self.diagnostic = Some(format!("{axis} stability derivative run failed: {e}"));
                false
            }
        }
    }

    /// Response currently shown for `axis`.
    pub fn response(&self, axis: MotionAxis) -> Option<&TransientResponse> {
        match axis {
            MotionAxis::Longitudinal => self.longitudinal.as_ref(),
            MotionAxis::Lateral => self.lateral.as_ref(),
        }
    }

    /// Message describing the most recent failure, cleared by the next
    /// successful run.
    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    fn slot_mut(&mut self, axis: MotionAxis) -> &mut Option<TransientResponse> {
        match axis {
            MotionAxis::Longitudinal => &mut self.longitudinal,
            MotionAxis::Lateral => &mut self.lateral,
        }
    }
}
