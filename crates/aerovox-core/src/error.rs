//! Error types for the Aerovox estimator.
//!
//! Organized by subsystem: derivative layout conversion, state-space
//! assembly, and fixed-step integration. Engine-side errors (pool
//! submission, main-thread dispatch, configuration) live next to the
//! code that raises them in `aerovox-engine`.

use std::error::Error;
use std::fmt;

use crate::matrix::MotionAxis;

/// Errors converting between the flat 27-slot layout and
/// [`StabilityDerivatives`](crate::StabilityDerivatives).
#[derive(Clone, Debug, PartialEq)]
pub enum DerivativeError {
    /// The slot sequence did not contain exactly 27 entries.
    WrongLength {
        /// Number of entries supplied.
        got: usize,
    },
}

impl fmt::Display for DerivativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { got } => write!(
                f,
                "derivative vector must have {} slots, got {got}",
                crate::DERIVATIVE_COUNT
            ),
        }
    }
}

impl Error for DerivativeError {}

/// Degenerate physical inputs rejected by the state-space assembler.
///
/// The integrator cannot judge whether a matrix is physically plausible,
/// so every input that would otherwise leak NaN or infinity into the
/// matrix is rejected here.
#[derive(Clone, Debug, PartialEq)]
pub enum AssemblyError {
    /// Nominal velocity is zero, negative zero, or not finite.
    InvalidVelocity {
        /// The rejected velocity.
        value: f64,
    },
    /// A principal moment of inertia needed for cross-coupling is zero
    /// or not finite.
    ZeroInertia {
        /// Name of the offending inertia term (`"Ixx"` or `"Izz"`).
        term: &'static str,
    },
    /// `1 - Ixz²/(Ixx·Izz)` is zero, so the roll/yaw coupling cannot be solved.
    SingularInertiaCoupling {
        /// The vanishing denominator.
        denominator: f64,
    },
    /// An input derivative or trim scalar is NaN or infinite.
    NonFiniteInput {
        /// Label of the offending quantity.
        name: &'static str,
    },
    /// Assembly completed but produced a non-finite matrix entry.
    NonFiniteResult {
        /// Which matrix was being built.
        axis: MotionAxis,
        /// Row of the offending entry.
        row: usize,
        /// Column of the offending entry.
        col: usize,
    },
}

impl fmt::Display for AssemblyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidVelocity { value } => {
                write!(f, "nominal velocity must be finite and non-zero, got {value}")
            }
            Self::ZeroInertia { term } => write!(f, "inertia term {term} is zero"),
            Self::SingularInertiaCoupling { denominator } => write!(
                f,
                "roll/yaw inertia coupling is singular (1 - Ixz²/(Ixx·Izz) = {denominator})"
            ),
            Self::NonFiniteInput { name } => write!(f, "input {name} is not finite"),
            Self::NonFiniteResult { axis, row, col } => {
                write!(f, "{axis} matrix entry [{row}, {col}] is not finite")
            }
        }
    }
}

impl Error for AssemblyError {}

/// Errors from the fixed-step integrator.
#[derive(Clone, Debug, PartialEq)]
pub enum IntegrationError {
    /// Time step is zero, negative, or not finite.
    InvalidStep {
        /// The rejected step.
        dt: f64,
    },
    /// Total duration is negative or not finite.
    InvalidDuration {
        /// The rejected duration.
        duration: f64,
    },
    /// The initial state contains NaN or infinity.
    NonFiniteState {
        /// Index of the first non-finite component.
        channel: usize,
    },
    /// The requested sample count does not fit in memory bounds.
    TooManySamples {
        /// Number of samples the step/duration pair would produce.
        samples: f64,
    },
}

impl fmt::Display for IntegrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { dt } => write!(f, "time step must be finite and positive, got {dt}"),
            Self::InvalidDuration { duration } => {
                write!(f, "duration must be finite and non-negative, got {duration}")
            }
            Self::NonFiniteState { channel } => {
                write!(f, "initial state channel {channel} is not finite")
            }
            Self::TooManySamples { samples } => {
                write!(f, "integration would produce {samples} samples")
            }
        }
    }
}

impl Error for IntegrationError {}
