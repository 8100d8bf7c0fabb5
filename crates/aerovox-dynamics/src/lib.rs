//! Numerics for the Aerovox estimator.
//!
//! Everything here is pure and stateless: the same inputs always give the
//! same outputs, and nothing needs locking. The pipeline is
//!
//! ```text
//! StabilityDerivatives + TrimCondition
//!        │  assembler::assemble_*
//!        ▼
//!   StateMatrix (A)
//!        │  integrator::integrate (classical RK4, fixed step)
//!        ▼
//!   Trajectory ──► transient::TransientResponse (scaled, clamped, labeled)
//! ```
//!
//! plus [`cross_section::aggregate`] for the area-ruling preview.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod assembler;
pub mod cross_section;
pub mod integrator;
pub mod transient;

pub use assembler::{assemble, assemble_lateral, assemble_longitudinal, StateSpaceModel};
pub use cross_section::{aggregate, AreaRulingSummary};
pub use integrator::{integrate, rk4_step, sample_count};
pub use transient::{
    scale_and_clamp, simulate, simulate_lateral, simulate_longitudinal, SimulationError,
    TransientPreview, TransientResponse, TransientSettings,
};
