//! Core types for the Aerovox aerodynamics estimator.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! data model shared by the dynamics and engine crates: the stability
//! derivative record and its 27-slot layout, 4×4 state matrices, integrated
//! trajectories, voxel cross-section slices, trim conditions, and the error
//! types each subsystem reports.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod derivatives;
pub mod error;
pub mod matrix;
pub mod section;
pub mod trajectory;
pub mod trim;

pub use derivatives::{DerivativeVector, StabilityDerivatives, DERIVATIVE_COUNT};
pub use error::{AssemblyError, DerivativeError, IntegrationError};
pub use matrix::{MotionAxis, StateMatrix, StateVector, STATE_DIM};
pub use section::{SliceSample, SonicSummary, VoxelSliceData};
pub use trajectory::Trajectory;
pub use trim::{GravityBody, TrimCondition};
