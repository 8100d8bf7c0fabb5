//! Aerovox: background voxelization and stability-derivative transient
//! preview for vehicle editors.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Aerovox sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use aerovox::prelude::*;
//!
//! let mut derivs = StabilityDerivatives::default();
//! derivs.ixx = 1.0;
//! derivs.izz = 1.0;
//! derivs.z_w = -1.5;
//! derivs.m_q = -2.0;
//!
//! let trim = TrimCondition::over_body(&GravityBody::EARTH, 50.0, 500.0, 3.0, 10.0, 1.2);
//! let settings = TransientSettings {
//!     initial_state: [0.0, 0.0, 0.1, 0.0],
//!     ..Default::default()
//! };
//! let response = simulate_longitudinal(&derivs, &trim, &settings).unwrap();
//! assert_eq!(response.time().len(), 1001);
//! assert!(response.series["q"].iter().all(|v| v.abs() <= 50.0));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `aerovox-core` | Derivative record, state matrix, trajectory, slices, trim |
//! | [`dynamics`] | `aerovox-dynamics` | Assembler, RK4 integrator, area ruling, transient preview |
//! | [`engine`] | `aerovox-engine` | Worker pool, main-thread dispatcher, throttle, session |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Data model shared by every stage (`aerovox-core`).
pub use aerovox_core as types;

/// Pure numerics (`aerovox-dynamics`).
///
/// [`dynamics::assemble`] builds the state matrices,
/// [`dynamics::integrate`] advances them, and [`dynamics::simulate`] wraps
/// both for display.
pub use aerovox_dynamics as dynamics;

/// Threads and scheduling (`aerovox-engine`).
///
/// [`engine::VoxelSession`] is the usual entry point; the pool and
/// dispatcher are available on their own for custom hosts.
pub use aerovox_engine as engine;

/// Common imports for typical Aerovox usage.
///
/// ```rust
/// use aerovox::prelude::*;
/// ```
pub mod prelude {
    // Data model
    pub use aerovox_core::{
        GravityBody, MotionAxis, SliceSample, SonicSummary, StabilityDerivatives, StateMatrix,
        Trajectory, TrimCondition, VoxelSliceData,
    };

    // Errors
    pub use aerovox_core::{AssemblyError, DerivativeError, IntegrationError};

    // Numerics
    pub use aerovox_dynamics::{
        aggregate, assemble, integrate, simulate, simulate_lateral, simulate_longitudinal,
        AreaRulingSummary, SimulationError, StateSpaceModel, TransientPreview, TransientResponse,
        TransientSettings,
    };

    // Engine
    pub use aerovox_engine::{
        GeometryKernel, KernelError, MainThreadDispatcher, MainThreadHandle, PoolConfig,
        SessionConfig, ThrottleConfig, VoxelPass, VoxelSession, VoxelizationPool,
    };
}
