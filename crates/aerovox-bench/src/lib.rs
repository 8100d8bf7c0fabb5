//! Benchmark profiles for the Aerovox estimator.
//!
//! - [`stiff_profile`]: a fast, strongly damped aircraft whose short-period
//!   mode stresses the integrator at the default 0.01 s step
//! - [`long_fuselage`]: a 500-slice pass for area-ruling aggregation
//! - [`spin_work`]: deterministic CPU-bound busy work standing in for a
//!   voxelization job

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use aerovox_core::{
    GravityBody, SliceSample, SonicSummary, StabilityDerivatives, TrimCondition, VoxelSliceData,
};
use aerovox_engine::VoxelPass;

/// Derivatives and trim of a jet trainer at 200 m/s.
pub fn stiff_profile() -> (StabilityDerivatives, TrimCondition) {
    let derivs = StabilityDerivatives {
        ixx: 8_000.0,
        iyy: 30_000.0,
        izz: 36_000.0,
        ixz: 900.0,
        z_w: -3.2,
        x_w: 0.05,
        m_w: -0.4,
        z_u: -0.1,
        x_u: -0.02,
        z_q: -4.0,
        m_q: -6.5,
        z_de: -40.0,
        m_de: -30.0,
        y_beta: -120.0,
        l_beta: -45.0,
        n_beta: 20.0,
        y_p: -0.5,
        l_p: -12.0,
        n_p: -0.8,
        y_r: 1.5,
        l_r: 3.0,
        n_r: -2.2,
        ..Default::default()
    };
    let trim = TrimCondition::over_body(&GravityBody::EARTH, 200.0, 6_000.0, 1.5, 9.0, 2.4);
    (derivs, trim)
}

/// A 500-slice fuselage pass with a cusp at the wing root.
pub fn long_fuselage() -> VoxelPass {
    let n = 500;
    let slices = (0..n)
        .map(|i| {
            let s = i as f64 / (n - 1) as f64;
            let body = (std::f64::consts::PI * s).sin();
            let wing = if (0.45..0.55).contains(&s) { 0.4 } else { 0.0 };
            SliceSample {
                area: 2.0 * body + wing,
                area_second_deriv: -2.0 * std::f64::consts::PI.powi(2) * body,
                pressure_coeff: 0.05 * (1.0 - 2.0 * s),
            }
        })
        .collect();
    VoxelPass {
        slices: VoxelSliceData::new(slices),
        section_thickness: 0.03,
        first_section_offset: -7.5,
        sonic: SonicSummary {
            sonic_drag_area: 0.9,
            critical_mach: 0.78,
        },
    }
}

/// Deterministic busy work: `rounds` iterations of an xorshift mix.
pub fn spin_work(rounds: u32) -> u64 {
    let mut x = 0x9E37_79B9_7F4A_7C15u64;
    for _ in 0..rounds {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
    }
    x
}
