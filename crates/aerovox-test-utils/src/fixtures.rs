//! Reusable vehicle fixtures.
//!
//! - [`light_aircraft_derivatives`]: a four-seat general-aviation aircraft
//!   at cruise, with a small product of inertia so lateral coupling is
//!   exercised.
//! - [`light_aircraft_trim`]: the matching trim condition over Earth.
//! - [`fuselage_slices`]: a smooth area distribution with a single peak.

use aerovox_core::{
    GravityBody, SliceSample, StabilityDerivatives, TrimCondition, VoxelSliceData,
};

/// Cruise speed of the light-aircraft fixture (m/s).
pub const LIGHT_AIRCRAFT_U0: f64 = 67.0;

/// Dimensional derivatives (already divided by mass or inertia) of a
/// light aircraft at cruise.
pub fn light_aircraft_derivatives() -> StabilityDerivatives {
    StabilityDerivatives {
        ixx: 1285.0,
        iyy: 1825.0,
        izz: 2667.0,
        z_w: -2.06,
        x_w: 0.036,
        m_w: -0.05,
        z_u: -0.36,
        x_u: -0.045,
        m_u: 0.0,
        z_q: 0.0,
        x_q: 0.0,
        m_q: -2.05,
        z_de: -28.15,
        x_de: 0.0,
        m_de: -11.87,
        y_beta: -45.72,
        l_beta: -30.19,
        n_beta: 12.9,
        y_p: 0.0,
        l_p: -8.4,
        n_p: -0.35,
        y_r: 0.0,
        l_r: 2.19,
        n_r: -0.76,
        ixy: 0.0,
        iyz: 0.0,
        ixz: 60.0,
    }
}

/// Level cruise at 1500 m, 2° angle of attack.
pub fn light_aircraft_trim() -> TrimCondition {
    TrimCondition::over_body(&GravityBody::EARTH, LIGHT_AIRCRAFT_U0, 1500.0, 2.0, 11.0, 1.5)
}

/// `n` slices whose area follows a half-sine peaking at `peak_area`.
pub fn fuselage_slices(n: usize, peak_area: f64) -> VoxelSliceData {
    let slices = (0..n)
        .map(|i| {
            let s = if n > 1 {
                i as f64 / (n - 1) as f64
            } else {
                0.5
            };
            let phase = std::f64::consts::PI * s;
            SliceSample {
                area: peak_area * phase.sin(),
                area_second_deriv: -peak_area * std::f64::consts::PI.powi(2) * phase.sin(),
                pressure_coeff: 0.1 * phase.cos(),
            }
        })
        .collect();
    VoxelSliceData::new(slices)
}
