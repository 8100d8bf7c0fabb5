//! Trim conditions: the steady reference flight state the dynamics are
//! linearized about.

/// A gravitating body the vehicle flies over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GravityBody {
    /// Standard gravitational parameter μ (m³/s²).
    pub gravitational_parameter: f64,
    /// Mean radius (m).
    pub radius: f64,
}

impl GravityBody {
    /// Earth, for tests and defaults.
    pub const EARTH: Self = Self {
        gravitational_parameter: 3.986_004_418e14,
        radius: 6_371_000.0,
    };

    /// Gravity at `altitude` less the centripetal relief of level flight
    /// at `velocity`: `μ/r² - v²/r` with `r = radius + altitude`.
    pub fn effective_gravity(&self, altitude: f64, velocity: f64) -> f64 {
        let r = self.radius + altitude;
        self.gravitational_parameter / (r * r) - velocity * velocity / r
    }
}

/// Scalar trim inputs consumed by the state-space assembler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimCondition {
    /// Nominal airspeed `u0` (m/s).
    pub nominal_velocity: f64,
    /// Reference span `b` (m).
    pub reference_span: f64,
    /// Mean aerodynamic chord (m).
    pub reference_chord: f64,
    /// Altitude above the body's mean radius (m).
    pub altitude: f64,
    /// Effective gravity at this altitude and speed (m/s²).
    pub effective_gravity: f64,
    /// Trim angle of attack (degrees).
    pub trim_aoa_deg: f64,
}

impl TrimCondition {
    /// Trim condition whose effective gravity is derived from `body`.
    pub fn over_body(
        body: &GravityBody,
        nominal_velocity: f64,
        altitude: f64,
        trim_aoa_deg: f64,
        reference_span: f64,
        reference_chord: f64,
    ) -> Self {
        Self {
            nominal_velocity,
            reference_span,
            reference_chord,
            altitude,
            effective_gravity: body.effective_gravity(altitude, nominal_velocity),
            trim_aoa_deg,
        }
    }

    /// Trim angle of attack in radians.
    pub fn trim_aoa_rad(&self) -> f64 {
        self.trim_aoa_deg.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_gravity_at_rest_is_surface_gravity() {
        let g = GravityBody::EARTH.effective_gravity(0.0, 0.0);
        assert!((g - 9.82).abs() < 0.01, "got {g}");
    }

    #[test]
    fn orbital_speed_cancels_gravity() {
        let body = GravityBody::EARTH;
        let r = body.radius + 100_000.0;
        let v_orbit = (body.gravitational_parameter / r).sqrt();
        let g = body.effective_gravity(100_000.0, v_orbit);
        assert!(g.abs() < 1e-9, "got {g}");
    }

    #[test]
    fn over_body_fills_effective_gravity() {
        let trim = TrimCondition::over_body(&GravityBody::EARTH, 100.0, 1000.0, 4.0, 10.0, 1.5);
        let expected = GravityBody::EARTH.effective_gravity(1000.0, 100.0);
        assert_eq!(trim.effective_gravity, expected);
        assert!((trim.trim_aoa_rad() - 4.0f64.to_radians()).abs() < 1e-15);
    }
}
