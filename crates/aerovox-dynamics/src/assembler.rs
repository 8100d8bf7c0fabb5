//! State-space assembly from stability derivatives.
//!
//! Builds the longitudinal and lateral 4×4 `A` matrices of the
//! small-disturbance equations about a trim condition:
//!
//! ```text
//! longitudinal, x = (w, u, q, θ)        lateral, x = (β, p, r, φ)
//! [ Zw  Zu  Zq+u0   0  ]                [ Yβ/u0  Yp/u0  Yr/u0-1  g·cosα0/u0 ]
//! [ Xw  Xu  Xq     -g  ]                [ L'β    L'p    L'r      0          ]
//! [ Mw  Mu  Mq      0  ]                [ N'β    N'p    N'r      0          ]
//! [ 0   0   1       0  ]                [ 0      1      0        0          ]
//! ```
//!
//! The primed lateral moments fold in the roll/yaw product of inertia:
//! with `kx = Ixz/Ixx`, `kz = Ixz/Izz` and `k = 1/(1 - kx·kz)`,
//! `L' = k·(L + kx·N)` and `N' = k·(N + kz·L)`.
//!
//! Degenerate inputs (zero airspeed, zero inertia with a non-zero product
//! of inertia, a singular coupling denominator, non-finite values) are
//! rejected with [`AssemblyError`] so that NaN never reaches the integrator.

use aerovox_core::{AssemblyError, MotionAxis, StabilityDerivatives, StateMatrix, TrimCondition};

/// Both state matrices for one analysis run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StateSpaceModel {
    /// `A` for `(w, u, q, θ)`.
    pub longitudinal: StateMatrix,
    /// `A` for `(β, p, r, φ)`.
    pub lateral: StateMatrix,
}

/// Assemble both matrices, failing if either is rejected.
pub fn assemble(
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
) -> Result<StateSpaceModel, AssemblyError> {
    Ok(StateSpaceModel {
        longitudinal: assemble_longitudinal(derivs, trim)?,
        lateral: assemble_lateral(derivs, trim)?,
    })
}

/// Longitudinal `A` for states `(w, u, q, θ)`.
///
/// `Zq` gains `u0` to turn the pitch-rate derivative into the kinematic
/// `ẇ = … + u0·q` coupling. The pitch-control column (`Zδe, Xδe, Mδe`) is
/// not part of `A`; see
/// [`StabilityDerivatives::longitudinal_control`].
pub fn assemble_longitudinal(
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
) -> Result<StateMatrix, AssemblyError> {
    check_inputs(derivs, trim)?;
    let d = derivs;
    let u0 = trim.nominal_velocity;
    let g = trim.effective_gravity;

    log::debug!(
        "longitudinal assembly: u0={u0}, effg={g}, MAC/(2u0)={} (unused)",
        trim.reference_chord / (2.0 * u0)
    );

    let a = StateMatrix::from_rows([
        [d.z_w, d.z_u, d.z_q + u0, 0.0],
        [d.x_w, d.x_u, d.x_q, -g],
        [d.m_w, d.m_u, d.m_q, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ]);
    check_result(MotionAxis::Longitudinal, a)
}

/// Lateral `A` for states `(β, p, r, φ)`.
///
/// Side-force derivatives are divided by `u0` (turning accelerations into
/// sideslip rates) and the yaw-rate term loses 1 for the `-(1 - Yr/u0)`
/// kinematic coupling. Gravity enters through bank angle scaled by
/// `cos(α0)/u0`.
pub fn assemble_lateral(
    derivs: &StabilityDerivatives,
    trim: &TrimCondition,
) -> Result<StateMatrix, AssemblyError> {
    check_inputs(derivs, trim)?;
    let d = derivs;
    let u0 = trim.nominal_velocity;
    let g_bank = trim.effective_gravity * trim.trim_aoa_rad().cos();

    let coupling = InertiaCoupling::new(d)?;
    log::debug!(
        "lateral assembly: u0={u0}, effg·cos(α0)={g_bank}, Ixz/Ixx={}, Ixz/Izz={}, \
         (1 - Ixz²/(IxxIzz))⁻¹={}, b/(2u0)={} (unused)",
        coupling.kx,
        coupling.kz,
        coupling.inv,
        trim.reference_span / (2.0 * u0)
    );

    let (l_beta, n_beta) = coupling.apply(d.l_beta, d.n_beta);
    let (l_p, n_p) = coupling.apply(d.l_p, d.n_p);
    let (l_r, n_r) = coupling.apply(d.l_r, d.n_r);

    let a = StateMatrix::from_rows([
        [d.y_beta / u0, d.y_p / u0, d.y_r / u0 - 1.0, g_bank / u0],
        [l_beta, l_p, l_r, 0.0],
        [n_beta, n_p, n_r, 0.0],
        [0.0, 1.0, 0.0, 0.0],
    ]);
    check_result(MotionAxis::Lateral, a)
}

/// Roll/yaw coupling through the XZ product of inertia.
struct InertiaCoupling {
    kx: f64,
    kz: f64,
    inv: f64,
}

impl InertiaCoupling {
    fn new(d: &StabilityDerivatives) -> Result<Self, AssemblyError> {
        // Without a product of inertia the axes are uncoupled, whatever
        // the principal inertias are.
        if d.ixz == 0.0 {
            return Ok(Self {
                kx: 0.0,
                kz: 0.0,
                inv: 1.0,
            });
        }
        if d.ixx == 0.0 {
            return Err(AssemblyError::ZeroInertia { term: "Ixx" });
        }
        if d.izz == 0.0 {
            return Err(AssemblyError::ZeroInertia { term: "Izz" });
        }
        let kx = d.ixz / d.ixx;
        let kz = d.ixz / d.izz;
        let denominator = 1.0 - kx * kz;
        if denominator == 0.0 || !denominator.is_finite() {
            return Err(AssemblyError::SingularInertiaCoupling { denominator });
        }
        Ok(Self {
            kx,
            kz,
            inv: 1.0 / denominator,
        })
    }

    /// Solve the coupled (roll, yaw) pair for one motion variable.
    fn apply(&self, l: f64, n: f64) -> (f64, f64) {
        let l = l * self.inv;
        let n = n * self.inv;
        (l + self.kx * n, n + self.kz * l)
    }
}

fn check_inputs(derivs: &StabilityDerivatives, trim: &TrimCondition) -> Result<(), AssemblyError> {
    let u0 = trim.nominal_velocity;
    if u0 == 0.0 || !u0.is_finite() {
        return Err(AssemblyError::InvalidVelocity { value: u0 });
    }
    if !trim.effective_gravity.is_finite() {
        return Err(AssemblyError::NonFiniteInput {
            name: "effective gravity",
        });
    }
    if !trim.trim_aoa_deg.is_finite() {
        return Err(AssemblyError::NonFiniteInput { name: "trim AoA" });
    }
    if let Some(name) = derivs.first_non_finite() {
        return Err(AssemblyError::NonFiniteInput { name });
    }
    Ok(())
}

fn check_result(axis: MotionAxis, a: StateMatrix) -> Result<StateMatrix, AssemblyError> {
    match a.first_non_finite() {
        Some((row, col)) => Err(AssemblyError::NonFiniteResult { axis, row, col }),
        None => Ok(a),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerovox_core::DERIVATIVE_COUNT;

    fn trim(u0: f64) -> TrimCondition {
        TrimCondition {
            nominal_velocity: u0,
            reference_span: 10.0,
            reference_chord: 1.5,
            altitude: 0.0,
            effective_gravity: 9.81,
            trim_aoa_deg: 0.0,
        }
    }

    fn from_slots(pairs: &[(usize, f64)]) -> StabilityDerivatives {
        let mut slots = [0.0; DERIVATIVE_COUNT];
        for &(i, v) in pairs {
            slots[i] = v;
        }
        StabilityDerivatives::from(slots)
    }

    #[test]
    fn yaw_rate_kinematic_coupling() {
        // Only Yr set: Yr/u0 - 1 = 0.1 - 1.
        let d = from_slots(&[(21, 1.0)]);
        let a = assemble_lateral(&d, &trim(10.0)).unwrap();
        assert!((a.get(0, 2) - (-0.9)).abs() < 1e-15);
    }

    #[test]
    fn lateral_fixed_rows() {
        let d = from_slots(&[(0, 1200.0), (2, 2500.0), (26, -80.0), (15, -30.0), (18, 2.0), (21, 5.0)]);
        let mut t = trim(50.0);
        t.trim_aoa_deg = 30.0;
        let a = assemble_lateral(&d, &t).unwrap();

        let expected_g = 9.81 * 30.0f64.to_radians().cos() / 50.0;
        assert!((a.get(0, 3) - expected_g).abs() < 1e-15);
        assert_eq!(a.row(3), [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(a.get(1, 3), 0.0);
        assert_eq!(a.get(2, 3), 0.0);
        assert!((a.get(0, 0) - (-30.0 / 50.0)).abs() < 1e-15);
        assert!((a.get(0, 1) - (2.0 / 50.0)).abs() < 1e-15);
    }

    #[test]
    fn lateral_inertia_cross_coupling() {
        let ixx = 1000.0;
        let izz = 4000.0;
        let ixz = 500.0;
        let d = StabilityDerivatives {
            ixx,
            izz,
            ixz,
            l_beta: -2.0,
            n_beta: 1.0,
            l_p: -5.0,
            n_p: -0.2,
            l_r: 0.8,
            n_r: -0.6,
            ..Default::default()
        };
        let a = assemble_lateral(&d, &trim(100.0)).unwrap();

        let kx = ixz / ixx;
        let kz = ixz / izz;
        let k = 1.0 / (1.0 - kx * kz);
        let l = -2.0 * k;
        let n = 1.0 * k;
        assert!((a.get(1, 0) - (l + kx * n)).abs() < 1e-12);
        assert!((a.get(2, 0) - (n + kz * l)).abs() < 1e-12);

        let l = -5.0 * k;
        let n = -0.2 * k;
        assert!((a.get(1, 1) - (l + kx * n)).abs() < 1e-12);
        assert!((a.get(2, 1) - (n + kz * l)).abs() < 1e-12);
    }

    #[test]
    fn longitudinal_layout() {
        let d = StabilityDerivatives {
            z_w: -1.0,
            x_w: 0.1,
            m_w: -0.05,
            z_u: -0.3,
            x_u: -0.02,
            m_u: 0.001,
            z_q: -2.0,
            x_q: 0.3,
            m_q: -1.2,
            z_de: -7.0,
            x_de: 0.4,
            m_de: -9.0,
            ..Default::default()
        };
        let a = assemble_longitudinal(&d, &trim(80.0)).unwrap();
        assert_eq!(a.row(0), [-1.0, -0.3, 78.0, 0.0]);
        assert_eq!(a.row(1), [0.1, -0.02, 0.3, -9.81]);
        assert_eq!(a.row(2), [-0.05, 0.001, -1.2, 0.0]);
        assert_eq!(a.row(3), [0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn longitudinal_ignores_lateral_and_control_slots() {
        let mut slots = [0.0; DERIVATIVE_COUNT];
        for i in (0..3).chain(12..DERIVATIVE_COUNT) {
            slots[i] = 123.0;
        }
        let d = StabilityDerivatives::from(slots);
        let a = assemble_longitudinal(&d, &trim(10.0)).unwrap();
        assert_eq!(a.row(0), [0.0, 0.0, 10.0, 0.0]);
        assert_eq!(a.row(1), [0.0, 0.0, 0.0, -9.81]);
        assert_eq!(a.row(2), [0.0; 4]);
    }

    #[test]
    fn rejects_zero_velocity() {
        let d = StabilityDerivatives::default();
        assert_eq!(
            assemble_longitudinal(&d, &trim(0.0)),
            Err(AssemblyError::InvalidVelocity { value: 0.0 })
        );
        assert!(matches!(
            assemble_lateral(&d, &trim(f64::NAN)),
            Err(AssemblyError::InvalidVelocity { .. })
        ));
    }

    #[test]
    fn rejects_zero_inertia_when_coupled() {
        let d = StabilityDerivatives {
            ixx: 0.0,
            izz: 100.0,
            ixz: 5.0,
            ..Default::default()
        };
        assert_eq!(
            assemble_lateral(&d, &trim(10.0)),
            Err(AssemblyError::ZeroInertia { term: "Ixx" })
        );
        let d = StabilityDerivatives {
            ixx: 100.0,
            izz: 0.0,
            ixz: 5.0,
            ..Default::default()
        };
        assert_eq!(
            assemble_lateral(&d, &trim(10.0)),
            Err(AssemblyError::ZeroInertia { term: "Izz" })
        );
    }

    #[test]
    fn rejects_singular_coupling() {
        // Ixz² = Ixx·Izz.
        let d = StabilityDerivatives {
            ixx: 4.0,
            izz: 9.0,
            ixz: 6.0,
            ..Default::default()
        };
        assert!(matches!(
            assemble_lateral(&d, &trim(10.0)),
            Err(AssemblyError::SingularInertiaCoupling { .. })
        ));
    }

    #[test]
    fn rejects_non_finite_inputs() {
        let d = StabilityDerivatives {
            n_p: f64::INFINITY,
            ..Default::default()
        };
        assert_eq!(
            assemble(&d, &trim(10.0)),
            Err(AssemblyError::NonFiniteInput { name: "Np" })
        );

        let mut t = trim(10.0);
        t.effective_gravity = f64::NAN;
        assert_eq!(
            assemble(&StabilityDerivatives::default(), &t),
            Err(AssemblyError::NonFiniteInput {
                name: "effective gravity"
            })
        );
    }

    #[test]
    fn rejects_overflowing_result() {
        let d = StabilityDerivatives {
            z_q: f64::MAX,
            ..Default::default()
        };
        assert_eq!(
            assemble_longitudinal(&d, &trim(f64::MAX)),
            Err(AssemblyError::NonFiniteResult {
                axis: MotionAxis::Longitudinal,
                row: 0,
                col: 2,
            })
        );
    }
}
