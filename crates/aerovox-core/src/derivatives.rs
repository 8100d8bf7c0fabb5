//! Stability derivatives as a named-field record.
//!
//! The aerodynamic model hands over a flat vector of 27 doubles whose
//! meaning is fixed by position. Inside Aerovox the values travel as
//! [`StabilityDerivatives`], and the positional layout only exists at the
//! conversion boundary ([`from_slots`](StabilityDerivatives::from_slots) /
//! [`to_slots`](StabilityDerivatives::to_slots)).
//!
//! ```text
//! slot  0..=2   Ixx  Iyy  Izz
//! slot  3..=5   Zw   Xw   Mw      (response to w)
//! slot  6..=8   Zu   Xu   Mu      (response to u)
//! slot  9..=11  Zq   Xq   Mq      (response to q)
//! slot 12..=14  Zδe  Xδe  Mδe     (response to pitch control)
//! slot 15..=17  Yβ   Lβ   Nβ      (response to β)
//! slot 18..=20  Yp   Lp   Np      (response to p)
//! slot 21..=23  Yr   Lr   Nr      (response to r)
//! slot 24..=26  Ixy  Iyz  Ixz
//! ```

use indexmap::IndexMap;

use crate::error::DerivativeError;

/// Number of slots in the flat derivative layout.
pub const DERIVATIVE_COUNT: usize = 27;

/// The flat, positional form exchanged with the aerodynamic model.
pub type DerivativeVector = [f64; DERIVATIVE_COUNT];

/// Stability derivatives and inertia terms for one analysis run.
///
/// Produced once per run by the aerodynamic model and never mutated
/// afterwards; the assembler works on copies.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StabilityDerivatives {
    /// Roll moment of inertia (kg·m²).
    pub ixx: f64,
    /// Pitch moment of inertia (kg·m²).
    pub iyy: f64,
    /// Yaw moment of inertia (kg·m²).
    pub izz: f64,

    /// Z acceleration w.r.t. down velocity (s⁻¹).
    pub z_w: f64,
    /// X acceleration w.r.t. down velocity (s⁻¹).
    pub x_w: f64,
    /// Pitch angular acceleration w.r.t. down velocity ((m·s)⁻¹).
    pub m_w: f64,
    /// Z acceleration w.r.t. forward velocity (s⁻¹).
    pub z_u: f64,
    /// X acceleration w.r.t. forward velocity (s⁻¹).
    pub x_u: f64,
    /// Pitch angular acceleration w.r.t. forward velocity ((m·s)⁻¹).
    pub m_u: f64,
    /// Z acceleration w.r.t. pitch rate (m/s).
    pub z_q: f64,
    /// X acceleration w.r.t. pitch rate (m/s).
    pub x_q: f64,
    /// Pitch angular acceleration w.r.t. pitch rate (s⁻¹).
    pub m_q: f64,
    /// Z acceleration w.r.t. pitch control input (m/s²).
    pub z_de: f64,
    /// X acceleration w.r.t. pitch control input (m/s²).
    pub x_de: f64,
    /// Pitch angular acceleration w.r.t. pitch control input (s⁻²).
    pub m_de: f64,

    /// Y acceleration w.r.t. sideslip angle (m/s²).
    pub y_beta: f64,
    /// Roll angular acceleration w.r.t. sideslip angle (s⁻²).
    pub l_beta: f64,
    /// Yaw angular acceleration w.r.t. sideslip angle (s⁻²).
    pub n_beta: f64,
    /// Y acceleration w.r.t. roll rate (m/s).
    pub y_p: f64,
    /// Roll angular acceleration w.r.t. roll rate (s⁻¹).
    pub l_p: f64,
    /// Yaw angular acceleration w.r.t. roll rate (s⁻¹).
    pub n_p: f64,
    /// Y acceleration w.r.t. yaw rate (m/s).
    pub y_r: f64,
    /// Roll angular acceleration w.r.t. yaw rate (s⁻¹).
    pub l_r: f64,
    /// Yaw angular acceleration w.r.t. yaw rate (s⁻¹).
    pub n_r: f64,

    /// XY product of inertia (kg·m²).
    pub ixy: f64,
    /// YZ product of inertia (kg·m²).
    pub iyz: f64,
    /// XZ product of inertia (kg·m²).
    pub ixz: f64,
}

impl StabilityDerivatives {
    /// Build the record from the aerodynamic model's positional layout.
    ///
    /// Anything other than exactly [`DERIVATIVE_COUNT`] entries is rejected.
    pub fn from_slots(slots: &[f64]) -> Result<Self, DerivativeError> {
        let s: &DerivativeVector = slots
            .try_into()
            .map_err(|_| DerivativeError::WrongLength { got: slots.len() })?;
        Ok(Self::from_array(s))
    }

    fn from_array(s: &DerivativeVector) -> Self {
        Self {
            ixx: s[0],
            iyy: s[1],
            izz: s[2],
            z_w: s[3],
            x_w: s[4],
            m_w: s[5],
            z_u: s[6],
            x_u: s[7],
            m_u: s[8],
            z_q: s[9],
            x_q: s[10],
            m_q: s[11],
            z_de: s[12],
            x_de: s[13],
            m_de: s[14],
            y_beta: s[15],
            l_beta: s[16],
            n_beta: s[17],
            y_p: s[18],
            l_p: s[19],
            n_p: s[20],
            y_r: s[21],
            l_r: s[22],
            n_r: s[23],
            ixy: s[24],
            iyz: s[25],
            ixz: s[26],
        }
    }

    /// Flatten back into the positional layout. Exact inverse of
    /// [`from_slots`](Self::from_slots).
    pub fn to_slots(&self) -> DerivativeVector {
        [
            self.ixx, self.iyy, self.izz, //
            self.z_w, self.x_w, self.m_w, //
            self.z_u, self.x_u, self.m_u, //
            self.z_q, self.x_q, self.m_q, //
            self.z_de, self.x_de, self.m_de, //
            self.y_beta, self.l_beta, self.n_beta, //
            self.y_p, self.l_p, self.n_p, //
            self.y_r, self.l_r, self.n_r, //
            self.ixy, self.iyz, self.ixz,
        ]
    }

    /// Display labels paired with values, in slot order.
    ///
    /// Used by diagnostics and the export layer; the map preserves the
    /// positional order so a CSV row matches the model's layout.
    pub fn labeled(&self) -> IndexMap<&'static str, f64> {
        SLOT_LABELS
            .iter()
            .copied()
            .zip(self.to_slots())
            .collect()
    }

    /// Pitch-control column `(Zδe, Xδe, Mδe, 0)`.
    ///
    /// This is the input matrix `B` of the longitudinal system. The
    /// homogeneous transient preview does not use it.
    pub fn longitudinal_control(&self) -> [f64; 4] {
        [self.z_de, self.x_de, self.m_de, 0.0]
    }

    /// Label of the first non-finite value, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        SLOT_LABELS
            .iter()
            .zip(self.to_slots())
            .find(|(_, v)| !v.is_finite())
            .map(|(label, _)| *label)
    }
}

impl From<DerivativeVector> for StabilityDerivatives {
    fn from(slots: DerivativeVector) -> Self {
        Self::from_array(&slots)
    }
}

impl From<StabilityDerivatives> for DerivativeVector {
    fn from(d: StabilityDerivatives) -> Self {
        d.to_slots()
    }
}

/// Display label for each slot of the positional layout.
pub const SLOT_LABELS: [&str; DERIVATIVE_COUNT] = [
    "Ixx", "Iyy", "Izz", //
    "Zw", "Xw", "Mw", //
    "Zu", "Xu", "Mu", //
    "Zq", "Xq", "Mq", //
    "Zδe", "Xδe", "Mδe", //
    "Yβ", "Lβ", "Nβ", //
    "Yp", "Lp", "Np", //
    "Yr", "Lr", "Nr", //
    "Ixy", "Iyz", "Ixz",
];
