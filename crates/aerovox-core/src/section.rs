//! Voxel cross-section slices along the vehicle's analysis axis.

/// One slice of a voxelization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SliceSample {
    /// Cross-sectional area of the slice (m²).
    pub area: f64,
    /// Second derivative of area along the axis.
    pub area_second_deriv: f64,
    /// Pressure coefficient at the slice.
    pub pressure_coeff: f64,
}

/// Per-slice data of one voxelization pass, ordered by slice index.
///
/// Superseded wholesale by the next pass; never edited in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VoxelSliceData {
    slices: Vec<SliceSample>,
}

impl VoxelSliceData {
    /// Wrap an ordered list of slices.
    pub fn new(slices: Vec<SliceSample>) -> Self {
        Self { slices }
    }

    /// Zip the three parallel arrays the geometric kernel produces.
    ///
    /// Returns `None` if the arrays differ in length.
    pub fn from_parallel(
        areas: &[f64],
        second_derivs: &[f64],
        pressure_coeffs: &[f64],
    ) -> Option<Self> {
        if areas.len() != second_derivs.len() || areas.len() != pressure_coeffs.len() {
            return None;
        }
        let slices = areas
            .iter()
            .zip(second_derivs)
            .zip(pressure_coeffs)
            .map(|((&area, &area_second_deriv), &pressure_coeff)| SliceSample {
                area,
                area_second_deriv,
                pressure_coeff,
            })
            .collect();
        Some(Self { slices })
    }

    /// The slices in axis order.
    pub fn slices(&self) -> &[SliceSample] {
        &self.slices
    }

    /// Number of slices.
    pub fn len(&self) -> usize {
        self.slices.len()
    }

    /// True for a pass that produced no slices.
    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// Transonic scalars supplied by the aerodynamic model for one pass.
///
/// Passed through to the area-ruling summary unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SonicSummary {
    /// Drag area at Mach 1 (m²).
    pub sonic_drag_area: f64,
    /// Mach number at which local flow first reaches sonic speed.
    pub critical_mach: f64,
}
