//! Area-ruling aggregation of voxel cross-sections.

use aerovox_core::{SonicSummary, VoxelSliceData};

/// What the area-ruling preview draws for one voxelization pass.
///
/// The per-slice arrays are parallel to `x_axis`. Slice 0 sits farthest
/// along the axis, so `x_axis` is descending.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AreaRulingSummary {
    /// Physical position of each slice along the vehicle axis (m).
    pub x_axis: Vec<f64>,
    /// Cross-sectional area per slice (m²).
    pub areas: Vec<f64>,
    /// Second derivative of area per slice.
    pub second_derivs: Vec<f64>,
    /// Pressure coefficient per slice.
    pub pressure_coeffs: Vec<f64>,
    /// Largest slice area, or 0 when there are no positive areas.
    pub max_area: f64,
    /// Drag area at Mach 1, as reported by the aerodynamic model.
    pub sonic_drag_area: f64,
    /// Critical Mach, as reported by the aerodynamic model.
    pub critical_mach: f64,
}

impl AreaRulingSummary {
    /// Number of slices.
    pub fn len(&self) -> usize {
        self.x_axis.len()
    }

    /// True when the pass had no slices.
    pub fn is_empty(&self) -> bool {
        self.x_axis.is_empty()
    }
}

/// Combine one pass's slices into the preview summary.
///
/// Slice `i` of `n` is placed at `(n - i - 1)·thickness + offset`. An empty
/// pass yields an empty summary with `max_area == 0`.
pub fn aggregate(
    data: &VoxelSliceData,
    section_thickness: f64,
    first_section_offset: f64,
    sonic: SonicSummary,
) -> AreaRulingSummary {
    let n = data.len();
    let slices = data.slices();

    let max_area = slices.iter().fold(0.0f64, |m, s| m.max(s.area));
    let x_axis = (0..n)
        .map(|i| (n - i - 1) as f64 * section_thickness + first_section_offset)
        .collect();

    AreaRulingSummary {
        x_axis,
        areas: slices.iter().map(|s| s.area).collect(),
        second_derivs: slices.iter().map(|s| s.area_second_deriv).collect(),
        pressure_coeffs: slices.iter().map(|s| s.pressure_coeff).collect(),
        max_area,
        sonic_drag_area: sonic.sonic_drag_area,
        critical_mach: sonic.critical_mach,
    }
}
