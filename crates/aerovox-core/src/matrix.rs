//! 4×4 linear state matrices.
//!
//! Entries are stored row-major: row `i` is the equation for the time
//! derivative of state `i`, column `j` is the coefficient of state `j`.
//! So `ẋ = A·x` is an ordinary matrix-vector product.

use std::fmt;

/// Dimension of the perturbation state vector.
pub const STATE_DIM: usize = 4;

/// A perturbation state vector.
pub type StateVector = [f64; STATE_DIM];

/// Which small-disturbance motion a matrix describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MotionAxis {
    /// States `(w, u, q, θ)`.
    Longitudinal,
    /// States `(β, p, r, φ)`.
    Lateral,
}

impl MotionAxis {
    /// Display names of the four state channels, in state order.
    pub fn channel_labels(self) -> [&'static str; STATE_DIM] {
        match self {
            Self::Longitudinal => ["w", "u", "q", "θ"],
            Self::Lateral => ["β", "p", "r", "φ"],
        }
    }
}

impl fmt::Display for MotionAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Longitudinal => write!(f, "longitudinal"),
            Self::Lateral => write!(f, "lateral"),
        }
    }
}

/// A 4×4 state matrix `A`.
///
/// Built once per analysis run by the assembler and read-only afterwards.
/// `Copy` so it can be handed across threads for display without sharing.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StateMatrix {
    rows: [[f64; STATE_DIM]; STATE_DIM],
}

impl StateMatrix {
    /// The zero matrix.
    pub const fn zeros() -> Self {
        Self {
            rows: [[0.0; STATE_DIM]; STATE_DIM],
        }
    }

    /// Build from row-major entries.
    pub const fn from_rows(rows: [[f64; STATE_DIM]; STATE_DIM]) -> Self {
        Self { rows }
    }

    /// Entry at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is `>= 4`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.rows[row][col]
    }

    /// Row-major entries.
    pub fn rows(&self) -> &[[f64; STATE_DIM]; STATE_DIM] {
        &self.rows
    }

    /// One row of the matrix.
    pub fn row(&self, row: usize) -> [f64; STATE_DIM] {
        self.rows[row]
    }

    /// `A·x`.
    pub fn mul_vec(&self, x: &StateVector) -> StateVector {
        let mut out = [0.0; STATE_DIM];
        for (o, row) in out.iter_mut().zip(&self.rows) {
            *o = row.iter().zip(x).map(|(a, b)| a * b).sum();
        }
        out
    }

    /// Position of the first NaN or infinite entry, scanning row-major.
    pub fn first_non_finite(&self) -> Option<(usize, usize)> {
        for (r, row) in self.rows.iter().enumerate() {
            if let Some(c) = row.iter().position(|v| !v.is_finite()) {
                return Some((r, c));
            }
        }
        None
    }
}

impl fmt::Display for StateMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(
                f,
                "[{:>12.6}, {:>12.6}, {:>12.6}, {:>12.6}]",
                row[0], row[1], row[2], row[3]
            )?;
        }
        Ok(())
    }
}
