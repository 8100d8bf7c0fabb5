//! Integrated time series for a 4-state system.

use crate::matrix::{StateVector, STATE_DIM};

/// Parallel arrays produced by one integration run.
///
/// The time axis is strictly increasing with a fixed step; each of the
/// four channels has exactly one value per time sample. Construction goes
/// through [`Trajectory::with_capacity`] and [`Trajectory::push`] so the
/// arrays can never drift out of step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Trajectory {
    time: Vec<f64>,
    channels: [Vec<f64>; STATE_DIM],
}

impl Trajectory {
    /// Empty trajectory with room for `samples` entries per array.
    pub fn with_capacity(samples: usize) -> Self {
        Self {
            time: Vec::with_capacity(samples),
            channels: std::array::from_fn(|_| Vec::with_capacity(samples)),
        }
    }

    /// Append one sample: a time and the state at that time.
    pub fn push(&mut self, t: f64, state: &StateVector) {
        self.time.push(t);
        for (ch, v) in self.channels.iter_mut().zip(state) {
            ch.push(*v);
        }
    }

    /// The time axis.
    pub fn time(&self) -> &[f64] {
        &self.time
    }

    /// Values of one state channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= 4`.
    pub fn channel(&self, channel: usize) -> &[f64] {
        &self.channels[channel]
    }

    /// All four channels in state order.
    pub fn channels(&self) -> &[Vec<f64>; STATE_DIM] {
        &self.channels
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    /// True when no samples were produced.
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// State at sample `index`, if it exists.
    pub fn state_at(&self, index: usize) -> Option<StateVector> {
        if index >= self.len() {
            return None;
        }
        Some(std::array::from_fn(|c| self.channels[c][index]))
    }

    /// State at the last sample.
    pub fn final_state(&self) -> Option<StateVector> {
        self.len().checked_sub(1).and_then(|i| self.state_at(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_arrays_aligned() {
        let mut t = Trajectory::with_capacity(2);
        assert!(t.is_empty());
        assert_eq!(t.final_state(), None);

        t.push(0.0, &[1.0, 2.0, 3.0, 4.0]);
        t.push(0.5, &[5.0, 6.0, 7.0, 8.0]);

        assert_eq!(t.len(), 2);
        assert_eq!(t.time(), &[0.0, 0.5]);
        for ch in t.channels() {
            assert_eq!(ch.len(), t.len());
        }
        assert_eq!(t.channel(2), &[3.0, 7.0]);
        assert_eq!(t.state_at(0), Some([1.0, 2.0, 3.0, 4.0]));
        assert_eq!(t.final_state(), Some([5.0, 6.0, 7.0, 8.0]));
        assert_eq!(t.state_at(2), None);
    }
}
