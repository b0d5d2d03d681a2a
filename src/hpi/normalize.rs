use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::HpiWarning;
use crate::math::intensity::IntensityMatrix;
use crate::math::matrix::Matrix;

/// What the normalizer does when every intensity is equal (`max == min`)
/// and the min-max rescale would divide by zero.
///
/// - `Floor`    — the whole index is 0 (score 0, category Poor).  Default.
/// - `Midpoint` — the whole index is 0.5 (score 50, category Good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroDivisorPolicy {
    #[default]
    Floor,
    Midpoint,
}

impl ZeroDivisorPolicy {
    /// Fractional value assigned to every cell of a uniform image.
    pub fn fill_value(self) -> f64 {
        match self {
            ZeroDivisorPolicy::Floor    => 0.0,
            ZeroDivisorPolicy::Midpoint => 0.5,
        }
    }
}

/// Output of `normalize`: the fractional index, its percentage twin, and the
/// global extremes they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIndex {
    /// `(v - min) / (max - min)` per pixel, in [0, 1].
    pub fractional: Matrix,
    /// `fractional * 100` per pixel, in [0, 100].
    pub percentage: Matrix,
    pub min: u8,
    pub max: u8,
    /// Set when the zero-divisor policy was applied.
    pub warning: Option<HpiWarning>,
}

impl NormalizedIndex {
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

/// Linearly rescales `intensities` to [0, 1] using the matrix's own global
/// minimum and maximum, and derives the [0, 100] percentage grid.
///
/// A uniform matrix does not fail: `policy` fills the index and a
/// `HpiWarning::DegenerateInput` is attached to the result.
pub fn normalize(intensities: &IntensityMatrix, policy: ZeroDivisorPolicy) -> NormalizedIndex {
    let (min, max) = intensities.min_max();

    let (fractional, warning) = if min == max {
        warn!(
            "uniform intensity {} over {}x{} image; applying {:?} zero-divisor policy",
            min, intensities.cols(), intensities.rows(), policy
        );
        (
            Matrix::filled(intensities.rows(), intensities.cols(), policy.fill_value()),
            Some(HpiWarning::DegenerateInput { value: min }),
        )
    } else {
        let lo    = min as f64;
        let range = (max - min) as f64;
        let data = intensities
            .row_iter()
            .map(|row| row.iter().map(|&v| (v as f64 - lo) / range).collect())
            .collect();
        (Matrix::from_data(data), None)
    };

    let percentage = fractional.map(|x| x * 100.0);

    NormalizedIndex { fractional, percentage, min, max, warning }
}
