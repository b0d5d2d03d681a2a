use serde::{Deserialize, Serialize};

use crate::math::matrix::Matrix;

/// Coarse plant health derived from the mean HPI percentage.
///
/// Ordered from worst to best, so `Poor < Excellent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HealthCategory {
    Poor,
    Moderate,
    Good,
    Excellent,
}

impl HealthCategory {
    pub const ALL: [HealthCategory; 4] = [
        HealthCategory::Poor,
        HealthCategory::Moderate,
        HealthCategory::Good,
        HealthCategory::Excellent,
    ];

    /// Maps a score to its category using half-open intervals
    /// `[0, 25)`, `[25, 50)`, `[50, 75)`, `[75, ∞)`.
    ///
    /// A boundary value belongs to the interval it opens, e.g. exactly 25.0
    /// is `Moderate`.
    pub fn from_score(score: f64) -> HealthCategory {
        if score < 25.0 {
            HealthCategory::Poor
        } else if score < 50.0 {
            HealthCategory::Moderate
        } else if score < 75.0 {
            HealthCategory::Good
        } else {
            HealthCategory::Excellent
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthCategory::Poor      => "Poor",
            HealthCategory::Moderate  => "Moderate",
            HealthCategory::Good      => "Good",
            HealthCategory::Excellent => "Excellent",
        }
    }
}

impl std::fmt::Display for HealthCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduces a percentage index to `(score, category)`.
///
/// `score` is the arithmetic mean of every cell.  An empty matrix scores 0.
pub fn classify(percentage: &Matrix) -> (f64, HealthCategory) {
    let score = percentage.mean().unwrap_or(0.0);
    (score, HealthCategory::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn thresholds_are_lower_inclusive() {
        let cases = [
            (0.0, HealthCategory::Poor),
            (24.999, HealthCategory::Poor),
            (25.0, HealthCategory::Moderate),
            (49.999, HealthCategory::Moderate),
            (50.0, HealthCategory::Good),
            (74.999, HealthCategory::Good),
            (75.0, HealthCategory::Excellent),
            (100.0, HealthCategory::Excellent),
        ];
        for (score, expected) in cases {
            assert_eq!(HealthCategory::from_score(score), expected, "score {}", score);
        }
    }

    #[test]
    fn categories_are_ordered() {
        assert!(HealthCategory::ALL.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn score_is_the_mean() {
        let m = Matrix::from_data(vec![vec![0.0, 100.0 / 3.0], vec![200.0 / 3.0, 100.0]]);
        let (score, category) = classify(&m);
        assert_relative_eq!(score, 50.0, epsilon = 1e-9);
        assert_eq!(category, HealthCategory::Good);
    }

    #[test]
    fn display_matches_label() {
        assert_eq!(HealthCategory::Excellent.to_string(), "Excellent");
        assert_eq!(serde_json::to_string(&HealthCategory::Poor).unwrap(), "\"Poor\"");
    }
}
