//! Robust statistics and modified Z-scoring.
//!
//! The center of a window is its median and the spread is the median
//! absolute deviation (MAD). A reading is scored as
//!
//! ```text
//! score = 0.6745 * (x - median) / MAD
//! ```
//!
//! which approximates a standard Z-score for normally distributed data while
//! staying insensitive to the outliers it is meant to find.

use crate::config::{DetectorConfig, ZeroMadPolicy};
use serde::Serialize;

/// `Φ⁻¹(0.75)`: converts a MAD into a standard-deviation scale.
pub const MODIFIED_Z_SCALE: f64 = 0.6745;

/// Median of `values`. Even lengths average the two central values.
///
/// Returns `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    if n % 2 == 0 {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    } else {
        Some(sorted[n / 2])
    }
}

/// Center and spread of a window, recomputed on every step.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct RobustStatistics {
    pub median: f64,
    pub mad: f64,
}

impl RobustStatistics {
    /// Compute median and MAD over `values`. `None` when empty.
    pub fn compute(values: &[f64]) -> Option<Self> {
        let center = median(values)?;
        let deviations: Vec<f64> = values.iter().map(|x| (center - x).abs()).collect();
        let mad = median(&deviations)?;
        Some(Self {
            median: center,
            mad,
        })
    }

    pub fn is_degenerate(&self) -> bool {
        self.mad == 0.0
    }
}

/// Modified Z-score of `value`.
///
/// A zero `mad` is resolved by `policy` rather than by floating-point
/// division, so the result is never NaN for finite inputs.
pub fn modified_z_score(value: f64, median: f64, mad: f64, policy: ZeroMadPolicy) -> f64 {
    let deviation = value - median;
    if mad != 0.0 {
        return MODIFIED_Z_SCALE * deviation / mad;
    }

    match policy {
        ZeroMadPolicy::Unbounded if deviation > 0.0 => f64::INFINITY,
        ZeroMadPolicy::Unbounded if deviation < 0.0 => f64::NEG_INFINITY,
        ZeroMadPolicy::Unbounded | ZeroMadPolicy::Suppress => 0.0,
    }
}

/// Strict comparison: a score equal to the threshold is not an anomaly.
pub fn is_anomaly(score: f64, threshold: f64) -> bool {
    score.abs() > threshold
}

/// One scored reading handed to consumers.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ScoredPoint {
    pub value: f64,
    pub is_anomaly: bool,
    pub score: f64,
}

impl ScoredPoint {
    pub fn as_tuple(&self) -> (f64, bool, f64) {
        (self.value, self.is_anomaly, self.score)
    }
}

/// Threshold plus zero-MAD policy, applied against a statistics snapshot.
#[derive(Clone, Copy, Debug)]
pub struct RobustScorer {
    threshold: f64,
    zero_mad_policy: ZeroMadPolicy,
}

impl RobustScorer {
    pub fn new(threshold: f64, zero_mad_policy: ZeroMadPolicy) -> Self {
        Self {
            threshold,
            zero_mad_policy,
        }
    }

    pub fn from_config(config: &DetectorConfig) -> Self {
        Self::new(config.threshold, config.zero_mad_policy)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// A non-finite reading is always flagged. Its score is the reading's
    /// own infinity, or NaN for a NaN reading, since there is no deviation to
    /// measure.
    pub fn score_non_finite(&self, value: f64) -> ScoredPoint {
        ScoredPoint {
            value,
            is_anomaly: true,
            score: value,
        }
    }

    pub fn score(&self, value: f64, stats: &RobustStatistics) -> ScoredPoint {
        let score = modified_z_score(value, stats.median, stats.mad, self.zero_mad_policy);
        ScoredPoint {
            value,
            is_anomaly: is_anomaly(score, self.threshold),
            score,
        }
    }
}
