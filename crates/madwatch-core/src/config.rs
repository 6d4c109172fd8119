//! Detector configuration.
//!
//! A [`DetectorConfig`] is fixed for the lifetime of a detector. Changing the
//! window size or threshold means building a new detector.

use crate::error::{DetectorError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest window for which a MAD is meaningful.
pub const MIN_WINDOW_SIZE: usize = 2;

/// How a point is scored while the window's MAD is exactly zero.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ZeroMadPolicy {
    /// Score is `+inf`/`-inf` following the sign of `value - median`, or
    /// `0.0` when the value sits on the median. Any deviation is flagged.
    #[default]
    Unbounded,
    /// Score is `0.0` and nothing is flagged until the window spreads out.
    Suppress,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct DetectorConfig {
    /// Number of most recent readings the statistics are computed over
    pub window_size: usize,
    /// Absolute modified Z-score a point must strictly exceed to be flagged
    pub threshold: f64,
    pub zero_mad_policy: ZeroMadPolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_size: 100,
            threshold: 0.5,
            zero_mad_policy: ZeroMadPolicy::Unbounded,
        }
    }
}

impl DetectorConfig {
    pub fn new(window_size: usize, threshold: f64) -> Self {
        Self {
            window_size,
            threshold,
            ..Self::default()
        }
    }

    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_zero_mad_policy(mut self, policy: ZeroMadPolicy) -> Self {
        self.zero_mad_policy = policy;
        self
    }

    /// Check the parameters. Called by the detector before any reading is
    /// pulled from the source.
    pub fn validate(&self) -> Result<()> {
        if self.window_size < MIN_WINDOW_SIZE {
            return Err(DetectorError::InvalidConfiguration {
                name: "window_size",
                reason: format!(
                    "must be at least {}, got {}",
                    MIN_WINDOW_SIZE, self.window_size
                ),
            });
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(DetectorError::InvalidConfiguration {
                name: "threshold",
                reason: format!("must be a positive finite number, got {}", self.threshold),
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| DetectorError::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}

/// Pre-configured settings for common trade-offs between drift
/// responsiveness and false-positive rate
pub mod presets {
    use super::*;

    /// Short window, reacts quickly to level shifts
    pub fn responsive() -> DetectorConfig {
        DetectorConfig::new(30, 0.5)
    }

    pub fn balanced() -> DetectorConfig {
        DetectorConfig::default()
    }

    /// Long window, only strong outliers
    pub fn stable() -> DetectorConfig {
        DetectorConfig::new(1000, 0.4).with_zero_mad_policy(ZeroMadPolicy::Suppress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DetectorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.window_size, 100);
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.zero_mad_policy, ZeroMadPolicy::Unbounded);
    }

    #[test]
    fn test_rejects_small_window() {
        for size in [0, 1] {
            let err = DetectorConfig::new(size, 0.5).validate().unwrap_err();
            assert!(
                matches!(
                    err,
                    DetectorError::InvalidConfiguration {
                        name: "window_size",
                        ..
                    }
                ),
                "window_size {} should be rejected",
                size
            );
        }
        assert!(DetectorConfig::new(2, 0.5).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_threshold() {
        for threshold in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let err = DetectorConfig::new(10, threshold).validate().unwrap_err();
            assert!(
                matches!(
                    err,
                    DetectorError::InvalidConfiguration {
                        name: "threshold",
                        ..
                    }
                ),
                "threshold {} should be rejected",
                threshold
            );
        }
    }

    #[test]
    fn test_from_json_partial() {
        let config = DetectorConfig::from_json_str(r#"{"window_size": 50}"#).unwrap();
        assert_eq!(config.window_size, 50);
        assert_eq!(config.threshold, 0.5);

        let config =
            DetectorConfig::from_json_str(r#"{"threshold": 0.8, "zero_mad_policy": "suppress"}"#)
                .unwrap();
        assert_eq!(config.window_size, 100);
        assert_eq!(config.zero_mad_policy, ZeroMadPolicy::Suppress);
    }

    #[test]
    fn test_from_json_validates() {
        let err = DetectorConfig::from_json_str(r#"{"window_size": 1}"#).unwrap_err();
        assert!(matches!(err, DetectorError::InvalidConfiguration { .. }));

        let err = DetectorConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, DetectorError::ConfigParse(_)));
    }

    #[test]
    fn test_from_missing_path() {
        let err = DetectorConfig::from_path("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DetectorError::ConfigRead { .. }));
    }

    #[test]
    fn test_presets() {
        for config in [presets::responsive(), presets::balanced(), presets::stable()] {
            assert!(config.validate().is_ok());
        }
        assert!(presets::responsive().window_size < presets::stable().window_size);
    }
}
