//! # madwatch-core - Streaming Robust Anomaly Detection
//!
//! Flags outliers in a stream of scalar readings by scoring each reading
//! against the median and MAD (median absolute deviation) of a fixed-size
//! sliding window of recent readings.
//!
//! ```text
//!  StreamSource ──► Detector::step() ──► Window::slide()
//!                                          │
//!                                          ▼
//!                              RobustStatistics::compute()
//!                                          │
//!                                          ▼
//!                     RobustScorer::score() ──► ScoredPoint ──► consumer
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use madwatch_core::{Detector, DetectorConfig};
//!
//! let readings = vec![1.0, 2.0, 3.0, 4.0, 5.0, 10.0];
//! let mut detector = Detector::new(DetectorConfig::new(5, 0.5), readings.into_iter()).unwrap();
//!
//! // The first five readings are scored once the window is full
//! assert_eq!(detector.take_bootstrap().len(), 5);
//!
//! let point = detector.step().unwrap();
//! assert!(point.is_anomaly);
//! assert!(detector.step().is_none());
//! ```

pub mod config;
pub mod detector;
pub mod error;
pub mod source;
pub mod stats;
pub mod window;

pub use config::{DetectorConfig, ZeroMadPolicy, presets};
pub use detector::Detector;
pub use error::{DetectorError, Result};
pub use source::StreamSource;
pub use stats::{
    MODIFIED_Z_SCALE, RobustScorer, RobustStatistics, ScoredPoint, is_anomaly, median,
    modified_z_score,
};
pub use window::Window;
