//! # madwatch-sim - Synthetic Streams and a Text Consumer for madwatch
//!
//! Everything around the detection core: a seasonal reading generator with
//! optional spike injection, a threaded channel-backed stream source, finite
//! sources parsed from text, and a writer that renders scored points.
//!
//! ```text
//! SeasonalStream ──► producer thread ──► bounded channel ──► ChannelSource
//!                                                              │
//!                                                              ▼
//!                                      madwatch_core::Detector ──► RecordWriter
//! ```
//!
//! No detection logic lives here; the core is only reached through
//! `StreamSource` on the way in and `ScoredPoint` on the way out.

pub mod channel;
pub mod generator;
pub mod input;
pub mod output;
pub mod runner;

pub use channel::{ChannelSource, ProducerHandle, ProducerReport, spawn_producer};
pub use generator::{GeneratorConfig, Sample, SeasonalStream};
pub use input::{parse_readings, read_readings};
pub use output::{OutputFormat, Phase, RecordWriter, ScoredRecord};
pub use runner::{RunOptions, RunSummary, drive};
