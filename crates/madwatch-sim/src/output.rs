//! Rendering of scored points for stdout consumers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use madwatch_core::ScoredPoint;
use serde::{Serialize, Serializer};
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum OutputFormat {
    Json,
    JsonLines,
    Pretty,
}

/// Whether a point came out of the initial window fill or a steady-state step.
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Bootstrap,
    Stream,
}

#[derive(Serialize, Clone, Debug)]
pub struct ScoredRecord {
    pub sequence: u64,
    pub emitted_at: DateTime<Utc>,
    pub phase: Phase,
    pub value: f64,
    pub is_anomaly: bool,
    /// Non-finite scores are written as `"inf"` / `"-inf"` / `"nan"`; JSON
    /// has no representation for them.
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
}

impl ScoredRecord {
    pub fn new(sequence: u64, phase: Phase, point: ScoredPoint) -> Self {
        Self {
            sequence,
            emitted_at: Utc::now(),
            phase,
            value: point.value,
            is_anomaly: point.is_anomaly,
            score: point.score,
        }
    }

    pub fn to_pretty_line(&self) -> String {
        let marker = if self.is_anomaly { " [ANOMALY]" } else { "" };
        format!(
            "#{:<6} {} value={:>9.4} score={:>+9.4}{}",
            self.sequence,
            self.emitted_at.format("%H:%M:%S%.3f"),
            self.value,
            self.score,
            marker
        )
    }
}

fn serialize_score<S: Serializer>(
    score: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    if score.is_finite() {
        serializer.serialize_f64(*score)
    } else if score.is_nan() {
        serializer.serialize_str("nan")
    } else if score.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

/// Writes records to any sink in the selected format.
pub struct RecordWriter<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    pub fn write(&mut self, record: &ScoredRecord) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut self.out, record)?;
                writeln!(self.out)?;
            }
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.out, record)?;
                writeln!(self.out)?;
            }
            OutputFormat::Pretty => writeln!(self.out, "{}", record.to_pretty_line())?,
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: f64, is_anomaly: bool) -> ScoredRecord {
        ScoredRecord::new(
            3,
            Phase::Stream,
            ScoredPoint {
                value: 5.0,
                is_anomaly,
                score,
            },
        )
    }

    #[test]
    fn test_json_lines_fields() {
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::JsonLines);
        writer.write(&record(1.25, true)).unwrap();
        let text = String::from_utf8(writer.into_inner()).unwrap();

        assert_eq!(text.lines().count(), 1);
        let json: serde_json::Value = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(json["sequence"], 3);
        assert_eq!(json["phase"], "stream");
        assert_eq!(json["value"], 5.0);
        assert_eq!(json["is_anomaly"], true);
        assert_eq!(json["score"], 1.25);
        assert!(json["emitted_at"].is_string());
    }

    #[test]
    fn test_infinite_score_serialized_as_string() {
        let json = serde_json::to_value(record(f64::INFINITY, true)).unwrap();
        assert_eq!(json["score"], "inf");

        let json = serde_json::to_value(record(f64::NEG_INFINITY, true)).unwrap();
        assert_eq!(json["score"], "-inf");
    }

    #[test]
    fn test_nan_score_serialized_as_nan() {
        // NaN carries a sign bit too; it must not be reported as an infinity
        for nan in [f64::NAN, -f64::NAN] {
            let json = serde_json::to_value(record(nan, true)).unwrap();
            assert_eq!(json["score"], "nan");
        }
    }

    #[test]
    fn test_pretty_marks_anomalies() {
        assert!(record(4.0, true).to_pretty_line().ends_with("[ANOMALY]"));
        assert!(!record(0.1, false).to_pretty_line().contains("ANOMALY"));
    }
}
