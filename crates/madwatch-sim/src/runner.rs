//! Drives a detector and hands every scored point to a [`RecordWriter`].

use crate::output::{Phase, RecordWriter, ScoredRecord};
use anyhow::Result;
use madwatch_core::{Detector, StreamSource};
use serde::Serialize;
use std::io::Write;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Pause after each emitted point
    pub tick: Option<Duration>,
    /// Stop after this many points, bootstrap included
    pub max_points: Option<u64>,
}

#[derive(Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub points: u64,
    pub bootstrap_points: u64,
    pub anomalies: u64,
}

/// Emit the bootstrap points, then step until the source ends or
/// `max_points` is reached.
pub fn drive<S, W>(
    mut detector: Detector<S>,
    writer: &mut RecordWriter<W>,
    options: &RunOptions,
) -> Result<RunSummary>
where
    S: StreamSource,
    W: Write,
{
    let mut summary = RunSummary::default();
    let limit = options
        .max_points
        .map_or(usize::MAX, |max| usize::try_from(max).unwrap_or(usize::MAX));

    let bootstrap = detector
        .take_bootstrap()
        .into_iter()
        .map(|point| (Phase::Bootstrap, point));
    let stream = std::iter::from_fn(|| detector.step()).map(|point| (Phase::Stream, point));

    for (phase, point) in bootstrap.chain(stream).take(limit) {
        writer.write(&ScoredRecord::new(summary.points, phase, point))?;

        summary.points += 1;
        if phase == Phase::Bootstrap {
            summary.bootstrap_points += 1;
        }
        if point.is_anomaly {
            summary.anomalies += 1;
        }
        if let Some(tick) = options.tick {
            std::thread::sleep(tick);
        }
    }
    writer.flush()?;

    info!(
        points = summary.points,
        bootstrap = summary.bootstrap_points,
        anomalies = summary.anomalies,
        median = detector.statistics().median,
        mad = detector.statistics().mad,
        "Detection finished."
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use madwatch_core::DetectorConfig;

    #[test]
    fn test_drive_finite_source() {
        let readings = vec![1.0, 2.0, 3.0, 4.0, 5.0, 10.0, 3.0];
        let detector = Detector::new(DetectorConfig::new(5, 0.5), readings.into_iter()).unwrap();
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::JsonLines);

        let summary = drive(detector, &mut writer, &RunOptions::default()).unwrap();
        assert_eq!(summary.points, 7);
        assert_eq!(summary.bootstrap_points, 5);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let rows: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0]["phase"], "bootstrap");
        assert_eq!(rows[5]["phase"], "stream");
        assert_eq!(rows[5]["value"], 10.0);
        assert_eq!(rows[5]["is_anomaly"], true);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row["sequence"], i as u64);
        }
        let flagged = rows.iter().filter(|r| r["is_anomaly"] == true).count() as u64;
        assert_eq!(flagged, summary.anomalies);
    }

    #[test]
    fn test_drive_respects_max_points() {
        let source = std::iter::repeat_with(|| 1.0);
        let detector = Detector::new(DetectorConfig::new(10, 0.5), source).unwrap();
        let mut writer = RecordWriter::new(Vec::new(), OutputFormat::Pretty);
        let options = RunOptions {
            max_points: Some(25),
            ..RunOptions::default()
        };

        let summary = drive(detector, &mut writer, &options).unwrap();
        assert_eq!(summary.points, 25);
        assert_eq!(summary.bootstrap_points, 10);
        assert_eq!(summary.anomalies, 0);
        assert_eq!(
            String::from_utf8(writer.into_inner()).unwrap().lines().count(),
            25
        );
    }
}
