//! Threaded stream source over a bounded channel.
//!
//! A producer thread pulls from a [`SeasonalStream`] and pushes readings into
//! a bounded `crossbeam-channel`. The detector side is a plain
//! [`ChannelSource`] iterator: a full channel blocks the producer, and a
//! disconnected channel is the end of the stream.

use crate::generator::SeasonalStream;
use anyhow::{Context, Result, anyhow};
use crossbeam_channel::{Receiver, bounded};
use std::thread::{self, JoinHandle};
use tracing::{debug, info};

/// Receiving end handed to the detector.
pub struct ChannelSource {
    rx: Receiver<f64>,
    received: u64,
}

impl ChannelSource {
    pub fn new(rx: Receiver<f64>) -> Self {
        Self { rx, received: 0 }
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}

impl Iterator for ChannelSource {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        let value = self.rx.recv().ok()?;
        self.received += 1;
        Some(value)
    }
}

/// What the producer thread did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerReport {
    pub sent: u64,
    pub spikes_injected: u64,
}

pub struct ProducerHandle {
    handle: JoinHandle<ProducerReport>,
}

impl ProducerHandle {
    /// Wait for the producer. It stops once its limit is reached or the
    /// receiving side has been dropped.
    pub fn join(self) -> Result<ProducerReport> {
        self.handle
            .join()
            .map_err(|_| anyhow!("producer thread panicked"))
    }
}

/// Start a producer thread feeding at most `limit` readings (unbounded when
/// `None`) through a channel holding up to `capacity` readings.
pub fn spawn_producer(
    mut stream: SeasonalStream,
    capacity: usize,
    limit: Option<u64>,
) -> Result<(ChannelSource, ProducerHandle)> {
    let (tx, rx) = bounded(capacity.max(1));

    let handle = thread::Builder::new()
        .name("madwatch-producer".to_string())
        .spawn(move || {
            info!(capacity, ?limit, "Producer active.");
            let mut sent = 0u64;
            while limit.is_none_or(|limit| sent < limit) {
                let sample = stream.next_sample();
                if tx.send(sample.value).is_err() {
                    debug!(sent, "Receiver dropped.");
                    break;
                }
                sent += 1;
            }
            info!(sent, "Producer stopped.");
            ProducerReport {
                sent,
                spikes_injected: stream.spikes_injected(),
            }
        })
        .context("failed to spawn producer thread")?;

    Ok((ChannelSource::new(rx), ProducerHandle { handle }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::GeneratorConfig;
    use madwatch_core::{Detector, DetectorConfig};

    fn stream(seed: u64) -> SeasonalStream {
        SeasonalStream::new(GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_limited_producer_ends_stream() {
        let (source, producer) = spawn_producer(stream(5), 16, Some(40)).unwrap();
        let values: Vec<f64> = source.collect();
        let report = producer.join().unwrap();

        assert_eq!(values.len(), 40);
        assert_eq!(report.sent, 40);
    }

    #[test]
    fn test_channel_preserves_order() {
        let expected: Vec<f64> = stream(9).take(25).collect();
        let (source, producer) = spawn_producer(stream(9), 4, Some(25)).unwrap();

        assert_eq!(source.collect::<Vec<_>>(), expected);
        producer.join().unwrap();
    }

    #[test]
    fn test_dropping_receiver_stops_unbounded_producer() {
        let (mut source, producer) = spawn_producer(stream(2), 8, None).unwrap();
        for _ in 0..10 {
            assert!(source.next().is_some());
        }
        assert_eq!(source.received(), 10);
        drop(source);

        let report = producer.join().unwrap();
        assert!(report.sent >= 10);
    }

    #[test]
    fn test_detector_over_channel() {
        let (source, producer) = spawn_producer(stream(13), 32, Some(300)).unwrap();
        let detector = Detector::new(DetectorConfig::new(100, 0.5), source).unwrap();

        assert_eq!(detector.count(), 300);
        assert_eq!(producer.join().unwrap().sent, 300);
    }
}
