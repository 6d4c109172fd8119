//! Streaming detector: window + robust scorer driven by a pull source.
//!
//! A detector only exists in the `Ready` state. [`Detector::new`] performs
//! the `Uninitialized → Ready` transition: it validates the config, fills the
//! window from the source and scores the initial readings. Each
//! [`step`](Detector::step) afterwards consumes exactly one reading and
//! produces exactly one [`ScoredPoint`].

use crate::config::DetectorConfig;
use crate::error::{DetectorError, Result};
use crate::source::StreamSource;
use crate::stats::{RobustScorer, RobustStatistics, ScoredPoint};
use crate::window::Window;
use std::collections::VecDeque;
use tracing::{debug, info, trace, warn};

pub struct Detector<S> {
    config: DetectorConfig,
    scorer: RobustScorer,
    source: S,
    window: Window,
    statistics: RobustStatistics,
    /// Scored initial readings not yet handed out
    bootstrap: VecDeque<ScoredPoint>,
    steps: u64,
}

impl<S: StreamSource> Detector<S> {
    /// Validate `config` and bootstrap from the first `window_size` readings.
    ///
    /// The initial readings are all scored against the statistics of the
    /// complete initial window, not against a growing partial window. They
    /// are returned first by the `Iterator` impl, or can be drained with
    /// [`take_bootstrap`](Detector::take_bootstrap).
    pub fn new(config: DetectorConfig, mut source: S) -> Result<Self> {
        config.validate()?;

        let window = Window::initialize(&mut source, config.window_size)?;
        let statistics = window
            .statistics()
            .ok_or(DetectorError::StreamExhausted {
                required: config.window_size,
                got: 0,
            })?;

        let scorer = RobustScorer::from_config(&config);
        let bootstrap: VecDeque<ScoredPoint> = window
            .iter()
            .map(|value| scorer.score(value, &statistics))
            .collect();

        info!(
            window_size = config.window_size,
            threshold = config.threshold,
            median = statistics.median,
            mad = statistics.mad,
            "Detector initialized."
        );
        if statistics.is_degenerate() {
            debug!(policy = ?config.zero_mad_policy, "Initial window has zero MAD.");
        }

        Ok(Self {
            config,
            scorer,
            source,
            window,
            statistics,
            bootstrap,
            steps: 0,
        })
    }

    /// Pull one reading, slide it into the window, rescore.
    ///
    /// Returns `None` once the source is exhausted; the window is left
    /// untouched in that case.
    ///
    /// A NaN or infinite reading still counts as a step and is returned
    /// flagged as an anomaly with the reading itself as its score. It is not
    /// admitted into the window, so the statistics stay those of the last
    /// finite readings.
    pub fn step(&mut self) -> Option<ScoredPoint> {
        let value = self.source.next_reading()?;
        if !value.is_finite() {
            self.steps += 1;
            warn!(value, "Non-finite reading kept out of the window.");
            return Some(self.scorer.score_non_finite(value));
        }

        let evicted = self.window.slide(value);

        if let Some(statistics) = self.window.statistics() {
            self.statistics = statistics;
        }
        if self.statistics.is_degenerate() {
            debug!(policy = ?self.config.zero_mad_policy, "Window has zero MAD.");
        }

        let point = self.scorer.score(value, &self.statistics);
        self.steps += 1;

        trace!(
            value,
            evicted,
            score = point.score,
            is_anomaly = point.is_anomaly,
            "Scored reading."
        );
        Some(point)
    }

    /// Drain the scored initial readings that have not been yielded yet.
    pub fn take_bootstrap(&mut self) -> Vec<ScoredPoint> {
        self.bootstrap.drain(..).collect()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Statistics of the current window.
    pub fn statistics(&self) -> RobustStatistics {
        self.statistics
    }

    /// Number of steady-state steps taken (bootstrap points excluded).
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn into_source(self) -> S {
        self.source
    }
}

/// Yields the bootstrap points, then one point per upstream reading until
/// the source ends.
impl<S: StreamSource> Iterator for Detector<S> {
    type Item = ScoredPoint;

    fn next(&mut self) -> Option<ScoredPoint> {
        match self.bootstrap.pop_front() {
            Some(point) => Some(point),
            None => self.step(),
        }
    }
}

impl<S> std::fmt::Debug for Detector<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detector")
            .field("config", &self.config)
            .field("statistics", &self.statistics)
            .field("window_len", &self.window.len())
            .field("pending_bootstrap", &self.bootstrap.len())
            .field("steps", &self.steps)
            .finish()
    }
}
