//! Synthetic seasonal reading generator.
//!
//! Each reading is a uniform base level, a sine seasonal component and
//! Gaussian noise:
//!
//! ```text
//! x(t) = U[0,1) * base_span + base_offset + sin(2πt / period) + N(0, noise_std)
//! ```
//!
//! Optional spikes of `±spike_magnitude` are injected with probability
//! `spike_probability` and counted as ground truth.

use anyhow::{Context, Result, ensure};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Season length in readings
    pub period: f64,
    pub base_offset: f64,
    pub base_span: f64,
    pub noise_std: f64,
    /// Chance per reading of an injected spike (0.0 - 1.0)
    pub spike_probability: f64,
    pub spike_magnitude: f64,
    /// Fixed RNG seed for reproducible streams
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            period: 100.0,
            base_offset: 0.2,
            base_span: 0.5,
            noise_std: 0.2,
            spike_probability: 0.0,
            spike_magnitude: 3.0,
            seed: None,
        }
    }
}

/// One generated reading with its ground truth.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    pub value: f64,
    pub injected: bool,
}

/// Infinite stream of seasonal readings.
pub struct SeasonalStream {
    config: GeneratorConfig,
    rng: StdRng,
    noise: Normal<f64>,
    t: u64,
    spikes_injected: u64,
}

impl SeasonalStream {
    pub fn new(config: GeneratorConfig) -> Result<Self> {
        ensure!(
            config.period > 0.0,
            "period must be positive, got {}",
            config.period
        );
        for (name, value) in [
            ("base_offset", config.base_offset),
            ("base_span", config.base_span),
            ("spike_magnitude", config.spike_magnitude),
        ] {
            ensure!(value.is_finite(), "{} must be finite, got {}", name, value);
        }
        ensure!(
            (0.0..=1.0).contains(&config.spike_probability),
            "spike_probability must be within [0, 1], got {}",
            config.spike_probability
        );
        let noise = Normal::new(0.0, config.noise_std)
            .with_context(|| format!("invalid noise_std {}", config.noise_std))?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Ok(Self {
            config,
            rng,
            noise,
            t: 0,
            spikes_injected: 0,
        })
    }

    pub fn next_sample(&mut self) -> Sample {
        let regular = self.rng.random::<f64>() * self.config.base_span + self.config.base_offset;
        let seasonal = (2.0 * std::f64::consts::PI * self.t as f64 / self.config.period).sin();
        let noise = self.noise.sample(&mut self.rng);
        self.t += 1;

        let mut value = regular + seasonal + noise;
        let injected = self.config.spike_probability > 0.0
            && self.rng.random_bool(self.config.spike_probability);
        if injected {
            let sign = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            value += sign * self.config.spike_magnitude;
            self.spikes_injected += 1;
        }

        Sample { value, injected }
    }

    /// Readings generated so far.
    pub fn generated(&self) -> u64 {
        self.t
    }

    pub fn spikes_injected(&self) -> u64 {
        self.spikes_injected
    }
}

impl Iterator for SeasonalStream {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_sample().value)
    }
}
