//! Fixed-size sliding window of the most recent readings.

use crate::config::MIN_WINDOW_SIZE;
use crate::error::{DetectorError, Result};
use crate::source::StreamSource;
use crate::stats::RobustStatistics;
use serde::Serialize;
use std::collections::VecDeque;

/// Bounded FIFO of readings, oldest first.
///
/// Once built, the window always holds exactly `capacity` readings: every
/// [`slide`](Window::slide) evicts one and admits one.
#[derive(Serialize, Clone, Debug)]
pub struct Window {
    values: VecDeque<f64>,
    capacity: usize,
}

impl Window {
    /// Fill a window by pulling `capacity` readings from `source`, in order.
    pub fn initialize<S>(source: &mut S, capacity: usize) -> Result<Self>
    where
        S: StreamSource + ?Sized,
    {
        let mut values = VecDeque::with_capacity(capacity);
        while values.len() < capacity {
            match source.next_reading() {
                Some(value) if !value.is_finite() => {
                    return Err(DetectorError::NonFiniteReading {
                        position: values.len(),
                        value,
                    });
                }
                Some(value) => values.push_back(value),
                None => {
                    return Err(DetectorError::StreamExhausted {
                        required: capacity,
                        got: values.len(),
                    });
                }
            }
        }
        Ok(Self { values, capacity })
    }

    /// Build a window directly from a full set of readings. The number of
    /// readings becomes the capacity, so at least two are required.
    pub fn from_values(values: impl IntoIterator<Item = f64>) -> Result<Self> {
        let values: VecDeque<f64> = values.into_iter().collect();
        if values.len() < MIN_WINDOW_SIZE {
            return Err(DetectorError::InvalidConfiguration {
                name: "window_size",
                reason: format!(
                    "must be at least {}, got {}",
                    MIN_WINDOW_SIZE,
                    values.len()
                ),
            });
        }
        let non_finite = values.iter().enumerate().find(|(_, v)| !v.is_finite());
        if let Some((position, &value)) = non_finite {
            return Err(DetectorError::NonFiniteReading { position, value });
        }
        let capacity = values.len();
        Ok(Self { values, capacity })
    }

    /// Evict the oldest reading, append `value`, and return the evicted one.
    pub fn slide(&mut self, value: f64) -> f64 {
        let evicted = self.values.pop_front().unwrap_or(value);
        self.values.push_back(value);
        evicted
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Readings in arrival order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.values.iter().copied()
    }

    pub fn newest(&self) -> Option<f64> {
        self.values.back().copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.values.front().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }

    /// Median and MAD of the current contents. `None` only when empty.
    pub fn statistics(&self) -> Option<RobustStatistics> {
        RobustStatistics::compute(&self.to_vec())
    }
}
