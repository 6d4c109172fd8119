//! Input side of the detector.

/// A pull-based supplier of readings.
///
/// `None` signals end of stream. Infinite sources never return it. Any
/// blocking, pacing or retry behavior lives in the implementation, not in the
/// detector.
pub trait StreamSource {
    /// Next reading, which should be finite.
    ///
    /// A NaN or infinite reading fails detector construction while the window
    /// is being filled. Afterwards it is flagged as an anomaly and kept out
    /// of the window (see [`Detector::step`](crate::Detector::step)).
    fn next_reading(&mut self) -> Option<f64>;
}

impl<I> StreamSource for I
where
    I: Iterator<Item = f64>,
{
    fn next_reading(&mut self) -> Option<f64> {
        self.next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterator_is_source() {
        let mut source = vec![1.0, 2.0].into_iter();
        assert_eq!(source.next_reading(), Some(1.0));
        assert_eq!(source.next_reading(), Some(2.0));
        assert_eq!(source.next_reading(), None);
    }

    #[test]
    fn test_infinite_iterator_source() {
        let mut counter = 0.0;
        let mut source = std::iter::repeat_with(move || {
            counter += 1.0;
            counter
        });
        for expected in 1..=5 {
            assert_eq!(source.next_reading(), Some(expected as f64));
        }
    }
}
