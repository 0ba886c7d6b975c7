//! Motion path recorder.
//!
//! A time-stamped buffer of recent pointer positions, filled while a drag
//! is in progress and read back at release to estimate the launch
//! velocity for inertia. Measuring over a fixed recent window rather than
//! an instant-to-instant delta damps sample jitter.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::trace;

use crate::error::{Error, Result};

/// One recorded pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    pub x: f64,
    pub y: f64,
    pub timestamp: Instant,
}

/// Append-only sample buffer for a single drag session.
#[derive(Debug, Clone, Default)]
pub struct MotionPath {
    samples: VecDeque<PathSample>,
}

impl MotionPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all samples; called once at the start of each drag session.
    pub fn reset(&mut self) {
        self.samples.clear();
    }

    /// Append a sample. Timestamps must not run backwards; a sample older
    /// than the newest one is dropped.
    pub fn record(&mut self, x: f64, y: f64, now: Instant) {
        if let Some(last) = self.samples.back() {
            if now < last.timestamp {
                trace!("dropping path sample with non-monotonic timestamp");
                return;
            }
        }
        self.samples.push_back(PathSample { x, y, timestamp: now });
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// True iff enough samples exist to estimate a velocity.
    #[inline]
    pub fn is_sufficient(&self) -> bool {
        self.samples.len() >= 2
    }

    /// Most recent sample. Callers must check `is_sufficient()` first;
    /// an `EmptyPath` escaping here is a programmer error.
    pub fn last(&self) -> Result<PathSample> {
        self.samples.back().copied().ok_or(Error::EmptyPath)
    }

    /// Estimated velocity in pixels per `window`.
    ///
    /// Measured between the most recent sample and the nearest earlier
    /// sample at least `window` older, falling back to the earliest
    /// sample when none is old enough.
    pub fn velocity_over(&self, window: Duration) -> Result<f64> {
        let newest = self.last()?;

        let base = self
            .samples
            .iter()
            .rev()
            .find(|s| newest.timestamp.duration_since(s.timestamp) >= window)
            .or_else(|| self.samples.front())
            .copied()
            .ok_or(Error::EmptyPath)?;

        let dt = newest.timestamp.duration_since(base.timestamp);
        if dt.is_zero() {
            return Ok(0.0);
        }

        let dx = newest.x - base.x;
        Ok(dx * (window.as_secs_f64() / dt.as_secs_f64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_with(samples: &[(f64, u64)]) -> (MotionPath, Instant) {
        let start = Instant::now();
        let mut path = MotionPath::new();
        for &(x, ms) in samples {
            path.record(x, 0.0, start + Duration::from_millis(ms));
        }
        (path, start)
    }

    #[test]
    fn test_empty_path_errors() {
        let path = MotionPath::new();
        assert!(matches!(path.last(), Err(Error::EmptyPath)));
        assert!(matches!(
            path.velocity_over(Duration::from_millis(32)),
            Err(Error::EmptyPath)
        ));
    }

    #[test]
    fn test_sufficiency() {
        let mut path = MotionPath::new();
        assert!(!path.is_sufficient());
        path.record(0.0, 0.0, Instant::now());
        assert!(!path.is_sufficient());
        path.record(1.0, 0.0, Instant::now());
        assert!(path.is_sufficient());
        path.reset();
        assert!(!path.is_sufficient());
    }

    #[test]
    fn test_non_monotonic_sample_dropped() {
        let start = Instant::now();
        let mut path = MotionPath::new();
        path.record(0.0, 0.0, start + Duration::from_millis(10));
        path.record(5.0, 0.0, start);
        assert_eq!(path.len(), 1);
        assert_eq!(path.last().unwrap().x, 0.0);
    }

    #[test]
    fn test_velocity_uses_nearest_sample_outside_window() {
        // 1 px/ms over the whole path; the 0 ms and 30 ms samples are old
        // enough for a 20 ms window, and 30 ms is the nearer of the two.
        let (path, _) = path_with(&[(0.0, 0), (30.0, 30), (45.0, 45), (60.0, 60)]);
        let v = path.velocity_over(Duration::from_millis(20)).unwrap();
        // (60 - 30) px over 30 ms, scaled to the 20 ms window
        assert!((v - 20.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_falls_back_to_earliest() {
        let (path, _) = path_with(&[(0.0, 0), (8.0, 8)]);
        let v = path.velocity_over(Duration::from_millis(32)).unwrap();
        // 8 px over 8 ms, scaled to the 32 ms window
        assert!((v - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_velocity_zero_dt() {
        let start = Instant::now();
        let mut path = MotionPath::new();
        path.record(0.0, 0.0, start);
        path.record(10.0, 0.0, start);
        let v = path.velocity_over(Duration::from_millis(32)).unwrap();
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_leftward_velocity_is_negative() {
        let (path, _) = path_with(&[(100.0, 0), (60.0, 32)]);
        let v = path.velocity_over(Duration::from_millis(32)).unwrap();
        assert!(v < 0.0);
    }
}
