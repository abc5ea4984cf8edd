use log::{debug, trace};
use num_traits::Float;

use crate::{ObservationLog, Result};

/// Minimum and maximum price of a window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extremes<T> {
    /// Lowest price in the window
    pub min: T,
    /// Highest price in the window
    pub max: T,
}

impl<T: Float> Extremes<T> {
    #[inline]
    fn of(price: T) -> Self {
        Self {
            min: price,
            max: price,
        }
    }

    #[inline]
    fn include(self, price: T) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }

    /// Returns true if `price` is exactly one of the tracked bounds
    #[inline]
    fn is_bound(&self, price: T) -> bool {
        price == self.min || price == self.max
    }
}

/// Lazily maintained extremes of one trailing window over an [`ObservationLog`].
///
/// The tracker owns no observations. It keeps `start`, the index of the
/// oldest observation that may still be inside the window, and the exact
/// extremes of the log range `[start, len)` as of the last append or
/// evaluation.
///
/// - Append: O(1), folds the new price into the extremes
/// - Evaluate: amortized O(1) per evicted observation, plus an O(window)
///   rescan only when an evicted price was the tracked min or max
///
/// `start` never moves backwards, so queries with a `now` earlier than a
/// previous query keep the later, narrower window.
#[derive(Debug, Clone)]
pub struct IntervalTracker<T> {
    /// Window length in seconds
    length: i64,
    /// Index of the oldest observation not yet known to be evicted
    start: usize,
    /// Extremes over `[start, len)`, `None` when that range is empty
    extremes: Option<Extremes<T>>,
}

impl<T: Float> IntervalTracker<T> {
    /// Creates a tracker for a window of `length` seconds with nothing evicted
    pub const fn new(length: i64) -> Self {
        Self {
            length,
            start: 0,
            extremes: None,
        }
    }

    #[cfg(test)]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Folds a freshly appended price into the running extremes.
    ///
    /// Appends never shrink the covered range, so no rescan is ever needed here.
    #[inline]
    pub fn on_append(&mut self, price: T) {
        self.extremes = Some(match self.extremes {
            Some(extremes) => extremes.include(price),
            None => Extremes::of(price),
        });
    }

    /// Advances past every observation that fell out of the window at `now`
    /// and returns the extremes of what remains.
    ///
    /// An observation is inside the window while `now - length <= timestamp`.
    /// Evicting a price equal to the tracked min or max marks the extremes
    /// stale for the rest of the call; a stale tracker rescans
    /// `[start, last_index]` once, after the cursor has stopped.
    ///
    /// This caches state, so it is not a pure read.
    ///
    /// # Errors
    ///
    /// * `ExtremesError::OutOfRange` - only if the cursor invariant is broken
    pub fn evaluate(
        &mut self,
        log: &ObservationLog<T>,
        now: i64,
    ) -> Result<Option<Extremes<T>>> {
        let boundary = now.saturating_sub(self.length);
        let first = self.start;
        let mut stale = false;

        while log.last_index().is_some_and(|last| self.start <= last) {
            let candidate = log.get(self.start)?;
            if boundary <= candidate.timestamp {
                break;
            }
            stale = stale || self.extremes.is_some_and(|e| e.is_bound(candidate.price));
            self.start += 1;
        }

        if self.start > first {
            trace!(
                "{}s window evicted observations {}..{} at t={}",
                self.length, first, self.start, now
            );
        }

        if stale {
            self.recompute(log)?;
        }

        Ok(self.extremes)
    }

    /// Rescans `[start, last_index]` to restore exact extremes
    fn recompute(&mut self, log: &ObservationLog<T>) -> Result<()> {
        let window = log.range_from(self.start)?;
        self.extremes = window.iter().fold(None, |acc, observation| {
            Some(match acc {
                Some(extremes) => extremes.include(observation.price),
                None => Extremes::of(observation.price),
            })
        });
        debug!(
            "{}s window recomputed over {} observations from index {}",
            self.length,
            window.len(),
            self.start
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::all)]
mod tests {
    use super::{Extremes, IntervalTracker};
    use crate::ObservationLog;

    fn push(
        log: &mut ObservationLog<f64>,
        tracker: &mut IntervalTracker<f64>,
        price: f64,
        ts: i64,
    ) {
        log.append(price, ts);
        tracker.on_append(price);
    }

    #[test]
    fn test_empty_log_evaluates_to_none() {
        let log = ObservationLog::<f64>::new();
        let mut tracker = IntervalTracker::new(300);
        assert_eq!(tracker.evaluate(&log, 0).unwrap(), None);
        assert_eq!(tracker.evaluate(&log, i64::MAX).unwrap(), None);
        assert_eq!(tracker.start(), 0);
    }

    #[test]
    fn test_on_append_tracks_running_bounds() {
        let mut tracker = IntervalTracker::new(60);
        tracker.on_append(3.0);
        tracker.on_append(7.0);
        tracker.on_append(-2.0);
        assert_eq!(
            tracker.extremes,
            Some(Extremes {
                min: -2.0,
                max: 7.0
            })
        );
    }

    #[test]
    fn test_window_boundary_is_inclusive() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(10);
        push(&mut log, &mut tracker, 4.0, 100);

        assert_eq!(
            tracker.evaluate(&log, 110).unwrap(),
            Some(Extremes { min: 4.0, max: 4.0 })
        );
        assert_eq!(tracker.start(), 0);
        assert_eq!(tracker.evaluate(&log, 111).unwrap(), None);
        assert_eq!(tracker.start(), 1);
    }

    #[test]
    fn test_evicting_non_extreme_keeps_bounds() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(10);
        for (i, price) in [5.0, 1.0, 9.0, 3.0].into_iter().enumerate() {
            push(&mut log, &mut tracker, price, i as i64);
        }

        // 5.0 leaves, 1.0 and 9.0 remain
        assert_eq!(
            tracker.evaluate(&log, 11).unwrap(),
            Some(Extremes { min: 1.0, max: 9.0 })
        );
        assert_eq!(tracker.start(), 1);

        // 1.0 leaves, the true minimum is now 3.0
        assert_eq!(
            tracker.evaluate(&log, 12).unwrap(),
            Some(Extremes { min: 3.0, max: 9.0 })
        );

        // 9.0 leaves
        assert_eq!(
            tracker.evaluate(&log, 13).unwrap(),
            Some(Extremes { min: 3.0, max: 3.0 })
        );
    }

    #[test]
    fn test_stale_flag_persists_across_one_evaluation() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(10);
        for (i, price) in [2.0, 8.0, 5.0, 6.0, 4.0].into_iter().enumerate() {
            push(&mut log, &mut tracker, price, i as i64);
        }

        // evicts 2.0 (min) then 8.0 (max) then 5.0 in a single call
        assert_eq!(
            tracker.evaluate(&log, 13).unwrap(),
            Some(Extremes { min: 4.0, max: 6.0 })
        );
        assert_eq!(tracker.start(), 3);
    }

    #[test]
    fn test_appends_after_full_eviction_start_fresh() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(5);
        push(&mut log, &mut tracker, 1.0, 0);
        push(&mut log, &mut tracker, 100.0, 1);
        assert_eq!(tracker.evaluate(&log, 50).unwrap(), None);

        push(&mut log, &mut tracker, 42.0, 50);
        assert_eq!(
            tracker.evaluate(&log, 50).unwrap(),
            Some(Extremes {
                min: 42.0,
                max: 42.0
            })
        );
    }

    #[test]
    fn test_cursor_never_moves_back() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(10);
        for ts in 0..5 {
            push(&mut log, &mut tracker, ts as f64, ts);
        }
        tracker.evaluate(&log, 13).unwrap();
        assert_eq!(tracker.start(), 3);
        assert_eq!(
            tracker.evaluate(&log, 0).unwrap(),
            Some(Extremes { min: 3.0, max: 4.0 })
        );
        assert_eq!(tracker.start(), 3);
    }

    #[test]
    fn test_long_idle_gap_does_not_recurse() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(1);
        for ts in 0..200_000 {
            push(&mut log, &mut tracker, (ts % 97) as f64, ts);
        }
        assert_eq!(tracker.evaluate(&log, 1_000_000).unwrap(), None);
        assert_eq!(tracker.start(), 200_000);
    }

    #[test]
    fn test_repeated_extreme_prices() {
        let mut log = ObservationLog::new();
        let mut tracker = IntervalTracker::new(10);
        for (i, price) in [7.0, 7.0, 3.0, 7.0].into_iter().enumerate() {
            push(&mut log, &mut tracker, price, i as i64);
        }
        assert_eq!(
            tracker.evaluate(&log, 12).unwrap(),
            Some(Extremes { min: 3.0, max: 7.0 })
        );
        assert_eq!(
            tracker.evaluate(&log, 13).unwrap(),
            Some(Extremes { min: 7.0, max: 7.0 })
        );
    }
}
