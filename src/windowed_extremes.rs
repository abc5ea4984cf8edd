use ahash::RandomState;
use hashbrown::{HashMap, hash_map::Entry};
use log::debug;
use num_traits::Float;

use alloc::vec::Vec;

use crate::{Clock, Extremes, ExtremesError, IntervalTracker, Observation, ObservationLog, Result};

/// Minimum and maximum prices over several trailing time windows of one price stream.
///
/// The store keeps every observation in an append-only log and one lazily
/// evaluated tracker per configured interval. [`add_price`](Self::add_price)
/// costs O(number of intervals). A query advances the interval's cursor past
/// observations older than `now - interval` and rescans the window only when
/// an evicted price was the tracked minimum or maximum.
///
/// Queries cache their progress and therefore take `&mut self`. The store
/// holds no locks; share it across threads behind a single mutex.
///
/// Timestamps must be appended in non-decreasing order for results to be
/// meaningful.
///
/// # Examples
///
/// ```
/// # use windowed_extremes::WindowedExtremesStore;
/// let mut store = WindowedExtremesStore::new([60]).unwrap();
/// store.add_price(10.0, 0).unwrap();
/// store.add_price(12.0, 30).unwrap();
///
/// assert_eq!(store.max_price(60, 60).unwrap(), Some(12.0));
/// assert_eq!(store.min_price(60, 60).unwrap(), Some(10.0));
/// assert_eq!(store.min_price(60, 61).unwrap(), Some(12.0));
/// assert_eq!(store.min_price(60, 91).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct WindowedExtremesStore<T = f64> {
    log: ObservationLog<T>,
    trackers: HashMap<u64, IntervalTracker<T>, RandomState>,
}

impl<T: Float> WindowedExtremesStore<T> {
    /// Creates a store tracking the given interval lengths, in seconds.
    ///
    /// The set of intervals is fixed for the lifetime of the store.
    ///
    /// # Arguments
    ///
    /// * `intervals` - Window lengths in seconds
    ///
    /// # Errors
    ///
    /// * `ExtremesError::EmptyIntervals` - if no interval is given
    /// * `ExtremesError::InvalidInterval` - if an interval is zero or larger than `i64::MAX`
    /// * `ExtremesError::DuplicateInterval` - if an interval is given twice
    pub fn new<I>(intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut trackers = HashMap::with_hasher(RandomState::new());

        for interval in intervals {
            let length = i64::try_from(interval)
                .ok()
                .filter(|length| *length > 0)
                .ok_or(ExtremesError::InvalidInterval { interval })?;

            match trackers.entry(interval) {
                Entry::Occupied(_) => return Err(ExtremesError::DuplicateInterval { interval }),
                Entry::Vacant(slot) => {
                    slot.insert(IntervalTracker::new(length));
                }
            }
        }

        if trackers.is_empty() {
            return Err(ExtremesError::EmptyIntervals);
        }

        debug!("windowed extremes store created for {} intervals", trackers.len());

        Ok(Self {
            log: ObservationLog::new(),
            trackers,
        })
    }

    /// Records a price observed at `timestamp` (UNIX seconds).
    ///
    /// # Returns
    ///
    /// * `usize` - The index of the observation in the log
    ///
    /// # Errors
    ///
    /// * `ExtremesError::InvalidPrice` - if `price` is NaN
    pub fn add_price(&mut self, price: T, timestamp: i64) -> Result<usize> {
        if price.is_nan() {
            return Err(ExtremesError::InvalidPrice);
        }

        let index = self.log.append(price, timestamp);
        self.trackers
            .values_mut()
            .for_each(|tracker| tracker.on_append(price));
        Ok(index)
    }

    /// Returns the lowest price observed within the last `interval` seconds before `now`.
    ///
    /// An observation is inside the window when `now - interval <= timestamp`.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The minimum, or `None` if the window holds no observation
    ///
    /// # Errors
    ///
    /// * `ExtremesError::UnknownInterval` - if `interval` was not registered
    pub fn min_price(&mut self, interval: u64, now: i64) -> Result<Option<T>> {
        Ok(self.extremes(interval, now)?.map(|extremes| extremes.min))
    }

    /// Returns the highest price observed within the last `interval` seconds before `now`.
    ///
    /// # Returns
    ///
    /// * `Option<T>` - The maximum, or `None` if the window holds no observation
    ///
    /// # Errors
    ///
    /// * `ExtremesError::UnknownInterval` - if `interval` was not registered
    pub fn max_price(&mut self, interval: u64, now: i64) -> Result<Option<T>> {
        Ok(self.extremes(interval, now)?.map(|extremes| extremes.max))
    }

    /// Returns both extremes of the `interval` window at `now` from a single evaluation
    ///
    /// # Errors
    ///
    /// * `ExtremesError::UnknownInterval` - if `interval` was not registered
    ///
    /// # Examples
    ///
    /// ```
    /// # use windowed_extremes::{Extremes, WindowedExtremesStore};
    /// let mut store = WindowedExtremesStore::new([300]).unwrap();
    /// for (ts, price) in [(0, 5.0), (1, 1.0), (2, 9.0), (3, 3.0)] {
    ///     store.add_price(price, ts).unwrap();
    /// }
    /// assert_eq!(
    ///     store.extremes(300, 301).unwrap(),
    ///     Some(Extremes { min: 1.0, max: 9.0 })
    /// );
    /// ```
    pub fn extremes(&mut self, interval: u64, now: i64) -> Result<Option<Extremes<T>>> {
        let tracker = self
            .trackers
            .get_mut(&interval)
            .ok_or(ExtremesError::UnknownInterval { interval })?;
        tracker.evaluate(&self.log, now)
    }

    /// Same as [`min_price`](Self::min_price), reading `now` from `clock`
    pub fn min_price_with(&mut self, interval: u64, clock: &impl Clock) -> Result<Option<T>> {
        self.min_price(interval, clock.now())
    }

    /// Same as [`max_price`](Self::max_price), reading `now` from `clock`
    pub fn max_price_with(&mut self, interval: u64, clock: &impl Clock) -> Result<Option<T>> {
        self.max_price(interval, clock.now())
    }

    /// Same as [`extremes`](Self::extremes), reading `now` from `clock`
    pub fn extremes_with(
        &mut self,
        interval: u64,
        clock: &impl Clock,
    ) -> Result<Option<Extremes<T>>> {
        self.extremes(interval, clock.now())
    }

    /// Returns the registered interval lengths in ascending order
    pub fn intervals(&self) -> Vec<u64> {
        let mut intervals: Vec<u64> = self.trackers.keys().copied().collect();
        intervals.sort_unstable();
        intervals
    }

    /// Returns `true` if `interval` was registered at construction
    pub fn contains_interval(&self, interval: u64) -> bool {
        self.trackers.contains_key(&interval)
    }

    /// Returns the number of observations recorded so far
    pub fn len(&self) -> usize {
        self.log.len()
    }

    /// Returns `true` if no observation has been recorded
    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    /// Returns the most recently recorded observation
    pub fn last_observation(&self) -> Option<Observation<T>> {
        self.log.last().copied()
    }
}
