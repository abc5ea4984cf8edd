use alloc::vec::Vec;

use crate::{ExtremesError, Result};

/// A single price observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation<T> {
    /// Observed price
    pub price: T,
    /// Observation time in UNIX seconds
    pub timestamp: i64,
}

/// Append-only log of observations, indexed from zero in insertion order.
///
/// Indices stay valid for the lifetime of the log; nothing is ever removed.
/// Callers are expected to append in non-decreasing timestamp order, the log
/// itself does not check it.
#[derive(Debug, Clone)]
pub struct ObservationLog<T> {
    entries: Vec<Observation<T>>,
}

impl<T: Copy> ObservationLog<T> {
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an observation and returns its index
    #[inline]
    pub fn append(&mut self, price: T, timestamp: i64) -> usize {
        self.entries.push(Observation { price, timestamp });
        self.entries.len() - 1
    }

    /// Returns the observation at `index`
    ///
    /// # Errors
    ///
    /// * `ExtremesError::OutOfRange` - if `index` is past the end of the log
    #[inline]
    pub fn get(&self, index: usize) -> Result<&Observation<T>> {
        self.entries.get(index).ok_or(ExtremesError::OutOfRange {
            index,
            len: self.entries.len(),
        })
    }

    /// Returns the index of the newest observation, or `None` if empty
    #[inline]
    pub fn last_index(&self) -> Option<usize> {
        self.entries.len().checked_sub(1)
    }

    /// Returns the newest observation
    #[inline]
    pub fn last(&self) -> Option<&Observation<T>> {
        self.entries.last()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every observation from `start` through the newest one
    ///
    /// # Errors
    ///
    /// * `ExtremesError::OutOfRange` - if `start` is greater than the log length
    pub fn range_from(&self, start: usize) -> Result<&[Observation<T>]> {
        self.entries.get(start..).ok_or(ExtremesError::OutOfRange {
            index: start,
            len: self.entries.len(),
        })
    }
}

impl<T: Copy> Default for ObservationLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
