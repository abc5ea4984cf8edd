use thiserror::Error;

/// Result alias used throughout the crate
pub type Result<T> = core::result::Result<T, ExtremesError>;

/// Errors raised by [`WindowedExtremesStore`](crate::WindowedExtremesStore)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtremesError {
    /// The store was constructed without any interval
    #[error("at least one interval must be configured")]
    EmptyIntervals,
    /// An interval length is zero or does not fit a signed timestamp
    #[error("interval {interval}s is not a valid window length")]
    InvalidInterval {
        /// The rejected interval length, in seconds
        interval: u64,
    },
    /// The same interval length was configured more than once
    #[error("interval {interval}s is configured more than once")]
    DuplicateInterval {
        /// The repeated interval length, in seconds
        interval: u64,
    },
    /// A query named an interval that was not registered at construction
    #[error("interval {interval}s is not registered in the store")]
    UnknownInterval {
        /// The requested interval length, in seconds
        interval: u64,
    },
    /// A NaN price was offered to the store
    #[error("price must not be NaN")]
    InvalidPrice,
    /// An observation index past the end of the log was read.
    ///
    /// Signals a broken cursor invariant rather than bad input.
    #[error("observation index {index} out of range for log of length {len}")]
    OutOfRange {
        /// The requested index
        index: usize,
        /// Length of the log at the time of the read
        len: usize,
    },
}

impl ExtremesError {
    /// Returns `true` for errors caused by an invalid interval configuration
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyIntervals | Self::InvalidInterval { .. } | Self::DuplicateInterval { .. }
        )
    }
}
