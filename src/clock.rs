use core::cell::Cell;

/// Source of the current time, in whole UNIX seconds.
///
/// The store never reads time on its own; every evaluation receives `now`
/// from the caller, either as a plain value or through a `Clock`.
pub trait Clock {
    /// Returns the current time in seconds
    fn now(&self) -> i64;
}

/// A manually driven clock for simulations, backtests and tests.
///
/// Time only moves through [`freeze`](FrozenClock::freeze) and
/// [`advance`](FrozenClock::advance). Both take `&self`, so the clock can be
/// moved while a store borrows it.
///
/// # Examples
///
/// ```
/// # use windowed_extremes::{Clock, FrozenClock};
/// let clock = FrozenClock::new(1_694_908_800);
/// clock.advance(5);
/// assert_eq!(clock.now(), 1_694_908_805);
/// clock.freeze(0);
/// assert_eq!(clock.now(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrozenClock {
    now: Cell<i64>,
}

impl FrozenClock {
    /// Creates a clock frozen at `now`
    pub const fn new(now: i64) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Moves the clock to `now`, forwards or backwards
    pub fn freeze(&self, now: i64) {
        self.now.set(now);
    }

    /// Moves the clock forward by `secs` seconds
    pub fn advance(&self, secs: i64) {
        self.now.set(self.now.get().saturating_add(secs));
    }
}

impl Clock for FrozenClock {
    #[inline]
    fn now(&self) -> i64 {
        self.now.get()
    }
}

/// Wall clock backed by [`std::time::SystemTime`]
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};

        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX),
            Err(before_epoch) => {
                i64::try_from(before_epoch.duration().as_secs()).map_or(i64::MIN, |secs| -secs)
            }
        }
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now(&self) -> i64 {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::{Clock, FrozenClock};

    #[test]
    fn test_frozen_clock_moves_only_when_told() {
        let clock = FrozenClock::new(100);
        assert_eq!(clock.now(), 100);
        assert_eq!(clock.now(), 100);
        clock.advance(11);
        assert_eq!(clock.now(), 111);
        clock.freeze(50);
        assert_eq!(clock.now(), 50);
    }

    #[test]
    fn test_frozen_clock_saturates() {
        let clock = FrozenClock::new(i64::MAX - 1);
        clock.advance(10);
        assert_eq!(clock.now(), i64::MAX);
    }

    #[test]
    fn test_clock_through_reference() {
        fn read(clock: impl Clock) -> i64 {
            clock.now()
        }
        let clock = FrozenClock::default();
        clock.advance(3);
        assert_eq!(read(&clock), 3);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(super::SystemClock.now() > 1_577_836_800);
    }
}
