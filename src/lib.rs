#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod utils;
pub(crate) use utils::ObservationLog;
pub use utils::Observation;

mod error;
pub use error::{ExtremesError, Result};

mod clock;
#[cfg(feature = "std")]
pub use clock::SystemClock;
pub use clock::{Clock, FrozenClock};

mod interval_tracker;
pub(crate) use interval_tracker::IntervalTracker;
pub use interval_tracker::Extremes;

mod windowed_extremes;
pub use windowed_extremes::WindowedExtremesStore;
