mod observation_log;
pub use observation_log::{Observation, ObservationLog};
