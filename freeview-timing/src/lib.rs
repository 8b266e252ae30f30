pub mod clock;
pub mod deadline;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use deadline::Deadline;
