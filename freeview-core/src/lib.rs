pub mod plan;
pub mod sample;
pub mod session;
pub mod trial;

pub use plan::{StimulusRef, TrialKind, TrialPlan, TrialSlot};
pub use sample::Sample;
pub use session::SessionResult;
pub use trial::{SequencerState, TrialRecord};
