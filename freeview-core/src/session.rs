use serde::{Deserialize, Serialize};

use crate::trial::TrialRecord;

/// A participant's completed (or aborted) run through a trial plan. Built
/// exclusively by the session aggregator; frozen once `completed_at` is
/// stamped and safe to share with the persistence collaborator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    pub participant_id: String,
    pub participant_email: String,
    pub started_at: u64,
    pub trials: Vec<TrialRecord>,
    pub completed_at: u64,
    pub aborted: bool,
}

impl SessionResult {
    pub fn trial_count(&self) -> usize {
        self.trials.len()
    }

    pub fn sample_count(&self) -> usize {
        self.trials.iter().map(|t| t.samples.len()).sum()
    }
}
