use serde::{Deserialize, Serialize};

use crate::plan::{StimulusRef, TrialKind, TrialSlot};
use crate::sample::Sample;

/// Trial sequencing states.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    AwaitingAdvance,
    Fixation,
    Active(TrialKind),
    InterTrialGap,
    Finished,
}

impl SequencerState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SequencerState::Finished)
    }
}

/// Record of one presented trial. Created when the trial's window opens and
/// sealed exactly once when it closes; after sealing it is never mutated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub sequence_index: usize,
    pub kind: TrialKind,
    pub stimulus: StimulusRef,
    pub started_at: u64,
    pub ended_at: Option<u64>,
    pub samples: Vec<Sample>,
}

impl TrialRecord {
    pub fn begin(sequence_index: usize, slot: &TrialSlot, now_ms: u64) -> Self {
        Self {
            sequence_index,
            kind: slot.kind,
            stimulus: slot.stimulus.clone(),
            started_at: now_ms,
            ended_at: None,
            samples: Vec::new(),
        }
    }

    /// Attaches the buffered telemetry and stamps the end of the window.
    pub fn seal(&mut self, samples: Vec<Sample>, now_ms: u64) {
        self.samples = samples;
        self.ended_at = Some(now_ms);
    }

    pub fn is_sealed(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn duration_ms(&self) -> Option<u64> {
        self.ended_at.map(|end| end.saturating_sub(self.started_at))
    }
}
