use freeview_telemetry::Viewport;
use serde::{Deserialize, Serialize};

/// Experiment configuration. Deserializes from the researcher-facing JSON
/// shape (`numImageTrials`, `imageViewingTime`, ...); every field falls back
/// to the study defaults when absent.
///
/// Durations are raw `i64` milliseconds so that a malformed configuration is
/// representable here and rejected by `TrialSequencer::start` instead of
/// panicking at parse time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExperimentConfig {
    pub num_image_trials: usize,
    /// `true` marks a filler slot; the pattern's length fixes the total
    /// number of trials in the plan.
    pub filler_pattern: Vec<bool>,
    /// Fixed viewing duration per trial; `0` switches the trial to manual
    /// advancement (click or space/enter).
    pub image_viewing_time: i64,
    /// Fixation cross duration before each stimulus; `0` skips fixation.
    pub fixation_duration: i64,
    /// Pause between trials with rendering and telemetry both inactive.
    pub inter_trial_interval: i64,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            num_image_trials: 12,
            filler_pattern: default_filler_pattern(),
            image_viewing_time: 15_000,
            fixation_duration: 2_000,
            inter_trial_interval: 250,
            viewport_width: 1_920.0,
            viewport_height: 1_080.0,
        }
    }
}

// 12 image trials with 8 fillers interleaved to break pattern predictability.
fn default_filler_pattern() -> Vec<bool> {
    [
        false, false, true, false, true, false, false, true, false, true, false, false, true,
        false, true, false, false, true, false, true,
    ]
    .to_vec()
}

impl ExperimentConfig {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn total_trials(&self) -> usize {
        self.filler_pattern.len()
    }

    pub fn timing(&self) -> TimingSettings {
        TimingSettings {
            fixation_ms: self.fixation_duration,
            viewing_ms: self.image_viewing_time,
            inter_trial_gap_ms: self.inter_trial_interval,
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }
}

/// Per-trial timing handed to the sequencer; validated by `start`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TimingSettings {
    pub fixation_ms: i64,
    pub viewing_ms: i64,
    pub inter_trial_gap_ms: i64,
}
