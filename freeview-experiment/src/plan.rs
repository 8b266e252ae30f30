use freeview_core::{StimulusRef, TrialKind, TrialPlan, TrialSlot};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::collaborators::PlanProvider;
use crate::config::ExperimentConfig;
use crate::error::SequenceError;

/// Builds the trial plan from the experiment configuration: image slots get
/// shuffled stimulus sets, filler slots cycle through the neutral sets at the
/// pattern's configured positions.
pub struct ConfigPlanProvider<R: Rng> {
    config: ExperimentConfig,
    image_refs: Vec<StimulusRef>,
    filler_refs: Vec<StimulusRef>,
    rng: R,
}

impl<R: Rng> ConfigPlanProvider<R> {
    pub fn new(
        config: ExperimentConfig,
        image_refs: Vec<StimulusRef>,
        filler_refs: Vec<StimulusRef>,
        rng: R,
    ) -> Self {
        Self {
            config,
            image_refs,
            filler_refs,
            rng,
        }
    }
}

impl<R: Rng> PlanProvider for ConfigPlanProvider<R> {
    fn provide(&mut self) -> Result<TrialPlan, SequenceError> {
        let pattern = &self.config.filler_pattern;
        let image_slots = pattern.iter().filter(|is_filler| !**is_filler).count();
        let filler_slots = pattern.len() - image_slots;

        if image_slots != self.config.num_image_trials {
            return Err(SequenceError::invalid_plan(format!(
                "filler pattern yields {image_slots} image slots, configured for {}",
                self.config.num_image_trials
            )));
        }
        if self.image_refs.len() < image_slots {
            return Err(SequenceError::invalid_plan(format!(
                "{} image sets available for {image_slots} image slots",
                self.image_refs.len()
            )));
        }
        if filler_slots > 0 && self.filler_refs.is_empty() {
            return Err(SequenceError::invalid_plan(
                "filler slots configured but no filler sets available",
            ));
        }

        let mut images = self.image_refs.clone();
        images.shuffle(&mut self.rng);
        let mut next_image = images.into_iter();
        let mut filler_index = 0usize;

        let slots = pattern
            .iter()
            .map(|is_filler| {
                if *is_filler {
                    let stimulus = self.filler_refs[filler_index % self.filler_refs.len()].clone();
                    filler_index += 1;
                    TrialSlot {
                        kind: TrialKind::Filler,
                        stimulus,
                    }
                } else {
                    // Counted above; the iterator cannot run dry.
                    let stimulus = next_image.next().unwrap_or_else(|| StimulusRef::new(""));
                    TrialSlot {
                        kind: TrialKind::Image,
                        stimulus,
                    }
                }
            })
            .collect();

        Ok(TrialPlan::new(slots))
    }
}
