use freeview_core::{SessionResult, StimulusRef, TrialPlan};
use freeview_telemetry::PointerSample;

use crate::error::{PersistError, SequenceError};
use crate::state::SequencerEvent;

/// Rendering collaborator. The sequencer never draws; it emits transition
/// events which the driver routes here via `dispatch_events`.
pub trait Renderer {
    fn show_stimulus(&mut self, stimulus: &StimulusRef);
    fn hide_stimulus(&mut self);
    fn show_advance_control(&mut self);
    fn hide_advance_control(&mut self);
}

/// Routes sequencer transition events to the rendering collaborator.
/// Lifecycle events (`TrialStarted`, `TrialCompleted`, `SessionFinished`)
/// are informational and not rendered.
pub fn dispatch_events(renderer: &mut dyn Renderer, events: &[SequencerEvent]) {
    for event in events {
        match event {
            SequencerEvent::ShowStimulus(stimulus) => renderer.show_stimulus(stimulus),
            SequencerEvent::HideStimulus => renderer.hide_stimulus(),
            SequencerEvent::ShowAdvanceControl => renderer.show_advance_control(),
            SequencerEvent::HideAdvanceControl => renderer.hide_advance_control(),
            SequencerEvent::TrialStarted { .. }
            | SequencerEvent::TrialCompleted { .. }
            | SequencerEvent::SessionFinished { .. } => {}
        }
    }
}

/// Pointer-tracking sensor. The driver polls it while a trial window is open
/// and pumps normalized samples into the sequencer; an unavailable sensor
/// degrades the trial to empty telemetry, never blocks it.
pub trait Sensor {
    fn is_available(&self) -> bool;
    fn poll(&mut self) -> Option<PointerSample>;
}

/// Supplies the immutable trial plan at session start.
pub trait PlanProvider {
    fn provide(&mut self) -> Result<TrialPlan, SequenceError>;
}

/// Durable storage for frozen session results. Receives no interim state.
pub trait PersistenceGateway {
    fn store(&mut self, result: &SessionResult) -> Result<(), PersistError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use freeview_core::TrialKind;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<String>,
    }

    impl Renderer for RecordingRenderer {
        fn show_stimulus(&mut self, stimulus: &StimulusRef) {
            self.calls.push(format!("show:{}", stimulus.id()));
        }
        fn hide_stimulus(&mut self) {
            self.calls.push("hide".into());
        }
        fn show_advance_control(&mut self) {
            self.calls.push("show-advance".into());
        }
        fn hide_advance_control(&mut self) {
            self.calls.push("hide-advance".into());
        }
    }

    #[test]
    fn dispatch_routes_render_events_and_skips_lifecycle_events() {
        let mut renderer = RecordingRenderer::default();
        dispatch_events(
            &mut renderer,
            &[
                SequencerEvent::ShowAdvanceControl,
                SequencerEvent::HideAdvanceControl,
                SequencerEvent::TrialStarted {
                    sequence_index: 0,
                    kind: TrialKind::Image,
                },
                SequencerEvent::ShowStimulus(StimulusRef::new("set-a")),
                SequencerEvent::HideStimulus,
                SequencerEvent::SessionFinished { aborted: false },
            ],
        );
        assert_eq!(
            renderer.calls,
            vec!["show-advance", "hide-advance", "show:set-a", "hide"]
        );
    }
}
