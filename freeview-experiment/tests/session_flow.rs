// End-to-end session: plan built from configuration, sequencer driven by a
// deterministic clock, scripted pointer sensor, recording renderer, and an
// in-memory persistence gateway at the end of the line.

use std::collections::VecDeque;

use freeview_core::{SessionResult, StimulusRef, TrialKind};
use freeview_experiment::{
    dispatch_events, summarize, ConfigPlanProvider, ExperimentConfig, PersistError,
    PersistenceGateway, PlanProvider, Renderer, Sensor, TimingSettings, TrialSequencer,
};
use freeview_telemetry::PointerSample;
use freeview_timing::ManualClock;
use rand::rngs::StdRng;
use rand::SeedableRng;

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

struct ScriptedSensor {
    queue: VecDeque<PointerSample>,
}

impl Sensor for ScriptedSensor {
    fn is_available(&self) -> bool {
        !self.queue.is_empty()
    }
    fn poll(&mut self) -> Option<PointerSample> {
        self.queue.pop_front()
    }
}

#[derive(Default)]
struct MemoryGateway {
    stored: Vec<SessionResult>,
}

impl PersistenceGateway for MemoryGateway {
    fn store(&mut self, result: &SessionResult) -> Result<(), PersistError> {
        // Round-trip through JSON, the shape durable storage receives.
        let payload = serde_json::to_string(result)?;
        self.stored.push(serde_json::from_str(&payload)?);
        Ok(())
    }
}

fn three_slot_config() -> ExperimentConfig {
    ExperimentConfig {
        num_image_trials: 2,
        filler_pattern: vec![false, true, false],
        ..ExperimentConfig::default()
    }
}

#[test]
fn full_session_flows_from_plan_to_persisted_summary() {
    let config = three_slot_config();
    let timing = TimingSettings {
        fixation_ms: 50,
        viewing_ms: 100,
        inter_trial_gap_ms: 10,
    };

    let mut provider = ConfigPlanProvider::new(
        config.clone(),
        vec![StimulusRef::new("img-0"), StimulusRef::new("img-1")],
        vec![StimulusRef::new("neutral-0")],
        StdRng::seed_from_u64(1),
    );
    let plan = provider.provide().unwrap();
    assert_eq!(plan.len(), 3);

    // Two samples per trial, both deep in the top-left of the viewport.
    let mut sensor = ScriptedSensor {
        queue: (0..6).map(|_| PointerSample::new(100.0, 100.0)).collect(),
    };
    let mut renderer = RecordingRenderer::default();
    let mut gateway = MemoryGateway::default();

    let clock = ManualClock::new();
    let mut sequencer = TrialSequencer::new(clock.clone());
    sequencer
        .begin_session("p-042", "p042@example.org")
        .unwrap();
    let events = sequencer.start(plan, &timing).unwrap();
    dispatch_events(&mut renderer, &events);

    for _ in 0..3 {
        let events = sequencer.advance().unwrap();
        dispatch_events(&mut renderer, &events);

        clock.advance(50); // fixation elapses
        let events = sequencer.tick().unwrap();
        dispatch_events(&mut renderer, &events);

        clock.advance(40);
        sequencer.ingest(sensor.poll().unwrap());
        clock.advance(50);
        sequencer.ingest(sensor.poll().unwrap());

        clock.advance(10); // viewing window elapses
        let events = sequencer.tick().unwrap();
        dispatch_events(&mut renderer, &events);

        clock.advance(10); // inter-trial gap elapses
        let events = sequencer.tick().unwrap();
        dispatch_events(&mut renderer, &events);
    }

    assert!(sequencer.is_finished());
    let result = sequencer.finish().unwrap();
    gateway.store(&result).unwrap();

    assert_eq!(result.trial_count(), 3);
    let kinds: Vec<TrialKind> = result.trials.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TrialKind::Image, TrialKind::Filler, TrialKind::Image]
    );
    for (index, trial) in result.trials.iter().enumerate() {
        assert_eq!(trial.sequence_index, index);
        assert_eq!(trial.samples.len(), 2);
        assert_eq!(trial.samples[0].t, 40.0);
        assert_eq!(trial.samples[1].t, 90.0);
        assert_eq!(trial.duration_ms(), Some(100));
    }
    assert!(result.completed_at >= result.started_at);
    assert!(!result.aborted);

    // 50 ms of top-left dwell per trial (delta between the two samples).
    let summary = summarize(&result, config.viewport());
    assert_eq!(summary.trial_count, 3);
    assert_eq!(summary.image_trials, 2);
    assert_eq!(summary.filler_trials, 1);
    assert_eq!(summary.sample_count, 6);
    assert_eq!(summary.quadrant_totals.top_left, 150.0);
    assert_eq!(summary.quadrant_totals.total(), 150.0);

    // Renderer saw: initial advance control, then per trial hide-advance,
    // show, hide, plus an advance control between trials.
    assert_eq!(renderer.calls.len(), 12);
    assert_eq!(renderer.calls[0], "show-advance");
    assert_eq!(
        renderer.calls.iter().filter(|c| *c == "hide").count(),
        3
    );

    // The persisted copy survives the JSON round trip intact.
    assert_eq!(gateway.stored.len(), 1);
    assert_eq!(gateway.stored[0], result);
}

#[test]
fn aborted_session_still_persists_partial_data() {
    let config = three_slot_config();
    let timing = TimingSettings {
        fixation_ms: 0,
        viewing_ms: 100,
        inter_trial_gap_ms: 10,
    };
    let mut provider = ConfigPlanProvider::new(
        config,
        vec![StimulusRef::new("img-0"), StimulusRef::new("img-1")],
        vec![StimulusRef::new("neutral-0")],
        StdRng::seed_from_u64(9),
    );

    let clock = ManualClock::new();
    let mut sequencer = TrialSequencer::new(clock.clone());
    sequencer
        .begin_session("p-043", "p043@example.org")
        .unwrap();
    sequencer.start(provider.provide().unwrap(), &timing).unwrap();

    // Complete the first trial.
    sequencer.advance().unwrap();
    clock.advance(100);
    sequencer.tick().unwrap();
    clock.advance(10);
    sequencer.tick().unwrap();

    // Abort in the middle of the second.
    sequencer.advance().unwrap();
    clock.advance(30);
    sequencer.abort();

    let result = sequencer.finish().unwrap();
    assert!(result.aborted);
    assert_eq!(result.trial_count(), 1);

    let mut gateway = MemoryGateway::default();
    gateway.store(&result).unwrap();
    assert_eq!(gateway.stored[0].trials.len(), 1);
}
