use std::time::Duration;

use anyhow::Result;
use freeview_core::{SequencerState, StimulusRef};
use freeview_experiment::{
    dispatch_events, summarize, ConfigPlanProvider, ExperimentConfig, PlanProvider,
    PersistenceGateway, Sensor, SequencerEvent, TrialSequencer,
};
use freeview_timing::{Clock, MonotonicClock};
use rand::rngs::ThreadRng;
use tracing::warn;

use crate::gateway::JsonFileGateway;
use crate::sim::{ConsoleRenderer, SyntheticSensor};

pub struct App {
    participant_id: String,
    config: ExperimentConfig,
    clock: MonotonicClock,
    sequencer: TrialSequencer<MonotonicClock>,
    sensor: SyntheticSensor<ThreadRng>,
    renderer: ConsoleRenderer,
    gateway: JsonFileGateway,
}

impl App {
    pub fn new(participant_id: String, config: ExperimentConfig) -> Result<Self> {
        let clock = MonotonicClock::new();
        let sequencer = TrialSequencer::new(clock.clone());
        let sensor = SyntheticSensor::new(config.viewport(), rand::rng());

        Ok(Self {
            participant_id,
            config,
            clock,
            sequencer,
            sensor,
            renderer: ConsoleRenderer,
            gateway: JsonFileGateway::new("session.json"),
        })
    }

    pub fn run(mut self) -> Result<()> {
        println!("=== FREE-VIEWING EXPERIMENT (simulated session) ===");
        println!("Participant: {}", self.participant_id);
        println!(
            "Plan: {} trials ({} image, {} filler)\n",
            self.config.total_trials(),
            self.config.num_image_trials,
            self.config.total_trials() - self.config.num_image_trials,
        );

        let email = format!("{}@example.org", self.participant_id);
        self.sequencer.begin_session(&self.participant_id, &email)?;

        let mut provider = ConfigPlanProvider::new(
            self.config.clone(),
            demo_refs("image-set", self.config.num_image_trials),
            demo_refs("neutral", 4),
            rand::rng(),
        );
        let plan = provider.provide()?;
        let timing = self.config.timing();

        let events = self.sequencer.start(plan, &timing)?;
        self.handle(&events);

        loop {
            if self.sequencer.state() == SequencerState::AwaitingAdvance {
                // Simulated participant presses the control promptly.
                self.clock.sleep(Duration::from_millis(10));
                let events = self.sequencer.advance()?;
                self.handle(&events);
            }

            if let Some(point) = self.sensor.poll() {
                self.sequencer.ingest(point);
            }

            let events = self.sequencer.tick()?;
            self.handle(&events);

            if self.sequencer.is_finished() {
                break;
            }
            self.clock.sleep(Duration::from_millis(5));
        }

        let result = self.sequencer.finish()?;
        let summary = summarize(&result, self.config.viewport());

        println!("\nSession complete.");
        println!(
            "  Trials: {} ({} image, {} filler), {} samples",
            summary.trial_count, summary.image_trials, summary.filler_trials, summary.sample_count,
        );
        println!(
            "  Dwell ms — TL {:.0}, TR {:.0}, BL {:.0}, BR {:.0}",
            summary.quadrant_totals.top_left,
            summary.quadrant_totals.top_right,
            summary.quadrant_totals.bottom_left,
            summary.quadrant_totals.bottom_right,
        );

        self.gateway.store(&result)?;
        println!("Results saved to {}", self.gateway.path().display());
        Ok(())
    }

    fn handle(&mut self, events: &[SequencerEvent]) {
        for event in events {
            if let SequencerEvent::TrialStarted { sequence_index, .. } = event {
                if !self.sensor.is_available() {
                    warn!(
                        trial = sequence_index,
                        "pointer sensor unavailable; trial records empty telemetry"
                    );
                }
            }
        }
        dispatch_events(&mut self.renderer, events);
    }
}

fn demo_refs(prefix: &str, n: usize) -> Vec<StimulusRef> {
    (0..n)
        .map(|i| StimulusRef::new(format!("{prefix}-{:02}", i + 1)))
        .collect()
}
