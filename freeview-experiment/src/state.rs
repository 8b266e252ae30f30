use freeview_core::{SequencerState, SessionResult, StimulusRef, TrialKind, TrialPlan, TrialRecord};
use freeview_telemetry::{PointerSample, TelemetryCollector};
use freeview_timing::{Clock, Deadline};
use tracing::{debug, info, warn};

use crate::config::TimingSettings;
use crate::error::SequenceError;
use crate::session::SessionAggregator;

/// Typed transition events emitted by the sequencer. The rendering/input
/// collaborator subscribes to these instead of being called back directly.
#[derive(Clone, Debug, PartialEq)]
pub enum SequencerEvent {
    ShowAdvanceControl,
    HideAdvanceControl,
    ShowStimulus(StimulusRef),
    HideStimulus,
    TrialStarted { sequence_index: usize, kind: TrialKind },
    TrialCompleted { sequence_index: usize },
    SessionFinished { aborted: bool },
}

// Timing after validation; all waits are known non-negative.
#[derive(Copy, Clone, Debug, Default)]
struct Timing {
    fixation_ms: u64,
    viewing_ms: u64,
    gap_ms: u64,
}

impl Timing {
    fn validate(settings: &TimingSettings) -> Result<Self, SequenceError> {
        if settings.viewing_ms < 0 {
            return Err(SequenceError::invalid_plan("negative viewing duration"));
        }
        if settings.fixation_ms < 0 {
            return Err(SequenceError::invalid_plan("negative fixation duration"));
        }
        if settings.inter_trial_gap_ms < 0 {
            return Err(SequenceError::invalid_plan("negative inter-trial gap"));
        }
        Ok(Self {
            fixation_ms: settings.fixation_ms as u64,
            viewing_ms: settings.viewing_ms as u64,
            gap_ms: settings.inter_trial_gap_ms as u64,
        })
    }

    fn manual_viewing(&self) -> bool {
        self.viewing_ms == 0
    }
}

/// Finite-state machine walking a fixed trial plan.
///
/// Poll-driven: the owning loop pumps sensor samples in via `ingest`, calls
/// `tick` to let timed waits elapse, and forwards participant input through
/// `advance`. All progression state lives here; waits are explicit
/// `Deadline`s so `abort` can cut any pending one short deterministically.
pub struct TrialSequencer<C: Clock> {
    clock: C,
    state: SequencerState,
    plan: Option<TrialPlan>,
    timing: Timing,
    next_slot: usize,
    current: Option<TrialRecord>,
    wait: Option<Deadline>,
    collector: TelemetryCollector,
    aggregator: SessionAggregator,
}

impl<C: Clock> TrialSequencer<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: SequencerState::Idle,
            plan: None,
            timing: Timing::default(),
            next_slot: 0,
            current: None,
            wait: None,
            collector: TelemetryCollector::new(),
            aggregator: SessionAggregator::new(),
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn plan_len(&self) -> usize {
        self.plan.as_ref().map_or(0, TrialPlan::len)
    }

    /// Trials completed and recorded so far.
    pub fn completed_trials(&self) -> usize {
        self.aggregator.recorded_trials()
    }

    /// Opens the session this sequencer aggregates into. Must precede `start`.
    pub fn begin_session(
        &mut self,
        participant_id: &str,
        participant_email: &str,
    ) -> Result<(), SequenceError> {
        let now = self.clock.now_ms();
        self.aggregator.begin(participant_id, participant_email, now)?;
        Ok(())
    }

    /// Validates the plan and timing, resets progression to the first slot,
    /// and enters the manual-advance wait for trial 0.
    pub fn start(
        &mut self,
        plan: TrialPlan,
        settings: &TimingSettings,
    ) -> Result<Vec<SequencerEvent>, SequenceError> {
        if plan.is_empty() {
            return Err(SequenceError::invalid_plan("plan is empty"));
        }
        let timing = Timing::validate(settings)?;
        if !self.aggregator.is_open() {
            return Err(crate::error::SessionError::NotStarted.into());
        }

        info!(
            trials = plan.len(),
            image = plan.image_count(),
            filler = plan.filler_count(),
            "sequencer started"
        );

        self.plan = Some(plan);
        self.timing = timing;
        self.next_slot = 0;
        self.current = None;
        self.wait = None;
        let _ = self.collector.close();
        self.state = SequencerState::AwaitingAdvance;
        Ok(vec![SequencerEvent::ShowAdvanceControl])
    }

    /// Participant input: button press or designated key. Honored while
    /// awaiting manual advancement between trials, or during an active
    /// window running the manual-advance policy. No-op everywhere else.
    pub fn advance(&mut self) -> Result<Vec<SequencerEvent>, SequenceError> {
        match self.state {
            SequencerState::AwaitingAdvance => {
                let mut events = vec![SequencerEvent::HideAdvanceControl];
                self.enter_trial(&mut events)?;
                Ok(events)
            }
            SequencerState::Active(_) if self.timing.manual_viewing() => {
                let mut events = Vec::new();
                self.close_window(&mut events)?;
                Ok(events)
            }
            _ => Ok(Vec::new()),
        }
    }

    /// Lets pending timed waits elapse and returns the resulting transitions.
    pub fn tick(&mut self) -> Result<Vec<SequencerEvent>, SequenceError> {
        let now = self.clock.now_ms();
        let mut events = Vec::new();

        match self.state {
            SequencerState::Fixation => {
                if self.wait_elapsed(now) {
                    self.wait = None;
                    self.enter_active(&mut events)?;
                }
            }
            SequencerState::Active(_) => {
                // Manual-policy windows have no deadline; they wait for
                // `advance` indefinitely.
                if self.wait_elapsed(now) {
                    self.close_window(&mut events)?;
                }
            }
            SequencerState::InterTrialGap => {
                if self.wait_elapsed(now) {
                    self.wait = None;
                    if self.next_slot >= self.plan_len() {
                        self.state = SequencerState::Finished;
                        info!(trials = self.completed_trials(), "trial plan complete");
                        events.push(SequencerEvent::SessionFinished { aborted: false });
                    } else {
                        self.state = SequencerState::AwaitingAdvance;
                        events.push(SequencerEvent::ShowAdvanceControl);
                    }
                }
            }
            SequencerState::Idle
            | SequencerState::AwaitingAdvance
            | SequencerState::Finished => {}
        }

        Ok(events)
    }

    /// Forwards a normalized pointer sample into the open telemetry window;
    /// dropped silently when no window is open.
    pub fn ingest(&mut self, point: PointerSample) {
        let now = self.clock.now_ms();
        self.collector.ingest(point, now);
    }

    /// Cancels the session. Idempotent; telemetry is closed immediately, the
    /// in-flight trial is discarded, and completed trials stay recoverable
    /// through `finish`.
    pub fn abort(&mut self) -> Vec<SequencerEvent> {
        if self.state.is_terminal() {
            return Vec::new();
        }

        let mut events = Vec::new();
        match self.state {
            SequencerState::Active(_) => events.push(SequencerEvent::HideStimulus),
            SequencerState::AwaitingAdvance => events.push(SequencerEvent::HideAdvanceControl),
            _ => {}
        }

        let _ = self.collector.close();
        self.current = None;
        self.wait = None;
        self.aggregator.mark_aborted();
        self.state = SequencerState::Finished;
        warn!(
            completed = self.completed_trials(),
            planned = self.plan_len(),
            "session aborted"
        );
        events.push(SequencerEvent::SessionFinished { aborted: true });
        events
    }

    /// Freezes and returns the session result. Only callable once the
    /// sequencer has reached `Finished` (naturally or via `abort`).
    pub fn finish(&mut self) -> Result<SessionResult, SequenceError> {
        if !self.state.is_terminal() {
            return Err(SequenceError::NotFinished);
        }
        let now = self.clock.now_ms();
        Ok(self.aggregator.finish(now)?)
    }

    fn wait_elapsed(&self, now_ms: u64) -> bool {
        self.wait.is_some_and(|deadline| deadline.is_elapsed(now_ms))
    }

    fn enter_trial(&mut self, events: &mut Vec<SequencerEvent>) -> Result<(), SequenceError> {
        if self.timing.fixation_ms > 0 {
            let now = self.clock.now_ms();
            self.state = SequencerState::Fixation;
            self.wait = Some(Deadline::after(now, self.timing.fixation_ms));
            debug!(slot = self.next_slot, "fixation started");
            Ok(())
        } else {
            self.enter_active(events)
        }
    }

    fn enter_active(&mut self, events: &mut Vec<SequencerEvent>) -> Result<(), SequenceError> {
        let slot = self
            .plan
            .as_ref()
            .and_then(|plan| plan.get(self.next_slot))
            .cloned()
            .ok_or_else(|| SequenceError::invalid_plan("slot index past end of plan"))?;

        let now = self.clock.now_ms();
        self.collector.open(now)?;
        let record = TrialRecord::begin(self.next_slot, &slot, now);
        debug!(
            slot = self.next_slot,
            kind = ?slot.kind,
            stimulus = slot.stimulus.id(),
            "trial window opened"
        );

        events.push(SequencerEvent::TrialStarted {
            sequence_index: self.next_slot,
            kind: slot.kind,
        });
        events.push(SequencerEvent::ShowStimulus(slot.stimulus));

        self.current = Some(record);
        self.state = SequencerState::Active(slot.kind);
        self.wait = if self.timing.manual_viewing() {
            None
        } else {
            Some(Deadline::after(now, self.timing.viewing_ms))
        };
        Ok(())
    }

    fn close_window(&mut self, events: &mut Vec<SequencerEvent>) -> Result<(), SequenceError> {
        let samples = self.collector.close();
        let now = self.clock.now_ms();

        if let Some(mut record) = self.current.take() {
            record.seal(samples, now);
            let sequence_index = record.sequence_index;
            debug!(
                slot = sequence_index,
                samples = record.samples.len(),
                "trial window closed"
            );
            self.aggregator.record_trial(record)?;
            events.push(SequencerEvent::HideStimulus);
            events.push(SequencerEvent::TrialCompleted { sequence_index });
        }

        self.next_slot += 1;
        self.state = SequencerState::InterTrialGap;
        self.wait = Some(Deadline::after(now, self.timing.gap_ms));
        Ok(())
    }
}
