use freeview_core::{SessionResult, TrialKind, TrialRecord};
use freeview_telemetry::quadrant::{analyze, QuadrantBreakdown, Viewport};
use serde::Serialize;
use tracing::info;

use crate::error::SessionError;

/// Accumulates per-trial records into one session result.
///
/// One session per aggregator instance, ever. Trials must arrive strictly in
/// plan order; `finish` freezes the result, after which every mutating call
/// fails with `SessionClosed`.
#[derive(Debug, Default)]
pub struct SessionAggregator {
    state: AggregatorState,
}

#[derive(Debug, Default)]
enum AggregatorState {
    #[default]
    Idle,
    Open(OpenSession),
    Closed,
}

#[derive(Debug)]
struct OpenSession {
    participant_id: String,
    participant_email: String,
    started_at: u64,
    trials: Vec<TrialRecord>,
    aborted: bool,
}

impl SessionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, AggregatorState::Open(_))
    }

    /// Number of trials recorded so far; also the next expected sequence index.
    pub fn recorded_trials(&self) -> usize {
        match &self.state {
            AggregatorState::Open(session) => session.trials.len(),
            _ => 0,
        }
    }

    pub fn begin(
        &mut self,
        participant_id: &str,
        participant_email: &str,
        now_ms: u64,
    ) -> Result<(), SessionError> {
        match self.state {
            AggregatorState::Idle => {
                info!(participant_id, "session started");
                self.state = AggregatorState::Open(OpenSession {
                    participant_id: participant_id.to_owned(),
                    participant_email: participant_email.to_owned(),
                    started_at: now_ms,
                    trials: Vec::new(),
                    aborted: false,
                });
                Ok(())
            }
            _ => Err(SessionError::DuplicateSession),
        }
    }

    /// Appends a completed trial. The record's sequence index must equal the
    /// next expected index; on failure nothing is modified.
    pub fn record_trial(&mut self, record: TrialRecord) -> Result<(), SessionError> {
        match &mut self.state {
            AggregatorState::Idle => Err(SessionError::NotStarted),
            AggregatorState::Closed => Err(SessionError::SessionClosed),
            AggregatorState::Open(session) => {
                let expected = session.trials.len();
                if record.sequence_index != expected {
                    return Err(SessionError::OutOfOrder {
                        expected,
                        found: record.sequence_index,
                    });
                }
                session.trials.push(record);
                Ok(())
            }
        }
    }

    /// Flags the session as partially complete. Completed trials stay
    /// recoverable through `finish`.
    pub fn mark_aborted(&mut self) {
        if let AggregatorState::Open(session) = &mut self.state {
            session.aborted = true;
        }
    }

    /// Stamps `completed_at`, freezes the result, and hands it over.
    pub fn finish(&mut self, now_ms: u64) -> Result<SessionResult, SessionError> {
        match std::mem::take(&mut self.state) {
            AggregatorState::Idle => Err(SessionError::NotStarted),
            AggregatorState::Closed => {
                self.state = AggregatorState::Closed;
                Err(SessionError::SessionClosed)
            }
            AggregatorState::Open(session) => {
                self.state = AggregatorState::Closed;
                info!(
                    participant_id = %session.participant_id,
                    trials = session.trials.len(),
                    aborted = session.aborted,
                    "session finished"
                );
                Ok(SessionResult {
                    participant_id: session.participant_id,
                    participant_email: session.participant_email,
                    started_at: session.started_at,
                    trials: session.trials,
                    completed_at: now_ms,
                    aborted: session.aborted,
                })
            }
        }
    }
}

/// Quadrant dwell times for a single recorded trial.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrialQuadrants {
    pub sequence_index: usize,
    pub kind: TrialKind,
    pub breakdown: QuadrantBreakdown,
}

/// Summary statistics derived from a frozen session result.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSummary {
    pub trial_count: usize,
    pub image_trials: usize,
    pub filler_trials: usize,
    pub sample_count: usize,
    pub aborted: bool,
    pub quadrant_totals: QuadrantBreakdown,
    pub per_trial: Vec<TrialQuadrants>,
}

/// Derives the summary report, invoking the quadrant analysis lazily on each
/// trial's finalized telemetry.
pub fn summarize(result: &SessionResult, viewport: Viewport) -> SessionSummary {
    let mut quadrant_totals = QuadrantBreakdown::default();
    let per_trial: Vec<TrialQuadrants> = result
        .trials
        .iter()
        .map(|trial| {
            let breakdown = analyze(&trial.samples, viewport);
            quadrant_totals.accumulate(&breakdown);
            TrialQuadrants {
                sequence_index: trial.sequence_index,
                kind: trial.kind,
                breakdown,
            }
        })
        .collect();

    SessionSummary {
        trial_count: result.trial_count(),
        image_trials: result
            .trials
            .iter()
            .filter(|t| t.kind == TrialKind::Image)
            .count(),
        filler_trials: result
            .trials
            .iter()
            .filter(|t| t.kind == TrialKind::Filler)
            .count(),
        sample_count: result.sample_count(),
        aborted: result.aborted,
        quadrant_totals,
        per_trial,
    }
}
