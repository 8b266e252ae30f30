use freeview_telemetry::TelemetryError;
use thiserror::Error;

/// Session bookkeeping invariant violations. These are always fatal to the
/// call that triggered them; they indicate sequencing corruption and are
/// never swallowed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("a session is already open for this aggregator")]
    DuplicateSession,

    #[error("no session has been started")]
    NotStarted,

    #[error("session is closed; no further trials may be recorded")]
    SessionClosed,

    #[error("trial recorded out of order: expected sequence index {expected}, found {found}")]
    OutOfOrder { expected: usize, found: usize },
}

/// Errors surfaced by the trial sequencer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    /// Malformed plan or settings; the experiment does not begin.
    #[error("invalid trial plan: {reason}")]
    InvalidPlan { reason: String },

    #[error(transparent)]
    Telemetry(#[from] TelemetryError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("sequencer has not reached the finished state")]
    NotFinished,
}

impl SequenceError {
    pub fn invalid_plan(reason: impl Into<String>) -> Self {
        Self::InvalidPlan {
            reason: reason.into(),
        }
    }
}

/// Failures while handing a frozen session result to durable storage.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization failure: {0}")]
    Serialize(#[from] serde_json::Error),
}
