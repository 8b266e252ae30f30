use thiserror::Error;

/// Telemetry buffering invariant violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TelemetryError {
    /// At most one telemetry window may be open system-wide; sample offsets
    /// are only meaningful relative to a single trial.
    #[error("telemetry window already open (opened at {opened_at_ms} ms)")]
    AlreadyOpen { opened_at_ms: u64 },
}
