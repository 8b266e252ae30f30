use freeview_core::Sample;
use tracing::{debug, trace};

use crate::error::TelemetryError;
use crate::normalize::PointerSample;

/// Buffers pointer samples for the single active trial window.
///
/// At most one window is open at a time; `open` while open is a hard error
/// because sample offsets are timestamped relative to exactly one trial.
/// Closing hands the buffer off and leaves the collector empty, so the next
/// trial starts from a clean slate.
#[derive(Debug, Default)]
pub struct TelemetryCollector {
    window: Option<Window>,
}

#[derive(Debug)]
struct Window {
    opened_at_ms: u64,
    buffer: Vec<Sample>,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.window.is_some()
    }

    /// Opens a collection window at `now_ms`. Sample offsets are computed
    /// relative to this instant.
    pub fn open(&mut self, now_ms: u64) -> Result<(), TelemetryError> {
        if let Some(window) = &self.window {
            return Err(TelemetryError::AlreadyOpen {
                opened_at_ms: window.opened_at_ms,
            });
        }
        debug!(opened_at_ms = now_ms, "telemetry window opened");
        self.window = Some(Window {
            opened_at_ms: now_ms,
            buffer: Vec::new(),
        });
        Ok(())
    }

    /// Closes the window and returns the buffered samples. Closing an already
    /// closed collector yields an empty buffer.
    pub fn close(&mut self) -> Vec<Sample> {
        match self.window.take() {
            Some(window) => {
                debug!(samples = window.buffer.len(), "telemetry window closed");
                window.buffer
            }
            None => Vec::new(),
        }
    }

    /// Appends a normalized pointer sample, stamping its offset relative to
    /// the window open. Dropped silently when no window is open.
    pub fn ingest(&mut self, point: PointerSample, now_ms: u64) {
        match &mut self.window {
            Some(window) => {
                let t = now_ms.saturating_sub(window.opened_at_ms) as f64;
                window.buffer.push(Sample::new(point.x, point.y, t));
            }
            None => trace!("pointer sample dropped: no open telemetry window"),
        }
    }
}
