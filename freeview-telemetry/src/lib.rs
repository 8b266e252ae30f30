//! Telemetry pipeline: pointer-sample normalization, per-trial buffering,
//! and the quadrant dwell-time analysis derived from the buffered samples.

pub mod collector;
pub mod error;
pub mod normalize;
pub mod quadrant;

pub use collector::TelemetryCollector;
pub use error::TelemetryError;
pub use normalize::{PointerSample, RawSample};
pub use quadrant::{analyze, QuadrantBreakdown, Viewport};
