use serde::{Deserialize, Serialize};

/// One pointer-position sample. `t` is the offset in milliseconds relative to
/// the opening of the trial's telemetry window. Samples are stored in arrival
/// order; consumers must not assume `t` is monotonic.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub x: f64,
    pub y: f64,
    pub t: f64,
}

impl Sample {
    pub fn new(x: f64, y: f64, t: f64) -> Self {
        Self { x, y, t }
    }

    /// All three fields carry usable numeric values.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.t.is_finite()
    }
}
