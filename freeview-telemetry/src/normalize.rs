use freeview_core::Sample;
use serde::Deserialize;

/// Canonical pointer position handed to the collector, after normalization.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Raw payload as emitted by pointer-tracking backends. Field spellings vary
/// between sensor implementations; every known alias is accepted here and
/// mapped to the canonical schema exactly once, at ingestion time.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct RawSample {
    #[serde(default, alias = "mouse_x", alias = "clientX", alias = "pageX")]
    pub x: Option<f64>,
    #[serde(default, alias = "mouse_y", alias = "clientY", alias = "pageY")]
    pub y: Option<f64>,
    #[serde(
        default,
        alias = "time",
        alias = "timestamp",
        alias = "relativeTime",
        alias = "relative_time",
        alias = "timeStamp"
    )]
    pub t: Option<f64>,
}

impl RawSample {
    pub fn from_json(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    /// Position with usable coordinates, or `None` when either coordinate is
    /// missing or non-finite.
    pub fn position(&self) -> Option<PointerSample> {
        let (x, y) = (self.x?, self.y?);
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        Some(PointerSample { x, y })
    }

    /// Full sample including the sensor's own time offset, for replaying
    /// recorded telemetry logs. `None` when any field is missing or unusable.
    pub fn to_sample(&self) -> Option<Sample> {
        let pos = self.position()?;
        let t = self.t?;
        if !t.is_finite() {
            return None;
        }
        Some(Sample::new(pos.x, pos.y, t))
    }
}
