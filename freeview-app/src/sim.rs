use freeview_core::StimulusRef;
use freeview_experiment::{Renderer, Sensor};
use freeview_telemetry::{PointerSample, Viewport};
use rand::Rng;

/// Random-walk pointer standing in for the real tracking sensor.
pub struct SyntheticSensor<R: Rng> {
    x: f64,
    y: f64,
    viewport: Viewport,
    rng: R,
}

impl<R: Rng> SyntheticSensor<R> {
    pub fn new(viewport: Viewport, rng: R) -> Self {
        Self {
            x: viewport.width / 2.0,
            y: viewport.height / 2.0,
            viewport,
            rng,
        }
    }
}

impl<R: Rng> Sensor for SyntheticSensor<R> {
    fn is_available(&self) -> bool {
        true
    }

    fn poll(&mut self) -> Option<PointerSample> {
        self.x = (self.x + self.rng.random_range(-15.0..15.0)).clamp(0.0, self.viewport.width);
        self.y = (self.y + self.rng.random_range(-15.0..15.0)).clamp(0.0, self.viewport.height);
        Some(PointerSample::new(self.x, self.y))
    }
}

/// Console stand-in for the participant-facing display.
#[derive(Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn show_stimulus(&mut self, stimulus: &StimulusRef) {
        println!("  [display] showing {}", stimulus.id());
    }

    fn hide_stimulus(&mut self) {
        println!("  [display] blank");
    }

    fn show_advance_control(&mut self) {
        println!("  [input] press SPACE to continue");
    }

    fn hide_advance_control(&mut self) {
        println!("  [input] advance control hidden");
    }
}
