use freeview_core::Sample;
use serde::Serialize;

use crate::normalize::RawSample;

/// Viewport dimensions; the quadrant boundary sits at its midpoint.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Dwell time per screen quadrant, in the same time unit as `Sample::t`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize)]
pub struct QuadrantBreakdown {
    pub top_left: f64,
    pub top_right: f64,
    pub bottom_left: f64,
    pub bottom_right: f64,
}

impl QuadrantBreakdown {
    pub fn total(&self) -> f64 {
        self.top_left + self.top_right + self.bottom_left + self.bottom_right
    }

    pub fn accumulate(&mut self, other: &QuadrantBreakdown) {
        self.top_left += other.top_left;
        self.top_right += other.top_right;
        self.bottom_left += other.bottom_left;
        self.bottom_right += other.bottom_right;
    }
}

/// Computes time-in-quadrant from a trial's sample sequence.
///
/// Each consecutive pair contributes its time delta to the quadrant holding
/// the *later* sample. Pairs with non-finite fields or a negative delta are
/// skipped outright; gaps are dropped, never fabricated. On the boundary,
/// `x == mid` counts as the right half and `y == mid` as the top half.
///
/// Pure and stateless: re-invoking on the same input yields the same output.
pub fn analyze(samples: &[Sample], viewport: Viewport) -> QuadrantBreakdown {
    let mut breakdown = QuadrantBreakdown::default();
    let mid_x = viewport.width / 2.0;
    let mid_y = viewport.height / 2.0;

    for pair in samples.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        if !prev.is_finite() || !cur.is_finite() {
            continue;
        }
        let dt = cur.t - prev.t;
        if dt < 0.0 {
            continue;
        }

        match (cur.x >= mid_x, cur.y <= mid_y) {
            (false, true) => breakdown.top_left += dt,
            (true, true) => breakdown.top_right += dt,
            (false, false) => breakdown.bottom_left += dt,
            (true, false) => breakdown.bottom_right += dt,
        }
    }

    breakdown
}

/// Convenience wrapper for replaying raw sensor logs: normalizes each entry
/// once, drops the unusable ones, then analyzes the canonical sequence.
pub fn analyze_raw(raw: &[RawSample], viewport: Viewport) -> QuadrantBreakdown {
    let samples: Vec<Sample> = raw.iter().filter_map(RawSample::to_sample).collect();
    analyze(&samples, viewport)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEWPORT: Viewport = Viewport {
        width: 100.0,
        height: 100.0,
    };

    #[test]
    fn attributes_deltas_to_the_later_samples_quadrant() {
        let samples = [
            Sample::new(0.0, 0.0, 0.0),
            Sample::new(0.0, 0.0, 10.0),
            Sample::new(100.0, 0.0, 40.0),
        ];
        let breakdown = analyze(&samples, VIEWPORT);
        assert_eq!(breakdown.top_left, 10.0);
        assert_eq!(breakdown.top_right, 30.0);
        assert_eq!(breakdown.bottom_left, 0.0);
        assert_eq!(breakdown.bottom_right, 0.0);
    }

    #[test]
    fn midpoint_classifies_east_and_north() {
        let samples = [
            Sample::new(0.0, 100.0, 0.0),
            // Exactly on both boundaries: counts as right half, top half.
            Sample::new(50.0, 50.0, 5.0),
        ];
        let breakdown = analyze(&samples, VIEWPORT);
        assert_eq!(breakdown.top_right, 5.0);
        assert_eq!(breakdown.total(), 5.0);
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            Sample::new(10.0, 90.0, 0.0),
            Sample::new(80.0, 90.0, 7.0),
            Sample::new(80.0, 10.0, 19.0),
        ];
        let first = analyze(&samples, VIEWPORT);
        let second = analyze(&samples, VIEWPORT);
        assert_eq!(first, second);
    }

    #[test]
    fn total_never_exceeds_spanned_time() {
        let samples = [
            Sample::new(10.0, 10.0, 0.0),
            Sample::new(20.0, 20.0, 15.0),
            Sample::new(90.0, 20.0, 21.0),
            Sample::new(90.0, 90.0, 30.0),
        ];
        let breakdown = analyze(&samples, VIEWPORT);
        let spanned = samples[samples.len() - 1].t - samples[0].t;
        assert!(breakdown.total() <= spanned);
        assert_eq!(breakdown.total(), 30.0);
    }

    #[test]
    fn skips_pairs_with_negative_delta() {
        let samples = [
            Sample::new(10.0, 10.0, 20.0),
            Sample::new(10.0, 10.0, 5.0),
        ];
        assert_eq!(analyze(&samples, VIEWPORT), QuadrantBreakdown::default());
    }

    #[test]
    fn skips_pairs_with_non_finite_fields() {
        let samples = [
            Sample::new(10.0, 10.0, 0.0),
            Sample::new(f64::NAN, 10.0, 5.0),
            Sample::new(10.0, 10.0, 9.0),
        ];
        // Both pairs touch the NaN sample, so nothing accumulates.
        assert_eq!(analyze(&samples, VIEWPORT), QuadrantBreakdown::default());
    }

    #[test]
    fn empty_and_singleton_inputs_yield_zeroes() {
        assert_eq!(analyze(&[], VIEWPORT), QuadrantBreakdown::default());
        assert_eq!(
            analyze(&[Sample::new(1.0, 1.0, 0.0)], VIEWPORT),
            QuadrantBreakdown::default()
        );
    }

    #[test]
    fn raw_logs_are_normalized_before_analysis() {
        let raw = [
            RawSample::from_json(r#"{"mouse_x": 10.0, "mouse_y": 10.0, "timestamp": 0.0}"#)
                .unwrap(),
            // Missing coordinate, dropped during normalization.
            RawSample::from_json(r#"{"mouse_y": 10.0, "timestamp": 3.0}"#).unwrap(),
            RawSample::from_json(r#"{"x": 20.0, "y": 20.0, "t": 8.0}"#).unwrap(),
        ];
        let breakdown = analyze_raw(&raw, VIEWPORT);
        assert_eq!(breakdown.top_left, 8.0);
        assert_eq!(breakdown.total(), 8.0);
    }

    #[test]
    fn accumulate_sums_fields() {
        let mut totals = QuadrantBreakdown::default();
        totals.accumulate(&QuadrantBreakdown {
            top_left: 1.0,
            top_right: 2.0,
            bottom_left: 3.0,
            bottom_right: 4.0,
        });
        totals.accumulate(&QuadrantBreakdown {
            top_left: 1.0,
            ..Default::default()
        });
        assert_eq!(totals.top_left, 2.0);
        assert_eq!(totals.total(), 11.0);
    }
}
