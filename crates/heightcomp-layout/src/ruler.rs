//! Ruler step selection and mark generation.
//!
//! The ruler uses "nice" major steps (1, 2, 2.5, 5 or 10 times a power of ten)
//! and never goes below 10 cm. Marks carry both a centimeter and a feet/inches
//! label so the renderer can draw the dual-unit scale directly.

use heightcomp_core::units::{cm_to_ft_in, cm_to_label};
use serde::{Deserialize, Serialize};

/// Smallest step the ruler will ever use
pub const MIN_MAJOR_STEP_CM: f64 = 10.0;

/// Default number of intervals the ruler aims for
pub const DEFAULT_INTERVAL_TARGET: u32 = 10;

/// Mantissas a major step may use, in preference order for ties
pub const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Boundary tolerance for range and mark comparisons
pub const EPSILON: f64 = 1e-6;

/// Hard cap on generated marks, guards against absurd ranges
const MAX_MARKS: i64 = 10_000;

/// A horizontal ruler line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulerMark {
    /// Position on the vertical axis in centimeters
    pub value_cm: f64,
    /// Whole-centimeter label
    pub label_cm: String,
    /// Feet/inches label
    pub label_ft_in: String,
}

impl RulerMark {
    /// Build a mark with both labels for a value
    pub fn new(value_cm: f64) -> Self {
        Self {
            value_cm,
            label_cm: cm_to_label(value_cm),
            label_ft_in: cm_to_ft_in(value_cm),
        }
    }

    /// True for the ground line
    pub fn is_zero(&self) -> bool {
        self.value_cm == 0.0
    }
}

/// Pick a nice major step for a positive range.
///
/// The raw step `range / interval_target` is normalized into `[1, 10)` and
/// snapped to the closest entry of [`NICE_STEPS`]; ties go to the smaller
/// entry. The result is floored at [`MIN_MAJOR_STEP_CM`].
pub fn compute_major_step(positive_range_cm: f64, interval_target: u32) -> f64 {
    if !positive_range_cm.is_finite() || positive_range_cm <= EPSILON {
        return MIN_MAJOR_STEP_CM;
    }

    let raw_step = positive_range_cm / f64::from(interval_target.max(1));
    let pow10 = 10f64.powi(raw_step.log10().floor() as i32);
    let normalized = raw_step / pow10;

    let mut nice = NICE_STEPS[0];
    let mut best_diff = (normalized - nice).abs();
    for candidate in NICE_STEPS.iter().copied().skip(1) {
        let diff = (normalized - candidate).abs();
        if diff < best_diff {
            best_diff = diff;
            nice = candidate;
        }
    }

    let step = (nice * pow10).max(MIN_MAJOR_STEP_CM);
    tracing::trace!(
        "major step: range={:.3} raw={:.3} normalized={:.3} -> {}",
        positive_range_cm,
        raw_step,
        normalized,
        step
    );
    step
}

/// Enumerate the ruler marks for a visible range.
///
/// Every multiple of `step_cm` within `[bottom_cm, top_cm]` is included (with
/// [`EPSILON`] slack at both ends), plus a `0` mark when zero is in range.
/// At least one negative mark is always present: when none falls in range, a
/// mark at `-step_cm` is added even if it lies below `bottom_cm`. Marks are
/// sorted ascending and unique by value.
pub fn generate_marks(top_cm: f64, bottom_cm: f64, step_cm: f64) -> Vec<RulerMark> {
    if !step_cm.is_finite() || step_cm <= 0.0 || !top_cm.is_finite() || !bottom_cm.is_finite() {
        return Vec::new();
    }
    if top_cm < bottom_cm {
        return Vec::new();
    }

    let first = ((bottom_cm - EPSILON) / step_cm).ceil() as i64;
    let mut last = ((top_cm + EPSILON) / step_cm).floor() as i64;
    if last.saturating_sub(first) > MAX_MARKS {
        tracing::warn!(
            "Ruler range {}..{} at step {} exceeds {} marks, truncating",
            bottom_cm,
            top_cm,
            step_cm,
            MAX_MARKS
        );
        last = first + MAX_MARKS;
    }

    let mut values: Vec<f64> = (first..=last).map(|k| k as f64 * step_cm).collect();

    if bottom_cm <= EPSILON && top_cm >= -EPSILON && !values.iter().any(|v| v.abs() <= EPSILON) {
        values.push(0.0);
    }

    if !values.iter().any(|v| *v < -EPSILON) {
        values.push(-step_cm);
    }

    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup_by(|a, b| (*a - *b).abs() <= EPSILON);

    values
        .into_iter()
        .map(|v| RulerMark::new(if v.abs() <= EPSILON { 0.0 } else { v }))
        .collect()
}

/// Round a derived step for display: whole centimeters above 100, one decimal
/// from 10 to 100, two decimals below 10.
pub fn round_step_for_display(step_cm: f64) -> f64 {
    if step_cm > 100.0 {
        step_cm.round()
    } else if step_cm >= 10.0 {
        (step_cm * 10.0).round() / 10.0
    } else {
        (step_cm * 100.0).round() / 100.0
    }
}
