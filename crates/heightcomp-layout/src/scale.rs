//! Vertical scale solver.
//!
//! Derives the visible centimeter range and the cm to pixel factor from the
//! tallest entity, the zoom level and the container height.

use heightcomp_core::Entity;
use serde::{Deserialize, Serialize};

use crate::ruler::{compute_major_step, EPSILON};
use crate::viewport::ZoomLevel;

/// Range used when there is nothing to compare
pub const DEFAULT_MAX_HEIGHT_CM: f64 = 200.0;

/// Headroom above the tallest entity
pub const HEADROOM_FACTOR: f64 = 1.1;

/// Depth below ground, in major steps
pub const BOTTOM_MARGIN_STEPS: f64 = 1.2;

/// Result of the vertical scale pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerticalScale {
    /// Tallest entity, or [`DEFAULT_MAX_HEIGHT_CM`]
    pub max_height_cm: f64,
    /// Zoom multiplier applied to the range
    pub zoom_factor: f64,
    /// Top of the visible range
    pub scale_top_cm: f64,
    /// Bottom of the visible range (below ground, so negative)
    pub scale_bottom_cm: f64,
    /// Ruler step
    pub major_step_cm: f64,
    /// Vertical scale; 0 means nothing can be drawn
    pub pixels_per_cm: f64,
    /// Height the scale was solved for
    pub container_height_px: f64,
}

impl VerticalScale {
    /// Visible range in centimeters
    pub fn total_range_cm(&self) -> f64 {
        self.scale_top_cm - self.scale_bottom_cm
    }

    /// Whether anything can be drawn at this scale
    pub fn is_drawable(&self) -> bool {
        self.pixels_per_cm > 0.0
    }
}

/// Solve the vertical scale.
///
/// An empty entity list, a non-positive container height or an empty range all
/// yield `pixels_per_cm == 0`. The range and step are still derived (from
/// [`DEFAULT_MAX_HEIGHT_CM`] when the list is empty) so that dependent UI such
/// as the nudge step display keeps a sensible value.
pub fn compute_vertical_scale(
    entities: &[Entity],
    zoom: ZoomLevel,
    container_height_px: f64,
    interval_target: u32,
) -> VerticalScale {
    let max_height_cm = entities
        .iter()
        .map(|e| e.height_cm)
        .filter(|h| h.is_finite())
        .reduce(f64::max)
        .unwrap_or(DEFAULT_MAX_HEIGHT_CM);

    let base_top_cm = max_height_cm * HEADROOM_FACTOR;
    let zoom_factor = zoom.factor();
    let adjusted_top_cm = base_top_cm * zoom_factor;

    let major_step_cm = compute_major_step(adjusted_top_cm.max(EPSILON), interval_target);

    let base_bottom_cm = -major_step_cm * BOTTOM_MARGIN_STEPS;
    let adjusted_bottom_cm = base_bottom_cm * zoom_factor;

    let total_range_cm = adjusted_top_cm - adjusted_bottom_cm;
    let pixels_per_cm = if entities.is_empty() {
        0.0
    } else if container_height_px > 0.0 && total_range_cm > 0.0 {
        container_height_px / total_range_cm
    } else {
        0.0
    };

    tracing::debug!(
        "vertical scale: max={:.1}cm zoom={} factor={:.2} top={:.2} bottom={:.2} step={} px/cm={:.4}",
        max_height_cm,
        zoom,
        zoom_factor,
        adjusted_top_cm,
        adjusted_bottom_cm,
        major_step_cm,
        pixels_per_cm
    );

    VerticalScale {
        max_height_cm,
        zoom_factor,
        scale_top_cm: adjusted_top_cm,
        scale_bottom_cm: adjusted_bottom_cm,
        major_step_cm,
        pixels_per_cm,
        container_height_px,
    }
}
