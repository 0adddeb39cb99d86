//! Horizontal fit solver.
//!
//! When the row of entities is wider than the container, the whole scene is
//! shrunk uniformly: widths and gaps are compressed and the vertical range is
//! stretched by the same factor so relative proportions stay accurate.

use heightcomp_core::Entity;
use serde::{Deserialize, Serialize};

use crate::ruler::round_step_for_display;
use crate::scale::VerticalScale;

/// Default spacing between neighbouring entities
pub const DEFAULT_GAP_PX: f64 = 16.0;

/// Result of the horizontal fit pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizontalFit {
    /// Compression in `(0, 1]`; 1 means the row fits as is
    pub horizontal_scale_factor: f64,
    /// Gap after compression
    pub scaled_gap_px: f64,
    /// Row width before compression
    pub ideal_total_width_px: f64,
    /// Top of the visible range after compression
    pub revised_top_cm: f64,
    /// Bottom of the visible range after compression
    pub revised_bottom_cm: f64,
    /// Ruler step after compression
    pub revised_major_step_cm: f64,
    /// Final vertical scale
    pub pixels_per_cm: f64,
}

impl HorizontalFit {
    /// Whether the row had to be compressed
    pub fn is_compressed(&self) -> bool {
        self.horizontal_scale_factor < 1.0
    }

    /// Identity fit that keeps the vertical scale untouched
    pub fn identity(scale: &VerticalScale, gap_px: f64) -> Self {
        Self {
            horizontal_scale_factor: 1.0,
            scaled_gap_px: gap_px,
            ideal_total_width_px: 0.0,
            revised_top_cm: scale.scale_top_cm,
            revised_bottom_cm: scale.scale_bottom_cm,
            revised_major_step_cm: scale.major_step_cm,
            pixels_per_cm: scale.pixels_per_cm,
        }
    }
}

/// Unscaled pixel size of one entity at `pixels_per_cm`, clamped to at least 1px
pub fn entity_pixel_size(entity: &Entity, pixels_per_cm: f64) -> (f64, f64) {
    let height = (entity.height_cm * pixels_per_cm).max(1.0);
    let width = (height * entity.aspect_ratio).max(1.0);
    (width, height)
}

/// Row width before any compression: widths plus the gaps between them
pub fn ideal_row_width(entities: &[Entity], pixels_per_cm: f64, gap_px: f64) -> f64 {
    let widths: f64 = entities
        .iter()
        .map(|e| entity_pixel_size(e, pixels_per_cm).0)
        .sum();
    let gaps = if entities.len() > 1 {
        gap_px * (entities.len() - 1) as f64
    } else {
        0.0
    };
    widths + gaps
}

/// Solve the horizontal fit for a vertical scale.
///
/// With nothing to draw (no entities, `pixels_per_cm == 0`) the scale passes
/// through unchanged. A non-positive width also leaves nothing to draw and
/// forces `pixels_per_cm` to 0 rather than dividing by it.
pub fn compute_horizontal_fit(
    entities: &[Entity],
    scale: &VerticalScale,
    available_width_px: f64,
    gap_px: f64,
) -> HorizontalFit {
    let gap_px = gap_px.max(0.0);

    if entities.is_empty() || !scale.is_drawable() {
        return HorizontalFit::identity(scale, gap_px);
    }

    if !(available_width_px.is_finite() && available_width_px > 0.0) {
        tracing::debug!("horizontal fit: no width available, nothing to draw");
        return HorizontalFit {
            pixels_per_cm: 0.0,
            ..HorizontalFit::identity(scale, gap_px)
        };
    }

    let ideal_total_width_px = ideal_row_width(entities, scale.pixels_per_cm, gap_px);

    if ideal_total_width_px <= available_width_px {
        return HorizontalFit {
            ideal_total_width_px,
            ..HorizontalFit::identity(scale, gap_px)
        };
    }

    let factor = available_width_px / ideal_total_width_px;
    let revised_top_cm = scale.scale_top_cm / factor;
    let revised_bottom_cm = scale.scale_bottom_cm / factor;
    let revised_major_step_cm = round_step_for_display(scale.major_step_cm / factor);
    let revised_range_cm = revised_top_cm - revised_bottom_cm;
    let pixels_per_cm = if revised_range_cm > 0.0 {
        scale.container_height_px / revised_range_cm
    } else {
        0.0
    };

    tracing::debug!(
        "horizontal fit: ideal={:.1}px available={:.1}px factor={:.4} top={:.2} bottom={:.2} step={} px/cm={:.4}",
        ideal_total_width_px,
        available_width_px,
        factor,
        revised_top_cm,
        revised_bottom_cm,
        revised_major_step_cm,
        pixels_per_cm
    );

    HorizontalFit {
        horizontal_scale_factor: factor,
        scaled_gap_px: gap_px * factor,
        ideal_total_width_px,
        revised_top_cm,
        revised_bottom_cm,
        revised_major_step_cm,
        pixels_per_cm,
    }
}
