//! Scene recompute.
//!
//! [`compute_scene`] runs the full pipeline (vertical scale, horizontal fit,
//! ruler marks, projection) in one pure call. Hosts call it whenever the
//! entity list, the zoom level or the container size changes; it is linear in
//! the number of entities.

use heightcomp_core::Entity;
use serde::{Deserialize, Serialize};

use crate::fit::{compute_horizontal_fit, HorizontalFit, DEFAULT_GAP_PX};
use crate::projector::{baseline_from_bottom_px, layout_row, row_width, ProjectedEntity, RowPlacement};
use crate::ruler::{generate_marks, RulerMark, DEFAULT_INTERVAL_TARGET};
use crate::scale::{compute_vertical_scale, VerticalScale};
use crate::viewport::{ViewportSize, ZoomLevel};

/// Tunables of the layout pipeline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutParams {
    /// Spacing between entities before compression
    pub gap_px: f64,
    /// Number of ruler intervals to aim for
    pub ruler_interval_target: u32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            gap_px: DEFAULT_GAP_PX,
            ruler_interval_target: DEFAULT_INTERVAL_TARGET,
        }
    }
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Zoom the scene was computed for
    pub zoom_level: ZoomLevel,
    /// Container the scene was computed for
    pub viewport: ViewportSize,
    /// Vertical pass before any compression
    pub scale: VerticalScale,
    /// Horizontal pass, holds the final range and scale
    pub fit: HorizontalFit,
    /// Ruler lines, ascending
    pub marks: Vec<RulerMark>,
    /// Entity boxes in list order
    pub entities: Vec<ProjectedEntity>,
    /// Ground line distance from the container's bottom edge
    pub baseline_px: f64,
    /// Width of the placed row
    pub row_width_px: f64,
}

impl Scene {
    /// A scene with nothing to draw
    pub fn empty(zoom_level: ZoomLevel, viewport: ViewportSize, params: &LayoutParams) -> Self {
        compute_scene(&[], zoom_level, viewport, params)
    }

    /// Final vertical scale; 0 when nothing can be drawn
    pub fn pixels_per_cm(&self) -> f64 {
        self.fit.pixels_per_cm
    }

    /// Horizontal compression in `(0, 1]`
    pub fn horizontal_scale_factor(&self) -> f64 {
        self.fit.horizontal_scale_factor
    }

    /// Ruler step shown to dependent UI (e.g. the nudge step display)
    pub fn major_step_cm(&self) -> f64 {
        self.fit.revised_major_step_cm
    }

    /// Top of the visible range
    pub fn top_cm(&self) -> f64 {
        self.fit.revised_top_cm
    }

    /// Bottom of the visible range
    pub fn bottom_cm(&self) -> f64 {
        self.fit.revised_bottom_cm
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.pixels_per_cm() <= 0.0
    }

    /// Container y (top-down) of a value on the vertical axis
    pub fn y_for_cm(&self, value_cm: f64) -> f64 {
        self.viewport.container_height_px - (value_cm - self.bottom_cm()) * self.pixels_per_cm()
    }

    /// Topmost entity box under a container point
    pub fn hit_test(&self, x: f64, y: f64) -> Option<&ProjectedEntity> {
        self.entities.iter().rev().find(|e| e.contains(x, y))
    }
}

/// Compute the scene for the given inputs.
pub fn compute_scene(
    entities: &[Entity],
    zoom_level: ZoomLevel,
    viewport: ViewportSize,
    params: &LayoutParams,
) -> Scene {
    let scale = compute_vertical_scale(
        entities,
        zoom_level,
        viewport.container_height_px,
        params.ruler_interval_target,
    );
    let fit = compute_horizontal_fit(entities, &scale, viewport.available_width_px, params.gap_px);

    if fit.pixels_per_cm <= 0.0 {
        tracing::debug!(
            "scene: nothing to draw ({} entities, viewport {})",
            entities.len(),
            viewport
        );
        return Scene {
            zoom_level,
            viewport,
            scale,
            fit,
            marks: Vec::new(),
            entities: Vec::new(),
            baseline_px: 0.0,
            row_width_px: 0.0,
        };
    }

    let marks = generate_marks(
        fit.revised_top_cm,
        fit.revised_bottom_cm,
        fit.revised_major_step_cm,
    );

    let placement = RowPlacement {
        pixels_per_cm: fit.pixels_per_cm,
        horizontal_scale_factor: fit.horizontal_scale_factor,
        scaled_gap_px: fit.scaled_gap_px,
        scale_bottom_cm: fit.revised_bottom_cm,
        container_height_px: viewport.container_height_px,
    };
    let projected = layout_row(entities, &placement);
    let row_width_px = row_width(&projected);

    tracing::debug!(
        "scene: {} entities, {} marks, step={} px/cm={:.4} row={:.1}px",
        projected.len(),
        marks.len(),
        fit.revised_major_step_cm,
        fit.pixels_per_cm,
        row_width_px
    );

    Scene {
        zoom_level,
        viewport,
        scale,
        fit,
        marks,
        entities: projected,
        baseline_px: baseline_from_bottom_px(fit.revised_bottom_cm, fit.pixels_per_cm),
        row_width_px,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heightcomp_core::ImageRef;

    fn entity(height_cm: f64, aspect_ratio: f64) -> Entity {
        Entity::new("", ImageRef::from("x.svg"), height_cm, aspect_ratio).unwrap()
    }

    #[test]
    fn test_reference_scene_fits_width() {
        let entities = vec![entity(180.0, 0.4), entity(160.0, 0.4)];
        let scene = compute_scene(
            &entities,
            ZoomLevel::new(50),
            ViewportSize::new(400.0, 800.0),
            &LayoutParams::default(),
        );

        assert!(scene.fit.is_compressed());
        assert!((scene.row_width_px - 400.0).abs() < 1e-6);
        assert_eq!(scene.major_step_cm(), 25.9);
        assert_eq!(scene.entities.len(), 2);
        // Ground line sits where the ruler's zero mark is drawn
        let zero_y = scene.y_for_cm(0.0);
        assert!((zero_y - (800.0 - scene.baseline_px)).abs() < 1e-9);
        let first = &scene.entities[0];
        assert!((first.top_px + first.height_px - zero_y).abs() < 1e-9);
    }

    #[test]
    fn test_ruler_spans_the_container() {
        let entities = vec![entity(180.0, 0.2)];
        let scene = compute_scene(
            &entities,
            ZoomLevel::new(50),
            ViewportSize::new(1000.0, 600.0),
            &LayoutParams::default(),
        );
        assert!(!scene.fit.is_compressed());
        assert!((scene.y_for_cm(scene.top_cm())).abs() < 1e-9);
        assert!((scene.y_for_cm(scene.bottom_cm()) - 600.0).abs() < 1e-9);
        assert!(scene.marks.iter().any(|m| m.is_zero()));
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::empty(
            ZoomLevel::default(),
            ViewportSize::new(400.0, 800.0),
            &LayoutParams::default(),
        );
        assert!(scene.is_empty());
        assert!(scene.marks.is_empty());
        assert!(scene.entities.is_empty());
        assert!(scene.major_step_cm() >= 10.0);
    }

    #[test]
    fn test_zero_viewport_is_empty() {
        let entities = vec![entity(180.0, 0.4)];
        for viewport in [ViewportSize::new(0.0, 800.0), ViewportSize::new(400.0, 0.0)] {
            let scene = compute_scene(
                &entities,
                ZoomLevel::default(),
                viewport,
                &LayoutParams::default(),
            );
            assert!(scene.is_empty());
            assert!(scene.entities.is_empty());
        }
    }

    #[test]
    fn test_hit_test_returns_entity_under_point() {
        let entities = vec![entity(180.0, 0.4), entity(120.0, 0.4)];
        let scene = compute_scene(
            &entities,
            ZoomLevel::default(),
            ViewportSize::new(2000.0, 800.0),
            &LayoutParams::default(),
        );
        let second = &scene.entities[1];
        let hit = scene
            .hit_test(second.left_px + 1.0, second.top_px + 1.0)
            .unwrap();
        assert_eq!(hit.id, entities[1].id);
        assert!(scene.hit_test(-100.0, -100.0).is_none());
    }
}
