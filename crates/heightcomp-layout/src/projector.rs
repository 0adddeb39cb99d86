//! Layout projector.
//!
//! Turns entities into pixel boxes. Entities sit left to right in list order on
//! a shared ground line, each taking its width plus the scaled gap, and are
//! then displaced by their own physical offsets.
//!
//! Container coordinates are top-down: `y = 0` is the top edge, so a positive
//! (upward) vertical offset becomes a negative pixel offset.

use heightcomp_core::{Entity, EntityId};
use serde::{Deserialize, Serialize};

use crate::fit::entity_pixel_size;

/// Pixel geometry of one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedEntity {
    /// Entity this box belongs to
    pub id: EntityId,
    /// Box width
    pub width_px: f64,
    /// Box height
    pub height_px: f64,
    /// Horizontal displacement from the slot
    pub x_offset_px: f64,
    /// Vertical displacement from the ground line (top-down)
    pub y_offset_px: f64,
    /// Left edge of the entity's slot in the row
    pub slot_x_px: f64,
    /// Final left edge in container coordinates
    pub left_px: f64,
    /// Final top edge in container coordinates
    pub top_px: f64,
}

impl ProjectedEntity {
    /// Whether a container point falls inside the box
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.left_px
            && x <= self.left_px + self.width_px
            && y >= self.top_px
            && y <= self.top_px + self.height_px
    }
}

/// Distance of the ground line from the container's bottom edge.
pub fn baseline_from_bottom_px(scale_bottom_cm: f64, pixels_per_cm: f64) -> f64 {
    (0.0 - scale_bottom_cm) * pixels_per_cm
}

/// Size and offset of each entity, without row placement.
pub fn project_entities(
    entities: &[Entity],
    pixels_per_cm: f64,
    horizontal_scale_factor: f64,
) -> Vec<ProjectedEntity> {
    entities
        .iter()
        .map(|entity| {
            let (width_px, height_px) = entity_pixel_size(entity, pixels_per_cm);
            let x_offset_px = entity.horizontal_offset_cm * pixels_per_cm * horizontal_scale_factor;
            let y_offset_px = -entity.vertical_offset_cm * pixels_per_cm;
            ProjectedEntity {
                id: entity.id,
                width_px,
                height_px,
                x_offset_px,
                y_offset_px,
                slot_x_px: 0.0,
                left_px: x_offset_px,
                top_px: y_offset_px,
            }
        })
        .collect()
}

/// Inputs for placing the row inside the container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    /// Vertical scale in effect
    pub pixels_per_cm: f64,
    /// Horizontal compression in effect
    pub horizontal_scale_factor: f64,
    /// Gap after compression
    pub scaled_gap_px: f64,
    /// Bottom of the visible range
    pub scale_bottom_cm: f64,
    /// Container height
    pub container_height_px: f64,
}

/// Project entities and place them on the ground line.
pub fn layout_row(entities: &[Entity], placement: &RowPlacement) -> Vec<ProjectedEntity> {
    let baseline_y = placement.container_height_px
        - baseline_from_bottom_px(placement.scale_bottom_cm, placement.pixels_per_cm);

    let mut cursor_x = 0.0;
    project_entities(
        entities,
        placement.pixels_per_cm,
        placement.horizontal_scale_factor,
    )
    .into_iter()
    .map(|mut projected| {
        projected.slot_x_px = cursor_x;
        projected.left_px = cursor_x + projected.x_offset_px;
        projected.top_px = baseline_y - projected.height_px + projected.y_offset_px;
        cursor_x += projected.width_px + placement.scaled_gap_px;
        projected
    })
    .collect()
}

/// Total width the placed row occupies (no trailing gap).
pub fn row_width(projected: &[ProjectedEntity]) -> f64 {
    projected
        .last()
        .map_or(0.0, |last| last.slot_x_px + last.width_px)
}

#[cfg(test)]
mod tests {
    use super::*;
    use heightcomp_core::ImageRef;

    fn entity(height_cm: f64, aspect_ratio: f64) -> Entity {
        Entity::new("", ImageRef::from("x.svg"), height_cm, aspect_ratio).unwrap()
    }

    #[test]
    fn test_projection_sizes() {
        let e = entity(100.0, 0.5);
        let projected = project_entities(&[e], 2.0, 1.0);
        assert_eq!(projected[0].height_px, 200.0);
        assert_eq!(projected[0].width_px, 100.0);
    }

    #[test]
    fn test_offsets_invert_vertical_axis() {
        let mut e = entity(100.0, 0.5);
        e.vertical_offset_cm = 10.0;
        e.horizontal_offset_cm = 10.0;
        let projected = project_entities(&[e], 2.0, 0.5);
        assert_eq!(projected[0].y_offset_px, -20.0);
        assert_eq!(projected[0].x_offset_px, 10.0);
    }

    #[test]
    fn test_row_placement() {
        let mut a = entity(100.0, 0.5);
        let b = entity(50.0, 1.0);
        a.vertical_offset_cm = 5.0;

        let placement = RowPlacement {
            pixels_per_cm: 2.0,
            horizontal_scale_factor: 1.0,
            scaled_gap_px: 10.0,
            scale_bottom_cm: -20.0,
            container_height_px: 400.0,
        };
        let row = layout_row(&[a, b], &placement);

        // Ground line is 40px above the bottom edge -> y = 360
        assert_eq!(row[0].slot_x_px, 0.0);
        assert_eq!(row[0].top_px, 360.0 - 200.0 - 10.0);
        assert_eq!(row[1].slot_x_px, 110.0);
        assert_eq!(row[1].left_px, 110.0);
        assert_eq!(row[1].top_px, 360.0 - 100.0);
        assert_eq!(row_width(&row), 210.0);
        assert!(row[1].contains(150.0, 300.0));
        assert!(!row[1].contains(50.0, 300.0));
    }

    #[test]
    fn test_baseline_position() {
        assert_eq!(baseline_from_bottom_px(-36.0, 2.0), 72.0);
        assert_eq!(baseline_from_bottom_px(-36.0, 0.0), 0.0);
    }
}
