//! Entity event definitions.
//!
//! These are the requests the interaction layer sends towards the entity
//! store. Events are cloneable and serializable for logging/replay.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Partial offset update; `None` leaves the axis untouched
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OffsetUpdate {
    /// New horizontal offset in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_offset_cm: Option<f64>,
    /// New vertical offset in centimeters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_offset_cm: Option<f64>,
}

impl OffsetUpdate {
    /// Update both axes
    pub fn both(horizontal_offset_cm: f64, vertical_offset_cm: f64) -> Self {
        Self {
            horizontal_offset_cm: Some(horizontal_offset_cm),
            vertical_offset_cm: Some(vertical_offset_cm),
        }
    }

    /// Update the horizontal axis only
    pub fn horizontal(horizontal_offset_cm: f64) -> Self {
        Self {
            horizontal_offset_cm: Some(horizontal_offset_cm),
            vertical_offset_cm: None,
        }
    }

    /// Update the vertical axis only
    pub fn vertical(vertical_offset_cm: f64) -> Self {
        Self {
            horizontal_offset_cm: None,
            vertical_offset_cm: Some(vertical_offset_cm),
        }
    }

    /// True when neither axis is set
    pub fn is_empty(&self) -> bool {
        self.horizontal_offset_cm.is_none() && self.vertical_offset_cm.is_none()
    }
}

/// Requests addressed to the entity store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityEvent {
    /// Offsets were changed by a drag
    OffsetsChanged {
        /// Target entity.
        id: EntityId,
        /// Absolute new offset values.
        update: OffsetUpdate,
    },
    /// A mouse click asks to open the editor
    EditRequested {
        /// Target entity.
        id: EntityId,
    },
    /// The delete affordance was used
    DeleteRequested {
        /// Target entity.
        id: EntityId,
    },
    /// A touch tap asks for the transient options affordance
    TapOptionsRequested {
        /// Target entity.
        id: EntityId,
    },
}

impl EntityEvent {
    /// Entity the event targets
    pub fn id(&self) -> EntityId {
        match self {
            EntityEvent::OffsetsChanged { id, .. }
            | EntityEvent::EditRequested { id }
            | EntityEvent::DeleteRequested { id }
            | EntityEvent::TapOptionsRequested { id } => *id,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            EntityEvent::OffsetsChanged { id, update } => format!(
                "Offsets of {} -> x={:?} y={:?}",
                id, update.horizontal_offset_cm, update.vertical_offset_cm
            ),
            EntityEvent::EditRequested { id } => format!("Edit requested for {}", id),
            EntityEvent::DeleteRequested { id } => format!("Delete requested for {}", id),
            EntityEvent::TapOptionsRequested { id } => format!("Tap options for {}", id),
        }
    }
}
