//! Unified pointer model.
//!
//! Mouse and touch input are reported the same way; they only differ in how a
//! drag is activated (distance threshold vs. long press).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of device behind a pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Mouse or pen with hover
    Mouse,
    /// Finger on a touch surface
    Touch,
}

impl fmt::Display for PointerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mouse => write!(f, "mouse"),
            Self::Touch => write!(f, "touch"),
        }
    }
}

/// Host-assigned pointer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointerId(pub u64);

impl PointerId {
    /// The mouse has a single fixed id
    pub const MOUSE: PointerId = PointerId(0);
}

/// Position in container pixels (top-down y)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `origin` to this position
    pub fn delta_from(&self, origin: PointerPosition) -> (f64, f64) {
        (self.x - origin.x, self.y - origin.y)
    }

    /// Euclidean distance to another position
    pub fn distance_to(&self, other: PointerPosition) -> f64 {
        let (dx, dy) = self.delta_from(other);
        dx.hypot(dy)
    }
}

/// One pointer event as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub id: PointerId,
    pub kind: PointerKind,
    pub position: PointerPosition,
}

impl PointerSample {
    /// Mouse sample at a container position
    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            id: PointerId::MOUSE,
            kind: PointerKind::Mouse,
            position: PointerPosition::new(x, y),
        }
    }

    /// Touch sample for finger `id` at a container position
    pub fn touch(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: PointerId(id),
            kind: PointerKind::Touch,
            position: PointerPosition::new(x, y),
        }
    }

    /// Same pointer, moved to another position
    pub fn at(self, x: f64, y: f64) -> Self {
        Self {
            position: PointerPosition::new(x, y),
            ..self
        }
    }
}
