//! Compared entities
//!
//! An entity is one subject on the comparison line: a person or an object with
//! a real-world height, a visual with a fixed aspect ratio, and user adjustable
//! offsets expressed in the same physical unit as the height.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::EntityError;

/// Default tint for mask-rendered silhouettes
pub const DEFAULT_COLOR: &str = "#4a5568";

/// Stable, unique entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    /// Create a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque reference to the visual drawn for an entity.
///
/// Typically a bundled silhouette path or a data URL of an uploaded image; the
/// layout code never looks inside.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(pub String);

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Bundled silhouette presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Silhouette {
    /// Adult male figure
    Male,
    /// Adult female figure
    Female,
    /// Child figure
    Child,
    /// Neutral figure
    Generic,
}

impl Silhouette {
    /// Get all silhouette presets
    pub fn all() -> &'static [Silhouette] {
        &[
            Silhouette::Male,
            Silhouette::Female,
            Silhouette::Child,
            Silhouette::Generic,
        ]
    }

    /// Width/height ratio of the bundled artwork
    pub fn aspect_ratio(&self) -> f64 {
        match self {
            Self::Male => 0.38,
            Self::Female => 0.34,
            Self::Child => 0.42,
            Self::Generic => 0.36,
        }
    }

    /// Reference to the bundled artwork
    pub fn image_ref(&self) -> ImageRef {
        let path = match self {
            Self::Male => "silhouettes/male.svg",
            Self::Female => "silhouettes/female.svg",
            Self::Child => "silhouettes/child.svg",
            Self::Generic => "silhouettes/generic.svg",
        };
        ImageRef(path.to_string())
    }
}

impl fmt::Display for Silhouette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
            Self::Child => write!(f, "Child"),
            Self::Generic => write!(f, "Generic"),
        }
    }
}

/// One compared subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    /// Unique id, never changes after creation
    pub id: EntityId,
    /// Free-text label, may be empty
    #[serde(default)]
    pub name: String,
    /// Visual drawn for this entity
    pub image_ref: ImageRef,
    /// Real-world height in centimeters
    pub height_cm: f64,
    /// Width/height ratio of the visual
    pub aspect_ratio: f64,
    /// Upward displacement in centimeters
    #[serde(default)]
    pub vertical_offset_cm: f64,
    /// Rightward displacement in centimeters
    #[serde(default)]
    pub horizontal_offset_cm: f64,
    /// Fill tint for silhouettes
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

impl Entity {
    /// Create a validated entity with zero offsets and the default color
    pub fn new(
        name: impl Into<String>,
        image_ref: ImageRef,
        height_cm: f64,
        aspect_ratio: f64,
    ) -> Result<Self, EntityError> {
        validate_height(height_cm)?;
        validate_aspect_ratio(aspect_ratio)?;

        Ok(Self {
            id: EntityId::new(),
            name: name.into(),
            image_ref,
            height_cm,
            aspect_ratio,
            vertical_offset_cm: 0.0,
            horizontal_offset_cm: 0.0,
            color: default_color(),
        })
    }

    /// Create an entity drawn with one of the bundled silhouettes
    pub fn from_silhouette(
        name: impl Into<String>,
        silhouette: Silhouette,
        height_cm: f64,
    ) -> Result<Self, EntityError> {
        Self::new(
            name,
            silhouette.image_ref(),
            height_cm,
            silhouette.aspect_ratio(),
        )
    }

    /// Builder style color override
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Check the numeric invariants of this entity
    pub fn validate(&self) -> Result<(), EntityError> {
        validate_height(self.height_cm)?;
        validate_aspect_ratio(self.aspect_ratio)
    }

    /// Whether any offset is non-zero
    pub fn has_offsets(&self) -> bool {
        self.vertical_offset_cm != 0.0 || self.horizontal_offset_cm != 0.0
    }
}

/// Height must be finite and strictly positive
pub fn validate_height(height_cm: f64) -> Result<(), EntityError> {
    if height_cm.is_finite() && height_cm > 0.0 {
        Ok(())
    } else {
        Err(EntityError::InvalidHeight { height_cm })
    }
}

/// Aspect ratio must be finite and strictly positive
pub fn validate_aspect_ratio(aspect_ratio: f64) -> Result<(), EntityError> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(EntityError::InvalidAspectRatio { aspect_ratio })
    }
}
