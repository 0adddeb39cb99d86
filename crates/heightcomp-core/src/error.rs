//! Error handling for HeightComp
//!
//! The scale, layout and drag code never fails: degenerate input is clamped or
//! defaulted instead. Errors only exist at the edges of the system:
//! - Entity errors (validation of user supplied values, store lookups)
//! - Storage errors (the best-effort entity cache)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::entity::EntityId;

/// Entity error type
///
/// Raised when a value handed to the entity store would break one of the
/// entity invariants (positive height, positive aspect ratio, unique id).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntityError {
    /// Height must be a positive, finite number of centimeters
    #[error("Invalid height: {height_cm} cm (must be > 0)")]
    InvalidHeight {
        /// The rejected height in centimeters.
        height_cm: f64,
    },

    /// Aspect ratio must be a positive, finite number
    #[error("Invalid aspect ratio: {aspect_ratio} (must be > 0)")]
    InvalidAspectRatio {
        /// The rejected width/height ratio.
        aspect_ratio: f64,
    },

    /// An entity with the same id is already present
    #[error("Duplicate entity id: {id}")]
    DuplicateId {
        /// The id that already exists.
        id: EntityId,
    },

    /// No entity with the given id exists
    #[error("Entity not found: {id}")]
    NotFound {
        /// The id that was looked up.
        id: EntityId,
    },
}

/// Storage error type
///
/// Represents failures of the load/save hooks injected into the entity store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Underlying I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be encoded or decoded
    #[error("Storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Any other backend specific failure
    #[error("Storage error: {message}")]
    Other {
        /// The error message.
        message: String,
    },
}

/// Main error type for HeightComp
#[derive(Error, Debug)]
pub enum Error {
    /// Entity error
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an entity validation or lookup error
    pub fn is_entity_error(&self) -> bool {
        matches!(self, Error::Entity(_))
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
