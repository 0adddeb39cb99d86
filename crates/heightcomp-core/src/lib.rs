//! # HeightComp Core
//!
//! Core types and utilities for HeightComp.
//! Provides the entity data model, unit conversion, the entity events
//! emitted by the interaction layer, and the entity store with its
//! injectable load/save hooks.

pub mod entity;
pub mod error;
pub mod events;
pub mod store;
pub mod units;

pub use entity::{Entity, EntityId, ImageRef, Silhouette, DEFAULT_COLOR};
pub use error::{EntityError, Error, Result, StorageError};
pub use events::{EntityEvent, OffsetUpdate};
pub use store::{EntityStorage, EntityStore, MemoryStorage};
pub use units::{cm_to_ft_in, cm_to_label, MeasurementSystem};
