//! HeightComp Settings Crate
//!
//! Handles application configuration and the on-disk entity list.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{Config, InteractionSettings, StorageSettings, ViewSettings};
pub use error::{SettingsError, SettingsResult};
pub use persistence::{EntitySnapshot, JsonFileStorage, SNAPSHOT_VERSION};
