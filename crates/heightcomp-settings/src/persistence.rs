//! Entity list persistence
//!
//! [`JsonFileStorage`] is the file backed [`EntityStorage`] hook: the entity
//! list is written as a versioned JSON snapshot. Plain JSON arrays of
//! entities are accepted on load as well.

use chrono::{DateTime, Utc};
use heightcomp_core::{Entity, EntityStorage, StorageError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::SettingsResult;

/// Snapshot format written by this version
pub const SNAPSHOT_VERSION: u32 = 1;

/// Entity list as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntitySnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub entities: Vec<Entity>,
}

impl EntitySnapshot {
    /// Snapshot of `entities` taken now
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            entities,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntities {
    Snapshot(EntitySnapshot),
    List(Vec<Entity>),
}

/// Entity storage in a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at the location configured in `config`
    pub fn from_config(config: &Config) -> SettingsResult<Self> {
        Ok(Self::new(config.storage.entities_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw snapshot; `None` when the file does not exist
    pub fn read_snapshot(&self) -> heightcomp_core::Result<Option<EntitySnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path).map_err(StorageError::from)?;
        let stored: StoredEntities = serde_json::from_str(&content).map_err(StorageError::from)?;

        let snapshot = match stored {
            StoredEntities::Snapshot(snapshot) => snapshot,
            StoredEntities::List(entities) => {
                tracing::debug!("{} holds a bare entity list", self.path.display());
                EntitySnapshot {
                    version: 0,
                    saved_at: DateTime::<Utc>::default(),
                    entities,
                }
            }
        };

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(StorageError::Other {
                message: format!(
                    "{} was written by a newer version (snapshot v{})",
                    self.path.display(),
                    snapshot.version
                ),
            }
            .into());
        }
        Ok(Some(snapshot))
    }
}

impl EntityStorage for JsonFileStorage {
    fn load(&self) -> heightcomp_core::Result<Vec<Entity>> {
        match self.read_snapshot()? {
            Some(snapshot) => {
                tracing::debug!(
                    "Loaded {} entities from {}",
                    snapshot.entities.len(),
                    self.path.display()
                );
                Ok(snapshot.entities)
            }
            None => {
                tracing::debug!("No entity file at {}", self.path.display());
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, entities: &[Entity]) -> heightcomp_core::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StorageError::from)?;
        }
        let snapshot = EntitySnapshot::new(entities.to_vec());
        let json = serde_json::to_string_pretty(&snapshot).map_err(StorageError::from)?;
        std::fs::write(&self.path, json).map_err(StorageError::from)?;
        tracing::debug!("Saved {} entities to {}", entities.len(), self.path.display());
        Ok(())
    }
}
