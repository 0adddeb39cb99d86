//! Entity store
//!
//! Owns the ordered list of compared entities and enforces the data model
//! invariants (unique ids, positive heights and aspect ratios). Persistence is
//! injected through [`EntityStorage`]; the layout code only ever sees a slice
//! of entities and never touches storage itself.

use std::collections::HashSet;

use crate::entity::{validate_aspect_ratio, validate_height, Entity, EntityId, Silhouette};
use crate::error::{EntityError, Result};
use crate::events::{EntityEvent, OffsetUpdate};

/// Load/save hooks for the entity list
pub trait EntityStorage {
    /// Load the persisted entities; an absent cache loads as an empty list
    fn load(&self) -> Result<Vec<Entity>>;

    /// Persist the given entities
    fn save(&mut self, entities: &[Entity]) -> Result<()>;
}

/// In-memory storage, useful for tests and hosts without a cache
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entities: Vec<Entity>,
    save_count: usize,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that loads the given entities
    pub fn with_entities(entities: Vec<Entity>) -> Self {
        Self {
            entities,
            save_count: 0,
        }
    }

    /// Entities from the last save
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of saves performed
    pub fn save_count(&self) -> usize {
        self.save_count
    }
}

impl EntityStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Entity>> {
        Ok(self.entities.clone())
    }

    fn save(&mut self, entities: &[Entity]) -> Result<()> {
        self.entities = entities.to_vec();
        self.save_count += 1;
        Ok(())
    }
}

/// Ordered list of entities with unique ids
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: Vec<Entity>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded entities.
    ///
    /// Entities that fail validation or repeat an id are dropped so a corrupted
    /// cache cannot break the store invariants.
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(entities.len());

        for entity in entities {
            if let Err(e) = entity.validate() {
                tracing::warn!("Dropping cached entity {}: {}", entity.id, e);
                continue;
            }
            if !seen.insert(entity.id) {
                tracing::warn!("Dropping cached entity with duplicate id {}", entity.id);
                continue;
            }
            kept.push(entity);
        }

        Self { entities: kept }
    }

    /// Load from storage
    pub fn load_from<S: EntityStorage + ?Sized>(storage: &S) -> Result<Self> {
        let entities = storage.load()?;
        tracing::debug!("Loaded {} cached entities", entities.len());
        Ok(Self::from_entities(entities))
    }

    /// Best-effort save; failures are logged and reported as `false`
    pub fn persist<S: EntityStorage + ?Sized>(&self, storage: &mut S) -> bool {
        match storage.save(&self.entities) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Failed to persist entities: {}", e);
                false
            }
        }
    }

    /// All entities in display order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Iterate entities in display order
    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.entities.iter()
    }

    /// Number of entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Look up an entity
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Whether an entity with this id exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Append an entity at the end of the row
    pub fn add(&mut self, entity: Entity) -> Result<EntityId> {
        entity.validate()?;
        if self.contains(entity.id) {
            return Err(EntityError::DuplicateId { id: entity.id }.into());
        }
        let id = entity.id;
        self.entities.push(entity);
        tracing::debug!("Added entity {}", id);
        Ok(id)
    }

    /// Remove an entity, returning it
    pub fn remove(&mut self, id: EntityId) -> Result<Entity> {
        let index = self.index_of(id)?;
        tracing::debug!("Removed entity {}", id);
        Ok(self.entities.remove(index))
    }

    /// Remove all entities
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Change an entity's height
    pub fn set_height(&mut self, id: EntityId, height_cm: f64) -> Result<()> {
        validate_height(height_cm)?;
        self.get_mut(id)?.height_cm = height_cm;
        Ok(())
    }

    /// Change an entity's label
    pub fn set_name(&mut self, id: EntityId, name: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.name = name.into();
        Ok(())
    }

    /// Change an entity's tint
    pub fn set_color(&mut self, id: EntityId, color: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.color = color.into();
        Ok(())
    }

    /// Swap the visual for a bundled silhouette, which also replaces the aspect ratio
    pub fn set_silhouette(&mut self, id: EntityId, silhouette: Silhouette) -> Result<()> {
        let entity = self.get_mut(id)?;
        entity.image_ref = silhouette.image_ref();
        entity.aspect_ratio = silhouette.aspect_ratio();
        Ok(())
    }

    /// Swap the visual for an arbitrary image
    pub fn set_image(
        &mut self,
        id: EntityId,
        image_ref: crate::entity::ImageRef,
        aspect_ratio: f64,
    ) -> Result<()> {
        validate_aspect_ratio(aspect_ratio)?;
        let entity = self.get_mut(id)?;
        entity.image_ref = image_ref;
        entity.aspect_ratio = aspect_ratio;
        Ok(())
    }

    /// Apply a partial offset update
    pub fn set_offsets(&mut self, id: EntityId, update: OffsetUpdate) -> Result<()> {
        let entity = self.get_mut(id)?;
        if let Some(x) = update.horizontal_offset_cm {
            entity.horizontal_offset_cm = x;
        }
        if let Some(y) = update.vertical_offset_cm {
            entity.vertical_offset_cm = y;
        }
        Ok(())
    }

    /// Put an entity back on the baseline in its own slot
    pub fn reset_offsets(&mut self, id: EntityId) -> Result<()> {
        self.set_offsets(id, OffsetUpdate::both(0.0, 0.0))
    }

    /// Move an entity to a new position in the row
    pub fn move_to(&mut self, id: EntityId, index: usize) -> Result<()> {
        let from = self.index_of(id)?;
        let entity = self.entities.remove(from);
        let index = index.min(self.entities.len());
        self.entities.insert(index, entity);
        Ok(())
    }

    /// Apply an event; returns whether the list changed
    pub fn apply(&mut self, event: &EntityEvent) -> Result<bool> {
        tracing::trace!("{}", event.description());
        match event {
            EntityEvent::OffsetsChanged { id, update } => {
                self.set_offsets(*id, *update)?;
                Ok(!update.is_empty())
            }
            EntityEvent::DeleteRequested { id } => {
                self.remove(*id)?;
                Ok(true)
            }
            EntityEvent::EditRequested { .. } | EntityEvent::TapOptionsRequested { .. } => {
                Ok(false)
            }
        }
    }

    fn index_of(&self, id: EntityId) -> Result<usize> {
        self.entities
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| EntityError::NotFound { id }.into())
    }

    fn get_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EntityError::NotFound { id }.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ImageRef;
    use crate::error::{Error, StorageError};

    fn person(height_cm: f64) -> Entity {
        Entity::new("p", ImageRef::from("p.svg"), height_cm, 0.4).unwrap()
    }

    #[test]
    fn test_add_and_get() {
        let mut store = EntityStore::new();
        let id = store.add(person(180.0)).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id).unwrap().height_cm, 180.0);
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut store = EntityStore::new();
        let entity = person(170.0);
        store.add(entity.clone()).unwrap();
        let err = store.add(entity).unwrap_err();
        assert!(matches!(err, Error::Entity(EntityError::DuplicateId { .. })));
    }

    #[test]
    fn test_invalid_height_rejected() {
        let mut store = EntityStore::new();
        let id = store.add(person(170.0)).unwrap();
        assert!(store.set_height(id, 0.0).is_err());
        assert_eq!(store.get(id).unwrap().height_cm, 170.0);
    }

    #[test]
    fn test_partial_offset_update() {
        let mut store = EntityStore::new();
        let id = store.add(person(170.0)).unwrap();
        store.set_offsets(id, OffsetUpdate::both(5.0, 6.0)).unwrap();
        store.set_offsets(id, OffsetUpdate::vertical(-1.0)).unwrap();
        let e = store.get(id).unwrap();
        assert_eq!(e.horizontal_offset_cm, 5.0);
        assert_eq!(e.vertical_offset_cm, -1.0);

        store.reset_offsets(id).unwrap();
        assert!(!store.get(id).unwrap().has_offsets());
    }

    #[test]
    fn test_silhouette_swap_changes_aspect_ratio() {
        let mut store = EntityStore::new();
        let id = store.add(person(120.0)).unwrap();
        store.set_silhouette(id, Silhouette::Child).unwrap();
        assert_eq!(
            store.get(id).unwrap().aspect_ratio,
            Silhouette::Child.aspect_ratio()
        );
    }

    #[test]
    fn test_move_to_reorders() {
        let mut store = EntityStore::new();
        let a = store.add(person(100.0)).unwrap();
        let b = store.add(person(110.0)).unwrap();
        let c = store.add(person(120.0)).unwrap();
        store.move_to(c, 0).unwrap();
        let order: Vec<_> = store.iter().map(|e| e.id).collect();
        assert_eq!(order, vec![c, a, b]);
        store.move_to(c, 99).unwrap();
        assert_eq!(store.entities().last().unwrap().id, c);
    }

    #[test]
    fn test_apply_events() {
        let mut store = EntityStore::new();
        let id = store.add(person(150.0)).unwrap();

        let changed = store
            .apply(&EntityEvent::OffsetsChanged {
                id,
                update: OffsetUpdate::horizontal(12.0),
            })
            .unwrap();
        assert!(changed);
        assert_eq!(store.get(id).unwrap().horizontal_offset_cm, 12.0);

        assert!(!store.apply(&EntityEvent::EditRequested { id }).unwrap());
        assert!(store.apply(&EntityEvent::DeleteRequested { id }).unwrap());
        assert!(store.is_empty());
        assert!(store.apply(&EntityEvent::DeleteRequested { id }).is_err());
    }

    #[test]
    fn test_from_entities_drops_invalid_and_duplicates() {
        let good = person(160.0);
        let mut bad = person(160.0);
        bad.height_cm = -1.0;
        let entities = vec![good.clone(), bad, good.clone()];

        let store = EntityStore::from_entities(entities);
        assert_eq!(store.len(), 1);
        assert_eq!(store.entities()[0].id, good.id);
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        let mut store = EntityStore::new();
        store.add(person(175.0)).unwrap();
        assert!(store.persist(&mut storage));
        assert_eq!(storage.save_count(), 1);

        let loaded = EntityStore::load_from(&storage).unwrap();
        assert_eq!(loaded.entities(), store.entities());
    }

    struct FailingStorage;

    impl EntityStorage for FailingStorage {
        fn load(&self) -> Result<Vec<Entity>> {
            Err(StorageError::Other {
                message: "offline".to_string(),
            }
            .into())
        }

        fn save(&mut self, _entities: &[Entity]) -> Result<()> {
            Err(StorageError::Other {
                message: "offline".to_string(),
            }
            .into())
        }
    }

    #[test]
    fn test_persist_is_best_effort() {
        let store = EntityStore::new();
        assert!(!store.persist(&mut FailingStorage));
        assert!(EntityStore::load_from(&FailingStorage).is_err());
    }
}
