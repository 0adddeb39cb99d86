//! Config and entity file round trips on disk

use heightcomp_core::{Entity, EntityStorage, EntityStore, Silhouette};
use heightcomp_settings::{Config, EntitySnapshot, JsonFileStorage, SettingsError, SNAPSHOT_VERSION};
use std::path::PathBuf;
use tempfile::TempDir;

fn sample_entities() -> Vec<Entity> {
    let mut tall = Entity::from_silhouette("Alex", Silhouette::Male, 180.0).unwrap();
    tall.vertical_offset_cm = 12.5;
    let short = Entity::from_silhouette("Sam", Silhouette::Child, 110.0)
        .unwrap()
        .with_color("#ff0000");
    vec![tall, short]
}

#[test]
fn test_config_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.view.zoom_level = 70;
    config.interaction.long_press_ms = 300;
    config.storage.entities_file = Some(PathBuf::from("/data/entities.json"));
    config.save_to_file(&path).unwrap();

    let loaded = Config::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_config_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let mut config = Config::default();
    config.view.gap_px = 4.0;
    config.storage.autosave = false;
    config.save_to_file(&path).unwrap();

    assert_eq!(Config::load_from_file(&path).unwrap(), config);
}

#[test]
fn test_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let config = Config::load_or_default(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_config_is_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[view]\nzoom_level = 200\n").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidSetting { .. }));
}

#[test]
fn test_malformed_and_unsupported_config() {
    let dir = TempDir::new().unwrap();

    let path = dir.path().join("config.toml");
    std::fs::write(&path, "view = [").unwrap();
    assert!(matches!(
        Config::load_from_file(&path),
        Err(SettingsError::TomlError(_))
    ));

    let path = dir.path().join("config.yaml");
    assert!(matches!(
        Config::default().save_to_file(&path),
        Err(SettingsError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_entities_round_trip() {
    let dir = TempDir::new().unwrap();
    let mut storage = JsonFileStorage::new(dir.path().join("entities.json"));
    let entities = sample_entities();

    storage.save(&entities).unwrap();
    assert_eq!(storage.load().unwrap(), entities);

    let snapshot = storage.read_snapshot().unwrap().unwrap();
    assert_eq!(snapshot.version, SNAPSHOT_VERSION);
}

#[test]
fn test_missing_entity_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path().join("none.json"));
    assert!(storage.load().unwrap().is_empty());
}

#[test]
fn test_bare_entity_list_is_accepted() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    let entities = sample_entities();
    std::fs::write(&path, serde_json::to_string(&entities).unwrap()).unwrap();

    let storage = JsonFileStorage::new(&path);
    assert_eq!(storage.load().unwrap(), entities);
}

#[test]
fn test_newer_snapshot_is_refused() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    let mut snapshot = EntitySnapshot::new(sample_entities());
    snapshot.version = SNAPSHOT_VERSION + 1;
    std::fs::write(&path, serde_json::to_string(&snapshot).unwrap()).unwrap();

    let err = JsonFileStorage::new(&path).load().unwrap_err();
    assert!(err.is_storage_error());
}

#[test]
fn test_corrupt_file_is_a_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = JsonFileStorage::new(&path).load().unwrap_err();
    assert!(err.is_storage_error());
}

#[test]
fn test_store_persists_through_file() {
    let dir = TempDir::new().unwrap();
    let mut storage = JsonFileStorage::new(dir.path().join("deep").join("entities.json"));

    let mut store = EntityStore::new();
    for entity in sample_entities() {
        store.add(entity).unwrap();
    }
    assert!(store.persist(&mut storage));

    let reloaded = EntityStore::load_from(&storage).unwrap();
    assert_eq!(reloaded.entities(), store.entities());
}

#[test]
fn test_invalid_cached_entities_are_dropped() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("entities.json");
    let mut entities = sample_entities();
    entities[1].height_cm = -3.0;
    entities.push(entities[0].clone());
    std::fs::write(&path, serde_json::to_string(&entities).unwrap()).unwrap();

    let store = EntityStore::load_from(&JsonFileStorage::new(&path)).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.entities()[0].name, "Alex");
}
