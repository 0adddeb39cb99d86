//! Configuration Management
//!
//! Handles loading, saving, and validation of application configuration.
//! Supports JSON and TOML formats, selected by file extension, with the
//! platform config directory as the default location.

use heightcomp_interaction::DragConfig;
use heightcomp_layout::{LayoutParams, ZoomLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{SettingsError, SettingsResult};

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "heightcomp";
/// Default config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";
/// Default entity cache file name
pub const ENTITIES_FILE_NAME: &str = "entities.json";

/// Scale and ruler preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    /// Zoom level restored on startup (10-100)
    pub zoom_level: u8,
    /// Spacing between entities in pixels
    pub gap_px: f64,
    /// Number of ruler intervals to aim for
    pub ruler_interval_target: u32,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let layout = LayoutParams::default();
        Self {
            zoom_level: ZoomLevel::DEFAULT,
            gap_px: layout.gap_px,
            ruler_interval_target: layout.ruler_interval_target,
        }
    }
}

/// Drag and touch preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    /// Pointer travel before a press becomes a drag
    pub drag_threshold_px: f64,
    /// Touch hold time that starts a drag
    pub long_press_ms: u64,
    /// Offset bound in viewport spans
    pub offset_clamp_factor: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        let drag = DragConfig::default();
        Self {
            drag_threshold_px: drag.threshold_px,
            long_press_ms: u64::try_from(drag.long_press.as_millis()).unwrap_or(u64::MAX),
            offset_clamp_factor: drag.clamp_factor,
        }
    }
}

/// Where and when the entity list is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Entity cache file; the config directory is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities_file: Option<PathBuf>,
    /// Save after every change
    pub autosave: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            entities_file: None,
            autosave: true,
        }
    }
}

impl StorageSettings {
    /// Resolved entity cache path
    pub fn entities_path(&self) -> SettingsResult<PathBuf> {
        match &self.entities_file {
            Some(path) => Ok(path.clone()),
            None => Ok(Config::config_dir()?.join(ENTITIES_FILE_NAME)),
        }
    }
}

/// Complete application configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scale and ruler preferences
    #[serde(default)]
    pub view: ViewSettings,
    /// Drag preferences
    #[serde(default)]
    pub interaction: InteractionSettings,
    /// Entity persistence
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Application directory inside the platform config directory
    pub fn config_dir() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config directory on this platform".to_string())
            })
    }

    /// Default config file location
    pub fn default_path() -> SettingsResult<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load config, falling back to defaults when the file does not exist yet
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if !path.exists() {
            tracing::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = ConfigFormat::from_path(path)?;

        let content = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                SettingsError::ConfigDirectory(format!("{}: {}", parent.display(), e))
            })?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        if !(ZoomLevel::MIN..=ZoomLevel::MAX).contains(&self.view.zoom_level) {
            return Err(SettingsError::invalid(
                "view.zoom_level",
                format!("must be between {} and {}", ZoomLevel::MIN, ZoomLevel::MAX),
            ));
        }

        if !(self.view.gap_px.is_finite() && self.view.gap_px >= 0.0) {
            return Err(SettingsError::invalid("view.gap_px", "must be >= 0"));
        }

        if self.view.ruler_interval_target == 0 {
            return Err(SettingsError::invalid(
                "view.ruler_interval_target",
                "must be > 0",
            ));
        }

        if !(self.interaction.drag_threshold_px.is_finite()
            && self.interaction.drag_threshold_px > 0.0)
        {
            return Err(SettingsError::invalid(
                "interaction.drag_threshold_px",
                "must be > 0",
            ));
        }

        if !(self.interaction.offset_clamp_factor.is_finite()
            && self.interaction.offset_clamp_factor > 0.0)
        {
            return Err(SettingsError::invalid(
                "interaction.offset_clamp_factor",
                "must be > 0",
            ));
        }

        Ok(())
    }

    /// Zoom level to restore
    pub fn zoom_level(&self) -> ZoomLevel {
        ZoomLevel::new(self.view.zoom_level)
    }

    /// Remember the current zoom level
    pub fn set_zoom_level(&mut self, zoom: ZoomLevel) {
        self.view.zoom_level = zoom.get();
    }

    /// Parameters for the layout pipeline
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            gap_px: self.view.gap_px,
            ruler_interval_target: self.view.ruler_interval_target,
        }
    }

    /// Parameters for the drag controller
    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            threshold_px: self.interaction.drag_threshold_px,
            long_press: Duration::from_millis(self.interaction.long_press_ms),
            clamp_factor: self.interaction.offset_clamp_factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    fn from_path(path: &Path) -> SettingsResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(SettingsError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}
