//! Configuration management for roomkit
//!
//! Sink defaults (volume, container anchor, retry policy) and grid defaults
//! (aspect ratio, pagination constraint), loadable from TOML with optional
//! `ROOMKIT__*` environment overrides.

use crate::errors::RoomkitError;
use crate::layout::{AspectRatio, LayoutConstraint};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomkitConfig {
    pub sink: SinkConfig,
    pub layout: LayoutConfig,
}

/// Audio sink configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Initial output volume (0-100)
    pub default_volume: f64,
    /// Element id to host the hidden audio container; root when absent
    pub container_anchor: Option<String>,
    /// Retry auto-paused tracks when the output device changes
    pub retry_on_device_change: bool,
}

/// Grid layout configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Tile aspect ratio [width, height]
    pub aspect_ratio: [f64; 2],
    /// Maximum tiles per page
    pub max_tile_count: Option<usize>,
    /// Maximum rows per page
    pub max_row_count: Option<usize>,
    /// Maximum columns per page
    pub max_col_count: Option<usize>,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            default_volume: 100.0,
            container_anchor: None,
            retry_on_device_change: true,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: [16.0, 9.0],
            max_tile_count: None,
            max_row_count: None,
            max_col_count: None,
        }
    }
}

impl LayoutConfig {
    pub fn aspect_ratio(&self) -> AspectRatio {
        AspectRatio::new(self.aspect_ratio[0], self.aspect_ratio[1])
    }

    /// The configured constraint; tile cap wins over rows, rows over columns
    pub fn constraint(&self) -> LayoutConstraint {
        match (self.max_tile_count, self.max_row_count, self.max_col_count) {
            (Some(n), _, _) => LayoutConstraint::MaxTiles(n),
            (None, Some(n), _) => LayoutConstraint::MaxRows(n),
            (None, None, Some(n)) => LayoutConstraint::MaxCols(n),
            (None, None, None) => LayoutConstraint::Unconstrained,
        }
    }
}

impl RoomkitConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, RoomkitError> {
        let path = path.as_ref();

        if !path.exists() {
            log::info!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| RoomkitError::Config(format!("Failed to read config file: {}", e)))?;

        let config: RoomkitConfig = toml::from_str(&contents)
            .map_err(|e| RoomkitError::Config(format!("Failed to parse config file: {}", e)))?;

        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Load from an optional TOML file, then apply `ROOMKIT__SECTION__KEY`
    /// environment overrides
    pub fn load_layered<P: AsRef<Path>>(path: P) -> Result<Self, RoomkitError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ROOMKIT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| RoomkitError::Config(format!("Failed to build config: {}", e)))?;

        settings
            .try_deserialize()
            .map_err(|e| RoomkitError::Config(format!("Failed to deserialize config: {}", e)))
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), RoomkitError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                RoomkitError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| RoomkitError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, toml_string)
            .map_err(|e| RoomkitError::Config(format!("Failed to write config file: {}", e)))?;

        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Get default config file path
    pub fn default_path() -> PathBuf {
        PathBuf::from("roomkit.toml")
    }

    /// Load from default location or fall back to defaults
    pub fn load_or_default() -> Self {
        Self::load_from_file(Self::default_path()).unwrap_or_else(|e| {
            log::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        let volume = self.sink.default_volume;
        if !volume.is_finite() || !(0.0..=100.0).contains(&volume) {
            return Err("Default volume must be between 0 and 100".to_string());
        }

        let [w, h] = self.layout.aspect_ratio;
        if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
            return Err("Aspect ratio sides must be positive".to_string());
        }

        let caps = [
            self.layout.max_tile_count,
            self.layout.max_row_count,
            self.layout.max_col_count,
        ];
        if caps.iter().filter(|c| c.is_some()).count() > 1 {
            return Err("At most one of max_tile_count, max_row_count, max_col_count".to_string());
        }
        if caps.contains(&Some(0)) {
            return Err("Layout caps must be greater than zero".to_string());
        }

        Ok(())
    }
}
