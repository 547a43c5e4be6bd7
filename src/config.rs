//! Layout parameters and the on-disk configuration file.
//!
//! The file lives at `XDG_CONFIG_HOME/jgrid/config.toml` unless a path is
//! given explicitly. Every key is optional:
//!
//! ```toml
//! [layout]
//! min_row_height = 150
//! max_row_height = 400
//! gutter = 5
//!
//! [relayout]
//! debounce_ms = 300
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_ROW_HEIGHT: f64 = 150.0;
pub const DEFAULT_MAX_ROW_HEIGHT: f64 = 400.0;
pub const DEFAULT_GUTTER: f64 = 5.0;
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Inputs to a single layout run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Usable container width in pixels (padding already subtracted).
    pub container_width: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    /// Spacing between adjacent images and between rows.
    pub gutter: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            container_width: 0.0,
            min_row_height: DEFAULT_MIN_ROW_HEIGHT,
            max_row_height: DEFAULT_MAX_ROW_HEIGHT,
            gutter: DEFAULT_GUTTER,
        }
    }
}

impl LayoutConfig {
    /// Default row bounds and gutter for the given container width.
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let values = [
            self.container_width,
            self.min_row_height,
            self.max_row_height,
            self.gutter,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFinite);
        }
        if self.container_width <= 0.0 {
            return Err(ConfigError::NonPositiveWidth(self.container_width));
        }
        if self.max_row_height <= 0.0 {
            return Err(ConfigError::NonPositiveRowHeight(self.max_row_height));
        }
        if self.min_row_height > self.max_row_height {
            return Err(ConfigError::InvertedBounds {
                min: self.min_row_height,
                max: self.max_row_height,
            });
        }
        if self.gutter < 0.0 {
            return Err(ConfigError::NegativeGutter(self.gutter));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("container must have a positive width, got {0}")]
    NonPositiveWidth(f64),

    #[error("max row height must be positive, got {0}")]
    NonPositiveRowHeight(f64),

    #[error("min row height {min} exceeds max row height {max}")]
    InvertedBounds { min: f64, max: f64 },

    #[error("gutter must not be negative, got {0}")]
    NegativeGutter(f64),

    #[error("layout parameters must be finite numbers")]
    NonFinite,

    #[error("failed to read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub layout: LayoutSection,
    #[serde(default)]
    pub relayout: RelayoutSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LayoutSection {
    #[serde(default = "default_min_row_height")]
    pub min_row_height: f64,
    #[serde(default = "default_max_row_height")]
    pub max_row_height: f64,
    #[serde(default = "default_gutter")]
    pub gutter: f64,
}

impl Default for LayoutSection {
    fn default() -> Self {
        Self {
            min_row_height: DEFAULT_MIN_ROW_HEIGHT,
            max_row_height: DEFAULT_MAX_ROW_HEIGHT,
            gutter: DEFAULT_GUTTER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelayoutSection {
    /// Quiet window before a burst of resizes triggers a relayout.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for RelayoutSection {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

fn default_min_row_height() -> f64 {
    DEFAULT_MIN_ROW_HEIGHT
}

fn default_max_row_height() -> f64 {
    DEFAULT_MAX_ROW_HEIGHT
}

fn default_gutter() -> f64 {
    DEFAULT_GUTTER
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl GridConfig {
    /// Loads the config from `path`, or from the default location.
    ///
    /// A missing file yields the defaults; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(PathBuf::from).unwrap_or_else(default_path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn layout_config(&self, container_width: f64) -> LayoutConfig {
        LayoutConfig {
            container_width,
            min_row_height: self.layout.min_row_height,
            max_row_height: self.layout.max_row_height,
            gutter: self.layout.gutter,
        }
    }

    pub fn quiet_window(&self) -> Duration {
        Duration::from_millis(self.relayout.debounce_ms)
    }
}

/// Default config file path based on XDG directories.
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "jgrid")
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("jgrid.toml"))
}
