//! Resolution settings loaded from TOML.
//!
//! The defaults live in `config/default.toml`, embedded at compile time.
//! An override file only needs to name the keys it changes.

use std::path::Path;

use serde::Deserialize;

use crate::IsochroneError;

/// Embedded default configuration.
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Environment variable naming an override config file.
pub const CONFIG_ENV_VAR: &str = "ISOCHRONE_CONFIG";

/// Tunables for shape resolution and mock generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsochroneConfig {
    /// Invalid coordinate records logged per shell before going quiet.
    #[serde(default = "default_max_logged_invalid")]
    pub max_logged_invalid: usize,
    /// Whether to attempt the lat/lng swap correction.
    #[serde(default = "default_true")]
    pub axis_swap: bool,
    /// Offsets above this distance (km) are logged at error level.
    #[serde(default = "default_significant_offset_km")]
    pub significant_offset_km: f64,
    /// Mock polygon settings.
    #[serde(default)]
    pub mock: MockConfig,
}

/// Settings for the circular mock isochrone.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MockConfig {
    /// Vertices on the circle (before closing).
    #[serde(default = "default_mock_points")]
    pub points: usize,
    /// Assumed drive distance per minute, in km.
    #[serde(default = "default_km_per_minute")]
    pub km_per_minute: f64,
}

const fn default_true() -> bool {
    true
}

const fn default_max_logged_invalid() -> usize {
    5
}

const fn default_significant_offset_km() -> f64 {
    1.1
}

const fn default_mock_points() -> usize {
    32
}

const fn default_km_per_minute() -> f64 {
    1.0
}

impl Default for IsochroneConfig {
    fn default() -> Self {
        Self {
            max_logged_invalid: default_max_logged_invalid(),
            axis_swap: default_true(),
            significant_offset_km: default_significant_offset_km(),
            mock: MockConfig::default(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            points: default_mock_points(),
            km_per_minute: default_km_per_minute(),
        }
    }
}

impl IsochroneConfig {
    /// Parses a config from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`IsochroneError::Config`] if the TOML is malformed.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, IsochroneError> {
        Ok(toml::de::from_str(toml_str)?)
    }

    /// Loads the config from `path`, or the embedded defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`IsochroneError::Io`] if the file cannot be read, or
    /// [`IsochroneError::Config`] if it is malformed.
    pub fn load(path: Option<&Path>) -> Result<Self, IsochroneError> {
        match path {
            Some(path) => {
                log::info!("Loading isochrone config from {}", path.display());
                let contents = std::fs::read_to_string(path)?;
                Self::from_toml_str(&contents)
            }
            None => Self::from_toml_str(DEFAULT_CONFIG_TOML),
        }
    }

    /// Loads the config named by `ISOCHRONE_CONFIG`, falling back to the
    /// embedded defaults when the variable is unset or empty.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn from_env() -> Result<Self, IsochroneError> {
        let path = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|p| !p.trim().is_empty());
        Self::load(path.as_deref().map(Path::new))
    }
}
