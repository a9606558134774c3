#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Application configuration.
//!
//! Settings are read from a TOML file (path in `SAFE_STEPS_CONFIG`,
//! default `safe_steps.toml`) and then overridden by individual
//! environment variables. Every field has a default, so a missing file or
//! a partial one is fine.
//!
//! ```toml
//! [server]
//! bind_addr = "0.0.0.0"
//! port = 8080
//!
//! [reports]
//! path = "data/reports.json"
//!
//! [explore]
//! radius_km = 10.0
//! seed = 42
//!
//! [locality]
//! enabled = true
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "SAFE_STEPS_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "safe_steps.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error (file read).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`AppConfig`].
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// An environment override could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: String,
        /// Offending value.
        value: String,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

/// Where incident reports are read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportsConfig {
    /// JSON file holding an array of report records.
    pub path: PathBuf,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/reports.json"),
        }
    }
}

/// Nearby-list and safe-spot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExploreConfig {
    /// Radius of the nearby list, in kilometres.
    pub radius_km: f64,
    /// Fixes the safe-spot random source. Unset means fresh spots on
    /// every request.
    pub seed: Option<u64>,
}

impl Default for ExploreConfig {
    fn default() -> Self {
        Self {
            radius_km: 10.0,
            seed: None,
        }
    }
}

/// Reverse-geocoding settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalityConfig {
    /// Whether to call out to the reverse geocoder at all.
    pub enabled: bool,
    /// Nominatim `/reverse` endpoint.
    pub base_url: String,
    /// `User-Agent` sent with every request.
    pub user_agent: String,
}

impl Default for LocalityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://nominatim.openstreetmap.org/reverse".to_string(),
            user_agent: format!("safe-steps/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reports: ReportsConfig,
    pub explore: ExploreConfig,
    pub locality: LocalityConfig,
}

impl AppConfig {
    /// Parses a TOML document. Missing sections and keys take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is malformed.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::de::from_str(s)?)
    }

    /// Reads the config file at `path`. A missing file yields defaults.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::Io`] if the file exists but cannot be read
    /// * [`ConfigError::Parse`] if it is malformed
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                log::info!("Loading config from {}", path.display());
                Self::from_toml_str(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config file at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Loads the config file named by the environment, then applies the
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file or an override is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load(Path::new(&path))?;
        config.apply_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Applies `BIND_ADDR`, `PORT`, `SAFE_STEPS_REPORTS`,
    /// `SAFE_STEPS_RADIUS_KM` and `SAFE_STEPS_SEED` as looked up by
    /// `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnv`] for the first value that does
    /// not parse.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(bind_addr) = lookup("BIND_ADDR") {
            self.server.bind_addr = bind_addr;
        }
        if let Some(port) = parse_override(&lookup, "PORT")? {
            self.server.port = port;
        }
        if let Some(path) = lookup("SAFE_STEPS_REPORTS") {
            self.reports.path = PathBuf::from(path);
        }
        if let Some(radius_km) = parse_override::<f64>(&lookup, "SAFE_STEPS_RADIUS_KM")? {
            if !(radius_km.is_finite() && radius_km >= 0.0) {
                return Err(ConfigError::InvalidEnv {
                    name: "SAFE_STEPS_RADIUS_KM".to_string(),
                    value: radius_km.to_string(),
                });
            }
            self.explore.radius_km = radius_km;
        }
        if let Some(seed) = parse_override(&lookup, "SAFE_STEPS_SEED")? {
            self.explore.seed = Some(seed);
        }
        Ok(())
    }
}

fn parse_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|_| ConfigError::InvalidEnv {
            name: name.to_string(),
            value,
        })
}
