//! Runtime settings.
//!
//! Settings are resolved once at startup and handed to the store client and
//! the page renderer. Every field has a default, so a missing file is not an
//! error.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::store::client::DEFAULT_STORE_URL;

/// File picked up from the working directory when present
pub const CONFIG_FILE: &str = "disease-map.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Origin of the `user-locs` backend
    pub store_url: String,
    /// Address the map server listens on
    pub bind_addr: String,
    /// Initial map zoom
    pub zoom: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            zoom: 13,
        }
    }
}

impl Config {
    /// Loads `disease-map.toml` if it exists, otherwise the defaults
    pub fn load() -> Result<Self> {
        let path = Path::new(CONFIG_FILE);
        if path.exists() {
            Self::from_path(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads settings from an explicit file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        if config.store_url.trim().is_empty() {
            return Err(Error::Config("store_url cannot be empty".into()));
        }
        Ok(config)
    }
}
