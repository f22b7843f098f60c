//! Storefront configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::basket::DEFAULT_BASKET_KEY;
use crate::events::DEFAULT_MAX_DEPTH;

pub const DEFAULT_API_BASE_URL: &str = "https://larek-api.nomoreparties.co/api/weblarek";
pub const DEFAULT_CDN_BASE_URL: &str = "https://larek-api.nomoreparties.co/content/weblarek";
pub const DEFAULT_CURRENCY_LABEL: &str = "синапсов";

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to write TOML config: {0}")]
    TomlWrite(#[from] toml::ser::Error),

    #[error("Failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Session configuration.
///
/// Every field has a default, so a partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Backend API base, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Base URL product image paths are resolved against.
    #[serde(default = "default_cdn_base_url")]
    pub cdn_base_url: String,

    /// Storage key the basket persists under.
    #[serde(default = "default_basket_key")]
    pub basket_key: String,

    /// Nesting limit for re-entrant event dispatch.
    #[serde(default = "default_max_dispatch_depth")]
    pub max_dispatch_depth: usize,

    /// Currency word shown after prices.
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_cdn_base_url() -> String {
    DEFAULT_CDN_BASE_URL.to_string()
}

fn default_basket_key() -> String {
    DEFAULT_BASKET_KEY.to_string()
}

fn default_max_dispatch_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_currency_label() -> String {
    DEFAULT_CURRENCY_LABEL.to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            cdn_base_url: default_cdn_base_url(),
            basket_key: default_basket_key(),
            max_dispatch_depth: default_max_dispatch_depth(),
            currency_label: default_currency_label(),
        }
    }
}

impl StorefrontConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a `.json` file, or TOML for any other extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Save in the format implied by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_cdn_base_url(mut self, url: impl Into<String>) -> Self {
        self.cdn_base_url = url.into();
        self
    }

    pub fn with_basket_key(mut self, key: impl Into<String>) -> Self {
        self.basket_key = key.into();
        self
    }

    pub fn with_max_dispatch_depth(mut self, depth: usize) -> Self {
        self.max_dispatch_depth = depth;
        self
    }

    pub fn with_currency_label(mut self, label: impl Into<String>) -> Self {
        self.currency_label = label.into();
        self
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().map_or(false, |ext| ext == "json")
}
