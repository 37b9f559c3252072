//! Site configuration management.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,

    /// Base URL for the site (e.g., "https://example.com").
    pub base_url: String,

    /// Site author name.
    #[serde(default)]
    pub author: Option<String>,

    /// Date layout used when a template calls `format` without a pattern
    /// of its own.
    #[serde(default = "default_date_format")]
    pub default_date_format: String,

    /// Default layout template for pages without an explicit one.
    #[serde(default = "default_layout")]
    pub default_layout: String,
}

fn default_date_format() -> String {
    "January 02, 2006".to_string()
}

fn default_layout() -> String {
    "page".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            base_url: String::new(),
            author: None,
            default_date_format: default_date_format(),
            default_layout: default_layout(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| CoreError::config(path, e.to_string()))?;

        if config.base_url.is_empty() {
            return Err(CoreError::config(path, "base_url is required"));
        }

        Ok(config)
    }
}
