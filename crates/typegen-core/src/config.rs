//! Configuration management for typegen code generation.
//!
//! This module defines the `Config` struct that drives a generation run. The
//! configuration can be created programmatically, loaded from a YAML, JSON or
//! TOML file (chosen by extension), or assembled from command-line arguments.
//!
//! # Examples
//!
//! ```no_run
//! use typegen_core::config::Config;
//!
//! # async fn run() -> typegen_core::Result<()> {
//! // Create a new config programmatically
//! let mut config = Config::new("metadata.yaml", vec!["web/src/api".to_string()]);
//! config.types_target = "zod".to_string();
//!
//! // Or load from a config file
//! let config = Config::from_file("typegen.yaml").await?;
//! # Ok(())
//! # }
//! ```

// Internal imports (std, crate)
use std::path::Path;

use crate::emit::{ApiTarget, TypesTarget};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use tokio::fs;

/// Configuration for a typegen run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the class metadata document (YAML or JSON)
    pub metadata_path: String,

    /// Directories that each receive the full set of generated files
    pub output_dirs: Vec<String>,

    /// Emitter used for type declarations
    #[serde(default = "default_types_target")]
    pub types_target: String,

    /// Emitter used for endpoint bindings
    #[serde(default = "default_api_target")]
    pub api_target: String,

    /// Render date types as strings instead of `Date`
    #[serde(default)]
    pub use_string_as_date: bool,

    /// Module the Angular services import `environment` from
    #[serde(default = "default_environment_import")]
    pub angular_environment_import: String,
}

impl Config {
    /// Create a new Config with default values
    pub fn new(metadata_path: impl Into<String>, output_dirs: Vec<String>) -> Self {
        Self {
            metadata_path: metadata_path.into(),
            output_dirs,
            types_target: default_types_target(),
            api_target: default_api_target(),
            use_string_as_date: false,
            angular_environment_import: default_environment_import(),
        }
    }

    /// Load configuration from a file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        let config = match ConfigFormat::of(path) {
            ConfigFormat::Yaml => serde_yaml::from_str(&content)?,
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };
        Ok(config)
    }

    /// Save configuration to a file
    pub async fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let content = match ConfigFormat::of(path) {
            ConfigFormat::Yaml => serde_yaml::to_string(self)?,
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string(self)?,
        };
        fs::write(path, content).await?;
        Ok(())
    }

    /// Parsed types emitter selection
    pub fn types_target(&self) -> crate::Result<TypesTarget> {
        self.types_target.parse().map_err(crate::Error::config)
    }

    /// Parsed endpoint emitter selection
    pub fn api_target(&self) -> crate::Result<ApiTarget> {
        self.api_target.parse().map_err(crate::Error::config)
    }
}

enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    fn of(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Yaml,
        }
    }
}

fn default_types_target() -> String {
    TypesTarget::default().as_str().to_string()
}

fn default_api_target() -> String {
    ApiTarget::default().as_str().to_string()
}

fn default_environment_import() -> String {
    "../../../environments/environment".to_string()
}
