//! Error handling for the typegen library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. Every variant is fatal for a
//! generation run: nothing is written to disk once one of them is returned.
//! Recoverable situations (unknown classes, misplaced paging annotations) are
//! reported through the `log` facade instead.
//!
//! # Examples
//!
//! ```
//! use typegen_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     Err(Error::config("no output directory given"))
//! }
//!
//! assert!(might_fail().is_err());
//! ```

use thiserror::Error;

/// Result type for typegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for typegen operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Metadata document error
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// A type descriptor could not be parsed
    #[error("Malformed signature '{signature}' at position {position}: {reason}")]
    Signature {
        signature: String,
        position: usize,
        reason: String,
    },

    /// A wrapper or container was used without its type arguments
    #[error("Type '{0}' is missing its generic type arguments")]
    MissingTypeArgument(String),

    /// Declared parameters and descriptor arguments disagree
    #[error("{class}.{method} declares {declared} parameters but its signature has {parsed}")]
    ParameterMismatch {
        class: String,
        method: String,
        declared: usize,
        parsed: usize,
    },

    /// A paged endpoint has no parameter marked as page variable
    #[error("Encountered paged endpoint without a page variable for endpoint {class}.{method}")]
    MissingPageVariable { class: String, method: String },

    /// Two different default imports were requested from the same module
    #[error("Conflicting default import in '{file}' from '{module_path}': expected {requested}, found {existing}")]
    ImportConflict {
        file: String,
        module_path: String,
        existing: String,
        requested: String,
    },

    /// A named type is referenced but no output file declares it
    #[error("No output file declares the type '{0}'")]
    MissingOutputFile(String),

    /// A type shape the selected emitter cannot express
    #[error("Unsupported type for {target}: {description}")]
    UnsupportedType {
        target: &'static str,
        description: String,
    },

    /// Template error
    #[error("Template error: {0}")]
    Template(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new metadata error
    pub fn metadata<S: Into<String>>(msg: S) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a new template error
    pub fn template<S: Into<String>>(msg: S) -> Self {
        Self::Template(msg.into())
    }

    /// Create a new unsupported type error
    pub fn unsupported<S: Into<String>>(target: &'static str, description: S) -> Self {
        Self::UnsupportedType {
            target,
            description: description.into(),
        }
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Config(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Config(s)
    }
}
