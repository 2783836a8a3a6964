//! Emitter selection for the two halves of a generation run.
//!
//! A run always produces type declarations and endpoint bindings; each half
//! has its own set of supported targets.
//!
//! # Examples
//!
//! ```
//! use typegen_core::emit::{ApiTarget, TypesTarget};
//! use std::str::FromStr;
//!
//! let types = TypesTarget::from_str("zod").unwrap();
//! assert_eq!(types, TypesTarget::Zod);
//! assert_eq!(types.to_string(), "zod");
//!
//! assert_eq!(ApiTarget::default(), ApiTarget::ReactQuery);
//! ```

// Internal imports (std, crate)
use std::fmt;
use std::str::FromStr;

/// Supported type declaration targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TypesTarget {
    /// Plain TypeScript interfaces and enums
    #[default]
    TypeScript,
    /// Zod schemas for validated types, interfaces for the rest
    Zod,
}

impl FromStr for TypesTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "typescript" | "ts" => Ok(TypesTarget::TypeScript),
            "zod" => Ok(TypesTarget::Zod),
            _ => Err(format!("Unknown types target: {}", s)),
        }
    }
}

impl TypesTarget {
    /// Returns the target identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Zod => "zod",
        }
    }

    /// Returns an iterator over all available types targets
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::TypeScript, Self::Zod].into_iter()
    }
}

impl fmt::Display for TypesTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Supported endpoint binding targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiTarget {
    /// One class of `@tanstack/react-query` hooks per controller
    #[default]
    ReactQuery,
    /// One `@Injectable` Angular service per controller
    Angular,
}

impl FromStr for ApiTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "react_query" | "react-query" => Ok(ApiTarget::ReactQuery),
            "angular" => Ok(ApiTarget::Angular),
            _ => Err(format!("Unknown api target: {}", s)),
        }
    }
}

impl ApiTarget {
    /// Returns the target identifier as a string slice
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReactQuery => "react_query",
            Self::Angular => "angular",
        }
    }

    /// Returns an iterator over all available api targets
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::ReactQuery, Self::Angular].into_iter()
    }
}

impl fmt::Display for ApiTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
