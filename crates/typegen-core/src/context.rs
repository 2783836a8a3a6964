//! State shared by every stage of one generation run.

use crate::imports::FileRegistry;
use crate::registry::NamedTypeRegistry;

/// Owns the named type registry and the generated files of a run.
///
/// Both only grow while the run is in progress.
#[derive(Debug, Default)]
pub struct ResolutionContext {
    pub registry: NamedTypeRegistry,
    pub files: FileRegistry,
    /// Dates are emitted as strings instead of `Date`
    pub use_string_as_date: bool,
}

impl ResolutionContext {
    pub fn new(use_string_as_date: bool) -> Self {
        Self {
            use_string_as_date,
            ..Self::default()
        }
    }
}
