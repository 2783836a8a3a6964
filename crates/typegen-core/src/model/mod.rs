//! Semantic model shared by the resolver, the assembler and the emitters.

mod endpoint;
mod types;
mod validation;

pub use endpoint::{Endpoint, HttpMethod, Paging};
pub use types::{Field, NamedKind, NamedType, NamedTypeId, PrimitiveKind, Type};
pub use validation::Validation;
