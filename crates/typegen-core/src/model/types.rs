//! The resolved type model.

use super::Validation;

// External imports (alphabetized)
use serde::Serialize;

/// Primitive shapes every target can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveKind {
    String,
    Int,
    Double,
    Boolean,
    Date,
    Void,
}

/// Index of a named type inside a [`crate::registry::NamedTypeRegistry`].
///
/// Two `Type::Named` values with equal ids are the same named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NamedTypeId(pub(crate) usize);

impl NamedTypeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A resolved type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Primitive(PrimitiveKind),
    Array(Box<Type>),
    Map(Box<Type>, Box<Type>),
    Named(NamedTypeId),
}

impl Type {
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn named_id(&self) -> Option<NamedTypeId> {
        match self {
            Type::Named(id) => Some(*id),
            _ => None,
        }
    }

    /// Calls `visit` for every named type this type refers to, walking
    /// through arrays and maps.
    pub fn for_each_named(&self, visit: &mut impl FnMut(NamedTypeId)) {
        match self {
            Type::Primitive(_) => {}
            Type::Array(element) => element.for_each_named(visit),
            Type::Map(key, value) => {
                key.for_each_named(visit);
                value.for_each_named(visit);
            }
            Type::Named(id) => visit(*id),
        }
    }
}

/// A field of a named object
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    /// False only when the source declared the field nullable
    pub required: bool,
    pub validations: Vec<Validation>,
}

impl Field {
    /// A required field without validations
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
            required: true,
            validations: Vec::new(),
        }
    }
}

/// Shape of a named type
#[derive(Debug, Clone, PartialEq)]
pub enum NamedKind {
    Object { fields: Vec<Field> },
    Enum { values: Vec<String> },
}

/// An object or enumeration, deduplicated by name
#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub name: String,
    pub kind: NamedKind,
    pub needs_validation: bool,
}

impl NamedType {
    pub fn is_enum(&self) -> bool {
        matches!(self.kind, NamedKind::Enum { .. })
    }

    /// Fields of an object; empty for enums
    pub fn fields(&self) -> &[Field] {
        match &self.kind {
            NamedKind::Object { fields } => fields,
            NamedKind::Enum { .. } => &[],
        }
    }

    /// Constants of an enum; empty for objects
    pub fn values(&self) -> &[String] {
        match &self.kind {
            NamedKind::Enum { values } => values,
            NamedKind::Object { .. } => &[],
        }
    }
}
