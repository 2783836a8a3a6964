//! Per-run registry of named types.
//!
//! Named types live in an arena and are addressed by [`NamedTypeId`]. The
//! registry only grows: entries are created through
//! [`NamedTypeRegistry::get_or_create`] and later populated in place, but
//! never removed or replaced. Registering a type before resolving its fields
//! is what lets self- and mutually-referential types terminate.

// Internal imports (std, crate)
use std::collections::HashMap;

use crate::model::{Field, NamedKind, NamedType, NamedTypeId};

#[derive(Debug, Default)]
pub struct NamedTypeRegistry {
    types: Vec<NamedType>,
    by_name: HashMap<String, NamedTypeId>,
}

impl NamedTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry registered under `name`, creating it from `kind` if
    /// there is none. The flag is true when a new entry was created.
    pub fn get_or_create(
        &mut self,
        name: &str,
        kind: impl FnOnce() -> NamedKind,
    ) -> (NamedTypeId, bool) {
        if let Some(id) = self.by_name.get(name) {
            return (*id, false);
        }
        let id = NamedTypeId(self.types.len());
        self.types.push(NamedType {
            name: name.to_string(),
            kind: kind(),
            needs_validation: false,
        });
        self.by_name.insert(name.to_string(), id);
        (id, true)
    }

    pub fn lookup(&self, name: &str) -> Option<NamedTypeId> {
        self.by_name.get(name).copied()
    }

    /// Ids are only handed out by this registry, so every id indexes a live entry.
    pub fn get(&self, id: NamedTypeId) -> &NamedType {
        &self.types[id.0]
    }

    pub fn name(&self, id: NamedTypeId) -> &str {
        &self.get(id).name
    }

    pub(crate) fn push_field(&mut self, id: NamedTypeId, field: Field) {
        if let NamedKind::Object { fields } = &mut self.types[id.0].kind {
            fields.push(field);
        }
    }

    /// Sets the validation flag; returns true if it was not set before.
    pub(crate) fn mark_needs_validation(&mut self, id: NamedTypeId) -> bool {
        let named = &mut self.types[id.0];
        !std::mem::replace(&mut named.needs_validation, true)
    }

    /// Entries in registration order
    pub fn iter(&self) -> impl Iterator<Item = (NamedTypeId, &NamedType)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, named)| (NamedTypeId(index), named))
    }

    pub fn ids(&self) -> impl Iterator<Item = NamedTypeId> {
        (0..self.types.len()).map(NamedTypeId)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
