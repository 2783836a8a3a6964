//! Type resolution: parsed descriptor nodes to the [`Type`] model.
//!
//! Class references are resolved in priority order:
//!
//! 1. single-value wrappers (`Optional`, `Mono`, ...) are erased to their
//!    type argument,
//! 2. collections become [`Type::Array`],
//! 3. maps become [`Type::Map`],
//! 4. everything else is a primitive (boxed numerics, strings, dates) or a
//!    named object/enum registered in the [`NamedTypeRegistry`].
//!
//! A named type is registered before its fields are resolved, so recursive
//! references find the entry and stop there.

// Internal imports (std, crate)
use std::collections::{HashMap, HashSet};

use crate::metadata::annotations::{CONSTRAINT_PACKAGES, JSON_IGNORE, NULLABLE};
use crate::metadata::{Annotation, ClassInfo, ClassKind, ClassProvider, FieldInfo, MethodInfo};
use crate::model::{Field, NamedKind, NamedTypeId, PrimitiveKind, Type, Validation};
use crate::registry::NamedTypeRegistry;
use crate::signature::{self, ClassRef, Intermediate, PrimitiveCode};
use crate::utils::simple_name;
use crate::{Error, Result};

// External imports (alphabetized)
use once_cell::sync::Lazy;

const OBJECT: &str = "java.lang.Object";

static WRAPPER_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "java.util.Optional",
        "reactor.core.publisher.Mono",
        "java.util.concurrent.CompletableFuture",
        "org.springframework.http.ResponseEntity",
    ])
});

static COLLECTION_TYPES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "java.util.List",
        "java.util.ArrayList",
        "java.util.Set",
        "java.util.HashSet",
        "java.util.Collection",
        "java.lang.Iterable",
        "reactor.core.publisher.Flux",
    ])
});

static MAP_TYPES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["java.util.Map", "java.util.HashMap"]));

static PRIMITIVE_CLASSES: Lazy<HashMap<&'static str, PrimitiveKind>> = Lazy::new(|| {
    HashMap::from([
        ("java.lang.String", PrimitiveKind::String),
        ("java.lang.Integer", PrimitiveKind::Int),
        ("java.lang.Long", PrimitiveKind::Int),
        ("java.lang.Short", PrimitiveKind::Int),
        ("java.lang.Byte", PrimitiveKind::Int),
        ("java.lang.Float", PrimitiveKind::Double),
        ("java.lang.Double", PrimitiveKind::Double),
        ("java.lang.Boolean", PrimitiveKind::Boolean),
        ("java.lang.Void", PrimitiveKind::Void),
        ("java.util.Date", PrimitiveKind::Date),
        ("java.time.LocalDateTime", PrimitiveKind::Date),
        ("java.time.LocalDate", PrimitiveKind::Date),
        ("java.time.Instant", PrimitiveKind::Date),
    ])
});

impl From<PrimitiveCode> for PrimitiveKind {
    fn from(code: PrimitiveCode) -> Self {
        match code {
            PrimitiveCode::Double | PrimitiveCode::Float => PrimitiveKind::Double,
            PrimitiveCode::Long | PrimitiveCode::Int | PrimitiveCode::Short | PrimitiveCode::Byte => {
                PrimitiveKind::Int
            }
            PrimitiveCode::Boolean => PrimitiveKind::Boolean,
            PrimitiveCode::Void => PrimitiveKind::Void,
        }
    }
}

/// Resolves descriptors, fields and methods into [`Type`]s, registering named
/// types as it goes.
pub struct TypeResolver<'m, 'r> {
    classes: &'m dyn ClassProvider,
    registry: &'r mut NamedTypeRegistry,
}

impl<'m, 'r> TypeResolver<'m, 'r> {
    pub fn new(classes: &'m dyn ClassProvider, registry: &'r mut NamedTypeRegistry) -> Self {
        Self { classes, registry }
    }

    pub fn classes(&self) -> &'m dyn ClassProvider {
        self.classes
    }

    pub fn registry(&self) -> &NamedTypeRegistry {
        &*self.registry
    }

    /// Resolves a parsed descriptor node.
    pub fn resolve(&mut self, node: &Intermediate<'_>) -> Result<Type> {
        match node {
            Intermediate::Primitive(code) => Ok(Type::Primitive((*code).into())),
            Intermediate::Array(element) => Ok(Type::array(self.resolve(element)?)),
            Intermediate::Class(class_ref) => self.resolve_class_ref(class_ref),
        }
    }

    /// Resolves a field through its generic signature, or its erased
    /// descriptor when it has none.
    pub fn resolve_field(&mut self, field: &FieldInfo) -> Result<Type> {
        match &field.signature {
            Some(signature) => {
                let node = signature::parse_single(signature, self.classes)?;
                self.resolve(&node)
            }
            None => {
                let node = signature::parse_single(&field.descriptor, self.classes)?;
                self.resolve_erased(&node)
            }
        }
    }

    /// Resolves a method's return type.
    pub fn resolve_method(&mut self, method: &MethodInfo) -> Result<Type> {
        match &method.signature {
            Some(signature) => {
                let parsed = signature::parse_method_signature(signature, self.classes)?;
                self.resolve(&parsed.return_type)
            }
            None => {
                let parsed = signature::parse_method_signature(&method.descriptor, self.classes)?;
                self.resolve_erased(&parsed.return_type)
            }
        }
    }

    /// Resolves a class directly, skipping wrapper and container handling.
    pub fn resolve_class(&mut self, class: &ClassInfo) -> Result<Type> {
        match PRIMITIVE_CLASSES.get(class.qualified_name().as_str()) {
            Some(kind) => Ok(Type::Primitive(*kind)),
            None => self.resolve_named(class).map(Type::Named),
        }
    }

    /// Marks every named type reachable from `root` as needing validation.
    pub fn mark_needs_validation(&mut self, root: &Type) {
        mark_needs_validation(self.registry, root);
    }

    /// Resolves a node parsed from an erased descriptor. Erased descriptors
    /// carry no type arguments, so containers resolve as the classes they are.
    pub fn resolve_erased(&mut self, node: &Intermediate<'_>) -> Result<Type> {
        match node {
            Intermediate::Primitive(code) => Ok(Type::Primitive((*code).into())),
            Intermediate::Array(element) => Ok(Type::array(self.resolve_erased(element)?)),
            Intermediate::Class(ClassRef {
                class: Some(class), ..
            }) => self.resolve_class(class),
            Intermediate::Class(class_ref) => Ok(self.placeholder(&class_ref.qualified_name)),
        }
    }

    fn resolve_class_ref(&mut self, class_ref: &ClassRef<'_>) -> Result<Type> {
        let Some(class) = class_ref.class else {
            return Ok(self.placeholder(&class_ref.qualified_name));
        };
        let name = class.qualified_name();
        let args = &class_ref.generic_args;

        if WRAPPER_TYPES.contains(name.as_str()) {
            let inner = args
                .first()
                .ok_or_else(|| Error::MissingTypeArgument(name.clone()))?;
            return self.resolve(inner);
        }
        if COLLECTION_TYPES.contains(name.as_str()) {
            let element = args
                .first()
                .ok_or_else(|| Error::MissingTypeArgument(name.clone()))?;
            return Ok(Type::array(self.resolve(element)?));
        }
        if MAP_TYPES.contains(name.as_str()) {
            let [key, value, ..] = args.as_slice() else {
                return Err(Error::MissingTypeArgument(name));
            };
            return Ok(Type::map(self.resolve(key)?, self.resolve(value)?));
        }
        self.resolve_class(class)
    }

    /// An unknown class becomes an empty object named after its simple name.
    fn placeholder(&mut self, qualified_name: &str) -> Type {
        let (id, _) = self
            .registry
            .get_or_create(simple_name(qualified_name), || NamedKind::Object {
                fields: Vec::new(),
            });
        Type::Named(id)
    }

    fn resolve_named(&mut self, class: &ClassInfo) -> Result<NamedTypeId> {
        let name = class.simple_name();
        if let Some(id) = self.registry.lookup(name) {
            return Ok(id);
        }

        if class.kind == ClassKind::Enum {
            let (id, _) = self.registry.get_or_create(name, || NamedKind::Enum {
                values: class.constants.clone(),
            });
            return Ok(id);
        }

        let (id, _) = self
            .registry
            .get_or_create(name, || NamedKind::Object { fields: Vec::new() });

        for field in class.fields.iter().filter(|f| is_serialized(f)) {
            let ty = self.resolve_field(field)?;
            self.registry.push_field(
                id,
                Field {
                    name: field.name.clone(),
                    ty,
                    required: !NULLABLE.iter().any(|n| field.has_annotation(n)),
                    validations: validations_for(field),
                },
            );
        }

        if let Some(superclass) = class.superclass.as_deref() {
            self.inherit_fields(id, superclass)?;
        }
        Ok(id)
    }

    fn inherit_fields(&mut self, id: NamedTypeId, superclass: &str) -> Result<()> {
        let superclass = superclass.replace('/', ".");
        if superclass == OBJECT {
            return Ok(());
        }
        let classes = self.classes;
        let Some(parent) = classes.class(&superclass) else {
            log::warn!("Could not load class {}", superclass);
            return Ok(());
        };
        if let Type::Named(parent_id) = self.resolve_class(parent)? {
            let inherited = self.registry.get(parent_id).fields().to_vec();
            for field in inherited {
                self.registry.push_field(id, field);
            }
        }
        Ok(())
    }
}

fn is_serialized(field: &FieldInfo) -> bool {
    !field.is_static && !field.has_annotation(JSON_IGNORE)
}

fn constraint<'f>(field: &'f FieldInfo, simple: &str) -> Option<&'f Annotation> {
    CONSTRAINT_PACKAGES
        .iter()
        .find_map(|package| field.annotation(&format!("{package}.{simple}")))
}

/// Bean validation constraints of a field, in a fixed order.
fn validations_for(field: &FieldInfo) -> Vec<Validation> {
    let mut validations = Vec::new();

    if let Some(min) = constraint(field, "Min") {
        if let Some(value) = min.i64_value("value") {
            validations.push(Validation::min_value(value, min.str_value("message")));
        }
    }
    if let Some(max) = constraint(field, "Max") {
        if let Some(value) = max.i64_value("value") {
            validations.push(Validation::max_value(value, max.str_value("message")));
        }
    }
    if let Some(size) = constraint(field, "Size") {
        let message = size.str_value("message");
        if let Some(min) = size.i64_value("min") {
            validations.push(Validation::min_length(min, message));
        }
        if let Some(max) = size.i64_value("max") {
            validations.push(Validation::max_length(max, message));
        }
    }
    if let Some(not_blank) = constraint(field, "NotBlank") {
        validations.push(Validation::not_blank(not_blank.str_value("message")));
    }
    if let Some(pattern) = constraint(field, "Pattern") {
        if let Some(regexp) = pattern.str_value("regexp") {
            validations.push(Validation::regex(regexp, pattern.str_value("message")));
        }
    }
    if let Some(email) = constraint(field, "Email") {
        validations.push(Validation::email(email.str_value("message")));
    }

    validations
}

/// Flood-fills the validation flag from `root` through arrays, maps and the
/// fields of every reachable named type. Idempotent.
pub fn mark_needs_validation(registry: &mut NamedTypeRegistry, root: &Type) {
    let mut pending = vec![root.clone()];
    let mut visited = HashSet::new();

    while let Some(ty) = pending.pop() {
        match ty {
            Type::Primitive(_) => {}
            Type::Array(element) => pending.push(*element),
            Type::Map(key, value) => {
                pending.push(*key);
                pending.push(*value);
            }
            Type::Named(id) => {
                if visited.insert(id) {
                    registry.mark_needs_validation(id);
                    pending.extend(registry.get(id).fields().iter().map(|f| f.ty.clone()));
                }
            }
        }
    }
}
