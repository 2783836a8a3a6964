//! Target emitters.
//!
//! An emitter turns the resolved model into [`crate::imports::OutputFile`]s
//! registered in the [`ResolutionContext`]. Types emitters run first and
//! bind every named type to the file that exports it; API emitters then
//! import those types by name.

mod angular;
mod kind;
mod react_query;
mod templates;
mod typescript;
mod zod;

pub use angular::AngularEmitter;
pub use kind::{ApiTarget, TypesTarget};
pub use react_query::ReactQueryEmitter;
pub use templates::TemplateRenderer;
pub use typescript::TypeScriptEmitter;
pub use zod::ZodEmitter;

use crate::context::ResolutionContext;
use crate::model::{Endpoint, PrimitiveKind, Type};
use crate::registry::NamedTypeRegistry;
use crate::Result;

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;

static URL_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(\w+)\}").expect("url placeholder pattern is valid"));

/// Directory of type declaration files, relative to the output root
pub const TYPES_DIR: &str = "types";
/// Directory of endpoint binding files, relative to the output root
pub const ENDPOINTS_DIR: &str = "endpoints";

/// Emits one file per named type. Every file default-exports a type named
/// after the named type.
pub trait TypesEmitter {
    fn emit_types(&self, context: &mut ResolutionContext) -> Result<()>;
}

/// Emits bindings for a list of endpoints.
pub trait ApiEmitter {
    fn emit_endpoints(&self, context: &mut ResolutionContext, endpoints: &[Endpoint]) -> Result<()>;
}

pub fn types_emitter(target: TypesTarget, renderer: &TemplateRenderer) -> Box<dyn TypesEmitter + '_> {
    match target {
        TypesTarget::TypeScript => Box::new(TypeScriptEmitter::new(renderer)),
        TypesTarget::Zod => Box::new(ZodEmitter::new(renderer)),
    }
}

pub fn api_emitter<'a>(
    target: ApiTarget,
    renderer: &'a TemplateRenderer,
    environment_import: &str,
) -> Box<dyn ApiEmitter + 'a> {
    match target {
        ApiTarget::ReactQuery => Box::new(ReactQueryEmitter::new(renderer)),
        ApiTarget::Angular => Box::new(AngularEmitter::new(renderer, environment_import)),
    }
}

/// TypeScript spelling of a type
pub fn ts_type(ty: &Type, registry: &NamedTypeRegistry, use_string_as_date: bool) -> String {
    match ty {
        Type::Named(id) => registry.name(*id).to_string(),
        Type::Array(element) => format!("{}[]", ts_type(element, registry, use_string_as_date)),
        Type::Map(key, value) => format!(
            "Record<{}, {}>",
            ts_type(key, registry, use_string_as_date),
            ts_type(value, registry, use_string_as_date)
        ),
        Type::Primitive(kind) => match kind {
            PrimitiveKind::Int | PrimitiveKind::Double => "number",
            PrimitiveKind::String => "string",
            PrimitiveKind::Date if use_string_as_date => "string",
            PrimitiveKind::Date => "Date",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Void => "void",
        }
        .to_string(),
    }
}

/// Turns `{name}` placeholders into template literal substitutions
fn template_url(url: &str) -> String {
    URL_PLACEHOLDER.replace_all(url, "$${${1}}").into_owned()
}

/// Groups endpoints by controller, keeping first-seen order
fn by_class(endpoints: &[Endpoint]) -> Vec<(&str, Vec<&Endpoint>)> {
    let mut groups: Vec<(&str, Vec<&Endpoint>)> = Vec::new();
    for endpoint in endpoints {
        match groups.iter_mut().find(|group| group.0 == endpoint.class_name) {
            Some((_, group)) => group.push(endpoint),
            None => groups.push((endpoint.class_name.as_str(), vec![endpoint])),
        }
    }
    groups
}
