//! Zod schemas for validated types and enums.
//!
//! Every enum and every object reachable from a request body gets a
//! `<Name>Model` schema plus the inferred type as default export. The
//! remaining objects are emitted as plain TypeScript interfaces.

use super::{TemplateRenderer, TypeScriptEmitter, TypesEmitter, TYPES_DIR};
use crate::context::ResolutionContext;
use crate::imports::{FileId, ImportStyle, OutputFile};
use crate::model::{Field, NamedKind, NamedType, NamedTypeId, PrimitiveKind, Type, Validation};
use crate::registry::NamedTypeRegistry;
use crate::{Error, Result};

// External imports (alphabetized)
use serde::Serialize;

const TARGET: &str = "zod";

#[derive(Serialize)]
struct ObjectContext<'a> {
    name: &'a str,
    fields: Vec<SchemaField<'a>>,
}

#[derive(Serialize)]
struct SchemaField<'a> {
    name: &'a str,
    schema: String,
}

#[derive(Serialize)]
struct EnumContext<'a> {
    name: &'a str,
    values: &'a [String],
}

pub struct ZodEmitter<'a> {
    renderer: &'a TemplateRenderer,
}

impl<'a> ZodEmitter<'a> {
    pub fn new(renderer: &'a TemplateRenderer) -> Self {
        Self { renderer }
    }

    fn render(&self, named: &NamedType, context: &ResolutionContext) -> Result<String> {
        match &named.kind {
            NamedKind::Object { fields } => {
                let fields = fields
                    .iter()
                    .map(|field| {
                        Ok(SchemaField {
                            name: &field.name,
                            schema: field_schema(field, &context.registry, context.use_string_as_date)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.renderer.render(
                    "zod/object.ts",
                    &ObjectContext {
                        name: &named.name,
                        fields,
                    },
                )
            }
            NamedKind::Enum { values } => self.renderer.render(
                "zod/enum.ts",
                &EnumContext {
                    name: &named.name,
                    values,
                },
            ),
        }
    }
}

impl TypesEmitter for ZodEmitter<'_> {
    fn emit_types(&self, context: &mut ResolutionContext) -> Result<()> {
        let mut emitted: Vec<(NamedTypeId, FileId)> = Vec::new();
        for (id, named) in context.registry.iter().filter(|(_, named)| has_schema(named)) {
            let body = self.render(named, context)?;
            let file = context
                .files
                .add(OutputFile::new(format!("{TYPES_DIR}/{}", named.name), body));
            emitted.push((id, file));
        }
        for (id, file) in &emitted {
            context.files.bind(context.registry.name(*id), *file);
        }

        TypeScriptEmitter::new(self.renderer).emit_selected(context, |named| !has_schema(named))?;

        for (id, file) in emitted {
            context.files.get_mut(file).import_named("zod", "z");
            for field in context.registry.get(id).fields() {
                context.files.record_import(
                    file,
                    &field.ty,
                    &context.registry,
                    ImportStyle::Named { suffix: "Model" },
                )?;
            }
        }
        Ok(())
    }
}

fn has_schema(named: &NamedType) -> bool {
    named.needs_validation || named.is_enum()
}

/// Schema expression of a type
pub fn zod_type(ty: &Type, registry: &NamedTypeRegistry, use_string_as_date: bool) -> Result<String> {
    Ok(match ty {
        Type::Named(id) => format!("{}Model", registry.name(*id)),
        Type::Array(element) => format!("{}.array()", zod_type(element, registry, use_string_as_date)?),
        Type::Map(key, value) => format!(
            "z.record({}, {})",
            zod_type(key, registry, use_string_as_date)?,
            zod_type(value, registry, use_string_as_date)?
        ),
        Type::Primitive(kind) => match kind {
            PrimitiveKind::Int => "z.number().int()",
            PrimitiveKind::Double => "z.number()",
            PrimitiveKind::String => "z.string()",
            PrimitiveKind::Date if use_string_as_date => "z.string()",
            PrimitiveKind::Date => "z.coerce.date()",
            PrimitiveKind::Boolean => "z.boolean()",
            PrimitiveKind::Void => return Err(Error::unsupported(TARGET, "void field")),
        }
        .to_string(),
    })
}

fn field_schema(field: &Field, registry: &NamedTypeRegistry, use_string_as_date: bool) -> Result<String> {
    let mut schema = zod_type(&field.ty, registry, use_string_as_date)?;
    for validation in &field.validations {
        schema.push_str(&validation_call(validation)?);
    }
    if !field.required {
        schema.push_str(".optional().nullable()");
    }
    Ok(schema)
}

/// Chained refinement for one validation, e.g. `.min(3, { message: "..." })`
pub fn validation_call(validation: &Validation) -> Result<String> {
    let message = serde_json::to_string(validation.message())?;
    Ok(match validation {
        Validation::MinValue { value, .. } => format!(".min({value}, {{ message: {message} }})"),
        Validation::MaxValue { value, .. } => format!(".max({value}, {{ message: {message} }})"),
        Validation::MinLength { length, .. } => format!(".min({length}, {{ message: {message} }})"),
        Validation::MaxLength { length, .. } => format!(".max({length}, {{ message: {message} }})"),
        Validation::Regex { pattern, .. } => format!(
            ".regex(/{}/, {{ message: {message} }})",
            pattern.replace('/', "\\/")
        ),
        Validation::Email { .. } => format!(".email({{ message: {message} }})"),
    })
}
