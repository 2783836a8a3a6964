//! Generation pipeline: metadata in, TypeScript files out.

// Internal imports (std, crate)
use std::path::{Path, PathBuf};

use crate::assembler::EndpointAssembler;
use crate::config::Config;
use crate::context::ResolutionContext;
use crate::emit::{self, TemplateRenderer};
use crate::error::{Error, Result};
use crate::imports::OutputFile;
use crate::metadata::{ClassInfo, MetadataContext};
use crate::model::{Endpoint, Field, NamedKind, Type};
use crate::registry::NamedTypeRegistry;

// External imports (alphabetized)
use futures::future::try_join_all;
use serde_json::{json, Value as JsonValue};
use tokio::fs;

/// Main entry point for code generation.
///
/// Nothing is written unless the whole file set was built successfully.
/// Returns the paths of the written files.
pub async fn generate(config: &Config) -> Result<Vec<PathBuf>> {
    if config.output_dirs.is_empty() {
        return Err(Error::config("No output directory configured"));
    }

    // 1. Load class metadata
    let metadata = MetadataContext::from_file(&config.metadata_path).await?;
    log::info!(
        "Loaded {} classes from {}",
        metadata.declared_classes().count(),
        config.metadata_path
    );

    // 2. Resolve and emit everything in memory
    let files = build_output(&metadata, config)?;

    // 3. Write the same file set into every output directory
    let writes = config
        .output_dirs
        .iter()
        .flat_map(|dir| files.iter().map(move |file| write_file(Path::new(dir), file)));
    let written = try_join_all(writes).await?;
    log::info!(
        "Wrote {} files into {} output directories",
        files.len(),
        config.output_dirs.len()
    );
    Ok(written)
}

/// Assembles endpoints from every controller and runs the configured emitters
pub fn build_output(metadata: &MetadataContext, config: &Config) -> Result<Vec<OutputFile>> {
    let types_target = config.types_target()?;
    let api_target = config.api_target()?;

    let mut context = ResolutionContext::new(config.use_string_as_date);
    let endpoints = assemble(metadata, &mut context.registry)?;
    log::debug!(
        "Resolved {} endpoints and {} named types",
        endpoints.len(),
        context.registry.len()
    );

    let renderer = TemplateRenderer::new()?;
    emit::types_emitter(types_target, &renderer).emit_types(&mut context)?;
    emit::api_emitter(api_target, &renderer, &config.angular_environment_import)
        .emit_endpoints(&mut context, &endpoints)?;

    Ok(context.files.into_files())
}

/// Resolved named types and endpoints as JSON
pub fn inspect(metadata: &MetadataContext) -> Result<JsonValue> {
    let mut registry = NamedTypeRegistry::new();
    let endpoints = assemble(metadata, &mut registry)?;

    let types: Vec<JsonValue> = registry
        .iter()
        .map(|(_, named)| match &named.kind {
            NamedKind::Object { fields } => json!({
                "name": named.name,
                "kind": "object",
                "needs_validation": named.needs_validation,
                "fields": fields.iter().map(|f| field_json(f, &registry)).collect::<Vec<_>>(),
            }),
            NamedKind::Enum { values } => json!({
                "name": named.name,
                "kind": "enum",
                "values": values,
            }),
        })
        .collect();

    let endpoints: Vec<JsonValue> = endpoints
        .iter()
        .map(|endpoint| endpoint_json(endpoint, &registry))
        .collect();

    Ok(json!({ "types": types, "endpoints": endpoints }))
}

fn assemble(metadata: &MetadataContext, registry: &mut NamedTypeRegistry) -> Result<Vec<Endpoint>> {
    let mut classes: Vec<&ClassInfo> = metadata.declared_classes().collect();
    classes.sort_by_cached_key(|class| class.qualified_name());
    EndpointAssembler::new(metadata, registry).assemble_all(classes)
}

async fn write_file(dir: &Path, file: &OutputFile) -> Result<PathBuf> {
    let path = dir.join(file.path());
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::write(&path, file.render()).await.map_err(|e| {
        log::error!("Failed to write file {}: {}", path.display(), e);
        e
    })?;
    log::debug!("Wrote {}", path.display());
    Ok(path)
}

fn type_json(ty: &Type, registry: &NamedTypeRegistry) -> JsonValue {
    match ty {
        Type::Primitive(kind) => json!({ "primitive": kind }),
        Type::Array(element) => json!({ "array": type_json(element, registry) }),
        Type::Map(key, value) => json!({
            "map": { "key": type_json(key, registry), "value": type_json(value, registry) }
        }),
        Type::Named(id) => json!({ "named": registry.name(*id) }),
    }
}

fn field_json(field: &Field, registry: &NamedTypeRegistry) -> JsonValue {
    json!({
        "name": field.name,
        "type": type_json(&field.ty, registry),
        "required": field.required,
        "validations": field.validations,
    })
}

fn endpoint_json(endpoint: &Endpoint, registry: &NamedTypeRegistry) -> JsonValue {
    let fields = |fields: &[Field]| {
        fields
            .iter()
            .map(|f| field_json(f, registry))
            .collect::<Vec<_>>()
    };
    json!({
        "class": endpoint.class_name,
        "method": endpoint.method_name,
        "http_method": endpoint.http_method,
        "url": endpoint.url,
        "url_args": fields(&endpoint.url_args),
        "params": fields(&endpoint.params),
        "body": endpoint.body.as_ref().map(|body| type_json(body, registry)),
        "return_type": type_json(&endpoint.return_type, registry),
        "paging": endpoint.paging.as_ref().map(|paging| json!({
            "page_variable": paging.page_variable,
            "page_size_variable": paging.page_size_variable,
        })),
    })
}
