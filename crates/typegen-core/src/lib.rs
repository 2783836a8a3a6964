//! Typegen Core Library
//!
//! This library turns class metadata of an annotated Spring backend into
//! TypeScript type declarations and typed HTTP client bindings.

pub mod assembler;
pub mod config;
pub mod context;
pub mod emit;
pub mod error;
pub mod generate;
pub mod imports;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod resolver;
pub mod signature;
pub mod utils;

pub use crate::{
    assembler::EndpointAssembler,
    config::Config,
    context::ResolutionContext,
    emit::{ApiTarget, TypesTarget},
    error::{Error, Result},
    generate::{build_output, generate, inspect},
    imports::OutputFile,
    metadata::{ClassProvider, MetadataContext},
    registry::NamedTypeRegistry,
    resolver::TypeResolver,
};
