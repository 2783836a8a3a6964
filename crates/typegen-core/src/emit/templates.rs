//! Embedded Tera templates for emitted file bodies

// Internal imports (std, crate)
use std::sync::Arc;

use crate::error::Result;
use crate::Error;

// External imports (alphabetized)
use serde::Serialize;
use tera::{Context, Tera};

const TEMPLATES: &[(&str, &str)] = &[
    (
        "typescript/interface.ts",
        include_str!("../../templates/typescript/interface.ts.tera"),
    ),
    (
        "typescript/enum.ts",
        include_str!("../../templates/typescript/enum.ts.tera"),
    ),
    (
        "zod/object.ts",
        include_str!("../../templates/zod/object.ts.tera"),
    ),
    ("zod/enum.ts", include_str!("../../templates/zod/enum.ts.tera")),
    (
        "react_query/class.ts",
        include_str!("../../templates/react_query/class.ts.tera"),
    ),
    (
        "react_query/query.ts",
        include_str!("../../templates/react_query/query.ts.tera"),
    ),
    (
        "react_query/infinite_query.ts",
        include_str!("../../templates/react_query/infinite_query.ts.tera"),
    ),
    (
        "react_query/mutation.ts",
        include_str!("../../templates/react_query/mutation.ts.tera"),
    ),
    (
        "angular/service.ts",
        include_str!("../../templates/angular/service.ts.tera"),
    ),
    (
        "angular/method.ts",
        include_str!("../../templates/angular/method.ts.tera"),
    ),
];

/// Renders the embedded templates with serializable contexts
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    /// Cached Tera template engine instance
    tera: Arc<Tera>,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())?;
        // output is TypeScript, never HTML
        tera.autoescape_on(vec![]);
        Ok(Self {
            tera: Arc::new(tera),
        })
    }

    /// Names of all embedded templates
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tera.get_template_names().collect();
        names.sort_unstable();
        names
    }

    pub fn render<C: Serialize>(&self, template: &str, context: &C) -> Result<String> {
        let context = Context::from_serialize(context)?;
        log::debug!("Rendering template: {}", template);
        self.tera.render(template, &context).map_err(|e| {
            log::error!("Failed to render template {}: {:?}", template, e);
            Error::template(format!("Failed to render template {}: {}", template, e))
        })
    }
}
