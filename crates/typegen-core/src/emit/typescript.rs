//! Plain TypeScript declarations: one interface or enum per named type.

use super::{ts_type, TemplateRenderer, TypesEmitter, TYPES_DIR};
use crate::context::ResolutionContext;
use crate::imports::{FileId, ImportStyle, OutputFile};
use crate::model::{NamedKind, NamedType, NamedTypeId};
use crate::Result;

// External imports (alphabetized)
use serde::Serialize;

#[derive(Serialize)]
struct InterfaceContext<'a> {
    name: &'a str,
    fields: Vec<InterfaceField<'a>>,
}

#[derive(Serialize)]
struct InterfaceField<'a> {
    name: &'a str,
    ty: String,
    required: bool,
}

#[derive(Serialize)]
struct EnumContext<'a> {
    name: &'a str,
    values: &'a [String],
}

pub struct TypeScriptEmitter<'a> {
    renderer: &'a TemplateRenderer,
}

impl<'a> TypeScriptEmitter<'a> {
    pub fn new(renderer: &'a TemplateRenderer) -> Self {
        Self { renderer }
    }

    /// Emits interface/enum files for the named types selected by `include`
    /// and imports the types their fields refer to.
    pub(crate) fn emit_selected(
        &self,
        context: &mut ResolutionContext,
        include: impl Fn(&NamedType) -> bool,
    ) -> Result<()> {
        let mut emitted: Vec<(NamedTypeId, FileId)> = Vec::new();
        for (id, named) in context.registry.iter().filter(|(_, named)| include(named)) {
            let body = self.render(named, context)?;
            let file = context
                .files
                .add(OutputFile::new(format!("{TYPES_DIR}/{}", named.name), body));
            emitted.push((id, file));
        }

        for (id, file) in &emitted {
            context.files.bind(context.registry.name(*id), *file);
        }

        for (id, file) in emitted {
            for field in context.registry.get(id).fields() {
                context
                    .files
                    .record_import(file, &field.ty, &context.registry, ImportStyle::Default)?;
            }
        }
        Ok(())
    }

    fn render(&self, named: &NamedType, context: &ResolutionContext) -> Result<String> {
        match &named.kind {
            NamedKind::Object { fields } => {
                let fields = fields
                    .iter()
                    .map(|field| InterfaceField {
                        name: &field.name,
                        ty: ts_type(&field.ty, &context.registry, context.use_string_as_date),
                        required: field.required,
                    })
                    .collect();
                self.renderer.render(
                    "typescript/interface.ts",
                    &InterfaceContext {
                        name: &named.name,
                        fields,
                    },
                )
            }
            NamedKind::Enum { values } => self.renderer.render(
                "typescript/enum.ts",
                &EnumContext {
                    name: &named.name,
                    values,
                },
            ),
        }
    }
}

impl TypesEmitter for TypeScriptEmitter<'_> {
    fn emit_types(&self, context: &mut ResolutionContext) -> Result<()> {
        self.emit_selected(context, |_| true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, PrimitiveKind, Type};

    fn context() -> ResolutionContext {
        let mut context = ResolutionContext::new(false);
        let registry = &mut context.registry;
        let (role, _) = registry.get_or_create("Role", || NamedKind::Enum {
            values: vec!["OWNER".to_string(), "MEMBER".to_string()],
        });
        let (user, _) = registry.get_or_create("User", || NamedKind::Object { fields: vec![] });
        registry.push_field(user, Field::new("id", Type::Primitive(PrimitiveKind::Int)));
        registry.push_field(
            user,
            Field {
                required: false,
                ..Field::new("createdAt", Type::Primitive(PrimitiveKind::Date))
            },
        );
        registry.push_field(user, Field::new("roles", Type::array(Type::Named(role))));
        registry.push_field(user, Field::new("manager", Type::Named(user)));
        context
    }

    #[test]
    fn test_emits_interfaces_and_enums() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = context();
        TypeScriptEmitter::new(&renderer)
            .emit_types(&mut context)
            .unwrap();

        let files: Vec<_> = context.files.iter().collect();
        assert_eq!(files.len(), 2);

        assert_eq!(files[0].location, "types/Role");
        assert!(files[0].body.starts_with("enum Role {\n  OWNER = 'OWNER',\n  MEMBER = 'MEMBER',\n}"));
        assert!(files[0].body.contains("export default Role;"));
        assert!(files[0].imports.is_empty());

        let user = files[1];
        assert_eq!(user.location, "types/User");
        assert!(user.body.starts_with(
            "export default interface User {\n  id: number;\n  createdAt?: Date;\n  roles: Role[];\n  manager: User;\n}"
        ));
        let imports: Vec<String> = user.imports.iter().map(ToString::to_string).collect();
        assert_eq!(imports, vec!["import Role from './Role';"]);
    }

    #[test]
    fn test_dates_as_strings() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = context();
        context.use_string_as_date = true;
        TypeScriptEmitter::new(&renderer)
            .emit_types(&mut context)
            .unwrap();

        let user = context.files.get(context.files.file_for("User").unwrap());
        assert!(user.body.contains("  createdAt?: string;"));
    }
}
