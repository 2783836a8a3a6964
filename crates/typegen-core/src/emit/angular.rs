//! Angular bindings: one injectable `HttpClient` service per controller.

// Internal imports (std, crate)
use std::collections::HashSet;

use super::{by_class, template_url, ts_type, ApiEmitter, TemplateRenderer, ENDPOINTS_DIR};
use crate::context::ResolutionContext;
use crate::imports::{ImportStyle, OutputFile};
use crate::model::{Endpoint, Field, HttpMethod, NamedTypeId, PrimitiveKind, Type};
use crate::registry::NamedTypeRegistry;
use crate::utils::to_kebab_case;
use crate::Result;

// External imports (alphabetized)
use serde::Serialize;

#[derive(Serialize)]
struct ServiceContext {
    service_name: String,
    members: Vec<String>,
}

#[derive(Serialize)]
struct MethodContext<'a> {
    name: &'a str,
    inputs: String,
    return_type: String,
    param_lines: Vec<String>,
    http_method: &'static str,
    url: String,
    body_arg: &'static str,
    has_params: bool,
}

pub struct AngularEmitter<'a> {
    renderer: &'a TemplateRenderer,
    environment_import: String,
}

impl<'a> AngularEmitter<'a> {
    pub fn new(renderer: &'a TemplateRenderer, environment_import: &str) -> Self {
        Self {
            renderer,
            environment_import: environment_import.to_string(),
        }
    }

    fn method(&self, endpoint: &Endpoint, context: &ResolutionContext) -> Result<String> {
        let ts = |ty: &Type| ts_type(ty, &context.registry, context.use_string_as_date);

        let inputs: Vec<String> = endpoint
            .body
            .iter()
            .map(|body| format!("body: {}", ts(body)))
            .chain(endpoint.all_variables().into_iter().map(|field| {
                let optional = if field.required { "" } else { "?" };
                format!("{}{optional}: {}", field.name, ts(&field.ty))
            }))
            .collect();

        let mut param_lines = Vec::new();
        if !endpoint.params.is_empty() {
            param_lines.push("let params = new HttpParams();".to_string());
            let mut path = HashSet::new();
            for field in &endpoint.params {
                param_lines.extend(param_statements(field, "", context, &mut path));
            }
        }

        let body_arg = match endpoint.http_method {
            HttpMethod::Get | HttpMethod::Delete => "",
            _ if endpoint.body.is_some() => "body, ",
            _ => "null, ",
        };

        self.renderer.render(
            "angular/method.ts",
            &MethodContext {
                name: &endpoint.method_name,
                inputs: inputs.join(", "),
                return_type: ts(&endpoint.return_type),
                param_lines,
                http_method: endpoint.http_method.as_str(),
                url: template_url(&endpoint.url),
                body_arg,
                has_params: !endpoint.params.is_empty(),
            },
        )
    }
}

impl ApiEmitter for AngularEmitter<'_> {
    fn emit_endpoints(&self, context: &mut ResolutionContext, endpoints: &[Endpoint]) -> Result<()> {
        for (class_name, group) in by_class(endpoints) {
            let members = group
                .iter()
                .map(|endpoint| Ok(self.method(endpoint, context)?.trim_end().to_string()))
                .collect::<Result<Vec<_>>>()?;
            let body = self.renderer.render(
                "angular/service.ts",
                &ServiceContext {
                    service_name: service_name(class_name),
                    members,
                },
            )?;

            let mut file = OutputFile::new(format!("{ENDPOINTS_DIR}/{}", file_name(class_name)), body);
            file.import_named("@angular/core", "Injectable");
            file.import_named("rxjs", "Observable");
            file.import_named(&self.environment_import, "environment");
            file.import_named("@angular/common/http", "HttpClient");
            if group.iter().any(|endpoint| !endpoint.params.is_empty()) {
                file.import_named("@angular/common/http", "HttpParams");
            }
            let id = context.files.add(file);

            for endpoint in group {
                let types = std::iter::once(&endpoint.return_type)
                    .chain(endpoint.body.iter())
                    .chain(endpoint.url_args.iter().map(|field| &field.ty))
                    .chain(endpoint.params.iter().map(|field| &field.ty));
                for ty in types {
                    context
                        .files
                        .record_import(id, ty, &context.registry, ImportStyle::Default)?;
                }
            }
        }
        Ok(())
    }
}

/// `UserAccountController` becomes `UserAccountService`
fn service_name(class_name: &str) -> String {
    class_name.replace("Controller", "Service")
}

/// `UserAccountController` becomes `user-account.service`
fn file_name(class_name: &str) -> String {
    format!("{}.service", to_kebab_case(&class_name.replace("Controller", "")))
}

/// `HttpParams` statements for one query parameter.
///
/// Object parameters are flattened into `prefix.field` entries; `path` holds
/// the object types currently being expanded so recursive types stop.
fn param_statements(
    field: &Field,
    prefix: &str,
    context: &ResolutionContext,
    path: &mut HashSet<NamedTypeId>,
) -> Vec<String> {
    let accessor = format!("{prefix}{}", field.name);
    let registry: &NamedTypeRegistry = &context.registry;

    let statements = match &field.ty {
        Type::Named(id) if !registry.get(*id).is_enum() => {
            if !path.insert(*id) {
                return Vec::new();
            }
            let nested_prefix = format!("{accessor}.");
            let statements: Vec<String> = registry
                .get(*id)
                .fields()
                .iter()
                .flat_map(|nested| param_statements(nested, &nested_prefix, context, path))
                .collect();
            path.remove(id);
            statements
        }
        Type::Array(element) => {
            let item = if is_date(element, context) { "item.toString()" } else { "item" };
            vec![format!(
                "params = {accessor}.reduce((p, item) => p.append('{accessor}', {item}), params);"
            )]
        }
        ty => {
            let value = if is_date(ty, context) {
                format!("{accessor}.toString()")
            } else {
                accessor.clone()
            };
            vec![format!("params = params.append('{accessor}', {value});")]
        }
    };

    if field.required || statements.is_empty() {
        return statements;
    }
    std::iter::once(format!("if ({accessor}) {{"))
        .chain(statements.into_iter().map(|line| format!("    {line}")))
        .chain(std::iter::once("}".to_string()))
        .collect()
}

fn is_date(ty: &Type, context: &ResolutionContext) -> bool {
    !context.use_string_as_date && matches!(ty, Type::Primitive(PrimitiveKind::Date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{TypeScriptEmitter, TypesEmitter};
    use crate::model::NamedKind;

    const ENVIRONMENT: &str = "../../../environments/environment";

    fn setup() -> (ResolutionContext, Vec<Endpoint>) {
        let mut context = ResolutionContext::new(false);
        let registry = &mut context.registry;
        let (user, _) = registry.get_or_create("User", || NamedKind::Object { fields: vec![] });
        registry.push_field(user, Field::new("name", Type::Primitive(PrimitiveKind::String)));
        let (filter, _) = registry.get_or_create("UserFilter", || NamedKind::Object { fields: vec![] });
        registry.push_field(
            filter,
            Field {
                required: false,
                ..Field::new("since", Type::Primitive(PrimitiveKind::Date))
            },
        );
        registry.push_field(filter, Field::new("parent", Type::Named(filter)));
        let user = Type::Named(user);

        let mut search = Endpoint::new(
            "UserAccountController",
            "search",
            "/users/{org}",
            HttpMethod::Get,
            Type::array(user.clone()),
        );
        search.url_args.push(Field::new("org", Type::Primitive(PrimitiveKind::String)));
        search.params.push(Field::new(
            "tags",
            Type::array(Type::Primitive(PrimitiveKind::String)),
        ));
        search.params.push(Field {
            required: false,
            ..Field::new("filter", Type::Named(filter))
        });

        let mut update = Endpoint::new("UserAccountController", "update", "/users", HttpMethod::Put, user.clone());
        update.body = Some(user);

        let touch = Endpoint::new(
            "UserAccountController",
            "touch",
            "/users/touch",
            HttpMethod::Post,
            Type::Primitive(PrimitiveKind::Void),
        );

        (context, vec![search, update, touch])
    }

    fn emit() -> OutputFile {
        let renderer = TemplateRenderer::new().unwrap();
        let (mut context, endpoints) = setup();
        TypeScriptEmitter::new(&renderer).emit_types(&mut context).unwrap();
        AngularEmitter::new(&renderer, ENVIRONMENT)
            .emit_endpoints(&mut context, &endpoints)
            .unwrap();
        context
            .files
            .into_files()
            .into_iter()
            .find(|file| file.location.starts_with(ENDPOINTS_DIR))
            .unwrap()
    }

    #[test]
    fn test_service_file() {
        let file = emit();
        assert_eq!(file.location, "endpoints/user-account.service");
        assert!(file.body.contains("export class UserAccountService {\n    baseURL = environment.serverUrl;\n"));
        assert!(file.body.trim_end().ends_with("    }\n}"));

        let imports: Vec<String> = file.imports.iter().map(ToString::to_string).collect();
        assert_eq!(
            imports,
            vec![
                "import { Injectable } from '@angular/core';",
                "import { Observable } from 'rxjs';",
                "import { environment } from '../../../environments/environment';",
                "import { HttpClient, HttpParams } from '@angular/common/http';",
                "import User from '../types/User';",
                "import UserFilter from '../types/UserFilter';",
            ]
        );
    }

    #[test]
    fn test_query_params_are_flattened() {
        let file = emit();
        let expected = [
            "    search(org: string, tags: string[], filter?: UserFilter): Observable<User[]> {",
            "        let params = new HttpParams();",
            "        params = tags.reduce((p, item) => p.append('tags', item), params);",
            "        if (filter) {",
            "            if (filter.since) {",
            "                params = params.append('filter.since', filter.since.toString());",
            "            }",
            "        }",
            "        return this.http.get<User[]>(this.baseURL + `/users/${org}`, { headers, params });",
            "    }",
        ]
        .join("\n");
        assert!(file.body.contains(&expected), "{}", file.body);
    }

    #[test]
    fn test_body_argument() {
        let file = emit();
        assert!(file.body.contains(
            "    update(body: User): Observable<User> {\n        return this.http.put<User>(this.baseURL + `/users`, body, { headers });\n    }"
        ));
        assert!(file.body.contains("this.http.post<void>(this.baseURL + `/users/touch`, null, { headers });"));
    }

    #[test]
    fn test_names() {
        assert_eq!(service_name("OrderController"), "OrderService");
        assert_eq!(file_name("OrderController"), "order.service");
        assert_eq!(file_name("UserAccountController"), "user-account.service");
    }
}
