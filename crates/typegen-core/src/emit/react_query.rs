//! React Query bindings: one class per controller with static query and
//! mutation accessors backed by axios.

use super::{by_class, template_url, ts_type, ApiEmitter, TemplateRenderer, ENDPOINTS_DIR};
use crate::context::ResolutionContext;
use crate::imports::{ImportStyle, OutputFile};
use crate::model::{Endpoint, Field, HttpMethod, Type};
use crate::Result;

// External imports (alphabetized)
use serde::Serialize;

const REACT_QUERY: &str = "@tanstack/react-query";

#[derive(Serialize)]
struct ClassContext<'a> {
    class_name: &'a str,
    members: Vec<String>,
}

#[derive(Serialize)]
struct QueryContext<'a> {
    name: &'a str,
    key: String,
    args: String,
    return_type: String,
    query_key: String,
    http_method: &'static str,
    request: String,
    next_page: Option<String>,
}

#[derive(Serialize)]
struct MutationContext<'a> {
    name: &'a str,
    args: String,
    generics: String,
    data_param: String,
    http_method: &'static str,
    return_type: String,
    request: String,
}

pub struct ReactQueryEmitter<'a> {
    renderer: &'a TemplateRenderer,
}

impl<'a> ReactQueryEmitter<'a> {
    pub fn new(renderer: &'a TemplateRenderer) -> Self {
        Self { renderer }
    }

    fn member(&self, endpoint: &Endpoint, context: &ResolutionContext) -> Result<String> {
        if endpoint.http_method != HttpMethod::Get {
            self.mutation(endpoint, context)
        } else if endpoint.is_paged() {
            self.infinite_query(endpoint, context)
        } else {
            self.query(endpoint, context)
        }
    }

    fn query(&self, endpoint: &Endpoint, context: &ResolutionContext) -> Result<String> {
        let return_type = ts(&endpoint.return_type, context);
        let variables = endpoint.all_variables();
        let key = query_key_name(endpoint);

        let mut request = url_literal(endpoint);
        if !endpoint.params.is_empty() {
            request.push_str(&format!(", {{ params: {} }}", params_object(&endpoint.params, None)));
        }

        self.renderer.render(
            "react_query/query.ts",
            &QueryContext {
                name: &endpoint.method_name,
                args: function_args(
                    &variables,
                    &format!("options?: Partial<Omit<UseQueryOptions<{return_type}>, 'queryKey' | 'queryFn'>>"),
                    context,
                ),
                query_key: query_key(&key, &variables),
                key,
                return_type,
                http_method: endpoint.http_method.as_str(),
                request,
                next_page: None,
            },
        )
    }

    fn infinite_query(&self, endpoint: &Endpoint, context: &ResolutionContext) -> Result<String> {
        let return_type = ts(&endpoint.return_type, context);
        let page = endpoint
            .page_variable()
            .map(|field| field.name.as_str())
            .unwrap_or("page");
        let variables: Vec<&Field> = endpoint
            .all_variables()
            .into_iter()
            .filter(|field| field.name != page)
            .collect();
        let params: Vec<Field> = endpoint
            .params
            .iter()
            .filter(|field| field.name != page)
            .cloned()
            .collect();
        let key = query_key_name(endpoint);

        let request = format!(
            "{}, {{ params: {} }}",
            url_literal(endpoint),
            params_object(&params, Some(page))
        );
        let next_page = match endpoint.page_size_variable() {
            Some(size) => format!("lastPage.length < {} ? undefined : pages.length", size.name),
            None => "lastPage.length === 0 ? undefined : pages.length".to_string(),
        };

        self.renderer.render(
            "react_query/infinite_query.ts",
            &QueryContext {
                name: &endpoint.method_name,
                args: function_args(
                    &variables,
                    &format!(
                        "options?: Partial<Omit<UseInfiniteQueryOptions<{return_type}>, 'queryKey' | 'queryFn' | 'initialPageParam' | 'getNextPageParam'>>"
                    ),
                    context,
                ),
                query_key: query_key(&key, &variables),
                key,
                return_type,
                http_method: endpoint.http_method.as_str(),
                request,
                next_page: Some(next_page),
            },
        )
    }

    fn mutation(&self, endpoint: &Endpoint, context: &ResolutionContext) -> Result<String> {
        let return_type = ts(&endpoint.return_type, context);
        let body_type = endpoint.body.as_ref().map(|body| ts(body, context));
        let generics = match &body_type {
            Some(body) => format!("{return_type}, unknown, {body}"),
            None => return_type.clone(),
        };

        let mut request = url_literal(endpoint);
        if body_type.is_some() {
            request.push_str(", data");
        } else if endpoint.http_method != HttpMethod::Delete {
            request.push_str(", null");
        }
        if !endpoint.params.is_empty() {
            request.push_str(&format!(", {{ params: {} }}", params_object(&endpoint.params, None)));
        }

        self.renderer.render(
            "react_query/mutation.ts",
            &MutationContext {
                name: &endpoint.method_name,
                args: function_args(
                    &endpoint.all_variables(),
                    &format!("options?: Omit<UseMutationOptions<{generics}>, 'mutationFn'>"),
                    context,
                ),
                data_param: body_type.map(|body| format!("data: {body}")).unwrap_or_default(),
                generics,
                http_method: endpoint.http_method.as_str(),
                return_type,
                request,
            },
        )
    }
}

impl ApiEmitter for ReactQueryEmitter<'_> {
    fn emit_endpoints(&self, context: &mut ResolutionContext, endpoints: &[Endpoint]) -> Result<()> {
        for (class_name, group) in by_class(endpoints) {
            let members = group
                .iter()
                .map(|endpoint| Ok(self.member(endpoint, context)?.trim_end().to_string()))
                .collect::<Result<Vec<_>>>()?;
            let body = self
                .renderer
                .render("react_query/class.ts", &ClassContext { class_name, members })?;

            let mut file = OutputFile::new(format!("{ENDPOINTS_DIR}/{class_name}"), body);
            file.import_default("axios", "axios")?;
            for symbol in hook_imports(&group) {
                file.import_named(REACT_QUERY, symbol);
            }
            let id = context.files.add(file);

            for endpoint in group {
                let types = endpoint
                    .body
                    .iter()
                    .chain(endpoint.params.iter().map(|field| &field.ty))
                    .chain(endpoint.url_args.iter().map(|field| &field.ty))
                    .chain(std::iter::once(&endpoint.return_type));
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

fn hook_imports(endpoints: &[&Endpoint]) -> Vec<&'static str> {
    let mut symbols = Vec::new();
    let gets = || endpoints.iter().filter(|e| e.http_method == HttpMethod::Get);
    if gets().any(|e| !e.is_paged()) {
        symbols.extend(["useQuery", "UseQueryOptions"]);
    }
    if gets().any(|e| e.is_paged()) {
        symbols.extend(["useInfiniteQuery", "UseInfiniteQueryOptions"]);
    }
    if endpoints.iter().any(|e| e.http_method != HttpMethod::Get) {
        symbols.extend(["useMutation", "UseMutationOptions"]);
    }
    symbols
}

fn ts(ty: &Type, context: &ResolutionContext) -> String {
    ts_type(ty, &context.registry, context.use_string_as_date)
}

fn query_key_name(endpoint: &Endpoint) -> String {
    format!("{}_{}", endpoint.class_name, endpoint.method_name)
}

fn query_key(key: &str, variables: &[&Field]) -> String {
    std::iter::once(format!("'{key}'"))
        .chain(variables.iter().map(|field| field.name.clone()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a: T, b?: U, <options>`
fn function_args(variables: &[&Field], options: &str, context: &ResolutionContext) -> String {
    variables
        .iter()
        .map(|field| {
            let optional = if field.required { "" } else { "?" };
            format!("{}{optional}: {}", field.name, ts(&field.ty, context))
        })
        .chain(std::iter::once(options.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Template literal when the URL has path variables, plain string otherwise
fn url_literal(endpoint: &Endpoint) -> String {
    if endpoint.url_args.is_empty() {
        format!("'{}'", endpoint.url)
    } else {
        format!("`{}`", template_url(&endpoint.url))
    }
}

/// Object params are spread into the query parameters.
fn params_object(params: &[Field], page_variable: Option<&str>) -> String {
    let entries: Vec<String> = params
        .iter()
        .map(|field| match field.ty {
            Type::Named(_) => format!("...{}", field.name),
            _ => field.name.clone(),
        })
        .chain(page_variable.map(|page| format!("{page}: pageParam")))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{TypeScriptEmitter, TypesEmitter};
    use crate::model::{NamedKind, Paging, PrimitiveKind};

    fn int(name: &str) -> Field {
        Field::new(name, Type::Primitive(PrimitiveKind::Int))
    }

    fn setup() -> (ResolutionContext, Vec<Endpoint>) {
        let mut context = ResolutionContext::new(false);
        let registry = &mut context.registry;
        let (user, _) = registry.get_or_create("User", || NamedKind::Object { fields: vec![] });
        registry.push_field(user, Field::new("name", Type::Primitive(PrimitiveKind::String)));
        let (filter, _) = registry.get_or_create("UserFilter", || NamedKind::Object { fields: vec![] });
        registry.push_field(filter, Field::new("active", Type::Primitive(PrimitiveKind::Boolean)));
        let user = Type::Named(user);

        let mut get = Endpoint::new("UserController", "getUser", "/users/{id}", HttpMethod::Get, user.clone());
        get.url_args.push(int("id"));

        let mut list = Endpoint::new(
            "UserController",
            "listUsers",
            "/users",
            HttpMethod::Get,
            Type::array(user.clone()),
        );
        list.params.push(int("page"));
        list.params.push(int("size"));
        list.params.push(Field {
            required: false,
            ..Field::new("filter", Type::Named(filter))
        });
        list.paging = Some(Paging {
            page_variable: "page".to_string(),
            page_size_variable: Some("size".to_string()),
        });

        let mut create = Endpoint::new("UserController", "createUser", "/users", HttpMethod::Post, user.clone());
        create.body = Some(user);

        let mut delete = Endpoint::new(
            "UserController",
            "deleteUser",
            "/users/{id}",
            HttpMethod::Delete,
            Type::Primitive(PrimitiveKind::Void),
        );
        delete.url_args.push(int("id"));

        (context, vec![get, list, create, delete])
    }

    fn emit() -> OutputFile {
        let renderer = TemplateRenderer::new().unwrap();
        let (mut context, endpoints) = setup();
        TypeScriptEmitter::new(&renderer).emit_types(&mut context).unwrap();
        ReactQueryEmitter::new(&renderer)
            .emit_endpoints(&mut context, &endpoints)
            .unwrap();
        context
            .files
            .into_files()
            .into_iter()
            .find(|file| file.location == "endpoints/UserController")
            .unwrap()
    }

    #[test]
    fn test_class_file_and_imports() {
        let file = emit();
        assert!(file.body.starts_with("export default class UserController {\n  static getUser = {"));
        assert!(file.body.trim_end().ends_with("  };\n}"));

        let imports: Vec<String> = file.imports.iter().map(ToString::to_string).collect();
        assert_eq!(
            imports,
            vec![
                "import axios from 'axios';",
                "import { UseInfiniteQueryOptions, UseMutationOptions, UseQueryOptions, useInfiniteQuery, useMutation, useQuery } from '@tanstack/react-query';",
                "import User from '../types/User';",
                "import UserFilter from '../types/UserFilter';",
            ]
        );
    }

    #[test]
    fn test_query() {
        let file = emit();
        assert!(file.body.contains("    queryKey: 'UserController_getUser',\n"));
        assert!(file.body.contains(
            "    useQuery: (id: number, options?: Partial<Omit<UseQueryOptions<User>, 'queryKey' | 'queryFn'>>) => useQuery<User>({ queryKey: ['UserController_getUser', id], queryFn: async () => {\n"
        ));
        assert!(file.body.contains("      const response = await axios.get<User>(`/users/${id}`);\n"));
    }

    #[test]
    fn test_infinite_query() {
        let file = emit();
        assert!(file.body.contains(
            "    useInfiniteQuery: (size: number, filter?: UserFilter, options?: Partial<Omit<UseInfiniteQueryOptions<User[]>, 'queryKey' | 'queryFn' | 'initialPageParam' | 'getNextPageParam'>>) => useInfiniteQuery({ queryKey: ['UserController_listUsers', size, filter], queryFn: async ({ pageParam }) => {\n"
        ));
        assert!(file.body.contains(
            "      const response = await axios.get<User[]>('/users', { params: { size, ...filter, page: pageParam } });\n"
        ));
        assert!(file.body.contains(
            "    getNextPageParam: (lastPage: User[], pages: User[][]) => lastPage.length < size ? undefined : pages.length,\n"
        ));
    }

    #[test]
    fn test_mutations() {
        let file = emit();
        assert!(file.body.contains(
            "    useMutation: (options?: Omit<UseMutationOptions<User, unknown, User>, 'mutationFn'>) => useMutation<User, unknown, User>({ mutationFn: async (data: User) => {\n"
        ));
        assert!(file.body.contains("      const response = await axios.post<User>('/users', data);\n"));
        assert!(file.body.contains(
            "    useMutation: (id: number, options?: Omit<UseMutationOptions<void>, 'mutationFn'>) => useMutation<void>({ mutationFn: async () => {\n"
        ));
        assert!(file.body.contains("      const response = await axios.delete<void>(`/users/${id}`);\n"));
    }

    #[test]
    fn test_bodyless_post_sends_null() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = ResolutionContext::new(false);
        let endpoint = Endpoint::new(
            "JobController",
            "run",
            "/jobs/run",
            HttpMethod::Post,
            Type::Primitive(PrimitiveKind::Void),
        );
        ReactQueryEmitter::new(&renderer)
            .emit_endpoints(&mut context, &[endpoint])
            .unwrap();

        let file = context.files.iter().next().unwrap();
        assert!(file.body.contains("axios.post<void>('/jobs/run', null);"));
        let imports: Vec<String> = file.imports.iter().map(ToString::to_string).collect();
        assert_eq!(
            imports,
            vec![
                "import axios from 'axios';",
                "import { UseMutationOptions, useMutation } from '@tanstack/react-query';",
            ]
        );
    }
}
