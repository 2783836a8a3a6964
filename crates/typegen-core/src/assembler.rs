//! Builds [`Endpoint`] records from controller class metadata.
//!
//! A controller is a class annotated `RestController`. Each class-level
//! `RequestMapping` value is a URL prefix; each method mapping annotation
//! yields one endpoint per path it declares.

use crate::metadata::annotations::{
    DELETE_MAPPING, GET_MAPPING, IGNORED_PARAMETER_TYPES, PAGED_QUERY, PAGE_PARAM, PAGE_SIZE,
    PATCH_MAPPING, PATH_VARIABLE, POST_MAPPING, PUT_MAPPING, REQUEST_BODY, REQUEST_MAPPING,
    REQUEST_PARAM, REST_CONTROLLER,
};
use crate::metadata::{Annotation, ClassInfo, ClassProvider, MethodInfo, ParameterInfo};
use crate::model::{Endpoint, Field, HttpMethod, Paging, Type};
use crate::registry::NamedTypeRegistry;
use crate::resolver::TypeResolver;
use crate::signature::{self, Intermediate};
use crate::{Error, Result};

const MAPPINGS: &[(&str, HttpMethod)] = &[
    (GET_MAPPING, HttpMethod::Get),
    (POST_MAPPING, HttpMethod::Post),
    (PUT_MAPPING, HttpMethod::Put),
    (PATCH_MAPPING, HttpMethod::Patch),
    (DELETE_MAPPING, HttpMethod::Delete),
];

pub struct EndpointAssembler<'m, 'r> {
    resolver: TypeResolver<'m, 'r>,
}

impl<'m, 'r> EndpointAssembler<'m, 'r> {
    pub fn new(classes: &'m dyn ClassProvider, registry: &'r mut NamedTypeRegistry) -> Self {
        Self {
            resolver: TypeResolver::new(classes, registry),
        }
    }

    /// Endpoints of every controller among `classes`, in the given order
    pub fn assemble_all<'c>(
        &mut self,
        classes: impl IntoIterator<Item = &'c ClassInfo>,
    ) -> Result<Vec<Endpoint>> {
        let mut endpoints = Vec::new();
        for class in classes {
            endpoints.extend(self.assemble_class(class)?);
        }
        Ok(endpoints)
    }

    /// Endpoints of one class; empty unless it is a controller
    pub fn assemble_class(&mut self, class: &ClassInfo) -> Result<Vec<Endpoint>> {
        if !class.has_annotation(REST_CONTROLLER) {
            return Ok(Vec::new());
        }

        let mut prefixes = class
            .annotation(REQUEST_MAPPING)
            .map(mapping_paths)
            .unwrap_or_default();
        if prefixes.is_empty() {
            prefixes.push(String::new());
        }

        let mut endpoints = Vec::new();
        for prefix in &prefixes {
            for method in &class.methods {
                self.assemble_method(class, method, prefix, &mut endpoints)?;
            }
        }
        log::debug!("{}: {} endpoints", class.simple_name(), endpoints.len());
        Ok(endpoints)
    }

    fn assemble_method(
        &mut self,
        class: &ClassInfo,
        method: &MethodInfo,
        prefix: &str,
        endpoints: &mut Vec<Endpoint>,
    ) -> Result<()> {
        for (qualified, http_method) in MAPPINGS {
            let Some(mapping) = method.annotation(qualified) else {
                continue;
            };
            let paths = mapping_paths(mapping);
            if paths.is_empty() {
                endpoints.push(self.build_endpoint(class, method, prefix, *http_method, "")?);
            }
            for path in &paths {
                endpoints.push(self.build_endpoint(class, method, prefix, *http_method, path)?);
            }
        }
        Ok(())
    }

    fn build_endpoint(
        &mut self,
        class: &ClassInfo,
        method: &MethodInfo,
        prefix: &str,
        http_method: HttpMethod,
        path: &str,
    ) -> Result<Endpoint> {
        let class_name = class.simple_name();
        let mut paged = method.has_annotation(PAGED_QUERY);
        if paged && http_method != HttpMethod::Get {
            log::warn!(
                "Only GET methods may be paged in {}.{}",
                class_name,
                method.name
            );
            paged = false;
        }

        let parsed = signature::parse_method_signature(method.type_signature(), self.resolver.classes())?;
        if parsed.arguments.len() != method.parameters.len() {
            return Err(Error::ParameterMismatch {
                class: class_name.to_string(),
                method: method.name.clone(),
                declared: method.parameters.len(),
                parsed: parsed.arguments.len(),
            });
        }

        let erased = method.signature.is_none();
        let return_type = self.resolve_argument(&parsed.return_type, erased)?;
        let mut endpoint = Endpoint::new(
            class_name,
            &method.name,
            format!("{prefix}{path}"),
            http_method,
            return_type,
        );

        let mut page_variable: Option<String> = None;
        let mut page_size_variable: Option<String> = None;

        for (parameter, argument) in method.parameters.iter().zip(&parsed.arguments) {
            if parameter.annotations.is_empty() {
                if !is_ignored_parameter(argument) {
                    let ty = self.resolve_argument(argument, erased)?;
                    endpoint.params.push(Field::new(&parameter.name, ty));
                }
                continue;
            }

            for annotation in &parameter.annotations {
                if annotation.matches(REQUEST_PARAM) {
                    let ty = self.resolve_argument(argument, erased)?;
                    endpoint.params.push(Field {
                        required: annotation.bool_value("required").unwrap_or(true),
                        ..Field::new(&parameter.name, ty)
                    });
                    let location = format!("{}.{}", class_name, method.name);
                    designate(&mut page_variable, parameter, PAGE_PARAM, paged, &location);
                    designate(&mut page_size_variable, parameter, PAGE_SIZE, paged, &location);
                } else if annotation.matches(PATH_VARIABLE) {
                    let ty = self.resolve_argument(argument, erased)?;
                    endpoint.url_args.push(Field::new(&parameter.name, ty));
                } else if annotation.matches(REQUEST_BODY) {
                    let ty = self.resolve_argument(argument, erased)?;
                    self.resolver.mark_needs_validation(&ty);
                    endpoint.body = Some(ty);
                }
            }
        }

        if paged {
            let page_variable = page_variable.ok_or_else(|| Error::MissingPageVariable {
                class: class_name.to_string(),
                method: method.name.clone(),
            })?;
            endpoint.paging = Some(Paging {
                page_variable,
                page_size_variable,
            });
        }
        Ok(endpoint)
    }

    fn resolve_argument(&mut self, node: &Intermediate<'_>, erased: bool) -> Result<Type> {
        if erased {
            self.resolver.resolve_erased(node)
        } else {
            self.resolver.resolve(node)
        }
    }
}

/// `value` and `path` entries of a mapping annotation
fn mapping_paths(mapping: &Annotation) -> Vec<String> {
    let mut paths = mapping.string_list("value");
    paths.extend(mapping.string_list("path"));
    paths
}

fn is_ignored_parameter(argument: &Intermediate<'_>) -> bool {
    match argument {
        Intermediate::Class(class_ref) => IGNORED_PARAMETER_TYPES.contains(&class_ref.qualified_name.as_str()),
        _ => false,
    }
}

/// Records `parameter` as the paging variable marked by `marker`, warning
/// about duplicates and markers on endpoints that are not paged.
fn designate(
    slot: &mut Option<String>,
    parameter: &ParameterInfo,
    marker: &str,
    paged: bool,
    location: &str,
) {
    let Some(annotation) = parameter.annotation(marker) else {
        return;
    };
    let kind = crate::utils::simple_name(&annotation.name).to_string();
    if !paged {
        log::warn!("Unused @{} annotation encountered in {}", kind, location);
    } else if slot.is_some() {
        log::warn!("Multiple @{} parameters defined in endpoint {}", kind, location);
    } else {
        *slot = Some(parameter.name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::MetadataContext;
    use crate::model::PrimitiveKind;

    const DOC: &str = r#"
classes:
  - name: com.example.User
    fields:
      - { name: id, descriptor: 'Ljava/lang/Long;' }
      - name: address
        descriptor: 'Lcom/example/Address;'
  - name: com.example.Address
    fields:
      - { name: street, descriptor: 'Ljava/lang/String;' }
  - name: com.example.Audit
    fields:
      - { name: at, descriptor: 'Ljava/time/Instant;' }
  - name: com.example.UserController
    annotations:
      - RestController
      - name: RequestMapping
        values: { value: ['/api/users', '/v2/users'] }
    methods:
      - name: find
        descriptor: '(Ljava/lang/Long;Lorg/springframework/web/server/ServerWebExchange;)Lcom/example/User;'
        signature: '(Ljava/lang/Long;Lorg/springframework/web/server/ServerWebExchange;)Lreactor/core/publisher/Mono<Lcom/example/User;>;'
        annotations:
          - name: GetMapping
            values: { value: '/{id}' }
        parameters:
          - { name: id, annotations: [PathVariable] }
          - { name: exchange }
      - name: list
        descriptor: '(IILjava/lang/String;)Ljava/util/List;'
        signature: '(IILjava/lang/String;)Ljava/util/List<Lcom/example/User;>;'
        annotations: [GetMapping, PagedQuery]
        parameters:
          - { name: page, annotations: [RequestParam, PageParam] }
          - { name: size, annotations: [RequestParam, PageSize] }
          - name: query
            annotations:
              - name: RequestParam
                values: { required: false }
      - name: create
        descriptor: '(Lcom/example/User;)V'
        annotations: [PostMapping]
        parameters:
          - { name: user, annotations: [RequestBody, jakarta.validation.Valid] }
      - name: helper
        descriptor: '()V'
  - name: com.example.Plain
    methods:
      - name: ignored
        descriptor: '()V'
        annotations: [GetMapping]
"#;

    fn assemble(doc: &str) -> (Result<Vec<Endpoint>>, NamedTypeRegistry) {
        let metadata = MetadataContext::parse_content(doc).unwrap();
        let mut registry = NamedTypeRegistry::new();
        let result = EndpointAssembler::new(&metadata, &mut registry)
            .assemble_all(metadata.declared_classes());
        (result, registry)
    }

    #[test]
    fn test_prefixes_and_mappings() {
        let (endpoints, _) = assemble(DOC);
        let endpoints = endpoints.unwrap();
        let routes: Vec<_> = endpoints
            .iter()
            .map(|e| format!("{} {} {}", e.http_method, e.url, e.method_name))
            .collect();
        assert_eq!(
            routes,
            vec![
                "GET /api/users/{id} find",
                "GET /api/users list",
                "POST /api/users create",
                "GET /v2/users/{id} find",
                "GET /v2/users list",
                "POST /v2/users create",
            ]
        );
        assert!(endpoints.iter().all(|e| e.class_name == "UserController"));
    }

    #[test]
    fn test_parameters_are_classified() {
        let (endpoints, registry) = assemble(DOC);
        let endpoints = endpoints.unwrap();

        let find = &endpoints[0];
        assert_eq!(find.url_args.len(), 1);
        assert_eq!(find.url_args[0].ty, Type::Primitive(PrimitiveKind::Int));
        assert!(find.params.is_empty(), "exchange parameters are not inputs");
        assert_eq!(find.return_type, Type::Named(registry.lookup("User").unwrap()));

        let list = &endpoints[1];
        let params: Vec<_> = list.params.iter().map(|p| (p.name.as_str(), p.required)).collect();
        assert_eq!(params, vec![("page", true), ("size", true), ("query", false)]);
        assert_eq!(list.page_variable().map(|f| f.name.as_str()), Some("page"));
        assert_eq!(list.page_size_variable().map(|f| f.name.as_str()), Some("size"));

        let create = &endpoints[2];
        assert_eq!(create.body, Some(Type::Named(registry.lookup("User").unwrap())));
        assert_eq!(create.return_type, Type::Primitive(PrimitiveKind::Void));
    }

    #[test]
    fn test_request_body_marks_reachable_types() {
        let (endpoints, registry) = assemble(DOC);
        endpoints.unwrap();

        for name in ["User", "Address"] {
            assert!(registry.get(registry.lookup(name).unwrap()).needs_validation);
        }
    }

    #[test]
    fn test_paged_endpoint_without_page_variable_fails() {
        let doc = r#"
classes:
  - name: com.example.AuditController
    annotations: [RestController]
    methods:
      - name: history
        descriptor: '(I)Ljava/util/List;'
        signature: '(I)Ljava/util/List<Lcom/example/Audit;>;'
        annotations: [GetMapping, PagedQuery]
        parameters:
          - { name: size, annotations: [RequestParam] }
"#;
        let (result, _) = assemble(doc);
        match result.unwrap_err() {
            Error::MissingPageVariable { class, method } => {
                assert_eq!(class, "AuditController");
                assert_eq!(method, "history");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_paging_only_applies_to_get() {
        let doc = r#"
classes:
  - name: com.example.AuditController
    annotations: [RestController]
    methods:
      - name: purge
        descriptor: '(I)V'
        annotations: [DeleteMapping, PagedQuery]
        parameters:
          - { name: page, annotations: [RequestParam, PageParam] }
"#;
        let (result, _) = assemble(doc);
        let endpoints = result.unwrap();
        assert_eq!(endpoints.len(), 1);
        assert!(!endpoints[0].is_paged());
        assert_eq!(endpoints[0].url, "");
    }

    #[test]
    fn test_parameter_count_mismatch() {
        let doc = r#"
classes:
  - name: com.example.AuditController
    annotations: [RestController]
    methods:
      - name: broken
        descriptor: '(II)V'
        annotations: [GetMapping]
        parameters:
          - { name: only }
"#;
        let (result, _) = assemble(doc);
        assert!(matches!(
            result.unwrap_err(),
            Error::ParameterMismatch { declared: 1, parsed: 2, .. }
        ));
    }
}
