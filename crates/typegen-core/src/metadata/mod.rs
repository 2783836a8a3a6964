//! Class metadata consumed by the resolver and the endpoint assembler.
//!
//! Metadata is a YAML or JSON document listing classes with their fields,
//! methods, annotations and enum constants. Descriptors and generic
//! signatures are kept as raw strings; [`crate::signature`] parses them.
//!
//! # Examples
//!
//! ```
//! use typegen_core::metadata::{ClassProvider, MetadataContext};
//!
//! let doc = r#"
//! classes:
//!   - name: com.example.User
//!     fields:
//!       - { name: id, descriptor: 'Ljava/lang/Long;' }
//! "#;
//! let metadata = MetadataContext::parse_content(doc).unwrap();
//! assert!(metadata.class("com.example.User").is_some());
//! // well-known JDK classes are always available
//! assert!(metadata.class("java.util.List").is_some());
//! ```

pub mod annotations;
mod builtins;

// Internal imports (std, crate)
use std::collections::HashMap;
use std::path::Path;

use crate::utils::{dotted_name, simple_name};

// External imports (alphabetized)
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tokio::fs;

/// Looks up class metadata by qualified name.
pub trait ClassProvider {
    /// Returns the class with the given dotted or slashed qualified name.
    fn class(&self, qualified_name: &str) -> Option<&ClassInfo>;
}

/// What kind of type a class declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Enum,
    Interface,
}

/// Metadata for a single class
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassInfo {
    /// Qualified name, `.` or `/` separated
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub superclass: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Declared fields in source order
    #[serde(default)]
    pub fields: Vec<FieldInfo>,
    /// Enum constants in declaration order
    #[serde(default)]
    pub constants: Vec<String>,
    #[serde(default)]
    pub methods: Vec<MethodInfo>,
}

impl ClassInfo {
    /// Creates an empty class of the given kind
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Self::default()
        }
    }

    /// Dotted qualified name
    pub fn qualified_name(&self) -> String {
        dotted_name(&self.name)
    }

    /// Name without package or enclosing class
    pub fn simple_name(&self) -> &str {
        simple_name(&self.name)
    }

    pub fn annotation(&self, qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, qualified)
    }

    pub fn has_annotation(&self, qualified: &str) -> bool {
        self.annotation(qualified).is_some()
    }
}

/// A declared field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    /// Erased descriptor, e.g. `Ljava/util/List;`
    pub descriptor: String,
    /// Generic signature, e.g. `Ljava/util/List<Ljava/lang/String;>;`
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl FieldInfo {
    pub fn annotation(&self, qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, qualified)
    }

    pub fn has_annotation(&self, qualified: &str) -> bool {
        self.annotation(qualified).is_some()
    }

    /// The generic signature if present, otherwise the descriptor
    pub fn type_signature(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.descriptor)
    }
}

/// A declared method
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodInfo {
    pub name: String,
    /// Erased descriptor, e.g. `(Ljava/lang/Long;)Lcom/example/User;`
    pub descriptor: String,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,
}

impl MethodInfo {
    pub fn annotation(&self, qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, qualified)
    }

    pub fn has_annotation(&self, qualified: &str) -> bool {
        self.annotation(qualified).is_some()
    }

    /// The generic signature if present, otherwise the descriptor
    pub fn type_signature(&self) -> &str {
        self.signature.as_deref().unwrap_or(&self.descriptor)
    }
}

/// A declared method parameter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

impl ParameterInfo {
    pub fn annotation(&self, qualified: &str) -> Option<&Annotation> {
        find_annotation(&self.annotations, qualified)
    }

    pub fn has_annotation(&self, qualified: &str) -> bool {
        self.annotation(qualified).is_some()
    }
}

/// An annotation instance with its explicitly given values.
///
/// In documents an annotation can be written as a bare name
/// (`- org.springframework.lang.Nullable`) or as a map with `name` and
/// `values`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct Annotation {
    pub name: String,
    #[serde(default)]
    pub values: JsonMap<String, JsonValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        values: JsonMap<String, JsonValue>,
    },
}

impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Name(name) => Annotation {
                name,
                values: JsonMap::new(),
            },
            AnnotationRepr::Full { name, values } => Annotation { name, values },
        }
    }
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: JsonMap::new(),
        }
    }

    /// Adds a value, builder style
    pub fn with(mut self, key: &str, value: impl Into<JsonValue>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// True when this annotation is `qualified`.
    ///
    /// Unqualified names written in a document match on the simple name.
    pub fn matches(&self, qualified: &str) -> bool {
        let name = dotted_name(&self.name);
        if name == qualified {
            return true;
        }
        !name.contains('.') && name == simple_name(qualified)
    }

    pub fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(JsonValue::as_str)
    }

    pub fn bool_value(&self, key: &str) -> Option<bool> {
        self.values.get(key).and_then(JsonValue::as_bool)
    }

    pub fn i64_value(&self, key: &str) -> Option<i64> {
        self.values.get(key).and_then(JsonValue::as_i64)
    }

    /// A value that may be a single string or a list of strings
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.values.get(key) {
            Some(JsonValue::String(s)) => vec![s.clone()],
            Some(JsonValue::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn find_annotation<'a>(annotations: &'a [Annotation], qualified: &str) -> Option<&'a Annotation> {
    annotations.iter().find(|a| a.matches(qualified))
}

#[derive(Debug, Default, Deserialize)]
struct MetadataDocument {
    #[serde(default)]
    classes: Vec<ClassInfo>,
}

/// All classes known to a run, keyed by dotted qualified name.
///
/// Pre-seeded with the JDK, Reactor and servlet classes the resolver
/// recognizes. Document classes replace built-ins of the same name.
#[derive(Debug, Clone)]
pub struct MetadataContext {
    classes: HashMap<String, ClassInfo>,
    /// Qualified names of document classes in document order
    declared: Vec<String>,
}

impl MetadataContext {
    /// A context holding only the built-in classes
    pub fn new() -> Self {
        let classes = builtins::classes()
            .into_iter()
            .map(|class| (class.qualified_name(), class))
            .collect();
        Self {
            classes,
            declared: Vec::new(),
        }
    }

    /// Builds a context from already parsed classes
    pub fn from_classes(classes: impl IntoIterator<Item = ClassInfo>) -> Self {
        let mut context = Self::new();
        for class in classes {
            context.insert(class);
        }
        context
    }

    /// Load metadata from a file (supports both JSON and YAML)
    pub async fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).await?;
        Self::parse_content(&content).map_err(|e| {
            crate::Error::metadata(format!(
                "Failed to parse metadata at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Parse metadata from a string, trying JSON first and then YAML
    pub fn parse_content(content: &str) -> crate::Result<Self> {
        let document: MetadataDocument = match serde_json::from_str(content) {
            Ok(document) => document,
            Err(_) => serde_yaml::from_str(content)?,
        };
        Ok(Self::from_classes(document.classes))
    }

    /// Adds or replaces a class
    pub fn insert(&mut self, class: ClassInfo) {
        let name = class.qualified_name();
        if !self.declared.contains(&name) {
            self.declared.push(name.clone());
        }
        self.classes.insert(name, class);
    }

    /// Classes from the document, in document order
    pub fn declared_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.declared.iter().filter_map(|name| self.classes.get(name))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl Default for MetadataContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassProvider for MetadataContext {
    fn class(&self, qualified_name: &str) -> Option<&ClassInfo> {
        if qualified_name.contains('/') {
            self.classes.get(&dotted_name(qualified_name))
        } else {
            self.classes.get(qualified_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const DOC: &str = r#"
classes:
  - name: com/example/Role
    kind: enum
    constants: [ADMIN, USER]
  - name: com.example.User
    superclass: java.lang.Object
    fields:
      - name: id
        descriptor: 'Ljava/lang/Long;'
      - name: nickname
        descriptor: 'Ljava/lang/String;'
        annotations:
          - org.springframework.lang.Nullable
      - name: COUNT
        descriptor: 'I'
        static: true
    methods:
      - name: find
        descriptor: '(Ljava/lang/Long;)Lcom/example/User;'
        annotations:
          - name: GetMapping
            values: { value: ['/{id}'] }
        parameters:
          - name: id
            annotations: [PathVariable]
"#;

    #[test]
    fn test_parse_yaml_document() {
        let metadata = MetadataContext::parse_content(DOC).unwrap();
        let declared: Vec<_> = metadata.declared_classes().map(|c| c.simple_name()).collect();
        assert_eq!(declared, vec!["Role", "User"]);

        let role = metadata.class("com.example.Role").unwrap();
        assert_eq!(role.kind, ClassKind::Enum);
        assert_eq!(role.constants, vec!["ADMIN", "USER"]);

        let user = metadata.class("com/example/User").unwrap();
        assert_eq!(user.fields.len(), 3);
        assert!(user.fields[2].is_static);
        assert!(user.fields[1].has_annotation(annotations::SPRING_NULLABLE));
        assert_eq!(user.methods[0].parameters[0].name, "id");
    }

    #[test]
    fn test_parse_json_document() {
        let doc = r#"{"classes":[{"name":"com.example.Empty"}]}"#;
        let metadata = MetadataContext::parse_content(doc).unwrap();
        assert_eq!(metadata.declared_classes().count(), 1);
    }

    #[test]
    fn test_annotation_matching() {
        let qualified = Annotation::new("org.springframework.web.bind.annotation.GetMapping");
        assert!(qualified.matches(annotations::GET_MAPPING));
        assert!(!qualified.matches(annotations::POST_MAPPING));

        let short = Annotation::new("GetMapping").with("value", "/users");
        assert!(short.matches(annotations::GET_MAPPING));
        assert_eq!(short.string_list("value"), vec!["/users"]);
        assert!(short.string_list("path").is_empty());

        // a differently qualified annotation with the same simple name is not a match
        let other = Annotation::new("com.acme.GetMapping");
        assert!(!other.matches(annotations::GET_MAPPING));
    }

    #[test]
    fn test_document_classes_override_builtins() {
        let before = MetadataContext::new();
        assert!(before.class("java.lang.String").is_some());

        let doc = "classes:\n  - name: java.util.Optional\n    kind: interface\n";
        let metadata = MetadataContext::parse_content(doc).unwrap();
        let optional = metadata.class("java.util.Optional").unwrap();
        assert_eq!(optional.kind, ClassKind::Interface);
        assert_eq!(metadata.len(), before.len());
    }

    #[tokio::test]
    async fn test_from_file_reports_path() -> crate::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("broken.yaml");
        fs::write(&path, "classes: [ { fields: 3 } ]").await?;

        let err = MetadataContext::from_file(&path).await.unwrap_err();
        assert!(err.to_string().contains("broken.yaml"));
        Ok(())
    }
}
