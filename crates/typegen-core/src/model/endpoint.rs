//! Endpoint records produced by the assembler.

// Internal imports (std, crate)
use std::fmt;

use super::{Field, Type};

// External imports (alphabetized)
use serde::Serialize;

/// HTTP methods an endpoint can be mapped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Lowercase name, as used by HTTP client method calls
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Paging contract of a paged endpoint; both names refer to entries of
/// [`Endpoint::params`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paging {
    pub page_variable: String,
    pub page_size_variable: Option<String>,
}

/// One HTTP route of a controller method
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Simple name of the controller class
    pub class_name: String,
    pub method_name: String,
    /// URL with `{name}` placeholders for path variables
    pub url: String,
    pub http_method: HttpMethod,
    pub url_args: Vec<Field>,
    pub body: Option<Type>,
    pub params: Vec<Field>,
    pub return_type: Type,
    pub paging: Option<Paging>,
}

impl Endpoint {
    pub fn new(
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        url: impl Into<String>,
        http_method: HttpMethod,
        return_type: Type,
    ) -> Self {
        Self {
            class_name: class_name.into(),
            method_name: method_name.into(),
            url: url.into(),
            http_method,
            url_args: Vec::new(),
            body: None,
            params: Vec::new(),
            return_type,
            paging: None,
        }
    }

    pub fn is_paged(&self) -> bool {
        self.paging.is_some()
    }

    pub fn page_variable(&self) -> Option<&Field> {
        let paging = self.paging.as_ref()?;
        self.param(&paging.page_variable)
    }

    pub fn page_size_variable(&self) -> Option<&Field> {
        let name = self.paging.as_ref()?.page_size_variable.as_deref()?;
        self.param(name)
    }

    fn param(&self, name: &str) -> Option<&Field> {
        self.params.iter().find(|field| field.name == name)
    }

    /// Path variables and query parameters, required ones first, then by name.
    pub fn all_variables(&self) -> Vec<&Field> {
        let mut variables: Vec<&Field> = self.url_args.iter().chain(&self.params).collect();
        variables.sort_by(|a, b| {
            b.required
                .cmp(&a.required)
                .then_with(|| a.name.cmp(&b.name))
        });
        variables
    }
}
