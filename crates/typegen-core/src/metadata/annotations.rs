//! Qualified names of the annotations the resolver and assembler react to.

pub const REST_CONTROLLER: &str = "org.springframework.web.bind.annotation.RestController";
pub const REQUEST_MAPPING: &str = "org.springframework.web.bind.annotation.RequestMapping";
pub const GET_MAPPING: &str = "org.springframework.web.bind.annotation.GetMapping";
pub const POST_MAPPING: &str = "org.springframework.web.bind.annotation.PostMapping";
pub const PUT_MAPPING: &str = "org.springframework.web.bind.annotation.PutMapping";
pub const PATCH_MAPPING: &str = "org.springframework.web.bind.annotation.PatchMapping";
pub const DELETE_MAPPING: &str = "org.springframework.web.bind.annotation.DeleteMapping";
pub const REQUEST_PARAM: &str = "org.springframework.web.bind.annotation.RequestParam";
pub const PATH_VARIABLE: &str = "org.springframework.web.bind.annotation.PathVariable";
pub const REQUEST_BODY: &str = "org.springframework.web.bind.annotation.RequestBody";

pub const PAGED_QUERY: &str = "annotations.queries.PagedQuery";
pub const PAGE_PARAM: &str = "annotations.queries.PageParam";
pub const PAGE_SIZE: &str = "annotations.queries.PageSize";

pub const JSON_IGNORE: &str = "com.fasterxml.jackson.annotation.JsonIgnore";
pub const SPRING_NULLABLE: &str = "org.springframework.lang.Nullable";

/// Any of these marks a field as not required
pub const NULLABLE: &[&str] = &[
    SPRING_NULLABLE,
    "jakarta.annotation.Nullable",
    "javax.annotation.Nullable",
];

/// Packages that carry bean validation constraints
pub const CONSTRAINT_PACKAGES: &[&str] = &[
    "jakarta.validation.constraints",
    "javax.validation.constraints",
];

/// Parameter types that never become endpoint inputs
pub const IGNORED_PARAMETER_TYPES: &[&str] = &[
    "org.springframework.web.server.ServerWebExchange",
    "org.springframework.web.server.WebSession",
    "jakarta.servlet.http.HttpServletRequest",
    "jakarta.servlet.http.HttpServletResponse",
    "javax.servlet.http.HttpServletRequest",
    "javax.servlet.http.HttpServletResponse",
];
