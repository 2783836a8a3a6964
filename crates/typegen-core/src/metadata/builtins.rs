//! Well-known library classes that every metadata context can resolve.

use super::{ClassInfo, ClassKind};

const CLASSES: &[(&str, ClassKind)] = &[
    ("java.lang.Object", ClassKind::Class),
    ("java.lang.String", ClassKind::Class),
    ("java.lang.Integer", ClassKind::Class),
    ("java.lang.Long", ClassKind::Class),
    ("java.lang.Short", ClassKind::Class),
    ("java.lang.Byte", ClassKind::Class),
    ("java.lang.Float", ClassKind::Class),
    ("java.lang.Double", ClassKind::Class),
    ("java.lang.Boolean", ClassKind::Class),
    ("java.lang.Void", ClassKind::Class),
    ("java.lang.Iterable", ClassKind::Interface),
    ("java.util.Collection", ClassKind::Interface),
    ("java.util.List", ClassKind::Interface),
    ("java.util.ArrayList", ClassKind::Class),
    ("java.util.Set", ClassKind::Interface),
    ("java.util.HashSet", ClassKind::Class),
    ("java.util.Map", ClassKind::Interface),
    ("java.util.HashMap", ClassKind::Class),
    ("java.util.Optional", ClassKind::Class),
    ("java.util.Date", ClassKind::Class),
    ("java.time.LocalDateTime", ClassKind::Class),
    ("java.time.LocalDate", ClassKind::Class),
    ("java.time.Instant", ClassKind::Class),
    ("java.util.concurrent.CompletableFuture", ClassKind::Class),
    ("reactor.core.publisher.Mono", ClassKind::Class),
    ("reactor.core.publisher.Flux", ClassKind::Class),
    ("org.springframework.http.ResponseEntity", ClassKind::Class),
    ("org.springframework.web.server.ServerWebExchange", ClassKind::Interface),
    ("org.springframework.web.server.WebSession", ClassKind::Interface),
    ("jakarta.servlet.http.HttpServletRequest", ClassKind::Interface),
    ("jakarta.servlet.http.HttpServletResponse", ClassKind::Interface),
    ("javax.servlet.http.HttpServletRequest", ClassKind::Interface),
    ("javax.servlet.http.HttpServletResponse", ClassKind::Interface),
];

pub(super) fn classes() -> Vec<ClassInfo> {
    CLASSES
        .iter()
        .map(|(name, kind)| ClassInfo::new(*name, *kind))
        .collect()
}
