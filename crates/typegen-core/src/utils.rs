//! String transformation utilities for code generation

/// Convert a string to snake_case
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_is_lowercase = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_is_lowercase {
                result.push('_');
            }
            result.extend(ch.to_lowercase());
            prev_is_lowercase = false;
        } else if ch.is_alphanumeric() {
            result.push(ch);
            prev_is_lowercase = ch.is_lowercase() || ch.is_ascii_digit();
        } else if matches!(ch, '-' | '_' | ' ' | '.') {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_is_lowercase = false;
        }
    }

    result.trim_matches('_').to_string()
}

/// Convert a string to kebab-case
pub fn to_kebab_case(s: &str) -> String {
    to_snake_case(s).replace('_', "-")
}

/// Last segment of a dotted or slashed class path, with nested-class markers removed.
///
/// `com.example.Outer$Inner` becomes `Inner`.
pub fn simple_name(qualified: &str) -> &str {
    let tail = qualified.rsplit(['.', '/']).next().unwrap_or(qualified);
    tail.rsplit('$').next().unwrap_or(tail)
}

/// Normalizes a slash separated class path into its dotted form.
pub fn dotted_name(path: &str) -> String {
    path.replace('/', ".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("UserController"), "user_controller");
        assert_eq!(to_snake_case("findAllUsers"), "find_all_users");
        assert_eq!(to_snake_case("already_snake"), "already_snake");
        assert_eq!(to_snake_case("HTTPServer"), "httpserver");
    }

    #[test]
    fn test_to_kebab_case() {
        assert_eq!(to_kebab_case("UserAccount"), "user-account");
        assert_eq!(to_kebab_case("Order"), "order");
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(simple_name("com.example.User"), "User");
        assert_eq!(simple_name("com/example/User"), "User");
        assert_eq!(simple_name("com.example.Outer$Inner"), "Inner");
        assert_eq!(simple_name("Plain"), "Plain");
    }

    #[test]
    fn test_dotted_name() {
        assert_eq!(dotted_name("java/util/List"), "java.util.List");
    }
}
