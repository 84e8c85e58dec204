//! Name-shape helpers used to derive database and accessor names from a
//! column or table's logical (camelCase) name.

/// Converts a camelCase identifier to a lower_snake_case one, e.g.
/// `"ForumThread"` -> `"forum_thread"`, `"URLParser"` -> `"url_parser"`,
/// `"id"` -> `"id"`.
///
/// Equivalent to the two regex substitutions `(.)([A-Z][a-z]+)` -> `$1_$2`
/// followed by `([a-z0-9])([A-Z])` -> `$1_$2`, then lowercasing — done here
/// as a single char-scan since the crate has no other use for `regex`.
pub fn camel_to_lower(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let prev_is_lower_or_digit = prev.is_lowercase() || prev.is_ascii_digit();
            if prev_is_lower_or_digit || (prev.is_uppercase() && next_is_lower) {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Upper-cases the first character, leaving the rest untouched, e.g.
/// `"thread"` -> `"Thread"`.
pub fn first_upper(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cases the first character, leaving the rest untouched, e.g.
/// `"Thread"` -> `"thread"`.
pub fn first_lower(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
