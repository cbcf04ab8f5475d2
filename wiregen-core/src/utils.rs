//! Shared naming helpers for code generation.

/// PascalCase form of an identifier, e.g. `status_code` to `StatusCode`.
///
/// Splits on `_` and `-`, uppercases each segment's first character, and
/// lowercases the rest, so `SCREAMING_SNAKE` enum values come out as
/// `ScreamingSnake`.
pub fn to_pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for segment in s.split(['_', '-']) {
        let mut chars = segment.chars();
        let Some(first) = chars.next() else {
            continue;
        };
        out.extend(first.to_uppercase());
        for c in chars {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// snake_case form of an identifier, e.g. `GetUser` to `get_user`.
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c == '-' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(c.to_lowercase());
    }
    out
}
