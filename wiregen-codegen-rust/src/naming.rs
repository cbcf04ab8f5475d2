//! Rust naming rules for generated identifiers.

use std::path::Path;

use wiregen_core::{to_pascal_case, to_snake_case};

/// Keywords that can be used as identifiers through the `r#` prefix.
const ESCAPABLE_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "static", "struct", "trait", "true", "type", "unsafe", "use",
    "where", "while", "abstract", "become", "box", "do", "final", "macro", "override", "priv",
    "try", "typeof", "unsized", "virtual", "yield",
];

/// Make a name usable as a Rust identifier.
///
/// Most keywords become raw identifiers (`type` to `r#type`). The path
/// keywords `self`, `Self`, `crate` and `super` reject the `r#` prefix,
/// so those get a trailing underscore instead.
pub fn escape_ident(name: &str) -> String {
    match name {
        "self" | "Self" | "crate" | "super" => format!("{}_", name),
        _ if ESCAPABLE_KEYWORDS.contains(&name) => format!("r#{}", name),
        _ => name.to_string(),
    }
}

/// Field name for a schema field: snake_case, keyword-safe.
pub fn field_name(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}

/// Method name for an rpc: snake_case, keyword-safe.
pub fn method_name(name: &str) -> String {
    escape_ident(&to_snake_case(name))
}

/// Associated constant name for an rpc, e.g. `GetUser` to `GET_USER`.
pub fn const_name(name: &str) -> String {
    to_snake_case(name).to_ascii_uppercase()
}

/// Type name for a schema declaration.
///
/// Declared names are kept verbatim so that a flattened name such as
/// `Outer_Inner` survives into the generated type.
pub fn type_name(name: &str) -> String {
    escape_ident(name)
}

/// Variant name for an enum value, e.g. `USER_KIND_ADMIN` to `UserKindAdmin`.
pub fn variant_name(name: &str) -> String {
    to_pascal_case(name)
}

/// A module path segment derived from one path component.
fn module_segment(component: &str) -> String {
    let segment = to_snake_case(component).replace('-', "_");
    if segment.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{}", segment);
    }
    escape_ident(&segment)
}

/// The crate-relative module path of the unit generated for a schema
/// file, e.g. `common/base.proto` under module `proto` maps to
/// `crate::proto::common::base`.
pub fn module_path(module: &str, rel_path: &Path) -> String {
    let mut segments = vec!["crate".to_string()];
    if !module.is_empty() {
        segments.push(module_segment(module));
    }
    for component in rel_path.with_extension("").components() {
        let component = component.as_os_str().to_string_lossy();
        if !component.is_empty() {
            segments.push(module_segment(&component));
        }
    }
    segments.join("::")
}
