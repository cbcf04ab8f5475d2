//! Nested-type flattening.
//!
//! Nested messages and enums are lifted to the top level under synthesized
//! `Outer_Inner` names and every reference is rewritten to the new spelling.
//! A file with no nesting passes through untouched, so applying the pass a
//! second time is a no-op.

use std::collections::{BTreeMap, BTreeSet};

use wiregen_schema::{Decl, MessageDecl, SchemaFile, TypeRef};

pub(crate) fn run(file: &SchemaFile) -> Result<Vec<SchemaFile>, String> {
    let has_nested = file.decls.iter().any(|decl| match decl {
        Decl::Message(message) => message.has_nested(),
        _ => false,
    });
    if !has_nested {
        return Ok(vec![file.clone()]);
    }

    let index = FlattenIndex::build(file)?;
    let mut out = file.clone();
    for decl in &mut out.decls {
        match decl {
            Decl::Message(message) => {
                let mut scope = Vec::new();
                rewrite_message(message, &mut scope, &index);
            }
            Decl::Service(service) => {
                for rpc in &mut service.rpcs {
                    rewrite_type(&mut rpc.request, &[], &index);
                    rewrite_type(&mut rpc.response, &[], &index);
                }
            }
            Decl::Enum(_) => {}
        }
    }
    out.decls = lift(out.decls, &index);
    Ok(vec![out])
}

/// Rename table computed up front so collisions surface before any rewrite.
struct FlattenIndex {
    /// Dotted paths of every message and enum declared in the file.
    declared: BTreeSet<String>,
    /// Dotted path of each nested declaration mapped to its flat name.
    renames: BTreeMap<String, String>,
    package: Option<String>,
}

impl FlattenIndex {
    fn build(file: &SchemaFile) -> Result<Self, String> {
        let mut index = FlattenIndex {
            declared: BTreeSet::new(),
            renames: BTreeMap::new(),
            package: file.package.clone(),
        };
        let top_level: BTreeSet<String> = file
            .decls
            .iter()
            .map(|decl| decl.name().to_string())
            .collect();
        let mut flat_sources: BTreeMap<String, String> = BTreeMap::new();
        for decl in &file.decls {
            match decl {
                Decl::Message(message) => {
                    index.declared.insert(message.name.clone());
                    index.collect(message, &message.name, &top_level, &mut flat_sources)?;
                }
                Decl::Enum(decl) => {
                    index.declared.insert(decl.name.clone());
                }
                Decl::Service(_) => {}
            }
        }
        Ok(index)
    }

    fn collect(
        &mut self,
        message: &MessageDecl,
        path: &str,
        top_level: &BTreeSet<String>,
        flat_sources: &mut BTreeMap<String, String>,
    ) -> Result<(), String> {
        for nested in &message.messages {
            self.record(path, &nested.name, top_level, flat_sources)?;
            let child = format!("{path}.{}", nested.name);
            self.collect(nested, &child, top_level, flat_sources)?;
        }
        for nested in &message.enums {
            self.record(path, &nested.name, top_level, flat_sources)?;
        }
        Ok(())
    }

    fn record(
        &mut self,
        parent: &str,
        name: &str,
        top_level: &BTreeSet<String>,
        flat_sources: &mut BTreeMap<String, String>,
    ) -> Result<(), String> {
        let path = format!("{parent}.{name}");
        let flat = format!("{}_{name}", parent.replace('.', "_"));
        if top_level.contains(&flat) {
            return Err(format!(
                "flattening '{path}' to '{flat}' collides with a top-level declaration of the same name"
            ));
        }
        if let Some(previous) = flat_sources.insert(flat.clone(), path.clone()) {
            return Err(format!(
                "flattening '{previous}' and '{path}' both produce '{flat}'"
            ));
        }
        self.declared.insert(path.clone());
        self.renames.insert(path, flat);
        Ok(())
    }

    /// Resolves a reference against its enclosing scope, innermost scope
    /// first, and returns the flat spelling when it lands on a nested
    /// declaration. References that resolve to top-level types or do not
    /// resolve at all are left for the linker.
    fn rewrite(&self, name: &str, scope: &[String]) -> Option<String> {
        let candidate = self.local_candidate(name);
        for depth in (0..=scope.len()).rev() {
            let path = if depth == 0 {
                candidate.to_string()
            } else {
                format!("{}.{candidate}", scope[..depth].join("."))
            };
            if self.declared.contains(&path) {
                return self.renames.get(&path).cloned();
            }
        }
        None
    }

    /// References may still carry the file's own package qualifier when the
    /// pass runs standalone; drop it before probing scopes.
    fn local_candidate<'a>(&self, name: &'a str) -> &'a str {
        match &self.package {
            Some(package) => name
                .strip_prefix(package.as_str())
                .and_then(|rest| rest.strip_prefix('.'))
                .unwrap_or(name),
            None => name,
        }
    }
}

fn rewrite_message(message: &mut MessageDecl, scope: &mut Vec<String>, index: &FlattenIndex) {
    scope.push(message.name.clone());
    for field in &mut message.fields {
        rewrite_type(&mut field.ty, scope, index);
    }
    for nested in &mut message.messages {
        rewrite_message(nested, scope, index);
    }
    scope.pop();
}

fn rewrite_type(ty: &mut TypeRef, scope: &[String], index: &FlattenIndex) {
    let TypeRef::Named(name) = ty else { return };
    if let Some(flat) = index.rewrite(name, scope) {
        *ty = TypeRef::Named(flat);
    }
}

/// Rebuilds the declaration list with nested types hoisted to the top level.
/// Each parent is emitted before its descendants, so the output order stays
/// stable across runs.
fn lift(decls: Vec<Decl>, index: &FlattenIndex) -> Vec<Decl> {
    let mut out = Vec::with_capacity(decls.len() + index.renames.len());
    for decl in decls {
        match decl {
            Decl::Message(message) => {
                let path = message.name.clone();
                lift_message(message, path, index, &mut out);
            }
            other => out.push(other),
        }
    }
    out
}

fn lift_message(mut message: MessageDecl, path: String, index: &FlattenIndex, out: &mut Vec<Decl>) {
    let nested_messages = std::mem::take(&mut message.messages);
    let nested_enums = std::mem::take(&mut message.enums);
    if let Some(flat) = index.renames.get(&path) {
        message.name = flat.clone();
    }
    out.push(Decl::Message(message));
    for nested in nested_messages {
        let child = format!("{path}.{}", nested.name);
        lift_message(nested, child, index, out);
    }
    for mut nested in nested_enums {
        let child = format!("{path}.{}", nested.name);
        if let Some(flat) = index.renames.get(&child) {
            nested.name = flat.clone();
        }
        out.push(Decl::Enum(nested));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use wiregen_schema::parse;

    use super::*;

    fn file(src: &str) -> SchemaFile {
        parse(src, Path::new("test.proto")).unwrap()
    }

    fn decl_names(file: &SchemaFile) -> Vec<&str> {
        file.decls.iter().map(|decl| decl.name()).collect()
    }

    #[test]
    fn test_lifts_nested_message_and_rewrites_reference() {
        let input = file(
            "message Outer {\n  message Inner {\n    int32 n = 1;\n  }\n  Inner inner = 1;\n}",
        );
        let out = run(&input).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(decl_names(&out[0]), vec!["Outer", "Outer_Inner"]);

        let outer = out[0].messages().next().unwrap();
        assert!(!outer.has_nested());
        assert_eq!(outer.fields[0].ty, TypeRef::Named("Outer_Inner".to_string()));
    }

    #[test]
    fn test_lifts_nested_enum() {
        let input = file(
            "message Msg {\n  enum Kind {\n    KIND_UNKNOWN = 0;\n  }\n  Kind kind = 1;\n}",
        );
        let out = run(&input).unwrap();
        assert_eq!(decl_names(&out[0]), vec!["Msg", "Msg_Kind"]);
        let msg = out[0].messages().next().unwrap();
        assert_eq!(msg.fields[0].ty, TypeRef::Named("Msg_Kind".to_string()));
        assert_eq!(out[0].enums().next().unwrap().values[0].name, "KIND_UNKNOWN");
    }

    #[test]
    fn test_deep_nesting_lifts_in_parent_first_order() {
        let input = file("message A {\n  message B {\n    message C {}\n  }\n}");
        let out = run(&input).unwrap();
        assert_eq!(decl_names(&out[0]), vec!["A", "A_B", "A_B_C"]);
    }

    #[test]
    fn test_sibling_reference_by_dotted_path() {
        let input = file(
            "message Outer {\n  message Inner {}\n}\nmessage Other {\n  Outer.Inner x = 1;\n}",
        );
        let out = run(&input).unwrap();
        let other = out[0].messages().nth(2).unwrap();
        assert_eq!(other.name, "Other");
        assert_eq!(other.fields[0].ty, TypeRef::Named("Outer_Inner".to_string()));
    }

    #[test]
    fn test_package_qualified_reference_is_flattened() {
        let input = file(
            "package a;\nmessage Outer {\n  message Inner {}\n}\nmessage Other {\n  a.Outer.Inner x = 1;\n}",
        );
        let out = run(&input).unwrap();
        let other = out[0].messages().nth(2).unwrap();
        assert_eq!(other.fields[0].ty, TypeRef::Named("Outer_Inner".to_string()));
    }

    #[test]
    fn test_inner_scope_shadows_top_level() {
        let input = file(
            "message Inner {}\nmessage Outer {\n  message Inner {}\n  Inner x = 1;\n}\nmessage Other {\n  Inner y = 1;\n}",
        );
        let out = run(&input).unwrap();
        let outer = out[0].messages().nth(1).unwrap();
        assert_eq!(outer.name, "Outer");
        assert_eq!(outer.fields[0].ty, TypeRef::Named("Outer_Inner".to_string()));
        let other = out[0].messages().nth(3).unwrap();
        assert_eq!(other.fields[0].ty, TypeRef::Named("Inner".to_string()));
    }

    #[test]
    fn test_rpc_types_are_rewritten() {
        let input = file(
            "message Outer {\n  message Req {}\n  message Res {}\n}\nservice S {\n  rpc F(Outer.Req) returns (Outer.Res);\n}",
        );
        let out = run(&input).unwrap();
        let service = out[0].services().next().unwrap();
        assert_eq!(service.rpcs[0].request, TypeRef::Named("Outer_Req".to_string()));
        assert_eq!(service.rpcs[0].response, TypeRef::Named("Outer_Res".to_string()));
    }

    #[test]
    fn test_foreign_reference_is_untouched() {
        let input = file(
            "message Outer {\n  message Inner {}\n  other.pkg.Thing t = 1;\n}",
        );
        let out = run(&input).unwrap();
        let outer = out[0].messages().next().unwrap();
        assert_eq!(
            outer.fields[0].ty,
            TypeRef::Named("other.pkg.Thing".to_string())
        );
    }

    #[test]
    fn test_flat_file_passes_through() {
        let input = file("message Foo {\n  int32 n = 1;\n}\nmessage Bar {\n  Foo foo = 1;\n}");
        let out = run(&input).unwrap();
        assert_eq!(out[0], input);
    }

    #[test]
    fn test_flatten_is_idempotent() {
        let input = file(
            "message Outer {\n  message Inner {\n    int32 n = 1;\n  }\n  Inner inner = 1;\n}",
        );
        let once = run(&input).unwrap();
        let twice = run(&once[0]).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_collision_with_top_level_name_is_an_error() {
        let input = file("message Outer {\n  message Inner {}\n}\nmessage Outer_Inner {}");
        let err = run(&input).unwrap_err();
        assert!(err.contains("Outer.Inner"), "unexpected message: {err}");
        assert!(err.contains("Outer_Inner"), "unexpected message: {err}");
    }

    #[test]
    fn test_collision_between_synthesized_names_is_an_error() {
        let input = file("message A {\n  message B_C {}\n  message B {\n    message C {}\n  }\n}");
        let err = run(&input).unwrap_err();
        assert!(err.contains("A_B_C"), "unexpected message: {err}");
    }

    #[test]
    fn test_decl_order_is_preserved_around_lifted_types() {
        let input = file(
            "enum Mode {\n  MODE_X = 0;\n}\nmessage Outer {\n  message Inner {}\n}\nmessage Tail {}",
        );
        let out = run(&input).unwrap();
        assert_eq!(decl_names(&out[0]), vec!["Mode", "Outer", "Outer_Inner", "Tail"]);
    }
}
