//! Cross-file symbol resolution.
//!
//! After preprocessing, every top-level declaration is registered in one
//! global [`SymbolTable`] under its package-qualified name, each file gets a
//! view of the files its imports make visible, and every type reference in
//! the set is checked against the table. Link errors are collected across
//! the whole set and reported together.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use indexmap::map::Entry;
use wiregen_schema::{Decl, MessageDecl, SchemaFile, TypeRef};

use crate::error::{DuplicateSymbol, Error, KindMismatch, LinkReport, Result, UnresolvedRef};
use crate::pipeline::Warning;

/// What a registered symbol declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Message,
    Enum,
    Service,
}

impl SymbolKind {
    fn of(decl: &Decl) -> Self {
        match decl {
            Decl::Message(_) => SymbolKind::Message,
            Decl::Enum(_) => SymbolKind::Enum,
            Decl::Service(_) => SymbolKind::Service,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Message => f.write_str("message"),
            SymbolKind::Enum => f.write_str("enum"),
            SymbolKind::Service => f.write_str("service"),
        }
    }
}

/// One declaration in the global table.
#[derive(Debug, Clone)]
pub struct Symbol {
    /// Index of the declaring file in the linked set.
    pub file: usize,
    /// The declared name, without package qualifier.
    pub local_name: String,
    pub package: Option<String>,
    pub kind: SymbolKind,
}

/// Per-file linking context: the file's package, where it lives relative to
/// the source root, and which other files its imports make visible.
#[derive(Debug, Clone)]
pub struct FileView {
    pub package: Option<String>,
    pub rel_path: PathBuf,
    visible: Vec<usize>,
}

impl FileView {
    /// Indices of the files visible through imports, direct imports first.
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }
}

/// The global symbol table for one conversion run.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
    views: Vec<FileView>,
}

impl SymbolTable {
    /// Looks up a fully qualified name.
    pub fn get(&self, qualified: &str) -> Option<&Symbol> {
        self.symbols.get(qualified)
    }

    /// Resolves a reference as written in file `from`.
    ///
    /// Qualified names go straight to the global table. Unqualified names
    /// are tried against the file's own package first, then against the
    /// package of each file visible through imports.
    pub fn resolve(&self, name: &str, from: usize) -> Option<&Symbol> {
        if name.contains('.') {
            return self.symbols.get(name);
        }
        let view = &self.views[from];
        if let Some(symbol) = self.symbols.get(&qualify(view.package.as_deref(), name)) {
            return Some(symbol);
        }
        for &index in &view.visible {
            let package = self.views[index].package.as_deref();
            if let Some(symbol) = self.symbols.get(&qualify(package, name)) {
                return Some(symbol);
            }
        }
        None
    }

    pub fn view(&self, file: usize) -> &FileView {
        &self.views[file]
    }

    /// All registered symbols in registration order.
    pub fn symbols(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols
            .iter()
            .map(|(name, symbol)| (name.as_str(), symbol))
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Builds the symbol table for a preprocessed set and validates every type
/// reference in it.
///
/// `rel_paths` parallels `files` and gives each file's path relative to the
/// source root; import strings are matched against those paths. Advisory
/// findings land in `warnings`, errors abort the link.
pub fn link(
    files: &[SchemaFile],
    rel_paths: &[PathBuf],
    warnings: &mut Vec<Warning>,
) -> Result<SymbolTable> {
    debug_assert_eq!(files.len(), rel_paths.len());

    let mut report = LinkReport::default();
    let mut table = SymbolTable::default();

    for (index, file) in files.iter().enumerate() {
        if file.package.is_none() && !file.decls.is_empty() {
            warnings.push(
                Warning::new("file declares no package; its types are registered unqualified")
                    .at(rel_key(&rel_paths[index])),
            );
        }
        for decl in &file.decls {
            match table.symbols.entry(file.qualify(decl.name())) {
                Entry::Occupied(entry) => {
                    report.duplicates.push(DuplicateSymbol {
                        name: entry.key().clone(),
                        first: files[entry.get().file].src_path.clone(),
                        second: file.src_path.clone(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(Symbol {
                        file: index,
                        local_name: decl.name().to_string(),
                        package: file.package.clone(),
                        kind: SymbolKind::of(decl),
                    });
                }
            }
        }
    }

    let by_rel: HashMap<String, usize> = rel_paths
        .iter()
        .enumerate()
        .map(|(index, rel)| (rel_key(rel), index))
        .collect();

    // Direct imports are always visible. Imports marked public chain
    // through: whatever an imported file re-exports becomes visible here
    // too, private imports of that file stay hidden.
    for (index, file) in files.iter().enumerate() {
        let mut queue = VecDeque::new();
        for import in file.imports.iter().chain(&file.public_imports) {
            match by_rel.get(import.as_str()) {
                Some(&target) => queue.push_back(target),
                None => warnings.push(
                    Warning::new(format!(
                        "import '{import}' does not match any loaded schema file"
                    ))
                    .at(rel_key(&rel_paths[index])),
                ),
            }
        }
        let mut visible = Vec::new();
        let mut seen = HashSet::new();
        while let Some(target) = queue.pop_front() {
            if target == index || !seen.insert(target) {
                continue;
            }
            visible.push(target);
            for import in &files[target].public_imports {
                if let Some(&next) = by_rel.get(import.as_str()) {
                    queue.push_back(next);
                }
            }
        }
        table.views.push(FileView {
            package: file.package.clone(),
            rel_path: rel_paths[index].clone(),
            visible,
        });
    }

    for (index, file) in files.iter().enumerate() {
        for message in file.messages() {
            check_message(message, index, files, &table, &mut report);
        }
        for service in file.services() {
            for rpc in &service.rpcs {
                let context = RpcContext {
                    service: &service.name,
                    rpc: &rpc.name,
                    file: index,
                };
                check_rpc_type(&rpc.request, "request", &context, files, &table, &mut report);
                check_rpc_type(&rpc.response, "response", &context, files, &table, &mut report);
            }
        }
    }

    if report.is_empty() {
        Ok(table)
    } else {
        Err(Box::new(Error::Link(report)))
    }
}

fn check_message(
    message: &MessageDecl,
    file: usize,
    files: &[SchemaFile],
    table: &SymbolTable,
    report: &mut LinkReport,
) {
    for field in &message.fields {
        let TypeRef::Named(name) = &field.ty else {
            continue;
        };
        let declaration = format!("message '{}', field '{}'", message.name, field.name);
        match table.resolve(name, file) {
            None => report.unresolved.push(UnresolvedRef {
                file: files[file].src_path.clone(),
                declaration,
                symbol: name.clone(),
            }),
            Some(symbol) if symbol.kind == SymbolKind::Service => {
                report.mismatched.push(KindMismatch {
                    file: files[file].src_path.clone(),
                    declaration,
                    symbol: name.clone(),
                    kind: symbol.kind,
                    expected: "a message or enum type",
                });
            }
            Some(_) => {}
        }
    }
    for nested in &message.messages {
        check_message(nested, file, files, table, report);
    }
}

struct RpcContext<'a> {
    service: &'a str,
    rpc: &'a str,
    file: usize,
}

fn check_rpc_type(
    ty: &TypeRef,
    role: &str,
    context: &RpcContext<'_>,
    files: &[SchemaFile],
    table: &SymbolTable,
    report: &mut LinkReport,
) {
    // The parser already rejects scalar rpc types.
    let TypeRef::Named(name) = ty else {
        return;
    };
    let declaration = format!(
        "service '{}', rpc '{}' {role}",
        context.service, context.rpc
    );
    match table.resolve(name, context.file) {
        None => report.unresolved.push(UnresolvedRef {
            file: files[context.file].src_path.clone(),
            declaration,
            symbol: name.clone(),
        }),
        Some(symbol) if symbol.kind != SymbolKind::Message => {
            report.mismatched.push(KindMismatch {
                file: files[context.file].src_path.clone(),
                declaration,
                symbol: name.clone(),
                kind: symbol.kind,
                expected: "a message type",
            });
        }
        Some(_) => {}
    }
}

fn qualify(package: Option<&str>, name: &str) -> String {
    match package {
        Some(package) => format!("{package}.{name}"),
        None => name.to_string(),
    }
}

/// Forward-slash form of a relative path, the spelling import statements use.
fn rel_key(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use wiregen_schema::parse;

    use super::*;

    fn file(name: &str, src: &str) -> SchemaFile {
        parse(src, Path::new(name)).unwrap()
    }

    fn link_set(files: &[SchemaFile]) -> (Result<SymbolTable>, Vec<Warning>) {
        let rel_paths: Vec<PathBuf> = files.iter().map(|f| f.src_path.clone()).collect();
        let mut warnings = Vec::new();
        let result = link(files, &rel_paths, &mut warnings);
        (result, warnings)
    }

    fn expect_report(result: Result<SymbolTable>) -> LinkReport {
        match *result.unwrap_err() {
            Error::Link(report) => report,
            other => panic!("expected a link error, got {other:?}"),
        }
    }

    #[test]
    fn test_registers_package_qualified_symbols() {
        let files = vec![file(
            "a.proto",
            "package a;\nmessage Foo {}\nenum Kind {\n  KIND_UNKNOWN = 0;\n}",
        )];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("a.Foo").unwrap().kind, SymbolKind::Message);
        assert_eq!(table.get("a.Kind").unwrap().kind, SymbolKind::Enum);
        assert!(table.get("Foo").is_none());
    }

    #[test]
    fn test_resolves_unqualified_in_own_package() {
        let files = vec![file(
            "a.proto",
            "package a;\nmessage Foo {}\nmessage Bar {\n  Foo foo = 1;\n}",
        )];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        let symbol = table.resolve("Foo", 0).unwrap();
        assert_eq!(symbol.local_name, "Foo");
        assert_eq!(symbol.package.as_deref(), Some("a"));
    }

    #[test]
    fn test_qualified_reference_across_files() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file(
                "b.proto",
                "package b;\nimport \"a.proto\";\nmessage Bar {\n  a.Foo foo = 1;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        assert_eq!(table.resolve("a.Foo", 1).unwrap().file, 0);
    }

    #[test]
    fn test_unqualified_reference_through_import() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file(
                "b.proto",
                "package b;\nimport \"a.proto\";\nmessage Bar {\n  Foo foo = 1;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        let symbol = table.resolve("Foo", 1).unwrap();
        assert_eq!(symbol.file, 0);
    }

    #[test]
    fn test_own_package_wins_over_imports() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file(
                "b.proto",
                "package b;\nimport \"a.proto\";\nmessage Foo {}\nmessage Bar {\n  Foo foo = 1;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        assert_eq!(table.resolve("Foo", 1).unwrap().file, 1);
    }

    #[test]
    fn test_public_import_is_transitive() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file("b.proto", "package b;\nimport public \"a.proto\";"),
            file(
                "c.proto",
                "package c;\nimport \"b.proto\";\nmessage Bar {\n  Foo foo = 1;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let table = result.unwrap();
        assert_eq!(table.resolve("Foo", 2).unwrap().file, 0);
        assert_eq!(table.view(2).visible(), &[1, 0]);
    }

    #[test]
    fn test_private_import_is_not_transitive() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file("b.proto", "package b;\nimport \"a.proto\";"),
            file(
                "c.proto",
                "package c;\nimport \"b.proto\";\nmessage Bar {\n  Foo foo = 1;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].symbol, "Foo");
        assert_eq!(
            report.unresolved[0].declaration,
            "message 'Bar', field 'foo'"
        );
    }

    #[test]
    fn test_unresolved_reference_names_symbol_and_site() {
        let files = vec![file(
            "b.proto",
            "package b;\nmessage Bar {\n  a.Foo foo = 1;\n}",
        )];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.unresolved.len(), 1);
        assert_eq!(report.unresolved[0].symbol, "a.Foo");
        assert_eq!(report.unresolved[0].file, Path::new("b.proto"));
        assert_eq!(
            report.unresolved[0].declaration,
            "message 'Bar', field 'foo'"
        );
    }

    #[test]
    fn test_duplicate_symbols_are_reported() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file("a2.proto", "package a;\nmessage Foo {}"),
        ];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].name, "a.Foo");
        assert_eq!(report.duplicates[0].first, Path::new("a.proto"));
        assert_eq!(report.duplicates[0].second, Path::new("a2.proto"));
    }

    #[test]
    fn test_rpc_request_must_be_a_message() {
        let files = vec![file(
            "a.proto",
            "package a;\nenum Kind {\n  KIND_UNKNOWN = 0;\n}\nmessage Res {}\nservice S {\n  rpc F(Kind) returns (Res);\n}",
        )];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.mismatched.len(), 1);
        assert_eq!(report.mismatched[0].kind, SymbolKind::Enum);
        assert_eq!(report.mismatched[0].expected, "a message type");
        assert_eq!(
            report.mismatched[0].declaration,
            "service 'S', rpc 'F' request"
        );
    }

    #[test]
    fn test_field_must_not_name_a_service() {
        let files = vec![file(
            "a.proto",
            "package a;\nservice S {}\nmessage Bar {\n  S s = 1;\n}",
        )];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.mismatched.len(), 1);
        assert_eq!(report.mismatched[0].kind, SymbolKind::Service);
        assert_eq!(report.mismatched[0].expected, "a message or enum type");
    }

    #[test]
    fn test_link_errors_are_aggregated() {
        let files = vec![
            file("a.proto", "package a;\nmessage Foo {}"),
            file(
                "b.proto",
                "package a;\nmessage Foo {}\nmessage Bar {\n  Missing m = 1;\n  Other o = 2;\n}",
            ),
        ];
        let (result, _) = link_set(&files);
        let report = expect_report(result);
        assert_eq!(report.len(), 3);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.unresolved.len(), 2);
    }

    #[test]
    fn test_unknown_import_warns_but_links() {
        let files = vec![file(
            "a.proto",
            "package a;\nimport \"missing.proto\";\nmessage Foo {}",
        )];
        let (result, warnings) = link_set(&files);
        assert!(result.is_ok());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("missing.proto"));
        assert_eq!(warnings[0].location.as_deref(), Some("a.proto"));
    }

    #[test]
    fn test_packageless_file_warns_and_registers_unqualified() {
        let files = vec![
            file("base.proto", "message Base {}"),
            file(
                "a.proto",
                "package a;\nimport \"base.proto\";\nmessage Foo {\n  Base base = 1;\n}",
            ),
        ];
        let (result, warnings) = link_set(&files);
        let table = result.unwrap();
        assert_eq!(table.resolve("Base", 1).unwrap().file, 0);
        assert!(warnings.iter().any(|w| w.message.contains("no package")));
    }

    #[test]
    fn test_import_matches_nested_rel_path() {
        let a = file("common/base.proto", "package common;\nmessage Base {}");
        let b = file(
            "api.proto",
            "package api;\nimport \"common/base.proto\";\nmessage Req {\n  Base base = 1;\n}",
        );
        let rel_paths = vec![
            PathBuf::from("common/base.proto"),
            PathBuf::from("api.proto"),
        ];
        let mut warnings = Vec::new();
        let table = link(&[a, b], &rel_paths, &mut warnings).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(table.resolve("Base", 1).unwrap().file, 0);
        assert_eq!(table.view(0).rel_path, Path::new("common/base.proto"));
    }
}
