//! Import tracking for one generated file.

use std::collections::BTreeSet;

use indexmap::IndexMap;

/// Collects the `use` targets a generated file needs.
///
/// Symbols are grouped per module and deduplicated as they arrive, so a type
/// referenced from ten fields still imports once. Modules keep insertion
/// order and symbols within a module are sorted, which keeps rendered output
/// stable run over run.
///
/// # Example
///
/// ```
/// use wiregen_codegen::generation::ImportCollector;
///
/// let mut imports = ImportCollector::new();
/// imports.add("crate::proto::common", "Timestamp");
/// imports.add("crate::proto::common", "Duration");
/// imports.add("crate::proto::common", "Timestamp");
///
/// let rendered: Vec<String> = imports
///     .iter()
///     .map(|(module, symbols)| {
///         let symbols: Vec<&str> = symbols.iter().map(|s| s.as_str()).collect();
///         format!("use {}::{{{}}};", module, symbols.join(", "))
///     })
///     .collect();
/// assert_eq!(rendered, ["use crate::proto::common::{Duration, Timestamp};"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImportCollector {
    imports: IndexMap<String, BTreeSet<String>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `symbol` is needed from `module`.
    pub fn add(&mut self, module: &str, symbol: &str) {
        self.imports
            .entry(module.to_string())
            .or_default()
            .insert(symbol.to_string());
    }

    /// Modules in insertion order, each with its sorted symbol set.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.imports.iter().map(|(module, symbols)| (module.as_str(), symbols))
    }
}
