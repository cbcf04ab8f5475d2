//! Language-agnostic code generation seam.

use eyre::Result;
use wiregen_schema::SchemaFile;

use crate::linker::SymbolTable;

/// Trait for language-specific code generators.
///
/// Implement this trait to emit schema conversions in a new language. One
/// call renders one schema file; the converter decides where the output
/// lands and runs calls in parallel, so implementations must not carry
/// per-call mutable state.
pub trait CodeGenerator {
    /// Language identifier (e.g., "rust")
    fn language(&self) -> &'static str;

    /// File extension for generated source files (e.g., "rs")
    fn file_extension(&self) -> &'static str;

    /// Render the target-language source for one schema file.
    fn generate(&self, file: &SchemaFile, context: &GenerationContext<'_>) -> Result<String>;
}

/// Everything a backend sees beyond the file it is rendering.
#[derive(Clone, Copy)]
pub struct GenerationContext<'a> {
    /// The linked symbol table for the whole set.
    pub table: &'a SymbolTable,
    /// Index of the file being rendered in the linked set.
    pub file: usize,
    /// Name of the module the generated tree is mounted under.
    pub module: &'a str,
}
