//! Core utilities and types for the wiregen schema compiler.
//!
//! This crate provides the file-writing machinery and naming helpers used
//! across the wiregen workspace.

mod file;
mod utils;

// File operations
pub use file::GeneratedFile;
// String utilities
pub use utils::{to_pascal_case, to_snake_case};

/// Header line prepended to every generated source file.
pub const GENERATED_HEADER: &str = "// Generated by wiregen. Do not edit.";
