//! Schema conversion engine for wiregen.
//!
//! This crate takes parsed schema files through the full conversion
//! pipeline and hands the linked result to a language backend (e.g.,
//! `wiregen-codegen-rust`).
//!
//! # Module Organization
//!
//! - [`pipeline`] - Preprocessing passes over the working set
//! - [`linker`] - Global symbol table and reference resolution
//! - [`builder`] - Fragment trees and the indentation-aware writer
//! - [`generation`] - Output management (GeneratedUnit, ImportCollector)
//! - [`language`] - The backend seam (CodeGenerator, GenerationContext)
//! - [`converter`] - The end-to-end driver (discover, analyze, convert)

pub mod builder;
pub mod converter;
pub mod error;
pub mod generation;
pub mod language;
pub mod linker;
pub mod pipeline;

pub use converter::{
    Analysis, ConvertOptions, ConvertOutcome, Converter, Preview, SourceEntry, discover,
};
pub use error::{Error, GenerationFailure, Result};
pub use language::{CodeGenerator, GenerationContext};
