//! Rust code generation for wiregen.
//!
//! Implements the [`wiregen_codegen::CodeGenerator`] backend that turns
//! linked schema files into Rust modules targeting `wiregen_runtime`.

mod generator;
mod naming;
mod rust_file;
mod type_mapper;

pub mod ast;

pub use ast::{Arm, Const, Enum, Field, Fn, Impl, Match, Param, Struct, Variant};
pub use generator::RustGenerator;
pub use rust_file::{RustFile, Use};
pub use type_mapper::RustTypeMapper;
