//! Schema AST and parser for the wiregen schema compiler.
//!
//! This crate turns `.proto` source text into the [`SchemaFile`] AST that the
//! rest of the workspace transforms and generates code from. The grammar is
//! the proto3 subset wiregen converts: packages, imports, messages, enums,
//! and services with unary rpcs.

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{
    Cardinality, Decl, EnumDecl, EnumValue, FieldDecl, MessageDecl, RpcDecl, ScalarType,
    SchemaFile, ServiceDecl, TypeRef, split_qualified,
};
pub use error::{Error, Result, SchemaSource};
pub use lexer::{Token, tokenize};
pub use parser::{parse, parse_file};
