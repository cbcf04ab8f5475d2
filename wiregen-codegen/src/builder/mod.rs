//! Rendering primitives shared by language backends.
//!
//! Backends model their output as [`Renderable`] declaration nodes. Each node
//! describes itself as a tree of [`CodeFragment`]s, and a [`CodeBuilder`]
//! flattens that tree into indented text.

mod code_builder;
mod indent;
mod renderable;

pub use code_builder::CodeBuilder;
pub use indent::Indent;
pub use renderable::{CodeFragment, Renderable};
