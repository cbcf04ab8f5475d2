//! Schema preprocessing pipeline.
//!
//! Parsed files enter a [`WorkingSet`], the closed pass list in [`PASSES`]
//! rewrites them file by file, and the linked result feeds code generation.
//! Advisory findings that do not stop a run are collected as [`Warning`]s.

mod pass;
mod passes;
mod warning;
mod working_set;

pub use pass::{PASSES, Pass};
pub use warning::Warning;
pub use working_set::WorkingSet;
