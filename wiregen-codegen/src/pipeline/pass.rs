//! Preprocessing passes.
//!
//! The pass list is closed: passes run in the fixed order given by
//! [`PASSES`], each one a pure per-file rewrite that may fan a file out
//! into several. Passes never read sibling files, so they parallelize
//! freely across the working set.

use wiregen_schema::SchemaFile;

use super::passes::{flatten, strip};
use crate::error::PassFailure;

/// One preprocessing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    /// Rewrite references qualified with the file's own package into local
    /// references, so later stages see one spelling per local type.
    StripSelfQualifiers,
    /// Lift nested message/enum declarations to top level under a
    /// `Parent_Nested` name, rewriting every reference site in the file.
    FlattenNestedTypes,
}

/// The passes in execution order.
pub const PASSES: &[Pass] = &[Pass::StripSelfQualifiers, Pass::FlattenNestedTypes];

impl Pass {
    /// The pass name used in diagnostics and failure reports.
    pub fn name(&self) -> &'static str {
        match self {
            Pass::StripSelfQualifiers => "strip-self-qualifiers",
            Pass::FlattenNestedTypes => "flatten-nested-types",
        }
    }

    /// Apply this pass to one file.
    pub fn run(&self, file: &SchemaFile) -> Result<Vec<SchemaFile>, PassFailure> {
        let result = match self {
            Pass::StripSelfQualifiers => Ok(strip::run(file)),
            Pass::FlattenNestedTypes => flatten::run(file),
        };
        result.map_err(|message| PassFailure {
            file: file.src_path.clone(),
            pass: self.name(),
            message,
        })
    }
}

impl std::fmt::Display for Pass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
