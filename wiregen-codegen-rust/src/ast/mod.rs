//! Declaration nodes for the Rust source the backend emits.
//!
//! Each node is a small builder that describes itself as code fragments,
//! so nesting and indentation stay with the shared `CodeBuilder` instead
//! of being pasted into strings here.

use wiregen_codegen::builder::CodeFragment;

mod enums;
mod fns;
mod impls;
mod structs;

pub use enums::{Enum, Variant};
pub use fns::{Arm, Fn, Match, Param};
pub use impls::{Const, Impl};
pub use structs::{Field, Struct};

fn vis(is_public: bool) -> &'static str {
    if is_public { "pub " } else { "" }
}

/// Doc comment, derive list, and plain attributes, in the order rustc
/// expects them above an item.
fn annotations(doc: Option<&str>, derives: &[String], attrs: &[String]) -> Vec<CodeFragment> {
    let mut fragments = Vec::new();
    if let Some(doc) = doc {
        fragments.push(CodeFragment::RustDoc(doc.to_string()));
    }
    if !derives.is_empty() {
        fragments.push(CodeFragment::Line(format!(
            "#[derive({})]",
            derives.join(", ")
        )));
    }
    for attr in attrs {
        fragments.push(CodeFragment::Line(format!("#[{attr}]")));
    }
    fragments
}
