//! Fragment tree produced by declaration nodes.
//!
//! Nodes describe their output as [`CodeFragment`]s rather than writing
//! strings directly. Nesting is explicit in the tree, so a node never needs
//! to know the indentation depth it will be rendered at.

use super::CodeBuilder;

/// One piece of generated output.
#[derive(Debug, Clone, PartialEq)]
pub enum CodeFragment {
    /// A line, indented to the current depth and newline-terminated.
    Line(String),
    /// An empty line. Never indented.
    Blank,
    /// A `///` doc comment line.
    RustDoc(String),
    /// A header line, an indented body, and an optional closing line.
    Block {
        header: String,
        body: Vec<CodeFragment>,
        close: Option<String>,
    },
}

impl CodeFragment {
    /// Shorthand for a braced block.
    pub fn block(
        header: impl Into<String>,
        body: Vec<CodeFragment>,
        close: Option<String>,
    ) -> Self {
        Self::Block {
            header: header.into(),
            body,
            close,
        }
    }
}

/// Implemented by every declaration node that can appear in an output file.
pub trait Renderable {
    fn to_fragments(&self) -> Vec<CodeFragment>;

    /// Render this node on its own, at depth zero with Rust indentation.
    ///
    /// Mostly useful in tests; files are assembled through a shared
    /// [`CodeBuilder`] instead.
    fn build(&self) -> String
    where
        Self: Sized,
    {
        let mut builder = CodeBuilder::rust();
        builder.emit(self);
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe;

    impl Renderable for Probe {
        fn to_fragments(&self) -> Vec<CodeFragment> {
            vec![CodeFragment::block(
                "fn probe() {",
                vec![CodeFragment::Line("check();".to_string())],
                Some("}".to_string()),
            )]
        }
    }

    #[test]
    fn test_build_renders_standalone() {
        assert_eq!(Probe.build(), "fn probe() {\n    check();\n}\n");
    }

    #[test]
    fn test_block_shorthand() {
        let fragment = CodeFragment::block(
            "mod search {",
            vec![CodeFragment::Line("pub struct Query;".to_string())],
            Some("}".to_string()),
        );

        assert_eq!(
            fragment,
            CodeFragment::Block {
                header: "mod search {".to_string(),
                body: vec![CodeFragment::Line("pub struct Query;".to_string())],
                close: Some("}".to_string()),
            }
        );
    }
}
