//! Indentation-aware writer that turns fragment trees into source text.

use super::{CodeFragment, Indent, Renderable};

/// Writes [`CodeFragment`]s as indented lines of source text.
///
/// The writer tracks a single piece of state, the current depth. Structure
/// arrives as fragments; there is no way to leave a block half open.
///
/// # Example
///
/// ```
/// use wiregen_codegen::builder::{CodeBuilder, CodeFragment};
///
/// let mut builder = CodeBuilder::rust();
/// builder.fragment(CodeFragment::block(
///     "impl Point {",
///     vec![CodeFragment::Line("fn x(&self) -> i32 { self.x }".to_string())],
///     Some("}".to_string()),
/// ));
/// assert_eq!(
///     builder.build(),
///     "impl Point {\n    fn x(&self) -> i32 { self.x }\n}\n"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct CodeBuilder {
    depth: usize,
    indent: Indent,
    out: String,
}

impl CodeBuilder {
    pub fn new(indent: Indent) -> Self {
        Self {
            depth: 0,
            indent,
            out: String::new(),
        }
    }

    /// A writer with Rust's four-space indentation.
    pub fn rust() -> Self {
        Self::new(Indent::RUST)
    }

    /// Write every fragment of a declaration node.
    pub fn emit(&mut self, node: &impl Renderable) -> &mut Self {
        for fragment in node.to_fragments() {
            self.fragment(fragment);
        }
        self
    }

    /// Write one fragment at the current depth.
    pub fn fragment(&mut self, fragment: CodeFragment) -> &mut Self {
        match fragment {
            CodeFragment::Line(text) => self.line(&text),
            CodeFragment::Blank => self.out.push('\n'),
            CodeFragment::RustDoc(text) => self.line(&format!("/// {text}")),
            CodeFragment::Block {
                header,
                body,
                close,
            } => {
                self.line(&header);
                self.depth += 1;
                for inner in body {
                    self.fragment(inner);
                }
                self.depth -= 1;
                if let Some(close) = close {
                    self.line(&close);
                }
            }
        }
        self
    }

    /// Write one separator line. Blank lines carry no indentation.
    pub fn blank(&mut self) -> &mut Self {
        self.out.push('\n');
        self
    }

    /// The accumulated source text.
    pub fn build(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.out.push_str(self.indent.as_str());
        }
        self.out.push_str(text);
        self.out.push('\n');
    }
}
