//! Assembles one generated Rust source file.
//!
//! A [`RustFile`] keeps `use` statements and body items apart so the
//! generator can append either in any order, then renders them in the
//! layout rustfmt would produce: imports first, one blank line, then the
//! body items separated by blank lines.

use wiregen_codegen::builder::{CodeBuilder, CodeFragment, Renderable};

/// A `use` statement under construction.
#[derive(Debug, Clone)]
pub struct Use {
    module: String,
    symbols: Vec<String>,
}

impl Use {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            symbols: Vec::new(),
        }
    }

    /// Import one symbol from the module.
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbols.push(symbol.into());
        self
    }

    /// Import several symbols from the module.
    pub fn symbols(mut self, symbols: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.symbols.extend(symbols.into_iter().map(Into::into));
        self
    }

    fn format(&self) -> String {
        match self.symbols.as_slice() {
            [] => format!("use {};", self.module),
            [symbol] => format!("use {}::{};", self.module, symbol),
            symbols => format!("use {}::{{{}}};", self.module, symbols.join(", ")),
        }
    }
}

impl Renderable for Use {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::Line(self.format())]
    }
}

/// One output file's worth of imports and declarations.
///
/// # Example
///
/// ```ignore
/// let file = RustFile::new()
///     .use_stmt(Use::new("serde").symbols(["Deserialize", "Serialize"]))
///     .add(message_struct)
///     .add(message_impl)
///     .render();
/// ```
#[derive(Default)]
pub struct RustFile {
    uses: Vec<Use>,
    body: Vec<Vec<CodeFragment>>,
}

impl RustFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a use statement to the import block.
    pub fn use_stmt(mut self, use_stmt: Use) -> Self {
        self.uses.push(use_stmt);
        self
    }

    /// Append a declaration node to the body.
    #[allow(clippy::should_implement_trait)]
    pub fn add<R: Renderable>(mut self, node: R) -> Self {
        self.body.push(node.to_fragments());
        self
    }

    /// Append an already-rendered fragment tree to the body.
    pub fn add_fragments(mut self, fragments: Vec<CodeFragment>) -> Self {
        self.body.push(fragments);
        self
    }

    /// Render imports, a separating blank line, and the body items.
    pub fn render(&self) -> String {
        let mut builder = CodeBuilder::rust();

        for use_stmt in &self.uses {
            builder.emit(use_stmt);
        }
        for (i, fragments) in self.body.iter().enumerate() {
            // Body items are separated from the imports and each other.
            if i > 0 || !self.uses.is_empty() {
                builder.blank();
            }
            for fragment in fragments {
                builder.fragment(fragment.clone());
            }
        }

        builder.build()
    }

    /// [`render`](Self::render) with a comment line prepended.
    pub fn render_with_header(&self, header: &str) -> String {
        let content = self.render();
        if content.is_empty() {
            format!("{}\n", header)
        } else {
            format!("{}\n\n{}", header, content)
        }
    }
}
