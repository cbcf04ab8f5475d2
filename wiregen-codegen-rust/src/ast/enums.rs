//! Enum declaration nodes.

use wiregen_codegen::builder::{CodeFragment, Renderable};

use super::{annotations, vis};

/// One variant of a generated enum.
#[derive(Debug, Clone)]
pub struct Variant {
    name: String,
    doc: Option<String>,
    discriminant: Option<i32>,
    attrs: Vec<String>,
}

impl Variant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            discriminant: None,
            attrs: Vec::new(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Set an explicit discriminant, e.g. `Active = 1`.
    pub fn discriminant(mut self, value: i32) -> Self {
        self.discriminant = Some(value);
        self
    }

    /// Add an attribute to the variant, e.g. `default`.
    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = annotations(self.doc.as_deref(), &[], &self.attrs);
        let line = match self.discriminant {
            Some(value) => format!("{} = {},", self.name, value),
            None => format!("{},", self.name),
        };
        fragments.push(CodeFragment::Line(line));
        fragments
    }
}

/// A fieldless enum, optionally with explicit discriminants.
#[derive(Debug, Clone)]
pub struct Enum {
    name: String,
    doc: Option<String>,
    derives: Vec<String>,
    attrs: Vec<String>,
    variants: Vec<Variant>,
    is_public: bool,
}

impl Enum {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            derives: Vec::new(),
            attrs: Vec::new(),
            variants: Vec::new(),
            is_public: true,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn derive(mut self, derive: impl Into<String>) -> Self {
        self.derives.push(derive.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    pub fn variant(mut self, variant: Variant) -> Self {
        self.variants.push(variant);
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }
}

impl Renderable for Enum {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = annotations(self.doc.as_deref(), &self.derives, &self.attrs);
        let vis = vis(self.is_public);

        if self.variants.is_empty() {
            fragments.push(CodeFragment::Line(format!("{vis}enum {} {{}}", self.name)));
        } else {
            fragments.push(CodeFragment::block(
                format!("{vis}enum {} {{", self.name),
                self.variants
                    .iter()
                    .flat_map(Variant::to_fragments)
                    .collect(),
                Some("}".to_string()),
            ));
        }

        fragments
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variantless_enum_closes_on_one_line() {
        let e = Enum::new("Unreached").build();
        assert_eq!(e, "pub enum Unreached {}\n");
    }

    #[test]
    fn test_enum_with_discriminants() {
        let e = Enum::new("Status")
            .derive("Clone")
            .derive("Copy")
            .variant(Variant::new("Unknown").discriminant(0).attr("default"))
            .variant(Variant::new("Active").discriminant(1))
            .build();
        assert!(e.contains("#[derive(Clone, Copy)]"));
        assert!(e.contains("pub enum Status {"));
        assert!(e.contains("#[default]"));
        assert!(e.contains("Unknown = 0,"));
        assert!(e.contains("Active = 1,"));
    }

    #[test]
    fn test_variant_with_doc() {
        let e = Enum::new("Mode")
            .variant(Variant::new("Quiet").doc("Suppress progress output."))
            .build();
        assert!(e.contains("/// Suppress progress output."));
        assert!(e.contains("Quiet,"));
    }

    #[test]
    fn test_negative_discriminant() {
        let e = Enum::new("Level")
            .variant(Variant::new("Below").discriminant(-1))
            .build();
        assert!(e.contains("Below = -1,"));
    }
}
