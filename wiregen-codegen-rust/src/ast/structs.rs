//! Struct declaration nodes.

use wiregen_codegen::builder::{CodeFragment, Renderable};

use super::{annotations, vis};

/// One named field of a generated struct.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    ty: String,
    doc: Option<String>,
    attrs: Vec<String>,
    is_public: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            doc: None,
            attrs: Vec::new(),
            is_public: true,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn attr(mut self, attr: impl Into<String>) -> Self {
        self.attrs.push(attr.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = annotations(self.doc.as_deref(), &[], &self.attrs);
        fragments.push(CodeFragment::Line(format!(
            "{}{}: {},",
            vis(self.is_public),
            self.name,
            self.ty
        )));
        fragments
    }
}

/// A struct with named fields.
#[derive(Debug, Clone)]
pub struct Struct {
    name: String,
    doc: Option<String>,
    derives: Vec<String>,
    attrs: Vec<String>,
    fields: Vec<Field>,
    is_public: bool,
}

impl Struct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            derives: Vec::new(),
            attrs: Vec::new(),
            fields: Vec::new(),
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

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }
}

impl Renderable for Struct {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = annotations(self.doc.as_deref(), &self.derives, &self.attrs);
        let vis = vis(self.is_public);

        if self.fields.is_empty() {
            fragments.push(CodeFragment::Line(format!("{vis}struct {} {{}}", self.name)));
        } else {
            fragments.push(CodeFragment::block(
                format!("{vis}struct {} {{", self.name),
                self.fields.iter().flat_map(Field::to_fragments).collect(),
                Some("}".to_string()),
            ));
        }

        fragments
    }
}
