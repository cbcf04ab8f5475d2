//! Impl block declaration nodes.

use wiregen_codegen::builder::{CodeFragment, Renderable};

use super::Fn;

/// An associated constant with a single-line value.
#[derive(Debug, Clone)]
pub struct Const {
    name: String,
    ty: String,
    value: String,
}

impl Const {
    pub fn new(
        name: impl Into<String>,
        ty: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            value: value.into(),
        }
    }

    fn format(&self) -> String {
        format!("const {}: {} = {};", self.name, self.ty, self.value)
    }
}

/// An inherent or trait impl block.
#[derive(Debug, Clone)]
pub struct Impl {
    type_name: String,
    generics: Option<String>,
    trait_name: Option<String>,
    consts: Vec<Const>,
    methods: Vec<Fn>,
}

impl Impl {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            generics: None,
            trait_name: None,
            consts: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Set the generic parameter list, e.g. `C: Channel`.
    pub fn generics(mut self, generics: impl Into<String>) -> Self {
        self.generics = Some(generics.into());
        self
    }

    /// Make this a trait impl, `impl Trait for Type`.
    pub fn for_trait(mut self, trait_name: impl Into<String>) -> Self {
        self.trait_name = Some(trait_name.into());
        self
    }

    pub fn assoc_const(mut self, constant: Const) -> Self {
        self.consts.push(constant);
        self
    }

    pub fn method(mut self, method: Fn) -> Self {
        self.methods.push(method);
        self
    }

    fn format_header(&self) -> String {
        let generics = match &self.generics {
            Some(generics) => format!("<{generics}>"),
            None => String::new(),
        };
        match &self.trait_name {
            Some(trait_name) => format!(
                "impl{} {} for {} {{",
                generics, trait_name, self.type_name
            ),
            None => format!("impl{} {} {{", generics, self.type_name),
        }
    }

    fn body_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = Vec::new();
        for constant in &self.consts {
            fragments.push(CodeFragment::Line(constant.format()));
        }
        for method in &self.methods {
            // Consts sit together; methods get a blank line above each.
            if !fragments.is_empty() {
                fragments.push(CodeFragment::Blank);
            }
            fragments.extend(method.to_fragments());
        }
        fragments
    }
}

impl Renderable for Impl {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::block(
            self.format_header(),
            self.body_fragments(),
            Some("}".to_string()),
        )]
    }
}
