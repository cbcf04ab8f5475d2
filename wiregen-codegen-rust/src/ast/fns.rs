//! Function and match-expression declaration nodes.

use wiregen_codegen::builder::{CodeFragment, Renderable};

use super::{annotations, vis};

/// A parameter in a function signature.
///
/// A receiver such as `&mut self` is written as a parameter with an
/// empty type.
#[derive(Debug, Clone)]
pub struct Param {
    name: String,
    ty: String,
}

impl Param {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    fn format(&self) -> String {
        if self.ty.is_empty() {
            self.name.clone()
        } else {
            format!("{}: {}", self.name, self.ty)
        }
    }
}

/// A free function or method.
#[derive(Debug, Clone)]
pub struct Fn {
    name: String,
    doc: Option<String>,
    attrs: Vec<String>,
    generics: Option<String>,
    is_public: bool,
    params: Vec<Param>,
    return_type: Option<String>,
    body: Vec<CodeFragment>,
}

impl Fn {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            attrs: Vec::new(),
            generics: None,
            is_public: true,
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
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

    /// Set the generic parameter list, e.g. `C: Channel`.
    pub fn generics(mut self, generics: impl Into<String>) -> Self {
        self.generics = Some(generics.into());
        self
    }

    pub fn private(mut self) -> Self {
        self.is_public = false;
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    /// Add a line to the function body.
    pub fn body_line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::Line(line.into()));
        self
    }

    /// Add any renderable node to the function body.
    pub fn body_node<R: Renderable>(mut self, node: R) -> Self {
        self.body.extend(node.to_fragments());
        self
    }

    /// Format the signature up to the opening brace.
    fn signature(&self) -> String {
        let generics = match &self.generics {
            Some(generics) => format!("<{generics}>"),
            None => String::new(),
        };
        let params = self
            .params
            .iter()
            .map(Param::format)
            .collect::<Vec<_>>()
            .join(", ");
        let head = format!("{}fn {}{}({})", vis(self.is_public), self.name, generics, params);
        match &self.return_type {
            Some(ret) => format!("{head} -> {ret} {{"),
            None => format!("{head} {{"),
        }
    }

    /// Format the signature as a trait-method declaration, ending in `;`.
    pub fn declaration(&self) -> String {
        let signature = self.signature();
        let stripped = signature.trim_end_matches(" {");
        format!("{stripped};")
    }
}

impl Renderable for Fn {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        let mut fragments = annotations(self.doc.as_deref(), &[], &self.attrs);
        fragments.push(CodeFragment::block(
            self.signature(),
            self.body.clone(),
            Some("}".to_string()),
        ));
        fragments
    }
}

/// One arm of a match expression.
///
/// An arm with a single line body renders as `pattern => expr,`; anything
/// longer renders as a block arm.
#[derive(Debug, Clone)]
pub struct Arm {
    pattern: String,
    body: Vec<CodeFragment>,
}

impl Arm {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            body: Vec::new(),
        }
    }

    /// Add a line to the arm body.
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.body.push(CodeFragment::Line(line.into()));
        self
    }

    /// Add a raw fragment to the arm body.
    pub fn fragment(mut self, fragment: CodeFragment) -> Self {
        self.body.push(fragment);
        self
    }

    fn to_fragments(&self) -> Vec<CodeFragment> {
        if let [CodeFragment::Line(expr)] = self.body.as_slice() {
            return vec![CodeFragment::Line(format!("{} => {},", self.pattern, expr))];
        }
        vec![CodeFragment::block(
            format!("{} => {{", self.pattern),
            self.body.clone(),
            Some("}".to_string()),
        )]
    }
}

/// A match expression.
#[derive(Debug, Clone)]
pub struct Match {
    scrutinee: String,
    arms: Vec<Arm>,
}

impl Match {
    pub fn new(scrutinee: impl Into<String>) -> Self {
        Self {
            scrutinee: scrutinee.into(),
            arms: Vec::new(),
        }
    }

    pub fn arm(mut self, arm: Arm) -> Self {
        self.arms.push(arm);
        self
    }
}

impl Renderable for Match {
    fn to_fragments(&self) -> Vec<CodeFragment> {
        vec![CodeFragment::block(
            format!("match {} {{", self.scrutinee),
            self.arms.iter().flat_map(Arm::to_fragments).collect(),
            Some("}".to_string()),
        )]
    }
}
