use std::path::{Path, PathBuf};

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result alias for schema loading and parsing. The error is boxed; the
/// variants carry full source text for miette rendering and would otherwise
/// dominate every return value.
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// The schema text and name an error points into.
///
/// The lexer and parser hold one of these and mint errors through it, so
/// every error carries the snippet miette needs without the call sites
/// threading text and filename around.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    text: String,
    name: String,
}

impl SchemaSource {
    pub fn new(text: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            name: name.into(),
        }
    }

    fn snippet(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.text.clone())
    }

    /// Malformed schema text.
    pub fn syntax_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Syntax {
            input: self.snippet(),
            span,
            message: message.into(),
        })
    }

    /// Well-formed input using a construct outside the supported subset.
    pub fn unsupported(
        &self,
        construct: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Unsupported {
            input: self.snippet(),
            span,
            construct: construct.into(),
        })
    }

    /// A field tag outside the valid range or inside the reserved range.
    pub fn invalid_tag(
        &self,
        value: impl Into<String>,
        reason: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::InvalidTag {
            input: self.snippet(),
            span,
            value: value.into(),
            reason: reason.into(),
        })
    }

    /// A declaration that parses but breaks a schema rule, such as a
    /// duplicate tag or a nonzero first enum value.
    pub fn semantic_error(
        &self,
        message: impl Into<String>,
        span: Option<SourceSpan>,
    ) -> Box<Error> {
        Box::new(Error::Semantics {
            input: self.snippet(),
            span,
            message: message.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("{message}")]
    #[diagnostic(code(wiregen::syntax_error))]
    Syntax {
        #[source_code]
        input: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("{construct} is not supported")]
    #[diagnostic(
        code(wiregen::unsupported),
        help("wiregen converts the proto3 subset: messages, enums, and unary rpcs")
    )]
    Unsupported {
        #[source_code]
        input: NamedSource<String>,
        #[label("declared here")]
        span: Option<SourceSpan>,
        construct: String,
    },

    #[error("invalid field tag '{value}'")]
    #[diagnostic(
        code(wiregen::invalid_tag),
        help("field tags are integers in 1..=536870911, excluding the reserved range 19000..=19999")
    )]
    InvalidTag {
        #[source_code]
        input: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        value: String,
        reason: String,
    },

    #[error("{message}")]
    #[diagnostic(code(wiregen::semantic_error))]
    Semantics {
        #[source_code]
        input: NamedSource<String>,
        #[label("{message}")]
        span: Option<SourceSpan>,
        message: String,
    },

    #[error("cannot read schema '{path}'")]
    #[diagnostic(
        code(wiregen::io),
        help("check that the schema path exists and is readable")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Failed read of a schema path.
    pub fn io(path: &Path, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
