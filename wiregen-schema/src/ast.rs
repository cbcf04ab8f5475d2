//! The schema AST.
//!
//! Every node is plain owned data. Transformations never mutate a file in
//! place; they build a new [`SchemaFile`] and replace the old one.

use std::path::PathBuf;

/// One parsed schema file.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFile {
    /// Path the file was read from.
    pub src_path: PathBuf,
    /// Dotted package name, if the file declares one.
    pub package: Option<String>,
    /// Plain (private) import paths, as written in the source.
    pub imports: Vec<String>,
    /// `import public` paths; these re-export the imported file's symbols.
    pub public_imports: Vec<String>,
    /// Top-level declarations in source order.
    pub decls: Vec<Decl>,
}

impl SchemaFile {
    /// Top-level message declarations, in source order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Message(message) => Some(message),
            _ => None,
        })
    }

    /// Top-level enum declarations, in source order.
    pub fn enums(&self) -> impl Iterator<Item = &EnumDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Enum(decl) => Some(decl),
            _ => None,
        })
    }

    /// Service declarations, in source order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceDecl> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Service(service) => Some(service),
            _ => None,
        })
    }

    /// Qualify a local declaration name with this file's package.
    pub fn qualify(&self, local: &str) -> String {
        match &self.package {
            Some(package) => format!("{package}.{local}"),
            None => local.to_string(),
        }
    }
}

/// A top-level declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Message(MessageDecl),
    Enum(EnumDecl),
    Service(ServiceDecl),
}

impl Decl {
    /// The declared name.
    pub fn name(&self) -> &str {
        match self {
            Decl::Message(message) => &message.name,
            Decl::Enum(decl) => &decl.name,
            Decl::Service(service) => &service.name,
        }
    }
}

/// A message declaration, possibly with nested types.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    /// Nested messages; empty once the flattening pass has run.
    pub messages: Vec<MessageDecl>,
    /// Nested enums; empty once the flattening pass has run.
    pub enums: Vec<EnumDecl>,
}

impl MessageDecl {
    /// Whether this message still contains nested type declarations.
    pub fn has_nested(&self) -> bool {
        !self.messages.is_empty() || !self.enums.is_empty()
    }
}

/// A single message field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    pub tag: u32,
    pub cardinality: Cardinality,
}

/// Field cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// No label. Scalar fields are always present; message fields may be absent.
    Singular,
    /// Explicit `optional` label.
    Optional,
    /// `repeated` label.
    Repeated,
}

/// An enum declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<EnumValue>,
}

/// One enum value.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub number: i32,
}

/// A service declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDecl {
    pub name: String,
    pub rpcs: Vec<RpcDecl>,
}

/// One unary rpc.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcDecl {
    pub name: String,
    pub request: TypeRef,
    pub response: TypeRef,
}

/// A type reference as written in a field or rpc.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    /// A built-in scalar type.
    Scalar(ScalarType),
    /// A reference to a message or enum, possibly dot-qualified.
    Named(String),
}

impl TypeRef {
    /// The referenced name, if this is not a scalar.
    pub fn as_named(&self) -> Option<&str> {
        match self {
            TypeRef::Named(name) => Some(name),
            TypeRef::Scalar(_) => None,
        }
    }
}

/// The built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarType {
    Double,
    Float,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Bool,
    String,
    Bytes,
}

impl ScalarType {
    /// Classify a bare type name, if it names a scalar.
    pub fn parse(name: &str) -> Option<Self> {
        let scalar = match name {
            "double" => ScalarType::Double,
            "float" => ScalarType::Float,
            "int32" => ScalarType::Int32,
            "int64" => ScalarType::Int64,
            "uint32" => ScalarType::Uint32,
            "uint64" => ScalarType::Uint64,
            "sint32" => ScalarType::Sint32,
            "sint64" => ScalarType::Sint64,
            "fixed32" => ScalarType::Fixed32,
            "fixed64" => ScalarType::Fixed64,
            "sfixed32" => ScalarType::Sfixed32,
            "sfixed64" => ScalarType::Sfixed64,
            "bool" => ScalarType::Bool,
            "string" => ScalarType::String,
            "bytes" => ScalarType::Bytes,
            _ => return None,
        };
        Some(scalar)
    }

    /// The schema-language spelling.
    pub fn proto_name(&self) -> &'static str {
        match self {
            ScalarType::Double => "double",
            ScalarType::Float => "float",
            ScalarType::Int32 => "int32",
            ScalarType::Int64 => "int64",
            ScalarType::Uint32 => "uint32",
            ScalarType::Uint64 => "uint64",
            ScalarType::Sint32 => "sint32",
            ScalarType::Sint64 => "sint64",
            ScalarType::Fixed32 => "fixed32",
            ScalarType::Fixed64 => "fixed64",
            ScalarType::Sfixed32 => "sfixed32",
            ScalarType::Sfixed64 => "sfixed64",
            ScalarType::Bool => "bool",
            ScalarType::String => "string",
            ScalarType::Bytes => "bytes",
        }
    }
}

/// Split a dotted reference into qualifier and local symbol.
///
/// The split is on the last literal `'.'`, so multi-segment packages stay
/// intact: `"a.b.Foo"` splits into `(Some("a.b"), "Foo")`, while an
/// unqualified `"Foo"` yields `(None, "Foo")`.
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.rsplit_once('.') {
        Some((qualifier, symbol)) => (Some(qualifier), symbol),
        None => (None, name),
    }
}
