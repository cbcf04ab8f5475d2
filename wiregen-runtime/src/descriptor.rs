//! Descriptors linking generated types back to their schema declarations.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A generated message type.
///
/// Implementations are emitted by the generator; the constants mirror the
/// schema declaration the type was generated from.
pub trait Message: Serialize + DeserializeOwned {
    /// Fully qualified schema name, e.g. `"auth.LoginRequest"`.
    const NAME: &'static str;

    /// Field layout as declared in the schema.
    const FIELDS: &'static [FieldDescriptor];
}

/// Schema-level description of one message field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub tag: u32,
    pub kind: FieldKind,
    pub cardinality: Cardinality,
}

/// What a field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Scalar(ScalarKind),
    Message,
    Enum,
}

/// The schema scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
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

/// Field cardinality as declared in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Singular,
    Optional,
    Repeated,
}

/// Identifies one rpc on one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Fully qualified service name, e.g. `"auth.SessionService"`.
    pub service: &'static str,
    /// Method name as declared, e.g. `"Login"`.
    pub method: &'static str,
}

impl MethodDescriptor {
    /// Wire path for this method, `/<service>/<method>`.
    pub fn path(&self) -> String {
        format!("/{}/{}", self.service, self.method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_path() {
        let method = MethodDescriptor {
            service: "auth.SessionService",
            method: "Login",
        };
        assert_eq!(method.path(), "/auth.SessionService/Login");
    }
}
