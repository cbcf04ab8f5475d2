//! Rust type mapper for schema scalar types.

use wiregen_schema::ScalarType;

/// Maps schema scalar types to Rust type syntax.
///
/// Variable-width and fixed-width encodings of the same integer width
/// map to the same Rust type; the distinction only matters on the wire
/// and is preserved in the generated field descriptors.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTypeMapper;

impl RustTypeMapper {
    /// The Rust type a field of this scalar type holds.
    pub fn scalar(&self, scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::Double => "f64",
            ScalarType::Float => "f32",
            ScalarType::Int32 | ScalarType::Sint32 | ScalarType::Sfixed32 => "i32",
            ScalarType::Int64 | ScalarType::Sint64 | ScalarType::Sfixed64 => "i64",
            ScalarType::Uint32 | ScalarType::Fixed32 => "u32",
            ScalarType::Uint64 | ScalarType::Fixed64 => "u64",
            ScalarType::Bool => "bool",
            ScalarType::String => "String",
            ScalarType::Bytes => "Vec<u8>",
        }
    }

    /// The `ScalarKind` variant named in generated field descriptors.
    pub fn scalar_kind(&self, scalar: ScalarType) -> &'static str {
        match scalar {
            ScalarType::Double => "Double",
            ScalarType::Float => "Float",
            ScalarType::Int32 => "Int32",
            ScalarType::Int64 => "Int64",
            ScalarType::Uint32 => "Uint32",
            ScalarType::Uint64 => "Uint64",
            ScalarType::Sint32 => "Sint32",
            ScalarType::Sint64 => "Sint64",
            ScalarType::Fixed32 => "Fixed32",
            ScalarType::Fixed64 => "Fixed64",
            ScalarType::Sfixed32 => "Sfixed32",
            ScalarType::Sfixed64 => "Sfixed64",
            ScalarType::Bool => "Bool",
            ScalarType::String => "String",
            ScalarType::Bytes => "Bytes",
        }
    }

    pub fn optional(&self, inner: &str) -> String {
        format!("Option<{}>", inner)
    }

    pub fn repeated(&self, inner: &str) -> String {
        format!("Vec<{}>", inner)
    }
}
