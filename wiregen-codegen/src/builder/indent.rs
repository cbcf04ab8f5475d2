//! Indentation unit for generated output.

/// The string written once per nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indent(&'static str);

impl Indent {
    /// Four spaces, matching rustfmt output.
    pub const RUST: Self = Self("    ");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}
