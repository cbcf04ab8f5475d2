//! The output of code generation for one schema file.

use std::path::{Path, PathBuf};

use wiregen_core::GeneratedFile;

/// One rendered output file, addressed relative to the output root.
///
/// The relative path mirrors the schema file the unit came from, so
/// `a/user.proto` produces `a/user.rs` no matter where the output root is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    rel_path: PathBuf,
    content: String,
}

impl GeneratedUnit {
    pub fn new(rel_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            rel_path: rel_path.into(),
            content: content.into(),
        }
    }

    /// Path relative to the output root.
    pub fn rel_path(&self) -> &Path {
        &self.rel_path
    }

    /// The rendered source text.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl GeneratedFile for GeneratedUnit {
    fn path(&self, base: &Path) -> PathBuf {
        base.join(&self.rel_path)
    }

    fn render(&self) -> String {
        self.content.clone()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_path_joins_output_root() {
        let unit = GeneratedUnit::new("a/user.rs", "pub struct User;\n");
        assert_eq!(
            unit.path(Path::new("/out")),
            PathBuf::from("/out/a/user.rs")
        );
    }

    #[test]
    fn test_write_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let unit = GeneratedUnit::new("nested/deep/user.rs", "pub struct User;\n");
        unit.write(dir.path()).unwrap();
        let written = std::fs::read_to_string(dir.path().join("nested/deep/user.rs")).unwrap();
        assert_eq!(written, "pub struct User;\n");
    }

    #[test]
    fn test_write_overwrites_existing_output() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("user.rs"), "stale").unwrap();
        let unit = GeneratedUnit::new("user.rs", "fresh\n");
        unit.write(dir.path()).unwrap();
        let written = std::fs::read_to_string(dir.path().join("user.rs")).unwrap();
        assert_eq!(written, "fresh\n");
    }
}
