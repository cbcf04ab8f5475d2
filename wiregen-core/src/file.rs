use std::path::{Path, PathBuf};

use eyre::{Context, Result};

/// One output file of a conversion run.
///
/// Implementors know where they land relative to the destination root and
/// how to render themselves; `write` handles the disk side, including
/// parent directories for mirrored schema layouts.
pub trait GeneratedFile {
    /// Path of this file under `base`.
    fn path(&self, base: &Path) -> PathBuf;

    /// Render the file content.
    fn render(&self) -> String;

    /// Write the file under `base`, replacing any previous output.
    fn write(&self, base: &Path) -> Result<()> {
        write_file(&self.path(base), &self.render())
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(path, content).wrap_err_with(|| format!("failed to write {}", path.display()))
}
