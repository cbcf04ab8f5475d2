//! Generate command report data structures.

use std::path::PathBuf;

use super::output::{Output, Report};

/// Report data from one generation run.
#[derive(Debug)]
pub struct GenerateReport {
    /// One line per unit that could not be produced. The rest of the
    /// run is written regardless.
    pub failures: Vec<String>,

    /// Generation result (files written or preview).
    pub result: GenerationResult,
}

/// Result of code generation.
#[derive(Debug)]
pub enum GenerationResult {
    /// Files were written to disk.
    Written(WrittenResult),
    /// Dry-run preview.
    Preview(PreviewResult),
}

/// Result when files were written to disk.
#[derive(Debug)]
pub struct WrittenResult {
    /// Output directory.
    pub out_root: PathBuf,
    /// Module the generated tree is mounted under.
    pub module: String,
    /// Number of schema files in the linked set.
    pub schema_files: usize,
    /// Paths written, relative to the output root.
    pub written: Vec<PathBuf>,
}

/// Result of a dry-run preview.
#[derive(Debug)]
pub struct PreviewResult {
    /// Units that would be generated.
    pub units: Vec<PreviewUnit>,
}

/// A unit in preview mode.
#[derive(Debug)]
pub struct PreviewUnit {
    /// Path relative to the output root.
    pub path: String,
    /// Rendered source text.
    pub content: String,
}

impl GenerateReport {
    /// Whether every unit was produced.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl Report for GenerateReport {
    fn render(&self, out: &mut dyn Output) {
        match &self.result {
            GenerationResult::Written(written) => self.render_written(out, written),
            GenerationResult::Preview(preview) => self.render_preview(out, preview),
        }
        self.render_failures(out);
    }
}

impl GenerateReport {
    fn render_written(&self, out: &mut dyn Output, written: &WrittenResult) {
        out.section(&format!("Generated ({})", written.written.len()));
        for path in &written.written {
            out.added_item(&path.display().to_string());
        }
        out.newline();

        out.key_value("Schema files", &written.schema_files.to_string());
        out.key_value("Module", &written.module);
        out.key_value("Output root", &written.out_root.display().to_string());
    }

    fn render_preview(&self, out: &mut dyn Output, preview: &PreviewResult) {
        for unit in &preview.units {
            out.divider(&unit.path);
            out.preformatted(&unit.content);
        }

        out.divider("Summary");
        let n = preview.units.len();
        out.preformatted(&format!(
            "{} unit{} would be generated",
            n,
            if n == 1 { "" } else { "s" }
        ));
    }

    fn render_failures(&self, out: &mut dyn Output) {
        if self.failures.is_empty() {
            return;
        }
        out.newline();
        out.section("Failed");
        for failure in &self.failures {
            out.list_item(failure);
        }
    }
}
