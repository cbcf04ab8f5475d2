//! The conversion driver.
//!
//! Discovers schema files under a source root, runs them through parse,
//! preprocess, and link, then fans generation out per file and writes the
//! results under the output root, mirroring the source layout. Generation
//! and write failures are isolated per unit; everything earlier in the
//! pipeline aborts the run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use walkdir::WalkDir;
use wiregen_core::GeneratedFile;
use wiregen_schema::SchemaFile;

use crate::error::{Error, GenerationFailure, Result};
use crate::generation::GeneratedUnit;
use crate::language::{CodeGenerator, GenerationContext};
use crate::linker::{self, SymbolTable};
use crate::pipeline::{Warning, WorkingSet};

/// Extension a file must carry to count as a schema source.
pub const SCHEMA_EXTENSION: &str = "proto";

/// One schema file found under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Path used for reading and in error text.
    pub path: PathBuf,
    /// Path relative to the source root, mirrored into the output tree.
    pub rel: PathBuf,
}

/// Finds every schema file under `root`, sorted by relative path so a run
/// sees the same input order on every platform.
pub fn discover(root: &Path) -> Result<Vec<SourceEntry>> {
    let mut entries = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|source| {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            Error::io(path, source.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SCHEMA_EXTENSION) {
            continue;
        }
        // Walked paths always live under the walk root.
        let Ok(rel) = path.strip_prefix(root) else {
            continue;
        };
        entries.push(SourceEntry {
            path: path.to_path_buf(),
            rel: rel.to_path_buf(),
        });
    }
    entries.sort_by(|a, b| a.rel.cmp(&b.rel));
    Ok(entries)
}

/// Knobs for one conversion run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Module the generated tree is mounted under.
    pub module: String,
    /// Process files sequentially instead of fanning out across threads.
    pub no_fork: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            module: "proto".to_string(),
            no_fork: false,
        }
    }
}

/// The linked result of parse, preprocess, and link, shared by every
/// command that goes further than syntax checking.
#[derive(Debug)]
pub struct Analysis {
    /// The preprocessed schema files.
    pub files: Vec<SchemaFile>,
    /// Per-file path relative to the source root, parallel to `files`.
    pub rel_paths: Vec<PathBuf>,
    /// The global symbol table.
    pub table: SymbolTable,
    /// Warnings collected along the way.
    pub warnings: Vec<Warning>,
}

/// A run that stopped before writing.
#[derive(Debug)]
pub struct Preview {
    pub units: Vec<GeneratedUnit>,
    pub failures: Vec<GenerationFailure>,
    pub warnings: Vec<Warning>,
}

/// Summary of a completed conversion.
#[derive(Debug)]
pub struct ConvertOutcome {
    /// Paths written under the output root, in input order.
    pub written: Vec<PathBuf>,
    /// Units that failed to generate or write. The rest of the run is
    /// unaffected.
    pub failures: Vec<GenerationFailure>,
    pub warnings: Vec<Warning>,
    /// Number of schema files in the linked set.
    pub files: usize,
}

/// Drives schema files end to end for one language backend.
pub struct Converter<G> {
    generator: G,
    options: ConvertOptions,
}

impl<G: CodeGenerator + Sync> Converter<G> {
    pub fn new(generator: G, options: ConvertOptions) -> Self {
        Self { generator, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Parse, preprocess, and link everything under `src_root`.
    pub fn analyze(&self, src_root: &Path) -> Result<Analysis> {
        let entries = discover(src_root)?;
        self.analyze_entries(&entries)
    }

    /// [`analyze`](Self::analyze) over an already-discovered entry list.
    pub fn analyze_entries(&self, entries: &[SourceEntry]) -> Result<Analysis> {
        let mut files = Vec::with_capacity(entries.len());
        for entry in entries {
            tracing::debug!(path = %entry.path.display(), "parsing schema");
            files.push(wiregen_schema::parse_file(&entry.path)?);
        }

        let mut set = WorkingSet::new(files);
        set.preprocess(self.options.no_fork)?;
        let files = set.into_files();
        let rel_paths = rel_paths_for(&files, entries);

        let mut warnings = Vec::new();
        let table = linker::link(&files, &rel_paths, &mut warnings)?;
        tracing::debug!(files = files.len(), symbols = table.len(), "linked schema set");

        Ok(Analysis {
            files,
            rel_paths,
            table,
            warnings,
        })
    }

    /// Generate without writing. Returns the would-be output units.
    pub fn preview(&self, src_root: &Path) -> Result<Preview> {
        let analysis = self.analyze(src_root)?;
        let (units, failures) = self.generate_units(&analysis);
        Ok(Preview {
            units,
            failures,
            warnings: analysis.warnings,
        })
    }

    /// Full run: analyze, generate, and write under `out_root`.
    pub fn convert(&self, src_root: &Path, out_root: &Path) -> Result<ConvertOutcome> {
        let analysis = self.analyze(src_root)?;
        let (units, mut failures) = self.generate_units(&analysis);

        let mut written = Vec::with_capacity(units.len());
        for unit in &units {
            match unit.write(out_root) {
                Ok(()) => written.push(unit.path(out_root)),
                Err(report) => failures.push(GenerationFailure {
                    unit: unit.rel_path().to_path_buf(),
                    message: format!("{report:#}"),
                }),
            }
        }

        Ok(ConvertOutcome {
            written,
            failures,
            warnings: analysis.warnings,
            files: analysis.files.len(),
        })
    }

    /// Renders every file in the analysis, one unit per file. A unit that
    /// fails does not stop its siblings.
    pub fn generate_units(
        &self,
        analysis: &Analysis,
    ) -> (Vec<GeneratedUnit>, Vec<GenerationFailure>) {
        let indices: Vec<usize> = (0..analysis.files.len()).collect();
        let results: Vec<_> = if self.options.no_fork {
            indices
                .iter()
                .map(|&index| self.generate_one(index, analysis))
                .collect()
        } else {
            indices
                .par_iter()
                .map(|&index| self.generate_one(index, analysis))
                .collect()
        };

        let mut units = Vec::new();
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(unit) => units.push(unit),
                Err(failure) => failures.push(failure),
            }
        }
        (units, failures)
    }

    fn generate_one(
        &self,
        index: usize,
        analysis: &Analysis,
    ) -> std::result::Result<GeneratedUnit, GenerationFailure> {
        let out_rel = analysis.rel_paths[index].with_extension(self.generator.file_extension());
        let context = GenerationContext {
            table: &analysis.table,
            file: index,
            module: &self.options.module,
        };
        match self.generator.generate(&analysis.files[index], &context) {
            Ok(content) => Ok(GeneratedUnit::new(out_rel, content)),
            Err(report) => Err(GenerationFailure {
                unit: out_rel,
                message: format!("{report:#}"),
            }),
        }
    }
}

/// Maps each preprocessed file back to the relative path of the source it
/// came from. Passes may fan one source out into several files; they all
/// share its position in the output tree.
fn rel_paths_for(files: &[SchemaFile], entries: &[SourceEntry]) -> Vec<PathBuf> {
    let by_src: HashMap<&Path, &Path> = entries
        .iter()
        .map(|entry| (entry.path.as_path(), entry.rel.as_path()))
        .collect();
    files
        .iter()
        .map(|file| match by_src.get(file.src_path.as_path()) {
            Some(rel) => rel.to_path_buf(),
            None => file.src_path.clone(),
        })
        .collect()
}
