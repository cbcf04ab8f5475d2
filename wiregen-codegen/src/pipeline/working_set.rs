//! The set of schema files moving through the pipeline.

use rayon::prelude::*;
use wiregen_schema::SchemaFile;

use super::pass::{PASSES, Pass};
use crate::error::{Error, PreprocessReport, Result};

/// All schema files for one run, in load order.
///
/// Passes transform the set in place. Output files inherit the position of
/// the file they came from, so the set order is stable across runs no matter
/// how the work was scheduled.
#[derive(Debug, Clone)]
pub struct WorkingSet {
    files: Vec<SchemaFile>,
}

impl WorkingSet {
    pub fn new(files: Vec<SchemaFile>) -> Self {
        WorkingSet { files }
    }

    pub fn files(&self) -> &[SchemaFile] {
        &self.files
    }

    pub fn into_files(self) -> Vec<SchemaFile> {
        self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Runs the full pass list in order, fanning each pass out across the
    /// set. A failing pass still visits every file, so the error reports all
    /// broken files at once before the run stops.
    pub fn preprocess(&mut self, no_fork: bool) -> Result<()> {
        for pass in PASSES {
            tracing::debug!(pass = %pass, files = self.len(), "running preprocessing pass");
            self.apply(*pass, no_fork)?;
        }
        Ok(())
    }

    /// Applies one pass to every file in the set.
    pub fn apply(&mut self, pass: Pass, no_fork: bool) -> Result<()> {
        let results: Vec<_> = if no_fork {
            self.files.iter().map(|file| pass.run(file)).collect()
        } else {
            self.files.par_iter().map(|file| pass.run(file)).collect()
        };

        let mut next = Vec::with_capacity(self.files.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(files) => next.extend(files),
                Err(failure) => failures.push(failure),
            }
        }
        if !failures.is_empty() {
            return Err(Box::new(Error::Preprocess(PreprocessReport { failures })));
        }
        self.files = next;
        Ok(())
    }
}
