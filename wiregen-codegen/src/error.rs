use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::linker::SymbolKind;

/// Result alias for conversion operations. The error is boxed; the
/// preprocess and link variants carry whole-set reports.
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    /// A schema file failed to parse. Aborts the run.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] wiregen_schema::Error),

    /// One or more files failed during preprocessing. The failing pass is
    /// run to completion over the remaining files first, so the report
    /// covers every broken file in the set.
    #[error("{0}")]
    #[diagnostic(code(wiregen::preprocess_error))]
    Preprocess(PreprocessReport),

    /// Symbol registration or reference resolution failed.
    #[error("{0}")]
    #[diagnostic(
        code(wiregen::link_error),
        help("every referenced type must be declared in the input set, in the file's own package or a file it imports")
    )]
    Link(LinkReport),

    #[error("cannot read '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Failed read of an input path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Box<Self> {
        Box::new(Error::Io {
            path: path.into(),
            source,
        })
    }
}

impl From<Box<wiregen_schema::Error>> for Box<Error> {
    fn from(source: Box<wiregen_schema::Error>) -> Self {
        Box::new(Error::Parse(*source))
    }
}

/// One file that a preprocessing pass failed on.
#[derive(Debug, Clone)]
pub struct PassFailure {
    pub file: PathBuf,
    pub pass: &'static str,
    pub message: String,
}

/// One output unit that failed to generate or write.
///
/// Generation failures do not abort a run; the other units still land, and
/// the failures travel in the run's outcome.
#[derive(Debug, Clone)]
pub struct GenerationFailure {
    /// Output path relative to the output root.
    pub unit: PathBuf,
    pub message: String,
}

impl fmt::Display for GenerationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to generate '{}': {}",
            self.unit.display(),
            self.message
        )
    }
}

/// Aggregate of every per-file failure from one preprocessing pass.
#[derive(Debug, Clone)]
pub struct PreprocessReport {
    pub failures: Vec<PassFailure>,
}

impl fmt::Display for PreprocessReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "preprocessing failed for {} file(s):",
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(
                f,
                "  {}: {}: {}",
                failure.file.display(),
                failure.pass,
                failure.message
            )?;
        }
        Ok(())
    }
}

/// A type reference that did not resolve to any visible declaration.
#[derive(Debug, Clone)]
pub struct UnresolvedRef {
    /// The file containing the reference.
    pub file: PathBuf,
    /// Where in the file the reference appears, e.g. `message 'User', field 'address'`.
    pub declaration: String,
    /// The reference as written.
    pub symbol: String,
}

/// Two declarations claiming the same fully qualified name.
#[derive(Debug, Clone)]
pub struct DuplicateSymbol {
    pub name: String,
    pub first: PathBuf,
    pub second: PathBuf,
}

/// A reference that resolved to a declaration of the wrong kind, e.g. an
/// rpc request naming an enum.
#[derive(Debug, Clone)]
pub struct KindMismatch {
    pub file: PathBuf,
    pub declaration: String,
    pub symbol: String,
    /// What the reference actually resolved to.
    pub kind: SymbolKind,
    /// What the reference site accepts, e.g. `a message type`.
    pub expected: &'static str,
}

/// Everything that went wrong during linking, reported in one shot.
#[derive(Debug, Clone, Default)]
pub struct LinkReport {
    pub duplicates: Vec<DuplicateSymbol>,
    pub unresolved: Vec<UnresolvedRef>,
    pub mismatched: Vec<KindMismatch>,
}

impl LinkReport {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty() && self.unresolved.is_empty() && self.mismatched.is_empty()
    }

    /// Total number of link errors in this report.
    pub fn len(&self) -> usize {
        self.duplicates.len() + self.unresolved.len() + self.mismatched.len()
    }
}

impl fmt::Display for LinkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "linking failed with {} error(s):", self.len())?;
        for duplicate in &self.duplicates {
            writeln!(
                f,
                "  duplicate symbol '{}': declared in both '{}' and '{}'",
                duplicate.name,
                duplicate.first.display(),
                duplicate.second.display()
            )?;
        }
        for unresolved in &self.unresolved {
            writeln!(
                f,
                "  unresolved type '{}': referenced by {} in '{}'",
                unresolved.symbol,
                unresolved.declaration,
                unresolved.file.display()
            )?;
        }
        for mismatch in &self.mismatched {
            writeln!(
                f,
                "  '{}' resolves to a {} but {} in '{}' expects {}",
                mismatch.symbol,
                mismatch.kind,
                mismatch.declaration,
                mismatch.file.display(),
                mismatch.expected
            )?;
        }
        Ok(())
    }
}
