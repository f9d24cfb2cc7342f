use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that abort a generation run.
///
/// Recoverable conditions never surface here: a candidate that fails to
/// resolve or an artifact that fails to write is reported as a warning,
/// tallied in the run summary, and the run continues.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing or malformed configuration. The run never starts.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// The directory backing the base module could not be walked.
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Two entities would produce the same repository artifact.
    #[error("repository name collision: `{first}` and `{second}` both produce `{target}`")]
    NameCollision {
        target: String,
        first: String,
        second: String,
    },
}

impl GenerateError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Why a fully-qualified name could not be resolved to a type declaration.
///
/// Resolution failures are recoverable at the scanning boundary: the
/// offending candidate is skipped with a warning and the walk continues.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The module file exists but declares no matching type.
    #[error("no type named `{name}` is declared in {path}")]
    SymbolNotFound { name: String, path: PathBuf },

    /// The module segments map to no source file.
    #[error("no source file backs the module path of `{name}`")]
    ModuleNotFound { name: String },

    /// The module file could not be read.
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The module file is not parsable Rust.
    #[error("failed to parse {path}: {source}")]
    Unparsable {
        path: PathBuf,
        #[source]
        source: syn::Error,
    },
}

/// Failure to persist a single artifact. Recoverable: the run keeps going
/// with the remaining entities and tallies the failure in the summary.
#[derive(Debug, Error)]
#[error("failed to write {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}
