//! Error types for diagram extraction and rewriting.

use std::path::PathBuf;

/// Error raised while reading or writing documents and artifacts.
#[derive(Debug, thiserror::Error)]
pub enum DiagramError {
    /// Filesystem operation failed.
    #[error("{}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Image listing pattern could not be built.
    #[error("invalid image pattern: {0}")]
    Glob(#[from] glob::PatternError),
}

impl DiagramError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
