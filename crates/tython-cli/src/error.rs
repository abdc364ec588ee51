//! `TythonError`: the unified error type the CLI driver collects per file
//! (spec.md §7's ParseError/TransformError/IOError/ConfigError taxonomy),
//! carrying `{file, line, col, message}` where the underlying error has a
//! location.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TythonError {
    #[error("{file}: parse error at {line}:{col}: {message}")]
    Parse { file: PathBuf, line: u32, col: u32, message: String },

    #[error("{file}: {source}")]
    Transform {
        file: PathBuf,
        #[source]
        source: tython_transform::TransformError,
    },

    #[error("{file}: hoist registry left {count} definition(s) unconsumed (translator bug)")]
    IncompleteHoisting { file: PathBuf, count: usize },

    #[error("{file}: I/O error: {source}")]
    Io {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

impl TythonError {
    /// The file this error belongs to, for grouping in the aggregate
    /// report — `Config` errors are run-wide and have none.
    pub fn file(&self) -> Option<&std::path::Path> {
        match self {
            TythonError::Parse { file, .. } => Some(file),
            TythonError::Transform { file, .. } => Some(file),
            TythonError::IncompleteHoisting { file, .. } => Some(file),
            TythonError::Io { file, .. } => Some(file),
            TythonError::Config(_) => None,
        }
    }

    /// A one-line diagnostic for the non-`--debug` summary report.
    pub fn first_line(&self) -> String {
        self.to_string().lines().next().unwrap_or_default().to_string()
    }
}
