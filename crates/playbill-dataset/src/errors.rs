//! Dataset error types.
//!
//! [`WindowError`] and [`SplitError`] come from the pure algorithms and carry
//! no paths; [`DatasetError`] wraps them together with the filesystem and
//! JSON failures of the pipeline stages.

use std::path::PathBuf;

use playbill_tokens::TokenError;
use thiserror::Error;

/// Errors from building context windows.
#[derive(Debug, Error)]
pub enum WindowError {
    /// A scene needs at least two turns to form a context/response pair.
    #[error("scene has {found} turn(s); at least 2 are needed")]
    TooFewTurns {
        /// Number of turns supplied.
        found: usize,
    },

    /// The token budget must be positive.
    #[error("max context tokens must be positive")]
    ZeroBudget,

    /// The token counter failed.
    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Errors from balancing the train/val split.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The train proportion was outside `(0, 1]`.
    #[error("split proportion must be in (0, 1], got {0}")]
    InvalidProportion(f64),
}

/// Errors from the pipeline stages.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Walking a directory tree failed.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A JSON line could not be parsed or a record could not be serialized.
    #[error("invalid JSON at {path}:{line}: {source}")]
    Json {
        /// File being read or written.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// A record lacks the `context_length` needed for split balancing.
    #[error("record at {path}:{line} has no context_length (already cleaned?)")]
    MissingContextLength {
        /// Scene file.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
    },

    /// A path has no usable file or directory name.
    #[error("path has no usable name: {0}")]
    InvalidPath(PathBuf),

    /// Building windows failed.
    #[error(transparent)]
    Window(#[from] WindowError),

    /// Balancing failed.
    #[error(transparent)]
    Split(#[from] SplitError),

    /// Counting tokens failed outside the window builder.
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DatasetError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;
