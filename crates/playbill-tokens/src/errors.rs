//! Token counting error types.

use thiserror::Error;

/// Errors from loading a tokenizer or counting tokens.
#[derive(Debug, Error)]
pub enum TokenError {
    /// The tokenizer could not be loaded.
    #[error("tokenizer load failed ({source_name}): {message}")]
    Load {
        /// File path or model id that was being loaded.
        source_name: String,
        /// Underlying error message.
        message: String,
    },

    /// Downloading tokenizer files failed.
    #[error("tokenizer download failed for {model}: {message}")]
    Download {
        /// Model id.
        model: String,
        /// Underlying error message.
        message: String,
    },

    /// Encoding a text failed.
    #[error("encoding failed: {0}")]
    Encode(String),
}

/// Result alias for token operations.
pub type Result<T> = std::result::Result<T, TokenError>;
