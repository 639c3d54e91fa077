//! Error types for APK archive inspection.

use std::io;
use thiserror::Error;

/// Errors produced while opening, parsing, or reporting on an archive.
#[derive(Debug, Error)]
pub enum ApkError {
    /// The archive could not be opened (missing file, permissions).
    #[error("cannot open archive: {0}")]
    Open(#[source] io::Error),

    /// The central directory could not be located or parsed.
    #[error("corrupt archive: {message}")]
    Corrupt {
        /// What failed to parse, and where.
        message: String,
    },

    /// A compression method code with no display label. There is no
    /// fallback label; an unrecognized code is a correctness signal.
    #[error("unknown compression method {0}")]
    UnknownMethod(u16),

    /// Bad command-line usage, e.g. directory mode given a non-directory.
    #[error("{0}")]
    InvalidArgument(String),
}

impl ApkError {
    pub(crate) fn corrupt(message: impl Into<String>) -> Self {
        ApkError::Corrupt {
            message: message.into(),
        }
    }
}

// Opening is mapped to `Open` explicitly, so a bare I/O error can only
// surface while reading or parsing an already-open archive.
impl From<io::Error> for ApkError {
    fn from(err: io::Error) -> Self {
        ApkError::corrupt(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApkError>;
