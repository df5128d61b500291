//! Error types for the undoc library.

use std::io;
use thiserror::Error;

/// Result type alias for undoc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised for whole-document, unrecoverable conditions.
///
/// Partial failures (an unreadable page, a truncated paragraph stream) are
/// never surfaced here; they are reported as warnings on the successful
/// [`ExtractionResult`](crate::ExtractionResult).
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is neither a PDF nor a DOCX package.
    #[error("Unsupported format: input is neither PDF nor DOCX")]
    UnsupportedFormat,

    /// The document container is structurally unreadable.
    #[error("Corrupt document: {0}")]
    Corrupt(String),

    /// The document is encrypted and requires a password.
    #[error("Document is encrypted")]
    Encrypted,
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            lopdf::Error::Decryption(_) => Error::Encrypted,
            _ => Error::Corrupt(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Corrupt(err.to_string()),
        }
    }
}
