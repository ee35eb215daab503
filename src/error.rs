//! Error types for the docxtree library.

use std::io;
use thiserror::Error;

/// Result type alias for docxtree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a Word package.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a ZIP archive, or its central directory is corrupt.
    #[error("Invalid package: {0}")]
    Package(String),

    /// A part required for structural parsing is absent.
    #[error("Missing part: {0}")]
    MissingPart(String),

    /// Malformed XML in a package part.
    #[error("XML parse error in {part}: {message}")]
    Parse {
        /// Part path the error was raised for
        part: String,
        /// Parser message
        message: String,
    },

    /// A `basedOn` chain revisits a style it has already seen.
    #[error("Style inheritance cycle through '{0}'")]
    StyleCycle(String),

    /// Error while serializing the document tree.
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl Error {
    /// Build a parse error for the given part.
    pub fn parse(part: impl Into<String>, message: impl ToString) -> Self {
        Error::Parse {
            part: part.into(),
            message: message.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            other => Error::Package(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::parse("<xml>", err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}
