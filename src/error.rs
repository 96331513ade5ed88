//! Error types for cnxmd operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while converting a book.
///
/// Missing data inside well-formed documents (no title, unknown module ids,
/// dangling figure references) never produces an error; those cases degrade
/// to sentinel values. Only unreadable or malformed input is fatal.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed XML: {0}")]
    Malformed(String),

    #[error("Module id {0:?} is not a plain file name")]
    InvalidModuleId(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[cfg(feature = "cli")]
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Attach the path of the file being processed.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        Error::InFile {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
