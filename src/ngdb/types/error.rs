//! Custom error types for the ngdb-reader crate.

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum NgdbError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The file's magic bytes are neither `NG` nor `EH`.
    ///
    /// Opening such a file succeeds and yields an inert guide with
    /// empty content, but navigation operations return this error.
    #[error("Not a Norton Guide or Expert Help database")]
    NotAGuide,

    /// A read or navigation operation ran past the end of the guide, or
    /// landed on the end-of-guide sentinel.
    #[error("End of guide")]
    Eof,

    /// An entry type tag other than short, long, or the end-of-guide
    /// sentinel was found where an entry was expected.
    #[error("Unknown guide entry type: {0:#06x}")]
    UnknownEntryType(u16),

    /// The guide declares a structure this reader does not handle, often
    /// indicating a corrupt file.
    #[error("Unsupported guide structure: {0}")]
    Unsupported(String),
}

/// A convenience `Result` type alias using the crate's `NgdbError` type.
pub type Result<T> = std::result::Result<T, NgdbError>;
