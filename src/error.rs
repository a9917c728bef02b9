use std::io;
use std::string::FromUtf8Error;

/// A `Result` type alias for this crate's `Error` type.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that encapsulates all possible errors in this crate.
///
/// Note that running out of elements is never an error. Cursors signal the
/// end of a stream with `Ok(None)`. The only exception is
/// `Cursor::advance_strict`, which reports `Error::PastEnd` instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A strict advance was attempted on an exhausted cursor.
    #[error("advanced past the end of a stream")]
    PastEnd,
    /// An I/O error that occurred while opening, reading or seeking the
    /// resource underneath a stream.
    #[error("I/O error in stream source: {0}")]
    Io(#[from] io::Error),
    /// A line read from a line oriented resource was not valid UTF-8.
    #[error("stream line is not valid UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    /// A cursor was asked to rewind but its source cannot be restarted.
    ///
    /// This occurs for single-pass iterators wrapped with `Foreign::once`
    /// after they have produced at least one element.
    #[error("stream source cannot be rewound once advanced")]
    Unrewindable,
    /// A failure reported by a caller supplied cursor or constructor.
    #[error("stream source failed: {0}")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap an arbitrary error as a source failure.
    pub fn source_failure<E>(err: E) -> Error
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Source(err.into())
    }
}
