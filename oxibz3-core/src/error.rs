//! Error types for OxiBz3 operations.
//!
//! Every failure a caller can observe is a [`Bz3Error`]. Primitive failures
//! keep their [`Status`] so the seven block-level conditions stay
//! distinguishable; container and session failures get their own variants.

use crate::traits::Status;
use std::io;
use thiserror::Error;

/// The main error type for OxiBz3 operations.
#[derive(Debug, Error)]
pub enum Bz3Error {
    /// I/O error from the underlying source or sink.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The block primitive reported a failure.
    #[error("block primitive failed: {0}")]
    Primitive(Status),

    /// A unit or block header is invalid, or junk follows the last block.
    #[error("Malformed container at offset {offset}: {message}")]
    MalformedContainer {
        /// Byte offset of the offending header.
        offset: u64,
        /// Description of the problem.
        message: String,
    },

    /// A declared size runs past the end of the source.
    #[error("Truncated source at offset {offset}: need {needed} bytes, have {available}")]
    TruncatedSource {
        /// Byte offset where the short read started.
        offset: u64,
        /// Number of bytes the header declared.
        needed: usize,
        /// Number of bytes actually present.
        available: usize,
    },

    /// The source is not in the requested format.
    #[error("Format mismatch: not a {expected} stream ({message})")]
    FormatMismatch {
        /// Name of the format that was requested.
        expected: &'static str,
        /// What was found instead.
        message: String,
    },

    /// A unit declares a block size above the configured maximum.
    #[error("Block size {declared} exceeds the accepted maximum {limit}")]
    BlockSizeExceeded {
        /// Block size found in the unit header.
        declared: usize,
        /// Largest block size the reader accepts.
        limit: usize,
    },

    /// Producing more output would cross `max_output_size`.
    #[error("Output limit of {limit} bytes exceeded")]
    OutputLimitExceeded {
        /// The configured limit.
        limit: usize,
    },

    /// The session was already closed.
    #[error("Session is closed")]
    ClosedSession,

    /// The session already reported an error and cannot continue.
    #[error("Session failed earlier and cannot be read further")]
    SessionFailed,

    /// An option value or combination is not valid.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the bad argument.
        message: String,
    },

    /// The block codec is older than the minimum supported version.
    #[error("Incompatible block codec version {found} (minimum {minimum})")]
    IncompatibleVersion {
        /// Version reported by the codec.
        found: String,
        /// Minimum version accepted.
        minimum: String,
    },
}

/// Result type alias for OxiBz3 operations.
pub type Result<T> = std::result::Result<T, Bz3Error>;

impl Bz3Error {
    /// Create a malformed container error.
    pub fn malformed(offset: u64, message: impl Into<String>) -> Self {
        Self::MalformedContainer {
            offset,
            message: message.into(),
        }
    }

    /// Create a truncated source error.
    pub fn truncated(offset: u64, needed: usize, available: usize) -> Self {
        Self::TruncatedSource {
            offset,
            needed,
            available,
        }
    }

    /// Create a format mismatch error.
    pub fn format_mismatch(expected: &'static str, message: impl Into<String>) -> Self {
        Self::FormatMismatch {
            expected,
            message: message.into(),
        }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an incompatible version error.
    pub fn incompatible_version(found: impl ToString, minimum: impl ToString) -> Self {
        Self::IncompatibleVersion {
            found: found.to_string(),
            minimum: minimum.to_string(),
        }
    }

    /// The primitive status behind this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Self::Primitive(status) => Some(*status),
            _ => None,
        }
    }

    /// Whether this error is a corrupt or truncated input rather than a usage
    /// or I/O problem.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::Primitive(_)
                | Self::MalformedContainer { .. }
                | Self::TruncatedSource { .. }
                | Self::FormatMismatch { .. }
                | Self::BlockSizeExceeded { .. }
        )
    }
}

impl From<Status> for Bz3Error {
    fn from(status: Status) -> Self {
        Self::Primitive(status)
    }
}

impl From<Bz3Error> for io::Error {
    fn from(err: Bz3Error) -> Self {
        match err {
            Bz3Error::Io(inner) => inner,
            Bz3Error::InvalidArgument { .. } => io::Error::new(io::ErrorKind::InvalidInput, err),
            Bz3Error::ClosedSession | Bz3Error::SessionFailed => io::Error::other(err),
            Bz3Error::TruncatedSource { .. } => io::Error::new(io::ErrorKind::UnexpectedEof, err),
            _ => io::Error::new(io::ErrorKind::InvalidData, err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Bz3Error::malformed(42, "junk after last block");
        assert!(err.to_string().contains("offset 42"));

        let err = Bz3Error::Primitive(Status::CrcMismatch);
        assert!(err.to_string().contains("BZ3_ERR_CRC"));

        let err = Bz3Error::truncated(9, 100, 3);
        assert!(err.to_string().contains("need 100"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Bz3Error = io_err.into();
        assert!(matches!(err, Bz3Error::Io(_)));

        let back: io::Error = err.into();
        assert_eq!(back.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_into_io_error_kinds() {
        let err: io::Error = Bz3Error::malformed(0, "x").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);

        let err: io::Error = Bz3Error::invalid_argument("bad").into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        let err: io::Error = Bz3Error::truncated(0, 8, 2).into();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_status_accessor() {
        let err: Bz3Error = Status::DataTooBig.into();
        assert_eq!(err.status(), Some(Status::DataTooBig));
        assert!(err.is_data_error());
        assert_eq!(Bz3Error::ClosedSession.status(), None);
        assert!(!Bz3Error::ClosedSession.is_data_error());
    }
}
