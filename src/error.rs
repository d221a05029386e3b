//! Typed failures returned by the codecs.
//!
//! Every fatal condition raised during a load or save is both recorded in the
//! codec's [`FileLog`](crate::diagnostics::FileLog) with full technical detail
//! and returned to the caller as a [`CodecError`] carrying a short summary.

use std::io;
use std::path::{Path, PathBuf};

use crate::event_table::EventTableError;
use crate::parameter_map::ParameterMapError;

/// Broad classification of a [`CodecError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// A path could not be opened (missing, permission denied, other OS error)
    Access,
    /// Content is structurally invalid
    Malformed,
    /// Fewer bytes are available than the declared structure requires
    Truncated,
    /// Recognizable container with an unknown format version
    Unsupported,
    /// I/O failure while writing
    Write,
    /// Invalid use of the API
    Programmer,
}

/// Errors that can occur while loading or saving a file
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The file does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but may not be opened
    #[error("Access denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    /// Any other OS error while opening the file
    #[error("Cannot open {}: {source}", path.display())]
    Access {
        /// Path that failed to open
        path: PathBuf,
        /// Underlying OS error
        #[source]
        source: io::Error,
    },

    /// The content does not start with a known format token
    #[error("Unrecognized file format: {0}")]
    UnrecognizedFormat(String),

    /// Structurally invalid content
    #[error("Malformed file: {0}")]
    Malformed(String),

    /// The file ends before the declared structure is complete
    #[error("Truncated file: {0}")]
    Truncated(String),

    /// A known container with an unsupported version
    #[error("Unsupported format version: {0}")]
    Unsupported(String),

    /// An I/O failure while writing
    #[error("Write error: {0}")]
    Write(String),

    /// Invalid arguments or codec state
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CodecError {
    /// Classify an error returned by `File::open` or `File::create`
    pub fn from_open_error(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => CodecError::NotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => CodecError::PermissionDenied(path.to_path_buf()),
            _ => CodecError::Access {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// The taxonomy bucket this error belongs to
    pub fn category(&self) -> ErrorCategory {
        match self {
            CodecError::NotFound(_)
            | CodecError::PermissionDenied(_)
            | CodecError::Access { .. } => ErrorCategory::Access,
            CodecError::UnrecognizedFormat(_) | CodecError::Malformed(_) => {
                ErrorCategory::Malformed
            }
            CodecError::Truncated(_) => ErrorCategory::Truncated,
            CodecError::Unsupported(_) => ErrorCategory::Unsupported,
            CodecError::Write(_) => ErrorCategory::Write,
            CodecError::InvalidArgument(_) => ErrorCategory::Programmer,
        }
    }
}

impl From<ParameterMapError> for CodecError {
    fn from(err: ParameterMapError) -> Self {
        CodecError::InvalidArgument(err.to_string())
    }
}

impl From<EventTableError> for CodecError {
    fn from(err: EventTableError) -> Self {
        CodecError::InvalidArgument(err.to_string())
    }
}
