//! Error types for snapshot operations.
//!
//! This module provides the [`Error`] enum which represents every way that
//! writing, restoring or listing a snapshot archive can fail, along with a
//! convenient [`Result<T>`] type alias.
//!
//! # Error Handling
//!
//! All fallible operations in this crate return `Result<T, Error>`:
//!
//! ```rust,no_run
//! use snapture::{Error, Result};
//!
//! fn restore_backup(archive: &str, dest: &str) -> Result<bool> {
//!     match snapture::restore(archive, dest, true) {
//!         Ok(result) => Ok(result.is_ok()),
//!         Err(Error::HashMismatch { path, .. }) => {
//!             eprintln!("{} - Hash mismatch!", path);
//!             Ok(false)
//!         }
//!         Err(e @ Error::PathTraversal { .. }) => {
//!             eprintln!("Refusing unsafe archive: {}", e);
//!             Err(e)
//!         }
//!         Err(e) => Err(e),
//!     }
//! }
//! ```
//!
//! ## Error Categories
//!
//! | Category | Variants | Typical Cause |
//! |----------|----------|---------------|
//! | I/O | [`Io`][Error::Io] | Unreadable source, unwritable destination |
//! | Format | [`CorruptRecord`][Error::CorruptRecord] | Malformed or truncated archive |
//! | Integrity | [`HashMismatch`][Error::HashMismatch] | Payload altered after snapshot |
//! | Security | [`PathTraversal`][Error::PathTraversal] | Entry would escape the destination |
//! | Naming | [`InvalidArchivePath`][Error::InvalidArchivePath] | Name cannot be stored in a record |

use std::io;

/// The main error type for snapshot operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading the source tree, the archive,
    /// or while writing the destination.
    ///
    /// # Recovery
    ///
    /// Check the underlying [`std::io::ErrorKind`]:
    ///
    /// ```rust
    /// use snapture::Error;
    /// use std::io::ErrorKind;
    ///
    /// fn describe(error: &Error) -> &'static str {
    ///     match error {
    ///         Error::Io(e) if e.kind() == ErrorKind::NotFound => "missing",
    ///         Error::Io(e) if e.kind() == ErrorKind::PermissionDenied => "denied",
    ///         _ => "other",
    ///     }
    /// }
    /// ```
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive contains a malformed record line or a truncated payload.
    ///
    /// The offset is the byte position in the archive where the problem
    /// was detected. The archive cannot be processed past this point.
    #[error("Corrupt record at offset {offset:#x}: {reason}")]
    CorruptRecord {
        /// Byte offset of the offending line or payload.
        offset: u64,
        /// Description of what was wrong.
        reason: String,
    },

    /// A restored file's content does not hash to the value stored in its
    /// record.
    ///
    /// The partially restored file has already been removed when this error
    /// is returned. Only strict restores surface this as an error; non-strict
    /// restores collect mismatches into
    /// [`RestoreResult::mismatches`](crate::RestoreResult::mismatches).
    #[error("Hash mismatch for entry {entry_index} ({path}): expected {expected}, got {actual}")]
    HashMismatch {
        /// Index of the entry in archive order.
        entry_index: usize,
        /// Relative path of the entry.
        path: String,
        /// Hash stored in the archive.
        expected: String,
        /// Hash of the bytes actually read.
        actual: String,
    },

    /// An entry path is absolute or contains `..` and would be written
    /// outside the destination directory.
    ///
    /// This is always fatal.
    #[error("Path traversal detected in entry {entry_index}: {path}")]
    PathTraversal {
        /// Index of the entry in archive order.
        entry_index: usize,
        /// The offending path as stored in the archive.
        path: String,
    },

    /// A name cannot be represented as an archive path.
    ///
    /// Raised while snapshotting a tree whose names are not UTF-8 or contain
    /// characters reserved by the record framing (`|`, line breaks, NUL).
    #[error("Invalid archive path: {0}")]
    InvalidArchivePath(String),
}

impl Error {
    /// Returns `true` if this error indicates a security issue.
    pub fn is_security_error(&self) -> bool {
        matches!(self, Error::PathTraversal { .. })
    }

    /// Returns `true` if this error indicates damaged archive data.
    ///
    /// This covers malformed framing as well as content whose hash no longer
    /// matches its record.
    pub fn is_corruption(&self) -> bool {
        matches!(
            self,
            Error::CorruptRecord { .. } | Error::HashMismatch { .. }
        )
    }

    /// Returns the entry index associated with this error, if any.
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            Error::HashMismatch { entry_index, .. } => Some(*entry_index),
            Error::PathTraversal { entry_index, .. } => Some(*entry_index),
            _ => None,
        }
    }

    /// Returns the entry path associated with this error, if any.
    ///
    /// # Example
    ///
    /// ```rust
    /// use snapture::Error;
    ///
    /// fn log_error(error: &Error) {
    ///     if let Some(name) = error.entry_name() {
    ///         eprintln!("Error for '{}': {}", name, error);
    ///     }
    /// }
    /// ```
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Error::HashMismatch { path, .. } => Some(path.as_str()),
            Error::PathTraversal { path, .. } => Some(path.as_str()),
            _ => None,
        }
    }

    /// Creates a CorruptRecord error.
    pub fn corrupt_record(offset: u64, reason: impl Into<String>) -> Self {
        Error::CorruptRecord {
            offset,
            reason: reason.into(),
        }
    }

    /// Creates a PathTraversal error.
    pub fn path_traversal(entry_index: usize, path: impl Into<String>) -> Self {
        Error::PathTraversal {
            entry_index,
            path: path.into(),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::Io(err.into())
    }
}

/// A specialized Result type for snapshot operations.
///
/// This is defined as `std::result::Result<T, Error>` for convenience.
pub type Result<T> = std::result::Result<T, Error>;
