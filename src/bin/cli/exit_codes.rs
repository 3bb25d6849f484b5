//! Exit codes for the CLI tool.

use snapture::Error;

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// Archive format error
pub const BAD_ARCHIVE: i32 = 3;
/// Restored content did not match its recorded hash
pub const HASH_MISMATCH: i32 = 4;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    FatalError,
    BadArchive,
    HashMismatch,
    IoError,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::FatalError => FATAL_ERROR,
            Self::BadArchive => BAD_ARCHIVE,
            Self::HashMismatch => HASH_MISMATCH,
            Self::IoError => IO_ERROR,
        }
    }
}

/// Converts a snapture error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) => ExitCode::IoError,
        Error::CorruptRecord { .. } => ExitCode::BadArchive,
        Error::HashMismatch { .. } => ExitCode::HashMismatch,
        Error::PathTraversal { .. } => ExitCode::FatalError,
        // A source name the format cannot frame
        Error::InvalidArchivePath(_) => ExitCode::FatalError,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
