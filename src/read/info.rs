//! Result types for restore and list operations.

use std::fmt;

use crate::checksum::ContentHash;
use crate::format::EntryKind;
use crate::progress::BYTES_KIB;
use crate::{ArchivePath, Error};

/// A file whose restored content did not match its recorded hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMismatch {
    /// Index of the entry in archive order.
    pub entry_index: usize,
    /// Relative path of the entry.
    pub path: String,
    /// Hash stored in the archive.
    pub expected: ContentHash,
    /// Hash of the payload actually read.
    pub actual: ContentHash,
}

impl From<HashMismatch> for Error {
    fn from(m: HashMismatch) -> Self {
        Error::HashMismatch {
            entry_index: m.entry_index,
            path: m.path,
            expected: m.expected.to_hex(),
            actual: m.actual.to_hex(),
        }
    }
}

/// Result of restoring an archive.
#[must_use = "restore results should be checked for hash mismatches"]
#[derive(Debug, Clone, Default)]
pub struct RestoreResult {
    /// Number of directory records processed.
    pub directories_restored: usize,
    /// Number of files written and verified.
    pub files_restored: usize,
    /// Total payload bytes of verified files.
    pub bytes_restored: u64,
    /// Files dropped after a hash mismatch (non-strict mode only).
    pub mismatches: Vec<HashMismatch>,
}

impl RestoreResult {
    /// Returns true if every file verified.
    pub fn is_ok(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Total number of entries restored successfully.
    pub fn entries_restored(&self) -> usize {
        self.directories_restored + self.files_restored
    }
}

/// One line of an archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedEntry {
    /// Relative path of the entry.
    pub path: ArchivePath,
    /// Directory or file.
    pub kind: EntryKind,
    /// Payload size in bytes; 0 for directories.
    pub size: u64,
}

impl ListedEntry {
    /// Size in KiB rounded to two decimal places, ties to even.
    pub fn size_kib(&self) -> f64 {
        (self.size as f64 / BYTES_KIB as f64 * 100.0).round_ties_even() / 100.0
    }
}

impl fmt::Display for ListedEntry {
    /// `path/` for directories, `path - 1.5kB` for files.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EntryKind::Directory => write!(f, "{}/", self.path),
            EntryKind::File => {
                let kib = self.size_kib();
                if kib.fract() == 0.0 {
                    write!(f, "{} - {:.1}kB", self.path, kib)
                } else {
                    write!(f, "{} - {}kB", self.path, kib)
                }
            }
        }
    }
}
