//! Metadata line encoding and parsing.

use std::fmt;

use super::{FIELD_COUNT, FIELD_SEPARATOR};
use crate::checksum::{ContentHash, HEX_DIGEST_LEN};
use crate::mode::FileMode;
use crate::safety::is_escaping;
use crate::{ArchivePath, Error, Result};

/// The kind of entry a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A directory (`d`). Carries no payload.
    Directory,
    /// A regular file (`f`). Followed by its payload.
    File,
}

impl EntryKind {
    /// The single-character code stored in the kind field.
    pub fn code(self) -> char {
        match self {
            EntryKind::Directory => 'd',
            EntryKind::File => 'f',
        }
    }

    fn from_field(field: &str) -> Option<Self> {
        match field {
            "d" => Some(EntryKind::Directory),
            "f" => Some(EntryKind::File),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Directory => f.write_str("directory"),
            EntryKind::File => f.write_str("file"),
        }
    }
}

/// One archive record: the decoded metadata line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Path relative to the snapshot root.
    pub path: ArchivePath,
    /// Directory or file.
    pub kind: EntryKind,
    /// Permission bits.
    pub mode: FileMode,
    /// Payload length in bytes; always 0 for directories.
    pub size: u64,
    /// Content digest; `None` for directories.
    pub hash: Option<ContentHash>,
}

impl Record {
    /// Creates a directory record.
    pub fn directory(path: ArchivePath, mode: FileMode) -> Self {
        Self {
            path,
            kind: EntryKind::Directory,
            mode,
            size: 0,
            hash: None,
        }
    }

    /// Creates a file record.
    pub fn file(path: ArchivePath, mode: FileMode, size: u64, hash: ContentHash) -> Self {
        Self {
            path,
            kind: EntryKind::File,
            mode,
            size,
            hash: Some(hash),
        }
    }

    /// Returns true if this record describes a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Number of payload bytes following the metadata line.
    pub fn payload_len(&self) -> u64 {
        match self.kind {
            EntryKind::Directory => 0,
            EntryKind::File => self.size,
        }
    }

    /// Encodes the metadata line, terminator included.
    pub fn to_line(&self) -> String {
        let hash = self.hash.map(|h| h.to_hex()).unwrap_or_default();
        format!(
            "{path}{sep}{kind}{sep}{mode}{sep}{size}{sep}{hash}\n",
            path = self.path,
            kind = self.kind.code(),
            mode = self.mode,
            size = self.payload_len(),
            sep = FIELD_SEPARATOR,
        )
    }

    /// Parses a metadata line with its terminator already stripped.
    ///
    /// `offset` is the line's position in the archive and `entry_index` its
    /// ordinal, both used for error reporting.
    ///
    /// # Errors
    ///
    /// - [`Error::PathTraversal`] if the path is absolute or contains `..`
    /// - [`Error::CorruptRecord`] for any other malformed field
    pub fn parse_line(line: &[u8], offset: u64, entry_index: usize) -> Result<Self> {
        let corrupt = |reason: String| Error::corrupt_record(offset, reason);

        let line = std::str::from_utf8(line)
            .map_err(|_| corrupt("record line is not valid UTF-8".into()))?;

        let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(corrupt(format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                fields.len()
            )));
        }
        let [path, kind, mode, size, hash] = [fields[0], fields[1], fields[2], fields[3], fields[4]];

        if is_escaping(path) {
            return Err(Error::path_traversal(entry_index, path));
        }
        let path = ArchivePath::new(path)
            .map_err(|e| corrupt(format!("bad path {:?}: {}", path, e)))?;

        let kind = EntryKind::from_field(kind)
            .ok_or_else(|| corrupt(format!("unknown entry kind {:?}", kind)))?;

        let mode = FileMode::parse_octal(mode)
            .ok_or_else(|| corrupt(format!("bad permissions {:?}", mode)))?;

        if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
            return Err(corrupt(format!("bad size {:?}", size)));
        }
        let size: u64 = size
            .parse()
            .map_err(|_| corrupt(format!("size {} out of range", size)))?;

        match kind {
            EntryKind::Directory => {
                if size != 0 {
                    return Err(corrupt(format!("directory '{}' has size {}", path, size)));
                }
                if !hash.is_empty() {
                    return Err(corrupt(format!("directory '{}' has a hash", path)));
                }
                Ok(Record::directory(path, mode))
            }
            EntryKind::File => {
                let digest = ContentHash::from_hex(hash).ok_or_else(|| {
                    corrupt(format!(
                        "file '{}' hash must be {} lowercase hex digits, found {:?}",
                        path, HEX_DIGEST_LEN, hash
                    ))
                })?;
                Ok(Record::file(path, mode, size, digest))
            }
        }
    }
}
