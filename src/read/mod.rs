//! Archive reading API.
//!
//! [`ArchiveReader`] decodes the record stream one record at a time. Each
//! file record's payload must then be consumed with
//! [`copy_payload`](ArchiveReader::copy_payload),
//! [`skip_payload`](ArchiveReader::skip_payload) or
//! [`discard_payload`](ArchiveReader::discard_payload); a payload left
//! unconsumed is discarded automatically by the next
//! [`next_record`](ArchiveReader::next_record).
//!
//! # Example
//!
//! ```rust,no_run
//! use snapture::ArchiveReader;
//!
//! let mut reader = ArchiveReader::open_path("backup.snap")?;
//! while let Some(record) = reader.next_record()? {
//!     println!("{} {} {}", record.kind, record.mode, record.path);
//!     reader.skip_payload()?;
//! }
//! # Ok::<(), snapture::Error>(())
//! ```

mod info;
mod list;
mod options;
mod restore;

pub use info::{HashMismatch, ListedEntry, RestoreResult};
pub use list::{Entries, list_contents};
pub use options::RestoreOptions;
pub use restore::{restore, restore_with_options};

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::format::{LineReader, Record};
use crate::{Error, Result};

/// The payload of the last record returned, not yet consumed.
#[derive(Debug, Clone)]
struct PendingPayload {
    path: String,
    offset: u64,
    len: u64,
}

/// Sequential decoder for snapshot archives.
#[derive(Debug)]
pub struct ArchiveReader<R> {
    lines: LineReader<BufReader<R>>,
    entries_read: usize,
    pending: Option<PendingPayload>,
    stream_len: Option<u64>,
}

impl ArchiveReader<File> {
    /// Opens an archive file for reading.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        let mut reader = Self::new(file);
        reader.stream_len = Some(len);
        Ok(reader)
    }
}

impl<R: Read> ArchiveReader<R> {
    /// Creates a reader over any byte source positioned at the first record.
    pub fn new(source: R) -> Self {
        Self {
            lines: LineReader::new(BufReader::new(source)),
            entries_read: 0,
            pending: None,
            stream_len: None,
        }
    }

    /// Decodes the next record, or returns `None` at end of archive.
    ///
    /// Blank lines before the record are skipped. An unconsumed payload of
    /// the previous record is read and discarded first.
    ///
    /// # Errors
    ///
    /// - [`Error::CorruptRecord`] for a malformed line or truncated payload
    /// - [`Error::PathTraversal`] for an absolute or `..` path
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        self.discard_payload()?;
        self.lines.skip_blank_lines()?;

        let offset = self.lines.position();
        let Some(line) = self.lines.peek_line()? else {
            return Ok(None);
        };
        let record = Record::parse_line(line, offset, self.entries_read)?;
        self.lines.advance();
        self.entries_read += 1;

        if record.payload_len() > 0 {
            self.pending = Some(PendingPayload {
                path: record.path.to_string(),
                offset: self.lines.position(),
                len: record.payload_len(),
            });
        }
        Ok(Some(record))
    }

    /// Copies the current record's payload to `out` and returns its length.
    ///
    /// Returns 0 for directories, empty files, or if the payload was
    /// already consumed.
    pub fn copy_payload<W: Write + ?Sized>(&mut self, out: &mut W) -> Result<u64> {
        let Some(pending) = self.pending.take() else {
            return Ok(0);
        };
        let copied = self.lines.copy_exact(pending.len, out)?;
        if copied != pending.len {
            return Err(truncated(&pending, copied));
        }
        Ok(copied)
    }

    /// Reads past the current record's payload without keeping it.
    pub fn discard_payload(&mut self) -> Result<()> {
        self.copy_payload(&mut io::sink()).map(drop)
    }

    /// Number of records decoded so far.
    pub fn entries_read(&self) -> usize {
        self.entries_read
    }

    /// Byte offset of the next unconsumed byte.
    pub fn position(&self) -> u64 {
        self.lines.position()
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Seeks past the current record's payload without reading it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CorruptRecord`] if the payload extends beyond the
    /// end of the archive.
    pub fn skip_payload(&mut self) -> Result<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };

        let source = self.lines.get_mut();
        let here = source.stream_position()?;
        let end = match self.stream_len {
            Some(len) => len,
            None => {
                let len = source.seek(SeekFrom::End(0))?;
                source.seek(SeekFrom::Start(here))?;
                self.stream_len = Some(len);
                len
            }
        };

        let available = end.saturating_sub(here);
        if pending.len > available {
            return Err(truncated(&pending, available));
        }
        let delta = i64::try_from(pending.len)
            .map_err(|_| Error::corrupt_record(pending.offset, "payload size out of range"))?;
        source.seek_relative(delta)?;
        self.lines.skipped(pending.len);
        Ok(())
    }
}

fn truncated(pending: &PendingPayload, found: u64) -> Error {
    Error::corrupt_record(
        pending.offset,
        format!(
            "truncated payload for '{}': expected {} bytes, found {}",
            pending.path, pending.len, found
        ),
    )
}
