//! Listing archive contents without extracting.

use std::io::{Read, Seek};
use std::path::Path;

use super::{ArchiveReader, ListedEntry};
use crate::Result;

/// Iterator over the entries of an archive, seeking past payloads.
///
/// Yields at most one error, after which it is exhausted.
pub struct Entries<'a, R> {
    reader: &'a mut ArchiveReader<R>,
    done: bool,
}

impl<R: Read + Seek> Iterator for Entries<'_, R> {
    type Item = Result<ListedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let step = self.reader.next_record().and_then(|record| match record {
            Some(record) => {
                self.reader.skip_payload()?;
                Ok(Some(ListedEntry {
                    size: record.payload_len(),
                    kind: record.kind,
                    path: record.path,
                }))
            }
            None => Ok(None),
        });
        match step {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read + Seek> ArchiveReader<R> {
    /// Returns an iterator over the remaining entries.
    ///
    /// Payloads are skipped by seeking, so listing touches only the
    /// metadata lines.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries {
            reader: self,
            done: false,
        }
    }

    /// Collects the remaining entries.
    pub fn list(&mut self) -> Result<Vec<ListedEntry>> {
        self.entries().collect()
    }
}

/// Lists every entry of the archive at `archive_path`.
///
/// Nothing is written to disk.
///
/// # Example
///
/// ```rust,no_run
/// for entry in snapture::list_contents("backup.snap")? {
///     println!("{}", entry);
/// }
/// # Ok::<(), snapture::Error>(())
/// ```
pub fn list_contents(archive_path: impl AsRef<Path>) -> Result<Vec<ListedEntry>> {
    ArchiveReader::open_path(archive_path)?.list()
}
