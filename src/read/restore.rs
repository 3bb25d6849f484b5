//! Restoring archives to disk with hash verification.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::{ArchiveReader, HashMismatch, RestoreOptions, RestoreResult};
use crate::checksum::HashingWriter;
use crate::format::{EntryKind, Record};
use crate::mode::{FileMode, HAS_POSIX_PERMISSIONS};
use crate::safety::validate_extract_path;
use crate::Result;

impl<R: Read> ArchiveReader<R> {
    /// Restores every remaining entry below `dest_dir`.
    ///
    /// `dest_dir` is created if missing. Directories that already exist are
    /// reused and existing files are overwritten. Each file is hashed while
    /// it is written; a file whose hash does not match its record is
    /// deleted again. Directory permissions are applied last, deepest
    /// first, so read-only directories can still be filled.
    ///
    /// # Errors
    ///
    /// - [`Error::HashMismatch`](crate::Error::HashMismatch) in strict mode
    /// - [`Error::PathTraversal`](crate::Error::PathTraversal) for entries
    ///   that would escape `dest_dir`
    /// - [`Error::CorruptRecord`](crate::Error::CorruptRecord) for malformed
    ///   archives
    /// - [`Error::Io`](crate::Error::Io) for file system failures
    ///
    /// Entries restored before the error stay on disk.
    pub fn restore_into(
        &mut self,
        dest_dir: impl AsRef<Path>,
        options: &mut RestoreOptions,
    ) -> Result<RestoreResult> {
        let dest_dir = dest_dir.as_ref();
        fs::create_dir_all(dest_dir)?;
        let root = dest_dir.canonicalize()?;

        let mut result = RestoreResult::default();
        let mut directories = Vec::new();
        let outcome = self.restore_entries(&root, options, &mut result, &mut directories);

        if options.applies_permissions() && HAS_POSIX_PERMISSIONS {
            for (path, mode) in directories.iter().rev() {
                apply_mode(options, path, *mode);
            }
        }

        outcome.map(|()| result)
    }

    fn restore_entries(
        &mut self,
        root: &Path,
        options: &mut RestoreOptions,
        result: &mut RestoreResult,
        directories: &mut Vec<(PathBuf, FileMode)>,
    ) -> Result<()> {
        while let Some(record) = self.next_record()? {
            let entry_index = self.entries_read() - 1;
            let target = validate_extract_path(&record.path, root, entry_index)?;

            if let Some(progress) = options.progress_mut() {
                progress.on_entry_start(record.path.as_str(), record.size);
            }

            let verified = match record.kind {
                EntryKind::Directory => {
                    fs::create_dir_all(&target)?;
                    log::debug!("Restored directory '{}'", record.path);
                    directories.push((target, record.mode));
                    result.directories_restored += 1;
                    true
                }
                EntryKind::File => self.restore_file(&record, &target, entry_index, options, result)?,
            };

            if let Some(progress) = options.progress_mut() {
                progress.on_entry_complete(record.path.as_str(), verified);
            }
        }
        Ok(())
    }

    /// Writes one file and verifies it. Returns false if it was dropped
    /// after a non-strict hash mismatch.
    fn restore_file(
        &mut self,
        record: &Record,
        target: &Path,
        entry_index: usize,
        options: &mut RestoreOptions,
        result: &mut RestoreResult,
    ) -> Result<bool> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut writer = HashingWriter::new(BufWriter::new(File::create(target)?));
        let written = self
            .copy_payload(&mut writer)
            .and_then(|n| writer.flush().map(|()| n).map_err(Into::into));
        let actual = writer.hash();
        drop(writer);

        let written = match written {
            Ok(n) => n,
            Err(e) => {
                let _ = fs::remove_file(target);
                return Err(e);
            }
        };

        if let Some(expected) = record.hash.filter(|expected| *expected != actual) {
            fs::remove_file(target)?;
            let mismatch = HashMismatch {
                entry_index,
                path: record.path.to_string(),
                expected,
                actual,
            };
            if options.is_strict() {
                return Err(mismatch.into());
            }
            log::warn!("{} - Hash mismatch!", record.path);
            result.mismatches.push(mismatch);
            return Ok(false);
        }

        if options.applies_permissions() && HAS_POSIX_PERMISSIONS {
            apply_mode(options, target, record.mode);
        }
        log::debug!("Restored file '{}' ({} bytes)", record.path, written);
        result.files_restored += 1;
        result.bytes_restored += written;
        Ok(true)
    }
}

fn apply_mode(options: &mut RestoreOptions, path: &Path, mode: FileMode) {
    if let Err(e) = mode.apply_to_path(path) {
        let message = format!("Failed to set permissions on '{}': {}", path.display(), e);
        log::warn!("{}", message);
        if let Some(progress) = options.progress_mut() {
            progress.on_warning(&message);
        }
    }
}

/// Restores the archive at `archive_path` into `dest_dir`.
///
/// With `strict` set, the first hash mismatch stops the restore with an
/// error; otherwise mismatching files are skipped and reported in the
/// result.
///
/// # Example
///
/// ```rust,no_run
/// let result = snapture::restore("backup.snap", "./restored", false)?;
/// for mismatch in &result.mismatches {
///     eprintln!("{} - Hash mismatch!", mismatch.path);
/// }
/// # Ok::<(), snapture::Error>(())
/// ```
pub fn restore(
    archive_path: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    strict: bool,
) -> Result<RestoreResult> {
    restore_with_options(archive_path, dest_dir, RestoreOptions::new().strict(strict))
}

/// Like [`restore`], with full control over options.
pub fn restore_with_options(
    archive_path: impl AsRef<Path>,
    dest_dir: impl AsRef<Path>,
    mut options: RestoreOptions,
) -> Result<RestoreResult> {
    ArchiveReader::open_path(archive_path)?.restore_into(dest_dir, &mut options)
}
