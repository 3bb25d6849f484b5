//! Archive writing API.
//!
//! This module provides the [`Writer`] for producing snapshot archives one
//! record at a time, and [`snapshot`] for archiving a whole directory tree.
//!
//! # Example
//!
//! ```rust,no_run
//! use snapture::{ArchivePath, FileMode, Writer};
//!
//! let mut writer = Writer::create_path("notes.snap")?;
//! writer.add_directory(ArchivePath::new("notes")?, FileMode::new(0o755))?;
//! writer.add_bytes(ArchivePath::new("notes/todo.txt")?, FileMode::new(0o644), b"milk\n")?;
//!
//! let result = writer.finish()?;
//! println!("Wrote {} entries, {} bytes", result.entries_written, result.archive_size);
//! # Ok::<(), snapture::Error>(())
//! ```

pub(crate) mod options;
mod walk;

pub use options::{WriteOptions, WriteResult};

use std::fs::File;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::checksum::HashingWriter;
use crate::format::{EntryKind, LINE_TERMINATOR, Record};
use crate::mode::FileMode;
use crate::{ArchivePath, Error, Result};

use options::ExclusionSet;
use walk::{TreeWalk, WalkItem};

/// A snapshot archive writer.
///
/// Records are written in the order they are added. Callers adding entries
/// by hand are responsible for adding a directory before its contents;
/// [`add_tree`](Self::add_tree) does this automatically.
pub struct Writer<W: Write> {
    sink: W,
    options: WriteOptions,
    own_path: Option<PathBuf>,
    result: WriteResult,
}

impl Writer<BufWriter<File>> {
    /// Creates an archive file at `path`, truncating any existing file.
    ///
    /// The created file is excluded from [`add_tree`](Self::add_tree), so
    /// an archive placed inside the tree it snapshots never contains itself.
    pub fn create_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = Self::create(BufWriter::new(file));
        writer.own_path = Some(path.canonicalize()?);
        Ok(writer)
    }
}

impl<W: Write> Writer<W> {
    /// Creates a writer over any byte sink.
    pub fn create(sink: W) -> Self {
        Self {
            sink,
            options: WriteOptions::default(),
            own_path: None,
            result: WriteResult::default(),
        }
    }

    /// Sets the write options.
    pub fn options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    /// Adds a directory record.
    pub fn add_directory(&mut self, archive_path: ArchivePath, mode: FileMode) -> Result<()> {
        let record = Record::directory(archive_path, mode);
        self.start_entry(&record);

        let line = record.to_line();
        self.sink.write_all(line.as_bytes())?;
        self.result.archive_size += line.len() as u64;
        self.result.directories_written += 1;

        self.complete_entry(&record);
        Ok(())
    }

    /// Adds a file record with in-memory content.
    pub fn add_bytes(
        &mut self,
        archive_path: ArchivePath,
        mode: FileMode,
        data: &[u8],
    ) -> Result<()> {
        self.add_stream(archive_path, mode, &mut io::Cursor::new(data))
    }

    /// Adds a file record with content read from `source`.
    ///
    /// The content runs from the current position to the end of `source`.
    /// It is read twice: once to compute the hash that goes into the
    /// metadata line, then again to copy it into the archive.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if `source` yields fewer bytes on the second
    /// pass than on the first.
    pub fn add_stream<R: Read + Seek + ?Sized>(
        &mut self,
        archive_path: ArchivePath,
        mode: FileMode,
        source: &mut R,
    ) -> Result<()> {
        let start = source.stream_position()?;
        let mut hasher = HashingWriter::new(io::sink());
        io::copy(source, &mut hasher)?;
        let size = hasher.bytes_written();
        source.seek(SeekFrom::Start(start))?;

        let record = Record::file(archive_path, mode, size, hasher.hash());
        self.start_entry(&record);

        let line = record.to_line();
        self.sink.write_all(line.as_bytes())?;
        let copied = io::copy(&mut source.take(size), &mut self.sink)?;
        if copied != size {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "'{}' shrank from {} to {} bytes while being archived",
                    record.path, size, copied
                ),
            )));
        }
        self.sink.write_all(&[LINE_TERMINATOR])?;

        self.result.archive_size += line.len() as u64 + size + 1;
        self.result.files_written += 1;
        self.result.total_size += size;

        self.complete_entry(&record);
        Ok(())
    }

    /// Adds a single directory or regular file from disk.
    ///
    /// Directories are added without their contents. Permission bits come
    /// from the file system, or from the platform fallback where POSIX
    /// permissions are unavailable.
    pub fn add_path(&mut self, disk_path: impl AsRef<Path>, archive_path: ArchivePath) -> Result<()> {
        let disk_path = disk_path.as_ref();
        let meta = disk_path.symlink_metadata()?;
        let mode = FileMode::from_metadata(&meta);

        if meta.is_dir() {
            self.add_directory(archive_path, mode)
        } else if meta.is_file() {
            let mut file = File::open(disk_path)?;
            self.add_stream(archive_path, mode, &mut file)
        } else {
            Err(Error::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("'{}' is not a regular file or directory", disk_path.display()),
            )))
        }
    }

    /// Adds everything below `root`, which itself is not recorded.
    ///
    /// Entries are added depth-first with siblings in file name order.
    /// Excluded paths and the archive file itself are left out. Symbolic
    /// links and special files are skipped with a warning and listed in
    /// [`WriteResult::skipped`].
    pub fn add_tree(&mut self, root: impl AsRef<Path>) -> Result<()> {
        let root = root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::NotADirectory,
                format!("'{}' is not a directory", root.display()),
            )));
        }

        let exclusions = ExclusionSet::new(self.options.exclusions().iter().chain(&self.own_path));
        for item in TreeWalk::new(&root, exclusions) {
            match item? {
                WalkItem::Entry(entry) => {
                    let mode = FileMode::from_metadata(&entry.metadata);
                    match entry.kind {
                        EntryKind::Directory => self.add_directory(entry.archive_path, mode)?,
                        EntryKind::File => {
                            let mut file = File::open(&entry.disk_path)?;
                            self.add_stream(entry.archive_path, mode, &mut file)?;
                        }
                    }
                }
                WalkItem::Skipped { path, reason } => {
                    let message = format!("Skipping '{}': {}", path.display(), reason);
                    log::warn!("{}", message);
                    if let Some(progress) = self.options.progress_mut() {
                        progress.on_warning(&message);
                    }
                    self.result.skipped.push(path);
                }
            }
        }
        Ok(())
    }

    /// Flushes the archive and returns statistics.
    pub fn finish(self) -> Result<WriteResult> {
        let (result, _sink) = self.finish_into_inner()?;
        Ok(result)
    }

    /// Flushes the archive and returns statistics and the underlying sink.
    pub fn finish_into_inner(mut self) -> Result<(WriteResult, W)> {
        self.sink.flush()?;
        self.result.entries_written = self.result.directories_written + self.result.files_written;
        Ok((self.result, self.sink))
    }

    fn start_entry(&mut self, record: &Record) {
        log::debug!("Adding {} '{}' ({} bytes)", record.kind, record.path, record.size);
        if let Some(progress) = self.options.progress_mut() {
            progress.on_entry_start(record.path.as_str(), record.size);
        }
    }

    fn complete_entry(&mut self, record: &Record) {
        if let Some(progress) = self.options.progress_mut() {
            progress.on_entry_complete(record.path.as_str(), true);
        }
    }
}

/// Snapshots the tree below `source_dir` into a new archive at
/// `archive_path`.
///
/// The archive is excluded from its own contents even when it lies inside
/// `source_dir`. On error a partially written archive is left behind.
///
/// # Example
///
/// ```rust,no_run
/// let result = snapture::snapshot("./project", "project.snap")?;
/// println!("{} bytes", result.archive_size);
/// # Ok::<(), snapture::Error>(())
/// ```
pub fn snapshot(source_dir: impl AsRef<Path>, archive_path: impl AsRef<Path>) -> Result<WriteResult> {
    snapshot_with_options(source_dir, archive_path, WriteOptions::default())
}

/// Like [`snapshot`], with exclusions and progress reporting.
pub fn snapshot_with_options(
    source_dir: impl AsRef<Path>,
    archive_path: impl AsRef<Path>,
    options: WriteOptions,
) -> Result<WriteResult> {
    let source_dir = source_dir.as_ref();
    if !source_dir.metadata()?.is_dir() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::NotADirectory,
            format!("'{}' is not a directory", source_dir.display()),
        )));
    }

    let mut writer = Writer::create_path(archive_path)?.options(options);
    writer.add_tree(source_dir)?;
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ContentHash;
    use crate::progress::StatisticsProgress;
    use std::fs;

    fn path(s: &str) -> ArchivePath {
        ArchivePath::new(s).unwrap()
    }

    #[test]
    fn test_writer_empty_archive() {
        let writer = Writer::create(Vec::new());
        let (result, bytes) = writer.finish_into_inner().unwrap();
        assert!(bytes.is_empty());
        assert_eq!(result.entries_written, 0);
        assert_eq!(result.archive_size, 0);
    }

    #[test]
    fn test_writer_directory_and_file() {
        let mut writer = Writer::create(Vec::new());
        writer.add_directory(path("d"), FileMode::new(0o755)).unwrap();
        writer.add_bytes(path("d/abc"), FileMode::new(0o644), b"abc").unwrap();
        let (result, bytes) = writer.finish_into_inner().unwrap();

        let expected = format!(
            "d|d|755|0|\nd/abc|f|644|3|{}\nabc\n",
            ContentHash::compute(b"abc")
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
        assert_eq!(result.entries_written, 2);
        assert_eq!(result.directories_written, 1);
        assert_eq!(result.files_written, 1);
        assert_eq!(result.total_size, 3);
        assert_eq!(result.archive_size, expected.len() as u64);
    }

    #[test]
    fn test_writer_empty_file() {
        let mut writer = Writer::create(Vec::new());
        writer.add_bytes(path("empty"), FileMode::new(0o600), b"").unwrap();
        let (_, bytes) = writer.finish_into_inner().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            format!("empty|f|600|0|{}\n\n", ContentHash::compute(b""))
        );
    }

    #[test]
    fn test_add_stream_from_current_position() {
        let mut source = io::Cursor::new(b"skipPAYLOAD".to_vec());
        source.seek(SeekFrom::Start(4)).unwrap();

        let mut writer = Writer::create(Vec::new());
        writer.add_stream(path("p"), FileMode::new(0o644), &mut source).unwrap();
        let (result, bytes) = writer.finish_into_inner().unwrap();
        assert_eq!(result.total_size, 7);
        assert!(bytes.ends_with(b"PAYLOAD\n"));
        assert!(String::from_utf8_lossy(&bytes).starts_with("p|f|644|7|"));
    }

    #[test]
    fn test_progress_reported_per_entry() {
        let stats = StatisticsProgress::new();
        let mut writer = Writer::create(Vec::new()).options(WriteOptions::new().progress(stats.clone()));
        writer.add_directory(path("a"), FileMode::new(0o755)).unwrap();
        writer.add_bytes(path("a/b"), FileMode::new(0o644), b"12").unwrap();
        let _ = writer.finish().unwrap();

        let seen = stats.statistics();
        assert_eq!(seen.entries, vec!["a", "a/b"]);
        assert_eq!(seen.bytes, 2);
        assert!(seen.failed.is_empty());
    }

    #[test]
    fn test_add_path_file_and_dir() {
        let temp = tempfile::tempdir().unwrap();
        fs::create_dir(temp.path().join("d")).unwrap();
        fs::write(temp.path().join("f"), b"hello").unwrap();

        let mut writer = Writer::create(Vec::new());
        writer.add_path(temp.path().join("d"), path("d")).unwrap();
        writer.add_path(temp.path().join("f"), path("f")).unwrap();
        let result = writer.finish().unwrap();
        assert_eq!(result.directories_written, 1);
        assert_eq!(result.files_written, 1);
        assert_eq!(result.total_size, 5);
    }

    #[test]
    fn test_snapshot_excludes_itself() {
        let temp = tempfile::tempdir().unwrap();
        fs::write(temp.path().join("data.txt"), b"data").unwrap();
        let archive = temp.path().join("self.snap");

        let result = snapshot(temp.path(), &archive).unwrap();
        assert_eq!(result.entries_written, 1);

        let text = fs::read(&archive).unwrap();
        assert!(!String::from_utf8_lossy(&text).contains("self.snap"));
        assert_eq!(fs::metadata(&archive).unwrap().len(), result.archive_size);
    }

    #[test]
    fn test_snapshot_with_exclusions() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        fs::create_dir_all(source.join("target")).unwrap();
        fs::write(source.join("target/big.bin"), b"xxxx").unwrap();
        fs::write(source.join("main.rs"), b"fn main() {}").unwrap();

        let options = WriteOptions::new().exclude(source.join("target"));
        let result = snapshot_with_options(&source, temp.path().join("out.snap"), options).unwrap();
        assert_eq!(result.entries_written, 1);
        assert_eq!(result.total_size, 12);
    }

    #[test]
    fn test_snapshot_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let archive = temp.path().join("out.snap");
        let err = snapshot(temp.path().join("missing"), &archive).unwrap_err();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert!(!archive.exists());
    }

    #[test]
    fn test_snapshot_source_is_file() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("file");
        fs::write(&file, b"x").unwrap();
        let err = snapshot(&file, temp.path().join("out.snap")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_snapshot_rejects_unframeable_name() {
        let temp = tempfile::tempdir().unwrap();
        let source = temp.path().join("src");
        fs::create_dir(&source).unwrap();
        if fs::write(source.join("a|b"), b"x").is_err() {
            return; // file system does not allow '|'
        }
        let err = snapshot(&source, temp.path().join("out.snap")).unwrap_err();
        assert!(matches!(err, Error::InvalidArchivePath(_)));
    }
}
