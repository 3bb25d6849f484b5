//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use snapture::{ArchivePath, ContentHash, FileMode, WriteResult, Writer};
use tempfile::TempDir;
use walkdir::WalkDir;

/// What a tree looks like on disk: relative path to `None` for a directory
/// or `Some(content)` for a file.
pub type TreeContents = BTreeMap<String, Option<Vec<u8>>>;

/// Creates the files and directories described by `entries` below `root`.
///
/// A name ending in `/` is a directory; anything else is a file whose
/// parents are created as needed.
pub fn build_tree(root: &Path, entries: &[(&str, &[u8])]) {
    for (name, content) in entries {
        if let Some(dir) = name.strip_suffix('/') {
            fs::create_dir_all(root.join(dir)).expect("create directory");
        } else {
            let path = root.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("create parent");
            }
            fs::write(&path, content).expect("write file");
        }
    }
}

/// The tree used by the end-to-end scenario: one top-level file, one
/// nested file and one empty directory.
pub fn sample_tree() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    build_tree(
        temp.path(),
        &[
            ("test_file.txt", b"This is a test file."),
            ("subdir/nested_file.txt", b"This is a nested file."),
            ("empty/", b""),
        ],
    );
    temp
}

/// Reads every directory and file below `root` into a map.
pub fn read_tree(root: &Path) -> TreeContents {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| entry.expect("walk tree"))
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("entry below root")
                .to_string_lossy()
                .replace('\\', "/");
            let content = if entry.file_type().is_dir() {
                None
            } else {
                Some(fs::read(entry.path()).expect("read file"))
            };
            (relative, content)
        })
        .collect()
}

/// Snapshots `source` into `<scratch>/archive.snap` and returns the archive
/// path together with the write result.
pub fn snapshot_into(source: &Path, scratch: &Path) -> (PathBuf, WriteResult) {
    let archive = scratch.join("archive.snap");
    let result = snapture::snapshot(source, &archive).expect("snapshot");
    (archive, result)
}

/// Builds an archive in memory from `(path, content)` pairs.
///
/// A path ending in `/` becomes a directory record with mode 755; anything
/// else a file record with mode 644.
pub fn create_archive(entries: &[(&str, &[u8])]) -> snapture::Result<Vec<u8>> {
    let mut writer = Writer::create(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if let Some(dir) = name.strip_suffix('/') {
            writer.add_directory(ArchivePath::new(dir)?, FileMode::new(0o755))?;
        } else {
            writer.add_bytes(ArchivePath::new(name)?, FileMode::new(0o644), data)?;
        }
    }
    let (_, cursor) = writer.finish_into_inner()?;
    Ok(cursor.into_inner())
}

/// Formats a file record line by hand, with a caller-chosen hash.
pub fn file_line(path: &str, size: usize, hash: &ContentHash) -> String {
    format!("{}|f|644|{}|{}\n", path, size, hash)
}

/// Formats a complete file record with a correct hash.
pub fn file_record(path: &str, content: &[u8]) -> Vec<u8> {
    let mut out = file_line(path, content.len(), &ContentHash::compute(content)).into_bytes();
    out.extend_from_slice(content);
    out.push(b'\n');
    out
}

/// Writes `bytes` to `<dir>/name` and returns the path.
pub fn write_archive(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).expect("write archive");
    path
}
