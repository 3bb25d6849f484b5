//! End-to-end snapshot and restore tests.
//!
//! These tests take real directory trees through `snapshot` and `restore`
//! and compare the result on disk.

mod common;

use std::fs;

use snapture::progress::StatisticsProgress;
use snapture::{
    ContentHash, RestoreOptions, WriteOptions, restore, restore_with_options, snapshot,
    snapshot_with_options,
};
use tempfile::TempDir;

use common::{build_tree, read_tree, sample_tree, snapshot_into};

// =============================================================================
// Basic Round-Trip
// =============================================================================

#[test]
fn test_snapshot_restore_sample_tree() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let (archive, result) = snapshot_into(source.path(), scratch.path());

    assert_eq!(result.directories_written, 2);
    assert_eq!(result.files_written, 2);
    assert_eq!(result.archive_size, fs::metadata(&archive).unwrap().len());

    let output = scratch.path().join("restored");
    let restored = restore(&archive, &output, true).unwrap();
    assert!(restored.is_ok());
    assert_eq!(restored.files_restored, 2);
    assert_eq!(restored.directories_restored, 2);

    assert_eq!(
        fs::read_to_string(output.join("test_file.txt")).unwrap(),
        "This is a test file."
    );
    assert_eq!(
        fs::read_to_string(output.join("subdir/nested_file.txt")).unwrap(),
        "This is a nested file."
    );
    assert!(output.join("empty").is_dir());
    assert_eq!(fs::read_dir(output.join("empty")).unwrap().count(), 0);
}

#[test]
fn test_restored_hashes_match_source() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());

    let output = scratch.path().join("restored");
    restore(&archive, &output, true).unwrap();

    for name in ["test_file.txt", "subdir/nested_file.txt"] {
        assert_eq!(
            ContentHash::compute_file(source.path().join(name)).unwrap(),
            ContentHash::compute_file(output.join(name)).unwrap(),
            "hash differs for {}",
            name
        );
    }
}

#[test]
fn test_tree_contents_identical() {
    let source = TempDir::new().unwrap();
    build_tree(
        source.path(),
        &[
            ("a/b/c/deep.bin", &[0u8, 1, 2, 255, b'\n', b'|']),
            ("a/empty.txt", b""),
            ("a/lines.txt", b"one\ntwo\n\nthree|d|755|0|\n"),
            ("z/", b""),
            ("unicode_\u{00e9}t\u{00e9}.txt", "caf\u{00e9}".as_bytes()),
        ],
    );
    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());

    let output = scratch.path().join("out");
    restore(&archive, &output, true).unwrap();

    assert_eq!(read_tree(source.path()), read_tree(&output));
}

#[test]
fn test_large_file_roundtrip() {
    let source = TempDir::new().unwrap();
    let content: Vec<u8> = (0..300_000u32).map(|i| (i % 251) as u8).collect();
    build_tree(source.path(), &[("big.bin", &content)]);

    let scratch = TempDir::new().unwrap();
    let (archive, result) = snapshot_into(source.path(), scratch.path());
    assert_eq!(result.total_size, content.len() as u64);

    let output = scratch.path().join("out");
    let restored = restore(&archive, &output, true).unwrap();
    assert_eq!(restored.bytes_restored, content.len() as u64);
    assert_eq!(fs::read(output.join("big.bin")).unwrap(), content);
}

#[test]
fn test_empty_tree_roundtrip() {
    let source = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let (archive, result) = snapshot_into(source.path(), scratch.path());

    assert_eq!(result.entries_written, 0);
    assert_eq!(fs::metadata(&archive).unwrap().len(), 0);

    let output = scratch.path().join("out");
    let restored = restore(&archive, &output, true).unwrap();
    assert_eq!(restored.entries_restored(), 0);
    assert!(output.is_dir());
}

#[test]
fn test_restore_twice_is_idempotent() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());

    let output = scratch.path().join("out");
    restore(&archive, &output, true).unwrap();
    let first = read_tree(&output);
    restore(&archive, &output, true).unwrap();
    assert_eq!(first, read_tree(&output));
}

#[test]
fn test_restore_overwrites_existing_files() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());

    let output = scratch.path().join("out");
    build_tree(&output, &[("test_file.txt", b"stale content that is longer")]);
    restore(&archive, &output, true).unwrap();
    assert_eq!(
        fs::read_to_string(output.join("test_file.txt")).unwrap(),
        "This is a test file."
    );
}

// =============================================================================
// Ordering and Exclusion
// =============================================================================

#[test]
fn test_parents_precede_children() {
    let source = TempDir::new().unwrap();
    build_tree(source.path(), &[("b/x/y.txt", b"1"), ("a/z.txt", b"2"), ("c.txt", b"3")]);
    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());

    let entries = snapture::list_contents(&archive).unwrap();
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    for (i, path) in paths.iter().enumerate() {
        let mut ancestor = *path;
        while let Some((parent, _)) = ancestor.rsplit_once('/') {
            let position = paths.iter().position(|p| *p == parent);
            assert!(
                matches!(position, Some(j) if j < i),
                "{} listed before its parent {}",
                path,
                parent
            );
            ancestor = parent;
        }
    }
}

#[test]
fn test_snapshot_is_deterministic() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let first = scratch.path().join("one.snap");
    let second = scratch.path().join("two.snap");
    snapshot(source.path(), &first).unwrap();
    snapshot(source.path(), &second).unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn test_archive_inside_source_excluded() {
    let source = sample_tree();
    let archive = source.path().join("self.snap");
    snapshot(source.path(), &archive).unwrap();

    let entries = snapture::list_contents(&archive).unwrap();
    assert!(entries.iter().all(|e| e.path.as_str() != "self.snap"));

    let scratch = TempDir::new().unwrap();
    let output = scratch.path().join("out");
    restore(&archive, &output, true).unwrap();
    assert!(!output.join("self.snap").exists());
    assert!(output.join("test_file.txt").is_file());
}

#[test]
fn test_explicit_exclusion() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let archive = scratch.path().join("a.snap");
    let options = WriteOptions::new().exclude(source.path().join("subdir"));
    let result = snapshot_with_options(source.path(), &archive, options).unwrap();
    assert_eq!(result.files_written, 1);

    let entries = snapture::list_contents(&archive).unwrap();
    assert!(entries.iter().all(|e| !e.path.as_str().starts_with("subdir")));
}

// =============================================================================
// Progress Reporting
// =============================================================================

#[test]
fn test_progress_sees_every_entry() {
    let source = sample_tree();
    let scratch = TempDir::new().unwrap();
    let archive = scratch.path().join("a.snap");

    let written = StatisticsProgress::new();
    snapshot_with_options(source.path(), &archive, WriteOptions::new().progress(written.clone())).unwrap();

    let restored = StatisticsProgress::new();
    let options = RestoreOptions::new().progress(restored.clone());
    restore_with_options(&archive, scratch.path().join("out"), options).unwrap();

    let written = written.statistics();
    let restored = restored.statistics();
    assert_eq!(written.entries.len(), 4);
    assert_eq!(written.entries, restored.entries);
    assert_eq!(written.bytes, restored.bytes);
    assert!(restored.failed.is_empty());
}

// =============================================================================
// Unusual Names
// =============================================================================

#[cfg(unix)]
#[test]
fn test_colon_and_backslash_names_roundtrip() {
    let source = TempDir::new().unwrap();
    build_tree(
        source.path(),
        &[
            ("a:b.txt", b"colon"),
            ("C:evil", b"drive-like"),
            ("x..\\y", b"backslash"),
            ("dir/..\\z", b"nested"),
        ],
    );

    let scratch = TempDir::new().unwrap();
    let (archive, result) = snapshot_into(source.path(), scratch.path());
    assert_eq!(result.files_written, 4);

    let listed: Vec<String> = snapture::list_contents(&archive)
        .unwrap()
        .iter()
        .map(|e| e.path.to_string())
        .collect();
    assert!(listed.contains(&"a:b.txt".to_string()));
    assert!(listed.contains(&"x..\\y".to_string()));

    let output = scratch.path().join("out");
    let restored = restore(&archive, &output, true).unwrap();
    assert!(restored.is_ok());
    assert_eq!(fs::read(output.join("a:b.txt")).unwrap(), b"colon");
    assert_eq!(read_tree(source.path()), read_tree(&output));
}

// =============================================================================
// Permissions
// =============================================================================

#[cfg(unix)]
#[test]
fn test_permissions_roundtrip() {
    use std::os::unix::fs::PermissionsExt;

    let source = TempDir::new().unwrap();
    build_tree(source.path(), &[("script.sh", b"#!/bin/sh\n"), ("private/key", b"k")]);
    fs::set_permissions(source.path().join("script.sh"), fs::Permissions::from_mode(0o750)).unwrap();
    fs::set_permissions(source.path().join("private/key"), fs::Permissions::from_mode(0o600)).unwrap();
    fs::set_permissions(source.path().join("private"), fs::Permissions::from_mode(0o700)).unwrap();

    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());
    let output = scratch.path().join("out");
    restore(&archive, &output, true).unwrap();

    let mode = |p: &str| fs::metadata(output.join(p)).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode("script.sh"), 0o750);
    assert_eq!(mode("private/key"), 0o600);
    assert_eq!(mode("private"), 0o700);
}

#[cfg(unix)]
#[test]
fn test_read_only_directory_restored_with_contents() {
    use std::os::unix::fs::PermissionsExt;

    let source = TempDir::new().unwrap();
    build_tree(source.path(), &[("locked/inner.txt", b"inside")]);
    fs::set_permissions(source.path().join("locked"), fs::Permissions::from_mode(0o555)).unwrap();

    let scratch = TempDir::new().unwrap();
    let (archive, _) = snapshot_into(source.path(), scratch.path());
    let output = scratch.path().join("out");
    restore(&archive, &output, true).unwrap();

    assert_eq!(fs::read(output.join("locked/inner.txt")).unwrap(), b"inside");
    let mode = fs::metadata(output.join("locked")).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode, 0o555);

    // Let TempDir clean up.
    fs::set_permissions(source.path().join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
    fs::set_permissions(output.join("locked"), fs::Permissions::from_mode(0o755)).unwrap();
}

#[cfg(unix)]
#[test]
fn test_symlinks_skipped() {
    let source = sample_tree();
    std::os::unix::fs::symlink("test_file.txt", source.path().join("link")).unwrap();

    let scratch = TempDir::new().unwrap();
    let (archive, result) = snapshot_into(source.path(), scratch.path());
    assert_eq!(result.skipped.len(), 1);

    let entries = snapture::list_contents(&archive).unwrap();
    assert!(entries.iter().all(|e| e.path.as_str() != "link"));
}
