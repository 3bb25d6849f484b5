//! Destination path containment.
//!
//! Every entry is restored below the destination directory. Paths are
//! checked twice: syntactically when a record is parsed
//! ([`is_escaping`]), and against the real file system right before
//! anything is created ([`validate_extract_path`]), which also catches
//! symlinked directories already present in the destination.

use std::path::{Component, Path, PathBuf};

use crate::{ArchivePath, Error, Result};

/// Returns true if a raw path field is absolute or climbs with `..`.
///
/// On Windows, `\` also counts as a separator and a drive prefix such as
/// `C:` counts as absolute. Elsewhere both are ordinary name characters,
/// so `a:b.txt` or `x..\y` written on Unix restore on Unix.
pub fn is_escaping(raw: &str) -> bool {
    if raw.starts_with('/') {
        return true;
    }
    if cfg!(windows) {
        let bytes = raw.as_bytes();
        if raw.starts_with('\\')
            || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':')
        {
            return true;
        }
        return raw.split(['/', '\\']).any(|segment| segment == "..");
    }
    raw.split('/').any(|segment| segment == "..")
}

/// Resolves an entry path below `dest_root` and verifies it stays there.
///
/// `dest_root` must already exist and be canonical. Each segment must map
/// to exactly one normal path component on this platform. The deepest
/// existing ancestor of the result is canonicalized and must still be
/// inside `dest_root`.
///
/// # Errors
///
/// Returns [`Error::PathTraversal`] if the path would land outside
/// `dest_root`, or [`Error::Io`] if an existing ancestor cannot be
/// canonicalized.
pub fn validate_extract_path(
    archive_path: &ArchivePath,
    dest_root: &Path,
    entry_index: usize,
) -> Result<PathBuf> {
    let traversal = || Error::path_traversal(entry_index, archive_path.as_str());

    let mut full_path = dest_root.to_path_buf();
    for segment in archive_path.components() {
        let mut parts = Path::new(segment).components();
        match (parts.next(), parts.next()) {
            (Some(Component::Normal(_)), None) => full_path.push(segment),
            _ => return Err(traversal()),
        }
    }

    let mut ancestor = full_path.as_path();
    let mut missing = Vec::new();
    while ancestor.symlink_metadata().is_err() {
        match (ancestor.file_name(), ancestor.parent()) {
            (Some(name), Some(parent)) => {
                missing.push(name.to_os_string());
                ancestor = parent;
            }
            _ => return Err(traversal()),
        }
    }

    let mut resolved = ancestor.canonicalize()?;
    for name in missing.into_iter().rev() {
        resolved.push(name);
    }
    if !resolved.starts_with(dest_root) {
        return Err(traversal());
    }

    Ok(full_path)
}
