//! Deterministic directory tree traversal.
//!
//! Entries come out depth-first with siblings sorted by file name, so every
//! directory precedes its contents and repeated snapshots of an unchanged
//! tree are byte-identical. The root itself is never yielded, and symbolic
//! links are reported, not followed.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::options::ExclusionSet;
use crate::format::EntryKind;
use crate::{ArchivePath, Result};

/// One item produced by [`TreeWalk`].
#[derive(Debug)]
pub(crate) enum WalkItem {
    /// A directory or regular file to archive.
    Entry(TreeEntry),
    /// Something that cannot be archived, such as a symlink or socket.
    Skipped { path: PathBuf, reason: &'static str },
}

#[derive(Debug)]
pub(crate) struct TreeEntry {
    pub disk_path: PathBuf,
    pub archive_path: ArchivePath,
    pub kind: EntryKind,
    pub metadata: Metadata,
}

pub(crate) struct TreeWalk {
    root: PathBuf,
    inner: walkdir::IntoIter,
    exclusions: ExclusionSet,
}

impl TreeWalk {
    /// Starts a walk below `root`, which should be canonical so that
    /// yielded paths compare equal to canonical exclusions.
    pub(crate) fn new(root: &Path, exclusions: ExclusionSet) -> Self {
        let inner = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Self {
            root: root.to_path_buf(),
            inner,
            exclusions,
        }
    }

    fn classify(&mut self, entry: walkdir::DirEntry) -> Result<Option<WalkItem>> {
        let file_type = entry.file_type();

        if self.exclusions.contains(entry.path()) {
            log::debug!("Excluding '{}'", entry.path().display());
            if file_type.is_dir() {
                self.inner.skip_current_dir();
            }
            return Ok(None);
        }

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else {
            let reason = if file_type.is_symlink() {
                "symbolic link"
            } else {
                "not a regular file or directory"
            };
            return Ok(Some(WalkItem::Skipped {
                path: entry.into_path(),
                reason,
            }));
        };

        let relative = entry
            .path()
            .strip_prefix(&self.root)
            .map_err(|_| crate::Error::InvalidArchivePath(entry.path().display().to_string()))?;
        let archive_path = ArchivePath::from_relative(relative)?;
        let metadata = entry.metadata()?;

        Ok(Some(WalkItem::Entry(TreeEntry {
            disk_path: entry.into_path(),
            archive_path,
            kind,
            metadata,
        })))
    }
}

impl Iterator for TreeWalk {
    type Item = Result<WalkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            match self.classify(entry) {
                Ok(Some(item)) => return Some(Ok(item)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
