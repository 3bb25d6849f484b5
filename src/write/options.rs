//! Write options and results for archive creation.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::progress::ProgressReporter;

/// Options for creating archives.
///
/// # Example
///
/// ```rust
/// use snapture::WriteOptions;
///
/// let options = WriteOptions::new()
///     .exclude("target")
///     .exclude("/usr/local/bin/snapture");
/// assert_eq!(options.exclusions().len(), 2);
/// ```
#[derive(Default)]
pub struct WriteOptions {
    exclusions: Vec<PathBuf>,
    progress: Option<Box<dyn ProgressReporter>>,
}

impl std::fmt::Debug for WriteOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriteOptions")
            .field("exclusions", &self.exclusions)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl WriteOptions {
    /// Creates default options: no exclusions, no progress reporting.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a path to leave out of tree snapshots.
    ///
    /// Relative paths are resolved against the current directory. An
    /// excluded directory is skipped together with everything below it.
    /// The archive being written is always excluded and need not be listed.
    pub fn exclude(mut self, path: impl Into<PathBuf>) -> Self {
        self.exclusions.push(path.into());
        self
    }

    /// Sets a progress reporter notified for every entry.
    pub fn progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.progress = Some(Box::new(reporter));
        self
    }

    /// Returns the configured exclusions as given.
    pub fn exclusions(&self) -> &[PathBuf] {
        &self.exclusions
    }

    pub(crate) fn progress_mut(&mut self) -> Option<&mut (dyn ProgressReporter + 'static)> {
        self.progress.as_deref_mut()
    }
}

/// Canonical paths that a tree walk must not emit.
#[derive(Debug, Default, Clone)]
pub(crate) struct ExclusionSet {
    paths: HashSet<PathBuf>,
}

impl ExclusionSet {
    pub(crate) fn new<'a>(paths: impl IntoIterator<Item = &'a PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().map(|p| resolve(p)).collect(),
        }
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }
}

/// Canonicalizes a path if it exists, otherwise makes it absolute.
fn resolve(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Result of archive creation.
#[must_use = "write results should be checked to ensure archive was created successfully"]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Number of records written.
    pub entries_written: usize,
    /// Number of directory records written.
    pub directories_written: usize,
    /// Number of file records written.
    pub files_written: usize,
    /// Sum of all file payload sizes.
    pub total_size: u64,
    /// Total bytes written to the archive, framing included.
    pub archive_size: u64,
    /// Paths left out of a tree snapshot because they were not regular
    /// files or directories.
    pub skipped: Vec<PathBuf>,
}
