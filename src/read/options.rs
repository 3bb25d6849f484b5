//! Options for restoring archives.

use crate::progress::ProgressReporter;

/// Options for restore operations.
///
/// # Example
///
/// ```rust
/// use snapture::RestoreOptions;
///
/// // Keep going past corrupted files instead of stopping at the first one.
/// let options = RestoreOptions::new().strict(false);
/// assert!(!options.is_strict());
/// ```
pub struct RestoreOptions {
    strict: bool,
    apply_permissions: bool,
    progress: Option<Box<dyn ProgressReporter>>,
}

impl Default for RestoreOptions {
    fn default() -> Self {
        Self {
            strict: true,
            apply_permissions: true,
            progress: None,
        }
    }
}

impl std::fmt::Debug for RestoreOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreOptions")
            .field("strict", &self.strict)
            .field("apply_permissions", &self.apply_permissions)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

impl RestoreOptions {
    /// Creates default options: strict, permissions applied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether a hash mismatch aborts the restore.
    ///
    /// When strict (the default), the first mismatching file is deleted and
    /// the restore stops with [`Error::HashMismatch`](crate::Error::HashMismatch).
    /// Otherwise the file is deleted, recorded in
    /// [`RestoreResult::mismatches`](crate::RestoreResult::mismatches), and
    /// the remaining entries are restored.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets whether recorded permission bits are applied.
    ///
    /// Has no effect on platforms without POSIX permissions.
    pub fn apply_permissions(mut self, apply: bool) -> Self {
        self.apply_permissions = apply;
        self
    }

    /// Sets a progress reporter notified for every entry.
    pub fn progress(mut self, reporter: impl ProgressReporter + 'static) -> Self {
        self.progress = Some(Box::new(reporter));
        self
    }

    /// Returns whether a hash mismatch aborts the restore.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    pub(crate) fn applies_permissions(&self) -> bool {
        self.apply_permissions
    }

    pub(crate) fn progress_mut(&mut self) -> Option<&mut (dyn ProgressReporter + 'static)> {
        self.progress.as_deref_mut()
    }
}
