//! Per-entry progress reporting for snapshot and restore.
//!
//! Both directions walk the archive one entry at a time and announce each
//! entry through a [`ProgressReporter`]. The CLI uses this to print every
//! path as it is processed; tests use [`StatisticsProgress`] to observe
//! what happened.
//!
//! # Example
//!
//! ```rust,no_run
//! use snapture::progress::StatisticsProgress;
//! use snapture::WriteOptions;
//!
//! let stats = StatisticsProgress::new();
//! let options = WriteOptions::new().progress(stats.clone());
//! snapture::snapshot_with_options("./project", "project.snap", options)?;
//! println!("{} entries", stats.statistics().entries.len());
//! # Ok::<(), snapture::Error>(())
//! ```

use std::sync::{Arc, Mutex};

/// IEC byte unit: 1 KiB = 1024 bytes.
pub const BYTES_KIB: u64 = 1024;

/// Receives per-entry notifications.
///
/// All methods have empty default implementations.
pub trait ProgressReporter: Send {
    /// Called before an entry is written or restored.
    ///
    /// `size` is the payload length, 0 for directories.
    fn on_entry_start(&mut self, entry_name: &str, size: u64) {
        let _ = (entry_name, size);
    }

    /// Called after an entry has been handled.
    ///
    /// `success` is false when a non-strict restore dropped the entry after
    /// a hash mismatch.
    fn on_entry_complete(&mut self, entry_name: &str, success: bool) {
        let _ = (entry_name, success);
    }

    /// Called for conditions that do not stop the operation, such as a
    /// skipped symlink or a permission that could not be applied.
    fn on_warning(&mut self, message: &str) {
        let _ = message;
    }
}

/// A no-op progress reporter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {}

/// What a [`StatisticsProgress`] has observed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Statistics {
    /// Entry names in the order they were started.
    pub entries: Vec<String>,
    /// Entries that completed unsuccessfully.
    pub failed: Vec<String>,
    /// Sum of the payload sizes announced at entry start.
    pub bytes: u64,
    /// Warning messages in order.
    pub warnings: Vec<String>,
}

/// A progress reporter that records everything it is told.
///
/// Clones share the same record, so one clone can be handed to the options
/// while another is kept for inspection.
#[derive(Debug, Default, Clone)]
pub struct StatisticsProgress {
    inner: Arc<Mutex<Statistics>>,
}

impl StatisticsProgress {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of what has been recorded so far.
    pub fn statistics(&self) -> Statistics {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Statistics> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl ProgressReporter for StatisticsProgress {
    fn on_entry_start(&mut self, entry_name: &str, size: u64) {
        let mut stats = self.lock();
        stats.entries.push(entry_name.to_string());
        stats.bytes += size;
    }

    fn on_entry_complete(&mut self, entry_name: &str, success: bool) {
        if !success {
            self.lock().failed.push(entry_name.to_string());
        }
    }

    fn on_warning(&mut self, message: &str) {
        self.lock().warnings.push(message.to_string());
    }
}
