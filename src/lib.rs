//! # snapture
//!
//! Single-file snapshots of directory trees.
//!
//! A snapshot archive stores every directory and regular file below a root
//! as a flat sequence of text metadata lines and raw payloads, each file
//! carrying the SHA-256 digest of its content. Restoring verifies every
//! file against its digest; listing reads only the metadata lines.
//!
//! ## Quick Start
//!
//! ### Taking a Snapshot
//!
//! ```rust,no_run
//! use snapture::Result;
//!
//! fn main() -> Result<()> {
//!     let result = snapture::snapshot("./project", "project.snap")?;
//!     println!(
//!         "{} directories, {} files, {} bytes",
//!         result.directories_written, result.files_written, result.archive_size
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ### Restoring
//!
//! ```rust,no_run
//! use snapture::{Error, Result};
//!
//! fn main() -> Result<()> {
//!     // Strict: stop at the first file whose hash does not match.
//!     match snapture::restore("project.snap", "./restored", true) {
//!         Ok(result) => println!("{} entries restored", result.entries_restored()),
//!         Err(Error::HashMismatch { path, .. }) => eprintln!("{} - Hash mismatch!", path),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Listing
//!
//! ```rust,no_run
//! for entry in snapture::list_contents("project.snap")? {
//!     println!("{}", entry);
//! }
//! # Ok::<(), snapture::Error>(())
//! ```
//!
//! ## Archive Format
//!
//! See the [`format`] module. In short, every record is a line
//! `path|kind|permissions|size|hash`, and file lines are followed by the raw
//! content and a newline:
//!
//! ```text
//! subdir|d|755|0|
//! subdir/nested_file.txt|f|644|5|2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824
//! hello
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`], an alias for
//! `std::result::Result<T, Error>`. Malformed archives produce
//! [`Error::CorruptRecord`] with the byte offset of the problem; entries
//! that would escape the destination produce [`Error::PathTraversal`].
//!
//! ## Safety
//!
//! - **Path traversal protection**: absolute paths and `..` segments are
//!   rejected before anything is written, and every destination path is
//!   checked against symlinks already present in the destination.
//! - **Integrity verification**: every restored file is hashed while it is
//!   written; mismatching files are deleted.
//! - **Self-exclusion**: an archive written inside the tree it snapshots
//!   never contains itself.
//!
//! ## Platform Support
//!
//! Permission bits are read and applied where POSIX permissions exist
//! ([`mode::HAS_POSIX_PERMISSIONS`]). Elsewhere directories are recorded as
//! `777`, files as `666`, and permissions are not applied on restore.
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod archive_path;
pub mod checksum;
pub mod error;
pub mod format;
pub mod mode;
pub mod progress;
pub mod read;
pub mod safety;
pub mod write;

pub use archive_path::ArchivePath;
pub use checksum::ContentHash;
pub use error::{Error, Result};
pub use format::{EntryKind, Record};
pub use mode::FileMode;

pub use read::{
    ArchiveReader, HashMismatch, ListedEntry, RestoreOptions, RestoreResult, list_contents,
    restore, restore_with_options,
};
pub use write::{WriteOptions, WriteResult, Writer, snapshot, snapshot_with_options};

pub use progress::{NoProgress, ProgressReporter, StatisticsProgress};
pub use safety::validate_extract_path;
