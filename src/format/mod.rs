//! Snapshot archive framing.
//!
//! An archive is a flat sequence of records. Each record starts with one
//! metadata line of five `|`-separated fields:
//!
//! ```text
//! path|kind|permissions|size|hash\n
//! ```
//!
//! - `kind` is `d` (directory) or `f` (file)
//! - `permissions` is exactly three octal digits
//! - `size` is decimal, `0` for directories
//! - `hash` is the 64-digit lowercase hex SHA-256 of the content, empty for
//!   directories. Uppercase digits make the record corrupt.
//!
//! A file line is followed by exactly `size` raw payload bytes and a single
//! `\n`. Blank lines between records are ignored, and end of input is
//! reached when no non-blank line remains.

pub mod lines;
pub mod record;

pub use lines::LineReader;
pub use record::{EntryKind, Record};

/// Separator between the fields of a metadata line.
pub const FIELD_SEPARATOR: char = '|';

/// Terminator of metadata lines and payloads.
pub const LINE_TERMINATOR: u8 = b'\n';

/// Number of fields in a metadata line.
pub const FIELD_COUNT: usize = 5;

/// Upper bound on the length of a metadata line, terminator included.
///
/// Covers the longest legal path plus the remaining fields.
pub const MAX_LINE_LENGTH: usize = 32768 + 128;
