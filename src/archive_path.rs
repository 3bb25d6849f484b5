//! Archive path type with validation for secure path handling.

use crate::{Error, Result};
use std::fmt;
use std::path::{Component, Path};

/// Maximum length for archive paths (in bytes).
///
/// Well above any real file system limit (Linux PATH_MAX is 4KB). Guards
/// against hostile archives carrying enormous path fields.
const MAX_PATH_LENGTH: usize = 32768;

/// Characters that would break record framing if they appeared in a path.
const RESERVED_CHARS: &[char] = &['|', '\n', '\r'];

/// A validated, relative, `/`-separated entry path.
///
/// `ArchivePath` validates that:
/// - No NUL bytes, `|` or line breaks are present
/// - The path is not absolute (does not start with `/`)
/// - No empty segments exist (no `//` or trailing `/`)
/// - No `.` or `..` segments are present
///
/// The root of a snapshot is implicit and never has an `ArchivePath`.
///
/// # Examples
///
/// ```
/// use snapture::ArchivePath;
///
/// let path = ArchivePath::new("dir/file.txt").unwrap();
/// assert_eq!(path.as_str(), "dir/file.txt");
///
/// assert!(ArchivePath::new("../secret").is_err());
/// assert!(ArchivePath::new("/absolute/path").is_err());
/// assert!(ArchivePath::new("a|b").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchivePath(String);

impl ArchivePath {
    /// Creates a new `ArchivePath` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArchivePath`] if the path is empty, absolute,
    /// contains reserved characters, empty segments, or `.`/`..` segments.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Builds an archive path from a native path relative to the snapshot
    /// root.
    ///
    /// Each component must be a normal, UTF-8 name. Separators are
    /// normalized to `/`.
    pub fn from_relative(path: &Path) -> Result<Self> {
        let mut segments = Vec::new();
        for component in path.components() {
            match component {
                Component::Normal(name) => {
                    let name = name.to_str().ok_or_else(|| {
                        Error::InvalidArchivePath(format!(
                            "non UTF-8 name in '{}'",
                            path.display()
                        ))
                    })?;
                    segments.push(name);
                }
                Component::CurDir => {}
                _ => {
                    return Err(Error::InvalidArchivePath(format!(
                        "'{}' is not relative to the snapshot root",
                        path.display()
                    )));
                }
            }
        }
        Self::new(&segments.join("/"))
    }

    fn validate(s: &str) -> Result<()> {
        if s.contains('\0') {
            return Err(Error::InvalidArchivePath("contains NUL byte".into()));
        }

        if s.is_empty() {
            return Err(Error::InvalidArchivePath("empty path".into()));
        }

        if s.len() > MAX_PATH_LENGTH {
            return Err(Error::InvalidArchivePath(format!(
                "path exceeds maximum length of {} bytes",
                MAX_PATH_LENGTH
            )));
        }

        if let Some(c) = s.chars().find(|c| RESERVED_CHARS.contains(c)) {
            return Err(Error::InvalidArchivePath(format!(
                "reserved character {:?} in '{}'",
                c,
                s.escape_debug()
            )));
        }

        if s.starts_with('/') {
            return Err(Error::InvalidArchivePath(
                "absolute path not allowed".into(),
            ));
        }

        if s.ends_with('/') {
            return Err(Error::InvalidArchivePath(
                "trailing slash not allowed".into(),
            ));
        }

        for segment in s.split('/') {
            if segment.is_empty() {
                return Err(Error::InvalidArchivePath(
                    "empty segment (consecutive slashes)".into(),
                ));
            }
            if segment == "." {
                return Err(Error::InvalidArchivePath("'.' segment not allowed".into()));
            }
            if segment == ".." {
                return Err(Error::InvalidArchivePath(
                    "'..' segment not allowed (path traversal)".into(),
                ));
            }
        }

        Ok(())
    }

    /// Returns the path as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns an iterator over the path segments.
    pub(crate) fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl AsRef<str> for ArchivePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArchivePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<&str> for ArchivePath {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ArchivePath {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::validate(&s)?;
        Ok(Self(s))
    }
}
