//! Permission bits stored in records.
//!
//! A record stores the low nine permission bits as exactly three octal
//! digits (`755`, `644`). Platforms without POSIX permissions still produce
//! valid records using fixed fallback modes, and skip applying modes on
//! restore.

use std::fmt;
use std::fs::Metadata;
use std::io;
use std::path::Path;

/// Whether this platform can read and apply POSIX permission bits.
pub const HAS_POSIX_PERMISSIONS: bool = cfg!(unix);

/// Permission bits of a file or directory, limited to `0o777`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u16);

impl FileMode {
    /// Mask of the bits a record can carry.
    pub const MASK: u16 = 0o777;

    /// Mode recorded for directories when the platform has no POSIX bits.
    pub const DIRECTORY_FALLBACK: FileMode = FileMode(0o777);

    /// Mode recorded for files when the platform has no POSIX bits.
    pub const FILE_FALLBACK: FileMode = FileMode(0o666);

    /// Creates a mode, keeping only the low nine bits.
    pub const fn new(bits: u32) -> Self {
        Self((bits & Self::MASK as u32) as u16)
    }

    /// Returns the raw permission bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Reads the mode from file system metadata.
    ///
    /// Off POSIX this returns the fallback for the entry's kind.
    pub fn from_metadata(meta: &Metadata) -> Self {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            Self::new(meta.permissions().mode())
        }
        #[cfg(not(unix))]
        {
            if meta.is_dir() {
                Self::DIRECTORY_FALLBACK
            } else {
                Self::FILE_FALLBACK
            }
        }
    }

    /// Parses the three-octal-digit field of a record.
    ///
    /// Anything other than exactly three digits `0`-`7` is rejected.
    pub fn parse_octal(field: &str) -> Option<Self> {
        let bytes = field.as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(|b| (b'0'..=b'7').contains(b)) {
            return None;
        }
        u16::from_str_radix(field, 8).ok().map(FileMode)
    }

    /// Applies the mode to a path on disk.
    ///
    /// A no-op returning `Ok(())` when [`HAS_POSIX_PERMISSIONS`] is false.
    pub fn apply_to_path(self, path: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(u32::from(self.0)))
        }
        #[cfg(not(unix))]
        {
            let _ = path;
            Ok(())
        }
    }
}

impl fmt::Display for FileMode {
    /// Formats as exactly three octal digits, as stored in records.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03o}", self.0)
    }
}
