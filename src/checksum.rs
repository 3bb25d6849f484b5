//! Content hashing.
//!
//! Every file record carries the SHA-256 digest of its payload, written as
//! 64 lowercase hex digits. This module computes those digests either in one
//! shot, by streaming a reader in [`READ_BUFFER_SIZE`] chunks, or while data
//! passes through a [`HashingWriter`].
//!
//! # Example
//!
//! ```rust
//! use snapture::checksum::ContentHash;
//!
//! let hash = ContentHash::compute(b"abc");
//! assert_eq!(
//!     hash.to_hex(),
//!     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
//! );
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::READ_BUFFER_SIZE;

/// Length of a hex-encoded digest in a record.
pub const HEX_DIGEST_LEN: usize = 64;

/// A SHA-256 content digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hashes a byte slice in one call.
    pub fn compute(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Hashes everything a reader yields, in [`READ_BUFFER_SIZE`] chunks.
    pub fn compute_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut hasher = Sha256::new();
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        loop {
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
        }
        Ok(Self(hasher.finalize().into()))
    }

    /// Hashes the contents of a file on disk.
    ///
    /// The file is streamed; memory use is bounded by the chunk size.
    pub fn compute_file(path: impl AsRef<Path>) -> io::Result<Self> {
        let mut file = File::open(path)?;
        Self::compute_reader(&mut file)
    }

    /// Parses a digest of exactly 64 lowercase hex digits.
    pub fn from_hex(s: &str) -> Option<Self> {
        let lowercase = s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
        if s.len() != HEX_DIGEST_LEN || !lowercase {
            return None;
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Returns the digest as 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.to_hex())
    }
}

/// A writer wrapper that computes SHA-256 while writing.
///
/// Restore streams each payload through one of these so the file is hashed
/// without a second read.
///
/// # Example
///
/// ```rust
/// use snapture::checksum::{ContentHash, HashingWriter};
/// use std::io::Write;
///
/// let mut buffer = Vec::new();
/// let mut writer = HashingWriter::new(&mut buffer);
/// writer.write_all(b"Hello, World!").unwrap();
///
/// assert_eq!(writer.bytes_written(), 13);
/// assert_eq!(writer.hash(), ContentHash::compute(b"Hello, World!"));
/// ```
pub struct HashingWriter<W> {
    inner: W,
    hasher: Sha256,
    bytes_written: u64,
}

impl<W> HashingWriter<W> {
    /// Creates a new hashing writer wrapping the given writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            hasher: Sha256::new(),
            bytes_written: 0,
        }
    }

    /// Returns the digest of everything written so far.
    pub fn hash(&self) -> ContentHash {
        ContentHash(self.hasher.clone().finalize().into())
    }

    /// Returns the number of bytes written.
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Consumes the wrapper and returns the inner writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for HashingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.hasher.update(&buf[..n]);
        self.bytes_written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const EMPTY_SHA256: &str = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    const ABC_SHA256: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn test_known_vectors() {
        assert_eq!(ContentHash::compute(b"").to_hex(), EMPTY_SHA256);
        assert_eq!(ContentHash::compute(b"abc").to_hex(), ABC_SHA256);
    }

    #[test]
    fn test_reader_matches_one_shot_across_chunks() {
        let data: Vec<u8> = (0..(READ_BUFFER_SIZE * 3 + 17))
            .map(|i| (i % 251) as u8)
            .collect();
        let streamed = ContentHash::compute_reader(&mut Cursor::new(&data)).unwrap();
        assert_eq!(streamed, ContentHash::compute(&data));
    }

    #[test]
    fn test_compute_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("abc.txt");
        std::fs::write(&path, b"abc").unwrap();
        assert_eq!(ContentHash::compute_file(&path).unwrap().to_hex(), ABC_SHA256);
    }

    #[test]
    fn test_compute_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContentHash::compute_file(dir.path().join("nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_hex_parse() {
        let hash = ContentHash::from_hex(ABC_SHA256).unwrap();
        assert_eq!(hash.to_string(), ABC_SHA256);

        assert!(ContentHash::from_hex(&ABC_SHA256.to_uppercase()).is_none());
        let mixed = format!("{}{}", ABC_SHA256[..32].to_uppercase(), &ABC_SHA256[32..]);
        assert!(ContentHash::from_hex(&mixed).is_none());

        assert!(ContentHash::from_hex("abc").is_none());
        assert!(ContentHash::from_hex(&"g".repeat(64)).is_none());
        assert!(ContentHash::from_hex(&"a".repeat(65)).is_none());
    }

    #[test]
    fn test_hashing_writer_incremental() {
        let mut writer = HashingWriter::new(Vec::new());
        writer.write_all(b"a").unwrap();
        writer.write_all(b"bc").unwrap();
        assert_eq!(writer.hash().to_hex(), ABC_SHA256);
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(writer.into_inner(), b"abc");
    }

    #[test]
    fn test_hashing_writer_empty() {
        let writer = HashingWriter::new(io::sink());
        assert_eq!(writer.hash().to_hex(), EMPTY_SHA256);
    }
}
