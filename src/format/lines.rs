//! Buffered line reader with one line of lookahead.
//!
//! Metadata lines and raw payload bytes share one byte stream. The reader
//! hands out lines with [`peek_line`](LineReader::peek_line) and only
//! consumes them on [`advance`](LineReader::advance), so a caller can look at
//! a line before deciding what it is. Payload bytes are read directly from
//! the underlying buffer with [`copy_exact`](LineReader::copy_exact).

use std::io::{self, BufRead, Read, Write};

use super::{LINE_TERMINATOR, MAX_LINE_LENGTH};
use crate::{Error, Result};

/// Reads `\n`-terminated lines and raw byte runs from a buffered source.
#[derive(Debug)]
pub struct LineReader<R> {
    inner: R,
    line: Vec<u8>,
    peeked: bool,
    position: u64,
}

impl<R: BufRead> LineReader<R> {
    /// Creates a line reader over a buffered source.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: Vec::new(),
            peeked: false,
            position: 0,
        }
    }

    /// Returns the next line without consuming it.
    ///
    /// The terminator (`\n` or `\r\n`) is stripped. Returns `None` at end of
    /// input. Repeated calls return the same line until
    /// [`advance`](Self::advance) is called.
    pub fn peek_line(&mut self) -> Result<Option<&[u8]>> {
        if !self.peeked {
            self.line.clear();
            let limit = MAX_LINE_LENGTH as u64 + 1;
            let n = (&mut self.inner)
                .take(limit)
                .read_until(LINE_TERMINATOR, &mut self.line)?;
            if n == 0 {
                return Ok(None);
            }
            if self.line.len() > MAX_LINE_LENGTH && self.line.last() != Some(&LINE_TERMINATOR)
            {
                return Err(Error::corrupt_record(
                    self.position,
                    format!("record line exceeds {} bytes", MAX_LINE_LENGTH),
                ));
            }
            self.peeked = true;
        }
        Ok(Some(strip_terminator(&self.line)))
    }

    /// Consumes the line returned by the last [`peek_line`](Self::peek_line).
    ///
    /// Does nothing if no line is pending.
    pub fn advance(&mut self) {
        if self.peeked {
            self.position += self.line.len() as u64;
            self.peeked = false;
        }
    }

    /// Consumes lines until the next non-blank line or end of input.
    ///
    /// A line is blank when it is empty or consists only of ASCII whitespace.
    pub fn skip_blank_lines(&mut self) -> Result<()> {
        while let Some(line) = self.peek_line()? {
            if !is_blank(line) {
                break;
            }
            self.advance();
        }
        Ok(())
    }

    /// Copies up to `len` raw bytes to `out` and returns how many were
    /// copied.
    ///
    /// Fewer than `len` bytes means the input ended early. Must not be
    /// called while a line is peeked.
    pub fn copy_exact<W: Write + ?Sized>(&mut self, len: u64, out: &mut W) -> Result<u64> {
        debug_assert!(!self.peeked, "payload read with a peeked line pending");
        let copied = io::copy(&mut (&mut self.inner).take(len), out)?;
        self.position += copied;
        Ok(copied)
    }

    /// Byte offset of the next unconsumed byte.
    ///
    /// A peeked but not yet advanced line is still unconsumed.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Marks `n` bytes as consumed after the caller moved the source forward
    /// directly.
    pub(crate) fn skipped(&mut self, n: u64) {
        self.position += n;
    }

    /// Returns a mutable reference to the underlying source.
    ///
    /// Fails loudly in debug builds if a line is peeked, since that line's
    /// bytes have already left the source.
    pub(crate) fn get_mut(&mut self) -> &mut R {
        debug_assert!(!self.peeked, "source accessed with a peeked line pending");
        &mut self.inner
    }
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Returns true for lines that separate records and carry no data.
pub fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}
