//! The UTF-8 reader (spec §4.1).
//!
//! `Reader<S>` presents a forward-only, position-tracking view over bytes
//! pulled from a [`ByteSource`] on demand. It never retains more than a
//! small lookahead window: bytes are dropped from the front as soon as they
//! are consumed and no longer needed for lookahead, keeping reader memory
//! bounded independent of input size (spec §5 "Memory is bounded by: the
//! reader window (fixed), ...").
//!
//! Grounded on the teacher's `buffer.rs` ring/queue (`copy_while`,
//! compact-when-half-drained) and the lookahead contract documented in the
//! teacher's (orphaned) `parser/byte_buffer.rs` design note.
use alloc::vec::Vec;

use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    io::{ByteSource, IoError},
    position::Position,
};

/// Once more than this many bytes have been consumed *and* they are more
/// than half of the window, drop them to keep the window from growing
/// without bound on long inputs with no lookahead pressure.
const COMPACT_THRESHOLD: usize = 4096;

/// A forward-only, position-tracking reader over a [`ByteSource`].
pub(crate) struct Reader<S: ByteSource> {
    source: S,
    window: Vec<u8>,
    pos: usize,
    position: Position,
    source_eof: bool,
}

impl<S: ByteSource> Reader<S> {
    pub(crate) fn new(source: S) -> Self {
        Self {
            source,
            window: Vec::new(),
            pos: 0,
            position: Position::start(),
            source_eof: false,
        }
    }

    /// The position of the next unread byte.
    pub(crate) fn position(&self) -> Position {
        self.position
    }

    /// Total bytes consumed so far (equal to `position().byte_offset`).
    pub(crate) fn bytes_read(&self) -> u64 {
        self.position.byte_offset
    }

    fn ensure(&mut self, n: usize) -> Result<(), IoError> {
        while !self.source_eof && self.window.len() - self.pos < n {
            let got = self.source.fill(&mut self.window)?;
            if got == 0 {
                self.source_eof = true;
            }
        }
        Ok(())
    }

    /// Returns the byte `n` positions ahead of the cursor (0 = next unread
    /// byte) without consuming it.
    pub(crate) fn peek(&mut self, n: usize) -> Result<Option<u8>, IoError> {
        self.ensure(n + 1)?;
        Ok(self.window.get(self.pos + n).copied())
    }

    /// Returns up to `n` unread bytes from the cursor without consuming
    /// them. The returned slice may be shorter than `n` at end of stream.
    pub(crate) fn peek_slice(&mut self, n: usize) -> Result<&[u8], IoError> {
        self.ensure(n)?;
        let end = (self.pos + n).min(self.window.len());
        Ok(&self.window[self.pos..end])
    }

    /// Returns `true` if the unread input starts with `pat`.
    pub(crate) fn starts_with(&mut self, pat: &[u8]) -> Result<bool, IoError> {
        Ok(self.peek_slice(pat.len())? == pat)
    }

    /// Returns `true` once the source is exhausted and no buffered bytes
    /// remain.
    pub(crate) fn is_eof(&mut self) -> Result<bool, IoError> {
        self.ensure(1)?;
        Ok(self.pos >= self.window.len())
    }

    fn compact(&mut self) {
        if self.pos > COMPACT_THRESHOLD && self.pos > self.window.len() / 2 {
            self.window.drain(..self.pos);
            self.pos = 0;
        }
    }

    /// Consumes and returns exactly one raw byte, updating position. A bare
    /// `\r` not followed by `\n` counts as a newline itself; `\r\n` counts
    /// as a single newline charged to the `\n`.
    fn next_raw_byte(&mut self) -> Result<Option<u8>, IoError> {
        self.ensure(2)?;
        if self.pos >= self.window.len() {
            return Ok(None);
        }
        let b = self.window[self.pos];
        self.pos += 1;
        match b {
            b'\n' => self.position.advance_newline(),
            b'\r' => {
                let next_is_lf = self.window.get(self.pos).copied() == Some(b'\n');
                if next_is_lf {
                    self.position.advance_byte(false);
                } else {
                    self.position.advance_newline();
                }
            }
            _ => {
                let is_continuation = b & 0b1100_0000 == 0b1000_0000;
                self.position.advance_byte(is_continuation);
            }
        }
        self.compact();
        Ok(Some(b))
    }

    /// Consumes `n` raw bytes. Callers must only use this for ASCII
    /// structural bytes already confirmed present via `peek`/`starts_with`.
    pub(crate) fn advance(&mut self, n: usize) -> Result<(), IoError> {
        for _ in 0..n {
            self.next_raw_byte()?;
        }
        Ok(())
    }

    /// Decodes and consumes one UTF-8 scalar (1-4 bytes), or returns `Ok(None)`
    /// at end of stream. Invalid UTF-8 is reported as `ENCODING_INVALID`
    /// (or `ENCODING_TRUNCATED` if input simply ran out mid-scalar); parsing
    /// must halt on either.
    pub(crate) fn advance_char(&mut self) -> Result<Option<char>, ReaderFailure> {
        let Some(lead) = self.peek(0)? else {
            return Ok(None);
        };
        let len = utf8_len(lead).ok_or(ReaderFailure::Invalid(self.position))?;
        if len == 1 {
            self.next_raw_byte()?;
            return Ok(Some(lead as char));
        }

        let bytes = self.peek_slice(len)?;
        if bytes.len() < len {
            return Err(ReaderFailure::Truncated);
        }
        let ch = core::str::from_utf8(bytes)
            .ok()
            .and_then(|s| s.chars().next())
            .filter(|c| c.len_utf8() == len)
            .ok_or(ReaderFailure::Invalid(self.position))?;
        for _ in 0..len {
            self.next_raw_byte()?;
        }
        Ok(Some(ch))
    }
}

/// Determines the total byte length of a UTF-8 scalar from its leading
/// byte, or `None` if the leading byte cannot start a valid scalar.
fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0x00..=0x7f => Some(1),
        0xc2..=0xdf => Some(2),
        0xe0..=0xef => Some(3),
        0xf0..=0xf4 => Some(4),
        _ => None,
    }
}

/// A failure while decoding the next UTF-8 scalar.
pub(crate) enum ReaderFailure {
    /// An invalid leading or continuation byte at the given position.
    Invalid(Position),
    /// Input ended mid-scalar.
    Truncated,
}

impl ReaderFailure {
    pub(crate) fn into_diagnostic(self, at: Position) -> Diagnostic {
        match self {
            Self::Invalid(pos) => Diagnostic::new(
                DiagnosticCode::EncodingInvalid(pos.byte_offset),
                Severity::Critical,
                pos,
            ),
            Self::Truncated => {
                Diagnostic::new(DiagnosticCode::EncodingTruncated, Severity::Critical, at)
            }
        }
    }
}

pub(crate) fn io_diagnostic(err: IoError, at: Position) -> Diagnostic {
    Diagnostic::new(DiagnosticCode::IoRead(err.0), Severity::Critical, at)
}
