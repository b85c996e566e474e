//! Byte source/sink traits (spec §6 "Byte source/sink").
//!
//! These are deliberately minimal: a forward-only supplier and consumer of
//! bytes, with no assumption of seekability, matching spec §1's non-goal
//! "no dependency on seekable input or output". They exist so the core can
//! stay `no_std` while still being generic over where bytes come from or go
//! (an in-memory slice in tests, a socket, a file, anything an embedder
//! wires up).
use alloc::string::String;

/// An I/O failure reported by a [`ByteSource`] or [`ByteSink`].
///
/// The core carries only a message; it does not retain the embedder's
/// underlying error type, since `no_std` gives us no common error trait
/// object to store one in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoError(pub String);

/// A forward-only supplier of UTF-8 bytes.
///
/// Implementations append newly available bytes to `buf` and return how many
/// bytes were appended; returning `Ok(0)` signals end of stream.
pub trait ByteSource {
    /// Appends more bytes to `buf`, returning the number appended (`0` at
    /// end of stream).
    fn fill(&mut self, buf: &mut alloc::vec::Vec<u8>) -> Result<usize, IoError>;
}

/// A forward-only consumer of bytes.
pub trait ByteSink {
    /// Writes `bytes` to the destination.
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError>;
}

/// A [`ByteSource`] that serves bytes from an in-memory slice. Used in tests
/// and by callers who already have the whole document in memory.
#[derive(Debug, Clone, Copy)]
pub struct SliceSource<'a> {
    remaining: &'a [u8],
}

impl<'a> SliceSource<'a> {
    /// Wraps `bytes` as a one-shot byte source.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { remaining: bytes }
    }
}

impl ByteSource for SliceSource<'_> {
    fn fill(&mut self, buf: &mut alloc::vec::Vec<u8>) -> Result<usize, IoError> {
        if self.remaining.is_empty() {
            return Ok(0);
        }
        buf.extend_from_slice(self.remaining);
        let n = self.remaining.len();
        self.remaining = &[];
        Ok(n)
    }
}

/// A [`ByteSink`] that appends written bytes to an owned `Vec<u8>`. Used in
/// tests and by callers who want the serialized output fully in memory.
#[derive(Debug, Clone, Default)]
pub struct VecSink {
    /// The bytes written so far.
    pub bytes: alloc::vec::Vec<u8>,
}

impl VecSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteSink for VecSink {
    fn write(&mut self, bytes: &[u8]) -> Result<(), IoError> {
        self.bytes.extend_from_slice(bytes);
        Ok(())
    }
}
