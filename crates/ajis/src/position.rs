//! Source positions.
//!
//! A [`Position`] is the monotonic `(byte_offset, line, column)` triple
//! attached to every token and diagnostic (see spec §3.1). `byte_offset`
//! counts raw UTF-8 bytes consumed from the start of the stream; `line`
//! counts `\n`, `\r`, or `\r\n` as one newline; `column` is a 1-based count
//! of Unicode scalars on the current line.
use core::fmt;

/// A point in the source stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Position {
    /// Number of raw UTF-8 bytes consumed before this position.
    pub byte_offset: u64,
    /// 1-based line number.
    pub line: u32,
    /// 1-based Unicode-scalar column on the current line.
    pub column: u32,
}

impl Position {
    /// The position at the very start of a stream.
    #[must_use]
    pub const fn start() -> Self {
        Self {
            byte_offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Advances this position past one consumed byte that is not part of a
    /// newline sequence and not a UTF-8 continuation byte.
    pub(crate) fn advance_byte(&mut self, is_continuation: bool) {
        self.byte_offset += 1;
        if !is_continuation {
            self.column += 1;
        }
    }

    /// Advances this position past a consumed `\n`, resetting the column and
    /// incrementing the line. Callers are responsible for treating `\r\n` as
    /// a single newline (only the `\n` half calls this).
    pub(crate) fn advance_newline(&mut self) {
        self.byte_offset += 1;
        self.line += 1;
        self.column = 1;
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
