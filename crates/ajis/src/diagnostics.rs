//! The diagnostics model (spec §3.5 `Diagnostic`, §6 wire form, §7).
//!
//! Diagnostics are data, not exceptions: every recoverable or fatal
//! condition the reader, lexer, or parser can hit is one [`DiagnosticCode`]
//! variant, carrying a stable string code, a [`Severity`], a [`Position`],
//! and a message key plus ordered args for localized rendering. There is no
//! panic or `Result`-based control flow inside the parse loop (spec §9).
use alloc::{string::String, vec::Vec};

use thiserror::Error;

use crate::position::Position;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Severity {
    /// Purely informational; does not indicate a problem.
    Info,
    /// A recoverable anomaly; parsing continues.
    Warning,
    /// A fatal condition; parsing halts after this diagnostic.
    Error,
    /// A fatal, unrecoverable condition (e.g. an I/O failure).
    Critical,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`] and [`Severity::Critical`]:
    /// severities that halt parsing (spec §7 "Error/Critical: emit the
    /// diagnostic, then halt").
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

/// The stable, programmatically-filterable taxonomy of diagnostic codes
/// (spec §4.2, §4.3, §4.4, §7). Each variant's `Display` implementation is
/// the human-readable message for that occurrence; `code()` and
/// `message_key()` give the stable wire identifiers (spec §6).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DiagnosticCode {
    /// Invalid UTF-8 encountered at the given byte offset.
    #[error("invalid UTF-8 byte at offset {0}")]
    EncodingInvalid(u64),
    /// End of input while decoding a partial UTF-8 scalar.
    #[error("unexpected end of input while decoding a UTF-8 scalar")]
    EncodingTruncated,
    /// The byte source returned an I/O failure.
    #[error("I/O read error: {0}")]
    IoRead(String),
    /// The byte sink returned an I/O failure.
    #[error("I/O write error: {0}")]
    IoWrite(String),

    /// A string literal was never closed before EOF or a disallowed
    /// newline.
    #[error("unterminated string literal")]
    StringUnterminated,
    /// An unescaped control character appeared inside a string where the
    /// active mode forbids it.
    #[error("unescaped control character in string")]
    StringUnescapedControl,
    /// `\` was followed by a character that is not a recognized escape.
    #[error("invalid escape sequence '\\{0}'")]
    StringBadEscape(char),
    /// `\u` was not followed by exactly four hex digits, or formed an
    /// unpaired/invalid surrogate.
    #[error("invalid unicode escape sequence")]
    StringBadUnicode,

    /// `01`-style number with a disallowed leading zero.
    #[error("number has a leading zero")]
    NumberLeadingZero,
    /// A digit was expected but something else was found.
    #[error("invalid digit in number literal")]
    NumberBadDigit,
    /// `.` was not followed by at least one fraction digit.
    #[error("number fraction has no digits")]
    NumberEmptyFraction,
    /// `e`/`E` was not followed by at least one exponent digit.
    #[error("number exponent has no digits")]
    NumberEmptyExponent,
    /// `0b`/`0o`/`0x` was not followed by a valid digit for that base.
    #[error("invalid base prefix in number literal")]
    NumberBadBasePrefix,
    /// A `_` digit separator appeared leading, trailing, or adjacent to
    /// another separator.
    #[error("digit separator is not between two digits")]
    NumberSeparatorPlacement,
    /// A digit separator's run length does not match the base's advisory
    /// grouping size. Non-fatal; the token still parses.
    #[error("digit separator grouping does not match the advisory group size for this base")]
    NumberSeparatorGrouping,

    /// `/* ... */` was never closed before EOF.
    #[error("unterminated block comment")]
    CommentUnterminated,
    /// A `#namespace command ...` directive line was malformed.
    #[error("malformed directive")]
    DirectiveMalformed,

    /// A single token exceeded `max_token_bytes`.
    #[error("token exceeds the configured maximum size")]
    TokenTooLarge,
    /// A property name exceeded `max_property_name_bytes`.
    #[error("property name exceeds the configured maximum size")]
    PropertyNameTooLarge,

    /// A token appeared where the grammar did not allow it.
    #[error("unexpected token")]
    UnexpectedToken,
    /// A closing `}`/`]` did not match the kind of container it closed.
    #[error("mismatched container closer")]
    ContainerMismatch,
    /// An object property name was not followed by `:`.
    #[error("expected ':' after property name")]
    MissingColon,
    /// A container member was not followed by `,` or its closer.
    #[error("expected ',' or closing delimiter")]
    MissingComma,
    /// A trailing comma appeared but `allow_trailing_commas` is off.
    #[error("trailing comma is not allowed in this mode")]
    TrailingCommaDisallowed,
    /// An object key repeated under `DuplicateKeys::Warn` or
    /// `DuplicateKeys::Reject`.
    #[error("duplicate object key")]
    DuplicateKey,
    /// Container nesting exceeded `max_depth`.
    #[error("maximum nesting depth exceeded")]
    DepthExceeded,
    /// Input ended while a value, container, or token was still open.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Non-whitespace trailing data followed the root value while
    /// `require_trailing_eof` is set.
    #[error("extra data after the root value")]
    ExtraDataAfterRoot,

    /// A `Patch` transform's target path never occurred in the document and
    /// its `UndefinedTargetPolicy` was `Fail`.
    #[error("patch target path did not occur in the document")]
    PatchTargetNotFound,

    /// The segment stream fed to the serializer had mismatched
    /// `ContainerStart`/`ContainerEnd` nesting.
    #[error("segment stream has unbalanced container nesting")]
    SegmentStreamUnbalanced,
    /// Canonical formatting was requested but duplicate object keys were
    /// present (canonical form requires unique keys to be well-defined).
    #[error("canonical formatting does not allow duplicate object keys")]
    CanonicalDuplicateKeys,
}

/// A diagnostic produced during parsing or serializing (spec §3.5, §6).
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{code} at {position}")]
pub struct Diagnostic {
    /// The stable taxonomy code for this occurrence.
    pub code: DiagnosticCode,
    /// How serious this diagnostic is.
    pub severity: Severity,
    /// Where in the source this diagnostic applies.
    pub position: Position,
    /// Ordered, stable-format arguments substitutable into a localized
    /// message template keyed by `code.message_key()`.
    pub args: Vec<String>,
}

impl Diagnostic {
    pub(crate) fn new(code: DiagnosticCode, severity: Severity, position: Position) -> Self {
        Self {
            code,
            severity,
            position,
            args: Vec::new(),
        }
    }

    pub(crate) fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// A stable, versionless string identifier suitable for programmatic
    /// filtering (spec §6: `code: string (stable, e.g. "AJIS1003")`).
    #[must_use]
    pub fn wire_code(&self) -> &'static str {
        self.code.wire_code()
    }

    /// The stable message-key identifier used for localized rendering.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        self.code.wire_code()
    }
}

impl DiagnosticCode {
    /// The stable `AJIS####` code for this diagnostic variant (spec §6).
    #[must_use]
    #[allow(clippy::too_many_lines)]
    pub fn wire_code(&self) -> &'static str {
        match self {
            Self::EncodingInvalid(_) => "AJIS1001",
            Self::EncodingTruncated => "AJIS1002",
            Self::IoRead(_) => "AJIS1003",
            Self::IoWrite(_) => "AJIS1004",

            Self::StringUnterminated => "AJIS2001",
            Self::StringUnescapedControl => "AJIS2002",
            Self::StringBadEscape(_) => "AJIS2003",
            Self::StringBadUnicode => "AJIS2004",

            Self::NumberLeadingZero => "AJIS2101",
            Self::NumberBadDigit => "AJIS2102",
            Self::NumberEmptyFraction => "AJIS2103",
            Self::NumberEmptyExponent => "AJIS2104",
            Self::NumberBadBasePrefix => "AJIS2105",
            Self::NumberSeparatorPlacement => "AJIS2106",
            Self::NumberSeparatorGrouping => "AJIS2107",

            Self::CommentUnterminated => "AJIS2201",
            Self::DirectiveMalformed => "AJIS2202",

            Self::TokenTooLarge => "AJIS2301",
            Self::PropertyNameTooLarge => "AJIS2302",

            Self::UnexpectedToken => "AJIS3001",
            Self::ContainerMismatch => "AJIS3002",
            Self::MissingColon => "AJIS3003",
            Self::MissingComma => "AJIS3004",
            Self::TrailingCommaDisallowed => "AJIS3005",
            Self::DuplicateKey => "AJIS3006",
            Self::DepthExceeded => "AJIS3007",
            Self::UnexpectedEof => "AJIS3008",
            Self::ExtraDataAfterRoot => "AJIS3009",
            Self::PatchTargetNotFound => "AJIS3010",

            Self::SegmentStreamUnbalanced => "AJIS4001",
            Self::CanonicalDuplicateKeys => "AJIS4002",
        }
    }
}
