//! Configuration options recognized by the reader, lexer, parser, and
//! serializer (spec §3.6).
//!
//! Settings are frozen for the duration of a single parse or serialize call:
//! construct a [`Settings`] value, then pass it (by value — it is `Copy`) to
//! [`crate::parser::Parser::new`] or [`crate::serializer::Serializer::new`].
#![allow(clippy::struct_excessive_bools)]

/// Which lexical grammar the lexer enforces.
///
/// `mode` is the single governing knob; the individual `allow_*` fields on
/// [`Settings`] further narrow what `AjisCanonical` and `Lax` accept (they
/// have no effect in `StrictJson`, which always behaves as RFC 8259).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Mode {
    /// RFC 8259 JSON only. All `allow_*` tolerances are forced off.
    StrictJson,
    /// The full AJIS grammar: comments, multi-base numbers with digit
    /// separators, multiline strings, directives, and whatever `allow_*`
    /// fields are enabled.
    #[default]
    AjisCanonical,
    /// The most permissive grammar: comments, multi-base numbers, multiline
    /// strings, and directives are all meaningful in this mode. Setting
    /// `mode` to `Lax` alone does not flip any `allow_*` field — `Settings`
    /// is a flat struct with no way to tell "never set" apart from
    /// "explicitly set to false", so [`Settings::normalized`] only ever
    /// forces tolerances off (for `StrictJson`), never on. Use
    /// [`Settings::lax`] to get every tolerance turned on.
    Lax,
}

/// Policy for handling repeated object keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum DuplicateKeys {
    /// Silently accept duplicates; the parser emits every `PropertyName` and
    /// value pair observed in source order.
    #[default]
    Allow,
    /// Accept duplicates but emit a `DUPLICATE_KEY` warning diagnostic for
    /// each repeat after the first.
    Warn,
    /// Treat a repeated key as a fatal `DUPLICATE_KEY` error.
    Reject,
}

/// How string segments carry their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum StringRepresentation {
    /// Keep the string body exactly as it appeared between the quotes,
    /// escape sequences and all. A source literal spelled with two
    /// `\uXXXX` escapes for `A` and `B` carries those six source bytes
    /// unresolved, not the two-byte string they denote.
    #[default]
    RawSlice,
    /// Resolve every escape sequence into the scalar it denotes, so a
    /// source literal spelled with `\uXXXX` escapes for `A` and `B`
    /// carries the two-byte decoded string.
    Decoded,
}

/// How number segments carry their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum NumberRepresentation {
    /// Keep the exact source bytes of the number token, including base
    /// prefix and digit separators.
    #[default]
    RawSlice,
    /// Normalize to a canonical decimal text form at parse time.
    CanonicalText,
}

/// Output formatting chosen for the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Formatting {
    /// No insignificant whitespace.
    Compact,
    /// Indented, one member per line. `indent` is the number of spaces per
    /// nesting level, clamped to `1..=8`.
    Pretty {
        /// Spaces per nesting level.
        indent: u8,
    },
    /// Deterministic byte-exact form: sorted object keys, minimized string
    /// escapes, normalized numbers, no insignificant whitespace (spec
    /// §4.4).
    Canonical,
}

impl Default for Formatting {
    fn default() -> Self {
        Self::Compact
    }
}

/// Advisory hint about the intended deployment profile. The core does not
/// change correctness behavior based on `profile`; it may use it to size
/// internal buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum Profile {
    /// No particular optimization target.
    #[default]
    Universal,
    /// Favor small, bounded buffers over throughput.
    LowMemory,
    /// Favor throughput, allowing larger internal buffers.
    HighThroughput,
}

/// Frozen configuration for one parse or serialize call (spec §3.6).
///
/// # Examples
///
/// ```rust
/// use ajis::{Mode, Settings};
///
/// let settings = Settings {
///     mode: Mode::Lax,
///     allow_trailing_commas: true,
///     ..Settings::default()
/// };
/// assert!(settings.allow_trailing_commas);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct Settings {
    /// Governing lexical mode.
    pub mode: Mode,
    /// Allow a comma after the last member of an object/array.
    pub allow_trailing_commas: bool,
    /// Allow `'single quoted'` strings in addition to `"double quoted"`.
    pub allow_single_quotes: bool,
    /// Allow bare identifiers as object property names.
    pub allow_unquoted_property_names: bool,
    /// Allow `// line` comments.
    pub allow_line_comments: bool,
    /// Allow `/* block */` comments.
    pub allow_block_comments: bool,
    /// Allow `0b`/`0o`/`0x` prefixed integers and digit separators together
    /// with decimal numbers.
    pub allow_multi_base_numbers: bool,
    /// Allow `_` digit separators within number literals.
    pub allow_digit_separators: bool,
    /// Allow the `NaN`, `Infinity`, and `-Infinity` literals.
    pub allow_nan_infinity: bool,
    /// Policy for repeated object keys.
    pub duplicate_keys: DuplicateKeys,
    /// Maximum container nesting depth. Exceeding it is a fatal
    /// `DEPTH_EXCEEDED` diagnostic.
    pub max_depth: u32,
    /// Maximum byte length of a single string or number token.
    pub max_token_bytes: u64,
    /// Maximum byte length of a single property name.
    pub max_property_name_bytes: u64,
    /// Representation used for string payloads.
    pub string_representation: StringRepresentation,
    /// Representation used for number payloads.
    pub number_representation: NumberRepresentation,
    /// Output formatting (serializer only).
    pub formatting: Formatting,
    /// Emit a `Progress` segment every N cumulative bytes read. `0` disables
    /// progress segments.
    pub emit_progress_every_bytes: u64,
    /// Advisory deployment profile.
    pub profile: Profile,
    /// Whether the parser must consume trailing whitespace through true EOF
    /// after the root value, failing with `EXTRA_DATA_AFTER_ROOT` on any
    /// non-whitespace found. When `false`, the parser halts at the
    /// end-of-text boundary (spec §6) and leaves any trailing bytes unread.
    pub require_trailing_eof: bool,
}

impl Settings {
    /// The minimum `max_depth` spec §3.6 requires a conforming implementation
    /// to support by default.
    pub const DEFAULT_MAX_DEPTH: u32 = 256;
    /// A generous default cap on a single string/number token.
    pub const DEFAULT_MAX_TOKEN_BYTES: u64 = 64 * 1024 * 1024;
    /// A generous default cap on a single property name.
    pub const DEFAULT_MAX_PROPERTY_NAME_BYTES: u64 = 1024 * 1024;

    /// Returns settings for strict RFC 8259 JSON: every AJIS tolerance is
    /// forced off regardless of the fields passed in.
    #[must_use]
    pub fn strict_json() -> Self {
        Self {
            mode: Mode::StrictJson,
            allow_trailing_commas: false,
            allow_single_quotes: false,
            allow_unquoted_property_names: false,
            allow_line_comments: false,
            allow_block_comments: false,
            allow_multi_base_numbers: false,
            allow_digit_separators: false,
            allow_nan_infinity: false,
            ..Self::default()
        }
    }

    /// Returns settings for the most permissive LAX grammar: every `allow_*`
    /// tolerance defaults on.
    #[must_use]
    pub fn lax() -> Self {
        Self {
            mode: Mode::Lax,
            allow_trailing_commas: true,
            allow_single_quotes: true,
            allow_unquoted_property_names: true,
            allow_line_comments: true,
            allow_block_comments: true,
            allow_multi_base_numbers: true,
            allow_digit_separators: true,
            allow_nan_infinity: true,
            ..Self::default()
        }
    }

    /// Normalizes mode-forced fields: `StrictJson` always forces every
    /// `allow_*` tolerance off, matching spec §3.6 ("`allow_trailing_commas`
    /// forced false for `StrictJson`") generalized to the whole tolerance
    /// set.
    #[must_use]
    pub(crate) fn normalized(mut self) -> Self {
        if matches!(self.mode, Mode::StrictJson) {
            self.allow_trailing_commas = false;
            self.allow_single_quotes = false;
            self.allow_unquoted_property_names = false;
            self.allow_line_comments = false;
            self.allow_block_comments = false;
            self.allow_multi_base_numbers = false;
            self.allow_digit_separators = false;
            self.allow_nan_infinity = false;
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: Mode::AjisCanonical,
            allow_trailing_commas: false,
            allow_single_quotes: false,
            allow_unquoted_property_names: false,
            allow_line_comments: false,
            allow_block_comments: false,
            allow_multi_base_numbers: false,
            allow_digit_separators: false,
            allow_nan_infinity: false,
            duplicate_keys: DuplicateKeys::Allow,
            max_depth: Self::DEFAULT_MAX_DEPTH,
            max_token_bytes: Self::DEFAULT_MAX_TOKEN_BYTES,
            max_property_name_bytes: Self::DEFAULT_MAX_PROPERTY_NAME_BYTES,
            string_representation: StringRepresentation::RawSlice,
            number_representation: NumberRepresentation::RawSlice,
            formatting: Formatting::Compact,
            emit_progress_every_bytes: 0,
            profile: Profile::Universal,
            require_trailing_eof: false,
        }
    }
}
