//! Flag types shared by tokens and segments (spec §3.3, §3.5).
#![allow(clippy::struct_excessive_bools)]

/// Which delimiter (or absence of one) introduced a string/property-name
/// token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum QuoteStyle {
    /// `"double quoted"`.
    Double,
    /// `'single quoted'` (AJIS/Lax only).
    Single,
    /// A bare identifier used as a property name (AJIS/Lax only).
    Identifier,
}

/// Flags describing a string or property-name token/segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct StringFlags {
    /// At least one `\` escape was consumed inside this string.
    pub has_escapes: bool,
    /// At least one non-ASCII byte appeared in this string.
    pub has_non_ascii: bool,
    /// How the string/name was delimited.
    pub quote_style: QuoteStyle,
}

/// The numeric base of a number token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum NumberBase {
    /// `0b`-prefixed.
    Binary = 2,
    /// `0o`-prefixed.
    Octal = 8,
    /// No prefix.
    Decimal = 10,
    /// `0x`-prefixed.
    Hex = 16,
}

/// Flags describing a number token/segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct NumberFlags {
    /// The literal's numeric base.
    pub base: NumberBase,
    /// At least one `_` digit separator was present.
    pub has_separators: bool,
    /// A `.` fraction part was present (decimal only).
    pub has_fraction: bool,
    /// An `e`/`E` exponent part was present (decimal only).
    pub has_exponent: bool,
}

impl NumberFlags {
    pub(crate) fn decimal() -> Self {
        Self {
            base: NumberBase::Decimal,
            has_separators: false,
            has_fraction: false,
            has_exponent: false,
        }
    }
}

/// Whether a comment token was a `//` line comment or a `/* */` block
/// comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum CommentStyle {
    /// `// ... end of line`.
    Line,
    /// `/* ... */`.
    Block,
}
