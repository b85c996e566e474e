//! Lexer tokens (spec §3.3).
//!
//! Unlike the spec's idealized zero-copy byte slice, token payloads here are
//! owned, bounded (`max_token_bytes`/`max_property_name_bytes`) buffers —
//! the same tradeoff the teacher's actual (compiling) lexer makes in
//! `parser.rs`'s `Token` enum (`String`-valued `PropertyName`/`String`
//! variants), as opposed to the zero-copy design sketched but never wired up
//! in the teacher's orphaned `parser/byte_buffer.rs`. This keeps memory
//! bounded per spec §5 without requiring unsafe, self-referential borrows
//! across buffer refills.
use alloc::{
    string::String,
    vec::Vec,
};

use crate::{
    flags::{CommentStyle, NumberFlags, StringFlags},
    position::Position,
};

/// Structural punctuation recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Punct {
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Comma,
}

/// A literal keyword token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    True,
    False,
    Null,
    NaN,
    PosInfinity,
    NegInfinity,
}

/// One `key=value` directive parameter (spec §4.2 "Directives").
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DirectiveParam {
    pub key: String,
    pub value: String,
}

/// The tagged token variant the lexer produces (spec §3.3).
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Punct(Punct),
    /// A string or unquoted-identifier property name/value body, exactly as
    /// written between its delimiters (escapes not yet processed).
    String { raw: String, flags: StringFlags },
    /// A number literal exactly as written, including base prefix and digit
    /// separators.
    Number { raw: String, flags: NumberFlags },
    Literal(LiteralKind),
    Comment { raw: String, style: CommentStyle },
    Directive {
        namespace: String,
        command: String,
        params: Vec<DirectiveParam>,
    },
    Eof,
}

/// One lexer token, tagged with the position of its first byte.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: Position,
}
