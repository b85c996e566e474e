//! The mode-aware tokenizer (spec §4.2).
//!
//! Grounded on the teacher's `parser.rs` `LexState` machine (string/number/
//! comment sub-states threaded through one byte-at-a-time loop) together
//! with its `literal_buffer.rs` (incremental `true`/`false`/`null` matching)
//! and `escape_buffer.rs` (`\u` hex accumulation). Structural punctuation,
//! quoting, comments, and directives are all resolved here; the parser never
//! looks at raw bytes.
use alloc::{string::String, vec::Vec};

use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    flags::{CommentStyle, NumberBase, NumberFlags, QuoteStyle, StringFlags},
    io::{ByteSource, IoError},
    position::Position,
    reader::{io_diagnostic, Reader},
    settings::{Mode, Settings},
    token::{DirectiveParam, LiteralKind, Punct, Token, TokenKind},
};

/// Advisory digit-separator group size per base (spec Open Question: AJIS
/// accepts any grouping but warns when it doesn't match this).
fn group_size(base: NumberBase) -> usize {
    match base {
        NumberBase::Decimal => 3,
        NumberBase::Binary | NumberBase::Octal | NumberBase::Hex => 4,
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Tokenizes a byte stream under a fixed [`Settings`].
///
/// Fatal failures (`Severity::is_fatal()`) are returned as `Err`; recoverable
/// warnings raised while producing the most recent token accumulate and are
/// drained with [`Lexer::take_warnings`] — the same "diagnostics are data"
/// split used throughout the pipeline (spec §9).
pub(crate) struct Lexer<S: ByteSource> {
    reader: Reader<S>,
    settings: Settings,
    warnings: Vec<Diagnostic>,
}

impl<S: ByteSource> Lexer<S> {
    pub(crate) fn new(reader: Reader<S>, settings: Settings) -> Self {
        Self {
            reader,
            settings,
            warnings: Vec::new(),
        }
    }

    pub(crate) fn position(&self) -> Position {
        self.reader.position()
    }

    pub(crate) fn bytes_read(&self) -> u64 {
        self.reader.bytes_read()
    }

    pub(crate) fn take_warnings(&mut self) -> Vec<Diagnostic> {
        core::mem::take(&mut self.warnings)
    }

    fn warn(&mut self, code: DiagnosticCode, at: Position) {
        self.warnings.push(Diagnostic::new(code, Severity::Warning, at));
    }

    fn io(&self, err: IoError) -> Diagnostic {
        io_diagnostic(err, self.reader.position())
    }

    fn fatal(&self, code: DiagnosticCode, at: Position) -> Diagnostic {
        Diagnostic::new(code, Severity::Error, at)
    }

    fn peek(&mut self) -> Result<Option<u8>, Diagnostic> {
        self.reader.peek(0).map_err(|e| self.io(e))
    }

    fn starts_with(&mut self, pat: &[u8]) -> Result<bool, Diagnostic> {
        self.reader.starts_with(pat).map_err(|e| self.io(e))
    }

    fn advance(&mut self, n: usize) -> Result<(), Diagnostic> {
        self.reader.advance(n).map_err(|e| self.io(e))
    }

    fn advance_char(&mut self) -> Result<Option<char>, Diagnostic> {
        let at = self.reader.position();
        self.reader
            .advance_char()
            .map_err(|f| f.into_diagnostic(at))
    }

    /// Consumes only whitespace, leaving comments/directives/real tokens for
    /// `next_token` to classify and return as tokens of their own (spec
    /// §4.2: the lexer hands comments and directives to the parser as
    /// tokens rather than swallowing them itself).
    fn skip_whitespace(&mut self) -> Result<(), Diagnostic> {
        while matches!(self.peek()?, Some(b) if b.is_ascii_whitespace()) {
            self.advance(1)?;
        }
        Ok(())
    }

    fn lex_line_comment(&mut self, start: Position) -> Result<TokenKind, Diagnostic> {
        self.advance(2)?;
        let mut raw = String::new();
        loop {
            match self.peek()? {
                None | Some(b'\n') => {
                    return Ok(TokenKind::Comment { raw, style: CommentStyle::Line });
                }
                Some(_) => {
                    let Some(c) = self.advance_char()? else {
                        return Ok(TokenKind::Comment { raw, style: CommentStyle::Line });
                    };
                    raw.push(c);
                    self.check_token_len(raw.len(), start)?;
                }
            }
        }
    }

    fn lex_block_comment(&mut self, start: Position) -> Result<TokenKind, Diagnostic> {
        self.advance(2)?;
        let mut raw = String::new();
        loop {
            if self.starts_with(b"*/")? {
                self.advance(2)?;
                return Ok(TokenKind::Comment { raw, style: CommentStyle::Block });
            }
            if self.peek()?.is_none() {
                return Err(self.fatal(DiagnosticCode::CommentUnterminated, start));
            }
            let Some(c) = self.advance_char()? else {
                return Err(self.fatal(DiagnosticCode::CommentUnterminated, start));
            };
            raw.push(c);
            self.check_token_len(raw.len(), start)?;
        }
    }

    /// `#namespace command key=value ...`, terminated by a newline or EOF.
    /// A malformed directive still becomes a `Directive` token (empty
    /// namespace/command) plus a warning rather than aborting the parse —
    /// it carries no structural meaning either way.
    fn lex_directive(&mut self, start: Position) -> Result<TokenKind, Diagnostic> {
        self.advance(1)?;
        let namespace = self.read_bare_word()?;
        self.skip_inline_whitespace()?;
        let command = self.read_bare_word()?;
        let mut params = Vec::new();
        loop {
            self.skip_inline_whitespace()?;
            match self.peek()? {
                None | Some(b'\n') => break,
                _ => {
                    let key = self.read_bare_word()?;
                    if self.peek()? == Some(b'=') {
                        self.advance(1)?;
                        let value = self.read_bare_word()?;
                        params.push(DirectiveParam { key, value });
                    } else if key.is_empty() {
                        self.warn(DiagnosticCode::DirectiveMalformed, start);
                        self.skip_to_line_end()?;
                        return Ok(TokenKind::Directive { namespace, command, params });
                    } else {
                        params.push(DirectiveParam {
                            key,
                            value: String::new(),
                        });
                    }
                }
            }
        }
        if namespace.is_empty() || command.is_empty() {
            self.warn(DiagnosticCode::DirectiveMalformed, start);
        }
        Ok(TokenKind::Directive { namespace, command, params })
    }

    fn skip_inline_whitespace(&mut self) -> Result<(), Diagnostic> {
        while matches!(self.peek()?, Some(b' ' | b'\t')) {
            self.advance(1)?;
        }
        Ok(())
    }

    fn skip_to_line_end(&mut self) -> Result<(), Diagnostic> {
        loop {
            match self.peek()? {
                None | Some(b'\n') => return Ok(()),
                _ => self.advance_char()?,
            };
        }
    }

    fn read_bare_word(&mut self) -> Result<String, Diagnostic> {
        let mut out = String::new();
        while let Some(b) = self.peek()? {
            if b.is_ascii_whitespace() || b == b'=' {
                break;
            }
            let Some(c) = self.advance_char()? else {
                break;
            };
            out.push(c);
        }
        Ok(out)
    }

    /// Produces the next token, skipping leading whitespace only. Comments
    /// and directives are returned as their own tokens (`Comment`/
    /// `Directive`) rather than swallowed here; callers that want only
    /// structural/value tokens loop past them (spec §4.2, §4.3).
    pub(crate) fn next_token(&mut self) -> Result<Token, Diagnostic> {
        self.skip_whitespace()?;
        let start = self.reader.position();
        let Some(b) = self.peek()? else {
            return Ok(Token {
                kind: TokenKind::Eof,
                start,
            });
        };

        let kind = match b {
            b'/' if self.settings.allow_line_comments && self.starts_with(b"//")? => {
                self.lex_line_comment(start)?
            }
            b'/' if self.settings.allow_block_comments && self.starts_with(b"/*")? => {
                self.lex_block_comment(start)?
            }
            b'#' if !matches!(self.settings.mode, Mode::StrictJson) => self.lex_directive(start)?,
            b'{' => self.punct(Punct::LBrace)?,
            b'}' => self.punct(Punct::RBrace)?,
            b'[' => self.punct(Punct::LBracket)?,
            b']' => self.punct(Punct::RBracket)?,
            b':' => self.punct(Punct::Colon)?,
            b',' => self.punct(Punct::Comma)?,
            b'"' => self.lex_string(b'"', QuoteStyle::Double, start)?,
            b'\'' if self.settings.allow_single_quotes => {
                self.lex_string(b'\'', QuoteStyle::Single, start)?
            }
            b'-' if self.settings.allow_nan_infinity && self.starts_with(b"-Infinity")? => {
                self.advance(9)?;
                TokenKind::Literal(LiteralKind::NegInfinity)
            }
            b'-' | b'0'..=b'9' => self.lex_number(start)?,
            b'N' if self.settings.allow_nan_infinity && self.starts_with(b"NaN")? => {
                self.advance(3)?;
                TokenKind::Literal(LiteralKind::NaN)
            }
            b'I' if self.settings.allow_nan_infinity && self.starts_with(b"Infinity")? => {
                self.advance(8)?;
                TokenKind::Literal(LiteralKind::PosInfinity)
            }
            b't' if self.starts_with(b"true")? => {
                self.advance(4)?;
                TokenKind::Literal(LiteralKind::True)
            }
            b'f' if self.starts_with(b"false")? => {
                self.advance(5)?;
                TokenKind::Literal(LiteralKind::False)
            }
            b'n' if self.starts_with(b"null")? => {
                self.advance(4)?;
                TokenKind::Literal(LiteralKind::Null)
            }
            _ if is_ident_start(b) => self.lex_identifier(start)?,
            _ => return Err(self.fatal(DiagnosticCode::UnexpectedToken, start)),
        };
        Ok(Token { kind, start })
    }

    fn punct(&mut self, p: Punct) -> Result<TokenKind, Diagnostic> {
        self.advance(1)?;
        Ok(TokenKind::Punct(p))
    }

    fn lex_identifier(&mut self, start: Position) -> Result<TokenKind, Diagnostic> {
        let mut raw = String::new();
        while let Some(b) = self.peek()? {
            if !is_ident_continue(b) {
                break;
            }
            raw.push(b as char);
            self.advance(1)?;
            self.check_token_len(raw.len(), start)?;
        }
        Ok(TokenKind::String {
            raw,
            flags: StringFlags {
                has_escapes: false,
                has_non_ascii: false,
                quote_style: QuoteStyle::Identifier,
            },
        })
    }

    fn check_token_len(&self, len: usize, start: Position) -> Result<(), Diagnostic> {
        if len as u64 > self.settings.max_token_bytes {
            return Err(self.fatal(DiagnosticCode::TokenTooLarge, start));
        }
        Ok(())
    }

    fn lex_string(
        &mut self,
        quote: u8,
        quote_style: QuoteStyle,
        start: Position,
    ) -> Result<TokenKind, Diagnostic> {
        self.advance(1)?;
        let mut raw = String::new();
        let mut has_escapes = false;
        let mut has_non_ascii = false;
        let multiline_ok = !matches!(self.settings.mode, Mode::StrictJson);

        loop {
            let Some(b) = self.peek()? else {
                return Err(self.fatal(DiagnosticCode::StringUnterminated, start));
            };
            if b == quote {
                self.advance(1)?;
                break;
            }
            if b == b'\\' {
                has_escapes = true;
                let esc_pos = self.reader.position();
                self.advance(1)?;
                raw.push('\\');
                let Some(ec) = self.advance_char()? else {
                    return Err(self.fatal(DiagnosticCode::StringUnterminated, start));
                };
                raw.push(ec);
                match ec {
                    '"' | '\'' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't' => {}
                    'u' => {
                        for _ in 0..4 {
                            let Some(h) = self.advance_char()? else {
                                return Err(self.fatal(DiagnosticCode::StringBadUnicode, start));
                            };
                            if !h.is_ascii_hexdigit() {
                                return Err(self.fatal(DiagnosticCode::StringBadUnicode, esc_pos));
                            }
                            raw.push(h);
                        }
                    }
                    other => {
                        return Err(self.fatal(DiagnosticCode::StringBadEscape(other), esc_pos));
                    }
                }
                self.check_token_len(raw.len(), start)?;
                continue;
            }
            if b == b'\n' || b == b'\r' {
                if !multiline_ok {
                    return Err(self.fatal(DiagnosticCode::StringUnescapedControl, self.reader.position()));
                }
                // `advance_char` defers to the reader's own `next_raw_byte`,
                // which already charges `\r`/`\r\n` to a single line
                // increment the same way it does outside strings.
                let c = self.advance_char()?.expect("byte already confirmed present by peek");
                raw.push(c);
                self.check_token_len(raw.len(), start)?;
                continue;
            }
            if b < 0x20 {
                return Err(self.fatal(DiagnosticCode::StringUnescapedControl, self.reader.position()));
            }
            let pos = self.reader.position();
            let Some(c) = self.advance_char()? else {
                return Err(self.fatal(DiagnosticCode::StringUnterminated, start));
            };
            let _ = pos;
            if !c.is_ascii() {
                has_non_ascii = true;
            }
            raw.push(c);
            self.check_token_len(raw.len(), start)?;
        }

        Ok(TokenKind::String {
            raw,
            flags: StringFlags {
                has_escapes,
                has_non_ascii,
                quote_style,
            },
        })
    }

    fn lex_number(&mut self, start: Position) -> Result<TokenKind, Diagnostic> {
        let mut raw = String::new();
        if self.peek()? == Some(b'-') {
            raw.push('-');
            self.advance(1)?;
        }

        if self.settings.allow_multi_base_numbers {
            if let Some(base) = self.peek_base_prefix()? {
                raw.push('0');
                raw.push(match base {
                    NumberBase::Binary => 'b',
                    NumberBase::Octal => 'o',
                    NumberBase::Hex => 'x',
                    NumberBase::Decimal => unreachable!(),
                });
                self.advance(2)?;
                let digits = self.lex_digit_run(start, base)?;
                if digits.is_empty() {
                    return Err(self.fatal(DiagnosticCode::NumberBadBasePrefix, start));
                }
                raw.push_str(&digits);
                self.check_token_len(raw.len(), start)?;
                return Ok(TokenKind::Number {
                    raw,
                    flags: NumberFlags {
                        base,
                        has_separators: digits.contains('_'),
                        has_fraction: false,
                        has_exponent: false,
                    },
                });
            }
        }

        let leading_zero = self.peek()? == Some(b'0');
        let int_digits = self.lex_digit_run(start, NumberBase::Decimal)?;
        if int_digits.is_empty() {
            return Err(self.fatal(DiagnosticCode::NumberBadDigit, start));
        }
        if leading_zero && int_digits.len() > 1 {
            return Err(self.fatal(DiagnosticCode::NumberLeadingZero, start));
        }
        raw.push_str(&int_digits);

        let mut has_fraction = false;
        if self.peek()? == Some(b'.') {
            has_fraction = true;
            raw.push('.');
            self.advance(1)?;
            let frac = self.lex_digit_run(start, NumberBase::Decimal)?;
            if frac.is_empty() {
                return Err(self.fatal(DiagnosticCode::NumberEmptyFraction, start));
            }
            raw.push_str(&frac);
        }

        let mut has_exponent = false;
        if matches!(self.peek()?, Some(b'e' | b'E')) {
            has_exponent = true;
            let e = self.peek()?.unwrap();
            raw.push(e as char);
            self.advance(1)?;
            if matches!(self.peek()?, Some(b'+' | b'-')) {
                let sign = self.peek()?.unwrap();
                raw.push(sign as char);
                self.advance(1)?;
            }
            let exp = self.lex_digit_run(start, NumberBase::Decimal)?;
            if exp.is_empty() {
                return Err(self.fatal(DiagnosticCode::NumberEmptyExponent, start));
            }
            raw.push_str(&exp);
        }

        self.check_token_len(raw.len(), start)?;
        Ok(TokenKind::Number {
            raw,
            flags: NumberFlags {
                base: NumberBase::Decimal,
                has_separators: int_digits.contains('_'),
                has_fraction,
                has_exponent,
            },
        })
    }

    fn peek_base_prefix(&mut self) -> Result<Option<NumberBase>, Diagnostic> {
        if self.peek()? != Some(b'0') {
            return Ok(None);
        }
        Ok(match self.reader.peek(1).map_err(|e| self.io(e))? {
            Some(b'b' | b'B') => Some(NumberBase::Binary),
            Some(b'o' | b'O') => Some(NumberBase::Octal),
            Some(b'x' | b'X') => Some(NumberBase::Hex),
            _ => None,
        })
    }

    /// Consumes a run of digits valid for `base`, optionally interleaved
    /// with `_` separators when `allow_digit_separators` is set. Separator
    /// placement (not leading/trailing/doubled) is enforced as fatal;
    /// group-size mismatch against the advisory size is only a warning.
    fn lex_digit_run(&mut self, start: Position, base: NumberBase) -> Result<String, Diagnostic> {
        let mut out = String::new();
        let mut last_was_sep = false;
        let mut group_len = 0usize;
        let mut groups: Vec<usize> = Vec::new();

        loop {
            match self.peek()? {
                Some(b) if is_base_digit(b, base) => {
                    out.push(b as char);
                    self.advance(1)?;
                    last_was_sep = false;
                    group_len += 1;
                    self.check_token_len(out.len(), start)?;
                }
                Some(b'_') if self.settings.allow_digit_separators => {
                    if out.is_empty() || last_was_sep {
                        return Err(self.fatal(DiagnosticCode::NumberSeparatorPlacement, start));
                    }
                    groups.push(group_len);
                    group_len = 0;
                    last_was_sep = true;
                    out.push('_');
                    self.advance(1)?;
                    self.check_token_len(out.len(), start)?;
                }
                _ => break,
            }
        }
        if last_was_sep {
            return Err(self.fatal(DiagnosticCode::NumberSeparatorPlacement, start));
        }
        if !groups.is_empty() {
            groups.push(group_len);
            let expected = group_size(base);
            let uniform = groups.iter().all(|&g| g == expected);
            if !uniform {
                self.warn(DiagnosticCode::NumberSeparatorGrouping, start);
            }
        }
        Ok(out)
    }
}

fn is_base_digit(b: u8, base: NumberBase) -> bool {
    match base {
        NumberBase::Binary => matches!(b, b'0'..=b'1'),
        NumberBase::Octal => matches!(b, b'0'..=b'7'),
        NumberBase::Decimal => b.is_ascii_digit(),
        NumberBase::Hex => b.is_ascii_hexdigit(),
    }
}
