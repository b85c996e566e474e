//! The parser: drives a [`Reader`]/[`Lexer`] pair into an ordered [`Segment`]
//! stream (spec §4.3).
//!
//! Grounded on the teacher's `parser.rs` `ParseState`/`Frame`/`FrameStack`
//! machine, adapted from a buffered-`Value`-returning design to a pull-based
//! segment emitter: each call to [`Parser::next_segment`] advances the state
//! machine by exactly as much as it takes to produce one more segment, never
//! materializing more of the document than the active container stack (spec
//! §5, §9).
use alloc::{collections::VecDeque, string::String};

use crate::{
    container::{Expecting, FrameStack},
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    io::ByteSource,
    numeric::canonical_number_text,
    position::Position,
    reader::Reader,
    segment::{ContainerKind, Segment, ValuePayload},
    settings::{DuplicateKeys, NumberRepresentation, Settings, StringRepresentation},
    token::{LiteralKind, Punct, Token, TokenKind},
    lexer::Lexer,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootPhase {
    BeforeValue,
    AfterValue,
    Halted,
}

/// Pulls a [`Segment`] stream out of one [`ByteSource`] under one
/// [`Settings`] (spec §4.3, §6).
pub struct Parser<S: ByteSource> {
    lexer: Lexer<S>,
    settings: Settings,
    frames: FrameStack,
    root_phase: RootPhase,
    pending: VecDeque<Segment>,
    next_progress_at: u64,
}

impl<S: ByteSource> Parser<S> {
    /// Creates a parser over `source` governed by `settings`.
    #[must_use]
    pub fn new(source: S, settings: Settings) -> Self {
        let settings = settings.normalized();
        let reader = Reader::new(source);
        Self {
            lexer: Lexer::new(reader, settings),
            frames: FrameStack::new(settings.max_depth),
            root_phase: RootPhase::BeforeValue,
            pending: VecDeque::new(),
            next_progress_at: settings.emit_progress_every_bytes,
            settings,
        }
    }

    /// Returns the next segment in source order, or `None` once the parse
    /// has halted (the root value completed and, if
    /// `require_trailing_eof`, trailing input was confirmed clean; or a
    /// fatal diagnostic was already delivered).
    pub fn next_segment(&mut self) -> Option<Segment> {
        loop {
            if let Some(seg) = self.pending.pop_front() {
                return Some(seg);
            }
            if self.root_phase == RootPhase::Halted {
                return None;
            }
            self.step();
        }
    }

    fn halt(&mut self) {
        self.root_phase = RootPhase::Halted;
    }

    fn push_diag(&mut self, code: DiagnosticCode, severity: Severity, at: Position) {
        let fatal = severity.is_fatal();
        self.pending.push_back(Segment::Diagnostic(Diagnostic::new(code, severity, at)));
        if fatal {
            self.halt();
        }
    }

    fn maybe_emit_progress(&mut self) {
        if self.settings.emit_progress_every_bytes == 0 {
            return;
        }
        let bytes_read = self.lexer.bytes_read();
        if bytes_read >= self.next_progress_at {
            self.pending.push_back(Segment::Progress {
                bytes_read,
                total_bytes_hint: None,
            });
            self.next_progress_at = bytes_read + self.settings.emit_progress_every_bytes;
        }
    }

    /// Advances the state machine until at least one segment is queued, or
    /// the parse halts.
    fn step(&mut self) {
        self.maybe_emit_progress();
        if !self.pending.is_empty() {
            return;
        }

        match self.root_phase {
            RootPhase::Halted => {}
            RootPhase::AfterValue => self.check_trailing(),
            RootPhase::BeforeValue => {
                if self.frames.depth() == 0 {
                    self.expect_value();
                    return;
                }
                let (kind, expecting) = {
                    let top = self.frames.top().expect("non-empty stack");
                    (top.kind, top.expecting)
                };
                match (kind, expecting) {
                    (ContainerKind::Object, Expecting::PropertyNameOrEnd) => self.object_name_or_end(),
                    (ContainerKind::Object, Expecting::Colon) => self.object_colon(),
                    (ContainerKind::Object, Expecting::ValueOrEnd) => self.expect_value(),
                    (ContainerKind::Object, Expecting::CommaOrEnd) => self.comma_or_end(ContainerKind::Object),
                    (ContainerKind::Array, Expecting::ValueOrEnd) => self.array_value_or_end(),
                    (ContainerKind::Array, Expecting::CommaOrEnd) => self.comma_or_end(ContainerKind::Array),
                    (ContainerKind::Array, Expecting::Colon | Expecting::PropertyNameOrEnd) => {
                        unreachable!("array frames never expect a colon or property name")
                    }
                }
            }
        }
    }

    /// Pulls the next structural/value token, surfacing any warnings the
    /// lexer raised while producing it as `Diagnostic` segments first, and
    /// a fatal lexer failure as a halting `Diagnostic` segment (returning
    /// `None`). Comments and directives may appear between any two tokens
    /// (spec §4.3); the parser routes them here by discarding them and
    /// pulling the next one, since neither ever reaches the segment stream.
    fn next_token(&mut self) -> Option<Token> {
        loop {
            let result = self.lexer.next_token();
            for warning in self.lexer.take_warnings() {
                self.pending.push_back(Segment::Diagnostic(warning));
            }
            match result {
                Ok(Token { kind: TokenKind::Comment { .. } | TokenKind::Directive { .. }, .. }) => continue,
                Ok(tok) => return Some(tok),
                Err(diag) => {
                    self.pending.push_back(Segment::Diagnostic(diag));
                    self.halt();
                    return None;
                }
            }
        }
    }

    fn current_frame_id(&self) -> u64 {
        self.frames.top().map_or(0, |f| f.frame_id)
    }

    fn open_container(&mut self, kind: ContainerKind, at: Position) {
        if self.frames.depth() + 1 > self.settings.max_depth as usize {
            self.push_diag(DiagnosticCode::DepthExceeded, Severity::Error, at);
            return;
        }
        let track_keys = kind == ContainerKind::Object && self.settings.duplicate_keys != DuplicateKeys::Allow;
        let frame_id = self.frames.push(kind, track_keys);
        let parent_id = self.frames.top().expect("just pushed").parent_id;
        self.pending.push_back(Segment::ContainerStart { kind, frame_id, parent_id });
    }

    fn close_container(&mut self) {
        let frame = self.frames.pop().expect("dispatch guarantees a frame is open");
        self.pending.push_back(Segment::ContainerEnd {
            kind: frame.kind,
            frame_id: frame.frame_id,
            parent_id: frame.parent_id,
        });
        self.advance_after_value();
    }

    fn advance_after_value(&mut self) {
        if let Some(top) = self.frames.top_mut() {
            top.item_count += 1;
            top.expecting = Expecting::CommaOrEnd;
        } else {
            self.root_phase = RootPhase::AfterValue;
        }
    }

    fn expect_value(&mut self) {
        let Some(tok) = self.next_token() else { return };
        self.finish_value_token(tok);
    }

    fn finish_value_token(&mut self, tok: Token) {
        let frame_id = self.current_frame_id();
        match tok.kind {
            TokenKind::Punct(Punct::LBrace) => self.open_container(ContainerKind::Object, tok.start),
            TokenKind::Punct(Punct::LBracket) => self.open_container(ContainerKind::Array, tok.start),
            TokenKind::Literal(LiteralKind::Null) => self.emit_value(frame_id, ValuePayload::Null),
            TokenKind::Literal(LiteralKind::True) => self.emit_value(frame_id, ValuePayload::Bool(true)),
            TokenKind::Literal(LiteralKind::False) => self.emit_value(frame_id, ValuePayload::Bool(false)),
            TokenKind::Literal(LiteralKind::NaN) => self.emit_number(frame_id, String::from("NaN"), crate::flags::NumberFlags::decimal()),
            TokenKind::Literal(LiteralKind::PosInfinity) => {
                self.emit_number(frame_id, String::from("Infinity"), crate::flags::NumberFlags::decimal());
            }
            TokenKind::Literal(LiteralKind::NegInfinity) => {
                self.emit_number(frame_id, String::from("-Infinity"), crate::flags::NumberFlags::decimal());
            }
            TokenKind::Number { raw, flags } => self.emit_number(frame_id, raw, flags),
            TokenKind::String { raw, flags } => {
                let text = self.resolve_string_text(raw);
                self.emit_value(frame_id, ValuePayload::String { text, flags });
            }
            TokenKind::Eof => self.push_diag(DiagnosticCode::UnexpectedEof, Severity::Error, tok.start),
            TokenKind::Punct(_) | TokenKind::Comment { .. } | TokenKind::Directive { .. } => {
                self.push_diag(DiagnosticCode::UnexpectedToken, Severity::Error, tok.start);
            }
        }
    }

    fn emit_number(&mut self, frame_id: u64, raw: String, flags: crate::flags::NumberFlags) {
        let raw = match self.settings.number_representation {
            NumberRepresentation::RawSlice => raw,
            NumberRepresentation::CanonicalText => canonical_number_text(&raw, flags),
        };
        self.emit_value(frame_id, ValuePayload::Number { raw, flags });
    }

    fn emit_value(&mut self, frame_id: u64, value: ValuePayload) {
        self.pending.push_back(Segment::Value { frame_id, value });
        self.advance_after_value();
    }

    /// Resolves a string token's body per `Settings::string_representation`:
    /// `RawSlice` keeps the source bytes between the quotes untouched
    /// (escapes included), `Decoded` resolves them, same split as
    /// `emit_number` makes for `number_representation`.
    fn resolve_string_text(&self, raw: String) -> String {
        match self.settings.string_representation {
            StringRepresentation::RawSlice => raw,
            StringRepresentation::Decoded => decode_string_escapes(&raw),
        }
    }

    fn object_name_or_end(&mut self) {
        let Some(tok) = self.next_token() else { return };
        match tok.kind {
            TokenKind::Eof => self.push_diag(DiagnosticCode::UnexpectedEof, Severity::Error, tok.start),
            TokenKind::Punct(Punct::RBrace) => {
                let empty = self.frames.top().expect("object frame").item_count == 0;
                if empty || self.settings.allow_trailing_commas {
                    self.close_container();
                } else {
                    self.push_diag(DiagnosticCode::TrailingCommaDisallowed, Severity::Error, tok.start);
                }
            }
            TokenKind::String { raw, flags } => self.finish_property_name(raw, flags, tok.start),
            _ => self.push_diag(DiagnosticCode::UnexpectedToken, Severity::Error, tok.start),
        }
    }

    fn finish_property_name(&mut self, raw: String, flags: crate::flags::StringFlags, at: Position) {
        use crate::flags::QuoteStyle;
        if flags.quote_style == QuoteStyle::Identifier && !self.settings.allow_unquoted_property_names {
            self.push_diag(DiagnosticCode::UnexpectedToken, Severity::Error, at);
            return;
        }
        if raw.len() as u64 > self.settings.max_property_name_bytes {
            self.push_diag(DiagnosticCode::PropertyNameTooLarge, Severity::Error, at);
            return;
        }
        let name = self.resolve_string_text(raw);

        let frame_id = self.current_frame_id();
        let duplicate = {
            let frame = self.frames.top_mut().expect("object frame");
            match &mut frame.seen_keys {
                Some(seen) => !seen.insert(name.clone()),
                None => false,
            }
        };
        if duplicate {
            match self.settings.duplicate_keys {
                DuplicateKeys::Allow => unreachable!("seen_keys only tracked when policy != Allow"),
                DuplicateKeys::Warn => {
                    self.pending.push_back(Segment::Diagnostic(Diagnostic::new(
                        DiagnosticCode::DuplicateKey,
                        Severity::Warning,
                        at,
                    )));
                }
                DuplicateKeys::Reject => {
                    self.push_diag(DiagnosticCode::DuplicateKey, Severity::Error, at);
                    return;
                }
            }
        }

        self.pending.push_back(Segment::PropertyName { frame_id, name, flags });
        self.frames.top_mut().expect("object frame").expecting = Expecting::Colon;
    }

    fn object_colon(&mut self) {
        let Some(tok) = self.next_token() else { return };
        match tok.kind {
            TokenKind::Eof => self.push_diag(DiagnosticCode::UnexpectedEof, Severity::Error, tok.start),
            TokenKind::Punct(Punct::Colon) => {
                self.frames.top_mut().expect("object frame").expecting = Expecting::ValueOrEnd;
            }
            _ => self.push_diag(DiagnosticCode::MissingColon, Severity::Error, tok.start),
        }
    }

    fn array_value_or_end(&mut self) {
        let Some(tok) = self.next_token() else { return };
        match tok.kind {
            TokenKind::Eof => self.push_diag(DiagnosticCode::UnexpectedEof, Severity::Error, tok.start),
            TokenKind::Punct(Punct::RBracket) => {
                let empty = self.frames.top().expect("array frame").item_count == 0;
                if empty || self.settings.allow_trailing_commas {
                    self.close_container();
                } else {
                    self.push_diag(DiagnosticCode::TrailingCommaDisallowed, Severity::Error, tok.start);
                }
            }
            other => self.finish_value_token(Token { kind: other, start: tok.start }),
        }
    }

    fn comma_or_end(&mut self, kind: ContainerKind) {
        let Some(tok) = self.next_token() else { return };
        let (closer, mismatched) = match kind {
            ContainerKind::Object => (Punct::RBrace, Punct::RBracket),
            ContainerKind::Array => (Punct::RBracket, Punct::RBrace),
        };
        match tok.kind {
            TokenKind::Eof => self.push_diag(DiagnosticCode::UnexpectedEof, Severity::Error, tok.start),
            TokenKind::Punct(Punct::Comma) => {
                let next = match kind {
                    ContainerKind::Object => Expecting::PropertyNameOrEnd,
                    ContainerKind::Array => Expecting::ValueOrEnd,
                };
                self.frames.top_mut().expect("open frame").expecting = next;
            }
            TokenKind::Punct(p) if p == closer => self.close_container(),
            TokenKind::Punct(p) if p == mismatched => {
                self.push_diag(DiagnosticCode::ContainerMismatch, Severity::Error, tok.start);
            }
            _ => self.push_diag(DiagnosticCode::MissingComma, Severity::Error, tok.start),
        }
    }

    /// After the root value completes: if `require_trailing_eof`, consume
    /// trailing trivia and confirm true EOF, else halt immediately and
    /// leave anything remaining unread (spec §6 end-of-text boundary).
    fn check_trailing(&mut self) {
        if !self.settings.require_trailing_eof {
            self.halt();
            return;
        }
        let Some(tok) = self.next_token() else { return };
        if matches!(tok.kind, TokenKind::Eof) {
            self.halt();
        } else {
            self.push_diag(DiagnosticCode::ExtraDataAfterRoot, Severity::Error, tok.start);
        }
    }
}

/// Decodes backslash escapes in a string body already validated by the
/// lexer (so every escape here is known-well-formed).
fn decode_string_escapes(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('\\') => out.push('\\'),
            Some('/') => out.push('/'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('u') => {
                let high = take_hex4(&mut chars);
                if (0xD800..=0xDBFF).contains(&high) && chars.peek() == Some(&'\\') {
                    let mut lookahead = chars.clone();
                    lookahead.next();
                    if lookahead.next() == Some('u') {
                        let low = take_hex4(&mut lookahead);
                        if (0xDC00..=0xDFFF).contains(&low) {
                            chars = lookahead;
                            let combined = 0x10000 + (high - 0xD800) * 0x400 + (low - 0xDC00);
                            if let Some(ch) = char::from_u32(combined) {
                                out.push(ch);
                                continue;
                            }
                        }
                    }
                }
                out.push(char::from_u32(high).unwrap_or('\u{fffd}'));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

fn take_hex4(chars: &mut core::iter::Peekable<core::str::Chars<'_>>) -> u32 {
    let mut value = 0u32;
    for _ in 0..4 {
        if let Some(c) = chars.next() {
            value = value * 16 + c.to_digit(16).unwrap_or(0);
        }
    }
    value
}
