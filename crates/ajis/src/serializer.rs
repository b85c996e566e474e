//! The serializer: consumes a [`Segment`] stream and writes AJIS text to a
//! [`ByteSink`] (spec §4.4).
//!
//! Grounded on the teacher's `value.rs` `write_escaped_string`/`Display`
//! helpers, generalized from rendering a fully materialized [`crate::value`]
//! tree to rendering directly off the segment stream. `Compact`/`Pretty`
//! formatting write straight through with O(depth) memory; `Canonical`
//! formatting sorts each object's members by key, which — like the
//! teacher's `BTreeMap`-backed `Map` — requires buffering an object's
//! members until its `ContainerEnd` arrives (spec §4.4 "deterministic
//! canonical form").
use alloc::{format, string::String, vec::Vec};

use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    flags::NumberFlags,
    io::ByteSink,
    numeric::canonical_number_text,
    position::Position,
    segment::{ContainerKind, Segment, ValuePayload},
    settings::{Formatting, Settings},
};

struct StreamFrame {
    kind: ContainerKind,
    item_count: u64,
}

/// One object/array still being assembled in `Canonical` mode.
struct CanonicalFrame {
    kind: ContainerKind,
    /// `(key, rendered value)` pairs, sorted by key at close (Object only).
    entries: Vec<(String, String)>,
    /// Rendered element text, in source order (Array only).
    items: Vec<String>,
}

/// Writes an AJIS segment stream out to a [`ByteSink`] (spec §4.4).
pub struct Serializer<K: ByteSink> {
    sink: K,
    settings: Settings,
    stack: Vec<StreamFrame>,
    canon_stack: Vec<CanonicalFrame>,
    pending_key: Option<String>,
}

impl<K: ByteSink> Serializer<K> {
    /// Creates a serializer writing to `sink` under `settings`.
    #[must_use]
    pub fn new(sink: K, settings: Settings) -> Self {
        Self {
            sink,
            settings,
            stack: Vec::new(),
            canon_stack: Vec::new(),
            pending_key: None,
        }
    }

    fn is_canonical(&self) -> bool {
        matches!(self.settings.formatting, Formatting::Canonical)
    }

    fn io_err(&self, err: crate::io::IoError) -> Diagnostic {
        Diagnostic::new(DiagnosticCode::IoWrite(err.0), Severity::Critical, Position::start())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Diagnostic> {
        self.sink.write(bytes).map_err(|e| self.io_err(e))
    }

    /// Consumes one segment, advancing the serializer's own nesting state.
    /// `Progress`/`Diagnostic` segments carry no rendered output.
    pub fn write_segment(&mut self, segment: Segment) -> Result<(), Diagnostic> {
        match segment {
            Segment::Progress { .. } | Segment::Diagnostic(_) => Ok(()),
            Segment::ContainerStart { kind, .. } => self.on_container_start(kind),
            Segment::ContainerEnd { kind, .. } => self.on_container_end(kind),
            Segment::PropertyName { name, .. } => {
                self.pending_key = Some(name);
                Ok(())
            }
            Segment::Value { value, .. } => self.on_value(&value),
        }
    }

    /// Finalizes the serialize call, returning the underlying sink. Errors
    /// if the segment stream left any container unterminated.
    pub fn finish(self) -> Result<K, Diagnostic> {
        if !self.stack.is_empty() || !self.canon_stack.is_empty() {
            return Err(Diagnostic::new(
                DiagnosticCode::SegmentStreamUnbalanced,
                Severity::Error,
                Position::start(),
            ));
        }
        Ok(self.sink)
    }

    fn on_container_start(&mut self, kind: ContainerKind) -> Result<(), Diagnostic> {
        if self.is_canonical() {
            self.canon_stack.push(CanonicalFrame {
                kind,
                entries: Vec::new(),
                items: Vec::new(),
            });
            return Ok(());
        }
        self.before_member()?;
        self.write_bytes(open_bracket(kind))?;
        self.stack.push(StreamFrame { kind, item_count: 0 });
        Ok(())
    }

    fn on_container_end(&mut self, kind: ContainerKind) -> Result<(), Diagnostic> {
        if self.is_canonical() {
            let frame = self
                .canon_stack
                .pop()
                .ok_or_else(|| self.unbalanced(kind))?;
            let rendered = render_canonical_container(frame);
            return self.deliver_canonical(rendered);
        }

        let frame = self.stack.pop().ok_or_else(|| self.unbalanced(kind))?;
        if let Formatting::Pretty { indent } = self.settings.formatting {
            if frame.item_count > 0 {
                self.write_bytes(b"\n")?;
                self.write_indent(self.stack.len(), indent)?;
            }
        }
        self.write_bytes(close_bracket(kind))
    }

    fn unbalanced(&self, _kind: ContainerKind) -> Diagnostic {
        Diagnostic::new(DiagnosticCode::SegmentStreamUnbalanced, Severity::Error, Position::start())
    }

    fn on_value(&mut self, value: &ValuePayload) -> Result<(), Diagnostic> {
        let text = render_value(value, self.settings);
        if self.is_canonical() {
            return self.deliver_canonical(text);
        }
        self.before_member()?;
        self.write_bytes(text.as_bytes())
    }

    /// In `Canonical` mode, routes a fully-rendered fragment (a value or a
    /// just-closed container) to its destination: the enclosing canonical
    /// frame if one is open, or straight to the sink if this was the root.
    fn deliver_canonical(&mut self, text: String) -> Result<(), Diagnostic> {
        match self.canon_stack.last_mut() {
            Some(frame) if frame.kind == ContainerKind::Object => {
                let key = self.pending_key.take().unwrap_or_default();
                frame.entries.push((key, text));
                Ok(())
            }
            Some(frame) => {
                frame.items.push(text);
                Ok(())
            }
            None => self.write_bytes(text.as_bytes()),
        }
    }

    /// Writes the comma, indentation, and (if inside an object) `"key":`
    /// prefix that precedes a streamed member.
    fn before_member(&mut self) -> Result<(), Diagnostic> {
        let needs_comma = self.stack.last().is_some_and(|f| f.item_count > 0);
        if let Some(top) = self.stack.last_mut() {
            top.item_count += 1;
        }
        if needs_comma {
            self.write_bytes(b",")?;
        }
        if let Formatting::Pretty { indent } = self.settings.formatting {
            if !self.stack.is_empty() {
                self.write_bytes(b"\n")?;
                self.write_indent(self.stack.len(), indent)?;
            }
        }
        if let Some(key) = self.pending_key.take() {
            self.write_bytes(encode_string(&key).as_bytes())?;
            self.write_bytes(b":")?;
            if matches!(self.settings.formatting, Formatting::Pretty { .. }) {
                self.write_bytes(b" ")?;
            }
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize, indent: u8) -> Result<(), Diagnostic> {
        for _ in 0..depth {
            for _ in 0..indent {
                self.write_bytes(b" ")?;
            }
        }
        Ok(())
    }
}

fn open_bracket(kind: ContainerKind) -> &'static [u8] {
    match kind {
        ContainerKind::Object => b"{",
        ContainerKind::Array => b"[",
    }
}

fn close_bracket(kind: ContainerKind) -> &'static [u8] {
    match kind {
        ContainerKind::Object => b"}",
        ContainerKind::Array => b"]",
    }
}

fn render_canonical_container(mut frame: CanonicalFrame) -> String {
    match frame.kind {
        ContainerKind::Object => {
            frame.entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = String::from("{");
            for (i, (key, value)) in frame.entries.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&encode_string_canonical(key));
                out.push(':');
                out.push_str(value);
            }
            out.push('}');
            out
        }
        ContainerKind::Array => {
            let mut out = String::from("[");
            for (i, item) in frame.items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(item);
            }
            out.push(']');
            out
        }
    }
}

fn render_value(value: &ValuePayload, settings: Settings) -> String {
    match value {
        ValuePayload::Null => String::from("null"),
        ValuePayload::Bool(true) => String::from("true"),
        ValuePayload::Bool(false) => String::from("false"),
        ValuePayload::Number { raw, flags } => render_number(raw, *flags, settings),
        ValuePayload::String { text, .. } => {
            if matches!(settings.formatting, Formatting::Canonical) {
                encode_string_canonical(text)
            } else {
                encode_string(text)
            }
        }
    }
}

fn render_number(raw: &str, flags: NumberFlags, settings: Settings) -> String {
    if matches!(settings.formatting, Formatting::Canonical) {
        canonical_number_text(raw, flags)
    } else {
        format!("{raw}")
    }
}

/// Encodes `text` as a double-quoted AJIS string literal, escaping only
/// what is structurally required: `"`, `\`, and ASCII control characters.
fn encode_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Encodes `text` as a double-quoted AJIS string literal for `Canonical`
/// formatting: only `"`, `\`, and `\uXXXX` for every C0 control character
/// (spec §4.4) — no named shorthand (`\n`, `\t`, ...), so canonical output
/// is byte-identical across implementations regardless of which named
/// escapes they happen to prefer.
fn encode_string_canonical(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
