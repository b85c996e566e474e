//! The segment stream (spec §3.5) — the pipeline's atomic unit, produced by
//! the parser and consumed by the serializer and transforms.
//!
//! Shaped the way the teacher's `ParseEvent` (`event.rs`) is shaped: one
//! flat tagged enum, no dynamic dispatch, `serde` support gated behind
//! `cfg(any(test, feature = "serde"))` so default builds stay
//! dependency-light.
use alloc::string::String;

use crate::{
    diagnostics::Diagnostic,
    flags::{NumberFlags, StringFlags},
};

/// Which kind of container a `ContainerStart`/`ContainerEnd` pair opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ContainerKind {
    /// A JSON object (`{ ... }`).
    Object,
    /// A JSON array (`[ ... ]`).
    Array,
}

/// A primitive value's payload (spec §3.5 `Value`).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum ValuePayload {
    /// `null`.
    Null,
    /// `true`/`false`.
    Bool(bool),
    /// A number, carrying its exact source text and lexical flags.
    Number {
        /// Source text of the literal (or its canonical form, depending on
        /// `Settings::number_representation`).
        raw: String,
        /// Lexical flags describing the literal.
        flags: NumberFlags,
    },
    /// A string, carrying either its raw source body or its decoded form
    /// depending on `Settings::string_representation`.
    String {
        /// The string content (raw or decoded; see
        /// `Settings::string_representation`).
        text: String,
        /// Lexical flags describing the literal.
        flags: StringFlags,
    },
}

/// The pipeline's atomic unit (spec §3.5).
///
/// A full parse or serialize always produces/consumes non-meta segments in
/// source order with balanced `ContainerStart`/`ContainerEnd` nesting;
/// `Progress` and `Diagnostic` may appear anywhere and carry no structural
/// obligation (spec invariants, §3.5).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[cfg_attr(any(test, feature = "serde"), serde(tag = "kind"))]
pub enum Segment {
    /// The start of an object or array.
    ContainerStart {
        /// Which kind of container this is.
        kind: ContainerKind,
        /// This frame's unique id within the parse.
        frame_id: u64,
        /// The enclosing frame's id (`0` for a root-level container).
        parent_id: u64,
    },
    /// The matching end of a container previously opened with
    /// `ContainerStart` carrying the same `frame_id`.
    ContainerEnd {
        /// Which kind of container this is.
        kind: ContainerKind,
        /// This frame's unique id within the parse.
        frame_id: u64,
        /// The enclosing frame's id (`0` for a root-level container).
        parent_id: u64,
    },
    /// An object property name, immediately followed (with no intervening
    /// non-meta segment) by the segment(s) for its value.
    PropertyName {
        /// The object frame this property belongs to.
        frame_id: u64,
        /// The property name (raw or decoded; see
        /// `Settings::string_representation`).
        name: String,
        /// Lexical flags describing the name token.
        flags: StringFlags,
    },
    /// A primitive value belonging to `frame_id` (the enclosing object or
    /// array, or `0` for a primitive root).
    Value {
        /// The enclosing frame, or `0` at the root.
        frame_id: u64,
        /// The value's kind and payload.
        value: ValuePayload,
    },
    /// A progress checkpoint; emitted whenever cumulative bytes read cross a
    /// multiple of `Settings::emit_progress_every_bytes`.
    Progress {
        /// Cumulative bytes read so far.
        bytes_read: u64,
        /// An optional hint about the total expected input size.
        total_bytes_hint: Option<u64>,
    },
    /// A diagnostic raised during parsing or serializing.
    Diagnostic(Diagnostic),
}

impl Segment {
    /// Returns `true` for the two meta-segment kinds (`Progress`,
    /// `Diagnostic`) that never affect structural interpretation (spec
    /// §3.5).
    #[must_use]
    pub fn is_meta(&self) -> bool {
        matches!(self, Self::Progress { .. } | Self::Diagnostic(_))
    }
}
