//! A materialized JSON value tree, built only for test assertions.
//!
//! The pipeline itself never materializes a full document (spec §5); this
//! type exists purely so tests can assert "the parse of this text produced
//! this tree" without hand-writing segment sequences for every case.
use alloc::{borrow::ToOwned, collections::BTreeMap, string::String, vec::Vec};

use crate::segment::{ContainerKind, Segment, ValuePayload};

/// A reconstructed JSON value.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Value {
    Null,
    Bool(bool),
    Number(String),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

enum Frame {
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Reconstructs the single root [`Value`] produced by a full segment
/// stream, ignoring `Progress`/`Diagnostic` segments.
///
/// # Panics
/// Panics if `segments` is not a single well-formed document (unbalanced
/// containers, a property name with no following value, more than one root
/// value).
pub(crate) fn reconstruct(segments: &[Segment]) -> Value {
    let mut stack: Vec<Frame> = Vec::new();
    let mut pending_key: Option<String> = None;
    let mut root: Option<Value> = None;

    let mut place = |value: Value, stack: &mut Vec<Frame>, pending_key: &mut Option<String>, root: &mut Option<Value>| {
        match stack.last_mut() {
            Some(Frame::Array(items)) => items.push(value),
            Some(Frame::Object(map)) => {
                let key = pending_key.take().expect("object value with no preceding key");
                map.insert(key, value);
            }
            None => {
                assert!(root.is_none(), "more than one root value in segment stream");
                *root = Some(value);
            }
        }
    };

    for segment in segments {
        match segment {
            Segment::Progress { .. } | Segment::Diagnostic(_) => {}
            Segment::ContainerStart { kind, .. } => {
                stack.push(match kind {
                    ContainerKind::Array => Frame::Array(Vec::new()),
                    ContainerKind::Object => Frame::Object(BTreeMap::new()),
                });
            }
            Segment::ContainerEnd { .. } => {
                let frame = stack.pop().expect("ContainerEnd with no open frame");
                let value = match frame {
                    Frame::Array(items) => Value::Array(items),
                    Frame::Object(map) => Value::Object(map),
                };
                place(value, &mut stack, &mut pending_key, &mut root);
            }
            Segment::PropertyName { name, .. } => {
                pending_key = Some(name.to_owned());
            }
            Segment::Value { value, .. } => {
                let value = match value {
                    ValuePayload::Null => Value::Null,
                    ValuePayload::Bool(b) => Value::Bool(*b),
                    ValuePayload::Number { raw, .. } => Value::Number(raw.clone()),
                    ValuePayload::String { text, .. } => Value::String(text.clone()),
                };
                place(value, &mut stack, &mut pending_key, &mut root);
            }
        }
    }

    assert!(stack.is_empty(), "segment stream left unterminated containers");
    root.expect("segment stream produced no root value")
}
