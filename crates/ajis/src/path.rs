//! Segment paths (spec §4.5), used by every transform to address a location
//! in the document tree.
//!
//! Grounded on the teacher's `event.rs` `PathComponent`/`path!` macro for
//! the component shape, and on the `jsonrepair` example's `PathElem`/
//! `Logger` pattern for path-aware traversal bookkeeping (tracking where in
//! the tree the current segment sits as it streams past, rather than
//! building a full tree to query).
use alloc::{string::String, vec::Vec};

/// One step in a path: an object key, an array index, or `[*]` (any array
/// index — wildcard, used only in transform selectors, never in a concrete
/// position).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum PathComponent {
    /// An object member, addressed by key.
    Key(String),
    /// An array element, addressed by index.
    Index(u64),
    /// Any array index (transform selectors only).
    Wildcard,
}

impl From<&str> for PathComponent {
    fn from(key: &str) -> Self {
        Self::Key(String::from(key))
    }
}

impl From<u64> for PathComponent {
    fn from(index: u64) -> Self {
        Self::Index(index)
    }
}

/// A full path from the document root, e.g. `users[*].name`.
pub type Path = Vec<PathComponent>;

/// Parses a small path grammar: `.key`, `[index]`, `[*]`, and a bare leading
/// identifier, e.g. `users[*].name` or `[0].id`.
///
/// # Errors
/// Returns `Err` with the byte offset of the first unparseable character.
pub fn parse_path(text: &str) -> Result<Path, usize> {
    let bytes = text.as_bytes();
    let mut i = 0usize;
    let mut out = Path::new();

    while i < bytes.len() {
        match bytes[i] {
            b'.' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
                    i += 1;
                }
                if i == start {
                    return Err(start);
                }
                out.push(PathComponent::Key(String::from(&text[start..i])));
            }
            b'[' => {
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != b']' {
                    i += 1;
                }
                if i >= bytes.len() {
                    return Err(start);
                }
                let inner = &text[start..i];
                i += 1; // skip ']'
                if inner == "*" {
                    out.push(PathComponent::Wildcard);
                } else {
                    match inner.parse::<u64>() {
                        Ok(idx) => out.push(PathComponent::Index(idx)),
                        Err(_) => return Err(start),
                    }
                }
            }
            _ => {
                let start = i;
                while i < bytes.len() && bytes[i] != b'.' && bytes[i] != b'[' {
                    i += 1;
                }
                out.push(PathComponent::Key(String::from(&text[start..i])));
            }
        }
    }
    Ok(out)
}

/// Tracks the path of the segment currently passing through a transform,
/// updated incrementally from `ContainerStart`/`ContainerEnd`/`PropertyName`
/// segments without ever materializing the document itself.
///
/// Usage, one call per incoming segment before forwarding/dropping it:
/// - `PropertyName(name)` → [`Self::enter_object_member`]
/// - `Value`/`ContainerStart` → [`Self::enter_array_element`] first (a no-op
///   unless the innermost open frame is an array)
/// - `ContainerStart(kind)` → [`Self::enter_container`]
/// - `ContainerEnd` → [`Self::leave_container`]
/// - `Value` (scalar) → [`Self::leave_scalar_value`]
#[derive(Debug, Clone, Default)]
pub(crate) struct PathTracker {
    stack: Vec<PathComponent>,
    frame_kinds: Vec<crate::segment::ContainerKind>,
    array_next_index: Vec<u64>,
}

impl PathTracker {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn current(&self) -> &[PathComponent] {
        &self.stack
    }

    pub(crate) fn enter_object_member(&mut self, key: &str) {
        self.stack.push(PathComponent::Key(String::from(key)));
    }

    pub(crate) fn enter_array_element(&mut self) {
        if self.frame_kinds.last() == Some(&crate::segment::ContainerKind::Array) {
            let idx = self
                .array_next_index
                .last_mut()
                .expect("array frame_kind implies a matching counter");
            self.stack.push(PathComponent::Index(*idx));
            *idx += 1;
        }
    }

    pub(crate) fn enter_container(&mut self, kind: crate::segment::ContainerKind) {
        self.frame_kinds.push(kind);
        self.array_next_index.push(0);
    }

    pub(crate) fn leave_container(&mut self) {
        self.frame_kinds.pop();
        self.array_next_index.pop();
        self.stack.pop();
    }

    pub(crate) fn leave_scalar_value(&mut self) {
        self.stack.pop();
    }
}

/// Returns `true` if `candidate` matches `pattern`, where `pattern` may use
/// [`PathComponent::Wildcard`] to match any index at that position.
#[must_use]
pub fn path_matches(pattern: &[PathComponent], candidate: &[PathComponent]) -> bool {
    if pattern.len() != candidate.len() {
        return false;
    }
    pattern.iter().zip(candidate).all(|(p, c)| match (p, c) {
        (PathComponent::Wildcard, PathComponent::Index(_)) => true,
        (a, b) => a == b,
    })
}
