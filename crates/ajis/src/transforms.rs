//! Segment-to-segment transforms (spec §4.5).
//!
//! Each transform implements [`Transform`], consuming one [`Segment`] at a
//! time and producing zero or more in return — the same bounded-buffering
//! discipline as the rest of the pipeline (spec §5, §9): a transform never
//! holds more than the segments belonging to the single item it is
//! currently deciding about (one array element for
//! [`FilterArrayItems`], one matched subtree for the others).
use alloc::{string::String, vec::Vec};

use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    flags::{QuoteStyle, StringFlags},
    path::{path_matches, Path, PathComponent, PathTracker},
    position::Position,
    segment::{ContainerKind, Segment},
};

/// A segment-to-segment transform (spec §4.5).
pub trait Transform {
    /// Consumes one segment, returning the segments (zero or more) to
    /// forward downstream in its place.
    fn apply(&mut self, segment: Segment) -> Vec<Segment>;

    /// Called once after the last segment has been offered to `apply`, for
    /// transforms that need to flush end-of-stream state (e.g. [`Patch`]'s
    /// undefined-target policy). Most transforms need nothing here.
    fn finish(&mut self) -> Vec<Segment> {
        Vec::new()
    }
}

fn plain_string_flags() -> StringFlags {
    StringFlags {
        has_escapes: false,
        has_non_ascii: false,
        quote_style: QuoteStyle::Double,
    }
}

/// Drops the subtree (object member or array element) addressed by
/// `pattern`, wherever it occurs (spec §4.5 "drop-by-path").
pub struct DropByPath {
    pattern: Path,
    tracker: PathTracker,
    pending_drop: bool,
    skip_until_frame: Option<u64>,
}

impl DropByPath {
    /// Drops whatever matches `pattern`.
    #[must_use]
    pub fn new(pattern: Path) -> Self {
        Self {
            pattern,
            tracker: PathTracker::new(),
            pending_drop: false,
            skip_until_frame: None,
        }
    }
}

impl Transform for DropByPath {
    fn apply(&mut self, segment: Segment) -> Vec<Segment> {
        if let Some(skip_frame) = self.skip_until_frame {
            if let Segment::ContainerEnd { frame_id, .. } = &segment {
                if *frame_id == skip_frame {
                    self.skip_until_frame = None;
                    // The matched frame's own ContainerStart never called
                    // `enter_container` (it was intercepted below), so only
                    // the path component it pushed needs popping here.
                    self.tracker.leave_scalar_value();
                }
            }
            return match segment {
                Segment::Diagnostic(_) | Segment::Progress { .. } => alloc::vec![segment],
                _ => Vec::new(),
            };
        }

        match segment {
            Segment::PropertyName { ref name, .. } => {
                self.tracker.enter_object_member(name);
                if path_matches(&self.pattern, self.tracker.current()) {
                    self.pending_drop = true;
                    return Vec::new();
                }
                alloc::vec![segment]
            }
            Segment::ContainerStart { kind, frame_id, .. } => {
                self.tracker.enter_array_element();
                let matched =
                    core::mem::take(&mut self.pending_drop) || path_matches(&self.pattern, self.tracker.current());
                if matched {
                    self.skip_until_frame = Some(frame_id);
                    return Vec::new();
                }
                self.tracker.enter_container(kind);
                alloc::vec![segment]
            }
            Segment::ContainerEnd { .. } => {
                self.tracker.leave_container();
                alloc::vec![segment]
            }
            Segment::Value { .. } => {
                self.tracker.enter_array_element();
                let matched =
                    core::mem::take(&mut self.pending_drop) || path_matches(&self.pattern, self.tracker.current());
                self.tracker.leave_scalar_value();
                if matched {
                    Vec::new()
                } else {
                    alloc::vec![segment]
                }
            }
            other => alloc::vec![other],
        }
    }
}

/// Renames object keys according to a fixed `old -> new` map, wherever they
/// occur (spec §4.5 "rename-keys"). Stateless aside from the rule map, so
/// memory use is independent of document size.
pub struct RenameKeys {
    rules: alloc::collections::BTreeMap<String, String>,
}

impl RenameKeys {
    /// Renames any key found in `rules` to its mapped value.
    #[must_use]
    pub fn new(rules: alloc::collections::BTreeMap<String, String>) -> Self {
        Self { rules }
    }
}

impl Transform for RenameKeys {
    fn apply(&mut self, segment: Segment) -> Vec<Segment> {
        match segment {
            Segment::PropertyName { frame_id, name, flags } => {
                let name = self.rules.get(&name).cloned().unwrap_or(name);
                alloc::vec![Segment::PropertyName { frame_id, name, flags }]
            }
            other => alloc::vec![other],
        }
    }
}

/// How [`SelectSubtree`] presents the selected value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Emit the selected subtree's own segments directly, as if it were the
    /// whole document.
    Bare,
    /// Wrap the selected subtree as the sole member of a synthetic object,
    /// keyed by the selector's final path component.
    Wrap,
}

/// Emits only the subtree addressed by `pattern`, discarding everything
/// else (spec §4.5 "select-subtree").
pub struct SelectSubtree {
    pattern: Path,
    mode: SelectMode,
    tracker: PathTracker,
    matched_frame: Option<u64>,
    done: bool,
}

impl SelectSubtree {
    /// Selects the subtree at `pattern`, presented per `mode`.
    #[must_use]
    pub fn new(pattern: Path, mode: SelectMode) -> Self {
        Self {
            pattern,
            mode,
            tracker: PathTracker::new(),
            matched_frame: None,
            done: false,
        }
    }

    fn wrap_key(&self) -> String {
        match self.pattern.last() {
            Some(PathComponent::Key(k)) => k.clone(),
            Some(PathComponent::Index(i)) => alloc::format!("{i}"),
            _ => String::from("value"),
        }
    }

    fn wrap_open(&self) -> [Segment; 2] {
        [
            Segment::ContainerStart { kind: ContainerKind::Object, frame_id: 0, parent_id: 0 },
            Segment::PropertyName { frame_id: 0, name: self.wrap_key(), flags: plain_string_flags() },
        ]
    }

    fn wrap_close() -> Segment {
        Segment::ContainerEnd { kind: ContainerKind::Object, frame_id: 0, parent_id: 0 }
    }
}

impl Transform for SelectSubtree {
    fn apply(&mut self, segment: Segment) -> Vec<Segment> {
        if self.done {
            return Vec::new();
        }
        if let Segment::Diagnostic(_) | Segment::Progress { .. } = &segment {
            return alloc::vec![segment];
        }

        if let Some(frame_id) = self.matched_frame {
            let is_end = matches!(&segment, Segment::ContainerEnd { frame_id: fid, .. } if *fid == frame_id);
            let mut out = alloc::vec![segment];
            if is_end {
                self.matched_frame = None;
                self.done = true;
                if self.mode == SelectMode::Wrap {
                    out.push(Self::wrap_close());
                }
            }
            return out;
        }

        match segment {
            Segment::PropertyName { ref name, .. } => {
                self.tracker.enter_object_member(name);
                Vec::new()
            }
            Segment::ContainerStart { kind, frame_id, .. } => {
                self.tracker.enter_array_element();
                if path_matches(&self.pattern, self.tracker.current()) {
                    self.matched_frame = Some(frame_id);
                    let mut out = Vec::new();
                    if self.mode == SelectMode::Wrap {
                        out.extend(self.wrap_open());
                    }
                    out.push(Segment::ContainerStart { kind, frame_id, parent_id: 0 });
                    out
                } else {
                    self.tracker.enter_container(kind);
                    Vec::new()
                }
            }
            Segment::ContainerEnd { .. } => {
                self.tracker.leave_container();
                Vec::new()
            }
            Segment::Value { .. } => {
                self.tracker.enter_array_element();
                let matched = path_matches(&self.pattern, self.tracker.current());
                self.tracker.leave_scalar_value();
                if matched {
                    self.done = true;
                    let mut out = Vec::new();
                    if self.mode == SelectMode::Wrap {
                        out.extend(self.wrap_open());
                    }
                    out.push(segment);
                    if self.mode == SelectMode::Wrap {
                        out.push(Self::wrap_close());
                    }
                    out
                } else {
                    Vec::new()
                }
            }
            other => alloc::vec![other],
        }
    }
}

enum FilterState {
    Searching,
    InsideArray { frame_id: u64, depth: u32, buffer: Vec<Segment> },
}

/// Keeps only the elements of the array at `pattern` for which `predicate`
/// returns `true`, buffering at most one element's own segments at a time
/// (spec §4.5 "filter-array-items").
pub struct FilterArrayItems<F: Fn(&[Segment]) -> bool> {
    pattern: Path,
    predicate: F,
    tracker: PathTracker,
    state: FilterState,
}

impl<F: Fn(&[Segment]) -> bool> FilterArrayItems<F> {
    /// Filters the array at `pattern`, keeping elements for which
    /// `predicate` (given that element's own segment sequence) is `true`.
    #[must_use]
    pub fn new(pattern: Path, predicate: F) -> Self {
        Self {
            pattern,
            predicate,
            tracker: PathTracker::new(),
            state: FilterState::Searching,
        }
    }
}

impl<F: Fn(&[Segment]) -> bool> Transform for FilterArrayItems<F> {
    fn apply(&mut self, segment: Segment) -> Vec<Segment> {
        match &mut self.state {
            FilterState::InsideArray { frame_id, depth, buffer } => {
                let fid = *frame_id;
                if let Segment::ContainerEnd { frame_id: end_id, .. } = &segment {
                    if *end_id == fid && *depth == 0 {
                        self.tracker.leave_scalar_value();
                        self.state = FilterState::Searching;
                        return alloc::vec![segment];
                    }
                }
                match &segment {
                    Segment::ContainerStart { .. } => *depth += 1,
                    Segment::ContainerEnd { .. } => *depth -= 1,
                    _ => {}
                }
                let at_top = *depth == 0;
                buffer.push(segment);
                let element_complete = at_top
                    && matches!(buffer.last(), Some(Segment::Value { .. }) | Some(Segment::ContainerEnd { .. }));
                if element_complete {
                    let item = core::mem::take(buffer);
                    if (self.predicate)(&item) {
                        item
                    } else {
                        Vec::new()
                    }
                } else {
                    Vec::new()
                }
            }
            // Everything outside the targeted array passes through unchanged;
            // only the tracker bookkeeping is updated here.
            FilterState::Searching => match segment {
                Segment::PropertyName { ref name, .. } => {
                    self.tracker.enter_object_member(name);
                    alloc::vec![segment]
                }
                Segment::ContainerStart { kind, frame_id, parent_id } => {
                    self.tracker.enter_array_element();
                    let on_path = path_matches(&self.pattern, self.tracker.current());
                    if on_path && kind == ContainerKind::Array {
                        self.state = FilterState::InsideArray { frame_id, depth: 0, buffer: Vec::new() };
                    } else {
                        self.tracker.enter_container(kind);
                    }
                    alloc::vec![Segment::ContainerStart { kind, frame_id, parent_id }]
                }
                Segment::ContainerEnd { .. } => {
                    self.tracker.leave_container();
                    alloc::vec![segment]
                }
                Segment::Value { .. } => {
                    self.tracker.enter_array_element();
                    self.tracker.leave_scalar_value();
                    alloc::vec![segment]
                }
                other => alloc::vec![other],
            },
        }
    }
}

/// What to do with a [`Patch`] whose target path never occurred in the
/// document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndefinedTargetPolicy {
    /// Emit a fatal diagnostic once the stream ends with no match found.
    Fail,
    /// Silently do nothing.
    NoOp,
}

/// One `Patch` operation (spec §4.5 "patch (set/insert/remove)").
pub enum PatchOp {
    /// Replace the matched member's value with these segments.
    Set(Vec<Segment>),
    /// Remove the matched member entirely.
    Remove,
    /// Append a new member (its own `PropertyName`/`Value` or bare `Value`
    /// segments) just before the matched container's `ContainerEnd`.
    Insert(Vec<Segment>),
}

/// Applies one `Set`/`Insert`/`Remove` operation at a path (spec §4.5).
pub struct Patch {
    target: Path,
    op: PatchOp,
    policy: UndefinedTargetPolicy,
    tracker: PathTracker,
    matched: bool,
    skip_until_frame: Option<u64>,
}

impl Patch {
    /// Applies `op` at `target`, following `policy` if `target` never
    /// occurs in the document.
    #[must_use]
    pub fn new(target: Path, op: PatchOp, policy: UndefinedTargetPolicy) -> Self {
        Self {
            target,
            op,
            policy,
            tracker: PathTracker::new(),
            matched: false,
            skip_until_frame: None,
        }
    }
}

impl Transform for Patch {
    fn apply(&mut self, segment: Segment) -> Vec<Segment> {
        if let Some(skip_frame) = self.skip_until_frame {
            if let Segment::ContainerEnd { frame_id, .. } = &segment {
                if *frame_id == skip_frame {
                    self.skip_until_frame = None;
                    // As in DropByPath: the matched frame's ContainerStart
                    // never called `enter_container`, so only pop the path
                    // component it pushed.
                    self.tracker.leave_scalar_value();
                }
            }
            return match segment {
                Segment::Diagnostic(_) | Segment::Progress { .. } => alloc::vec![segment],
                _ => Vec::new(),
            };
        }

        // Insert targets a container path: splice just before its ContainerEnd.
        if matches!(self.op, PatchOp::Insert(_)) {
            if let Segment::ContainerEnd { .. } = &segment {
                if path_matches(&self.target, self.tracker.current()) {
                    self.matched = true;
                    self.tracker.leave_container();
                    let PatchOp::Insert(extra) = &self.op else { unreachable!() };
                    let mut out = extra.clone();
                    out.push(segment);
                    return out;
                }
            }
        }

        match segment {
            Segment::PropertyName { ref name, .. } => {
                self.tracker.enter_object_member(name);
                if matches!(self.op, PatchOp::Set(_) | PatchOp::Remove)
                    && path_matches(&self.target, self.tracker.current())
                {
                    self.matched = true;
                    match &self.op {
                        PatchOp::Remove => return Vec::new(),
                        PatchOp::Set(_) => return alloc::vec![segment],
                        PatchOp::Insert(_) => unreachable!(),
                    }
                }
                alloc::vec![segment]
            }
            Segment::ContainerStart { kind, frame_id, parent_id } => {
                self.tracker.enter_array_element();
                if self.matched_just_now() {
                    return self.apply_matched_container_start(kind, frame_id, parent_id);
                }
                self.tracker.enter_container(kind);
                alloc::vec![Segment::ContainerStart { kind, frame_id, parent_id }]
            }
            Segment::ContainerEnd { .. } => {
                self.tracker.leave_container();
                alloc::vec![segment]
            }
            Segment::Value { .. } => {
                self.tracker.enter_array_element();
                let matched = path_matches(&self.target, self.tracker.current())
                    && matches!(self.op, PatchOp::Set(_) | PatchOp::Remove);
                self.tracker.leave_scalar_value();
                if matched {
                    match &self.op {
                        PatchOp::Remove => Vec::new(),
                        PatchOp::Set(replacement) => replacement.clone(),
                        PatchOp::Insert(_) => unreachable!(),
                    }
                } else {
                    alloc::vec![segment]
                }
            }
            other => alloc::vec![other],
        }
    }

    fn finish(&mut self) -> Vec<Segment> {
        if !self.matched && self.policy == UndefinedTargetPolicy::Fail {
            return alloc::vec![Segment::Diagnostic(Diagnostic::new(
                DiagnosticCode::PatchTargetNotFound,
                Severity::Error,
                Position::start(),
            ))];
        }
        Vec::new()
    }
}

impl Patch {
    /// `true` when a direct array-element (no `PropertyName`) target just
    /// matched via `enter_array_element`, for `Set`/`Remove` on container
    /// values addressed purely by index.
    fn matched_just_now(&self) -> bool {
        matches!(self.op, PatchOp::Set(_) | PatchOp::Remove)
            && path_matches(&self.target, self.tracker.current())
    }

    fn apply_matched_container_start(&mut self, kind: ContainerKind, frame_id: u64, _parent_id: u64) -> Vec<Segment> {
        self.matched = true;
        self.skip_until_frame = Some(frame_id);
        match &self.op {
            PatchOp::Remove => Vec::new(),
            PatchOp::Set(replacement) => replacement.clone(),
            PatchOp::Insert(_) => unreachable!(),
        }
    }
}
