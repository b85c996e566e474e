#![allow(missing_docs)]

//! Full parse -> transform -> serialize pipelines, composing more than one
//! transform in sequence the way an embedder would chain them.

use std::collections::BTreeMap;

use ajis::{
    parse_path, DropByPath, Formatting, PatchOp, RenameKeys, Segment, SelectMode, SelectSubtree,
    Settings, Transform, UndefinedTargetPolicy,
};

mod common;
use common::{parse_all, serialize_all};

fn run<T: Transform>(segments: Vec<Segment>, mut transform: T) -> Vec<Segment> {
    let mut out = Vec::new();
    for segment in segments {
        out.extend(transform.apply(segment));
    }
    out.extend(transform.finish());
    out
}

#[test]
fn drop_then_rename_composes_linearly() {
    let text = r#"{"secret":"x","old_name":1,"keep":2}"#;
    let segments = parse_all(text, Settings::default());

    let after_drop = run(segments, DropByPath::new(parse_path("secret").unwrap()));

    let mut rules = BTreeMap::new();
    rules.insert(String::from("old_name"), String::from("new_name"));
    let after_rename = run(after_drop, RenameKeys::new(rules));

    let out = serialize_all(after_rename, Settings::default());
    assert_eq!(out, r#"{"new_name":1,"keep":2}"#);
}

#[test]
fn select_then_canonicalize_extracts_and_normalizes_a_subtree() {
    let text = r#"{"meta":{"b":2,"a":1_000},"payload":[1,2,3]}"#;
    let segments = parse_all(text, Settings::lax());

    let selected = run(segments, SelectSubtree::new(parse_path("meta").unwrap(), SelectMode::Bare));
    let out = serialize_all(selected, Settings { formatting: Formatting::Canonical, ..Settings::lax() });
    assert_eq!(out, r#"{"a":1000,"b":2}"#);
}

#[test]
fn patch_set_on_a_wildcard_path_touches_every_matching_element() {
    let text = r#"[{"status":"pending"},{"status":"pending"}]"#;
    let segments = parse_all(text, Settings::default());

    let replacement = parse_all(r#""done""#, Settings::default());
    let patch = ajis::Patch::new(
        parse_path("[*].status").unwrap(),
        PatchOp::Set(replacement),
        UndefinedTargetPolicy::NoOp,
    );
    let out = serialize_all(run(segments, patch), Settings::default());
    assert_eq!(out, r#"[{"status":"done"},{"status":"done"}]"#);
}

#[test]
fn drop_by_path_on_a_deeply_nested_wildcard_leaves_siblings_intact() {
    let text = r#"{"rows":[{"id":1,"tmp":"a"},{"id":2,"tmp":"b"},{"id":3,"tmp":"c"}],"count":3}"#;
    let segments = parse_all(text, Settings::default());
    let out = serialize_all(
        run(segments, DropByPath::new(parse_path("rows[*].tmp").unwrap())),
        Settings::default(),
    );
    assert_eq!(out, r#"{"rows":[{"id":1},{"id":2},{"id":3}],"count":3}"#);
}
