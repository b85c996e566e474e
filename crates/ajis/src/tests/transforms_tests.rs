use alloc::{collections::BTreeMap, string::String, vec::Vec};

use crate::{
    diagnostics::DiagnosticCode,
    path::{parse_path, PathComponent},
    segment::Segment,
    settings::Settings,
    tests::{parse_all, serialize_all},
    transforms::{
        DropByPath, FilterArrayItems, Patch, PatchOp, RenameKeys, SelectMode, SelectSubtree, Transform,
        UndefinedTargetPolicy,
    },
    value,
};

fn run<T: Transform>(segments: Vec<Segment>, mut transform: T) -> Vec<Segment> {
    let mut out = Vec::new();
    for segment in segments {
        out.extend(transform.apply(segment));
    }
    out.extend(transform.finish());
    out
}

fn render(segments: Vec<Segment>) -> String {
    serialize_all(segments, Settings::default())
}

#[test]
fn drop_by_path_removes_an_object_member() {
    let segments = parse_all(r#"{"a":1,"b":2,"c":3}"#, Settings::default());
    let out = run(segments, DropByPath::new(parse_path("b").unwrap()));
    assert_eq!(render(out), r#"{"a":1,"c":3}"#);
}

#[test]
fn drop_by_path_removes_a_nested_container_value() {
    let segments = parse_all(r#"{"a":{"x":1,"y":2},"b":3}"#, Settings::default());
    let out = run(segments, DropByPath::new(parse_path("a").unwrap()));
    assert_eq!(render(out), r#"{"b":3}"#);
}

#[test]
fn drop_by_path_removes_an_array_element() {
    let segments = parse_all("[10,20,30]", Settings::default());
    let out = run(segments, DropByPath::new(parse_path("[1]").unwrap()));
    assert_eq!(render(out), "[10,30]");
}

#[test]
fn drop_by_path_wildcard_removes_matching_key_in_every_element() {
    let segments = parse_all(r#"[{"id":1,"secret":"x"},{"id":2,"secret":"y"}]"#, Settings::default());
    let out = run(segments, DropByPath::new(parse_path("[*].secret").unwrap()));
    assert_eq!(render(out), r#"[{"id":1},{"id":2}]"#);
}

#[test]
fn rename_keys_applies_everywhere_in_the_document() {
    let mut rules = BTreeMap::new();
    rules.insert(String::from("old"), String::from("new"));
    let segments = parse_all(r#"{"old":1,"nested":{"old":2}}"#, Settings::default());
    let out = run(segments, RenameKeys::new(rules));
    assert_eq!(render(out), r#"{"new":1,"nested":{"new":2}}"#);
}

#[test]
fn rename_keys_leaves_unmapped_keys_untouched() {
    let rules = BTreeMap::new();
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    let out = run(segments, RenameKeys::new(rules));
    assert_eq!(render(out), r#"{"a":1}"#);
}

#[test]
fn select_subtree_bare_emits_only_the_match() {
    let segments = parse_all(r#"{"a":1,"b":{"x":2,"y":3},"c":4}"#, Settings::default());
    let out = run(segments, SelectSubtree::new(parse_path("b").unwrap(), SelectMode::Bare));
    assert_eq!(render(out), r#"{"x":2,"y":3}"#);
}

#[test]
fn select_subtree_wrap_keys_by_final_path_component() {
    let segments = parse_all(r#"{"a":1,"b":{"x":2}}"#, Settings::default());
    let out = run(segments, SelectSubtree::new(parse_path("b").unwrap(), SelectMode::Wrap));
    assert_eq!(render(out), r#"{"b":{"x":2}}"#);
}

#[test]
fn select_subtree_scalar_match() {
    let segments = parse_all(r#"{"a":1,"b":2}"#, Settings::default());
    let out = run(segments, SelectSubtree::new(parse_path("b").unwrap(), SelectMode::Bare));
    assert_eq!(render(out), "2");
}

#[test]
fn select_subtree_array_element_match() {
    let segments = parse_all("[10,[20,30],40]", Settings::default());
    let out = run(segments, SelectSubtree::new(parse_path("[1]").unwrap(), SelectMode::Bare));
    assert_eq!(render(out), "[20,30]");
}

#[test]
fn select_subtree_wraps_scalar_match() {
    let segments = parse_all("[10,20]", Settings::default());
    let out = run(segments, SelectSubtree::new(parse_path("[1]").unwrap(), SelectMode::Wrap));
    assert_eq!(render(out), r#"{"1":20}"#);
}

fn keep_evens(item: &[Segment]) -> bool {
    matches!(
        item,
        [Segment::Value { value: crate::segment::ValuePayload::Number { raw, .. }, .. }]
            if raw.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false)
    )
}

#[test]
fn filter_array_items_keeps_matching_scalars() {
    let segments = parse_all("[1,2,3,4,5,6]", Settings::default());
    let out = run(segments, FilterArrayItems::new(Vec::new(), keep_evens));
    assert_eq!(render(out), "[2,4,6]");
}

#[test]
fn filter_array_items_leaves_the_rest_of_the_document_untouched() {
    let segments = parse_all(r#"{"name":"list","items":[1,2,3,4],"done":true}"#, Settings::default());
    let pattern = parse_path("items").unwrap();
    let out = run(segments, FilterArrayItems::new(pattern, keep_evens));
    assert_eq!(render(out), r#"{"name":"list","items":[2,4],"done":true}"#);
}

#[test]
fn filter_array_items_preserves_nested_container_elements() {
    let segments = parse_all(r#"[{"n":1},{"n":2},{"n":3},{"n":4}]"#, Settings::default());
    fn keep_if_n_even(item: &[Segment]) -> bool {
        for seg in item {
            if let Segment::Value { value: crate::segment::ValuePayload::Number { raw, .. }, .. } = seg {
                return raw.parse::<i64>().map(|n| n % 2 == 0).unwrap_or(false);
            }
        }
        false
    }
    let out = run(segments, FilterArrayItems::new(Vec::new(), keep_if_n_even));
    assert_eq!(render(out), r#"[{"n":2},{"n":4}]"#);
}

#[test]
fn filter_array_items_refilters_every_array_matched_by_a_wildcard() {
    let segments = parse_all(r#"{"groups":[[1,2,3],[4,5,6]]}"#, Settings::default());
    let pattern = parse_path("groups[*]").unwrap();
    let out = run(segments, FilterArrayItems::new(pattern, keep_evens));
    assert_eq!(render(out), r#"{"groups":[[2],[4,6]]}"#);
}

#[test]
fn patch_set_replaces_an_object_member_value() {
    let segments = parse_all(r#"{"a":1,"b":2}"#, Settings::default());
    let replacement = parse_all("99", Settings::default());
    let patch = Patch::new(
        parse_path("a").unwrap(),
        PatchOp::Set(replacement),
        UndefinedTargetPolicy::Fail,
    );
    let out = run(segments, patch);
    assert_eq!(render(out), r#"{"a":99,"b":2}"#);
}

#[test]
fn patch_set_replaces_a_container_valued_member() {
    let segments = parse_all(r#"{"a":{"x":1},"b":2}"#, Settings::default());
    let replacement = parse_all("[1,2,3]", Settings::default());
    let patch = Patch::new(
        parse_path("a").unwrap(),
        PatchOp::Set(replacement),
        UndefinedTargetPolicy::Fail,
    );
    let out = run(segments, patch);
    assert_eq!(render(out), r#"{"a":[1,2,3],"b":2}"#);
}

#[test]
fn patch_remove_drops_the_member_entirely() {
    let segments = parse_all(r#"{"a":1,"b":2}"#, Settings::default());
    let patch = Patch::new(parse_path("a").unwrap(), PatchOp::Remove, UndefinedTargetPolicy::Fail);
    let out = run(segments, patch);
    assert_eq!(render(out), r#"{"b":2}"#);
}

#[test]
fn patch_insert_appends_before_the_closing_brace() {
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    let insert_segments = alloc::vec![
        Segment::PropertyName {
            frame_id: 0,
            name: String::from("b"),
            flags: crate::flags::StringFlags {
                has_escapes: false,
                has_non_ascii: false,
                quote_style: crate::flags::QuoteStyle::Double,
            },
        },
        Segment::Value {
            frame_id: 0,
            value: crate::segment::ValuePayload::Number { raw: String::from("2"), flags: crate::flags::NumberFlags::decimal() },
        },
    ];
    let patch = Patch::new(Vec::new(), PatchOp::Insert(insert_segments), UndefinedTargetPolicy::Fail);
    let out = run(segments, patch);
    assert_eq!(render(out), r#"{"a":1,"b":2}"#);
}

#[test]
fn patch_undefined_target_fails_when_policy_is_fail() {
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    let patch = Patch::new(
        parse_path("missing").unwrap(),
        PatchOp::Remove,
        UndefinedTargetPolicy::Fail,
    );
    let out = run(segments, patch);
    assert!(out
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.code == DiagnosticCode::PatchTargetNotFound)));
}

#[test]
fn patch_undefined_target_is_silent_when_policy_is_noop() {
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    let patch = Patch::new(
        parse_path("missing").unwrap(),
        PatchOp::Remove,
        UndefinedTargetPolicy::NoOp,
    );
    let out = run(segments, patch);
    assert!(!out.iter().any(|s| matches!(s, Segment::Diagnostic(_))));
    assert_eq!(render(out), r#"{"a":1}"#);
}

#[test]
fn transforms_reconstruct_to_expected_value_tree() {
    let segments = parse_all(r#"{"keep":1,"drop":2}"#, Settings::default());
    let out = run(segments, DropByPath::new(parse_path("drop").unwrap()));
    let value = value::reconstruct(&out);
    let value::Value::Object(map) = value else {
        panic!("expected object root")
    };
    assert_eq!(map.len(), 1);
    assert!(map.contains_key("keep"));
}

#[test]
fn path_component_from_conversions_are_usable_in_patterns() {
    let pattern: crate::path::Path = alloc::vec![PathComponent::from("items"), PathComponent::from(0u64)];
    let segments = parse_all(r#"{"items":[7,8]}"#, Settings::default());
    let out = run(segments, SelectSubtree::new(pattern, SelectMode::Bare));
    assert_eq!(render(out), "7");
}
