use alloc::{string::String, vec, vec::Vec};

use crate::path::{parse_path, path_matches, PathComponent};

#[test]
fn parses_leading_bare_key() {
    assert_eq!(
        parse_path("users").unwrap(),
        vec![PathComponent::Key(String::from("users"))]
    );
}

#[test]
fn parses_dotted_keys_and_indices() {
    let path = parse_path("users[0].name").unwrap();
    assert_eq!(
        path,
        vec![
            PathComponent::Key(String::from("users")),
            PathComponent::Index(0),
            PathComponent::Key(String::from("name")),
        ]
    );
}

#[test]
fn parses_wildcard_index() {
    let path = parse_path("users[*].id").unwrap();
    assert_eq!(
        path,
        vec![
            PathComponent::Key(String::from("users")),
            PathComponent::Wildcard,
            PathComponent::Key(String::from("id")),
        ]
    );
}

#[test]
fn parses_leading_index() {
    let path = parse_path("[2].x").unwrap();
    assert_eq!(
        path,
        vec![PathComponent::Index(2), PathComponent::Key(String::from("x"))]
    );
}

#[test]
fn rejects_unclosed_bracket() {
    assert!(parse_path("users[0").is_err());
}

#[test]
fn rejects_non_numeric_index() {
    assert!(parse_path("users[abc]").is_err());
}

#[test]
fn rejects_empty_dotted_key() {
    assert!(parse_path("users.").is_err());
}

#[test]
fn empty_pattern_matches_only_empty_candidate() {
    let empty: Vec<PathComponent> = Vec::new();
    assert!(path_matches(&empty, &empty));
    assert!(!path_matches(&empty, &[PathComponent::Key(String::from("a"))]));
}

#[test]
fn wildcard_matches_any_index_but_not_a_key() {
    let pattern = vec![PathComponent::Key(String::from("users")), PathComponent::Wildcard];
    assert!(path_matches(
        &pattern,
        &[PathComponent::Key(String::from("users")), PathComponent::Index(0)]
    ));
    assert!(path_matches(
        &pattern,
        &[PathComponent::Key(String::from("users")), PathComponent::Index(41)]
    ));
    assert!(!path_matches(
        &pattern,
        &[
            PathComponent::Key(String::from("users")),
            PathComponent::Key(String::from("name"))
        ]
    ));
}

#[test]
fn differing_lengths_never_match() {
    let pattern = vec![PathComponent::Key(String::from("a"))];
    let candidate = vec![PathComponent::Key(String::from("a")), PathComponent::Index(0)];
    assert!(!path_matches(&pattern, &candidate));
}
