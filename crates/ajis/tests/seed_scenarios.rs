#![allow(missing_docs)]

//! End-to-end checks for the seed scenarios: literal inputs with a fixed,
//! documented expected segment stream and serialized form.

use ajis::{
    ContainerKind, Diagnostic, DiagnosticCode, DuplicateKeys, Formatting, Mode, Segment, Settings,
    ValuePayload,
};

mod common;
use common::{has_fatal, non_meta, parse_all, serialize_all};

#[test]
fn s1_minimal_object() {
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    assert!(!has_fatal(&segments));
    let shape = non_meta(&segments);
    assert!(matches!(
        &shape[0],
        Segment::ContainerStart { kind: ContainerKind::Object, frame_id: 1, parent_id: 0 }
    ));
    assert!(matches!(&shape[1], Segment::PropertyName { frame_id: 1, name, .. } if name == "a"));
    assert!(matches!(
        &shape[2],
        Segment::Value { frame_id: 1, value: ValuePayload::Number { raw, .. } } if raw == "1"
    ));
    assert!(matches!(
        &shape[3],
        Segment::ContainerEnd { kind: ContainerKind::Object, frame_id: 1, parent_id: 0 }
    ));

    let compact = serialize_all(parse_all(r#"{"a":1}"#, Settings::default()), Settings::default());
    assert_eq!(compact, r#"{"a":1}"#);

    let pretty_settings = Settings { formatting: Formatting::Pretty { indent: 2 }, ..Settings::default() };
    let pretty = serialize_all(parse_all(r#"{"a":1}"#, Settings::default()), pretty_settings);
    assert_eq!(pretty, "{\n  \"a\": 1\n}");
}

#[test]
fn s2_nested_with_array_and_multi_type_primitives() {
    let text = r#"{ "x": [true, null, "y"], "n": -1.5e2 }"#;
    let segments = parse_all(text, Settings::default());
    assert!(!has_fatal(&segments));

    let canonical = serialize_all(segments, Settings { formatting: Formatting::Canonical, ..Settings::default() });
    assert_eq!(canonical, r#"{"n":-1.5e2,"x":[true,null,"y"]}"#);
}

#[test]
fn s3_multi_base_numbers_and_separators() {
    let text = "[ 0xFF_EE, 0b1010_1100, 1_000_000 ]";
    let settings = Settings::lax();
    let segments = parse_all(text, settings);
    assert!(!has_fatal(&segments));

    let raw_compact = serialize_all(segments.clone(), settings);
    assert_eq!(raw_compact, "[0xFF_EE,0b1010_1100,1_000_000]");

    let canonical = serialize_all(segments, Settings { formatting: Formatting::Canonical, ..settings });
    assert_eq!(canonical, "[65518,172,1000000]");
}

#[test]
fn s4_duplicate_key_warn() {
    let settings = Settings { duplicate_keys: DuplicateKeys::Warn, ..Settings::default() };
    let segments = parse_all(r#"{"k":1,"k":2}"#, settings);
    assert!(!has_fatal(&segments));

    let shape = non_meta(&segments);
    assert_eq!(shape, non_meta(&parse_all(r#"{"k":1,"k":2}"#, Settings::default())));

    let warnings: Vec<&Diagnostic> = segments
        .iter()
        .filter_map(|s| match s {
            Segment::Diagnostic(d) => Some(d),
            _ => None,
        })
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, DiagnosticCode::DuplicateKey);
    assert_eq!(warnings[0].severity, ajis::Severity::Warning);
}

#[test]
fn s5_trailing_comma_lax_vs_strict() {
    let lax_settings = Settings { mode: Mode::Lax, allow_trailing_commas: true, ..Settings::default() };
    let with_comma = non_meta(&parse_all(r#"{"a":1,}"#, lax_settings));
    let without_comma = non_meta(&parse_all(r#"{"a":1}"#, Settings::default()));
    assert_eq!(with_comma, without_comma);

    let strict_segments = parse_all(r#"{"a":1,}"#, Settings::strict_json());
    assert!(has_fatal(&strict_segments));
    assert!(strict_segments
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.code == DiagnosticCode::TrailingCommaDisallowed)));
}

#[test]
fn s6_end_of_text_boundary() {
    let lenient = parse_all(r#"{"a":1}GARBAGE"#, Settings::default());
    assert!(!has_fatal(&lenient));

    let strict_eof = Settings { require_trailing_eof: true, ..Settings::default() };
    let strict = parse_all(r#"{"a":1}GARBAGE"#, strict_eof);
    assert!(strict
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.code == DiagnosticCode::ExtraDataAfterRoot)));
}

const ESCAPED_AB: &str = "\"\\u0041\\u0042\"";

#[test]
fn string_with_only_escapes_decodes_fully() {
    let decoded_settings =
        Settings { string_representation: ajis::StringRepresentation::Decoded, ..Settings::default() };
    let segments = parse_all(ESCAPED_AB, decoded_settings);
    assert!(!has_fatal(&segments));
    assert!(segments.iter().any(
        |s| matches!(s, Segment::Value { value: ValuePayload::String { text, .. }, .. } if text == "AB")
    ));
}

#[test]
fn raw_slice_representation_leaves_string_escapes_unresolved() {
    let segments = parse_all(ESCAPED_AB, Settings::default());
    assert!(!has_fatal(&segments));
    assert!(segments.iter().any(|s| matches!(
        s,
        Segment::Value { value: ValuePayload::String { text, .. }, .. } if text == "\\u0041\\u0042"
    )));
}

#[test]
fn leading_zero_number_is_rejected() {
    let segments = parse_all("01", Settings::default());
    assert!(has_fatal(&segments));
    assert!(segments
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.code == DiagnosticCode::NumberLeadingZero)));
}

#[test]
fn zero_alone_is_accepted() {
    assert!(!has_fatal(&parse_all("0", Settings::default())));
}

#[test]
fn empty_object_and_array_produce_no_intervening_segments() {
    let shape = non_meta(&parse_all("{}", Settings::default()));
    assert_eq!(shape.len(), 2);
    assert!(matches!(&shape[0], Segment::ContainerStart { kind: ContainerKind::Object, .. }));
    assert!(matches!(&shape[1], Segment::ContainerEnd { kind: ContainerKind::Object, .. }));

    let shape = non_meta(&parse_all("[]", Settings::default()));
    assert_eq!(shape.len(), 2);
    assert!(matches!(&shape[0], Segment::ContainerStart { kind: ContainerKind::Array, .. }));
    assert!(matches!(&shape[1], Segment::ContainerEnd { kind: ContainerKind::Array, .. }));
}

#[test]
fn crlf_counts_as_a_single_newline() {
    // Position tracking bumps line once for "\r\n", not twice; a malformed
    // token on line 2 should report column counted from a single reset.
    let segments = parse_all("{\"a\":1,\r\n\"a\":02}", Settings::default());
    assert!(has_fatal(&segments));
    let diag = segments
        .iter()
        .find_map(|s| match s {
            Segment::Diagnostic(d) if d.code == DiagnosticCode::NumberLeadingZero => Some(d),
            _ => None,
        })
        .expect("expected a leading-zero diagnostic");
    assert_eq!(diag.position.line, 2);
}
