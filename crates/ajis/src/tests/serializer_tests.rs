use alloc::string::String;

use crate::{
    diagnostics::{Diagnostic, DiagnosticCode, Severity},
    flags::{NumberBase, NumberFlags, QuoteStyle, StringFlags},
    io::VecSink,
    position::Position,
    segment::{ContainerKind, Segment, ValuePayload},
    serializer::Serializer,
    settings::{Formatting, Settings},
    tests::{parse_all, serialize_all},
};

fn string_flags() -> StringFlags {
    StringFlags {
        has_escapes: false,
        has_non_ascii: false,
        quote_style: QuoteStyle::Double,
    }
}

fn number_flags() -> NumberFlags {
    NumberFlags {
        base: NumberBase::Decimal,
        has_separators: false,
        has_fraction: false,
        has_exponent: false,
    }
}

#[test]
fn compact_round_trip_of_parsed_document() {
    let segments = parse_all(r#"{"a":1,"b":[true,false,null]}"#, Settings::default());
    let text = serialize_all(segments, Settings::default());
    assert_eq!(text, r#"{"a":1,"b":[true,false,null]}"#);
}

#[test]
fn pretty_formatting_indents_members() {
    let settings = Settings {
        formatting: Formatting::Pretty { indent: 2 },
        ..Settings::default()
    };
    let segments = parse_all(r#"{"a":1}"#, Settings::default());
    let text = serialize_all(segments, settings);
    assert_eq!(text, "{\n  \"a\": 1\n}");
}

#[test]
fn canonical_formatting_sorts_object_keys() {
    let settings = Settings {
        formatting: Formatting::Canonical,
        ..Settings::default()
    };
    let segments = parse_all(r#"{"b":2,"a":1}"#, Settings::default());
    let text = serialize_all(segments, settings);
    assert_eq!(text, r#"{"a":1,"b":2}"#);
}

#[test]
fn canonical_formatting_normalizes_numbers() {
    let settings = Settings {
        formatting: Formatting::Canonical,
        ..Settings::default()
    };
    let segments = parse_all("[1_000, 0xFF]", Settings::lax());
    let text = serialize_all(segments, settings);
    assert_eq!(text, "[1000,255]");
}

#[test]
fn empty_array_and_object_serialize_with_no_members() {
    let segments = parse_all("[]", Settings::default());
    assert_eq!(serialize_all(segments, Settings::default()), "[]");

    let segments = parse_all("{}", Settings::default());
    assert_eq!(serialize_all(segments, Settings::default()), "{}");
}

#[test]
fn strings_are_escaped_on_write() {
    let mut serializer = Serializer::new(VecSink::new(), Settings::default());
    serializer
        .write_segment(Segment::Value {
            frame_id: 0,
            value: ValuePayload::String {
                text: String::from("line\nbreak \"quote\""),
                flags: string_flags(),
            },
        })
        .unwrap();
    let sink = serializer.finish().unwrap();
    assert_eq!(
        String::from_utf8(sink.bytes).unwrap(),
        r#""line\nbreak \"quote\"""#
    );
}

#[test]
fn unbalanced_stream_fails_on_finish() {
    let mut serializer = Serializer::new(VecSink::new(), Settings::default());
    serializer
        .write_segment(Segment::ContainerStart {
            kind: ContainerKind::Array,
            frame_id: 1,
            parent_id: 0,
        })
        .unwrap();
    assert!(serializer.finish().is_err());
}

#[test]
fn progress_and_diagnostic_segments_produce_no_output() {
    let mut serializer = Serializer::new(VecSink::new(), Settings::default());
    serializer
        .write_segment(Segment::Progress { bytes_read: 10, total_bytes_hint: None })
        .unwrap();
    serializer
        .write_segment(Segment::Diagnostic(Diagnostic::new(
            DiagnosticCode::NumberSeparatorGrouping,
            Severity::Warning,
            Position::start(),
        )))
        .unwrap();
    serializer
        .write_segment(Segment::Value {
            frame_id: 0,
            value: ValuePayload::Number { raw: String::from("1"), flags: number_flags() },
        })
        .unwrap();
    let sink = serializer.finish().unwrap();
    assert_eq!(String::from_utf8(sink.bytes).unwrap(), "1");
}
