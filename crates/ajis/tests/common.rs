#![allow(missing_docs)]
#![allow(dead_code)]

use ajis::{Parser, Segment, Serializer, Settings, SliceSource, VecSink};

/// Parses `text` to completion under `settings`, collecting every segment.
pub fn parse_all(text: &str, settings: Settings) -> Vec<Segment> {
    let mut parser = Parser::new(SliceSource::new(text.as_bytes()), settings);
    let mut out = Vec::new();
    while let Some(segment) = parser.next_segment() {
        out.push(segment);
    }
    out
}

/// `true` if any collected segment is a fatal diagnostic.
pub fn has_fatal(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.severity.is_fatal()))
}

/// Segments with `Progress`/`Diagnostic` meta segments stripped, for
/// comparing structural shape without caring about checkpoint cadence.
pub fn non_meta(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().filter(|s| !s.is_meta()).cloned().collect()
}

/// Serializes `segments` under `settings`, returning the output text.
pub fn serialize_all(segments: Vec<Segment>, settings: Settings) -> String {
    let mut serializer = Serializer::new(VecSink::new(), settings);
    for segment in segments {
        serializer.write_segment(segment).expect("serialize failed");
    }
    let sink = serializer.finish().expect("unbalanced stream");
    String::from_utf8(sink.bytes).expect("serializer produced invalid UTF-8")
}

/// Feeds `text` through the parser then straight back through the
/// serializer under the same settings, with the requested formatting.
pub fn parse_then_serialize(text: &str, settings: Settings, sink_bytes: &mut Vec<u8>) {
    let segments = parse_all(text, settings);
    let mut serializer = Serializer::new(VecSink::new(), settings);
    for segment in segments {
        serializer.write_segment(segment).expect("serialize failed");
    }
    let sink = serializer.finish().expect("unbalanced stream");
    sink_bytes.extend_from_slice(&sink.bytes);
}
