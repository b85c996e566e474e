//! Unit tests for the pipeline's internal modules. Integration-level
//! scenarios (full documents through `Parser`/`Serializer` together) live
//! under `crates/ajis/tests/`.
mod path_tests;
mod serializer_tests;
mod transforms_tests;

use alloc::{string::String, vec::Vec};

use crate::{io::SliceSource, parser::Parser, segment::Segment, settings::Settings};

/// Parses `text` to completion under `settings`, collecting every segment.
pub(crate) fn parse_all(text: &str, settings: Settings) -> Vec<Segment> {
    let mut parser = Parser::new(SliceSource::new(text.as_bytes()), settings);
    let mut out = Vec::new();
    while let Some(segment) = parser.next_segment() {
        out.push(segment);
    }
    out
}

/// `true` if any collected segment is a fatal diagnostic.
pub(crate) fn has_fatal(segments: &[Segment]) -> bool {
    segments
        .iter()
        .any(|s| matches!(s, Segment::Diagnostic(d) if d.severity.is_fatal()))
}

/// Serializes `segments` under `settings`, returning the output text.
pub(crate) fn serialize_all(segments: Vec<Segment>, settings: Settings) -> String {
    let mut serializer = crate::serializer::Serializer::new(crate::io::VecSink::new(), settings);
    for segment in segments {
        serializer.write_segment(segment).expect("serialize failed");
    }
    let sink = serializer.finish().expect("unbalanced stream");
    String::from_utf8(sink.bytes).expect("serializer produced invalid UTF-8")
}
