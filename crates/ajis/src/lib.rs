//! A streaming, bounded-memory parser and serializer for AJIS — JSON with a
//! controlled set of extensions (comments, multi-base numbers, multiline
//! strings, optional single-quoted strings, unquoted keys, trailing commas,
//! and preprocessing directives).
//!
//! The pipeline is a sequence of pull-based stages, each operating on one
//! [`segment::Segment`] at a time rather than a materialized document tree:
//!
//! ```text
//! ByteSource -> reader -> lexer -> parser -> [transforms] -> serializer -> ByteSink
//! ```
//!
//! [`parser::Parser::next_segment`] drives the state machine exactly far
//! enough to produce the next segment; [`serializer::Serializer`] consumes
//! that stream and writes AJIS text back out. Diagnostics are data, not
//! exceptions: recoverable conditions are queued as `Segment::Diagnostic`
//! and parsing continues, fatal ones halt the parser after queuing theirs.
#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod container;
mod diagnostics;
mod flags;
mod io;
mod lexer;
mod numeric;
mod parser;
mod path;
mod position;
mod reader;
mod segment;
mod serializer;
mod settings;
mod token;
mod transforms;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod value;

pub use diagnostics::{Diagnostic, DiagnosticCode, Severity};
pub use flags::{CommentStyle, NumberBase, NumberFlags, QuoteStyle, StringFlags};
pub use io::{ByteSink, ByteSource, IoError, SliceSource, VecSink};
pub use parser::Parser;
pub use path::{parse_path, path_matches, Path, PathComponent};
pub use position::Position;
pub use segment::{ContainerKind, Segment, ValuePayload};
pub use serializer::Serializer;
pub use settings::{
    DuplicateKeys, Formatting, Mode, NumberRepresentation, Profile, Settings, StringRepresentation,
};
pub use transforms::{
    DropByPath, FilterArrayItems, Patch, PatchOp, RenameKeys, SelectMode, SelectSubtree, Transform,
    UndefinedTargetPolicy,
};
