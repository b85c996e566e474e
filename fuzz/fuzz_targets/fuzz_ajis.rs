#![no_main]
use std::cell::RefCell;

use ajis::{
    ByteSource, DuplicateKeys, Formatting, IoError, Mode, Parser, Profile, Serializer, Settings,
    VecSink,
};
use arbitrary::Arbitrary;
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use serde_json::{Map, Value};

const HEADER: usize = 5; // 1 flags byte + 4-byte chunk-split seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// Replaces most of the corpus entry with a fresh arbitrary-JSON document
/// (reusing `fuzzer_mutate` the rest of the time), so libFuzzer spends most
/// of its budget on inputs that are syntactically close to valid documents
/// rather than on pure byte noise.
fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let limit = max_size - HEADER;
        let value = loop {
            let s = with_rng(|rng| rng.random_range(1..=limit.max(1)));
            let bytes: Vec<u8> = with_rng(|rng| (0..s).map(|_| rng.random::<u8>()).collect());
            match ArbitraryValue::arbitrary(&mut arbitrary::Unstructured::new(&bytes)) {
                Ok(value) => break value,
                Err(_) => continue,
            }
        };
        let serialized = serde_json::to_vec(&value.0).expect("arbitrary value serializes");
        let len = serialized.len().min(limit);
        data[HEADER..HEADER + len].copy_from_slice(&serialized[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug)]
struct ArbitraryValue(Value);

impl<'a> Arbitrary<'a> for ArbitraryValue {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let node_type = u.choose_index(21)?;
        let value = match node_type {
            0 => Value::Null,
            1 => Value::Bool(u.arbitrary()?),
            2 => {
                let n: f64 = u.arbitrary()?;
                Value::Number(serde_json::Number::from_f64(n).ok_or(arbitrary::Error::IncorrectFormat)?)
            }
            3..=10 => Value::String(u.arbitrary()?),
            11..=15 => {
                let elems: Vec<ArbitraryValue> = u.arbitrary()?;
                Value::Array(elems.into_iter().map(|v| v.0).collect())
            }
            16..=20 => {
                let m: Vec<(String, ArbitraryValue)> = u.arbitrary()?;
                Value::Object(Map::from_iter(m.into_iter().map(|(k, v)| (k, v.0))))
            }
            _ => Err(arbitrary::Error::IncorrectFormat)?,
        };
        Ok(ArbitraryValue(value))
    }
}

/// A `ByteSource` that replays a fixed buffer one boundary-safe chunk at a
/// time, so the fuzz target exercises the reader's cross-`fill` buffering
/// instead of always handing the parser the whole document in one shot.
struct ChunkedSource<'a> {
    remaining: &'a [u8],
    split_seed: u64,
}

impl ByteSource for ChunkedSource<'_> {
    fn fill(&mut self, buf: &mut Vec<u8>) -> Result<usize, IoError> {
        if self.remaining.is_empty() {
            return Ok(0);
        }
        let len = self.remaining.len();
        let mut size = (self.split_seed as usize % len) + 1;
        while size < len && (self.remaining[size] & 0xC0) == 0x80 {
            size += 1; // never split on a UTF-8 continuation byte
        }
        buf.extend_from_slice(&self.remaining[..size]);
        self.remaining = &self.remaining[size..];
        Ok(size)
    }
}

fn settings_from_flags(flags: u8) -> Settings {
    let mode = match flags & 0b11 {
        0 => Mode::StrictJson,
        1 => Mode::AjisCanonical,
        _ => Mode::Lax,
    };
    let duplicate_keys = match (flags >> 2) & 0b11 {
        0 => DuplicateKeys::Allow,
        1 => DuplicateKeys::Warn,
        _ => DuplicateKeys::Reject,
    };
    let formatting = if flags & 0b0001_0000 != 0 {
        Formatting::Canonical
    } else if flags & 0b0010_0000 != 0 {
        Formatting::Pretty { indent: 2 }
    } else {
        Formatting::Compact
    };
    Settings {
        mode,
        allow_trailing_commas: flags & 0b0100_0000 != 0,
        allow_single_quotes: flags & 0b1000_0000 != 0,
        allow_unquoted_property_names: flags & 0b0100_0000 != 0,
        allow_line_comments: flags & 0b0010_0000 != 0,
        allow_block_comments: flags & 0b0010_0000 != 0,
        allow_multi_base_numbers: flags & 0b0001_0000 != 0,
        allow_digit_separators: flags & 0b0001_0000 != 0,
        allow_nan_infinity: flags & 0b1000_0000 != 0,
        duplicate_keys,
        formatting,
        profile: Profile::LowMemory,
        ..Settings::default()
    }
}

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let split_seed = u32::from_le_bytes(data[1..5].try_into().unwrap()) as u64;
    let body = &data[HEADER..];
    if body.is_empty() {
        return;
    }

    let settings = settings_from_flags(flags);
    let source = ChunkedSource { remaining: body, split_seed };
    let mut parser = Parser::new(source, settings);
    let mut segments = Vec::new();
    while let Some(segment) = parser.next_segment() {
        segments.push(segment);
    }

    // Whatever the parser produced, the serializer must be able to consume
    // it without panicking: a balanced segment stream round-trips, and an
    // unbalanced one (only possible if the parser halted mid-container on a
    // fatal diagnostic) fails cleanly through `finish`'s `Result`.
    let mut serializer = Serializer::new(VecSink::new(), settings);
    for segment in segments {
        if serializer.write_segment(segment).is_err() {
            return;
        }
    }
    let _ = serializer.finish();
}

fuzz_target!(|data: &[u8]| run(data));
