//! Canonical numeric text normalization, shared by the parser (when
//! `Settings::number_representation` is `CanonicalText`) and the serializer
//! (when `Settings::formatting` is `Canonical`) (spec §4.4).
//!
//! Integers that fit an `i128` round-trip through decimal text exactly;
//! everything else (fractional, exponential, or simply too large) goes
//! through `f64` and Rust's own shortest-round-trip `Display` formatting —
//! the same algorithm `serde_json` and friends rely on.
use alloc::{format, string::String};

use crate::flags::{NumberBase, NumberFlags};

pub(crate) fn canonical_number_text(raw: &str, flags: NumberFlags) -> String {
    let (negative, body) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw),
    };
    let digits: String = body.chars().filter(|&c| c != '_').collect();

    if flags.base != NumberBase::Decimal {
        let radix = flags.base as u32;
        let digits_only = &digits[2.min(digits.len())..];
        return match u128::from_str_radix(digits_only, radix) {
            Ok(value) => {
                if negative {
                    format!("-{value}")
                } else {
                    format!("{value}")
                }
            }
            Err(_) => canonical_float(raw),
        };
    }

    if flags.has_fraction || flags.has_exponent {
        return canonical_float(raw);
    }

    match digits.parse::<i128>() {
        Ok(value) => {
            let value = if negative { -value } else { value };
            format!("{value}")
        }
        Err(_) => canonical_float(raw),
    }
}

fn canonical_float(raw: &str) -> String {
    let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
    match cleaned.parse::<f64>() {
        Ok(value) => format_f64(value),
        Err(_) => cleaned,
    }
}

fn format_f64(value: f64) -> String {
    if value.is_nan() {
        return String::from("NaN");
    }
    if value.is_infinite() {
        return if value.is_sign_negative() {
            String::from("-Infinity")
        } else {
            String::from("Infinity")
        };
    }
    format!("{value}")
}
