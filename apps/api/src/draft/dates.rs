//! Date normalization: collapses the compact date encodings used across
//! resume entries into the canonical `YYYY-MM-DD` form.
//!
//! Supported encodings, keyed by character length:
//! - `""`          → `""`
//! - `YYMM`   (4)  → `20YY-MM-01`
//! - `YYYY-MM-DD` (10, must contain `-`) → unchanged
//! - `YYYYMMDD` (8) → `YYYY-MM-DD`
//! - `YYYYMM`  (6) → `YYYY-MM-01`
//! - `YYM`     (3) → `20YY-0M-01`

use tracing::warn;

type Decoder = fn(&str) -> Option<String>;

/// Evaluated in order; the first row whose length matches decides the outcome.
const DECODERS: &[(usize, Decoder)] = &[
    (4, decode_yymm),
    (10, decode_canonical),
    (8, decode_yyyymmdd),
    (6, decode_yyyymm),
    (3, decode_yym),
];

/// Normalizes a raw date token. Never fails: an empty token stays empty and
/// an unrecognized one is logged and replaced by the empty string.
pub fn normalize_date(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let len = raw.chars().count();
    let decoded = DECODERS
        .iter()
        .find(|(expected, _)| *expected == len)
        .and_then(|(_, decode)| decode(raw));

    match decoded {
        Some(date) => date,
        None => {
            warn!("Invalid date format: {raw:?}");
            String::new()
        }
    }
}

/// True when `value` is either empty or shaped like `YYYY-MM-DD`.
#[cfg(test)]
pub fn is_canonical_or_empty(value: &str) -> bool {
    if value.is_empty() {
        return true;
    }
    let bytes = value.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn all_digits(raw: &str) -> bool {
    raw.bytes().all(|b| b.is_ascii_digit())
}

fn decode_yymm(raw: &str) -> Option<String> {
    all_digits(raw).then(|| format!("20{}-{}-01", &raw[0..2], &raw[2..4]))
}

fn decode_canonical(raw: &str) -> Option<String> {
    raw.contains('-').then(|| raw.to_string())
}

fn decode_yyyymmdd(raw: &str) -> Option<String> {
    all_digits(raw).then(|| format!("{}-{}-{}", &raw[0..4], &raw[4..6], &raw[6..8]))
}

fn decode_yyyymm(raw: &str) -> Option<String> {
    all_digits(raw).then(|| format!("{}-{}-01", &raw[0..4], &raw[4..6]))
}

fn decode_yym(raw: &str) -> Option<String> {
    all_digits(raw).then(|| format!("20{}-0{}-01", &raw[0..2], &raw[2..3]))
}
