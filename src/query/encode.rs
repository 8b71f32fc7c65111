// src/query/encode.rs

//! Variable kinds, logtype placeholder glyphs, and value encoding.
//!
//! A *variable* is a substring of a log message that is extracted at
//! ingestion and stored separately in encoded form; the message skeleton
//! left behind (the *logtype*) carries one reserved placeholder glyph per
//! variable. The glyph values are part of the on-disk contract with the
//! archive component.

use crate::query::chars::is_hex_digit;

extern crate static_assertions;
use static_assertions::const_assert;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// VariableKind and placeholders
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Logtype placeholder glyph for a [`VariableKind::DecimalDigit`] variable.
pub const PLACEHOLDER_DECIMAL_DIGIT: char = '\u{11}';
/// Logtype placeholder glyph for a [`VariableKind::MultiDigitHex`] variable.
pub const PLACEHOLDER_MULTI_DIGIT_HEX: char = '\u{12}';
/// Logtype placeholder glyph for a [`VariableKind::AssignmentAlpha`] variable.
pub const PLACEHOLDER_ASSIGNMENT_ALPHA: char = '\u{13}';

// the glyphs must be distinct, single-byte, and non-textual
const_assert!(PLACEHOLDER_DECIMAL_DIGIT as u32 != PLACEHOLDER_MULTI_DIGIT_HEX as u32);
const_assert!(PLACEHOLDER_MULTI_DIGIT_HEX as u32 != PLACEHOLDER_ASSIGNMENT_ALPHA as u32);
const_assert!(PLACEHOLDER_DECIMAL_DIGIT as u32 != PLACEHOLDER_ASSIGNMENT_ALPHA as u32);
const_assert!(PLACEHOLDER_DECIMAL_DIGIT as u32 > 0);
const_assert!((PLACEHOLDER_ASSIGNMENT_ALPHA as u32) < 0x20);

/// The closed set of variable classifications.
///
/// For an exact (wildcard-free) token the classification rule is, in
/// order:
/// - contains at least one decimal digit → `DecimalDigit`;
/// - else, immediately preceded by `=` in the original query and contains
///   at least one alphabetic character → `AssignmentAlpha`;
/// - else, [`could_be_multi_digit_hex_value`] → `MultiDigitHex`;
/// - else → not a variable, constant text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum VariableKind {
    /// Token containing a decimal digit, e.g. `1523`, `node-23`.
    DecimalDigit,
    /// Token shaped like a multi-digit hex value, e.g. `deadbeef`, `0x1fe`.
    MultiDigitHex,
    /// Alphabetic token on the right-hand side of a `=`, e.g. the `fatal`
    /// of `level=fatal`.
    AssignmentAlpha,
}

impl VariableKind {
    /// The logtype placeholder glyph for this kind.
    pub const fn placeholder(&self) -> char {
        match self {
            VariableKind::DecimalDigit => PLACEHOLDER_DECIMAL_DIGIT,
            VariableKind::MultiDigitHex => PLACEHOLDER_MULTI_DIGIT_HEX,
            VariableKind::AssignmentAlpha => PLACEHOLDER_ASSIGNMENT_ALPHA,
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// value encoding
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The machine form of one variable value.
///
/// Numeric-shaped values pack into a machine integer. Values that do not
/// fit carry a stable digest standing in for the dictionary identifier the
/// archive component would assign.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum EncodedVariable {
    Integer(i64),
    Hash(u64),
}

/// Could `value` be parsed as a multi-digit hex value?
///
/// An optional `0x`/`0X` prefix, then at least two hex digits, nothing
/// else.
pub fn could_be_multi_digit_hex_value(value: &str) -> bool {
    let body: &str = strip_hex_prefix(value);
    body.len() >= 2 && body.bytes().all(is_hex_digit)
}

pub(crate) fn strip_hex_prefix(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        &value[2..]
    } else {
        value
    }
}

/// Encode a classified variable value.
pub fn encode(
    kind: VariableKind,
    value: &str,
) -> EncodedVariable {
    match kind {
        VariableKind::DecimalDigit => match value.parse::<i64>() {
            Ok(number) => EncodedVariable::Integer(number),
            Err(_) => EncodedVariable::Hash(fnv1a_64(value.as_bytes())),
        },
        VariableKind::MultiDigitHex => {
            let body: &str = strip_hex_prefix(value);
            // the body is all hex digits, so this fails only on overflow
            match i64::from_str_radix(body, 16) {
                Ok(number) => EncodedVariable::Integer(number),
                Err(_) => EncodedVariable::Hash(fnv1a_64(value.as_bytes())),
            }
        }
        VariableKind::AssignmentAlpha => EncodedVariable::Hash(fnv1a_64(value.as_bytes())),
    }
}

/// FNV-1a 64-bit digest; stable across runs and platforms.
pub(crate) fn fnv1a_64(data: &[u8]) -> u64 {
    const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const FNV_PRIME: u64 = 0x100000001b3;
    let mut hash: u64 = FNV_OFFSET_BASIS;
    for byte in data.iter() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
