// src/tests/query_tests.rs

//! tests for `chars.rs`, `encode.rs`, and `token.rs`

#![allow(non_snake_case)]

use crate::query::chars::{is_alphabet, is_decimal_digit, is_delim, is_wildcard};
use crate::query::encode::{
    could_be_multi_digit_hex_value,
    encode,
    EncodedVariable,
    VariableKind,
    PLACEHOLDER_ASSIGNMENT_ALPHA,
    PLACEHOLDER_DECIMAL_DIGIT,
    PLACEHOLDER_MULTI_DIGIT_HEX,
};
use crate::query::token::{CompositeWildcardToken, ExactVariableToken, QueryVariable};

extern crate test_case;
use test_case::test_case;

// ---------------------------
// character classes

#[test_case(b'+', false; "plus")]
#[test_case(b'-', false; "dash")]
#[test_case(b'.', false; "dot")]
#[test_case(b'/', false; "slash")]
#[test_case(b'0', false; "zero")]
#[test_case(b'9', false; "nine")]
#[test_case(b'A', false; "upper a")]
#[test_case(b'Z', false; "upper z")]
#[test_case(b'\\', false; "backslash")]
#[test_case(b'_', false; "underscore")]
#[test_case(b'a', false; "lower a")]
#[test_case(b'z', false; "lower z")]
#[test_case(b' ', true; "space")]
#[test_case(b'=', true; "equals")]
#[test_case(b':', true; "colon")]
#[test_case(b';', true; "semicolon")]
#[test_case(b'\n', true; "newline")]
#[test_case(b'*', true; "star is a delimiter by class alone")]
#[test_case(b'?', true; "question mark is a delimiter by class alone")]
#[test_case(0x80u8, true; "non-ascii bytes delimit")]
fn test_is_delim(
    c: u8,
    expect: bool,
) {
    assert_eq!(is_delim(c), expect);
}

#[test]
fn test_wildcards_and_classes() {
    assert!(is_wildcard(b'*'));
    assert!(is_wildcard(b'?'));
    assert!(!is_wildcard(b'%'));
    assert!(is_decimal_digit(b'5'));
    assert!(!is_decimal_digit(b'a'));
    assert!(is_alphabet(b'q'));
    assert!(is_alphabet(b'Q'));
    assert!(!is_alphabet(b'1'));
}

// ---------------------------
// hex predicate and encoding

#[test_case("abc", true; "hex letters")]
#[test_case("DEADBEEF", true; "upper hex letters")]
#[test_case("0x1f", true; "lower prefix")]
#[test_case("0X1F", true; "upper prefix")]
#[test_case("0x", false; "prefix alone")]
#[test_case("ff", true; "two hex letters")]
#[test_case("f", false; "single digit is not multi-digit")]
#[test_case("g1", false; "non-hex letter")]
#[test_case("12", true; "decimal digits are also hex digits")]
#[test_case("", false; "empty")]
fn test_could_be_multi_digit_hex_value(
    value: &str,
    expect: bool,
) {
    assert_eq!(could_be_multi_digit_hex_value(value), expect);
}

#[test]
fn test_placeholders_distinct_and_non_textual() {
    assert_ne!(PLACEHOLDER_DECIMAL_DIGIT, PLACEHOLDER_MULTI_DIGIT_HEX);
    assert_ne!(PLACEHOLDER_MULTI_DIGIT_HEX, PLACEHOLDER_ASSIGNMENT_ALPHA);
    assert_ne!(PLACEHOLDER_DECIMAL_DIGIT, PLACEHOLDER_ASSIGNMENT_ALPHA);
    for placeholder in [
        PLACEHOLDER_DECIMAL_DIGIT,
        PLACEHOLDER_MULTI_DIGIT_HEX,
        PLACEHOLDER_ASSIGNMENT_ALPHA,
    ] {
        assert!((placeholder as u32) < 0x20, "placeholder must be non-textual");
        assert_eq!(placeholder.len_utf8(), 1, "placeholder must be single-byte");
    }
    assert_eq!(
        VariableKind::DecimalDigit.placeholder(),
        PLACEHOLDER_DECIMAL_DIGIT
    );
    assert_eq!(
        VariableKind::MultiDigitHex.placeholder(),
        PLACEHOLDER_MULTI_DIGIT_HEX
    );
    assert_eq!(
        VariableKind::AssignmentAlpha.placeholder(),
        PLACEHOLDER_ASSIGNMENT_ALPHA
    );
}

#[test_case(VariableKind::DecimalDigit, "1234", EncodedVariable::Integer(1234); "decimal")]
#[test_case(VariableKind::DecimalDigit, "-56", EncodedVariable::Integer(-56); "negative decimal")]
#[test_case(VariableKind::MultiDigitHex, "ff", EncodedVariable::Integer(255); "bare hex")]
#[test_case(VariableKind::MultiDigitHex, "0x1f", EncodedVariable::Integer(31); "prefixed hex")]
#[test_case(VariableKind::MultiDigitHex, "beef", EncodedVariable::Integer(48879); "hex word")]
fn test_encode_integer(
    kind: VariableKind,
    value: &str,
    expect: EncodedVariable,
) {
    assert_eq!(encode(kind, value), expect);
}

#[test]
fn test_encode_hash_stable() {
    // values that do not pack into an integer fall back to a stable digest
    let encoded = encode(VariableKind::DecimalDigit, "node-23a");
    assert!(matches!(encoded, EncodedVariable::Hash(_)));
    assert_eq!(encoded, encode(VariableKind::DecimalDigit, "node-23a"));
    assert_ne!(encoded, encode(VariableKind::DecimalDigit, "node-23b"));

    let encoded = encode(VariableKind::AssignmentAlpha, "fatal");
    assert!(matches!(encoded, EncodedVariable::Hash(_)));
    assert_eq!(encoded, encode(VariableKind::AssignmentAlpha, "fatal"));
}

// ---------------------------
// ExactVariableToken

#[test]
fn test_exact_variable_token() {
    let query = "pid 1523";
    let token = ExactVariableToken::new(query, 4, 8, VariableKind::DecimalDigit);
    assert_eq!(token.value(), "1523");
    assert_eq!(token.begin_pos(), 4);
    assert_eq!(token.end_pos(), 8);
    assert_eq!(token.kind(), VariableKind::DecimalDigit);
    assert_eq!(token.encoded(), EncodedVariable::Integer(1523));

    let mut logtype = String::from("pid ");
    token.add_to_logtype_query(&mut logtype);
    assert_eq!(logtype, format!("pid {}", PLACEHOLDER_DECIMAL_DIGIT));
}

// ---------------------------
// CompositeWildcardToken

/// materialize the current interpretation into owned strings
fn materialize(token: &CompositeWildcardToken) -> (String, Vec<QueryVariable>) {
    let mut logtype = String::new();
    let mut variables: Vec<QueryVariable> = Vec::new();
    token.add_to_query(&mut logtype, &mut variables);
    (logtype, variables)
}

/// `foo*bar`: neither segment can be a variable; one interpretation, pure
/// text
#[test]
fn test_composite_pure_text() {
    let query = "foo*bar";
    let mut token = CompositeWildcardToken::new(query, 0, 7, false);
    assert_eq!(token.count_interpretations(), 1);

    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, "foo*bar");
    assert!(variables.is_empty());

    assert!(!token.generate_next_interpretation());
}

/// `abc*` preceded by `=`: constant text, or an assignment variable
#[test]
fn test_composite_assignment_alpha() {
    let query = "x=abc*";
    let mut token = CompositeWildcardToken::new(query, 2, 6, true);
    assert_eq!(token.count_interpretations(), 2);

    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, "abc*");
    assert!(variables.is_empty());

    assert!(token.generate_next_interpretation());
    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, format!("{}*", PLACEHOLDER_ASSIGNMENT_ALPHA));
    assert_eq!(variables.len(), 1);
    match &variables[0] {
        QueryVariable::Wildcard(wildcard) => {
            assert_eq!(wildcard.value(), "abc*");
            assert_eq!(wildcard.kind(), VariableKind::AssignmentAlpha);
            assert!(!wildcard.has_prefix_star());
            assert!(wildcard.has_suffix_star());
            assert_eq!(wildcard.begin_pos(), 2);
            assert_eq!(wildcard.end_pos(), 6);
        }
        QueryVariable::Exact(_) => panic!("expected a wildcard variable"),
    }

    // exhausted; the cursor resets for a subsequent round
    assert!(!token.generate_next_interpretation());
    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, "abc*");
    assert!(variables.is_empty());
}

/// `0x1?ef`: digit-bearing, so never constant text; one interpretation, a
/// hex variable covering the full token
#[test]
fn test_composite_hex_forced_variable() {
    let query = "0x1?ef";
    let mut token = CompositeWildcardToken::new(query, 0, 6, false);
    assert_eq!(token.count_interpretations(), 1);

    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, PLACEHOLDER_MULTI_DIGIT_HEX.to_string());
    assert_eq!(variables.len(), 1);
    match &variables[0] {
        QueryVariable::Wildcard(wildcard) => {
            assert_eq!(wildcard.value(), "0x1?ef");
            assert_eq!(wildcard.kind(), VariableKind::MultiDigitHex);
            assert!(!wildcard.has_prefix_star());
            assert!(!wildcard.has_suffix_star());
        }
        QueryVariable::Exact(_) => panic!("expected a wildcard variable"),
    }

    assert!(!token.generate_next_interpretation());
}

/// `q1*z2`: both segments digit-bearing, both forced variables; the star
/// they share appears once between the placeholders
#[test]
fn test_composite_shared_star() {
    let query = "q1*z2";
    let mut token = CompositeWildcardToken::new(query, 0, 5, false);
    assert_eq!(token.count_interpretations(), 1);

    let (logtype, variables) = materialize(&token);
    assert_eq!(
        logtype,
        format!("{}*{}", PLACEHOLDER_DECIMAL_DIGIT, PLACEHOLDER_DECIMAL_DIGIT)
    );
    assert_eq!(variables.len(), 2);
    match (&variables[0], &variables[1]) {
        (QueryVariable::Wildcard(first), QueryVariable::Wildcard(second)) => {
            assert_eq!(first.value(), "q1*");
            assert!(!first.has_prefix_star());
            assert!(first.has_suffix_star());
            assert_eq!(second.value(), "*z2");
            assert!(second.has_prefix_star());
            assert!(!second.has_suffix_star());
        }
        _ => panic!("expected two wildcard variables"),
    }

    assert!(!token.generate_next_interpretation());
}

/// `*bar`: a leading star belongs to the only segment
#[test]
fn test_composite_leading_star() {
    let query = "*bar";
    let token = CompositeWildcardToken::new(query, 0, 4, false);
    assert_eq!(token.count_interpretations(), 1);
    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, "*bar");
    assert!(variables.is_empty());
}

/// a `?`-only token has no variable interpretation
#[test]
fn test_composite_question_marks_only() {
    let query = "??";
    let token = CompositeWildcardToken::new(query, 0, 2, false);
    assert_eq!(token.count_interpretations(), 1);
    let (logtype, variables) = materialize(&token);
    assert_eq!(logtype, "??");
    assert!(variables.is_empty());
}

/// the odometer enumerates the full cross product of segment choices,
/// deterministically, then resets
#[test]
fn test_composite_enumeration_cycle() {
    let query = "x=y*z1";
    // segments `y*` (assignment variable or text) and `*z1` (digit-bearing,
    // forced variable)
    let mut token = CompositeWildcardToken::new(query, 2, 6, true);
    assert_eq!(token.count_interpretations(), 2);

    let mut first_round: Vec<String> = Vec::new();
    loop {
        let (logtype, _) = materialize(&token);
        first_round.push(logtype);
        if !token.generate_next_interpretation() {
            break;
        }
    }
    assert_eq!(first_round.len(), 2);

    let mut second_round: Vec<String> = Vec::new();
    loop {
        let (logtype, _) = materialize(&token);
        second_round.push(logtype);
        if !token.generate_next_interpretation() {
            break;
        }
    }
    assert_eq!(first_round, second_round);
}
