// src/query/compile.rs

//! The query tokenizer and the sub-query generator.
//!
//! [`tokenize_query`] splits a wildcard query into constant runs,
//! exact-variable tokens, and composite-wildcard tokens.
//! [`generate_subqueries`] drives the compiler: the cross product of every
//! composite token's interpretations, one [`SubQuery`] per distinct
//! `(logtype, variables)` pair.

use crate::query::chars::{
    is_alphabet,
    is_decimal_digit,
    is_delim,
    is_wildcard,
    ESCAPE_CHAR,
};
use crate::query::encode::{could_be_multi_digit_hex_value, VariableKind};
use crate::query::token::{
    CompositeWildcardToken,
    ExactVariableToken,
    QueryToken,
    QueryVariable,
};

use std::io::{Error, ErrorKind, Result};

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// SubQuery
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One concrete interpretation of a wildcard query: a logtype pattern
/// string plus the ordered variable tokens constraining the match.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SubQuery {
    logtype_query: String,
    variables: Vec<QueryVariable>,
}

impl SubQuery {
    pub fn logtype_query(&self) -> &str {
        &self.logtype_query
    }

    pub fn variables(&self) -> &[QueryVariable] {
        &self.variables
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// scanners
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Find the next wildcard or non-delimiter in `value`, starting from
/// `*pos`; `*pos` returns the position found.
///
/// An escaped non-delimiter stops one position *before* the escape
/// character so the escape is retained in the token span; an escaped
/// delimiter is skipped like a delimiter. Sets `*contains_wildcard` when
/// the stop character is an unescaped wildcard.
///
/// Returns `false` if end-of-string is reached.
fn find_wildcard_or_non_delimiter(
    value: &[u8],
    pos: &mut usize,
    contains_wildcard: &mut bool,
) -> bool {
    let mut is_escaped: bool = false;
    *contains_wildcard = false;
    while *pos < value.len() {
        let c: u8 = value[*pos];
        if is_escaped {
            is_escaped = false;
            if !is_delim(c) {
                // found escaped non-delimiter, so reverse the index to
                // retain the escape character
                *pos -= 1;
                return true;
            }
        } else if c == ESCAPE_CHAR {
            is_escaped = true;
        } else if is_wildcard(c) {
            *contains_wildcard = true;
            return true;
        } else if !is_delim(c) {
            return true;
        }
        *pos += 1;
    }
    false
}

/// Find the next unescaped delimiter that's not also a wildcard, starting
/// from `*pos`; `*pos` returns the position of the delimiter (if found,
/// else end-of-string).
///
/// An escaped delimiter stops one position *before* the escape character so
/// the escape stays outside the token. The `contains_*` flags account for
/// every byte scanned, escaped or not.
fn find_delimiter(
    value: &[u8],
    pos: &mut usize,
    contains_alphabet: &mut bool,
    contains_decimal_digit: &mut bool,
    contains_wildcard: &mut bool,
) {
    let mut is_escaped: bool = false;
    while *pos < value.len() {
        let c: u8 = value[*pos];
        if is_escaped {
            is_escaped = false;
            if is_delim(c) {
                // found escaped delimiter, so reverse the index to exclude
                // the escape character
                *pos -= 1;
                return;
            }
        } else if c == ESCAPE_CHAR {
            is_escaped = true;
        } else if is_wildcard(c) {
            *contains_wildcard = true;
        } else if is_delim(c) {
            // found delimiter that's not also a wildcard
            return;
        }
        if is_decimal_digit(c) {
            *contains_decimal_digit = true;
        } else if is_alphabet(c) {
            *contains_alphabet = true;
        }
        *pos += 1;
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// tokenizer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Tokenize the wildcard query into exact variables and potential
/// variables, i.e. any token with a wildcard.
///
/// Returns the tokens plus the indexes of every
/// [`CompositeWildcardToken`] within them (for the interpretation driver).
///
/// A pure function: equal inputs yield equal token vectors.
pub fn tokenize_query(wildcard_query: &str) -> (Vec<QueryToken>, Vec<usize>) {
    let value: &[u8] = wildcard_query.as_bytes();
    let mut tokens: Vec<QueryToken> = Vec::new();
    let mut composite_indexes: Vec<usize> = Vec::new();

    let mut end_pos: usize = 0;
    loop {
        let mut begin_pos: usize = end_pos;

        let mut contains_wildcard: bool = false;
        if !find_wildcard_or_non_delimiter(value, &mut begin_pos, &mut contains_wildcard) {
            break;
        }

        let mut contains_decimal_digit: bool = false;
        let mut contains_alphabet: bool = false;
        end_pos = begin_pos;
        find_delimiter(
            value,
            &mut end_pos,
            &mut contains_alphabet,
            &mut contains_decimal_digit,
            &mut contains_wildcard,
        );

        if contains_wildcard {
            // only consider tokens which contain more than just a wildcard
            if end_pos - begin_pos > 1 {
                let preceded_by_equals: bool = begin_pos > 0 && value[begin_pos - 1] == b'=';
                tokens.push(QueryToken::Composite(CompositeWildcardToken::new(
                    wildcard_query,
                    begin_pos,
                    end_pos,
                    preceded_by_equals,
                )));
                composite_indexes.push(tokens.len() - 1);
            }
        } else {
            // treat the token as a variable if:
            // - it contains a decimal digit, or
            // - it's directly preceded by an equals sign and contains an
            //   alphabet, or
            // - it could be a multi-digit hex value
            let variable: &str = &wildcard_query[begin_pos..end_pos];
            let kind: Option<VariableKind> = if contains_decimal_digit {
                Some(VariableKind::DecimalDigit)
            } else if begin_pos > 0 && value[begin_pos - 1] == b'=' && contains_alphabet {
                Some(VariableKind::AssignmentAlpha)
            } else if could_be_multi_digit_hex_value(variable) {
                Some(VariableKind::MultiDigitHex)
            } else {
                None
            };
            if let Some(kind) = kind {
                tokens.push(QueryToken::Exact(ExactVariableToken::new(
                    wildcard_query,
                    begin_pos,
                    end_pos,
                    kind,
                )));
            }
        }
    }

    (tokens, composite_indexes)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// sub-query generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Compile a wildcard query into its set of sub-queries.
///
/// Walks the cross product of every composite token's interpretations;
/// constant regions of the original query between token spans pass into
/// each logtype verbatim (escapes included). Distinct sub-queries in the
/// output differ in either the logtype string or the variable vector.
///
/// An empty query fails with [`ErrorKind::InvalidInput`].
pub fn generate_subqueries(wildcard_query: &str) -> Result<Vec<SubQuery>> {
    defn!("({:?})", wildcard_query);
    if wildcard_query.is_empty() {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            "wildcard query cannot be empty",
        ));
    }

    let (mut tokens, composite_indexes): (Vec<QueryToken>, Vec<usize>) =
        tokenize_query(wildcard_query);
    defo!("{} tokens, {} composite", tokens.len(), composite_indexes.len());

    let mut sub_queries: Vec<SubQuery> = Vec::new();
    loop {
        // build one candidate from the current interpretations
        let mut logtype_query: String = String::with_capacity(wildcard_query.len());
        let mut variables: Vec<QueryVariable> = Vec::new();
        let mut constant_begin_pos: usize = 0;
        for token in tokens.iter() {
            logtype_query.push_str(&wildcard_query[constant_begin_pos..token.begin_pos()]);
            match token {
                QueryToken::Exact(exact) => {
                    exact.add_to_logtype_query(&mut logtype_query);
                    variables.push(QueryVariable::Exact(exact.clone()));
                }
                QueryToken::Composite(composite) => {
                    composite.add_to_query(&mut logtype_query, &mut variables);
                }
            }
            constant_begin_pos = token.end_pos();
        }
        logtype_query.push_str(&wildcard_query[constant_begin_pos..]);

        // save the sub-query if it's unique
        let candidate = SubQuery {
            logtype_query,
            variables,
        };
        if !sub_queries.contains(&candidate) {
            sub_queries.push(candidate);
        }

        // generate the next interpretation, if any: the first composite
        // token that can still advance stops the walk; an exhausted token
        // resets itself and the advance carries to the next
        let mut all_interpretations_complete: bool = true;
        for index in composite_indexes.iter() {
            if let QueryToken::Composite(composite) = &mut tokens[*index] {
                if composite.generate_next_interpretation() {
                    all_interpretations_complete = false;
                    break;
                }
            }
        }
        if all_interpretations_complete {
            break;
        }
    }

    defx!("{} sub-queries", sub_queries.len());
    Ok(sub_queries)
}
