// src/query/token.rs

//! Token types of the query compiler.
//!
//! During tokenization a query decomposes into constant text plus two token
//! shapes, the closed sum [`QueryToken`]:
//!
//! * [`ExactVariableToken`] — a wildcard-free token classified as a
//!   variable; it matches exactly one encoded value.
//! * [`CompositeWildcardToken`] — a token containing at least one wildcard;
//!   it is compatible with multiple *interpretations* and owns the cursor
//!   that enumerates them.
//!
//! A finished sub-query carries the closed sum [`QueryVariable`]:
//! [`ExactVariableToken`] again, or [`WildcardToken`] — one wildcard-bearing
//! sub-span of a composite token interpreted as a variable of some kind.

use crate::query::chars::{
    is_alphabet,
    is_decimal_digit,
    is_hex_alpha,
    is_hex_digit,
    ESCAPE_CHAR,
};
use crate::query::encode::{encode, EncodedVariable, VariableKind};

extern crate more_asserts;
use more_asserts::debug_assert_lt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ExactVariableToken
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A wildcard-free query token classified as a variable.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExactVariableToken {
    value: String,
    begin_pos: usize,
    end_pos: usize,
    kind: VariableKind,
    encoded: EncodedVariable,
}

impl ExactVariableToken {
    pub fn new(
        query: &str,
        begin_pos: usize,
        end_pos: usize,
        kind: VariableKind,
    ) -> ExactVariableToken {
        debug_assert_lt!(begin_pos, end_pos);
        let value: String = query[begin_pos..end_pos].to_string();
        let encoded: EncodedVariable = encode(kind, value.as_str());
        ExactVariableToken {
            value,
            begin_pos,
            end_pos,
            kind,
            encoded,
        }
    }

    /// Append this token's contribution to a logtype query: the
    /// placeholder glyph of its kind.
    pub fn add_to_logtype_query(&self, logtype_query: &mut String) {
        logtype_query.push(self.kind.placeholder());
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn begin_pos(&self) -> usize {
        self.begin_pos
    }

    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn encoded(&self) -> EncodedVariable {
        self.encoded
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// WildcardToken
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One wildcard-bearing sub-span of a composite token, interpreted as a
/// variable.
///
/// The `*` flanks, when present, also appear in the logtype around the
/// placeholder: a `*` at a variable boundary may match more than the
/// variable itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WildcardToken {
    value: String,
    begin_pos: usize,
    end_pos: usize,
    kind: VariableKind,
    has_prefix_star: bool,
    has_suffix_star: bool,
}

impl WildcardToken {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn begin_pos(&self) -> usize {
        self.begin_pos
    }

    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    pub fn has_prefix_star(&self) -> bool {
        self.has_prefix_star
    }

    pub fn has_suffix_star(&self) -> bool {
        self.has_suffix_star
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CompositeWildcardToken
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// One wildcard-bearing sub-span of a composite token (byte offsets
/// relative to the token) and its current interpretation choice.
#[derive(Clone, Debug, Eq, PartialEq)]
struct WildcardSegment {
    begin: usize,
    end: usize,
    starts_with_star: bool,
    ends_with_star: bool,
    /// the kind this segment would have as a variable, `None` when the
    /// segment can only be constant text
    variable_kind: Option<VariableKind>,
    /// a digit-bearing segment can never appear as constant text in a
    /// logtype: ingestion always extracts digit-bearing tokens as variables
    must_be_variable: bool,
    /// interpretation choice: 0 is the first choice, 1 the second
    cursor: u8,
}

impl WildcardSegment {
    /// how many interpretation choices this segment has
    fn choice_count(&self) -> u8 {
        match (self.variable_kind, self.must_be_variable) {
            (None, _) => 1,
            (Some(_), true) => 1,
            (Some(_), false) => 2,
        }
    }

    /// is the segment a variable under its current choice?
    fn is_variable(&self) -> bool {
        self.variable_kind.is_some() && (self.must_be_variable || self.cursor == 1)
    }
}

/// A query token containing at least one wildcard and at least two
/// characters total.
///
/// The token's span is partitioned at its unescaped `*` wildcards into
/// *segments*, each segment including its flanking stars (adjacent segments
/// share the star between them). Every segment may be constant text;
/// eligible segments may instead be a variable. The cross product of the
/// per-segment choices is the token's interpretation space, enumerated
/// odometer-style by [`generate_next_interpretation`].
///
/// [`generate_next_interpretation`]: CompositeWildcardToken::generate_next_interpretation
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositeWildcardToken {
    value: String,
    begin_pos: usize,
    end_pos: usize,
    segments: Vec<WildcardSegment>,
}

impl CompositeWildcardToken {
    /// `preceded_by_equals` — the byte before `begin_pos` in the original
    /// query is `=`; an alphabetic right-hand side of an assignment is a
    /// variable.
    pub fn new(
        query: &str,
        begin_pos: usize,
        end_pos: usize,
        preceded_by_equals: bool,
    ) -> CompositeWildcardToken {
        debug_assert_lt!(begin_pos, end_pos);
        let value: String = query[begin_pos..end_pos].to_string();
        let segments: Vec<WildcardSegment> = build_segments(value.as_str(), preceded_by_equals);
        CompositeWildcardToken {
            value,
            begin_pos,
            end_pos,
            segments,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn begin_pos(&self) -> usize {
        self.begin_pos
    }

    pub fn end_pos(&self) -> usize {
        self.end_pos
    }

    /// Materialize the current interpretation.
    ///
    /// Constant-chosen segments and text between variable segments are
    /// appended to `logtype_query` literally. Variable-chosen segments
    /// append prefix `*` (unless the previous variable segment already
    /// emitted the shared star), the placeholder glyph, and suffix `*`;
    /// one [`WildcardToken`] is pushed to `variable_tokens` per variable
    /// segment.
    pub fn add_to_query(
        &self,
        logtype_query: &mut String,
        variable_tokens: &mut Vec<QueryVariable>,
    ) {
        // `emitted`: count of leading token bytes already in the logtype.
        // Adjacent variable segments share a star; the suffix `*` of one is
        // the prefix `*` of the next and must appear only once.
        let mut emitted: usize = 0;
        for segment in self.segments.iter() {
            if !segment.is_variable() {
                continue;
            }
            let kind: VariableKind = match segment.variable_kind {
                Some(kind) => kind,
                None => continue,
            };
            if segment.begin > emitted {
                logtype_query.push_str(&self.value[emitted..segment.begin]);
            }
            if segment.starts_with_star && segment.begin >= emitted {
                logtype_query.push('*');
            }
            logtype_query.push(kind.placeholder());
            if segment.ends_with_star {
                logtype_query.push('*');
            }
            variable_tokens.push(QueryVariable::Wildcard(WildcardToken {
                value: self.value[segment.begin..segment.end].to_string(),
                begin_pos: self.begin_pos + segment.begin,
                end_pos: self.begin_pos + segment.end,
                kind,
                has_prefix_star: segment.starts_with_star,
                has_suffix_star: segment.ends_with_star,
            }));
            emitted = segment.end;
        }
        if emitted < self.value.len() {
            logtype_query.push_str(&self.value[emitted..]);
        }
    }

    /// Advance to the next interpretation, odometer-style: bump the first
    /// segment with a choice remaining and reset the segments before it.
    ///
    /// Returns `false` when all interpretations have been enumerated,
    /// whereupon every cursor resets to the first interpretation for a
    /// subsequent top-level round.
    pub fn generate_next_interpretation(&mut self) -> bool {
        for at in 0..self.segments.len() {
            if self.segments[at].cursor + 1 < self.segments[at].choice_count() {
                self.segments[at].cursor += 1;
                for before in 0..at {
                    self.segments[before].cursor = 0;
                }
                return true;
            }
        }
        for segment in self.segments.iter_mut() {
            segment.cursor = 0;
        }
        false
    }

    /// Count of interpretations this token enumerates.
    pub fn count_interpretations(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| segment.choice_count() as usize)
            .product()
    }
}

/// Split a composite token's span at its unescaped `*` wildcards and
/// classify each resulting segment.
fn build_segments(
    value: &str,
    preceded_by_equals: bool,
) -> Vec<WildcardSegment> {
    let bytes: &[u8] = value.as_bytes();

    // find unescaped `*` positions
    let mut stars: Vec<usize> = Vec::new();
    let mut is_escaped: bool = false;
    for (at, &c) in bytes.iter().enumerate() {
        if is_escaped {
            is_escaped = false;
            continue;
        }
        if c == ESCAPE_CHAR {
            is_escaped = true;
            continue;
        }
        if c == b'*' {
            stars.push(at);
        }
    }

    // segment spans; a `*`-only remainder between/around stars is not a
    // segment
    let mut spans: Vec<(usize, usize)> = Vec::new();
    match stars.first() {
        None => {
            spans.push((0, bytes.len()));
        }
        Some(&first) => {
            if first > 0 {
                spans.push((0, first + 1));
            }
            for pair in stars.windows(2) {
                if pair[1] > pair[0] + 1 {
                    spans.push((pair[0], pair[1] + 1));
                }
            }
            let last: usize = stars[stars.len() - 1];
            if last + 1 < bytes.len() {
                spans.push((last, bytes.len()));
            }
        }
    }

    spans
        .into_iter()
        .map(|(begin, end)| {
            let preceded: bool = preceded_by_equals && begin == 0;
            let (variable_kind, must_be_variable) =
                classify_wildcard_span(&bytes[begin..end], preceded);
            WildcardSegment {
                begin,
                end,
                starts_with_star: bytes[begin] == b'*' && stars.contains(&begin),
                ends_with_star: stars.contains(&(end - 1)),
                variable_kind,
                must_be_variable,
                cursor: 0,
            }
        })
        .collect()
}

/// Classify one wildcard-bearing sub-span: the kind it would have as a
/// variable (`None` when it can only be constant text) and whether the
/// constant interpretation is ruled out.
///
/// In order: an alphabetic span preceded by `=` is an assignment variable;
/// a hex-shaped span (explicit `0x` prefix, or hex letters with any
/// wildcards standing for further hex digits) is a hex variable; a span
/// with a literal decimal digit is a digit variable. A span consisting only
/// of wildcards is never a variable.
fn classify_wildcard_span(
    span: &[u8],
    preceded_by_equals: bool,
) -> (Option<VariableKind>, bool) {
    let mut has_digit: bool = false;
    let mut has_alpha: bool = false;
    let mut only_wildcards: bool = true;
    let mut is_escaped: bool = false;
    for &c in span.iter() {
        if is_escaped {
            is_escaped = false;
            only_wildcards = false;
        } else if c == ESCAPE_CHAR {
            is_escaped = true;
            continue;
        } else if c == b'*' || c == b'?' {
            continue;
        } else {
            only_wildcards = false;
        }
        if is_decimal_digit(c) {
            has_digit = true;
        } else if is_alphabet(c) {
            has_alpha = true;
        }
    }
    if only_wildcards {
        return (None, false);
    }

    let variable_kind: Option<VariableKind> = if preceded_by_equals && has_alpha {
        Some(VariableKind::AssignmentAlpha)
    } else if hex_shaped(span) {
        Some(VariableKind::MultiDigitHex)
    } else if has_digit {
        Some(VariableKind::DecimalDigit)
    } else {
        None
    };
    let must_be_variable: bool = has_digit && variable_kind.is_some();
    (variable_kind, must_be_variable)
}

/// Could this span, with its wildcards suitably substituted, be a
/// multi-digit hex value?
///
/// Requires an explicit literal `0x`/`0X` prefix or at least one literal
/// hex letter; a span of plain digits and wildcards stays a decimal-digit
/// candidate.
fn hex_shaped(span: &[u8]) -> bool {
    let (body, prefixed): (&[u8], bool) =
        if span.len() >= 2 && span[0] == b'0' && (span[1] == b'x' || span[1] == b'X') {
            (&span[2..], true)
        } else {
            (span, false)
        };
    let mut digits_min: usize = 0;
    let mut has_star: bool = false;
    let mut has_hex_alpha: bool = false;
    let mut is_escaped: bool = false;
    for &c in body.iter() {
        if is_escaped {
            is_escaped = false;
        } else if c == ESCAPE_CHAR {
            is_escaped = true;
            continue;
        } else if c == b'*' {
            has_star = true;
            continue;
        } else if c == b'?' {
            digits_min += 1;
            continue;
        }
        if !is_hex_digit(c) {
            return false;
        }
        if is_hex_alpha(c) {
            has_hex_alpha = true;
        }
        digits_min += 1;
    }
    if digits_min == 0 && !has_star {
        return false;
    }
    if !(prefixed || has_hex_alpha) {
        return false;
    }
    digits_min >= 2 || has_star
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// token sum types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A token of the tokenized query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryToken {
    Exact(ExactVariableToken),
    Composite(CompositeWildcardToken),
}

impl QueryToken {
    pub fn begin_pos(&self) -> usize {
        match self {
            QueryToken::Exact(token) => token.begin_pos(),
            QueryToken::Composite(token) => token.begin_pos(),
        }
    }

    pub fn end_pos(&self) -> usize {
        match self {
            QueryToken::Exact(token) => token.end_pos(),
            QueryToken::Composite(token) => token.end_pos(),
        }
    }
}

/// A variable token of a finished sub-query.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum QueryVariable {
    Exact(ExactVariableToken),
    Wildcard(WildcardToken),
}
