// src/query/mod.rs

//! The wildcard query compiler for _logpress_.
//!
//! A wildcard query (`*` matches zero or more characters, `?` matches
//! exactly one, `\` escapes) is compiled into the set of concrete
//! sub-queries over the encoded message representation. Each sub-query is
//! one logtype pattern string — constant message text with variables
//! replaced by reserved placeholder glyphs — plus the ordered list of
//! variable tokens constraining the match.
//!
//! A query token containing wildcards is compatible with multiple
//! *interpretations* (each wildcard run may stand for any mixture of
//! literal characters and encoded variables); the compiler enumerates every
//! interpretation and emits one sub-query per distinct `(logtype,
//! variables)` pair.
//!
//! * [`chars`] — the character classes of the query syntax. The delimiter
//!   class is part of the on-disk contract and must match byte-for-byte
//!   across producers and consumers of compiled queries.
//! * [`encode`] — variable kinds, placeholder glyphs, and value encoding.
//! * [`token`] — the token sum types and the per-token interpretation
//!   enumerator.
//! * [`compile`] — the tokenizer and the sub-query generator,
//!   [`generate_subqueries`].
//!
//! [`chars`]: crate::query::chars
//! [`encode`]: crate::query::encode
//! [`token`]: crate::query::token
//! [`compile`]: crate::query::compile
//! [`generate_subqueries`]: crate::query::compile::generate_subqueries

pub mod chars;
pub mod compile;
pub mod encode;
pub mod token;
