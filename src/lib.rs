// src/lib.rs

//! _logpress_ core library.
//!
//! Two tightly coupled subsystems:
//!
//! * Message assembly: a byte stream of newline-delimited structured log
//!   records (JSON objects carrying a `log_time` field) is grouped into
//!   logical messages, one per leading timestamped line plus any
//!   untimestamped continuation lines that follow it.
//!   See [`MessageReader`].
//! * Query compilation: a wildcard search pattern (`*`, `?`, `\` escapes)
//!   is compiled into the set of concrete sub-queries over the encoded
//!   message representation, each a logtype pattern string plus an ordered
//!   list of variable tokens. See [`generate_subqueries`].
//!
//! The archive format, the variable dictionary, and the CLI front end are
//! external collaborators; this crate only consumes or exports data across
//! those boundaries.
//!
//! [`MessageReader`]: crate::readers::messagereader::MessageReader
//! [`generate_subqueries`]: crate::query::compile::generate_subqueries

pub mod common;
pub mod data;
pub mod query;
pub mod readers;
#[cfg(test)]
pub mod tests;
