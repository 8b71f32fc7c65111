// src/data/message.rs

//! Implements a [`ParsedMessage`], the accumulator for one logical message
//! derived by a [`MessageReader`].
//!
//! [`MessageReader`]: crate::readers::messagereader::MessageReader

use crate::data::datetime::{EpochTimeMs, TimestampPatternIndex};

use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// ParsedMessage
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A `ParsedMessage` is one logical message: one or more lines, where the
/// first line bears the message timestamp (when one was recognized) and any
/// following lines are untimestamped continuations.
///
/// When non-empty, `ts_patt` is `Some` iff the first line contained a
/// recognized timestamp. The pattern index is a non-owning back-link into
/// the static registry
/// [`TIMESTAMP_PATTERNS`](crate::data::datetime::TIMESTAMP_PATTERNS).
#[derive(Default, Eq, PartialEq)]
pub struct ParsedMessage {
    /// index of the registry pattern that matched the first line
    ts_patt: Option<TimestampPatternIndex>,
    /// epoch millisecond timestamp of the first line
    timestamp: EpochTimeMs,
    /// the concatenated line content, line delimiters included
    content: String,
    /// byte offset within `content` where the timestamp string starts
    /// (inclusive)
    ts_begin: usize,
    /// byte offset within `content` where the timestamp string ends, one
    /// past the last character (exclusive)
    ts_end: usize,
}

impl fmt::Debug for ParsedMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ParsedMessage")
            .field("ts_patt", &self.ts_patt)
            .field("timestamp", &self.timestamp)
            .field("ts_begin", &self.ts_begin)
            .field("ts_end", &self.ts_end)
            .field("content.len", &self.content.len())
            .field("content", &self.content)
            .finish()
    }
}

impl ParsedMessage {
    pub fn new() -> ParsedMessage {
        ParsedMessage::default()
    }

    /// An empty message has no content (and no timestamp pattern unless it
    /// was retained by [`clear_except_ts_patt`] as a parse hint).
    ///
    /// [`clear_except_ts_patt`]: ParsedMessage::clear_except_ts_patt
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Fill this message from one complete line.
    ///
    /// `ts_patt` is `None` when the line carried no recognizable timestamp
    /// (in which case `timestamp`, `ts_begin`, `ts_end` are ignored values,
    /// conventionally zero).
    pub fn set(
        &mut self,
        ts_patt: Option<TimestampPatternIndex>,
        timestamp: EpochTimeMs,
        line: &str,
        ts_begin: usize,
        ts_end: usize,
    ) {
        self.ts_patt = ts_patt;
        self.timestamp = timestamp;
        self.content.clear();
        self.content.push_str(line);
        self.ts_begin = ts_begin;
        self.ts_end = ts_end;
    }

    /// Append a continuation line (delimiter included) to the content.
    pub fn append_line(&mut self, line: &str) {
        self.content.push_str(line);
    }

    /// Transfer `other`'s state into `self` and reset `other` to empty
    /// (its timestamp pattern included).
    ///
    /// The content buffers are swapped, not reallocated, so both messages
    /// keep their scratch capacity.
    pub fn consume(&mut self, other: &mut ParsedMessage) {
        self.ts_patt = other.ts_patt.take();
        self.timestamp = other.timestamp;
        self.ts_begin = other.ts_begin;
        self.ts_end = other.ts_end;
        std::mem::swap(&mut self.content, &mut other.content);
        other.content.clear();
        other.timestamp = 0;
        other.ts_begin = 0;
        other.ts_end = 0;
    }

    /// Reset all fields except the last-matched timestamp pattern index.
    ///
    /// The retained index is the hint tried first on the next line, making
    /// pattern lookup amortized O(1) for homogeneous streams.
    pub fn clear_except_ts_patt(&mut self) {
        self.timestamp = 0;
        self.content.clear();
        self.ts_begin = 0;
        self.ts_end = 0;
    }

    /// Index of the registry pattern that matched the first line, or the
    /// retained hint on a cleared message.
    pub fn ts_patt(&self) -> Option<TimestampPatternIndex> {
        self.ts_patt
    }

    pub fn timestamp(&self) -> EpochTimeMs {
        self.timestamp
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// `(begin, end)` byte offsets of the timestamp within the content.
    pub fn ts_span(&self) -> (usize, usize) {
        (self.ts_begin, self.ts_end)
    }

    /// `true` iff the message's first line contained a recognized
    /// timestamp.
    pub fn has_timestamp(&self) -> bool {
        !self.is_empty() && self.ts_patt.is_some()
    }
}
