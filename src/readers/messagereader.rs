// src/readers/messagereader.rs

//! Implements `MessageReader`, the driver of deriving [`ParsedMessage`]s
//! from newline-delimited structured log records.
//!
//! The general algorithm, per line, is as follows:
//! - Normalize the record line so its `log_time` value is the line prefix.
//! - Try to parse a timestamp from the line.
//! - If the line has a timestamp and...
//!   - ...the buffered message is empty, fill it and continue reading.
//!   - ...the buffered message is not empty, save the line for the next
//!     message and return the buffered message.
//! - Else if the line has no timestamp and...
//!   - ...the buffered message is empty, return the line as a message.
//!   - ...the buffered message is not empty, add the line to the buffered
//!     message and continue reading.
//!
//! [`ParsedMessage`]: crate::data::message::ParsedMessage

use crate::common::{Bytes, Count, NLu8, ResultRead};

use crate::data::datetime::{
    parse_timestamp,
    search_known_patterns,
    EpochTimeMs,
    TimestampPatternIndex,
};

use crate::data::message::ParsedMessage;

use crate::readers::linereader::DelimRead;

use std::io::{Error, ErrorKind, Result};

extern crate serde_json;
use serde_json::Value;

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// StructuredLineNormalizer
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The structured-record field holding the primary timestamp string.
pub const LOG_TIME_FIELD: &str = "log_time";

/// Rewrite a record line to `<log_time_value> <original_line>`.
///
/// The line must be a UTF-8 JSON object with a string field `log_time`;
/// other fields pass through untouched inside the retained original text.
/// Normalization runs before timestamp-pattern search so a timestamp is the
/// line prefix whenever the source produced a well-formed record.
///
/// A line that is not such a record fails with [`ErrorKind::InvalidData`].
pub fn normalize_record_line(line: &[u8]) -> Result<String> {
    let value: Value = match serde_json::from_slice(line) {
        Ok(value) => value,
        Err(err) => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("malformed record line: {}", err),
            ));
        }
    };
    let log_time: &str = match value.get(LOG_TIME_FIELD).and_then(|v| v.as_str()) {
        Some(log_time) => log_time,
        None => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!(
                    "malformed record line: missing string field {:?}",
                    LOG_TIME_FIELD
                ),
            ));
        }
    };
    // `from_slice` accepted the line so it is valid UTF-8
    let line_str: &str = match std::str::from_utf8(line) {
        Ok(line_str) => line_str,
        Err(err) => {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("malformed record line: {}", err),
            ));
        }
    };
    let mut normalized = String::with_capacity(log_time.len() + 1 + line_str.len());
    normalized.push_str(log_time);
    normalized.push(' ');
    normalized.push_str(line_str);
    Ok(normalized)
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// MessageReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Internal statistics of a [`MessageReader`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SummaryMessageReader {
    /// `Count` of lines processed (normalized and timestamp-parsed).
    pub messagereader_lines: Count,
    /// `Count` of complete messages returned to the caller.
    pub messagereader_messages: Count,
    /// `Count` of lines where the retained pattern hint parsed the
    /// timestamp, skipping the registry scan.
    pub messagereader_ts_hint_hits: Count,
    /// `Count` of full first-fit registry scans.
    pub messagereader_ts_searches: Count,
}

/// A specialized reader that groups delimited record lines into
/// [`ParsedMessage`]s.
///
/// A `MessageReader` holds a one-line lookahead: a line bearing a timestamp
/// is the boundary between messages, so it is buffered until the message it
/// begins is itself completed by the *next* timestamped line (or end of
/// input). Untimestamped lines following a timestamped line are
/// stack-traces/continuations belonging to the most recent timestamped
/// line.
///
/// Single-threaded; callers needing parallelism shard inputs and
/// instantiate one `MessageReader` per shard. Dropping at any time is safe:
/// the only state is owned scratch buffers and the lookahead message.
pub struct MessageReader {
    /// the one-line lookahead
    buffered_msg: ParsedMessage,
    /// scratch buffer holding the line being accumulated; reused across
    /// calls to bound allocation
    line: Bytes,
    /// Internal stats - lines processed.
    pub(super) lines_processed: Count,
    /// Internal stats - messages completed.
    pub(super) messages_completed: Count,
    /// Internal stats - pattern-hint hits.
    pub(super) ts_hint_hits: Count,
    /// Internal stats - full registry scans.
    pub(super) ts_searches: Count,
}

impl Default for MessageReader {
    fn default() -> Self {
        MessageReader::new()
    }
}

impl MessageReader {
    pub fn new() -> MessageReader {
        MessageReader {
            buffered_msg: ParsedMessage::new(),
            line: Bytes::new(),
            lines_processed: 0,
            messages_completed: 0,
            ts_hint_hits: 0,
            ts_searches: 0,
        }
    }

    /// Derive the next complete message from a caller-supplied buffer.
    ///
    /// `buf_pos` is the read cursor into `buffer`; it is advanced past the
    /// consumed bytes. Returns `Ok(true)` iff `message` was populated with
    /// a complete message. Returns `Ok(false)` when the cursor reached the
    /// end of `buffer` without completing a message; the caller may supply
    /// more bytes and call again.
    ///
    /// With `drain = false` a partial trailing line (no `'\n'`) is carried
    /// in the scratch buffer, not processed. With `drain = true` it is
    /// processed as if delimited.
    ///
    /// This shape never flushes the lookahead on its own (the buffer may be
    /// refilled); when the input is finished call
    /// [`flush_buffered`](MessageReader::flush_buffered).
    pub fn parse_next_message_from_buffer(
        &mut self,
        buffer: &[u8],
        buf_pos: &mut usize,
        drain: bool,
        message: &mut ParsedMessage,
    ) -> Result<bool> {
        defn!("(buffer len {}, buf_pos {}, drain {})", buffer.len(), buf_pos, drain);
        message.clear_except_ts_patt();

        while *buf_pos < buffer.len() {
            // read a line up to the delimiter
            let begin: usize = *buf_pos;
            let (end, found_delim): (usize, bool) =
                match buffer[begin..].iter().position(|&b| NLu8 == b) {
                    Some(at) => (begin + at + 1, true),
                    None => (buffer.len(), false),
                };
            self.line.extend_from_slice(&buffer[begin..end]);
            *buf_pos = end;

            if !found_delim && !drain {
                // no delimiter was found and the source doesn't need to be
                // drained; keep the partial line for the next call
                defx!("no delimiter, not draining, return false");
                return Ok(false);
            }

            if self.parse_line(message)? {
                defx!("message completed, return true");
                return Ok(true);
            }
        }

        defx!("buffer exhausted, return false");
        Ok(false)
    }

    /// Derive the next complete message from a [`DelimRead`] source.
    ///
    /// Returns `Ok(true)` iff `message` was populated with a complete
    /// message. Returns `Ok(false)` when the reader returned end of input
    /// and both the scratch line and the lookahead are empty. End of input
    /// with a non-empty lookahead flushes: the lookahead moves into
    /// `message` and `Ok(true)` is returned.
    ///
    /// Drain semantics are as for
    /// [`parse_next_message_from_buffer`](MessageReader::parse_next_message_from_buffer).
    /// A reader error is surfaced verbatim.
    pub fn parse_next_message<R: DelimRead>(
        &mut self,
        reader: &mut R,
        drain: bool,
        message: &mut ParsedMessage,
    ) -> Result<bool> {
        defn!("(drain {})", drain);
        message.clear_except_ts_patt();

        loop {
            match reader.try_read_to_delimiter(NLu8, true, true, &mut self.line) {
                ResultRead::Err(err) => {
                    defx!("reader error {:?}", err);
                    return Err(err);
                }
                ResultRead::Done => {
                    if self.line.is_empty() {
                        if self.buffered_msg.is_empty() {
                            break;
                        }
                        // flush the lookahead
                        message.consume(&mut self.buffered_msg);
                        self.messages_completed += 1;
                        defx!("end of input, flushed lookahead, return true");
                        return Ok(true);
                    }
                    // a partial line remains in the scratch buffer;
                    // fall through and let drain semantics decide
                }
                ResultRead::Found(_count) => {}
            }

            if !drain && self.line.last() != Some(&NLu8) {
                defx!("no delimiter, not draining, return false");
                return Ok(false);
            }

            if self.parse_line(message)? {
                defx!("message completed, return true");
                return Ok(true);
            }
        }

        defx!("end of input, return false");
        Ok(false)
    }

    /// Move the lookahead message into `message`, if any.
    ///
    /// For callers of the buffer-backed shape that know their input is
    /// finished. Returns `true` iff `message` was populated.
    pub fn flush_buffered(
        &mut self,
        message: &mut ParsedMessage,
    ) -> bool {
        if self.buffered_msg.is_empty() {
            return false;
        }
        message.clear_except_ts_patt();
        message.consume(&mut self.buffered_msg);
        self.messages_completed += 1;
        true
    }

    /// The one-line lookahead, read-only.
    pub fn buffered_msg(&self) -> &ParsedMessage {
        &self.buffered_msg
    }

    pub fn summary(&self) -> SummaryMessageReader {
        SummaryMessageReader {
            messagereader_lines: self.lines_processed,
            messagereader_messages: self.messages_completed,
            messagereader_ts_hint_hits: self.ts_hint_hits,
            messagereader_ts_searches: self.ts_searches,
        }
    }

    /// Process the line held in the scratch buffer; the shared inner
    /// algorithm of both `parse_next_message*` shapes.
    ///
    /// Returns `Ok(true)` iff a complete message was moved into `message`.
    /// On failure the scratch line is cleared so the reader stays
    /// consistent for a retry with a new source.
    fn parse_line(
        &mut self,
        message: &mut ParsedMessage,
    ) -> Result<bool> {
        let mut message_completed: bool = false;
        self.lines_processed += 1;

        let normalized: String = match normalize_record_line(&self.line) {
            Ok(normalized) => normalized,
            Err(err) => {
                defo!("normalize_record_line failed: {:?}", err);
                self.line.clear();
                return Err(err);
            }
        };

        // parse timestamp and content; try the retained pattern hint first
        let mut ts_patt: Option<TimestampPatternIndex> = message.ts_patt();
        let mut parsed: Option<(EpochTimeMs, usize, usize)> = match ts_patt {
            Some(index) => {
                let parsed = parse_timestamp(index, normalized.as_str());
                if parsed.is_some() {
                    self.ts_hint_hits += 1;
                }
                parsed
            }
            None => None,
        };
        if parsed.is_none() {
            self.ts_searches += 1;
            match search_known_patterns(normalized.as_str()) {
                Some((index, epoch, begin, end)) => {
                    ts_patt = Some(index);
                    parsed = Some((epoch, begin, end));
                }
                None => {
                    ts_patt = None;
                }
            }
        }

        match parsed {
            Some((timestamp, ts_begin, ts_end)) => {
                // a timestamp was parsed
                if self.buffered_msg.is_empty() {
                    // fill lookahead with line
                    defo!("timestamp, empty lookahead: buffer the line");
                    self.buffered_msg
                        .set(ts_patt, timestamp, normalized.as_str(), ts_begin, ts_end);
                } else {
                    // move lookahead to message
                    defo!("timestamp, non-empty lookahead: complete the lookahead");
                    message.consume(&mut self.buffered_msg);
                    // save line for next message
                    self.buffered_msg
                        .set(ts_patt, timestamp, normalized.as_str(), ts_begin, ts_end);
                    message_completed = true;
                    self.messages_completed += 1;
                }
            }
            None => {
                // no timestamp was parsed
                if self.buffered_msg.is_empty() {
                    // return line as a standalone message
                    defo!("no timestamp, empty lookahead: standalone message");
                    message.set(None, 0, normalized.as_str(), 0, 0);
                    message_completed = true;
                    self.messages_completed += 1;
                } else {
                    // append line to the buffered message
                    defo!("no timestamp, non-empty lookahead: continuation");
                    self.buffered_msg.append_line(normalized.as_str());
                }
            }
        }

        self.line.clear();
        Ok(message_completed)
    }
}
