// src/data/datetime.rs
//
// the most relevant documents to understand this file:
// `chrono` crate `strftime` format:
// https://docs.rs/chrono/latest/chrono/format/strftime/index.html
// `regex` crate patterns
// https://docs.rs/regex/latest/regex/
//

//! Registry of known timestamp formats.
//!
//! A [`TimestampPattern`] pairs a byte-oriented regular expression that
//! recognizes one timestamp format inside a candidate line with the
//! instructions to convert the matched substring to an epoch millisecond
//! value. The registry [`TIMESTAMP_PATTERNS`] is a static list scanned
//! first-fit, in declared order, by [`search_known_patterns`].
//!
//! Formats without a zone are taken as UTC. Failure to parse returns `None`
//! without side effects.

#![allow(non_camel_case_types)]

use std::fmt;

extern crate chrono;
use chrono::{DateTime, NaiveDateTime};

extern crate const_format;
use const_format::concatcp;

extern crate lazy_static;
use lazy_static::lazy_static;

extern crate regex;
use regex::bytes::Regex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Timestamp typing, regex matching, and strftime conversion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Epoch timestamp in milliseconds, signed.
pub type EpochTimeMs = i64;

/// Index into the global [`TIMESTAMP_PATTERNS`].
///
/// The registry outlives every message; an index is the non-owning
/// back-link retained by a
/// [`ParsedMessage`](crate::data::message::ParsedMessage).
pub type TimestampPatternIndex = usize;

/// regular expression formatting pattern, passed to [`regex::bytes::Regex`]
pub type TimestampRegex_str = str;
/// crate `chrono` `strftime` formatting pattern, passed to
/// `chrono::DateTime::parse_from_str` or
/// `chrono::NaiveDateTime::parse_from_str`
pub type TimestampStrftime_str = str;
/// a run-time created vector of [`Regex`] instances that is a counterpart
/// to [`TIMESTAMP_PATTERNS`]
pub type TimestampPatternsRegexVec = Vec<Regex>;

/// How a matched timestamp substring becomes an [`EpochTimeMs`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TsConvert {
    /// `chrono::DateTime::parse_from_rfc3339`
    Rfc3339,
    /// `chrono::DateTime::parse_from_str` with a `strftime` pattern
    /// carrying a numeric offset (`%z`)
    Offset,
    /// `chrono::NaiveDateTime::parse_from_str`, the result taken as UTC
    Utc,
    /// Year-less format; [`YEAR_FALLBACKDUMMY`] is prepended and then
    /// converted as [`TsConvert::Utc`]. The associated `strftime` pattern
    /// must begin with `"%Y "`.
    UtcYearFill,
}

/// For timestamps missing a year a filler year must be used.
///
/// First leap year after the Unix Epoch, so a `Feb 29` without a year still
/// converts.
pub const YEAR_FALLBACKDUMMY: &str = "1972";

/// `Instr`uctions for parsing from an unknown `str` to a
/// `regex::bytes::Regex().captures()` instance to a chrono parse call.
///
/// The settings are entirely interdependent.
/// Tested in `test_timestamp_patterns_builtin`.
pub struct TimestampPattern<'a> {
    /// regex pattern for `captures`; must define named capture group `ts`
    pub regex_pattern: &'a TimestampRegex_str,
    /// in what `strftime` form is the `ts` capture?
    pub strftime: &'a TimestampStrftime_str,
    /// conversion rule for the `ts` capture
    pub convert: TsConvert,
    /// fractional separator is a comma; rewritten to `.` before the chrono
    /// parse (chrono only accepts `.`)
    pub comma_fractional: bool,
    /// limit of leading line bytes the regex match is attempted against
    pub range_limit: usize,
    /// hardcoded self-test cases
    #[cfg(any(debug_assertions, test))]
    pub _test_cases: &'a [(&'a str, EpochTimeMs)],
    /// line number of declaration, to aid debugging
    pub _line_num: u32,
}

/// declare a [`TimestampPattern`] more easily
#[macro_export]
macro_rules! TSP {
    (
        $regex:expr,
        $strftime:expr,
        $convert:expr,
        $comma:literal,
        $range_limit:literal,
        $test_cases:expr,
        $line_num:expr,
    ) => {
        TimestampPattern {
            regex_pattern: $regex,
            strftime: $strftime,
            convert: $convert,
            comma_fractional: $comma,
            range_limit: $range_limit,
            #[cfg(any(debug_assertions, test))]
            _test_cases: $test_cases,
            _line_num: $line_num,
        }
    };
}
// allow easy macro import via `use logpress::data::datetime::TSP;`
pub use TSP;

impl fmt::Debug for TimestampPattern<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // regexp strings can be long, truncate
        const MAXLEN: usize = 24;
        let mut rp: String = String::with_capacity(MAXLEN + 5);
        rp.extend(self.regex_pattern.chars().take(MAXLEN));
        if self.regex_pattern.len() > MAXLEN {
            rp.push('…');
        }
        f.debug_struct("TimestampPattern:")
            .field("regex_pattern", &rp)
            .field("strftime", &self.strftime)
            .field("convert", &self.convert)
            .field("line", &self._line_num)
            .finish()
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// regex and strftime fragments
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// regexp: `YYYY-MM-DD` calendar date
const RP_DATE: &TimestampRegex_str = r"\d{4}-\d{2}-\d{2}";
/// regexp: `YYYY/MM/DD` calendar date
const RP_DATE_SLASH: &TimestampRegex_str = r"\d{4}/\d{2}/\d{2}";
/// regexp: `HH:MM:SS` clock time
const RP_TIME: &TimestampRegex_str = r"\d{2}:\d{2}:\d{2}";
/// regexp: optional dot fractional seconds
const RP_FRACTIONALq: &TimestampRegex_str = r"(?:\.\d{1,9})?";
/// regexp: comma fractional seconds
const RP_FRACTIONAL_COMMA: &TimestampRegex_str = r",\d{1,9}";
/// regexp: RFC 3339 zone, `Z` or `±HH:MM`
const RP_TZ_RFC: &TimestampRegex_str = r"(?:Z|[+-]\d{2}:\d{2})";
/// regexp: packed numeric offset, `±HHMM`
const RP_TZ_PACKED: &TimestampRegex_str = r"[+-]\d{4}";
/// regexp: abbreviated month name, e.g. `Jan`
const RP_MONTHb: &TimestampRegex_str = r"[A-Z][a-z]{2}";
/// regexp: space-padded day of month, e.g. ` 8`, `08`, `28`
const RP_DAYe: &TimestampRegex_str = r" {1,2}\d{1,2}";

// strftime patterns used in the `TSP!` declarations

const STP_YmdHMSfz_RFC: &TimestampStrftime_str = "%+";
const STP_YmdTHMSfz: &TimestampStrftime_str = "%Y-%m-%dT%H:%M:%S%.f%z";
const STP_YmdHMSf: &TimestampStrftime_str = "%Y-%m-%d %H:%M:%S%.f";
const STP_YmdTHMSf: &TimestampStrftime_str = "%Y-%m-%dT%H:%M:%S%.f";
const STP_YmdHMSf_SLASH: &TimestampStrftime_str = "%Y/%m/%d %H:%M:%S%.f";
/// `%Y ` prefix is filled with [`YEAR_FALLBACKDUMMY`]
const STP_beHMS: &TimestampStrftime_str = "%Y %b %e %H:%M:%S";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// the global list of built-in timestamp parsing "instructions"
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub const TIMESTAMP_PATTERNS_LEN: usize = 7;

/// Built-in `const` [`TimestampPattern`] timestamp parsing patterns.
///
/// Order of declaration matters: all of these regex patterns are attempted
/// first-fit, and a general pattern listed before a specific pattern may
/// capture less of the timestamp. Notice the "with zone" declarations are
/// listed before the same declaration "without"; a zone-less pattern would
/// match the leading part of a zone-bearing timestamp and drop the offset.
pub const TIMESTAMP_PATTERNS: [TimestampPattern; TIMESTAMP_PATTERNS_LEN] = [
    // example:
    //     2024-01-01T00:00:01Z
    //     2015-01-31T15:50:45.392-05:00
    TSP!(
        concatcp!("(?P<ts>", RP_DATE, "T", RP_TIME, RP_FRACTIONALq, RP_TZ_RFC, ")"),
        STP_YmdHMSfz_RFC,
        TsConvert::Rfc3339,
        false,
        64,
        &[
            ("2024-01-01T00:00:01Z", 1704067201000),
            ("2015-01-31T15:50:45.392-05:00", 1422737445392),
            ("2024-06-30T23:59:59.999Z", 1719791999999),
        ],
        line!(),
    ),
    // example:
    //     2000-01-02T12:33:01-1200
    TSP!(
        concatcp!("(?P<ts>", RP_DATE, "T", RP_TIME, RP_FRACTIONALq, RP_TZ_PACKED, ")"),
        STP_YmdTHMSfz,
        TsConvert::Offset,
        false,
        64,
        &[("2000-01-02T12:33:01-1200", 946859581000)],
        line!(),
    ),
    // example:
    //     2015-01-31 15:50:45,392
    TSP!(
        concatcp!("(?P<ts>", RP_DATE, " ", RP_TIME, RP_FRACTIONAL_COMMA, ")"),
        STP_YmdHMSf,
        TsConvert::Utc,
        true,
        64,
        &[("2015-01-31 15:50:45,392", 1422719445392)],
        line!(),
    ),
    // example:
    //     2024-01-01 00:00:00
    //     2020-03-05 12:17:59.631
    TSP!(
        concatcp!("(?P<ts>", RP_DATE, " ", RP_TIME, RP_FRACTIONALq, ")"),
        STP_YmdHMSf,
        TsConvert::Utc,
        false,
        64,
        &[
            ("2024-01-01 00:00:00", 1704067200000),
            ("2020-03-05 12:17:59.631", 1583410679631),
        ],
        line!(),
    ),
    // example:
    //     2024-01-01T00:00:01
    TSP!(
        concatcp!("(?P<ts>", RP_DATE, "T", RP_TIME, RP_FRACTIONALq, ")"),
        STP_YmdTHMSf,
        TsConvert::Utc,
        false,
        64,
        &[("2024-01-01T00:00:01", 1704067201000)],
        line!(),
    ),
    // example:
    //     2020/03/05 12:17:59
    TSP!(
        concatcp!("(?P<ts>", RP_DATE_SLASH, " ", RP_TIME, RP_FRACTIONALq, ")"),
        STP_YmdHMSf_SLASH,
        TsConvert::Utc,
        false,
        64,
        &[("2020/03/05 12:17:59", 1583410679000)],
        line!(),
    ),
    // example:
    //     Jan  1 00:00:00
    //     Mar  8 05:33:50
    TSP!(
        concatcp!("(?P<ts>", RP_MONTHb, RP_DAYe, " ", RP_TIME, ")"),
        STP_beHMS,
        TsConvert::UtcYearFill,
        false,
        48,
        &[
            ("Jan  1 00:00:00", 63072000000),
            ("Mar  8 05:33:50", 68880830000),
        ],
        line!(),
    ),
];

lazy_static! {
    /// Compiled regex counterpart to [`TIMESTAMP_PATTERNS`], same order.
    pub static ref TIMESTAMP_PATTERNS_REGEX_VEC: TimestampPatternsRegexVec =
        TIMESTAMP_PATTERNS
            .iter()
            .map(|tsp| {
                Regex::new(tsp.regex_pattern)
                    .unwrap_or_else(|err| {
                        panic!(
                            "bad built-in regex at line {}: {}",
                            tsp._line_num, err
                        )
                    })
            })
            .collect();
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// parsing functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Convert the matched timestamp substring per the pattern's conversion
/// instructions.
fn convert_to_epoch(
    tsp: &TimestampPattern,
    ts_str: &str,
) -> Option<EpochTimeMs> {
    let rewritten: String;
    let ts_: &str = if tsp.comma_fractional {
        // chrono only accepts a dot fractional separator
        rewritten = ts_str.replacen(',', ".", 1);
        rewritten.as_str()
    } else {
        ts_str
    };
    match tsp.convert {
        TsConvert::Rfc3339 => {
            DateTime::parse_from_rfc3339(ts_)
                .ok()
                .map(|dt| dt.timestamp_millis())
        }
        TsConvert::Offset => {
            DateTime::parse_from_str(ts_, tsp.strftime)
                .ok()
                .map(|dt| dt.timestamp_millis())
        }
        TsConvert::Utc => {
            NaiveDateTime::parse_from_str(ts_, tsp.strftime)
                .ok()
                .map(|dt| dt.and_utc().timestamp_millis())
        }
        TsConvert::UtcYearFill => {
            let mut filled = String::with_capacity(YEAR_FALLBACKDUMMY.len() + 1 + ts_.len());
            filled.push_str(YEAR_FALLBACKDUMMY);
            filled.push(' ');
            filled.push_str(ts_);
            NaiveDateTime::parse_from_str(filled.as_str(), tsp.strftime)
                .ok()
                .map(|dt| dt.and_utc().timestamp_millis())
        }
    }
}

/// Attempt one pattern of the registry against `line`.
///
/// Returns the epoch millisecond value and the `(begin, end)` byte span of
/// the timestamp within `line`, else `None`.
pub fn parse_timestamp(
    index: TimestampPatternIndex,
    line: &str,
) -> Option<(EpochTimeMs, usize, usize)> {
    let tsp: &TimestampPattern = &TIMESTAMP_PATTERNS[index];
    let regex_: &Regex = &TIMESTAMP_PATTERNS_REGEX_VEC[index];
    let limit: usize = line.len().min(tsp.range_limit);
    let data: &[u8] = &line.as_bytes()[..limit];
    let captures = regex_.captures(data)?;
    let matched = captures.name("ts")?;
    // `line` is valid UTF-8 and the patterns only match ASCII
    let ts_str: &str = std::str::from_utf8(matched.as_bytes()).ok()?;
    let epoch: EpochTimeMs = convert_to_epoch(tsp, ts_str)?;
    Some((epoch, matched.start(), matched.end()))
}

/// First-fit scan over the registry in declared order; first match wins.
pub fn search_known_patterns(line: &str) -> Option<(TimestampPatternIndex, EpochTimeMs, usize, usize)> {
    for index in 0..TIMESTAMP_PATTERNS_LEN {
        if let Some((epoch, begin, end)) = parse_timestamp(index, line) {
            return Some((index, epoch, begin, end));
        }
    }
    None
}
