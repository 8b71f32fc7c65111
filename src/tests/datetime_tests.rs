// src/tests/datetime_tests.rs

//! tests for `datetime.rs`

#![allow(non_snake_case)]

use crate::data::datetime::{
    parse_timestamp,
    search_known_patterns,
    EpochTimeMs,
    TIMESTAMP_PATTERNS,
    TIMESTAMP_PATTERNS_LEN,
    TIMESTAMP_PATTERNS_REGEX_VEC,
};

extern crate test_case;
use test_case::test_case;

/// Every built-in pattern must parse its own hardcoded test cases, and the
/// first-fit search must resolve each case to the declaring pattern (a case
/// resolving to an earlier pattern means the declaration order is wrong).
#[test]
fn test_TIMESTAMP_PATTERNS_builtin() {
    assert_eq!(TIMESTAMP_PATTERNS.len(), TIMESTAMP_PATTERNS_LEN);
    assert_eq!(TIMESTAMP_PATTERNS_REGEX_VEC.len(), TIMESTAMP_PATTERNS_LEN);
    for (index, tsp) in TIMESTAMP_PATTERNS.iter().enumerate() {
        assert!(
            !tsp._test_cases.is_empty(),
            "pattern at line {} has no test cases",
            tsp._line_num
        );
        for (case, epoch_expect) in tsp._test_cases.iter() {
            let result = parse_timestamp(index, case);
            let (epoch, begin, end) = match result {
                Some(found) => found,
                None => panic!(
                    "pattern {} (line {}) failed its own test case {:?}",
                    index, tsp._line_num, case
                ),
            };
            assert_eq!(
                epoch, *epoch_expect,
                "pattern {} (line {}) case {:?}: expected epoch {}, got {}",
                index, tsp._line_num, case, epoch_expect, epoch
            );
            assert_eq!((begin, end), (0, case.len()));
            let (index_s, epoch_s, _, _) = search_known_patterns(case)
                .expect("search_known_patterns found nothing");
            assert_eq!(
                index_s, index,
                "case {:?} resolved to pattern {} not declaring pattern {}",
                case, index_s, index
            );
            assert_eq!(epoch_s, *epoch_expect);
        }
    }
}

#[test_case("2024-01-01 00:00:00", Some(1704067200000); "bare naive")]
#[test_case("2024-01-01 00:00:00 some log text", Some(1704067200000); "naive with trailing text")]
#[test_case("2024-01-01T00:00:01Z trailing", Some(1704067201000); "rfc3339 zulu")]
#[test_case("2015-01-31T15:50:45.392-05:00", Some(1422737445392); "rfc3339 offset fractional")]
#[test_case("2015-01-31 15:50:45,392 INFO starting", Some(1422719445392); "comma fractional")]
#[test_case("2020/03/05 12:17:59 oplock", Some(1583410679000); "slash divider")]
#[test_case("Mar  8 05:33:50 host daemon[1]: hello", Some(68880830000); "syslog year-less")]
#[test_case("no timestamp here", None; "no match")]
#[test_case("", None; "empty line")]
#[test_case("9999-99-99 99:99:99", None; "digits but not a date")]
fn test_search_known_patterns(
    line: &str,
    epoch_expect: Option<EpochTimeMs>,
) {
    let result = search_known_patterns(line);
    match epoch_expect {
        Some(epoch) => {
            let (_index, epoch_, _, _) = result.expect("expected a match");
            assert_eq!(epoch_, epoch);
        }
        None => assert!(result.is_none(), "unexpected match {:?}", result),
    }
}

/// the span must locate the timestamp even when it is not the line prefix
#[test]
fn test_search_known_patterns_span_embedded() {
    let line = "[2024-01-01 00:00:00] message text";
    let (_index, epoch, begin, end) = search_known_patterns(line).unwrap();
    assert_eq!(epoch, 1704067200000);
    assert_eq!(begin, 1);
    assert_eq!(end, 1 + "2024-01-01 00:00:00".len());
    assert_eq!(&line[begin..end], "2024-01-01 00:00:00");
}

/// a zone-bearing timestamp must resolve to a zone-aware pattern, not a
/// zone-less prefix match
#[test]
fn test_search_known_patterns_zone_priority() {
    let (index_z, epoch_z, _, _) =
        search_known_patterns("2024-01-01T06:00:00+06:00").unwrap();
    let (index_n, epoch_n, _, _) = search_known_patterns("2024-01-01T06:00:00").unwrap();
    assert_ne!(index_z, index_n, "zone-aware and zone-less must be distinct patterns");
    assert_eq!(epoch_z, 1704067200000);
    assert_eq!(epoch_n, 1704088800000);
}

/// a wrong pattern index parses nothing and has no side effects
#[test]
fn test_parse_timestamp_wrong_pattern() {
    // pattern 0 is zone-aware rfc3339
    assert!(parse_timestamp(0, "2024-01-01 00:00:00").is_none());
}
