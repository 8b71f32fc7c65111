// src/readers/linereader.rs

//! Implements a [`BufLineReader`], the line source that pulls delimited
//! lines from an underlying byte stream, and [`DelimRead`], the
//! read-to-delimiter contract it satisfies.
//!
//! A [`MessageReader`] drives a `DelimRead` to derive lines, one at a time.
//!
//! [`MessageReader`]: crate::readers::messagereader::MessageReader

use crate::common::{Bytes, ResultRead};

use std::io::{BufRead, Error};

extern crate si_trace_print;
#[allow(unused_imports)]
use si_trace_print::{defn, defo, defx};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// DelimRead
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`DelimRead::try_read_to_delimiter`] result: count of bytes appended,
/// end of source, or a hard error.
pub type ResultReadDelim = ResultRead<usize, Error>;

/// Contract for pulling delimited byte sequences out of a source.
///
/// The stream-backed shape of
/// [`MessageReader`](crate::readers::messagereader::MessageReader)
/// consumes any implementation of this trait.
pub trait DelimRead {
    /// Read bytes up to and including the next `delim` byte, into `out`.
    ///
    /// * `keep_delim` — retain the trailing `delim` byte in `out`.
    /// * `append` — append to `out` instead of replacing its contents.
    ///
    /// Returns `Found(count)` with `count > 0` bytes transferred. When the
    /// source ends before a `delim` is seen, the remaining undelimited
    /// bytes are transferred (`Found`) and the *next* call returns `Done`.
    /// `Done` means no bytes remain. Any other failure is `Err`, surfaced
    /// verbatim.
    fn try_read_to_delimiter(
        &mut self,
        delim: u8,
        keep_delim: bool,
        append: bool,
        out: &mut Bytes,
    ) -> ResultReadDelim;
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BufLineReader
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The standard [`DelimRead`] implementation over any [`BufRead`].
///
/// Blocks exactly as long as the underlying reader blocks; no internal
/// timers or retries.
pub struct BufLineReader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> BufLineReader<R> {
    pub fn new(reader: R) -> BufLineReader<R> {
        BufLineReader { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> DelimRead for BufLineReader<R> {
    fn try_read_to_delimiter(
        &mut self,
        delim: u8,
        keep_delim: bool,
        append: bool,
        out: &mut Bytes,
    ) -> ResultReadDelim {
        if !append {
            out.clear();
        }
        match self.reader.read_until(delim, out) {
            Ok(0) => {
                defo!("read_until returned 0 bytes, Done");
                ResultRead::Done
            }
            Ok(count) => {
                if !keep_delim && out.last() == Some(&delim) {
                    out.pop();
                }
                defo!("read_until returned {} bytes", count);
                ResultRead::Found(count)
            }
            Err(err) => ResultRead::Err(err),
        }
    }
}
