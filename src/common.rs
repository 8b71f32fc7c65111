// src/common.rs

//! Common type aliases and result enums for _logpress_.

/// A general-purpose counting type, typically used for internal statistics
/// counting.
pub type Count = u64;

/// A [`Vec`](std::vec::Vec) of `u8`.
pub type Bytes = Vec<u8>;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Lines and line delimiters
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// *N*ew*L*ine as a [`char`].
#[allow(non_upper_case_globals)]
pub const NLc: char = '\n';
/// *N*ew*L*ine as a [`str`].
#[allow(non_upper_case_globals)]
pub const NLs: &str = "\n";
/// Single-byte *N*ew*L*ine `char` as [`u8`].
#[allow(non_upper_case_globals)]
pub const NLu8: u8 = 10;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// custom Result enum for the *Reader functions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// [`Result`]-like result extended to 3 types, for "read" functions where
/// running out of input is an ordinary outcome, not an error.
///
/// [`Result`]: std::result::Result
#[derive(Debug)]
pub enum ResultRead<T, E> {
    /// Contains the read data.
    Found(T),
    /// The source is exhausted; a request reached the end of the input.
    ///
    /// Does not imply an error occurred.
    Done,
    /// Something bad happened. Contains the `E` error data.
    Err(E),
}

impl<T, E> ResultRead<T, E> {
    /// Returns `true` if the result is [`Found`] or [`Done`].
    ///
    /// [`Found`]: self::ResultRead#variant.Found
    /// [`Done`]: self::ResultRead#variant.Done
    #[allow(dead_code)]
    #[inline(always)]
    pub const fn is_ok(&self) -> bool {
        matches!(*self, ResultRead::Found(_) | ResultRead::Done)
    }

    /// Returns `true` if the result is [`Found`].
    ///
    /// [`Found`]: self::ResultRead#variant.Found
    #[inline(always)]
    pub const fn is_found(&self) -> bool {
        matches!(*self, ResultRead::Found(_))
    }

    /// Returns `true` if the result is [`Err`].
    ///
    /// [`Err`]: self::ResultRead#variant.Err
    #[allow(dead_code)]
    #[inline(always)]
    pub const fn is_err(&self) -> bool {
        matches!(*self, ResultRead::Err(_))
    }

    /// Returns `true` if the result is [`Done`].
    ///
    /// [`Done`]: self::ResultRead#variant.Done
    #[inline(always)]
    pub const fn is_done(&self) -> bool {
        matches!(*self, ResultRead::Done)
    }

    /// Converts from `ResultRead<T, E>` to [`Option<T>`],
    /// consuming `self` and discarding the error, if any.
    #[allow(dead_code)]
    #[inline(always)]
    pub fn ok(self) -> Option<T> {
        match self {
            ResultRead::Found(x) => Some(x),
            ResultRead::Done => None,
            ResultRead::Err(_) => None,
        }
    }
}

impl<T, E> std::fmt::Display for ResultRead<T, E>
where
    E: std::fmt::Display,
{
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            ResultRead::Found(_) => {
                write!(f, "ResultRead::Found")
            }
            ResultRead::Done => {
                write!(f, "ResultRead::Done")
            }
            ResultRead::Err(err) => {
                write!(f, "ResultRead::Err({})", err)
            }
        }
    }
}
