// src/data/mod.rs

//! The `data` module is specialized data containers for the message
//! assembly pipeline.
//!
//! The sub-module [`datetime`] defines the registry of known timestamp
//! formats: regular expressions and conversion instructions for parsing
//! timestamp substrings out of normalized log lines.
//!
//! The sub-module [`message`] defines [`ParsedMessage`], the accumulator
//! for one logical message.
//!
//! ## Definitions of data
//!
//! ### Line
//!
//! A "line" is a sequence of bytes that:
//!
//! * begins after a prior "line" or the beginning of the input.
//! * ends with a newline character `'\n'` or, when the source is being
//!   drained, the end of the input.
//!
//! Lines are owned transiently by the scratch buffer of a
//! [`MessageReader`].
//!
//! ### Message
//!
//! A "message" is a sequence of "lines" that:
//!
//! * has a timestamp on the first "line" (found by a registry pattern), or
//!   is a single "line" with no recognizable timestamp.
//! * continues until the next "line" bearing a timestamp.
//!
//! A "message" is represented by a [`ParsedMessage`] and found by a
//! [`MessageReader`].
//!
//! [`datetime`]: crate::data::datetime
//! [`message`]: crate::data::message
//! [`ParsedMessage`]: crate::data::message::ParsedMessage
//! [`MessageReader`]: crate::readers::messagereader::MessageReader

pub mod datetime;
pub mod message;
