//! Errors raised while decoding a scan log buffer.
use std::str::Utf8Error;

use thiserror::Error;

/// Why a buffer could not be decoded. Every variant aborts the whole decode.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The buffer ends before a fixed-width field or a declared region.
    #[error("truncated at offset {offset}: need {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A length-prefixed string is not valid UTF-8.
    #[error("invalid UTF-8 in {field} at offset {offset}")]
    MalformedText {
        field: &'static str,
        offset: usize,
        #[source]
        source: Utf8Error,
    },

    /// Bytes remain after the last entry but too few to start another one.
    #[error("{remaining} trailing bytes at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },

    /// The revision selector names no known layout.
    #[error("unsupported format revision: {0}")]
    UnsupportedRevision(String),
}

pub type Result<T> = std::result::Result<T, DecodeError>;
