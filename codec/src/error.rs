//! Errors raised while decoding primitive values.

use thiserror::Error;

/// Reasons a buffer could not be decoded.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error("extra data found: {0} bytes")]
    ExtraData(usize),
    #[error("invalid data in {0}: {1}")]
    Invalid(&'static str, &'static str), // context, message
    #[error("invalid length: {0}")]
    InvalidLength(i64),
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid enum: {0}")]
    InvalidEnum(u8),
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("{0} does not fit in {1} bytes")]
    Overflow(i64, usize), // value, width
    #[error("nesting deeper than {0}")]
    DepthExceeded(usize),
}
