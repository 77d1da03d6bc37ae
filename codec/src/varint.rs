//! Variable-length integer encoding and decoding
//!
//! hxbit stores every integer that is likely to be small (lengths, identifiers, plain `Int`
//! fields) in one of exactly two forms:
//! - a single byte holding the value, if the value is in `0..0x80`
//! - the marker byte `0x80` followed by the value as a signed 32-bit little-endian integer
//!
//! No other encoding is legal: single bytes above the marker are rejected, as is the long form
//! of a value that fits in a single byte. This keeps every value's encoding unique, which the
//! byte-exact round trip of whole files depends on.

use crate::{util::at_least, EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut};

/// Marker byte introducing the 5-byte form.
pub const MARKER: u8 = 0x80;

/// Length of the 5-byte form.
const LONG_SIZE: usize = 5;

/// Returns true if the value is written in the single-byte form.
#[inline]
fn is_short(value: i32) -> bool {
    (0..MARKER as i32).contains(&value)
}

/// Encodes a signed 32-bit integer as a varint.
pub fn write(value: i32, buf: &mut impl BufMut) {
    if is_short(value) {
        buf.put_u8(value as u8);
        return;
    }
    buf.put_u8(MARKER);
    buf.put_i32_le(value);
}

/// Decodes a signed 32-bit integer from a varint.
pub fn read(buf: &mut impl Buf) -> Result<i32, Error> {
    at_least(buf, 1)?;
    let tag = buf.get_u8();
    match tag {
        MARKER => {
            at_least(buf, LONG_SIZE - 1)?;
            let value = buf.get_i32_le();

            // The long form of a short value would not survive re-encoding.
            if is_short(value) {
                return Err(Error::InvalidVarint);
            }
            Ok(value)
        }
        tag if tag < MARKER => Ok(tag as i32),
        _ => Err(Error::InvalidVarint),
    }
}

/// Calculates the number of bytes needed to encode an integer as a varint.
#[inline]
pub fn size(value: i32) -> usize {
    if is_short(value) {
        1
    } else {
        LONG_SIZE
    }
}

/// An ergonomic wrapper to allow for encoding and decoding of an `i32` as a varint rather than
/// the default fixed-width integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VarInt(pub i32);

impl VarInt {
    /// Reads a varint from the buffer and returns it as a plain `i32`.
    pub fn read_into(buf: &mut impl Buf) -> Result<i32, Error> {
        read(buf)
    }
}

impl From<i32> for VarInt {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl From<VarInt> for i32 {
    fn from(value: VarInt) -> Self {
        value.0
    }
}

impl Write for VarInt {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        write(self.0, buf);
    }
}

impl Read for VarInt {
    type Cfg = ();

    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        read(buf).map(VarInt)
    }
}

impl EncodeSize for VarInt {
    #[inline]
    fn encode_size(&self) -> usize {
        size(self.0)
    }
}
