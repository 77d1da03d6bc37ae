//! Encoding and decoding traits.
//!
//! Decoding is split in two: [Read] pulls one value off the front of a buffer, and [Decode]
//! additionally requires that nothing is left over. Lengths and nesting limits that depend on
//! the caller (rather than on the format) are passed in through [Read::Cfg].

use crate::error::Error;
use bytes::{Buf, BufMut, BytesMut};

/// A value that can be written to a buffer.
pub trait Write {
    /// Appends the value's encoding to `buf`.
    ///
    /// May panic if `buf` cannot grow to hold the encoding.
    fn write(&self, buf: &mut impl BufMut);
}

/// A value that knows how many bytes [Write::write] will produce for it.
pub trait EncodeSize {
    /// Number of bytes in the encoding. Must agree exactly with [Write::write].
    fn encode_size(&self) -> usize;
}

/// A value whose encoding always has the same length.
pub trait FixedSize {
    /// Number of bytes in the encoding.
    const SIZE: usize;
}

impl<T: FixedSize> EncodeSize for T {
    #[inline]
    fn encode_size(&self) -> usize {
        T::SIZE
    }
}

/// A value that can be read from the front of a buffer.
///
/// `Cfg` carries whatever the decoder needs beyond the bytes themselves, usually bounds on
/// attacker-controlled lengths. Types that need nothing use `()`.
pub trait Read: Sized {
    /// Decoder configuration.
    type Cfg;

    /// Reads one value, advancing `buf` past it.
    fn read_cfg(buf: &mut impl Buf, cfg: &Self::Cfg) -> Result<Self, Error>;
}

/// Shorthand for encoding a value into a fresh buffer.
pub trait Encode: Write + EncodeSize {
    /// Encodes the value into a buffer of exactly [EncodeSize::encode_size] bytes.
    ///
    /// Panics if [Write::write] and [EncodeSize::encode_size] disagree.
    fn encode(&self) -> BytesMut {
        let len = self.encode_size();
        let mut buf = BytesMut::with_capacity(len);
        self.write(&mut buf);
        assert_eq!(buf.len(), len, "encode_size() disagrees with write()");
        buf
    }
}

impl<T: Write + EncodeSize> Encode for T {}

/// Reads a value that must span the whole buffer.
pub trait Decode: Read {
    /// Reads one value and fails with [Error::ExtraData] if any bytes remain.
    fn decode_cfg(mut buf: impl Buf, cfg: &Self::Cfg) -> Result<Self, Error> {
        let value = Self::read_cfg(&mut buf, cfg)?;
        match buf.remaining() {
            0 => Ok(value),
            extra => Err(Error::ExtraData(extra)),
        }
    }
}

impl<T: Read> Decode for T {}

/// [Read] without a configuration.
pub trait ReadExt: Read<Cfg = ()> {
    fn read(buf: &mut impl Buf) -> Result<Self, Error> {
        Self::read_cfg(buf, &())
    }
}

impl<T: Read<Cfg = ()>> ReadExt for T {}

/// [Decode] without a configuration.
pub trait DecodeExt: Decode<Cfg = ()> {
    fn decode(buf: impl Buf) -> Result<Self, Error> {
        Self::decode_cfg(buf, &())
    }
}

impl<T: Decode<Cfg = ()>> DecodeExt for T {}
