//! Codec implementations for strings.
//!
//! A string is a [count + 1](crate::length) byte length followed by that many bytes of UTF-8.
//! `None` and `""` are distinct on the wire (`0x00` and `0x01`), and both survive a round
//! trip.

use crate::{length, util::at_least, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut};

impl Write for str {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        length::write(Some(self.len()), buf);
        buf.put_slice(self.as_bytes());
    }
}

impl EncodeSize for str {
    #[inline]
    fn encode_size(&self) -> usize {
        length::size(Some(self.len())) + self.len()
    }
}

impl Write for String {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        self.as_str().write(buf);
    }
}

impl EncodeSize for String {
    #[inline]
    fn encode_size(&self) -> usize {
        self.as_str().encode_size()
    }
}

impl Read for String {
    type Cfg = RangeCfg;

    /// Reads a string that must be present.
    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, Error> {
        Option::<String>::read_cfg(buf, range)?.ok_or(Error::Invalid("String", "unexpected null"))
    }
}

impl Write for Option<String> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        match self {
            Some(s) => s.write(buf),
            None => length::write(None, buf),
        }
    }
}

impl EncodeSize for Option<String> {
    #[inline]
    fn encode_size(&self) -> usize {
        match self {
            Some(s) => s.encode_size(),
            None => length::size(None),
        }
    }
}

impl Read for Option<String> {
    type Cfg = RangeCfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, Error> {
        let Some(len) = length::read(buf, range)? else {
            return Ok(None);
        };
        at_least(buf, len)?;
        let mut bytes = vec![0; len];
        buf.copy_to_slice(&mut bytes);
        Ok(Some(String::from_utf8(bytes)?))
    }
}
