//! Codec implementations for raw byte payloads.
//!
//! `Bytes` fields share the framing of strings but carry arbitrary bytes, so no UTF-8 check is
//! made. The null payload (`0x00`) is kept distinct from the empty one (`0x01`).

use crate::{length, util::at_least, EncodeSize, Error, RangeCfg, Read, Write};
use bytes::{Buf, BufMut, Bytes};

impl Write for Option<Bytes> {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        length::write(self.as_ref().map(Bytes::len), buf);
        if let Some(bytes) = self {
            buf.put_slice(bytes);
        }
    }
}

impl EncodeSize for Option<Bytes> {
    #[inline]
    fn encode_size(&self) -> usize {
        let len = self.as_ref().map(Bytes::len);
        length::size(len) + len.unwrap_or(0)
    }
}

impl Read for Option<Bytes> {
    type Cfg = RangeCfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, range: &RangeCfg) -> Result<Self, Error> {
        let Some(len) = length::read(buf, range)? else {
            return Ok(None);
        };
        at_least(buf, len)?;
        Ok(Some(buf.copy_to_bytes(len)))
    }
}
