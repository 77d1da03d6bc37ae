//! Count + 1 framing.
//!
//! Every string and collection length in the format is stored as a [varint](crate::varint)
//! holding `count + 1`, so that `0` can stand for an absent (null) value. An empty string or
//! collection is therefore `1`, never `0`.

use crate::{varint, Error, RangeCfg};
use bytes::{Buf, BufMut};

/// Reads a count + 1 prefix, returning `None` for an absent value.
///
/// The count must fall within `range`; negative prefixes are always rejected.
pub fn read(buf: &mut impl Buf, range: &RangeCfg) -> Result<Option<usize>, Error> {
    let prefix = varint::read(buf)?;
    if prefix == 0 {
        return Ok(None);
    }
    if prefix < 0 {
        return Err(Error::InvalidLength(prefix as i64));
    }
    let count = (prefix - 1) as usize;
    if !range.contains(count) {
        return Err(Error::InvalidLength(count as i64));
    }
    Ok(Some(count))
}

/// Writes a count + 1 prefix (`0` for an absent value).
///
/// Panics if the count does not fit in the format's signed 32-bit varint.
pub fn write(count: Option<usize>, buf: &mut impl BufMut) {
    varint::write(prefix(count), buf);
}

/// Calculates the number of bytes needed to encode a count + 1 prefix.
pub fn size(count: Option<usize>) -> usize {
    varint::size(prefix(count))
}

fn prefix(count: Option<usize>) -> i32 {
    match count {
        None => 0,
        Some(count) => i32::try_from(count)
            .ok()
            .and_then(|count| count.checked_add(1))
            .expect("count exceeds i32"),
    }
}
