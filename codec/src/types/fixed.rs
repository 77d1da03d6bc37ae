//! Fixed-width integers with a configurable width, byte order and signedness.
//!
//! Most of the format is little-endian, but a few header fields are not: class identifiers
//! are big-endian `u16`s sitting next to little-endian `u32` checksums. [FixedInt] reads and
//! writes any such field given an [IntCfg].

use crate::{util::at_least, EncodeSize, Error, Read, Write};
use bytes::{Buf, BufMut};

/// Byte order of a fixed-width integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endian {
    Little,
    Big,
}

/// Layout of a fixed-width integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct IntCfg {
    /// Width in bytes (`1..=8`).
    pub width: usize,
    pub endian: Endian,
    pub signed: bool,
}

impl IntCfg {
    /// Creates a new layout.
    ///
    /// Panics if `width` is not in `1..=8`.
    pub const fn new(width: usize, endian: Endian, signed: bool) -> Self {
        assert!(width >= 1 && width <= 8, "width must be in 1..=8");
        Self {
            width,
            endian,
            signed,
        }
    }

    /// Returns true if `value` is representable with this layout.
    pub fn fits(&self, value: i64) -> bool {
        let bits = (self.width * 8) as u32;
        match (self.signed, bits) {
            (_, 64) => self.signed || value >= 0,
            (true, bits) => {
                let max = (1i64 << (bits - 1)) - 1;
                (-max - 1..=max).contains(&value)
            }
            (false, bits) => (0..1i64 << bits).contains(&value),
        }
    }
}

/// An integer together with the layout it is stored with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FixedInt {
    value: i64,
    cfg: IntCfg,
}

impl FixedInt {
    /// Creates a new integer, failing if `value` does not fit the layout.
    pub fn new(value: i64, cfg: IntCfg) -> Result<Self, Error> {
        if !cfg.fits(value) {
            return Err(Error::Overflow(value, cfg.width));
        }
        Ok(Self { value, cfg })
    }

    /// The integer value.
    pub fn value(&self) -> i64 {
        self.value
    }

    /// The layout the integer is stored with.
    pub fn cfg(&self) -> IntCfg {
        self.cfg
    }
}

impl Write for FixedInt {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        let IntCfg {
            width,
            endian,
            signed,
        } = self.cfg;
        match (endian, signed) {
            (Endian::Little, true) => buf.put_int_le(self.value, width),
            (Endian::Big, true) => buf.put_int(self.value, width),
            (Endian::Little, false) => buf.put_uint_le(self.value as u64, width),
            (Endian::Big, false) => buf.put_uint(self.value as u64, width),
        }
    }
}

impl EncodeSize for FixedInt {
    #[inline]
    fn encode_size(&self) -> usize {
        self.cfg.width
    }
}

impl Read for FixedInt {
    type Cfg = IntCfg;

    #[inline]
    fn read_cfg(buf: &mut impl Buf, cfg: &IntCfg) -> Result<Self, Error> {
        at_least(buf, cfg.width)?;
        let value = match (cfg.endian, cfg.signed) {
            (Endian::Little, true) => buf.get_int_le(cfg.width),
            (Endian::Big, true) => buf.get_int(cfg.width),
            (Endian::Little, false) => buf.get_uint_le(cfg.width) as i64,
            (Endian::Big, false) => buf.get_uint(cfg.width) as i64,
        };

        // A full-width unsigned value may not fit in an i64.
        if !cfg.fits(value) {
            return Err(Error::Overflow(value, cfg.width));
        }
        Ok(Self { value, cfg: *cfg })
    }
}
