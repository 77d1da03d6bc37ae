//! Little-endian numbers and single-byte booleans.
//!
//! All multi-byte integers and floats are written little-endian, which is what hxbit uses for
//! every fixed-width value except class identifiers (see [crate::types::fixed] for those).
//!
//! `bool` is a single byte. Any nonzero byte decodes as `true`, but only `0` and `1` are ever
//! written.

use crate::{util::at_least, Error, FixedSize, Read, ReadExt, Write};
use bytes::{Buf, BufMut};
use paste::paste;

// Single-byte integers have no byte order.
macro_rules! impl_byte {
    ($type:ident) => {
        paste! {
            impl Write for $type {
                #[inline]
                fn write(&self, buf: &mut impl BufMut) {
                    buf.[<put_ $type>](*self);
                }
            }

            impl Read for $type {
                type Cfg = ();
                #[inline]
                fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                    at_least(buf, 1)?;
                    Ok(buf.[<get_ $type>]())
                }
            }

            impl FixedSize for $type {
                const SIZE: usize = 1;
            }
        }
    };
}

// Multi-byte numbers are little-endian.
macro_rules! impl_numeric {
    ($type:ident) => {
        paste! {
            impl Write for $type {
                #[inline]
                fn write(&self, buf: &mut impl BufMut) {
                    buf.[<put_ $type _le>](*self);
                }
            }

            impl Read for $type {
                type Cfg = ();
                #[inline]
                fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
                    at_least(buf, std::mem::size_of::<$type>())?;
                    Ok(buf.[<get_ $type _le>]())
                }
            }

            impl FixedSize for $type {
                const SIZE: usize = std::mem::size_of::<$type>();
            }
        }
    };
}

impl_byte!(u8);
impl_byte!(i8);
impl_numeric!(u16);
impl_numeric!(u32);
impl_numeric!(u64);
impl_numeric!(i16);
impl_numeric!(i32);
impl_numeric!(i64);
impl_numeric!(f32);
impl_numeric!(f64);

impl Write for bool {
    #[inline]
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(if *self { 1 } else { 0 });
    }
}

impl Read for bool {
    type Cfg = ();
    #[inline]
    fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
        // nonzero is true
        Ok(u8::read(buf)? != 0)
    }
}

impl FixedSize for bool {
    const SIZE: usize = 1;
}
