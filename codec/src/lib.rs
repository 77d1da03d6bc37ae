//! Primitive encodings of the hxbit (HXS) serialization format.
//!
//! # Overview
//!
//! HXS is the binary format the hxbit serializer uses to persist object graphs. Everything
//! above the byte level (type descriptors, schemas, object references) is built out of a
//! handful of primitives, all of which live here:
//!
//! - [varint]: a signed 32-bit integer stored either as a single byte (`0..0x80`) or as the
//!   marker `0x80` followed by four little-endian bytes.
//! - [length]: the "count + 1" framing used for every collection and string length, which
//!   reserves `0` to mean "absent".
//! - Strings (`Option<String>`): a count + 1 length followed by UTF-8 bytes.
//! - Fixed-width integers with a configurable width, byte order and signedness
//!   ([types::fixed::FixedInt]).
//! - Little-endian `u8`..`u64`, `i8`..`i64`, `f32`, `f64` and single-byte `bool`.
//!
//! Every write produces the single canonical encoding of a value and every read consumes
//! exactly the bytes the format prescribes, failing with [Error::EndOfBuffer] rather than
//! fabricating data when the buffer runs short.
//!
//! # Example
//!
//! ```
//! use bytes::{Buf, BufMut};
//! use hxs_codec::{varint::VarInt, Encode, EncodeSize, Error, Read, ReadExt, Write};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Entry {
//!     id: VarInt,
//!     label: Option<String>,
//!     weight: f64,
//! }
//!
//! impl Write for Entry {
//!     fn write(&self, buf: &mut impl BufMut) {
//!         self.id.write(buf);
//!         self.label.write(buf);
//!         self.weight.write(buf);
//!     }
//! }
//!
//! impl Read for Entry {
//!     type Cfg = ();
//!
//!     fn read_cfg(buf: &mut impl Buf, _: &()) -> Result<Self, Error> {
//!         let id = VarInt::read(buf)?;
//!         let label = Option::<String>::read_cfg(buf, &(..).into())?;
//!         let weight = f64::read(buf)?;
//!         Ok(Self { id, label, weight })
//!     }
//! }
//!
//! impl EncodeSize for Entry {
//!     fn encode_size(&self) -> usize {
//!         self.id.encode_size() + self.label.encode_size() + self.weight.encode_size()
//!     }
//! }
//!
//! let entry = Entry { id: VarInt(300), label: Some("hero".into()), weight: 0.5 };
//! let encoded = entry.encode();
//! assert_eq!(encoded.len(), 5 + 5 + 8);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod length;
pub mod types;
pub mod util;
pub mod varint;

// Commonly used items at the crate root.
pub use codec::{Decode, DecodeExt, Encode, EncodeSize, FixedSize, Read, ReadExt, Write};
pub use config::RangeCfg;
pub use error::Error;
pub use types::{
    fixed::{Endian, FixedInt, IntCfg},
    primitives,
};
