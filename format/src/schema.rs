//! Class definitions and schemas.

use crate::{Config, PropType};
use bytes::{Buf, BufMut};
use hxs_codec::{length, varint, EncodeSize, Endian, Error, FixedInt, IntCfg, Read, Write};

/// Class identifiers are big-endian, unlike everything around them.
const CLID: IntCfg = IntCfg::new(2, Endian::Big, false);
const CRC32: IntCfg = IntCfg::new(4, Endian::Little, false);

/// A class declared in the file header.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDef {
    pub name: String,
    pub clid: u16,
    pub crc32: u32,
}

impl ClassDef {
    pub fn new(name: impl Into<String>, clid: u16, crc32: u32) -> Self {
        Self {
            name: name.into(),
            clid,
            crc32,
        }
    }

    /// Reads the record that follows a class name in the class table.
    pub(crate) fn read_record(buf: &mut impl Buf, name: String) -> Result<Self, Error> {
        let clid = FixedInt::read_cfg(buf, &CLID)?.value() as u16;
        let crc32 = FixedInt::read_cfg(buf, &CRC32)?.value() as u32;
        Ok(Self { name, clid, crc32 })
    }
}

impl Write for ClassDef {
    fn write(&self, buf: &mut impl BufMut) {
        self.name.write(buf);
        // Both always fit their layouts.
        buf.put_u16(self.clid);
        buf.put_u32_le(self.crc32);
    }
}

impl EncodeSize for ClassDef {
    fn encode_size(&self) -> usize {
        self.name.encode_size() + CLID.width + CRC32.width
    }
}

/// The serialized layout of one class: the name and type of every field, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schema {
    pub uid: i32,
    pub clid: i32,
    /// `None` when the list was stored as absent (count prefix `0`).
    pub names: Option<Vec<String>>,
    /// `None` when the list was stored as absent (count prefix `0`).
    pub types: Option<Vec<PropType>>,
}

impl Schema {
    /// Creates a schema from `(name, type)` pairs.
    pub fn new(uid: i32, clid: i32, fields: Vec<(String, PropType)>) -> Self {
        let (names, types) = fields.into_iter().unzip();
        Self {
            uid,
            clid,
            names: Some(names),
            types: Some(types),
        }
    }

    pub fn field_names(&self) -> &[String] {
        self.names.as_deref().unwrap_or_default()
    }

    pub fn field_types(&self) -> &[PropType] {
        self.types.as_deref().unwrap_or_default()
    }

    /// Iterates over `(name, type)` pairs in field order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &PropType)> {
        self.field_names()
            .iter()
            .map(String::as_str)
            .zip(self.field_types())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.field_names().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the type of the named field.
    pub fn field(&self, name: &str) -> Option<&PropType> {
        self.fields().find(|(n, _)| *n == name).map(|(_, ty)| ty)
    }
}

impl Read for Schema {
    type Cfg = Config;

    fn read_cfg(buf: &mut impl Buf, cfg: &Config) -> Result<Self, Error> {
        let range = cfg.len_range();
        let uid = varint::read(buf)?;
        let clid = varint::read(buf)?;

        let names = match length::read(buf, &range)? {
            None => None,
            Some(count) => {
                let mut names = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    names.push(String::read_cfg(buf, &range)?);
                }
                Some(names)
            }
        };
        let types = match length::read(buf, &range)? {
            None => None,
            Some(count) => {
                let mut types = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    types.push(PropType::read_cfg(buf, cfg)?);
                }
                Some(types)
            }
        };

        let schema = Self {
            uid,
            clid,
            names,
            types,
        };
        if schema.field_names().len() != schema.field_types().len() {
            return Err(Error::Invalid("Schema", "field name and type counts differ"));
        }
        Ok(schema)
    }
}

impl Write for Schema {
    fn write(&self, buf: &mut impl BufMut) {
        varint::write(self.uid, buf);
        varint::write(self.clid, buf);
        length::write(self.names.as_ref().map(Vec::len), buf);
        for name in self.field_names() {
            name.write(buf);
        }
        length::write(self.types.as_ref().map(Vec::len), buf);
        for ty in self.field_types() {
            ty.write(buf);
        }
    }
}

impl EncodeSize for Schema {
    fn encode_size(&self) -> usize {
        varint::size(self.uid)
            + varint::size(self.clid)
            + length::size(self.names.as_ref().map(Vec::len))
            + self.field_names().iter().map(EncodeSize::encode_size).sum::<usize>()
            + length::size(self.types.as_ref().map(Vec::len))
            + self.field_types().iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}
