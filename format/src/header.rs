//! The file preamble: magic, version, class table and schema block.

use crate::{schema::ClassDef, Config, Error, Schema};
use bytes::{Buf, BufMut};
use hxs_codec::{length, varint, EncodeSize, Read, Write};
use tracing::{debug, warn};

/// Magic string every file starts with.
pub const MAGIC: &str = "HXS";

/// The only supported format version.
pub const VERSION: u8 = 1;

/// Everything that precedes the root object reference.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    /// Declared classes, in file order.
    pub classes: Vec<ClassDef>,
    /// Schemas, in file order.
    pub schemas: Vec<Schema>,
}

impl Header {
    /// Reads a header, leaving `buf` positioned at the root object reference.
    pub fn read_cfg(buf: &mut impl Buf, cfg: &Config) -> Result<Self, Error> {
        let range = cfg.len_range();

        let magic = Option::<String>::read_cfg(buf, &range)?;
        if magic.as_deref() != Some(MAGIC) {
            return Err(Error::BadMagic(magic));
        }
        let version = u8::read_cfg(buf, &())?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let mut classes = Vec::new();
        while let Some(name) = Option::<String>::read_cfg(buf, &range)? {
            let class = ClassDef::read_record(buf, name)?;
            debug!(class = %class.name, clid = class.clid, "decoded class");
            classes.push(class);
        }

        let size = varint::read(buf)?;
        let size = usize::try_from(size).map_err(|_| hxs_codec::Error::InvalidLength(size.into()))?;
        let start = buf.remaining();
        let mut schemas = Vec::new();
        while start - buf.remaining() < size {
            let schema = Schema::read_cfg(buf, cfg)?;
            debug!(uid = schema.uid, clid = schema.clid, fields = schema.len(), "decoded schema");
            schemas.push(schema);
        }
        let consumed = start - buf.remaining();
        if consumed != size {
            warn!(declared = size, consumed, "schema block length mismatch");
        }

        Ok(Self { classes, schemas })
    }

    fn schema_size(&self) -> usize {
        self.schemas.iter().map(EncodeSize::encode_size).sum()
    }

    /// The schema block size as stored in its VarInt prefix.
    fn schema_size_prefix(&self) -> i32 {
        i32::try_from(self.schema_size()).expect("schema block exceeds i32")
    }
}

impl Write for Header {
    fn write(&self, buf: &mut impl BufMut) {
        MAGIC.write(buf);
        VERSION.write(buf);
        for class in &self.classes {
            class.write(buf);
        }
        length::write(None, buf);
        varint::write(self.schema_size_prefix(), buf);
        for schema in &self.schemas {
            schema.write(buf);
        }
    }
}

impl EncodeSize for Header {
    fn encode_size(&self) -> usize {
        let size = self.schema_size();
        MAGIC.encode_size()
            + VERSION.encode_size()
            + self.classes.iter().map(EncodeSize::encode_size).sum::<usize>()
            + length::size(None)
            + varint::size(self.schema_size_prefix())
            + size
    }
}
