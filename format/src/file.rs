//! Whole-file decode and encode.

use crate::{
    graph::{Reader, Writer},
    ClassDef, Config, Error, Header, Links, Obj, ObjId, Objects, Schema,
};
use bytes::{Buf, BufMut, BytesMut};
use hxs_codec::{EncodeSize, Write};
use tracing::debug;

/// A decoded HXS file: its header and the object graph under the root reference.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct File {
    pub header: Header,
    pub objects: Objects,
    /// The root object, or `None` for a null root reference.
    pub root: Option<ObjId>,
}

impl File {
    pub fn new(header: Header, objects: Objects, root: Option<ObjId>) -> Self {
        Self {
            header,
            objects,
            root,
        }
    }

    /// Decodes a file with the default [Config].
    pub fn decode(buf: impl Buf) -> Result<Self, Error> {
        Self::decode_cfg(buf, &Config::default())
    }

    /// Decodes a file, failing if any bytes follow the root object.
    pub fn decode_cfg(mut buf: impl Buf, cfg: &Config) -> Result<Self, Error> {
        let header = Header::read_cfg(&mut buf, cfg)?;
        let links = Links::build(&header.classes, &header.schemas);

        let mut reader = Reader::new(&header, &links, cfg);
        let root = reader.read_root(&mut buf)?;
        let objects = reader.finish();

        let remaining = buf.remaining();
        if remaining > 0 {
            return Err(hxs_codec::Error::ExtraData(remaining).into());
        }
        debug!(
            classes = header.classes.len(),
            schemas = header.schemas.len(),
            objects = objects.len(),
            "decoded file"
        );
        Ok(Self {
            header,
            objects,
            root,
        })
    }

    /// Encodes the file.
    ///
    /// Object data is encoded first, into a scratch buffer, and then appended to the header.
    pub fn encode(&self) -> Result<BytesMut, Error> {
        let mut body = BytesMut::new();
        Writer::new(&self.header, &self.objects).write_root(&mut body, self.root)?;

        let mut buf = BytesMut::with_capacity(self.header.encode_size() + body.len());
        self.header.write(&mut buf);
        buf.put(body);
        Ok(buf)
    }

    /// Links classes to schemas.
    pub fn links(&self) -> Links {
        Links::build(&self.header.classes, &self.header.schemas)
    }

    /// Returns the root object.
    pub fn root(&self) -> Option<&Obj> {
        self.root.and_then(|id| self.objects.get(id))
    }

    pub fn object(&self, id: ObjId) -> Option<&Obj> {
        self.objects.get(id)
    }

    pub fn class(&self, index: usize) -> Option<&ClassDef> {
        self.header.classes.get(index)
    }

    /// Returns the schema of the named class.
    pub fn schema_for_class(&self, name: &str) -> Option<&Schema> {
        self.links()
            .schema_for_name(name)
            .and_then(|i| self.header.schemas.get(i))
    }

    /// Returns the class an object is an instance of.
    pub fn class_of(&self, obj: &Obj) -> Option<&ClassDef> {
        self.links()
            .class_for_schema(obj.schema)
            .and_then(|i| self.class(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropType, Value};

    /// Class `A` (clid 1), one empty schema, root uid 1.
    const MINIMAL: &[u8] = &[
        0x04, b'H', b'X', b'S', 0x01, // magic, version
        0x02, b'A', 0x00, 0x01, 0x78, 0x56, 0x34, 0x12, // class A
        0x00, // end of classes
        0x04, 0x01, 0x01, 0x01, 0x01, // schema block
        0x01, // root
    ];

    #[test]
    fn test_minimal() {
        let file = File::decode(MINIMAL).unwrap();
        assert_eq!(file.header.classes, [ClassDef::new("A", 1, 0x12345678)]);
        assert_eq!(file.objects.len(), 1);
        let root = file.root().unwrap();
        assert!(root.fields.is_empty());
        assert_eq!(root.uid, 1);
        assert_eq!(file.class_of(root).unwrap().name, "A");
        assert_eq!(file.encode().unwrap(), MINIMAL);
    }

    #[test]
    fn test_null_root() {
        let mut bytes = MINIMAL.to_vec();
        *bytes.last_mut().unwrap() = 0x00;
        let file = File::decode(&bytes[..]).unwrap();
        assert!(file.root().is_none());
        assert!(file.objects.is_empty());
        assert_eq!(file.encode().unwrap(), &bytes[..]);
    }

    #[test]
    fn test_trailing_bytes() {
        let mut bytes = MINIMAL.to_vec();
        bytes.push(0x00);
        assert!(matches!(
            File::decode(&bytes[..]),
            Err(Error::Codec(hxs_codec::Error::ExtraData(1)))
        ));
    }

    #[test]
    fn test_truncated() {
        for len in 0..MINIMAL.len() {
            assert!(File::decode(&MINIMAL[..len]).is_err(), "decoded {len} bytes");
        }
    }

    #[test]
    fn test_introspection() {
        let header = Header {
            classes: vec![ClassDef::new("A", 1, 0), ClassDef::new("B", 2, 0)],
            schemas: vec![
                Schema::new(1, 1, vec![("b".into(), PropType::Serializable("B".into()))]),
                Schema::new(2, 2, vec![("n".into(), PropType::Int)]),
            ],
        };
        let mut objects = Objects::default();
        let b = objects.insert(1, vec![("n".into(), Value::Int(3))]);
        let a = objects.insert(0, vec![("b".into(), Value::Ref(b))]);
        let file = File::new(header, objects, Some(a));

        assert!(file.links().is_paired());
        assert_eq!(file.schema_for_class("B").unwrap().uid, 2);
        assert!(file.schema_for_class("C").is_none());
        assert_eq!(file.class(1).unwrap().name, "B");
        let b = file.root().unwrap().get("b").unwrap().as_obj().unwrap();
        assert_eq!(file.object(b).unwrap().get("n"), Some(&Value::Int(3)));

        let decoded = File::decode(file.encode().unwrap()).unwrap();
        let b = decoded.root().unwrap().get("b").unwrap().as_obj().unwrap();
        assert_eq!(decoded.object(b).unwrap().get("n"), Some(&Value::Int(3)));
    }
}
