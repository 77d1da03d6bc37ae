//! Schema-driven value codec and object identity tables.
//!
//! A [Reader] decodes field values by walking their [PropType]s, materializing every
//! serializable object into an [Objects] arena. Objects are registered under their uid before
//! their fields are read, so a reference back to an object that is still being decoded
//! resolves to the arena slot instead of recursing.
//!
//! A [Writer] does the inverse. The first time an object is reached it is assigned a uid and
//! its fields follow; every later reference writes the uid alone.

use crate::{Config, Error, Field, Header, Links, Obj, ObjDef, ObjId, Objects, PropType, Value};
use bytes::{Buf, BufMut, Bytes};
use hxs_codec::{length, varint, Read, ReadExt, Write};
use std::collections::{HashMap, HashSet};
use tracing::trace;

/// Width of an inline object's presence bitmap.
const BITMAP_WIDTH: usize = 32;

/// Decodes the object graph that follows a [Header].
pub(crate) struct Reader<'a> {
    header: &'a Header,
    links: &'a Links,
    cfg: &'a Config,
    objects: Objects,
    uids: HashMap<i32, ObjId>,
}

impl<'a> Reader<'a> {
    pub fn new(header: &'a Header, links: &'a Links, cfg: &'a Config) -> Self {
        Self {
            header,
            links,
            cfg,
            objects: Objects::default(),
            uids: HashMap::new(),
        }
    }

    /// Reads the root reference. The root is an instance of the first class.
    pub fn read_root(&mut self, buf: &mut impl Buf) -> Result<Option<ObjId>, Error> {
        let schema = (!self.header.schemas.is_empty()).then_some(0);
        self.read_ref(buf, schema, "<root>", 0)
    }

    /// Consumes the reader, returning every decoded object.
    pub fn finish(self) -> Objects {
        self.objects
    }

    fn read_ref(
        &mut self,
        buf: &mut impl Buf,
        schema: Option<usize>,
        class: &str,
        depth: usize,
    ) -> Result<Option<ObjId>, Error> {
        let uid = varint::read(buf)?;
        if uid == 0 {
            return Ok(None);
        }
        if let Some(&id) = self.uids.get(&uid) {
            trace!(uid, "existing object");
            return Ok(Some(id));
        }

        let schema_index = schema.ok_or_else(|| Error::UnknownClass(class.to_string()))?;
        let header = self.header;
        let schema = header
            .schemas
            .get(schema_index)
            .ok_or(Error::UnknownSchema(schema_index))?;
        trace!(uid, class, remaining = buf.remaining(), "decoding object");

        // Register before reading fields so that cycles resolve to this slot.
        let id = self.objects.push(Obj {
            schema: schema_index,
            uid,
            fields: Vec::new(),
        });
        self.uids.insert(uid, id);

        let mut fields = Vec::with_capacity(schema.len());
        for (name, ty) in schema.fields() {
            let value = self.read_value(buf, ty, depth + 1)?;
            fields.push((name.to_string(), value));
        }
        if let Some(obj) = self.objects.get_mut(id) {
            obj.fields = fields;
        }
        Ok(Some(id))
    }

    fn read_value(&mut self, buf: &mut impl Buf, ty: &PropType, depth: usize) -> Result<Value, Error> {
        if depth > self.cfg.max_depth {
            return Err(hxs_codec::Error::DepthExceeded(self.cfg.max_depth).into());
        }
        let range = self.cfg.len_range();

        // Untyped values are stored as strings.
        let Some(kind) = ty.kind() else {
            return Ok(Option::<String>::read_cfg(buf, &range)?.map_or(Value::Null, Value::String));
        };
        if !kind.has_values() {
            return Err(Error::UnsupportedValue(kind));
        }
        trace!(%kind, depth, remaining = buf.remaining(), "decoding value");

        let depth = depth + 1;
        Ok(match ty {
            PropType::Int | PropType::Flags(_) => Value::Int(varint::read(buf)?),
            PropType::Float => Value::Float(f64::read(buf)?),
            PropType::Bool => Value::Bool(bool::read(buf)?),
            PropType::Int64 => Value::Int64(i64::read(buf)?),
            PropType::String => {
                Option::<String>::read_cfg(buf, &range)?.map_or(Value::Null, Value::String)
            }
            PropType::Bytes => {
                Option::<Bytes>::read_cfg(buf, &range)?.map_or(Value::Null, Value::Bytes)
            }
            PropType::Array(inner) => match length::read(buf, &range)? {
                None => Value::Null,
                Some(count) => {
                    let mut items = Vec::with_capacity(count.min(buf.remaining()));
                    for _ in 0..count {
                        items.push(self.read_value(buf, inner, depth)?);
                    }
                    Value::Array(items)
                }
            },
            PropType::Map(key, value) => match length::read(buf, &range)? {
                None => Value::Null,
                Some(count) => {
                    let mut entries = Vec::with_capacity(count.min(buf.remaining()));
                    for _ in 0..count {
                        let k = self.read_value(buf, key, depth)?;
                        let v = self.read_value(buf, value, depth)?;
                        entries.push((k, v));
                    }
                    Value::Map(entries)
                }
            },
            PropType::Serializable(name) => {
                let schema = self.links.schema_for_name(name);
                self.read_ref(buf, schema, name, depth)?
                    .map_or(Value::Null, Value::Ref)
            }
            PropType::Enum(name) => Value::Enum {
                name: name.clone(),
                index: varint::read(buf)?,
            },
            PropType::Null(inner) => {
                if u8::read(buf)? == 0 {
                    Value::Null
                } else {
                    present(self.read_value(buf, inner, depth)?, "Null")?
                }
            }
            PropType::Alias(inner) => self.read_value(buf, inner, depth)?,
            PropType::Obj(def) => self.read_inline(buf, def, depth)?,
            _ => return Err(Error::UnsupportedValue(kind)),
        })
    }

    fn read_inline(&mut self, buf: &mut impl Buf, def: &ObjDef, depth: usize) -> Result<Value, Error> {
        let bits = varint::read(buf)?;
        if bits == 0 {
            return Ok(Value::Null);
        }
        let mut bits = bits.wrapping_sub(1) as u32;

        let mut fields = Vec::with_capacity(def.fields().len());
        for field in def.fields() {
            let marked = if field.is_nullable() {
                let marked = bits & 1 != 0;
                bits >>= 1;
                marked
            } else {
                true
            };
            let value = if marked {
                let ty = field.ty.as_ref().unwrap_or(&PropType::Untyped);
                let value = self.read_value(buf, ty, depth)?;
                if field.is_nullable() {
                    present(value, "Obj")?
                } else {
                    value
                }
            } else {
                Value::Null
            };
            fields.push(Field {
                name: field.name.clone(),
                value,
            });
        }
        if bits != 0 {
            let err = hxs_codec::Error::Invalid("Obj", "presence bit set for no field");
            return Err(err.into());
        }
        Ok(Value::Obj(fields))
    }
}

/// Encodes an object graph.
///
/// Objects keep the uid they were decoded with unless another object already claimed it.
/// Objects without one (built in memory) are numbered from 1 in encounter order.
pub(crate) struct Writer<'a> {
    header: &'a Header,
    objects: &'a Objects,
    uids: HashMap<ObjId, i32>,
    used: HashSet<i32>,
    next_uid: i32,
}

impl<'a> Writer<'a> {
    pub fn new(header: &'a Header, objects: &'a Objects) -> Self {
        Self {
            header,
            objects,
            uids: HashMap::new(),
            used: HashSet::new(),
            next_uid: 1,
        }
    }

    pub fn write_root(&mut self, buf: &mut impl BufMut, root: Option<ObjId>) -> Result<(), Error> {
        self.write_ref(buf, root)
    }

    fn assign(&mut self, id: ObjId, obj: &Obj) -> Result<i32, Error> {
        let uid = if obj.uid > 0 && self.used.insert(obj.uid) {
            obj.uid
        } else {
            loop {
                let uid = self.next_uid;
                self.next_uid = uid.checked_add(1).ok_or(Error::UidOverflow)?;
                if self.used.insert(uid) {
                    break uid;
                }
            }
        };
        self.uids.insert(id, uid);
        Ok(uid)
    }

    fn write_ref(&mut self, buf: &mut impl BufMut, id: Option<ObjId>) -> Result<(), Error> {
        let Some(id) = id else {
            varint::write(0, buf);
            return Ok(());
        };
        if let Some(&uid) = self.uids.get(&id) {
            varint::write(uid, buf);
            return Ok(());
        }

        let objects = self.objects;
        let header = self.header;
        let obj = objects.get(id).ok_or(Error::DanglingRef(id.index()))?;
        let schema = header
            .schemas
            .get(obj.schema)
            .ok_or(Error::UnknownSchema(obj.schema))?;
        let uid = self.assign(id, obj)?;
        varint::write(uid, buf);

        for (name, ty) in schema.fields() {
            let value = obj.get(name).unwrap_or(&Value::Null);
            self.write_value(buf, ty, value)?;
        }
        Ok(())
    }

    fn write_value(&mut self, buf: &mut impl BufMut, ty: &PropType, value: &Value) -> Result<(), Error> {
        let Some(kind) = ty.kind() else {
            return match value {
                Value::String(s) => {
                    s.write(buf);
                    Ok(())
                }
                Value::Null => {
                    length::write(None, buf);
                    Ok(())
                }
                other => Err(mismatch(ty, other)),
            };
        };
        if !kind.has_values() {
            return Err(Error::UnsupportedValue(kind));
        }

        match (ty, value) {
            (PropType::Int | PropType::Flags(_), Value::Int(v)) => varint::write(*v, buf),
            (PropType::Float, Value::Float(v)) => v.write(buf),
            (PropType::Bool, Value::Bool(v)) => v.write(buf),
            (PropType::Int64, Value::Int64(v)) => v.write(buf),
            (PropType::String, Value::String(s)) => s.write(buf),
            (PropType::Bytes, Value::Bytes(b)) => {
                length::write(Some(b.len()), buf);
                buf.put_slice(b);
            }
            (
                PropType::String | PropType::Bytes | PropType::Array(_) | PropType::Map(..),
                Value::Null,
            ) => length::write(None, buf),
            (PropType::Array(inner), Value::Array(items)) => {
                length::write(Some(items.len()), buf);
                for item in items {
                    self.write_value(buf, inner, item)?;
                }
            }
            (PropType::Map(key, value), Value::Map(entries)) => {
                length::write(Some(entries.len()), buf);
                for (k, v) in entries {
                    self.write_value(buf, key, k)?;
                    self.write_value(buf, value, v)?;
                }
            }
            (PropType::Serializable(_), Value::Null) => self.write_ref(buf, None)?,
            (PropType::Serializable(_), Value::Ref(id)) => self.write_ref(buf, Some(*id))?,
            (PropType::Enum(_), Value::Enum { index, .. }) => varint::write(*index, buf),
            (PropType::Null(_), Value::Null) => buf.put_u8(0),
            (PropType::Null(inner), value) => {
                buf.put_u8(1);
                self.write_value(buf, inner, value)?;
            }
            (PropType::Alias(inner), value) => self.write_value(buf, inner, value)?,
            (PropType::Obj(_), Value::Null) => varint::write(0, buf),
            (PropType::Obj(def), Value::Obj(fields)) => self.write_inline(buf, def, fields)?,
            (ty, value) => return Err(mismatch(ty, value)),
        }
        Ok(())
    }

    fn write_inline(&mut self, buf: &mut impl BufMut, def: &ObjDef, fields: &[Field]) -> Result<(), Error> {
        let declared = def.fields();
        if declared.len() != fields.len() {
            return Err(Error::FieldCount {
                expected: declared.len(),
                found: fields.len(),
            });
        }
        let nullable = declared.iter().filter(|f| f.is_nullable()).count();
        if nullable > BITMAP_WIDTH {
            return Err(Error::TooManyNullableFields(nullable));
        }

        let mut bits = 0u32;
        let mut bit = 0;
        for (decl, field) in declared.iter().zip(fields) {
            if decl.is_nullable() {
                if !field.value.is_null() {
                    bits |= 1 << bit;
                }
                bit += 1;
            }
        }
        // A full bitmap plus one would read back as an absent object.
        if bits == u32::MAX {
            return Err(Error::TooManyNullableFields(nullable));
        }
        varint::write((bits as i32).wrapping_add(1), buf);

        for (decl, field) in declared.iter().zip(fields) {
            if decl.is_nullable() && field.value.is_null() {
                continue;
            }
            let ty = decl.ty.as_ref().unwrap_or(&PropType::Untyped);
            self.write_value(buf, ty, &field.value)?;
        }
        Ok(())
    }
}

/// Rejects a null decoded where a presence flag promised a value, since it could not be
/// written back with the flag set.
fn present(value: Value, context: &'static str) -> Result<Value, Error> {
    if value.is_null() {
        return Err(hxs_codec::Error::Invalid(context, "value marked present is null").into());
    }
    Ok(value)
}

fn mismatch(ty: &PropType, value: &Value) -> Error {
    Error::TypeMismatch {
        expected: ty.to_string(),
        found: value.kind_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClassDef, Kind, ObjField, Schema};
    use bytes::BytesMut;
    use test_case::test_case;

    fn header(fields: Vec<(String, PropType)>) -> Header {
        Header {
            classes: vec![ClassDef::new("A", 1, 0)],
            schemas: vec![Schema::new(1, 1, fields)],
        }
    }

    fn decode(header: &Header, bytes: &[u8]) -> Result<(Option<ObjId>, Objects), Error> {
        let links = Links::build(&header.classes, &header.schemas);
        let cfg = Config::default();
        let mut reader = Reader::new(header, &links, &cfg);
        let mut buf = bytes;
        let root = reader.read_root(&mut buf)?;
        assert!(buf.is_empty(), "{} bytes left", buf.len());
        Ok((root, reader.finish()))
    }

    fn encode(header: &Header, objects: &Objects, root: Option<ObjId>) -> Result<BytesMut, Error> {
        let mut buf = BytesMut::new();
        Writer::new(header, objects).write_root(&mut buf, root)?;
        Ok(buf)
    }

    /// Decodes a single-field root object, checks the value and re-encodes it.
    fn round_trip(ty: PropType, bytes: &[u8]) -> Value {
        let header = header(vec![("v".into(), ty)]);
        let mut encoded = vec![0x01];
        encoded.extend_from_slice(bytes);

        let (root, objects) = decode(&header, &encoded).unwrap();
        let value = objects.get(root.unwrap()).unwrap().get("v").unwrap().clone();
        assert_eq!(encode(&header, &objects, root).unwrap(), &encoded[..]);
        value
    }

    #[test_case(PropType::Int, &[0x05] => Value::Int(5); "int")]
    #[test_case(PropType::Int, &[0x80, 0xFF, 0xFF, 0xFF, 0xFF] => Value::Int(-1); "negative int")]
    #[test_case(PropType::Flags(Box::new(PropType::Enum("F".into()))), &[0x03] => Value::Int(3); "flags")]
    #[test_case(PropType::Float, &1.5f64.to_le_bytes() => Value::Float(1.5); "float")]
    #[test_case(PropType::Bool, &[0x01] => Value::Bool(true); "bool")]
    #[test_case(PropType::Int64, &(-2i64).to_le_bytes() => Value::Int64(-2); "int64")]
    #[test_case(PropType::String, &[0x03, b'h', b'i'] => Value::String("hi".into()); "string")]
    #[test_case(PropType::String, &[0x01] => Value::String(String::new()); "empty string")]
    #[test_case(PropType::String, &[0x00] => Value::Null; "null string")]
    #[test_case(PropType::Bytes, &[0x02, 0xFF] => Value::Bytes(Bytes::from_static(&[0xFF])); "bytes")]
    #[test_case(PropType::Untyped, &[0x02, b'x'] => Value::String("x".into()); "untyped")]
    #[test_case(PropType::Enum("E".into()), &[0x02] => Value::Enum { name: "E".into(), index: 2 }; "enum")]
    #[test_case(PropType::Null(Box::new(PropType::Int)), &[0x00] => Value::Null; "null absent")]
    #[test_case(PropType::Null(Box::new(PropType::Int)), &[0x01, 0x07] => Value::Int(7); "null present")]
    #[test_case(PropType::Alias(Box::new(PropType::Int)), &[0x09] => Value::Int(9); "alias")]
    fn test_scalar(ty: PropType, bytes: &[u8]) -> Value {
        round_trip(ty, bytes)
    }

    #[test]
    fn test_array_null_and_empty() {
        let ty = PropType::Array(Box::new(PropType::Int));
        assert_eq!(round_trip(ty.clone(), &[0x00]), Value::Null);
        assert_eq!(round_trip(ty.clone(), &[0x01]), Value::Array(vec![]));
        assert_eq!(
            round_trip(ty, &[0x03, 0x01, 0x02]),
            Value::Array(vec![Value::Int(1), Value::Int(2)])
        );
    }

    #[test]
    fn test_map() {
        let ty = PropType::Map(Box::new(PropType::String), Box::new(PropType::Int));
        assert_eq!(
            round_trip(ty, &[0x02, 0x02, b'k', 0x04]),
            Value::Map(vec![(Value::String("k".into()), Value::Int(4))])
        );
    }

    #[test]
    fn test_map_null_and_empty() {
        let ty = PropType::Map(Box::new(PropType::String), Box::new(PropType::Int));
        assert_eq!(round_trip(ty.clone(), &[0x00]), Value::Null);
        assert_eq!(round_trip(ty, &[0x01]), Value::Map(vec![]));
    }

    #[test_case(PropType::Null(Box::new(PropType::String)), &[0x01, 0x01, 0x00], "Null"; "null wrapping null string")]
    #[test_case(PropType::Null(Box::new(PropType::Array(Box::new(PropType::Int)))), &[0x01, 0x01, 0x00], "Null"; "null wrapping null array")]
    #[test_case(
        PropType::Obj(ObjDef::new(vec![ObjField::new("s", PropType::String)])),
        &[0x01, 0x02, 0x00],
        "Obj";
        "present field is null"
    )]
    #[test_case(
        PropType::Obj(ObjDef::new(vec![ObjField::new("s", PropType::String)])),
        &[0x01, 0x04, 0x02, b'x'],
        "Obj";
        "bit beyond nullable fields"
    )]
    #[test_case(
        PropType::Obj(ObjDef::new(vec![ObjField::new("n", PropType::Int)])),
        &[0x01, 0x02, 0x05],
        "Obj";
        "bit set without nullable fields"
    )]
    fn test_rejects_lossy_presence(ty: PropType, bytes: &[u8], context: &str) {
        let header = header(vec![("v".into(), ty)]);
        assert!(matches!(
            decode(&header, bytes),
            Err(Error::Codec(hxs_codec::Error::Invalid(c, _))) if c == context
        ));
    }

    #[test]
    fn test_present_values_survive() {
        // A present field that is an empty string is not null and keeps its bit.
        let ty = PropType::Obj(ObjDef::new(vec![ObjField::new("s", PropType::String)]));
        assert_eq!(
            round_trip(ty, &[0x02, 0x01]),
            Value::Obj(vec![Field::new("s", Value::String(String::new()))])
        );

        // Presence of a wrapped empty array.
        let ty = PropType::Null(Box::new(PropType::Array(Box::new(PropType::Int))));
        assert_eq!(round_trip(ty, &[0x01, 0x01]), Value::Array(vec![]));
    }

    #[test]
    fn test_inline_object() {
        let ty = PropType::Obj(ObjDef::new(vec![
            ObjField::new("id", PropType::String),
            ObjField::new("t", PropType::Float),
            ObjField::new("n", PropType::String),
        ]));

        // `id` present, `n` absent: bits = 0b01, stored as 2.
        let mut bytes = vec![0x02, 0x02, b'a'];
        bytes.extend_from_slice(&2.0f64.to_le_bytes());
        assert_eq!(
            round_trip(ty.clone(), &bytes),
            Value::Obj(vec![
                Field::new("id", Value::String("a".into())),
                Field::new("t", Value::Float(2.0)),
                Field::new("n", Value::Null),
            ])
        );

        // Whole object absent.
        assert_eq!(round_trip(ty, &[0x00]), Value::Null);
    }

    #[test]
    fn test_bitmap_toggle_changes_only_its_bit() {
        let def = ObjDef::new(vec![
            ObjField::new("a", PropType::String),
            ObjField::new("x", PropType::Int),
            ObjField::new("b", PropType::String),
        ]);
        let header = header(vec![("v".into(), PropType::Obj(def))]);
        let build = |b: Value| {
            let mut objects = Objects::default();
            let root = objects.insert(
                0,
                vec![(
                    "v".into(),
                    Value::Obj(vec![
                        Field::new("a", Value::String("s".into())),
                        Field::new("x", Value::Int(3)),
                        Field::new("b", b),
                    ]),
                )],
            );
            encode(&header, &objects, Some(root)).unwrap()
        };

        let without = build(Value::Null);
        let with = build(Value::String("t".into()));
        // uid, bits + 1, a, x[, b]
        assert_eq!(without, &[0x01, 0x02, 0x02, b's', 0x03][..]);
        assert_eq!(with, &[0x01, 0x04, 0x02, b's', 0x03, 0x02, b't'][..]);
    }

    #[test]
    fn test_untyped_inline_field() {
        let ty = PropType::Obj(ObjDef::new(vec![ObjField {
            name: Some("legacy".into()),
            ty: None,
            opt: false,
        }]));
        assert_eq!(
            round_trip(ty, &[0x02, 0x02, b'z']),
            Value::Obj(vec![Field::new("legacy", Value::String("z".into()))])
        );
    }

    #[test]
    fn test_too_many_nullable_fields() {
        let fields = (0..33)
            .map(|i| ObjField::new(format!("f{i}"), PropType::String))
            .collect();
        let header = header(vec![("v".into(), PropType::Obj(ObjDef::new(fields)))]);
        let mut objects = Objects::default();
        let values = (0..33).map(|i| Field::new(format!("f{i}"), Value::Null)).collect();
        let root = objects.insert(0, vec![("v".into(), Value::Obj(values))]);
        assert!(matches!(
            encode(&header, &objects, Some(root)),
            Err(Error::TooManyNullableFields(33))
        ));
    }

    #[test]
    fn test_field_count() {
        let def = ObjDef::new(vec![ObjField::new("a", PropType::Int)]);
        let header = header(vec![("v".into(), PropType::Obj(def))]);
        let mut objects = Objects::default();
        let root = objects.insert(0, vec![("v".into(), Value::Obj(vec![]))]);
        assert!(matches!(
            encode(&header, &objects, Some(root)),
            Err(Error::FieldCount { expected: 1, found: 0 })
        ));
    }

    #[test_case(PropType::Vector(Box::new(PropType::Int)), Kind::Vector; "vector")]
    #[test_case(PropType::Dynamic, Kind::Dynamic; "dynamic")]
    #[test_case(PropType::Custom, Kind::Custom; "custom")]
    #[test_case(PropType::NoSave(Box::new(PropType::Int)), Kind::NoSave; "no save")]
    #[test_case(PropType::SerInterface("I".into()), Kind::SerInterface; "ser interface")]
    fn test_unsupported(ty: PropType, kind: Kind) {
        let header = header(vec![("v".into(), ty)]);
        assert!(matches!(
            decode(&header, &[0x01, 0x00]),
            Err(Error::UnsupportedValue(k)) if k == kind
        ));

        let mut objects = Objects::default();
        let root = objects.insert(0, vec![("v".into(), Value::Null)]);
        assert!(matches!(
            encode(&header, &objects, Some(root)),
            Err(Error::UnsupportedValue(k)) if k == kind
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let header = header(vec![("v".into(), PropType::Int)]);
        let mut objects = Objects::default();
        let root = objects.insert(0, vec![("v".into(), Value::String("1".into()))]);
        assert!(matches!(
            encode(&header, &objects, Some(root)),
            Err(Error::TypeMismatch { found: "String", .. })
        ));

        // A missing non-nullable field cannot be written.
        let mut objects = Objects::default();
        let root = objects.insert(0, vec![]);
        assert!(matches!(
            encode(&header, &objects, Some(root)),
            Err(Error::TypeMismatch { found: "Null", .. })
        ));
    }

    #[test]
    fn test_self_reference() {
        let header = header(vec![("next".into(), PropType::Serializable("A".into()))]);
        let (root, objects) = decode(&header, &[0x01, 0x01]).unwrap();
        let root = root.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects.get(root).unwrap().get("next"), Some(&Value::Ref(root)));
        assert_eq!(encode(&header, &objects, Some(root)).unwrap(), &[0x01, 0x01][..]);
    }

    #[test]
    fn test_unknown_class() {
        let header = header(vec![("next".into(), PropType::Serializable("B".into()))]);
        assert!(matches!(
            decode(&header, &[0x01, 0x02]),
            Err(Error::UnknownClass(name)) if name == "B"
        ));
        // A null reference never needs the class.
        assert!(decode(&header, &[0x01, 0x00]).is_ok());
    }

    #[test]
    fn test_root_without_schema() {
        let header = Header::default();
        assert!(matches!(decode(&header, &[0x00]), Ok((None, _))));
        assert!(matches!(
            decode(&header, &[0x01]),
            Err(Error::UnknownClass(name)) if name == "<root>"
        ));
    }

    #[test]
    fn test_dangling_ref() {
        let header = header(vec![("next".into(), PropType::Serializable("A".into()))]);
        let mut objects = Objects::default();
        let a = objects.insert(0, vec![]);
        let mut other = Objects::default();
        other.insert(0, vec![]);
        let b = other.insert(0, vec![]);
        objects.get_mut(a).unwrap().fields.push(("next".into(), Value::Ref(b)));
        assert!(matches!(
            encode(&header, &objects, Some(a)),
            Err(Error::DanglingRef(1))
        ));
    }

    #[test]
    fn test_uid_assignment() {
        let header = header(vec![("next".into(), PropType::Serializable("A".into()))]);

        // Objects built in memory are numbered in encounter order.
        let mut objects = Objects::default();
        let b = objects.insert(0, vec![("next".into(), Value::Null)]);
        let a = objects.insert(0, vec![("next".into(), Value::Ref(b))]);
        assert_eq!(
            encode(&header, &objects, Some(a)).unwrap(),
            &[0x01, 0x02, 0x00][..]
        );

        // Decoded uids are kept.
        let (root, objects) = decode(&header, &[0x07, 0x03, 0x00]).unwrap();
        assert_eq!(objects.get(root.unwrap()).unwrap().uid, 7);
        assert_eq!(
            encode(&header, &objects, root).unwrap(),
            &[0x07, 0x03, 0x00][..]
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut ty = PropType::Int;
        for _ in 0..300 {
            ty = PropType::Array(Box::new(ty));
        }
        let header = header(vec![("v".into(), ty)]);
        let mut bytes = vec![0x01];
        bytes.extend(std::iter::repeat(0x02).take(300));
        bytes.push(0x00);
        assert!(matches!(
            decode(&header, &bytes),
            Err(Error::Codec(hxs_codec::Error::DepthExceeded(256)))
        ));
    }
}
