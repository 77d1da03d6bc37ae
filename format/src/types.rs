//! Property types: the recursive grammar describing every field in a schema.
//!
//! A [PropType] is stored as a tag byte followed by a kind-specific payload:
//!
//! ```text
//! PROPTYPE := 0x00                        no type
//!           | (kind + 1) PAYLOAD
//!
//! Empty    := (nothing)                   Int Float Bool String Bytes Unknown Dynamic Int64 Custom
//! Name     := String                      Serializable Enum SerInterface
//! Map      := PROPTYPE PROPTYPE           Map (key, value)
//! Type     := PROPTYPE                    Array Alias Vector Null Flags AliasCDB NoSave
//! Obj      := Count OBJFIELD*             Obj
//! Struct   := String Count (String PROPTYPE)*
//! OBJFIELD := bits:VarInt [String if bits & 1] [PROPTYPE if bits & 2] opt:u8
//! ```
//!
//! `Count` is the count + 1 framing of [hxs_codec::length].

use crate::{Config, Kind};
use bytes::{Buf, BufMut};
use hxs_codec::{length, varint, EncodeSize, Error, Read, ReadExt, Write};
use std::fmt;
use tracing::trace;

/// A property type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PropType {
    /// The "no type" sentinel (tag `0`).
    Untyped,
    Int,
    Float,
    Bool,
    String,
    Bytes,
    /// Reference to an instance of the named class.
    Serializable(String),
    /// Value of the named enum.
    Enum(String),
    Map(Box<PropType>, Box<PropType>),
    Array(Box<PropType>),
    /// Inline anonymous object.
    Obj(ObjDef),
    Alias(Box<PropType>),
    Vector(Box<PropType>),
    Null(Box<PropType>),
    Unknown,
    Dynamic,
    Int64,
    Flags(Box<PropType>),
    Custom,
    SerInterface(String),
    Struct(StructDef),
    AliasCdb(Box<PropType>),
    NoSave(Box<PropType>),
}

impl PropType {
    /// The type's kind, or `None` for [PropType::Untyped].
    pub fn kind(&self) -> Option<Kind> {
        Some(match self {
            PropType::Untyped => return None,
            PropType::Int => Kind::Int,
            PropType::Float => Kind::Float,
            PropType::Bool => Kind::Bool,
            PropType::String => Kind::String,
            PropType::Bytes => Kind::Bytes,
            PropType::Serializable(_) => Kind::Serializable,
            PropType::Enum(_) => Kind::Enum,
            PropType::Map(..) => Kind::Map,
            PropType::Array(_) => Kind::Array,
            PropType::Obj(_) => Kind::Obj,
            PropType::Alias(_) => Kind::Alias,
            PropType::Vector(_) => Kind::Vector,
            PropType::Null(_) => Kind::Null,
            PropType::Unknown => Kind::Unknown,
            PropType::Dynamic => Kind::Dynamic,
            PropType::Int64 => Kind::Int64,
            PropType::Flags(_) => Kind::Flags,
            PropType::Custom => Kind::Custom,
            PropType::SerInterface(_) => Kind::SerInterface,
            PropType::Struct(_) => Kind::Struct,
            PropType::AliasCdb(_) => Kind::AliasCdb,
            PropType::NoSave(_) => Kind::NoSave,
        })
    }

    /// Returns true if values of this type occupy a bit in an inline object's presence bitmap.
    ///
    /// Plain numbers, booleans and flags are never null. Aliases are as nullable as what they
    /// wrap. Everything else, including the untyped sentinel, is nullable.
    pub fn is_nullable(&self) -> bool {
        match self {
            PropType::Int
            | PropType::Float
            | PropType::Bool
            | PropType::Int64
            | PropType::Flags(_) => false,
            PropType::Alias(inner) | PropType::AliasCdb(inner) | PropType::NoSave(inner) => {
                inner.is_nullable()
            }
            _ => true,
        }
    }

    /// The wrapped type of a single-payload kind.
    pub fn inner(&self) -> Option<&PropType> {
        match self {
            PropType::Array(inner)
            | PropType::Alias(inner)
            | PropType::Vector(inner)
            | PropType::Null(inner)
            | PropType::Flags(inner)
            | PropType::AliasCdb(inner)
            | PropType::NoSave(inner) => Some(inner),
            _ => None,
        }
    }

    pub(crate) fn read_at(buf: &mut impl Buf, cfg: &Config, depth: usize) -> Result<Self, Error> {
        if depth > cfg.max_depth {
            return Err(Error::DepthExceeded(cfg.max_depth));
        }
        let tag = u8::read(buf)?;
        if tag == 0 {
            return Ok(PropType::Untyped);
        }
        let kind = Kind::from_index(tag - 1).ok_or(Error::InvalidEnum(tag))?;
        trace!(%kind, depth, remaining = buf.remaining(), "decoding type");

        let depth = depth + 1;
        Ok(match kind {
            Kind::Int => PropType::Int,
            Kind::Float => PropType::Float,
            Kind::Bool => PropType::Bool,
            Kind::String => PropType::String,
            Kind::Bytes => PropType::Bytes,
            Kind::Serializable => PropType::Serializable(read_name(buf, cfg)?),
            Kind::Enum => PropType::Enum(read_name(buf, cfg)?),
            Kind::Map => {
                let key = read_boxed(buf, cfg, depth)?;
                let value = read_boxed(buf, cfg, depth)?;
                PropType::Map(key, value)
            }
            Kind::Array => PropType::Array(read_boxed(buf, cfg, depth)?),
            Kind::Obj => PropType::Obj(ObjDef::read_at(buf, cfg, depth)?),
            Kind::Alias => PropType::Alias(read_boxed(buf, cfg, depth)?),
            Kind::Vector => PropType::Vector(read_boxed(buf, cfg, depth)?),
            Kind::Null => PropType::Null(read_boxed(buf, cfg, depth)?),
            Kind::Unknown => PropType::Unknown,
            Kind::Dynamic => PropType::Dynamic,
            Kind::Int64 => PropType::Int64,
            Kind::Flags => PropType::Flags(read_boxed(buf, cfg, depth)?),
            Kind::Custom => PropType::Custom,
            Kind::SerInterface => PropType::SerInterface(read_name(buf, cfg)?),
            Kind::Struct => PropType::Struct(StructDef::read_at(buf, cfg, depth)?),
            Kind::AliasCdb => PropType::AliasCdb(read_boxed(buf, cfg, depth)?),
            Kind::NoSave => PropType::NoSave(read_boxed(buf, cfg, depth)?),
        })
    }
}

fn read_name(buf: &mut impl Buf, cfg: &Config) -> Result<String, Error> {
    String::read_cfg(buf, &cfg.len_range())
}

fn read_boxed(buf: &mut impl Buf, cfg: &Config, depth: usize) -> Result<Box<PropType>, Error> {
    PropType::read_at(buf, cfg, depth).map(Box::new)
}

impl Write for PropType {
    fn write(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.kind().map_or(0, Kind::tag));
        match self {
            PropType::Serializable(name) | PropType::Enum(name) | PropType::SerInterface(name) => {
                name.write(buf)
            }
            PropType::Map(key, value) => {
                key.write(buf);
                value.write(buf);
            }
            PropType::Obj(def) => def.write(buf),
            PropType::Struct(def) => def.write(buf),
            other => {
                if let Some(inner) = other.inner() {
                    inner.write(buf);
                }
            }
        }
    }
}

impl EncodeSize for PropType {
    fn encode_size(&self) -> usize {
        1 + match self {
            PropType::Serializable(name) | PropType::Enum(name) | PropType::SerInterface(name) => {
                name.encode_size()
            }
            PropType::Map(key, value) => key.encode_size() + value.encode_size(),
            PropType::Obj(def) => def.encode_size(),
            PropType::Struct(def) => def.encode_size(),
            other => other.inner().map_or(0, EncodeSize::encode_size),
        }
    }
}

impl Read for PropType {
    type Cfg = Config;

    fn read_cfg(buf: &mut impl Buf, cfg: &Config) -> Result<Self, Error> {
        Self::read_at(buf, cfg, 0)
    }
}

/// Fields of an inline anonymous object, in declaration order.
///
/// Values of an inline object are decoded by walking these fields in order, so the order is
/// part of the format.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ObjDef {
    /// `None` when the field list itself was stored as absent.
    pub fields: Option<Vec<ObjField>>,
}

impl ObjDef {
    pub fn new(fields: Vec<ObjField>) -> Self {
        Self {
            fields: Some(fields),
        }
    }

    /// The declared fields (empty if the list was absent).
    pub fn fields(&self) -> &[ObjField] {
        self.fields.as_deref().unwrap_or_default()
    }

    fn read_at(buf: &mut impl Buf, cfg: &Config, depth: usize) -> Result<Self, Error> {
        let fields = match length::read(buf, &cfg.len_range())? {
            None => None,
            Some(count) => {
                let mut fields = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    fields.push(ObjField::read_at(buf, cfg, depth)?);
                }
                Some(fields)
            }
        };
        Ok(Self { fields })
    }
}

impl Write for ObjDef {
    fn write(&self, buf: &mut impl BufMut) {
        length::write(self.fields.as_ref().map(Vec::len), buf);
        for field in self.fields() {
            field.write(buf);
        }
    }
}

impl EncodeSize for ObjDef {
    fn encode_size(&self) -> usize {
        length::size(self.fields.as_ref().map(Vec::len))
            + self.fields().iter().map(EncodeSize::encode_size).sum::<usize>()
    }
}

/// One field of an inline object.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct ObjField {
    pub name: Option<String>,
    /// `None` for an untyped field, whose values are stored as strings.
    pub ty: Option<PropType>,
    pub opt: bool,
}

impl ObjField {
    const HAS_NAME: i32 = 1;
    const HAS_TYPE: i32 = 2;

    pub fn new(name: impl Into<String>, ty: PropType) -> Self {
        Self {
            name: Some(name.into()),
            ty: Some(ty),
            opt: false,
        }
    }

    /// Returns true if the field occupies a bit in the presence bitmap.
    pub fn is_nullable(&self) -> bool {
        self.ty.as_ref().map_or(true, PropType::is_nullable)
    }

    fn bits(&self) -> i32 {
        let mut bits = 0;
        if self.name.is_some() {
            bits |= Self::HAS_NAME;
        }
        if self.ty.is_some() {
            bits |= Self::HAS_TYPE;
        }
        bits
    }

    fn read_at(buf: &mut impl Buf, cfg: &Config, depth: usize) -> Result<Self, Error> {
        let bits = varint::read(buf)?;
        if bits & !(Self::HAS_NAME | Self::HAS_TYPE) != 0 {
            return Err(Error::Invalid("ObjField", "unknown flag bits"));
        }
        let name = if bits & Self::HAS_NAME != 0 {
            Some(String::read_cfg(buf, &cfg.len_range())?)
        } else {
            None
        };
        let ty = if bits & Self::HAS_TYPE != 0 {
            Some(PropType::read_at(buf, cfg, depth)?)
        } else {
            None
        };
        let opt = bool::read(buf)?;
        Ok(Self { name, ty, opt })
    }
}

impl Write for ObjField {
    fn write(&self, buf: &mut impl BufMut) {
        varint::write(self.bits(), buf);
        if let Some(name) = &self.name {
            name.write(buf);
        }
        if let Some(ty) = &self.ty {
            ty.write(buf);
        }
        self.opt.write(buf);
    }
}

impl EncodeSize for ObjField {
    fn encode_size(&self) -> usize {
        varint::size(self.bits())
            + self.name.as_ref().map_or(0, EncodeSize::encode_size)
            + self.ty.as_ref().map_or(0, EncodeSize::encode_size)
            + self.opt.encode_size()
    }
}

/// A named struct type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub name: String,
    pub fields: Option<Vec<StructField>>,
}

/// One field of a [StructDef].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: PropType,
}

impl StructDef {
    /// The declared fields (empty if the list was absent).
    pub fn fields(&self) -> &[StructField] {
        self.fields.as_deref().unwrap_or_default()
    }

    fn read_at(buf: &mut impl Buf, cfg: &Config, depth: usize) -> Result<Self, Error> {
        let range = cfg.len_range();
        let name = String::read_cfg(buf, &range)?;
        let fields = match length::read(buf, &range)? {
            None => None,
            Some(count) => {
                let mut fields = Vec::with_capacity(count.min(buf.remaining()));
                for _ in 0..count {
                    let name = String::read_cfg(buf, &range)?;
                    let ty = PropType::read_at(buf, cfg, depth)?;
                    fields.push(StructField { name, ty });
                }
                Some(fields)
            }
        };
        Ok(Self { name, fields })
    }
}

impl Write for StructDef {
    fn write(&self, buf: &mut impl BufMut) {
        self.name.write(buf);
        length::write(self.fields.as_ref().map(Vec::len), buf);
        for field in self.fields() {
            field.name.write(buf);
            field.ty.write(buf);
        }
    }
}

impl EncodeSize for StructDef {
    fn encode_size(&self) -> usize {
        self.name.encode_size()
            + length::size(self.fields.as_ref().map(Vec::len))
            + self
                .fields()
                .iter()
                .map(|f| f.name.encode_size() + f.ty.encode_size())
                .sum::<usize>()
    }
}

impl fmt::Display for PropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropType::Untyped => f.write_str("-"),
            PropType::Int => f.write_str("Int"),
            PropType::Float => f.write_str("Float"),
            PropType::Bool => f.write_str("Bool"),
            PropType::String => f.write_str("String"),
            PropType::Bytes => f.write_str("Bytes"),
            PropType::Serializable(name) | PropType::SerInterface(name) => f.write_str(name),
            PropType::Enum(name) => write!(f, "Enum<{name}>"),
            PropType::Map(key, value) => write!(f, "Map<{key},{value}>"),
            PropType::Array(inner) => write!(f, "Array<{inner}>"),
            PropType::Obj(def) => {
                f.write_str("{ ")?;
                for (i, field) in def.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if field.opt {
                        f.write_str("?")?;
                    }
                    f.write_str(field.name.as_deref().unwrap_or("_"))?;
                    match &field.ty {
                        Some(ty) => write!(f, " : {ty}")?,
                        None => f.write_str(" : -")?,
                    }
                }
                f.write_str(" }")
            }
            PropType::Alias(inner) => write!(f, "{inner}"),
            PropType::Vector(inner) => write!(f, "Vector<{inner}>"),
            PropType::Null(inner) => write!(f, "Null<{inner}>"),
            PropType::Unknown => f.write_str("Unknown"),
            PropType::Dynamic => f.write_str("Dynamic"),
            PropType::Int64 => f.write_str("Int64"),
            PropType::Flags(inner) => write!(f, "Flags<{inner}>"),
            PropType::Custom => f.write_str("Custom"),
            PropType::Struct(def) => {
                write!(f, "Struct {} {{ ", def.name)?;
                for (i, field) in def.fields().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{} : {}", field.name, field.ty)?;
                }
                f.write_str(" }")
            }
            PropType::AliasCdb(inner) => write!(f, "AliasCDB<{inner}>"),
            PropType::NoSave(inner) => write!(f, "NoSave<{inner}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hxs_codec::{Decode, Encode};
    use bytes::Bytes;

    fn decode(bytes: &[u8]) -> Result<PropType, Error> {
        PropType::decode_cfg(Bytes::copy_from_slice(bytes), &Config::default())
    }

    #[test]
    fn test_untyped() {
        assert_eq!(decode(&[0x00]).unwrap(), PropType::Untyped);
        assert_eq!(PropType::Untyped.encode(), &[0x00][..]);
        assert_eq!(PropType::Untyped.kind(), None);
    }

    #[test]
    fn test_tags() {
        assert_eq!(PropType::Int.encode(), &[0x01][..]);
        assert_eq!(PropType::Int64.encode(), &[0x10][..]);
        assert_eq!(
            PropType::Serializable("A".into()).encode(),
            &[0x06, 0x02, b'A'][..]
        );
        assert_eq!(
            PropType::Map(Box::new(PropType::String), Box::new(PropType::Int)).encode(),
            &[0x08, 0x04, 0x01][..]
        );
        assert_eq!(
            PropType::Array(Box::new(PropType::Null(Box::new(PropType::Float)))).encode(),
            &[0x09, 0x0D, 0x02][..]
        );
    }

    #[test]
    fn test_payload_per_kind() {
        let int = || Box::new(PropType::Int);
        let name = || "A".to_string();
        // (type, encoded length): empty payloads are the tag alone, names are `02 'A'`,
        // wrapped types add one tag byte, empty field lists add a `01` count.
        let cases = [
            (PropType::Int, 1),
            (PropType::Float, 1),
            (PropType::Bool, 1),
            (PropType::String, 1),
            (PropType::Bytes, 1),
            (PropType::Serializable(name()), 3),
            (PropType::Enum(name()), 3),
            (PropType::Map(int(), int()), 3),
            (PropType::Array(int()), 2),
            (PropType::Obj(ObjDef::new(vec![])), 2),
            (PropType::Alias(int()), 2),
            (PropType::Vector(int()), 2),
            (PropType::Null(int()), 2),
            (PropType::Unknown, 1),
            (PropType::Dynamic, 1),
            (PropType::Int64, 1),
            (PropType::Flags(int()), 2),
            (PropType::Custom, 1),
            (PropType::SerInterface(name()), 3),
            (
                PropType::Struct(StructDef {
                    name: name(),
                    fields: Some(vec![]),
                }),
                4,
            ),
            (PropType::AliasCdb(int()), 2),
            (PropType::NoSave(int()), 2),
        ];
        for ((ty, len), kind) in cases.into_iter().zip(Kind::ALL) {
            assert_eq!(ty.kind(), Some(kind));
            let encoded = ty.encode();
            assert_eq!(encoded[0], kind.tag());
            assert_eq!(encoded.len(), len, "{kind}");
            assert_eq!(decode(&encoded).unwrap(), ty);
        }
    }

    #[test]
    fn test_nested_round_trip() {
        let ty = PropType::Map(
            Box::new(PropType::String),
            Box::new(PropType::Array(Box::new(PropType::Obj(ObjDef::new(vec![
                ObjField::new("idx", PropType::Int),
                ObjField {
                    name: Some("label".into()),
                    ty: None,
                    opt: true,
                },
                ObjField {
                    name: None,
                    ty: None,
                    opt: false,
                },
                ObjField::new(
                    "inner",
                    PropType::Struct(StructDef {
                        name: "Pos".into(),
                        fields: Some(vec![StructField {
                            name: "x".into(),
                            ty: PropType::Float,
                        }]),
                    }),
                ),
            ]))))),
        );
        let encoded = ty.encode();
        assert_eq!(encoded.len(), ty.encode_size());
        assert_eq!(decode(&encoded).unwrap(), ty);
    }

    #[test]
    fn test_obj_field_bits() {
        // Untyped, unnamed field: only the opt byte follows.
        let field = ObjField {
            name: None,
            ty: None,
            opt: true,
        };
        assert_eq!(field.encode(), &[0x00, 0x01][..]);

        // Named and typed.
        let field = ObjField::new("t", PropType::Float);
        assert_eq!(field.encode(), &[0x03, 0x02, b't', 0x02, 0x00][..]);
    }

    #[test]
    fn test_obj_field_unknown_bits() {
        // PObj with one field whose bits are 4.
        assert!(matches!(
            decode(&[0x0A, 0x02, 0x04, 0x00]),
            Err(Error::Invalid("ObjField", _))
        ));
    }

    #[test]
    fn test_obj_null_and_empty_field_lists() {
        let null = PropType::Obj(ObjDef { fields: None });
        let empty = PropType::Obj(ObjDef::new(vec![]));
        assert_eq!(null.encode(), &[0x0A, 0x00][..]);
        assert_eq!(empty.encode(), &[0x0A, 0x01][..]);
        assert_eq!(decode(&[0x0A, 0x00]).unwrap(), null);
        assert_eq!(decode(&[0x0A, 0x01]).unwrap(), empty);
    }

    #[test]
    fn test_unknown_kind() {
        assert!(matches!(decode(&[23]), Err(Error::InvalidEnum(23))));
        assert!(matches!(decode(&[0xFF]), Err(Error::InvalidEnum(0xFF))));
    }

    #[test]
    fn test_truncated_payload() {
        assert!(matches!(decode(&[0x08, 0x04]), Err(Error::EndOfBuffer)));
        assert!(matches!(decode(&[0x06, 0x05, b'a']), Err(Error::EndOfBuffer)));
    }

    #[test]
    fn test_depth_limit() {
        // Array<Array<...<Int>>> nested deeper than allowed.
        let mut bytes = vec![0x09; 10];
        bytes.push(0x01);
        let cfg = Config {
            max_depth: 4,
            ..Config::default()
        };
        let result = PropType::decode_cfg(Bytes::from(bytes.clone()), &cfg);
        assert!(matches!(result, Err(Error::DepthExceeded(4))));
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn test_nullability() {
        assert!(!PropType::Int.is_nullable());
        assert!(!PropType::Flags(Box::new(PropType::Int)).is_nullable());
        assert!(!PropType::Alias(Box::new(PropType::Float)).is_nullable());
        assert!(!PropType::NoSave(Box::new(PropType::AliasCdb(Box::new(PropType::Bool)))).is_nullable());
        assert!(PropType::Alias(Box::new(PropType::String)).is_nullable());
        assert!(PropType::Null(Box::new(PropType::Int)).is_nullable());
        assert!(PropType::Untyped.is_nullable());
        assert!(ObjField::default().is_nullable());
    }

    #[test]
    fn test_display() {
        let ty = PropType::Array(Box::new(PropType::Obj(ObjDef::new(vec![
            ObjField::new("id", PropType::String),
            ObjField {
                name: Some("t".into()),
                ty: Some(PropType::Float),
                opt: true,
            },
        ]))));
        assert_eq!(ty.to_string(), "Array<{ id : String, ?t : Float }>");
        assert_eq!(
            PropType::Map(Box::new(PropType::String), Box::new(PropType::Enum("Dir".into())))
                .to_string(),
            "Map<String,Enum<Dir>>"
        );
    }
}
