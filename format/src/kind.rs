//! The 22 kinds of property type.

use std::fmt;

/// Kind of a [PropType](crate::PropType).
///
/// On the wire a kind is stored as its index plus one, leaving `0` for "no type".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Kind {
    Int = 0,
    Float,
    Bool,
    String,
    Bytes,
    Serializable,
    Enum,
    Map,
    Array,
    Obj,
    Alias,
    Vector,
    Null,
    Unknown,
    Dynamic,
    Int64,
    Flags,
    Custom,
    SerInterface,
    Struct,
    AliasCdb,
    NoSave,
}

impl Kind {
    /// Every kind, in index order.
    pub const ALL: [Kind; 22] = [
        Kind::Int,
        Kind::Float,
        Kind::Bool,
        Kind::String,
        Kind::Bytes,
        Kind::Serializable,
        Kind::Enum,
        Kind::Map,
        Kind::Array,
        Kind::Obj,
        Kind::Alias,
        Kind::Vector,
        Kind::Null,
        Kind::Unknown,
        Kind::Dynamic,
        Kind::Int64,
        Kind::Flags,
        Kind::Custom,
        Kind::SerInterface,
        Kind::Struct,
        Kind::AliasCdb,
        Kind::NoSave,
    ];

    /// Returns the kind with the given index, if there is one.
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }

    /// The kind's index.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// The byte the kind is stored as.
    pub fn tag(self) -> u8 {
        self.index() + 1
    }

    /// Returns true if field values of this kind can be decoded and encoded.
    ///
    /// The remaining kinds appear in schemas, but their value layout is not known.
    pub fn has_values(self) -> bool {
        !matches!(
            self,
            Kind::Vector
                | Kind::Unknown
                | Kind::Dynamic
                | Kind::Custom
                | Kind::SerInterface
                | Kind::Struct
                | Kind::AliasCdb
                | Kind::NoSave
        )
    }

    /// The hxbit name of the kind.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Int => "PInt",
            Kind::Float => "PFloat",
            Kind::Bool => "PBool",
            Kind::String => "PString",
            Kind::Bytes => "PBytes",
            Kind::Serializable => "PSerializable",
            Kind::Enum => "PEnum",
            Kind::Map => "PMap",
            Kind::Array => "PArray",
            Kind::Obj => "PObj",
            Kind::Alias => "PAlias",
            Kind::Vector => "PVector",
            Kind::Null => "PNull",
            Kind::Unknown => "PUnknown",
            Kind::Dynamic => "PDynamic",
            Kind::Int64 => "PInt64",
            Kind::Flags => "PFlags",
            Kind::Custom => "PCustom",
            Kind::SerInterface => "PSerInterface",
            Kind::Struct => "PStruct",
            Kind::AliasCdb => "PAliasCDB",
            Kind::NoSave => "PNoSave",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for (i, kind) in Kind::ALL.iter().enumerate() {
            assert_eq!(kind.index() as usize, i);
            assert_eq!(Kind::from_index(i as u8), Some(*kind));
            assert_eq!(kind.tag() as usize, i + 1);
        }
        assert_eq!(Kind::from_index(22), None);
        assert_eq!(Kind::from_index(0xFF), None);
    }

    #[test]
    fn test_has_values() {
        let unsupported: Vec<_> = Kind::ALL.iter().filter(|k| !k.has_values()).collect();
        assert_eq!(unsupported.len(), 8);
        assert!(Kind::Obj.has_values());
        assert!(Kind::Flags.has_values());
        assert!(!Kind::Struct.has_values());
    }

    #[test]
    fn test_display() {
        assert_eq!(Kind::AliasCdb.to_string(), "PAliasCDB");
        assert_eq!(Kind::Int64.to_string(), "PInt64");
    }
}
