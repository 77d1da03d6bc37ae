//! Decoded values and the object arena.

use bytes::Bytes;

/// Index of an object in an [Objects] arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjId(usize);

impl ObjId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A decoded field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// An absent string, collection, object or `Null<T>`.
    Null,
    Int(i32),
    Float(f64),
    Bool(bool),
    Int64(i64),
    String(String),
    /// Raw payload of a `Bytes` field (string framing, no UTF-8 check).
    Bytes(Bytes),
    Array(Vec<Value>),
    /// Map entries in wire order.
    Map(Vec<(Value, Value)>),
    /// A reference to a serializable object.
    Ref(ObjId),
    /// An enum constructor. Constructor arguments are not decoded.
    Enum { name: String, index: i32 },
    /// An inline anonymous object, one entry per declared field.
    Obj(Vec<Field>),
}

impl Value {
    /// Name of the variant, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Bool(_) => "Bool",
            Value::Int64(_) => "Int64",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::Array(_) => "Array",
            Value::Map(_) => "Map",
            Value::Ref(_) => "Ref",
            Value::Enum { .. } => "Enum",
            Value::Obj(_) => "Obj",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the referenced object, if this is a reference.
    pub fn as_obj(&self) -> Option<ObjId> {
        match self {
            Value::Ref(id) => Some(*id),
            _ => None,
        }
    }
}

/// One field of an inline object.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: Option<String>,
    pub value: Value,
}

impl Field {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: Some(name.into()),
            value,
        }
    }
}

/// An instance of a serializable class.
#[derive(Clone, Debug, PartialEq)]
pub struct Obj {
    /// Index of the object's schema in the header.
    pub schema: usize,
    /// The uid the object was decoded with (`0` for objects built in memory).
    pub uid: i32,
    /// Field values in schema order.
    pub fields: Vec<(String, Value)>,
}

impl Obj {
    /// Returns the value of the named field.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }
}

/// Arena owning every object of a file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Objects {
    objects: Vec<Obj>,
}

impl Objects {
    /// Adds an object of the given schema, returning its id.
    pub fn insert(&mut self, schema: usize, fields: Vec<(String, Value)>) -> ObjId {
        self.push(Obj {
            schema,
            uid: 0,
            fields,
        })
    }

    pub(crate) fn push(&mut self, obj: Obj) -> ObjId {
        let id = ObjId(self.objects.len());
        self.objects.push(obj);
        id
    }

    pub fn get(&self, id: ObjId) -> Option<&Obj> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjId) -> Option<&mut Obj> {
        self.objects.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjId, &Obj)> {
        self.objects.iter().enumerate().map(|(i, obj)| (ObjId(i), obj))
    }
}
