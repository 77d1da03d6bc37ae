//! Decode and re-encode hxbit (HXS) object graphs.
//!
//! # Overview
//!
//! An HXS file carries its own type information. It starts with a table of classes, follows it
//! with one schema per class (the name and [PropType] of every serialized field), and ends with
//! a reference to the root object. Everything after the header is decoded by walking those
//! schemas:
//!
//! ```text
//! HXS_FILE := MAGIC VERSION CLASSDEF* NULLSTR SCHEMA_SIZE:VarInt SCHEMA* OBJREF
//! MAGIC    := String("HXS")
//! VERSION  := u8 (1)
//! CLASSDEF := name:String clid:u16(BE) crc32:u32(LE)
//! SCHEMA   := uid:VarInt clid:VarInt Count String* Count PROPTYPE*
//! OBJREF   := uid:VarInt (0 => null, else new-or-existing object)
//! ```
//!
//! Objects are referenced by uid. The first time a uid appears, the object's fields follow
//! inline; every later appearance is just the uid. Decoded objects live in an arena
//! ([Objects]) and refer to each other by [ObjId], so shared and cyclic references need no
//! special treatment.
//!
//! # Round trip
//!
//! `File::decode(bytes)?.encode()?` reproduces `bytes` exactly for any file written by hxbit.
//! Objects keep the uid they were decoded with. Objects built with [Objects::insert] (uid 0)
//! are numbered from 1 in the order the writer reaches them, skipping uids already taken.
//!
//! # Example
//!
//! ```
//! use hxs_format::{ClassDef, File, Header, Objects, PropType, Schema, Value};
//!
//! // A class `Hero` with a single `hp : Int` field.
//! let header = Header {
//!     classes: vec![ClassDef::new("Hero", 1, 0)],
//!     schemas: vec![Schema::new(1, 1, vec![("hp".into(), PropType::Int)])],
//! };
//! let mut objects = Objects::default();
//! let hero = objects.insert(0, vec![("hp".into(), Value::Int(100))]);
//! let file = File::new(header, objects, Some(hero));
//!
//! let bytes = file.encode().unwrap();
//! let decoded = File::decode(&bytes[..]).unwrap();
//! let root = decoded.root().unwrap();
//! assert_eq!(root.get("hp"), Some(&Value::Int(100)));
//! assert_eq!(decoded.encode().unwrap(), bytes);
//! ```

mod error;
mod file;
mod graph;
pub mod hash;
mod header;
mod kind;
mod link;
mod schema;
pub mod shims;
mod types;
mod value;

pub use error::Error;
pub use file::File;
pub use header::{Header, MAGIC, VERSION};
pub use kind::Kind;
pub use link::Links;
pub use schema::{ClassDef, Schema};
pub use types::{ObjDef, ObjField, PropType, StructDef, StructField};
pub use value::{Field, Obj, ObjId, Objects, Value};

use hxs_codec::RangeCfg;

/// Limits applied while decoding untrusted input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum nesting of types and values.
    pub max_depth: usize,
    /// Maximum length of any string or collection.
    pub max_len: usize,
}

impl Config {
    /// The range every decoded length must fall within.
    pub fn len_range(&self) -> RangeCfg {
        RangeCfg::max(self.max_len)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 256,
            max_len: 1 << 24,
        }
    }
}
