//! Error types for decoding and encoding whole files.

use crate::Kind;
use thiserror::Error;

/// Errors that can occur when decoding or encoding an HXS file.
#[derive(Debug, Error)]
pub enum Error {
    #[error("codec error: {0}")]
    Codec(#[from] hxs_codec::Error),
    #[error("bad magic: {0:?}")]
    BadMagic(Option<String>),
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),
    #[error("values of kind {0} are not supported")]
    UnsupportedValue(Kind),
    #[error("unknown class: {0}")]
    UnknownClass(String),
    #[error("unknown schema: {0}")]
    UnknownSchema(usize),
    #[error("dangling object reference: {0}")]
    DanglingRef(usize),
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: String,
        found: &'static str,
    },
    #[error("inline object has {found} values but declares {expected} fields")]
    FieldCount { expected: usize, found: usize },
    #[error("too many nullable fields: {0}")]
    TooManyNullableFields(usize),
    #[error("object uids exhausted")]
    UidOverflow,
    #[error("unknown shim library: {0}")]
    UnknownShimLibrary(String),
}
