//! Codec implementations for common types

pub mod bytes;
pub mod fixed;
pub mod primitives;
pub mod string;
