//! Serialization of [Primitives](crate::Primitive) to various storage formats.

#[cfg(feature = "ser_obj")]
pub mod obj;

/// Identifies the program that generated an output asset, where the format has room for it.
pub const GENERATOR_ID: &str = concat!("hedron@", env!("CARGO_PKG_VERSION"));
