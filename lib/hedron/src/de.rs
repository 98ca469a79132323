//! Deserialization of geometry from various storage formats.

#[cfg(feature = "de_obj")]
pub mod obj;
