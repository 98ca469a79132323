/// Errors related to [Primitives](crate::Primitive) and their (de)serialization.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("attribute {attribute:?} has {actual} entries, but the primitive has {expected} vertices")]
    AttributeLength {
        attribute: crate::AttributeUsage,
        expected: usize,
        actual: usize,
    },
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
    #[error("index {index} out of range: 0..{vertices} ∌ {index}")]
    IndexOutOfRange { index: u32, vertices: usize },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[cfg(feature = "de_obj")]
    #[error(transparent)]
    Obj(#[from] tobj::LoadError),
}
