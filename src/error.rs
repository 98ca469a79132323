use crate::{buffer::BufferError, curve::CurveError};

/// Errors produced by the mesh engines.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Buffer(#[from] BufferError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error("subdivision count must be positive")]
    ZeroSubdivisions,
    #[error("invalid splat configuration: {0}")]
    InvalidConfig(&'static str),
    #[cfg(feature = "export")]
    #[error(transparent)]
    Export(#[from] hedron::Error),
}
