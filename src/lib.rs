//! Procedural triangle meshes.
//!
//! Two engines share one [GeometryBuffer] type:
//!
//! * [SplatEmitter] appends oriented decal quads ("splats") at surface impact points, growing
//!   its buffer by doubling and freezing it off once a hard ceiling is reached.
//! * [RevolutionBuilder] sweeps a 2D [ProfileCurve] around the vertical axis, recomputing a
//!   closed, UV-mapped surface of revolution from scratch on every build.
//!
//! Finished geometry is handed to a [MeshSink] as a borrowed [MeshView], which is only valid
//! until the next mutation of the buffer it came from.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod buffer;
pub mod curve;
pub mod error;
#[cfg(feature = "export")]
pub mod export;
mod frame;
pub mod mesh;
pub mod revolution;
pub mod sink;
pub mod splat;

pub use buffer::{BufferError, Capacity, GeometryBuffer};
pub use curve::{CurveError, CurveMode, ProfileCurve};
pub use error::Error;
pub use frame::Frame;
pub use mesh::{Mesh, MeshView};
pub use revolution::{Revolution, RevolutionBuilder, RevolutionStats, Subdivisions};
pub use sink::{MeshSink, NullSink, Publication, RecordingSink};
pub use splat::{EmitterStats, PolicyAction, Splat, SplatConfig, SplatEmitter, SplatOutcome};

pub use spindle_common::ArrayIndex;

use nalgebra::{Point2, Point3, Vector3};

/// Scalar type of all generated geometry.
pub type Real = f32;

/// A point in mesh space
pub type WorldPoint = Point3<Real>;

/// A vector in mesh space
pub type WorldVector = Vector3<Real>;

/// A texture coordinate; `x` is U, `y` is V.
pub type Texcoord = Point2<Real>;
