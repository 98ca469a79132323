//! Growable storage for indexed triangle geometry.

use spindle_common::ArrayIndex;

use crate::{
    mesh::{Mesh, MeshView},
    sink::MeshSink,
    Texcoord, WorldPoint, WorldVector,
};

/// Errors related to [GeometryBuffers](GeometryBuffer).
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("vertex capacity exceeded: {capacity} vertices allocated")]
    VertexCapacityExceeded { capacity: usize },
    #[error("index capacity exceeded: {capacity} indices allocated")]
    IndexCapacityExceeded { capacity: usize },
    #[error("triangle refers to vertex {index}, but only {live} vertices are live")]
    DanglingIndex { index: usize, live: usize },
    #[error("{vertices} vertices cannot be addressed by an index type holding at most {max}")]
    IndexOverflow { vertices: usize, max: usize },
    #[error("requested capacity {requested:?} is smaller than the live contents {live:?}")]
    ShrinkBelowLive { requested: Capacity, live: Capacity },
    #[error("attribute arrays disagree: {positions} positions, {normals} normals, {texcoords} texcoords")]
    LengthMismatch {
        positions: usize,
        normals: usize,
        texcoords: usize,
    },
    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),
}

/// Allocated sizes of a [GeometryBuffer]: the number of vertices, and the number of triangle
/// indices (three per triangle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Capacity {
    pub vertices: usize,
    pub indices: usize,
}

impl Capacity {
    /// Capacity for exactly `vertices` vertices and `triangles` triangles.
    #[inline]
    pub const fn exact(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices,
            indices: triangles * 3,
        }
    }

    /// Capacity for `vertices` vertices, grouped into convex polygons of `verts_per_polygon`
    /// vertices each, each polygon fanned into `verts_per_polygon - 2` triangles.
    ///
    /// # Panics
    ///
    /// * `verts_per_polygon < 3`
    #[inline]
    pub const fn for_polygons(vertices: usize, verts_per_polygon: usize) -> Self {
        assert!(verts_per_polygon >= 3);
        Self {
            vertices,
            indices: (verts_per_polygon - 2) * (vertices / verts_per_polygon) * 3,
        }
    }

    /// Twice this capacity, or `None` on overflow.
    #[inline]
    pub fn doubled(self) -> Option<Self> {
        Some(Self {
            vertices: self.vertices.checked_mul(2)?,
            indices: self.indices.checked_mul(2)?,
        })
    }

    #[inline]
    fn contains(&self, other: &Self) -> bool {
        self.vertices >= other.vertices && self.indices >= other.indices
    }
}

/// Parallel arrays of vertex positions, normals, and texture coordinates, plus a triangle index
/// list, with an explicit allocated [Capacity].
///
/// # Invariants
///
/// * `positions`, `normals` and `texcoords` always have the same length (the live vertex count)
/// * live counts never exceed `capacity`
/// * every stored index is `<` the live vertex count
/// * growth never moves or alters live entries
#[derive(Debug, Clone)]
pub struct GeometryBuffer<Idx: ArrayIndex = u32> {
    positions: Vec<WorldPoint>,
    normals: Vec<WorldVector>,
    texcoords: Vec<Texcoord>,
    indices: Vec<Idx>,
    capacity: Capacity,
    initial: Capacity,
}

fn check_addressable<Idx: ArrayIndex>(vertices: usize) -> Result<(), BufferError> {
    if vertices > Idx::max_len() {
        Err(BufferError::IndexOverflow {
            vertices,
            max: Idx::max_len(),
        })
    } else {
        Ok(())
    }
}

impl<Idx: ArrayIndex> GeometryBuffer<Idx> {
    /// Construct an empty buffer. `initial` is also the capacity restored by [reset](Self::reset).
    pub fn new(initial: Capacity) -> Result<Self, BufferError> {
        check_addressable::<Idx>(initial.vertices)?;
        Ok(Self {
            positions: Vec::with_capacity(initial.vertices),
            normals: Vec::with_capacity(initial.vertices),
            texcoords: Vec::with_capacity(initial.vertices),
            indices: Vec::with_capacity(initial.indices),
            capacity: initial,
            initial,
        })
    }

    #[inline]
    pub fn capacity(&self) -> Capacity {
        self.capacity
    }

    #[inline]
    pub fn initial_capacity(&self) -> Capacity {
        self.initial
    }

    /// The portion of [capacity](Self::capacity) currently holding geometry.
    #[inline]
    pub fn live(&self) -> Capacity {
        Capacity {
            vertices: self.positions.len(),
            indices: self.indices.len(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.indices.is_empty()
    }

    /// Reallocate storage to `capacity`, keeping every live entry at its index.
    pub fn reserve(&mut self, capacity: Capacity) -> Result<(), BufferError> {
        let live = self.live();
        if !capacity.contains(&live) {
            return Err(BufferError::ShrinkBelowLive {
                requested: capacity,
                live,
            });
        }
        check_addressable::<Idx>(capacity.vertices)?;

        fn resize<T>(v: &mut Vec<T>, cap: usize) {
            if cap > v.capacity() {
                v.reserve_exact(cap - v.len());
            } else {
                v.shrink_to(cap);
            }
        }
        resize(&mut self.positions, capacity.vertices);
        resize(&mut self.normals, capacity.vertices);
        resize(&mut self.texcoords, capacity.vertices);
        resize(&mut self.indices, capacity.indices);
        self.capacity = capacity;
        Ok(())
    }

    /// Double the current capacity.
    pub fn grow(&mut self) -> Result<Capacity, BufferError> {
        let next = self
            .capacity
            .doubled()
            .ok_or(BufferError::IndexOverflow {
                vertices: usize::MAX,
                max: Idx::max_len(),
            })?;
        self.reserve(next)?;
        Ok(next)
    }

    /// Drop all geometry and return to the initial capacity.
    pub fn reset(&mut self) {
        self.positions = Vec::with_capacity(self.initial.vertices);
        self.normals = Vec::with_capacity(self.initial.vertices);
        self.texcoords = Vec::with_capacity(self.initial.vertices);
        self.indices = Vec::with_capacity(self.initial.indices);
        self.capacity = self.initial;
    }

    /// Move the live geometry out as an immutable [Mesh], leaving `self` [reset](Self::reset).
    pub fn detach(&mut self) -> Mesh<Idx> {
        let positions = std::mem::take(&mut self.positions);
        let normals = std::mem::take(&mut self.normals);
        let texcoords = std::mem::take(&mut self.texcoords);
        let indices = std::mem::take(&mut self.indices);
        self.reset();
        Mesh::from_parts_unchecked(positions, normals, texcoords, indices)
    }

    /// Append one vertex, returning its index.
    pub fn push_vertex(
        &mut self,
        position: WorldPoint,
        normal: WorldVector,
        texcoord: Texcoord,
    ) -> Result<Idx, BufferError> {
        let index = self.positions.len();
        if index >= self.capacity.vertices {
            return Err(BufferError::VertexCapacityExceeded {
                capacity: self.capacity.vertices,
            });
        }
        let idx = Idx::from_usize(index).ok_or(BufferError::IndexOverflow {
            vertices: index + 1,
            max: Idx::max_len(),
        })?;
        self.positions.push(position);
        self.normals.push(normal);
        self.texcoords.push(texcoord);
        Ok(idx)
    }

    /// Append one triangle. Every corner must already be a live vertex.
    pub fn push_triangle(&mut self, triangle: [Idx; 3]) -> Result<(), BufferError> {
        if self.indices.len() + 3 > self.capacity.indices {
            return Err(BufferError::IndexCapacityExceeded {
                capacity: self.capacity.indices,
            });
        }
        let live = self.positions.len();
        if let Some(index) = triangle.iter().map(|i| i.as_usize()).find(|&i| i >= live) {
            return Err(BufferError::DanglingIndex { index, live });
        }
        self.indices.extend_from_slice(&triangle);
        Ok(())
    }

    /// Replace all contents at once. The capacity becomes exactly the size of the new contents.
    pub fn replace(&mut self, mesh: Mesh<Idx>) {
        let (positions, normals, texcoords, indices) = mesh.into_parts();
        self.capacity = Capacity {
            vertices: positions.len(),
            indices: indices.len(),
        };
        self.positions = positions;
        self.normals = normals;
        self.texcoords = texcoords;
        self.indices = indices;
    }

    /// Borrow the live geometry.
    #[inline]
    pub fn view(&self) -> MeshView<'_, Idx> {
        MeshView::from_parts_unchecked(&self.positions, &self.normals, &self.texcoords, &self.indices)
    }

    /// Copy the live geometry into an owned [Mesh].
    pub fn freeze(&self) -> Mesh<Idx> {
        self.view().to_mesh()
    }

    /// Hand the live geometry to `sink`.
    #[inline]
    pub fn publish<S: MeshSink<Idx> + ?Sized>(&self, sink: &mut S) {
        sink.publish(self.view());
    }
}
