//! Owned and borrowed snapshots of indexed triangle geometry.

use spindle_common::ArrayIndex;

use crate::{buffer::BufferError, Texcoord, WorldPoint, WorldVector};

/// Check the [GeometryBuffer](crate::GeometryBuffer) invariants against a set of arrays.
fn validate<Idx: ArrayIndex>(
    positions: &[WorldPoint],
    normals: &[WorldVector],
    texcoords: &[Texcoord],
    indices: &[Idx],
) -> Result<(), BufferError> {
    if positions.len() != normals.len() || positions.len() != texcoords.len() {
        return Err(BufferError::LengthMismatch {
            positions: positions.len(),
            normals: normals.len(),
            texcoords: texcoords.len(),
        });
    }
    if indices.len() % 3 != 0 {
        return Err(BufferError::IncompleteTriangle(indices.len()));
    }
    let live = positions.len();
    match indices.iter().map(|i| i.as_usize()).find(|&i| i >= live) {
        Some(index) => Err(BufferError::DanglingIndex { index, live }),
        None => Ok(()),
    }
}

/// A borrowed, self-consistent snapshot of the live portion of a
/// [GeometryBuffer](crate::GeometryBuffer).
///
/// The borrow ends at the next mutation of the buffer, so a view can never observe a torn
/// reallocation.
#[derive(Debug, Clone, Copy)]
pub struct MeshView<'data, Idx: ArrayIndex = u32> {
    positions: &'data [WorldPoint],
    normals: &'data [WorldVector],
    texcoords: &'data [Texcoord],
    indices: &'data [Idx],
}

impl<'data, Idx: ArrayIndex> MeshView<'data, Idx> {
    pub fn new(
        positions: &'data [WorldPoint],
        normals: &'data [WorldVector],
        texcoords: &'data [Texcoord],
        indices: &'data [Idx],
    ) -> Result<Self, BufferError> {
        validate(positions, normals, texcoords, indices)?;
        Ok(Self::from_parts_unchecked(positions, normals, texcoords, indices))
    }

    #[inline]
    pub(crate) fn from_parts_unchecked(
        positions: &'data [WorldPoint],
        normals: &'data [WorldVector],
        texcoords: &'data [Texcoord],
        indices: &'data [Idx],
    ) -> Self {
        Self {
            positions,
            normals,
            texcoords,
            indices,
        }
    }

    #[inline]
    pub fn positions(&self) -> &'data [WorldPoint] {
        self.positions
    }

    #[inline]
    pub fn normals(&self) -> &'data [WorldVector] {
        self.normals
    }

    #[inline]
    pub fn texcoords(&self) -> &'data [Texcoord] {
        self.texcoords
    }

    /// Triangle indices, three per triangle.
    #[inline]
    pub fn indices(&self) -> &'data [Idx] {
        self.indices
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
        self.positions.is_empty()
    }

    /// Iterate through each triangle's vertex indices.
    pub fn triangles(&self) -> impl Iterator<Item = [Idx; 3]> + 'data {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// The largest index referenced by any triangle.
    pub fn max_index(&self) -> Option<usize> {
        self.indices.iter().map(|i| i.as_usize()).max()
    }

    /// Unnormalized geometric normal of the `n`th triangle, following its winding
    /// (counter-clockwise front faces).
    pub fn face_normal(&self, n: usize) -> Option<WorldVector> {
        let t = self.indices.get(n * 3..n * 3 + 3)?;
        let [a, b, c] = [t[0], t[1], t[2]].map(|i| self.positions[i.as_usize()]);
        Some((b - a).cross(&(c - a)))
    }

    pub fn to_mesh(&self) -> Mesh<Idx> {
        Mesh::from_parts_unchecked(
            self.positions.to_vec(),
            self.normals.to_vec(),
            self.texcoords.to_vec(),
            self.indices.to_vec(),
        )
    }
}

/// Owned, immutable triangle geometry; e.g. a finalized splat buffer or a finished surface of
/// revolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh<Idx: ArrayIndex = u32> {
    positions: Vec<WorldPoint>,
    normals: Vec<WorldVector>,
    texcoords: Vec<Texcoord>,
    indices: Vec<Idx>,
}

impl<Idx: ArrayIndex> Mesh<Idx> {
    pub fn new(
        positions: Vec<WorldPoint>,
        normals: Vec<WorldVector>,
        texcoords: Vec<Texcoord>,
        indices: Vec<Idx>,
    ) -> Result<Self, BufferError> {
        validate(&positions, &normals, &texcoords, &indices)?;
        Ok(Self::from_parts_unchecked(positions, normals, texcoords, indices))
    }

    #[inline]
    pub(crate) fn from_parts_unchecked(
        positions: Vec<WorldPoint>,
        normals: Vec<WorldVector>,
        texcoords: Vec<Texcoord>,
        indices: Vec<Idx>,
    ) -> Self {
        Self {
            positions,
            normals,
            texcoords,
            indices,
        }
    }

    #[inline]
    pub fn view(&self) -> MeshView<'_, Idx> {
        MeshView::from_parts_unchecked(&self.positions, &self.normals, &self.texcoords, &self.indices)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Decompose into `(positions, normals, texcoords, indices)`.
    pub fn into_parts(self) -> (Vec<WorldPoint>, Vec<WorldVector>, Vec<Texcoord>, Vec<Idx>) {
        (self.positions, self.normals, self.texcoords, self.indices)
    }
}

impl<'data, Idx: ArrayIndex> From<&'data Mesh<Idx>> for MeshView<'data, Idx> {
    fn from(mesh: &'data Mesh<Idx>) -> Self {
        mesh.view()
    }
}
