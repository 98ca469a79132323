//! # See Also
//!
//! * [Wavefront OBJ](https://paulbourke.net/dataformats/obj/)

use nalgebra::{Point2, Point3, Vector3};

use crate::Error;

pub type Position = Point3<f32>;
pub type Normal = Vector3<f32>;
pub type Texcoord = Point2<f32>; // obj: f32 only

/// Per-vertex attributes stored by a [Primitive].
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeUsage {
    Position,
    Normal,
    Texcoord,
}

/// A single drawable piece of a mesh, as an indexed triangle list.
///
/// # Invariants
///
/// * `normals` and `texcoords` are either empty or exactly as long as `positions`
/// * `indices.len() % 3 == 0`
/// * every index is `< positions.len()`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Primitive {
    /// Indices of each vertex within each attribute, three per triangle
    indices: Vec<u32>,
    positions: Vec<Position>,
    normals: Vec<Normal>,
    texcoords: Vec<Texcoord>,
}

impl Primitive {
    /// Construct an indexed triangle-list primitive, checking attribute lengths and indices.
    pub fn triangles(
        positions: Vec<Position>,
        normals: Vec<Normal>,
        texcoords: Vec<Texcoord>,
        indices: Vec<u32>,
    ) -> Result<Self, Error> {
        let vertices = positions.len();
        for (attribute, actual) in [
            (AttributeUsage::Normal, normals.len()),
            (AttributeUsage::Texcoord, texcoords.len()),
        ] {
            if actual != 0 && actual != vertices {
                return Err(Error::AttributeLength {
                    attribute,
                    expected: vertices,
                    actual,
                });
            }
        }
        if indices.len() % 3 != 0 {
            return Err(Error::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(Error::IndexOutOfRange { index, vertices });
        }
        Ok(Self {
            indices,
            positions,
            normals,
            texcoords,
        })
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    pub fn texcoords(&self) -> &[Texcoord] {
        &self.texcoords
    }

    pub fn has_attr(&self, attr: AttributeUsage) -> bool {
        match attr {
            AttributeUsage::Position => true,
            AttributeUsage::Normal => !self.normals.is_empty(),
            AttributeUsage::Texcoord => !self.texcoords.is_empty(),
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

    /// Iterate through each triangle's vertex indices.
    pub fn iter_triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
