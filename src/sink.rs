//! Consumers of published geometry.

use spindle_common::ArrayIndex;

use crate::mesh::{Mesh, MeshView};

/// Receives geometry each time an engine mutates its buffer; e.g. a renderer uploading vertex
/// data, or a tool persisting it.
///
/// A published [MeshView] is only valid for the duration of the call. Implementors which need
/// the data afterwards must copy it.
pub trait MeshSink<Idx: ArrayIndex = u32> {
    /// Replace whatever this sink displays for the publishing buffer with `mesh`.
    fn publish(&mut self, mesh: MeshView<'_, Idx>);

    /// The publishing buffer was finalized: `mesh` is now frozen, and later publications describe
    /// a new, separate buffer.
    fn retire(&mut self, mesh: &Mesh<Idx>) {
        let _ = mesh;
    }
}

impl<Idx: ArrayIndex, S: MeshSink<Idx> + ?Sized> MeshSink<Idx> for &mut S {
    #[inline]
    fn publish(&mut self, mesh: MeshView<'_, Idx>) {
        (**self).publish(mesh)
    }

    #[inline]
    fn retire(&mut self, mesh: &Mesh<Idx>) {
        (**self).retire(mesh)
    }
}

impl<Idx: ArrayIndex, S: MeshSink<Idx> + ?Sized> MeshSink<Idx> for Box<S> {
    #[inline]
    fn publish(&mut self, mesh: MeshView<'_, Idx>) {
        (**self).publish(mesh)
    }

    #[inline]
    fn retire(&mut self, mesh: &Mesh<Idx>) {
        (**self).retire(mesh)
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl<Idx: ArrayIndex> MeshSink<Idx> for NullSink {
    #[inline]
    fn publish(&mut self, _: MeshView<'_, Idx>) {}
}

/// Summary of a single publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Publication {
    pub vertices: usize,
    pub triangles: usize,
    /// Largest index referenced by a triangle, if there are any triangles.
    pub max_index: Option<usize>,
}

impl Publication {
    /// Whether every triangle index referred to a live vertex.
    #[inline]
    pub fn is_consistent(&self) -> bool {
        self.max_index.map_or(true, |i| i < self.vertices)
    }
}

impl<Idx: ArrayIndex> From<MeshView<'_, Idx>> for Publication {
    fn from(mesh: MeshView<'_, Idx>) -> Self {
        Self {
            vertices: mesh.vertex_count(),
            triangles: mesh.triangle_count(),
            max_index: mesh.max_index(),
        }
    }
}

/// Records a [Publication] summary of everything it receives, and keeps a copy of each retired
/// mesh if asked to.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink<Idx: ArrayIndex = u32> {
    pub publications: Vec<Publication>,
    pub retired: Vec<Publication>,
    /// Copies of retired meshes; only filled when [keep_retired](Self::keep_retired) is set.
    pub retired_meshes: Vec<Mesh<Idx>>,
    pub keep_retired: bool,
}

impl<Idx: ArrayIndex> RecordingSink<Idx> {
    pub fn new() -> Self {
        Self {
            publications: Vec::new(),
            retired: Vec::new(),
            retired_meshes: Vec::new(),
            keep_retired: false,
        }
    }

    /// A sink which also stores a copy of every retired mesh.
    pub fn keeping_retired() -> Self {
        Self {
            keep_retired: true,
            ..Self::new()
        }
    }

    #[inline]
    pub fn last(&self) -> Option<&Publication> {
        self.publications.last()
    }
}

impl<Idx: ArrayIndex> MeshSink<Idx> for RecordingSink<Idx> {
    fn publish(&mut self, mesh: MeshView<'_, Idx>) {
        self.publications.push(mesh.into());
    }

    fn retire(&mut self, mesh: &Mesh<Idx>) {
        self.retired.push(mesh.view().into());
        if self.keep_retired {
            self.retired_meshes.push(mesh.clone());
        }
    }
}
