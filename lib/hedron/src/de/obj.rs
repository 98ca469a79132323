//! Utilities for deserializing [Wavefront OBJ](https://paulbourke.net/dataformats/obj/) data as [Primitives](crate::Primitive).
//!
//! # Notes
//!
//! * Loading goes through [tobj] with `single_index` and `triangulate` set, so each returned
//!   primitive shares one index per vertex across all attributes, as [Primitive] requires.
//! * Material libraries are never loaded.
//! * Vertices are renumbered in order of first use by a face; vertices no face refers to are dropped.

use std::{io::BufRead, path::Path};

use nalgebra::{point, vector};

use crate::{Error, Primitive};

fn options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ..Default::default()
    }
}

/// Convert a single [tobj::Model] into a named [Primitive].
fn convert(model: tobj::Model) -> Result<(String, Primitive), Error> {
    let mesh = model.mesh;
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| point![p[0], p[1], p[2]])
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| vector![n[0], n[1], n[2]])
        .collect();
    let texcoords = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| point![t[0], t[1]])
        .collect();
    let prim = Primitive::triangles(positions, normals, texcoords, mesh.indices)?;
    tracing::trace!(
        name = model.name.as_str(),
        vertices = prim.vertex_count(),
        triangles = prim.triangle_count(),
        "read obj model"
    );
    Ok((model.name, prim))
}

/// Read every object from an OBJ document.
pub fn read<R: BufRead>(mut reader: R) -> Result<Vec<(String, Primitive)>, Error> {
    let (models, _) = tobj::load_obj_buf(&mut reader, &options(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })?;
    models.into_iter().map(convert).collect()
}

/// Read every object from an OBJ file.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<(String, Primitive)>, Error> {
    tracing::debug!(path = ?path.as_ref(), "loading obj");
    let file = std::fs::File::open(path)?;
    read(std::io::BufReader::new(file))
}
