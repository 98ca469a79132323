//! Conversion of generated geometry into [hedron] primitives, and OBJ export.

use std::{fs::File, io::{BufWriter, Write}, path::Path};

use hedron::Primitive;
use spindle_common::ArrayIndex;

use crate::{error::Error, mesh::{Mesh, MeshView}};

impl<Idx: ArrayIndex> TryFrom<MeshView<'_, Idx>> for Primitive {
    type Error = hedron::Error;
    fn try_from(mesh: MeshView<'_, Idx>) -> Result<Self, Self::Error> {
        Primitive::triangles(
            mesh.positions().to_vec(),
            mesh.normals().to_vec(),
            mesh.texcoords().to_vec(),
            mesh.indices().iter().map(|i| i.as_u32()).collect(),
        )
    }
}

impl<Idx: ArrayIndex> TryFrom<&Mesh<Idx>> for Primitive {
    type Error = hedron::Error;
    #[inline]
    fn try_from(mesh: &Mesh<Idx>) -> Result<Self, Self::Error> {
        mesh.view().try_into()
    }
}

/// Write `mesh` to `out` as a single Wavefront OBJ object called `name`.
pub fn write_obj<'data, Idx: ArrayIndex, W: Write>(
    mesh: impl Into<MeshView<'data, Idx>>,
    name: &str,
    out: W,
) -> Result<(), Error> {
    let prim = Primitive::try_from(mesh.into())?;
    hedron::ser::obj::write(&prim, name, out)?;
    Ok(())
}

/// Write `mesh` to a new OBJ file at `path`, named after the file's stem.
pub fn save_obj<'data, Idx: ArrayIndex>(
    mesh: impl Into<MeshView<'data, Idx>>,
    path: impl AsRef<Path>,
) -> Result<(), Error> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "mesh".to_owned());
    tracing::debug!(?path, "exporting mesh");
    let file = File::create(path).map_err(hedron::Error::from)?;
    write_obj(mesh, &name, BufWriter::new(file))
}
