//! Utilities for serializing [Primitives](crate::Primitive) as [Wavefront OBJ](https://paulbourke.net/dataformats/obj/).
//!
//! # Notes
//!
//! * Coordinate system: right-handed, counter-clockwise front faces; the same as is used elsewhere in this library.
//! * OBJ indices are 1-based, and each face corner refers to its position, texcoord, and normal
//!   separately (`v/vt/vn`). Since a [Primitive] shares one index across all attributes, every
//!   corner is written as `i/i/i` (or `i//i`, `i/i`, `i` when attributes are missing).
//! * Floats are written with [Display](std::fmt::Display), which round-trips exactly.

use std::io::Write;

use crate::{AttributeUsage, Error, Primitive};

/// Write `prim` as a single named OBJ object.
#[tracing::instrument(skip(prim, out), fields(vertices = prim.vertex_count(), triangles = prim.triangle_count()))]
pub fn write<W: Write>(prim: &Primitive, name: &str, mut out: W) -> Result<(), Error> {
    writeln!(out, "# {}", super::GENERATOR_ID)?;
    writeln!(out, "o {name}")?;
    for p in prim.positions() {
        writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for t in prim.texcoords() {
        writeln!(out, "vt {} {}", t.x, t.y)?;
    }
    for n in prim.normals() {
        writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
    }

    let corner: fn(u32) -> String = match (
        prim.has_attr(AttributeUsage::Texcoord),
        prim.has_attr(AttributeUsage::Normal),
    ) {
        (true, true) => |i: u32| format!("{i}/{i}/{i}"),
        (false, true) => |i: u32| format!("{i}//{i}"),
        (true, false) => |i: u32| format!("{i}/{i}"),
        (false, false) => |i: u32| format!("{i}"),
    };
    for [a, b, c] in prim.iter_triangles() {
        writeln!(
            out,
            "f {} {} {}",
            corner(a + 1),
            corner(b + 1),
            corner(c + 1)
        )?;
    }
    out.flush()?;
    tracing::trace!("wrote obj primitive");
    Ok(())
}

/// Serialize `prim` as an OBJ document held in memory.
pub fn to_string(prim: &Primitive, name: &str) -> Result<String, Error> {
    let mut out = Vec::new();
    write(prim, name, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
