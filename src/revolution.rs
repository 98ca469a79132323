//! Surfaces of revolution.
//!
//! A [ProfileCurve] in the XY plane is swept about the Y axis in `S` equal steps. The profile is
//! repeated once per band, `S + 1` times in all: the last band sits at a full turn, on top of
//! the first, so that the texture seam gets its own vertices (`u = 0` there, `u = 1` on band 0).
//!
//! # Layout
//!
//! With `P` profile points:
//!
//! * vertex `i + P·s` is profile point `i` rotated by `θₛ = 2π·s/S`
//! * each quad between bands `s` and `s + 1` and profile points `i` and `i + 1` has corners
//!   `c1 = i + P·s`, `c2 = c1 + P`, `c3 = c2 + 1`, `c4 = c1 + 1`, and is split into the
//!   counter-clockwise triangles `(c1, c4, c3)` and `(c1, c3, c2)`
//! * `P·(S + 1)` vertices and `2·(P − 1)·S` triangles in total

use std::{f32::consts::TAU, fmt, num::NonZeroU32, str::FromStr};

use nalgebra::{distance, Point2, Vector3};
use spindle_common::ArrayIndex;

use crate::{
    buffer::{BufferError, GeometryBuffer},
    curve::ProfileCurve,
    error::Error,
    mesh::Mesh,
    sink::MeshSink,
    Real, Texcoord, WorldPoint, WorldVector,
};

/// Number of angular steps in a sweep. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subdivisions(NonZeroU32);

impl Subdivisions {
    /// Subdivision count used when none is given.
    pub const DEFAULT: NonZeroU32 = match NonZeroU32::new(16) {
        Some(n) => n,
        None => unreachable!(),
    };

    pub fn new(count: u32) -> Result<Self, Error> {
        NonZeroU32::new(count).map(Self).ok_or(Error::ZeroSubdivisions)
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Subdivisions {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl TryFrom<u32> for Subdivisions {
    type Error = Error;
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl FromStr for Subdivisions {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let count = s.trim().parse::<u32>().map_err(|e| e.to_string())?;
        Self::new(count).map_err(|e| e.to_string())
    }
}

impl fmt::Display for Subdivisions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Measurements of the profile, taken while building.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RevolutionStats {
    /// Lowest profile height.
    pub min_height: Real,
    /// Highest profile height.
    pub max_height: Real,
    /// Length of the profile polyline.
    pub arc_length: Real,
    pub vertices: usize,
    pub triangles: usize,
}

/// A finished surface of revolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Revolution<Idx: ArrayIndex = u32> {
    pub mesh: Mesh<Idx>,
    pub stats: RevolutionStats,
}

/// Sweeps [ProfileCurves](ProfileCurve) into closed surfaces of revolution.
///
/// Holds nothing but the subdivision count; every build recomputes everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevolutionBuilder {
    subdivisions: Subdivisions,
}

/// Rotate `v` about +Y, given the sine and cosine of the angle.
#[inline]
fn rotate_y(v: &WorldVector, sin: Real, cos: Real) -> WorldVector {
    Vector3::new(v.x * cos + v.z * sin, v.y, v.z * cos - v.x * sin)
}

/// Unrotated outward normal of each profile point: the difference between its neighbors (or
/// between itself and its only neighbor, at either end), crossed with +Z.
fn profile_normals(points: &[Point2<Real>]) -> Vec<WorldVector> {
    let last = points.len() - 1;
    (0..points.len())
        .map(|i| {
            let (before, after) = match i {
                0 => (0, 1),
                i if i == last => (last - 1, last),
                i => (i - 1, i + 1),
            };
            let tangent = points[before] - points[after];
            Vector3::new(tangent.x, tangent.y, 0.0)
                .try_normalize(Real::EPSILON)
                .unwrap_or_else(Vector3::zeros)
                .cross(&Vector3::z())
        })
        .collect()
}

impl RevolutionBuilder {
    pub fn new(subdivisions: Subdivisions) -> Self {
        Self { subdivisions }
    }

    #[inline]
    pub fn subdivisions(&self) -> Subdivisions {
        self.subdivisions
    }

    /// Change the subdivision count, returning whether it changed. Doesn't rebuild anything.
    pub fn set_subdivisions(&mut self, subdivisions: Subdivisions) -> bool {
        let changed = self.subdivisions != subdivisions;
        self.subdivisions = subdivisions;
        changed
    }

    /// Sweep `curve` into a new mesh.
    ///
    /// Returns `Ok(None)` if `curve` doesn't [meet its minimum](ProfileCurve::meets_minimum).
    ///
    /// # Errors
    ///
    /// * [BufferError::IndexOverflow] if the result has more vertices than `Idx` can address
    #[tracing::instrument(level = "debug", skip(self, curve), fields(points = curve.len(), subdivisions = self.subdivisions.get()))]
    pub fn build<Idx: ArrayIndex>(
        &self,
        curve: &ProfileCurve,
    ) -> Result<Option<Revolution<Idx>>, Error> {
        if !curve.meets_minimum() {
            tracing::warn!(
                mode = %curve.mode(),
                declared = curve.declared_points(),
                points = curve.len(),
                "profile curve has too few points; nothing built"
            );
            return Ok(None);
        }

        let profile = curve.points();
        let p = profile.len();
        let s_count = self.subdivisions.get() as usize;
        let vertex_count = (s_count + 1)
            .checked_mul(p)
            .filter(|&n| n <= Idx::max_len())
            .ok_or(BufferError::IndexOverflow {
                vertices: p.saturating_mul(s_count + 1),
                max: Idx::max_len(),
            })?;
        let triangle_count = 2 * (p - 1) * s_count;

        // measured once, on the unrotated profile
        let mut stats = RevolutionStats {
            min_height: Real::INFINITY,
            max_height: Real::NEG_INFINITY,
            arc_length: 0.0,
            vertices: vertex_count,
            triangles: triangle_count,
        };
        let mut arc = Vec::with_capacity(p);
        for (i, point) in profile.iter().enumerate() {
            stats.min_height = stats.min_height.min(point.y);
            stats.max_height = stats.max_height.max(point.y);
            if i > 0 {
                stats.arc_length += distance(&profile[i - 1], point);
            }
            arc.push(stats.arc_length);
        }
        let normals = profile_normals(profile);

        let mut positions = Vec::with_capacity(vertex_count);
        let mut vertex_normals = Vec::with_capacity(vertex_count);
        let mut texcoords = Vec::with_capacity(vertex_count);
        for s in 0..=s_count {
            let turn = s as Real / s_count as Real;
            let (sin, cos) = (turn * TAU).sin_cos();
            let u = 1.0 - turn;
            for ((point, normal), &length) in profile.iter().zip(&normals).zip(&arc) {
                let v = if stats.arc_length > 0.0 {
                    length / stats.arc_length
                } else {
                    0.0
                };
                positions.push(WorldPoint::from(rotate_y(
                    &Vector3::new(point.x, point.y, 0.0),
                    sin,
                    cos,
                )));
                vertex_normals.push(rotate_y(normal, sin, cos));
                texcoords.push(Texcoord::new(u, v));
            }
        }

        // every index is < vertex_count, which was checked against Idx above
        let idx = |i: usize| Idx::from_usize(i).unwrap_or_else(Idx::max_value);
        let mut indices = Vec::with_capacity(triangle_count * 3);
        for s in 0..s_count {
            for i in 0..p - 1 {
                let c1 = i + p * s;
                let c2 = c1 + p;
                let c3 = c2 + 1;
                let c4 = c1 + 1;
                indices.extend([c1, c4, c3, c1, c3, c2].map(idx));
            }
        }

        tracing::debug!(
            vertices = vertex_count,
            triangles = triangle_count,
            "built surface of revolution"
        );
        Ok(Some(Revolution {
            mesh: Mesh::new(positions, vertex_normals, texcoords, indices)?,
            stats,
        }))
    }

    /// Sweep `curve`, replace the contents of `buffer` with the result, and publish it to `sink`.
    ///
    /// If `curve` has too few points, `buffer` is left untouched, nothing is published, and
    /// `Ok(None)` is returned.
    pub fn rebuild<Idx: ArrayIndex, S: MeshSink<Idx> + ?Sized>(
        &self,
        curve: &ProfileCurve,
        buffer: &mut GeometryBuffer<Idx>,
        sink: &mut S,
    ) -> Result<Option<RevolutionStats>, Error> {
        match self.build(curve)? {
            None => Ok(None),
            Some(Revolution { mesh, stats }) => {
                buffer.replace(mesh);
                buffer.publish(sink);
                Ok(Some(stats))
            }
        }
    }
}
