//! Decal quads appended at surface impact points.
//!
//! Every call to [SplatEmitter::add_splat] appends one four-vertex quad to a live
//! [GeometryBuffer] and republishes it. The buffer starts sized for
//! [initial_max_splats](SplatConfig::initial_max_splats) quads and doubles whenever it fills, up
//! to the finalization limit; once it holds [max_max_splats](SplatConfig::max_max_splats) quads it's frozen into a
//! separate [Mesh] and a fresh buffer takes its place.

use std::f32::consts::TAU;

use rand::Rng;
use spindle_common::ArrayIndex;

use crate::{
    buffer::{Capacity, GeometryBuffer},
    error::Error,
    frame::Frame,
    mesh::Mesh,
    sink::MeshSink,
    Real, Texcoord, WorldPoint, WorldVector,
};

/// Vertices in a single splat.
pub const VERTICES_PER_SPLAT: usize = 4;

/// Triangles in a single splat, fanned from its first vertex.
pub const TRIANGLES_PER_SPLAT: usize = VERTICES_PER_SPLAT - 2;

/// Texture-space corners of a splat's atlas cell, per vertex: `(u, upper row edge?)`.
const CELL_CORNERS: [(Real, bool); VERTICES_PER_SPLAT] =
    [(0.0, false), (1.0, false), (1.0, true), (0.0, true)];

/// Tunables for a [SplatEmitter].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatConfig {
    /// Distance from a splat's center to each of its corners.
    pub vertex_radius: Real,
    /// Upper bound of the random offset along the surface normal, used to keep overlapping
    /// splats from z-fighting.
    pub max_jitter_distance: Real,
    /// Number of texture variants, stacked vertically in the atlas.
    pub atlas_rows: u32,
    /// Number of splats the buffer is first sized for. Capacity doubles from here.
    pub initial_max_splats: usize,
    /// Number of splats after which the buffer is finalized.
    pub max_max_splats: usize,
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            vertex_radius: 0.8,
            max_jitter_distance: 0.05,
            atlas_rows: 6,
            initial_max_splats: 64,
            max_max_splats: 4096,
        }
    }
}

impl SplatConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if !(self.vertex_radius.is_finite() && self.vertex_radius > 0.0) {
            return Err(Error::InvalidConfig("vertex radius must be finite and positive"));
        }
        if !(self.max_jitter_distance.is_finite() && self.max_jitter_distance >= 0.0) {
            return Err(Error::InvalidConfig("jitter distance must be finite and non-negative"));
        }
        if self.atlas_rows == 0 {
            return Err(Error::InvalidConfig("atlas must have at least one row"));
        }
        if self.initial_max_splats == 0 {
            return Err(Error::InvalidConfig("initial splat capacity must be positive"));
        }
        if self.initial_max_splats > self.max_max_splats {
            return Err(Error::InvalidConfig(
                "initial splat capacity must not exceed the finalization limit",
            ));
        }
        Ok(())
    }

    /// Buffer capacity for `splats` splats.
    #[inline]
    pub fn capacity_for(splats: usize) -> Capacity {
        Capacity::for_polygons(splats * VERTICES_PER_SPLAT, VERTICES_PER_SPLAT)
    }
}

/// A decal quad, as placed by [SplatEmitter::add_splat].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splat {
    /// Center of the quad, after jitter.
    pub origin: WorldPoint,
    /// Unit normal of the quad; the impact normal, normalized.
    pub normal: WorldVector,
    /// Random offset applied along `normal`.
    pub jitter_distance: Real,
    /// Random rotation about `normal`, in radians.
    pub roll: Real,
    /// Atlas row the quad samples.
    pub atlas_row: u32,
    /// Index of the quad's first vertex within the buffer it was appended to.
    pub base_vertex: usize,
}

/// Buffer management performed after appending a splat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    None,
    /// The buffer filled up and was doubled to hold `capacity` splats.
    Grew { capacity: usize },
    /// The buffer reached the finalization limit; its `splats` splats were frozen and a fresh
    /// buffer was started.
    Finalized { splats: usize },
}

/// Result of [SplatEmitter::add_splat].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplatOutcome {
    pub splat: Splat,
    pub action: PolicyAction,
}

/// Lifetime counters of a [SplatEmitter].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EmitterStats {
    pub splats: u64,
    pub grows: u64,
    pub finalizations: u64,
}

/// Builds a growing mesh of decal quads from impact events.
///
/// The emitter owns its buffer, its random source, and the [MeshSink] it republishes to; impact
/// sources are expected to hold (or be handed) the emitter and call
/// [add_splat](Self::add_splat) directly.
#[derive(Debug)]
pub struct SplatEmitter<R: Rng, S: MeshSink<Idx>, Idx: ArrayIndex = u32> {
    config: SplatConfig,
    buffer: GeometryBuffer<Idx>,
    rng: R,
    sink: S,
    splat_count: usize,
    max_splats: usize,
    frozen: Vec<Mesh<Idx>>,
    stats: EmitterStats,
}

impl<R: Rng, S: MeshSink<Idx>, Idx: ArrayIndex> SplatEmitter<R, S, Idx> {
    /// Construct an emitter and publish its (empty) buffer to `sink`.
    pub fn new(config: SplatConfig, rng: R, mut sink: S) -> Result<Self, Error> {
        config.validate()?;
        // growth stops at `max_max_splats`, so this is the largest buffer we'll ever build
        let largest = config
            .max_max_splats
            .checked_mul(VERTICES_PER_SPLAT)
            .unwrap_or(usize::MAX);
        if largest > Idx::max_len() {
            return Err(crate::BufferError::IndexOverflow {
                vertices: largest,
                max: Idx::max_len(),
            }
            .into());
        }
        let buffer = GeometryBuffer::new(SplatConfig::capacity_for(config.initial_max_splats))?;
        buffer.publish(&mut sink);
        Ok(Self {
            max_splats: config.initial_max_splats,
            config,
            buffer,
            rng,
            sink,
            splat_count: 0,
            frozen: Vec::new(),
            stats: EmitterStats::default(),
        })
    }

    #[inline]
    pub fn config(&self) -> &SplatConfig {
        &self.config
    }

    /// Number of splats in the live buffer.
    #[inline]
    pub fn splat_count(&self) -> usize {
        self.splat_count
    }

    /// Number of splats the live buffer currently has room for.
    #[inline]
    pub fn max_splats(&self) -> usize {
        self.max_splats
    }

    #[inline]
    pub fn buffer(&self) -> &GeometryBuffer<Idx> {
        &self.buffer
    }

    /// Finalized buffers, oldest first.
    #[inline]
    pub fn frozen(&self) -> &[Mesh<Idx>] {
        &self.frozen
    }

    /// Take ownership of all finalized buffers.
    pub fn take_frozen(&mut self) -> Vec<Mesh<Idx>> {
        std::mem::take(&mut self.frozen)
    }

    #[inline]
    pub fn stats(&self) -> EmitterStats {
        self.stats
    }

    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[inline]
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Decompose into the live buffer, finalized meshes, and sink.
    pub fn into_parts(self) -> (GeometryBuffer<Idx>, Vec<Mesh<Idx>>, S) {
        (self.buffer, self.frozen, self.sink)
    }

    /// Append a decal quad at `point`, facing along the surface `normal`.
    ///
    /// `normal` must be non-zero; it need not be normalized.
    #[tracing::instrument(level = "trace", skip(self), fields(splat = self.splat_count))]
    pub fn add_splat(
        &mut self,
        point: WorldPoint,
        normal: WorldVector,
    ) -> Result<SplatOutcome, Error> {
        let mut frame = Frame::looking_along(point, &normal);
        let jitter_distance = self.rng.gen::<Real>() * self.config.max_jitter_distance;
        let roll = self.rng.gen::<Real>() * TAU;
        frame.advance(jitter_distance);
        frame.roll(roll);

        let atlas_row = self.rng.gen_range(0..self.config.atlas_rows);
        let rows = self.config.atlas_rows as Real;
        let v_low = atlas_row as Real / rows;
        let v_high = (atlas_row + 1) as Real / rows;

        let splat = Splat {
            origin: frame.position(),
            normal: frame.forward(),
            jitter_distance,
            roll,
            atlas_row,
            base_vertex: self.buffer.vertex_count(),
        };

        let step = TAU / VERTICES_PER_SPLAT as Real;
        let mut corners = [Idx::zero(); VERTICES_PER_SPLAT];
        for (corner, &(u, upper)) in corners.iter_mut().zip(CELL_CORNERS.iter()) {
            frame.roll(step);
            *corner = self.buffer.push_vertex(
                frame.position() + frame.up() * self.config.vertex_radius,
                splat.normal,
                Texcoord::new(u, if upper { v_high } else { v_low }),
            )?;
        }
        for i in 0..TRIANGLES_PER_SPLAT {
            self.buffer
                .push_triangle([corners[0], corners[i + 1], corners[i + 2]])?;
        }

        self.splat_count += 1;
        self.stats.splats += 1;
        tracing::trace!(atlas_row, base_vertex = splat.base_vertex, "appended splat");
        self.buffer.publish(&mut self.sink);

        let action = if self.splat_count == self.config.max_max_splats {
            self.finalize()
        } else if self.splat_count == self.max_splats {
            self.grow()?
        } else {
            PolicyAction::None
        };
        Ok(SplatOutcome { splat, action })
    }

    /// Double the splat capacity, never past the finalization limit.
    fn grow(&mut self) -> Result<PolicyAction, Error> {
        let next = self
            .max_splats
            .saturating_mul(2)
            .min(self.config.max_max_splats);
        self.buffer.reserve(SplatConfig::capacity_for(next))?;
        self.max_splats = next;
        self.stats.grows += 1;
        tracing::debug!(capacity = self.max_splats, "expanded splat buffer");
        Ok(PolicyAction::Grew {
            capacity: self.max_splats,
        })
    }

    /// Freeze the live buffer and start over at the initial capacity.
    fn finalize(&mut self) -> PolicyAction {
        let splats = self.splat_count;
        let mesh = self.buffer.detach();
        self.sink.retire(&mesh);
        self.frozen.push(mesh);
        self.splat_count = 0;
        self.max_splats = self.config.initial_max_splats;
        self.stats.finalizations += 1;
        tracing::debug!(splats, frozen = self.frozen.len(), "finalized splat buffer");
        self.buffer.publish(&mut self.sink);
        PolicyAction::Finalized { splats }
    }
}
