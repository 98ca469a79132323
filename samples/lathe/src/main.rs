use std::path::{Path, PathBuf};

use clap::Parser;
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};
use spindle::{
    export, Capacity, GeometryBuffer, MeshSink, MeshView, PolicyAction, ProfileCurve,
    RevolutionBuilder, SplatConfig, SplatEmitter, Subdivisions, WorldPoint, WorldVector,
};

mod cli;
use cli::{Cli, Command, Target};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Spindle(#[from] spindle::Error),
    #[error(transparent)]
    Curve(#[from] spindle::CurveError),
    #[error(transparent)]
    Buffer(#[from] spindle::BufferError),
    #[error(transparent)]
    Hedron(#[from] hedron::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{path:?}: profile curve has too few points to revolve")]
    CurveTooShort { path: PathBuf },
}

/// Logs each publication; stands in for a renderer's upload.
#[derive(Debug, Default)]
struct LogSink {
    publications: usize,
}

impl MeshSink for LogSink {
    fn publish(&mut self, mesh: MeshView<'_>) {
        self.publications += 1;
        tracing::trace!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "mesh published"
        );
    }

    fn retire(&mut self, mesh: &spindle::Mesh) {
        tracing::info!(vertices = mesh.vertex_count(), "buffer retired");
    }
}

fn revolve(curve_path: &Path, subdivisions: Subdivisions, output: &Path) -> Result<(), CliError> {
    let curve = ProfileCurve::load(curve_path)?;
    let builder = RevolutionBuilder::new(subdivisions);
    let mut buffer = GeometryBuffer::<u32>::new(Capacity::default())?;
    let mut sink = LogSink::default();
    let stats = builder
        .rebuild(&curve, &mut buffer, &mut sink)?
        .ok_or_else(|| CliError::CurveTooShort {
            path: curve_path.to_owned(),
        })?;
    tracing::info!(
        vertices = stats.vertices,
        triangles = stats.triangles,
        height = stats.max_height - stats.min_height,
        arc_length = stats.arc_length,
        "revolved {:?}",
        curve_path
    );
    export::save_obj(buffer.view(), output)?;
    tracing::info!(?output, "wrote mesh");
    Ok(())
}

/// A random point on `target`, with the surface normal there.
fn impact(rng: &mut impl Rng, target: Target, scale: &Vector3<f32>) -> (WorldPoint, WorldVector) {
    match target {
        Target::Sphere => loop {
            let v = nalgebra::vector![
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0)
            ];
            if let Some(n) = v.try_normalize(1.0e-3) {
                return (WorldPoint::from(n.component_mul(scale)), n);
            }
        },
        Target::Floor => {
            let p = nalgebra::point![rng.gen_range(-1.0..1.0), 0.0, rng.gen_range(-1.0..1.0)];
            (
                WorldPoint::from(p.coords.component_mul(scale)),
                WorldVector::y(),
            )
        }
    }
}

struct Splatter {
    count: usize,
    seed: u64,
    target: Target,
    radius: Option<f32>,
    jitter: Option<f32>,
    scale: Vector3<f32>,
    output_dir: PathBuf,
}

fn splatter(args: Splatter) -> Result<(), CliError> {
    let defaults = SplatConfig::default();
    let config = SplatConfig {
        vertex_radius: args.radius.unwrap_or(defaults.vertex_radius),
        max_jitter_distance: args.jitter.unwrap_or(defaults.max_jitter_distance),
        ..defaults
    };
    let mut impacts = StdRng::seed_from_u64(args.seed);
    let mut emitter: SplatEmitter<_, _> = SplatEmitter::new(
        config,
        StdRng::seed_from_u64(args.seed.wrapping_add(1)),
        LogSink::default(),
    )?;
    for _ in 0..args.count {
        let (point, normal) = impact(&mut impacts, args.target, &args.scale);
        if let PolicyAction::Grew { capacity } = emitter.add_splat(point, normal)?.action {
            tracing::debug!(capacity, "splat buffer grew");
        }
    }

    std::fs::create_dir_all(&args.output_dir)?;
    let stats = emitter.stats();
    let (buffer, frozen, sink) = emitter.into_parts();
    for (i, mesh) in frozen.iter().enumerate() {
        export::save_obj(mesh, args.output_dir.join(format!("splats-{i}.obj")))?;
    }
    if !buffer.is_empty() {
        export::save_obj(buffer.view(), args.output_dir.join("splats-live.obj"))?;
    }
    tracing::info!(
        splats = stats.splats,
        grows = stats.grows,
        finalized = stats.finalizations,
        publications = sink.publications,
        dir = ?args.output_dir,
        "wrote splat meshes"
    );
    Ok(())
}

fn inspect(files: &[PathBuf]) -> Result<(), CliError> {
    for path in files {
        for (name, prim) in hedron::de::obj::load(path)? {
            println!(
                "{}: {name}: {} vertices, {} triangles",
                path.display(),
                prim.vertex_count(),
                prim.triangle_count()
            );
        }
    }
    Ok(())
}

pub fn main() -> Result<(), CliError> {
    let args = Cli::parse();
    cli::initialize_tracing(&args.log_filter, args.log_format);

    match args.command {
        Command::Revolve {
            curve,
            subdivisions,
            output,
        } => revolve(&curve, subdivisions, &output),
        Command::Splatter {
            count,
            seed,
            target,
            radius,
            jitter,
            scale,
            output_dir,
        } => splatter(Splatter {
            count,
            seed,
            target,
            radius,
            jitter,
            scale,
            output_dir,
        }),
        Command::Inspect { files } => inspect(&files),
    }
}
