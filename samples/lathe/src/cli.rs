use std::{path::PathBuf, str::FromStr};

use clap::ValueHint;
use nalgebra::Vector3;
use spindle::Subdivisions;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Surface the splats are scattered over.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Target {
    /// The unit sphere about the origin
    Sphere,
    /// The XZ plane, facing +Y
    Floor,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Sphere => f.write_str("sphere"),
            Target::Floor => f.write_str("floor"),
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,spindle=info,hedron=info,lathe=info",
        env = "LATHE_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Sweep a profile curve into a surface of revolution
    Revolve {
        /// Profile curve file
        #[arg(value_hint = ValueHint::FilePath)]
        curve: PathBuf,
        /// Number of angular steps around the axis
        #[arg(short, long, default_value_t = Subdivisions::default())]
        subdivisions: Subdivisions,
        /// Where to write the result, as OBJ
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: PathBuf,
    },
    /// Scatter decal splats over a surface
    Splatter {
        /// Number of impacts
        #[arg(short, long, default_value_t = 1000)]
        count: usize,
        /// Random seed, for both impacts and splat placement
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(short, long, default_value_t = Target::Sphere)]
        target: Target,
        /// Distance from a splat's center to its corners
        #[arg(long)]
        radius: Option<f32>,
        /// Largest offset of a splat along its surface normal
        #[arg(long)]
        jitter: Option<f32>,
        /// Scaling applied to impact positions
        #[arg(long, default_value = "1,1,1", value_parser = parse_vec3::<f32>, value_name = "X,Y,Z")]
        scale: Vector3<f32>,
        /// Directory to write one OBJ per buffer into
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        output_dir: PathBuf,
    },
    /// Report the contents of OBJ files
    Inspect {
        #[arg(num_args = 1.., required = true, value_hint = ValueHint::FilePath)]
        files: Vec<PathBuf>,
    },
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || {
        split
            .next()
            .ok_or_else(|| format!("expected three comma-separated values, found {s:?}"))
    };
    let x = R::from_str(next()?.trim())?;
    let y = R::from_str(next()?.trim())?;
    let z = R::from_str(next()?.trim())?;
    Ok(nalgebra::vector![x, y, z])
}

/// Set up pretty log output
pub(crate) fn initialize_tracing(log_filter: &str, log_format: LogFormat) {
    let tsub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::OffsetTime::new(
            time::UtcOffset::current_local_offset().unwrap_or_else(|e| {
                tracing::warn!("couldn't get local time offset: {:?}", e);
                time::UtcOffset::UTC
            }),
            time::macros::format_description!("[hour]:[minute]:[second]"),
        ))
        .with_thread_ids(true)
        .with_thread_names(true)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
}
