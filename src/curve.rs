//! Profile curves: the 2D polylines swept by a [RevolutionBuilder](crate::RevolutionBuilder).
//!
//! # File Format
//!
//! Plain text, one record per line:
//!
//! ```text
//! <mode> <declared point count>
//! <x> <y>
//! <x> <y>
//! ...
//! ```
//!
//! `mode` is `0` ([CurveMode::Bezier]) or `1` ([CurveMode::Linear]). Blank lines are ignored, as
//! are any fields after the first two on a line.

use std::{
    fmt,
    io::{self, BufRead},
    path::Path,
    str::FromStr,
};

use nalgebra::Point2;

use crate::Real;

/// Errors related to reading [ProfileCurves](ProfileCurve).
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("curve data is empty; expected a `<mode> <point count>` header")]
    MissingHeader,
    #[error("line {line}: expected `<mode> <point count>`, found {text:?}")]
    MalformedHeader { line: usize, text: String },
    #[error("line {line}: unknown curve mode {mode}; expected 0 or 1")]
    UnknownMode { line: usize, mode: i64 },
    #[error("line {line}: expected `<x> <y>`, found {text:?}")]
    MalformedPoint { line: usize, text: String },
}

/// The authoring convention a curve's points came from. The two conventions need different
/// numbers of control points before they describe a usable profile; beyond that, only the
/// resulting point list matters.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CurveMode {
    /// Sampled from cubic Bézier segments; requires at least 4 control points.
    #[default]
    Bezier = 0,
    /// Authored directly as a polyline; requires at least 2 points.
    Linear = 1,
}

impl CurveMode {
    /// The smallest declared point count a curve of this mode may be built from.
    #[inline]
    pub const fn min_points(self) -> usize {
        match self {
            Self::Bezier => 4,
            Self::Linear => 2,
        }
    }
}

impl TryFrom<i64> for CurveMode {
    type Error = i64;
    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Bezier),
            1 => Ok(Self::Linear),
            other => Err(other),
        }
    }
}

impl fmt::Display for CurveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8)
    }
}

/// An ordered sequence of 2D points, connected as a polyline. `x` is the distance from the
/// axis of revolution, `y` is the height along it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProfileCurve {
    mode: CurveMode,
    declared_points: usize,
    points: Vec<Point2<Real>>,
}

impl ProfileCurve {
    /// Construct a curve whose declared point count is the number of points given.
    pub fn new(mode: CurveMode, points: Vec<Point2<Real>>) -> Self {
        Self {
            mode,
            declared_points: points.len(),
            points,
        }
    }

    /// Construct a curve with an explicit declared point count, as read from a curve file's
    /// header.
    pub fn with_declared_points(
        mode: CurveMode,
        declared_points: usize,
        points: Vec<Point2<Real>>,
    ) -> Self {
        Self {
            mode,
            declared_points,
            points,
        }
    }

    #[inline]
    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    /// The point count claimed by the curve's source.
    #[inline]
    pub fn declared_points(&self) -> usize {
        self.declared_points
    }

    #[inline]
    pub fn points(&self) -> &[Point2<Real>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether this curve has enough points to be swept.
    ///
    /// The declared count must satisfy the mode's [minimum](CurveMode::min_points), and there
    /// must be at least two actual points so that every point has a neighbor to take a tangent
    /// against.
    pub fn meets_minimum(&self) -> bool {
        self.declared_points >= self.mode.min_points() && self.points.len() >= 2
    }

    /// Parse curve data from a string.
    pub fn parse(text: &str) -> Result<Self, CurveError> {
        Self::read(text.as_bytes())
    }

    /// Read curve data line-by-line.
    pub fn read<R: BufRead>(reader: R) -> Result<Self, CurveError> {
        let mut lines = reader
            .lines()
            .enumerate()
            .map(|(i, line)| line.map(|l| (i + 1, l)));

        let (mode, declared_points) = loop {
            match lines.next() {
                None => return Err(CurveError::MissingHeader),
                Some(line) => {
                    let (n, text) = line?;
                    if text.trim().is_empty() {
                        continue;
                    }
                    break parse_header(n, &text)?;
                }
            }
        };

        let mut points = Vec::with_capacity(declared_points.min(1 << 12));
        for line in lines {
            let (n, text) = line?;
            if text.trim().is_empty() {
                continue;
            }
            points.push(parse_point(n, &text)?);
        }

        if points.len() != declared_points {
            tracing::warn!(
                declared = declared_points,
                read = points.len(),
                "curve point count differs from its header"
            );
        }
        Ok(Self {
            mode,
            declared_points,
            points,
        })
    }

    /// Read curve data from a file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CurveError> {
        tracing::debug!(path = ?path.as_ref(), "loading profile curve");
        let file = std::fs::File::open(path)?;
        Self::read(io::BufReader::new(file))
    }
}

impl FromStr for ProfileCurve {
    type Err = CurveError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProfileCurve {
    /// Write the curve in its file format.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.mode, self.declared_points)?;
        for p in &self.points {
            writeln!(f, "{} {}", p.x, p.y)?;
        }
        Ok(())
    }
}

fn parse_header(line: usize, text: &str) -> Result<(CurveMode, usize), CurveError> {
    let malformed = || CurveError::MalformedHeader {
        line,
        text: text.to_owned(),
    };
    let mut fields = text.split_whitespace();
    let mode = fields
        .next()
        .and_then(|f| f.parse::<i64>().ok())
        .ok_or_else(malformed)?;
    let count = fields
        .next()
        .and_then(|f| f.parse::<usize>().ok())
        .ok_or_else(malformed)?;
    let mode = CurveMode::try_from(mode).map_err(|mode| CurveError::UnknownMode { line, mode })?;
    Ok((mode, count))
}

fn parse_point(line: usize, text: &str) -> Result<Point2<Real>, CurveError> {
    let mut fields = text.split_whitespace().map(str::parse::<Real>);
    match (fields.next(), fields.next()) {
        (Some(Ok(x)), Some(Ok(y))) => Ok(Point2::new(x, y)),
        _ => Err(CurveError::MalformedPoint {
            line,
            text: text.to_owned(),
        }),
    }
}
