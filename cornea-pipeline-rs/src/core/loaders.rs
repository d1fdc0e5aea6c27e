//! Point types and loaders for Keratograph CORNEA exports.
//!
//! This module provides:
//! - The per-stage point representations (cylindrical, angular, cartesian, corrected)
//! - A struct-of-arrays `PointCloud` handed to the writers
//! - Whole-file reading of `.OD`/`.OS` exports and file-name metadata

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur during file loading.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("failed to read export '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty file: {0}")]
    EmptyFile(PathBuf),
}

/// Result type for loader operations.
pub type Result<T> = std::result::Result<T, LoaderError>;

/// One parsed `Seg:`/`y=`/`x=` record.
///
/// The export's `y=` column is the radial distance from the apex and its `x=`
/// column is the depth magnitude. Neither is a cartesian axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CylindricalPoint {
    /// Zero-based meridian index.
    pub segment: u32,
    /// Distance from the measurement axis (`y=` column).
    pub radial_distance: f64,
    /// Unsigned depth magnitude as stored (`x=` column).
    pub depth: f64,
}

impl CylindricalPoint {
    pub fn new(segment: u32, radial_distance: f64, depth: f64) -> Self {
        Self {
            segment,
            radial_distance,
            depth,
        }
    }
}

/// A cylindrical point with its meridian angle resolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularPoint {
    pub segment: u32,
    pub radial_distance: f64,
    pub depth: f64,
    /// Meridian angle in radians, in `[0, 2π)`.
    pub angle: f64,
}

impl AngularPoint {
    pub fn from_cylindrical(point: &CylindricalPoint, angle: f64) -> Self {
        Self {
            segment: point.segment,
            radial_distance: point.radial_distance,
            depth: point.depth,
            angle,
        }
    }
}

/// A point in cartesian space, z still holding the stored depth magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// A cartesian point after chirality handling. Terminal pipeline output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectedPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CorrectedPoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<CorrectedPoint> for CartesianPoint {
    fn from(point: CorrectedPoint) -> Self {
        CartesianPoint::new(point.x, point.y, point.z)
    }
}

/// Container for 3D point cloud data.
#[derive(Debug, Clone, Default)]
pub struct PointCloud {
    /// X coordinates of all points.
    pub x: Vec<f64>,
    /// Y coordinates of all points.
    pub y: Vec<f64>,
    /// Z coordinates of all points.
    pub z: Vec<f64>,
}

impl PointCloud {
    /// Creates a new empty point cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new point cloud with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
            z: Vec::with_capacity(capacity),
        }
    }

    /// Builds a cloud from pipeline output, keeping input order.
    pub fn from_points(points: &[CorrectedPoint]) -> Self {
        let mut cloud = Self::with_capacity(points.len());
        for p in points {
            cloud.push(p.x, p.y, p.z);
        }
        cloud
    }

    /// Returns the number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Returns true if the point cloud is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Adds a point to the cloud.
    #[inline]
    pub fn push(&mut self, x: f64, y: f64, z: f64) {
        self.x.push(x);
        self.y.push(y);
        self.z.push(z);
    }

    /// Converts point cloud to a vector of [x, y, z] coordinate arrays.
    pub fn to_coords(&self) -> Vec<[f64; 3]> {
        (0..self.len())
            .map(|i| [self.x[i], self.y[i], self.z[i]])
            .collect()
    }
}

/// Which eye an export belongs to, from its file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eye {
    /// Oculus dexter, `.OD`
    Right,
    /// Oculus sinister, `.OS`
    Left,
    Unknown,
}

impl std::fmt::Display for Eye {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Eye::Right => write!(f, "OD (right)"),
            Eye::Left => write!(f, "OS (left)"),
            Eye::Unknown => write!(f, "unknown"),
        }
    }
}

/// File-selection metadata carried by an export's name.
///
/// Exports are named like `<name>.OD`, `<name>.OS`, with an `_F` suffix
/// (`<name>.OD_F` or `<name>_F.OD`) marking extrapolated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportInfo {
    pub eye: Eye,
    pub extrapolated: bool,
}

impl ExportInfo {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_uppercase())
            .unwrap_or_default();
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_ascii_uppercase())
            .unwrap_or_default();

        let (ext, ext_extrapolated) = match ext.strip_suffix("_F") {
            Some(base) => (base.to_string(), true),
            None => (ext, false),
        };

        let eye = match ext.as_str() {
            "OD" => Eye::Right,
            "OS" => Eye::Left,
            _ => Eye::Unknown,
        };

        Self {
            eye,
            extrapolated: ext_extrapolated || stem.ends_with("_F"),
        }
    }
}

/// Read every line of a CORNEA export.
///
/// The file is read in one call. Bytes that are not valid UTF-8 (the device
/// writes Latin-1 headers) are replaced rather than rejected, since only the
/// ASCII record lines matter.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains no lines.
pub fn read_export_lines<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LoaderError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let text = String::from_utf8_lossy(&bytes);
    let lines: Vec<String> = text.lines().map(str::to_owned).collect();

    if lines.is_empty() {
        return Err(LoaderError::EmptyFile(path.to_path_buf()));
    }

    Ok(lines)
}
