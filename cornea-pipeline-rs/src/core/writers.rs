//! Data writers for PLY and CSV formats.
//!
//! This module writes corrected point clouds for downstream viewers:
//! - PLY (Polygon File Format) with ASCII encoding and double-precision vertices
//! - CSV with `x,y,z` columns

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use super::loaders::PointCloud;

/// Errors that can occur during write operations.
#[derive(Error, Debug)]
pub enum WriteError {
    /// Failed to create parent directories.
    #[error("failed to create parent directories for '{path}': {source}")]
    CreateDirectory {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or open file for writing.
    #[error("failed to create file '{path}': {source}")]
    CreateFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write data to file.
    #[error("failed to write to file '{path}': {source}")]
    WriteFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV writing error.
    #[error("CSV write error for '{path}': {source}")]
    CsvError {
        path: String,
        #[source]
        source: csv::Error,
    },
}

/// Result type for write operations.
pub type Result<T> = std::result::Result<T, WriteError>;

/// Creates parent directories for a file path if they don't exist.
fn ensure_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| WriteError::CreateDirectory {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Creates a buffered writer for the given path.
fn create_buffered_writer(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| WriteError::CreateFile {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write point cloud to an ASCII PLY file.
///
/// The header declares one `vertex` element with `double` x, y, z
/// properties; each vertex follows on its own line.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `cloud` - Point cloud data
/// * `precision` - Decimal places per coordinate
///
/// # Example
///
/// ```no_run
/// use cornea_pipeline::core::loaders::PointCloud;
/// use cornea_pipeline::core::writers::write_ply;
/// use std::path::Path;
///
/// let cloud = PointCloud::default();
/// write_ply(Path::new("cornea.ply"), &cloud, 6).unwrap();
/// ```
pub fn write_ply(path: &Path, cloud: &PointCloud, precision: usize) -> Result<()> {
    ensure_parent_dirs(path)?;
    let mut writer = create_buffered_writer(path)?;

    let path_str = path.display().to_string();
    let write_err = |e: std::io::Error| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    };

    let header = format!(
        "ply\nformat ascii 1.0\nelement vertex {}\nproperty double x\nproperty double y\nproperty double z\nend_header",
        cloud.len()
    );
    writeln!(writer, "{}", header).map_err(write_err)?;

    for i in 0..cloud.len() {
        writeln!(
            writer,
            "{:.p$} {:.p$} {:.p$}",
            cloud.x[i],
            cloud.y[i],
            cloud.z[i],
            p = precision
        )
        .map_err(write_err)?;
    }

    writer.flush().map_err(write_err)?;

    Ok(())
}

/// Write point cloud to CSV with x, y, z columns.
///
/// # Arguments
///
/// * `path` - Output file path (parent directories will be created if needed)
/// * `cloud` - Point cloud data
/// * `precision` - Decimal places per coordinate
///
/// # Example
///
/// ```no_run
/// use cornea_pipeline::core::loaders::PointCloud;
/// use cornea_pipeline::core::writers::write_cartesian_csv;
/// use std::path::Path;
///
/// let cloud = PointCloud::default();
/// write_cartesian_csv(Path::new("cornea.csv"), &cloud, 6).unwrap();
/// ```
pub fn write_cartesian_csv(path: &Path, cloud: &PointCloud, precision: usize) -> Result<()> {
    ensure_parent_dirs(path)?;

    let buf_writer = create_buffered_writer(path)?;
    let mut csv_writer = csv::Writer::from_writer(buf_writer);

    let path_str = path.display().to_string();
    let csv_err = |e: csv::Error| WriteError::CsvError {
        path: path_str.clone(),
        source: e,
    };

    csv_writer.write_record(["x", "y", "z"]).map_err(csv_err)?;

    for i in 0..cloud.len() {
        csv_writer
            .write_record(&[
                format!("{:.p$}", cloud.x[i], p = precision),
                format!("{:.p$}", cloud.y[i], p = precision),
                format!("{:.p$}", cloud.z[i], p = precision),
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| WriteError::WriteFile {
        path: path_str.clone(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn create_test_cloud() -> PointCloud {
        PointCloud {
            x: vec![1.0, -1.0, 0.0],
            y: vec![0.0, 0.0, 2.5],
            z: vec![-2.0, -2.0, -0.125],
        }
    }

    #[test]
    fn test_write_ply() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.ply");
        let cloud = create_test_cloud();

        write_ply(&path, &cloud, 3).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "ply");
        assert_eq!(lines[1], "format ascii 1.0");
        assert_eq!(lines[2], "element vertex 3");
        assert_eq!(lines[3], "property double x");
        assert_eq!(lines[6], "end_header");
        assert_eq!(lines[7], "1.000 0.000 -2.000");
        assert_eq!(lines[9], "0.000 2.500 -0.125");
        assert_eq!(lines.len(), 10);
    }

    #[test]
    fn test_write_ply_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("nested").join("test.ply");
        let cloud = create_test_cloud();

        write_ply(&path, &cloud, 6).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_cartesian_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.csv");
        let cloud = create_test_cloud();

        write_cartesian_csv(&path, &cloud, 2).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines[0], "x,y,z");
        assert_eq!(lines[1], "1.00,0.00,-2.00");
        assert_eq!(lines[2], "-1.00,0.00,-2.00");
        assert_eq!(lines.len(), 4); // header + 3 data rows
    }

    #[test]
    fn test_write_empty_cloud_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_cartesian_csv(&path, &PointCloud::new(), 6).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["x,y,z"]);
    }
}
