//! Core data types and I/O operations.

pub mod loaders;
pub mod transforms;
pub mod writers;

pub use loaders::{
    read_export_lines, AngularPoint, CartesianPoint, CorrectedPoint, CylindricalPoint, ExportInfo,
    Eye, LoaderError, PointCloud,
};
pub use writers::{write_cartesian_csv, write_ply, WriteError};
