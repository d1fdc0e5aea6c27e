//! Keratograph corneal topography export processing.
//!
//! This crate provides tools for:
//! - Parsing OCULUS Keratograph "CORNEA" `.OD`/`.OS` exports (`Seg:`/`y=`/`x=` records)
//! - Converting meridian/radius/depth records to cartesian coordinates
//! - Correcting the depth handedness so the cloud matches the physical eye
//! - Writing the resulting point clouds as CSV or PLY
//!
//! # Example
//!
//! ```
//! use cornea_pipeline::processors::pipeline::process_lines;
//!
//! let lines = ["CORNEA", "Seg: 0 y= 1 x= 2", "Seg: 1 y= 1 x= 2"];
//! let points = process_lines(lines, true).unwrap();
//!
//! assert!((points[1].x + 1.0).abs() < 1e-9);
//! assert_eq!(points[1].z, -2.0);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod processors;

pub use config::{LinePolicy, OutputConfig, OutputFormat, PipelineConfig, ProcessingConfig};
pub use core::loaders::{CartesianPoint, CorrectedPoint, CylindricalPoint, PointCloud};
pub use processors::pipeline::{process_lines, process_lines_with, PipelineError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
