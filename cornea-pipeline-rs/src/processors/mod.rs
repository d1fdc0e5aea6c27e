//! Data processing modules.

pub mod cartesian;
pub mod chirality;
pub mod convert;
pub mod line_parser;
pub mod pipeline;

// Re-export key types for convenience
pub use cartesian::{assign_angles, assign_angles_with, meridian_count, to_cartesian, transform, TransformError};
pub use chirality::{correct_chirality, correct_point};
pub use convert::{
    convert_batch, convert_export, default_output_path, inspect_export, ConversionSummary,
    ExportReport,
};
pub use line_parser::{parse_line, parse_lines, parse_lines_with_report, Field, ParseError, ParseOutcome};
pub use pipeline::{process_lines, process_lines_with, run_pipeline, PipelineError, PipelineOutput};
