//! Parse → transform → correct, over one export's lines.

use thiserror::Error;

use crate::config::{LinePolicy, ProcessingConfig};
use crate::core::loaders::CorrectedPoint;

use super::cartesian::{self, TransformError};
use super::chirality::correct_chirality;
use super::line_parser::{parse_lines_with_report, ParseError};

/// Errors from a pipeline run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Transform(#[from] TransformError),
}

/// Result of a pipeline run with parse diagnostics.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Final points, in input line order.
    pub points: Vec<CorrectedPoint>,
    /// 1-based line numbers dropped by the parser.
    pub skipped_lines: Vec<usize>,
    /// Meridian count used for the angular step.
    pub meridians: u64,
}

/// Run the full pipeline and keep diagnostics.
pub fn run_pipeline<I, S>(lines: I, config: &ProcessingConfig) -> Result<PipelineOutput, PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = parse_lines_with_report(lines, config.line_policy)?;
    let meridians = cartesian::meridian_count(&parsed.points)?;
    let angular = cartesian::assign_angles_with(&parsed.points, meridians);
    let cartesian = cartesian::to_cartesian(&angular);
    let points = correct_chirality(&cartesian, config.correct_chirality);

    Ok(PipelineOutput {
        points,
        skipped_lines: parsed.skipped_lines,
        meridians,
    })
}

/// Run the pipeline with policy and correction flag taken from `config`.
pub fn process_lines_with<I, S>(
    lines: I,
    config: &ProcessingConfig,
) -> Result<Vec<CorrectedPoint>, PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    run_pipeline(lines, config).map(|output| output.points)
}

/// Run the pipeline, skipping non-record lines.
///
/// # Example
///
/// ```
/// use cornea_pipeline::processors::pipeline::process_lines;
///
/// let points = process_lines(["Seg: 0 y= 1 x= 2", "Seg: 1 y= 1 x= 2"], true).unwrap();
/// assert_eq!(points.len(), 2);
/// assert_eq!(points[0].z, -2.0);
/// ```
pub fn process_lines<I, S>(lines: I, needs_correction: bool) -> Result<Vec<CorrectedPoint>, PipelineError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let config = ProcessingConfig {
        line_policy: LinePolicy::Skip,
        correct_chirality: needs_correction,
    };
    process_lines_with(lines, &config)
}
