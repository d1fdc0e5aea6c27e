//! Export file to point cloud file conversion.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::{error, info};
use rayon::prelude::*;

use crate::config::{OutputFormat, PipelineConfig};
use crate::core::loaders::{read_export_lines, ExportInfo, PointCloud};
use crate::core::writers::{write_cartesian_csv, write_ply};

use super::pipeline::{run_pipeline, PipelineOutput};

/// What happened to one export file.
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub info: ExportInfo,
    pub points: usize,
    pub skipped: usize,
    pub meridians: u64,
}

/// Parse-only report for an export file.
#[derive(Debug, Clone)]
pub struct ExportReport {
    pub info: ExportInfo,
    pub lines: usize,
    pub records: usize,
    pub skipped: usize,
    pub meridians: u64,
}

/// Derive an output path for an export.
///
/// `smith.OD` becomes `smith_OD.<format>`, placed in `output_dir` when given
/// and next to the input otherwise. The extension is kept in the name so the
/// two eyes of one patient don't overwrite each other.
pub fn default_output_path(input: &Path, output_dir: Option<&Path>, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "cornea".to_string());
    let name = match input.extension() {
        Some(ext) => format!("{}_{}.{}", stem, ext.to_string_lossy(), format.extension()),
        None => format!("{}.{}", stem, format.extension()),
    };

    let dir = output_dir
        .map(Path::to_path_buf)
        .or_else(|| input.parent().map(Path::to_path_buf))
        .unwrap_or_default();
    dir.join(name)
}

fn load_and_run(input: &Path, config: &PipelineConfig) -> Result<(usize, PipelineOutput)> {
    let lines = read_export_lines(input)?;
    let output = run_pipeline(&lines, &config.processing)
        .with_context(|| format!("Failed to process export: {}", input.display()))?;
    Ok((lines.len(), output))
}

/// Convert one CORNEA export to a point cloud file.
///
/// The output format follows the output path's extension when it is `.csv`
/// or `.ply`, and `config.output.format` otherwise.
pub fn convert_export(input: &Path, output: &Path, config: &PipelineConfig) -> Result<ConversionSummary> {
    let info = ExportInfo::from_path(input);
    let (_, run) = load_and_run(input, config)?;

    let cloud = PointCloud::from_points(&run.points);
    let format = OutputFormat::from_path(output).unwrap_or(config.output.format);
    let precision = config.output.precision;

    let written = match format {
        OutputFormat::Csv => write_cartesian_csv(output, &cloud, precision),
        OutputFormat::Ply => write_ply(output, &cloud, precision),
    };
    written.with_context(|| format!("Failed to write point cloud: {}", output.display()))?;

    Ok(ConversionSummary {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        info,
        points: cloud.len(),
        skipped: run.skipped_lines.len(),
        meridians: run.meridians,
    })
}

/// Convert several exports in parallel.
///
/// Each file is an independent pipeline run; one failure does not stop the
/// others. Results come back in input order. Inputs whose derived output
/// paths coincide (same file name from different directories) are all
/// rejected before anything is written.
pub fn convert_batch(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    config: &PipelineConfig,
) -> Vec<(PathBuf, Result<ConversionSummary>)> {
    let outputs: Vec<PathBuf> = inputs
        .iter()
        .map(|input| default_output_path(input, output_dir, config.output.format))
        .collect();

    let mut claims: HashMap<&Path, usize> = HashMap::with_capacity(outputs.len());
    for output in &outputs {
        *claims.entry(output.as_path()).or_insert(0) += 1;
    }

    inputs
        .par_iter()
        .zip(outputs.par_iter())
        .map(|(input, output)| {
            let result = if claims[output.as_path()] > 1 {
                Err(anyhow!(
                    "output {} is shared by {} inputs; convert them separately",
                    output.display(),
                    claims[output.as_path()]
                ))
            } else {
                convert_export(input, output, config)
            };

            match &result {
                Ok(summary) => info!(
                    "{} [{}] -> {} ({} points, {} skipped lines)",
                    input.display(),
                    summary.info.eye,
                    summary.output.display(),
                    summary.points,
                    summary.skipped
                ),
                Err(e) => error!("Failed to convert {}: {:#}", input.display(), e),
            }

            (input.clone(), result)
        })
        .collect()
}

/// Parse an export without writing anything.
pub fn inspect_export(input: &Path, config: &PipelineConfig) -> Result<ExportReport> {
    let info = ExportInfo::from_path(input);
    let (lines, run) = load_and_run(input, config)?;

    Ok(ExportReport {
        info,
        lines,
        records: run.points.len(),
        skipped: run.skipped_lines.len(),
        meridians: run.meridians,
    })
}
