//! Command-line interface for the cornea pipeline.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{LinePolicy, OutputFormat};
use crate::PipelineConfig;

#[derive(Parser)]
#[command(name = "cornea-pipeline")]
#[command(about = "Keratograph CORNEA export to point cloud converter", version)]
pub struct Cli {
    /// Path to YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Ply,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Ply => OutputFormat::Ply,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert .OD/.OS exports to corrected cartesian point clouds
    Convert {
        /// Export files to convert
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        /// Output file (single input only)
        #[arg(short, long, conflicts_with = "output_dir")]
        output: Option<PathBuf>,
        /// Output directory (defaults to next to each input)
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Output format when not implied by the output file name
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
        /// Keep the stored depth sign instead of negating z
        #[arg(long)]
        no_correction: bool,
        /// Abort on the first line that is not a Seg/y/x record
        #[arg(long)]
        fail_fast: bool,
    },

    /// Parse an export and report what it contains
    Inspect {
        /// Export file to inspect
        input: PathBuf,
        /// Abort on the first line that is not a Seg/y/x record
        #[arg(long)]
        fail_fast: bool,
    },
}

/// Create a spinner for indeterminate operations
fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Print a summary box
fn print_summary(title: &str, items: &[(&str, String)]) {
    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║ {:<60} ║", title);
    println!("╠══════════════════════════════════════════════════════════════╣");
    for (key, value) in items {
        let display_value = if value.chars().count() > 37 {
            let head: String = value.chars().take(34).collect();
            format!("{}...", head)
        } else {
            value.clone()
        };
        println!("║ {:<20}: {:<37} ║", key, display_value);
    }
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
}

pub fn run() {
    let cli = Cli::parse();

    // Initialize logging based on verbosity (must come first)
    env_logger::Builder::new()
        .filter_level(match cli.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        })
        .format_timestamp_secs()
        .init();

    // Load config
    let mut config = match &cli.config {
        Some(path) => match PipelineConfig::from_yaml(path) {
            Ok(cfg) => {
                info!("Loaded config from: {}", path.display());
                cfg
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}, using defaults", path.display(), e);
                PipelineConfig::default()
            }
        },
        None => PipelineConfig::default(),
    };

    // Dispatch to subcommands
    match cli.command {
        Commands::Convert {
            inputs,
            output,
            output_dir,
            format,
            no_correction,
            fail_fast,
        } => {
            if let Some(format) = format {
                config.output.format = format.into();
            }
            if no_correction {
                config.processing.correct_chirality = false;
            }
            if fail_fast {
                config.processing.line_policy = LinePolicy::FailFast;
            }
            cmd_convert(&inputs, output, output_dir, &config);
        }
        Commands::Inspect { input, fail_fast } => {
            if fail_fast {
                config.processing.line_policy = LinePolicy::FailFast;
            }
            cmd_inspect(&input, &config);
        }
    }
}

fn cmd_convert(
    inputs: &[PathBuf],
    output: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    config: &PipelineConfig,
) {
    use crate::processors::convert;

    let start = Instant::now();

    if inputs.len() == 1 {
        let input = &inputs[0];
        let output_path = output.unwrap_or_else(|| {
            convert::default_output_path(input, output_dir.as_deref(), config.output.format)
        });

        println!("Converting single export...");
        println!("Input: {}", input.display());
        println!("Output: {}", output_path.display());

        let spinner = create_spinner("Converting to cartesian coordinates...");

        match convert::convert_export(input, &output_path, config) {
            Ok(summary) => {
                spinner.finish_and_clear();

                print_summary(
                    "Conversion Complete",
                    &[
                        ("Input file", input.display().to_string()),
                        ("Output file", summary.output.display().to_string()),
                        ("Eye", summary.info.eye.to_string()),
                        ("Extrapolated", summary.info.extrapolated.to_string()),
                        ("Points converted", summary.points.to_string()),
                        ("Skipped lines", summary.skipped.to_string()),
                        ("Meridians", summary.meridians.to_string()),
                        ("Chirality corrected", config.processing.correct_chirality.to_string()),
                        ("Duration", format!("{:.2?}", start.elapsed())),
                    ],
                );
            }
            Err(e) => {
                spinner.finish_and_clear();
                error!("Conversion failed: {:#}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if output.is_some() {
        error!("--output takes a single input; use --output-dir for {} files", inputs.len());
        std::process::exit(1);
    }

    println!("Converting {} exports in batch mode...", inputs.len());
    if let Some(dir) = &output_dir {
        println!("Output directory: {}", dir.display());
    }

    let spinner = create_spinner("Converting exports...");
    let results = convert::convert_batch(inputs, output_dir.as_deref(), config);
    spinner.finish_and_clear();

    let failed = results.iter().filter(|(_, r)| r.is_err()).count();
    let points: usize = results
        .iter()
        .filter_map(|(_, r)| r.as_ref().ok())
        .map(|s| s.points)
        .sum();

    print_summary(
        "Batch Conversion Complete",
        &[
            ("Files", inputs.len().to_string()),
            ("Converted", (inputs.len() - failed).to_string()),
            ("Failed", failed.to_string()),
            ("Points converted", points.to_string()),
            ("Chirality corrected", config.processing.correct_chirality.to_string()),
            ("Duration", format!("{:.2?}", start.elapsed())),
        ],
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

fn cmd_inspect(input: &Path, config: &PipelineConfig) {
    use crate::processors::convert;

    let start = Instant::now();

    match convert::inspect_export(input, config) {
        Ok(report) => {
            print_summary(
                "Export Summary",
                &[
                    ("Input file", input.display().to_string()),
                    ("Eye", report.info.eye.to_string()),
                    ("Extrapolated", report.info.extrapolated.to_string()),
                    ("Lines", report.lines.to_string()),
                    ("Records", report.records.to_string()),
                    ("Skipped lines", report.skipped.to_string()),
                    ("Meridians", report.meridians.to_string()),
                    ("Duration", format!("{:.2?}", start.elapsed())),
                ],
            );
        }
        Err(e) => {
            error!("Inspection failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_convert_flags() {
        let cli = Cli::try_parse_from([
            "cornea-pipeline",
            "-vv",
            "convert",
            "smith.OD",
            "--format",
            "ply",
            "--no-correction",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Convert {
                inputs,
                format,
                no_correction,
                fail_fast,
                ..
            } => {
                assert_eq!(inputs, vec![PathBuf::from("smith.OD")]);
                assert!(matches!(format, Some(FormatArg::Ply)));
                assert!(no_correction);
                assert!(!fail_fast);
            }
            _ => panic!("Expected convert command"),
        }
    }

    #[test]
    fn test_output_conflicts_with_output_dir() {
        let result = Cli::try_parse_from([
            "cornea-pipeline",
            "convert",
            "smith.OD",
            "-o",
            "a.csv",
            "--output-dir",
            "out",
        ]);
        assert!(result.is_err());
    }
}
