//! Configuration types for the cornea pipeline.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the line parser treats lines that are not `Seg:`/`y=`/`x=` records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinePolicy {
    /// Drop non-matching and non-numeric lines (header/footer tolerant).
    #[default]
    Skip,
    /// Abort on the first non-matching or non-numeric line.
    FailFast,
}

/// Output file format for converted point clouds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Csv,
    Ply,
}

impl OutputFormat {
    /// File extension used when deriving output paths.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Ply => "ply",
        }
    }

    /// Guess the format from an output path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        if ext.eq_ignore_ascii_case("csv") {
            Some(OutputFormat::Csv)
        } else if ext.eq_ignore_ascii_case("ply") {
            Some(OutputFormat::Ply)
        } else {
            None
        }
    }
}

/// Configuration for the parse/transform/correct stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Policy for malformed lines
    #[serde(default)]
    pub line_policy: LinePolicy,

    /// Negate depth so the surface faces away from the observer.
    /// Keratograph exports always need this.
    #[serde(default = "default_correct_chirality")]
    pub correct_chirality: bool,
}

fn default_correct_chirality() -> bool {
    true
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            line_policy: LinePolicy::default(),
            correct_chirality: default_correct_chirality(),
        }
    }
}

/// Configuration for written point cloud files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Format used when the output path does not name one
    #[serde(default)]
    pub format: OutputFormat,

    /// Decimal places written per coordinate
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    6
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            precision: default_precision(),
        }
    }
}

/// Main pipeline configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub processing: ProcessingConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl PipelineConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
