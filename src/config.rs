//! Pipeline configuration.

use std::num::NonZeroUsize;
use std::path::PathBuf;

pub const DEFAULT_INPUT_ROOT: &str = "site/resumes/";
pub const DEFAULT_OUTPUT_DIR: &str = "site/static";
pub const DEFAULT_OUTPUT_NAME: &str = "resumes";

/// Inputs and knobs for a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory tree holding the resume files.
    pub input_root: PathBuf,
    /// Directory the JSON artifact is written to; created if missing.
    pub output_dir: PathBuf,
    /// Artifact base name, `.json` is appended.
    pub output_name: String,
    /// Cap on simultaneous file loads. `None` loads everything at once.
    pub max_concurrency: Option<NonZeroUsize>,
    /// Fail the run when the artifact cannot be written instead of logging
    /// and carrying on.
    pub strict_write: bool,
}

impl PipelineConfig {
    /// Full path of the JSON artifact.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.json", self.output_name))
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            input_root: PathBuf::from(DEFAULT_INPUT_ROOT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            max_concurrency: None,
            strict_write: false,
        }
    }
}
