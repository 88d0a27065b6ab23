//! Pipeline configuration.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::PipelineError;

fn default_max_rows() -> usize {
    100_000
}

fn default_max_file_bytes() -> u64 {
    64 * 1024 * 1024
}

/// Input-size caps for a pipeline run.
///
/// Spreadsheets are assumed bounded (tens of thousands of rows); the caps
/// exist to fail fast on untrusted or runaway inputs before decoding work
/// piles up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of data rows scanned under the designated column.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
    /// Maximum input file size in bytes.
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&content)
            .map_err(|e| PipelineError::Decode(format!("configuración inválida: {e}")))?;
        Ok(config)
    }
}
