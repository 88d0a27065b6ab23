//! Pipeline orchestrator: sequences reader → aggregator and owns the state
//! machine surfaced to callers.
//!
//! States: `Idle → Loading → {Ready | Failed}`, `Ready → Idle` on reset,
//! `Failed → Loading` on retry. A load requested while another load is in
//! progress is rejected, never queued or cancelled. The dataset is replaced
//! wholesale on every transition; consumers only ever see it by reference.

use serde::Serialize;
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::{ErrorKind, PipelineError};
use crate::merge;
use crate::reader::{self, RowScan, RowWarning};
use crate::schema::AcademicDataset;
use crate::writer;

/// Row accounting for one successful load.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    /// Data rows examined under the designated column.
    pub rows_scanned: usize,
    /// Rows whose embedded document parsed successfully.
    pub rows_parsed: usize,
    /// Per-row parse failures; informational only.
    pub warnings: Vec<RowWarning>,
}

/// Observable pipeline state.
#[derive(Debug, Default)]
pub enum PipelineState {
    #[default]
    Idle,
    Loading,
    Ready {
        dataset: AcademicDataset,
        summary: LoadSummary,
    },
    Failed {
        kind: ErrorKind,
        message: String,
    },
}

impl PipelineState {
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Loading => "loading",
            PipelineState::Ready { .. } => "ready",
            PipelineState::Failed { .. } => "failed",
        }
    }
}

/// One ingestion pipeline: at most one dataset loaded at a time.
#[derive(Debug, Default)]
pub struct Pipeline {
    config: PipelineConfig,
    state: PipelineState,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_config(PipelineConfig::default())
    }

    pub fn with_config(config: PipelineConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// The loaded dataset, if the pipeline is `Ready`.
    pub fn dataset(&self) -> Option<&AcademicDataset> {
        match &self.state {
            PipelineState::Ready { dataset, .. } => Some(dataset),
            _ => None,
        }
    }

    /// Row accounting of the last successful load.
    pub fn summary(&self) -> Option<&LoadSummary> {
        match &self.state {
            PipelineState::Ready { summary, .. } => Some(summary),
            _ => None,
        }
    }

    /// Load a workbook file; on success the pipeline holds the merged dataset.
    pub fn load_path<P: AsRef<Path>>(&mut self, path: P) -> Result<(), PipelineError> {
        self.run_load(|config| reader::scan_path(path, config))
    }

    /// Load a workbook from raw bytes.
    pub fn load_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        self.run_load(|config| reader::scan_bytes(bytes, config))
    }

    /// Clear dataset and message, back to `Idle`.
    pub fn reset(&mut self) {
        self.state = PipelineState::Idle;
    }

    /// Export the loaded dataset as a workbook buffer.
    ///
    /// Reported independently of ingestion: an export failure leaves the
    /// pipeline state, and the dataset it holds, untouched.
    pub fn export(&self) -> Result<Vec<u8>, PipelineError> {
        let dataset = self
            .dataset()
            .ok_or_else(|| PipelineError::Export("no hay datos cargados".to_string()))?;
        writer::write_dataset(dataset)
    }

    /// Export the loaded dataset directly to a file.
    pub fn export_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let dataset = self
            .dataset()
            .ok_or_else(|| PipelineError::Export("no hay datos cargados".to_string()))?;
        writer::write_dataset_to_path(dataset, path)
    }

    fn run_load<F>(&mut self, scan: F) -> Result<(), PipelineError>
    where
        F: FnOnce(&PipelineConfig) -> Result<RowScan, PipelineError>,
    {
        if matches!(self.state, PipelineState::Loading) {
            return Err(PipelineError::LoadInProgress);
        }
        self.state = PipelineState::Loading;

        match Self::ingest(scan(&self.config)) {
            Ok((dataset, summary)) => {
                self.state = PipelineState::Ready { dataset, summary };
                Ok(())
            }
            Err(error) => {
                // Any partial dataset is discarded with the previous state.
                self.state = PipelineState::Failed {
                    kind: error.kind(),
                    message: error.to_string(),
                };
                Err(error)
            }
        }
    }

    fn ingest(
        scan: Result<RowScan, PipelineError>,
    ) -> Result<(AcademicDataset, LoadSummary), PipelineError> {
        let scan = scan?;
        // Workbook readable but no usable rows: distinct from a decode error.
        if scan.rows_parsed == 0 {
            return Err(PipelineError::EmptyResult);
        }

        let summary = LoadSummary {
            rows_scanned: scan.rows_scanned,
            rows_parsed: scan.rows_parsed,
            warnings: scan.warnings,
        };
        Ok((merge::merge_documents(scan.documents), summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_idle() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.state().name(), "idle");
        assert!(pipeline.dataset().is_none());
    }

    #[test]
    fn test_failed_load_clears_dataset_and_records_kind() {
        let mut pipeline = Pipeline::new();
        let err = pipeline.load_bytes(b"garbage").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        match pipeline.state() {
            PipelineState::Failed { kind, message } => {
                assert_eq!(*kind, ErrorKind::Decode);
                assert!(!message.is_empty());
            }
            other => panic!("expected Failed, got {}", other.name()),
        }
        assert!(pipeline.dataset().is_none());
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut pipeline = Pipeline::new();
        let _ = pipeline.load_bytes(b"garbage");
        pipeline.reset();
        assert_eq!(pipeline.state().name(), "idle");
    }

    #[test]
    fn test_export_without_dataset_is_an_export_error() {
        let pipeline = Pipeline::new();
        let err = pipeline.export().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Export);
    }
}
