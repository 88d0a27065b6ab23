//! acadex-core: ingestion-merge-aggregate-export pipeline for academic-record
//! spreadsheets.
//!
//! A workbook carries one embedded JSON document per data row under the
//! `DatosCompletos_JSON` column. The pipeline locates that column, parses and
//! validates each row's document (per-row failures are warnings, not errors),
//! merges the record arrays into one [`AcademicDataset`], derives frequency
//! tables and a year × indexation pivot, and can re-export the dataset as a
//! multi-sheet workbook.

pub mod analytics;
pub mod config;
pub mod error;
pub mod merge;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod writer;

pub use analytics::{ALL_INDEXATIONS, FrequencyEntry, PublicationPivot};
pub use config::PipelineConfig;
pub use error::{ErrorKind, PipelineError};
pub use pipeline::{LoadSummary, Pipeline, PipelineState};
pub use reader::{DATA_COLUMN, RowWarning};
pub use schema::{AcademicDataset, Category};
pub use writer::{EXPORT_FILE_NAME, EXPORT_MIME};
