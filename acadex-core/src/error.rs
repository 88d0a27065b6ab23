//! Pipeline error taxonomy.
//!
//! Row-level parse problems are not part of this taxonomy: they are collected
//! as [`RowWarning`](crate::reader::RowWarning)s in the load summary and never
//! abort a load. Everything here aborts the pipeline and clears any partial
//! dataset. User-facing messages are in Spanish, the product's language.

use thiserror::Error;

/// Stable error kind surfaced to callers next to the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InputFormat,
    Decode,
    Schema,
    EmptyResult,
    TooLarge,
    LoadInProgress,
    Io,
    Export,
}

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// File extension/container not recognized; rejected before decode.
    #[error("Formato de archivo no válido. Por favor, suba un archivo .xlsx o .xls.")]
    InputFormat,

    /// Bytes could not be parsed as a workbook, or the workbook has no sheets.
    #[error("No se pudo procesar el archivo como un libro de Excel: {0}")]
    Decode(String),

    /// The designated column header was not found on row 1.
    #[error("No se encontró la columna \"{0}\" en la fila de encabezados.")]
    Schema(&'static str),

    /// Workbook decoded and column found, but no row yielded a usable document.
    #[error("No se encontraron datos JSON válidos en la columna \"DatosCompletos_JSON\".")]
    EmptyResult,

    /// A configured row-count or byte-size cap was exceeded.
    #[error("El archivo excede el límite permitido: {0}")]
    TooLarge(String),

    /// A load was requested while another load is in progress.
    #[error("Ya hay una carga de archivo en curso.")]
    LoadInProgress,

    /// Underlying read/write failed.
    #[error("Error de lectura/escritura: {0}")]
    Io(#[from] std::io::Error),

    /// The export workbook could not be generated.
    #[error("Error al generar el archivo Excel: {0}")]
    Export(String),
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::InputFormat => ErrorKind::InputFormat,
            PipelineError::Decode(_) => ErrorKind::Decode,
            PipelineError::Schema(_) => ErrorKind::Schema,
            PipelineError::EmptyResult => ErrorKind::EmptyResult,
            PipelineError::TooLarge(_) => ErrorKind::TooLarge,
            PipelineError::LoadInProgress => ErrorKind::LoadInProgress,
            PipelineError::Io(_) => ErrorKind::Io,
            PipelineError::Export(_) => ErrorKind::Export,
        }
    }
}
