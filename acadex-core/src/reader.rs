//! Spreadsheet reader: workbook decoding and per-row document extraction.
//!
//! The reader opens a workbook, selects the first sheet, locates the
//! designated column by exact header match on row 1, and parses each data
//! row's embedded JSON document. A row that fails to parse produces a
//! [`RowWarning`] and is skipped; it never aborts the scan.

use calamine::{Data, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use serde::Serialize;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::merge::RowDocument;

/// Header text of the designated data column. The match is case- and
/// whitespace-sensitive: the column is produced by a trusted upstream system
/// and fuzzy matching would hide contract drift.
pub const DATA_COLUMN: &str = "DatosCompletos_JSON";

/// A per-row parse failure. Collected, never fatal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowWarning {
    /// 1-based worksheet row number.
    pub row: u32,
    pub message: String,
}

/// Result of scanning one workbook.
#[derive(Debug, Default)]
pub struct RowScan {
    /// Successfully parsed per-row documents, in worksheet row order.
    pub documents: Vec<RowDocument>,
    /// Data rows examined under the designated column.
    pub rows_scanned: usize,
    /// Rows whose document parsed successfully.
    pub rows_parsed: usize,
    pub warnings: Vec<RowWarning>,
}

/// Scan a workbook file. Rejects extensions other than `.xlsx`/`.xls` before
/// touching the file contents.
pub fn scan_path<P: AsRef<Path>>(
    path: P,
    config: &PipelineConfig,
) -> Result<RowScan, PipelineError> {
    let path = path.as_ref();

    match path.extension().and_then(|s| s.to_str()) {
        Some("xlsx") | Some("xls") => {}
        _ => return Err(PipelineError::InputFormat),
    }

    let file_size = std::fs::metadata(path)?.len();
    if file_size > config.max_file_bytes {
        return Err(PipelineError::TooLarge(format!(
            "{} bytes (máximo {})",
            file_size, config.max_file_bytes
        )));
    }

    let mut excel: Sheets<_> =
        open_workbook_auto(path).map_err(|e| PipelineError::Decode(e.to_string()))?;
    scan_sheets(&mut excel, config)
}

/// Scan a workbook from an in-memory buffer. The container format is sniffed
/// from the bytes; there is no extension to check.
pub fn scan_bytes(bytes: &[u8], config: &PipelineConfig) -> Result<RowScan, PipelineError> {
    if bytes.len() as u64 > config.max_file_bytes {
        return Err(PipelineError::TooLarge(format!(
            "{} bytes (máximo {})",
            bytes.len(),
            config.max_file_bytes
        )));
    }

    let mut excel =
        open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| PipelineError::Decode(e.to_string()))?;
    scan_sheets(&mut excel, config)
}

fn scan_sheets<RS: Read + Seek>(
    excel: &mut Sheets<RS>,
    config: &PipelineConfig,
) -> Result<RowScan, PipelineError> {
    let sheet_name = excel
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| {
            PipelineError::Decode("el archivo no contiene ninguna hoja de cálculo".to_string())
        })?;

    let range = excel
        .worksheet_range(&sheet_name)
        .map_err(|e| PipelineError::Decode(e.to_string()))?;

    // The header must sit on physical row 1; a used range starting lower
    // means row 1 is blank and the designated column cannot be there.
    let column = match range.start() {
        Some((0, _)) => {
            let header_row = range.rows().next().unwrap_or(&[]);
            header_row
                .iter()
                .position(|cell| matches!(cell, Data::String(s) if s == DATA_COLUMN))
        }
        _ => None,
    };
    let column = column.ok_or(PipelineError::Schema(DATA_COLUMN))?;

    let data_rows = range.height().saturating_sub(1);
    if data_rows > config.max_rows {
        return Err(PipelineError::TooLarge(format!(
            "{} filas de datos (máximo {})",
            data_rows, config.max_rows
        )));
    }

    let mut scan = RowScan::default();
    for (index, row) in range.rows().skip(1).enumerate() {
        scan.rows_scanned += 1;
        let worksheet_row = index as u32 + 2;

        let payload = match row.get(column) {
            Some(Data::String(s)) if !s.is_empty() => s,
            _ => continue,
        };

        match serde_json::from_str::<serde_json::Value>(payload) {
            Ok(value) => {
                scan.documents.push(RowDocument::from_value(value));
                scan.rows_parsed += 1;
            }
            Err(e) => scan.warnings.push(RowWarning {
                row: worksheet_row,
                message: format!("JSON inválido: {e}"),
            }),
        }
    }

    Ok(scan)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_rejected_before_io() {
        // The path does not exist; the extension check must fire first.
        let err = scan_path("/nonexistent/records.csv", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InputFormat));
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let err = scan_bytes(b"definitely not a workbook", &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Decode(_)));
    }

    #[test]
    fn test_byte_cap_fails_fast() {
        let config = PipelineConfig {
            max_file_bytes: 4,
            ..Default::default()
        };
        let err = scan_bytes(&[0u8; 16], &config).unwrap_err();
        assert!(matches!(err, PipelineError::TooLarge(_)));
    }
}
