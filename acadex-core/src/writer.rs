//! Spreadsheet writer: serializes the merged dataset into a multi-sheet
//! workbook with styled header rows.

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet, XlsxError};
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::PipelineError;
use crate::schema::{AcademicDataset, Category};

/// Suggested file name for the exported workbook.
pub const EXPORT_FILE_NAME: &str = "reporte_academico_datos.xlsx";
/// MIME type of the exported workbook.
pub const EXPORT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const HEADER_FONT_COLOR: u32 = 0x003C58;
const HEADER_FILL_COLOR: u32 = 0xE6F0F4;
const COLUMN_WIDTH: f64 = 25.0;

/// Serialize the dataset into an in-memory workbook buffer.
///
/// One sheet per category with at least one record, named from the fixed
/// label table; empty categories produce no sheet at all. Columns are the
/// populated fields of the category's **first** record; fields that appear
/// only in later records are dropped. That mirrors the source system's
/// export and is kept on purpose rather than widened to a column union.
pub fn write_dataset(dataset: &AcademicDataset) -> Result<Vec<u8>, PipelineError> {
    let mut workbook = build_workbook(dataset)?;
    workbook
        .save_to_buffer()
        .map_err(|e| PipelineError::Export(e.to_string()))
}

/// Serialize the dataset directly to a file.
pub fn write_dataset_to_path<P: AsRef<Path>>(
    dataset: &AcademicDataset,
    path: P,
) -> Result<(), PipelineError> {
    let mut workbook = build_workbook(dataset)?;
    workbook
        .save(path.as_ref())
        .map_err(|e| PipelineError::Export(e.to_string()))
}

fn build_workbook(dataset: &AcademicDataset) -> Result<Workbook, PipelineError> {
    let mut workbook = Workbook::new();

    for category in Category::EXPORT_ORDER {
        let rows = dataset
            .rows_for(category)
            .map_err(|e| PipelineError::Export(e.to_string()))?;
        if rows.is_empty() {
            continue;
        }

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(category.sheet_label())
            .map_err(|e| PipelineError::Export(e.to_string()))?;
        write_sheet(worksheet, &rows).map_err(|e| PipelineError::Export(e.to_string()))?;
    }

    Ok(workbook)
}

fn write_sheet(worksheet: &mut Worksheet, rows: &[Map<String, Value>]) -> Result<(), XlsxError> {
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(HEADER_FONT_COLOR))
        .set_background_color(Color::RGB(HEADER_FILL_COLOR));

    let headers: Vec<&String> = rows[0].keys().collect();
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        worksheet.set_column_width(col, COLUMN_WIDTH)?;
        worksheet.write_string_with_format(0, col, header.as_str(), &header_format)?;
    }

    for (index, record) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        for (col, header) in headers.iter().enumerate() {
            let Some(value) = record.get(header.as_str()) else {
                continue;
            };
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            worksheet.write_string(row, col as u16, &text)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Patent, Publication};

    #[test]
    fn test_empty_dataset_produces_an_empty_workbook() {
        let dataset = AcademicDataset::default();
        // No sheets at all; the buffer still serializes.
        let buffer = write_dataset(&dataset).unwrap();
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_buffer_export_succeeds_for_populated_dataset() {
        let dataset = AcademicDataset {
            publications: vec![Publication {
                id: Some("1".to_string()),
                year: Some("2020".to_string()),
                ..Default::default()
            }],
            patents: vec![Patent {
                id: Some("p1".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let buffer = write_dataset(&dataset).unwrap();
        // XLSX containers are ZIP archives.
        assert_eq!(&buffer[..2], b"PK");
    }
}
