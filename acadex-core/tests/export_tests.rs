use acadex_core::schema::{AcademicDataset, AcademicMember, Patent, Publication};
use acadex_core::writer::{write_dataset, write_dataset_to_path};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use std::io::Cursor;

fn sample_dataset() -> AcademicDataset {
    AcademicDataset {
        academic_members: vec![AcademicMember {
            id: Some("m1".to_string()),
            name: Some("Ana".to_string()),
            sex: Some("Femenino".to_string()),
            ..Default::default()
        }],
        publications: vec![
            Publication {
                id: Some("1".to_string()),
                year: Some("2020".to_string()),
                indexation: Some("WOS".to_string()),
                ..Default::default()
            },
            Publication {
                id: Some("2".to_string()),
                year: Some("2021".to_string()),
                indexation: Some("Scopus".to_string()),
                ..Default::default()
            },
        ],
        patents: vec![Patent {
            id: Some("p1".to_string()),
            status: Some("Otorgada".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    }
}

fn read_sheet(buffer: &[u8], name: &str) -> Vec<Vec<String>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(buffer.to_vec())).unwrap();
    let range = workbook.worksheet_range(name).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

#[test]
fn test_one_sheet_per_non_empty_category_in_export_order() {
    let buffer = write_dataset(&sample_dataset()).unwrap();
    let workbook = open_workbook_auto_from_rs(Cursor::new(buffer)).unwrap();
    assert_eq!(
        workbook.sheet_names(),
        vec!["Miembros Académicos", "Publicaciones", "Patentes"]
    );
}

#[test]
fn test_headers_are_the_first_records_populated_fields() {
    let buffer = write_dataset(&sample_dataset()).unwrap();
    let rows = read_sheet(&buffer, "Publicaciones");
    assert_eq!(rows[0], vec!["id", "year", "indexation"]);
    assert_eq!(rows[1], vec!["1", "2020", "WOS"]);
    assert_eq!(rows[2], vec!["2", "2021", "Scopus"]);
}

#[test]
fn test_round_trip_preserves_first_record_field_sets() {
    let dataset = sample_dataset();
    let buffer = write_dataset(&dataset).unwrap();

    let members = read_sheet(&buffer, "Miembros Académicos");
    assert_eq!(members[0], vec!["id", "name", "sex"]);
    assert_eq!(members[1], vec!["m1", "Ana", "Femenino"]);

    let patents = read_sheet(&buffer, "Patentes");
    assert_eq!(patents[0], vec!["id", "status"]);
    assert_eq!(patents[1], vec!["p1", "Otorgada"]);
}

#[test]
fn test_fields_absent_from_the_first_record_are_dropped() {
    // Documented limitation: columns come from the first record only.
    let dataset = AcademicDataset {
        publications: vec![
            Publication {
                id: Some("1".to_string()),
                ..Default::default()
            },
            Publication {
                id: Some("2".to_string()),
                year: Some("2021".to_string()),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let buffer = write_dataset(&dataset).unwrap();
    let rows = read_sheet(&buffer, "Publicaciones");
    assert_eq!(rows[0], vec!["id"]);
    assert_eq!(rows[1], vec!["1"]);
    assert_eq!(rows[2], vec!["2"]);
}

#[test]
fn test_empty_categories_produce_no_sheet() {
    let dataset = AcademicDataset {
        publications: vec![Publication {
            id: Some("1".to_string()),
            ..Default::default()
        }],
        ..Default::default()
    };
    let buffer = write_dataset(&dataset).unwrap();
    let workbook = open_workbook_auto_from_rs(Cursor::new(buffer)).unwrap();
    assert_eq!(workbook.sheet_names(), vec!["Publicaciones"]);
}

#[test]
fn test_buffer_and_file_exports_agree() {
    let dataset = sample_dataset();
    let buffer = write_dataset(&dataset).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reporte_academico_datos.xlsx");
    write_dataset_to_path(&dataset, &path).unwrap();
    let file_bytes = std::fs::read(&path).unwrap();

    assert_eq!(
        read_sheet(&buffer, "Publicaciones"),
        read_sheet(&file_bytes, "Publicaciones")
    );
}
