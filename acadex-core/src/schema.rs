//! Typed record categories and the merged dataset container.
//!
//! The nine categories mirror the wire contract of the embedded per-row JSON
//! documents. Record fields are loosely typed upstream, so every field is an
//! `Option<String>` decoded leniently: numbers and booleans are stringified,
//! null/absent become `None`, unknown keys are ignored. Serialization skips
//! `None` fields, so a record's serialized key set is its populated fields.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Lenient string field decoder for loosely-typed upstream documents.
pub(crate) fn loose<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

macro_rules! record_struct {
    ($(#[$meta:meta])* $name:ident { $($field:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[serde(
                    default,
                    deserialize_with = "loose",
                    skip_serializing_if = "Option::is_none"
                )]
                pub $field: Option<String>,
            )+
        }
    };
}

record_struct! {
    /// A member of the academic unit.
    AcademicMember {
        id, name, sex, degree, institution, graduation_year, country,
        research_area,
    }
}

record_struct! {
    /// A thesis supervised by a member.
    SupervisedThesis {
        id, author, year, program_type, program_name, thesis_title,
        institution, role, same_program, access_link,
    }
}

record_struct! {
    /// A publication; `indexation` drives the year pivot.
    Publication {
        id, r#type, authors, role_in_publication, year, article_title,
        journal_name, book_title, chapter_title, place, editorial, status,
        issn, access_link, indexation,
    }
}

record_struct! {
    ResearchProject {
        id, title, funding_source, adjudication_year, execution_period, role,
        scope, access_link,
    }
}

record_struct! {
    Patent {
        id, inventors, patent_name, request_date, publication_date,
        registry_number, status, access_link,
    }
}

record_struct! {
    EducationalMaterial {
        id, academic_name, material_type, title, year, curricular_activity,
        availability,
    }
}

record_struct! {
    AcademicWork {
        id, academic_name, work_type, title, year, curricular_activity,
        availability,
    }
}

record_struct! {
    Consultancy {
        id, title, contracting_institution, adjudication_year,
        execution_period, objective,
    }
}

record_struct! {
    CenterGroupNetwork {
        id, academic_name, description, r#type, name, start_date,
        current_situation, curricular_activity,
    }
}

/// The nine fixed record categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    AcademicMembers,
    SupervisedTheses,
    Publications,
    Patents,
    ResearchProjects,
    EducationalMaterials,
    AcademicWorks,
    Consultancies,
    CentersGroupsNetworks,
}

impl Category {
    /// All categories in wire-contract (dataset key) order.
    pub const ALL: [Category; 9] = [
        Category::AcademicMembers,
        Category::SupervisedTheses,
        Category::Publications,
        Category::Patents,
        Category::ResearchProjects,
        Category::EducationalMaterials,
        Category::AcademicWorks,
        Category::Consultancies,
        Category::CentersGroupsNetworks,
    ];

    /// Sheet order used by the exporter.
    pub const EXPORT_ORDER: [Category; 9] = [
        Category::AcademicMembers,
        Category::Publications,
        Category::SupervisedTheses,
        Category::ResearchProjects,
        Category::Patents,
        Category::EducationalMaterials,
        Category::AcademicWorks,
        Category::Consultancies,
        Category::CentersGroupsNetworks,
    ];

    /// Top-level JSON key carrying this category's record array.
    pub fn key(self) -> &'static str {
        match self {
            Category::AcademicMembers => "academicMembers",
            Category::SupervisedTheses => "supervisedTheses",
            Category::Publications => "publications",
            Category::Patents => "patents",
            Category::ResearchProjects => "researchProjects",
            Category::EducationalMaterials => "educationalMaterials",
            Category::AcademicWorks => "academicWorks",
            Category::Consultancies => "consultancies",
            Category::CentersGroupsNetworks => "centersGroupsNetworks",
        }
    }

    /// Worksheet name used when exporting this category.
    pub fn sheet_label(self) -> &'static str {
        match self {
            Category::AcademicMembers => "Miembros Académicos",
            Category::SupervisedTheses => "Tesis Supervisadas",
            Category::Publications => "Publicaciones",
            Category::Patents => "Patentes",
            Category::ResearchProjects => "Proyectos de Inv.",
            Category::EducationalMaterials => "Material Educacional",
            Category::AcademicWorks => "Trabajos Académicos",
            Category::Consultancies => "Consultorías",
            Category::CentersGroupsNetworks => "Redes y Centros",
        }
    }

    /// Short label for summary tiles and CLI output.
    pub fn summary_label(self) -> &'static str {
        match self {
            Category::AcademicMembers => "Académicos",
            Category::SupervisedTheses => "Tesis Supervisadas",
            Category::Publications => "Publicaciones",
            Category::Patents => "Patentes",
            Category::ResearchProjects => "Proyectos de Inv.",
            Category::EducationalMaterials => "Material Educacional",
            Category::AcademicWorks => "Trabajos Académicos",
            Category::Consultancies => "Consultorías",
            Category::CentersGroupsNetworks => "Redes y Centros",
        }
    }
}

/// The merged, in-memory collection of all categories' records.
///
/// Built exclusively by the merge aggregator, owned by the pipeline for the
/// lifetime of one load, and replaced wholesale (never field-mutated) on
/// every new load or reset. Record order within a category is append order
/// across worksheet rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicDataset {
    pub academic_members: Vec<AcademicMember>,
    pub supervised_theses: Vec<SupervisedThesis>,
    pub publications: Vec<Publication>,
    pub patents: Vec<Patent>,
    pub research_projects: Vec<ResearchProject>,
    pub educational_materials: Vec<EducationalMaterial>,
    pub academic_works: Vec<AcademicWork>,
    pub consultancies: Vec<Consultancy>,
    pub centers_groups_networks: Vec<CenterGroupNetwork>,
}

impl AcademicDataset {
    /// Number of records in a category.
    pub fn count(&self, category: Category) -> usize {
        match category {
            Category::AcademicMembers => self.academic_members.len(),
            Category::SupervisedTheses => self.supervised_theses.len(),
            Category::Publications => self.publications.len(),
            Category::Patents => self.patents.len(),
            Category::ResearchProjects => self.research_projects.len(),
            Category::EducationalMaterials => self.educational_materials.len(),
            Category::AcademicWorks => self.academic_works.len(),
            Category::Consultancies => self.consultancies.len(),
            Category::CentersGroupsNetworks => self.centers_groups_networks.len(),
        }
    }

    /// Total record count across all categories.
    pub fn total_records(&self) -> usize {
        Category::ALL.iter().map(|&c| self.count(c)).sum()
    }

    /// True if no category has any records.
    pub fn is_empty(&self) -> bool {
        self.total_records() == 0
    }

    /// Per-category counts in wire-contract order, for summary tiles.
    pub fn summary(&self) -> Vec<(Category, usize)> {
        Category::ALL.iter().map(|&c| (c, self.count(c))).collect()
    }

    /// A category's records as ordered JSON maps (populated fields only),
    /// the view consumed by the exporter.
    pub fn rows_for(&self, category: Category) -> Result<Vec<Map<String, Value>>, serde_json::Error> {
        match category {
            Category::AcademicMembers => rows_of(&self.academic_members),
            Category::SupervisedTheses => rows_of(&self.supervised_theses),
            Category::Publications => rows_of(&self.publications),
            Category::Patents => rows_of(&self.patents),
            Category::ResearchProjects => rows_of(&self.research_projects),
            Category::EducationalMaterials => rows_of(&self.educational_materials),
            Category::AcademicWorks => rows_of(&self.academic_works),
            Category::Consultancies => rows_of(&self.consultancies),
            Category::CentersGroupsNetworks => rows_of(&self.centers_groups_networks),
        }
    }
}

fn rows_of<T: Serialize>(records: &[T]) -> Result<Vec<Map<String, Value>>, serde_json::Error> {
    records
        .iter()
        .map(|record| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            other => Ok(Map::from_iter([("value".to_string(), other)])),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loose_decoding_stringifies_scalars() {
        let json = r#"{"id": 7, "year": 2020, "indexation": "WOS", "status": true}"#;
        let publication: Publication = serde_json::from_str(json).unwrap();
        assert_eq!(publication.id.as_deref(), Some("7"));
        assert_eq!(publication.year.as_deref(), Some("2020"));
        assert_eq!(publication.indexation.as_deref(), Some("WOS"));
        assert_eq!(publication.status.as_deref(), Some("true"));
        assert_eq!(publication.authors, None);
    }

    #[test]
    fn test_unknown_record_keys_are_ignored() {
        let json = r#"{"id": "1", "sex": "Femenino", "unexpected": {"nested": 1}}"#;
        let member: AcademicMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.sex.as_deref(), Some("Femenino"));
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let member = AcademicMember {
            id: Some("1".to_string()),
            sex: Some("Femenino".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&member).unwrap();
        let map = value.as_object().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "sex"]);
    }

    #[test]
    fn test_camel_case_wire_names() {
        let json = r#"{"roleInPublication": "Autor", "accessLink": "http://x"}"#;
        let publication: Publication = serde_json::from_str(json).unwrap();
        assert_eq!(publication.role_in_publication.as_deref(), Some("Autor"));
        assert_eq!(publication.access_link.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_category_tables_cover_all_nine() {
        assert_eq!(Category::ALL.len(), 9);
        assert_eq!(Category::EXPORT_ORDER.len(), 9);
        for category in Category::ALL {
            assert!(Category::EXPORT_ORDER.contains(&category));
            assert!(!category.key().is_empty());
            assert!(!category.sheet_label().is_empty());
        }
        assert_eq!(Category::Publications.key(), "publications");
        assert_eq!(Category::Publications.sheet_label(), "Publicaciones");
    }

    #[test]
    fn test_dataset_counts() {
        let mut dataset = AcademicDataset::default();
        assert!(dataset.is_empty());
        dataset.publications.push(Publication::default());
        dataset.publications.push(Publication::default());
        dataset.patents.push(Patent::default());
        assert_eq!(dataset.count(Category::Publications), 2);
        assert_eq!(dataset.count(Category::Patents), 1);
        assert_eq!(dataset.total_records(), 3);
        assert!(!dataset.is_empty());
    }
}
