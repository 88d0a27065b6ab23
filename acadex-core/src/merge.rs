//! Merge aggregator: unions per-row documents into one [`AcademicDataset`].
//!
//! The merge is structural, not schema validation: for each of the nine
//! recognized top-level keys, an array value contributes its elements in
//! array order; non-array or absent values are skipped silently, and unknown
//! keys are ignored. This permissiveness is deliberate — the documents come
//! from a trusted upstream system.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::schema::{
    AcademicDataset, AcademicMember, AcademicWork, CenterGroupNetwork, Category, Consultancy,
    EducationalMaterial, Patent, Publication, ResearchProject, SupervisedThesis,
};

/// The recognized record arrays of one row's embedded document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowDocument {
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

impl RowDocument {
    /// Extract the recognized record arrays from a parsed JSON value.
    ///
    /// A value that is valid JSON but not an object yields an empty document;
    /// it still counts as a parsed row upstream.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(object) = value else {
            return Self::default();
        };

        Self {
            academic_members: take_records(&object, Category::AcademicMembers.key()),
            supervised_theses: take_records(&object, Category::SupervisedTheses.key()),
            publications: take_records(&object, Category::Publications.key()),
            patents: take_records(&object, Category::Patents.key()),
            research_projects: take_records(&object, Category::ResearchProjects.key()),
            educational_materials: take_records(&object, Category::EducationalMaterials.key()),
            academic_works: take_records(&object, Category::AcademicWorks.key()),
            consultancies: take_records(&object, Category::Consultancies.key()),
            centers_groups_networks: take_records(&object, Category::CentersGroupsNetworks.key()),
        }
    }
}

fn take_records<T: DeserializeOwned>(object: &Map<String, Value>, key: &str) -> Vec<T> {
    match object.get(key) {
        // Elements that are not objects cannot carry record fields; skip them
        // rather than failing the whole key.
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Append every document's records per category, in document order.
pub fn merge_documents(documents: Vec<RowDocument>) -> AcademicDataset {
    let mut dataset = AcademicDataset::default();
    for document in documents {
        dataset.academic_members.extend(document.academic_members);
        dataset.supervised_theses.extend(document.supervised_theses);
        dataset.publications.extend(document.publications);
        dataset.patents.extend(document.patents);
        dataset.research_projects.extend(document.research_projects);
        dataset
            .educational_materials
            .extend(document.educational_materials);
        dataset.academic_works.extend(document.academic_works);
        dataset.consultancies.extend(document.consultancies);
        dataset
            .centers_groups_networks
            .extend(document.centers_groups_networks);
    }
    dataset
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_recognized_arrays_are_extracted_in_order() {
        let document = RowDocument::from_value(json!({
            "publications": [
                {"id": "1", "year": "2020"},
                {"id": "2", "year": "2021"}
            ],
            "patents": [{"id": "p1"}]
        }));
        assert_eq!(document.publications.len(), 2);
        assert_eq!(document.publications[0].id.as_deref(), Some("1"));
        assert_eq!(document.publications[1].id.as_deref(), Some("2"));
        assert_eq!(document.patents.len(), 1);
        assert!(document.academic_members.is_empty());
    }

    #[test]
    fn test_non_array_and_unknown_keys_are_skipped() {
        let document = RowDocument::from_value(json!({
            "publications": "not an array",
            "somethingElse": [{"id": "x"}],
            "patents": null
        }));
        assert_eq!(document, RowDocument::default());
    }

    #[test]
    fn test_non_object_elements_are_skipped() {
        let document = RowDocument::from_value(json!({
            "publications": [{"id": "1"}, 42, "texto", {"id": "2"}]
        }));
        let ids: Vec<_> = document
            .publications
            .iter()
            .map(|p| p.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_non_object_document_is_empty() {
        assert_eq!(RowDocument::from_value(json!(123)), RowDocument::default());
        assert_eq!(
            RowDocument::from_value(json!(["publications"])),
            RowDocument::default()
        );
    }

    #[test]
    fn test_merge_preserves_row_order() {
        let first = RowDocument::from_value(json!({
            "publications": [{"id": "a"}, {"id": "b"}]
        }));
        let second = RowDocument::from_value(json!({
            "publications": [{"id": "c"}],
            "consultancies": [{"id": "k"}]
        }));

        let dataset = merge_documents(vec![first, second]);
        let ids: Vec<_> = dataset
            .publications
            .iter()
            .map(|p| p.id.as_deref().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(dataset.consultancies.len(), 1);
    }
}
