//! Analytics engine: frequency counts and the year × indexation pivot.
//!
//! Pure functions over the merged dataset. Nothing here mutates its input;
//! derived views are ephemeral and recomputed in full on every filter change.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;

use crate::schema::{AcademicMember, Publication, SupervisedThesis};

/// Filter sentinel meaning "no indexation filter".
pub const ALL_INDEXATIONS: &str = "Todos";
/// Substitute for a missing indexation in the pivot.
pub const OTHER_INDEXATION: &str = "Otro";
/// Bucket for missing/blank grouping fields in frequency counts.
pub const NOT_AVAILABLE: &str = "N/A";

/// One bucket of a frequency table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyEntry {
    pub name: String,
    pub value: u64,
}

/// Count occurrences of a field's values. Missing/blank values fall into the
/// `"N/A"` bucket. Entries are sorted descending by count; ties keep
/// first-encountered order (the sort is stable by construction).
pub fn frequency_by<'a, I>(values: I) -> Vec<FrequencyEntry>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: IndexMap<&str, u64> = IndexMap::new();
    for value in values {
        let name = value.filter(|s| !s.is_empty()).unwrap_or(NOT_AVAILABLE);
        *counts.entry(name).or_insert(0) += 1;
    }

    let mut entries: Vec<FrequencyEntry> = counts
        .into_iter()
        .map(|(name, value)| FrequencyEntry {
            name: name.to_string(),
            value,
        })
        .collect();
    entries.sort_by(|a, b| b.value.cmp(&a.value));
    entries
}

/// One year of the publications pivot. `counts` carries an entry for every
/// category of the pivot's universe, zero-filled where the year has none.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PivotRow {
    pub year: String,
    #[serde(flatten)]
    pub counts: IndexMap<String, u64>,
}

/// The year × indexation pivot plus the filter-selector universe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublicationPivot {
    /// Rows sorted ascending by year label (lexicographic: year is text).
    pub rows: Vec<PivotRow>,
    /// Indexation values present in the filtered slice, first-seen order.
    pub categories: Vec<String>,
    /// `"Todos"` followed by the unfiltered indexation universe, sorted
    /// alphabetically; feeds a filter selector.
    pub selector: Vec<String>,
}

/// Group publications by year and sub-count by indexation.
///
/// `filter` restricts the slice to one indexation unless it is
/// [`ALL_INDEXATIONS`]. Publications without a year are dropped outright (not
/// bucketed); a missing indexation substitutes [`OTHER_INDEXATION`]. Every
/// returned row is back-filled with zeros so all rows share the same key set.
pub fn publications_by_year(publications: &[Publication], filter: &str) -> PublicationPivot {
    fn indexation_of(publication: &Publication) -> &str {
        publication
            .indexation
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(OTHER_INDEXATION)
    }

    let all_indexations: IndexSet<&str> = publications.iter().map(indexation_of).collect();
    let mut selector: Vec<String> = all_indexations.iter().map(|s| s.to_string()).collect();
    selector.sort();
    selector.insert(0, ALL_INDEXATIONS.to_string());

    let mut yearly: IndexMap<&str, IndexMap<&str, u64>> = IndexMap::new();
    let mut universe: IndexSet<&str> = IndexSet::new();

    for publication in publications {
        let indexation = indexation_of(publication);
        if filter != ALL_INDEXATIONS && indexation != filter {
            continue;
        }
        let Some(year) = publication
            .year
            .as_deref()
            .filter(|s| !s.is_empty() && *s != NOT_AVAILABLE)
        else {
            continue;
        };

        *yearly.entry(year).or_default().entry(indexation).or_insert(0) += 1;
        universe.insert(indexation);
    }

    let categories: Vec<String> = universe.iter().map(|s| s.to_string()).collect();
    let mut rows: Vec<PivotRow> = yearly
        .into_iter()
        .map(|(year, counts)| PivotRow {
            year: year.to_string(),
            counts: categories
                .iter()
                .map(|c| (c.clone(), counts.get(c.as_str()).copied().unwrap_or(0)))
                .collect(),
        })
        .collect();
    rows.sort_by(|a, b| a.year.cmp(&b.year));

    PublicationPivot {
        rows,
        categories,
        selector,
    }
}

/// Gender distribution over academic members.
pub fn gender_distribution(members: &[AcademicMember]) -> Vec<FrequencyEntry> {
    frequency_by(members.iter().map(|m| m.sex.as_deref()))
}

/// Degree distribution over academic members.
pub fn degree_distribution(members: &[AcademicMember]) -> Vec<FrequencyEntry> {
    frequency_by(members.iter().map(|m| m.degree.as_deref()))
}

/// Publication-type distribution.
pub fn publication_types(publications: &[Publication]) -> Vec<FrequencyEntry> {
    frequency_by(publications.iter().map(|p| p.r#type.as_deref()))
}

/// Supervised theses per year, `N/A` removed, sorted ascending by year label.
pub fn theses_by_year(theses: &[SupervisedThesis]) -> Vec<FrequencyEntry> {
    let mut entries = frequency_by(theses.iter().map(|t| t.year.as_deref()));
    entries.retain(|e| e.name != NOT_AVAILABLE);
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    entries
}
