//! Filtering, ordering, and aggregation over the case-study catalogue.
//!
//! [`filter`] compiles optional criteria into a conjunction of predicates,
//! [`sort`] provides deterministic stable ordering over a closed field set,
//! and [`facets`] groups records into industry and year buckets. [`search`]
//! ties the first two together for the common list operation.

// Submodule declarations
pub mod facets;
pub mod filter;
pub mod sort;

// Re-exports for convenience
pub use facets::{Facets, IndustryFacet, Stats, YearFacet, aggregate, stats};
pub use filter::{FilterCriteria, RecordFilter, build};
pub use sort::{SortDirection, SortField, SortSpec, sort_records};

use crate::common::error::Result;
use crate::model::CaseStudy;

/// Filter and sort a record collection in one call.
///
/// Compiles `criteria`, keeps the matching records, and orders them by
/// `spec`. Fails if a criterion is malformed, before any record is
/// inspected.
pub fn search(
    records: &[CaseStudy],
    criteria: &FilterCriteria,
    spec: &SortSpec,
) -> Result<Vec<CaseStudy>> {
    let filter = build(criteria)?;
    let mut matched: Vec<CaseStudy> = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    sort_records(&mut matched, spec);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64, name: &str, industry: &str, year: i32) -> CaseStudy {
        let created = Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap();
        CaseStudy {
            id,
            project_name: name.into(),
            client_name: "Acme".into(),
            industry: Some(industry.into()),
            project_year: Some(year),
            challenge: "c".into(),
            solution: "s".into(),
            outcomes: "o".into(),
            technologies: None,
            team_size: None,
            duration_months: None,
            tags: None,
            project_value: None,
            confidential: false,
            created_by: None,
            created_at: created,
            updated_at: created,
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_search_filters_then_sorts() {
        let records = vec![
            record(1, "Alpha", "Healthcare", 2022),
            record(2, "Beta", "Finance", 2024),
            record(3, "Gamma", "Healthcare", 2024),
        ];
        let criteria = FilterCriteria {
            industry: Some("health".into()),
            ..Default::default()
        };
        let spec = SortSpec::parse(Some("project_year"), Some("asc")).unwrap();
        let result = search(&records, &criteria, &spec).unwrap();
        let ids: Vec<_> = result.iter().map(|r| r.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn test_search_propagates_criteria_errors() {
        let criteria = FilterCriteria {
            year: Some("not-a-year".into()),
            ..Default::default()
        };
        assert!(search(&[], &criteria, &SortSpec::default()).is_err());
    }
}
