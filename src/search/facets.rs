/// Facet aggregation and catalogue statistics.
use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::CaseStudy;

/// One industry bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndustryFacet {
    pub name: String,
    pub count: usize,
}

/// One project-year bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearFacet {
    pub year: i32,
    pub count: usize,
}

/// Facet buckets over a record collection.
///
/// Industries keep first-encounter order, which is deterministic for a
/// fixed input; years are ordered descending by value.
#[derive(Debug, Clone, Serialize)]
pub struct Facets {
    pub industries: Vec<IndustryFacet>,
    pub years: Vec<YearFacet>,
}

/// Group records by industry and project year.
///
/// Records whose grouping field is absent or blank are skipped for that
/// facet only.
pub fn aggregate(records: &[CaseStudy]) -> Facets {
    let mut industries: Vec<IndustryFacet> = Vec::new();
    for record in records {
        let Some(name) = record
            .industry
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        else {
            continue;
        };
        match industries.iter_mut().find(|f| f.name == name) {
            Some(facet) => facet.count += 1,
            None => industries.push(IndustryFacet {
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.project_year {
            *by_year.entry(year).or_insert(0) += 1;
        }
    }
    let years = by_year
        .into_iter()
        .rev()
        .map(|(year, count)| YearFacet { year, count })
        .collect();

    Facets { industries, years }
}

/// Catalogue statistics: total count, per-industry counts, and the five
/// most recently created records.
#[derive(Debug, Clone, Serialize)]
pub struct Stats {
    pub total: usize,
    pub by_industry: Vec<IndustryFacet>,
    pub recent: Vec<CaseStudy>,
}

/// Compute [`Stats`] over a record collection.
pub fn stats(records: &[CaseStudy]) -> Stats {
    let mut recent: Vec<CaseStudy> = records.to_vec();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(5);
    Stats {
        total: records.len(),
        by_industry: aggregate(records).industries,
        recent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64, industry: Option<&str>, year: Option<i32>) -> CaseStudy {
        let created = Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap();
        CaseStudy {
            id,
            project_name: format!("Project {id}"),
            client_name: "Acme".into(),
            industry: industry.map(Into::into),
            project_year: year,
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
    fn test_industries_keep_first_encounter_order() {
        let records = vec![
            record(1, Some("Healthcare"), Some(2024)),
            record(2, Some("Finance"), Some(2023)),
            record(3, Some("Healthcare"), Some(2024)),
            record(4, None, None),
            record(5, Some("  "), None),
        ];
        let facets = aggregate(&records);
        assert_eq!(
            facets.industries,
            [
                IndustryFacet { name: "Healthcare".into(), count: 2 },
                IndustryFacet { name: "Finance".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_years_are_descending() {
        let records = vec![
            record(1, None, Some(2022)),
            record(2, None, Some(2024)),
            record(3, None, Some(2024)),
            record(4, None, None),
        ];
        let facets = aggregate(&records);
        assert_eq!(
            facets.years,
            [
                YearFacet { year: 2024, count: 2 },
                YearFacet { year: 2022, count: 1 },
            ]
        );
    }

    #[test]
    fn test_empty_collection_has_empty_facets() {
        let facets = aggregate(&[]);
        assert!(facets.industries.is_empty());
        assert!(facets.years.is_empty());
    }

    #[test]
    fn test_facets_serialize_to_the_documented_shape() {
        let facets = aggregate(&[record(1, Some("Healthcare"), Some(2024))]);
        let json = serde_json::to_value(&facets).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "industries": [{"name": "Healthcare", "count": 1}],
                "years": [{"year": 2024, "count": 1}],
            })
        );
    }

    #[test]
    fn test_stats_counts_and_recency() {
        let records: Vec<_> = (1..=7)
            .map(|id| record(id, Some("Healthcare"), None))
            .collect();
        let stats = stats(&records);
        assert_eq!(stats.total, 7);
        assert_eq!(stats.by_industry[0].count, 7);
        let recent_ids: Vec<_> = stats.recent.iter().map(|r| r.id).collect();
        assert_eq!(recent_ids, [7, 6, 5, 4, 3]);
    }
}
