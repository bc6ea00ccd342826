/// Deterministic ordering of case-study records.
use std::cmp::Ordering;
use std::str::FromStr;

use crate::common::error::{Error, Result};
use crate::model::CaseStudy;

/// The closed set of sortable fields.
///
/// Parsing any other name fails with [`Error::UnknownSortField`]; there is
/// no dynamic field lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    ProjectName,
    ClientName,
    Industry,
    ProjectYear,
    TeamSize,
    DurationMonths,
    ProjectValue,
    Confidential,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

impl FromStr for SortField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "project_name" => Ok(Self::ProjectName),
            "client_name" => Ok(Self::ClientName),
            "industry" => Ok(Self::Industry),
            "project_year" => Ok(Self::ProjectYear),
            "team_size" => Ok(Self::TeamSize),
            "duration_months" => Ok(Self::DurationMonths),
            "project_value" => Ok(Self::ProjectValue),
            "confidential" => Ok(Self::Confidential),
            "created_by" => Ok(Self::CreatedBy),
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            other => Err(Error::UnknownSortField(other.to_string())),
        }
    }
}

/// Sort direction; descending is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

/// A parsed `(field, direction)` pair.
#[derive(Debug, Clone, Copy)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse the outer layer's `sort_by` / `sort_order` parameters.
    ///
    /// An absent field sorts by creation time. An absent order is
    /// descending; `"desc"` (any case) selects descending, and any other
    /// value selects ascending.
    pub fn parse(field: Option<&str>, order: Option<&str>) -> Result<Self> {
        let field = match field {
            Some(name) => name.parse()?,
            None => SortField::CreatedAt,
        };
        let direction = match order {
            None => SortDirection::Descending,
            Some(o) if o.eq_ignore_ascii_case("desc") => SortDirection::Descending,
            Some(_) => SortDirection::Ascending,
        };
        Ok(Self { field, direction })
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

/// Sort records in place.
///
/// The sort is stable and descending only reverses the key comparison, so
/// records with equal keys keep their prior relative order either way.
/// Absent optional values order before present ones.
pub fn sort_records(records: &mut [CaseStudy], spec: &SortSpec) {
    records.sort_by(|a, b| {
        let ord = compare_by(spec.field, a, b);
        match spec.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

fn compare_by(field: SortField, a: &CaseStudy, b: &CaseStudy) -> Ordering {
    match field {
        SortField::ProjectName => a.project_name.cmp(&b.project_name),
        SortField::ClientName => a.client_name.cmp(&b.client_name),
        SortField::Industry => a.industry.cmp(&b.industry),
        SortField::ProjectYear => a.project_year.cmp(&b.project_year),
        SortField::TeamSize => a.team_size.cmp(&b.team_size),
        SortField::DurationMonths => a.duration_months.cmp(&b.duration_months),
        SortField::ProjectValue => a.project_value.cmp(&b.project_value),
        SortField::Confidential => a.confidential.cmp(&b.confidential),
        SortField::CreatedBy => a.created_by.cmp(&b.created_by),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64, name: &str, year: Option<i32>) -> CaseStudy {
        let created = Utc.with_ymd_and_hms(2024, 1, id as u32, 0, 0, 0).unwrap();
        CaseStudy {
            id,
            project_name: name.into(),
            client_name: "Acme".into(),
            industry: None,
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

    fn ids(records: &[CaseStudy]) -> Vec<u64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        match SortSpec::parse(Some("shoe_size"), None) {
            Err(Error::UnknownSortField(name)) => assert_eq!(name, "shoe_size"),
            other => panic!("expected UnknownSortField, got {other:?}"),
        }
    }

    #[test]
    fn test_direction_defaults() {
        assert_eq!(
            SortSpec::parse(None, None).unwrap().direction,
            SortDirection::Descending
        );
        assert_eq!(
            SortSpec::parse(None, Some("DESC")).unwrap().direction,
            SortDirection::Descending
        );
        assert_eq!(
            SortSpec::parse(None, Some("asc")).unwrap().direction,
            SortDirection::Ascending
        );
        // Anything unrecognized selects ascending
        assert_eq!(
            SortSpec::parse(None, Some("sideways")).unwrap().direction,
            SortDirection::Ascending
        );
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let mut records = vec![record(1, "A", None), record(3, "B", None), record(2, "C", None)];
        sort_records(&mut records, &SortSpec::default());
        assert_eq!(ids(&records), [3, 2, 1]);
    }

    #[test]
    fn test_ties_keep_prior_order_both_directions() {
        // Same year everywhere: order must be untouched
        let mut records = vec![
            record(1, "A", Some(2024)),
            record(2, "B", Some(2024)),
            record(3, "C", Some(2024)),
        ];
        let spec = SortSpec::parse(Some("project_year"), Some("asc")).unwrap();
        sort_records(&mut records, &spec);
        assert_eq!(ids(&records), [1, 2, 3]);

        let spec = SortSpec::parse(Some("project_year"), Some("desc")).unwrap();
        sort_records(&mut records, &spec);
        assert_eq!(ids(&records), [1, 2, 3]);
    }

    #[test]
    fn test_absent_values_order_before_present() {
        let mut records = vec![record(1, "A", Some(2023)), record(2, "B", None)];
        let spec = SortSpec::parse(Some("project_year"), Some("asc")).unwrap();
        sort_records(&mut records, &spec);
        assert_eq!(ids(&records), [2, 1]);
    }
}
