/// The fixed placeholder catalogue.
///
/// The mapping from placeholder names to record fields is a closed,
/// compile-time table. Accessors are plain field reads, so a name without a
/// backing field cannot exist; uniqueness of the names is asserted in the
/// tests.
use chrono::NaiveDate;

use crate::deck::ReplacementMap;
use crate::model::CaseStudy;

/// Rendered in place of an absent or empty field.
pub const MISSING_VALUE: &str = "N/A";

/// The synthetic export-date token, always present in a replacement map.
pub const EXPORT_DATE_TOKEN: &str = "{{EXPORT_DATE}}";

/// One catalogue entry: placeholder name, field accessor, and an optional
/// formatter applied to present values only.
pub struct PlaceholderSpec {
    pub name: &'static str,
    accessor: fn(&CaseStudy) -> Option<String>,
    formatter: Option<fn(String) -> String>,
}

/// The record-backed placeholders, in the order they substitute.
pub const CATALOG: &[PlaceholderSpec] = &[
    PlaceholderSpec {
        name: "PROJECT_NAME",
        accessor: |r| Some(r.project_name.clone()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "CLIENT",
        accessor: |r| Some(r.client_name.clone()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "INDUSTRY",
        accessor: |r| r.industry.clone(),
        formatter: None,
    },
    PlaceholderSpec {
        name: "YEAR",
        accessor: |r| r.project_year.map(|y| y.to_string()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "CHALLENGE",
        accessor: |r| Some(r.challenge.clone()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "SOLUTION",
        accessor: |r| Some(r.solution.clone()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "OUTCOMES",
        accessor: |r| Some(r.outcomes.clone()),
        formatter: None,
    },
    PlaceholderSpec {
        name: "TECHNOLOGIES",
        accessor: |r| r.technologies.clone(),
        formatter: None,
    },
    PlaceholderSpec {
        name: "TEAM_SIZE",
        accessor: |r| r.team_size.map(|n| n.to_string()),
        formatter: Some(|v| format!("{v} people")),
    },
    PlaceholderSpec {
        name: "DURATION",
        accessor: |r| r.duration_months.map(|n| n.to_string()),
        formatter: Some(|v| format!("{v} months")),
    },
    PlaceholderSpec {
        name: "PROJECT_VALUE",
        accessor: |r| r.project_value.clone(),
        formatter: None,
    },
    PlaceholderSpec {
        name: "TAGS",
        accessor: |r| r.tags.clone(),
        formatter: None,
    },
    PlaceholderSpec {
        name: "CREATED_BY",
        accessor: |r| r.created_by.clone(),
        formatter: None,
    },
];

/// Build the replacement map for one record at one export date.
///
/// Every catalogue entry contributes exactly one token, absent or not, so
/// no placeholder literal can survive in an exported deck. The export date
/// renders like `January 05, 2025`.
pub fn resolve(record: &CaseStudy, exported_on: NaiveDate) -> ReplacementMap {
    let mut map = ReplacementMap::new();
    for spec in CATALOG {
        let value = match (spec.accessor)(record).filter(|v| !v.trim().is_empty()) {
            Some(present) => match spec.formatter {
                Some(format) => format(present),
                None => present,
            },
            None => MISSING_VALUE.to_string(),
        };
        map.push(format!("{{{{{}}}}}", spec.name), value);
    }
    map.push(
        EXPORT_DATE_TOKEN,
        exported_on.format("%B %d, %Y").to_string(),
    );
    map
}
