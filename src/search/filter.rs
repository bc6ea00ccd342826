/// Dynamic predicate composition over case-study records.
use crate::common::error::{Error, Result};
use crate::model::CaseStudy;

/// Optional filter criteria as they arrive from an outer layer.
///
/// `year` stays a raw string and is parsed when the filter is built, so a
/// malformed value fails loudly instead of silently matching nothing.
/// Empty or whitespace-only strings count as absent.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    /// Free-text query over the searchable fields.
    pub query: Option<String>,
    pub industry: Option<String>,
    pub year: Option<String>,
    pub technologies: Option<String>,
    pub tags: Option<String>,
    pub confidential: Option<bool>,
}

type Predicate = Box<dyn Fn(&CaseStudy) -> bool + Send + Sync>;

/// A compiled conjunction of predicates.
///
/// Each present criterion contributes one clause; a record matches when
/// every clause holds. With no criteria the filter matches everything.
pub struct RecordFilter {
    clauses: Vec<Predicate>,
}

impl RecordFilter {
    /// Whether a record satisfies every clause.
    pub fn matches(&self, record: &CaseStudy) -> bool {
        self.clauses.iter().all(|clause| clause(record))
    }

    /// Number of compiled clauses.
    pub fn clause_count(&self) -> usize {
        self.clauses.len()
    }
}

/// Compile criteria into a [`RecordFilter`].
///
/// The free-text query ORs a case-insensitive substring match across
/// project name, client name, challenge, solution, outcomes, technologies,
/// and tags. Industry, technologies, and tags filter their own fields the
/// same way; year is exact integer equality; confidential is exact boolean
/// equality.
pub fn build(criteria: &FilterCriteria) -> Result<RecordFilter> {
    let mut clauses: Vec<Predicate> = Vec::new();

    if let Some(query) = present(&criteria.query) {
        let needle = query.to_lowercase();
        clauses.push(Box::new(move |r| {
            contains_ci(&r.project_name, &needle)
                || contains_ci(&r.client_name, &needle)
                || contains_ci(&r.challenge, &needle)
                || contains_ci(&r.solution, &needle)
                || contains_ci(&r.outcomes, &needle)
                || opt_contains_ci(&r.technologies, &needle)
                || opt_contains_ci(&r.tags, &needle)
        }));
    }

    if let Some(industry) = present(&criteria.industry) {
        let needle = industry.to_lowercase();
        clauses.push(Box::new(move |r| opt_contains_ci(&r.industry, &needle)));
    }

    if let Some(raw) = present(&criteria.year) {
        let year: i32 = raw.parse().map_err(|_| Error::InvalidFilterValue {
            filter: "year",
            value: raw.to_string(),
        })?;
        clauses.push(Box::new(move |r| r.project_year == Some(year)));
    }

    if let Some(technologies) = present(&criteria.technologies) {
        let needle = technologies.to_lowercase();
        clauses.push(Box::new(move |r| opt_contains_ci(&r.technologies, &needle)));
    }

    if let Some(tags) = present(&criteria.tags) {
        let needle = tags.to_lowercase();
        clauses.push(Box::new(move |r| opt_contains_ci(&r.tags, &needle)));
    }

    if let Some(confidential) = criteria.confidential {
        clauses.push(Box::new(move |r| r.confidential == confidential));
    }

    Ok(RecordFilter { clauses })
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn opt_contains_ci(haystack: &Option<String>, needle_lower: &str) -> bool {
    haystack
        .as_deref()
        .is_some_and(|v| contains_ci(v, needle_lower))
}
