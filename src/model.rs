//! Data model for the case-study catalogue.
//!
//! These types are plain data carriers: the stores own their lifecycle, the
//! export catalogue reads their fields, and the search engine filters and
//! sorts over them. All of them serialize with serde so an outer service
//! layer can emit them as JSON unchanged.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalogued project case study.
///
/// The required narrative fields (`project_name`, `client_name`,
/// `challenge`, `solution`, `outcomes`) are guaranteed non-empty by the
/// record store; everything optional renders as the `N/A` sentinel when a
/// deck is exported.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseStudy {
    pub id: u64,
    pub project_name: String,
    pub client_name: String,
    pub industry: Option<String>,
    pub project_year: Option<i32>,
    pub challenge: String,
    pub solution: String,
    pub outcomes: String,
    /// Comma-separated technology names.
    pub technologies: Option<String>,
    pub team_size: Option<u32>,
    pub duration_months: Option<u32>,
    /// Comma-separated tags.
    pub tags: Option<String>,
    /// Free-form value band, e.g. `"$100K-$200K"`.
    pub project_value: Option<String>,
    #[serde(default)]
    pub confidential: bool,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A file attached to a case study.
///
/// `filename` is the stored (disk) name, `original_filename` the name the
/// file was uploaded under. Attachments are owned 1:N by their record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: u64,
    pub filename: String,
    pub original_filename: String,
    pub file_path: PathBuf,
    pub file_type: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}

/// Insert payload for a new case study: every content field of
/// [`CaseStudy`] without identity or timestamps. The store validates the
/// required subset and stamps the rest on insertion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseStudyDraft {
    pub project_name: String,
    pub client_name: String,
    pub industry: Option<String>,
    pub project_year: Option<i32>,
    pub challenge: String,
    pub solution: String,
    pub outcomes: String,
    pub technologies: Option<String>,
    pub team_size: Option<u32>,
    pub duration_months: Option<u32>,
    pub tags: Option<String>,
    pub project_value: Option<String>,
    #[serde(default)]
    pub confidential: bool,
    pub created_by: Option<String>,
}

/// Metadata of a registered deck template.
///
/// At most one template carries `is_default = true` at any time; the
/// template store enforces the transition atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMeta {
    pub id: u64,
    pub name: String,
    pub filename: String,
    pub file_path: PathBuf,
    pub description: Option<String>,
    pub is_default: bool,
    pub uploaded_at: DateTime<Utc>,
}
