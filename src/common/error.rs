//! Unified error types for the casedeck library.
//!
//! Every fallible operation in the crate reports through this one enum so
//! callers match on a single type regardless of whether the failure came from
//! template parsing, export serialization, search parameter parsing, or a
//! store lookup.
use thiserror::Error;

/// Main error type for casedeck operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Template package could not be opened or parsed
    #[error("Template load error: {0}")]
    TemplateLoad(String),

    /// Filled deck could not be serialized or written
    #[error("Export write error: {0}")]
    ExportWrite(String),

    /// Filter value does not parse for its filter
    #[error("Invalid value for filter '{filter}': {value}")]
    InvalidFilterValue { filter: &'static str, value: String },

    /// Sort field name outside the allowed set
    #[error("Unknown sort field: {0}")]
    UnknownSortField(String),

    /// Export requested without an explicit template and no default is set
    #[error("No default template is configured")]
    MissingDefaultTemplate,

    /// Case-study record not found
    #[error("Case study not found: {0}")]
    RecordNotFound(u64),

    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(u64),

    /// Required record field absent or empty
    #[error("Missing required field: {0}")]
    MissingRequiredField(&'static str),
}

/// Result type for casedeck operations.
pub type Result<T> = std::result::Result<T, Error>;
