//! Casedeck - A Rust library for managing and exporting project case studies
//!
//! This library keeps a catalogue of client case studies and renders them
//! into PowerPoint decks by filling `{{PLACEHOLDER}}` tokens in a .pptx
//! template.
//!
//! # Features
//!
//! - **Deck templating**: Fill placeholder tokens in .pptx templates while
//!   preserving every untouched byte of the package
//! - **Record catalogue**: In-memory stores for case studies, attachments,
//!   and uploaded templates
//! - **Search**: Compose filters over any combination of criteria, with
//!   deterministic stable ordering
//! - **Facets**: Industry and project-year aggregation plus catalogue
//!   statistics
//!
//! # Example - Exporting a case study
//!
//! ```no_run
//! use casedeck::export::DeckExporter;
//! use casedeck::model::CaseStudyDraft;
//! use casedeck::store::CaseStudyStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CaseStudyStore::new();
//! let record = store.insert(CaseStudyDraft {
//!     project_name: "Customer Portal".into(),
//!     client_name: "Acme Corp".into(),
//!     challenge: "Legacy systems".into(),
//!     solution: "Cloud migration".into(),
//!     outcomes: "Reduced costs by 40%".into(),
//!     ..Default::default()
//! })?;
//!
//! let exporter = DeckExporter::open("template.pptx")?;
//! let deck = exporter.export(&record)?;
//! std::fs::write("case_study.pptx", deck)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Searching the catalogue
//!
//! ```
//! use casedeck::search::{FilterCriteria, SortSpec, search};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let criteria = FilterCriteria {
//!     industry: Some("Healthcare".into()),
//!     year: Some("2024".into()),
//!     ..Default::default()
//! };
//! let spec = SortSpec::parse(Some("project_name"), Some("asc"))?;
//! let matched = search(&[], &criteria, &spec)?;
//! assert!(matched.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod deck;
pub mod export;
pub mod model;
pub mod search;
pub mod store;

// Convenience re-exports
pub use common::error::{Error, Result};
pub use deck::{DeckPackage, ReplacementMap, RunReplacer};
pub use export::{DeckExporter, PLACEHOLDER_GUIDE};
pub use model::{Attachment, CaseStudy, CaseStudyDraft, TemplateMeta};
pub use search::{FilterCriteria, SortSpec};
pub use store::{CaseStudyStore, StorageLayout, TemplateStore};
