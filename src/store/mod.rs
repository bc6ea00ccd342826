//! In-memory stores for case-study records and deck templates.
//!
//! The stores stand in for the record-store collaborator of the engines:
//! insertion-ordered collections behind `parking_lot` RwLocks, with the
//! validation and ownership rules the engines rely on (non-empty required
//! fields, at most one default template, attachments owned by their record).
//! They are not a persistence layer.

// Submodule declarations
pub mod layout;
pub mod records;
pub mod templates;

// Re-exports for convenience
pub use layout::StorageLayout;
pub use records::CaseStudyStore;
pub use templates::TemplateStore;
