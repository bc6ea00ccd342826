//! Templated deck export.
//!
//! [`catalog`] maps case-study fields to the fixed placeholder set,
//! [`DeckExporter`] drives the deck engine to fill a template, and
//! [`guide`] carries the authoring documentation for the placeholder
//! tokens.

// Submodule declarations
pub mod catalog;
pub mod exporter;
pub mod guide;

// Re-exports for convenience
pub use catalog::{EXPORT_DATE_TOKEN, MISSING_VALUE, resolve};
pub use exporter::{DeckExporter, PRESENTATION_MIME, exporter_for, suggested_filename};
pub use guide::PLACEHOLDER_GUIDE;
