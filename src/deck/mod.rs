//! Presentation deck engine: package access, slide text scanning, and
//! token substitution.
//!
//! The pieces compose as a pipeline: [`DeckPackage`] opens a template and
//! resolves its slides in presentation order, [`walk`] feeds every text
//! unit of those slides to a [`TextUnitVisitor`], and [`RunReplacer`] is
//! the visitor that substitutes `{{NAME}}` tokens. Rewriting is span-based,
//! so every byte the visitor leaves alone survives unchanged.

// Submodule declarations
pub mod package;
pub mod replace;
pub mod slide;
pub mod walker;

// Re-exports for convenience
pub use package::{DeckPackage, PRESENTATION_MACRO_MAIN, PRESENTATION_MAIN};
pub use replace::{ReplacementMap, RunReplacer};
pub use slide::{CellText, RunSpan, SlideXml, TextUnit};
pub use walker::{TextUnitVisitor, walk};
