/// Deck export: template in, filled presentation out.
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate, Utc};
use tempfile::NamedTempFile;
use tracing::info;

use crate::common::error::{Error, Result};
use crate::deck::{DeckPackage, RunReplacer, walk};
use crate::export::catalog;
use crate::model::{CaseStudy, TemplateMeta};
use crate::store::TemplateStore;

/// MIME type of an exported deck.
pub const PRESENTATION_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Fills a template package with the data of one case study.
///
/// The template is parsed once at construction and never mutated: each
/// export walks an in-memory copy and serializes a fresh package, so one
/// exporter can serve any number of records.
///
/// # Examples
///
/// ```rust,no_run
/// use casedeck::export::DeckExporter;
/// use casedeck::model::CaseStudyDraft;
/// use casedeck::store::CaseStudyStore;
///
/// let store = CaseStudyStore::new();
/// let record = store.insert(CaseStudyDraft {
///     project_name: "Customer Portal".into(),
///     client_name: "Acme".into(),
///     challenge: "Legacy systems".into(),
///     solution: "Cloud migration".into(),
///     outcomes: "Reduced costs".into(),
///     ..Default::default()
/// })?;
///
/// let exporter = DeckExporter::open("template.pptx")?;
/// let deck = exporter.export(&record)?;
/// std::fs::write("filled.pptx", deck)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DeckExporter {
    template: DeckPackage,
}

impl DeckExporter {
    /// Build an exporter from template bytes.
    pub fn new(template_bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            template: DeckPackage::from_bytes(template_bytes)?,
        })
    }

    /// Build an exporter from a template file on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            template: DeckPackage::open(path)?,
        })
    }

    /// Build an exporter from an already parsed package.
    pub fn from_package(template: DeckPackage) -> Self {
        Self { template }
    }

    /// The parsed template package.
    #[inline]
    pub fn template(&self) -> &DeckPackage {
        &self.template
    }

    /// Export a record, stamping today's local date.
    pub fn export(&self, record: &CaseStudy) -> Result<Vec<u8>> {
        self.export_on(record, Local::now().date_naive())
    }

    /// Export a record with an explicit export date.
    ///
    /// Exporting the same record at the same date is deterministic down to
    /// the byte: untouched slide parts are raw-copied from the template.
    pub fn export_on(&self, record: &CaseStudy, exported_on: NaiveDate) -> Result<Vec<u8>> {
        let map = catalog::resolve(record, exported_on);
        let mut replacer = RunReplacer::new(&map);
        let replaced = walk(&self.template, &mut replacer)?;
        let bytes = self.template.rewrite(&replaced)?;
        info!(
            record = record.id,
            slides = self.template.slide_parts().len(),
            rewritten = replaced.len(),
            "deck exported"
        );
        Ok(bytes)
    }

    /// Export a record straight to a file.
    ///
    /// The deck is written to a named temp file in the target directory and
    /// atomically persisted, so a failure never leaves partial output at
    /// `path`.
    pub fn export_to_file<P: AsRef<Path>>(&self, record: &CaseStudy, path: P) -> Result<()> {
        let bytes = self.export(record)?;
        write_atomic(path.as_ref(), &bytes)
    }
}

/// Resolve the template to export with: an explicit id, or the store's
/// default. Fails with [`Error::MissingDefaultTemplate`] when no id is
/// given and no default is set.
pub fn exporter_for(
    store: &TemplateStore,
    template_id: Option<u64>,
) -> Result<(DeckExporter, TemplateMeta)> {
    let meta = match template_id {
        Some(id) => store.get(id)?,
        None => store
            .default_template()
            .ok_or(Error::MissingDefaultTemplate)?,
    };
    let exporter = DeckExporter::open(&meta.file_path)?;
    Ok((exporter, meta))
}

/// Conventional output filename for an export at a given instant, e.g.
/// `case_study_7_20250105_093000.pptx`.
pub fn suggested_filename(record: &CaseStudy, at: DateTime<Utc>) -> String {
    format!("case_study_{}_{}.pptx", record.id, at.format("%Y%m%d_%H%M%S"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)
        .map_err(|e| Error::ExportWrite(format!("create temp file: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| Error::ExportWrite(format!("write deck: {e}")))?;
    tmp.persist(path)
        .map_err(|e| Error::ExportWrite(format!("persist deck: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_suggested_filename() {
        let now = Utc.with_ymd_and_hms(2025, 1, 5, 9, 30, 0).unwrap();
        let record = CaseStudy {
            id: 7,
            project_name: "Portal".into(),
            client_name: "Acme".into(),
            industry: None,
            project_year: None,
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
            created_at: now,
            updated_at: now,
            attachments: Vec::new(),
        };
        assert_eq!(
            suggested_filename(&record, now),
            "case_study_7_20250105_093000.pptx"
        );
    }

    #[test]
    fn test_exporter_for_without_default() {
        let store = TemplateStore::new();
        assert!(matches!(
            exporter_for(&store, None),
            Err(Error::MissingDefaultTemplate)
        ));
    }

    #[test]
    fn test_exporter_for_unknown_id() {
        let store = TemplateStore::new();
        assert!(matches!(
            exporter_for(&store, Some(9)),
            Err(Error::TemplateNotFound(9))
        ));
    }
}
