//! Case-study record store.

use std::path::PathBuf;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::common::error::{Error, Result};
use crate::model::{Attachment, CaseStudy, CaseStudyDraft};

/// Thread-safe, insertion-ordered store of case-study records.
///
/// Records keep their insertion order in [`list`](Self::list), so the
/// collection is stably ordered before any sort is applied. All accessors
/// hand out clones; the lock is never held across caller code.
pub struct CaseStudyStore {
    inner: RwLock<Inner>,
}

struct Inner {
    records: Vec<CaseStudy>,
    next_record_id: u64,
    next_attachment_id: u64,
}

impl CaseStudyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                records: Vec::new(),
                next_record_id: 1,
                next_attachment_id: 1,
            }),
        }
    }

    /// Insert a new record from a draft.
    ///
    /// Validates the required fields, stamps the id and both timestamps,
    /// and returns the stored record.
    pub fn insert(&self, draft: CaseStudyDraft) -> Result<CaseStudy> {
        validate_required(&draft)?;
        let now = Utc::now();
        let mut inner = self.inner.write();
        let id = inner.next_record_id;
        inner.next_record_id += 1;
        let record = CaseStudy {
            id,
            project_name: draft.project_name,
            client_name: draft.client_name,
            industry: draft.industry,
            project_year: draft.project_year,
            challenge: draft.challenge,
            solution: draft.solution,
            outcomes: draft.outcomes,
            technologies: draft.technologies,
            team_size: draft.team_size,
            duration_months: draft.duration_months,
            tags: draft.tags,
            project_value: draft.project_value,
            confidential: draft.confidential,
            created_by: draft.created_by,
            created_at: now,
            updated_at: now,
            attachments: Vec::new(),
        };
        inner.records.push(record.clone());
        debug!(id, "case study inserted");
        Ok(record)
    }

    /// Look up a record by id.
    pub fn get(&self, id: u64) -> Result<CaseStudy> {
        let inner = self.inner.read();
        inner
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(Error::RecordNotFound(id))
    }

    /// Snapshot of all records in insertion order.
    pub fn list(&self) -> Vec<CaseStudy> {
        self.inner.read().records.clone()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Apply a mutation to a record, bump `updated_at`, and return the new
    /// state.
    ///
    /// The mutation is applied to a copy and committed only after the
    /// required fields re-validate, so a bad edit never lands in the store.
    pub fn update<F>(&self, id: u64, f: F) -> Result<CaseStudy>
    where
        F: FnOnce(&mut CaseStudy),
    {
        let mut inner = self.inner.write();
        let slot = inner
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(Error::RecordNotFound(id))?;
        let mut updated = slot.clone();
        f(&mut updated);
        updated.id = id;
        updated.created_at = slot.created_at;
        validate_required_record(&updated)?;
        updated.updated_at = Utc::now();
        *slot = updated.clone();
        debug!(id, "case study updated");
        Ok(updated)
    }

    /// Attach a file to a record and return the stored attachment.
    pub fn add_attachment(
        &self,
        record_id: u64,
        filename: String,
        original_filename: String,
        file_path: PathBuf,
        file_type: Option<String>,
    ) -> Result<Attachment> {
        let mut inner = self.inner.write();
        let attachment_id = inner.next_attachment_id;
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.id == record_id)
            .ok_or(Error::RecordNotFound(record_id))?;
        let attachment = Attachment {
            id: attachment_id,
            filename,
            original_filename,
            file_path,
            file_type,
            uploaded_at: Utc::now(),
        };
        record.attachments.push(attachment.clone());
        inner.next_attachment_id += 1;
        debug!(record_id, attachment_id, "attachment added");
        Ok(attachment)
    }

    /// Attachments owned by a record.
    pub fn attachments_of(&self, record_id: u64) -> Result<Vec<Attachment>> {
        Ok(self.get(record_id)?.attachments)
    }

    /// Detach and return a record. Attachment files on disk are left alone;
    /// use [`delete_with_files`](Self::delete_with_files) for the full
    /// removal.
    pub fn delete(&self, id: u64) -> Result<CaseStudy> {
        let mut inner = self.inner.write();
        let pos = inner
            .records
            .iter()
            .position(|r| r.id == id)
            .ok_or(Error::RecordNotFound(id))?;
        let record = inner.records.remove(pos);
        debug!(id, "case study deleted");
        Ok(record)
    }

    /// Remove a record together with its attachment files.
    ///
    /// The files go first, then the record. A file that cannot be removed
    /// (already gone, permissions) is logged and skipped so the record
    /// itself is still deleted.
    pub fn delete_with_files(&self, id: u64) -> Result<CaseStudy> {
        let attachments = self.attachments_of(id)?;
        for attachment in &attachments {
            if let Err(err) = std::fs::remove_file(&attachment.file_path) {
                warn!(
                    path = %attachment.file_path.display(),
                    %err,
                    "failed to remove attachment file"
                );
            }
        }
        self.delete(id)
    }
}

impl Default for CaseStudyStore {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_required(draft: &CaseStudyDraft) -> Result<()> {
    check_field("project_name", &draft.project_name)?;
    check_field("client_name", &draft.client_name)?;
    check_field("challenge", &draft.challenge)?;
    check_field("solution", &draft.solution)?;
    check_field("outcomes", &draft.outcomes)
}

fn validate_required_record(record: &CaseStudy) -> Result<()> {
    check_field("project_name", &record.project_name)?;
    check_field("client_name", &record.client_name)?;
    check_field("challenge", &record.challenge)?;
    check_field("solution", &record.solution)?;
    check_field("outcomes", &record.outcomes)
}

fn check_field(name: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::MissingRequiredField(name));
    }
    Ok(())
}
