//! Deck template store.

use std::path::PathBuf;

use chrono::Utc;
use parking_lot::RwLock;
use tracing::debug;

use crate::common::error::{Error, Result};
use crate::model::TemplateMeta;

/// Thread-safe registry of uploaded deck templates.
///
/// Invariant: at most one template has `is_default = true`. Both the
/// registration path and [`set_default`](Self::set_default) perform the
/// clear-then-set transition under a single write lock, so concurrent
/// readers never observe two defaults.
pub struct TemplateStore {
    inner: RwLock<Inner>,
}

struct Inner {
    templates: Vec<TemplateMeta>,
    next_id: u64,
}

impl TemplateStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                templates: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Register an uploaded template.
    ///
    /// With `make_default` the new template claims the default flag in the
    /// same write lock that registers it, demoting any previous holder.
    pub fn register(
        &self,
        name: &str,
        filename: &str,
        file_path: impl Into<PathBuf>,
        description: Option<&str>,
        make_default: bool,
    ) -> TemplateMeta {
        let mut inner = self.inner.write();
        if make_default {
            for template in &mut inner.templates {
                template.is_default = false;
            }
        }
        let id = inner.next_id;
        inner.next_id += 1;
        let meta = TemplateMeta {
            id,
            name: name.to_owned(),
            filename: filename.to_owned(),
            file_path: file_path.into(),
            description: description.map(str::to_owned),
            is_default: make_default,
            uploaded_at: Utc::now(),
        };
        inner.templates.push(meta.clone());
        debug!(id, default = make_default, "template registered");
        meta
    }

    /// Look up a template by id.
    pub fn get(&self, id: u64) -> Result<TemplateMeta> {
        let inner = self.inner.read();
        inner
            .templates
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(Error::TemplateNotFound(id))
    }

    /// Snapshot of all templates in registration order.
    pub fn list(&self) -> Vec<TemplateMeta> {
        self.inner.read().templates.clone()
    }

    /// The current default template, if any.
    pub fn default_template(&self) -> Option<TemplateMeta> {
        let inner = self.inner.read();
        inner.templates.iter().find(|t| t.is_default).cloned()
    }

    /// Make `id` the sole default.
    ///
    /// Clearing the previous holder and setting the new one happen under
    /// one write lock.
    pub fn set_default(&self, id: u64) -> Result<TemplateMeta> {
        let mut inner = self.inner.write();
        if !inner.templates.iter().any(|t| t.id == id) {
            return Err(Error::TemplateNotFound(id));
        }
        let mut chosen = None;
        for template in &mut inner.templates {
            template.is_default = template.id == id;
            if template.is_default {
                chosen = Some(template.clone());
            }
        }
        debug!(id, "default template changed");
        Ok(chosen.expect("template present under the same lock"))
    }

    /// Remove a template and return its metadata.
    pub fn delete(&self, id: u64) -> Result<TemplateMeta> {
        let mut inner = self.inner.write();
        let pos = inner
            .templates
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::TemplateNotFound(id))?;
        let meta = inner.templates.remove(pos);
        debug!(id, "template deleted");
        Ok(meta)
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}
