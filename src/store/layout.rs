//! On-disk directory layout for uploaded artifacts.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::Result;

/// Directory layout rooted at a base path: `uploads/` with `templates/` and
/// `attachments/` beneath it.
///
/// Pure filesystem bootstrapping for whatever layer stores uploads; the
/// engines themselves never read these paths.
#[derive(Debug, Clone)]
pub struct StorageLayout {
    pub upload_dir: PathBuf,
    pub template_dir: PathBuf,
    pub attachments_dir: PathBuf,
}

impl StorageLayout {
    /// Layout under `base`, mirroring the conventional directory names.
    pub fn new(base: impl AsRef<Path>) -> Self {
        let upload_dir = base.as_ref().join("uploads");
        let template_dir = upload_dir.join("templates");
        let attachments_dir = upload_dir.join("attachments");
        Self {
            upload_dir,
            template_dir,
            attachments_dir,
        }
    }

    /// Create all three directories, including missing parents.
    pub fn ensure_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.template_dir)?;
        fs::create_dir_all(&self.attachments_dir)?;
        Ok(())
    }
}
