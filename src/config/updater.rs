use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::io::{load, save};
use super::merge::ensure_cred_helpers;
use super::path::config_path;
use crate::error::{Error, LoadFailure, Result};
use crate::models::Document;

/// Read-modify-write access to one Docker config file. Holds no state
/// between calls; every call reads the file again.
#[derive(Debug, Clone)]
pub struct Updater {
    path: PathBuf,
}

impl Updater {
    pub fn for_current_user() -> Result<Self> {
        Ok(Self { path: config_path()? })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Make sure every registry uses `helper`. Returns whether the file was rewritten.
    pub fn ensure_cred_helpers(&self, helper: &str, registries: &[String]) -> Result<bool> {
        let (document, dirty) = self.merged(helper, registries)?;
        if !dirty {
            info!(path = %self.path.display(), "credential helpers already up to date");
            return Ok(false);
        }
        save(&self.path, &document)?;
        info!(path = %self.path.display(), registries = registries.len(), "wrote credential helpers");
        Ok(true)
    }

    /// Same check as [`Updater::ensure_cred_helpers`] without writing anything.
    pub fn pending_cred_helpers(&self, helper: &str, registries: &[String]) -> Result<bool> {
        self.merged(helper, registries).map(|(_, dirty)| dirty)
    }

    fn merged(&self, helper: &str, registries: &[String]) -> Result<(Document, bool)> {
        let mut document = self.load_document()?;
        let dirty = ensure_cred_helpers(&mut document, helper, registries);
        debug!(helper, dirty, "merged credential helpers");
        Ok((document, dirty))
    }

    fn load_document(&self) -> Result<Document> {
        let failed = |source: LoadFailure| Error::Load { path: self.path.clone(), source };
        load(&self.path)
            .map_err(|e| failed(e.into()))?
            .into_document()
            .map_err(|e| failed(e.into()))
    }
}
