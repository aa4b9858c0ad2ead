//! JSON file backing: one `<collection>.json` object per collection

use super::document_store::StoreError;
use serde_json::Value;
use shared::Collection;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub(crate) struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub(crate) fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub(crate) fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    /// Load a collection; a missing file is an empty collection
    pub(crate) fn load(&self, collection: Collection) -> Result<BTreeMap<String, Value>, StoreError> {
        let path = self.path_for(collection);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = std::fs::read_to_string(&path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        let documents = serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;
        Ok(documents)
    }

    /// Rewrite a collection file; written to a temp file first, then renamed
    pub(crate) fn write(
        &self,
        collection: Collection,
        documents: &BTreeMap<String, Value>,
    ) -> Result<(), StoreError> {
        let path = self.path_for(collection);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(documents)?)?;
        std::fs::rename(&tmp, &path)?;
        Ok(())
    }
}
