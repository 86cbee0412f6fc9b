//! One-file-per-key JSON slot store.

use std::path::PathBuf;

use super::lock::with_lock;
use super::KeyValueStore;
use crate::error::{Error, Result};

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create the store, making `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn slot_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
            && !key.starts_with('.');
        if !valid {
            return Err(Error::Storage(format!("Invalid slot key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for JsonFileStore {
    fn name(&self) -> &str {
        "json"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(&path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.slot_path(key)?;
        with_lock(&path, || {
            // Write then rename so readers never see a torn snapshot.
            let tmp = path.with_extension("json.tmp");
            std::fs::write(&tmp, value)?;
            std::fs::rename(&tmp, &path)?;
            tracing::trace!("Wrote slot {} ({} bytes)", key, value.len());
            Ok(())
        })
    }
}
