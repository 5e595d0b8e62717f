//! One JSON file per key under a data directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::errors::DomainError;

use super::KeyValueStore;

pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, DomainError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .map_err(|e| DomainError::Internal(format!("cannot create data dir: {e}")))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for JsonFileStore {
    fn load(&self, key: &str) -> Result<Option<Value>, DomainError> {
        let bytes = match fs::read(self.path_for(key)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(DomainError::Internal(format!("read {key}: {e}"))),
        };
        let value = serde_json::from_slice(&bytes)
            .map_err(|e| DomainError::Internal(format!("parse {key}: {e}")))?;
        Ok(Some(value))
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), DomainError> {
        // Write to a sibling temp file and rename so a crash mid-write never
        // leaves a truncated collection behind.
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let bytes = serde_json::to_vec_pretty(value)
            .map_err(|e| DomainError::Internal(format!("encode {key}: {e}")))?;
        fs::write(&tmp, bytes).map_err(|e| DomainError::Internal(format!("write {key}: {e}")))?;
        fs::rename(&tmp, &path)
            .map_err(|e| DomainError::Internal(format!("commit {key}: {e}")))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), DomainError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::Internal(format!("remove {key}: {e}"))),
        }
    }
}
