//! Directory-tree policy store
//!
//! Each key level is a directory; the values of a key live in a single
//! `values.json` document inside it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{PolicyStore, StoreValue, display_path, validate_segment};
use crate::error::StoreError;

/// Values document file name
const VALUES_FILE: &str = "values.json";

type Values = BTreeMap<String, StoreValue>;

/// File-backed store rooted at a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn key_dir(&self, path: &[&str]) -> Result<PathBuf, StoreError> {
        let mut dir = self.root.clone();
        for segment in path {
            validate_segment(segment)?;
            dir.push(segment);
        }
        Ok(dir)
    }

    fn load(&self, dir: &Path, name: &str) -> Result<Values, StoreError> {
        let file_path = dir.join(VALUES_FILE);
        let content = match fs::read_to_string(&file_path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Values::new()),
            Err(source) => {
                return Err(StoreError::Read {
                    name: name.to_string(),
                    source,
                });
            }
        };
        serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
            path: file_path,
            message: e.to_string(),
        })
    }

    fn persist(&self, dir: &Path, name: &str, values: &Values) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            name: name.to_string(),
            source,
        };
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| write_error(io::Error::new(io::ErrorKind::InvalidData, e)))?;

        // Replace via rename so readers never see a half-written document.
        let tmp_path = dir.join(format!("{VALUES_FILE}.tmp"));
        fs::write(&tmp_path, content).map_err(write_error)?;
        fs::rename(&tmp_path, dir.join(VALUES_FILE)).map_err(write_error)?;
        Ok(())
    }
}

impl PolicyStore for FileStore {
    type Handle = PathBuf;

    fn open_or_create(&self, path: &[&str]) -> Result<PathBuf, StoreError> {
        let dir = self.key_dir(path)?;
        fs::create_dir_all(&dir).map_err(|source| StoreError::Open {
            path: display_path(path),
            source,
        })?;
        debug!("Opened store key {:?}", dir);
        Ok(dir)
    }

    fn open_existing(&self, path: &[&str]) -> Result<Option<PathBuf>, StoreError> {
        let dir = self.key_dir(path)?;
        Ok(dir.is_dir().then_some(dir))
    }

    fn get(&self, handle: &PathBuf, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let mut values = self.load(handle, name)?;
        Ok(values.remove(name))
    }

    fn set(&self, handle: &PathBuf, name: &str, value: StoreValue) -> Result<(), StoreError> {
        let mut values = self.load(handle, name)?;
        values.insert(name.to_string(), value);
        self.persist(handle, name, &values)?;
        debug!("Wrote value {} to {:?}", name, handle);
        Ok(())
    }
}
