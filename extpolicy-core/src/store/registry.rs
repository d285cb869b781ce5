//! Windows registry policy store
//!
//! Keys live under `HKEY_LOCAL_MACHINE`, which is where the browser reads
//! machine-wide policy. Writing there requires an elevated process.

use std::io;

use tracing::debug;
use winreg::enums::{HKEY_LOCAL_MACHINE, RegType};
use winreg::types::{FromRegValue, ToRegValue};
use winreg::{RegKey, RegValue};

use super::{PolicyStore, StoreValue, display_path, validate_segment};
use crate::error::StoreError;

/// Registry-backed store
pub struct RegistryStore {
    root: RegKey,
}

impl RegistryStore {
    /// Store rooted at `HKEY_LOCAL_MACHINE`
    pub fn local_machine() -> Self {
        Self {
            root: RegKey::predef(HKEY_LOCAL_MACHINE),
        }
    }
}

impl PolicyStore for RegistryStore {
    type Handle = RegKey;

    fn open_or_create(&self, path: &[&str]) -> Result<RegKey, StoreError> {
        let open_error = |source| StoreError::Open {
            path: display_path(path),
            source,
        };
        let mut segments = path.iter();
        let Some(first) = segments.next() else {
            return Err(StoreError::InvalidPath(String::new()));
        };
        validate_segment(first)?;
        let (mut key, _) = self.root.create_subkey(first).map_err(open_error)?;
        for segment in segments {
            validate_segment(segment)?;
            let (child, _) = key.create_subkey(segment).map_err(open_error)?;
            key = child;
        }
        debug!("Opened registry key {}", display_path(path));
        Ok(key)
    }

    fn open_existing(&self, path: &[&str]) -> Result<Option<RegKey>, StoreError> {
        for segment in path {
            validate_segment(segment)?;
        }
        match self.root.open_subkey(display_path(path)) {
            Ok(key) => Ok(Some(key)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Open {
                path: display_path(path),
                source,
            }),
        }
    }

    fn get(&self, handle: &RegKey, name: &str) -> Result<Option<StoreValue>, StoreError> {
        let read_error = |source| StoreError::Read {
            name: name.to_string(),
            source,
        };
        let raw = match handle.get_raw_value(name) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(read_error(source)),
        };
        let value = match raw.vtype {
            RegType::REG_SZ => StoreValue::String(String::from_reg_value(&raw).map_err(read_error)?),
            RegType::REG_EXPAND_SZ => {
                StoreValue::ExpandString(String::from_reg_value(&raw).map_err(read_error)?)
            }
            RegType::REG_MULTI_SZ => {
                StoreValue::MultiString(Vec::<String>::from_reg_value(&raw).map_err(read_error)?)
            }
            ref other => StoreValue::Other(format!("{:?}", other)),
        };
        Ok(Some(value))
    }

    fn set(&self, handle: &RegKey, name: &str, value: StoreValue) -> Result<(), StoreError> {
        let write_error = |source| StoreError::Write {
            name: name.to_string(),
            source,
        };
        match value {
            StoreValue::String(text) => handle.set_value(name, &text).map_err(write_error),
            StoreValue::ExpandString(text) => {
                let raw = RegValue {
                    bytes: text.to_reg_value().bytes,
                    vtype: RegType::REG_EXPAND_SZ,
                };
                handle.set_raw_value(name, &raw).map_err(write_error)
            }
            StoreValue::MultiString(lines) => handle.set_value(name, &lines).map_err(write_error),
            StoreValue::Other(kind) => Err(StoreError::UnsupportedKind {
                name: name.to_string(),
                kind,
            }),
        }
    }
}
