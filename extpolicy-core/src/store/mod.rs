//! Persistent key-value store seam.
//!
//! A store is a tree of keys, each holding named values. This mirrors the
//! machine policy store the browser reads: the Windows registry in
//! production, a directory tree or an in-memory map elsewhere.

mod file;
mod memory;
#[cfg(windows)]
mod registry;

pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(windows)]
pub use registry::RegistryStore;

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A value as the store holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum StoreValue {
    String(String),
    ExpandString(String),
    /// Ordered lines; how the store represents multi-line text.
    MultiString(Vec<String>),
    /// Any non-text value (binary, numeric). Holds the kind name.
    Other(String),
}

impl StoreValue {
    /// Text content, with multi-string lines joined by `\n`.
    ///
    /// Returns `None` for non-text values.
    pub fn to_text(&self) -> Option<String> {
        match self {
            StoreValue::String(s) | StoreValue::ExpandString(s) => Some(s.clone()),
            StoreValue::MultiString(lines) => Some(lines.join("\n")),
            StoreValue::Other(_) => None,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            StoreValue::String(_) => "string",
            StoreValue::ExpandString(_) => "expand_string",
            StoreValue::MultiString(_) => "multi_string",
            StoreValue::Other(kind) => kind,
        }
    }
}

/// Backend trait for the policy store.
///
/// Handles are scoped to one key and are obtained only through
/// [`PolicyStore::open_or_create`] or [`PolicyStore::open_existing`].
pub trait PolicyStore {
    type Handle;

    /// Open the key at `path`, creating every missing level.
    ///
    /// Succeeds when the key already exists.
    fn open_or_create(&self, path: &[&str]) -> Result<Self::Handle, StoreError>;

    /// Open the key at `path` without creating anything.
    fn open_existing(&self, path: &[&str]) -> Result<Option<Self::Handle>, StoreError>;

    fn get(&self, handle: &Self::Handle, name: &str) -> Result<Option<StoreValue>, StoreError>;

    /// Replace the value `name` entirely.
    fn set(&self, handle: &Self::Handle, name: &str, value: StoreValue) -> Result<(), StoreError>;
}

/// Reject segments that would escape or alias a key level.
pub(crate) fn validate_segment(segment: &str) -> Result<(), StoreError> {
    if segment.is_empty()
        || segment == "."
        || segment == ".."
        || segment.contains(['/', '\\', '\0'])
    {
        return Err(StoreError::InvalidPath(segment.to_string()));
    }
    Ok(())
}

/// Display form of a key path, registry style.
pub(crate) fn display_path(path: &[&str]) -> String {
    path.join("\\")
}
