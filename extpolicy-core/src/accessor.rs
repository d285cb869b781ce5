//! Read and write the policy value at its fixed location.
//!
//! The store has no JSON value type, so the blob is kept as a multi-string
//! value with one line per element: split on `\n` when writing, joined with
//! `\n` when reading. Plain string values written by hand are accepted too.

use tracing::debug;

use crate::error::StoreError;
use crate::store::{PolicyStore, StoreValue};

pub const DEFAULT_VENDOR_ROOT: &str = r"Software\Policies\Mozilla";
pub const DEFAULT_PRODUCT: &str = "Firefox";
pub const DEFAULT_VALUE_NAME: &str = "ExtensionSettings";

/// Where the policy value lives: `<vendor_root>\<product>`, value `<value_name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyLocation {
    /// One or more levels separated by `\` or `/`
    pub vendor_root: String,
    pub product: String,
    pub value_name: String,
}

impl Default for PolicyLocation {
    fn default() -> Self {
        Self {
            vendor_root: DEFAULT_VENDOR_ROOT.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            value_name: DEFAULT_VALUE_NAME.to_string(),
        }
    }
}

impl PolicyLocation {
    /// Key path levels, vendor root first
    pub fn segments(&self) -> Vec<&str> {
        self.vendor_root
            .split(['\\', '/'])
            .chain(std::iter::once(self.product.as_str()))
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Split blob text into store lines. A trailing `\r` is dropped from each.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

pub struct PolicyStoreAccessor<'s, S: PolicyStore> {
    store: &'s S,
    location: PolicyLocation,
}

impl<'s, S: PolicyStore> PolicyStoreAccessor<'s, S> {
    pub fn new(store: &'s S, location: PolicyLocation) -> Self {
        Self { store, location }
    }

    pub fn location(&self) -> &PolicyLocation {
        &self.location
    }

    /// Open `<vendor_root>\<product>`, creating missing levels.
    pub fn open(&self) -> Result<S::Handle, StoreError> {
        let segments = self.location.segments();
        debug!("Opening policy location {}", segments.join("\\"));
        self.store.open_or_create(&segments)
    }

    /// Open the location only if it already exists.
    pub fn open_existing(&self) -> Result<Option<S::Handle>, StoreError> {
        self.store.open_existing(&self.location.segments())
    }

    /// Text of value `name`, or `default` when it is missing or not text.
    pub fn read_value(
        &self,
        handle: &S::Handle,
        name: &str,
        default: Option<&str>,
    ) -> Result<Option<String>, StoreError> {
        let value = self.store.get(handle, name)?;
        Ok(match value.as_ref().and_then(StoreValue::to_text) {
            Some(text) => Some(text),
            None => {
                if let Some(value) = &value {
                    debug!("Ignoring {} value {} of kind {}", self.location.product, name, value.kind());
                }
                default.map(str::to_string)
            }
        })
    }

    /// Store `text` as a multi-string value, replacing whatever was there.
    pub fn write_value(&self, handle: &S::Handle, name: &str, text: &str) -> Result<(), StoreError> {
        let lines = split_lines(text);
        debug!("Writing {} lines to value {}", lines.len(), name);
        self.store.set(handle, name, StoreValue::MultiString(lines))
    }
}
