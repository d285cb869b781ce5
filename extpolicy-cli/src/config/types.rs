use std::path::PathBuf;

use extpolicy_core::accessor::{DEFAULT_PRODUCT, DEFAULT_VALUE_NAME, DEFAULT_VENDOR_ROOT};
use extpolicy_core::{CorruptBlobPolicy, PolicyLocation};
use serde::{Deserialize, Serialize};

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawPolicyConfig {
    #[serde(default)]
    pub store: RawStoreConfig,

    #[serde(default)]
    pub location: RawLocationConfig,

    pub install_on_corrupt: Option<CorruptBlobPolicy>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawStoreConfig {
    pub backend: Option<StoreBackend>,

    /// Root directory of the file backend
    pub root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RawLocationConfig {
    pub vendor_root: Option<String>,
    pub product: Option<String>,
    pub value_name: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PolicyConfig {
    pub install_on_corrupt: CorruptBlobPolicy,
    pub store: StoreConfig,
    pub location: LocationConfig,
}

/// Which policy store to edit
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// `HKEY_LOCAL_MACHINE` (Windows only)
    Registry,
    /// Directory tree under `store.root`
    File,
}

impl Default for StoreBackend {
    fn default() -> Self {
        if cfg!(windows) {
            StoreBackend::Registry
        } else {
            StoreBackend::File
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub root: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            root: extpolicy_paths::store_dir(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationConfig {
    pub vendor_root: String,
    pub product: String,
    pub value_name: String,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            vendor_root: DEFAULT_VENDOR_ROOT.to_string(),
            product: DEFAULT_PRODUCT.to_string(),
            value_name: DEFAULT_VALUE_NAME.to_string(),
        }
    }
}

impl From<&LocationConfig> for PolicyLocation {
    fn from(config: &LocationConfig) -> Self {
        PolicyLocation {
            vendor_root: config.vendor_root.clone(),
            product: config.product.clone(),
            value_name: config.value_name.clone(),
        }
    }
}
