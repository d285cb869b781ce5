use super::types::{
    LocationConfig, PolicyConfig, RawLocationConfig, RawPolicyConfig, RawStoreConfig, StoreConfig,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Overrides the user config file location
pub const CONFIG_ENV: &str = "EXTPOLICY_CONFIG";

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user file, then `explicit` on top)
    ///
    /// A missing user file is skipped; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<PolicyConfig> {
        let mut raw = RawPolicyConfig::default();

        // Layer 1: User config
        let user_path = Self::user_config_path();
        if user_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(&user_path)?);
        }

        // Layer 2: Explicit config
        if let Some(path) = explicit {
            raw = Self::merge_raw(raw, Self::read_raw(path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path
    /// Can be overridden with EXTPOLICY_CONFIG (installers running as SYSTEM have no useful home)
    pub fn user_config_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            PathBuf::from(path)
        } else {
            extpolicy_paths::config_dir().join("config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawPolicyConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawPolicyConfig, overlay: RawPolicyConfig) -> RawPolicyConfig {
        RawPolicyConfig {
            store: RawStoreConfig {
                backend: overlay.store.backend.or(base.store.backend),
                root: overlay.store.root.or(base.store.root),
            },
            location: RawLocationConfig {
                vendor_root: overlay.location.vendor_root.or(base.location.vendor_root),
                product: overlay.location.product.or(base.location.product),
                value_name: overlay.location.value_name.or(base.location.value_name),
            },
            install_on_corrupt: overlay.install_on_corrupt.or(base.install_on_corrupt),
        }
    }

    /// Convert raw config to final config with defaults applied
    fn finalize(raw: RawPolicyConfig) -> PolicyConfig {
        let store = StoreConfig::default();
        let location = LocationConfig::default();
        PolicyConfig {
            install_on_corrupt: raw.install_on_corrupt.unwrap_or_default(),
            store: StoreConfig {
                backend: raw.store.backend.unwrap_or(store.backend),
                root: raw.store.root.unwrap_or(store.root),
            },
            location: LocationConfig {
                vendor_root: raw.location.vendor_root.unwrap_or(location.vendor_root),
                product: raw.location.product.unwrap_or(location.product),
                value_name: raw.location.value_name.unwrap_or(location.value_name),
            },
        }
    }
}
