//! extpolicy-core: browser extension policy for installer hooks
//!
//! Installers call into this crate to force-install a browser extension
//! machine-wide, and to block it again on uninstall, by editing the browser's
//! `ExtensionSettings` policy:
//!
//! - **Store** - [`PolicyStore`] trait with [`MemoryStore`], [`FileStore`] and
//!   (on Windows) `RegistryStore` backends
//! - **Accessor** - [`PolicyStoreAccessor`] reads and writes the policy text at
//!   its fixed location
//! - **Merge** - [`PolicyMerger`] inserts a force-install or blocked entry for
//!   one extension, leaving every other entry as it was
//! - **Actions** - [`ExtensionSettingsActions`] ties parameters, store and merge
//!   together for the installer
//!
//! # Quick Start
//!
//! ```
//! use std::collections::HashMap;
//! use extpolicy_core::{
//!     ExtensionSettingsActions, MemoryStore, PolicyLocation, PolicyMerger, UUID_PARAM, URL_PARAM,
//! };
//!
//! let store = MemoryStore::new();
//! let actions =
//!     ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
//!
//! let params = HashMap::from([
//!     (UUID_PARAM.to_string(), "{ext-id}".to_string()),
//!     (URL_PARAM.to_string(), "https://example.com/ext.xpi".to_string()),
//! ]);
//! actions.install(&params).unwrap();
//! ```

pub mod accessor;
pub mod actions;
pub mod error;
pub mod merger;
pub mod params;
pub mod policy;
pub mod store;

pub use accessor::{PolicyLocation, PolicyStoreAccessor};
pub use actions::{ActionResult, ERROR_INSTALL_FAILURE, ExtensionSettingsActions};
pub use error::{ActionError, PolicyError, StoreError};
pub use merger::{CorruptBlobPolicy, PolicyMerger};
pub use params::{
    CustomActionData, EnvParameters, InstallRequest, LayeredParameters, ParameterSource,
    RemoveRequest, URL_PARAM, UUID_PARAM,
};
pub use policy::{ExtensionState, InstallationMode, PolicyBlob, PolicyEntry};
#[cfg(windows)]
pub use store::RegistryStore;
pub use store::{FileStore, MemoryStore, PolicyStore, StoreValue};
