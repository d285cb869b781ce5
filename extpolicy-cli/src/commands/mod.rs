pub mod config;
pub mod install;
pub mod remove;
pub mod show;

use std::collections::HashMap;

use anyhow::Result;
use clap::Args;
use extpolicy_core::{
    ActionError, CustomActionData, ExtensionSettingsActions, FileStore, PolicyLocation, PolicyMerger,
    PolicyStore, URL_PARAM, UUID_PARAM,
};

use crate::config::{PolicyConfig, StoreBackend};

/// Extension parameters, from flags or from the installer
#[derive(Args, Debug, Default)]
pub struct ParamArgs {
    /// Extension identifier (overrides EXTENSIONSETTINGS_UUID)
    #[arg(long = "id")]
    pub id: Option<String>,

    /// Extension source URL (overrides EXTENSIONSETTINGS_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Installer CustomActionData, e.g. "EXTENSIONSETTINGS_UUID=...;EXTENSIONSETTINGS_URL=..."
    #[arg(long)]
    pub custom_action_data: Option<String>,
}

impl ParamArgs {
    /// Flag values under their parameter names
    pub fn flags(&self) -> HashMap<String, String> {
        let mut flags = HashMap::new();
        if let Some(id) = &self.id {
            flags.insert(UUID_PARAM.to_string(), id.clone());
        }
        if let Some(url) = &self.url {
            flags.insert(URL_PARAM.to_string(), url.clone());
        }
        flags
    }

    pub fn custom_action_data(&self) -> CustomActionData {
        self.custom_action_data
            .as_deref()
            .map(CustomActionData::parse)
            .unwrap_or_default()
    }
}

/// Work to run against whichever store the config selects
pub trait StoreJob {
    type Output;

    fn run<S: PolicyStore>(
        self,
        actions: &ExtensionSettingsActions<'_, S>,
    ) -> Result<Self::Output, ActionError>;
}

/// Build the configured store and run `job` on it.
pub fn with_store<J: StoreJob>(config: &PolicyConfig, job: J) -> Result<J::Output> {
    let merger = PolicyMerger::new(config.install_on_corrupt);
    let location = PolicyLocation::from(&config.location);
    match config.store.backend {
        StoreBackend::File => {
            let store = FileStore::new(&config.store.root);
            Ok(job.run(&ExtensionSettingsActions::new(&store, location, merger))?)
        }
        #[cfg(windows)]
        StoreBackend::Registry => {
            let store = extpolicy_core::RegistryStore::local_machine();
            Ok(job.run(&ExtensionSettingsActions::new(&store, location, merger))?)
        }
        #[cfg(not(windows))]
        StoreBackend::Registry => {
            anyhow::bail!("The registry store is only available on Windows; set store.backend = \"file\"")
        }
    }
}
