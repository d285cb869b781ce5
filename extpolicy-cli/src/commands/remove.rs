use anyhow::Result;
use clap::Args;
use extpolicy_core::{
    ActionError, EnvParameters, ExtensionSettingsActions, LayeredParameters, PolicyStore,
};

use super::{ParamArgs, StoreJob, with_store};
use crate::config::PolicyConfig;

#[derive(Args, Debug)]
pub struct RemoveArgs {
    #[command(flatten)]
    pub params: ParamArgs,
}

struct Remove<'a>(&'a ParamArgs);

impl StoreJob for Remove<'_> {
    type Output = ();

    fn run<S: PolicyStore>(self, actions: &ExtensionSettingsActions<'_, S>) -> Result<(), ActionError> {
        let flags = self.0.flags();
        let data = self.0.custom_action_data();
        let params = LayeredParameters::new()
            .with(&flags)
            .with(&data)
            .with(&EnvParameters);
        actions.remove(&params)
    }
}

pub fn run(args: RemoveArgs, config: &PolicyConfig) -> Result<()> {
    with_store(config, Remove(&args.params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreBackend, StoreConfig};
    use extpolicy_core::{ExtensionState, FileStore, PolicyLocation, PolicyMerger};
    use tempfile::TempDir;

    fn args(id: &str) -> RemoveArgs {
        RemoveArgs {
            params: ParamArgs {
                id: Some(id.into()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_remove_blocks_after_install() {
        let temp_dir = TempDir::new().unwrap();
        let config = PolicyConfig {
            store: StoreConfig {
                backend: StoreBackend::File,
                root: temp_dir.path().to_path_buf(),
            },
            ..Default::default()
        };
        let install = crate::commands::install::InstallArgs {
            params: ParamArgs {
                id: Some("X".into()),
                url: Some("https://u".into()),
                custom_action_data: None,
            },
        };
        crate::commands::install::run(install, &config).unwrap();

        run(args("X"), &config).unwrap();

        let store = FileStore::new(temp_dir.path());
        let actions =
            ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
        assert_eq!(actions.state("X").unwrap(), ExtensionState::Blocked);
    }

    #[test]
    fn test_remove_on_empty_store_succeeds() {
        let temp_dir = TempDir::new().unwrap();
        let config = PolicyConfig {
            store: StoreConfig {
                backend: StoreBackend::File,
                root: temp_dir.path().to_path_buf(),
            },
            ..Default::default()
        };

        run(args("X"), &config).unwrap();

        let store = FileStore::new(temp_dir.path());
        let actions =
            ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
        assert!(actions.blob().unwrap().is_none());
    }
}
