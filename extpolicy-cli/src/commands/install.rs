use anyhow::Result;
use clap::Args;
use extpolicy_core::{
    ActionError, EnvParameters, ExtensionSettingsActions, LayeredParameters, PolicyStore,
};

use super::{ParamArgs, StoreJob, with_store};
use crate::config::PolicyConfig;

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[command(flatten)]
    pub params: ParamArgs,
}

struct Install<'a>(&'a ParamArgs);

impl StoreJob for Install<'_> {
    type Output = ();

    fn run<S: PolicyStore>(self, actions: &ExtensionSettingsActions<'_, S>) -> Result<(), ActionError> {
        let flags = self.0.flags();
        let data = self.0.custom_action_data();
        let params = LayeredParameters::new()
            .with(&flags)
            .with(&data)
            .with(&EnvParameters);
        actions.install(&params)
    }
}

pub fn run(args: InstallArgs, config: &PolicyConfig) -> Result<()> {
    with_store(config, Install(&args.params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreBackend, StoreConfig};
    use extpolicy_core::{FileStore, PolicyBlob, PolicyLocation, PolicyMerger};
    use tempfile::TempDir;

    fn file_config(dir: &TempDir) -> PolicyConfig {
        PolicyConfig {
            store: StoreConfig {
                backend: StoreBackend::File,
                root: dir.path().to_path_buf(),
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_install_from_custom_action_data() {
        let temp_dir = TempDir::new().unwrap();
        let config = file_config(&temp_dir);
        let args = InstallArgs {
            params: ParamArgs {
                custom_action_data: Some(
                    "EXTENSIONSETTINGS_UUID={ext};EXTENSIONSETTINGS_URL=https://example.com/e.xpi"
                        .into(),
                ),
                ..Default::default()
            },
        };

        run(args, &config).unwrap();

        let store = FileStore::new(temp_dir.path());
        let actions =
            ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
        let blob = PolicyBlob::parse(&actions.blob().unwrap().unwrap()).unwrap();
        assert_eq!(
            blob.state("{ext}"),
            extpolicy_core::ExtensionState::Installed {
                url: Some("https://example.com/e.xpi".into())
            }
        );
    }

    #[test]
    fn test_flags_override_custom_action_data() {
        let temp_dir = TempDir::new().unwrap();
        let config = file_config(&temp_dir);
        let args = InstallArgs {
            params: ParamArgs {
                id: None,
                url: Some("https://flag".into()),
                custom_action_data: Some(
                    "EXTENSIONSETTINGS_UUID=X;EXTENSIONSETTINGS_URL=https://data".into(),
                ),
            },
        };

        run(args, &config).unwrap();

        let store = FileStore::new(temp_dir.path());
        let actions =
            ExtensionSettingsActions::new(&store, PolicyLocation::default(), PolicyMerger::default());
        assert_eq!(
            actions.state("X").unwrap(),
            extpolicy_core::ExtensionState::Installed {
                url: Some("https://flag".into())
            }
        );
    }
}
