use anyhow::Result;
use clap::Args;
use extpolicy_core::{ActionError, ExtensionSettingsActions, ExtensionState, PolicyStore};

use super::{StoreJob, with_store};
use crate::config::PolicyConfig;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Show only where this extension stands
    #[arg(long = "id")]
    pub id: Option<String>,
}

enum Shown {
    Blob(Option<String>),
    State(ExtensionState),
}

struct Show<'a>(Option<&'a str>);

impl StoreJob for Show<'_> {
    type Output = Shown;

    fn run<S: PolicyStore>(
        self,
        actions: &ExtensionSettingsActions<'_, S>,
    ) -> Result<Shown, ActionError> {
        match self.0 {
            Some(id) => actions.state(id).map(Shown::State),
            None => actions.blob().map(Shown::Blob),
        }
    }
}

pub fn run(args: ShowArgs, config: &PolicyConfig) -> Result<()> {
    match with_store(config, Show(args.id.as_deref()))? {
        Shown::Blob(Some(text)) => println!("{}", text),
        Shown::Blob(None) => println!("No {} policy set", config.location.value_name),
        Shown::State(state) => println!("{}", state),
    }
    Ok(())
}
