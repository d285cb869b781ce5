//! Installer custom actions.
//!
//! Each action reads the policy value fresh, merges one extension into it and
//! writes the whole value back. Errors are returned untouched so the caller
//! can log the full cause before reporting a generic failure.

use tracing::{debug, info};

use crate::accessor::{PolicyLocation, PolicyStoreAccessor};
use crate::error::ActionError;
use crate::merger::{EMPTY_BLOB, PolicyMerger};
use crate::params::{InstallRequest, ParameterSource, RemoveRequest};
use crate::policy::{ExtensionState, PolicyBlob};
use crate::store::PolicyStore;

/// Windows Installer `ERROR_INSTALL_FAILURE`
pub const ERROR_INSTALL_FAILURE: i32 = 1603;

/// Outcome reported back to the installer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Success,
    Failure,
}

impl ActionResult {
    pub fn exit_code(self) -> i32 {
        match self {
            ActionResult::Success => 0,
            ActionResult::Failure => ERROR_INSTALL_FAILURE,
        }
    }
}

impl<T, E> From<&Result<T, E>> for ActionResult {
    fn from(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            ActionResult::Success
        } else {
            ActionResult::Failure
        }
    }
}

/// The ExtensionSettings install and remove actions over one store
pub struct ExtensionSettingsActions<'s, S: PolicyStore> {
    accessor: PolicyStoreAccessor<'s, S>,
    merger: PolicyMerger,
}

impl<'s, S: PolicyStore> ExtensionSettingsActions<'s, S> {
    pub fn new(store: &'s S, location: PolicyLocation, merger: PolicyMerger) -> Self {
        Self {
            accessor: PolicyStoreAccessor::new(store, location),
            merger,
        }
    }

    /// Force-install the extension named by the parameters.
    pub fn install(&self, params: &dyn ParameterSource) -> Result<(), ActionError> {
        let request = InstallRequest::from_params(params)?;
        info!("Begin ExtensionSettingsInstall {}", request.identifier);

        let name = &self.accessor.location().value_name;
        let handle = self.accessor.open()?;
        let current = self.accessor.read_value(&handle, name, Some(EMPTY_BLOB))?;
        let updated = self
            .merger
            .install(current.as_deref(), &request.identifier, &request.url)?;
        self.accessor.write_value(&handle, name, &updated)?;
        Ok(())
    }

    /// Block the extension named by the parameters.
    ///
    /// Writes nothing when the policy value does not exist.
    pub fn remove(&self, params: &dyn ParameterSource) -> Result<(), ActionError> {
        let request = RemoveRequest::from_params(params)?;
        info!("Begin ExtensionSettingsRemove {}", request.identifier);

        let name = &self.accessor.location().value_name;
        let handle = self.accessor.open()?;
        let current = self.accessor.read_value(&handle, name, None)?;
        match self.merger.remove(current.as_deref(), &request.identifier)? {
            Some(updated) => self.accessor.write_value(&handle, name, &updated)?,
            None => debug!("No {} value, nothing to block", name),
        }
        Ok(())
    }

    /// Current policy text, without creating the location.
    pub fn blob(&self) -> Result<Option<String>, ActionError> {
        let Some(handle) = self.accessor.open_existing()? else {
            return Ok(None);
        };
        let name = &self.accessor.location().value_name;
        Ok(self.accessor.read_value(&handle, name, None)?)
    }

    /// Where `identifier` stands in the current policy.
    pub fn state(&self, identifier: &str) -> Result<ExtensionState, ActionError> {
        match self.blob()? {
            Some(text) => Ok(PolicyBlob::parse(&text)?.state(identifier)),
            None => Ok(ExtensionState::Absent),
        }
    }
}
