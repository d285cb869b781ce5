//! Install/remove merge of a single extension into the policy blob.
//!
//! Install replaces the extension's entry with a force-install entry; remove
//! replaces it with a blocked entry. Other keys are never touched. The
//! difference between the two is how they treat a broken starting blob:
//! install refuses to build on it, remove discards it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::PolicyError;
use crate::policy::{PolicyBlob, PolicyEntry};

/// Blob used when the store holds nothing
pub const EMPTY_BLOB: &str = "{}";

/// What install does with a blob that is not a JSON object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptBlobPolicy {
    /// Propagate the parse error
    #[default]
    Fail,
    /// Start again from an empty object
    Reset,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyMerger {
    on_corrupt_install: CorruptBlobPolicy,
}

impl PolicyMerger {
    pub fn new(on_corrupt_install: CorruptBlobPolicy) -> Self {
        Self { on_corrupt_install }
    }

    /// Force-install `identifier` from `url`.
    ///
    /// An absent or blank blob starts from `{}`.
    pub fn install(
        &self,
        blob: Option<&str>,
        identifier: &str,
        url: &str,
    ) -> Result<String, PolicyError> {
        let text = blob.filter(|b| !b.trim().is_empty()).unwrap_or(EMPTY_BLOB);
        let mut policy = match PolicyBlob::parse(text) {
            Ok(policy) => policy,
            Err(e) if self.on_corrupt_install == CorruptBlobPolicy::Reset => {
                warn!("Discarding unreadable extension policy before install: {}", e);
                PolicyBlob::new()
            }
            Err(e) => return Err(e),
        };
        policy.set_entry(identifier, &PolicyEntry::installed(url))?;
        policy.to_text()
    }

    /// Block `identifier`.
    ///
    /// Returns `None` when there is no blob, meaning nothing should be
    /// written.
    pub fn remove(&self, blob: Option<&str>, identifier: &str) -> Result<Option<String>, PolicyError> {
        let Some(text) = blob else {
            return Ok(None);
        };
        let mut policy = PolicyBlob::parse(text).unwrap_or_else(|e| {
            warn!("Discarding unreadable extension policy before remove: {}", e);
            PolicyBlob::new()
        });
        policy.set_entry(identifier, &PolicyEntry::blocked())?;
        policy.to_text().map(Some)
    }
}

/// [`PolicyMerger::install`] with the strict corrupt-blob policy
pub fn install(blob: Option<&str>, identifier: &str, url: &str) -> Result<String, PolicyError> {
    PolicyMerger::default().install(blob, identifier, url)
}

/// [`PolicyMerger::remove`]
pub fn remove(blob: Option<&str>, identifier: &str) -> Result<Option<String>, PolicyError> {
    PolicyMerger::default().remove(blob, identifier)
}
