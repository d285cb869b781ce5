//! Error types for extpolicy-core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a policy store backend.
///
/// None of these are recovered anywhere in the crate: a policy write that
/// fails must fail the installer step.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to open or create key {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read value {name}: {source}")]
    Read {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write value {name}: {source}")]
    Write {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid key path segment: {0:?}")]
    InvalidPath(String),

    #[error("Store document {path:?} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },

    #[error("Cannot write value {name} of kind {kind}")]
    UnsupportedKind { name: String, kind: String },
}

/// Errors from parsing or serializing a policy blob
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to parse policy JSON: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Policy JSON is not an object (found {0})")]
    NotAnObject(&'static str),

    #[error("Failed to serialize policy JSON: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Top-level error for the installer custom actions
#[derive(Error, Debug)]
pub enum ActionError {
    #[error("Missing required parameter {0}")]
    MissingParameter(&'static str),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_open_displays_path() {
        let error = StoreError::Open {
            path: r"Software\Policies\Mozilla".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied"),
        };
        assert!(error.to_string().contains(r"Software\Policies\Mozilla"));
        assert!(error.to_string().contains("access denied"));
    }

    #[test]
    fn policy_error_not_an_object_displays_kind() {
        let error = PolicyError::NotAnObject("array");
        assert!(error.to_string().contains("not an object"));
        assert!(error.to_string().contains("array"));
    }

    #[test]
    fn action_error_missing_parameter_names_parameter() {
        let error = ActionError::MissingParameter("EXTENSIONSETTINGS_UUID");
        assert_eq!(
            error.to_string(),
            "Missing required parameter EXTENSIONSETTINGS_UUID"
        );
    }

    #[test]
    fn action_error_converts_from_store_error() {
        let store_error = StoreError::InvalidPath("..".to_string());
        let error: ActionError = store_error.into();
        assert!(matches!(error, ActionError::Store(_)));
        assert!(error.to_string().starts_with("Store error"));
    }

    #[test]
    fn action_error_converts_from_policy_error() {
        let error: ActionError = PolicyError::NotAnObject("string").into();
        assert!(matches!(error, ActionError::Policy(_)));
    }
}
