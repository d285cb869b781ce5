//! Extension policy model.
//!
//! The policy blob is a JSON object keyed by extension identifier. Entries
//! this crate writes are typed as [`PolicyEntry`]; every other key is carried
//! as raw JSON so that a read-modify-write cycle leaves it untouched and in
//! place.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::PolicyError;

/// How the browser treats an extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallationMode {
    NormalInstalled,
    ForceInstalled,
    Allowed,
    Blocked,
    /// Any mode this crate does not know, kept verbatim.
    Other(String),
}

impl InstallationMode {
    pub fn as_str(&self) -> &str {
        match self {
            InstallationMode::NormalInstalled => "normal_installed",
            InstallationMode::ForceInstalled => "force_installed",
            InstallationMode::Allowed => "allowed",
            InstallationMode::Blocked => "blocked",
            InstallationMode::Other(mode) => mode,
        }
    }
}

impl From<&str> for InstallationMode {
    fn from(mode: &str) -> Self {
        match mode {
            "normal_installed" => InstallationMode::NormalInstalled,
            "force_installed" => InstallationMode::ForceInstalled,
            "allowed" => InstallationMode::Allowed,
            "blocked" => InstallationMode::Blocked,
            other => InstallationMode::Other(other.to_string()),
        }
    }
}

impl fmt::Display for InstallationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InstallationMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InstallationMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mode = String::deserialize(deserializer)?;
        Ok(InstallationMode::from(mode.as_str()))
    }
}

/// Policy for a single extension
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyEntry {
    pub installation_mode: InstallationMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_url: Option<String>,

    /// Fields written by other tools (e.g. `blocked_install_message`)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PolicyEntry {
    /// `{"installation_mode": "normal_installed", "install_url": url}`
    pub fn installed(url: impl Into<String>) -> Self {
        Self {
            installation_mode: InstallationMode::NormalInstalled,
            install_url: Some(url.into()),
            extra: Map::new(),
        }
    }

    /// `{"installation_mode": "blocked"}`
    pub fn blocked() -> Self {
        Self {
            installation_mode: InstallationMode::Blocked,
            install_url: None,
            extra: Map::new(),
        }
    }
}

/// Where one extension stands in a policy blob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionState {
    Absent,
    Installed { url: Option<String> },
    Blocked,
    /// Entry present with some other mode
    Other(String),
    /// Entry present but not shaped like a policy entry
    Unrecognized,
}

impl fmt::Display for ExtensionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtensionState::Absent => write!(f, "absent"),
            ExtensionState::Installed { url: Some(url) } => write!(f, "installed from {}", url),
            ExtensionState::Installed { url: None } => write!(f, "installed"),
            ExtensionState::Blocked => write!(f, "blocked"),
            ExtensionState::Other(mode) => write!(f, "{}", mode),
            ExtensionState::Unrecognized => write!(f, "unrecognized entry"),
        }
    }
}

/// The whole policy object, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyBlob {
    entries: Map<String, Value>,
}

impl PolicyBlob {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse blob text. Anything other than a JSON object is rejected.
    pub fn parse(text: &str) -> Result<Self, PolicyError> {
        match serde_json::from_str::<Value>(text).map_err(PolicyError::Parse)? {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(PolicyError::NotAnObject(json_kind(&other))),
        }
    }

    /// Replace the entry for `identifier` wholesale.
    ///
    /// An existing key keeps its position; a new key goes last.
    pub fn set_entry(&mut self, identifier: &str, entry: &PolicyEntry) -> Result<(), PolicyError> {
        let value = serde_json::to_value(entry).map_err(PolicyError::Serialize)?;
        self.entries.insert(identifier.to_string(), value);
        Ok(())
    }

    pub fn state(&self, identifier: &str) -> ExtensionState {
        let Some(value) = self.entries.get(identifier) else {
            return ExtensionState::Absent;
        };
        // Only the two owned fields are inspected; the rest of the entry may
        // hold anything.
        let Some(mode) = value.get("installation_mode").and_then(Value::as_str) else {
            return ExtensionState::Unrecognized;
        };
        match InstallationMode::from(mode) {
            InstallationMode::NormalInstalled | InstallationMode::ForceInstalled => {
                ExtensionState::Installed {
                    url: value
                        .get("install_url")
                        .and_then(Value::as_str)
                        .map(str::to_string),
                }
            }
            InstallationMode::Blocked => ExtensionState::Blocked,
            other => ExtensionState::Other(other.as_str().to_string()),
        }
    }

    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pretty-printed JSON text
    pub fn to_text(&self) -> Result<String, PolicyError> {
        serde_json::to_string_pretty(&self.entries).map_err(PolicyError::Serialize)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
