//! Installer parameter resolution.
//!
//! A deferred installer action cannot read installer properties directly; it
//! receives a single `CustomActionData` string of `KEY=value` pairs separated
//! by `;` (a literal `;` is written `;;`). The same parameters may also come
//! from explicit command-line flags or the environment.

use std::collections::HashMap;

use crate::error::ActionError;

/// Extension identifier parameter
pub const UUID_PARAM: &str = "EXTENSIONSETTINGS_UUID";
/// Extension source URL parameter
pub const URL_PARAM: &str = "EXTENSIONSETTINGS_URL";

/// A lookup of named string parameters
pub trait ParameterSource {
    fn get(&self, name: &str) -> Option<String>;
}

impl ParameterSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

/// Parsed `CustomActionData`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomActionData {
    values: HashMap<String, String>,
}

impl CustomActionData {
    /// Parse `KEY=value;KEY=value`. Pairs without `=` are ignored.
    pub fn parse(data: &str) -> Self {
        let mut values = HashMap::new();
        for pair in split_pairs(data) {
            if let Some((key, value)) = pair.split_once('=') {
                let key = key.trim();
                if !key.is_empty() {
                    values.insert(key.to_string(), value.to_string());
                }
            }
        }
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ParameterSource for CustomActionData {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Split on `;`, turning `;;` into a literal `;`.
fn split_pairs(data: &str) -> Vec<String> {
    let mut pairs = Vec::new();
    let mut current = String::new();
    let mut chars = data.chars().peekable();
    while let Some(c) = chars.next() {
        if c != ';' {
            current.push(c);
        } else if chars.peek() == Some(&';') {
            chars.next();
            current.push(';');
        } else {
            pairs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        pairs.push(current);
    }
    pairs
}

/// Parameters from the process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvParameters;

impl ParameterSource for EnvParameters {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Several sources, first non-empty value wins
#[derive(Default)]
pub struct LayeredParameters<'a> {
    sources: Vec<&'a dyn ParameterSource>,
}

impl<'a> LayeredParameters<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source with lower priority than those already added.
    pub fn with(mut self, source: &'a dyn ParameterSource) -> Self {
        self.sources.push(source);
        self
    }
}

impl ParameterSource for LayeredParameters<'_> {
    fn get(&self, name: &str) -> Option<String> {
        self.sources
            .iter()
            .filter_map(|source| source.get(name))
            .find(|value| !value.trim().is_empty())
    }
}

/// Input of the install action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub identifier: String,
    pub url: String,
}

impl InstallRequest {
    pub fn from_params(params: &dyn ParameterSource) -> Result<Self, ActionError> {
        Ok(Self {
            identifier: required(params, UUID_PARAM)?,
            url: required(params, URL_PARAM)?,
        })
    }
}

/// Input of the remove action; the URL is not needed to block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveRequest {
    pub identifier: String,
}

impl RemoveRequest {
    pub fn from_params(params: &dyn ParameterSource) -> Result<Self, ActionError> {
        Ok(Self {
            identifier: required(params, UUID_PARAM)?,
        })
    }
}

/// Value of `name`, verbatim. Blank counts as missing.
fn required(params: &dyn ParameterSource, name: &'static str) -> Result<String, ActionError> {
    params
        .get(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ActionError::MissingParameter(name))
}
