//! Free-form per-kind options (file suffixes, flags, auxiliary paths).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobOptions(BTreeMap<String, String>);

impl JobOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Reject keys the job kind does not understand.
    ///
    /// A misspelled suffix option would otherwise silently fall back to the
    /// default and resolve to a different file.
    pub fn check_known(&self, kind: &'static str, known: &[&str]) -> Result<(), CoreError> {
        match self.0.keys().find(|k| !known.contains(&k.as_str())) {
            Some(unknown) => Err(CoreError::InvalidOption {
                kind,
                option: unknown.clone(),
                reason: format!("expected one of: {}", known.join(", ")),
            }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(String, String)> for JobOptions {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
