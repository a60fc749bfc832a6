// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! User preference storage.
//!
//! A flat string-keyed store, persisted as JSON. Renderer back-ends own
//! their keys (e.g. the OSPRay back-end reads `OspPath`, `Prefix` and
//! `OspParameters`); this module knows nothing about them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

/// A flat set of user preferences.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Preferences {
    entries: BTreeMap<String, String>,
}

impl Preferences {
    /// Creates an empty preference set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, or `default` if the key is absent.
    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    /// Sets the value for `key`.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    /// Loads preferences from a JSON file.
    pub fn load(path: &Path) -> Result<Self, PreferencesError> {
        let text = fs::read_to_string(path).map_err(PreferencesError::Io)?;
        serde_json::from_str(&text).map_err(PreferencesError::Parse)
    }

    /// Saves preferences to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), PreferencesError> {
        let text = serde_json::to_string_pretty(self).map_err(PreferencesError::Parse)?;
        fs::write(path, text).map_err(PreferencesError::Io)
    }
}

/// An error while loading or saving preferences.
#[derive(Debug)]
pub enum PreferencesError {
    /// The preference file could not be read or written.
    Io(std::io::Error),
    /// The preference file is not valid JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for PreferencesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferencesError::Io(err) => write!(f, "Preference file I/O error: {err}"),
            PreferencesError::Parse(err) => write!(f, "Preference file is invalid: {err}"),
        }
    }
}

impl std::error::Error for PreferencesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PreferencesError::Io(err) => Some(err),
            PreferencesError::Parse(err) => Some(err),
        }
    }
}
