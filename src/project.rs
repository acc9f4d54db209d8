//! JSON interchange format for a saved system.
//!
//! A project round-trips through this format:
//!
//! ```json
//! {
//!   "version": 1,
//!   "components": [
//!     { "id": "panel-1", "type": "panel", "name": "Roof panel",
//!       "properties": { "voc": "22.6", "pmax": 100 } }
//!   ],
//!   "systemInputs": { "peakSunHours": 4.5 }
//! }
//! ```
//!
//! Property values written as JSON numbers are coerced back to text on load,
//! and any missing assumption falls back to its default.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::components::{Component, ComponentId, Properties};
use crate::config::SystemInputs;

/// Current interchange version.
pub const PROJECT_VERSION: u32 = 1;

/// Errors raised while reading or writing a project.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    #[error("cannot access \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed project: {0}")]
    Json(#[from] serde_json::Error),
    #[error("duplicate component id \"{0}\"")]
    DuplicateId(ComponentId),
    #[error("unknown preset \"{name}\", available: {available}")]
    UnknownPreset { name: String, available: String },
}

fn version_default() -> u32 {
    PROJECT_VERSION
}

/// A saved system: components in stored order plus global assumptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default = "version_default")]
    pub version: u32,
    #[serde(default)]
    pub components: Vec<Component>,
    #[serde(default)]
    pub system_inputs: SystemInputs,
}

impl Default for ProjectFile {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION,
            components: Vec::new(),
            system_inputs: SystemInputs::default(),
        }
    }
}

impl ProjectFile {
    /// Parses a project from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Json` for malformed payloads and
    /// `ProjectError::DuplicateId` if two components share an id.
    pub fn from_json_str(s: &str) -> Result<Self, ProjectError> {
        let project: Self = serde_json::from_str(s)?;
        project.check_unique_ids()?;
        Ok(project)
    }

    /// Reads a project from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Io` if the file cannot be read, otherwise as
    /// [`ProjectFile::from_json_str`].
    pub fn from_json_file(path: &Path) -> Result<Self, ProjectError> {
        let raw = fs::read_to_string(path).map_err(|source| ProjectError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Serializes the project as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the project to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::Io` if the file cannot be written.
    pub fn write_json_file(&self, path: &Path) -> Result<(), ProjectError> {
        let body = self.to_json_string()?;
        fs::write(path, body).map_err(|source| ProjectError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    fn check_unique_ids(&self) -> Result<(), ProjectError> {
        let mut seen = HashSet::new();
        for c in &self.components {
            if !seen.insert(&c.id) {
                return Err(ProjectError::DuplicateId(c.id.clone()));
            }
        }
        Ok(())
    }
}

/// Deserializes a property map, coercing scalar values to text.
///
/// Numbers and booleans become their text form and `null` becomes empty
/// text. Arrays and objects are rejected.
pub(crate) fn properties_as_text<'de, D>(deserializer: D) -> Result<Properties, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    raw.into_iter()
        .map(|(field, value)| -> Result<(String, String), D::Error> {
            let text = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => String::new(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(de::Error::custom(format!(
                        "property \"{field}\" must be a string or number"
                    )));
                }
            };
            Ok((field, text))
        })
        .collect()
}
