use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MedicationId(String);

impl MedicationId {
    pub fn generate() -> Self {
        Self(format!("med{}", Uuid::new_v4().simple()))
    }
}

impl From<&str> for MedicationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for MedicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a medication is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    #[default]
    Oral,
    Injection,
    Topical,
    Inhalation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medication {
    pub id: MedicationId,
    pub name: String,
    /// Free text as typed, e.g. `"500"`; may be empty right after adding.
    pub dosage: String,
    pub measurement: String,
    pub route: Route,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

fn default_measurement() -> String {
    "mg".into()
}

/// A medication to add. A search suggestion (`name`, `description`,
/// `category`) deserializes into this directly.
#[derive(Debug, Clone, Deserialize)]
pub struct NewMedication {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
    #[serde(default = "default_measurement")]
    pub measurement: String,
    #[serde(default)]
    pub route: Route,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

/// Per-field update; absent fields stay as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MedicationPatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub measurement: Option<String>,
    pub route: Option<Route>,
    pub description: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum MedicationError {
    #[error("medication {0} not found")]
    NotFound(MedicationId),
    #[error("a medication needs a name")]
    BlankName,
    #[error("measurement must not be blank")]
    BlankMeasurement,
}
