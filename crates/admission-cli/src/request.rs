//! Admission request files.
//!
//! A request gathers everything a scheduler would hand the engine for one
//! decision. Every section is optional.

use std::path::Path;

use serde::{Deserialize, Serialize};

use admission_types::{Condition, HookEvent, HookFilter, Parameter, Requirement};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdmissionRequest {
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub hook: HookFilter,
    #[serde(default)]
    pub event: HookEvent,
}

impl AdmissionRequest {
    /// Read a request from a JSON file at `path`.
    pub fn load(path: &Path) -> admission_types::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let request: Self = serde_json::from_str(&data)?;
        Ok(request)
    }
}
