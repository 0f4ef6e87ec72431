//! Shared types and errors for the trigger admission engine.
//!
//! This crate provides the data model every admission primitive works on:
//! - `AdmissionError` — unified error taxonomy
//! - `Parameter` — a named build parameter
//! - `Condition` / `Operator` — gating rules for stages, hooks and jobs
//! - `Requirement` / `RequirementType` — job prerequisites
//! - `HookFilter` / `HookEvent` — repository hook path and ref filters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified error type for all admission checks.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    // === Template Errors ===
    #[error("Unknown filter '{name}'")]
    UnknownFilter { name: String },

    #[error("Malformed filter '{filter}': {message}")]
    MalformedFilter { filter: String, message: String },

    // === Pattern Errors ===
    #[error("Invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    #[error("Invalid glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    #[error("Unknown condition operator '{0}'")]
    UnknownOperator(String),

    // === Requirement Errors ===
    #[error("Duplicate requirement {name} of type {kind}")]
    DuplicateRequirement { name: String, kind: RequirementType },

    #[error("Invalid job requirements: you can't select multiple worker models")]
    DuplicateModelRequirement,

    #[error("Invalid job requirements: you can't select multiple hostname")]
    DuplicateHostnameRequirement,

    #[error("Cannot have multiple region requirements: {}", .regions.join(", "))]
    MultipleRegionRequirements { regions: Vec<String> },

    #[error("Unknown requirement type '{0}'")]
    UnknownRequirementType(String),

    #[error("Invalid requirement: {0}")]
    InvalidRequirement(String),

    // === Generic ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdmissionError {
    /// Returns `true` if the error comes from the caller's configuration
    /// (template, pattern or requirement definition) rather than the host.
    pub fn is_configuration_error(&self) -> bool {
        !matches!(self, AdmissionError::Io(_) | AdmissionError::Json(_))
    }

    /// Maps the error to an HTTP status code for callers fronting an API.
    pub fn http_status(&self) -> Option<u16> {
        if self.is_configuration_error() {
            Some(400)
        } else {
            None
        }
    }
}

/// A convenience alias for `Result<T, AdmissionError>`.
pub type Result<T> = std::result::Result<T, AdmissionError>;

// ---------------------------------------------------------------------------
// Parameter — a named build parameter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    #[default]
    String,
    Text,
    Boolean,
    Number,
    List,
    Key,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ParameterType,
    #[serde(default)]
    pub value: String,
}

impl Parameter {
    /// Create a string parameter.
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ParameterType::String,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition — a single variable/operator/value gating rule
// ---------------------------------------------------------------------------

/// Comparison operator of a [`Condition`].
///
/// Ordering operators compare strings lexicographically, so `"10" < "9"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Regex,
}

impl Operator {
    pub const ALL: [Operator; 7] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Lt,
        Operator::Le,
        Operator::Gt,
        Operator::Ge,
        Operator::Regex,
    ];

    /// Wire name used in persisted conditions.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Ne => "ne",
            Operator::Lt => "lt",
            Operator::Le => "le",
            Operator::Gt => "gt",
            Operator::Ge => "ge",
            Operator::Regex => "regex",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = AdmissionError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| AdmissionError::UnknownOperator(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    pub variable: String,
    pub operator: Operator,
    #[serde(default)]
    pub value: String,
}

impl Condition {
    pub fn new(variable: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            operator,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requirement — a prerequisite a job needs from its execution environment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequirementType {
    Binary,
    Network,
    Model,
    Hostname,
    Plugin,
    Service,
    Memory,
    Volume,
    OsArchitecture,
    Region,
    Secret,
}

impl RequirementType {
    pub const ALL: [RequirementType; 11] = [
        RequirementType::Binary,
        RequirementType::Network,
        RequirementType::Model,
        RequirementType::Hostname,
        RequirementType::Plugin,
        RequirementType::Service,
        RequirementType::Memory,
        RequirementType::Volume,
        RequirementType::OsArchitecture,
        RequirementType::Region,
        RequirementType::Secret,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementType::Binary => "binary",
            RequirementType::Network => "network",
            RequirementType::Model => "model",
            RequirementType::Hostname => "hostname",
            RequirementType::Plugin => "plugin",
            RequirementType::Service => "service",
            RequirementType::Memory => "memory",
            RequirementType::Volume => "volume",
            RequirementType::OsArchitecture => "os-architecture",
            RequirementType::Region => "region",
            RequirementType::Secret => "secret",
        }
    }
}

impl fmt::Display for RequirementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequirementType {
    type Err = AdmissionError;

    fn from_str(s: &str) -> Result<Self> {
        RequirementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AdmissionError::UnknownRequirementType(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Requirement {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: RequirementType,
    #[serde(default)]
    pub value: String,
}

impl Requirement {
    pub fn new(name: impl Into<String>, kind: RequirementType, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Hooks — repository event filters
// ---------------------------------------------------------------------------

/// Path and ref restrictions configured on a repository hook.
///
/// Empty lists mean "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookFilter {
    /// Regular expressions matched against changed file paths.
    #[serde(default)]
    pub paths: Vec<String>,
    /// Glob patterns matched against the event's full git ref.
    #[serde(default)]
    pub refs: Vec<String>,
    /// Glob patterns matched against the branch name of `refs/heads/` refs.
    #[serde(rename = "branch_filter", default)]
    pub branches: Vec<String>,
    /// Glob patterns matched against the tag name of `refs/tags/` refs.
    #[serde(rename = "tag_filter", default)]
    pub tags: Vec<String>,
}

/// The parts of a repository event that hook filters look at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookEvent {
    #[serde(rename = "ref", default)]
    pub git_ref: String,
    #[serde(default)]
    pub changed_paths: Vec<String>,
}
