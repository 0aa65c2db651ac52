//! Personas — named behavioral overlays loaded from configuration files.
//!
//! A persona is an immutable record identified by `name`. The
//! [`manager::PersonaManager`] owns the registry; consumers receive
//! shared read-only handles. The [`injector::PersonaInjector`] appends
//! a persona's overlay to a base prompt.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod injector;
pub mod manager;

/// A persona definition.
///
/// Created at load time from a definition file, replaced wholesale on
/// reload; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Persona {
    /// Unique key the persona is looked up by.
    pub name: String,
    /// Human-readable name.
    pub display_name: String,
    /// Communication style (direct, friendly, formal, ...).
    pub communication_style: String,
    /// Tone (professional, casual, empathetic, ...).
    pub tone: String,
    /// Free-text behavioral instructions appended to prompts.
    pub prompt_overlay: String,
    /// Behavioral traits, in definition order.
    #[serde(default)]
    pub traits: Vec<String>,
    /// When to use this persona.
    #[serde(default)]
    pub description: Option<String>,
    /// Discovery tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Keys a persona definition file must carry.
pub const REQUIRED_KEYS: [&str; 5] = [
    "name",
    "display_name",
    "communication_style",
    "tone",
    "prompt_overlay",
];

/// Errors loading a persona definition file.
///
/// Caught at the manager's per-file load boundary: the file is skipped
/// and loading continues.
#[derive(Debug, Error)]
pub enum PersonaError {
    /// A required key was absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The file extension is not an accepted format.
    #[error("unsupported persona file format: {0}")]
    UnsupportedFormat(String),
    /// The file could not be read.
    #[error("failed to read persona file: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing failed.
    #[error("failed to parse persona YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// JSON parsing failed.
    #[error("failed to parse persona JSON: {0}")]
    Json(#[from] serde_json::Error),
}
