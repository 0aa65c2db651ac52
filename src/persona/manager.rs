//! Persona manager — loads definitions from a directory, indexes by name.
//!
//! Accepted formats: `.yaml`/`.yml` (two extensions of the same mapping
//! format) and `.json`. One file defines one persona; the `name` field
//! is authoritative, the filename is not. A malformed file is logged
//! and skipped; the rest of the directory still loads.
//!
//! Reload is atomic: a complete replacement map is built first, then
//! swapped under the write lock, so readers observe either the old or
//! the new registry in full.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::persona::{Persona, PersonaError, REQUIRED_KEYS};

/// Owns the in-memory persona registry.
pub struct PersonaManager {
    dir: PathBuf,
    personas: RwLock<HashMap<String, Arc<Persona>>>,
}

impl PersonaManager {
    /// Manager loading definitions from `dir`.
    ///
    /// A missing directory is logged and yields an empty registry; the
    /// manager stays usable and a later `reload` can pick the files up.
    pub fn new(dir: &Path) -> Self {
        let manager = Self {
            dir: dir.to_owned(),
            personas: RwLock::new(HashMap::new()),
        };
        manager.reload();
        manager
    }

    /// Look up a persona by name.
    pub fn get_persona(&self, name: &str) -> Option<Arc<Persona>> {
        self.personas
            .read()
            .ok()
            .and_then(|map| map.get(name).cloned())
    }

    /// Names of all loaded personas, lexicographically sorted.
    pub fn list_personas(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .personas
            .read()
            .map(|map| map.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Number of loaded personas.
    pub fn persona_count(&self) -> usize {
        self.personas.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Rescan the directory and replace the registry atomically.
    ///
    /// Not incremental: the previous registry is discarded wholesale.
    pub fn reload(&self) {
        let loaded = self.scan_directory();
        let count = loaded.len();
        if let Ok(mut map) = self.personas.write() {
            *map = loaded;
        }
        info!(count, dir = %self.dir.display(), "loaded personas");
    }

    /// Build a fresh registry from the directory contents.
    ///
    /// Files are sorted by name before loading so a duplicate `name`
    /// resolves deterministically: the lexicographically later file wins.
    fn scan_directory(&self) -> HashMap<String, Arc<Persona>> {
        let mut loaded = HashMap::new();

        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.dir.display(), error = %e, "personas directory not readable");
                return loaded;
            }
        };

        let mut files: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|e| e.path())
            .filter(|p| {
                p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|ext| matches!(ext, "yaml" | "yml" | "json"))
            })
            .collect();
        files.sort();

        for path in files {
            match load_persona_file(&path) {
                Ok(persona) => {
                    debug!(name = %persona.name, file = %path.display(), "loaded persona");
                    loaded.insert(persona.name.clone(), Arc::new(persona));
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping invalid persona file");
                }
            }
        }

        loaded
    }
}

/// Parse and validate one persona definition file.
fn load_persona_file(path: &Path) -> Result<Persona, PersonaError> {
    let contents = std::fs::read_to_string(path)?;

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let data: Value = match ext {
        "yaml" | "yml" => serde_yaml::from_str(&contents)?,
        "json" => serde_json::from_str(&contents)?,
        other => return Err(PersonaError::UnsupportedFormat(other.to_owned())),
    };

    // Explicit required-key check so the error names the missing field.
    for key in REQUIRED_KEYS {
        if data.get(key).is_none() {
            return Err(PersonaError::MissingField(key));
        }
    }

    Ok(serde_json::from_value(data)?)
}
