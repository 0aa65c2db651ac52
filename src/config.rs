//! Configuration loading and management.
//!
//! Loads configuration from `./switchboard.toml` (or
//! `$SWITCHBOARD_CONFIG_PATH`). Environment variables override file
//! values; file values override defaults.
//!
//! Precedence: env vars > config file > defaults.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

// ── Top-level config ────────────────────────────────────────────

/// Top-level configuration loaded from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    /// Core settings (`[core]`).
    pub core: CoreConfig,
    /// Filesystem paths (`[paths]`).
    pub paths: PathsConfig,
    /// Context assembler settings (`[assembler]`).
    pub assembler: AssemblerConfig,
    /// Persona settings (`[persona]`).
    pub persona: PersonaConfig,
}

impl SwitchboardConfig {
    /// Load configuration with precedence: env vars > TOML file > defaults.
    ///
    /// Config file path: `$SWITCHBOARD_CONFIG_PATH` or `./switchboard.toml`.
    /// If the file does not exist, returns defaults.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from_file()?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load from TOML file only, no env overrides.
    fn load_from_file() -> Result<Self> {
        let path = Self::config_path_with(|key| std::env::var(key).ok());
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::info!(path = %path.display(), "loading config from file");
                let config: SwitchboardConfig =
                    toml::from_str(&contents).context("failed to parse config TOML")?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("no config file found, using defaults");
                Ok(SwitchboardConfig::default())
            }
            Err(e) => Err(anyhow::anyhow!("failed to read config file: {e}")),
        }
    }

    /// Resolve config path using a custom env resolver (for testing).
    fn config_path_with(env: impl Fn(&str) -> Option<String>) -> PathBuf {
        if let Some(p) = env("SWITCHBOARD_CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("switchboard.toml")
    }

    /// Apply environment variable overrides (env > config > defaults).
    ///
    /// Takes a resolver function for testability.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if let Some(v) = env("SWITCHBOARD_LOG_LEVEL") {
            self.core.log_level = v;
        }

        if let Some(v) = env("SWITCHBOARD_PERSONAS_DIR") {
            self.paths.personas_dir = v;
        }
        if let Some(v) = env("SWITCHBOARD_MEMORY_DIR") {
            self.paths.memory_dir = v;
        }
        if let Some(v) = env("SWITCHBOARD_LOGS_DIR") {
            self.paths.logs_dir = v;
        }

        if let Some(v) = env("SWITCHBOARD_SOURCE_TIMEOUT_SECS") {
            match v.parse() {
                Ok(n) => self.assembler.source_timeout_seconds = n,
                Err(_) => tracing::warn!(
                    var = "SWITCHBOARD_SOURCE_TIMEOUT_SECS",
                    value = %v,
                    "ignoring invalid env override"
                ),
            }
        }

        if let Some(v) = env("SWITCHBOARD_DEFAULT_PERSONA") {
            self.persona.default_persona = Some(v);
        }
    }

    /// Parse a TOML string into config (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: SwitchboardConfig =
            toml::from_str(toml_str).context("failed to parse config TOML")?;
        Ok(config)
    }
}

// ── Core config ─────────────────────────────────────────────────

/// Core settings (`[core]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Tracing log level filter.
    pub log_level: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// ── Paths config ────────────────────────────────────────────────

/// Filesystem paths (`[paths]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory of persona definition files.
    pub personas_dir: String,
    /// Directory of memory files for the filesystem source.
    pub memory_dir: String,
    /// Directory for rotated JSON log files.
    pub logs_dir: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            personas_dir: "config/personas".to_string(),
            memory_dir: "memories".to_string(),
            logs_dir: "logs".to_string(),
        }
    }
}

// ── Assembler config ────────────────────────────────────────────

/// Context assembler settings (`[assembler]`).
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssemblerConfig {
    /// Per-source timeout in seconds.
    pub source_timeout_seconds: u64,
}

impl AssemblerConfig {
    /// Per-source timeout as a [`Duration`].
    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_seconds)
    }
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            source_timeout_seconds: 10,
        }
    }
}

// ── Persona config ──────────────────────────────────────────────

/// Persona settings (`[persona]`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PersonaConfig {
    /// Persona applied when a request carries no override.
    pub default_persona: Option<String>,
}

// ── Tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.core.log_level, "info");
        assert_eq!(config.paths.personas_dir, "config/personas");
        assert_eq!(config.paths.memory_dir, "memories");
        assert_eq!(config.paths.logs_dir, "logs");
        assert_eq!(config.assembler.source_timeout_seconds, 10);
        assert!(config.persona.default_persona.is_none());
    }

    #[test]
    fn parse_full_toml() {
        let toml_str = r#"
[core]
log_level = "debug"

[paths]
personas_dir = "/etc/switchboard/personas"
memory_dir = "/var/lib/switchboard/memories"
logs_dir = "/var/log/switchboard"

[assembler]
source_timeout_seconds = 30

[persona]
default_persona = "concise"
"#;

        let config = SwitchboardConfig::from_toml(toml_str).expect("should parse");
        assert_eq!(config.core.log_level, "debug");
        assert_eq!(config.paths.personas_dir, "/etc/switchboard/personas");
        assert_eq!(config.paths.memory_dir, "/var/lib/switchboard/memories");
        assert_eq!(config.assembler.source_timeout_seconds, 30);
        assert_eq!(config.persona.default_persona.as_deref(), Some("concise"));
    }

    #[test]
    fn parse_partial_toml_uses_defaults() {
        let config = SwitchboardConfig::from_toml("[core]\nlog_level = \"warn\"\n")
            .expect("should parse");
        assert_eq!(config.core.log_level, "warn");
        assert_eq!(config.assembler.source_timeout_seconds, 10);
        assert_eq!(config.paths.personas_dir, "config/personas");
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let config = SwitchboardConfig::from_toml("").expect("should parse empty");
        assert_eq!(config.core.log_level, "info");
        assert!(config.persona.default_persona.is_none());
    }

    #[test]
    fn env_overrides_config_values() {
        let mut config = SwitchboardConfig::from_toml(
            "[paths]\npersonas_dir = \"/from/toml\"\nmemory_dir = \"/from/toml/mem\"\n",
        )
        .expect("should parse");

        let env = |key: &str| -> Option<String> {
            match key {
                "SWITCHBOARD_PERSONAS_DIR" => Some("/from/env".to_string()),
                "SWITCHBOARD_SOURCE_TIMEOUT_SECS" => Some("3".to_string()),
                "SWITCHBOARD_DEFAULT_PERSONA" => Some("mentor".to_string()),
                _ => None,
            }
        };
        config.apply_overrides(env);

        // Env wins over file.
        assert_eq!(config.paths.personas_dir, "/from/env");
        assert_eq!(config.assembler.source_timeout_seconds, 3);
        assert_eq!(config.persona.default_persona.as_deref(), Some("mentor"));

        // File value kept when no env override.
        assert_eq!(config.paths.memory_dir, "/from/toml/mem");
    }

    #[test]
    fn invalid_timeout_override_is_ignored() {
        let mut config = SwitchboardConfig::default();
        config.apply_overrides(|key| match key {
            "SWITCHBOARD_SOURCE_TIMEOUT_SECS" => Some("not-a-number".to_string()),
            _ => None,
        });
        assert_eq!(config.assembler.source_timeout_seconds, 10);
    }

    #[test]
    fn config_path_uses_env_var() {
        let path = SwitchboardConfig::config_path_with(|key| match key {
            "SWITCHBOARD_CONFIG_PATH" => Some("/custom/switchboard.toml".to_string()),
            _ => None,
        });
        assert_eq!(path, PathBuf::from("/custom/switchboard.toml"));
    }

    #[test]
    fn config_path_defaults_to_cwd() {
        let path = SwitchboardConfig::config_path_with(|_| None);
        assert_eq!(path, PathBuf::from("switchboard.toml"));
    }

    #[test]
    fn invalid_toml_returns_error() {
        assert!(SwitchboardConfig::from_toml("this is {{ not valid toml").is_err());
    }

    #[test]
    fn source_timeout_converts_to_duration() {
        let config = SwitchboardConfig::default();
        assert_eq!(config.assembler.source_timeout(), Duration::from_secs(10));
    }
}
