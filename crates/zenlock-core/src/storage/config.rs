//! TOML-based application configuration.
//!
//! Stores user preferences for session defaults, the quote provider, and
//! the environment guard. Stored at `~/.config/zenlock/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;
use crate::quotes;

/// Session duration defaults for the setup surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    /// Minutes used when no duration is given on the command line.
    #[serde(default = "default_minutes")]
    pub default_minutes: u64,
    /// Quick-pick durations advertised at setup, in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u64>,
}

/// Quote provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Model name used for the remote generateContent call.
    #[serde(default = "default_model")]
    pub model: String,
}

/// Environment guard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardConfig {
    /// Take over the full terminal screen while focusing.
    #[serde(default = "default_true")]
    pub fullscreen: bool,
    /// Hold an OS sleep inhibitor while focusing.
    #[serde(default = "default_true")]
    pub wake_lock: bool,
    /// Number shown on the always-visible emergency line.
    #[serde(default = "default_emergency_number")]
    pub emergency_number: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/zenlock/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub session: SessionDefaults,
    #[serde(default)]
    pub quotes: QuotesConfig,
    #[serde(default)]
    pub guard: GuardConfig,
}

fn default_minutes() -> u64 {
    10
}
fn default_presets() -> Vec<u64> {
    vec![5, 10, 25, 45]
}
fn default_model() -> String {
    quotes::DEFAULT_MODEL.to_string()
}
fn default_emergency_number() -> String {
    "112".into()
}
fn default_true() -> bool {
    true
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            default_minutes: default_minutes(),
            presets: default_presets(),
        }
    }
}

impl Default for QuotesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_model(),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            fullscreen: true,
            wake_lock: true,
            emergency_number: default_emergency_number(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            session: SessionDefaults::default(),
            quotes: QuotesConfig::default(),
            guard: GuardConfig::default(),
        }
    }
}

impl Config {
    /// Location of the config file on this machine.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/zenlock"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk; a missing file is replaced by saved defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Load from an explicit path (missing file is an error here).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::parse(&content, path)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let mut node = serde_json::to_value(self).ok()?;
        for part in key.split('.') {
            node = node.get(part)?.clone();
        }
        match node {
            serde_json::Value::String(s) => Some(s),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key, keeping the existing type.
    /// Does not persist; call [`Config::save`] afterwards.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut root =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        let mut node = &mut root;
        let mut parts = key.split('.').peekable();
        while let Some(part) = parts.next() {
            let child = node
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
            if parts.peek().is_none() {
                *child = parse_as_existing_type(child, value, key)?;
                break;
            }
            node = child;
        }

        *self = serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// Parse `raw` into the same JSON type `existing` already has.
fn parse_as_existing_type(
    existing: &serde_json::Value,
    raw: &str,
    key: &str,
) -> Result<serde_json::Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    Ok(match existing {
        serde_json::Value::Bool(_) => serde_json::Value::Bool(
            raw.parse::<bool>()
                .map_err(|_| invalid(format!("expected bool, got '{raw}'")))?,
        ),
        serde_json::Value::Number(_) => {
            if let Ok(n) = raw.parse::<u64>() {
                serde_json::Value::Number(n.into())
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| invalid(format!("cannot parse '{raw}' as number")))?
            } else {
                return Err(invalid(format!("cannot parse '{raw}' as number")));
            }
        }
        serde_json::Value::Array(_) => {
            serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?
        }
        _ => serde_json::Value::String(raw.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrips_through_toml() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.session.default_minutes, 10);
        assert_eq!(parsed.session.presets, vec![5, 10, 25, 45]);
        assert!(parsed.quotes.enabled);
        assert_eq!(parsed.guard.emergency_number, "112");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("session.default_minutes").as_deref(), Some("10"));
        assert_eq!(cfg.get("guard.fullscreen").as_deref(), Some("true"));
        assert_eq!(
            cfg.get("quotes.model").as_deref(),
            Some("gemini-3-flash-preview")
        );
        assert!(cfg.get("guard.missing_key").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("guard.fullscreen", "false").unwrap();
        assert!(!cfg.guard.fullscreen);

        cfg.set("session.default_minutes", "25").unwrap();
        assert_eq!(cfg.session.default_minutes, 25);

        cfg.set("guard.emergency_number", "911").unwrap();
        assert_eq!(cfg.guard.emergency_number, "911");

        cfg.set("session.presets", "[15, 30]").unwrap();
        assert_eq!(cfg.session.presets, vec![15, 30]);
    }

    #[test]
    fn set_rejects_unknown_keys_and_bad_values() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set("guard.nonexistent", "x"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(
            cfg.set("guard.fullscreen", "not_a_bool"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("session.default_minutes", "soon"),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn save_and_load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.set("session.default_minutes", "45").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.session.default_minutes, 45);
    }

    #[test]
    fn load_from_missing_path_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(
            Config::load_from(&missing),
            Err(ConfigError::LoadFailed { .. })
        ));
    }
}
