//! Persisted user settings (`config.json`)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::{base_dir, write_private};
use crate::error::{MediumError, MediumResult};

const SETTINGS_FILE: &str = "config.json";

/// Comma-separated extra allowlist domains
pub const DOMAINS_ENV: &str = "MEDIUM_ADDITIONAL_DOMAINS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub additional_domains: Vec<String>,
}

impl Settings {
    pub fn path() -> PathBuf {
        base_dir().join(SETTINGS_FILE)
    }

    pub fn load() -> Self {
        Self::load_from(&Self::path())
    }

    /// Read settings, tolerating a missing or malformed file.
    ///
    /// Non-string entries in `additionalDomains` are dropped rather than
    /// failing the whole file.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| serde_json::from_str::<Value>(&s).map_err(|e| e.to_string()));

        match parsed {
            Ok(value) => {
                let additional_domains = value
                    .get("additionalDomains")
                    .and_then(Value::as_array)
                    .map(|domains| {
                        domains
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default();
                Self { additional_domains }
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "Failed to load settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self) -> MediumResult<()> {
        self.save_to(&Self::path())
    }

    pub fn save_to(&self, path: &Path) -> MediumResult<()> {
        let to_err = |source: crate::error::BoxError| MediumError::Settings {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_vec_pretty(self).map_err(|e| to_err(e.into()))?;
        write_private(path, &json).map_err(|e| to_err(e.into()))?;
        info!(path = %path.display(), "Settings saved");
        Ok(())
    }
}

/// Parse the environment-supplied domain list: trimmed, lower-cased, empties dropped.
pub fn parse_env_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|d| d.trim().to_lowercase())
        .filter(|d| !d.is_empty())
        .collect()
}

pub fn env_domains() -> Vec<String> {
    std::env::var(DOMAINS_ENV)
        .map(|raw| parse_env_domains(&raw))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("config.json")), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg").join("config.json");
        let settings = Settings {
            additional_domains: vec!["stackademic.com".into()],
        };
        settings.save_to(&path).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"additionalDomains\""));
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn non_string_domains_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"additionalDomains": ["a.com", 3, null, "b.io"]}"#).unwrap();
        assert_eq!(Settings::load_from(&path).additional_domains, vec!["a.com", "b.io"]);
    }

    #[test]
    fn malformed_json_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();
        assert!(Settings::load_from(&path).additional_domains.is_empty());
    }

    #[test]
    fn env_domains_are_normalized() {
        assert_eq!(
            parse_env_domains(" Blog.Example.com, ,foo.IO ,"),
            vec!["blog.example.com".to_string(), "foo.io".to_string()]
        );
    }
}
