//! Runtime configuration.
//!
//! Configuration comes from an optional YAML file; every field has a default,
//! so an empty file (or no file) yields a working setup that watches the
//! built-in roster with the broad vocabulary.
//!
//! ```yaml
//! data_file: ./data/findings.json
//! concurrency: 10
//! root_timeout_secs: 15
//! link_timeout_secs: 8
//! vocabulary: clinical
//! sources:
//!   - region: Texas
//!     name: Texas SmartBuy
//!     url: https://www.txsmartbuy.com
//!     override: true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::keywords::{Vocabulary, VocabularyChoice};
use crate::models::SourceDescriptor;
use crate::sources::default_roster;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Location of the JSON store.
    pub data_file: PathBuf,
    /// Maximum extraction tasks in flight.
    pub concurrency: usize,
    pub root_timeout_secs: u64,
    pub link_timeout_secs: u64,
    /// Linked pages fetched per source before falling back to the root.
    pub max_link_follows: usize,
    /// Findings kept in the store; oldest evicted first.
    pub retention_cap: usize,
    /// Default window for `report`.
    pub recent_window_days: u32,
    pub scan_interval_hours: u64,
    pub tick_secs: u64,
    pub vocabulary: VocabularyChoice,
    /// Append demo findings when a cycle finds nothing and the store is empty.
    pub seed_demo_on_empty: bool,
    pub sources: Vec<SourceDescriptor>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("findings.json"),
            concurrency: 10,
            root_timeout_secs: 15,
            link_timeout_secs: 8,
            max_link_follows: 5,
            retention_cap: 100,
            recent_window_days: 30,
            scan_interval_hours: 6,
            tick_secs: 60,
            vocabulary: VocabularyChoice::default(),
            seed_demo_on_empty: false,
            sources: default_roster(),
        }
    }
}

impl Config {
    /// Load from `path`, or defaults when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            None => Self::default(),
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document deserializes as unit, not as an empty map.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::Invalid("concurrency must be at least 1".into()));
        }
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid("no sources configured".into()));
        }
        if self.link_timeout_secs >= self.root_timeout_secs {
            return Err(ConfigError::Invalid(
                "link_timeout_secs must be shorter than root_timeout_secs".into(),
            ));
        }
        if self.tick_secs == 0 {
            return Err(ConfigError::Invalid("tick_secs must be at least 1".into()));
        }
        Ok(())
    }

    pub fn root_timeout(&self) -> Duration {
        Duration::from_secs(self.root_timeout_secs)
    }

    pub fn link_timeout(&self) -> Duration {
        Duration::from_secs(self.link_timeout_secs)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_hours * 60 * 60)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_secs(self.tick_secs)
    }

    pub fn vocabulary(&self) -> Vocabulary {
        Vocabulary::from_choice(&self.vocabulary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.concurrency, 10);
        assert_eq!(config.retention_cap, 100);
        assert_eq!(config.sources.len(), 51);
        assert!(config.link_timeout() < config.root_timeout());
        assert_eq!(config.scan_interval(), Duration::from_secs(21_600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml("concurrency: 4\nvocabulary: clinical\n").unwrap();
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.vocabulary, VocabularyChoice::Clinical);
        assert_eq!(config.retention_cap, 100);
        assert_eq!(config.sources.len(), 51);
    }

    #[test]
    fn test_custom_vocabulary_map_form() {
        let config = Config::from_yaml("vocabulary:\n  custom:\n    - dental\n").unwrap();
        assert_eq!(config.vocabulary, VocabularyChoice::Custom(vec!["dental".to_string()]));
        assert_eq!(config.vocabulary().label, "Procurement");

        let config = Config::from_yaml("vocabulary: {custom: [dental, vision]}\n").unwrap();
        assert_eq!(config.vocabulary().terms, vec!["dental", "vision"]);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let config = Config::from_yaml("  \n").unwrap();
        assert_eq!(config.concurrency, 10);
    }

    #[test]
    fn test_sources_override_roster() {
        let yaml = r#"
sources:
  - region: Ohio
    name: Ohio Procurement
    url: https://procure.ohio.gov
  - region: Texas
    name: Texas SmartBuy
    url: https://www.txsmartbuy.com
    override: true
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.sources.len(), 2);
        assert!(!config.sources[0].override_variant);
        assert!(config.sources[1].override_variant);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let config = Config {
            concurrency: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            link_timeout_secs: 30,
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            root_timeout_secs: 8,
            link_timeout_secs: 8,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = Config {
            sources: Vec::new(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "retention_cap: 25").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.retention_cap, 25);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Some(Path::new("/definitely/not/here.yaml")));
        assert!(matches!(missing, Err(ConfigError::Read { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "concurrency: [not, a, number]").unwrap();
        let bad = Config::load(Some(file.path()));
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }
}
