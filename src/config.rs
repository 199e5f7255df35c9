//! Runtime configuration.
//!
//! Values come from an optional YAML file (`--config`) and are then
//! overridden by command-line flags and environment variables. The result is
//! passed explicitly to whatever needs it.
//!
//! ```yaml
//! names_path: data/names.csv
//! terms_path: data/terms.yaml
//! provider: google-news
//! output_dir: reports
//! concurrency: 1
//! request_timeout_secs: 20
//! languages:
//!   Dutch: { region: nl, api: nl }
//! ```

use crate::error::Result;
use crate::languages::{LanguageCodes, LanguageRegistry};
use crate::providers::ProviderKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// CSV of subjects and their localized names.
    pub names_path: Option<PathBuf>,
    /// YAML or JSON term dictionary.
    pub terms_path: Option<PathBuf>,
    /// Credential for the NewsAPI provider.
    pub newsapi_key: Option<String>,
    pub provider: ProviderKind,
    /// Directory for exported reports.
    pub output_dir: String,
    /// Maximum searches in flight; 1 runs them one after another.
    pub concurrency: usize,
    pub request_timeout_secs: u64,
    /// Extra or replacement entries for the language table.
    pub languages: BTreeMap<String, LanguageCodes>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            names_path: Some(PathBuf::from("data/names.csv")),
            terms_path: None,
            newsapi_key: None,
            provider: ProviderKind::default(),
            output_dir: "reports".to_string(),
            concurrency: 1,
            request_timeout_secs: 20,
            languages: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Read `path` if given, otherwise start from the defaults.
    #[instrument(level = "info")]
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path)?;
                let config = Self::from_yaml(&raw)?;
                info!(path = %path.display(), "Loaded configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn registry(&self) -> LanguageRegistry {
        LanguageRegistry::with_overrides(&self.languages)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::CodeKind;

    #[test]
    fn test_defaults() {
        let config = Config::load(None).unwrap();
        assert_eq!(config.names_path, Some(PathBuf::from("data/names.csv")));
        assert_eq!(config.provider, ProviderKind::GoogleNews);
        assert_eq!(config.concurrency, 1);
        assert_eq!(config.request_timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = Config::from_yaml(
            "provider: newsapi\nnewsapi_key: abc\nlanguages:\n  Dutch: { region: nl, api: nl }\n",
        )
        .unwrap();
        assert_eq!(config.provider, ProviderKind::Newsapi);
        assert_eq!(config.newsapi_key.as_deref(), Some("abc"));
        assert_eq!(config.output_dir, "reports");
        assert_eq!(config.registry().resolve("Dutch", CodeKind::Api), "nl");
        assert_eq!(config.registry().resolve("French", CodeKind::Region), "fr");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "output_dir: /tmp/out\nconcurrency: 4\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.output_dir, "/tmp/out");
        assert_eq!(config.concurrency, 4);
    }

    #[test]
    fn test_bad_yaml_is_error() {
        assert!(Config::from_yaml("concurrency: [1, 2]").is_err());
    }
}
