//! Language Code Registry.
//!
//! Maps a human-readable language name ("French", "Serbian (Cyrillic)") to the
//! code each provider expects:
//!
//! | Provider kind | Code | Default for unknown names |
//! |---------------|------|---------------------------|
//! | [`CodeKind::Region`] | Google Alerts `gl` / Google News edition | `""` |
//! | [`CodeKind::Api`] | ISO 639-1 code for structured news APIs | `"en"` |
//!
//! The registry is built once from [`Config`](crate::config::Config) and then
//! passed by reference; it is never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the default language. Its search phrase is the subject's primary name.
pub const DEFAULT_LANGUAGE: &str = "English";

/// Region code used when a language has no entry.
pub const DEFAULT_REGION_CODE: &str = "";

/// API code used when a language has no entry.
pub const DEFAULT_API_CODE: &str = "en";

/// Built-in table: (language name, region code, ISO 639-1 code).
const BUILTIN: &[(&str, &str, &str)] = &[
    ("Albanian", "al", "sq"),
    ("Arabic", "ar", "ar"),
    ("Chinese", "cn", "zh"),
    ("English", "", "en"),
    ("French", "fr", "fr"),
    ("German", "de", "de"),
    ("Greek", "gr", "el"),
    ("Hebrew", "il", "he"),
    ("Italian", "it", "it"),
    ("Japanese", "jp", "ja"),
    ("Persian", "ir", "fa"),
    ("Polish", "pl", "pl"),
    ("Portuguese", "pt", "pt"),
    ("Romanian", "ro", "ro"),
    ("Russian", "ru", "ru"),
    ("Serbian (Latin)", "rs", "sr"),
    ("Serbian (Cyrillic)", "rs", "sr"),
    ("Spanish", "es", "es"),
    ("Turkish", "tr", "tr"),
];

/// Which provider code to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Region,
    Api,
}

/// Codes for one language, one per provider kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LanguageCodes {
    #[serde(default)]
    pub region: String,
    #[serde(default = "default_api_code")]
    pub api: String,
}

fn default_api_code() -> String {
    DEFAULT_API_CODE.to_string()
}

impl Default for LanguageCodes {
    fn default() -> Self {
        Self {
            region: DEFAULT_REGION_CODE.to_string(),
            api: DEFAULT_API_CODE.to_string(),
        }
    }
}

impl LanguageCodes {
    pub fn get(&self, kind: CodeKind) -> &str {
        match kind {
            CodeKind::Region => &self.region,
            CodeKind::Api => &self.api,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    entries: BTreeMap<String, LanguageCodes>,
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        let entries = BUILTIN
            .iter()
            .map(|(name, region, api)| {
                (
                    name.to_string(),
                    LanguageCodes {
                        region: region.to_string(),
                        api: api.to_string(),
                    },
                )
            })
            .collect();
        Self { entries }
    }
}

impl LanguageRegistry {
    /// Built-in table with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, LanguageCodes>) -> Self {
        let mut registry = Self::default();
        for (name, codes) in overrides {
            registry.entries.insert(name.clone(), codes.clone());
        }
        registry
    }

    /// Resolve the code `kind` for `language`, falling back to the provider default.
    pub fn resolve(&self, language: &str, kind: CodeKind) -> &str {
        match self.entries.get(language) {
            Some(codes) => codes.get(kind),
            None => match kind {
                CodeKind::Region => DEFAULT_REGION_CODE,
                CodeKind::Api => DEFAULT_API_CODE,
            },
        }
    }

    /// Both codes for `language`; unknown names get the defaults.
    pub fn codes(&self, language: &str) -> LanguageCodes {
        self.entries.get(language).cloned().unwrap_or_default()
    }

    pub fn is_known(&self, language: &str) -> bool {
        self.entries.contains_key(language)
    }

    /// All known languages in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LanguageCodes)> {
        self.entries.iter().map(|(name, codes)| (name.as_str(), codes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_language_resolves() {
        let registry = LanguageRegistry::default();
        for (name, region, api) in BUILTIN {
            assert_eq!(registry.resolve(name, CodeKind::Region), *region);
            assert_eq!(registry.resolve(name, CodeKind::Api), *api);
            assert!(!registry.resolve(name, CodeKind::Api).is_empty());
        }
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.resolve("Klingon", CodeKind::Region), "");
        assert_eq!(registry.resolve("Klingon", CodeKind::Api), "en");
        assert!(!registry.is_known("Klingon"));
        assert_eq!(registry.codes("Klingon"), LanguageCodes::default());
    }

    #[test]
    fn test_english_has_empty_region() {
        let registry = LanguageRegistry::default();
        assert_eq!(registry.resolve(DEFAULT_LANGUAGE, CodeKind::Region), "");
        assert_eq!(registry.resolve(DEFAULT_LANGUAGE, CodeKind::Api), "en");
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let mut overrides = BTreeMap::new();
        overrides.insert(
            "Dutch".to_string(),
            LanguageCodes {
                region: "nl".to_string(),
                api: "nl".to_string(),
            },
        );
        overrides.insert(
            "Chinese".to_string(),
            LanguageCodes {
                region: "tw".to_string(),
                api: "zh".to_string(),
            },
        );
        let registry = LanguageRegistry::with_overrides(&overrides);
        assert_eq!(registry.resolve("Dutch", CodeKind::Region), "nl");
        assert_eq!(registry.resolve("Chinese", CodeKind::Region), "tw");
        assert_eq!(registry.resolve("French", CodeKind::Region), "fr");
    }

    #[test]
    fn test_override_yaml_defaults() {
        let codes: LanguageCodes = serde_yaml::from_str("region: nl").unwrap();
        assert_eq!(codes.region, "nl");
        assert_eq!(codes.api, "en");
    }
}
