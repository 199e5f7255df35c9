//! Name/Term Resolver.
//!
//! Turns a [`QueryTarget`] and a language name into the localized phrase to
//! search for. Two sources feed it:
//!
//! - [`NameTable`]: a CSV whose first column holds the primary (English) name
//!   of each subject and whose remaining columns hold the localized names,
//!   one column per language, header = language name.
//! - [`TermDictionary`]: a YAML or JSON document `term -> {language -> phrase}`.
//!
//! A subject without a cell for the requested language is a data error. A term
//! without a translation is not: the combination is skipped.

use crate::error::{MonitorError, Result};
use crate::languages::DEFAULT_LANGUAGE;
use crate::models::{QueryTarget, Subject};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Joins the two halves of a composed term.
pub const TERM_SEPARATOR: &str = " ";

#[derive(Debug, Clone, Default)]
pub struct NameTable {
    languages: Vec<String>,
    subjects: Vec<Subject>,
}

impl NameTable {
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = fs::File::open(path.as_ref())?;
        let table = Self::from_reader(file)?;
        info!(
            subjects = table.subjects.len(),
            languages = table.languages.len(),
            "Loaded name dataset"
        );
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        if headers.is_empty() {
            return Err(MonitorError::EmptyDataset);
        }
        let languages: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();

        let mut subjects: Vec<Subject> = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let primary = match record.get(0) {
                Some(p) if !p.is_empty() => p.to_string(),
                _ => continue,
            };
            // First row wins for duplicated primary names.
            if subjects.iter().any(|s| s.primary == primary) {
                debug!(%primary, "Skipping duplicate subject row");
                continue;
            }
            let names = languages
                .iter()
                .enumerate()
                .filter_map(|(i, lang)| {
                    record
                        .get(i + 1)
                        .filter(|cell| !cell.is_empty())
                        .map(|cell| (lang.clone(), cell.to_string()))
                })
                .collect();
            subjects.push(Subject { primary, names });
        }

        Ok(Self {
            languages,
            subjects,
        })
    }

    /// Language columns in header order, without the primary column.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Languages an operator can pick: the default language followed by every column.
    pub fn language_options(&self) -> Vec<String> {
        std::iter::once(DEFAULT_LANGUAGE.to_string())
            .chain(
                self.languages
                    .iter()
                    .filter(|l| l.as_str() != DEFAULT_LANGUAGE)
                    .cloned(),
            )
            .collect()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn subject(&self, primary: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.primary == primary)
    }

    /// Localized name of `primary` in `language`.
    ///
    /// The default language always yields the primary name. Any other
    /// language must have a non-blank cell.
    pub fn resolve_subject_name(&self, primary: &str, language: &str) -> Result<String> {
        let subject = self
            .subject(primary)
            .ok_or_else(|| MonitorError::UnknownSubject(primary.to_string()))?;

        if language == DEFAULT_LANGUAGE {
            return Ok(subject.primary.clone());
        }
        if !self.languages.iter().any(|l| l == language) {
            return Err(MonitorError::UnknownLanguageColumn(language.to_string()));
        }
        subject
            .names
            .get(language)
            .cloned()
            .ok_or_else(|| MonitorError::MissingLocalizedName {
                subject: subject.primary.clone(),
                language: language.to_string(),
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct TermDictionary {
    terms: BTreeMap<String, BTreeMap<String, String>>,
}

impl TermDictionary {
    /// Load from `.json`, otherwise parse as YAML.
    #[instrument(level = "info", skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let dict = if is_json {
            Self::from_json(&raw)?
        } else {
            Self::from_yaml(&raw)?
        };
        info!(terms = dict.terms.len(), "Loaded term dictionary");
        Ok(dict)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        Ok(Self {
            terms: serde_yaml::from_str(raw)?,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(Self {
            terms: serde_json::from_str(raw)?,
        })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.terms.contains_key(key)
    }

    /// Translation of `key` into `language`, or `None` if the entry is missing or blank.
    pub fn translate(&self, key: &str, language: &str) -> Option<String> {
        self.terms
            .get(key)?
            .get(language)
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Both terms translated into `language` and joined, or `None` if either is missing.
    pub fn compose_query(&self, term_a: &str, term_b: &str, language: &str) -> Option<String> {
        let a = self.translate(term_a, language)?;
        let b = self.translate(term_b, language)?;
        Some(format!("{a}{TERM_SEPARATOR}{b}"))
    }
}

/// Resolves any [`QueryTarget`] against whichever sources were loaded.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    pub names: Option<NameTable>,
    pub terms: Option<TermDictionary>,
}

impl Resolver {
    pub fn new(names: Option<NameTable>, terms: Option<TermDictionary>) -> Self {
        Self { names, terms }
    }

    fn names(&self) -> Result<&NameTable> {
        self.names
            .as_ref()
            .ok_or(MonitorError::MissingSource("name dataset"))
    }

    fn terms(&self) -> Result<&TermDictionary> {
        self.terms
            .as_ref()
            .ok_or(MonitorError::MissingSource("term dictionary"))
    }

    pub fn resolve_subject_name(&self, subject: &str, language: &str) -> Result<String> {
        self.names()?.resolve_subject_name(subject, language)
    }

    pub fn resolve_term(&self, key: &str, language: &str) -> Result<Option<String>> {
        Ok(self.terms()?.translate(key, language))
    }

    pub fn compose_query(&self, term_a: &str, term_b: &str, language: &str) -> Result<Option<String>> {
        Ok(self.terms()?.compose_query(term_a, term_b, language))
    }

    /// Phrase for `target` in `language`.
    ///
    /// `Ok(None)` marks a composition gap that the caller skips silently.
    pub fn resolve(&self, target: &QueryTarget, language: &str) -> Result<Option<String>> {
        match target {
            QueryTarget::Subject(name) => self.resolve_subject_name(name, language).map(Some),
            QueryTarget::Term(key) => self.resolve_term(key, language),
            QueryTarget::Pair(a, b) => self.compose_query(a, b, language),
        }
    }
}
