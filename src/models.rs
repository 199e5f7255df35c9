//! Data models shared by the resolver, the dispatcher and the outputs.
//!
//! - [`Subject`]: a monitored person and their localized names
//! - [`QueryTarget`] / [`QuerySpec`]: what to search for, and one concrete call
//! - [`ArticleRecord`]: the normalized article every provider is mapped onto
//! - [`ScrapedArticle`] / [`ApiArticle`]: the two raw provider shapes
//! - [`AlertLink`]: one generated Google Alerts URL

use crate::languages::LanguageCodes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A monitored person.
///
/// `names` is keyed by the language column header of the name dataset.
/// A blank cell is stored as absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub primary: String,
    pub names: BTreeMap<String, String>,
}

/// What the operator asked to look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryTarget {
    /// A subject from the name dataset.
    Subject(String),
    /// A single key of the term dictionary.
    Term(String),
    /// Two dictionary keys joined into one phrase per language.
    Pair(String, String),
}

impl fmt::Display for QueryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryTarget::Subject(name) => write!(f, "{name}"),
            QueryTarget::Term(key) => write!(f, "term:{key}"),
            QueryTarget::Pair(a, b) => write!(f, "terms:{a}+{b}"),
        }
    }
}

/// One dispatch call: a resolved phrase in one language, optionally bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub phrase: String,
    pub language: String,
    pub codes: LanguageCodes,
    /// Lower bound of the search window; the upper bound is "now".
    pub since: Option<DateTime<Utc>>,
}

/// Article shape common to every provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub description: String,
    pub url: String,
    pub published: Option<DateTime<Utc>>,
}

/// Raw article from a scraping-style client.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedArticle {
    pub title: String,
    #[serde(default)]
    pub desc: String,
    pub link: String,
    #[serde(default)]
    pub date: Option<String>,
}

/// Raw article from a structured news API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub published_at: Option<String>,
}

/// Parse the date strings providers emit: RFC 3339 or RFC 2822.
pub fn parse_published(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<ScrapedArticle> for ArticleRecord {
    fn from(raw: ScrapedArticle) -> Self {
        let published = raw.date.as_deref().and_then(parse_published);
        ArticleRecord {
            title: raw.title.trim().to_string(),
            description: raw.desc.trim().to_string(),
            url: raw.link,
            published,
        }
    }
}

impl From<ApiArticle> for ArticleRecord {
    fn from(raw: ApiArticle) -> Self {
        let published = raw.published_at.as_deref().and_then(parse_published);
        ArticleRecord {
            title: raw.title.unwrap_or_default().trim().to_string(),
            description: raw.description.unwrap_or_default().trim().to_string(),
            url: raw.url,
            published,
        }
    }
}

/// A generated alert subscription link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertLink {
    pub language: String,
    pub target: String,
    pub phrase: String,
    pub url: String,
}
