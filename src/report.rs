//! Result Aggregator.
//!
//! Collects [`ArticleRecord`]s per language in the order they arrive and
//! flattens them into [`ReportRow`]s for display and export.

use crate::models::ArticleRecord;
use serde::{Deserialize, Serialize};

/// Shown in the date column when the provider gave no usable date.
pub const MISSING_DATE: &str = "N/A";

/// One line of the flat report table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReportRow {
    pub language: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub link: String,
}

/// Articles grouped by language, append-only.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    groups: Vec<(String, Vec<ArticleRecord>)>,
}

impl Aggregator {
    /// Append `articles` to the group for `language`, creating it at the end if new.
    pub fn add_results(&mut self, language: &str, articles: Vec<ArticleRecord>) {
        match self.groups.iter_mut().find(|(l, _)| l == language) {
            Some((_, existing)) => existing.extend(articles),
            None => self.groups.push((language.to_string(), articles)),
        }
    }

    /// Groups in first-seen order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[ArticleRecord])> {
        self.groups
            .iter()
            .map(|(language, articles)| (language.as_str(), articles.as_slice()))
    }

    pub fn total_articles(&self) -> usize {
        self.groups.iter().map(|(_, a)| a.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_articles() == 0
    }

    /// Flatten to rows: group order first, then the order within each group.
    pub fn render_table(&self) -> Vec<ReportRow> {
        self.groups
            .iter()
            .flat_map(|(language, articles)| {
                articles.iter().map(move |a| ReportRow {
                    language: language.clone(),
                    title: a.title.clone(),
                    date: a
                        .published
                        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                        .unwrap_or_else(|| MISSING_DATE.to_string()),
                    description: a.description.clone(),
                    link: a.url.clone(),
                })
            })
            .collect()
    }
}
