//! Command-line interface definitions for Coach Watch.
//!
//! Global options select the data files and config; each subcommand is one
//! operator action. Secrets can be passed through environment variables.

use crate::models::QueryTarget;
use crate::providers::ProviderKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for the Coach Watch application.
///
/// # Examples
///
/// ```sh
/// # Alert links for one person in English and French
/// coach_watch alerts -s "Jane Doe" -l English -l French --csv
///
/// # News from the last four days through NewsAPI, exported as HTML
/// coach_watch search -s "Jane Doe" -l French --since 4d --provider newsapi --html
///
/// # Composed dictionary terms
/// coach_watch --terms data/terms.yaml search --pair coach,football -l German
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// CSV of subjects: first column is the primary name, one column per language
    #[arg(long = "names", global = true)]
    pub names_path: Option<PathBuf>,

    /// YAML or JSON dictionary of term translations
    #[arg(long = "terms", global = true)]
    pub terms_path: Option<PathBuf>,

    /// Directory for exported files
    #[arg(short, long, global = true)]
    pub output_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate Google Alerts URLs
    Alerts {
        #[command(flatten)]
        targets: TargetArgs,

        /// Also write the links to a CSV file (Language, URL)
        #[arg(long)]
        csv: bool,
    },

    /// Search news providers and display the articles
    Search {
        #[command(flatten)]
        targets: TargetArgs,

        /// Only articles since this date: YYYY-MM-DD, or a span such as 4d or 2w
        #[arg(long)]
        since: Option<String>,

        /// News provider to query
        #[arg(short, long, value_enum)]
        provider: Option<ProviderKind>,

        /// NewsAPI key
        #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true)]
        newsapi_key: Option<String>,

        /// Maximum searches in flight (1 = one after another)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Write a standalone HTML report
        #[arg(long)]
        html: bool,

        /// Write the report rows as JSON
        #[arg(long)]
        json: bool,
    },

    /// List selectable languages and their codes
    Languages,

    /// List subjects in the name dataset
    Subjects,

    /// List keys of the term dictionary
    Terms,
}

/// What to search for, and in which languages.
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Subject from the name dataset (repeatable)
    #[arg(short, long = "subject")]
    pub subjects: Vec<String>,

    /// Single dictionary term (repeatable)
    #[arg(short, long = "term")]
    pub terms: Vec<String>,

    /// Two dictionary terms joined per language, as A,B (repeatable)
    #[arg(long = "pair", value_parser = parse_pair)]
    pub pairs: Vec<(String, String)>,

    /// Language to search in (repeatable; defaults to English)
    #[arg(short, long = "language")]
    pub languages: Vec<String>,
}

impl TargetArgs {
    /// Subjects first, then single terms, then pairs.
    pub fn query_targets(&self) -> Vec<QueryTarget> {
        self.subjects
            .iter()
            .cloned()
            .map(QueryTarget::Subject)
            .chain(self.terms.iter().cloned().map(QueryTarget::Term))
            .chain(
                self.pairs
                    .iter()
                    .cloned()
                    .map(|(a, b)| QueryTarget::Pair(a, b)),
            )
            .collect()
    }
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(',') {
        Some((a, b)) if !a.trim().is_empty() && !b.trim().is_empty() => {
            Ok((a.trim().to_string(), b.trim().to_string()))
        }
        _ => Err(format!("expected two terms separated by a comma, got '{raw}'")),
    }
}
