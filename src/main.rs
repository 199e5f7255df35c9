//! # Coach Watch
//!
//! Multilingual monitoring of a person's name in the news. An operator picks
//! subjects from a name dataset (or terms from a translation dictionary) and a
//! set of languages, then either:
//!
//! - generates Google Alerts subscription URLs for manual monitoring, or
//! - queries a news provider directly and displays / exports the articles.
//!
//! ## Usage
//!
//! ```sh
//! coach_watch alerts -s "Jane Doe" -l English -l French --csv
//! coach_watch search -s "Jane Doe" -l French --since 4d --html
//! ```
//!
//! ## Architecture
//!
//! 1. **Resolution**: subject / term → localized phrase per language ([`resolver`])
//! 2. **Code lookup**: language → region and API codes ([`languages`])
//! 3. **Dispatch**: alert URL or provider search per combination ([`dispatcher`], [`providers`])
//! 4. **Aggregation & output**: grouped articles, Markdown on stdout, HTML/CSV/JSON files ([`report`], [`outputs`])

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod dispatcher;
mod error;
mod languages;
mod models;
mod outputs;
mod providers;
mod report;
mod resolver;
mod utils;

use cli::{Cli, Command, TargetArgs};
use config::Config;
use dispatcher::{Dispatcher, QueryFailure, QuerySession};
use error::{ErrorKind, MonitorError};
use models::QueryTarget;
use outputs::{export_file_name, html, json, markdown};
use resolver::{NameTable, Resolver, TermDictionary};
use utils::{ensure_writable_dir, parse_since, slugify};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = Instant::now();
    info!("coach_watch starting up");

    let args = Cli::parse();
    debug!(?args.config, ?args.names_path, ?args.terms_path, "Parsed CLI arguments");

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(path) = args.names_path {
        config.names_path = Some(path);
    }
    if let Some(path) = args.terms_path {
        config.terms_path = Some(path);
    }
    if let Some(dir) = args.output_dir {
        config.output_dir = dir;
    }

    match args.command {
        Command::Alerts { targets, csv } => run_alerts(&config, &targets, csv).await?,
        Command::Search {
            targets,
            since,
            provider,
            newsapi_key,
            concurrency,
            html,
            json,
        } => {
            if let Some(kind) = provider {
                config.provider = kind;
            }
            if newsapi_key.is_some() {
                config.newsapi_key = newsapi_key;
            }
            if let Some(n) = concurrency {
                config.concurrency = n;
            }
            run_search(&config, &targets, since.as_deref(), html, json).await?
        }
        Command::Languages => list_languages(&config),
        Command::Subjects => list_subjects(&config)?,
        Command::Terms => list_terms(&config)?,
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    Ok(())
}

/// Load only the sources the targets need.
fn load_resolver(config: &Config, targets: &[QueryTarget]) -> Result<Resolver, MonitorError> {
    let wants_names = targets
        .iter()
        .any(|t| matches!(t, QueryTarget::Subject(_)));
    let wants_terms = targets
        .iter()
        .any(|t| !matches!(t, QueryTarget::Subject(_)));

    let names = match (&config.names_path, wants_names) {
        (Some(path), true) => Some(NameTable::from_path(path)?),
        _ => None,
    };
    let terms = match (&config.terms_path, wants_terms) {
        (Some(path), true) => Some(TermDictionary::from_path(path)?),
        _ => None,
    };
    Ok(Resolver::new(names, terms))
}

/// Build the session and dispatcher for one action.
fn prepare(
    config: &Config,
    targets: &TargetArgs,
    since: Option<chrono::DateTime<Utc>>,
) -> Result<(Dispatcher, QuerySession), Box<dyn Error>> {
    let query_targets = targets.query_targets();
    if query_targets.is_empty() {
        return Err("nothing to search for: pass --subject, --term or --pair".into());
    }

    let resolver = load_resolver(config, &query_targets)?;
    let dispatcher = Dispatcher::new(config.registry(), resolver);
    let session = QuerySession::new(query_targets, targets.languages.clone(), since);

    for language in &session.languages {
        let in_dataset = dispatcher
            .resolver()
            .names
            .as_ref()
            .is_some_and(|n| n.languages().contains(language));
        if !dispatcher.registry().is_known(language) && !in_dataset {
            warn!(%language, "Unknown language; provider default codes will be used");
        }
    }

    if let Some(dict) = &dispatcher.resolver().terms {
        let keys = session.targets.iter().flat_map(|t| match t {
            QueryTarget::Term(key) => vec![key],
            QueryTarget::Pair(a, b) => vec![a, b],
            QueryTarget::Subject(_) => vec![],
        });
        for key in keys.filter(|k| !dict.contains(k)) {
            warn!(term = %key, "Term is not in the dictionary; its combinations will be skipped");
        }
    }

    Ok((dispatcher, session))
}

/// Log every failure and decide whether the action as a whole failed.
///
/// Data and configuration problems always fail the action once the output
/// that could be produced has been shown. Upstream failures only do so when
/// nothing at all came back.
fn settle(failures: &[QueryFailure], produced: usize) -> Result<(), Box<dyn Error>> {
    for f in failures {
        match f.kind() {
            ErrorKind::Upstream => {
                warn!(target = %f.target, language = %f.language, error = %f.error, "Combination failed")
            }
            _ => error!(target = %f.target, language = %f.language, error = %f.error, "Combination failed"),
        }
    }

    let hard = failures
        .iter()
        .filter(|f| f.kind() != ErrorKind::Upstream)
        .count();
    if hard > 0 {
        return Err(format!("{hard} combination(s) could not be resolved; see the log above").into());
    }
    if produced == 0 && !failures.is_empty() {
        return Err("every search failed; see the log above".into());
    }
    Ok(())
}

fn export_label(session: &QuerySession) -> String {
    session
        .targets
        .first()
        .map(|t| slugify(&t.to_string()))
        .unwrap_or_else(|| "report".to_string())
}

#[instrument(level = "info", skip_all)]
async fn run_alerts(config: &Config, targets: &TargetArgs, csv: bool) -> Result<(), Box<dyn Error>> {
    let (dispatcher, session) = prepare(config, targets, None)?;
    let outcome = dispatcher.alerts(&session);

    println!("{}", markdown::alerts_to_markdown(&outcome.links));

    if csv && !outcome.links.is_empty() {
        ensure_writable_dir(&config.output_dir).await?;
        let file_name = export_file_name(
            &export_label(&session),
            "alerts",
            Local::now().date_naive(),
            "csv",
        );
        let path = format!("{}/{}", config.output_dir.trim_end_matches('/'), file_name);
        outputs::csv::write_alerts(&path, &outcome.links).await?;
        println!("Alerts CSV written to {path}");
    }

    if outcome.skipped > 0 {
        info!(skipped = outcome.skipped, "Some combinations had no translation");
    }
    settle(&outcome.failures, outcome.links.len())
}

#[instrument(level = "info", skip_all, fields(provider = ?config.provider))]
async fn run_search(
    config: &Config,
    targets: &TargetArgs,
    since: Option<&str>,
    write_html: bool,
    write_json: bool,
) -> Result<(), Box<dyn Error>> {
    let since = since.map(|raw| parse_since(raw, Utc::now())).transpose()?;
    let (dispatcher, session) = prepare(config, targets, since)?;

    let provider = providers::build(
        config.provider,
        config.request_timeout(),
        config.newsapi_key.clone(),
    )?;
    let outcome = dispatcher
        .search(&provider, &session, config.concurrency)
        .await;

    println!("{}", markdown::articles_to_markdown(&outcome.results));

    if (write_html || write_json) && !outcome.results.is_empty() {
        ensure_writable_dir(&config.output_dir).await?;
        let label = export_label(&session);
        let today = Local::now().date_naive();
        let rows = outcome.results.render_table();

        if write_html {
            let title = format!(
                "News report: {}",
                session.targets.iter().map(|t| t.to_string()).collect::<Vec<_>>().join(", ")
            );
            let generated = Local::now().format("%Y-%m-%d %H:%M").to_string();
            let doc = html::render_report(&title, &generated, &rows);
            let path = format!(
                "{}/{}",
                config.output_dir.trim_end_matches('/'),
                export_file_name(&label, "news", today, "html")
            );
            html::write_report(&path, &doc).await?;
            println!("HTML report written to {path}");
        }

        if write_json {
            let report = json::NewsReport {
                generated_at: Utc::now(),
                since: session.since,
                targets: session.targets.iter().map(|t| t.to_string()).collect(),
                rows,
            };
            let path = json::write_report(
                &report,
                &config.output_dir,
                &export_file_name(&label, "news", today, "json"),
            )
            .await?;
            println!("JSON report written to {path}");
        }
    }

    if outcome.skipped > 0 {
        info!(skipped = outcome.skipped, "Some combinations had no translation");
    }
    settle(&outcome.failures, outcome.results.total_articles())
}

fn list_languages(config: &Config) {
    let registry = config.registry();
    let options: Vec<String> = match config.names_path.as_ref().map(NameTable::from_path) {
        Some(Ok(table)) => table.language_options(),
        Some(Err(e)) => {
            warn!(error = %e, "Could not read name dataset; listing the built-in table");
            registry.iter().map(|(name, _)| name.to_string()).collect()
        }
        None => registry.iter().map(|(name, _)| name.to_string()).collect(),
    };

    for language in options {
        let codes = registry.codes(&language);
        let region = if codes.region.is_empty() { "-" } else { codes.region.as_str() };
        println!("{language:<22} region={region:<3} api={}", codes.api);
    }
}

fn list_subjects(config: &Config) -> Result<(), Box<dyn Error>> {
    let path = config
        .names_path
        .as_ref()
        .ok_or(MonitorError::MissingSource("name dataset"))?;
    let table = NameTable::from_path(path)?;
    for subject in table.subjects() {
        println!("{}", subject.primary);
    }
    Ok(())
}

fn list_terms(config: &Config) -> Result<(), Box<dyn Error>> {
    let path = config
        .terms_path
        .as_ref()
        .ok_or(MonitorError::MissingSource("term dictionary"))?;
    let dict = TermDictionary::from_path(path)?;
    for key in dict.keys() {
        println!("{key}");
    }
    Ok(())
}
