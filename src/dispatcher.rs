//! Query Dispatcher.
//!
//! A [`QuerySession`] holds what the operator selected for one action:
//! targets, languages and an optional start date. The [`Dispatcher`] expands
//! it into the cross product of targets × languages and runs one of two modes:
//!
//! 1. **Alerts**: [`build_alert_url`] per combination, no network.
//! 2. **Search**: one [`NewsProvider::search`] call per combination.
//!
//! Every combination is independent. Composition gaps are skipped silently;
//! any other failure is recorded as a [`QueryFailure`] and the batch carries on.

use crate::error::{ErrorKind, MonitorError};
use crate::languages::{CodeKind, DEFAULT_LANGUAGE, LanguageRegistry};
use crate::models::{AlertLink, ArticleRecord, QuerySpec, QueryTarget};
use crate::providers::NewsProvider;
use crate::report::Aggregator;
use crate::resolver::Resolver;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// Prefix of every alert subscription URL, up to the query value.
pub const ALERTS_BASE_URL: &str = "https://www.google.com/alerts?hl=en&q=";

/// Fragment the alerts page expects after the query string.
pub const ALERTS_FRAGMENT: &str = "#1:0";

/// Percent-encode a search term, leaving `/` intact.
pub fn encode_term(term: &str) -> String {
    urlencoding::encode(term).replace("%2F", "/")
}

/// Alert subscription URL for `term` scoped to `region_code`.
///
/// The `gl` parameter is always present, even with an empty region.
pub fn build_alert_url(term: &str, region_code: &str) -> String {
    format!(
        "{ALERTS_BASE_URL}{}&gl={}{ALERTS_FRAGMENT}",
        encode_term(term),
        region_code
    )
}

/// Selections for a single operator action.
#[derive(Debug, Clone)]
pub struct QuerySession {
    pub targets: Vec<QueryTarget>,
    pub languages: Vec<String>,
    pub since: Option<DateTime<Utc>>,
}

impl QuerySession {
    /// Repeated languages are dropped; no languages means the default language.
    pub fn new(
        targets: Vec<QueryTarget>,
        languages: Vec<String>,
        since: Option<DateTime<Utc>>,
    ) -> Self {
        let mut languages: Vec<String> = languages.into_iter().unique().collect();
        if languages.is_empty() {
            languages.push(DEFAULT_LANGUAGE.to_string());
        }
        Self {
            targets,
            languages,
            since,
        }
    }

    /// Every (target, language) pair, target-major.
    pub fn combinations(&self) -> impl Iterator<Item = (&QueryTarget, &str)> {
        self.targets
            .iter()
            .cartesian_product(self.languages.iter().map(String::as_str))
    }
}

/// One combination that did not produce results.
#[derive(Debug)]
pub struct QueryFailure {
    pub target: String,
    pub language: String,
    pub error: MonitorError,
}

impl QueryFailure {
    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

/// A resolved combination waiting to be dispatched.
#[derive(Debug, Clone)]
pub struct PlannedQuery {
    pub target: String,
    pub spec: QuerySpec,
}

#[derive(Debug, Default)]
pub struct Plan {
    pub queries: Vec<PlannedQuery>,
    pub failures: Vec<QueryFailure>,
    /// Combinations dropped because a term had no translation.
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct AlertOutcome {
    pub links: Vec<AlertLink>,
    pub failures: Vec<QueryFailure>,
    pub skipped: usize,
}

#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub results: Aggregator,
    pub failures: Vec<QueryFailure>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: LanguageRegistry,
    resolver: Resolver,
}

impl Dispatcher {
    pub fn new(registry: LanguageRegistry, resolver: Resolver) -> Self {
        Self { registry, resolver }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Resolve every combination of `session` into a [`QuerySpec`].
    #[instrument(level = "debug", skip_all)]
    pub fn plan(&self, session: &QuerySession) -> Plan {
        let mut plan = Plan::default();
        for (target, language) in session.combinations() {
            match self.resolver.resolve(target, language) {
                Ok(Some(phrase)) => plan.queries.push(PlannedQuery {
                    target: target.to_string(),
                    spec: QuerySpec {
                        phrase,
                        language: language.to_string(),
                        codes: self.registry.codes(language),
                        since: session.since,
                    },
                }),
                Ok(None) => {
                    debug!(%target, %language, "No translation; skipping combination");
                    plan.skipped += 1;
                }
                Err(e) => {
                    error!(%target, %language, error = %e, "Could not resolve search phrase");
                    plan.failures.push(QueryFailure {
                        target: target.to_string(),
                        language: language.to_string(),
                        error: e,
                    });
                }
            }
        }
        plan
    }

    /// Alert URLs for every resolvable combination.
    #[instrument(level = "info", skip_all, fields(targets = session.targets.len(), languages = session.languages.len()))]
    pub fn alerts(&self, session: &QuerySession) -> AlertOutcome {
        let plan = self.plan(session);
        let links: Vec<AlertLink> = plan
            .queries
            .into_iter()
            .map(|q| {
                let region = self.registry.resolve(&q.spec.language, CodeKind::Region);
                AlertLink {
                    url: build_alert_url(&q.spec.phrase, region),
                    language: q.spec.language,
                    target: q.target,
                    phrase: q.spec.phrase,
                }
            })
            .collect();

        info!(
            links = links.len(),
            failed = plan.failures.len(),
            skipped = plan.skipped,
            "Generated alert URLs"
        );
        AlertOutcome {
            links,
            failures: plan.failures,
            skipped: plan.skipped,
        }
    }

    /// Search every resolvable combination with `provider`.
    ///
    /// `concurrency <= 1` runs the calls one after another; larger values fan
    /// out with at most that many calls in flight. Either way the results are
    /// grouped in plan order, so language groups come out the same.
    ///
    /// # Arguments
    ///
    /// * `provider` - Backend that runs each [`QuerySpec`]
    /// * `session` - Targets, languages and optional start date
    /// * `concurrency` - Maximum searches in flight
    ///
    /// # Returns
    ///
    /// A [`SearchOutcome`] with articles grouped by language, one
    /// [`QueryFailure`] per combination that failed or came back empty, and
    /// the number of combinations skipped for lack of a translation.
    ///
    /// # Errors
    ///
    /// None at this level: resolution and provider errors are collected into
    /// `failures` and the batch always runs to completion.
    #[instrument(level = "info", skip_all, fields(provider = provider.name(), concurrency = concurrency))]
    pub async fn search<P: NewsProvider>(
        &self,
        provider: &P,
        session: &QuerySession,
        concurrency: usize,
    ) -> SearchOutcome {
        let t0 = Instant::now();
        let plan = self.plan(session);
        let mut failures = plan.failures;
        let total = plan.queries.len();

        let run = move |(index, query): (usize, PlannedQuery)| async move {
            let res = provider.search(&query.spec).await;
            (index, query, res)
        };

        let mut completed: Vec<(usize, PlannedQuery, crate::error::Result<Vec<ArticleRecord>>)> =
            if concurrency <= 1 {
                stream::iter(plan.queries.into_iter().enumerate())
                    .then(run)
                    .collect()
                    .await
            } else {
                stream::iter(plan.queries.into_iter().enumerate())
                    .map(run)
                    .buffer_unordered(concurrency)
                    .collect()
                    .await
            };
        completed.sort_by_key(|(index, _, _)| *index);

        let mut results = Aggregator::default();
        for (_, query, res) in completed {
            let PlannedQuery { target, spec } = query;
            match res {
                Ok(articles) if articles.is_empty() => {
                    warn!(%target, language = %spec.language, phrase = %spec.phrase, "No articles returned");
                    failures.push(QueryFailure {
                        target,
                        language: spec.language,
                        error: MonitorError::NoResults {
                            provider: provider.name(),
                            phrase: spec.phrase,
                        },
                    });
                }
                Ok(articles) => {
                    debug!(%target, language = %spec.language, count = articles.len(), "Collected articles");
                    results.add_results(&spec.language, articles);
                }
                Err(e) => {
                    warn!(%target, language = %spec.language, error = %e, "Search failed; continuing with next combination");
                    failures.push(QueryFailure {
                        target,
                        language: spec.language,
                        error: e,
                    });
                }
            }
        }

        info!(
            dispatched = total,
            articles = results.total_articles(),
            failed = failures.len(),
            skipped = plan.skipped,
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Search batch complete"
        );
        SearchOutcome {
            results,
            failures,
            skipped: plan.skipped,
        }
    }
}
