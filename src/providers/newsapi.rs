//! NewsAPI `/v2/everything` client.
//!
//! Requires an API key. The key is sent in the `X-Api-Key` header so it never
//! shows up in logged URLs. The language parameter is the ISO 639-1 code from
//! the registry; languages NewsAPI does not index are rejected before any
//! request is made.

use super::NewsProvider;
use crate::error::{MonitorError, Result};
use crate::models::{ApiArticle, ArticleRecord, QuerySpec};
use crate::utils::truncate_for_log;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const EVERYTHING_URL: &str = "https://newsapi.org/v2/everything";

/// Languages accepted by the `language` parameter.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "ar", "de", "en", "es", "fr", "he", "it", "nl", "no", "pt", "ru", "sv", "ud", "zh",
];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NewsApiClient {
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url: EVERYTHING_URL.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(MonitorError::MissingCredential { provider: "newsapi" })
    }

    /// Request URL for one query. The window is `[since, now]` when bounded.
    pub fn request_url(&self, spec: &QuerySpec) -> Result<Url> {
        let language = spec.codes.api.as_str();
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(MonitorError::UnsupportedLanguage {
                provider: "newsapi",
                code: language.to_string(),
            });
        }

        let mut params = vec![
            ("q", spec.phrase.clone()),
            ("language", language.to_string()),
            ("sortBy", "publishedAt".to_string()),
        ];
        if let Some(since) = spec.since {
            params.push(("from", since.to_rfc3339_opts(SecondsFormat::Secs, true)));
            params.push(("to", Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
        Ok(Url::parse_with_params(&self.base_url, &params)?)
    }
}

/// Interpret a `/v2/everything` body. Any `status` other than `ok` is an upstream error.
pub fn parse_response(body: &str) -> Result<Vec<ApiArticle>> {
    let resp: EverythingResponse = serde_json::from_str(body)?;
    if resp.status != "ok" {
        return Err(MonitorError::Upstream {
            provider: "newsapi",
            status: resp.code.unwrap_or(resp.status),
            message: resp.message.unwrap_or_default(),
        });
    }
    Ok(resp.articles)
}

impl NewsProvider for NewsApiClient {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    #[instrument(level = "info", skip_all, fields(language = %spec.language, phrase = %spec.phrase))]
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<ArticleRecord>> {
        let t0 = Instant::now();
        let key = self.api_key()?;
        let url = self.request_url(spec)?;
        debug!(%url, "Requesting NewsAPI");

        let resp = self.http.get(url).header("X-Api-Key", key).send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        // Error bodies carry a JSON code/message; fall back to the raw body.
        let raw = match parse_response(&body) {
            Ok(raw) if status.is_success() => raw,
            Ok(_) => {
                return Err(MonitorError::Upstream {
                    provider: self.name(),
                    status: status.to_string(),
                    message: truncate_for_log(&body, 200),
                });
            }
            Err(MonitorError::Json(e)) if !status.is_success() => {
                warn!(%status, error = %e, "NewsAPI returned a non-JSON error body");
                return Err(MonitorError::Upstream {
                    provider: self.name(),
                    status: status.to_string(),
                    message: truncate_for_log(&body, 200),
                });
            }
            Err(e) => return Err(e),
        };

        let articles: Vec<ArticleRecord> = raw.into_iter().map(ArticleRecord::from).collect();
        info!(
            count = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched NewsAPI results"
        );
        Ok(articles)
    }
}
