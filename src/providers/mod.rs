//! News search providers.
//!
//! Every provider implements [`NewsProvider`] and hands back
//! [`ArticleRecord`]s, so the heterogeneous upstream shapes never leak past
//! this module.
//!
//! | Provider | Module | Raw shape | Language code | Credential |
//! |----------|--------|-----------|---------------|------------|
//! | Google News | [`google_news`] | RSS feed (`title`, `desc`, `link`, `date`) | region + ISO | none |
//! | NewsAPI | [`newsapi`] | JSON (`title`, `description`, `url`) | ISO 639-1 | API key |
//!
//! Providers do not retry. A failed call is returned to the dispatcher, which
//! records it against its (phrase, language) combination and moves on.

pub mod google_news;
pub mod newsapi;

use crate::error::Result;
use crate::models::{ArticleRecord, QuerySpec};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use google_news::GoogleNewsClient;
pub use newsapi::NewsApiClient;

/// Capability shared by every news search backend.
pub trait NewsProvider {
    /// Short identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Run one search.
    ///
    /// When `spec.since` is set the results are limited to `[since, now]`;
    /// otherwise the provider's own recency window applies. Articles keep the
    /// order the provider returned them in.
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<ArticleRecord>>;
}

/// Selectable backend, as named on the command line and in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    #[default]
    GoogleNews,
    Newsapi,
}

/// Tagged union over the concrete clients.
#[derive(Debug, Clone)]
pub enum Provider {
    GoogleNews(GoogleNewsClient),
    NewsApi(NewsApiClient),
}

impl NewsProvider for Provider {
    fn name(&self) -> &'static str {
        match self {
            Provider::GoogleNews(p) => p.name(),
            Provider::NewsApi(p) => p.name(),
        }
    }

    async fn search(&self, spec: &QuerySpec) -> Result<Vec<ArticleRecord>> {
        match self {
            Provider::GoogleNews(p) => p.search(spec).await,
            Provider::NewsApi(p) => p.search(spec).await,
        }
    }
}

/// HTTP client shared by the providers.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Build the provider selected by `kind`.
pub fn build(
    kind: ProviderKind,
    timeout: Duration,
    newsapi_key: Option<String>,
) -> Result<Provider> {
    let http = http_client(timeout)?;
    Ok(match kind {
        ProviderKind::GoogleNews => Provider::GoogleNews(GoogleNewsClient::new(http)),
        ProviderKind::Newsapi => Provider::NewsApi(NewsApiClient::new(http, newsapi_key)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_selects_client() {
        let p = build(ProviderKind::GoogleNews, Duration::from_secs(5), None).unwrap();
        assert_eq!(p.name(), "google-news");

        let p = build(ProviderKind::Newsapi, Duration::from_secs(5), Some("k".into())).unwrap();
        assert_eq!(p.name(), "newsapi");
    }

    #[test]
    fn test_provider_kind_yaml_names() {
        let kind: ProviderKind = serde_yaml::from_str("newsapi").unwrap();
        assert_eq!(kind, ProviderKind::Newsapi);
        let kind: ProviderKind = serde_yaml::from_str("google-news").unwrap();
        assert_eq!(kind, ProviderKind::GoogleNews);
    }
}
