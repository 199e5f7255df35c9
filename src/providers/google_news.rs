//! Google News search feed client.
//!
//! Queries the public RSS search endpoint and maps each `<item>` onto a
//! [`ScrapedArticle`] (`title`, `desc`, `link`, `date`) before normalizing.
//! The edition is chosen from the language's region code (`gl`) and ISO code
//! (`hl`); English has no region and uses the US edition.
//!
//! A start date is pushed to Google as an `after:YYYY-MM-DD` operator and
//! re-applied locally on the parsed `pubDate`, because the operator is only
//! day-granular.

use super::NewsProvider;
use crate::error::{MonitorError, Result};
use crate::models::{ArticleRecord, QuerySpec, ScrapedArticle};
use crate::utils::{html_to_text, truncate_for_log};
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const FEED_URL: &str = "https://news.google.com/rss/search";

/// Edition used when the language has no region code.
const FALLBACK_EDITION: &str = "US";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

impl From<FeedItem> for ScrapedArticle {
    fn from(item: FeedItem) -> Self {
        ScrapedArticle {
            title: item.title,
            desc: item
                .description
                .as_deref()
                .map(html_to_text)
                .unwrap_or_default(),
            link: item.link,
            date: item.pub_date,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleNewsClient {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleNewsClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: FEED_URL.to_string(),
        }
    }

    /// Feed URL for one query.
    pub fn feed_url(&self, spec: &QuerySpec) -> Result<Url> {
        let edition = if spec.codes.region.is_empty() {
            FALLBACK_EDITION.to_string()
        } else {
            spec.codes.region.to_uppercase()
        };
        let hl = spec.codes.api.as_str();
        let ceid = format!("{edition}:{hl}");
        let q = match spec.since {
            Some(since) => format!("{} after:{}", spec.phrase, since.format("%Y-%m-%d")),
            None => spec.phrase.clone(),
        };
        let url = Url::parse_with_params(
            &self.base_url,
            &[
                ("q", q.as_str()),
                ("hl", hl),
                ("gl", edition.as_str()),
                ("ceid", ceid.as_str()),
            ],
        )?;
        Ok(url)
    }
}

/// Parse an RSS document into raw scraped articles, in feed order.
pub fn parse_feed(xml: &str) -> Result<Vec<ScrapedArticle>> {
    let rss: Rss = quick_xml::de::from_str(xml)?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .filter(|item| !item.link.is_empty())
        .map(ScrapedArticle::from)
        .collect())
}

impl NewsProvider for GoogleNewsClient {
    fn name(&self) -> &'static str {
        "google-news"
    }

    #[instrument(level = "info", skip_all, fields(language = %spec.language, phrase = %spec.phrase))]
    async fn search(&self, spec: &QuerySpec) -> Result<Vec<ArticleRecord>> {
        let t0 = Instant::now();
        let url = self.feed_url(spec)?;
        debug!(%url, "Requesting Google News feed");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            warn!(%status, "Google News feed request failed");
            return Err(MonitorError::Upstream {
                provider: self.name(),
                status: status.to_string(),
                message: truncate_for_log(&body, 200),
            });
        }

        let raw = parse_feed(&body)?;
        let fetched = raw.len();
        let articles: Vec<ArticleRecord> = raw
            .into_iter()
            .map(ArticleRecord::from)
            .filter(|a| match (spec.since, a.published) {
                (Some(since), Some(published)) => published >= since,
                _ => true,
            })
            .collect();

        info!(
            fetched,
            kept = articles.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched Google News feed"
        );
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::languages::LanguageCodes;
    use chrono::{TimeZone, Utc};

    const FEED: &str = r##"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <generator>NFE/5.0</generator>
    <title>"Jeanne" - Google Actualités</title>
    <link>https://news.google.com/search?q=Jeanne&amp;hl=fr</link>
    <language>fr</language>
    <lastBuildDate>Thu, 15 Oct 2026 10:00:00 GMT</lastBuildDate>
    <description>Google Actualités</description>
    <item>
      <title>Jeanne prolonge au club - Le Monde</title>
      <link>https://news.google.com/rss/articles/AAA</link>
      <guid isPermaLink="false">AAA</guid>
      <pubDate>Wed, 14 Oct 2026 07:00:00 GMT</pubDate>
      <description>&lt;a href="https://news.google.com/rss/articles/AAA"&gt;Jeanne prolonge au club&lt;/a&gt;&amp;nbsp;&amp;nbsp;&lt;font color="#6f6f6f"&gt;Le Monde&lt;/font&gt;</description>
      <source url="https://www.lemonde.fr">Le Monde</source>
    </item>
    <item>
      <title>Ancien article &amp; archives</title>
      <link>https://news.google.com/rss/articles/BBB</link>
      <guid isPermaLink="false">BBB</guid>
      <pubDate>Mon, 01 Jun 2026 12:00:00 GMT</pubDate>
      <description>Archives</description>
      <source url="https://www.lequipe.fr">L'Équipe</source>
    </item>
  </channel>
</rss>"##;

    fn spec(region: &str, api: &str, since: Option<chrono::DateTime<Utc>>) -> QuerySpec {
        QuerySpec {
            phrase: "Jane Doe".to_string(),
            language: "French".to_string(),
            codes: LanguageCodes {
                region: region.to_string(),
                api: api.to_string(),
            },
            since,
        }
    }

    fn client() -> GoogleNewsClient {
        GoogleNewsClient::new(reqwest::Client::new())
    }

    #[test]
    fn test_parse_feed_keeps_order_and_strips_html() {
        let articles = parse_feed(FEED).unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Jeanne prolonge au club - Le Monde");
        assert!(articles[0].desc.contains("Jeanne prolonge au club"));
        assert!(!articles[0].desc.contains("<a"));
        assert_eq!(articles[1].title, "Ancien article & archives");
        assert_eq!(
            articles[0].date.as_deref(),
            Some("Wed, 14 Oct 2026 07:00:00 GMT")
        );
    }

    #[test]
    fn test_parse_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>none</title></channel></rss>"#;
        assert!(parse_feed(xml).unwrap().is_empty());
    }

    #[test]
    fn test_feed_url_uses_region_edition() {
        let url = client().feed_url(&spec("fr", "fr", None)).unwrap();
        let s = url.as_str();
        assert!(s.starts_with(FEED_URL));
        assert!(s.contains("q=Jane+Doe"));
        assert!(s.contains("hl=fr"));
        assert!(s.contains("gl=FR"));
        assert!(s.contains("ceid=FR%3Afr"));
    }

    #[test]
    fn test_feed_url_english_falls_back_to_us() {
        let url = client().feed_url(&spec("", "en", None)).unwrap();
        assert!(url.as_str().contains("gl=US"));
        assert!(url.as_str().contains("ceid=US%3Aen"));
    }

    #[test]
    fn test_feed_url_with_start_date() {
        let since = Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap();
        let url = client().feed_url(&spec("fr", "fr", Some(since))).unwrap();
        assert!(url.as_str().contains("q=Jane+Doe+after%3A2026-10-12"));
    }
}
