//! Utility functions for string handling, dates and file system checks.
//!
//! - Log truncation that respects UTF-8 boundaries
//! - HTML to text and HTML escaping for feeds and reports
//! - `--since` parsing (absolute date or relative span)
//! - Slugs for export file names
//! - Output directory validation

use chrono::{DateTime, Duration, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static RELATIVE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<n>\d+)\s*(?P<unit>[dw])$").unwrap());

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the last character boundary before `max` bytes
/// and get `"…(+N bytes)"` appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Visible text of an HTML fragment, whitespace collapsed.
pub fn html_to_text(fragment: &str) -> String {
    let doc = Html::parse_fragment(fragment);
    doc.root_element()
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Convert a label to a file-name-friendly slug.
///
/// Lowercases, keeps alphanumerics (any script) and hyphens, and turns
/// spaces into hyphens. An empty result becomes `"report"`.
pub fn slugify(label: &str) -> String {
    let slug = label
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "report".to_string()
    } else {
        slug
    }
}

/// Parse a `--since` value into the start of the search window.
///
/// # Arguments
///
/// * `raw` - Either an absolute `YYYY-MM-DD` (taken as midnight UTC) or a
///   relative span such as `4d` or `2w`
/// * `now` - Upper end of the window; spans are counted back from it
///
/// # Returns
///
/// The lower bound of the window `[start, now]`.
///
/// # Errors
///
/// Returns a message if the value matches neither form, if a span overflows
/// the calendar, or if an absolute date lies after `now`.
pub fn parse_since(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();
    if let Some(caps) = RELATIVE_SPAN.captures(raw) {
        let n: i64 = caps["n"]
            .parse()
            .map_err(|e| format!("invalid span '{raw}': {e}"))?;
        let span = match &caps["unit"] {
            "w" => Duration::try_weeks(n),
            _ => Duration::try_days(n),
        };
        return span
            .and_then(|span| now.checked_sub_signed(span))
            .ok_or_else(|| format!("span '{raw}' is too large"));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM-DD or a span like 4d / 2w, got '{raw}'"))?;
    let start = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| format!("invalid date '{raw}'"))?
        .and_utc();
    if start > now {
        return Err(format!("start date {raw} is in the future"));
    }
    Ok(start)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and immediately
/// removes a probe file.
///
/// # Arguments
///
/// * `path` - The output directory to validate
///
/// # Returns
///
/// `Ok(())` if the directory exists and is writable.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        // each Cyrillic letter is two bytes; cutting at 3 must back off to 2
        let result = truncate_for_log("Жанна", 3);
        assert!(result.starts_with("Ж…"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Jane Doe"), "jane-doe");
        assert_eq!(slugify("terms:coach+football"), "termscoachfootball");
        assert_eq!(slugify("Жанна  Д'Арк"), "жанна-дарк");
        assert_eq!(slugify("!!!"), "report");
    }

    #[test]
    fn test_html_to_text() {
        let text = html_to_text(
            r##"<a href="https://x">Jeanne prolonge</a>&nbsp;&nbsp;<font color="#6f6f6f">Le Monde</font>"##,
        );
        assert!(text.contains("Jeanne prolonge"));
        assert!(text.contains("Le Monde"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_parse_since_relative() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(
            parse_since("4d", now).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 12, 12, 0, 0).unwrap()
        );
        assert_eq!(
            parse_since("2w", now).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 2, 12, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_since_absolute() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).unwrap();
        assert_eq!(
            parse_since("2026-10-12", now).unwrap(),
            Utc.with_ymd_and_hms(2026, 10, 12, 0, 0, 0).unwrap()
        );
        assert!(parse_since("2027-01-01", now).is_err());
        assert!(parse_since("last week", now).is_err());
        assert!(parse_since("99999999999999w", now).is_err());
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports/out");
        ensure_writable_dir(nested.to_str().unwrap()).await.unwrap();
        assert!(nested.is_dir());
    }
}
