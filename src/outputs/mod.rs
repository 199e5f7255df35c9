//! Output generation for search reports and alert links.
//!
//! # Submodules
//!
//! - [`html`]: self-contained HTML report (Language, Title, Date, Description, Link)
//! - [`csv`]: alerts-only CSV (Language, URL)
//! - [`json`]: report rows as JSON
//! - [`markdown`]: terminal display of alerts and grouped articles
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── jane-doe_alerts_2026-10-16.csv
//! ├── jane-doe_news_2026-10-16.html
//! └── jane-doe_news_2026-10-16.json
//! ```

pub mod csv;
pub mod html;
pub mod json;
pub mod markdown;

use chrono::NaiveDate;

/// File name for an export: `{label}_{kind}_{date}.{ext}`.
pub fn export_file_name(label: &str, kind: &str, date: NaiveDate, ext: &str) -> String {
    format!("{label}_{kind}_{date}.{ext}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(
            export_file_name("jane-doe", "news", date, "html"),
            "jane-doe_news_2026-10-16.html"
        );
    }
}
