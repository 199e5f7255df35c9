//! Standalone HTML report.
//!
//! One table with the fixed columns Language, Title, Date, Description, Link.
//! Styling is embedded in the document and nothing is loaded from elsewhere,
//! so the file can be shared as a single download.

use crate::report::ReportRow;
use crate::utils::escape_html;
use std::error::Error;
use std::fmt::Write;
use tokio::fs;
use tracing::{info, instrument};

pub const COLUMNS: [&str; 5] = ["Language", "Title", "Date", "Description", "Link"];

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;margin:24px;color:#222}\
h1{font-size:20px}\
p.meta{color:#666;font-size:13px}\
table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ddd;padding:8px;vertical-align:top;text-align:left}\
th{background:#4a6fa5;color:#fff}\
tr:nth-child(even){background:#f4f6f9}";

/// Render `rows` into a complete HTML document.
pub fn render_report(title: &str, generated_at: &str, rows: &[ReportRow]) -> String {
    let mut html = String::new();
    let title = escape_html(title);

    // Writing into a String cannot fail.
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "<style>{STYLE}</style>\n</head>\n<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    let _ = writeln!(
        html,
        "<p class=\"meta\">Generated {} &middot; {} articles</p>",
        escape_html(generated_at),
        rows.len()
    );
    let _ = writeln!(html, "<table>\n<thead>\n<tr>");
    for col in COLUMNS {
        let _ = writeln!(html, "<th>{col}</th>");
    }
    let _ = writeln!(html, "</tr>\n</thead>\n<tbody>");
    for row in rows {
        let link = escape_html(&row.link);
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"{link}\">Read more</a></td></tr>",
            escape_html(&row.language),
            escape_html(&row.title),
            escape_html(&row.date),
            escape_html(&row.description),
        );
    }
    let _ = writeln!(html, "</tbody>\n</table>\n</body>\n</html>");
    html
}

/// Write a rendered report to `path`.
#[instrument(level = "info", skip_all, fields(%path))]
pub async fn write_report(path: &str, html: &str) -> Result<(), Box<dyn Error>> {
    fs::write(path, html).await?;
    info!(bytes = html.len(), "Wrote HTML report");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(title: &str, link: &str) -> ReportRow {
        ReportRow {
            language: "French".to_string(),
            title: title.to_string(),
            date: "N/A".to_string(),
            description: "desc".to_string(),
            link: link.to_string(),
        }
    }

    #[test]
    fn test_report_has_fixed_columns_and_rows() {
        let rows = vec![
            row("Jeanne signe", "https://a.example/1"),
            row("Second", "https://a.example/2"),
        ];
        let html = render_report("News for Jane Doe", "2026-10-16 10:00", &rows);
        for col in COLUMNS {
            assert!(html.contains(&format!("<th>{col}</th>")));
        }
        assert_eq!(html.matches("<tr><td>").count(), 2);
        assert!(html.contains("<a href=\"https://a.example/1\">Read more</a>"));
        assert!(html.contains("2 articles"));
    }

    #[test]
    fn test_report_is_self_contained_and_escaped() {
        let rows = vec![row("<script>alert(1)</script>", "https://a.example/?a=1&b=2")];
        let html = render_report("T & Co", "now", &rows);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<link"));
        assert!(!html.contains("src="));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("https://a.example/?a=1&amp;b=2"));
        assert!(html.contains("<title>T &amp; Co</title>"));
    }

    #[tokio::test]
    async fn test_write_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.html");
        let path = path.to_str().unwrap();
        write_report(path, "<html></html>").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "<html></html>");
    }
}
