//! Markdown rendering for the terminal.
//!
//! Alert links are grouped by target; articles are grouped by language with
//! the title in bold, the description and a `Read more` link.

use crate::models::AlertLink;
use crate::report::{Aggregator, MISSING_DATE};
use itertools::Itertools;
use std::fmt::Write;

pub const ALERTS_NOTE: &str = "**Note:** After opening the link, manually adjust the 'Language' and 'Region' fields as needed.";

pub fn alerts_to_markdown(links: &[AlertLink]) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## Generated Google Alerts URLs\n");
    for (target, group) in &links.iter().chunk_by(|l| l.target.clone()) {
        let _ = writeln!(md, "### {target}\n");
        for link in group {
            let _ = writeln!(md, "- [{} Alert]({})", link.language, link.url);
        }
        md.push('\n');
    }
    let _ = writeln!(md, "{ALERTS_NOTE}");
    md
}

pub fn articles_to_markdown(results: &Aggregator) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "## Fetched News Articles\n");
    for (language, articles) in results.groups() {
        let _ = writeln!(md, "### {language} ({} articles)\n", articles.len());
        for article in articles {
            let date = article
                .published
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| MISSING_DATE.to_string());
            let _ = writeln!(md, "**{}**  ", article.title);
            let _ = writeln!(md, "_{date}_\n");
            if !article.description.is_empty() {
                let _ = writeln!(md, "{}\n", article.description);
            }
            let _ = writeln!(md, "[Read more]({})\n", article.url);
        }
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ArticleRecord;

    fn link(target: &str, language: &str) -> AlertLink {
        AlertLink {
            language: language.to_string(),
            target: target.to_string(),
            phrase: target.to_string(),
            url: format!("https://www.google.com/alerts?hl=en&q={target}&gl=#1:0"),
        }
    }

    #[test]
    fn test_alerts_markdown_groups_by_target() {
        let md = alerts_to_markdown(&[
            link("Jane", "English"),
            link("Jane", "French"),
            link("John", "English"),
        ]);
        assert_eq!(md.matches("### Jane").count(), 1);
        assert_eq!(md.matches("### John").count(), 1);
        assert!(md.contains("- [French Alert](https://www.google.com/alerts?hl=en&q=Jane&gl=#1:0)"));
        assert!(md.trim_end().ends_with(ALERTS_NOTE));
    }

    #[test]
    fn test_articles_markdown() {
        let mut agg = Aggregator::default();
        agg.add_results(
            "French",
            vec![ArticleRecord {
                title: "Jeanne signe".to_string(),
                description: "Trois ans".to_string(),
                url: "https://a.example/1".to_string(),
                published: None,
            }],
        );
        let md = articles_to_markdown(&agg);
        assert!(md.contains("### French (1 articles)"));
        assert!(md.contains("**Jeanne signe**"));
        assert!(md.contains("_N/A_"));
        assert!(md.contains("[Read more](https://a.example/1)"));
    }
}
