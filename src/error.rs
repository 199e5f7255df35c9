//! Error taxonomy for resolution and dispatch.
//!
//! Every failure is scoped to a single user action or a single
//! (phrase, language) combination. [`MonitorError::kind`] groups the variants
//! so callers can decide whether to abort the current call or log and move on.

/// Broad class of a [`MonitorError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing credential or a language code the provider does not accept.
    Configuration,
    /// The name dataset or term dictionary does not hold the requested data.
    Data,
    /// Network failure, non-success provider status or an empty result set.
    Upstream,
}

#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("{provider} requires an API key (set NEWSAPI_KEY or newsapi_key in the config)")]
    MissingCredential { provider: &'static str },

    #[error("no {0} was loaded (pass its path on the command line or in the config)")]
    MissingSource(&'static str),

    #[error("{provider} does not support language code '{code}'")]
    UnsupportedLanguage { provider: &'static str, code: String },

    #[error("subject '{0}' is not present in the name dataset")]
    UnknownSubject(String),

    #[error("no {language} name recorded for subject '{subject}'")]
    MissingLocalizedName { subject: String, language: String },

    #[error("the name dataset has no '{0}' column")]
    UnknownLanguageColumn(String),

    #[error("name dataset is empty or has no header row")]
    EmptyDataset,

    #[error("{provider} returned {status}: {message}")]
    Upstream {
        provider: &'static str,
        status: String,
        message: String,
    },

    #[error("{provider} returned no articles for '{phrase}'")]
    NoResults {
        provider: &'static str,
        phrase: String,
    },

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed parse error: {0}")]
    Feed(#[from] quick_xml::de::DeError),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl MonitorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MonitorError::MissingCredential { .. }
            | MonitorError::MissingSource(_)
            | MonitorError::Url(_)
            | MonitorError::UnsupportedLanguage { .. } => ErrorKind::Configuration,
            MonitorError::UnknownSubject(_)
            | MonitorError::MissingLocalizedName { .. }
            | MonitorError::UnknownLanguageColumn(_)
            | MonitorError::EmptyDataset
            | MonitorError::Yaml(_)
            | MonitorError::Csv(_)
            | MonitorError::Io(_) => ErrorKind::Data,
            MonitorError::Upstream { .. }
            | MonitorError::NoResults { .. }
            | MonitorError::Http(_)
            | MonitorError::Feed(_)
            | MonitorError::Json(_) => ErrorKind::Upstream,
        }
    }
}

pub type Result<T> = std::result::Result<T, MonitorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let e = MonitorError::MissingCredential { provider: "newsapi" };
        assert_eq!(e.kind(), ErrorKind::Configuration);

        let e = MonitorError::MissingLocalizedName {
            subject: "Jane Doe".to_string(),
            language: "French".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::Data);

        let e = MonitorError::NoResults {
            provider: "google-news",
            phrase: "Jeanne".to_string(),
        };
        assert_eq!(e.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn test_display_names_the_cell() {
        let e = MonitorError::MissingLocalizedName {
            subject: "Jane Doe".to_string(),
            language: "Greek".to_string(),
        };
        assert_eq!(e.to_string(), "no Greek name recorded for subject 'Jane Doe'");
    }
}
