//! Retriever selection and tuning.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use canonical::CanonicalizeConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    BoundedRetriever, CandidateRetriever, CorpusRetriever, EmptyRetriever, RetrievalError,
    RetryConfig, WebSearchRetriever,
};

/// Which candidate source backs plagiarism checks.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RetrieverKind {
    /// No external source; every sentence reports no candidates.
    #[default]
    None,
    /// Local directory of reference documents.
    Corpus,
    /// HTTP search endpoint.
    WebSearch,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RetrieverConfig {
    pub kind: RetrieverKind,
    /// Per-call timeout applied around whichever retriever is built.
    #[serde(with = "crate::serde_millis", rename = "call_timeout_ms")]
    pub call_timeout: Duration,
    /// Root directory for [`RetrieverKind::Corpus`].
    pub corpus_dir: Option<PathBuf>,
    pub web: WebSearchConfig,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            kind: RetrieverKind::None,
            call_timeout: Duration::from_secs(10),
            corpus_dir: None,
            web: WebSearchConfig::default(),
        }
    }
}

/// Settings for [`WebSearchRetriever`].
///
/// The search endpoint is called as `GET {search_url}?q=<query>&num=<k>` and
/// must answer `{"results": [{"url": "...", "snippet": "..."}]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WebSearchConfig {
    pub search_url: Option<String>,
    pub api_key: Option<String>,
    /// Header that carries `api_key`.
    pub api_key_header: String,
    /// Results whose host equals or is a subdomain of one of these are dropped.
    pub excluded_hosts: Vec<String>,
    /// Fetch each result page and compare against its text instead of the snippet.
    pub fetch_pages: bool,
    /// Retry policy for the search call and for each page fetch.
    pub retry: RetryConfig,
    #[serde(with = "crate::serde_millis", rename = "request_timeout_ms")]
    pub request_timeout: Duration,
    /// Fetched pages are cut to this many bytes before decoding.
    pub max_page_bytes: usize,
    pub user_agent: String,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            search_url: None,
            api_key: None,
            api_key_header: "X-Api-Key".to_string(),
            excluded_hosts: vec!["youtube.com".to_string()],
            fetch_pages: true,
            retry: RetryConfig::default(),
            request_timeout: Duration::from_secs(5),
            max_page_bytes: 2 * 1024 * 1024,
            user_agent: concat!("simcheck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl WebSearchConfig {
    pub(crate) fn parsed_search_url(&self) -> Result<reqwest::Url, RetrievalError> {
        let raw = self
            .search_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| {
                RetrievalError::InvalidConfig("web.search_url is required for web_search".into())
            })?;
        let url = reqwest::Url::parse(raw)
            .map_err(|e| RetrievalError::InvalidConfig(format!("web.search_url: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RetrievalError::InvalidConfig(format!(
                "web.search_url must be http or https, got {}",
                url.scheme()
            )));
        }
        Ok(url)
    }
}

impl RetrieverConfig {
    pub fn validate(&self) -> Result<(), RetrievalError> {
        if self.call_timeout.is_zero() {
            return Err(RetrievalError::InvalidConfig(
                "call_timeout_ms must be > 0".into(),
            ));
        }
        match self.kind {
            RetrieverKind::None => Ok(()),
            RetrieverKind::Corpus => self.corpus_dir.as_ref().map(|_| ()).ok_or_else(|| {
                RetrievalError::InvalidConfig("corpus_dir is required for corpus".into())
            }),
            RetrieverKind::WebSearch => {
                self.web.parsed_search_url()?;
                if self.web.request_timeout.is_zero() {
                    return Err(RetrievalError::InvalidConfig(
                        "web.request_timeout_ms must be > 0".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Builds the configured retriever, wrapped with the per-call timeout.
///
/// `canonical` is used to index corpus documents so their terms line up with
/// query tokens.
pub fn build_retriever(
    cfg: &RetrieverConfig,
    canonical: &CanonicalizeConfig,
) -> Result<Arc<dyn CandidateRetriever>, RetrievalError> {
    cfg.validate()?;
    let retriever: Arc<dyn CandidateRetriever> = match cfg.kind {
        RetrieverKind::None => Arc::new(EmptyRetriever),
        RetrieverKind::Corpus => {
            let dir = cfg.corpus_dir.as_deref().ok_or_else(|| {
                RetrievalError::InvalidConfig("corpus_dir is required for corpus".into())
            })?;
            let corpus = CorpusRetriever::load_dir(dir, canonical.clone())?;
            Arc::new(BoundedRetriever::new(corpus, cfg.call_timeout))
        }
        RetrieverKind::WebSearch => {
            let web = WebSearchRetriever::new(cfg.web.clone())?;
            Arc::new(BoundedRetriever::new(web, cfg.call_timeout))
        }
    };
    info!(retriever = retriever.name(), "candidate retriever ready");
    Ok(retriever)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_empty_retriever() {
        let retriever =
            build_retriever(&RetrieverConfig::default(), &CanonicalizeConfig::default())
                .expect("default builds");
        assert_eq!(retriever.name(), "empty");
    }

    #[test]
    fn web_search_requires_url() {
        let cfg = RetrieverConfig {
            kind: RetrieverKind::WebSearch,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(RetrievalError::InvalidConfig(_))
        ));

        let mut cfg = cfg;
        cfg.web.search_url = Some("ftp://example.com/search".into());
        assert!(cfg.validate().is_err());

        cfg.web.search_url = Some("https://search.example.com/api".into());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn corpus_requires_existing_dir() {
        let mut cfg = RetrieverConfig {
            kind: RetrieverKind::Corpus,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());

        cfg.corpus_dir = Some(PathBuf::from("/definitely/not/here"));
        let res = build_retriever(&cfg, &CanonicalizeConfig::default());
        assert!(matches!(res, Err(RetrievalError::InvalidConfig(_))));
    }

    #[test]
    fn zero_timeout_rejected() {
        let cfg = RetrieverConfig {
            call_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn durations_read_as_milliseconds() {
        let cfg: RetrieverConfig = serde_json::from_str(
            r#"{"kind": "web_search", "call_timeout_ms": 250, "web": {"search_url": "http://localhost:9/s", "retry": {"max_retries": 0}}}"#,
        )
        .expect("parse");
        assert_eq!(cfg.kind, RetrieverKind::WebSearch);
        assert_eq!(cfg.call_timeout, Duration::from_millis(250));
        assert_eq!(cfg.web.retry.max_retries, 0);
        assert_eq!(cfg.web.excluded_hosts, vec!["youtube.com".to_string()]);
    }
}
