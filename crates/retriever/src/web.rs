use async_trait::async_trait;
use canonical::{decode, MediaType, Token};
use futures::future::join_all;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::WebSearchConfig;
use crate::retry::execute_with_retry_async;
use crate::{query_text, Candidate, CandidateRetriever, RetrievalError};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchHit {
    url: String,
    #[serde(default)]
    snippet: String,
}

/// Retrieves candidates from an HTTP search endpoint, optionally replacing
/// each result's snippet with the text of the page it points to.
#[derive(Debug, Clone)]
pub struct WebSearchRetriever {
    client: reqwest::Client,
    search_url: reqwest::Url,
    cfg: WebSearchConfig,
}

impl WebSearchRetriever {
    pub fn new(cfg: WebSearchConfig) -> Result<Self, RetrievalError> {
        let search_url = cfg.parsed_search_url()?;
        let client = reqwest::Client::builder()
            .timeout(cfg.request_timeout)
            .connect_timeout(cfg.request_timeout)
            .user_agent(cfg.user_agent.as_str())
            .pool_max_idle_per_host(32)
            .build()
            .map_err(|e| RetrievalError::InvalidConfig(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            search_url,
            cfg,
        })
    }

    async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>, RetrievalError> {
        let num = k.to_string();
        let outcome = execute_with_retry_async(&self.cfg.retry, |attempt| {
            let mut request = self
                .client
                .get(self.search_url.clone())
                .query(&[("q", query), ("num", num.as_str())]);
            if let Some(key) = self.cfg.api_key.as_deref() {
                request = request.header(self.cfg.api_key_header.as_str(), key);
            }
            async move {
                if attempt > 0 {
                    debug!(attempt, "retrying search request");
                }
                let response = request
                    .send()
                    .await
                    .map_err(|e| format!("search request failed: {e}"))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(format!("search HTTP error {status}"));
                }
                response
                    .json::<SearchResponse>()
                    .await
                    .map_err(|e| format!("invalid search response: {e}"))
            }
        })
        .await;
        outcome
            .into_result()
            .map(|body| body.results)
            .map_err(RetrievalError::Unavailable)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, String> {
        let max_bytes = self.cfg.max_page_bytes;
        execute_with_retry_async(&self.cfg.retry, |_attempt| async move {
            let response = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| format!("page request failed: {e}"))?;
            let status = response.status();
            if !status.is_success() {
                return Err(format!("page HTTP error {status}"));
            }
            let media_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .and_then(MediaType::from_content_type)
                .unwrap_or(MediaType::Html);
            if let MediaType::Unsupported(name) = &media_type {
                return Err(format!("invalid page content type {name}"));
            }
            let body = response
                .bytes()
                .await
                .map_err(|e| format!("page body read failed: {e}"))?;
            let body = truncate_at_char_boundary(&body, max_bytes);
            decode(body, &media_type).map_err(|e| format!("invalid page content: {e}"))
        })
        .await
        .into_result()
    }

    fn is_excluded(&self, url: &str) -> bool {
        let Ok(parsed) = reqwest::Url::parse(url) else {
            return true;
        };
        let Some(host) = parsed.host_str().map(str::to_ascii_lowercase) else {
            return true;
        };
        self.cfg.excluded_hosts.iter().any(|excluded| {
            let excluded = excluded.to_ascii_lowercase();
            host == excluded || host.ends_with(&format!(".{excluded}"))
        })
    }

    async fn candidate_text(&self, hit: &SearchHit) -> String {
        if !self.cfg.fetch_pages {
            return hit.snippet.clone();
        }
        match self.fetch_page(&hit.url).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => hit.snippet.clone(),
            Err(error) => {
                warn!(url = %hit.url, %error, "page fetch failed; using snippet");
                hit.snippet.clone()
            }
        }
    }
}

#[async_trait]
impl CandidateRetriever for WebSearchRetriever {
    async fn retrieve(&self, query: &[Token], k: usize) -> Result<Vec<Candidate>, RetrievalError> {
        if query.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let q = query_text(query);
        let hits: Vec<SearchHit> = self
            .search(&q, k)
            .await?
            .into_iter()
            .filter(|hit| !self.is_excluded(&hit.url))
            .take(k)
            .collect();

        let texts = join_all(hits.iter().map(|hit| self.candidate_text(hit))).await;
        let candidates: Vec<Candidate> = hits
            .into_iter()
            .zip(texts)
            .filter(|(_, text)| !text.trim().is_empty())
            .enumerate()
            .map(|(rank, (hit, text))| Candidate {
                source: hit.url,
                text,
                rank,
            })
            .collect();
        debug!(query = %q, candidates = candidates.len(), "web search complete");
        Ok(candidates)
    }

    fn name(&self) -> &str {
        "web_search"
    }
}

/// Longest prefix of `body` within `max` bytes that does not end inside a
/// UTF-8 sequence.
fn truncate_at_char_boundary(body: &[u8], max: usize) -> &[u8] {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    // A sequence has at most three continuation bytes.
    while end > 0 && max - end < 3 && body[end] & 0xC0 == 0x80 {
        end -= 1;
    }
    &body[..end]
}
