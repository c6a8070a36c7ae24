// src/analyze/search.rs
// Web-search connector (Tavily-style API). Fetches contextual facts about a
// startup and distills them into a SearchBundle for prompt composition.
//
// Failure policy: recoverable. The orchestrator turns any SearchError into
// an empty bundle and keeps going; this module only reports the error.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analyze::types::{SearchBundle, SearchResult};

const TAVILY_SEARCH_URL: &str = "https://api.tavily.com/search";

/// How many retained results make it into the prompt.
pub const MAX_RESULTS: usize = 3;

/// Allow-list of reputable business/news sources used for higher-precision
/// searches.
const REPUTABLE_DOMAINS: &[&str] = &[
    "techcrunch.com",
    "crunchbase.com",
    "bloomberg.com",
    "reuters.com",
    "forbes.com",
    "linkedin.com",
];

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search API key is not configured")]
    MissingKey,
    #[error("search API returned status {0}")]
    Status(u16),
    #[error("search transport error: {0}")]
    Transport(String),
}

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Query the search API for facts about `name` (optionally narrowed by
    /// `industry`) and return a filtered bundle.
    async fn search(&self, name: &str, industry: Option<&str>) -> Result<SearchBundle, SearchError>;
    /// Connector name for diagnostics.
    fn name(&self) -> &'static str;
}

/// Tavily search API client.
pub struct TavilyClient {
    http: reqwest::Client,
    api_key: String,
    /// When true, restrict results to REPUTABLE_DOMAINS.
    restrict_domains: bool,
}

impl TavilyClient {
    pub fn new(api_key: &str) -> Self {
        let http = reqwest::Client::builder()
            .user_agent("startup-analyzer/0.1")
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("reqwest client");
        Self {
            http,
            api_key: api_key.to_string(),
            restrict_domains: true,
        }
    }
}

#[derive(Serialize)]
struct TavilyRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
    include_answer: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_domains: Option<&'a [&'a str]>,
}

#[derive(Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Deserialize)]
struct TavilyResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: Option<String>,
}

#[async_trait]
impl SearchClient for TavilyClient {
    async fn search(&self, name: &str, industry: Option<&str>) -> Result<SearchBundle, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::MissingKey);
        }

        let query = build_query(name, industry);
        let req = TavilyRequest {
            api_key: &self.api_key,
            query: &query,
            search_depth: "advanced",
            // Over-fetch: filtering discards empty items before the top-N cap.
            max_results: MAX_RESULTS * 2,
            include_answer: true,
            include_domains: self.restrict_domains.then_some(REPUTABLE_DOMAINS),
        };

        let resp = self
            .http
            .post(TAVILY_SEARCH_URL)
            .json(&req)
            .send()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SearchError::Status(resp.status().as_u16()));
        }

        let body: TavilyResponse = resp
            .json()
            .await
            .map_err(|e| SearchError::Transport(e.to_string()))?;

        let results = body
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                content: r.content,
                url: r.url,
                source: None,
            })
            .collect();
        Ok(bundle_from_results(name, body.answer, results))
    }

    fn name(&self) -> &'static str {
        "tavily"
    }
}

/// Query string: startup name + fixed boosting terms + industry when known.
pub fn build_query(name: &str, industry: Option<&str>) -> String {
    let mut q = format!("{name} company startup funding valuation");
    if let Some(ind) = industry {
        let ind = ind.trim();
        if !ind.is_empty() {
            q.push(' ');
            q.push_str(ind);
        }
    }
    q
}

/// Filter raw results down to analytically useful ones and derive the
/// candidate website URL.
pub fn bundle_from_results(
    name: &str,
    answer: Option<String>,
    results: Vec<SearchResult>,
) -> SearchBundle {
    let retained: Vec<SearchResult> = results
        .into_iter()
        .filter(|r| !r.title.trim().is_empty() && !r.content.trim().is_empty())
        .take(MAX_RESULTS)
        .collect();

    let needle = name.to_lowercase();
    let candidate_website_url = retained.iter().find_map(|r| {
        r.url
            .as_ref()
            .filter(|u| u.to_lowercase().contains(&needle))
            .cloned()
    });

    SearchBundle {
        results: retained,
        summary_answer: answer.filter(|a| !a.trim().is_empty()),
        candidate_website_url,
    }
}

/// Deterministic connector used in offline/test mode; returns a fixed bundle.
#[derive(Clone, Default)]
pub struct MockSearch {
    pub bundle: SearchBundle,
}

#[async_trait]
impl SearchClient for MockSearch {
    async fn search(
        &self,
        _name: &str,
        _industry: Option<&str>,
    ) -> Result<SearchBundle, SearchError> {
        Ok(self.bundle.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(title: &str, content: &str, url: Option<&str>) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            content: content.to_string(),
            url: url.map(str::to_string),
            source: None,
        }
    }

    #[test]
    fn query_includes_boost_terms_and_industry() {
        let q = build_query("Acme", Some("fintech"));
        assert_eq!(q, "Acme company startup funding valuation fintech");
        let q = build_query("Acme", None);
        assert!(!q.contains("fintech"));
    }

    #[test]
    fn filtering_drops_results_without_title_or_content() {
        let raw = vec![
            result("", "", Some("https://x.com")),
            result("Acme raises $10M", "Series A led by ...", None),
            result("Acme profile", "", None),
        ];
        let b = bundle_from_results("Acme", None, raw);
        assert_eq!(b.results.len(), 1);
        assert_eq!(b.results[0].title, "Acme raises $10M");
    }

    #[test]
    fn retained_set_is_capped_to_top_n() {
        let raw = (0..10)
            .map(|i| result(&format!("t{i}"), "body", None))
            .collect();
        let b = bundle_from_results("Acme", None, raw);
        assert_eq!(b.results.len(), MAX_RESULTS);
        // Relevance order preserved.
        assert_eq!(b.results[0].title, "t0");
    }

    #[test]
    fn candidate_website_matches_name_case_insensitively() {
        let raw = vec![
            result("About", "text", Some("https://techcrunch.com/story")),
            result("Home", "text", Some("https://www.ACME.io")),
        ];
        let b = bundle_from_results("acme", None, raw);
        assert_eq!(
            b.candidate_website_url.as_deref(),
            Some("https://www.ACME.io")
        );
    }

    #[test]
    fn blank_answer_is_dropped() {
        let b = bundle_from_results("Acme", Some("   ".into()), vec![]);
        assert!(b.summary_answer.is_none());
    }
}
