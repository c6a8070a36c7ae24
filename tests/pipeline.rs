// tests/pipeline.rs
//
// Orchestrator-level tests with stubbed connectors: no sockets, no live
// upstreams. Covers the degrade policies (search failure, malformed LLM
// output) and the default-fill guarantees of the normalizer.

use std::sync::Arc;

use async_trait::async_trait;

use startup_analyzer::analyze::extract::{PlainTextExtractor, UploadedFile};
use startup_analyzer::analyze::llm::{LlmClient, LlmError};
use startup_analyzer::analyze::search::{MockSearch, SearchClient, SearchError};
use startup_analyzer::analyze::types::{AnalysisRequest, SearchBundle, SearchResult};
use startup_analyzer::analyze::Analyzer;
use startup_analyzer::ApiError;

struct ScriptedLlm(&'static str);

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Ok(self.0.to_string())
    }
    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

struct RateLimitedLlm;

#[async_trait]
impl LlmClient for RateLimitedLlm {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::RateLimited)
    }
    fn provider_name(&self) -> &'static str {
        "rate-limited"
    }
}

/// Search connector that always fails with an HTTP 401, to exercise the
/// degrade policy.
struct UnauthorizedSearch;

#[async_trait]
impl SearchClient for UnauthorizedSearch {
    async fn search(
        &self,
        _name: &str,
        _industry: Option<&str>,
    ) -> Result<SearchBundle, SearchError> {
        Err(SearchError::Status(401))
    }
    fn name(&self) -> &'static str {
        "unauthorized"
    }
}

fn analyzer(search: Arc<dyn SearchClient>, llm: Arc<dyn LlmClient>) -> Analyzer {
    Analyzer::new(search, llm, Arc::new(PlainTextExtractor))
}

fn acme() -> AnalysisRequest {
    AnalysisRequest {
        name: "Acme".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn single_field_reply_default_fills_the_rest() {
    let a = analyzer(
        Arc::new(MockSearch::default()),
        Arc::new(ScriptedLlm(r#"{"market_score": 8}"#)),
    );

    let report = a.analyze(acme(), None).await.expect("analysis should succeed");
    let r = &report.analysis;

    assert_eq!(r.market_score, 8.0);
    for (field, value) in [
        ("team_score", r.team_score),
        ("technology_score", r.technology_score),
        ("traction_score", r.traction_score),
        ("overall_score", r.overall_score),
        ("success_probability", r.success_probability),
        ("unicorn_probability", r.unicorn_probability),
        ("market_growth", r.market_growth),
        ("market_potential", r.market_potential),
    ] {
        assert_eq!(value, 0.5, "{field} should default to 0.5");
    }
    assert!(r.strengths.is_empty());
    assert!(r.risks.is_empty());
    assert!(r.recommendations.is_empty());
    assert_eq!(report.startup.name, "Acme", "input must be echoed back");
}

#[tokio::test]
async fn non_json_llm_output_degrades_instead_of_failing() {
    let a = analyzer(
        Arc::new(MockSearch::default()),
        Arc::new(ScriptedLlm("not json")),
    );

    let report = a.analyze(acme(), None).await.expect("degrade, not error");
    let r = &report.analysis;
    assert_eq!(r.market_score, 0.5);
    assert!(r.strengths.is_empty());
    assert_eq!(r.raw_response.as_deref(), Some("not json"));
}

#[tokio::test]
async fn search_401_degrades_to_empty_bundle() {
    let a = analyzer(
        Arc::new(UnauthorizedSearch),
        Arc::new(ScriptedLlm(r#"{"overall_score": 6}"#)),
    );

    let report = a.analyze(acme(), None).await.expect("search failure is recoverable");
    assert!(report.search.results.is_empty());
    assert!(report.search.summary_answer.is_none());
    assert_eq!(report.analysis.overall_score, 6.0);
}

#[tokio::test]
async fn missing_name_is_invalid_input() {
    let a = analyzer(
        Arc::new(MockSearch::default()),
        Arc::new(ScriptedLlm("{}")),
    );

    let err = a
        .analyze(AnalysisRequest::default(), None)
        .await
        .expect_err("empty name must fail fast");
    assert!(matches!(err, ApiError::InvalidInput(_)));
}

#[tokio::test]
async fn llm_rate_limit_maps_to_its_own_kind() {
    let a = analyzer(Arc::new(MockSearch::default()), Arc::new(RateLimitedLlm));

    let err = a.analyze(acme(), None).await.expect_err("rate limit is fatal");
    assert!(matches!(err, ApiError::LlmRateLimited));
}

#[tokio::test]
async fn failed_extraction_is_nonfatal() {
    let a = analyzer(
        Arc::new(MockSearch::default()),
        Arc::new(ScriptedLlm(r#"{"team_score": 9}"#)),
    );

    let file = UploadedFile {
        filename: "deck.pdf".into(),
        bytes: vec![0x25, 0x50],
    };
    let report = a
        .analyze(acme(), Some(file))
        .await
        .expect("extraction failure must not abort the request");
    assert_eq!(report.analysis.team_score, 9.0);
}

#[tokio::test]
async fn candidate_website_url_flows_into_the_result() {
    let bundle = SearchBundle {
        results: vec![SearchResult {
            title: "Acme homepage".into(),
            content: "Official site".into(),
            url: Some("acme.io".into()),
            source: None,
        }],
        summary_answer: None,
        candidate_website_url: Some("acme.io".into()),
    };
    let a = analyzer(
        Arc::new(MockSearch { bundle }),
        Arc::new(ScriptedLlm("{}")),
    );

    let report = a.analyze(acme(), None).await.unwrap();
    assert_eq!(
        report.analysis.website_url.as_deref(),
        Some("https://acme.io"),
        "scheme-less candidate URL must gain an https prefix"
    );
}
