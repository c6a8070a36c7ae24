// src/analyze/mod.rs
// Analysis orchestrator: one linear pipeline per request.
//
//   validate name -> extract document text (best-effort)
//   -> web search (recoverable) -> compose prompt -> LLM -> normalize
//
// Within one request the search step always completes before the LLM call
// starts, because the prompt depends on the search output. No retries, no
// loops back to an earlier step, no shared mutable state across requests.

pub mod extract;
pub mod llm;
pub mod normalize;
pub mod prompt;
pub mod search;
pub mod types;

use std::sync::Arc;

use metrics::counter;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::ApiError;
use extract::{DocumentExtractor, PlainTextExtractor, UploadedFile};
use llm::{LlmClient, MockLlm, OpenAiClient};
use search::{MockSearch, SearchClient, TavilyClient};
use types::{AnalysisRequest, AnalysisResult, SearchBundle};

/// Final payload: the normalized analysis plus the echoed input and the raw
/// search bundle, for caller transparency.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub analysis: AnalysisResult,
    pub startup: AnalysisRequest,
    pub search: SearchBundle,
}

pub struct Analyzer {
    search: Arc<dyn SearchClient>,
    llm: Arc<dyn LlmClient>,
    extractor: Arc<dyn DocumentExtractor>,
}

impl Analyzer {
    pub fn new(
        search: Arc<dyn SearchClient>,
        llm: Arc<dyn LlmClient>,
        extractor: Arc<dyn DocumentExtractor>,
    ) -> Self {
        Self {
            search,
            llm,
            extractor,
        }
    }

    /// Build the production connectors from config, or the offline mocks
    /// when `ANALYZE_TEST_MODE=mock`. Missing credentials are a fatal
    /// configuration error: the service refuses to start.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        if cfg.offline_mode {
            tracing::info!("offline mode: using mock search and LLM connectors");
            return Ok(Self::new(
                Arc::new(MockSearch::default()),
                Arc::new(MockLlm::default()),
                Arc::new(PlainTextExtractor),
            ));
        }

        let tavily_key = cfg
            .tavily_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("TAVILY_API_KEY is not set"))?;
        let openai_key = cfg
            .openai_api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;

        Ok(Self::new(
            Arc::new(TavilyClient::new(tavily_key)),
            Arc::new(OpenAiClient::new(openai_key, None)),
            Arc::new(PlainTextExtractor),
        ))
    }

    pub async fn analyze(
        &self,
        request: AnalysisRequest,
        file: Option<UploadedFile>,
    ) -> Result<AnalysisReport, ApiError> {
        counter!("analyze_requests_total").increment(1);

        // 1) Validate.
        if request.name.trim().is_empty() {
            return Err(ApiError::InvalidInput(
                "startup name is required".to_string(),
            ));
        }

        // 2) Document text, best-effort.
        let document_text = match &file {
            Some(f) => match self.extractor.extract(f) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, filename = %f.filename, "document extraction failed");
                    counter!("analyze_extract_failed_total").increment(1);
                    String::new()
                }
            },
            None => String::new(),
        };

        // 3) Web search; a failure degrades to an empty bundle.
        let bundle = match self
            .search
            .search(&request.name, request.industry.as_deref())
            .await
        {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!(error = %e, connector = self.search.name(), "search degraded");
                counter!("analyze_search_degraded_total").increment(1);
                SearchBundle::default()
            }
        };

        // 4) + 5) Prompt, then completion. LLM failures are fatal for the
        // request and map to distinct API statuses.
        let prompt = prompt::compose(&request, &bundle, &document_text);
        let raw = self.llm.complete(&prompt).await?;

        // 6) Normalize; never fails.
        let analysis = normalize::normalize(&raw, &request, &bundle);
        if analysis.raw_response.is_some() {
            tracing::warn!(provider = self.llm.provider_name(), "malformed LLM output, default-filled");
            counter!("analyze_llm_malformed_total").increment(1);
        }

        Ok(AnalysisReport {
            analysis,
            startup: request,
            search: bundle,
        })
    }
}
