// src/analyze/types.rs
// Data model for one pass through the analysis pipeline. Everything here is
// per-request: constructed for an incoming call, never persisted.

use serde::{Deserialize, Serialize};

/// Startup descriptive data submitted by the caller. Only `name` is
/// required; every other field is rendered as "Not provided" downstream
/// when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funding_stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
}

/// One item returned by the web-search connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Aggregate output of the search step, fresh per request. Never cached or
/// merged across requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchBundle {
    /// Retained results in relevance order, capped to the connector's top-N.
    pub results: Vec<SearchResult>,
    /// AI-generated synopsis if the search API supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_answer: Option<String>,
    /// First result URL whose text contains the startup name
    /// (case-insensitive); absent when none match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_website_url: Option<String>,
}

/// Structured analysis returned to the caller. Invariants: every numeric
/// field is a real number in its documented range, every list field is a
/// sequence of strings. The normalizer guarantees both regardless of how
/// malformed the LLM output was.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    // 0-10 scores
    pub market_score: f64,
    pub team_score: f64,
    pub technology_score: f64,
    pub traction_score: f64,
    pub overall_score: f64,
    // 0-1 probabilities
    pub success_probability: f64,
    pub unicorn_probability: f64,
    pub market_growth: f64,
    pub market_potential: f64,

    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Set only when the LLM output failed to parse as JSON; carries the
    /// undecoded text for human inspection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// Neutral default used when a numeric field is missing or unparseable.
pub const NEUTRAL_SCORE: f64 = 0.5;

impl Default for AnalysisResult {
    fn default() -> Self {
        Self {
            market_score: NEUTRAL_SCORE,
            team_score: NEUTRAL_SCORE,
            technology_score: NEUTRAL_SCORE,
            traction_score: NEUTRAL_SCORE,
            overall_score: NEUTRAL_SCORE,
            success_probability: NEUTRAL_SCORE,
            unicorn_probability: NEUTRAL_SCORE,
            market_growth: NEUTRAL_SCORE,
            market_potential: NEUTRAL_SCORE,
            strengths: Vec::new(),
            risks: Vec::new(),
            recommendations: Vec::new(),
            website_url: None,
            logo_url: None,
            raw_response: None,
        }
    }
}
