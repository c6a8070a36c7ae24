// src/analyze/normalize.rs
// Response normalizer: lowers the LLM's untyped JSON into a strongly-typed
// AnalysisResult. Total function; never fails. Untyped maps stop here and
// are not allowed past this boundary.
//
// Policy (documented in DESIGN.md): unparseable output degrades to a
// default-filled result carrying the raw text, never an error.

use serde_json::Value;

use crate::analyze::types::{AnalysisRequest, AnalysisResult, SearchBundle, NEUTRAL_SCORE};

pub fn normalize(raw: &str, request: &AnalysisRequest, bundle: &SearchBundle) -> AnalysisResult {
    let mut out = AnalysisResult::default();

    let trimmed = raw.trim();
    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::Object(map)) => {
            let num = |field: &str| map.get(field).and_then(coerce_number).unwrap_or(NEUTRAL_SCORE);
            out.market_score = num("market_score");
            out.team_score = num("team_score");
            out.technology_score = num("technology_score");
            out.traction_score = num("traction_score");
            out.overall_score = num("overall_score");
            out.success_probability = num("success_probability");
            out.unicorn_probability = num("unicorn_probability");
            out.market_growth = num("market_growth");
            out.market_potential = num("market_potential");
            out.strengths = coerce_string_list(map.get("strengths"));
            out.risks = coerce_string_list(map.get("risks"));
            out.recommendations = coerce_string_list(map.get("recommendations"));
            // A re-fed result keeps its preserved raw text, so a second
            // normalization pass changes nothing.
            out.raw_response = map
                .get("raw_response")
                .and_then(Value::as_str)
                .map(str::to_string);
        }
        // Empty input, non-JSON text, or JSON that is not an object: keep
        // the defaults and preserve the raw text for human inspection.
        _ => {
            if !trimmed.is_empty() {
                out.raw_response = Some(trimmed.to_string());
            }
        }
    }

    out.website_url = request
        .website
        .as_deref()
        .or(bundle.candidate_website_url.as_deref())
        .map(ensure_https);
    // logo_url: reserved for a future logo-resolution step; the current
    // search connector never yields one.
    out.logo_url = None;

    out
}

/// Numbers pass through; numeric strings are parsed; everything else is None.
fn coerce_number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Arrays become vectors of strings (scalar items rendered as text);
/// anything that is not an array becomes the empty sequence.
fn coerce_string_list(v: Option<&Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                Value::Bool(b) => Some(b.to_string()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Prefix `https://` when the value carries no explicit scheme.
fn ensure_https(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}
