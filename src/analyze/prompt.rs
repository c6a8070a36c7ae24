// src/analyze/prompt.rs
// Prompt composer: pure string construction, no I/O. Two calls with the
// same inputs produce byte-identical prompts.

use std::fmt::Write as _;

use crate::analyze::types::{AnalysisRequest, SearchBundle};

const NOT_PROVIDED: &str = "Not provided";

fn or_not_provided(v: &Option<String>) -> &str {
    match v.as_deref() {
        Some(s) if !s.trim().is_empty() => s,
        _ => NOT_PROVIDED,
    }
}

/// Render the analysis prompt: identity block, search findings, document
/// text, then the fixed instruction block.
pub fn compose(request: &AnalysisRequest, bundle: &SearchBundle, document_text: &str) -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(out, "Analyze this startup and provide scores and insights:");
    let _ = writeln!(out);
    let _ = writeln!(out, "Company: {}", request.name);
    let _ = writeln!(out, "Description: {}", or_not_provided(&request.description));
    let _ = writeln!(out, "Industry: {}", or_not_provided(&request.industry));
    let _ = writeln!(out, "Funding Stage: {}", or_not_provided(&request.funding_stage));
    let _ = writeln!(out, "Website: {}", or_not_provided(&request.website));
    let _ = writeln!(out);

    let _ = writeln!(out, "Web Research Findings:");
    if let Some(answer) = &bundle.summary_answer {
        let _ = writeln!(out, "AI Summary: {answer}");
    }
    let mut idx = 0usize;
    for r in &bundle.results {
        // A result missing both title and content carries no analytical value.
        if r.title.trim().is_empty() && r.content.trim().is_empty() {
            continue;
        }
        idx += 1;
        let _ = writeln!(out, "{}. {}: {}", idx, r.title, r.content);
    }
    if idx == 0 && bundle.summary_answer.is_none() {
        let _ = writeln!(out, "No findings available.");
    }
    let _ = writeln!(out);

    let _ = writeln!(out, "Attached Document:");
    let _ = writeln!(out, "{document_text}");
    let _ = writeln!(out);

    out.push_str(INSTRUCTION_BLOCK);
    out
}

/// Fixed instruction block. Must stay stable across calls so identical
/// inputs produce identical prompts.
const INSTRUCTION_BLOCK: &str = "\
Provide the following analysis:
1. market_score (0-10): market size and opportunity
2. team_score (0-10): founding team strength
3. technology_score (0-10): technical capability and defensibility
4. traction_score (0-10): customer and revenue traction
5. overall_score (0-10): overall investment attractiveness
6. success_probability (0-1): probability of long-term success
7. unicorn_probability (0-1): probability of reaching a $1B valuation
8. market_growth (0-1): expected market growth rate
9. market_potential (0-1): remaining market headroom
10. strengths, risks, recommendations: short text items for each

Respond with ONLY a JSON object using exactly these field names: \
market_score, team_score, technology_score, traction_score, overall_score, \
success_probability, unicorn_probability, market_growth, market_potential, \
strengths, risks, recommendations. \
All scores must be numeric values, not quoted strings. \
strengths, risks and recommendations must be arrays of strings.";
