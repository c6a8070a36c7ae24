// src/config.rs
// Process configuration, read once at startup and passed explicitly into
// the connectors. No module does ambient env lookups after boot.

use std::env;

/// Env var that switches the analysis connectors to deterministic mocks.
/// Used by tests and local demo runs; never set in production.
pub const ENV_TEST_MODE: &str = "ANALYZE_TEST_MODE";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credential for the LLM completion API (`OPENAI_API_KEY`).
    pub openai_api_key: Option<String>,
    /// Credential for the web-search API (`TAVILY_API_KEY`).
    pub tavily_api_key: Option<String>,
    /// Credential for the news API (`NEWS_API_KEY`).
    pub news_api_key: Option<String>,
    pub host: String,
    pub port: u16,
    /// True when `ANALYZE_TEST_MODE=mock`: connectors are replaced with
    /// offline mocks and no credential is required.
    pub offline_mode: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let offline_mode = env::var(ENV_TEST_MODE)
            .map(|v| v == "mock")
            .unwrap_or(false);

        Self {
            openai_api_key: env_non_empty("OPENAI_API_KEY"),
            tavily_api_key: env_non_empty("TAVILY_API_KEY"),
            news_api_key: env_non_empty("NEWS_API_KEY"),
            host: env_non_empty("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env_non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            offline_mode,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Treat unset and empty-string env vars the same way.
fn env_non_empty(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(v) if !v.trim().is_empty() => Some(v),
        _ => None,
    }
}
