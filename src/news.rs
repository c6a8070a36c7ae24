// src/news.rs
// Read-only proxy over a NewsAPI-style backend: startup headlines from the
// last 7 days, augmented with a relative `timeAgo` label and candidate logo
// URLs derived from each article's source domain.

use std::time::Duration;

use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;
use serde_json::Value;

use crate::config::AppConfig;
use crate::error::ApiError;

const NEWS_API_BASE_URL: &str = "https://newsapi.org/v2";

/// Fixed topical query, kept verbatim across calls.
const STARTUP_QUERY: &str =
    "(startup funding) OR (startup launch) OR (startup acquisition) OR (tech startup)";

#[derive(Debug, Serialize)]
pub struct NewsPage {
    pub articles: Vec<Value>,
    #[serde(rename = "totalResults")]
    pub total_results: i64,
    #[serde(rename = "currentPage")]
    pub current_page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
}

pub struct NewsClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsClient {
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
            base_url: NEWS_API_BASE_URL.to_string(),
        }
    }

    /// Missing credential refuses startup, except in offline mode where the
    /// route simply fails per call.
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        match cfg.news_api_key.as_deref() {
            Some(key) => Ok(Self::new(key)),
            None if cfg.offline_mode => Ok(Self::new("")),
            None => Err(anyhow::anyhow!("NEWS_API_KEY is not set")),
        }
    }

    pub async fn startup_news(
        &self,
        page: u32,
        page_size: u32,
        category: Option<&str>,
    ) -> Result<NewsPage, ApiError> {
        counter!("news_requests_total").increment(1);

        if self.api_key.is_empty() {
            return Err(ApiError::News("news API key is not configured".into()));
        }

        let now = Utc::now();
        let from = (now - chrono::Duration::days(7)).format("%Y-%m-%d").to_string();
        let to = now.format("%Y-%m-%d").to_string();
        let page_s = page.to_string();
        let page_size_s = page_size.to_string();

        let mut params: Vec<(&str, &str)> = vec![
            ("apiKey", self.api_key.as_str()),
            ("language", "en"),
            ("sortBy", "publishedAt"),
            ("pageSize", page_size_s.as_str()),
            ("page", page_s.as_str()),
            ("from", from.as_str()),
            ("to", to.as_str()),
            ("q", STARTUP_QUERY),
        ];
        if let Some(cat) = category {
            params.push(("category", cat));
        }

        let resp = self
            .http
            .get(format!("{}/everything", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::News(e.to_string()))?;

        if !resp.status().is_success() {
            counter!("news_upstream_errors_total").increment(1);
            let status = resp.status();
            let body: Value = resp.json().await.unwrap_or(Value::Null);
            let msg = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(ApiError::News(format!("news API {status}: {msg}")));
        }

        let body: Value = resp
            .json()
            .await
            .map_err(|e| ApiError::News(e.to_string()))?;

        let mut articles = body
            .get("articles")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        for article in &mut articles {
            augment_article(article, now);
        }

        Ok(NewsPage {
            articles,
            total_results: body.get("totalResults").and_then(Value::as_i64).unwrap_or(0),
            current_page: page,
            page_size,
        })
    }
}

/// Attach `timeAgo`, `imageUrl` and `logoUrls` to one upstream article.
fn augment_article(article: &mut Value, now: DateTime<Utc>) {
    let Some(obj) = article.as_object_mut() else {
        return;
    };

    if let Some(published) = obj.get("publishedAt").and_then(Value::as_str) {
        if let Some(label) = time_ago(published, now) {
            obj.insert("timeAgo".into(), Value::String(label));
        }
    }

    let image = obj
        .get("urlToImage")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();
    obj.insert("imageUrl".into(), Value::String(image));

    let logos = obj
        .get("url")
        .and_then(Value::as_str)
        .and_then(domain_of)
        .map(|d| logo_candidates(&d))
        .unwrap_or_default();
    obj.insert(
        "logoUrls".into(),
        Value::Array(logos.into_iter().map(Value::String).collect()),
    );
}

/// `"Today"` for same-day articles, else `"<N>d ago"` with whole days since
/// publication.
pub fn time_ago(published_at: &str, now: DateTime<Utc>) -> Option<String> {
    let published = DateTime::parse_from_rfc3339(published_at)
        .ok()?
        .with_timezone(&Utc);
    let days = (now - published).num_days();
    if days > 0 {
        Some(format!("{days}d ago"))
    } else {
        Some("Today".to_string())
    }
}

/// Host of a URL, with a leading `www.` stripped.
pub fn domain_of(url: &str) -> Option<String> {
    let parsed = reqwest::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    Some(host.strip_prefix("www.").unwrap_or(host).to_string())
}

/// Candidate logo URLs for a source domain, best guess first.
pub fn logo_candidates(domain: &str) -> Vec<String> {
    vec![
        format!("https://logo.clearbit.com/{domain}"),
        format!("https://www.google.com/s2/favicons?domain={domain}&sz=128"),
        format!("https://icons.duckduckgo.com/ip3/{domain}.ico"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn three_days_old_article_is_3d_ago() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let label = time_ago("2025-03-07T12:00:00Z", now).unwrap();
        assert_eq!(label, "3d ago");
    }

    #[test]
    fn same_day_article_is_today() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 18, 0, 0).unwrap();
        let label = time_ago("2025-03-10T06:30:00Z", now).unwrap();
        assert_eq!(label, "Today");
    }

    #[test]
    fn unparseable_date_yields_no_label() {
        let now = Utc::now();
        assert!(time_ago("yesterday-ish", now).is_none());
    }

    #[test]
    fn domain_strips_www() {
        assert_eq!(
            domain_of("https://www.techcrunch.com/2025/03/a-story"),
            Some("techcrunch.com".to_string())
        );
        assert_eq!(domain_of("not a url"), None);
    }

    #[test]
    fn logo_candidates_cover_known_services() {
        let logos = logo_candidates("example.com");
        assert_eq!(logos[0], "https://logo.clearbit.com/example.com");
        assert!(logos.iter().all(|l| l.contains("example.com")));
    }

    #[test]
    fn augment_fills_time_ago_image_and_logos() {
        let now = Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap();
        let mut article = serde_json::json!({
            "title": "Acme raises",
            "url": "https://www.reuters.com/tech/acme",
            "publishedAt": "2025-03-08T09:00:00Z",
            "urlToImage": null
        });
        augment_article(&mut article, now);
        assert_eq!(article["timeAgo"], "2d ago");
        assert_eq!(article["imageUrl"], "");
        assert_eq!(article["logoUrls"][0], "https://logo.clearbit.com/reuters.com");
    }
}
