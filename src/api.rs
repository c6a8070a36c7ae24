// src/api.rs
// HTTP surface: /api/v1/analyze, /api/v1/startup-news, /health.

use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Query, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;

use crate::analyze::extract::UploadedFile;
use crate::analyze::types::AnalysisRequest;
use crate::analyze::{AnalysisReport, Analyzer};
use crate::error::ApiError;
use crate::news::{NewsClient, NewsPage};

#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<Analyzer>,
    pub news: Arc<NewsClient>,
}

impl AppState {
    pub fn new(analyzer: Analyzer, news: NewsClient) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            news: Arc::new(news),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1/analyze", post(analyze))
        .route("/api/v1/startup-news", get(startup_news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "api_version": "1.0.0",
    }))
}

/// Accepts either a JSON body or a multipart form with an optional `file`
/// part. An `image` part is accepted but ignored (no bearing on the result).
async fn analyze(
    State(state): State<AppState>,
    req: Request,
) -> Result<Json<AnalysisReport>, ApiError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let (request, file) = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(req, &())
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        read_multipart(multipart).await?
    } else {
        let Json(body) = Json::<AnalysisRequest>::from_request(req, &())
            .await
            .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
        (body, None)
    };

    let report = state.analyzer.analyze(request, file).await?;
    Ok(Json(report))
}

async fn read_multipart(
    mut multipart: Multipart,
) -> Result<(AnalysisRequest, Option<UploadedFile>), ApiError> {
    let mut request = AnalysisRequest::default();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.txt").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
                file = Some(UploadedFile {
                    filename,
                    bytes: bytes.to_vec(),
                });
            }
            // Debug image preview is out of scope; drain and drop.
            "image" => {
                let _ = field.bytes().await;
            }
            other => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::InvalidInput(e.to_string()))?;
                let value = value.trim().to_string();
                if value.is_empty() {
                    continue;
                }
                match other {
                    "name" => request.name = value,
                    "description" => request.description = Some(value),
                    "industry" => request.industry = Some(value),
                    "funding_stage" => request.funding_stage = Some(value),
                    "website" => request.website = Some(value),
                    _ => {}
                }
            }
        }
    }

    Ok((request, file))
}

#[derive(serde::Deserialize)]
struct NewsParams {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_page_size")]
    page_size: u32,
    #[serde(default)]
    category: Option<String>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    10
}

async fn startup_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<NewsPage>, ApiError> {
    let page = state
        .news
        .startup_news(params.page, params.page_size, params.category.as_deref())
        .await?;
    Ok(Json(page))
}
