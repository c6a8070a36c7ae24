// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod analyze;
pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod news;

// ---- Re-exports for stable public API ----
pub use crate::analyze::Analyzer;
pub use crate::api::{router, AppState};
pub use crate::config::AppConfig;
pub use crate::error::ApiError;
