use axum::{routing::get, Router};
use metrics::{describe_counter, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder, register the pipeline series, and
    /// record the boot timestamp.
    pub fn init() -> Self {
        let builder = PrometheusBuilder::new();

        let handle = builder
            .install_recorder()
            .expect("prometheus: install recorder");

        describe_pipeline_metrics();
        gauge!("service_boot_ts").set(chrono::Utc::now().timestamp() as f64);

        Self { handle }
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Descriptions for every counter the service increments, registered once
/// at recorder install so the series show up on /metrics.
fn describe_pipeline_metrics() {
    describe_counter!("analyze_requests_total", "Analysis requests started.");
    describe_counter!(
        "analyze_search_degraded_total",
        "Requests that proceeded with an empty search bundle after a search failure."
    );
    describe_counter!(
        "analyze_extract_failed_total",
        "Uploaded documents whose text extraction failed (non-fatal)."
    );
    describe_counter!(
        "analyze_llm_malformed_total",
        "LLM responses that failed JSON decoding and were default-filled."
    );
    describe_counter!("news_requests_total", "News proxy requests.");
    describe_counter!(
        "news_upstream_errors_total",
        "News API non-success responses."
    );
}
