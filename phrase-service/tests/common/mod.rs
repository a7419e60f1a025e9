//! Test helpers for phrase-service integration tests.
//!
//! Builds the real router around a `MockTextProvider` so that no request ever
//! leaves the process.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response, StatusCode},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use phrase_service::config::PhraseConfig;
use phrase_service::services::providers::mock::MockTextProvider;
use phrase_service::{build_router, AppState};
use service_core::config::Config as CoreConfig;
use std::collections::HashMap;
use std::sync::Arc;
use tower::util::ServiceExt;

pub const TEST_API_KEY: &str = "test-api-key";

/// Config built from `vars` on top of a test credential and an ephemeral port.
pub fn test_config_with(vars: &[(&str, &str)]) -> PhraseConfig {
    let mut env: HashMap<String, String> = HashMap::new();
    env.insert("ANTHROPIC_API_KEY".to_string(), TEST_API_KEY.to_string());
    env.insert("SERVICE_NAME".to_string(), "phrase-service-test".to_string());
    for (key, value) in vars {
        env.insert(key.to_string(), value.to_string());
    }

    PhraseConfig::from_lookup(CoreConfig { port: 0 }, |key| env.get(key).cloned())
        .expect("Failed to build test config")
}

pub fn test_config() -> PhraseConfig {
    test_config_with(&[])
}

/// Router plus a handle on the mock provider it calls.
pub struct TestApp {
    pub router: Router,
    pub provider: Arc<MockTextProvider>,
}

impl TestApp {
    pub fn new(provider: MockTextProvider) -> Self {
        Self::with_config(test_config(), provider)
    }

    pub fn with_config(config: PhraseConfig, provider: MockTextProvider) -> Self {
        Self::build(config, provider, None)
    }

    /// Router that also serves `/metrics` from `handle`.
    pub fn with_metrics(provider: MockTextProvider, handle: PrometheusHandle) -> Self {
        Self::build(test_config(), provider, Some(handle))
    }

    fn build(
        config: PhraseConfig,
        provider: MockTextProvider,
        metrics: Option<PrometheusHandle>,
    ) -> Self {
        let provider = Arc::new(provider);
        let router = build_router(AppState {
            config,
            text_provider: provider.clone(),
            metrics,
        });

        Self { router, provider }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router failed to respond")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// POST a raw JSON body and decode the JSON response.
    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await;

        let status = response.status();
        (status, body_json(response).await)
    }
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let text = body_text(response).await;
    serde_json::from_str(&text).expect("Body is not JSON")
}
