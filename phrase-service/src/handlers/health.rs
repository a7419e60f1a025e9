use crate::startup::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness message served at `/`.
pub async fn root(State(state): State<AppState>) -> String {
    format!(
        "🚀 Servidor de generación de frases PNL activo con {}.",
        state.text_provider.model()
    )
}

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "model": state.text_provider.model(),
    }))
}
