use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Prometheus text exposition of everything recorded so far.
pub async fn metrics(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
