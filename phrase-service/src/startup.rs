//! Application startup and lifecycle management.
//!
//! Builds the relay router, binds the HTTP listener and runs the server until
//! a shutdown signal arrives.

use crate::config::{CorsPolicy, PhraseConfig};
use crate::handlers;
use crate::services::providers::anthropic::AnthropicTextProvider;
use crate::services::TextProvider;
use axum::{
    body::Body,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: PhraseConfig,
    pub text_provider: Arc<dyn TextProvider>,
    pub metrics: Option<PrometheusHandle>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    let mut app = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route(
            "/generate-phrases",
            post(handlers::phrases::generate_phrases),
        );

    if let Some(handle) = state.metrics.clone() {
        app = app.merge(
            Router::new()
                .route("/metrics", get(handlers::metrics::metrics))
                .with_state::<AppState>(handle),
        );
    }

    app.with_state(state)
        .route_layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<Body>))
        .layer(from_fn(request_id_middleware))
        .layer(cors)
}

fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    match policy {
        CorsPolicy::Permissive => CorsLayer::permissive(),
        CorsPolicy::Restricted { allowed_origins } => {
            let origin = if allowed_origins.iter().any(|o| o == "*") {
                AllowOrigin::any()
            } else {
                // Origins are validated when the configuration is loaded.
                AllowOrigin::list(
                    allowed_origins
                        .iter()
                        .filter_map(|o| o.parse::<HeaderValue>().ok()),
                )
            };

            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE])
        }
    }
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the Anthropic provider.
    pub async fn build(
        config: PhraseConfig,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        let provider = AnthropicTextProvider::new(config.anthropic.clone()).map_err(|e| {
            tracing::error!("Failed to initialize Anthropic provider: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        tracing::info!(
            model = %config.anthropic.model,
            max_tokens = config.anthropic.max_tokens,
            base_url = %config.anthropic.base_url,
            "Anthropic API key detected, provider initialized"
        );

        Self::build_with_provider(config, Arc::new(provider), metrics).await
    }

    /// Build the application around an already constructed provider.
    pub async fn build_with_provider(
        config: PhraseConfig,
        text_provider: Arc<dyn TextProvider>,
        metrics: Option<PrometheusHandle>,
    ) -> Result<Self, AppError> {
        tracing::info!(cors = ?config.cors, "CORS policy configured");

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        let router = build_router(AppState {
            config,
            text_provider,
            metrics,
        });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!(port = self.port, "Phrase relay listening");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Service shutdown complete");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
