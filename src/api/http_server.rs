// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::detect::detect_handler;
use super::handlers::{health_handler, not_found_handler, root_handler};
use crate::config::{ApiConfig, RoboflowConfig};
use crate::detection::{DetectionOptions, RoboflowClient, SeedDetectionService};

/// Allowance for multipart boundaries and headers on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    /// `None` when no API key is configured
    pub detection_service: Option<Arc<SeedDetectionService>>,
}

impl AppState {
    pub fn new(config: ApiConfig, detection_service: Option<Arc<SeedDetectionService>>) -> Self {
        Self {
            config: Arc::new(config),
            detection_service,
        }
    }

    /// Build state from configuration, leaving detection disabled without a key
    pub fn from_config(api: ApiConfig, roboflow: &RoboflowConfig) -> Result<Self> {
        let detection_service = if roboflow.is_configured() {
            let client = RoboflowClient::new(roboflow)?;
            let options = DetectionOptions::from_config(roboflow, api.max_upload_bytes);
            Some(Arc::new(SeedDetectionService::new(Arc::new(client), options)))
        } else {
            warn!("ROBOFLOW_API_KEY not set - /detect will return 503");
            None
        };

        Ok(Self::new(api, detection_service))
    }

    pub fn new_for_test() -> Self {
        Self::new(ApiConfig::default(), None)
    }
}

pub fn create_app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/detect", post(detect_handler))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS for browser and mobile clients
///
/// `*` mirrors the caller's origin so credentialed requests still work.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o.trim() == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let addr = state.config.listen_addr.parse::<SocketAddr>()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("API server listening on {}", listener.local_addr()?);

    let app = create_app(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
