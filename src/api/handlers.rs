// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::version;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub detection_configured: bool,
    pub version: String,
}

/// GET / - Service banner and endpoint index
pub async fn root_handler() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("detect".to_string(), "/detect (POST)".to_string()),
        ("health".to_string(), "/health".to_string()),
    ]);

    Json(RootResponse {
        message: "Seed Classification API is live".to_string(),
        status: "running".to_string(),
        version: version::VERSION_NUMBER.to_string(),
        endpoints,
    })
}

/// GET /health - Liveness probe
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        detection_configured: state.detection_service.is_some(),
        version: version::VERSION_NUMBER.to_string(),
    })
}

/// Fallback for unknown routes
pub async fn not_found_handler(uri: axum::http::Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
