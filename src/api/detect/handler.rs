// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seed detection endpoint handler

use axum::{extract::State, Json};
use axum_extra::extract::{multipart::MultipartRejection, Multipart};
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::request::ImageUpload;
use crate::api::errors::{ApiError, ApiErrorResponse};
use crate::api::http_server::AppState;
use crate::detection::DetectionReport;

/// POST /detect - Detect and classify seeds in an uploaded image
///
/// Accepts `multipart/form-data` with an image in the `file` field, forwards
/// it to the hosted seed model and returns the detections along with an
/// annotated copy of the image.
///
/// # Response
/// - `success`, `message`, `detection_count`
/// - `predictions`: class, confidence, position, size, detection_id
///   (highest confidence first)
/// - `summary`: good / bad / impurity / unclassified counts
/// - `image_info`: image metadata from the hosted API
/// - `annotated_image`: base64 JPEG, `null` when nothing was detected
/// - `processing_time`: hosted inference time in seconds
///
/// # Errors
/// - 400 Bad Request: missing file, non-image content type, undecodable image
/// - 413 Payload Too Large: upload over the configured limit
/// - 503 Service Unavailable: no API key configured
/// - 502 Bad Gateway: hosted API rejected the request or was unreachable
/// - 504 Gateway Timeout: hosted API did not answer in time
pub async fn detect_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionReport>, ApiErrorResponse> {
    let request_id = Uuid::new_v4().to_string();
    let span = info_span!("detect", request_id = %request_id);

    async move {
        let multipart = multipart.map_err(|e| {
            warn!("Rejected upload: {}", e);
            ApiError::InvalidRequest(format!("Expected multipart/form-data: {}", e))
                .with_request_id(&request_id)
        })?;

        // 1. Validate upload
        let upload = ImageUpload::from_multipart(multipart, state.config.max_upload_bytes)
            .await
            .map_err(|e| {
                warn!("Upload validation failed: {}", e);
                e.with_request_id(&request_id)
            })?;

        debug!(
            "Upload received: {:?} ({}, {} bytes)",
            upload.file_name,
            upload.content_type,
            upload.bytes.len()
        );

        // 2. Detection service (503 if no API key)
        let service = state.detection_service.as_ref().ok_or_else(|| {
            warn!("Detection service not configured");
            ApiError::ServiceUnavailable(
                "Detection service not configured (set ROBOFLOW_API_KEY)".to_string(),
            )
            .with_request_id(&request_id)
        })?;

        // 3. Run detection
        let report = service.detect(upload.bytes).await.map_err(|e| {
            warn!("Seed detection failed: {}", e);
            ApiError::from(e).with_request_id(&request_id)
        })?;

        info!(
            "Detect complete: {} detections (good={}, bad={}, impurity={})",
            report.detection_count, report.summary.good, report.summary.bad, report.summary.impurity
        );

        Ok(Json(report))
    }
    .instrument(span)
    .await
}
