// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction and validation for POST /detect

use axum::http::StatusCode;
use axum_extra::extract::multipart::{Multipart, MultipartError};
use bytes::{Bytes, BytesMut};
use tracing::debug;

use crate::api::errors::ApiError;

/// Multipart field carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// A validated image upload
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Read the `file` field, enforcing content type and size while streaming
    pub async fn from_multipart(mut multipart: Multipart, max_bytes: usize) -> Result<Self, ApiError> {
        while let Some(mut field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, "Malformed multipart body", max_bytes))?
        {
            if field.name() != Some(UPLOAD_FIELD) {
                debug!("Skipping multipart field {:?}", field.name());
                continue;
            }

            let content_type = validate_content_type(field.content_type())?.to_string();
            let file_name = field.file_name().map(str::to_string);

            let mut buffer = BytesMut::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| multipart_error(e, "Failed to read upload", max_bytes))?
            {
                if buffer.len() + chunk.len() > max_bytes {
                    return Err(ApiError::PayloadTooLarge { limit: max_bytes });
                }
                buffer.extend_from_slice(&chunk);
            }

            if buffer.is_empty() {
                return Err(ApiError::InvalidRequest("Uploaded file is empty".to_string()));
            }

            return Ok(Self {
                file_name,
                content_type,
                bytes: buffer.freeze(),
            });
        }

        Err(ApiError::ValidationError {
            field: UPLOAD_FIELD.to_string(),
            message: "file is required".to_string(),
        })
    }
}

/// Body-limit overruns surface as multipart errors carrying 413
fn multipart_error(err: MultipartError, context: &str, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit: max_bytes }
    } else {
        ApiError::InvalidRequest(format!("{}: {}", context, err))
    }
}

/// Accept only `image/*` content types
pub fn validate_content_type(content_type: Option<&str>) -> Result<&str, ApiError> {
    match content_type {
        Some(ct) if ct.trim().to_ascii_lowercase().starts_with("image/") => Ok(ct),
        _ => Err(ApiError::ValidationError {
            field: UPLOAD_FIELD.to_string(),
            message: "Invalid file type. Must be an image.".to_string(),
        }),
    }
}
