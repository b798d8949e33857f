// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

use crate::vision::ImageError;

/// Failures along the upload -> hosted model -> annotation path
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("detection API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("detection API request timed out")]
    Timeout,

    #[error("detection API unreachable: {0}")]
    Transport(String),

    #[error("detection API returned an unreadable body: {0}")]
    InvalidResponse(String),

    #[error("image task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for DetectionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return DetectionError::Timeout;
        }
        // Request URLs carry the API key in the query string
        let err = err.without_url();
        if err.is_decode() || err.is_body() {
            DetectionError::InvalidResponse(err.to_string())
        } else {
            DetectionError::Transport(err.to_string())
        }
    }
}

impl From<tokio::task::JoinError> for DetectionError {
    fn from(err: tokio::task::JoinError) -> Self {
        DetectionError::Task(err.to_string())
    }
}
