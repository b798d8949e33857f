// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Runtime configuration for the HTTP surface and the hosted detector

use anyhow::{anyhow, Result};
use std::fmt;
use std::time::Duration;

use crate::vision::DEFAULT_MAX_IMAGE_SIZE;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_BASE_URL: &str = "https://detect.roboflow.com";
pub const DEFAULT_MODEL_ID: &str = "seed-classification-89b7c/9";
pub const DEFAULT_CONFIDENCE: f32 = 0.3;
pub const DEFAULT_OVERLAP: f32 = 0.3;
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_DIMENSION: u32 = 640;
pub const DEFAULT_UPLOAD_JPEG_QUALITY: u8 = 75;
pub const DEFAULT_ANNOTATED_JPEG_QUALITY: u8 = 95;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: String,
    /// `*` mirrors any request origin
    pub cors_allowed_origins: Vec<String>,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            cors_allowed_origins: vec!["*".to_string()],
            max_upload_bytes: DEFAULT_MAX_IMAGE_SIZE,
        }
    }
}

impl ApiConfig {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|e| anyhow!("invalid listen address '{}': {}", self.listen_addr, e))?;
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("max upload size must be greater than zero"));
        }
        Ok(())
    }
}

/// Settings for the Roboflow hosted detection endpoint
#[derive(Clone)]
pub struct RoboflowConfig {
    /// Without a key the server still starts but detection is unavailable
    pub api_key: Option<String>,
    pub model_id: String,
    pub base_url: String,
    pub confidence: f32,
    pub overlap: f32,
    pub timeout: Duration,
    /// Longest side sent upstream, larger uploads are downscaled
    pub max_dimension: u32,
    pub upload_jpeg_quality: u8,
    pub annotated_jpeg_quality: u8,
}

impl Default for RoboflowConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            confidence: DEFAULT_CONFIDENCE,
            overlap: DEFAULT_OVERLAP,
            timeout: DEFAULT_UPSTREAM_TIMEOUT,
            max_dimension: DEFAULT_MAX_DIMENSION,
            upload_jpeg_quality: DEFAULT_UPLOAD_JPEG_QUALITY,
            annotated_jpeg_quality: DEFAULT_ANNOTATED_JPEG_QUALITY,
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for RoboflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoboflowConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model_id", &self.model_id)
            .field("base_url", &self.base_url)
            .field("confidence", &self.confidence)
            .field("overlap", &self.overlap)
            .field("timeout", &self.timeout)
            .field("max_dimension", &self.max_dimension)
            .field("upload_jpeg_quality", &self.upload_jpeg_quality)
            .field("annotated_jpeg_quality", &self.annotated_jpeg_quality)
            .finish()
    }
}

impl RoboflowConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("invalid base URL '{}': {}", self.base_url, e))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(anyhow!("base URL must be http or https, got '{}'", url.scheme()));
        }

        let model_id = self.model_id.trim_matches('/');
        if model_id.is_empty() {
            return Err(anyhow!("model id must not be empty"));
        }

        for (name, value) in [("confidence", self.confidence), ("overlap", self.overlap)] {
            if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                return Err(anyhow!("{} must be between 0 and 100, got {}", name, value));
            }
        }

        if self.max_dimension == 0 {
            return Err(anyhow!("max dimension must be greater than zero"));
        }

        for (name, quality) in [
            ("upload JPEG quality", self.upload_jpeg_quality),
            ("annotated JPEG quality", self.annotated_jpeg_quality),
        ] {
            if !(1..=100).contains(&quality) {
                return Err(anyhow!("{} must be between 1 and 100, got {}", name, quality));
            }
        }

        Ok(())
    }
}
