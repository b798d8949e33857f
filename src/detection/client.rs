// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Roboflow hosted-inference client

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use tracing::{debug, info, warn};

use super::error::DetectionError;
use super::types::InferenceResponse;
use crate::config::RoboflowConfig;

/// Longest upstream error body relayed back to callers
const MAX_ERROR_BODY: usize = 512;

/// Something that can run the seed model on a base64-encoded JPEG
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectionBackend: Send + Sync {
    async fn infer(&self, image_base64: String) -> Result<InferenceResponse, DetectionError>;
}

/// Client for the Roboflow `detect` API
pub struct RoboflowClient {
    client: Client,
    endpoint: String,
    api_key: String,
    confidence: String,
    overlap: String,
}

impl RoboflowClient {
    /// Create a client from config; fails when no API key is set
    pub fn new(config: &RoboflowConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| anyhow!("ROBOFLOW_API_KEY is not set"))?
            .to_string();

        let client = Client::builder().timeout(config.timeout).build()?;

        let endpoint = format!(
            "{}/{}",
            config.base_url.trim_end_matches('/'),
            config.model_id.trim_matches('/')
        );
        info!("Roboflow client configured: endpoint={}", endpoint);

        Ok(Self {
            client,
            endpoint,
            api_key,
            confidence: config.confidence.to_string(),
            overlap: config.overlap.to_string(),
        })
    }

    /// Full model endpoint URL (without query parameters)
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DetectionBackend for RoboflowClient {
    async fn infer(&self, image_base64: String) -> Result<InferenceResponse, DetectionError> {
        let start = std::time::Instant::now();
        debug!(
            "Roboflow detect POST {} ({} base64 bytes)",
            self.endpoint,
            image_base64.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("confidence", self.confidence.as_str()),
                ("overlap", self.overlap.as_str()),
                ("format", "json"),
            ])
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(image_base64)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let mut body = response.text().await.unwrap_or_default();
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY)
                    .rev()
                    .find(|&i| body.is_char_boundary(i))
                    .unwrap_or(0);
                body.truncate(cut);
            }
            warn!("Roboflow returned {}: {}", status, body);
            return Err(DetectionError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: InferenceResponse = serde_json::from_slice(&bytes)
            .map_err(|e| DetectionError::InvalidResponse(e.to_string()))?;

        info!(
            "Roboflow detect complete: {} predictions, {}ms",
            parsed.predictions.len(),
            start.elapsed().as_millis()
        );
        Ok(parsed)
    }
}
