// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::time::Duration;

use crate::config::{
    ApiConfig, RoboflowConfig, DEFAULT_ANNOTATED_JPEG_QUALITY, DEFAULT_BASE_URL,
    DEFAULT_CONFIDENCE, DEFAULT_LISTEN_ADDR, DEFAULT_MAX_DIMENSION, DEFAULT_MODEL_ID,
    DEFAULT_OVERLAP, DEFAULT_UPLOAD_JPEG_QUALITY,
};
use crate::vision::DEFAULT_MAX_IMAGE_SIZE;

/// Seed classification gateway
#[derive(Parser, Debug)]
#[command(name = "seed-gateway")]
#[command(version)]
#[command(about = "Relays seed images to a hosted detection model", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long, env = "LISTEN_ADDR", default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    /// Allowed CORS origins, comma separated (`*` for any)
    #[arg(long, env = "CORS_ALLOWED_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,

    /// Maximum accepted upload size in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// Roboflow API key
    #[arg(long, env = "ROBOFLOW_API_KEY", hide_env_values = true)]
    pub roboflow_api_key: Option<String>,

    /// Roboflow model id (project/version)
    #[arg(long, env = "ROBOFLOW_MODEL_ID", default_value = DEFAULT_MODEL_ID)]
    pub roboflow_model_id: String,

    /// Roboflow detect API base URL
    #[arg(long, env = "ROBOFLOW_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub roboflow_base_url: String,

    /// Minimum confidence passed to the hosted model
    #[arg(long, env = "ROBOFLOW_CONFIDENCE", default_value_t = DEFAULT_CONFIDENCE)]
    pub confidence: f32,

    /// Box overlap threshold passed to the hosted model
    #[arg(long, env = "ROBOFLOW_OVERLAP", default_value_t = DEFAULT_OVERLAP)]
    pub overlap: f32,

    /// Upstream request timeout in seconds
    #[arg(long, env = "ROBOFLOW_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Longest image side sent upstream
    #[arg(long, env = "MAX_IMAGE_DIMENSION", default_value_t = DEFAULT_MAX_DIMENSION)]
    pub max_dimension: u32,

    /// JPEG quality of the image sent upstream
    #[arg(long, env = "UPLOAD_JPEG_QUALITY", default_value_t = DEFAULT_UPLOAD_JPEG_QUALITY)]
    pub upload_jpeg_quality: u8,

    /// JPEG quality of the annotated image returned to clients
    #[arg(long, env = "ANNOTATED_JPEG_QUALITY", default_value_t = DEFAULT_ANNOTATED_JPEG_QUALITY)]
    pub annotated_jpeg_quality: u8,
}

impl Cli {
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            listen_addr: self.listen_addr.clone(),
            cors_allowed_origins: self
                .cors_origins
                .iter()
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            max_upload_bytes: self.max_upload_bytes,
        }
    }

    pub fn roboflow_config(&self) -> RoboflowConfig {
        RoboflowConfig {
            api_key: self.roboflow_api_key.clone(),
            model_id: self.roboflow_model_id.clone(),
            base_url: self.roboflow_base_url.clone(),
            confidence: self.confidence,
            overlap: self.overlap,
            timeout: Duration::from_secs(self.timeout_secs),
            max_dimension: self.max_dimension,
            upload_jpeg_quality: self.upload_jpeg_quality,
            annotated_jpeg_quality: self.annotated_jpeg_quality,
        }
    }
}
