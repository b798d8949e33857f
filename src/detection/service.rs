// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Upload -> hosted model -> annotated report

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use image::DynamicImage;
use std::sync::Arc;
use tracing::{debug, info};

use super::client::DetectionBackend;
use super::error::DetectionError;
use super::types::{sort_by_confidence, DetectionReport, Prediction};
use crate::config::RoboflowConfig;
use crate::vision::{
    annotate, decode_image_bytes, encode_jpeg, encode_jpeg_base64, resize_if_needed, Annotation,
    AnnotationStyle,
};

/// Image handling knobs applied around the hosted call
#[derive(Debug, Clone)]
pub struct DetectionOptions {
    pub max_upload_bytes: usize,
    pub max_dimension: u32,
    pub upload_jpeg_quality: u8,
    pub annotated_jpeg_quality: u8,
    pub style: AnnotationStyle,
}

impl DetectionOptions {
    pub fn from_config(config: &RoboflowConfig, max_upload_bytes: usize) -> Self {
        Self {
            max_upload_bytes,
            max_dimension: config.max_dimension,
            upload_jpeg_quality: config.upload_jpeg_quality,
            annotated_jpeg_quality: config.annotated_jpeg_quality,
            style: AnnotationStyle::default(),
        }
    }
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self::from_config(&RoboflowConfig::default(), crate::vision::DEFAULT_MAX_IMAGE_SIZE)
    }
}

/// Image ready to send upstream
pub struct PreparedUpload {
    /// Decoded and possibly downscaled image, reused for annotation
    pub image: DynamicImage,
    /// Base64 JPEG body for the hosted API
    pub payload: String,
}

/// Runs seed detection for one uploaded image
pub struct SeedDetectionService {
    backend: Arc<dyn DetectionBackend>,
    options: DetectionOptions,
}

impl SeedDetectionService {
    pub fn new(backend: Arc<dyn DetectionBackend>, options: DetectionOptions) -> Self {
        Self { backend, options }
    }

    pub fn options(&self) -> &DetectionOptions {
        &self.options
    }

    /// Detect seeds in raw upload bytes
    pub async fn detect(&self, upload: Bytes) -> Result<DetectionReport, DetectionError> {
        let options = self.options.clone();
        let prepared =
            tokio::task::spawn_blocking(move || prepare_upload(&upload, &options)).await??;

        let mut response = self.backend.infer(prepared.payload).await?;
        sort_by_confidence(&mut response.predictions);

        let annotated_image = if response.predictions.is_empty() {
            None
        } else {
            let predictions = response.predictions.clone();
            let options = self.options.clone();
            let image = prepared.image;
            let encoded = tokio::task::spawn_blocking(move || {
                render_annotated(&image, &predictions, &options)
            })
            .await??;
            Some(encoded)
        };

        info!(
            "Seed detection complete: {} detections, upstream time {:.3}s",
            response.predictions.len(),
            response.time
        );

        Ok(DetectionReport::new(
            &response.predictions,
            response.image,
            annotated_image,
            response.time,
        ))
    }
}

/// Decode, bound the size and re-encode an upload as base64 JPEG
pub fn prepare_upload(
    bytes: &[u8],
    options: &DetectionOptions,
) -> Result<PreparedUpload, DetectionError> {
    let (image, info) = decode_image_bytes(bytes, options.max_upload_bytes)?;
    let image = resize_if_needed(image, options.max_dimension);
    debug!(
        "Prepared upload: {}x{} {:?} ({} bytes) -> {}x{}",
        info.width,
        info.height,
        info.format,
        info.size_bytes,
        image.width(),
        image.height()
    );

    let jpeg = encode_jpeg(&image, options.upload_jpeg_quality)?;
    Ok(PreparedUpload {
        image,
        payload: STANDARD.encode(jpeg),
    })
}

/// Label drawn above each box, e.g. `Good_Maize: 0.93`
pub fn label_for(prediction: &Prediction) -> String {
    format!("{}: {:.2}", prediction.class_name, prediction.confidence)
}

/// Draw every prediction and return the result as base64 JPEG
pub fn render_annotated(
    image: &DynamicImage,
    predictions: &[Prediction],
    options: &DetectionOptions,
) -> Result<String, DetectionError> {
    let annotations: Vec<Annotation> = predictions
        .iter()
        .map(|p| Annotation {
            center_x: p.x,
            center_y: p.y,
            width: p.width,
            height: p.height,
            label: label_for(p),
        })
        .collect();

    let canvas = annotate(image, &annotations, &options.style);
    Ok(encode_jpeg_base64(
        &DynamicImage::ImageRgb8(canvas),
        options.annotated_jpeg_quality,
    )?)
}
