// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use seed_gateway::detection::{DetectionBackend, DetectionError, InferenceResponse, Prediction};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const BOUNDARY: &str = "seedgatewayboundary";

/// Encode a solid-colour PNG of the given size
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([190, 160, 70])));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

/// Build a multipart/form-data body with a single file field
pub fn multipart_body(field: &str, content_type: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"seeds.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    if let Some(ct) = content_type {
        body.extend_from_slice(format!("Content-Type: {}\r\n", ct).as_bytes());
    }
    body.extend_from_slice(b"\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Build a body with a plain text field ahead of the file field
pub fn multipart_body_with_leading_field(
    leading_name: &str,
    leading_value: &[u8],
    content_type: &str,
    data: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", leading_name)
            .as_bytes(),
    );
    body.extend_from_slice(leading_value);
    body.extend_from_slice(b"\r\n");

    // multipart_body opens with its own boundary line
    body.extend_from_slice(&multipart_body("file", Some(content_type), data));
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

pub fn prediction(class: &str, confidence: f64, x: f64, y: f64) -> Prediction {
    Prediction {
        x,
        y,
        width: 12.0,
        height: 10.0,
        confidence,
        class_name: class.to_string(),
        class_id: None,
        detection_id: Some(format!("det-{}", class)),
    }
}

/// Backend that always answers with the same response
pub struct StaticBackend {
    pub response: InferenceResponse,
    pub calls: AtomicUsize,
}

impl StaticBackend {
    pub fn new(predictions: Vec<Prediction>) -> Self {
        Self {
            response: InferenceResponse {
                predictions,
                image: serde_json::json!({"width": 64, "height": 48}),
                time: 0.12,
                inference_id: None,
            },
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DetectionBackend for StaticBackend {
    async fn infer(&self, _image_base64: String) -> Result<InferenceResponse, DetectionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }
}

/// Backend that always fails the way the hosted API does on a bad key
pub struct RejectingBackend;

#[async_trait]
impl DetectionBackend for RejectingBackend {
    async fn infer(&self, _image_base64: String) -> Result<InferenceResponse, DetectionError> {
        Err(DetectionError::Upstream {
            status: 403,
            body: "{\"message\":\"Forbidden\"}".to_string(),
        })
    }
}
