// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Hosted inference wire types and the relayed detection report

use serde::{Deserialize, Serialize};

use super::labels::CategorySummary;

pub const DETECTIONS_FOUND_MESSAGE: &str = "Detections found.";
pub const NO_DETECTIONS_MESSAGE: &str = "No seeds detected. Try again with a clearer image.";

// --- Upstream (Roboflow hosted API) ---

/// One box returned by the hosted model, centre-based
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub confidence: f64,
    #[serde(rename = "class")]
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection_id: Option<String>,
}

/// Body of a successful hosted inference call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
    /// Image metadata as reported upstream, relayed verbatim
    #[serde(default = "empty_object")]
    pub image: serde_json::Value,
    /// Upstream processing time in seconds
    #[serde(default)]
    pub time: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inference_id: Option<String>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

// --- Relayed to clients ---

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// A single seed detection as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_name: String,
    /// Confidence rounded to 4 decimal places
    pub confidence: f64,
    pub position: Position,
    pub size: Size,
    pub detection_id: Option<String>,
}

impl From<&Prediction> for Detection {
    fn from(pred: &Prediction) -> Self {
        Self {
            class_name: pred.class_name.clone(),
            confidence: round_confidence(pred.confidence),
            position: Position {
                x: pred.x,
                y: pred.y,
            },
            size: Size {
                width: pred.width,
                height: pred.height,
            },
            detection_id: pred.detection_id.clone(),
        }
    }
}

/// Response body for POST /detect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub success: bool,
    pub message: String,
    pub detection_count: usize,
    pub predictions: Vec<Detection>,
    pub summary: CategorySummary,
    pub image_info: serde_json::Value,
    /// Base64 JPEG with boxes drawn, absent when nothing was detected
    pub annotated_image: Option<String>,
    /// Upstream processing time in seconds
    pub processing_time: f64,
}

impl DetectionReport {
    /// Build a report from predictions already sorted by confidence
    pub fn new(
        predictions: &[Prediction],
        image_info: serde_json::Value,
        annotated_image: Option<String>,
        processing_time: f64,
    ) -> Self {
        let message = if predictions.is_empty() {
            NO_DETECTIONS_MESSAGE
        } else {
            DETECTIONS_FOUND_MESSAGE
        };

        Self {
            success: true,
            message: message.to_string(),
            detection_count: predictions.len(),
            predictions: predictions.iter().map(Detection::from).collect(),
            summary: CategorySummary::from_labels(predictions.iter().map(|p| p.class_name.as_str())),
            image_info,
            annotated_image,
            processing_time,
        }
    }
}

/// Round to 4 decimal places
pub fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}

/// Sort predictions by confidence, highest first
pub fn sort_by_confidence(predictions: &mut [Prediction]) {
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
}
