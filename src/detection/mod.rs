// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seed detection via the Roboflow-hosted model

pub mod client;
pub mod error;
pub mod labels;
pub mod service;
pub mod types;

pub use client::{DetectionBackend, RoboflowClient};
pub use error::DetectionError;
pub use labels::{CategorySummary, SeedCategory};
pub use service::{DetectionOptions, SeedDetectionService};
pub use types::{Detection, DetectionReport, InferenceResponse, Prediction};
