// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seed detection API endpoint module
//!
//! Provides POST /detect for classifying seeds in an uploaded image.

pub mod handler;
pub mod request;

pub use handler::detect_handler;
pub use request::{ImageUpload, UPLOAD_FIELD};
