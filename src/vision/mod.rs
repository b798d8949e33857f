// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Local image handling around the hosted detector
//!
//! This module provides:
//! - Upload decoding, downscaling and JPEG re-encoding
//! - Rendering of detection boxes and labels onto the uploaded image
//!
//! No inference happens here; detections come from the remote model.

pub mod annotate;
pub mod font;
pub mod image_utils;

pub use annotate::{annotate, Annotation, AnnotationStyle};
pub use image_utils::{
    decode_image_bytes, detect_format, encode_jpeg, encode_jpeg_base64, resize_if_needed,
    scaled_dimensions, ImageError, ImageInfo, DEFAULT_MAX_IMAGE_SIZE,
};
