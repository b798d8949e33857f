// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Draw detection boxes and labels onto an image

use image::{DynamicImage, Rgb, RgbImage};

use super::font::{self, GLYPH_HEIGHT, GLYPH_SPACING, GLYPH_WIDTH};

/// One box to draw, in centre-based pixel coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub center_x: f64,
    pub center_y: f64,
    pub width: f64,
    pub height: f64,
    pub label: String,
}

impl Annotation {
    /// Edges as (left, top, right, bottom), rounded to whole pixels
    pub fn edges(&self) -> (i64, i64, i64, i64) {
        let left = self.center_x - self.width / 2.0;
        let top = self.center_y - self.height / 2.0;
        let right = self.center_x + self.width / 2.0;
        let bottom = self.center_y + self.height / 2.0;
        (
            left.round() as i64,
            top.round() as i64,
            right.round() as i64,
            bottom.round() as i64,
        )
    }
}

/// Colours and sizes used when rendering annotations
#[derive(Debug, Clone)]
pub struct AnnotationStyle {
    pub box_color: Rgb<u8>,
    pub text_color: Rgb<u8>,
    /// Outline thickness in pixels
    pub line_width: u32,
    /// Integer scale applied to the 5x7 glyphs
    pub font_scale: u32,
    /// Space between label text and the edge of its bar
    pub padding: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            box_color: Rgb([0, 128, 0]),
            text_color: Rgb([255, 255, 255]),
            line_width: 3,
            font_scale: 2,
            padding: 5,
        }
    }
}

/// Render all annotations onto an RGB copy of `image`
pub fn annotate(image: &DynamicImage, annotations: &[Annotation], style: &AnnotationStyle) -> RgbImage {
    let mut canvas = image.to_rgb8();
    for annotation in annotations {
        draw_annotation(&mut canvas, annotation, style);
    }
    canvas
}

fn draw_annotation(canvas: &mut RgbImage, annotation: &Annotation, style: &AnnotationStyle) {
    let (left, top, right, bottom) = annotation.edges();

    for inset in 0..style.line_width as i64 {
        let (l, t, r, b) = (left + inset, top + inset, right - inset, bottom - inset);
        if l > r || t > b {
            break;
        }
        fill_rect(canvas, l, t, r, t, style.box_color);
        fill_rect(canvas, l, b, r, b, style.box_color);
        fill_rect(canvas, l, t, l, b, style.box_color);
        fill_rect(canvas, r, t, r, b, style.box_color);
    }

    // Label bar sits on top of the box, text inset by `padding`
    let (text_width, text_height) = font::text_size(&annotation.label, style.font_scale);
    let pad = style.padding as i64;
    let bar_top = top - text_height as i64 - 2 * pad;
    let bar_right = left + text_width as i64 + 2 * pad;
    fill_rect(canvas, left, bar_top, bar_right, top, style.box_color);
    draw_text(
        canvas,
        &annotation.label,
        left + pad,
        top - text_height as i64 - pad,
        style.font_scale,
        style.text_color,
    );
}

/// Draw `text` with its top-left corner at (`x`, `y`)
pub fn draw_text(canvas: &mut RgbImage, text: &str, x: i64, y: i64, scale: u32, color: Rgb<u8>) {
    let scale = scale.max(1) as i64;
    let advance = (GLYPH_WIDTH + GLYPH_SPACING) as i64 * scale;

    for (index, c) in text.chars().enumerate() {
        let origin_x = x + index as i64 * advance;
        for col in 0..GLYPH_WIDTH {
            for row in 0..GLYPH_HEIGHT {
                if !font::is_set(c, col, row) {
                    continue;
                }
                let px = origin_x + col as i64 * scale;
                let py = y + row as i64 * scale;
                fill_rect(canvas, px, py, px + scale - 1, py + scale - 1, color);
            }
        }
    }
}

/// Fill the inclusive rectangle, clipped to the canvas
pub fn fill_rect(canvas: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    if width == 0 || height == 0 {
        return;
    }

    let (x0, x1) = (x0.min(x1).max(0), x0.max(x1).min(width - 1));
    let (y0, y1) = (y0.min(y1).max(0), y0.max(y1).min(height - 1));
    if x0 > x1 || y0 > y1 {
        return;
    }

    for y in y0..=y1 {
        for x in x0..=x1 {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    }
}
