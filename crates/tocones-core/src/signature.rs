//! # Signature Capture
//!
//! A signature pad accumulates strokes; a stroke is the ordered list of points
//! of one continuous gesture. `clear` discards every stroke (there is no undo
//! beyond a full clear).
//!
//! Pads are rasterized to PNG for the spreadsheet's signature sheet. Points
//! are in pad coordinates with the origin at the top-left; the drawing is
//! scaled to fit the canvas.

use crate::ToconesError;
use image::{GrayImage, ImageFormat, Luma};
use std::io::Cursor;

/// Rendered signature width in pixels.
pub const SIGNATURE_WIDTH: u32 = 400;

/// Rendered signature height in pixels.
pub const SIGNATURE_HEIGHT: u32 = 200;

const MARGIN: f32 = 10.0;
const INK: Luma<u8> = Luma([0]);
const PAPER: Luma<u8> = Luma([255]);

/// A point on the pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One continuous gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stroke {
    pub points: Vec<Point>,
}

/// The strokes drawn on one pad.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignaturePad {
    strokes: Vec<Stroke>,
}

impl SignaturePad {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new stroke at a point (touch down).
    pub fn begin_stroke(&mut self, point: Point) {
        self.strokes.push(Stroke {
            points: vec![point],
        });
    }

    /// Extend the current stroke (touch move). Starts a stroke if none is open.
    pub fn extend_stroke(&mut self, point: Point) {
        match self.strokes.last_mut() {
            Some(stroke) => stroke.points.push(point),
            None => self.begin_stroke(point),
        }
    }

    /// Discard every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    #[must_use]
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Rasterize the strokes onto a white canvas.
    #[must_use]
    pub fn render(&self) -> GrayImage {
        let mut canvas = GrayImage::from_pixel(SIGNATURE_WIDTH, SIGNATURE_HEIGHT, PAPER);
        let Some(fit) = Fit::from_strokes(&self.strokes) else {
            return canvas;
        };

        for stroke in &self.strokes {
            let mapped: Vec<(i64, i64)> = stroke.points.iter().map(|p| fit.map(*p)).collect();
            match mapped.as_slice() {
                [] => {}
                [only] => stamp(&mut canvas, *only),
                _ => {
                    for pair in mapped.windows(2) {
                        draw_line(&mut canvas, pair[0], pair[1]);
                    }
                }
            }
        }
        canvas
    }

    /// Rasterize and encode as PNG.
    pub fn render_png(&self) -> Result<Vec<u8>, ToconesError> {
        let mut bytes = Vec::new();
        self.render()
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| ToconesError::ExportIoError(format!("Encode signature: {}", e)))?;
        Ok(bytes)
    }
}

/// Who a signature belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Signer {
    Evaluator,
    ChainsawOperator,
}

impl Signer {
    /// Pad title shown on the header form.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self {
            Signer::Evaluator => "Firma Evaluador",
            Signer::ChainsawOperator => "Firma Motosierrista",
        }
    }
}

/// The two signature pads of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signatures {
    pub evaluator: SignaturePad,
    pub chainsaw_operator: SignaturePad,
}

impl Signatures {
    #[must_use]
    pub fn pad(&self, signer: Signer) -> &SignaturePad {
        match signer {
            Signer::Evaluator => &self.evaluator,
            Signer::ChainsawOperator => &self.chainsaw_operator,
        }
    }

    pub fn pad_mut(&mut self, signer: Signer) -> &mut SignaturePad {
        match signer {
            Signer::Evaluator => &mut self.evaluator,
            Signer::ChainsawOperator => &mut self.chainsaw_operator,
        }
    }
}

// =============================================================================
// RASTERIZATION
// =============================================================================

/// Uniform scale + offset mapping pad coordinates into the canvas.
struct Fit {
    min_x: f32,
    min_y: f32,
    scale: f32,
}

impl Fit {
    fn from_strokes(strokes: &[Stroke]) -> Option<Self> {
        let mut points = strokes.iter().flat_map(|s| s.points.iter());
        let first = points.next()?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        let span_x = (max_x - min_x).max(1.0);
        let span_y = (max_y - min_y).max(1.0);
        let usable_w = SIGNATURE_WIDTH as f32 - 2.0 * MARGIN;
        let usable_h = SIGNATURE_HEIGHT as f32 - 2.0 * MARGIN;

        Some(Self {
            min_x,
            min_y,
            scale: (usable_w / span_x).min(usable_h / span_y),
        })
    }

    fn map(&self, p: Point) -> (i64, i64) {
        let x = MARGIN + (p.x - self.min_x) * self.scale;
        let y = MARGIN + (p.y - self.min_y) * self.scale;
        (x.round() as i64, y.round() as i64)
    }
}

/// Paint a 2x2 dot, clipped to the canvas.
fn stamp(canvas: &mut GrayImage, (x, y): (i64, i64)) {
    for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        let (px, py) = (x + dx, y + dy);
        if px >= 0 && py >= 0 && px < i64::from(canvas.width()) && py < i64::from(canvas.height())
        {
            canvas.put_pixel(px as u32, py as u32, INK);
        }
    }
}

/// Bresenham line between two canvas points.
fn draw_line(canvas: &mut GrayImage, from: (i64, i64), to: (i64, i64)) {
    let (mut x, mut y) = from;
    let dx = (to.0 - x).abs();
    let dy = -(to.1 - y).abs();
    let sx = if x < to.0 { 1 } else { -1 };
    let sy = if y < to.1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        stamp(canvas, (x, y));
        if x == to.0 && y == to.1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(image: &GrayImage) -> usize {
        image.pixels().filter(|p| p.0[0] == 0).count()
    }

    #[test]
    fn strokes_accumulate_per_gesture() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(Point::new(0.0, 0.0));
        pad.extend_stroke(Point::new(5.0, 5.0));
        pad.extend_stroke(Point::new(10.0, 0.0));
        pad.begin_stroke(Point::new(20.0, 20.0));

        assert_eq!(pad.strokes().len(), 2);
        assert_eq!(pad.strokes()[0].points.len(), 3);
        assert_eq!(pad.strokes()[1].points.len(), 1);
    }

    #[test]
    fn extend_without_begin_starts_a_stroke() {
        let mut pad = SignaturePad::new();
        pad.extend_stroke(Point::new(1.0, 1.0));
        assert_eq!(pad.strokes().len(), 1);
    }

    #[test]
    fn clear_discards_everything() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(Point::new(0.0, 0.0));
        pad.extend_stroke(Point::new(3.0, 4.0));
        pad.clear();
        assert!(pad.is_empty());
        assert_eq!(ink_count(&pad.render()), 0);
    }

    #[test]
    fn render_draws_ink_inside_canvas() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(Point::new(-50.0, 10.0));
        pad.extend_stroke(Point::new(300.0, 90.0));
        pad.begin_stroke(Point::new(100.0, 50.0));

        let image = pad.render();
        assert_eq!(image.dimensions(), (SIGNATURE_WIDTH, SIGNATURE_HEIGHT));
        assert!(ink_count(&image) > 100);
    }

    #[test]
    fn png_has_signature_header() {
        let mut pad = SignaturePad::new();
        pad.begin_stroke(Point::new(0.0, 0.0));
        pad.extend_stroke(Point::new(10.0, 10.0));

        let png = pad.render_png().expect("encode");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn signatures_route_by_signer() {
        let mut signatures = Signatures::default();
        signatures
            .pad_mut(Signer::ChainsawOperator)
            .begin_stroke(Point::new(1.0, 1.0));
        assert!(signatures.pad(Signer::Evaluator).is_empty());
        assert!(!signatures.pad(Signer::ChainsawOperator).is_empty());
    }
}
