//! Drawing surfaces.
//!
//! The chart painter speaks to a [`Canvas`] in pixel coordinates (origin top
//! left). [`RasterCanvas`] rasterises into a [`Framebuffer`]; [`SvgCanvas`]
//! records vector elements.

use super::primitives;
use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::output::{SvgElement, SvgEncoder, TextAnchor};

/// Line style.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Line colour.
    pub colour: Rgba,
    /// Width in pixels.
    pub width: f32,
    /// On/off dash lengths in pixels; `None` draws a solid line.
    pub dash: Option<Vec<f32>>,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub fn solid(colour: Rgba, width: f32) -> Self {
        Self {
            colour,
            width,
            dash: None,
        }
    }

    /// Dashed stroke.
    #[must_use]
    pub fn dashed(mut self, pattern: Option<Vec<f32>>) -> Self {
        self.dash = pattern;
        self
    }
}

/// Text style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in pixels.
    pub size: f32,
    /// Text colour.
    pub colour: Rgba,
    /// Horizontal alignment.
    pub anchor: TextAnchor,
    /// Rotation in degrees about the anchor point.
    pub rotate: f32,
    /// Bold face.
    pub bold: bool,
}

impl TextStyle {
    /// Upright, start-anchored, regular text.
    #[must_use]
    pub fn new(size: f32, colour: Rgba) -> Self {
        Self {
            size,
            colour,
            anchor: TextAnchor::Start,
            rotate: 0.0,
            bold: false,
        }
    }

    /// Set the anchor.
    #[must_use]
    pub fn anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Set the rotation.
    #[must_use]
    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }

    /// Use a bold face.
    #[must_use]
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// A drawing surface.
pub trait Canvas {
    /// Surface size in pixels.
    fn size(&self) -> (f32, f32);

    /// Paint the whole surface.
    fn clear(&mut self, colour: Rgba);

    /// Axis-aligned rectangle with top-left corner `(x, y)`.
    fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<&Stroke>,
    );

    /// Closed polygon.
    fn polygon(&mut self, points: &[(f32, f32)], fill: Option<Rgba>, stroke: Option<&Stroke>);

    /// Open polyline.
    fn polyline(&mut self, points: &[(f32, f32)], stroke: &Stroke);

    /// Circle of radius `r`.
    fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Option<Rgba>, stroke: Option<&Stroke>);

    /// Text whose baseline sits at `y`.
    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle);
}

// ============================================================================
// Raster
// ============================================================================

/// Canvas backed by a framebuffer.
///
/// The rasteriser carries no font, so text is not drawn.
#[derive(Debug)]
pub struct RasterCanvas {
    fb: Framebuffer,
}

impl RasterCanvas {
    /// Wrap a framebuffer.
    #[must_use]
    pub fn new(fb: Framebuffer) -> Self {
        Self { fb }
    }

    /// The rasterised image.
    #[must_use]
    pub fn into_framebuffer(self) -> Framebuffer {
        self.fb
    }

    fn stroke_path(&mut self, points: &[(f32, f32)], stroke: &Stroke) {
        if stroke.colour.a == 0 || stroke.width <= 0.0 {
            return;
        }
        match &stroke.dash {
            Some(pattern) => {
                for run in primitives::dash_runs(points, pattern) {
                    primitives::stroke_polyline(&mut self.fb, &run, stroke.width, stroke.colour);
                }
            }
            None => primitives::stroke_polyline(&mut self.fb, points, stroke.width, stroke.colour),
        }
    }
}

impl Canvas for RasterCanvas {
    fn size(&self) -> (f32, f32) {
        (self.fb.width() as f32, self.fb.height() as f32)
    }

    fn clear(&mut self, colour: Rgba) {
        self.fb.clear(colour);
    }

    fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<&Stroke>,
    ) {
        if let Some(fill) = fill.filter(|c| c.a > 0) {
            primitives::fill_rect_f(&mut self.fb, x, y, x + width, y + height, fill);
        }
        if let Some(stroke) = stroke {
            let corners = [
                (x, y),
                (x + width, y),
                (x + width, y + height),
                (x, y + height),
                (x, y),
            ];
            self.stroke_path(&corners, stroke);
        }
    }

    fn polygon(&mut self, points: &[(f32, f32)], fill: Option<Rgba>, stroke: Option<&Stroke>) {
        if let Some(fill) = fill.filter(|c| c.a > 0) {
            primitives::fill_polygon(&mut self.fb, points, fill);
        }
        if let (Some(stroke), Some(&first)) = (stroke, points.first()) {
            let mut closed = points.to_vec();
            closed.push(first);
            self.stroke_path(&closed, stroke);
        }
    }

    fn polyline(&mut self, points: &[(f32, f32)], stroke: &Stroke) {
        self.stroke_path(points, stroke);
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Option<Rgba>, stroke: Option<&Stroke>) {
        let (x, y, radius) = (cx.round() as i32, cy.round() as i32, r.round() as i32);
        if let Some(fill) = fill.filter(|c| c.a > 0) {
            primitives::draw_circle(&mut self.fb, x, y, radius, fill);
        }
        if let Some(stroke) = stroke.filter(|s| s.colour.a > 0) {
            if stroke.width > 1.5 {
                let ring: Vec<(f32, f32)> = (0..=48)
                    .map(|i| {
                        let a = i as f32 / 48.0 * std::f32::consts::TAU;
                        (cx + r * a.cos(), cy + r * a.sin())
                    })
                    .collect();
                primitives::stroke_polyline(&mut self.fb, &ring, stroke.width, stroke.colour);
            } else {
                primitives::draw_circle_outline(&mut self.fb, x, y, radius, stroke.colour);
            }
        }
    }

    fn text(&mut self, _x: f32, _y: f32, _text: &str, _style: &TextStyle) {}
}

// ============================================================================
// SVG
// ============================================================================

/// Canvas that records SVG elements.
#[derive(Debug)]
pub struct SvgCanvas {
    encoder: SvgEncoder,
}

impl SvgCanvas {
    /// Wrap an encoder.
    #[must_use]
    pub fn new(encoder: SvgEncoder) -> Self {
        Self { encoder }
    }

    /// The recorded document.
    #[must_use]
    pub fn into_encoder(self) -> SvgEncoder {
        self.encoder
    }
}

fn stroke_parts(stroke: Option<&Stroke>) -> (Option<Rgba>, f32, Option<Vec<f32>>) {
    match stroke {
        Some(s) => (Some(s.colour), s.width, s.dash.clone()),
        None => (None, 0.0, None),
    }
}

impl Canvas for SvgCanvas {
    fn size(&self) -> (f32, f32) {
        let (w, h) = self.encoder.dimensions();
        (w as f32, h as f32)
    }

    fn clear(&mut self, colour: Rgba) {
        let encoder = std::mem::take(&mut self.encoder);
        self.encoder = encoder.background(Some(colour));
    }

    fn rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Option<Rgba>,
        stroke: Option<&Stroke>,
    ) {
        let (stroke, stroke_width, _) = stroke_parts(stroke);
        self.encoder.add_element(SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill: fill.unwrap_or(Rgba::TRANSPARENT),
            stroke,
            stroke_width,
        });
    }

    fn polygon(&mut self, points: &[(f32, f32)], fill: Option<Rgba>, stroke: Option<&Stroke>) {
        let (stroke, stroke_width, dash) = stroke_parts(stroke);
        self.encoder.add_element(SvgElement::Polyline {
            points: points.to_vec(),
            fill,
            stroke,
            stroke_width,
            dash,
            closed: true,
        });
    }

    fn polyline(&mut self, points: &[(f32, f32)], stroke: &Stroke) {
        self.encoder.add_element(SvgElement::Polyline {
            points: points.to_vec(),
            fill: None,
            stroke: Some(stroke.colour),
            stroke_width: stroke.width,
            dash: stroke.dash.clone(),
            closed: false,
        });
    }

    fn circle(&mut self, cx: f32, cy: f32, r: f32, fill: Option<Rgba>, stroke: Option<&Stroke>) {
        let (stroke, stroke_width, _) = stroke_parts(stroke);
        self.encoder.add_element(SvgElement::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        });
    }

    fn text(&mut self, x: f32, y: f32, text: &str, style: &TextStyle) {
        self.encoder.add_element(SvgElement::Text {
            x,
            y,
            text: text.to_string(),
            font_size: style.size,
            fill: style.colour,
            anchor: style.anchor,
            rotate: style.rotate,
            bold: style.bold,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_rect_fill_and_outline() {
        let fb = Framebuffer::new(50, 50).unwrap();
        let mut canvas = RasterCanvas::new(fb);
        canvas.clear(Rgba::WHITE);
        let outline = Stroke::solid(Rgba::BLACK, 1.0);
        canvas.rect(10.0, 10.0, 20.0, 20.0, Some(Rgba::RED), Some(&outline));
        let fb = canvas.into_framebuffer();
        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(45, 45), Some(Rgba::WHITE));
    }

    #[test]
    fn test_raster_dashed_line_has_gaps() {
        let mut canvas = RasterCanvas::new(Framebuffer::new(40, 10).unwrap());
        canvas.clear(Rgba::WHITE);
        let stroke = Stroke::solid(Rgba::BLACK, 3.0).dashed(Some(vec![8.0, 8.0]));
        canvas.polyline(&[(0.0, 5.0), (40.0, 5.0)], &stroke);
        let fb = canvas.into_framebuffer();
        assert_eq!(fb.get_pixel(4, 5), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(12, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_raster_text_is_silent() {
        let mut canvas = RasterCanvas::new(Framebuffer::new(20, 20).unwrap());
        canvas.clear(Rgba::WHITE);
        canvas.text(2.0, 10.0, "hello", &TextStyle::new(10.0, Rgba::BLACK));
        assert_eq!(canvas.into_framebuffer().count_color(Rgba::WHITE), 400);
    }

    #[test]
    fn test_svg_canvas_records_elements() {
        let mut canvas = SvgCanvas::new(SvgEncoder::new(100, 80));
        assert_eq!(canvas.size(), (100.0, 80.0));
        canvas.clear(Rgba::BLACK);
        let triangle = [(0.0, 0.0), (10.0, 0.0), (5.0, 5.0)];
        canvas.polygon(&triangle, Some(Rgba::RED), None);
        let style = TextStyle::new(12.0, Rgba::WHITE)
            .anchor(TextAnchor::Middle)
            .bold();
        canvas.text(5.0, 5.0, "a<b", &style);
        let encoder = canvas.into_encoder();
        assert_eq!(encoder.elements().len(), 2);
        let svg = encoder.render();
        assert!(svg.contains("a&lt;b"));
        assert!(svg.contains("font-weight=\"bold\""));
    }
}
