//! SVG output encoder.
//!
//! Vector output for charts: every mark, grid line and label becomes an
//! element, so the result scales cleanly for print and web.

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    /// SVG width
    width: u32,
    /// SVG height
    height: u32,
    /// Background color (None for transparent)
    background: Option<Rgba>,
    /// SVG elements
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names are self-documenting and match SVG attribute names.
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Circle
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Open or closed run of straight segments
    Polyline {
        points: Vec<(f32, f32)>,
        fill: Option<Rgba>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        /// On/off lengths in pixels (`stroke-dasharray`).
        dash: Option<Vec<f32>>,
        /// Emit a `<polygon>` rather than a `<polyline>`.
        closed: bool,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        /// Rotation in degrees about `(x, y)`.
        rotate: f32,
        bold: bool,
    },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum TextAnchor {
    /// Align text start at position (left-aligned for LTR)
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position (right-aligned for LTR)
    End,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Canvas size `(width, height)` in pixels.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Append an element; elements paint in insertion order.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements added so far.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096 + self.elements.len() * 96);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            self.width, self.height, self.width, self.height
        );

        if let Some(bg) = self.background {
            let fill = rgba_to_css(&bg);
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{fill}"/>"#);
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        file.write_all(self.render().as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: &Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        let alpha = f32::from(color.a) / 255.0;
        format!("rgba({},{},{},{alpha:.3})", color.r, color.g, color.b)
    }
}

fn paint_attr(name: &str, color: Option<Rgba>) -> String {
    match color {
        Some(c) => format!(r#" {name}="{}""#, rgba_to_css(&c)),
        None => format!(r#" {name}="none""#),
    }
}

fn stroke_attrs(stroke: Option<Rgba>, width: f32, dash: Option<&[f32]>) -> String {
    let mut attrs = paint_attr("stroke", stroke);
    if stroke.is_some() {
        let _ = write!(attrs, r#" stroke-width="{width}""#);
        if let Some(dash) = dash.filter(|d| !d.is_empty()) {
            let list: Vec<String> = dash.iter().map(|d| format!("{d}")).collect();
            let _ = write!(attrs, r#" stroke-dasharray="{}""#, list.join(","));
        }
    }
    attrs
}

/// Stroke attributes, or nothing when the shape has no outline.
fn outline_attrs(stroke: Option<Rgba>, width: f32) -> String {
    if stroke.is_some() {
        stroke_attrs(stroke, width, None)
    } else {
        String::new()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Convert an SVG element to its string representation.
fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
        } => format!(
            r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{}"{}/>"#,
            rgba_to_css(fill), outline_attrs(*stroke, *stroke_width)
        ),
        SvgElement::Circle {
            cx,
            cy,
            r,
            fill,
            stroke,
            stroke_width,
        } => format!(
            r#"<circle cx="{cx}" cy="{cy}" r="{r}"{}{}/>"#,
            paint_attr("fill", *fill), outline_attrs(*stroke, *stroke_width)
        ),
        SvgElement::Polyline {
            points,
            fill,
            stroke,
            stroke_width,
            dash,
            closed,
        } => {
            let points_str: String = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            let tag = if *closed { "polygon" } else { "polyline" };
            format!(
                r#"<{tag} points="{points_str}"{}{} stroke-linejoin="round"/>"#,
                paint_attr("fill", *fill), stroke_attrs(*stroke, *stroke_width, dash.as_deref())
            )
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            rotate,
            bold,
        } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let transform = if rotate.abs() > f32::EPSILON {
                format!(r#" transform="rotate({rotate} {x} {y})""#)
            } else {
                String::new()
            };
            let weight = if *bold { r#" font-weight="bold""# } else { "" };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{anchor_str}" font-family="sans-serif"{weight}{transform}>{}</text>"#,
                rgba_to_css(fill), escape(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(elements: Vec<SvgElement>) -> String {
        let mut enc = SvgEncoder::new(100, 100);
        for element in elements {
            enc.add_element(element);
        }
        enc.render()
    }

    fn line(points: &[(f32, f32)], fill: Option<Rgba>, closed: bool) -> SvgElement {
        SvgElement::Polyline {
            points: points.to_vec(),
            fill,
            stroke: if closed { None } else { Some(Rgba::BLACK) },
            stroke_width: 2.0,
            dash: None,
            closed,
        }
    }

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(800, 600).render();
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
    }

    #[test]
    fn test_svg_rect() {
        let svg = rendered(vec![SvgElement::Rect {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            fill: Rgba::RED,
            stroke: None,
            stroke_width: 1.0,
        }]);
        assert!(svg.contains(
            r#"<rect x="10" y="20" width="30" height="40" fill="rgb(255,0,0)"/>"#
        ));
    }

    #[test]
    fn test_svg_circle() {
        let svg = rendered(vec![SvgElement::Circle {
            cx: 50.0,
            cy: 50.0,
            r: 5.0,
            fill: Some(Rgba::BLUE),
            stroke: None,
            stroke_width: 1.0,
        }]);
        assert!(svg.contains(r#"<circle cx="50" cy="50" r="5" fill="rgb(0,0,255)"/>"#));
    }

    #[test]
    fn test_svg_polyline_and_polygon() {
        let pts = [(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)];
        let svg = rendered(vec![line(&pts, None, false), line(&pts, Some(Rgba::GREEN), true)]);
        assert!(svg.contains("<polyline points=\"0,0 10,10 20,0\" fill=\"none\""));
        assert!(svg.contains(
            "<polygon points=\"0,0 10,10 20,0\" fill=\"rgb(0,255,0)\" stroke=\"none\""
        ));
    }

    #[test]
    fn test_svg_dash_array() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(SvgElement::Polyline {
            points: vec![(0.0, 0.0), (50.0, 0.0)],
            fill: None,
            stroke: Some(Rgba::BLACK),
            stroke_width: 1.0,
            dash: Some(vec![4.0, 4.0]),
            closed: false,
        });
        assert!(enc.render().contains("stroke-dasharray=\"4,4\""));
        assert_eq!(enc.elements().len(), 1);
    }

    #[test]
    fn test_svg_text_rotation_and_escaping() {
        let svg = rendered(vec![SvgElement::Text {
            x: 10.0,
            y: 50.0,
            text: "A & B <\"y\">".into(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Middle,
            rotate: -90.0,
            bold: true,
        }]);
        assert!(svg.contains("transform=\"rotate(-90 10 50)\""));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("A &amp; B &lt;&quot;y&quot;&gt;"));
        assert!(svg.contains("text-anchor=\"middle\""));
    }

    #[test]
    fn test_svg_text_anchor_default() {
        let svg = rendered(vec![SvgElement::Text {
            x: 1.0,
            y: 2.0,
            text: "Hello".into(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::default(),
            rotate: 0.0,
            bold: false,
        }]);
        assert!(svg.contains("text-anchor=\"start\""));
        assert!(svg.contains("font-size=\"12\""));
        assert!(!svg.contains("transform"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_rgba_alpha() {
        let css = rgba_to_css(&Rgba::new(255, 0, 0, 128));
        assert!(css.starts_with("rgba"));
        assert!(css.contains("0.502"));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(line(&[(10.0, 10.0), (90.0, 90.0)], None, false));
        enc.write_to_file(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<svg"));
        assert!(content.contains("<polyline"));
        assert!(content.trim_end().ends_with("</svg>"));
    }
}
