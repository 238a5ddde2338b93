//! The encoded chart.
//!
//! A [`Chart`] is what a render call produces: panels of marks in data
//! space, the position scales of each panel, legends, resolved titles and
//! the theme. It is plain data; turning it into pixels or SVG is the job of
//! the [`crate::render`] backend.

use std::path::Path;

use super::aes::Channel;
use super::coord::Coord;
use super::format::AxisFormat;
use super::geom::{GeomKind, Linetype, PointShape};
use super::options::{Labels, LegendPosition};
use super::position::Position;
use super::stat::Stat;
use super::theme::Theme;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::{Framebuffer, MAX_DIMENSION};
use crate::output::{PngEncoder, SvgEncoder};
use crate::render;

// ============================================================================
// Scales
// ============================================================================

/// Position scale of one panel axis.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionScale {
    /// Numeric range, already expanded.
    Continuous {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Ordered categories; level `i` sits at position `i + 1`.
    Discrete {
        /// Level labels in axis order.
        levels: Vec<String>,
    },
}

impl PositionScale {
    /// Data range covered by the axis.
    #[must_use]
    pub fn range(&self) -> (f32, f32) {
        match self {
            PositionScale::Continuous { min, max } => (*min, *max),
            PositionScale::Discrete { levels } => crate::scale::expand_discrete(levels.len()),
        }
    }

    /// Level labels, empty for continuous scales.
    #[must_use]
    pub fn levels(&self) -> &[String] {
        match self {
            PositionScale::Continuous { .. } => &[],
            PositionScale::Discrete { levels } => levels,
        }
    }

    /// Whether the scale is discrete.
    #[must_use]
    pub fn is_discrete(&self) -> bool {
        matches!(self, PositionScale::Discrete { .. })
    }
}

// ============================================================================
// Marks
// ============================================================================

/// One encoded mark in data coordinates. Colours are final (alpha applied).
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// A point symbol; `size` is the diameter in pixels.
    Point {
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
        /// Stroke colour.
        colour: Rgba,
        /// Fill colour (used by filled shapes).
        fill: Rgba,
        /// Diameter in pixels.
        size: f32,
        /// Symbol.
        shape: PointShape,
    },
    /// A connected line through data points.
    Path {
        /// Vertices in drawing order.
        points: Vec<(f32, f32)>,
        /// Stroke colour.
        colour: Rgba,
        /// Stroke width in pixels.
        width: f32,
        /// Dash pattern.
        linetype: Linetype,
    },
    /// An axis-aligned rectangle (bars, histogram bins, pie slices).
    Rect {
        /// Left edge.
        xmin: f32,
        /// Right edge.
        xmax: f32,
        /// Bottom edge.
        ymin: f32,
        /// Top edge.
        ymax: f32,
        /// Fill colour.
        fill: Rgba,
        /// Outline colour.
        colour: Option<Rgba>,
    },
    /// A closed filled area (densities, violins).
    Polygon {
        /// Vertices; the last connects back to the first.
        points: Vec<(f32, f32)>,
        /// Fill colour.
        fill: Rgba,
        /// Outline colour.
        colour: Option<Rgba>,
    },
    /// A box and whiskers.
    Box {
        /// Centre of the box.
        x: f32,
        /// Box width in data units.
        width: f32,
        /// Lower whisker end.
        lower: f32,
        /// First quartile.
        q1: f32,
        /// Median.
        median: f32,
        /// Third quartile.
        q3: f32,
        /// Upper whisker end.
        upper: f32,
        /// Points beyond the whiskers.
        outliers: Vec<f32>,
        /// Box fill.
        fill: Rgba,
        /// Outline, whisker and median colour.
        colour: Rgba,
    },
    /// A point with a vertical interval.
    Range {
        /// X position.
        x: f32,
        /// Central value.
        y: f32,
        /// Interval bottom.
        ymin: f32,
        /// Interval top.
        ymax: f32,
        /// Colour.
        colour: Rgba,
        /// Point diameter in pixels.
        size: f32,
    },
    /// A straight segment.
    Segment {
        /// Start x.
        x: f32,
        /// Start y.
        y: f32,
        /// End x.
        xend: f32,
        /// End y.
        yend: f32,
        /// Stroke colour.
        colour: Rgba,
        /// Stroke width in pixels.
        width: f32,
        /// Dash pattern.
        linetype: Linetype,
    },
    /// A text label anchored at its centre.
    Text {
        /// X position.
        x: f32,
        /// Y position.
        y: f32,
        /// Label text.
        label: String,
        /// Text colour.
        colour: Rgba,
        /// Font size in pixels.
        size: f32,
    },
}

impl Mark {
    /// Bounding box `(xmin, xmax, ymin, ymax)` in data units.
    #[must_use]
    pub fn extent(&self) -> Option<(f32, f32, f32, f32)> {
        let (xs, ys): (Vec<f32>, Vec<f32>) = match self {
            Mark::Point { x, y, .. } | Mark::Text { x, y, .. } => (vec![*x], vec![*y]),
            Mark::Path { points, .. } | Mark::Polygon { points, .. } => {
                points.iter().copied().unzip()
            }
            Mark::Rect {
                xmin,
                xmax,
                ymin,
                ymax,
                ..
            } => (vec![*xmin, *xmax], vec![*ymin, *ymax]),
            Mark::Box {
                x,
                width,
                lower,
                upper,
                outliers,
                ..
            } => {
                let mut ys = vec![*lower, *upper];
                ys.extend_from_slice(outliers);
                (vec![x - width / 2.0, x + width / 2.0], ys)
            }
            Mark::Range {
                x,
                y,
                ymin,
                ymax,
                ..
            } => (vec![*x], vec![*y, *ymin, *ymax]),
            Mark::Segment {
                x,
                y,
                xend,
                yend,
                ..
            } => (vec![*x, *xend], vec![*y, *yend]),
        };
        let (x0, x1) = crate::estimate::extent(&xs)?;
        let (y0, y1) = crate::estimate::extent(&ys)?;
        Some((x0, x1, y0, y1))
    }

    /// Short name of the mark type.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Mark::Point { .. } => "point",
            Mark::Path { .. } => "path",
            Mark::Rect { .. } => "rect",
            Mark::Polygon { .. } => "polygon",
            Mark::Box { .. } => "box",
            Mark::Range { .. } => "range",
            Mark::Segment { .. } => "segment",
            Mark::Text { .. } => "text",
        }
    }
}

// ============================================================================
// Panels and legends
// ============================================================================

/// One facet cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Layout row (0-based).
    pub row: usize,
    /// Layout column (0-based).
    pub col: usize,
    /// Strip labels; empty when not faceted.
    pub strip: Vec<String>,
    /// Encoded marks in drawing order.
    pub marks: Vec<Mark>,
    /// Horizontal scale.
    pub x: PositionScale,
    /// Vertical scale.
    pub y: PositionScale,
}

/// One key of a discrete legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// Level label.
    pub label: String,
    /// Swatch colour.
    pub colour: Rgba,
    /// Symbol, when the legend covers a shape mapping.
    pub shape: Option<PointShape>,
    /// Dash pattern, when the legend covers a linetype mapping.
    pub linetype: Option<Linetype>,
}

/// Legend body.
#[derive(Debug, Clone, PartialEq)]
pub enum LegendKind {
    /// One key per level.
    Discrete(Vec<LegendEntry>),
    /// A colour bar.
    Continuous {
        /// Lowest mapped value.
        min: f32,
        /// Highest mapped value.
        max: f32,
        /// Evenly spaced colours from `min` to `max`.
        stops: Vec<Rgba>,
    },
}

/// Legend for one mapped channel (or several channels sharing a column).
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    /// Title, the column name unless overridden.
    pub title: String,
    /// Channels the legend explains.
    pub channels: Vec<Channel>,
    /// Keys.
    pub kind: LegendKind,
}

impl Legend {
    /// Number of keys (colour bar counts as one).
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.kind {
            LegendKind::Discrete(entries) => entries.len(),
            LegendKind::Continuous { .. } => 1,
        }
    }

    /// Whether the legend has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Chart
// ============================================================================

/// A fully encoded chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub(crate) geom: GeomKind,
    pub(crate) stat: Stat,
    pub(crate) position: Position,
    pub(crate) panels: Vec<Panel>,
    pub(crate) layout: (usize, usize),
    pub(crate) legends: Vec<Legend>,
    pub(crate) labels: Labels,
    pub(crate) theme: Theme,
    pub(crate) coord: Coord,
    pub(crate) axis_format: Option<AxisFormat>,
    pub(crate) legend_position: LegendPosition,
}

impl Chart {
    /// Geometry the chart was encoded with.
    #[must_use]
    pub fn geom(&self) -> GeomKind {
        self.geom
    }

    /// Statistic the chart was encoded with.
    #[must_use]
    pub fn stat(&self) -> Stat {
        self.stat
    }

    /// Position adjustment applied.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Panels in layout order (row-major).
    #[must_use]
    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    /// Panel grid size `(rows, cols)`.
    #[must_use]
    pub fn layout(&self) -> (usize, usize) {
        self.layout
    }

    /// Legends in channel order.
    #[must_use]
    pub fn legends(&self) -> &[Legend] {
        &self.legends
    }

    /// Resolved titles; axis titles default to the mapped column names.
    #[must_use]
    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Theme.
    #[must_use]
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Coordinate system.
    #[must_use]
    pub fn coord(&self) -> Coord {
        self.coord
    }

    /// Tick label format, if any.
    #[must_use]
    pub fn axis_format(&self) -> Option<&AxisFormat> {
        self.axis_format.as_ref()
    }

    /// Legend placement.
    #[must_use]
    pub fn legend_position(&self) -> LegendPosition {
        self.legend_position
    }

    /// All marks of all panels.
    pub fn marks(&self) -> impl Iterator<Item = &Mark> {
        self.panels.iter().flat_map(|p| p.marks.iter())
    }

    /// Total number of marks.
    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.panels.iter().map(|p| p.marks.len()).sum()
    }

    /// Rasterise at 96 dpi.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero or oversized canvas.
    pub fn to_framebuffer(&self, width: u32, height: u32) -> Result<Framebuffer> {
        self.rasterise(width, height, 1.0)
    }

    /// Vector rendering at 96 dpi.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero or oversized canvas.
    pub fn to_svg(&self, width: u32, height: u32) -> Result<String> {
        Ok(self.vectorise(width, height, 1.0)?.render())
    }

    /// Write the chart to `path`.
    ///
    /// `width` and `height` are in inches and `resolution` in dots per inch;
    /// the canvas is `round(inches * dpi)` pixels and strokes and text scale
    /// with `dpi / 96`. The format follows the extension (`png` or `svg`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for other extensions,
    /// [`Error::InvalidDimensions`] for non-positive sizes, and [`Error::Io`]
    /// when the file cannot be written.
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        width: f32,
        height: f32,
        resolution: f32,
    ) -> Result<()> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if ext != "png" && ext != "svg" {
            return Err(Error::UnsupportedFormat(if ext.is_empty() {
                path.display().to_string()
            } else {
                ext
            }));
        }

        let (w, h) = pixel_size(width, height, resolution)?;
        let scale = resolution / 96.0;
        if ext == "png" {
            let fb = self.rasterise(w, h, scale)?;
            PngEncoder::write_to_file(&fb, path, Some(resolution))?;
        } else {
            self.vectorise(w, h, scale)?.write_to_file(path)?;
        }

        tracing::info!(
            path = %path.display(),
            width = w,
            height = h,
            dpi = resolution,
            "saved chart"
        );
        Ok(())
    }

    fn rasterise(&self, width: u32, height: u32, scale: f32) -> Result<Framebuffer> {
        let mut canvas = render::RasterCanvas::new(Framebuffer::new(width, height)?);
        render::paint(self, &mut canvas, scale);
        Ok(canvas.into_framebuffer())
    }

    fn vectorise(&self, width: u32, height: u32, scale: f32) -> Result<SvgEncoder> {
        check_dimensions(width, height)?;
        let mut canvas = render::SvgCanvas::new(SvgEncoder::new(width, height));
        render::paint(self, &mut canvas, scale);
        Ok(canvas.into_encoder())
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}

/// Pixel canvas for a physical size.
fn pixel_size(width: f32, height: f32, resolution: f32) -> Result<(u32, u32)> {
    let px = |inches: f32| {
        let v = (inches * resolution).round();
        if v.is_finite() && v >= 1.0 {
            v.min(u32::MAX as f32) as u32
        } else {
            0
        }
    };
    let (w, h) = (px(width), px(height));
    check_dimensions(w, h)?;
    Ok((w, h))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_size_rounds() {
        assert_eq!(pixel_size(4.0, 3.0, 100.0).unwrap(), (400, 300));
        assert_eq!(pixel_size(2.5, 1.0, 72.0).unwrap(), (180, 72));
    }

    #[test]
    fn test_pixel_size_rejects_degenerate() {
        assert!(matches!(
            pixel_size(0.0, 3.0, 100.0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(pixel_size(-1.0, 3.0, 100.0).is_err());
        assert!(pixel_size(4.0, 3.0, f32::NAN).is_err());
        assert!(pixel_size(1000.0, 1000.0, 300.0).is_err());
    }

    #[test]
    fn test_mark_extent() {
        let rect = Mark::Rect {
            xmin: 0.55,
            xmax: 1.45,
            ymin: 0.0,
            ymax: 3.0,
            fill: Rgba::GREY35,
            colour: None,
        };
        assert_eq!(rect.extent(), Some((0.55, 1.45, 0.0, 3.0)));

        let empty = Mark::Path {
            points: vec![],
            colour: Rgba::BLACK,
            width: 1.0,
            linetype: Linetype::Solid,
        };
        assert_eq!(empty.extent(), None);
    }

    #[test]
    fn test_discrete_scale_range() {
        let s = PositionScale::Discrete {
            levels: vec!["A".into(), "B".into()],
        };
        assert_eq!(s.range(), (0.4, 2.6));
        assert!(s.is_discrete());
        assert_eq!(s.levels().len(), 2);
    }

    #[test]
    fn test_chart_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Chart>();
    }
}
