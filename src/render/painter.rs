//! Chart painting.
//!
//! Lays a [`Chart`] out on a [`Canvas`]: titles, the legend area, the facet
//! grid with strips and axes, then the marks of every panel projected
//! through the chart's coordinate system. All lengths scale with the
//! `scale` factor so a chart saved at 300 dpi looks like the 96 dpi one.

use std::f32::consts::TAU;

use super::canvas::{Canvas, Stroke, TextStyle};
use crate::color::Rgba;
use crate::grammar::{
    default_label, AxisFormat, Chart, Coord, GeomKind, Legend, LegendEntry, LegendKind,
    LegendPosition, Linetype, Mark, Panel, PointShape, PositionScale, Theta,
};
use crate::output::TextAnchor;
use crate::scale::nice_ticks;

/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH: f32 = 0.6;
/// Edge subdivisions when bending straight data lines in polar space.
const POLAR_STEPS: usize = 48;
/// Target tick count per continuous axis.
const TICKS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Area {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl Area {
    fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    fn centre(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }
}

fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH
}

/// Tick positions and labels of an axis.
fn ticks(scale: &PositionScale, format: Option<&AxisFormat>) -> Vec<(f32, String)> {
    match scale {
        PositionScale::Discrete { levels } => levels
            .iter()
            .enumerate()
            .map(|(i, l)| ((i + 1) as f32, l.clone()))
            .collect(),
        PositionScale::Continuous { min, max } => nice_ticks(*min, *max, TICKS)
            .into_iter()
            .map(|v| (v, format.map_or_else(|| default_label(v), |f| f.format(v))))
            .collect(),
    }
}

fn dash(linetype: Linetype, width: f32) -> Option<Vec<f32>> {
    linetype
        .dash_pattern()
        .map(|p| p.iter().map(|d| d * width.max(1.0)).collect())
}

// ============================================================================
// Projection
// ============================================================================

/// Maps data coordinates of one panel to canvas pixels.
#[derive(Debug, Clone, Copy)]
struct Projection {
    plot: Area,
    x: (f32, f32),
    y: (f32, f32),
    coord: Coord,
}

fn normalise(v: f32, (lo, hi): (f32, f32)) -> f32 {
    if (hi - lo).abs() < f32::EPSILON {
        0.5
    } else {
        (v - lo) / (hi - lo)
    }
}

impl Projection {
    fn new(plot: Area, panel: &Panel, coord: Coord) -> Self {
        Self {
            plot,
            x: panel.x.range(),
            y: panel.y.range(),
            coord,
        }
    }

    fn radius(&self) -> f32 {
        self.plot.width().min(self.plot.height()) / 2.0 * 0.9
    }

    fn project(&self, x: f32, y: f32) -> (f32, f32) {
        let (u, v) = (normalise(x, self.x), normalise(y, self.y));
        match self.coord {
            Coord::Polar {
                theta,
                start,
                direction,
            } => {
                let (t, r) = match theta {
                    Theta::X => (u, v),
                    Theta::Y => (v, u),
                };
                let angle = start + f32::from(direction) * t * TAU;
                let radius = r.max(0.0) * self.radius();
                let (cx, cy) = self.plot.centre();
                (cx + radius * angle.sin(), cy - radius * angle.cos())
            }
            Coord::Cartesian { flip, .. } => {
                let (h, v) = if flip { (v, u) } else { (u, v) };
                (
                    self.plot.x0 + h * self.plot.width(),
                    self.plot.y1 - v * self.plot.height(),
                )
            }
        }
    }

    /// Project a data-space line, subdividing edges under polar coordinates.
    fn path(&self, points: &[(f32, f32)], closed: bool) -> Vec<(f32, f32)> {
        if !self.coord.is_polar() || points.len() < 2 {
            return points.iter().map(|&(x, y)| self.project(x, y)).collect();
        }
        let mut edges: Vec<((f32, f32), (f32, f32))> =
            points.windows(2).map(|w| (w[0], w[1])).collect();
        if closed {
            if let (Some(&last), Some(&first)) = (points.last(), points.first()) {
                edges.push((last, first));
            }
        }
        let mut out = Vec::with_capacity(edges.len() * POLAR_STEPS + 1);
        for (i, ((ax, ay), (bx, by))) in edges.into_iter().enumerate() {
            let from = usize::from(i > 0);
            for k in from..=POLAR_STEPS {
                let t = k as f32 / POLAR_STEPS as f32;
                out.push(self.project(ax + (bx - ax) * t, ay + (by - ay) * t));
            }
        }
        out
    }
}

// ============================================================================
// Painter
// ============================================================================

/// Paint `chart` onto `canvas`; `scale` multiplies every length.
pub fn paint<C: Canvas + ?Sized>(chart: &Chart, canvas: &mut C, scale: f32) {
    let scale = if scale.is_finite() && scale > 0.0 {
        scale
    } else {
        1.0
    };
    let mut painter = Painter {
        canvas,
        chart,
        scale,
        font: chart.theme().base_size * scale,
    };
    painter.paint();
}

struct Painter<'a, C: Canvas + ?Sized> {
    canvas: &'a mut C,
    chart: &'a Chart,
    scale: f32,
    font: f32,
}

impl<C: Canvas + ?Sized> Painter<'_, C> {
    fn text_style(&self, size: f32) -> TextStyle {
        TextStyle::new(size, self.chart.theme().text_color)
    }

    fn paint(&mut self) {
        let theme = self.chart.theme().clone();
        let (w, h) = self.canvas.size();
        self.canvas.clear(theme.background);

        let margin = theme.margin as f32 * self.scale;
        let mut area = Area {
            x0: margin,
            y0: margin,
            x1: w - margin,
            y1: h - margin,
        };
        if theme.show_text {
            self.titles(&mut area);
        }
        self.legends(&mut area);
        self.panels(area);
    }

    fn titles(&mut self, area: &mut Area) {
        let labels = self.chart.labels().clone();
        let font = self.font;
        if let Some(title) = &labels.title {
            area.y0 += font * 1.3;
            let style = self.text_style(font * 1.3).bold();
            self.canvas.text(area.x0, area.y0, title, &style);
            area.y0 += font * 0.5;
        }
        if let Some(subtitle) = &labels.subtitle {
            area.y0 += font;
            let style = self.text_style(font);
            self.canvas.text(area.x0, area.y0, subtitle, &style);
            area.y0 += font * 0.5;
        }
        if let Some(caption) = &labels.caption {
            let style = self.text_style(font * 0.8).anchor(TextAnchor::End);
            self.canvas.text(area.x1, area.y1, caption, &style);
            area.y1 -= font * 1.3;
        }
    }

    // ------------------------------------------------------------------------
    // Panels
    // ------------------------------------------------------------------------

    fn panels(&mut self, mut area: Area) {
        let chart = self.chart;
        let panels = chart.panels();
        if panels.is_empty() {
            return;
        }
        let theme = chart.theme();
        let coord = chart.coord();
        let flip = coord.is_flipped();
        let polar = coord.is_polar();
        let font = self.font;
        let format = chart.axis_format();

        let horizontal = |p: &'_ Panel| if flip { p.y.clone() } else { p.x.clone() };
        let vertical = |p: &'_ Panel| if flip { p.x.clone() } else { p.y.clone() };
        let free_h = panels
            .windows(2)
            .any(|w| horizontal(&w[0]) != horizontal(&w[1]));
        let free_v = panels
            .windows(2)
            .any(|w| vertical(&w[0]) != vertical(&w[1]));

        let labels = chart.labels();
        let (h_title, v_title) = if flip {
            (&labels.y, &labels.x)
        } else {
            (&labels.x, &labels.y)
        };
        if theme.show_text && !polar {
            if let Some(title) = h_title {
                let style = self.text_style(font).anchor(TextAnchor::Middle);
                self.canvas.text(area.centre().0, area.y1, title, &style);
                area.y1 -= font * 1.4;
            }
            if let Some(title) = v_title {
                area.x0 += font;
                let style = self
                    .text_style(font)
                    .anchor(TextAnchor::Middle)
                    .rotate(-90.0);
                self.canvas.text(area.x0, area.centre().1, title, &style);
                area.x0 += font * 0.4;
            }
        }

        let tick_font = font * 0.8;
        let axis_text = theme.show_text && !polar;
        let y_width = if axis_text {
            panels
                .iter()
                .flat_map(|p| ticks(&vertical(p), format))
                .map(|(_, l)| text_width(&l, tick_font))
                .fold(0.0, f32::max)
                + font * 0.5
        } else {
            0.0
        };
        let x_height = if axis_text { font * 1.4 } else { 0.0 };
        let strip = if panels.iter().any(|p| !p.strip.is_empty()) {
            font * 1.6
        } else {
            0.0
        };
        let gap = font * 0.5;

        let (rows, cols) = chart.layout();
        let (rows, cols) = (rows.max(1) as f32, cols.max(1) as f32);
        let col_gap = gap + if free_v { y_width } else { 0.0 };
        let row_gap = gap + strip + if free_h { x_height } else { 0.0 };
        let pw = (area.width() - y_width - (cols - 1.0) * col_gap) / cols;
        let ph = (area.height() - strip - x_height - (rows - 1.0) * row_gap) / rows;
        if pw <= 1.0 || ph <= 1.0 {
            tracing::debug!(width = pw, height = ph, "canvas too small for panels");
            return;
        }

        for panel in panels {
            let x0 = area.x0 + y_width + panel.col as f32 * (pw + col_gap);
            let y0 = area.y0 + strip + panel.row as f32 * (ph + row_gap);
            let plot = Area {
                x0,
                y0,
                x1: x0 + pw,
                y1: y0 + ph,
            };
            let below = panels
                .iter()
                .any(|o| o.row == panel.row + 1 && o.col == panel.col);
            let axes = AxisText {
                bottom: axis_text && (free_h || !below),
                left: axis_text && (free_v || panel.col == 0),
                font: tick_font,
            };
            self.panel(panel, plot, &axes);
            if strip > 0.0 {
                let band = Area {
                    x0,
                    y0: y0 - strip,
                    x1: x0 + pw,
                    y1: y0,
                };
                self.strip(panel, band);
            }
        }
    }

    fn strip(&mut self, panel: &Panel, area: Area) {
        let theme = self.chart.theme();
        let fill = Some(theme.strip_background);
        self.canvas
            .rect(area.x0, area.y0, area.width(), area.height(), fill, None);
        if theme.show_text && !panel.strip.is_empty() {
            let style = self.text_style(self.font * 0.9).anchor(TextAnchor::Middle);
            let (cx, cy) = area.centre();
            let label = panel.strip.join(", ");
            self.canvas.text(cx, cy + self.font * 0.3, &label, &style);
        }
    }

    fn panel(&mut self, panel: &Panel, plot: Area, axes: &AxisText) {
        let chart = self.chart;
        let theme = chart.theme();
        let coord = chart.coord();
        let proj = Projection::new(plot, panel, coord);

        let background = Some(theme.panel_background);
        let (w, h) = (plot.width(), plot.height());
        self.canvas.rect(plot.x0, plot.y0, w, h, background, None);
        let x_ticks = ticks(&panel.x, chart.axis_format());
        let y_ticks = ticks(&panel.y, chart.axis_format());
        if theme.show_grid {
            self.grid(&proj, &x_ticks, &y_ticks);
        }

        for mark in &panel.marks {
            self.mark(mark, &proj);
        }

        let axis = Stroke::solid(theme.axis_color, theme.axis_width * self.scale);
        if theme.show_panel_border {
            self.canvas.rect(plot.x0, plot.y0, w, h, None, Some(&axis));
        }
        if theme.show_axis && !coord.is_polar() {
            let spine = [(plot.x0, plot.y0), (plot.x0, plot.y1), (plot.x1, plot.y1)];
            self.canvas.polyline(&spine, &axis);
        }

        let (h_ticks, v_ticks) = if coord.is_flipped() {
            (&y_ticks, &x_ticks)
        } else {
            (&x_ticks, &y_ticks)
        };
        let tick_len = self.font * 0.25;
        if axes.bottom {
            let style = self.text_style(axes.font).anchor(TextAnchor::Middle);
            for (v, label) in h_ticks {
                let (px, _) = if coord.is_flipped() {
                    proj.project(plot_mid(&proj.x), *v)
                } else {
                    proj.project(*v, plot_mid(&proj.y))
                };
                let tick = [(px, plot.y1), (px, plot.y1 + tick_len)];
                self.canvas.polyline(&tick, &axis);
                let baseline = plot.y1 + tick_len + axes.font;
                self.canvas.text(px, baseline, label, &style);
            }
        }
        if axes.left {
            let style = self.text_style(axes.font).anchor(TextAnchor::End);
            for (v, label) in v_ticks {
                let (_, py) = if coord.is_flipped() {
                    proj.project(*v, plot_mid(&proj.y))
                } else {
                    proj.project(plot_mid(&proj.x), *v)
                };
                let tick = [(plot.x0 - tick_len, py), (plot.x0, py)];
                self.canvas.polyline(&tick, &axis);
                let (lx, ly) = (plot.x0 - tick_len * 1.5, py + axes.font * 0.35);
                self.canvas.text(lx, ly, label, &style);
            }
        }
    }

    fn grid(&mut self, proj: &Projection, x_ticks: &[(f32, String)], y_ticks: &[(f32, String)]) {
        let theme = self.chart.theme();
        let stroke = Stroke::solid(theme.grid_color, theme.grid_width * self.scale);
        match proj.coord {
            Coord::Polar { theta, .. } => {
                let (radial, range) = match theta {
                    Theta::X => (y_ticks, proj.y),
                    Theta::Y => (x_ticks, proj.x),
                };
                let (cx, cy) = proj.plot.centre();
                for (v, _) in radial {
                    let r = normalise(*v, range) * proj.radius();
                    if r > 0.0 {
                        self.canvas.circle(cx, cy, r, None, Some(&stroke));
                    }
                }
            }
            Coord::Cartesian { .. } => {
                for (x, _) in x_ticks {
                    let line = [proj.project(*x, proj.y.0), proj.project(*x, proj.y.1)];
                    self.canvas.polyline(&line, &stroke);
                }
                for (y, _) in y_ticks {
                    let line = [proj.project(proj.x.0, *y), proj.project(proj.x.1, *y)];
                    self.canvas.polyline(&line, &stroke);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Marks
    // ------------------------------------------------------------------------

    fn mark(&mut self, mark: &Mark, proj: &Projection) {
        let s = self.scale;
        match mark {
            Mark::Point {
                x,
                y,
                colour,
                fill,
                size,
                shape,
            } => {
                let (px, py) = proj.project(*x, *y);
                self.point(px, py, size * s, *shape, *colour, *fill);
            }
            Mark::Path {
                points,
                colour,
                width,
                linetype,
            } => {
                let stroke = Stroke::solid(*colour, width * s).dashed(dash(*linetype, width * s));
                self.canvas.polyline(&proj.path(points, false), &stroke);
            }
            Mark::Rect {
                xmin,
                xmax,
                ymin,
                ymax,
                fill,
                colour,
            } => {
                let outline = colour.map(|c| Stroke::solid(c, 0.5 * s));
                let bounds = (*xmin, *xmax, *ymin, *ymax);
                self.rect(proj, bounds, Some(*fill), outline.as_ref());
            }
            Mark::Polygon {
                points,
                fill,
                colour,
            } => {
                let outline = colour.map(|c| Stroke::solid(c, 0.5 * s));
                let ring = proj.path(points, true);
                self.canvas.polygon(&ring, Some(*fill), outline.as_ref());
            }
            Mark::Box {
                x,
                width,
                lower,
                q1,
                median,
                q3,
                upper,
                outliers,
                fill,
                colour,
            } => {
                let stroke = Stroke::solid(*colour, 0.5 * s);
                let (left, right) = (x - width / 2.0, x + width / 2.0);
                self.segment(proj, (*x, *lower), (*x, *q1), &stroke);
                self.segment(proj, (*x, *q3), (*x, *upper), &stroke);
                self.rect(proj, (left, right, *q1, *q3), Some(*fill), Some(&stroke));
                let midline = Stroke::solid(*colour, 1.5 * s);
                self.segment(proj, (left, *median), (right, *median), &midline);
                for o in outliers {
                    let (px, py) = proj.project(*x, *o);
                    self.canvas.circle(px, py, 2.0 * s, Some(*colour), None);
                }
            }
            Mark::Range {
                x,
                y,
                ymin,
                ymax,
                colour,
                size,
            } => {
                let stroke = Stroke::solid(*colour, s);
                self.segment(proj, (*x, *ymin), (*x, *ymax), &stroke);
                let (px, py) = proj.project(*x, *y);
                let r = size * s / 2.0;
                self.canvas.circle(px, py, r, Some(*colour), None);
            }
            Mark::Segment {
                x,
                y,
                xend,
                yend,
                colour,
                width,
                linetype,
            } => {
                let stroke = Stroke::solid(*colour, width * s).dashed(dash(*linetype, width * s));
                self.segment(proj, (*x, *y), (*xend, *yend), &stroke);
            }
            Mark::Text {
                x,
                y,
                label,
                colour,
                size,
            } => {
                let (px, py) = proj.project(*x, *y);
                let style = TextStyle::new(size * s, *colour).anchor(TextAnchor::Middle);
                self.canvas.text(px, py + size * s * 0.35, label, &style);
            }
        }
    }

    fn segment(&mut self, proj: &Projection, from: (f32, f32), to: (f32, f32), stroke: &Stroke) {
        self.canvas.polyline(&proj.path(&[from, to], false), stroke);
    }

    fn rect(
        &mut self,
        proj: &Projection,
        (x0, x1, y0, y1): (f32, f32, f32, f32),
        fill: Option<Rgba>,
        outline: Option<&Stroke>,
    ) {
        if proj.coord.is_polar() {
            let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1)];
            let ring = proj.path(&corners, true);
            self.canvas.polygon(&ring, fill, outline);
            return;
        }
        let plot = proj.plot;
        let (ax, ay) = proj.project(x0, y0);
        let (bx, by) = proj.project(x1, y1);
        let left = ax.min(bx).clamp(plot.x0, plot.x1);
        let right = ax.max(bx).clamp(plot.x0, plot.x1);
        let top = ay.min(by).clamp(plot.y0, plot.y1);
        let bottom = ay.max(by).clamp(plot.y0, plot.y1);
        let (width, height) = (right - left, bottom - top);
        self.canvas.rect(left, top, width, height, fill, outline);
    }

    fn point(&mut self, px: f32, py: f32, size: f32, shape: PointShape, colour: Rgba, fill: Rgba) {
        let r = (size / 2.0).max(0.5);
        let stroke = Stroke::solid(colour, self.scale.max(0.5));
        let outline = (fill != colour).then_some(&stroke);
        match shape {
            PointShape::Circle => self.canvas.circle(px, py, r, Some(fill), outline),
            PointShape::OpenCircle => self.canvas.circle(px, py, r, None, Some(&stroke)),
            PointShape::Square => {
                let half = r * 0.9;
                let (x0, y0, side) = (px - half, py - half, half * 2.0);
                self.canvas.rect(x0, y0, side, side, Some(fill), outline);
            }
            PointShape::Triangle => {
                let pts = [
                    (px, py - r),
                    (px + r * 0.87, py + r * 0.5),
                    (px - r * 0.87, py + r * 0.5),
                ];
                self.canvas.polygon(&pts, Some(fill), outline);
            }
            PointShape::Diamond => {
                let pts = [(px, py - r), (px + r, py), (px, py + r), (px - r, py)];
                self.canvas.polygon(&pts, Some(fill), outline);
            }
            PointShape::Cross => {
                let bar = Stroke::solid(colour, (r * 0.4).max(1.0));
                self.canvas.polyline(&[(px - r, py), (px + r, py)], &bar);
                self.canvas.polyline(&[(px, py - r), (px, py + r)], &bar);
            }
            PointShape::X => {
                let bar = Stroke::solid(colour, (r * 0.4).max(1.0));
                let d = r * 0.75;
                let down = [(px - d, py - d), (px + d, py + d)];
                let up = [(px - d, py + d), (px + d, py - d)];
                self.canvas.polyline(&down, &bar);
                self.canvas.polyline(&up, &bar);
            }
        }
    }

    // ------------------------------------------------------------------------
    // Legends
    // ------------------------------------------------------------------------

    fn legends(&mut self, area: &mut Area) {
        let chart = self.chart;
        let position = chart.legend_position();
        let legends: Vec<&Legend> = chart.legends().iter().filter(|l| !l.is_empty()).collect();
        if position == LegendPosition::None || legends.is_empty() {
            return;
        }
        let font = self.font;
        let horizontal = matches!(position, LegendPosition::Top | LegendPosition::Bottom);
        let sizes: Vec<(f32, f32)> = legends
            .iter()
            .map(|l| self.legend_size(l, horizontal))
            .collect();

        if horizontal {
            let height = sizes.iter().map(|s| s.1).fold(0.0, f32::max) + font * 0.5;
            let y = if position == LegendPosition::Top {
                area.y0 += height;
                area.y0 - height
            } else {
                area.y1 -= height;
                area.y1 + font * 0.5
            };
            let mut x = area.x0;
            for (legend, (w, _)) in legends.iter().zip(&sizes) {
                self.legend(legend, x, y, true);
                x += w + font;
            }
        } else {
            let width = sizes.iter().map(|s| s.0).fold(0.0, f32::max) + font;
            let x = if position == LegendPosition::Right {
                area.x1 -= width;
                area.x1 + font
            } else {
                area.x0 += width;
                area.x0 - width
            };
            let mut y = area.y0;
            for (legend, (_, h)) in legends.iter().zip(&sizes) {
                self.legend(legend, x, y, false);
                y += h + font;
            }
        }
    }

    fn legend_size(&self, legend: &Legend, horizontal: bool) -> (f32, f32) {
        let font = self.font;
        let key = font * 1.2;
        let label_font = font * 0.8;
        let title = text_width(&legend.title, font);
        match &legend.kind {
            LegendKind::Discrete(entries) => {
                let items = entries
                    .iter()
                    .map(|e| key + font * 0.3 + text_width(&e.label, label_font));
                if horizontal {
                    let row: f32 = items.map(|w| w + font * 0.5).sum();
                    (title + font * 0.5 + row, key + font * 0.3)
                } else {
                    let widest = items.fold(0.0, f32::max);
                    (title.max(widest), font * 1.4 + entries.len() as f32 * key)
                }
            }
            LegendKind::Continuous { min, max, .. } => {
                let lo = text_width(&default_label(*min), label_font);
                let hi = text_width(&default_label(*max), label_font);
                let labels = lo.max(hi);
                if horizontal {
                    let row = title + font * 0.5 + key * 5.0 + labels;
                    (row, key + label_font * 1.2)
                } else {
                    (title.max(key + font * 0.3 + labels), font * 1.4 + key * 5.0)
                }
            }
        }
    }

    fn legend(&mut self, legend: &Legend, x: f32, y: f32, horizontal: bool) {
        let theme = self.chart.theme().clone();
        let font = self.font;
        let key = font * 1.2;
        let label_font = font * 0.8;
        let label_style = self.text_style(label_font);

        let (mut kx, mut ky) = if horizontal {
            if theme.show_text {
                let style = self.text_style(font).bold();
                self.canvas.text(x, y + key * 0.75, &legend.title, &style);
            }
            (x + text_width(&legend.title, font) + font * 0.5, y)
        } else {
            if theme.show_text {
                let style = self.text_style(font).bold();
                self.canvas.text(x, y + font, &legend.title, &style);
            }
            (x, y + font * 1.4)
        };

        match &legend.kind {
            LegendKind::Discrete(entries) => {
                for entry in entries {
                    self.key(entry, kx, ky, key);
                    if theme.show_text {
                        let (tx, ty) = (kx + key + font * 0.3, ky + key * 0.7);
                        self.canvas.text(tx, ty, &entry.label, &label_style);
                    }
                    if horizontal {
                        kx += key + font * 0.3 + text_width(&entry.label, label_font) + font * 0.5;
                    } else {
                        ky += key;
                    }
                }
            }
            LegendKind::Continuous { min, max, stops } => {
                let n = stops.len().max(1) as f32;
                let length = key * 5.0;
                let step = length / n + 0.5;
                for (i, colour) in stops.iter().enumerate() {
                    let offset = i as f32 / n * length;
                    let fill = Some(*colour);
                    if horizontal {
                        self.canvas.rect(kx + offset, ky, step, key, fill, None);
                    } else {
                        // Highest value on top
                        let top = ky + length - offset - length / n;
                        self.canvas.rect(kx, top, key, step, fill, None);
                    }
                }
                if theme.show_text {
                    let (lo, hi) = (default_label(*min), default_label(*max));
                    if horizontal {
                        let below = ky + key + label_font;
                        let end = label_style.anchor(TextAnchor::End);
                        self.canvas.text(kx, below, &lo, &label_style);
                        self.canvas.text(kx + length, below, &hi, &end);
                    } else {
                        let right = kx + key + font * 0.3;
                        self.canvas.text(right, ky + label_font, &hi, &label_style);
                        self.canvas.text(right, ky + length, &lo, &label_style);
                    }
                }
            }
        }
    }

    fn key(&mut self, entry: &LegendEntry, x: f32, y: f32, size: f32) {
        let theme = self.chart.theme();
        let background = Some(theme.panel_background);
        self.canvas.rect(x, y, size, size, background, None);
        let (cx, cy) = (x + size / 2.0, y + size / 2.0);
        let stub = [(x + 1.0, cy), (x + size - 1.0, cy)];
        let geom = self.chart.geom();

        if let Some(linetype) = entry.linetype {
            let width = self.scale;
            let stroke = Stroke::solid(entry.colour, width).dashed(dash(linetype, width));
            self.canvas.polyline(&stub, &stroke);
            return;
        }
        let marker = matches!(
            geom,
            GeomKind::Point | GeomKind::Dotplot | GeomKind::Pointrange | GeomKind::Text
        );
        let shape = entry.shape.or(marker.then_some(PointShape::Circle));
        if let Some(shape) = shape {
            self.point(cx, cy, size * 0.5, shape, entry.colour, entry.colour);
        } else if matches!(geom, GeomKind::Line | GeomKind::Segment) {
            let stroke = Stroke::solid(entry.colour, self.scale);
            self.canvas.polyline(&stub, &stroke);
        } else {
            let inset = size * 0.1;
            let side = size - 2.0 * inset;
            let (kx, ky) = (x + inset, y + inset);
            let fill = Some(entry.colour);
            self.canvas.rect(kx, ky, side, side, fill, None);
        }
    }
}

fn plot_mid(range: &(f32, f32)) -> f32 {
    (range.0 + range.1) / 2.0
}

struct AxisText {
    bottom: bool,
    left: bool,
    font: f32,
}
