//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for the shapes charts are built
//! from: antialiased hairlines, thick and dashed polylines, filled polygons
//! and circles.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// This implements Xiaolin Wu's line algorithm from SIGGRAPH '91,
/// which produces smooth lines with sub-pixel accuracy.
///
/// # Algorithm
///
/// Wu's algorithm draws two pixels at each step along the major axis,
/// adjusting their intensities based on the fractional distance from
/// the ideal line position.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep {
        (y0, x0, y1, x1)
    } else {
        (x0, y0, x1, y1)
    };

    let (x0, y0, x1, y1) = if x0 > x1 {
        (x1, y1, x0, y0)
    } else {
        (x0, y0, x1, y1)
    };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON {
        1.0
    } else {
        dy / dx
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;

    if steep {
        plot(fb, ypxl1, xpxl1, color, rfpart(yend) * xgap);
        plot(fb, ypxl1 + 1, xpxl1, color, fpart(yend) * xgap);
    } else {
        plot(fb, xpxl1, ypxl1, color, rfpart(yend) * xgap);
        plot(fb, xpxl1, ypxl1 + 1, color, fpart(yend) * xgap);
    }

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;

    if steep {
        plot(fb, ypxl2, xpxl2, color, rfpart(yend) * xgap);
        plot(fb, ypxl2 + 1, xpxl2, color, fpart(yend) * xgap);
    } else {
        plot(fb, xpxl2, ypxl2, color, rfpart(yend) * xgap);
        plot(fb, xpxl2, ypxl2 + 1, color, fpart(yend) * xgap);
    }

    if steep {
        for x in (xpxl1 + 1)..xpxl2 {
            let ipart = intery.floor() as i32;
            plot(fb, ipart, x, color, rfpart(intery));
            plot(fb, ipart + 1, x, color, fpart(intery));
            intery += gradient;
        }
    } else {
        for x in (xpxl1 + 1)..xpxl2 {
            let ipart = intery.floor() as i32;
            plot(fb, x, ipart, color, rfpart(intery));
            plot(fb, x, ipart + 1, color, fpart(intery));
            intery += gradient;
        }
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

/// Draw a line of any width. Hairlines use Wu's algorithm; wider lines are
/// filled as a quad.
pub fn draw_thick_line(
    fb: &mut Framebuffer,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    width: f32,
    color: Rgba,
) {
    if width <= 1.5 {
        draw_line_aa(fb, x0, y0, x1, y1, color);
        return;
    }
    let (dx, dy) = (x1 - x0, y1 - y0);
    let len = (dx * dx + dy * dy).sqrt();
    if len < f32::EPSILON {
        return;
    }
    let (nx, ny) = (-dy / len * width / 2.0, dx / len * width / 2.0);
    let quad = [
        (x0 + nx, y0 + ny),
        (x1 + nx, y1 + ny),
        (x1 - nx, y1 - ny),
        (x0 - nx, y0 - ny),
    ];
    fill_polygon(fb, &quad, color);
}

/// Stroke a connected polyline. Wide strokes get round joins.
pub fn stroke_polyline(fb: &mut Framebuffer, points: &[(f32, f32)], width: f32, color: Rgba) {
    for pair in points.windows(2) {
        draw_thick_line(fb, pair[0].0, pair[0].1, pair[1].0, pair[1].1, width, color);
    }
    if width > 1.5 && points.len() > 2 {
        let radius = (width / 2.0).round() as i32;
        for &(x, y) in &points[1..points.len() - 1] {
            draw_circle(fb, x.round() as i32, y.round() as i32, radius, color);
        }
    }
}

/// Split a polyline into its "on" runs for a dash pattern of on/off lengths
/// in pixels. An empty pattern yields the whole line.
#[must_use]
pub fn dash_runs(points: &[(f32, f32)], pattern: &[f32]) -> Vec<Vec<(f32, f32)>> {
    let total: f32 = pattern.iter().sum();
    if pattern.is_empty() || total <= 0.0 || points.len() < 2 {
        return vec![points.to_vec()];
    }

    let mut runs = Vec::new();
    let mut current: Vec<(f32, f32)> = vec![points[0]];
    let mut idx = 0;
    let mut left = pattern[0];
    let mut on = true;

    for pair in points.windows(2) {
        let (mut ax, mut ay) = pair[0];
        let (bx, by) = pair[1];
        let mut seg = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        while seg > left {
            let t = left / seg;
            let (cx, cy) = (ax + (bx - ax) * t, ay + (by - ay) * t);
            if on {
                current.push((cx, cy));
                runs.push(std::mem::take(&mut current));
            } else {
                current = vec![(cx, cy)];
            }
            seg -= left;
            (ax, ay) = (cx, cy);
            on = !on;
            idx = (idx + 1) % pattern.len();
            left = pattern[idx];
        }
        left -= seg;
        if on {
            current.push((bx, by));
        }
    }
    if on && current.len() > 1 {
        runs.push(current);
    }
    runs
}

// ============================================================================
// Area Filling
// ============================================================================

/// Fill an axis-aligned rectangle given by float corners.
pub fn fill_rect_f(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let (left, right) = (x0.min(x1).round().max(0.0), x0.max(x1).round().max(0.0));
    let (top, bottom) = (y0.min(y1).round().max(0.0), y0.max(y1).round().max(0.0));
    let w = (right - left) as u32;
    let h = (bottom - top) as u32;
    fb.fill_rect(left as u32, top as u32, w.max(1), h.max(1), color);
}

/// Draw a rectangle outline.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
    color: Rgba,
    thickness: f32,
) {
    let corners = [(x0, y0), (x1, y0), (x1, y1), (x0, y1), (x0, y0)];
    for pair in corners.windows(2) {
        let ((ax, ay), (bx, by)) = (pair[0], pair[1]);
        draw_thick_line(fb, ax, ay, bx, by, thickness, color);
    }
}

/// Fill a simple or self-intersecting polygon (even-odd rule), sampling at
/// pixel centres.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[(f32, f32)], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    let (mut ymin, mut ymax) = (f32::INFINITY, f32::NEG_INFINITY);
    for &(_, y) in points {
        ymin = ymin.min(y);
        ymax = ymax.max(y);
    }
    if !ymin.is_finite() || !ymax.is_finite() {
        return;
    }

    let first_row = (ymin - 0.5).ceil().max(0.0) as i32;
    let last_row = ((ymax - 0.5).floor() as i32).min(fb.height() as i32 - 1);
    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());

    for row in first_row..=last_row {
        let sy = row as f32 + 0.5;
        crossings.clear();
        for i in 0..points.len() {
            let (ax, ay) = points[i];
            let (bx, by) = points[(i + 1) % points.len()];
            if (ay <= sy && by > sy) || (by <= sy && ay > sy) {
                crossings.push(ax + (sy - ay) / (by - ay) * (bx - ax));
            }
        }
        crossings.sort_by(f32::total_cmp);
        for span in crossings.chunks_exact(2) {
            let start = (span[0] - 0.5).ceil() as i32;
            let end = (span[1] - 0.5).floor() as i32;
            draw_horizontal_line(fb, start, end, row, color);
        }
    }
}

// ============================================================================
// Circle Drawing
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
///
/// # Arguments
///
/// * `fb` - Target framebuffer
/// * `cx`, `cy` - Center coordinates
/// * `radius` - Circle radius in pixels
/// * `color` - Fill color
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.blend_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    // Scanline rows of the disc, each drawn once so translucent fills blend evenly
    for dy in -radius..=radius {
        let half = (((radius * radius - dy * dy) as f32).sqrt()).round() as i32;
        draw_horizontal_line(fb, cx - half, cx + half, cy + dy, color);
    }
}

/// Draw a circle outline.
pub fn draw_circle_outline(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.set_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;

    while x >= y {
        for (px, py) in [
            (x, y),
            (-x, y),
            (x, -y),
            (-x, -y),
            (y, x),
            (-y, x),
            (y, -x),
            (-y, -x),
        ] {
            plot_circle_point(fb, cx + px, cy + py, color);
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

/// Helper to draw a horizontal run of pixels, clipped to the buffer.
#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;

    if x_start < x_end {
        fb.fill_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

#[inline]
fn plot_circle_point(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        fb.blend_pixel(x as u32, y as u32, color);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_draw_line_aa() {
        let mut fb = canvas();
        draw_line_aa(&mut fb, 10.0, 10.0, 90.0, 50.0, Rgba::BLACK);
        // Somewhere near the ideal line the pixel darkened
        let p = fb.get_pixel(50, 30).unwrap();
        assert!(p.r < 255);
    }

    #[test]
    fn test_thick_line_covers_width() {
        let mut fb = canvas();
        draw_thick_line(&mut fb, 10.0, 50.0, 90.0, 50.0, 6.0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 48), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 52), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 60), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_triangle() {
        let mut fb = canvas();
        let triangle = [(10.0, 90.0), (50.0, 10.0), (90.0, 90.0)];
        fill_polygon(&mut fb, &triangle, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 60), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(12, 12), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_translucent_blends_once() {
        let mut fb = canvas();
        let half_red = Rgba::new(255, 0, 0, 128);
        let square = [(10.0, 10.0), (90.0, 10.0), (90.0, 90.0), (10.0, 90.0)];
        fill_polygon(&mut fb, &square, half_red);
        let p = fb.get_pixel(50, 50).unwrap();
        assert_eq!(p.r, 255);
        assert!((120..=135).contains(&p.g));
    }

    #[test]
    fn test_fill_rect_f() {
        let mut fb = canvas();
        fill_rect_f(&mut fb, 20.2, 20.0, 49.6, 50.0, Rgba::RED);
        assert_eq!(fb.get_pixel(25, 25), Some(Rgba::RED));
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut fb = canvas();
        draw_rect_outline(&mut fb, 20.0, 20.0, 50.0, 50.0, Rgba::RED, 2.0);
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::WHITE));
        assert_ne!(fb.get_pixel(35, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 20, Rgba::BLUE);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(69, 50), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle_outline() {
        let mut fb = canvas();
        draw_circle_outline(&mut fb, 50, 50, 20, Rgba::GREEN);
        assert_eq!(fb.get_pixel(70, 50), Some(Rgba::GREEN));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 0, Rgba::RED);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::RED));
    }

    #[test]
    fn test_out_of_bounds_does_not_panic() {
        let mut fb = canvas();
        draw_line_aa(&mut fb, -10.0, -10.0, 110.0, 110.0, Rgba::BLACK);
        let overhang = [(-50.0, -50.0), (150.0, -50.0), (150.0, 150.0)];
        fill_polygon(&mut fb, &overhang, Rgba::RED);
        draw_circle(&mut fb, -5, 200, 30, Rgba::BLUE);
        let escape = [(-10.0, 5.0), (50.0, 5.0), (50.0, 500.0)];
        stroke_polyline(&mut fb, &escape, 4.0, Rgba::BLACK);
    }

    #[test]
    fn test_dash_runs() {
        let runs = dash_runs(&[(0.0, 0.0), (20.0, 0.0)], &[4.0, 4.0]);
        // on 0-4, 8-12, 16-20
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0], vec![(0.0, 0.0), (4.0, 0.0)]);
        assert_eq!(runs[1], vec![(8.0, 0.0), (12.0, 0.0)]);
    }

    #[test]
    fn test_dash_runs_across_vertices() {
        let runs = dash_runs(&[(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)], &[4.0, 2.0]);
        assert_eq!(runs[0], vec![(0.0, 0.0), (3.0, 0.0), (3.0, 1.0)]);
    }

    #[test]
    fn test_dash_runs_empty_pattern() {
        let pts = vec![(0.0, 0.0), (5.0, 5.0)];
        assert_eq!(dash_runs(&pts, &[]), vec![pts]);
    }
}
