//! Rendering backends and rasterization.
//!
//! A chart is painted through the [`Canvas`] trait, so the same layout code
//! drives both the raster and the SVG backend.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: Smooth hairlines with sub-pixel accuracy
//! - **Scanline Polygon Fill**: Even-odd filling sampled at pixel centres
//! - **Midpoint Circle**: Filled and outlined circle rendering
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.

mod canvas;
mod painter;
mod primitives;

pub use canvas::{Canvas, RasterCanvas, Stroke, SvgCanvas, TextStyle};
pub use painter::paint;
pub use primitives::{
    dash_runs, draw_circle, draw_circle_outline, draw_line_aa, draw_rect_outline, draw_thick_line,
    fill_polygon, fill_rect_f, stroke_polyline,
};
