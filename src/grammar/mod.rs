//! Grammar of Graphics recipes.
//!
//! A chart request is four independent values: a [`Dataset`], an [`Aes`]
//! mapping columns to visual channels, a [`GeomSpec`] (mark type, statistic
//! and position adjustment) and [`StyleOptions`]. [`render`] validates the
//! request and dispatches to the encoder for the geom.
//!
//! # Components
//!
//! - **Aesthetics**: column-to-channel mappings (x, y, colour, fill, shape, ...)
//! - **Geometries**: point, line, bar, histogram, density, dotplot, boxplot,
//!   violin, pie, pointrange, segment, text
//! - **Statistics**: identity, count, summary, bin, density, boxplot, ydensity
//! - **Positions**: identity, jitter, dodge, stack, fill
//! - **Coordinates**: cartesian (optionally flipped) and polar
//! - **Facets**: grid and wrap, with fixed or free scales
//!
//! # Example
//!
//! ```rust
//! use trueno_recipes::grammar::*;
//!
//! let data = Dataset::new()
//!     .with_column("species", ["A", "A", "B"]).unwrap()
//!     .with_column("value", [1.0f32, 2.0, 3.0]).unwrap();
//!
//! let chart = render(
//!     &data,
//!     &Aes::new().x("species").y("value"),
//!     &GeomSpec::col(),
//!     &StyleOptions::new(),
//! ).unwrap();
//! assert_eq!(chart.mark_count(), 3);
//! ```
//!
//! # References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." Journal of Computational
//!   and Graphical Statistics.

mod aes;
mod chart;
mod coord;
mod data;
mod encode;
mod facet;
mod format;
mod geom;
mod options;
mod position;
mod stat;
mod theme;

pub use aes::{Aes, Channel};
pub use chart::{Chart, Legend, LegendEntry, LegendKind, Mark, Panel, PositionScale};
pub use coord::{Coord, Theta};
pub use data::{DataValue, Dataset};
pub use encode::render;
pub use facet::{Facet, FacetCell, ScaleMode};
pub use format::{default_label, AxisFormat};
pub use geom::{GeomKind, GeomParams, GeomSpec, Linetype, PointShape};
pub use options::{Labels, LegendPosition, StyleOptions};
pub use position::{Position, Span, DEFAULT_JITTER_SEED};
pub use stat::{Stat, SummaryFun};
pub use theme::{Theme, ThemePreset};
