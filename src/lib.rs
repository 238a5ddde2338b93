//! # Trueno-Recipes
//!
//! Declarative chart recipes on a grammar of graphics.
//!
//! A recipe is a dataset, a set of aesthetic mappings, a geometry (with its
//! statistic and position adjustment) and a bag of styling options. One
//! entry point, [`grammar::render`], validates the recipe, runs the
//! statistic, applies positions and facets, and returns an encoded
//! [`grammar::Chart`] that can be rasterised, vectorised or saved.
//!
//! ## Features
//!
//! - **Pure Rust**: PNG and SVG output with no native or browser dependencies
//! - **Fail Fast**: Unknown columns, incompatible statistics and empty data are
//!   rejected before anything is drawn
//! - **Deterministic**: Identical inputs give identical charts, jitter included
//! - **Explicit Styling**: Themes and palettes travel with each call, never as
//!   global state
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_recipes::prelude::*;
//!
//! let data = Dataset::new()
//!     .with_column("species", ["A", "A", "B"])?
//!     .with_column("value", [1.0f32, 2.0, 3.0])?;
//!
//! // Bar heights are row counts per species
//! let chart = render(
//!     &data,
//!     &Aes::new().x("species"),
//!     &GeomSpec::bar(),
//!     &StyleOptions::default(),
//! )?;
//! assert_eq!(chart.mark_count(), 2);
//!
//! let svg = chart.to_svg(400, 300)?;
//! assert!(svg.starts_with("<svg"));
//! # Ok::<(), trueno_recipes::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Render batches of recipes on the rayon thread pool
//!
//! ## Academic References
//!
//! - Wilkinson, L. (2005). *The Grammar of Graphics*. Springer.
//! - Wickham, H. (2010). "A Layered Grammar of Graphics." *JCGS* 19(1).
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Silverman, B. W. (1986). *Density Estimation for Statistics and Data Analysis*.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and color space conversions.
pub mod color;

/// Named colour palettes.
pub mod palette;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Statistical estimators (binning, quantiles, kernel density, summaries).
pub mod estimate;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Grammar of Graphics implementation.
pub mod grammar;

/// Rendering many recipes at once.
pub mod batch;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rendering backends and rasterization.
pub mod render;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for chart recipe operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_recipes::prelude::*;
/// ```
pub mod prelude {
    pub use crate::batch::{render_all, RenderRequest};
    pub use crate::color::{Hsla, Rgba};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::grammar::{
        render, Aes, AxisFormat, Channel, Chart, Coord, DataValue, Dataset, Facet, GeomKind,
        GeomSpec, Labels, LegendPosition, Linetype, Mark, PointShape, Position, ScaleMode, Stat,
        StyleOptions, SummaryFun, Theme, ThemePreset,
    };
    pub use crate::palette::Palette;
    pub use crate::scale::{LinearScale, Scale};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;

// ============================================================================
// Tests
// ============================================================================
