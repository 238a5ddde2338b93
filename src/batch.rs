//! Batch rendering.
//!
//! Renders many independent recipes. Each request owns its inputs, so with
//! the `parallel` feature the work is spread over the rayon thread pool
//! without any shared mutable state.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::Result;
use crate::grammar::{render, Aes, Chart, Dataset, GeomSpec, StyleOptions};

/// One chart recipe: data, mappings, geometry and styling.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    /// Input table.
    pub data: Dataset,
    /// Column-to-channel mappings.
    pub aes: Aes,
    /// Geometry, statistic and position.
    pub spec: GeomSpec,
    /// Styling.
    pub options: StyleOptions,
}

impl RenderRequest {
    /// A request with default styling.
    #[must_use]
    pub fn new(data: Dataset, aes: Aes, spec: GeomSpec) -> Self {
        Self {
            data,
            aes,
            spec,
            options: StyleOptions::default(),
        }
    }

    /// Replace the styling.
    #[must_use]
    pub fn options(mut self, options: StyleOptions) -> Self {
        self.options = options;
        self
    }

    /// Render this request.
    ///
    /// # Errors
    ///
    /// Same as [`render`].
    pub fn render(&self) -> Result<Chart> {
        render(&self.data, &self.aes, &self.spec, &self.options)
    }
}

/// Render every request; results keep the request order and one failure
/// does not affect the others.
#[must_use]
pub fn render_all(requests: &[RenderRequest]) -> Vec<Result<Chart>> {
    tracing::debug!(count = requests.len(), "rendering batch");

    #[cfg(feature = "parallel")]
    {
        requests.par_iter().map(RenderRequest::render).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        requests.iter().map(RenderRequest::render).collect()
    }
}
