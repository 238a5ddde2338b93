//! Faceting.
//!
//! Splits the rows of a dataset into small multiples by one or two
//! categorical variables.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use super::data::{DataValue, Dataset};

/// Whether panels share position scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleMode {
    /// All panels share x and y.
    #[default]
    Fixed,
    /// Each panel has its own x and y.
    Free,
    /// Each panel has its own x.
    FreeX,
    /// Each panel has its own y.
    FreeY,
}

impl ScaleMode {
    /// Whether x is computed per panel.
    #[must_use]
    pub fn free_x(self) -> bool {
        matches!(self, ScaleMode::Free | ScaleMode::FreeX)
    }

    /// Whether y is computed per panel.
    #[must_use]
    pub fn free_y(self) -> bool {
        matches!(self, ScaleMode::Free | ScaleMode::FreeY)
    }
}

/// Faceting specification.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "FacetSpec")]
pub enum Facet {
    /// No faceting.
    #[default]
    None,
    /// Panels laid out by a row variable, a column variable, or both.
    Grid {
        /// Row variable.
        rows: Option<String>,
        /// Column variable.
        cols: Option<String>,
        /// Scale sharing.
        scales: ScaleMode,
    },
    /// Panels for one variable, wrapped into rows.
    Wrap {
        /// Variable to facet by.
        var: String,
        /// Number of columns (`None` = roughly square).
        ncol: Option<usize>,
        /// Scale sharing.
        scales: ScaleMode,
    },
}

/// Facet block as written in a style options file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FacetSpec {
    rows: Option<String>,
    cols: Option<String>,
    wrap: Option<String>,
    ncol: Option<usize>,
    scales: ScaleMode,
}

impl TryFrom<FacetSpec> for Facet {
    type Error = String;

    fn try_from(spec: FacetSpec) -> Result<Self, Self::Error> {
        match (spec.wrap, spec.rows, spec.cols) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => {
                Err("facet 'wrap' cannot be combined with 'rows' or 'cols'".to_string())
            }
            (Some(var), None, None) => Ok(Facet::Wrap {
                var,
                ncol: spec.ncol,
                scales: spec.scales,
            }),
            (None, None, None) => Ok(Facet::None),
            (None, rows, cols) => Ok(Facet::Grid {
                rows,
                cols,
                scales: spec.scales,
            }),
        }
    }
}

/// One facet cell before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct FacetCell {
    /// Layout row (0-based).
    pub row: usize,
    /// Layout column (0-based).
    pub col: usize,
    /// Strip labels (column variable level first, then row variable level).
    pub strip: Vec<String>,
    /// Dataset row indices that fall into this cell, in input order.
    pub rows: Vec<usize>,
}

impl Facet {
    /// No faceting.
    #[must_use]
    pub fn none() -> Self {
        Facet::None
    }

    /// Facet into a grid.
    #[must_use]
    pub fn grid(rows: Option<&str>, cols: Option<&str>) -> Self {
        Facet::Grid {
            rows: rows.map(ToString::to_string),
            cols: cols.map(ToString::to_string),
            scales: ScaleMode::Fixed,
        }
    }

    /// Facet with wrapping.
    #[must_use]
    pub fn wrap(var: &str) -> Self {
        Facet::Wrap {
            var: var.to_string(),
            ncol: None,
            scales: ScaleMode::Fixed,
        }
    }

    /// Set the column count of a wrap facet.
    #[must_use]
    pub fn ncol(mut self, n: usize) -> Self {
        if let Facet::Wrap { ref mut ncol, .. } = self {
            *ncol = Some(n.max(1));
        }
        self
    }

    /// Set scale sharing.
    #[must_use]
    pub fn scales(mut self, mode: ScaleMode) -> Self {
        match self {
            Facet::Grid { ref mut scales, .. } | Facet::Wrap { ref mut scales, .. } => {
                *scales = mode;
            }
            Facet::None => {}
        }
        self
    }

    /// Scale sharing mode.
    #[must_use]
    pub fn scale_mode(&self) -> ScaleMode {
        match self {
            Facet::Grid { scales, .. } | Facet::Wrap { scales, .. } => *scales,
            Facet::None => ScaleMode::Fixed,
        }
    }

    /// Variables the facet splits on.
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        match self {
            Facet::None => Vec::new(),
            Facet::Grid { rows, cols, .. } => {
                rows.iter().chain(cols.iter()).map(String::as_str).collect()
            }
            Facet::Wrap { var, .. } => vec![var.as_str()],
        }
    }

    /// Split `rows` of `data` into cells. Every variable must exist.
    ///
    /// Grid cells are the cartesian product of the row and column levels
    /// present; wrap cells follow the level order of the variable.
    #[must_use]
    pub fn split(&self, data: &Dataset, rows: &[usize]) -> Vec<FacetCell> {
        match self {
            Facet::None => vec![FacetCell {
                row: 0,
                col: 0,
                strip: Vec::new(),
                rows: rows.to_vec(),
            }],
            Facet::Grid {
                rows: row_var,
                cols: col_var,
                ..
            } => {
                let row_levels = present_levels(data, row_var.as_deref(), rows);
                let col_levels = present_levels(data, col_var.as_deref(), rows);
                let mut buckets: HashMap<(Option<String>, Option<String>), Vec<usize>> =
                    HashMap::new();
                for &r in rows {
                    let key = (
                        label(data, row_var.as_deref(), r),
                        label(data, col_var.as_deref(), r),
                    );
                    buckets.entry(key).or_default().push(r);
                }

                let mut cells = Vec::with_capacity(row_levels.len() * col_levels.len());
                for (ri, row_level) in row_levels.iter().enumerate() {
                    for (ci, col_level) in col_levels.iter().enumerate() {
                        let members = buckets
                            .get(&(row_level.clone(), col_level.clone()))
                            .cloned()
                            .unwrap_or_default();
                        let strip = col_level.iter().chain(row_level.iter()).cloned().collect();
                        cells.push(FacetCell {
                            row: ri,
                            col: ci,
                            strip,
                            rows: members,
                        });
                    }
                }
                cells
            }
            Facet::Wrap { var, ncol, .. } => {
                let levels = present_levels(data, Some(var.as_str()), rows);
                let n = levels.len();
                let ncol = ncol
                    .unwrap_or_else(|| (n as f32).sqrt().ceil() as usize)
                    .max(1);
                let mut buckets: HashMap<Option<String>, Vec<usize>> = HashMap::new();
                for &r in rows {
                    buckets
                        .entry(label(data, Some(var.as_str()), r))
                        .or_default()
                        .push(r);
                }

                levels
                    .into_iter()
                    .enumerate()
                    .map(|(i, level)| FacetCell {
                        row: i / ncol,
                        col: i % ncol,
                        rows: buckets.remove(&level).unwrap_or_default(),
                        strip: level.into_iter().collect(),
                    })
                    .collect()
            }
        }
    }
}

/// Label of `row` in `var`; `None` when there is no variable.
fn label(data: &Dataset, var: Option<&str>, row: usize) -> Option<String> {
    let var = var?;
    data.get(var)
        .and_then(|col| col.get(row))
        .map(DataValue::label)
}

/// Levels of `var` that occur among `rows`; `[None]` when there is no variable.
fn present_levels(data: &Dataset, var: Option<&str>, rows: &[usize]) -> Vec<Option<String>> {
    let Some(var) = var else {
        return vec![None];
    };
    let (Some(levels), Some(col)) = (data.levels(var), data.get(var)) else {
        return vec![None];
    };
    let present: HashSet<String> = rows
        .iter()
        .filter_map(|&r| col.get(r))
        .map(DataValue::label)
        .collect();
    levels
        .into_iter()
        .filter(|level| present.contains(level))
        .map(Some)
        .collect()
}
