//! Recipe dispatch.
//!
//! [`render`] validates a request, drops incomplete rows, splits the data
//! into facet panels and hands each panel to the encoder registered for the
//! geom. Encoders turn rows into [`Mark`]s; statistics that need estimation
//! are delegated to [`crate::estimate`], position adjustments to
//! [`super::position`].

use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::aes::{Aes, Channel};
use super::chart::{Chart, Legend, LegendEntry, LegendKind, Mark, Panel, PositionScale};
use super::coord::Coord;
use super::data::{DataValue, Dataset};
use super::facet::{Facet, FacetCell};
use super::geom::{GeomKind, GeomSpec, Linetype, PointShape};
use super::options::{Labels, StyleOptions};
use super::position::{self, Position, Span};
use super::stat::Stat;
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::estimate::{self, BoxStats};
use crate::palette::Palette;
use crate::scale::expand_continuous;

const GREY20: Rgba = Rgba::rgb(51, 51, 51);

/// Default point diameter in pixels.
const POINT_SIZE: f32 = 6.0;

/// Diameter range of a mapped size channel.
const SIZE_RANGE: (f32, f32) = (3.0, 12.0);

const DEFAULT_BINS: usize = 30;
const DENSITY_POINTS: usize = 512;
const VIOLIN_POINTS: usize = 128;

/// Encode `data` as a chart.
///
/// Requests are checked in a fixed order: empty dataset, unknown columns
/// (channel order, then facet variables), statistic compatibility, missing
/// required channels, and discrete/continuous mismatches. Rows with a
/// missing value in a positional or facet column are then dropped.
///
/// # Errors
///
/// - [`Error::EmptyDataset`] when the dataset has no rows, or none survive
///   missing-value filtering.
/// - [`Error::UnknownColumn`] naming the first column that does not exist.
/// - [`Error::IncompatibleStatistic`] when the statistic is not defined for
///   the geom.
/// - [`Error::MissingAesthetic`] when a required channel is not mapped.
/// - [`Error::ScaleDomain`] when a continuous channel maps a text column.
pub fn render(data: &Dataset, aes: &Aes, spec: &GeomSpec, options: &StyleOptions) -> Result<Chart> {
    if data.nrow() == 0 {
        return Err(Error::EmptyDataset);
    }
    check_columns(data, aes, &options.facet)?;
    if !spec.kind.supports(&spec.stat) {
        return Err(Error::IncompatibleStatistic {
            geom: spec.kind.name().to_string(),
            stat: spec.stat.name().to_string(),
        });
    }
    check_channels(aes, spec)?;
    check_domains(data, aes, spec)?;

    let rows = complete_rows(data, aes, &options.facet);
    if rows.is_empty() {
        return Err(Error::EmptyDataset);
    }

    let frame = Frame::new(data, aes, spec, options, &rows);
    let encode = encoder(spec.kind);
    let cells = options.facet.split(data, &rows);
    tracing::debug!(
        geom = spec.kind.name(),
        stat = spec.stat.name(),
        position = spec.position.name(),
        rows = rows.len(),
        panels = cells.len(),
        "dispatching recipe"
    );

    let drafts: Vec<(FacetCell, Vec<Mark>)> = cells
        .into_iter()
        .map(|cell| {
            let marks = encode(&frame, &cell.rows);
            (cell, marks)
        })
        .collect();

    let layout = drafts
        .iter()
        .fold((1, 1), |(r, c), (cell, _)| {
            (r.max(cell.row + 1), c.max(cell.col + 1))
        });
    let panels = frame.panels(drafts);

    let coord = if spec.kind == GeomKind::Pie {
        tracing::debug!("pie chart: using polar coordinates with theta = y");
        Coord::polar_y()
    } else {
        options.effective_coord()
    };

    Ok(Chart {
        geom: spec.kind,
        stat: spec.stat,
        position: spec.position,
        panels,
        layout,
        legends: frame.legends(),
        labels: frame.labels(),
        theme: options.theme.clone(),
        coord,
        axis_format: options.axis_label_format.clone(),
        legend_position: options.legend_position,
    })
}

// ============================================================================
// Validation
// ============================================================================

fn check_columns(data: &Dataset, aes: &Aes, facet: &Facet) -> Result<()> {
    let mapped = aes.mappings().map(|(_, column)| column);
    for column in mapped.chain(facet.variables()) {
        if !data.has_column(column) {
            return Err(Error::UnknownColumn(column.to_string()));
        }
    }
    Ok(())
}

fn check_channels(aes: &Aes, spec: &GeomSpec) -> Result<()> {
    for &channel in spec.kind.required_channels(&spec.stat) {
        let constant = channel == Channel::Label && aes.label_value.is_some();
        if !aes.is_mapped(channel) && !constant {
            return Err(Error::MissingAesthetic {
                geom: spec.kind.name().to_string(),
                channel: channel.name().to_string(),
            });
        }
    }
    Ok(())
}

fn check_domains(data: &Dataset, aes: &Aes, spec: &GeomSpec) -> Result<()> {
    let continuous_x = matches!(
        (spec.kind, spec.stat),
        (GeomKind::Histogram | GeomKind::Dotplot, Stat::Bin { .. })
            | (GeomKind::Density, Stat::Density { .. })
    );
    if continuous_x {
        if let Some(column) = aes.get(Channel::X).filter(|c| data.is_discrete(c)) {
            return Err(Error::ScaleDomain(format!(
                "{} with stat '{}' needs a continuous x, but '{column}' is discrete",
                spec.kind, spec.stat
            )));
        }
    }

    let vertical = [Channel::Y, Channel::Ymin, Channel::Ymax, Channel::Yend];
    if !spec.kind.allows_discrete_y() || matches!(spec.stat, Stat::Summary(_)) {
        for channel in vertical {
            if let Some(column) = aes.get(channel).filter(|c| data.is_discrete(c)) {
                return Err(Error::ScaleDomain(format!(
                    "{} needs a continuous {channel}, but '{column}' is discrete",
                    spec.kind
                )));
            }
        }
    }
    Ok(())
}

/// Rows with a value in every positional and facet column.
fn complete_rows(data: &Dataset, aes: &Aes, facet: &Facet) -> Vec<usize> {
    let mut required: Vec<(&str, bool)> = aes
        .mappings()
        .filter(|(channel, _)| channel.is_positional())
        .map(|(_, column)| (column, data.is_discrete(column)))
        .collect();
    required.extend(facet.variables().into_iter().map(|v| (v, true)));

    let columns: Vec<(&[DataValue], bool)> = required
        .iter()
        .filter_map(|(c, discrete)| data.get(c).map(|col| (col, *discrete)))
        .collect();

    let rows: Vec<usize> = (0..data.nrow())
        .filter(|&r| {
            columns.iter().all(|(col, discrete)| match col.get(r) {
                Some(DataValue::Null) | None => false,
                Some(v) if !discrete => v.as_f32().is_some_and(f32::is_finite),
                Some(_) => true,
            })
        })
        .collect();

    let dropped = data.nrow() - rows.len();
    if dropped > 0 {
        tracing::warn!(dropped, "removed rows containing missing values");
    }
    rows
}

// ============================================================================
// Dispatch table
// ============================================================================

type Encoder = fn(&Frame<'_>, &[usize]) -> Vec<Mark>;

fn encoder(kind: GeomKind) -> Encoder {
    match kind {
        GeomKind::Point => encode_point,
        GeomKind::Line => encode_line,
        GeomKind::Bar => encode_bar,
        GeomKind::Histogram => encode_histogram,
        GeomKind::Density => encode_density,
        GeomKind::Dotplot => encode_dotplot,
        GeomKind::Boxplot => encode_boxplot,
        GeomKind::Violin => encode_violin,
        GeomKind::Pie => encode_pie,
        GeomKind::Pointrange => encode_pointrange,
        GeomKind::Segment => encode_segment,
        GeomKind::Text => encode_text,
    }
}

// ============================================================================
// Per-request context
// ============================================================================

/// Levels of a discrete column, restricted to the rows being drawn.
#[derive(Debug, Clone)]
struct Levels<'a> {
    column: &'a str,
    levels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl<'a> Levels<'a> {
    fn present(data: &Dataset, column: &'a str, rows: &[usize]) -> Self {
        let all = data.levels(column).unwrap_or_default();
        let labels: HashSet<String> = data
            .get(column)
            .map(|col| {
                rows.iter()
                    .filter_map(|&r| col.get(r))
                    .map(DataValue::label)
                    .collect()
            })
            .unwrap_or_default();
        let levels: Vec<String> = all.into_iter().filter(|l| labels.contains(l)).collect();
        let positions = levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();
        Self {
            column,
            levels,
            positions,
        }
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    fn index(&self, data: &Dataset, row: usize) -> Option<usize> {
        let value = data.get(self.column)?.get(row)?;
        if value.is_null() {
            return None;
        }
        self.position(&value.label())
    }

    fn len(&self) -> usize {
        self.levels.len()
    }
}

#[derive(Debug, Clone)]
enum ColourMap<'a> {
    Constant(Rgba),
    Discrete {
        levels: Levels<'a>,
        colours: Vec<Rgba>,
    },
    Continuous {
        column: &'a str,
        range: (f32, f32),
        palette: Palette,
    },
}

impl<'a> ColourMap<'a> {
    fn build(
        data: &Dataset,
        column: Option<&'a str>,
        constant: Rgba,
        palette: &Palette,
        rows: &[usize],
    ) -> Self {
        let Some(column) = column else {
            return ColourMap::Constant(constant);
        };
        if data.is_discrete(column) {
            let levels = Levels::present(data, column, rows);
            let colours = palette.discrete(levels.len());
            return ColourMap::Discrete { levels, colours };
        }
        let range = numeric_extent(data, column, rows).unwrap_or((0.0, 1.0));
        ColourMap::Continuous {
            column,
            range,
            palette: palette.clone(),
        }
    }

    fn get(&self, data: &Dataset, row: usize) -> Rgba {
        match self {
            ColourMap::Constant(c) => *c,
            ColourMap::Discrete { levels, colours } => levels
                .index(data, row)
                .and_then(|i| colours.get(i).copied())
                .unwrap_or(Rgba::GREY35),
            ColourMap::Continuous {
                column,
                range,
                palette,
            } => {
                let value = data
                    .get(column)
                    .and_then(|c| c.get(row))
                    .and_then(DataValue::as_f32);
                value.map_or(Rgba::GREY35, |v| palette.continuous(unit(v, *range)))
            }
        }
    }

    fn legend(&self) -> Option<LegendKind> {
        match self {
            ColourMap::Constant(_) => None,
            ColourMap::Discrete { levels, colours } => Some(LegendKind::Discrete(
                levels
                    .levels
                    .iter()
                    .zip(colours)
                    .map(|(label, colour)| LegendEntry {
                        label: label.clone(),
                        colour: *colour,
                        shape: None,
                        linetype: None,
                    })
                    .collect(),
            )),
            ColourMap::Continuous { range, palette, .. } => Some(LegendKind::Continuous {
                min: range.0,
                max: range.1,
                stops: (0..5).map(|i| palette.continuous(i as f32 / 4.0)).collect(),
            }),
        }
    }
}

/// A numeric channel mapped to a column (size, alpha).
#[derive(Debug, Clone)]
enum Ramp<'a> {
    Continuous { column: &'a str, range: (f32, f32) },
    Discrete(Levels<'a>),
}

impl<'a> Ramp<'a> {
    fn build(data: &Dataset, column: Option<&'a str>, rows: &[usize]) -> Option<Self> {
        let column = column?;
        if data.is_discrete(column) {
            return Some(Ramp::Discrete(Levels::present(data, column, rows)));
        }
        let range = numeric_extent(data, column, rows).unwrap_or((0.0, 1.0));
        Some(Ramp::Continuous { column, range })
    }

    /// Position of the row along the ramp, 0..1.
    fn t(&self, data: &Dataset, row: usize) -> f32 {
        match self {
            Ramp::Continuous { column, range } => data
                .get(column)
                .and_then(|c| c.get(row))
                .and_then(DataValue::as_f32)
                .map_or(0.5, |v| unit(v, *range)),
            Ramp::Discrete(levels) => match (levels.index(data, row), levels.len()) {
                (Some(i), n) if n > 1 => i as f32 / (n - 1) as f32,
                _ => 0.5,
            },
        }
    }
}

fn unit(value: f32, (min, max): (f32, f32)) -> f32 {
    if (max - min).abs() < f32::EPSILON {
        0.5
    } else {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    }
}

fn numeric_extent(data: &Dataset, column: &str, rows: &[usize]) -> Option<(f32, f32)> {
    let col = data.get(column)?;
    let values: Vec<f32> = rows
        .iter()
        .filter_map(|&r| col.get(r))
        .filter_map(DataValue::as_f32)
        .collect();
    estimate::extent(&values)
}

/// Aggregated value at one x for one group.
#[derive(Debug, Clone, Copy)]
struct Agg {
    x: f32,
    y: f32,
    ymin: f32,
    ymax: f32,
    group: usize,
    /// First contributing row, used for styling.
    row: usize,
    n: usize,
}

/// Everything the encoders need, resolved once per request.
struct Frame<'a> {
    data: &'a Dataset,
    aes: &'a Aes,
    spec: &'a GeomSpec,
    options: &'a StyleOptions,
    x_levels: Option<Levels<'a>>,
    y_levels: Option<Levels<'a>>,
    colour: ColourMap<'a>,
    fill: ColourMap<'a>,
    shape: Option<Levels<'a>>,
    linetype: Option<Levels<'a>>,
    size: Option<Ramp<'a>>,
    alpha: Option<Ramp<'a>>,
    /// Group index per dataset row.
    groups: Vec<usize>,
    /// Extent of x over every drawn row.
    x_range: Option<(f32, f32)>,
}

impl<'a> Frame<'a> {
    fn new(
        data: &'a Dataset,
        aes: &'a Aes,
        spec: &'a GeomSpec,
        options: &'a StyleOptions,
        rows: &[usize],
    ) -> Self {
        let present = |channel: Channel| aes.get(channel).map(|c| Levels::present(data, c, rows));
        let discrete = |channel: Channel| {
            aes.get(channel)
                .filter(|c| data.is_discrete(c))
                .map(|c| Levels::present(data, c, rows))
        };
        let palette = &options.palette;
        let kind = spec.kind;

        let colour = ColourMap::build(
            data,
            aes.get(Channel::Colour),
            aes.colour_value.unwrap_or(default_colour(kind)),
            palette,
            rows,
        );
        let fill = ColourMap::build(
            data,
            aes.get(Channel::Fill),
            aes.fill_value.unwrap_or(default_fill(kind)),
            palette,
            rows,
        );

        let x_range = aes
            .get(Channel::X)
            .and_then(|c| numeric_extent(data, c, rows));

        let mut frame = Self {
            data,
            aes,
            spec,
            options,
            x_levels: discrete(Channel::X),
            y_levels: discrete(Channel::Y),
            colour,
            fill,
            shape: present(Channel::Shape),
            linetype: present(Channel::Linetype),
            size: Ramp::build(data, aes.get(Channel::Size), rows),
            alpha: Ramp::build(data, aes.get(Channel::Alpha), rows),
            groups: vec![0; data.nrow()],
            x_range,
        };
        frame.groups = frame.assign_groups(rows);
        frame
    }

    /// Interaction of every discrete grouping column, numbered in level order.
    fn assign_groups(&self, rows: &[usize]) -> Vec<usize> {
        let mut columns: Vec<&str> = Vec::new();
        for channel in [
            Channel::Group,
            Channel::Colour,
            Channel::Fill,
            Channel::Shape,
            Channel::Linetype,
        ] {
            if let Some(column) = self.aes.get(channel).filter(|c| self.data.is_discrete(c)) {
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
        }
        let mut groups = vec![0; self.data.nrow()];
        if columns.is_empty() {
            return groups;
        }

        let levels: Vec<Levels<'_>> = columns
            .iter()
            .map(|c| Levels::present(self.data, c, rows))
            .collect();
        let keys: Vec<Vec<usize>> = rows
            .iter()
            .map(|&r| {
                levels
                    .iter()
                    .map(|l| l.index(self.data, r).unwrap_or(usize::MAX))
                    .collect()
            })
            .collect();
        let mut distinct = keys.clone();
        distinct.sort();
        distinct.dedup();
        for (&row, key) in rows.iter().zip(&keys) {
            groups[row] = distinct.binary_search(key).unwrap_or(0);
        }
        groups
    }

    // ---- value lookup ------------------------------------------------------

    /// Position of a positional channel in data units. Discrete levels sit
    /// at `1..=n`; `xend`/`yend` share the x/y levels.
    fn pos(&self, channel: Channel, row: usize) -> Option<f32> {
        let levels = match channel {
            Channel::X | Channel::Xend => self.x_levels.as_ref(),
            Channel::Y | Channel::Ymin | Channel::Ymax | Channel::Yend => self.y_levels.as_ref(),
            _ => None,
        };
        let column = self.aes.get(channel)?;
        match levels {
            Some(levels) => {
                let value = self.data.get(column)?.get(row)?;
                levels.position(&value.label()).map(|i| i as f32 + 1.0)
            }
            None => self.data.get(column)?.get(row)?.as_f32(),
        }
    }

    /// X position, or the single band at 1 when x is not mapped.
    fn x_or_one(&self, row: usize) -> f32 {
        if self.aes.is_mapped(Channel::X) {
            self.pos(Channel::X, row).unwrap_or(f32::NAN)
        } else {
            1.0
        }
    }

    fn values(&self, channel: Channel, rows: &[usize]) -> Vec<f32> {
        rows.iter().filter_map(|&r| self.pos(channel, r)).collect()
    }

    // ---- styling -------------------------------------------------------------

    fn alpha(&self, row: usize) -> f32 {
        match &self.alpha {
            Some(ramp) => 0.1 + 0.9 * ramp.t(self.data, row),
            None => self.aes.alpha_value.or(self.options.alpha).unwrap_or(1.0),
        }
    }

    /// Stroke colour of point-like marks, alpha applied.
    fn stroke(&self, row: usize) -> Rgba {
        let colour = self.colour.get(self.data, row);
        colour.with_opacity(self.alpha(row))
    }

    /// Fill of areas (bars, boxes, densities), alpha applied.
    fn area_fill(&self, row: usize) -> Rgba {
        let fill = self.fill.get(self.data, row);
        fill.with_alpha((f32::from(fill.a) * self.alpha(row)).round() as u8)
    }

    /// Outline of areas: only drawn when given, except for geoms that
    /// always outline.
    fn outline(&self, row: usize) -> Option<Rgba> {
        let given = self.aes.is_mapped(Channel::Colour) || self.aes.colour_value.is_some();
        let always = matches!(
            self.spec.kind,
            GeomKind::Boxplot | GeomKind::Violin | GeomKind::Density
        );
        (given || always).then(|| self.colour.get(self.data, row))
    }

    /// Fill of point symbols: the stroke colour unless fill is given.
    fn point_fill(&self, row: usize) -> Rgba {
        if self.aes.is_mapped(Channel::Fill) || self.aes.fill_value.is_some() {
            self.fill.get(self.data, row).with_opacity(self.alpha(row))
        } else {
            self.stroke(row)
        }
    }

    fn size(&self, row: usize, default: f32) -> f32 {
        match &self.size {
            Some(ramp) => {
                // Area-proportional
                let (lo, hi) = (SIZE_RANGE.0 * SIZE_RANGE.0, SIZE_RANGE.1 * SIZE_RANGE.1);
                (lo + (hi - lo) * ramp.t(self.data, row)).sqrt()
            }
            None => self.aes.size_value.or(self.options.size).unwrap_or(default),
        }
    }

    fn shape(&self, row: usize) -> PointShape {
        match self.shape.as_ref().and_then(|l| l.index(self.data, row)) {
            Some(i) => PointShape::SEQUENCE[i % PointShape::SEQUENCE.len()],
            None => self.aes.shape_value.unwrap_or(self.spec.params.shape),
        }
    }

    fn linetype(&self, row: usize) -> Linetype {
        match self.linetype.as_ref().and_then(|l| l.index(self.data, row)) {
            Some(i) => Linetype::SEQUENCE[i % Linetype::SEQUENCE.len()],
            None => self.aes.linetype_value.unwrap_or_default(),
        }
    }

    fn linewidth(&self, row: usize) -> f32 {
        if self.size.is_some() {
            self.size(row, self.spec.params.linewidth) / 3.0
        } else {
            self.spec.params.linewidth
        }
    }

    // ---- geometry helpers ----------------------------------------------------

    /// Smallest gap between distinct x positions (1 for discrete x).
    fn resolution(&self) -> f32 {
        if self.x_levels.is_some() || !self.aes.is_mapped(Channel::X) {
            return 1.0;
        }
        let Some(column) = self.aes.get(Channel::X) else {
            return 1.0;
        };
        let mut xs = self.data.get_f32(column).unwrap_or_default();
        xs.retain(|v| v.is_finite());
        xs.sort_by(f32::total_cmp);
        xs.dedup();
        xs.windows(2)
            .map(|w| w[1] - w[0])
            .filter(|d| *d > 0.0)
            .reduce(f32::min)
            .unwrap_or(1.0)
    }

    /// Width of a bar or box in data units.
    fn band(&self) -> f32 {
        let fraction = match (self.spec.params.width, self.options.width) {
            (None, Some(w)) => w,
            _ => self.spec.band_width(),
        };
        fraction * self.resolution()
    }

    /// Rows split by `(x, group)`, sorted by x then group. Ties keep input
    /// order within each part.
    fn partition(&self, rows: &[usize]) -> Vec<(f32, usize, Vec<usize>)> {
        let mut parts: Vec<(f32, usize, Vec<usize>)> = Vec::new();
        let mut index: HashMap<(u32, usize), usize> = HashMap::new();
        for &r in rows {
            let (x, group) = (self.x_or_one(r), self.groups[r]);
            match index.entry((position::x_key(x), group)) {
                Entry::Occupied(slot) => parts[*slot.get()].2.push(r),
                Entry::Vacant(slot) => {
                    slot.insert(parts.len());
                    parts.push((x, group, vec![r]));
                }
            }
        }
        parts.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        parts
    }

    /// Apply the statistic for geoms that draw one value per x and group.
    fn aggregate(&self, rows: &[usize]) -> Vec<Agg> {
        match self.spec.stat {
            Stat::Count => self
                .partition(rows)
                .into_iter()
                .map(|(x, group, members)| {
                    let n = members.len() as f32;
                    Agg {
                        x,
                        y: n,
                        ymin: n,
                        ymax: n,
                        group,
                        row: members[0],
                        n: members.len(),
                    }
                })
                .collect(),
            Stat::Summary(fun) => self
                .partition(rows)
                .into_iter()
                .filter_map(|(x, group, members)| {
                    let s = estimate::summarise(&self.values(Channel::Y, &members), fun)?;
                    Some(Agg {
                        x,
                        y: s.y,
                        ymin: s.ymin,
                        ymax: s.ymax,
                        group,
                        row: members[0],
                        n: members.len(),
                    })
                })
                .collect(),
            _ => rows
                .iter()
                .filter_map(|&r| {
                    let y = self.pos(Channel::Y, r)?;
                    Some(Agg {
                        x: self.x_or_one(r),
                        y,
                        ymin: self.pos(Channel::Ymin, r).unwrap_or(y),
                        ymax: self.pos(Channel::Ymax, r).unwrap_or(y),
                        group: self.groups[r],
                        row: r,
                        n: 1,
                    })
                })
                .collect(),
        }
    }

    /// Position-adjusted `(x, y)` for point-like marks.
    fn place(&self, aggs: &[Agg]) -> Vec<(f32, f32)> {
        match self.spec.position {
            Position::Identity => aggs.iter().map(|a| (a.x, a.y)).collect(),
            Position::Jitter {
                width,
                height,
                seed,
            } => {
                let res = self.resolution();
                position::jitter_offsets(aggs.len(), width * res, height, seed)
                    .into_iter()
                    .zip(aggs)
                    .map(|((dx, dy), a)| (a.x + dx, a.y + dy))
                    .collect()
            }
            Position::Dodge { width } => {
                let keys: Vec<(f32, usize)> = aggs.iter().map(|a| (a.x, a.group)).collect();
                let (slots, n) = position::dodge_slots(&keys);
                let band = width.unwrap_or_else(|| self.band());
                aggs.iter()
                    .zip(slots)
                    .map(|(a, slot)| (a.x + position::dodge_offset(slot, n, band).0, a.y))
                    .collect()
            }
            Position::Stack | Position::Fill => {
                let mut spans: Vec<Span> =
                    aggs.iter().map(|a| span(a.x, 0.0, a.y, a.group)).collect();
                self.adjust(&mut spans);
                spans.iter().map(|s| (s.x, s.ymax)).collect()
            }
        }
    }

    fn adjust(&self, spans: &mut [Span]) {
        match self.spec.position {
            Position::Stack => position::stack(spans),
            Position::Fill => position::fill(spans),
            Position::Dodge { width } => position::dodge(spans, width),
            Position::Identity | Position::Jitter { .. } => {}
        }
    }

    /// Spans become rectangles, styled by their source rows.
    fn rects(&self, mut spans: Vec<Span>, rows: &[usize]) -> Vec<Mark> {
        self.adjust(&mut spans);
        spans
            .iter()
            .zip(rows)
            .map(|(s, &row)| Mark::Rect {
                xmin: s.x - s.width / 2.0,
                xmax: s.x + s.width / 2.0,
                ymin: s.ymin,
                ymax: s.ymax,
                fill: self.area_fill(row),
                colour: self.outline(row),
            })
            .collect()
    }

    /// Bins of the group's x values over the shared range.
    fn bins(&self, rows: &[usize]) -> Vec<estimate::Bin> {
        let bins = match self.spec.stat {
            Stat::Bin { bins } => bins.unwrap_or(DEFAULT_BINS),
            _ => DEFAULT_BINS,
        };
        let range = self.x_range.unwrap_or((0.0, 1.0));
        estimate::bin(&self.values(Channel::X, rows), range, bins)
    }

    /// Rows of each group present, in group order.
    fn by_group(&self, rows: &[usize]) -> Vec<(usize, Vec<usize>)> {
        let mut out: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for &r in rows {
            out.entry(self.groups[r]).or_default().push(r);
        }
        out.into_iter().collect()
    }

    // ---- panel assembly ----------------------------------------------------

    fn panels(&self, drafts: Vec<(FacetCell, Vec<Mark>)>) -> Vec<Panel> {
        let mode = self.options.facet.scale_mode();
        let polar = self.spec.kind == GeomKind::Pie || self.options.effective_coord().is_polar();
        let (xlim, ylim) = self.options.effective_coord().limits();

        let extents: Vec<Option<(f32, f32, f32, f32)>> = drafts
            .iter()
            .map(|(_, marks)| marks_extent(marks))
            .collect();
        let global = union(extents.iter().flatten().copied());

        drafts
            .into_iter()
            .zip(extents)
            .map(|((cell, marks), local)| {
                let xe = local.filter(|_| mode.free_x()).or(global);
                let ye = local.filter(|_| mode.free_y()).or(global);
                let x = self.scale(self.x_levels.as_ref(), xe.map(|e| (e.0, e.1)), xlim, polar);
                let y = self.scale(self.y_levels.as_ref(), ye.map(|e| (e.2, e.3)), ylim, polar);
                Panel {
                    row: cell.row,
                    col: cell.col,
                    strip: cell.strip,
                    marks,
                    x,
                    y,
                }
            })
            .collect()
    }

    fn scale(
        &self,
        levels: Option<&Levels<'_>>,
        extent: Option<(f32, f32)>,
        limit: Option<(f32, f32)>,
        polar: bool,
    ) -> PositionScale {
        if let Some(levels) = levels {
            return PositionScale::Discrete {
                levels: levels.levels.clone(),
            };
        }
        let (min, max) = match (limit, extent) {
            (Some(l), _) => l,
            (None, Some((lo, hi))) if polar && hi > lo => (lo, hi),
            (None, Some((lo, hi))) => expand_continuous(lo, hi),
            (None, None) => (0.0, 1.0),
        };
        PositionScale::Continuous { min, max }
    }

    // ---- legends and labels ------------------------------------------------

    fn legends(&self) -> Vec<Legend> {
        let mut legends: Vec<(&str, Legend)> = Vec::new();

        let colour_maps = [(Channel::Colour, &self.colour), (Channel::Fill, &self.fill)];
        for (channel, map) in colour_maps {
            let (Some(column), Some(kind)) = (self.aes.get(channel), map.legend()) else {
                continue;
            };
            match legends.iter_mut().find(|(c, _)| *c == column) {
                Some((_, legend)) => legend.channels.push(channel),
                None => legends.push((
                    column,
                    Legend {
                        title: self.legend_title(channel, column),
                        channels: vec![channel],
                        kind,
                    },
                )),
            }
        }

        let keyed_levels = [
            (Channel::Shape, &self.shape),
            (Channel::Linetype, &self.linetype),
        ];
        for (channel, levels) in keyed_levels {
            let Some(levels) = levels else {
                continue;
            };
            let key = |i: usize| match channel {
                Channel::Shape => (
                    Some(PointShape::SEQUENCE[i % PointShape::SEQUENCE.len()]),
                    None,
                ),
                _ => (
                    None,
                    Some(Linetype::SEQUENCE[i % Linetype::SEQUENCE.len()]),
                ),
            };
            match legends.iter_mut().find(|(c, _)| *c == levels.column) {
                Some((_, legend)) => {
                    legend.channels.push(channel);
                    if let LegendKind::Discrete(entries) = &mut legend.kind {
                        for (i, entry) in entries.iter_mut().enumerate() {
                            let (shape, linetype) = key(i);
                            entry.shape = shape.or(entry.shape);
                            entry.linetype = linetype.or(entry.linetype);
                        }
                    }
                }
                None => {
                    let entries = levels
                        .levels
                        .iter()
                        .enumerate()
                        .map(|(i, label)| {
                            let (shape, linetype) = key(i);
                            LegendEntry {
                                label: label.clone(),
                                colour: default_colour(self.spec.kind),
                                shape,
                                linetype,
                            }
                        })
                        .collect();
                    legends.push((
                        levels.column,
                        Legend {
                            title: levels.column.to_string(),
                            channels: vec![channel],
                            kind: LegendKind::Discrete(entries),
                        },
                    ));
                }
            }
        }

        if legends.is_empty() && self.spec.kind == GeomKind::Pie {
            if let Some(levels) = &self.x_levels {
                let colours = self.options.palette.discrete(levels.len());
                let entries = levels
                    .levels
                    .iter()
                    .zip(colours)
                    .map(|(label, colour)| LegendEntry {
                        label: label.clone(),
                        colour,
                        shape: None,
                        linetype: None,
                    })
                    .collect();
                legends.push((
                    levels.column,
                    Legend {
                        title: self.legend_title(Channel::Fill, levels.column),
                        channels: vec![Channel::Fill],
                        kind: LegendKind::Discrete(entries),
                    },
                ));
            }
        }

        legends.into_iter().map(|(_, legend)| legend).collect()
    }

    fn legend_title(&self, channel: Channel, column: &str) -> String {
        let labels = &self.options.labels;
        let custom = match channel {
            Channel::Colour => labels.colour.as_ref(),
            Channel::Fill => labels.fill.as_ref(),
            _ => None,
        };
        custom.cloned().unwrap_or_else(|| column.to_string())
    }

    fn labels(&self) -> Labels {
        let mut labels = self.options.labels.clone();
        if labels.x.is_none() {
            labels.x = self.aes.get(Channel::X).map(str::to_string);
        }
        if labels.y.is_none() {
            labels.y = match self.spec.stat {
                Stat::Count | Stat::Bin { .. } => Some("count".to_string()),
                Stat::Density { .. } => Some("density".to_string()),
                _ => self.aes.get(Channel::Y).map(str::to_string),
            };
        }
        labels
    }
}

fn span(x: f32, width: f32, height: f32, group: usize) -> Span {
    Span {
        x,
        width,
        ymin: 0.0,
        ymax: height,
        group,
    }
}

fn union(extents: impl Iterator<Item = (f32, f32, f32, f32)>) -> Option<(f32, f32, f32, f32)> {
    extents.reduce(|a, b| (a.0.min(b.0), a.1.max(b.1), a.2.min(b.2), a.3.max(b.3)))
}

fn marks_extent(marks: &[Mark]) -> Option<(f32, f32, f32, f32)> {
    union(marks.iter().filter_map(Mark::extent))
}

fn default_colour(kind: GeomKind) -> Rgba {
    match kind {
        GeomKind::Boxplot | GeomKind::Violin => GREY20,
        _ => Rgba::BLACK,
    }
}

fn default_fill(kind: GeomKind) -> Rgba {
    match kind {
        GeomKind::Bar | GeomKind::Histogram | GeomKind::Pie => Rgba::GREY35,
        GeomKind::Boxplot | GeomKind::Violin => Rgba::WHITE,
        GeomKind::Density => Rgba::TRANSPARENT,
        _ => Rgba::BLACK,
    }
}

// ============================================================================
// Encoders
// ============================================================================

fn encode_point(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let aggs = f.aggregate(rows);
    f.place(&aggs)
        .into_iter()
        .zip(&aggs)
        .map(|((x, y), a)| Mark::Point {
            x,
            y,
            colour: f.stroke(a.row),
            fill: f.point_fill(a.row),
            size: f.size(a.row, POINT_SIZE),
            shape: f.shape(a.row),
        })
        .collect()
}

fn encode_line(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let aggs = f.aggregate(rows);
    let placed = f.place(&aggs);

    // group -> (first row, points)
    let mut paths: BTreeMap<usize, (usize, Vec<(f32, f32)>)> = BTreeMap::new();
    for (a, point) in aggs.iter().zip(placed) {
        paths
            .entry(a.group)
            .or_insert_with(|| (a.row, Vec::new()))
            .1
            .push(point);
    }

    paths
        .into_values()
        .map(|(row, mut points)| {
            // Stable: equal x keeps input order
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            Mark::Path {
                points,
                colour: f.stroke(row),
                width: f.linewidth(row),
                linetype: f.linetype(row),
            }
        })
        .collect()
}

fn encode_bar(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let aggs = f.aggregate(rows);
    let band = f.band();
    let spans = aggs.iter().map(|a| span(a.x, band, a.y, a.group)).collect();
    let sources: Vec<usize> = aggs.iter().map(|a| a.row).collect();
    f.rects(spans, &sources)
}

fn encode_histogram(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    if !matches!(f.spec.stat, Stat::Bin { .. }) {
        return encode_bar(f, rows);
    }
    let mut spans = Vec::new();
    let mut sources = Vec::new();
    for (group, members) in f.by_group(rows) {
        for b in f.bins(&members) {
            spans.push(span(b.center(), b.x1 - b.x0, b.count as f32, group));
            sources.push(members[0]);
        }
    }
    f.rects(spans, &sources)
}

fn encode_density(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    f.by_group(rows)
        .into_iter()
        .filter_map(|(_, members)| {
            let curve = match f.spec.stat {
                Stat::Density { bandwidth } => {
                    estimate::kde(&f.values(Channel::X, &members), bandwidth, DENSITY_POINTS)
                }
                _ => {
                    let mut pts: Vec<(f32, f32)> = members
                        .iter()
                        .filter_map(|&r| Some((f.pos(Channel::X, r)?, f.pos(Channel::Y, r)?)))
                        .collect();
                    pts.sort_by(|a, b| a.0.total_cmp(&b.0));
                    pts
                }
            };
            let (first, last) = (curve.first()?.0, curve.last()?.0);
            let mut points = curve;
            points.push((last, 0.0));
            points.push((first, 0.0));
            let row = members[0];
            Some(Mark::Polygon {
                points,
                fill: f.area_fill(row),
                colour: f.outline(row),
            })
        })
        .collect()
}

fn encode_dotplot(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let dot = |x: f32, k: usize, row: usize| Mark::Point {
        x,
        y: k as f32 + 0.5,
        colour: f.stroke(row),
        fill: f.point_fill(row),
        size: f.size(row, POINT_SIZE),
        shape: PointShape::Circle,
    };

    let mut marks = Vec::new();
    if matches!(f.spec.stat, Stat::Bin { .. }) {
        let mut heights: Vec<usize> = Vec::new();
        for (_, members) in f.by_group(rows) {
            let bins = f.bins(&members);
            heights.resize(heights.len().max(bins.len()), 0);
            for (i, b) in bins.iter().enumerate() {
                for _ in 0..b.count {
                    marks.push(dot(b.center(), heights[i], members[0]));
                    heights[i] += 1;
                }
            }
        }
    } else {
        let mut heights: HashMap<u32, usize> = HashMap::new();
        for a in f.aggregate(rows) {
            let height = heights.entry(position::x_key(a.x)).or_insert(0);
            let base = *height;
            *height += a.n;
            marks.extend((0..a.n).map(|k| dot(a.x, base + k, a.row)));
        }
    }
    marks
}

/// `(x, width)` of each partition after dodging.
fn dodged(f: &Frame<'_>, parts: &[(f32, usize, Vec<usize>)]) -> Vec<(f32, f32)> {
    let band = f.band();
    match f.spec.position {
        Position::Dodge { width } => {
            let keys: Vec<(f32, usize)> = parts.iter().map(|(x, g, _)| (*x, *g)).collect();
            let (slots, n) = position::dodge_slots(&keys);
            let total = width.unwrap_or(band);
            parts
                .iter()
                .zip(slots)
                .map(|((x, _, _), slot)| {
                    let (dx, w) = position::dodge_offset(slot, n, total);
                    (x + dx, w)
                })
                .collect()
        }
        _ => parts.iter().map(|(x, _, _)| (*x, band)).collect(),
    }
}

fn encode_boxplot(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let parts = f.partition(rows);
    let placed = dodged(f, &parts);
    parts
        .iter()
        .zip(placed)
        .filter_map(|((_, _, members), (x, width))| {
            let BoxStats {
                lower,
                q1,
                median,
                q3,
                upper,
                outliers,
            } = estimate::box_stats(&f.values(Channel::Y, members))?;
            let row = members[0];
            Some(Mark::Box {
                x,
                width,
                lower,
                q1,
                median,
                q3,
                upper,
                outliers,
                fill: f.area_fill(row),
                colour: f.colour.get(f.data, row),
            })
        })
        .collect()
}

fn encode_violin(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let bandwidth = match f.spec.stat {
        Stat::YDensity { bandwidth } => bandwidth,
        _ => None,
    };
    let parts = f.partition(rows);
    let placed = dodged(f, &parts);
    let curves: Vec<Vec<(f32, f32)>> = parts
        .iter()
        .map(|(_, _, members)| {
            estimate::kde(&f.values(Channel::Y, members), bandwidth, VIOLIN_POINTS)
        })
        .collect();
    // Equal-area violins share one density scale
    let peak = curves
        .iter()
        .flatten()
        .map(|(_, d)| *d)
        .fold(0.0f32, f32::max);

    parts
        .iter()
        .zip(placed)
        .zip(curves)
        .filter(|(_, curve)| !curve.is_empty())
        .map(|(((_, _, members), (x, width)), curve)| {
            let scale = if peak > 0.0 { width / 2.0 / peak } else { 0.0 };
            let half = |d: f32| d * scale;
            let mut points: Vec<(f32, f32)> =
                curve.iter().map(|&(y, d)| (x + half(d), y)).collect();
            points.extend(curve.iter().rev().map(|&(y, d)| (x - half(d), y)));
            let row = members[0];
            Mark::Polygon {
                points,
                fill: f.area_fill(row),
                colour: f.outline(row),
            }
        })
        .collect()
}

fn encode_pie(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    // Slices follow fill, then colour, then a discrete x
    let slice_map: Option<(&ColourMap<'_>, &Levels<'_>)> = [&f.fill, &f.colour]
        .into_iter()
        .find_map(|m| match m {
            ColourMap::Discrete { levels, .. } => Some((m, levels)),
            _ => None,
        });
    let palette = &f.options.palette;
    let x_colours = f.x_levels.as_ref().map(|l| (l, palette.discrete(l.len())));

    let slice_of = |row: usize| -> (usize, Rgba) {
        if let Some((map, levels)) = slice_map {
            return (levels.index(f.data, row).unwrap_or(0), map.get(f.data, row));
        }
        if let Some((levels, colours)) = &x_colours {
            let i = levels.index(f.data, row).unwrap_or(0);
            return (i, colours.get(i).copied().unwrap_or(Rgba::GREY35));
        }
        (0, f.fill.get(f.data, row))
    };

    // (slice, value, fill)
    let mut slices: Vec<(usize, f32, Rgba)> = Vec::new();
    match f.spec.stat {
        Stat::Count => {
            let mut counts: BTreeMap<usize, (f32, Rgba)> = BTreeMap::new();
            for &r in rows {
                let (slice, fill) = slice_of(r);
                counts.entry(slice).or_insert((0.0, fill)).0 += 1.0;
            }
            slices.extend(counts.into_iter().map(|(s, (n, fill))| (s, n, fill)));
        }
        _ => {
            for &r in rows {
                if let Some(y) = f.pos(Channel::Y, r) {
                    let (slice, fill) = slice_of(r);
                    slices.push((slice, y.max(0.0), fill));
                }
            }
        }
    }

    let mut spans: Vec<Span> = slices
        .iter()
        .map(|(s, v, _)| span(1.0, 1.0, *v, *s))
        .collect();
    position::stack(&mut spans);
    let alpha = f.aes.alpha_value.or(f.options.alpha).unwrap_or(1.0);
    spans
        .iter()
        .zip(&slices)
        .map(|(s, (_, _, fill))| Mark::Rect {
            xmin: 0.5,
            xmax: 1.5,
            ymin: s.ymin,
            ymax: s.ymax,
            fill: fill.with_alpha((f32::from(fill.a) * alpha).round() as u8),
            colour: f.aes.colour_value,
        })
        .collect()
}

fn encode_pointrange(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let aggs = f.aggregate(rows);
    f.place(&aggs)
        .into_iter()
        .zip(&aggs)
        .map(|((x, y), a)| {
            let dy = y - a.y;
            Mark::Range {
                x,
                y,
                ymin: a.ymin + dy,
                ymax: a.ymax + dy,
                colour: f.stroke(a.row),
                size: f.size(a.row, POINT_SIZE),
            }
        })
        .collect()
}

fn encode_segment(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    rows.iter()
        .filter_map(|&r| {
            Some(Mark::Segment {
                x: f.pos(Channel::X, r)?,
                y: f.pos(Channel::Y, r)?,
                xend: f.pos(Channel::Xend, r)?,
                yend: f.pos(Channel::Yend, r)?,
                colour: f.stroke(r),
                width: f.linewidth(r),
                linetype: f.linetype(r),
            })
        })
        .collect()
}

fn encode_text(f: &Frame<'_>, rows: &[usize]) -> Vec<Mark> {
    let aggs = f.aggregate(rows);
    let label_of = |a: &Agg| -> String {
        if matches!(f.spec.stat, Stat::Count) {
            return a.n.to_string();
        }
        f.aes
            .get(Channel::Label)
            .and_then(|c| f.data.get(c))
            .and_then(|col| col.get(a.row))
            .map(DataValue::label)
            .or_else(|| f.aes.label_value.clone())
            .unwrap_or_default()
    };
    f.place(&aggs)
        .into_iter()
        .zip(&aggs)
        .map(|((x, y), a)| Mark::Text {
            x,
            y,
            label: label_of(a),
            colour: f.stroke(a.row),
            size: f.size(a.row, f.options.theme.base_size),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn species() -> Dataset {
        Dataset::new()
            .with_column("species", ["A", "A", "B"])
            .unwrap()
            .with_column("value", [1.0f32, 2.0, 3.0])
            .unwrap()
    }

    fn rects(chart: &Chart) -> Vec<(f32, f32, f32, f32)> {
        chart
            .marks()
            .filter_map(|m| match m {
                Mark::Rect {
                    xmin,
                    xmax,
                    ymin,
                    ymax,
                    ..
                } => Some((*xmin, *xmax, *ymin, *ymax)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_identity_bars_stack_per_row() {
        let aes = Aes::new().x("species").y("value");
        let chart = render(&species(), &aes, &GeomSpec::col(), &StyleOptions::new()).unwrap();
        let r = rects(&chart);
        assert_eq!(r.len(), 3);
        assert_relative_eq!((r[0].0 + r[0].1) / 2.0, 1.0);
        assert_eq!((r[0].2, r[0].3), (0.0, 1.0));
        assert_eq!((r[1].2, r[1].3), (1.0, 3.0));
        assert_relative_eq!((r[2].0 + r[2].1) / 2.0, 2.0);
        assert_eq!((r[2].2, r[2].3), (0.0, 3.0));
        assert_eq!(
            chart.panels()[0].x.levels(),
            ["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_large_per_row_positions() {
        let n = 100_000;
        let categories: Vec<String> = (0..n).map(|i| format!("c{}", i % 10)).collect();
        let groups: Vec<&str> = (0..n).map(|i| ["f", "m", "u"][i % 3]).collect();
        let data = Dataset::new()
            .with_column("category", categories)
            .unwrap()
            .with_column("group", groups)
            .unwrap()
            .with_column("value", vec![1.0f32; n])
            .unwrap();

        let aes = Aes::new().x("category").y("value").fill("group");
        let chart = render(&data, &aes, &GeomSpec::col(), &StyleOptions::new()).unwrap();
        let r = rects(&chart);
        assert_eq!(r.len(), n);
        let top = r.iter().map(|q| q.3).fold(0.0f32, f32::max);
        assert_relative_eq!(top, (n / 10) as f32);

        let aes = Aes::new().x("category").y("value").colour("group");
        let spec = GeomSpec::point().position(Position::dodge());
        let chart = render(&data, &aes, &spec, &StyleOptions::new()).unwrap();
        assert_eq!(chart.mark_count(), n);
    }

    #[test]
    fn test_count_bars() {
        let aes = Aes::new().x("species");
        let chart = render(&species(), &aes, &GeomSpec::bar(), &StyleOptions::new()).unwrap();
        let heights: Vec<f32> = rects(&chart).iter().map(|r| r.3 - r.2).collect();
        assert_eq!(heights, vec![2.0, 1.0]);
        assert_eq!(chart.labels().y.as_deref(), Some("count"));
    }

    #[test]
    fn test_validation_order() {
        // Empty beats unknown column
        let empty = Dataset::new().with_column("x", Vec::<f32>::new()).unwrap();
        let aes = Aes::new().x("missing_col");
        assert!(matches!(
            render(&empty, &aes, &GeomSpec::point(), &StyleOptions::new()),
            Err(Error::EmptyDataset)
        ));

        // Unknown column beats incompatible statistic
        let spec = GeomSpec::point().stat(Stat::count());
        match render(&species(), &aes, &spec, &StyleOptions::new()) {
            Err(Error::UnknownColumn(c)) => assert_eq!(c, "missing_col"),
            other => panic!("expected UnknownColumn, got {other:?}"),
        }
    }

    #[test]
    fn test_groups_follow_level_order() {
        let data = Dataset::new()
            .with_column("x", [1.0f32, 2.0, 3.0])
            .unwrap()
            .with_column("g", ["b", "a", "b"])
            .unwrap()
            .with_levels("g", &["b", "a"])
            .unwrap();
        let aes = Aes::new().x("x").colour("g");
        let opts = StyleOptions::new();
        let spec = GeomSpec::point();
        let frame = Frame::new(&data, &aes, &spec, &opts, &[0, 1, 2]);
        assert_eq!(frame.groups, vec![0, 1, 0]);
    }

    #[test]
    fn test_resolution_of_continuous_x() {
        let data = Dataset::from_xy(&[1.0, 1.5, 3.0], &[1.0, 2.0, 3.0]);
        let aes = Aes::new().x("x").y("y");
        let opts = StyleOptions::new();
        let spec = GeomSpec::col();
        let frame = Frame::new(&data, &aes, &spec, &opts, &[0, 1, 2]);
        assert_relative_eq!(frame.resolution(), 0.5);
        assert_relative_eq!(frame.band(), 0.45);
    }
}
