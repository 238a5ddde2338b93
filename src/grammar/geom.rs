//! Geometry tags and the geometry specification.
//!
//! A [`GeomSpec`] names the mark type together with its statistic and
//! position adjustment. Which statistics a geom accepts, and which channels
//! it needs, is fixed per [`GeomKind`].

use std::fmt;
use std::str::FromStr;

use super::aes::Channel;
use super::position::Position;
use super::stat::Stat;
use crate::error::Error;

/// Shape types for point geometries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PointShape {
    /// Filled circle.
    #[default]
    Circle,
    /// Filled triangle.
    Triangle,
    /// Filled square.
    Square,
    /// Cross (+).
    Cross,
    /// X shape.
    X,
    /// Diamond shape.
    Diamond,
    /// Hollow circle.
    OpenCircle,
}

impl PointShape {
    /// Shapes assigned to discrete levels, in order.
    pub const SEQUENCE: [PointShape; 6] = [
        PointShape::Circle,
        PointShape::Triangle,
        PointShape::Square,
        PointShape::Cross,
        PointShape::X,
        PointShape::Diamond,
    ];
}

/// Line dash patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Linetype {
    /// Continuous line.
    #[default]
    Solid,
    /// Evenly dashed.
    Dashed,
    /// Dotted.
    Dotted,
    /// Alternating dots and dashes.
    DotDash,
    /// Long dashes.
    LongDash,
    /// Alternating long and short dashes.
    TwoDash,
}

impl Linetype {
    /// Linetypes assigned to discrete levels, in order.
    pub const SEQUENCE: [Linetype; 6] = [
        Linetype::Solid,
        Linetype::Dashed,
        Linetype::Dotted,
        Linetype::DotDash,
        Linetype::LongDash,
        Linetype::TwoDash,
    ];

    /// On/off dash lengths in multiples of the line width; `None` when solid.
    #[must_use]
    pub const fn dash_pattern(self) -> Option<&'static [f32]> {
        match self {
            Linetype::Solid => None,
            Linetype::Dashed => Some(&[4.0, 4.0]),
            Linetype::Dotted => Some(&[1.0, 3.0]),
            Linetype::DotDash => Some(&[1.0, 3.0, 4.0, 3.0]),
            Linetype::LongDash => Some(&[7.0, 3.0]),
            Linetype::TwoDash => Some(&[2.0, 2.0, 6.0, 2.0]),
        }
    }
}

/// The mark type of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeomKind {
    /// Scatter points.
    Point,
    /// Lines connecting points in x order.
    Line,
    /// Bars.
    Bar,
    /// Binned bars over a continuous x.
    Histogram,
    /// Density curve.
    Density,
    /// Stacked dots per bin.
    Dotplot,
    /// Box and whiskers.
    Boxplot,
    /// Mirrored density per group.
    Violin,
    /// Stacked bar in polar coordinates.
    Pie,
    /// Point with a vertical interval.
    Pointrange,
    /// Straight line segments.
    Segment,
    /// Text labels.
    Text,
}

impl GeomKind {
    /// Every geom, in catalogue order.
    pub const ALL: [GeomKind; 12] = [
        GeomKind::Point,
        GeomKind::Line,
        GeomKind::Bar,
        GeomKind::Histogram,
        GeomKind::Density,
        GeomKind::Dotplot,
        GeomKind::Boxplot,
        GeomKind::Violin,
        GeomKind::Pie,
        GeomKind::Pointrange,
        GeomKind::Segment,
        GeomKind::Text,
    ];

    /// Tag name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            GeomKind::Point => "point",
            GeomKind::Line => "line",
            GeomKind::Bar => "bar",
            GeomKind::Histogram => "histogram",
            GeomKind::Density => "density",
            GeomKind::Dotplot => "dotplot",
            GeomKind::Boxplot => "boxplot",
            GeomKind::Violin => "violin",
            GeomKind::Pie => "pie",
            GeomKind::Pointrange => "pointrange",
            GeomKind::Segment => "segment",
            GeomKind::Text => "text",
        }
    }

    /// Statistic used when none is given.
    #[must_use]
    pub fn default_stat(self) -> Stat {
        match self {
            GeomKind::Point | GeomKind::Line | GeomKind::Segment | GeomKind::Text => Stat::Identity,
            GeomKind::Bar | GeomKind::Pie => Stat::Count,
            GeomKind::Histogram | GeomKind::Dotplot => Stat::Bin { bins: None },
            GeomKind::Density => Stat::density(),
            GeomKind::Boxplot => Stat::Boxplot,
            GeomKind::Violin => Stat::ydensity(),
            GeomKind::Pointrange => Stat::summary(),
        }
    }

    /// Position adjustment used when none is given.
    #[must_use]
    pub fn default_position(self) -> Position {
        match self {
            GeomKind::Bar | GeomKind::Histogram | GeomKind::Pie => Position::Stack,
            GeomKind::Boxplot | GeomKind::Violin => Position::dodge(),
            _ => Position::Identity,
        }
    }

    /// Names of the statistics this geom accepts.
    #[must_use]
    pub const fn allowed_stats(self) -> &'static [&'static str] {
        match self {
            GeomKind::Point | GeomKind::Line => &["identity", "summary"],
            GeomKind::Bar => &["count", "identity", "summary"],
            GeomKind::Histogram | GeomKind::Dotplot => &["bin", "count"],
            GeomKind::Density => &["density", "identity"],
            GeomKind::Boxplot => &["boxplot"],
            GeomKind::Violin => &["ydensity"],
            GeomKind::Pie => &["count", "identity"],
            GeomKind::Pointrange => &["summary", "identity"],
            GeomKind::Segment => &["identity"],
            GeomKind::Text => &["identity", "count"],
        }
    }

    /// Whether the statistic is defined for this geom.
    #[must_use]
    pub fn supports(self, stat: &Stat) -> bool {
        self.allowed_stats().contains(&stat.name())
    }

    /// Channels that must be mapped (or set as constants) under `stat`.
    #[must_use]
    pub fn required_channels(self, stat: &Stat) -> &'static [Channel] {
        use Channel::{Label, Xend, Ymax, Ymin, Yend, X, Y};
        match (self, stat) {
            (GeomKind::Bar, Stat::Count)
            | (GeomKind::Histogram | GeomKind::Dotplot, _)
            | (GeomKind::Density, Stat::Density { .. })
            | (GeomKind::Text, Stat::Count) => &[X],
            (GeomKind::Pie, Stat::Count) => &[],
            (GeomKind::Pie, _) => &[Y],
            (GeomKind::Pointrange, Stat::Identity) => &[X, Y, Ymin, Ymax],
            (GeomKind::Segment, _) => &[X, Y, Xend, Yend],
            (GeomKind::Text, _) => &[X, Y, Label],
            _ => &[X, Y],
        }
    }

    /// Whether a discrete y is meaningful for this geom.
    #[must_use]
    pub const fn allows_discrete_y(self) -> bool {
        matches!(self, GeomKind::Point | GeomKind::Text)
    }
}

impl fmt::Display for GeomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GeomKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.name() == lower)
            .ok_or_else(|| Error::UnknownGeom(s.to_string()))
    }
}

/// Geom-specific drawing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeomParams {
    /// Point shape when not mapped.
    pub shape: PointShape,
    /// Bar/box width as a fraction of the band (`None` = geom default).
    pub width: Option<f32>,
    /// Stroke width in pixels.
    pub linewidth: f32,
}

impl Default for GeomParams {
    fn default() -> Self {
        Self {
            shape: PointShape::Circle,
            width: None,
            linewidth: 1.0,
        }
    }
}

/// Geometry specification: mark type, statistic and position adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeomSpec {
    /// Mark type.
    pub kind: GeomKind,
    /// Statistic tag.
    pub stat: Stat,
    /// Position adjustment.
    pub position: Position,
    /// Drawing parameters.
    pub params: GeomParams,
}

impl From<GeomKind> for GeomSpec {
    fn from(kind: GeomKind) -> Self {
        Self::new(kind)
    }
}

impl GeomSpec {
    /// Geometry with the geom's default statistic and position.
    #[must_use]
    pub fn new(kind: GeomKind) -> Self {
        Self {
            kind,
            stat: kind.default_stat(),
            position: kind.default_position(),
            params: GeomParams::default(),
        }
    }

    /// Create a point geometry.
    #[must_use]
    pub fn point() -> Self {
        Self::new(GeomKind::Point)
    }

    /// Create a line geometry.
    #[must_use]
    pub fn line() -> Self {
        Self::new(GeomKind::Line)
    }

    /// Create a bar geometry (counts by default).
    #[must_use]
    pub fn bar() -> Self {
        Self::new(GeomKind::Bar)
    }

    /// Create a bar geometry whose heights come straight from `y`.
    #[must_use]
    pub fn col() -> Self {
        Self::new(GeomKind::Bar).stat(Stat::Identity)
    }

    /// Create a histogram geometry.
    #[must_use]
    pub fn histogram() -> Self {
        Self::new(GeomKind::Histogram)
    }

    /// Create a density geometry.
    #[must_use]
    pub fn density() -> Self {
        Self::new(GeomKind::Density)
    }

    /// Create a dot plot geometry.
    #[must_use]
    pub fn dotplot() -> Self {
        Self::new(GeomKind::Dotplot)
    }

    /// Create a box plot geometry.
    #[must_use]
    pub fn boxplot() -> Self {
        Self::new(GeomKind::Boxplot)
    }

    /// Create a violin plot geometry.
    #[must_use]
    pub fn violin() -> Self {
        Self::new(GeomKind::Violin)
    }

    /// Create a pie geometry.
    #[must_use]
    pub fn pie() -> Self {
        Self::new(GeomKind::Pie)
    }

    /// Create a point-range geometry.
    #[must_use]
    pub fn pointrange() -> Self {
        Self::new(GeomKind::Pointrange)
    }

    /// Create a segment geometry.
    #[must_use]
    pub fn segment() -> Self {
        Self::new(GeomKind::Segment)
    }

    /// Create a text geometry.
    #[must_use]
    pub fn text() -> Self {
        Self::new(GeomKind::Text)
    }

    /// Set the statistic.
    #[must_use]
    pub fn stat(mut self, stat: Stat) -> Self {
        self.stat = stat;
        self
    }

    /// Set the position adjustment.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    /// Set the point shape.
    #[must_use]
    pub fn shape(mut self, shape: PointShape) -> Self {
        self.params.shape = shape;
        self
    }

    /// Set the bar/box width (fraction of the band).
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.params.width = Some(width.clamp(0.0, 1.0));
        self
    }

    /// Set the stroke width.
    #[must_use]
    pub fn linewidth(mut self, linewidth: f32) -> Self {
        self.params.linewidth = linewidth.max(0.0);
        self
    }

    /// Set the number of bins (binning statistics only).
    #[must_use]
    pub fn bins(mut self, bins: usize) -> Self {
        if let Stat::Bin { bins: ref mut b } = self.stat {
            *b = Some(bins.max(1));
        }
        self
    }

    /// Set the kernel bandwidth (density statistics only).
    #[must_use]
    pub fn bandwidth(mut self, bandwidth: f32) -> Self {
        match &mut self.stat {
            Stat::Density { bandwidth: b } | Stat::YDensity { bandwidth: b } => {
                *b = Some(bandwidth);
            }
            _ => {}
        }
        self
    }

    /// Band fraction a bar/box occupies.
    #[must_use]
    pub fn band_width(&self) -> f32 {
        self.params.width.unwrap_or(match self.kind {
            GeomKind::Boxplot => 0.75,
            GeomKind::Pie => 1.0,
            _ => 0.9,
        })
    }
}
