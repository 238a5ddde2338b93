//! Style options for a render call.
//!
//! Every styling concern (palette, theme, faceting, legend placement, axis
//! label format, labels, default sizes, coordinates) is carried by one
//! [`StyleOptions`] value built in code or parsed from YAML.

use std::path::Path;

use serde::Deserialize;

use super::coord::Coord;
use super::facet::Facet;
use super::format::AxisFormat;
use super::theme::Theme;
use crate::error::{Error, Result};
use crate::palette::Palette;

/// Where the legend is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    /// Right of the panels.
    #[default]
    Right,
    /// Left of the panels.
    Left,
    /// Above the panels.
    Top,
    /// Below the panels.
    Bottom,
    /// No legend.
    None,
}

/// Chart titles and axis/legend titles. Unset axis titles fall back to the
/// mapped column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Chart title.
    pub title: Option<String>,
    /// Chart subtitle.
    pub subtitle: Option<String>,
    /// Caption below the panels.
    pub caption: Option<String>,
    /// X axis title.
    pub x: Option<String>,
    /// Y axis title.
    pub y: Option<String>,
    /// Colour legend title.
    pub colour: Option<String>,
    /// Fill legend title.
    pub fill: Option<String>,
}

/// Styling for one render call.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOptions {
    /// Palette for colour and fill scales.
    pub palette: Palette,
    /// Theme.
    pub theme: Theme,
    /// Faceting.
    pub facet: Facet,
    /// Legend placement.
    pub legend_position: LegendPosition,
    /// Template for numeric tick labels.
    pub axis_label_format: Option<AxisFormat>,
    /// Titles.
    pub labels: Labels,
    /// Default point size in pixels.
    pub size: Option<f32>,
    /// Default bar/box width as a fraction of the band.
    pub width: Option<f32>,
    /// Default opacity.
    pub alpha: Option<f32>,
    /// Swap x and y on screen.
    pub flip: bool,
    /// Coordinate system (pie charts always use polar).
    pub coord: Option<Coord>,
}

impl StyleOptions {
    /// Create default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the offending line number.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse {
                line,
                message: e.to_string(),
            }
        })
    }

    /// Load options from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, otherwise as
    /// [`StyleOptions::from_yaml`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Set the palette.
    #[must_use]
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Set the theme.
    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the facet.
    #[must_use]
    pub fn facet(mut self, facet: Facet) -> Self {
        self.facet = facet;
        self
    }

    /// Set the legend position.
    #[must_use]
    pub fn legend_position(mut self, position: LegendPosition) -> Self {
        self.legend_position = position;
        self
    }

    /// Set the axis label format.
    #[must_use]
    pub fn axis_label_format(mut self, format: AxisFormat) -> Self {
        self.axis_label_format = Some(format);
        self
    }

    /// Set the chart title.
    #[must_use]
    pub fn title(mut self, title: &str) -> Self {
        self.labels.title = Some(title.to_string());
        self
    }

    /// Set the axis titles.
    #[must_use]
    pub fn axis_titles(mut self, x: &str, y: &str) -> Self {
        self.labels.x = Some(x.to_string());
        self.labels.y = Some(y.to_string());
        self
    }

    /// Set all labels at once.
    #[must_use]
    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Set the default point size.
    #[must_use]
    pub fn size(mut self, size: f32) -> Self {
        self.size = Some(size.max(0.0));
        self
    }

    /// Set the default bar/box width.
    #[must_use]
    pub fn width(mut self, width: f32) -> Self {
        self.width = Some(width.clamp(0.0, 1.0));
        self
    }

    /// Set the default opacity.
    #[must_use]
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Swap x and y on screen.
    #[must_use]
    pub fn flip(mut self) -> Self {
        self.flip = true;
        self
    }

    /// Set the coordinate system.
    #[must_use]
    pub fn coord(mut self, coord: Coord) -> Self {
        self.coord = Some(coord);
        self
    }

    /// Effective coordinate system for a chart (without the pie override).
    #[must_use]
    pub fn effective_coord(&self) -> Coord {
        let coord = self.coord.unwrap_or_default();
        if self.flip { coord.flip() } else { coord }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::facet::ScaleMode;

    #[test]
    fn test_defaults() {
        let opts = StyleOptions::new();
        assert_eq!(opts.palette.name(), "hue");
        assert_eq!(opts.theme, Theme::grey());
        assert_eq!(opts.facet, Facet::None);
        assert_eq!(opts.legend_position, LegendPosition::Right);
    }

    #[test]
    fn test_from_yaml_full() {
        let yaml = r#"
palette: viridis
theme: minimal
facet:
  wrap: species
  ncol: 2
  scales: free
legend_position: bottom
axis_label_format: "%.1f%%"
labels:
  title: Penguins
  x: Bill length
size: 4
alpha: 0.5
flip: true
"#;
        let opts = StyleOptions::from_yaml(yaml).unwrap();
        assert_eq!(opts.palette.name(), "viridis");
        assert_eq!(opts.theme, Theme::minimal());
        assert_eq!(
            opts.facet,
            Facet::Wrap {
                var: "species".into(),
                ncol: Some(2),
                scales: ScaleMode::Free,
            }
        );
        assert_eq!(opts.legend_position, LegendPosition::Bottom);
        assert_eq!(opts.axis_label_format.as_ref().unwrap().format(12.34), "12.3%");
        assert_eq!(opts.labels.title.as_deref(), Some("Penguins"));
        assert_eq!(opts.size, Some(4.0));
        assert!(opts.effective_coord().is_flipped());
    }

    #[test]
    fn test_custom_palette_yaml() {
        let opts = StyleOptions::from_yaml("palette: ['#000000', '#FFFFFF']").unwrap();
        assert_eq!(opts.palette.colours().len(), 2);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let yaml = "theme: minimal\nlegend_position: sideways\n";
        match StyleOptions::from_yaml(yaml) {
            Err(Error::ConfigParse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected ConfigParse, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(StyleOptions::from_yaml("colour_scheme: x\n").is_err());
    }

    #[test]
    fn test_bad_axis_format_rejected() {
        assert!(StyleOptions::from_yaml("axis_label_format: \"%q\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file_is_io() {
        assert!(matches!(
            StyleOptions::load("/nonexistent/style.yaml"),
            Err(Error::Io(_))
        ));
    }
}
