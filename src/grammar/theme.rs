//! Theme system.
//!
//! Controls the non-data visual appearance of charts. A theme is always
//! passed in with the style options of a render call; nothing is global.

use serde::Deserialize;

use crate::color::Rgba;

/// Built-in theme names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreset {
    /// Grey panel, white grid (ggplot2 default).
    #[default]
    #[serde(alias = "gray")]
    Grey,
    /// White panel, light grid, no border.
    Minimal,
    /// White panel, grey grid, black border.
    Bw,
    /// Axis lines only.
    Classic,
    /// Dark background.
    Dark,
    /// Light grey lines on white.
    Light,
    /// Nothing but data.
    Void,
}

/// Theme specification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ThemePreset")]
pub struct Theme {
    /// Background color.
    pub background: Rgba,
    /// Panel background color.
    pub panel_background: Rgba,
    /// Facet strip background color.
    pub strip_background: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Axis line color.
    pub axis_color: Rgba,
    /// Text color.
    pub text_color: Rgba,
    /// Show grid lines.
    pub show_grid: bool,
    /// Show axis lines.
    pub show_axis: bool,
    /// Show panel border.
    pub show_panel_border: bool,
    /// Show tick labels and axis titles.
    pub show_text: bool,
    /// Grid line width.
    pub grid_width: f32,
    /// Axis line width.
    pub axis_width: f32,
    /// Margin around the plot.
    pub margin: u32,
    /// Base font size in pixels.
    pub base_size: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::grey()
    }
}

impl From<ThemePreset> for Theme {
    fn from(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Grey => Self::grey(),
            ThemePreset::Minimal => Self::minimal(),
            ThemePreset::Bw => Self::bw(),
            ThemePreset::Classic => Self::classic(),
            ThemePreset::Dark => Self::dark(),
            ThemePreset::Light => Self::light(),
            ThemePreset::Void => Self::void(),
        }
    }
}

impl Theme {
    /// Grey theme (ggplot2 default-like).
    #[must_use]
    pub fn grey() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(235, 235, 235),
            strip_background: Rgba::rgb(217, 217, 217),
            grid_color: Rgba::WHITE,
            axis_color: Rgba::rgb(50, 50, 50),
            text_color: Rgba::rgb(50, 50, 50),
            show_grid: true,
            show_axis: false,
            show_panel_border: false,
            show_text: true,
            grid_width: 1.0,
            axis_width: 1.0,
            margin: 12,
            base_size: 11.0,
        }
    }

    /// Minimal theme with white background.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            strip_background: Rgba::WHITE,
            grid_color: Rgba::rgb(220, 220, 220),
            axis_color: Rgba::rgb(100, 100, 100),
            text_color: Rgba::BLACK,
            grid_width: 0.5,
            axis_width: 0.5,
            ..Self::grey()
        }
    }

    /// Black and white theme.
    #[must_use]
    pub fn bw() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            grid_color: Rgba::rgb(235, 235, 235),
            axis_color: Rgba::rgb(51, 51, 51),
            text_color: Rgba::BLACK,
            show_panel_border: true,
            grid_width: 0.5,
            ..Self::grey()
        }
    }

    /// Classic theme with axis lines and no grid.
    #[must_use]
    pub fn classic() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            strip_background: Rgba::WHITE,
            grid_color: Rgba::WHITE,
            axis_color: Rgba::BLACK,
            text_color: Rgba::BLACK,
            show_grid: false,
            show_axis: true,
            grid_width: 0.0,
            ..Self::grey()
        }
    }

    /// Dark theme.
    #[must_use]
    pub fn dark() -> Self {
        Self {
            background: Rgba::WHITE,
            panel_background: Rgba::rgb(127, 127, 127),
            strip_background: Rgba::rgb(38, 38, 38),
            grid_color: Rgba::rgb(107, 107, 107),
            axis_color: Rgba::rgb(50, 50, 50),
            grid_width: 0.5,
            ..Self::grey()
        }
    }

    /// Light theme: thin light-grey lines on white.
    #[must_use]
    pub fn light() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            strip_background: Rgba::rgb(179, 179, 179),
            grid_color: Rgba::rgb(222, 222, 222),
            axis_color: Rgba::rgb(179, 179, 179),
            show_panel_border: true,
            grid_width: 0.5,
            axis_width: 0.5,
            ..Self::grey()
        }
    }

    /// Void theme (nothing but data).
    #[must_use]
    pub fn void() -> Self {
        Self {
            panel_background: Rgba::WHITE,
            strip_background: Rgba::WHITE,
            grid_color: Rgba::WHITE,
            axis_color: Rgba::WHITE,
            show_grid: false,
            show_text: false,
            grid_width: 0.0,
            axis_width: 0.0,
            margin: 4,
            ..Self::grey()
        }
    }

    /// Set background color.
    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    /// Set panel background color.
    #[must_use]
    pub fn panel_background(mut self, color: Rgba) -> Self {
        self.panel_background = color;
        self
    }

    /// Set grid color.
    #[must_use]
    pub fn grid_color(mut self, color: Rgba) -> Self {
        self.grid_color = color;
        self
    }

    /// Set margin.
    #[must_use]
    pub fn margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Set base font size.
    #[must_use]
    pub fn base_size(mut self, size: f32) -> Self {
        self.base_size = size.max(1.0);
        self
    }

    /// Enable or disable grid lines.
    #[must_use]
    pub fn grid(mut self, show: bool) -> Self {
        self.show_grid = show;
        self
    }

    /// Enable or disable axis lines.
    #[must_use]
    pub fn axis(mut self, show: bool) -> Self {
        self.show_axis = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_grey() {
        let t = Theme::grey();
        assert!(t.show_grid);
        assert_eq!(t.panel_background, Rgba::rgb(235, 235, 235));
    }

    #[test]
    fn test_theme_customization() {
        let t = Theme::minimal()
            .background(Rgba::rgb(250, 250, 250))
            .margin(50)
            .grid(false);
        assert_eq!(t.margin, 50);
        assert!(!t.show_grid);
    }

    #[test]
    fn test_theme_bw_has_border() {
        assert!(Theme::bw().show_panel_border);
        assert!(!Theme::minimal().show_panel_border);
    }

    #[test]
    fn test_theme_classic() {
        let t = Theme::classic();
        assert!(!t.show_grid);
        assert!(t.show_axis);
    }

    #[test]
    fn test_theme_void_hides_everything() {
        let t = Theme::void();
        assert!(!t.show_grid);
        assert!(!t.show_axis);
        assert!(!t.show_text);
    }

    #[test]
    fn test_presets_deserialize() {
        let t: Theme = serde_yaml_ng::from_str("bw").unwrap();
        assert_eq!(t, Theme::bw());
        let g: Theme = serde_yaml_ng::from_str("gray").unwrap();
        assert_eq!(g, Theme::grey());
        assert!(serde_yaml_ng::from_str::<Theme>("fancy").is_err());
    }

    #[test]
    fn test_all_presets_distinct() {
        let themes = [
            Theme::grey(),
            Theme::minimal(),
            Theme::bw(),
            Theme::classic(),
            Theme::dark(),
            Theme::light(),
            Theme::void(),
        ];
        for (i, a) in themes.iter().enumerate() {
            for b in &themes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
