//! Coordinate systems.
//!
//! Defines how encoded positions are mapped onto the panel.

use serde::Deserialize;

/// Which position variable a polar system maps to angle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theta {
    /// x maps to angle, y to radius.
    #[default]
    X,
    /// y maps to angle, x to radius (pie charts).
    Y,
}

/// Coordinate system type.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Coord {
    /// Cartesian coordinates (x, y).
    Cartesian {
        /// X axis limits.
        #[serde(default)]
        xlim: Option<(f32, f32)>,
        /// Y axis limits.
        #[serde(default)]
        ylim: Option<(f32, f32)>,
        /// Whether to flip x and y.
        #[serde(default)]
        flip: bool,
    },
    /// Polar coordinates.
    Polar {
        /// Variable mapped to angle.
        #[serde(default)]
        theta: Theta,
        /// Start angle in radians, measured clockwise from 12 o'clock.
        #[serde(default)]
        start: f32,
        /// Direction: 1 for clockwise, -1 for counter-clockwise.
        #[serde(default = "default_direction")]
        direction: i8,
    },
}

fn default_direction() -> i8 {
    1
}

impl Default for Coord {
    fn default() -> Self {
        Coord::cartesian()
    }
}

impl Coord {
    /// Create a Cartesian coordinate system.
    #[must_use]
    pub fn cartesian() -> Self {
        Coord::Cartesian {
            xlim: None,
            ylim: None,
            flip: false,
        }
    }

    /// Create a polar coordinate system.
    #[must_use]
    pub fn polar() -> Self {
        Coord::Polar {
            theta: Theta::X,
            start: 0.0,
            direction: 1,
        }
    }

    /// Polar system with y as the angle, as pie charts use.
    #[must_use]
    pub fn polar_y() -> Self {
        Coord::Polar {
            theta: Theta::Y,
            start: 0.0,
            direction: 1,
        }
    }

    /// Set x-axis limits.
    #[must_use]
    pub fn xlim(mut self, min: f32, max: f32) -> Self {
        if let Coord::Cartesian { ref mut xlim, .. } = self {
            *xlim = Some((min, max));
        }
        self
    }

    /// Set y-axis limits.
    #[must_use]
    pub fn ylim(mut self, min: f32, max: f32) -> Self {
        if let Coord::Cartesian { ref mut ylim, .. } = self {
            *ylim = Some((min, max));
        }
        self
    }

    /// Flip x and y axes.
    #[must_use]
    pub fn flip(mut self) -> Self {
        if let Coord::Cartesian { flip, .. } = &mut self {
            *flip = true;
        }
        self
    }

    /// Set polar start angle.
    #[must_use]
    pub fn start_angle(mut self, start: f32) -> Self {
        if let Coord::Polar { start: s, .. } = &mut self {
            *s = start;
        }
        self
    }

    /// Set polar direction (1 = clockwise, -1 = counter-clockwise).
    #[must_use]
    pub fn direction(mut self, dir: i8) -> Self {
        if let Coord::Polar { direction, .. } = &mut self {
            *direction = if dir >= 0 { 1 } else { -1 };
        }
        self
    }

    /// Whether x and y are swapped on screen.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        matches!(self, Coord::Cartesian { flip: true, .. })
    }

    /// Whether this is a polar system.
    #[must_use]
    pub fn is_polar(&self) -> bool {
        matches!(self, Coord::Polar { .. })
    }

    /// User-set limits `(xlim, ylim)`; polar systems have none.
    #[must_use]
    pub fn limits(&self) -> (Option<(f32, f32)>, Option<(f32, f32)>) {
        match *self {
            Coord::Cartesian { xlim, ylim, .. } => (xlim, ylim),
            Coord::Polar { .. } => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cartesian_limits() {
        let c = Coord::cartesian().xlim(0.0, 10.0).ylim(-1.0, 1.0);
        assert_eq!(c.limits(), (Some((0.0, 10.0)), Some((-1.0, 1.0))));
        assert!(!c.is_flipped());
    }

    #[test]
    fn test_flip() {
        assert!(Coord::cartesian().flip().is_flipped());
        // Flip is a no-op on polar
        assert!(!Coord::polar().flip().is_flipped());
    }

    #[test]
    fn test_polar_direction_normalised() {
        let c = Coord::polar().direction(-5).start_angle(1.0);
        assert_eq!(
            c,
            Coord::Polar {
                theta: Theta::X,
                start: 1.0,
                direction: -1,
            }
        );
        assert!(c.is_polar());
        assert_eq!(c.limits(), (None, None));
    }

    #[test]
    fn test_deserialize() {
        let c: Coord = serde_yaml_ng::from_str("type: cartesian\nflip: true\n").unwrap();
        assert!(c.is_flipped());
        let p: Coord = serde_yaml_ng::from_str("type: polar\n").unwrap();
        assert_eq!(p, Coord::polar());
        let y: Coord = serde_yaml_ng::from_str("type: polar\ntheta: y\n").unwrap();
        assert_eq!(y, Coord::polar_y());
    }
}
