//! Aesthetic mappings.
//!
//! Maps data columns to visual channels, or pins a channel to a constant.

use std::collections::BTreeMap;
use std::fmt;

use super::geom::{Linetype, PointShape};
use crate::color::Rgba;

/// A visual channel a column can be mapped to.
///
/// The declaration order is the order in which mappings are validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Horizontal position.
    X,
    /// Vertical position.
    Y,
    /// Stroke colour.
    Colour,
    /// Fill colour.
    Fill,
    /// Point shape.
    Shape,
    /// Line dash pattern.
    Linetype,
    /// Point size or line width.
    Size,
    /// Text label.
    Label,
    /// Opacity.
    Alpha,
    /// Explicit grouping.
    Group,
    /// Interval lower bound.
    Ymin,
    /// Interval upper bound.
    Ymax,
    /// Segment end x.
    Xend,
    /// Segment end y.
    Yend,
}

impl Channel {
    /// Channel name as written in recipes.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Colour => "colour",
            Self::Fill => "fill",
            Self::Shape => "shape",
            Self::Linetype => "linetype",
            Self::Size => "size",
            Self::Label => "label",
            Self::Alpha => "alpha",
            Self::Group => "group",
            Self::Ymin => "ymin",
            Self::Ymax => "ymax",
            Self::Xend => "xend",
            Self::Yend => "yend",
        }
    }

    /// Whether the channel places marks (rows missing it are dropped).
    #[must_use]
    pub const fn is_positional(self) -> bool {
        matches!(
            self,
            Self::X | Self::Y | Self::Ymin | Self::Ymax | Self::Xend | Self::Yend
        )
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aesthetic mapping specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aes {
    mappings: BTreeMap<Channel, String>,

    // Fixed values (not data-mapped)
    /// Fixed stroke colour.
    pub colour_value: Option<Rgba>,
    /// Fixed fill colour.
    pub fill_value: Option<Rgba>,
    /// Fixed point size (pixels at 96 dpi).
    pub size_value: Option<f32>,
    /// Fixed opacity.
    pub alpha_value: Option<f32>,
    /// Fixed point shape.
    pub shape_value: Option<PointShape>,
    /// Fixed line dash pattern.
    pub linetype_value: Option<Linetype>,
    /// Fixed label text.
    pub label_value: Option<String>,
}

impl Aes {
    /// Create a new aesthetic mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Map any channel to a column.
    #[must_use]
    pub fn map(mut self, channel: Channel, column: &str) -> Self {
        self.mappings.insert(channel, column.to_string());
        self
    }

    /// Map x position to a column.
    #[must_use]
    pub fn x(self, column: &str) -> Self {
        self.map(Channel::X, column)
    }

    /// Map y position to a column.
    #[must_use]
    pub fn y(self, column: &str) -> Self {
        self.map(Channel::Y, column)
    }

    /// Map stroke colour to a column.
    #[must_use]
    pub fn colour(self, column: &str) -> Self {
        self.map(Channel::Colour, column)
    }

    /// Map fill colour to a column.
    #[must_use]
    pub fn fill(self, column: &str) -> Self {
        self.map(Channel::Fill, column)
    }

    /// Map shape to a column.
    #[must_use]
    pub fn shape(self, column: &str) -> Self {
        self.map(Channel::Shape, column)
    }

    /// Map linetype to a column.
    #[must_use]
    pub fn linetype(self, column: &str) -> Self {
        self.map(Channel::Linetype, column)
    }

    /// Map size to a column.
    #[must_use]
    pub fn size(self, column: &str) -> Self {
        self.map(Channel::Size, column)
    }

    /// Map label to a column.
    #[must_use]
    pub fn label(self, column: &str) -> Self {
        self.map(Channel::Label, column)
    }

    /// Map alpha/opacity to a column.
    #[must_use]
    pub fn alpha(self, column: &str) -> Self {
        self.map(Channel::Alpha, column)
    }

    /// Map group to a column.
    #[must_use]
    pub fn group(self, column: &str) -> Self {
        self.map(Channel::Group, column)
    }

    /// Map interval bounds to columns.
    #[must_use]
    pub fn yrange(self, ymin: &str, ymax: &str) -> Self {
        self.map(Channel::Ymin, ymin).map(Channel::Ymax, ymax)
    }

    /// Map segment end points to columns.
    #[must_use]
    pub fn end(self, xend: &str, yend: &str) -> Self {
        self.map(Channel::Xend, xend).map(Channel::Yend, yend)
    }

    /// Set a fixed stroke colour.
    #[must_use]
    pub fn colour_value(mut self, colour: Rgba) -> Self {
        self.colour_value = Some(colour);
        self
    }

    /// Set a fixed fill colour.
    #[must_use]
    pub fn fill_value(mut self, fill: Rgba) -> Self {
        self.fill_value = Some(fill);
        self
    }

    /// Set a fixed size value.
    #[must_use]
    pub fn size_value(mut self, size: f32) -> Self {
        self.size_value = Some(size);
        self
    }

    /// Set a fixed alpha value.
    #[must_use]
    pub fn alpha_value(mut self, alpha: f32) -> Self {
        self.alpha_value = Some(alpha.clamp(0.0, 1.0));
        self
    }

    /// Set a fixed point shape.
    #[must_use]
    pub fn shape_value(mut self, shape: PointShape) -> Self {
        self.shape_value = Some(shape);
        self
    }

    /// Set a fixed linetype.
    #[must_use]
    pub fn linetype_value(mut self, linetype: Linetype) -> Self {
        self.linetype_value = Some(linetype);
        self
    }

    /// Set a fixed label.
    #[must_use]
    pub fn label_value(mut self, label: &str) -> Self {
        self.label_value = Some(label.to_string());
        self
    }

    /// Column mapped to a channel.
    #[must_use]
    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.mappings.get(&channel).map(String::as_str)
    }

    /// Whether the channel is mapped to a column.
    #[must_use]
    pub fn is_mapped(&self, channel: Channel) -> bool {
        self.mappings.contains_key(&channel)
    }

    /// All column mappings in channel order.
    pub fn mappings(&self) -> impl Iterator<Item = (Channel, &str)> {
        self.mappings.iter().map(|(c, col)| (*c, col.as_str()))
    }

    /// Merge another Aes, with other taking precedence.
    #[must_use]
    pub fn merge(&self, other: &Aes) -> Aes {
        let mut mappings = self.mappings.clone();
        mappings.extend(other.mappings.iter().map(|(c, col)| (*c, col.clone())));
        Aes {
            mappings,
            colour_value: other.colour_value.or(self.colour_value),
            fill_value: other.fill_value.or(self.fill_value),
            size_value: other.size_value.or(self.size_value),
            alpha_value: other.alpha_value.or(self.alpha_value),
            shape_value: other.shape_value.or(self.shape_value),
            linetype_value: other.linetype_value.or(self.linetype_value),
            label_value: other
                .label_value
                .clone()
                .or_else(|| self.label_value.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes_builder() {
        let aes = Aes::new()
            .x("xvar")
            .y("yvar")
            .colour("category")
            .size_value(5.0);

        assert_eq!(aes.get(Channel::X), Some("xvar"));
        assert_eq!(aes.get(Channel::Y), Some("yvar"));
        assert_eq!(aes.get(Channel::Colour), Some("category"));
        assert_eq!(aes.size_value, Some(5.0));
        assert!(!aes.is_mapped(Channel::Fill));
    }

    #[test]
    fn test_aes_merge() {
        let base = Aes::new().x("x").y("y").colour_value(Rgba::RED);
        let override_aes = Aes::new().y("y2").size_value(3.0);

        let merged = base.merge(&override_aes);
        assert_eq!(merged.get(Channel::X), Some("x"));
        assert_eq!(merged.get(Channel::Y), Some("y2"));
        assert_eq!(merged.colour_value, Some(Rgba::RED));
        assert_eq!(merged.size_value, Some(3.0));
    }

    #[test]
    fn test_mappings_in_channel_order() {
        let aes = Aes::new().fill("f").label("l").x("a").end("xe", "ye");
        let channels: Vec<Channel> = aes.mappings().map(|(c, _)| c).collect();
        assert_eq!(
            channels,
            vec![Channel::X, Channel::Fill, Channel::Label, Channel::Xend, Channel::Yend]
        );
    }

    #[test]
    fn test_alpha_value_clamps() {
        assert_eq!(Aes::new().alpha_value(1.5).alpha_value, Some(1.0));
        assert_eq!(Aes::new().alpha_value(-0.5).alpha_value, Some(0.0));
    }

    #[test]
    fn test_positional_channels() {
        assert!(Channel::Ymin.is_positional());
        assert!(!Channel::Fill.is_positional());
        assert_eq!(Channel::Colour.to_string(), "colour");
    }
}
