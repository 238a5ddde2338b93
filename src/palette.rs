//! Named colour palettes.
//!
//! A palette is an ordered list of colours plus a rule for how discrete levels
//! and continuous values pick from it. Built-ins cover the palettes the recipe
//! catalogue reaches for most often; anything else is a list of hex strings.

use serde::Deserialize;

use crate::color::{Hsla, Rgba};
use crate::error::{Error, Result};

/// How a palette assigns colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteKind {
    /// Evenly spaced hues generated per level count (ggplot2 default).
    Hue,
    /// Distinct colours, cycled when levels outnumber colours.
    Qualitative,
    /// Ordered gradient, sampled evenly for discrete levels.
    Sequential,
}

/// A named, ordered set of colours.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "PaletteSpec")]
pub struct Palette {
    name: String,
    colours: Vec<Rgba>,
    kind: PaletteKind,
}

/// Palette as written in a style options file: a built-in name or a list of hex colours.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PaletteSpec {
    /// Built-in palette name.
    Named(String),
    /// Custom hex colours.
    Colours(Vec<String>),
}

const HUE_GRADIENT: [Rgba; 2] = [Rgba::rgb(0x13, 0x2B, 0x43), Rgba::rgb(0x56, 0xB1, 0xF7)];

const VIRIDIS: [&str; 10] = [
    "#440154", "#482878", "#3E4A89", "#31688E", "#26828E", "#1F9E89", "#35B779", "#6DCD59",
    "#B4DE2C", "#FDE725",
];

const SET1: [&str; 9] = [
    "#E41A1C", "#377EB8", "#4DAF4A", "#984EA3", "#FF7F00", "#FFFF33", "#A65628", "#F781BF",
    "#999999",
];

const DARK2: [&str; 8] = [
    "#1B9E77", "#D95F02", "#7570B3", "#E7298A", "#66A61E", "#E6AB02", "#A6761D", "#666666",
];

const OKABE_ITO: [&str; 8] = [
    "#E69F00", "#56B4E9", "#009E73", "#F0E442", "#0072B2", "#D55E00", "#CC79A7", "#000000",
];

const GREY: [&str; 2] = ["#333333", "#CCCCCC"];

impl Default for Palette {
    fn default() -> Self {
        Self::hue()
    }
}

impl Palette {
    /// ggplot2's default discrete palette: evenly spaced hues.
    #[must_use]
    pub fn hue() -> Self {
        Self {
            name: "hue".into(),
            colours: HUE_GRADIENT.to_vec(),
            kind: PaletteKind::Hue,
        }
    }

    /// Viridis (perceptually uniform, colour-blind safe).
    #[must_use]
    pub fn viridis() -> Self {
        Self::builtin("viridis", &VIRIDIS, PaletteKind::Sequential)
    }

    /// ColorBrewer Set1.
    #[must_use]
    pub fn set1() -> Self {
        Self::builtin("set1", &SET1, PaletteKind::Qualitative)
    }

    /// ColorBrewer Dark2.
    #[must_use]
    pub fn dark2() -> Self {
        Self::builtin("dark2", &DARK2, PaletteKind::Qualitative)
    }

    /// Okabe-Ito colour-blind friendly palette.
    #[must_use]
    pub fn okabe_ito() -> Self {
        Self::builtin("okabe_ito", &OKABE_ITO, PaletteKind::Qualitative)
    }

    /// Grey scale from dark to light.
    #[must_use]
    pub fn grey() -> Self {
        Self::builtin("grey", &GREY, PaletteKind::Sequential)
    }

    /// Look up a built-in palette by name (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPalette`] for an unrecognised name.
    pub fn named(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().replace('-', "_").as_str() {
            "hue" | "default" => Ok(Self::hue()),
            "viridis" => Ok(Self::viridis()),
            "set1" => Ok(Self::set1()),
            "dark2" => Ok(Self::dark2()),
            "okabe_ito" | "okabeito" => Ok(Self::okabe_ito()),
            "grey" | "gray" => Ok(Self::grey()),
            _ => Err(Error::UnknownPalette(name.to_string())),
        }
    }

    /// Build a qualitative palette from hex strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] if any entry fails to parse, or if the
    /// list is empty.
    pub fn from_hex(name: &str, hex: &[&str]) -> Result<Self> {
        if hex.is_empty() {
            return Err(Error::InvalidColor("empty palette".into()));
        }
        let colours = hex
            .iter()
            .map(|h| Rgba::from_hex(h))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name: name.to_string(),
            colours,
            kind: PaletteKind::Qualitative,
        })
    }

    fn builtin(name: &str, hex: &[&str], kind: PaletteKind) -> Self {
        let colours = hex.iter().filter_map(|h| Rgba::from_hex(h).ok()).collect();
        Self {
            name: name.to_string(),
            colours,
            kind,
        }
    }

    /// Palette name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Palette kind.
    #[must_use]
    pub fn kind(&self) -> PaletteKind {
        self.kind
    }

    /// The palette's base colours.
    #[must_use]
    pub fn colours(&self) -> &[Rgba] {
        &self.colours
    }

    /// Colours for `n` discrete levels, in level order.
    #[must_use]
    pub fn discrete(&self, n: usize) -> Vec<Rgba> {
        match self.kind {
            PaletteKind::Hue => (0..n)
                .map(|i| {
                    let h = 15.0 + 360.0 * i as f32 / n as f32;
                    Hsla::hsl(h, 0.75, 0.6).to_rgba()
                })
                .collect(),
            PaletteKind::Qualitative => {
                (0..n).map(|i| self.colours[i % self.colours.len()]).collect()
            }
            PaletteKind::Sequential => {
                if n == 1 {
                    return vec![self.continuous(0.0)];
                }
                (0..n).map(|i| self.continuous(i as f32 / (n - 1) as f32)).collect()
            }
        }
    }

    /// Colour at position `t` (0.0-1.0) along the palette gradient.
    #[must_use]
    pub fn continuous(&self, t: f32) -> Rgba {
        let stops = &self.colours;
        match stops.len() {
            0 => Rgba::GREY35,
            1 => stops[0],
            n => {
                let t = if t.is_finite() {
                    t.clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let pos = t * (n - 1) as f32;
                let i = (pos.floor() as usize).min(n - 2);
                stops[i].lerp(stops[i + 1], pos - i as f32)
            }
        }
    }
}

impl TryFrom<PaletteSpec> for Palette {
    type Error = Error;

    fn try_from(spec: PaletteSpec) -> Result<Self> {
        match spec {
            PaletteSpec::Named(name) => Self::named(&name),
            PaletteSpec::Colours(hex) => {
                let refs: Vec<&str> = hex.iter().map(String::as_str).collect();
                Self::from_hex("custom", &refs)
            }
        }
    }
}
