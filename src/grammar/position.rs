//! Position adjustments.
//!
//! Pure arithmetic on already-estimated marks: stacking, normalising,
//! dodging and jittering. Jitter draws from a seeded RNG so identical
//! inputs always produce identical charts.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Default jitter seed.
pub const DEFAULT_JITTER_SEED: u64 = 42;

/// Position adjustment tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Marks stay where the data puts them.
    Identity,
    /// Random offsets to reduce overplotting.
    Jitter {
        /// Maximum horizontal offset in data units.
        width: f32,
        /// Maximum vertical offset in data units.
        height: f32,
        /// RNG seed.
        seed: u64,
    },
    /// Marks sharing an x split the band side by side.
    Dodge {
        /// Total band width shared by the dodged marks (`None` = mark width).
        width: Option<f32>,
    },
    /// Marks sharing an x stack on top of each other.
    Stack,
    /// Stack, then rescale each stack to 0..1.
    Fill,
}

impl Position {
    /// Jitter with the default amount (0.4 horizontally, none vertically).
    #[must_use]
    pub fn jitter() -> Self {
        Position::Jitter {
            width: 0.4,
            height: 0.0,
            seed: DEFAULT_JITTER_SEED,
        }
    }

    /// Dodge using the mark width.
    #[must_use]
    pub fn dodge() -> Self {
        Position::Dodge { width: None }
    }

    /// Tag name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Position::Identity => "identity",
            Position::Jitter { .. } => "jitter",
            Position::Dodge { .. } => "dodge",
            Position::Stack => "stack",
            Position::Fill => "fill",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A bar-like interval at a position, the unit position adjustments work on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    /// Centre of the band.
    pub x: f32,
    /// Band width.
    pub width: f32,
    /// Bottom of the interval.
    pub ymin: f32,
    /// Top of the interval.
    pub ymax: f32,
    /// Group index (fill/colour/group level).
    pub group: usize,
}

/// Hash key for an x position. `-0.0` and `0.0` share a key.
pub(crate) fn x_key(x: f32) -> u32 {
    (x + 0.0).to_bits()
}

/// Stack spans sharing an x, in input order. Positive heights grow up from
/// zero, negative heights grow down from zero.
pub fn stack(spans: &mut [Span]) {
    // Running (up, down) extent per x
    let mut extents: HashMap<u32, (f32, f32)> = HashMap::new();
    for span in spans.iter_mut() {
        let height = span.ymax - span.ymin;
        let (up, down) = extents.entry(x_key(span.x)).or_insert((0.0, 0.0));
        if height >= 0.0 {
            span.ymin = *up;
            span.ymax = *up + height;
        } else {
            span.ymax = *down;
            span.ymin = *down + height;
        }
        if span.ymax > 0.0 {
            *up = up.max(span.ymax);
        } else {
            *down = down.min(span.ymin);
        }
    }
}

/// Stack, then normalise each x so its stack spans exactly 0..1.
pub fn fill(spans: &mut [Span]) {
    stack(spans);
    let mut tops: HashMap<u32, f32> = HashMap::new();
    for span in spans.iter() {
        let top = tops.entry(x_key(span.x)).or_insert(0.0);
        *top = top.max(span.ymax);
    }
    for span in spans.iter_mut() {
        let top = tops.get(&x_key(span.x)).copied().unwrap_or(0.0);
        if top > 0.0 {
            span.ymin /= top;
            span.ymax /= top;
        }
    }
}

/// Slot of each `(x, group)` key within its x, and the slot count.
///
/// The slot count is the largest number of distinct groups sharing any x;
/// groups at one x take slots in group order.
#[must_use]
pub fn dodge_slots(keys: &[(f32, usize)]) -> (Vec<usize>, usize) {
    let mut groups: HashMap<u32, Vec<usize>> = HashMap::new();
    for &(x, group) in keys {
        groups.entry(x_key(x)).or_default().push(group);
    }
    for present in groups.values_mut() {
        present.sort_unstable();
        present.dedup();
    }

    let n = groups.values().map(Vec::len).max().unwrap_or(0).max(1);
    let slots = keys
        .iter()
        .map(|&(x, group)| {
            groups
                .get(&x_key(x))
                .and_then(|present| present.binary_search(&group).ok())
                .unwrap_or(0)
        })
        .collect();
    (slots, n)
}

/// Split the band of each x evenly between the groups present there.
///
/// `band` is the total width shared by the dodged marks; `None` keeps each
/// span's own width as the band.
pub fn dodge(spans: &mut [Span], band: Option<f32>) {
    let keys: Vec<(f32, usize)> = spans.iter().map(|s| (s.x, s.group)).collect();
    let (slots, n) = dodge_slots(&keys);
    for (span, slot) in spans.iter_mut().zip(slots) {
        let total = band.unwrap_or(span.width);
        let (dx, width) = dodge_offset(slot, n, total);
        span.x += dx;
        span.width = width;
    }
}

/// Offset from the band centre and width of slot `slot` out of `n`.
#[must_use]
pub fn dodge_offset(slot: usize, n: usize, band: f32) -> (f32, f32) {
    let n = n.max(1) as f32;
    let width = band / n;
    (-band / 2.0 + (slot as f32 + 0.5) * width, width)
}

/// Deterministic jitter offsets, one `(dx, dy)` pair per mark.
#[must_use]
pub fn jitter_offsets(n: usize, width: f32, height: f32, seed: u64) -> Vec<(f32, f32)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut draw = |amount: f32| {
        if amount > 0.0 {
            rng.random_range(-amount..=amount)
        } else {
            0.0
        }
    };
    (0..n).map(|_| (draw(width), draw(height))).collect()
}
