//! Statistical transformations.
//!
//! A statistic is a tag: it names the transform applied to the rows before
//! encoding. The numerics live in [`crate::estimate`].

use std::fmt;
use std::str::FromStr;

pub use crate::estimate::SummaryFun;
use crate::error::Error;

/// Statistical transformation tag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stat {
    /// No transformation; one mark per row.
    Identity,
    /// Count rows per discrete level.
    Count,
    /// Summarise y per x level.
    Summary(SummaryFun),
    /// Bin a continuous variable (`None` = 30 bins).
    Bin {
        /// Number of bins.
        bins: Option<usize>,
    },
    /// Kernel density estimate of x.
    Density {
        /// Kernel bandwidth (`None` = Silverman's rule).
        bandwidth: Option<f32>,
    },
    /// Quartiles, whiskers and outliers of y per x level.
    Boxplot,
    /// Kernel density of y per x level (violins).
    YDensity {
        /// Kernel bandwidth (`None` = Silverman's rule).
        bandwidth: Option<f32>,
    },
}

impl Stat {
    /// Create an identity stat.
    #[must_use]
    pub fn identity() -> Self {
        Stat::Identity
    }

    /// Create a count stat.
    #[must_use]
    pub fn count() -> Self {
        Stat::Count
    }

    /// Create a summary stat with the default mean ± standard error.
    #[must_use]
    pub fn summary() -> Self {
        Stat::Summary(SummaryFun::default())
    }

    /// Create a binning stat with an explicit bin count.
    #[must_use]
    pub fn bin(bins: usize) -> Self {
        Stat::Bin { bins: Some(bins) }
    }

    /// Create a density stat.
    #[must_use]
    pub fn density() -> Self {
        Stat::Density { bandwidth: None }
    }

    /// Create a boxplot stat.
    #[must_use]
    pub fn boxplot() -> Self {
        Stat::Boxplot
    }

    /// Create a violin density stat.
    #[must_use]
    pub fn ydensity() -> Self {
        Stat::YDensity { bandwidth: None }
    }

    /// Tag name, used in error messages and compatibility checks.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Stat::Identity => "identity",
            Stat::Count => "count",
            Stat::Summary(_) => "summary",
            Stat::Bin { .. } => "bin",
            Stat::Density { .. } => "density",
            Stat::Boxplot => "boxplot",
            Stat::YDensity { .. } => "ydensity",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identity" => Ok(Stat::Identity),
            "count" => Ok(Stat::Count),
            "summary" => Ok(Stat::summary()),
            "bin" => Ok(Stat::Bin { bins: None }),
            "density" => Ok(Stat::density()),
            "boxplot" => Ok(Stat::Boxplot),
            "ydensity" => Ok(Stat::ydensity()),
            _ => Err(Error::UnknownStatistic(s.to_string())),
        }
    }
}
