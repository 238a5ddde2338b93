//! Error types for chart recipe operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, validating, or saving a chart.
#[derive(Error, Debug)]
pub enum Error {
    /// An aesthetic or facet references a column the dataset does not have.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// The statistic is not defined for the chosen geometry.
    #[error("Statistic '{stat}' is not compatible with geom '{geom}'")]
    IncompatibleStatistic {
        /// Geometry name.
        geom: String,
        /// Statistic name.
        stat: String,
    },

    /// No rows remain to encode.
    #[error("Empty dataset: no rows to encode")]
    EmptyDataset,

    /// A geometry requires a channel that was not mapped.
    #[error("Geom '{geom}' requires the '{channel}' aesthetic")]
    MissingAesthetic {
        /// Geometry name.
        geom: String,
        /// Channel name.
        channel: String,
    },

    /// A column was added whose length differs from the dataset row count.
    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        /// Column name.
        column: String,
        /// Row count of the dataset.
        expected: usize,
        /// Length of the offending column.
        actual: usize,
    },

    /// A column with the same name already exists.
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid dimensions for framebuffer or output.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// Output path has an extension we cannot encode.
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Scale domain error (e.g. a continuous scale over a discrete column).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),

    /// Color parsing error.
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Geometry name not recognised.
    #[error("Unknown geom: {0}")]
    UnknownGeom(String),

    /// Statistic name not recognised.
    #[error("Unknown statistic: {0}")]
    UnknownStatistic(String),

    /// Palette name not recognised.
    #[error("Unknown palette: {0}")]
    UnknownPalette(String),

    /// Axis label format template could not be parsed.
    #[error("Invalid axis label format '{template}': {reason}")]
    InvalidFormat {
        /// The template as given.
        template: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Style options could not be parsed.
    #[error("Config parse error at line {line}: {message}")]
    ConfigParse {
        /// Line number (1-based, 0 when unknown).
        line: usize,
        /// Parser message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_column_names_column() {
        let err = Error::UnknownColumn("missing_col".into());
        assert!(err.to_string().contains("missing_col"));
    }

    #[test]
    fn test_incompatible_statistic_display() {
        let err = Error::IncompatibleStatistic {
            geom: "point".into(),
            stat: "count".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("point"));
        assert!(msg.contains("count"));
    }

    #[test]
    fn test_ragged_column_display() {
        let err = Error::RaggedColumn {
            column: "value".into(),
            expected: 3,
            actual: 2,
        };
        assert!(err.to_string().contains("value"));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_io_from() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
