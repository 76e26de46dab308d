use std::path::PathBuf;

use thiserror::Error;

/// Result alias used by every fallible operation in the crate.
pub type Result<T> = std::result::Result<T, PlotError>;

/// Errors raised while computing statistics or rendering charts.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A requested column is not part of the table.
    #[error("unknown column: {0}")]
    UnknownColumn(String),

    /// The same column name appears twice in a table.
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// Two sequences that must be paired have different lengths.
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Zero-length data handed to a plotting primitive.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// A configured canvas or tile has no pixels.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A histogram was asked for zero buckets.
    #[error("histogram bucket count must be at least 1")]
    InvalidBucketCount,

    /// A metric series does not cover the declared number of epochs.
    #[error("metric '{metric}' has {actual} values, expected {expected}")]
    IncompleteSeries {
        metric: String,
        expected: usize,
        actual: usize,
    },

    /// Creating the output directory or writing the image failed.
    #[error("i/o error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The drawing backend rejected an operation.
    #[error("drawing error: {0}")]
    Drawing(String),

    /// PNG encoding failed for a reason other than i/o.
    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),
}

impl PlotError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlotError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn length_mismatch(
        context: impl Into<String>,
        expected: usize,
        actual: usize,
    ) -> Self {
        PlotError::LengthMismatch {
            context: context.into(),
            expected,
            actual,
        }
    }
}
