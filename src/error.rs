//! Error types for pca-viz operations.

use std::io;
use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Plot axis, used to report which coordinate failed normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// First principal component (horizontal).
    X,
    /// Second principal component (vertical).
    Y,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::X => f.write_str("x"),
            Self::Y => f.write_str("y"),
        }
    }
}

/// Errors that can occur in pca-viz operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// PNG encoding error.
    #[error("PNG encoding error: {0}")]
    PngEncoding(#[from] png::EncodingError),

    /// Invalid dimensions for framebuffer or plot.
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width value.
        width: u32,
        /// Height value.
        height: u32,
    },

    /// The explained variance ratio sequence (or the sample set) is empty.
    #[error("Empty input provided")]
    EmptyInput,

    /// Cumulative explained variance never reaches the requested threshold.
    #[error("Cumulative explained variance {total:.4} never reaches threshold {threshold}")]
    InsufficientVariance {
        /// Requested cumulative threshold.
        threshold: f64,
        /// Total variance captured by all components.
        total: f64,
    },

    /// All sample coordinates are identical along an axis, so min-max
    /// normalization would divide by zero.
    #[error("Degenerate range on {axis} axis: all scores are equal")]
    DegenerateRange {
        /// Offending axis.
        axis: Axis,
    },

    /// A names or labels sequence is shorter than the data it annotates.
    #[error("Index {index} out of range for {sequence} of length {len}")]
    IndexOutOfRange {
        /// Which sequence was indexed ("names" or "labels").
        sequence: &'static str,
        /// First index that could not be resolved.
        index: usize,
        /// Actual length of the sequence.
        len: usize,
    },

    /// A score or loading matrix has fewer than two component columns.
    #[error("{matrix} matrix has {columns} component column(s), at least 2 required")]
    TooFewComponents {
        /// Which matrix ("scores" or "loadings").
        matrix: &'static str,
        /// Number of columns found.
        columns: usize,
    },

    /// An explained variance ratio is negative or not finite.
    #[error("Invalid explained variance ratio {value} at component {index}")]
    InvalidRatio {
        /// Zero-based component index.
        index: usize,
        /// Offending value.
        value: f64,
    },

    /// Cumulative variance threshold outside (0, 1].
    #[error("Invalid variance threshold {0}: must be in (0, 1]")]
    InvalidThreshold(f64),

    /// Scale domain error (e.g., zero-width domain).
    #[error("Scale domain error: {0}")]
    ScaleDomain(String),
}
