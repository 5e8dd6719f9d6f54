//! High-level PCA plot types.
//!
//! Provides ready-to-use charts with builder APIs. Each builder lays out a
//! [`Figure`](crate::figure::Figure) that can be rendered to any output.

mod biplot;
mod variance;

pub use biplot::{loading_labels, Biplot, NormalizationScale};
pub use variance::{
    components_for_threshold, cumulative_variance, mid_steps, VarianceChart, VarianceSummary, DEFAULT_THRESHOLD,
};
