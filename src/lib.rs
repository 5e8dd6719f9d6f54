//! # pca-viz
//!
//! Charts for principal component analysis results: an explained variance
//! chart (scree bars with a cumulative step line and a threshold marker)
//! and a biplot (normalized sample scores with loading arrows).
//!
//! Plots are laid out as explicit [`Figure`](figure::Figure) objects, so the
//! same chart can be rendered to PNG, SVG or the terminal, or inspected
//! directly in tests.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pca_viz::prelude::*;
//!
//! let chart = VarianceChart::new()
//!     .ratios(&[0.5, 0.3, 0.1, 0.1])
//!     .build()?;
//! assert_eq!(chart.summary().map(|s| s.components), Some(2));
//! chart.figure()?.write_svg("variance.svg")?;
//!
//! let biplot = Biplot::new()
//!     .scores(&scores)
//!     .loadings(&loadings)
//!     .names(&sample_names)
//!     .build()?;
//! biplot.figure()?.write_png("biplot.png")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for colors and chart styles
//!
//! ## Logging
//!
//! Diagnostics go through the [`log`] facade; install any logger to see
//! them. Building a variance chart logs how many components reach the
//! threshold at `info` level.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// RGBA colors and named constants.
pub mod color;

/// Raster target for chart rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles, arrow heads).
pub mod geometry;

/// Scale functions and tick generation.
pub mod scale;

/// Chart styling and layout configuration.
pub mod style;

// ============================================================================
// Visualization Modules
// ============================================================================

/// Backend-independent figures made of marks.
pub mod figure;

/// High-level PCA plot types (variance chart, biplot).
pub mod plots;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization primitives.
pub mod render;

/// Output encoders (PNG, SVG, terminal).
pub mod output;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for pca-viz operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use pca_viz::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::color::Rgba;
    pub use crate::error::{Axis, Error, Result};
    pub use crate::figure::{Figure, Mark, TextMark};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Point, Rect};
    pub use crate::output::{PngEncoder, SvgEncoder, TerminalEncoder, TerminalMode};
    pub use crate::plots::{
        components_for_threshold, cumulative_variance, loading_labels, Biplot, NormalizationScale, VarianceChart,
        VarianceSummary,
    };
    pub use crate::style::{AxisStyle, BiplotStyle, VarianceChartStyle};
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;

/// Re-export ndarray so callers can build score and loading matrices.
pub use ndarray;
