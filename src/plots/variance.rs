//! Explained variance chart (scree plot with cumulative step).
//!
//! Bars show each component's explained variance ratio on the left axis;
//! a mid-step line shows the running total on a right axis fixed to
//! `[0, 1]`. A dashed marker sits at the first component whose cumulative
//! variance reaches the threshold.

use crate::error::{Error, Result};
use crate::figure::{tick_labels, Axes, Figure, Mark, Side};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::SvgEncoder;
use crate::scale::ticks;
use crate::style::VarianceChartStyle;

/// Default cumulative variance threshold.
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Most x tick labels drawn before thinning.
const MAX_X_TICKS: usize = 20;

/// Running prefix sums of `ratios`.
#[must_use]
pub fn cumulative_variance(ratios: &[f64]) -> Vec<f64> {
    ratios
        .iter()
        .scan(0.0, |sum, &r| {
            *sum += r;
            Some(*sum)
        })
        .collect()
}

/// Number of leading components needed for the cumulative explained
/// variance to reach `threshold` (1-based).
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] for no ratios, [`Error::InvalidRatio`] for
/// a negative or non-finite ratio, [`Error::InvalidThreshold`] for a
/// threshold outside `(0, 1]`, and [`Error::InsufficientVariance`] when the
/// total never reaches the threshold.
pub fn components_for_threshold(ratios: &[f64], threshold: f64) -> Result<usize> {
    validate(ratios, threshold)?;
    first_reaching(&cumulative_variance(ratios), threshold)
}

fn validate(ratios: &[f64], threshold: f64) -> Result<()> {
    if !(threshold > 0.0 && threshold <= 1.0) {
        return Err(Error::InvalidThreshold(threshold));
    }
    if ratios.is_empty() {
        return Err(Error::EmptyInput);
    }
    if let Some((index, &value)) = ratios.iter().enumerate().find(|(_, r)| !r.is_finite() || **r < 0.0) {
        return Err(Error::InvalidRatio { index, value });
    }
    Ok(())
}

fn first_reaching(cumulative: &[f64], threshold: f64) -> Result<usize> {
    cumulative
        .iter()
        .position(|&c| c >= threshold)
        .map(|i| i + 1)
        .ok_or(Error::InsufficientVariance {
            threshold,
            total: cumulative.last().copied().unwrap_or(0.0),
        })
}

/// Vertices of a "mid" step line through `(1, v[0]), (2, v[1]), ...`.
///
/// Each value is held from halfway before its index to halfway after it;
/// the line starts at `x = 1` and ends at `x = n`.
#[must_use]
pub fn mid_steps(values: &[f64]) -> Vec<(f64, f64)> {
    let mut path = Vec::with_capacity(values.len() * 2);
    for (i, &v) in values.iter().enumerate() {
        let x = (i + 1) as f64;
        if i == 0 {
            path.push((x, v));
        } else {
            path.push((x - 0.5, v));
        }
        if i + 1 < values.len() {
            path.push((x + 0.5, v));
        } else if i > 0 {
            path.push((x, v));
        }
    }
    path
}

/// Derived quantities behind a variance chart.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceSummary {
    /// Running prefix sums of the ratios.
    pub cumulative: Vec<f64>,
    /// Threshold the marker refers to.
    pub threshold: f64,
    /// 1-based index of the first component reaching the threshold.
    pub components: usize,
    /// Sum of all ratios.
    pub total: f64,
    /// Largest single ratio.
    pub max_ratio: f64,
}

impl VarianceSummary {
    /// Summarize `ratios` against `threshold`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`components_for_threshold`].
    pub fn from_ratios(ratios: &[f64], threshold: f64) -> Result<Self> {
        validate(ratios, threshold)?;
        let cumulative = cumulative_variance(ratios);
        let components = first_reaching(&cumulative, threshold)?;
        let total = cumulative.last().copied().unwrap_or(0.0);
        let max_ratio = ratios.iter().copied().fold(0.0, f64::max);

        Ok(Self {
            cumulative,
            threshold,
            components,
            total,
            max_ratio,
        })
    }

    /// Upper limit of the ratio axis with the given headroom factor.
    #[must_use]
    pub fn ratio_axis_max(&self, headroom: f64) -> f64 {
        let max = self.max_ratio * headroom;
        if max > 0.0 {
            max
        } else {
            1.0
        }
    }
}

/// Builder for explained variance charts.
#[derive(Debug, Clone)]
pub struct VarianceChart {
    ratios: Vec<f64>,
    threshold: f64,
    style: VarianceChartStyle,
    width: u32,
    height: u32,
    summary: Option<VarianceSummary>,
}

impl Default for VarianceChart {
    fn default() -> Self {
        Self::new()
    }
}

impl VarianceChart {
    /// Create a new chart builder (800x400, threshold 0.8).
    #[must_use]
    pub fn new() -> Self {
        Self {
            ratios: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            style: VarianceChartStyle::default(),
            width: 800,
            height: 400,
            summary: None,
        }
    }

    /// Set the explained variance ratio of each component, in order.
    #[must_use]
    pub fn ratios(mut self, ratios: &[f64]) -> Self {
        self.ratios = ratios.to_vec();
        self.summary = None;
        self
    }

    /// Set the cumulative variance threshold marked on the chart.
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self.summary = None;
        self
    }

    /// Set the chart style.
    #[must_use]
    pub fn style(mut self, style: VarianceChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the output dimensions.
    #[must_use]
    pub fn dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Number of components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.ratios.len()
    }

    /// Build and validate the chart.
    ///
    /// # Errors
    ///
    /// Returns an error if the ratios are empty or invalid, the threshold is
    /// out of range or never reached, or the dimensions leave no plot area.
    pub fn build(mut self) -> Result<Self> {
        self.plot_area()?;
        let summary = VarianceSummary::from_ratios(&self.ratios, self.threshold)?;
        log::info!(
            "{}% of variance is explained by {} components",
            self.threshold * 100.0,
            summary.components
        );
        self.summary = Some(summary);
        Ok(self)
    }

    /// Derived quantities, available after [`build`](Self::build).
    #[must_use]
    pub fn summary(&self) -> Option<&VarianceSummary> {
        self.summary.as_ref()
    }

    fn plot_area(&self) -> Result<Rect> {
        Rect::inset(self.width, self.height, self.style.axis.insets).ok_or(Error::InvalidDimensions {
            width: self.width,
            height: self.height,
        })
    }

    /// Lay out the chart as a figure.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`build`](Self::build).
    pub fn figure(&self) -> Result<Figure> {
        let summary = match &self.summary {
            Some(summary) => summary.clone(),
            None => VarianceSummary::from_ratios(&self.ratios, self.threshold)?,
        };
        let style = &self.style;
        let n = self.ratios.len();
        let ratio_max = summary.ratio_axis_max(style.headroom);
        log::debug!("variance chart: {n} components, ratio axis [0, {ratio_max:.4}]");

        let area = self.plot_area()?;
        let x_domain = (0.5, n as f64 + 0.5);
        let ratio_axes = Axes::new(area, x_domain, (0.0, ratio_max))?;
        let cumulative_axes = ratio_axes.twin_y((0.0, 1.0))?;

        let mut fig = Figure::new(self.width, self.height)?.with_background(style.axis.background);

        let x_ticks: Vec<f64> = (1..=n).step_by(n.div_ceil(MAX_X_TICKS)).map(|i| i as f64).collect();
        let ratio_ticks = ticks(0.0, ratio_max, style.axis.tick_count);
        let cumulative_ticks = ticks(0.0, 1.0, style.axis.tick_count);

        if style.grid {
            ratio_axes.grid(&mut fig, &x_ticks, &ratio_ticks, &style.axis);
        }

        let half = f64::from(style.bar_width) / 2.0;
        for (i, &ratio) in self.ratios.iter().enumerate() {
            let x = (i + 1) as f64;
            let top_left = ratio_axes.point(x - half, ratio);
            let bottom_right = ratio_axes.point(x + half, 0.0);
            fig.push(Mark::Rect {
                rect: Rect::new(
                    top_left.x,
                    top_left.y,
                    bottom_right.x - top_left.x,
                    bottom_right.y - top_left.y,
                ),
                fill: style.bar_color,
            });
        }

        let steps: Vec<Point> = mid_steps(&summary.cumulative)
            .into_iter()
            .map(|(x, y)| cumulative_axes.point(x, y))
            .collect();
        fig.push(Mark::Polyline {
            points: steps,
            color: style.cumulative_color,
            width: style.cumulative_width,
        });

        let marker_x = ratio_axes.point(summary.components as f64, 0.0).x;
        fig.push(Mark::Line {
            from: Point::new(marker_x, area.top()),
            to: Point::new(marker_x, area.bottom()),
            color: style.marker_color,
            width: style.marker_width,
            dash: Some(style.marker_dash),
        });

        ratio_axes.frame(&mut fig, &style.axis);
        ratio_axes.x_ticks(&mut fig, &x_ticks, &tick_labels(&x_ticks), &style.axis);
        ratio_axes.y_ticks(
            &mut fig,
            Side::Left,
            &ratio_ticks,
            &tick_labels(&ratio_ticks),
            style.ratio_axis_color,
            &style.axis,
        );
        cumulative_axes.y_ticks(
            &mut fig,
            Side::Right,
            &cumulative_ticks,
            &tick_labels(&cumulative_ticks),
            style.cumulative_color,
            &style.axis,
        );
        ratio_axes.x_label(&mut fig, &style.x_label, &style.axis);
        ratio_axes.y_label(&mut fig, Side::Left, &style.ratio_label, style.ratio_axis_color, &style.axis);
        cumulative_axes.y_label(
            &mut fig,
            Side::Right,
            &style.cumulative_label,
            style.cumulative_color,
            &style.axis,
        );

        Ok(fig)
    }

    /// Render to a new framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if layout or rendering fails.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        self.figure()?.to_framebuffer()
    }

    /// Render to an SVG document.
    ///
    /// # Errors
    ///
    /// Returns an error if layout fails.
    pub fn to_svg(&self) -> Result<SvgEncoder> {
        Ok(self.figure()?.to_svg())
    }
}

impl batuta_common::display::WithDimensions for VarianceChart {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_cumulative_is_monotonic(ratios in prop::collection::vec(0.0f64..1.0, 1..30)) {
            let cumulative = cumulative_variance(&ratios);
            prop_assert_eq!(cumulative.len(), ratios.len());
            prop_assert!(cumulative.windows(2).all(|w| w[1] >= w[0]));
        }

        #[test]
        fn prop_marker_is_first_index_reaching_threshold(
            ratios in prop::collection::vec(0.0f64..1.0, 1..30),
            threshold in 0.01f64..1.0,
        ) {
            let cumulative = cumulative_variance(&ratios);
            match components_for_threshold(&ratios, threshold) {
                Ok(k) => {
                    prop_assert!(k >= 1 && k <= ratios.len());
                    prop_assert!(cumulative[k - 1] >= threshold);
                    if k > 1 {
                        prop_assert!(cumulative[k - 2] < threshold);
                    }
                }
                Err(Error::InsufficientVariance { total, .. }) => {
                    prop_assert!(total < threshold);
                }
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn prop_chart_lays_out(ratios in prop::collection::vec(0.01f64..1.0, 1..40)) {
            let total: f64 = ratios.iter().sum();
            let normalized: Vec<f64> = ratios.iter().map(|r| r / total).collect();
            let fig = VarianceChart::new().ratios(&normalized).figure();
            prop_assert!(fig.is_ok());
        }
    }
}
