//! PCA biplot: sample scores overlaid with variable loadings.
//!
//! Scores on the first two components are scaled by the reciprocal of
//! their range (the minimum is not subtracted, so points keep their sign
//! relative to the origin). Loadings are drawn unscaled as arrows from the
//! origin, each labeled just beyond its tip.

use crate::error::{Axis, Error, Result};
use crate::figure::{tick_labels, Axes, Figure, Mark, Side, TextMark};
use crate::framebuffer::Framebuffer;
use crate::geometry::Rect;
use crate::output::{SvgEncoder, TextAnchor, TextBaseline};
use crate::scale::{padded_extent, ticks};
use crate::style::BiplotStyle;
use ndarray::ArrayView2;

/// Per-axis reciprocal-range factors applied to sample scores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizationScale {
    /// `1 / (max - min)` of the first component scores.
    pub scale_x: f64,
    /// `1 / (max - min)` of the second component scores.
    pub scale_y: f64,
}

impl NormalizationScale {
    /// Compute factors from the first two columns of a score matrix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TooFewComponents`] for fewer than two columns,
    /// [`Error::EmptyInput`] for no rows, and [`Error::DegenerateRange`]
    /// when all scores on an axis are equal.
    pub fn from_scores<'a>(scores: impl Into<ArrayView2<'a, f64>>) -> Result<Self> {
        let scores = scores.into();
        if scores.ncols() < 2 {
            return Err(Error::TooFewComponents {
                matrix: "scores",
                columns: scores.ncols(),
            });
        }
        if scores.nrows() == 0 {
            return Err(Error::EmptyInput);
        }

        Ok(Self {
            scale_x: reciprocal_range(scores.column(0).iter().copied(), Axis::X)?,
            scale_y: reciprocal_range(scores.column(1).iter().copied(), Axis::Y)?,
        })
    }

    /// Compute factors from `(x, y)` score pairs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] for no points and
    /// [`Error::DegenerateRange`] when all values on an axis are equal.
    pub fn from_points(points: &[(f64, f64)]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(Self {
            scale_x: reciprocal_range(points.iter().map(|p| p.0), Axis::X)?,
            scale_y: reciprocal_range(points.iter().map(|p| p.1), Axis::Y)?,
        })
    }

    /// Scale a score pair.
    #[must_use]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (x * self.scale_x, y * self.scale_y)
    }
}

fn reciprocal_range(values: impl Iterator<Item = f64>, axis: Axis) -> Result<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let span = max - min;
    if !(span > 0.0 && span.is_finite()) {
        return Err(Error::DegenerateRange { axis });
    }
    Ok(1.0 / span)
}

/// Labels for `count` loading vectors.
///
/// Uses the first `count` entries of `labels` when given, otherwise
/// `Var1`, `Var2`, ...
///
/// # Errors
///
/// Returns [`Error::IndexOutOfRange`] if `labels` has fewer than `count`
/// entries.
pub fn loading_labels<S: AsRef<str>>(labels: Option<&[S]>, count: usize) -> Result<Vec<String>> {
    match labels {
        Some(labels) if labels.len() < count => Err(Error::IndexOutOfRange {
            sequence: "labels",
            index: labels.len(),
            len: labels.len(),
        }),
        Some(labels) => Ok(labels[..count].iter().map(|l| l.as_ref().to_string()).collect()),
        None => Ok((1..=count).map(|i| format!("Var{i}")).collect()),
    }
}

/// Builder for PCA biplots.
#[derive(Debug, Clone)]
pub struct Biplot {
    scores: Vec<(f64, f64)>,
    score_columns: usize,
    loadings: Vec<(f64, f64)>,
    loading_columns: usize,
    labels: Option<Vec<String>>,
    names: Vec<String>,
    style: BiplotStyle,
    width: u32,
    height: u32,
    scale: Option<NormalizationScale>,
}

impl Default for Biplot {
    fn default() -> Self {
        Self::new()
    }
}

/// First two columns of a matrix as pairs, plus its column count.
fn leading_pairs(matrix: &ArrayView2<'_, f64>) -> (Vec<(f64, f64)>, usize) {
    let pairs = if matrix.ncols() < 2 {
        Vec::new()
    } else {
        matrix.rows().into_iter().map(|row| (row[0], row[1])).collect()
    };
    (pairs, matrix.ncols())
}

impl Biplot {
    /// Create a new biplot builder (640x480).
    #[must_use]
    pub fn new() -> Self {
        Self {
            scores: Vec::new(),
            score_columns: 0,
            loadings: Vec::new(),
            loading_columns: 0,
            labels: None,
            names: Vec::new(),
            style: BiplotStyle::default(),
            width: 640,
            height: 480,
            scale: None,
        }
    }

    /// Set the sample scores (samples x components).
    #[must_use]
    pub fn scores<'a>(mut self, scores: impl Into<ArrayView2<'a, f64>>) -> Self {
        (self.scores, self.score_columns) = leading_pairs(&scores.into());
        self.scale = None;
        self
    }

    /// Set the variable loadings (variables x components).
    #[must_use]
    pub fn loadings<'a>(mut self, loadings: impl Into<ArrayView2<'a, f64>>) -> Self {
        (self.loadings, self.loading_columns) = leading_pairs(&loadings.into());
        self
    }

    /// Set the variable labels drawn at the loading arrows.
    #[must_use]
    pub fn labels<S: AsRef<str>>(mut self, labels: &[S]) -> Self {
        self.labels = Some(labels.iter().map(|l| l.as_ref().to_string()).collect());
        self
    }

    /// Set the sample names drawn next to each point (one per sample).
    #[must_use]
    pub fn names<S: AsRef<str>>(mut self, names: &[S]) -> Self {
        self.names = names.iter().map(|n| n.as_ref().to_string()).collect();
        self
    }

    /// Set the biplot style.
    #[must_use]
    pub fn style(mut self, style: BiplotStyle) -> Self {
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

    /// Number of samples.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.scores.len()
    }

    /// Number of loading vectors.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.loadings.len()
    }

    /// Build and validate the biplot.
    ///
    /// # Errors
    ///
    /// Returns an error if either matrix has fewer than two columns, there
    /// are no samples, names are missing or too short, labels are too
    /// short, a score axis has zero range, or the dimensions leave no plot
    /// area.
    pub fn build(mut self) -> Result<Self> {
        self.plot_area()?;
        let scale = self.normalization()?;
        self.loading_labels()?;
        if self.names.len() < self.scores.len() {
            return Err(Error::IndexOutOfRange {
                sequence: "names",
                index: self.names.len(),
                len: self.names.len(),
            });
        }

        log::debug!(
            "biplot: {} samples, {} variables, scale x {:.6}, scale y {:.6}",
            self.scores.len(),
            self.loadings.len(),
            scale.scale_x,
            scale.scale_y
        );
        self.scale = Some(scale);
        Ok(self)
    }

    /// Score normalization factors.
    ///
    /// # Errors
    ///
    /// Same conditions as [`NormalizationScale::from_points`], plus
    /// [`Error::TooFewComponents`] for either matrix.
    pub fn normalization(&self) -> Result<NormalizationScale> {
        if let Some(scale) = self.scale {
            return Ok(scale);
        }
        if self.scores.is_empty() && self.score_columns >= 2 {
            return Err(Error::EmptyInput);
        }
        for (matrix, columns) in [("scores", self.score_columns), ("loadings", self.loading_columns)] {
            if columns < 2 {
                return Err(Error::TooFewComponents { matrix, columns });
            }
        }
        NormalizationScale::from_points(&self.scores)
    }

    /// Sample positions after normalization, in input order.
    ///
    /// # Errors
    ///
    /// Returns an error if the scores cannot be normalized.
    pub fn projected_points(&self) -> Result<Vec<(f64, f64)>> {
        let scale = self.normalization()?;
        Ok(self.scores.iter().map(|&(x, y)| scale.apply(x, y)).collect())
    }

    /// Resolved loading labels, in row order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if explicit labels are too short.
    pub fn loading_labels(&self) -> Result<Vec<String>> {
        loading_labels(self.labels.as_deref(), self.loadings.len())
    }

    fn plot_area(&self) -> Result<Rect> {
        Rect::inset(self.width, self.height, self.style.axis.insets).ok_or(Error::InvalidDimensions {
            width: self.width,
            height: self.height,
        })
    }

    /// Lay out the biplot as a figure.
    ///
    /// # Errors
    ///
    /// Returns an error under the same conditions as [`build`](Self::build).
    pub fn figure(&self) -> Result<Figure> {
        let built = self.clone().build()?;
        let style = &built.style;
        let points = built.projected_points()?;
        let labels = built.loading_labels()?;
        let offset = style.label_offset;

        // Extent covers samples, the origin, arrow tips and label anchors
        let xs = points
            .iter()
            .map(|p| p.0)
            .chain(std::iter::once(0.0))
            .chain(built.loadings.iter().flat_map(|l| [l.0, l.0 * offset]));
        let ys = points
            .iter()
            .map(|p| p.1)
            .chain(std::iter::once(0.0))
            .chain(built.loadings.iter().flat_map(|l| [l.1, l.1 * offset]));
        let x_domain = padded_extent(xs, style.margin).ok_or(Error::EmptyInput)?;
        let y_domain = padded_extent(ys, style.margin).ok_or(Error::EmptyInput)?;
        log::debug!("biplot axis limits: x {x_domain:?}, y {y_domain:?}");

        let axes = Axes::new(built.plot_area()?, x_domain, y_domain)?;
        let x_ticks = ticks(x_domain.0, x_domain.1, style.axis.tick_count);
        let y_ticks = ticks(y_domain.0, y_domain.1, style.axis.tick_count);

        let mut fig = Figure::new(built.width, built.height)?.with_background(style.axis.background);
        if style.grid {
            axes.grid(&mut fig, &x_ticks, &y_ticks, &style.axis);
        }

        for (&(x, y), name) in points.iter().zip(&built.names) {
            let center = axes.point(x, y);
            fig.push(Mark::Circle {
                center,
                radius: style.point_radius,
                fill: style.point_color,
            });
            fig.push(Mark::Text(TextMark::new(center, name.clone(), style.name_font_size, style.name_color)));
        }

        let origin = axes.point(0.0, 0.0);
        for (&(lx, ly), label) in built.loadings.iter().zip(labels) {
            fig.push(Mark::Arrow {
                tail: origin,
                tip: axes.point(lx, ly),
                color: style.arrow_color,
                width: style.arrow_width,
                head_size: style.arrow_head,
            });
            fig.push(Mark::Text(
                TextMark::new(axes.point(lx * offset, ly * offset), label, style.label_font_size, style.label_color)
                    .align(TextAnchor::Middle, TextBaseline::Middle),
            ));
        }

        axes.frame(&mut fig, &style.axis);
        axes.x_ticks(&mut fig, &x_ticks, &tick_labels(&x_ticks), &style.axis);
        axes.y_ticks(&mut fig, Side::Left, &y_ticks, &tick_labels(&y_ticks), style.axis.axis_color, &style.axis);
        axes.x_label(&mut fig, &style.x_label, &style.axis);
        axes.y_label(&mut fig, Side::Left, &style.y_label, style.axis.axis_color, &style.axis);

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

impl batuta_common::display::WithDimensions for Biplot {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use approx::assert_relative_eq;
    use batuta_common::display::WithDimensions;
    use ndarray::{array, Array2};

    fn scores() -> Array2<f64> {
        array![[1.0, 2.0], [3.0, -1.0], [5.0, 0.5]]
    }

    fn loadings() -> Array2<f64> {
        array![[0.8, 0.3], [-0.4, 0.9]]
    }

    fn biplot() -> Biplot {
        Biplot::new()
            .scores(&scores())
            .loadings(&loadings())
            .names(&["s1", "s2", "s3"])
    }

    #[test]
    fn test_normalization_scale() {
        let scale = NormalizationScale::from_scores(&scores()).unwrap();
        assert_relative_eq!(scale.scale_x, 0.25);
        assert_relative_eq!(scale.scale_y, 1.0 / 3.0);

        let (x, y) = scale.apply(3.0, -1.0);
        assert_relative_eq!(x, 0.75);
        assert_relative_eq!(y, -1.0 / 3.0);
    }

    #[test]
    fn test_normalized_span_is_one() {
        let points = biplot().projected_points().unwrap();
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        assert_relative_eq!(xs[0], 0.25);
        assert_relative_eq!(xs[1], 0.75);
        assert_relative_eq!(xs[2], 1.25);
        assert_relative_eq!(xs[2] - xs[0], 1.0);
    }

    #[test]
    fn test_degenerate_range() {
        let constant_x = array![[2.0, 1.0], [2.0, 3.0]];
        assert!(matches!(
            NormalizationScale::from_scores(&constant_x),
            Err(Error::DegenerateRange { axis: Axis::X })
        ));
        let constant_y = array![[1.0, 3.0], [2.0, 3.0]];
        assert!(matches!(
            NormalizationScale::from_scores(&constant_y),
            Err(Error::DegenerateRange { axis: Axis::Y })
        ));
        // A single sample has no range either
        assert!(matches!(
            NormalizationScale::from_points(&[(1.0, 1.0)]),
            Err(Error::DegenerateRange { .. })
        ));
    }

    #[test]
    fn test_too_few_components() {
        let one_column = array![[1.0], [2.0]];
        assert!(matches!(
            NormalizationScale::from_scores(&one_column),
            Err(Error::TooFewComponents {
                matrix: "scores",
                columns: 1
            })
        ));
        let result = Biplot::new().scores(&scores()).loadings(&one_column).build();
        assert!(matches!(
            result,
            Err(Error::TooFewComponents {
                matrix: "loadings",
                ..
            })
        ));
    }

    #[test]
    fn test_empty_scores() {
        let empty = Array2::<f64>::zeros((0, 2));
        assert!(matches!(NormalizationScale::from_scores(&empty), Err(Error::EmptyInput)));
        let result = Biplot::new().scores(&empty).loadings(&loadings()).build();
        assert!(matches!(result, Err(Error::EmptyInput)));
    }

    #[test]
    fn test_default_loading_labels() {
        let labels = loading_labels::<&str>(None, 3).unwrap();
        assert_eq!(labels, vec!["Var1", "Var2", "Var3"]);
        assert_eq!(biplot().loading_labels().unwrap(), vec!["Var1", "Var2"]);
    }

    #[test]
    fn test_explicit_loading_labels() {
        let labels = loading_labels(Some(&["a", "b", "c"][..]), 2).unwrap();
        assert_eq!(labels, vec!["a", "b"]);

        let err = loading_labels(Some(&["a"][..]), 2).unwrap_err();
        assert!(matches!(
            err,
            Error::IndexOutOfRange {
                sequence: "labels",
                index: 1,
                len: 1
            }
        ));
    }

    #[test]
    fn test_short_names() {
        let result = biplot().names(&["only"]).build();
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange {
                sequence: "names",
                index: 1,
                len: 1
            })
        ));
    }

    #[test]
    fn test_short_labels() {
        let result = biplot().labels(&["x"]).build();
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange {
                sequence: "labels",
                ..
            })
        ));
    }

    #[test]
    fn test_build_caches_scale() {
        let plot = biplot().build().unwrap();
        assert_eq!(plot.sample_count(), 3);
        assert_eq!(plot.variable_count(), 2);
        assert_relative_eq!(plot.normalization().unwrap().scale_x, 0.25);
    }

    #[test]
    fn test_figure_marks() {
        let fig = biplot().labels(&["height", "weight"]).build().unwrap().figure().unwrap();
        assert_eq!((fig.width(), fig.height()), (640, 480));

        let arrows: Vec<_> = fig
            .marks()
            .iter()
            .filter_map(|m| match m {
                Mark::Arrow { tail, tip, color, .. } => Some((*tail, *tip, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(arrows.len(), 2);
        assert_eq!(arrows[0].2.a, 128);

        // Labels sit at 1.15x the tip, measured from the origin
        let label = fig.find_text("height").unwrap();
        let (tail, tip, _) = arrows[0];
        assert_relative_eq!(label.position.x - tail.x, 1.15 * (tip.x - tail.x), epsilon = 1e-2);
        assert_relative_eq!(label.position.y - tail.y, 1.15 * (tip.y - tail.y), epsilon = 1e-2);
        assert_eq!(label.color, Rgba::GREEN);
        assert_eq!(label.anchor, TextAnchor::Middle);

        let circles: Vec<_> = fig
            .marks()
            .iter()
            .filter_map(|m| match m {
                Mark::Circle { center, .. } => Some(*center),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), 3);
        let name = fig.find_text("s2").unwrap();
        assert_eq!(name.position, circles[1]);
        assert_eq!(name.color, Rgba::BLACK);
        assert_relative_eq!(name.size, 9.0);

        assert!(fig.find_text("PC1").is_some());
        assert!(fig.find_text("PC2").is_some());
    }

    #[test]
    fn test_names_are_required() {
        let result = Biplot::new().scores(&scores()).loadings(&loadings()).build();
        assert!(matches!(
            result,
            Err(Error::IndexOutOfRange {
                sequence: "names",
                index: 0,
                len: 0
            })
        ));
        assert!(Biplot::new().scores(&scores()).loadings(&loadings()).figure().is_err());

        let empty: [&str; 0] = [];
        assert!(matches!(
            biplot().names(&empty).build(),
            Err(Error::IndexOutOfRange { sequence: "names", .. })
        ));
    }

    #[test]
    fn test_biplot_renders() {
        let plot = biplot().build().unwrap();
        let fb = plot.to_framebuffer().unwrap();
        let arrows = fb.count_pixels(|c| c.r > 200 && c.g < 80 && c.b < 80 && c.a > 0);
        assert!(arrows > 0);
        let points = fb.count_pixels(|c| c.b > 150 && c.r < 80 && c.a > 200);
        assert!(points > 0);

        let svg = plot.to_svg().unwrap().render();
        assert!(svg.contains(">PC1</text>"));
        assert!(svg.contains(">Var2</text>"));
        assert!(svg.contains(">s3</text>"));
    }

    #[test]
    fn test_set_dimensions() {
        let mut plot = biplot();
        plot.set_dimensions(300, 200);
        let fig = plot.figure().unwrap();
        assert_eq!((fig.width(), fig.height()), (300, 200));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_normalized_span_is_one(
            points in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 2..50)
        ) {
            let result = NormalizationScale::from_points(&points);
            let (min_x, max_x) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.0), hi.max(p.0)));
            let (min_y, max_y) = points.iter().fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.1), hi.max(p.1)));
            prop_assume!(max_x > min_x && max_y > min_y);

            let scale = result.unwrap();
            let (lo, _) = scale.apply(min_x, min_y);
            let (hi, _) = scale.apply(max_x, max_y);
            prop_assert!((hi - lo - 1.0).abs() < 1e-9);
            let (_, lo) = scale.apply(min_x, min_y);
            let (_, hi) = scale.apply(max_x, max_y);
            prop_assert!((hi - lo - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_default_labels_follow_row_order(count in 0usize..40) {
            let labels = loading_labels::<String>(None, count).unwrap();
            prop_assert_eq!(labels.len(), count);
            for (i, label) in labels.iter().enumerate() {
                prop_assert_eq!(label, &format!("Var{}", i + 1));
            }
        }
    }
}
