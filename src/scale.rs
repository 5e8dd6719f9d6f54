//! Scale functions for data-to-pixel mappings.
//!
//! Data arrives as `f64` (what PCA routines produce); pixel positions are
//! `f32`, matching the framebuffer and SVG coordinate types.

use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous data-to-pixel mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// A reversed range (e.g. `(bottom, top)` for a y axis) is allowed.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty or not finite.
    pub fn new(domain: (f64, f64), range: (f32, f32)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain(format!(
                "Domain bounds must be finite, got [{}, {}]",
                domain.0, domain.1
            )));
        }
        if (domain.1 - domain.0).abs() < f64::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }
}

impl Scale<f64, f32> for LinearScale {
    fn scale(&self, value: f64) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + (t as f32) * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f64, f64) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Extent of `values` widened by `margin` (a fraction of the span) on both
/// sides.
///
/// Returns `None` for empty input. A zero-width extent is widened by
/// ±0.5 so that it can still back a [`LinearScale`].
#[must_use]
pub fn padded_extent<I>(values: I, margin: f64) -> Option<(f64, f64)>
where
    I: IntoIterator<Item = f64>,
{
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;

    let span = max - min;
    if span < f64::EPSILON {
        return Some((min - 0.5, max + 0.5));
    }
    Some((min - span * margin, max + span * margin))
}

/// "Nice" tick positions covering `[min, max]`, aiming for roughly
/// `target` ticks.
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten. Only ticks inside the
/// closed interval are returned.
#[must_use]
pub fn ticks(min: f64, max: f64, target: usize) -> Vec<f64> {
    if !min.is_finite() || !max.is_finite() || max <= min || target == 0 {
        return Vec::new();
    }

    let raw_step = (max - min) / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let first = (min / step).ceil() as i64;
    let last = (max / step).floor() as i64;
    (first..=last)
        .map(|i| {
            let v = i as f64 * step;
            // Snap values like 0.30000000000000004 back to their decimal form
            (v / step).round() * step
        })
        .collect()
}

/// Format a tick value with just enough decimals for `step`.
#[must_use]
pub fn format_tick(value: f64, step: f64) -> String {
    let decimals = (0..=10)
        .find(|&d| {
            let shifted = step * 10f64.powi(d);
            (shifted - shifted.round()).abs() < 1e-9 * shifted.max(1.0)
        })
        .unwrap_or(10) as usize;
    let value = if value.abs() < 1e-12 { 0.0 } else { value };
    format!("{value:.decimals$}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scale() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 500.0)).unwrap();
        assert_relative_eq!(scale.scale(50.0), 250.0);
        assert_relative_eq!(scale.scale(0.0), 0.0);
        assert_relative_eq!(scale.scale(100.0), 500.0);
    }

    #[test]
    fn test_linear_scale_reversed_range() {
        let scale = LinearScale::new((0.0, 1.0), (300.0, 100.0)).unwrap();
        assert_relative_eq!(scale.scale(0.0), 300.0);
        assert_relative_eq!(scale.scale(1.0), 100.0);
    }

    #[test]
    fn test_linear_scale_equal_domain_error() {
        assert!(LinearScale::new((5.0, 5.0), (0.0, 100.0)).is_err());
        assert!(LinearScale::new((0.0, f64::NAN), (0.0, 100.0)).is_err());
    }

    #[test]
    fn test_linear_scale_domain_range() {
        let scale = LinearScale::new((10.0, 20.0), (100.0, 200.0)).unwrap();
        assert_eq!(scale.domain(), (10.0, 20.0));
        assert_eq!(scale.range(), (100.0, 200.0));
    }

    #[test]
    fn test_padded_extent() {
        let (lo, hi) = padded_extent([0.0, 10.0], 0.05).unwrap();
        assert_relative_eq!(lo, -0.5);
        assert_relative_eq!(hi, 10.5);
    }

    #[test]
    fn test_padded_extent_degenerate() {
        assert_eq!(padded_extent([2.0, 2.0], 0.05), Some((1.5, 2.5)));
        assert_eq!(padded_extent(std::iter::empty(), 0.05), None);
        assert_eq!(padded_extent([f64::NAN], 0.05), None);
    }

    #[test]
    fn test_ticks_unit_interval() {
        let t = ticks(0.0, 1.0, 5);
        assert_eq!(t.len(), 6);
        assert_relative_eq!(t[0], 0.0);
        assert_relative_eq!(t[3], 0.6, epsilon = 1e-12);
        assert_relative_eq!(t[5], 1.0);
    }

    #[test]
    fn test_ticks_integer_range() {
        let t = ticks(0.5, 10.5, 10);
        assert_eq!(t, (1..=10).map(f64::from).collect::<Vec<_>>());
    }

    #[test]
    fn test_ticks_invalid() {
        assert!(ticks(1.0, 0.0, 5).is_empty());
        assert!(ticks(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(3.0, 1.0), "3");
        assert_eq!(format_tick(0.2, 0.2), "0.2");
        assert_eq!(format_tick(0.25, 0.25), "0.25");
        assert_eq!(format_tick(-1e-17, 0.1), "0.0");
    }
}
