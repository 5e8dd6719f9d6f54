//! Chart styling and layout configuration.
//!
//! Defaults reproduce the conventional look of a scree plot and a biplot
//! (blue bars, green cumulative step, red dashed threshold marker, red
//! loading arrows with green labels). With the `serde` feature enabled,
//! styles can be loaded from any serde format.

use crate::color::Rgba;
use crate::geometry::Insets;

/// Axis decoration shared by every chart.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisStyle {
    /// Figure background; `None` leaves it transparent.
    pub background: Option<Rgba>,
    /// Axis spine and default tick label color.
    pub axis_color: Rgba,
    /// Grid line color.
    pub grid_color: Rgba,
    /// Axis spine width in pixels.
    pub axis_width: f32,
    /// Grid line width in pixels.
    pub grid_width: f32,
    /// Tick label font size.
    pub tick_font_size: f32,
    /// Axis title font size.
    pub label_font_size: f32,
    /// Tick mark length in pixels.
    pub tick_length: f32,
    /// Approximate number of ticks per continuous axis.
    pub tick_count: usize,
    /// Padding between the figure edge and the plot area.
    pub insets: Insets,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            background: None,
            axis_color: Rgba::AXIS_GREY,
            grid_color: Rgba::GRID_GREY.with_alpha(128),
            axis_width: 1.0,
            grid_width: 1.0,
            tick_font_size: 11.0,
            label_font_size: 12.0,
            tick_length: 4.0,
            tick_count: 5,
            insets: Insets::default(),
        }
    }
}

/// Styling for [`VarianceChart`](crate::plots::VarianceChart).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VarianceChartStyle {
    /// Shared axis decoration.
    pub axis: AxisStyle,
    /// Bar fill (translucent by default).
    pub bar_color: Rgba,
    /// Bar width as a fraction of the component spacing.
    pub bar_width: f32,
    /// Primary axis title and tick label color.
    pub ratio_axis_color: Rgba,
    /// Cumulative step line color, also used for the secondary axis.
    pub cumulative_color: Rgba,
    /// Cumulative step line width.
    pub cumulative_width: f32,
    /// Threshold marker color.
    pub marker_color: Rgba,
    /// Threshold marker width.
    pub marker_width: f32,
    /// Threshold marker dash pattern (on, off) in pixels.
    pub marker_dash: (f32, f32),
    /// Primary axis headroom above the largest bar.
    pub headroom: f64,
    /// Draw grid lines.
    pub grid: bool,
    /// x axis title.
    pub x_label: String,
    /// Primary y axis title.
    pub ratio_label: String,
    /// Secondary y axis title.
    pub cumulative_label: String,
}

impl Default for VarianceChartStyle {
    fn default() -> Self {
        let mut axis = AxisStyle::default();
        axis.insets.right = 70;

        Self {
            axis,
            bar_color: Rgba::STEEL_BLUE.with_opacity(0.8),
            bar_width: 0.8,
            ratio_axis_color: Rgba::BLUE,
            cumulative_color: Rgba::GREEN,
            cumulative_width: 1.5,
            marker_color: Rgba::RED,
            marker_width: 1.5,
            marker_dash: (6.0, 4.0),
            headroom: 1.1,
            grid: false,
            x_label: "Principal Component".to_string(),
            ratio_label: "Explained Variance Ratio".to_string(),
            cumulative_label: "Cumulative Explained Variance".to_string(),
        }
    }
}

/// Styling for [`Biplot`](crate::plots::Biplot).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BiplotStyle {
    /// Shared axis decoration.
    pub axis: AxisStyle,
    /// Sample marker color.
    pub point_color: Rgba,
    /// Sample marker radius in pixels.
    pub point_radius: f32,
    /// Sample name color.
    pub name_color: Rgba,
    /// Sample name font size.
    pub name_font_size: f32,
    /// Loading arrow color (translucent by default).
    pub arrow_color: Rgba,
    /// Loading arrow shaft width.
    pub arrow_width: f32,
    /// Loading arrow head length in pixels.
    pub arrow_head: f32,
    /// Loading label color.
    pub label_color: Rgba,
    /// Loading label font size.
    pub label_font_size: f32,
    /// Loading labels sit at this multiple of the arrow tip.
    pub label_offset: f64,
    /// Fraction of the data span added around the plotted extent.
    pub margin: f64,
    /// Draw grid lines.
    pub grid: bool,
    /// x axis title.
    pub x_label: String,
    /// y axis title.
    pub y_label: String,
}

impl Default for BiplotStyle {
    fn default() -> Self {
        Self {
            axis: AxisStyle::default(),
            point_color: Rgba::STEEL_BLUE,
            point_radius: 3.0,
            name_color: Rgba::BLACK,
            name_font_size: 9.0,
            arrow_color: Rgba::RED.with_opacity(0.5),
            arrow_width: 1.5,
            arrow_head: 8.0,
            label_color: Rgba::GREEN,
            label_font_size: 11.0,
            label_offset: 1.15,
            margin: 0.05,
            grid: true,
            x_label: "PC1".to_string(),
            y_label: "PC2".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variance_defaults() {
        let style = VarianceChartStyle::default();
        assert_eq!(style.bar_color.a, 204);
        assert!((style.headroom - 1.1).abs() < f64::EPSILON);
        assert!(style.axis.background.is_none());
        assert_eq!(style.axis.insets.right, 70);
    }

    #[test]
    fn test_biplot_defaults() {
        let style = BiplotStyle::default();
        assert_eq!(style.arrow_color.a, 128);
        assert!((style.label_offset - 1.15).abs() < f64::EPSILON);
        assert!(style.grid);
        assert_eq!(style.x_label, "PC1");
        assert_eq!(style.y_label, "PC2");
    }
}
