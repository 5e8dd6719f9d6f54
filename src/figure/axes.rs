//! Cartesian axes: data-to-pixel mapping plus decorations.

use super::{Figure, Mark, TextMark};
use crate::color::Rgba;
use crate::error::Result;
use crate::geometry::{Point, Rect};
use crate::output::{TextAnchor, TextBaseline};
use crate::scale::{format_tick, LinearScale, Scale};
use crate::style::AxisStyle;

/// Which vertical edge of the plot area a y axis is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Left edge (primary axis).
    Left,
    /// Right edge (secondary axis).
    Right,
}

/// A plot area with linear x and y scales.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axes {
    area: Rect,
    x: LinearScale,
    y: LinearScale,
}

impl Axes {
    /// Create axes mapping `x_domain` onto the area's width and `y_domain`
    /// onto its height (bottom to top).
    ///
    /// # Errors
    ///
    /// Returns an error if either domain is empty or not finite.
    pub fn new(area: Rect, x_domain: (f64, f64), y_domain: (f64, f64)) -> Result<Self> {
        Ok(Self {
            area,
            x: LinearScale::new(x_domain, (area.left(), area.right()))?,
            y: LinearScale::new(y_domain, (area.bottom(), area.top()))?,
        })
    }

    /// Axes sharing this x scale with an independent y domain.
    ///
    /// # Errors
    ///
    /// Returns an error if `y_domain` is empty or not finite.
    pub fn twin_y(&self, y_domain: (f64, f64)) -> Result<Self> {
        Ok(Self {
            area: self.area,
            x: self.x,
            y: LinearScale::new(y_domain, (self.area.bottom(), self.area.top()))?,
        })
    }

    /// Plot area in pixels.
    #[must_use]
    pub const fn area(&self) -> Rect {
        self.area
    }

    /// The x scale.
    #[must_use]
    pub const fn x_scale(&self) -> &LinearScale {
        &self.x
    }

    /// The y scale.
    #[must_use]
    pub const fn y_scale(&self) -> &LinearScale {
        &self.y
    }

    /// Map a data point to pixels.
    #[must_use]
    pub fn point(&self, x: f64, y: f64) -> Point {
        Point::new(self.x.scale(x), self.y.scale(y))
    }

    /// Grid lines at the given data positions.
    pub fn grid(&self, fig: &mut Figure, x_ticks: &[f64], y_ticks: &[f64], style: &AxisStyle) {
        for &x in x_ticks {
            let px = self.x.scale(x);
            fig.push(self.rule(Point::new(px, self.area.top()), Point::new(px, self.area.bottom()), style.grid_color, style.grid_width));
        }
        for &y in y_ticks {
            let py = self.y.scale(y);
            fig.push(self.rule(Point::new(self.area.left(), py), Point::new(self.area.right(), py), style.grid_color, style.grid_width));
        }
    }

    /// The four spines around the plot area.
    pub fn frame(&self, fig: &mut Figure, style: &AxisStyle) {
        let a = self.area;
        let corners = [
            Point::new(a.left(), a.top()),
            Point::new(a.right(), a.top()),
            Point::new(a.right(), a.bottom()),
            Point::new(a.left(), a.bottom()),
        ];
        for i in 0..4 {
            fig.push(self.rule(corners[i], corners[(i + 1) % 4], style.axis_color, style.axis_width));
        }
    }

    /// Tick marks and labels along the bottom edge.
    pub fn x_ticks(&self, fig: &mut Figure, ticks: &[f64], labels: &[String], style: &AxisStyle) {
        let y = self.area.bottom();
        for (&value, label) in ticks.iter().zip(labels) {
            let x = self.x.scale(value);
            fig.push(self.rule(Point::new(x, y), Point::new(x, y + style.tick_length), style.axis_color, style.axis_width));
            fig.push(Mark::Text(
                TextMark::new(Point::new(x, y + style.tick_length + 2.0), label.clone(), style.tick_font_size, style.axis_color)
                    .align(TextAnchor::Middle, TextBaseline::Hanging),
            ));
        }
    }

    /// Tick marks and labels along a vertical edge.
    pub fn y_ticks(
        &self,
        fig: &mut Figure,
        side: Side,
        ticks: &[f64],
        labels: &[String],
        color: Rgba,
        style: &AxisStyle,
    ) {
        let (x, dir, anchor) = match side {
            Side::Left => (self.area.left(), -1.0, TextAnchor::End),
            Side::Right => (self.area.right(), 1.0, TextAnchor::Start),
        };
        for (&value, label) in ticks.iter().zip(labels) {
            let y = self.y.scale(value);
            let tick_end = x + dir * style.tick_length;
            fig.push(self.rule(Point::new(x, y), Point::new(tick_end, y), style.axis_color, style.axis_width));
            fig.push(Mark::Text(
                TextMark::new(Point::new(tick_end + dir * 2.0, y), label.clone(), style.tick_font_size, color)
                    .align(anchor, TextBaseline::Middle),
            ));
        }
    }

    /// Title centered below the x axis.
    pub fn x_label(&self, fig: &mut Figure, text: &str, style: &AxisStyle) {
        let y = self.area.bottom() + style.tick_length + style.tick_font_size + 10.0 + style.label_font_size;
        fig.push(Mark::Text(
            TextMark::new(Point::new(self.area.center().x, y), text, style.label_font_size, style.axis_color)
                .align(TextAnchor::Middle, TextBaseline::Baseline),
        ));
    }

    /// Title rotated along a vertical edge.
    pub fn y_label(&self, fig: &mut Figure, side: Side, text: &str, color: Rgba, style: &AxisStyle) {
        // Room for tick marks plus roughly four digits of tick label
        let offset = style.tick_length + 4.0 + style.tick_font_size * 2.5 + style.label_font_size / 2.0;
        let (x, rotate) = match side {
            Side::Left => (self.area.left() - offset, -90.0),
            Side::Right => (self.area.right() + offset, 90.0),
        };
        fig.push(Mark::Text(
            TextMark::new(Point::new(x, self.area.center().y), text, style.label_font_size, color)
                .align(TextAnchor::Middle, TextBaseline::Middle)
                .rotate(rotate),
        ));
    }

    fn rule(&self, from: Point, to: Point, color: Rgba, width: f32) -> Mark {
        Mark::Line {
            from,
            to,
            color,
            width,
            dash: None,
        }
    }
}

/// Format evenly spaced tick values with a shared number of decimals.
#[must_use]
pub fn tick_labels(ticks: &[f64]) -> Vec<String> {
    let step = match ticks {
        [a, b, ..] => (b - a).abs(),
        _ => 1.0,
    };
    ticks.iter().map(|&t| format_tick(t, step)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn axes() -> Axes {
        Axes::new(Rect::new(10.0, 10.0, 100.0, 50.0), (0.0, 10.0), (0.0, 1.0)).unwrap()
    }

    #[test]
    fn test_point_mapping_flips_y() {
        let ax = axes();
        let p = ax.point(0.0, 0.0);
        assert_relative_eq!(p.x, 10.0);
        assert_relative_eq!(p.y, 60.0);
        let q = ax.point(10.0, 1.0);
        assert_relative_eq!(q.x, 110.0);
        assert_relative_eq!(q.y, 10.0);
    }

    #[test]
    fn test_twin_shares_x() {
        let ax = axes();
        let twin = ax.twin_y((0.0, 2.0)).unwrap();
        assert_relative_eq!(twin.point(5.0, 1.0).x, ax.point(5.0, 0.5).x);
        assert_relative_eq!(twin.point(5.0, 1.0).y, ax.point(5.0, 0.5).y);
    }

    #[test]
    fn test_invalid_domain() {
        assert!(Axes::new(Rect::new(0.0, 0.0, 10.0, 10.0), (1.0, 1.0), (0.0, 1.0)).is_err());
    }

    #[test]
    fn test_frame_and_ticks_emit_marks() {
        let ax = axes();
        let style = AxisStyle::default();
        let mut fig = Figure::new(120, 100).unwrap();

        ax.frame(&mut fig, &style);
        assert_eq!(fig.marks().len(), 4);

        let ticks = [0.0, 0.5, 1.0];
        ax.y_ticks(&mut fig, Side::Right, &ticks, &tick_labels(&ticks), Rgba::GREEN, &style);
        assert_eq!(fig.texts().count(), 3);
        let label = fig.find_text("0.5").unwrap();
        assert_eq!(label.color, Rgba::GREEN);
        assert_eq!(label.anchor, TextAnchor::Start);
        assert!(label.position.x > 110.0);
    }

    #[test]
    fn test_y_label_rotation() {
        let ax = axes();
        let mut fig = Figure::new(120, 100).unwrap();
        ax.y_label(&mut fig, Side::Left, "left", Rgba::BLUE, &AxisStyle::default());
        ax.y_label(&mut fig, Side::Right, "right", Rgba::GREEN, &AxisStyle::default());

        assert_relative_eq!(fig.find_text("left").unwrap().rotate, -90.0);
        assert_relative_eq!(fig.find_text("right").unwrap().rotate, 90.0);
    }

    #[test]
    fn test_tick_labels() {
        assert_eq!(tick_labels(&[0.0, 0.2, 0.4]), vec!["0.0", "0.2", "0.4"]);
        assert_eq!(tick_labels(&[1.0, 2.0]), vec!["1", "2"]);
        assert_eq!(tick_labels(&[3.0]), vec!["3"]);
    }
}
