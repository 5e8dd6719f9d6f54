//! Explicit figure objects.
//!
//! Plot builders do not draw anywhere directly: they lay out a [`Figure`],
//! an ordered list of [`Mark`]s in pixel coordinates. The caller then
//! decides where the figure goes (framebuffer, PNG, SVG, terminal), and
//! tests can inspect the marks without any output surface.
//!
//! Text marks are carried by vector output only; raster targets skip them.

mod axes;

pub use axes::{tick_labels, Axes, Side};

use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::output::{PngEncoder, SvgElement, SvgEncoder, TerminalEncoder, TextAnchor, TextBaseline};
use crate::render::{draw_arrow, draw_circle, draw_dashed_line, draw_rect, draw_thick_line};
use std::path::Path;

/// A text annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextMark {
    /// Anchor position.
    pub position: Point,
    /// Text content.
    pub text: String,
    /// Font size in pixels.
    pub size: f32,
    /// Text color.
    pub color: Rgba,
    /// Horizontal alignment relative to `position`.
    pub anchor: TextAnchor,
    /// Vertical alignment relative to `position`.
    pub baseline: TextBaseline,
    /// Rotation in degrees around `position`.
    pub rotate: f32,
}

impl TextMark {
    /// Left-aligned, baseline-anchored, unrotated text.
    #[must_use]
    pub fn new(position: Point, text: impl Into<String>, size: f32, color: Rgba) -> Self {
        Self {
            position,
            text: text.into(),
            size,
            color,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Baseline,
            rotate: 0.0,
        }
    }

    /// Set the alignment.
    #[must_use]
    pub fn align(mut self, anchor: TextAnchor, baseline: TextBaseline) -> Self {
        self.anchor = anchor;
        self.baseline = baseline;
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = degrees;
        self
    }
}

/// One drawable element of a figure, in pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    /// Filled rectangle.
    Rect {
        /// Extent.
        rect: Rect,
        /// Fill color.
        fill: Rgba,
    },
    /// Straight line, optionally dashed.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: Rgba,
        /// Stroke width.
        width: f32,
        /// Dash pattern (on, off), solid when `None`.
        dash: Option<(f32, f32)>,
    },
    /// Connected line segments.
    Polyline {
        /// Vertices in drawing order.
        points: Vec<Point>,
        /// Stroke color.
        color: Rgba,
        /// Stroke width.
        width: f32,
    },
    /// Filled circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius in pixels.
        radius: f32,
        /// Fill color.
        fill: Rgba,
    },
    /// Arrow with a filled head at `tip`.
    Arrow {
        /// Start point.
        tail: Point,
        /// End point (head).
        tip: Point,
        /// Stroke and head color.
        color: Rgba,
        /// Shaft width.
        width: f32,
        /// Head length in pixels.
        head_size: f32,
    },
    /// Text annotation.
    Text(TextMark),
}

/// A rendered-on-demand chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    marks: Vec<Mark>,
}

impl Figure {
    /// Create an empty figure.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            background: None,
            marks: Vec::new(),
        })
    }

    /// Set the background (`None` = transparent).
    #[must_use]
    pub fn with_background(mut self, background: Option<Rgba>) -> Self {
        self.background = background;
        self
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Background color, if any.
    #[must_use]
    pub const fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// Append a mark; later marks paint over earlier ones.
    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// All marks in paint order.
    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// Text marks in paint order.
    pub fn texts(&self) -> impl Iterator<Item = &TextMark> {
        self.marks.iter().filter_map(|m| match m {
            Mark::Text(t) => Some(t),
            _ => None,
        })
    }

    /// Find the first text mark with exactly this content.
    #[must_use]
    pub fn find_text(&self, text: &str) -> Option<&TextMark> {
        self.texts().find(|t| t.text == text)
    }

    /// Rasterize onto an existing framebuffer. Text marks are skipped.
    pub fn render(&self, fb: &mut Framebuffer) {
        if let Some(bg) = self.background {
            fb.clear(bg);
        }

        for mark in &self.marks {
            match mark {
                Mark::Rect { rect, fill } => {
                    let x0 = rect.left().round() as i32;
                    let y0 = rect.top().round() as i32;
                    let x1 = rect.right().round() as i32;
                    let y1 = rect.bottom().round() as i32;
                    draw_rect(
                        fb,
                        x0.min(x1),
                        y0.min(y1),
                        (x1 - x0).unsigned_abs(),
                        (y1 - y0).unsigned_abs(),
                        *fill,
                    );
                }
                Mark::Line {
                    from,
                    to,
                    color,
                    width,
                    dash,
                } => match dash {
                    Some(pattern) => draw_dashed_line(fb, *from, *to, *width, *pattern, *color),
                    None => draw_thick_line(fb, *from, *to, *width, *color),
                },
                Mark::Polyline {
                    points,
                    color,
                    width,
                } => {
                    for pair in points.windows(2) {
                        draw_thick_line(fb, pair[0], pair[1], *width, *color);
                    }
                }
                Mark::Circle {
                    center,
                    radius,
                    fill,
                } => draw_circle(
                    fb,
                    center.x.round() as i32,
                    center.y.round() as i32,
                    radius.round() as i32,
                    *fill,
                ),
                Mark::Arrow {
                    tail,
                    tip,
                    color,
                    width,
                    head_size,
                } => draw_arrow(fb, *tail, *tip, *width, *head_size, *color),
                Mark::Text(_) => {}
            }
        }
    }

    /// Rasterize into a new framebuffer of the figure's size.
    ///
    /// # Errors
    ///
    /// Returns an error if the framebuffer cannot be allocated.
    pub fn to_framebuffer(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width, self.height)?;
        self.render(&mut fb);
        Ok(fb)
    }

    /// Convert to an SVG document (including text).
    #[must_use]
    pub fn to_svg(&self) -> SvgEncoder {
        let mut svg = SvgEncoder::new(self.width, self.height).background(self.background);
        for mark in &self.marks {
            svg.add_element(mark_to_svg(mark));
        }
        svg
    }

    /// Encode as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization or PNG encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        PngEncoder::to_bytes(&self.to_framebuffer()?)
    }

    /// Write a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization, encoding or file I/O fails.
    pub fn write_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        PngEncoder::write_to_file(&self.to_framebuffer()?, path)
    }

    /// Write an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file I/O fails.
    pub fn write_svg<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.to_svg().write_to_file(path)
    }

    /// Render for a terminal with the given encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization fails.
    pub fn to_terminal(&self, encoder: &TerminalEncoder) -> Result<String> {
        Ok(encoder.render(&self.to_framebuffer()?))
    }

    /// Display the figure on stdout using the default terminal encoder.
    ///
    /// # Errors
    ///
    /// Returns an error if rasterization fails or stdout cannot be written.
    pub fn show(&self) -> Result<()> {
        let encoder = match self.background {
            Some(bg) => TerminalEncoder::new().background(bg),
            None => TerminalEncoder::new(),
        };
        encoder.print(&self.to_framebuffer()?)?;
        Ok(())
    }
}

impl batuta_common::display::WithDimensions for Figure {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        // Marks are already laid out in pixels; only the canvas changes
        self.width = width.max(1);
        self.height = height.max(1);
    }
}

fn mark_to_svg(mark: &Mark) -> SvgElement {
    match mark {
        Mark::Rect { rect, fill } => SvgElement::Rect {
            x: rect.x.min(rect.right()),
            y: rect.y.min(rect.bottom()),
            width: rect.width.abs(),
            height: rect.height.abs(),
            fill: *fill,
            stroke: None,
            stroke_width: 0.0,
        },
        Mark::Line {
            from,
            to,
            color,
            width,
            dash,
        } => SvgElement::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            stroke: *color,
            stroke_width: *width,
            dash: *dash,
        },
        Mark::Polyline {
            points,
            color,
            width,
        } => SvgElement::Polyline {
            points: points.iter().map(|p| (p.x, p.y)).collect(),
            stroke: Some(*color),
            stroke_width: *width,
            fill: None,
        },
        Mark::Circle {
            center,
            radius,
            fill,
        } => SvgElement::Circle {
            cx: center.x,
            cy: center.y,
            r: *radius,
            fill: *fill,
        },
        Mark::Arrow {
            tail,
            tip,
            color,
            width,
            head_size,
        } => {
            let head = crate::geometry::arrow_head(*tail, *tip, *head_size, head_size * 0.8);
            let base = head[1].lerp(head[2], 0.5);
            // Shaft and head as one outline so translucency is applied once
            let (nx, ny) = unit_normal(*tail, *tip);
            let h = width / 2.0;
            SvgElement::Polyline {
                points: vec![
                    (tail.x + nx * h, tail.y + ny * h),
                    (base.x + nx * h, base.y + ny * h),
                    (head[1].x, head[1].y),
                    (head[0].x, head[0].y),
                    (head[2].x, head[2].y),
                    (base.x - nx * h, base.y - ny * h),
                    (tail.x - nx * h, tail.y - ny * h),
                ],
                stroke: None,
                stroke_width: 0.0,
                fill: Some(*color),
            }
        }
        Mark::Text(t) => SvgElement::Text {
            x: t.position.x,
            y: t.position.y,
            text: t.text.clone(),
            font_size: t.size,
            fill: t.color,
            anchor: t.anchor,
            baseline: t.baseline,
            rotate: t.rotate,
        },
    }
}

/// Unit normal of the segment `from -> to`, `(0, 0)` when degenerate.
fn unit_normal(from: Point, to: Point) -> (f32, f32) {
    let length = from.distance(to);
    if length < f32::EPSILON {
        return (0.0, 0.0);
    }
    (-(to.y - from.y) / length, (to.x - from.x) / length)
}
