//! SVG output encoder.
//!
//! Vector output is the only target that carries text (sample names,
//! loading labels, axis titles).

use crate::color::Rgba;
use crate::error::Result;
use std::fmt::Write as FmtWrite;
use std::fs;
use std::path::Path;

/// SVG encoder for vector output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    /// Background color (None for transparent).
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Rectangle
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Rgba,
        stroke: Option<Rgba>,
        stroke_width: f32,
    },
    /// Circle
    Circle { cx: f32, cy: f32, r: f32, fill: Rgba },
    /// Line, optionally dashed (`dash` = on/off lengths)
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        stroke: Rgba,
        stroke_width: f32,
        dash: Option<(f32, f32)>,
    },
    /// Polyline, or polygon when `fill` is set
    Polyline {
        points: Vec<(f32, f32)>,
        stroke: Option<Rgba>,
        stroke_width: f32,
        fill: Option<Rgba>,
    },
    /// Text
    Text {
        x: f32,
        y: f32,
        text: String,
        font_size: f32,
        fill: Rgba,
        anchor: TextAnchor,
        baseline: TextBaseline,
        /// Rotation in degrees around (x, y)
        rotate: f32,
    },
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextAnchor {
    /// Text starts at the position.
    #[default]
    Start,
    /// Text is centered on the position.
    Middle,
    /// Text ends at the position.
    End,
}

/// Vertical text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextBaseline {
    /// Alphabetic baseline sits on the position.
    #[default]
    Baseline,
    /// Text is vertically centered on the position.
    Middle,
    /// Top of the text hangs from the position.
    Hanging,
}

impl Default for SvgEncoder {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions and a white background.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            elements: Vec::new(),
        }
    }

    /// Set background color (None for transparent).
    #[must_use]
    pub fn background(mut self, color: Option<Rgba>) -> Self {
        self.background = color;
        self
    }

    /// Number of elements added so far.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Add an element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(256 + self.elements.len() * 128);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, bg.to_css());
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path.as_ref(), self.render())?;
        log::debug!("wrote SVG with {} elements to {}", self.elements.len(), path.as_ref().display());
        Ok(())
    }
}

/// `fill`/`stroke` attributes; translucent colors use the `*-opacity` form
/// so that viewers without CSS4 color support still render them.
fn paint_attr(name: &str, color: Rgba) -> String {
    if color.a == 255 {
        format!(r#"{name}="{}""#, color.to_css())
    } else {
        format!(
            r#"{name}="{}" {name}-opacity="{:.3}""#,
            color.with_alpha(255).to_css(),
            color.opacity()
        )
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Rect {
            x,
            y,
            width,
            height,
            fill,
            stroke,
            stroke_width,
        } => {
            let stroke_attr = stroke
                .map(|s| format!(r#" {} stroke-width="{stroke_width}""#, paint_attr("stroke", s)))
                .unwrap_or_default();
            format!(
                r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" {}{stroke_attr}/>"#,
                paint_attr("fill", *fill)
            )
        }
        SvgElement::Circle { cx, cy, r, fill } => {
            format!(r#"<circle cx="{cx}" cy="{cy}" r="{r}" {}/>"#, paint_attr("fill", *fill))
        }
        SvgElement::Line {
            x1,
            y1,
            x2,
            y2,
            stroke,
            stroke_width,
            dash,
        } => {
            let dash_attr = dash
                .map(|(on, off)| format!(r#" stroke-dasharray="{on},{off}""#))
                .unwrap_or_default();
            format!(
                r#"<line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" {} stroke-width="{stroke_width}"{dash_attr}/>"#,
                paint_attr("stroke", *stroke)
            )
        }
        SvgElement::Polyline {
            points,
            stroke,
            stroke_width,
            fill,
        } => {
            let points_str = points
                .iter()
                .map(|(x, y)| format!("{x},{y}"))
                .collect::<Vec<_>>()
                .join(" ");
            let tag = if fill.is_some() { "polygon" } else { "polyline" };
            let fill_attr = fill.map_or_else(|| r#"fill="none""#.to_string(), |f| paint_attr("fill", f));
            let stroke_attr = stroke
                .map(|s| format!(r#" {} stroke-width="{stroke_width}""#, paint_attr("stroke", s)))
                .unwrap_or_default();
            format!(r#"<{tag} points="{points_str}" {fill_attr}{stroke_attr}/>"#)
        }
        SvgElement::Text {
            x,
            y,
            text,
            font_size,
            fill,
            anchor,
            baseline,
            rotate,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let baseline = match baseline {
                TextBaseline::Baseline => "auto",
                TextBaseline::Middle => "central",
                TextBaseline::Hanging => "hanging",
            };
            let transform = if rotate.abs() > f32::EPSILON {
                format!(r#" transform="rotate({rotate} {x} {y})""#)
            } else {
                String::new()
            };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" {} text-anchor="{anchor}" dominant-baseline="{baseline}" font-family="sans-serif"{transform}>{}</text>"#,
                paint_attr("fill", *fill),
                escape_xml(text)
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> SvgElement {
        SvgElement::Text {
            x: 10.0,
            y: 50.0,
            text: s.to_string(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Middle,
            rotate: 0.0,
        }
    }

    #[test]
    fn test_svg_encoder_new() {
        let svg = SvgEncoder::new(800, 600).render();

        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"600\""));
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn test_svg_transparent_background() {
        let svg = SvgEncoder::new(100, 100).background(None).render();
        assert_eq!(svg.matches("<rect").count(), 0);
    }

    #[test]
    fn test_svg_dashed_line() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(SvgElement::Line {
            x1: 0.0,
            y1: 0.0,
            x2: 0.0,
            y2: 100.0,
            stroke: Rgba::RED,
            stroke_width: 1.5,
            dash: Some((6.0, 4.0)),
        });
        let svg = enc.render();

        assert!(svg.contains("stroke=\"rgb(255,0,0)\""));
        assert!(svg.contains("stroke-dasharray=\"6,4\""));
        assert!(svg.contains("stroke-width=\"1.5\""));
    }

    #[test]
    fn test_svg_translucent_fill_uses_opacity() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(SvgElement::Rect {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
            fill: Rgba::BLUE.with_alpha(204),
            stroke: None,
            stroke_width: 0.0,
        });
        let svg = enc.render();

        assert!(svg.contains("fill=\"rgb(0,0,255)\" fill-opacity=\"0.800\""));
    }

    #[test]
    fn test_svg_polygon_vs_polyline() {
        let mut enc = SvgEncoder::new(100, 100);
        let pts = vec![(0.0, 0.0), (50.0, 100.0), (100.0, 0.0)];
        enc.add_element(SvgElement::Polyline {
            points: pts.clone(),
            stroke: Some(Rgba::GREEN),
            stroke_width: 1.0,
            fill: None,
        });
        enc.add_element(SvgElement::Polyline {
            points: pts,
            stroke: None,
            stroke_width: 0.0,
            fill: Some(Rgba::RED),
        });
        let svg = enc.render();

        assert!(svg.contains("<polyline points=\"0,0 50,100 100,0\" fill=\"none\""));
        assert!(svg.contains("<polygon points=\"0,0 50,100 100,0\" fill=\"rgb(255,0,0)\"/>"));
    }

    #[test]
    fn test_svg_text_alignment() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(text("PC1"));
        let svg = enc.render();

        assert!(svg.contains(">PC1</text>"));
        assert!(svg.contains("text-anchor=\"middle\""));
        assert!(svg.contains("dominant-baseline=\"central\""));
        assert!(!svg.contains("transform"));
    }

    #[test]
    fn test_svg_text_rotation() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(SvgElement::Text {
            x: 10.0,
            y: 50.0,
            text: "PC2".into(),
            font_size: 12.0,
            fill: Rgba::BLACK,
            anchor: TextAnchor::Middle,
            baseline: TextBaseline::Baseline,
            rotate: -90.0,
        });

        assert!(enc.render().contains("transform=\"rotate(-90 10 50)\""));
    }

    #[test]
    fn test_svg_text_escaping() {
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(text("<b>A & \"B\"</b>"));
        let svg = enc.render();

        assert!(!svg.contains("<b>"));
        assert!(svg.contains("&lt;b&gt;A &amp; &quot;B&quot;&lt;/b&gt;"));
    }

    #[test]
    fn test_svg_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        let mut enc = SvgEncoder::new(100, 100);
        enc.add_element(text("hello"));

        enc.write_to_file(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("hello"));
        assert_eq!(enc.element_count(), 1);
    }
}
