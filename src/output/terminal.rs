//! Terminal output encoder (ASCII / ANSI half-blocks).
//!
//! Charts are mostly background with thin strokes, so each character cell
//! shows the pixel in its footprint that differs most from the background.
//! Plain nearest-neighbour or averaged sampling would erase one-pixel
//! lines at terminal resolutions.
//!
//! ASCII output stretches ink so the strongest cell uses the densest
//! character; half-transparent marks stay legible.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use std::fmt::Write as FmtWrite;
use std::io::{self, Write};
use trueno::Vector;

/// Terminal rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TerminalMode {
    /// ASCII characters ramped by ink density (widest compatibility).
    Ascii,
    /// Unicode upper half-blocks with 24-bit ANSI colors (2x vertical resolution).
    #[default]
    UnicodeHalfBlock,
}

/// Terminal encoder configuration.
#[derive(Debug, Clone)]
pub struct TerminalEncoder {
    mode: TerminalMode,
    width: u32,
    background: Rgba,
}

impl Default for TerminalEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalEncoder {
    /// Ramp from no ink to full ink.
    const ASCII_RAMP: &'static [char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

    /// Character cells are roughly twice as tall as they are wide.
    const CHAR_ASPECT: f32 = 2.0;

    /// Create an encoder 80 columns wide over a white background.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mode: TerminalMode::default(),
            width: 80,
            background: Rgba::WHITE,
        }
    }

    /// Set the rendering mode.
    #[must_use]
    pub fn mode(mut self, mode: TerminalMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the output width in characters (at least 1).
    #[must_use]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        self
    }

    /// Color that transparent pixels are composited over.
    #[must_use]
    pub fn background(mut self, background: Rgba) -> Self {
        self.background = background.with_alpha(255);
        self
    }

    /// Render a framebuffer to a string.
    #[must_use]
    pub fn render(&self, fb: &Framebuffer) -> String {
        match self.mode {
            TerminalMode::Ascii => self.render_ascii(fb),
            TerminalMode::UnicodeHalfBlock => self.render_half_block(fb),
        }
    }

    /// Write the rendering to stdout.
    ///
    /// # Errors
    ///
    /// Returns an error if stdout cannot be written.
    pub fn print(&self, fb: &Framebuffer) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.render(fb).as_bytes())?;
        stdout.flush()
    }

    fn render_ascii(&self, fb: &Framebuffer) -> String {
        let cols = self.width.min(fb.width());
        let rows = ((cols as f32 * fb.height() as f32 / fb.width() as f32 / Self::CHAR_ASPECT)
            .round() as u32)
            .max(1);
        let inks: Vec<f32> = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| (col, row)))
            .map(|(col, row)| self.ink(self.sample(fb, col, row, cols, rows)))
            .collect();

        let peak = Vector::from_slice(&inks).max().unwrap_or(0.0);
        let gain = if peak > 0.0 { 1.0 / peak } else { 0.0 };
        let top = Self::ASCII_RAMP.len() - 1;

        let mut output = String::with_capacity((cols as usize + 1) * rows as usize);
        for line in inks.chunks(cols as usize) {
            for &ink in line {
                let idx = (ink * gain * top as f32).round() as usize;
                output.push(Self::ASCII_RAMP[idx.min(top)]);
            }
            output.push('\n');
        }

        output
    }

    fn render_half_block(&self, fb: &Framebuffer) -> String {
        let cols = self.width.min(fb.width());
        // Two pixel rows per character row
        let rows =
            ((cols as f32 * fb.height() as f32 / fb.width() as f32).round() as u32).max(2) & !1;
        let mut output = String::with_capacity((cols as usize * 40 + 8) * (rows / 2) as usize);

        for row in (0..rows).step_by(2) {
            for col in 0..cols {
                let top = self.sample(fb, col, row, cols, rows);
                let bottom = self.sample(fb, col, row + 1, cols, rows);
                let _ = write!(
                    output,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            output.push_str("\x1b[0m\n");
        }

        output
    }

    /// Most prominent (composited) color in the footprint of cell `(col, row)`.
    fn sample(&self, fb: &Framebuffer, col: u32, row: u32, cols: u32, rows: u32) -> Rgba {
        let x0 = col * fb.width() / cols;
        let x1 = ((col + 1) * fb.width() / cols).max(x0 + 1).min(fb.width());
        let y0 = row * fb.height() / rows;
        let y1 = ((row + 1) * fb.height() / rows).max(y0 + 1).min(fb.height());

        let mut best = self.background;
        let mut best_ink = 0.0;
        for y in y0..y1 {
            for x in x0..x1 {
                if let Some(px) = fb.get_pixel(x, y) {
                    let color = self.composite(px);
                    let ink = self.ink(color);
                    if ink > best_ink {
                        best_ink = ink;
                        best = color;
                    }
                }
            }
        }
        best
    }

    fn composite(&self, px: Rgba) -> Rgba {
        self.background.lerp(px.with_alpha(255), px.opacity())
    }

    /// Luminance distance from the background, in [0, 1].
    fn ink(&self, color: Rgba) -> f32 {
        (luma(color) - luma(self.background)).abs()
    }
}

/// Rec. 709 luminance in [0, 1].
fn luma(c: Rgba) -> f32 {
    (0.2126 * f32::from(c.r) + 0.7152 * f32::from(c.g) + 0.0722 * f32::from(c.b)) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_blank_is_spaces() {
        let fb = Framebuffer::new(40, 20).expect("framebuffer creation should succeed");
        let output = TerminalEncoder::new().mode(TerminalMode::Ascii).width(20).render(&fb);

        assert!(output.chars().all(|c| c == ' ' || c == '\n'));
    }

    #[test]
    fn test_ascii_keeps_thin_lines() {
        let mut fb = Framebuffer::new(200, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb.fill_rect(0, 50, 200, 1, Rgba::BLACK);

        let output = TerminalEncoder::new().mode(TerminalMode::Ascii).width(20).render(&fb);

        assert!(output.lines().any(|line| line.chars().all(|c| c == '@')));
    }

    #[test]
    fn test_ascii_stretches_faint_ink() {
        let mut fb = Framebuffer::new(100, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb.fill_rect(0, 0, 50, 100, Rgba::rgb(200, 200, 200));

        let output = TerminalEncoder::new().mode(TerminalMode::Ascii).width(10).render(&fb);

        let first = output.lines().next().expect("at least one line");
        assert!(first.starts_with("@@@@@"));
        assert!(first.ends_with("     "));
    }

    #[test]
    fn test_ascii_aspect_ratio() {
        let fb = Framebuffer::new(200, 100).expect("framebuffer creation should succeed");
        let output = TerminalEncoder::new().mode(TerminalMode::Ascii).width(40).render(&fb);

        assert_eq!(output.lines().count(), 10);
        assert!(output.lines().all(|l| l.chars().count() == 40));
    }

    #[test]
    fn test_half_block_escapes() {
        let mut fb = Framebuffer::new(10, 10).expect("framebuffer creation should succeed");
        fb.clear(Rgba::RED);

        let output = TerminalEncoder::new().width(5).render(&fb);

        assert!(output.contains("\x1b[38;2;255;0;0m"));
        assert!(output.contains('\u{2580}'));
        assert!(output.ends_with("\x1b[0m\n"));
    }

    #[test]
    fn test_transparent_composited_over_background() {
        let fb = Framebuffer::new(4, 4).expect("framebuffer creation should succeed");
        let output = TerminalEncoder::new()
            .width(2)
            .background(Rgba::rgb(1, 2, 3))
            .render(&fb);

        assert!(output.contains("48;2;1;2;3m"));
    }
}
