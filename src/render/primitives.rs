//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for the shapes charts are built
//! from. Every function clips against the framebuffer and never panics on
//! out-of-bounds coordinates.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{arrow_head, Point};

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw an anti-aliased line using Wu's algorithm.
///
/// Two pixels are drawn at each step along the major axis, with
/// intensities set by the fractional distance from the ideal line.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();

    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut put = |a: i32, b: i32, intensity: f32| {
        if steep {
            plot(fb, b, a, color, intensity);
        } else {
            plot(fb, a, b, color, intensity);
        }
    };

    // First endpoint
    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xgap = rfpart(x0 + 0.5);
    let xpxl1 = xend as i32;
    let ypxl1 = yend.floor() as i32;
    put(xpxl1, ypxl1, rfpart(yend) * xgap);
    put(xpxl1, ypxl1 + 1, fpart(yend) * xgap);

    let mut intery = yend + gradient;

    // Second endpoint
    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xgap = fpart(x1 + 0.5);
    let xpxl2 = xend as i32;
    let ypxl2 = yend.floor() as i32;
    put(xpxl2, ypxl2, rfpart(yend) * xgap);
    put(xpxl2, ypxl2 + 1, fpart(yend) * xgap);

    for x in (xpxl1 + 1)..xpxl2 {
        let ipart = intery.floor() as i32;
        put(x, ipart, rfpart(intery));
        put(x, ipart + 1, fpart(intery));
        intery += gradient;
    }
}

/// Draw a line of the given pixel width.
///
/// Widths of 1.5 or less fall back to a single anti-aliased line; wider
/// lines are built from parallel anti-aliased strokes.
pub fn draw_thick_line(fb: &mut Framebuffer, from: Point, to: Point, width: f32, color: Rgba) {
    let length = from.distance(to);
    if width <= 1.5 || length < f32::EPSILON {
        draw_line_aa(fb, from.x, from.y, to.x, to.y, color);
        return;
    }

    // Unit normal
    let (nx, ny) = (-(to.y - from.y) / length, (to.x - from.x) / length);
    let strokes = width.round().max(1.0) as i32;
    for i in 0..strokes {
        let offset = i as f32 - (strokes - 1) as f32 / 2.0;
        draw_line_aa(
            fb,
            from.x + nx * offset,
            from.y + ny * offset,
            to.x + nx * offset,
            to.y + ny * offset,
            color,
        );
    }
}

/// Draw a dashed line with `dash` pixels on and `gap` pixels off.
pub fn draw_dashed_line(
    fb: &mut Framebuffer,
    from: Point,
    to: Point,
    width: f32,
    (dash, gap): (f32, f32),
    color: Rgba,
) {
    let length = from.distance(to);
    if dash <= 0.0 || length < f32::EPSILON {
        draw_thick_line(fb, from, to, width, color);
        return;
    }

    let period = dash + gap.max(0.0);
    let mut start = 0.0;
    while start < length {
        let end = (start + dash).min(length);
        draw_thick_line(
            fb,
            from.lerp(to, start / length),
            from.lerp(to, end / length),
            width,
            color,
        );
        start += period;
    }
}

/// Plot a pixel with intensity (for anti-aliased drawing).
#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 && x < fb.width() as i32 && y < fb.height() as i32 {
        let alpha = (f32::from(color.a) * intensity.clamp(0.0, 1.0)) as u8;
        fb.blend_pixel(x as u32, y as u32, color.with_alpha(alpha));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Filled Shapes
// ============================================================================

/// Draw a filled rectangle, blending when `color` is translucent.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    // Shift the rectangle's origin into the buffer, shrinking it accordingly
    let width = width.saturating_sub(x.min(0).unsigned_abs());
    let height = height.saturating_sub(y.min(0).unsigned_abs());
    fb.blend_rect(x.max(0) as u32, y.max(0) as u32, width, height, color);
}

/// Draw a filled circle using the midpoint algorithm.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 && cx >= 0 && cy >= 0 {
            fb.blend_pixel(cx as u32, cy as u32, color);
        }
        return;
    }

    // One span per row so translucent fills are not blended twice
    for dy in -radius..=radius {
        let half = f64::from(radius * radius - dy * dy).sqrt().round() as i32;
        draw_horizontal_line(fb, cx - half, cx + half, cy + dy, color);
    }
}

/// Fill a triangle using edge functions over its bounding box.
pub fn draw_triangle(fb: &mut Framebuffer, [a, b, c]: [Point; 3], color: Rgba) {
    let edge = |p: Point, q: Point, x: f32, y: f32| (q.x - p.x) * (y - p.y) - (q.y - p.y) * (x - p.x);

    let area = edge(a, b, c.x, c.y);
    if area.abs() < f32::EPSILON {
        return;
    }

    let min_x = a.x.min(b.x).min(c.x).floor().max(0.0) as u32;
    let min_y = a.y.min(b.y).min(c.y).floor().max(0.0) as u32;
    let max_x = (a.x.max(b.x).max(c.x).ceil().max(0.0) as u32).min(fb.width());
    let max_y = (a.y.max(b.y).max(c.y).ceil().max(0.0) as u32).min(fb.height());

    for y in min_y..max_y {
        for x in min_x..max_x {
            let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
            let w0 = edge(b, c, px, py) * area.signum();
            let w1 = edge(c, a, px, py) * area.signum();
            let w2 = edge(a, b, px, py) * area.signum();
            if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                fb.blend_pixel(x, y, color);
            }
        }
    }
}

/// Draw an arrow from `tail` to `tip` with a filled triangular head.
pub fn draw_arrow(
    fb: &mut Framebuffer,
    tail: Point,
    tip: Point,
    width: f32,
    head_size: f32,
    color: Rgba,
) {
    let head = arrow_head(tail, tip, head_size, head_size * 0.8);
    // Stop the shaft at the head's base so the overlap is not blended twice
    let base = head[1].lerp(head[2], 0.5);
    draw_thick_line(fb, tail, base, width, color);
    draw_triangle(fb, head, color);
}

#[inline]
fn draw_horizontal_line(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 {
        return;
    }

    let x_start = x1.max(0) as u32;
    let x_end = (x2 + 1).max(0).min(fb.width() as i32) as u32;

    if x_start < x_end {
        fb.blend_rect(x_start, y as u32, x_end - x_start, 1, color);
    }
}

// ============================================================================
// Tests
// ============================================================================
