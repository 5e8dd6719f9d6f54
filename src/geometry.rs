//! Geometric primitives for chart layout.
//!
//! Points live in pixel space unless stated otherwise. The y axis grows
//! downward, as in every raster and SVG target.

/// A 2D point with floating-point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Point {
    /// Origin point (0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Calculate the distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation between two points.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Padding between the figure edge and the plot area, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Insets {
    /// Left padding (room for the primary y tick labels).
    pub left: u32,
    /// Right padding (room for a secondary y axis, if any).
    pub right: u32,
    /// Top padding.
    pub top: u32,
    /// Bottom padding (room for the x tick labels and title).
    pub bottom: u32,
}

impl Insets {
    /// Same padding on every side.
    #[must_use]
    pub const fn uniform(margin: u32) -> Self {
        Self {
            left: margin,
            right: margin,
            top: margin,
            bottom: margin,
        }
    }
}

impl Default for Insets {
    fn default() -> Self {
        Self {
            left: 70,
            right: 30,
            top: 20,
            bottom: 55,
        }
    }
}

/// A rectangle defined by position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// X coordinate of the top-left corner.
    pub x: f32,
    /// Y coordinate of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Plot area left after removing `insets` from a `width` x `height` figure.
    ///
    /// Returns `None` when the insets leave no room.
    #[must_use]
    pub fn inset(width: u32, height: u32, insets: Insets) -> Option<Self> {
        let w = width.checked_sub(insets.left + insets.right)?;
        let h = height.checked_sub(insets.top + insets.bottom)?;
        if w == 0 || h == 0 {
            return None;
        }
        Some(Self::new(insets.left as f32, insets.top as f32, w as f32, h as f32))
    }

    /// Left edge.
    #[must_use]
    pub fn left(&self) -> f32 {
        self.x
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge.
    #[must_use]
    pub fn top(&self) -> f32 {
        self.y
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point is inside the rectangle.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Get the center point of the rectangle.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Triangle forming the head of an arrow from `tail` to `tip`.
///
/// Returns `[tip, left barb, right barb]`. The head is shortened to the
/// shaft length when the shaft is shorter than `length`. A zero-length
/// arrow yields a degenerate triangle at the tip.
#[must_use]
pub fn arrow_head(tail: Point, tip: Point, length: f32, width: f32) -> [Point; 3] {
    let shaft = tail.distance(tip);
    if shaft < f32::EPSILON {
        return [tip; 3];
    }

    let length = length.min(shaft);
    let (ux, uy) = ((tip.x - tail.x) / shaft, (tip.y - tail.y) / shaft);
    let base = Point::new(tip.x - ux * length, tip.y - uy * length);
    let half = width / 2.0;

    [
        tip,
        Point::new(base.x - uy * half, base.y + ux * half),
        Point::new(base.x + uy * half, base.y - ux * half),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance(p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_point_lerp() {
        let mid = Point::ORIGIN.lerp(Point::new(10.0, 10.0), 0.5);
        assert!((mid.x - 5.0).abs() < 0.001);
        assert!((mid.y - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_inset() {
        let area = Rect::inset(800, 400, Insets::uniform(40)).unwrap();
        assert_eq!(area, Rect::new(40.0, 40.0, 720.0, 320.0));
        assert!((area.right() - 760.0).abs() < f32::EPSILON);
        assert!((area.bottom() - 360.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rect_inset_too_small() {
        assert!(Rect::inset(50, 50, Insets::uniform(25)).is_none());
        assert!(Rect::inset(50, 50, Insets::uniform(40)).is_none());
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(Point::new(5.0, 5.0)));
        assert!(!rect.contains(Point::new(15.0, 5.0)));
    }

    #[test]
    fn test_arrow_head_horizontal() {
        let [tip, a, b] = arrow_head(Point::ORIGIN, Point::new(10.0, 0.0), 4.0, 4.0);
        assert_eq!(tip, Point::new(10.0, 0.0));
        assert!((a.x - 6.0).abs() < 1e-5);
        assert!((b.x - 6.0).abs() < 1e-5);
        assert!(((a.y - b.y).abs() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_arrow_head_zero_length() {
        let p = Point::new(3.0, 3.0);
        assert_eq!(arrow_head(p, p, 5.0, 5.0), [p; 3]);
    }

    #[test]
    fn test_arrow_head_clamped_to_shaft() {
        let [_, a, _] = arrow_head(Point::ORIGIN, Point::new(2.0, 0.0), 10.0, 2.0);
        assert!(a.x.abs() < 1e-5);
    }
}
