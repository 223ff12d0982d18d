//! Common geometry types shared by the viewer crates.
//!
//! - [`Point`] - integer point (local or framebuffer pixels)
//! - [`FPoint`] - sub-pixel point used by the viewport transform
//! - [`Rect`] - rectangle with position and dimensions
//! - [`Dimension`] - width/height pair, e.g. the remote screen size

use std::fmt;

/// A 2D point with integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    /// Create a new point.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A 2D point with floating point coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FPoint {
    pub x: f64,
    pub y: f64,
}

impl FPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Truncate towards negative infinity.
    pub fn floor(self) -> Point {
        Point::new(self.x.floor() as i32, self.y.floor() as i32)
    }
}

impl From<Point> for FPoint {
    fn from(p: Point) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

/// Size of a surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
}

impl Dimension {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of pixels covered.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Rectangle anchored at the origin with this size.
    pub const fn to_rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A rectangle defined by top-left position and dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a rectangle from its edges. Inverted edges give an empty rectangle.
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        let span = |from: i32, to: i32| (i64::from(to) - i64::from(from)).clamp(0, i64::from(u32::MAX)) as u32;
        Self::new(left, top, span(left, right), span(top, bottom))
    }

    /// Get the right edge (x + width), saturating at `i32::MAX`.
    pub const fn right(&self) -> i32 {
        self.x.saturating_add_unsigned(self.width)
    }

    /// Get the bottom edge (y + height), saturating at `i32::MAX`.
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add_unsigned(self.height)
    }

    /// Top-left corner.
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub const fn dimension(&self) -> Dimension {
        Dimension::new(self.width, self.height)
    }

    /// True when the rectangle covers no pixels.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a point is contained within this rectangle.
    pub const fn contains_point(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// True when `other` lies entirely inside this rectangle.
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Get the area of the rectangle.
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Overlapping part of two rectangles, `None` if they do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let r = Rect::from_edges(
            self.x.max(other.x),
            self.y.max(other.y),
            self.right().min(other.right()),
            self.bottom().min(other.bottom()),
        );
        (!r.is_empty()).then_some(r)
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Parts of `self` not covered by `other`, as at most four bands
    /// (top, bottom, left, right).
    pub fn subtract(&self, other: &Rect) -> Vec<Rect> {
        let Some(inner) = self.intersection(other) else {
            return if self.is_empty() { Vec::new() } else { vec![*self] };
        };

        let bands = [
            Rect::from_edges(self.x, self.y, self.right(), inner.y),
            Rect::from_edges(self.x, inner.bottom(), self.right(), self.bottom()),
            Rect::from_edges(self.x, inner.y, inner.x, inner.bottom()),
            Rect::from_edges(inner.right(), inner.y, self.right(), inner.bottom()),
        ];
        bands.into_iter().filter(|r| !r.is_empty()).collect()
    }

    /// Move the rectangle by the given offset.
    pub const fn translate(&self, dx: i32, dy: i32) -> Rect {
        Rect::new(self.x.saturating_add(dx), self.y.saturating_add(dy), self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point() {
        let p = Point::new(10, 20);
        assert_eq!(p.x, 10);
        assert_eq!(p.y, 20);
        assert_eq!(FPoint::new(-0.5, 2.9).floor(), Point::new(-1, 2));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(10, 20, 100, 50);
        assert_eq!(r.right(), 110);
        assert_eq!(r.bottom(), 70);
        assert_eq!(r.area(), 5000);
        assert_eq!(Rect::from_edges(5, 5, 2, 9), Rect::new(5, 5, 0, 4));
        assert!(Rect::from_edges(5, 5, 2, 9).is_empty());
    }

    #[test]
    fn test_edges_saturate_near_i32_max() {
        let r = Rect::new(i32::MAX - 1, i32::MAX - 5, 10, u32::MAX);
        assert_eq!(r.right(), i32::MAX);
        assert_eq!(r.bottom(), i32::MAX);
        assert!(!Rect::new(0, 0, 100, 100).contains_rect(&r));
        assert_eq!(Rect::new(0, 0, 100, 100).intersection(&r), None);
        assert_eq!(Rect::from_edges(i32::MIN, 0, i32::MAX, 1).width, u32::MAX);
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10, 20, 100, 50);
        assert!(r.contains_point(10, 20));
        assert!(r.contains_point(109, 69));
        assert!(!r.contains_point(9, 20));
        assert!(!r.contains_point(110, 69));
        assert!(!r.contains_point(109, 70));
    }

    #[test]
    fn test_intersection() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(50, 60, 100, 100);
        assert_eq!(a.intersection(&b), Some(Rect::new(50, 60, 50, 40)));
        assert!(a.intersects(&b));

        // Touching edges do not overlap
        let c = Rect::new(100, 0, 10, 10);
        assert_eq!(a.intersection(&c), None);
        assert!(a.contains_rect(&Rect::new(10, 10, 90, 90)));
        assert!(!a.contains_rect(&b));
    }

    #[test]
    fn test_subtract_centered_hole() {
        let outer = Rect::new(0, 0, 100, 80);
        let hole = Rect::new(10, 20, 50, 30);
        let bands = outer.subtract(&hole);
        assert_eq!(
            bands,
            vec![
                Rect::new(0, 0, 100, 20),
                Rect::new(0, 50, 100, 30),
                Rect::new(0, 20, 10, 30),
                Rect::new(60, 20, 40, 30),
            ]
        );
        let covered: u64 = bands.iter().map(Rect::area).sum::<u64>() + hole.area();
        assert_eq!(covered, outer.area());
    }

    #[test]
    fn test_subtract_disjoint_and_full() {
        let r = Rect::new(0, 0, 10, 10);
        assert_eq!(r.subtract(&Rect::new(20, 20, 5, 5)), vec![r]);
        assert!(r.subtract(&Rect::new(-5, -5, 30, 30)).is_empty());
    }

    #[test]
    fn test_dimension() {
        let d = Dimension::new(1024, 768);
        assert_eq!(d.to_rect(), Rect::new(0, 0, 1024, 768));
        assert_eq!(d.to_string(), "1024x768");
        assert!(Dimension::new(0, 5).is_empty());
    }
}
