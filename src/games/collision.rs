//! Shared hit tests: axis-aligned rectangles and circle overlaps.

use glam::Vec2;

/// Axis-aligned rectangle, `(x, y)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

impl Rect {
    /// Bounding box of a circle, for rect-vs-rect tests against round
    /// entities.
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }
}

/// Circle/circle overlap: distance between centers below the radius sum.
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let limit = ra + rb;
    a.distance_squared(b) < limit * limit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.overlaps(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 5.0, 5.0))); // touching edges miss
        assert!(!a.overlaps(&Rect::new(20.0, 20.0, 5.0, 5.0)));
    }

    #[test]
    fn test_circle_overlap_uses_radius_sum() {
        let a = Vec2::new(0.0, 0.0);
        assert!(circles_overlap(a, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(a, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_circle_bounds() {
        let bounds = Rect::around_circle(Vec2::new(50.0, 50.0), 10.0);
        assert_eq!(bounds, Rect::new(40.0, 40.0, 20.0, 20.0));
        assert!(bounds.overlaps(&Rect::new(55.0, 55.0, 100.0, 10.0)));
    }
}
