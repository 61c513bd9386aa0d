use super::{BoundingBox, Point};

/// A screen space triangle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Triangle {
    pub v0: Point,
    pub v1: Point,
    pub v2: Point,
}

impl Triangle {
    pub fn new(v0: Point, v1: Point, v2: Point) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn vertices(&self) -> [Point; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn edges(&self) -> [(Point, Point); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }

    /// Orders the vertices so that `v0.y <= v1.y <= v2.y`.
    ///
    /// Three adjacent compare-exchanges: (0,1), (1,2), (0,1). Only strictly
    /// higher vertices move, so equal heights keep their original order.
    pub fn sort_by_height(&mut self) {
        if self.v0.y <= self.v1.y && self.v1.y <= self.v2.y {
            return;
        }
        swap_if_higher(&mut self.v0, &mut self.v1);
        swap_if_higher(&mut self.v1, &mut self.v2);
        swap_if_higher(&mut self.v0, &mut self.v1);
    }

    pub fn sorted_by_height(mut self) -> Self {
        self.sort_by_height();
        self
    }

    pub fn is_flat_top(&self) -> bool {
        let t = self.sorted_by_height();
        t.v0.y == t.v1.y
    }

    pub fn is_flat_bottom(&self) -> bool {
        let t = self.sorted_by_height();
        t.v1.y == t.v2.y
    }

    /// Twice the signed area. Zero for degenerate triangles.
    pub fn doubled_area(&self) -> i128 {
        let (a, b, c) = (self.v0, self.v1, self.v2);
        (b.x as i128 - a.x as i128) * (c.y as i128 - a.y as i128)
            - (c.x as i128 - a.x as i128) * (b.y as i128 - a.y as i128)
    }

    pub fn is_degenerate(&self) -> bool {
        self.doubled_area() == 0
    }

    /// X coordinate where the long edge (top to bottom vertex) crosses the
    /// middle vertex's scanline: `x0 + ((y1 - y0) / (y2 - y0)) * (x2 - x0)`,
    /// floored. `None` when the triangle already has a flat top or bottom.
    pub fn split_x(&self) -> Option<i32> {
        let t = self.sorted_by_height();
        if t.v0.y == t.v1.y || t.v1.y == t.v2.y {
            return None;
        }
        let dy_mid = t.v1.y as i128 - t.v0.y as i128;
        let dy_long = t.v2.y as i128 - t.v0.y as i128;
        let dx_long = t.v2.x as i128 - t.v0.x as i128;
        Some((t.v0.x as i128 + (dy_mid * dx_long).div_euclid(dy_long)) as i32)
    }

    /// The flat-bottom and flat-top halves produced by cutting at [`Triangle::split_x`].
    pub fn split(&self) -> Option<(Triangle, Triangle)> {
        let x = self.split_x()?;
        let t = self.sorted_by_height();
        let v3 = Point::new(x, t.v1.y);
        Some((Triangle::new(t.v0, t.v1, v3), Triangle::new(t.v1, v3, t.v2)))
    }

    /// Smallest box holding every vertex, clamped to a `width`x`height` screen.
    /// `None` if the triangle is entirely off screen.
    pub fn bounding_box(&self, width: u32, height: u32) -> Option<BoundingBox> {
        if width == 0 || height == 0 {
            return None;
        }
        let vs = self.vertices();
        let min_x = vs.iter().map(|p| p.x).min()?;
        let max_x = vs.iter().map(|p| p.x).max()?;
        let min_y = vs.iter().map(|p| p.y).min()?;
        let max_y = vs.iter().map(|p| p.y).max()?;
        if max_x < 0 || max_y < 0 || min_x >= width as i32 || min_y >= height as i32 {
            return None;
        }
        let left = min_x.max(0) as u32;
        let top = min_y.max(0) as u32;
        let right = (max_x as u32).min(width - 1);
        let bottom = (max_y as u32).min(height - 1);
        Some(BoundingBox::new(left, top, right - left + 1, bottom - top + 1))
    }
}

fn swap_if_higher(a: &mut Point, b: &mut Point) {
    if a.y > b.y {
        std::mem::swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn tri(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> Triangle {
        Triangle::new(a.into(), b.into(), c.into())
    }

    #[test]
    fn sort_by_height_every_permutation() {
        let points = [Point::new(5, 2), Point::new(1, 7), Point::new(3, 2)];
        for perm in points.iter().permutations(3) {
            let t = Triangle::new(*perm[0], *perm[1], *perm[2]).sorted_by_height();
            assert!(t.v0.y <= t.v1.y && t.v1.y <= t.v2.y, "{:?}", t);
        }
    }

    #[test]
    fn sort_keeps_order_of_ties() {
        let t = tri((9, 3), (1, 1), (4, 3)).sorted_by_height();
        assert_eq!(t, tri((1, 1), (9, 3), (4, 3)));
        let t = tri((7, 5), (1, 3), (2, 3)).sorted_by_height();
        assert_eq!(t, tri((1, 3), (2, 3), (7, 5)));
    }

    #[test]
    fn split_point_on_long_edge() {
        let t = tri((150, 10), (160, 60), (75, 190));
        // 150 + (50 / 180) * -75 = 129.17
        assert_eq!(t.split_x(), Some(129));
        let (bottom, top) = t.split().unwrap();
        assert!(bottom.is_flat_bottom());
        assert!(top.is_flat_top());
        assert_eq!(tri((0, 0), (4, 0), (0, 4)).split_x(), None);
    }

    #[test]
    fn degenerate_triangles() {
        assert!(tri((0, 0), (2, 2), (4, 4)).is_degenerate());
        assert!(tri((1, 1), (1, 1), (3, 0)).is_degenerate());
        assert!(!tri((0, 0), (4, 0), (0, 4)).is_degenerate());
        assert_eq!(
            tri((i32::MIN, i32::MIN), (i32::MAX, i32::MIN), (i32::MIN, i32::MAX)).doubled_area(),
            (u32::MAX as i128) * (u32::MAX as i128)
        );
    }

    #[test]
    fn split_point_of_extreme_triangles() {
        assert_eq!(tri((i32::MIN, i32::MIN), (0, 0), (i32::MAX, i32::MAX)).split_x(), Some(0));
        assert_eq!(tri((0, i32::MIN), (10, 0), (5, i32::MAX)).split_x(), Some(2));
        assert_eq!(tri((i32::MAX, i32::MIN), (0, 0), (i32::MIN, i32::MAX)).split_x(), Some(-1));
    }

    #[test]
    fn bounding_box_is_clamped() {
        let t = tri((-5, 2), (20, 3), (4, 30));
        assert_eq!(t.bounding_box(10, 10), Some(BoundingBox::new(0, 2, 10, 8)));
        assert_eq!(tri((-5, -5), (-1, -2), (-3, -9)).bounding_box(10, 10), None);
    }
}
