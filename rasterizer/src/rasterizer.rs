mod bounding_box;
mod color;
mod framebuffer;
mod line;
mod point;
mod scanline;
mod triangle;

use std::ops::{Add, AddAssign};

pub use bounding_box::BoundingBox;
pub use color::Color;
pub use framebuffer::{Band, Canvas, Framebuffer, OutOfBoundsWrite};
pub use line::LinePixels;
pub use point::Point;
pub use scanline::fill_span;
pub use triangle::Triangle;

use rayon::prelude::*;
use scanline::Scanlines;
use tracing::{debug, trace};

/// How triangles are drawn, the equivalent of `glPolygonMode`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FillMode {
    /// Only the three edges.
    Wireframe,
    /// Solid scanline fill.
    Fill,
}

impl Default for FillMode {
    fn default() -> Self {
        FillMode::Fill
    }
}

/// Pixel accounting for a draw call.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DrawStats {
    /// Pixel writes that landed on the canvas.
    pub painted: u64,
    /// Pixel writes dropped because they fell outside the canvas.
    pub clipped: u64,
    /// Triangle scanlines above or below the canvas. They are skipped
    /// without visiting their pixels, so their pixels are not in `clipped`.
    pub culled_rows: u64,
}

impl Add for DrawStats {
    type Output = DrawStats;

    fn add(self, rhs: DrawStats) -> DrawStats {
        DrawStats {
            painted: self.painted + rhs.painted,
            clipped: self.clipped + rhs.clipped,
            culled_rows: self.culled_rows + rhs.culled_rows,
        }
    }
}

impl AddAssign for DrawStats {
    fn add_assign(&mut self, rhs: DrawStats) {
        *self = *self + rhs;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Rasterizer {
    mode: FillMode,
}

impl Rasterizer {
    /// Scanlines per task in [`Rasterizer::render_par`].
    const BAND_HEIGHT: u32 = 64;

    pub fn new(mode: FillMode) -> Self {
        Self { mode }
    }

    pub fn polygon_mode(&self) -> FillMode {
        self.mode
    }

    pub fn set_polygon_mode(&mut self, mode: FillMode) {
        self.mode = mode;
    }

    pub fn draw_line<C>(&self, canvas: &mut C, p0: Point, p1: Point, color: Color) -> DrawStats
    where
        C: Canvas + ?Sized,
    {
        let mut stats = DrawStats::default();
        let mut pixels = LinePixels::new(p0, p1);
        stats.clipped = pixels.clip_to(canvas.width(), canvas.height());
        if stats.clipped > 0 {
            trace!(clipped = stats.clipped, ?p0, ?p1, "clipped line");
        }
        for p in pixels {
            match canvas.try_set_pixel(p.x, p.y, color) {
                Ok(()) => stats.painted += 1,
                Err(err) => {
                    trace!(%err, "clipped line pixel");
                    stats.clipped += 1;
                }
            }
        }
        stats
    }

    pub fn draw_triangle<C>(&self, canvas: &mut C, triangle: &Triangle, color: Color) -> DrawStats
    where
        C: Canvas + ?Sized,
    {
        match self.mode {
            FillMode::Wireframe => triangle
                .edges()
                .iter()
                .map(|(a, b)| self.draw_line(canvas, *a, *b, color))
                .fold(DrawStats::default(), Add::add),
            FillMode::Fill => self.fill_triangle(canvas, triangle, color),
        }
    }

    /// Two pass scanline fill: rows `y0..=y1` form the flat-bottom half and
    /// rows `y1+1..=y2` the flat-top half, so the middle scanline is painted
    /// exactly once. That scanline runs between the middle vertex and the split
    /// point. Flat triangles take a single pass.
    fn fill_triangle<C>(&self, canvas: &mut C, triangle: &Triangle, color: Color) -> DrawStats
    where
        C: Canvas + ?Sized,
    {
        let t = triangle.sorted_by_height();
        let visible = canvas.scanlines();
        let rows = visible.start..visible.end.min(canvas.height());
        let mut scanlines = Scanlines::of(&t, rows);

        match t.split_x() {
            None => scanlines.fill(canvas, t.v0.y..=t.v2.y, color),
            Some(split_x) => {
                trace!(split_x, y = t.v1.y, "splitting triangle");
                scanlines.include(t.v1.y, split_x);
                let flat_bottom = scanlines.fill(canvas, t.v0.y..=t.v1.y, color);
                let flat_top = scanlines.fill(canvas, t.v1.y + 1..=t.v2.y, color);
                flat_bottom + flat_top
            }
        }
    }

    /// Draws a batch of triangles, in order, across horizontal bands of the
    /// framebuffer in parallel. The result is the same as drawing them one by
    /// one with [`Rasterizer::draw_triangle`].
    pub fn render_par(&self, framebuffer: &mut Framebuffer, batch: &[(Triangle, Color)]) {
        let start = std::time::Instant::now();
        let (width, height) = (framebuffer.width, framebuffer.height);
        if width == 0 || height == 0 {
            return;
        }

        let boxes: Vec<Option<BoundingBox>> = batch
            .par_iter()
            .map(|(triangle, _)| triangle.bounding_box(width, height))
            .collect();

        let rows = Self::BAND_HEIGHT;
        framebuffer
            .color
            .par_chunks_mut(width as usize * rows as usize)
            .enumerate()
            .for_each(|(index, pixels)| {
                let mut band = Band::new(width, height, index as u32 * rows, pixels);
                let scanlines = band.scanlines();
                let band_box = BoundingBox::new(0, scanlines.start, width, scanlines.end - scanlines.start);
                for ((triangle, color), bb) in batch.iter().zip(boxes.iter()) {
                    let visible = bb.map_or(false, |bb| bb.overlap(&band_box).is_some());
                    if visible {
                        self.draw_triangle(&mut band, triangle, *color);
                    }
                }
            });

        debug!(
            triangles = batch.len(),
            mode = ?self.mode,
            elapsed = ?start.elapsed(),
            "rendered batch"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> Triangle {
        Triangle::new(a.into(), b.into(), c.into())
    }

    fn painted(fb: &Framebuffer) -> Vec<(u32, u32)> {
        fb.color()
            .filter(|(_, _, c)| **c != Color::BLACK)
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn line_single_point() {
        let mut fb = Framebuffer::new(4, 4);
        let stats = Rasterizer::default().draw_line(&mut fb, Point::new(2, 1), Point::new(2, 1), Color::RED);
        assert_eq!(stats, DrawStats { painted: 1, ..DrawStats::default() });
        assert_eq!(painted(&fb), vec![(2, 1)]);
    }

    #[test]
    fn line_is_clipped() {
        let mut fb = Framebuffer::new(4, 4);
        let stats = Rasterizer::default().draw_line(&mut fb, Point::new(-2, 0), Point::new(5, 0), Color::RED);
        assert_eq!(stats, DrawStats { painted: 4, clipped: 4, culled_rows: 0 });
    }

    #[test]
    fn fill_small_triangle() {
        let mut fb = Framebuffer::new(8, 8);
        let stats = Rasterizer::new(FillMode::Fill).draw_triangle(&mut fb, &tri((0, 0), (4, 0), (0, 4)), Color::RED);
        assert_eq!(stats.painted, 15);
        for (x, y) in painted(&fb) {
            assert!(x + y <= 4);
        }
    }

    #[test]
    fn wireframe_draws_edges_only() {
        let mut fb = Framebuffer::new(8, 8);
        let mut rasterizer = Rasterizer::new(FillMode::Fill);
        rasterizer.set_polygon_mode(FillMode::Wireframe);
        rasterizer.draw_triangle(&mut fb, &tri((0, 0), (6, 0), (0, 6)), Color::RED);
        assert_eq!(fb.get_color(1, 1), Some(&Color::BLACK));
        assert_eq!(fb.get_color(3, 3), Some(&Color::RED));
        assert_eq!(fb.get_color(0, 6), Some(&Color::RED));
    }

    #[test]
    fn general_triangle_fills_both_halves() {
        let mut fb = Framebuffer::new(320, 320);
        let t = tri((160, 60), (150, 10), (75, 190));
        Rasterizer::default().draw_triangle(&mut fb, &t, Color::OCEAN);
        for y in 10..=190 {
            assert!(
                (0..320).any(|x| fb.get_color(x, y) == Some(&Color::OCEAN)),
                "row {} is empty",
                y
            );
        }
        assert_eq!(fb.get_color(0, 9), Some(&Color::BLACK));
        assert_eq!(fb.get_color(75, 191), Some(&Color::BLACK));
    }

    #[test]
    fn middle_scanline_reaches_the_split_point() {
        let mut fb = Framebuffer::new(320, 320);
        let t = tri((150, 10), (160, 60), (75, 190));
        assert_eq!(t.split_x(), Some(129));
        Rasterizer::default().draw_triangle(&mut fb, &t, Color::OCEAN);
        assert_eq!(fb.get_color(129, 60), Some(&Color::OCEAN));
        assert_eq!(fb.get_color(160, 60), Some(&Color::OCEAN));
        assert_eq!(fb.get_color(128, 60), Some(&Color::BLACK));
        assert_eq!(fb.get_color(161, 60), Some(&Color::BLACK));
    }

    #[test]
    fn extreme_lines_are_clipped_without_walking() {
        let rasterizer = Rasterizer::default();

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_line(&mut fb, Point::new(i32::MIN, 2), Point::new(i32::MAX, 2), Color::RED);
        assert_eq!(stats.painted, 16);
        assert_eq!(stats.clipped, (1 << 32) - 16);
        assert_eq!(painted(&fb), (0..16).map(|x| (x, 2)).collect::<Vec<_>>());

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_line(&mut fb, Point::new(0, i32::MIN), Point::new(0, i32::MAX), Color::RED);
        assert_eq!(stats.painted, 16);
        assert_eq!(stats.clipped, (1 << 32) - 16);

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_line(&mut fb, Point::new(i32::MIN, i32::MIN), Point::new(i32::MAX, i32::MAX), Color::RED);
        assert_eq!(stats.painted, 16);
        assert_eq!(painted(&fb), (0..16).map(|i| (i, i)).collect::<Vec<_>>());
    }

    #[test]
    fn tall_triangles_only_visit_visible_rows() {
        let rasterizer = Rasterizer::default();

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_triangle(&mut fb, &tri((0, i32::MIN), (10, 0), (5, i32::MAX)), Color::RED);
        assert_eq!(stats.culled_rows, (1 << 32) - 16);
        assert!(stats.painted > 0);
        assert_eq!(stats.painted as usize, painted(&fb).len());

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_triangle(&mut fb, &tri((0, 0), (10, 0), (5, 300_000_000)), Color::RED);
        assert_eq!(stats.culled_rows, 300_000_001 - 16);
        for x in 0..=10 {
            assert_eq!(fb.get_color(x, 0), Some(&Color::RED));
        }
        assert_eq!(fb.get_color(11, 0), Some(&Color::BLACK));
        assert_eq!(stats.painted as usize, painted(&fb).len());

        let mut fb = Framebuffer::new(16, 16);
        let stats = rasterizer.draw_triangle(&mut fb, &tri((i32::MIN, i32::MIN), (i32::MAX, 3), (i32::MIN, i32::MAX)), Color::RED);
        assert_eq!(stats.painted, 256);
        assert_eq!(painted(&fb).len(), 256);
    }

    #[test]
    fn degenerate_triangles_draw_their_outline() {
        let rasterizer = Rasterizer::default();

        let mut fb = Framebuffer::new(8, 8);
        rasterizer.draw_triangle(&mut fb, &tri((3, 3), (3, 3), (3, 3)), Color::RED);
        assert_eq!(painted(&fb), vec![(3, 3)]);

        let mut fb = Framebuffer::new(8, 8);
        rasterizer.draw_triangle(&mut fb, &tri((0, 0), (2, 2), (4, 4)), Color::RED);
        assert_eq!(painted(&fb), vec![(0, 0), (1, 1), (2, 2), (3, 3), (4, 4)]);

        let mut fb = Framebuffer::new(8, 8);
        rasterizer.draw_triangle(&mut fb, &tri((1, 5), (6, 5), (3, 5)), Color::RED);
        assert_eq!(painted(&fb).len(), 6);
    }

    #[test]
    fn partially_visible_triangle_is_clipped() {
        let mut fb = Framebuffer::new(10, 10);
        let stats = Rasterizer::default().draw_triangle(&mut fb, &tri((-10, -10), (20, 5), (5, 20)), Color::RED);
        assert!(stats.painted > 0);
        assert!(stats.clipped > 0);
        assert_eq!(stats.painted as usize, painted(&fb).len());
    }

    #[test]
    fn render_par_matches_sequential() {
        let batch = vec![
            (tri((160, 60), (150, 10), (75, 190)), Color::OCEAN),
            (tri((20, 250), (250, 175), (300, 300)), Color::LIME),
            (tri((225, 30), (290, 125), (250, 150)), Color::FLAME),
            (tri((-40, 100), (400, 120), (100, 90)), Color::WHITE),
            (tri((0, i32::MIN), (10, 0), (5, i32::MAX)), Color::RED),
            (tri((i32::MIN, 200), (i32::MAX, 150), (30, i32::MAX)), Color::FLAME),
        ];
        for mode in [FillMode::Fill, FillMode::Wireframe].iter() {
            let rasterizer = Rasterizer::new(*mode);
            let mut sequential = Framebuffer::new(320, 300);
            for (t, c) in &batch {
                rasterizer.draw_triangle(&mut sequential, t, *c);
            }
            let mut parallel = Framebuffer::new(320, 300);
            rasterizer.render_par(&mut parallel, &batch);
            assert!(sequential == parallel, "{:?} differs", mode);
        }
    }
}
