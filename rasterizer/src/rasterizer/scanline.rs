use std::ops::{Range, RangeInclusive};

use tracing::trace;

use super::{Canvas, Color, DrawStats, LinePixels, OutOfBoundsWrite, Triangle};

/// Horizontal extent of a triangle's outline on the visible scanlines it touches.
///
/// Extents are those of [`LinePixels`], the walk `draw_line` uses, so a filled
/// triangle always covers its own wireframe. Only rows inside `rows` are kept.
pub(super) struct Scanlines {
    top: i64,
    spans: Vec<(i32, i32)>,
}

impl Scanlines {
    /// `triangle` must already be sorted by height.
    pub(super) fn of(triangle: &Triangle, rows: Range<u32>) -> Self {
        let top = (triangle.v0.y as i64).max(rows.start as i64);
        let bottom = (triangle.v2.y as i64).min(rows.end as i64 - 1);
        let edges = triangle.edges();
        let lines = [
            LinePixels::new(edges[0].0, edges[0].1),
            LinePixels::new(edges[1].0, edges[1].1),
            LinePixels::new(edges[2].0, edges[2].1),
        ];

        let spans = (top..=bottom)
            .map(|y| {
                lines
                    .iter()
                    .filter_map(|line| line.row_extent(y as i32))
                    .fold((i32::MAX, i32::MIN), |(left, right), (a, b)| {
                        (left.min(a), right.max(b))
                    })
            })
            .collect();
        Self { top, spans }
    }

    fn span_mut(&mut self, y: i32) -> Option<&mut (i32, i32)> {
        let index = y as i64 - self.top;
        if index < 0 {
            return None;
        }
        self.spans.get_mut(index as usize).filter(|span| span.0 <= span.1)
    }

    fn span(&self, y: i32) -> Option<(i32, i32)> {
        let index = y as i64 - self.top;
        if index < 0 {
            return None;
        }
        self.spans.get(index as usize).copied().filter(|(l, r)| l <= r)
    }

    /// Widens scanline `y` so it reaches `x`.
    pub(super) fn include(&mut self, y: i32, x: i32) {
        if let Some(span) = self.span_mut(y) {
            span.0 = span.0.min(x);
            span.1 = span.1.max(x);
        }
    }

    /// Fills `rows` from the left to the right extent of each scanline. Rows
    /// above or below the canvas are only counted.
    pub(super) fn fill<C>(&self, canvas: &mut C, rows: RangeInclusive<i32>, color: Color) -> DrawStats
    where
        C: Canvas + ?Sized,
    {
        let mut stats = DrawStats::default();
        let (first, last) = (*rows.start() as i64, *rows.end() as i64);
        if first > last {
            return stats;
        }

        let on_canvas = count_between(first.max(0), last.min(canvas.height() as i64 - 1));
        stats.culled_rows = (last - first + 1) as u64 - on_canvas;
        if stats.culled_rows > 0 {
            trace!(first, last, culled = stats.culled_rows, "culled scanlines");
        }

        let table_end = self.top + self.spans.len() as i64 - 1;
        for y in first.max(self.top)..=last.min(table_end) {
            if let Some((left, right)) = self.span(y as i32) {
                stats += fill_span(canvas, y as i32, left, right, color);
            }
        }
        stats
    }
}

fn count_between(lo: i64, hi: i64) -> u64 {
    if hi >= lo {
        (hi - lo + 1) as u64
    } else {
        0
    }
}

/// Paints the inclusive run between `x0` and `x1` on scanline `y`, in whichever
/// order the endpoints come. The part of the run outside the canvas is clipped.
pub fn fill_span<C>(canvas: &mut C, y: i32, x0: i32, x1: i32, color: Color) -> DrawStats
where
    C: Canvas + ?Sized,
{
    let (left, right) = (x0.min(x1) as i64, x0.max(x1) as i64);
    let len = (right - left + 1) as u64;
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);

    let clip = |x: i64, clipped: u64| {
        let err = OutOfBoundsWrite {
            x: x as i32,
            y,
            width: width as u32,
            height: height as u32,
        };
        trace!(%err, clipped, "clipped scanline");
    };

    if y < 0 || y as i64 >= height {
        clip(left, len);
        return DrawStats {
            clipped: len,
            ..DrawStats::default()
        };
    }
    if !canvas.scanlines().contains(&(y as u32)) {
        return DrawStats::default();
    }

    let lo = left.max(0);
    let hi = right.min(width - 1);
    let painted = count_between(lo, hi);
    let clipped = len - painted;
    if clipped > 0 {
        clip(if left < 0 { left } else { right }, clipped);
    }
    for x in lo..=hi {
        canvas.set_pixel(x as u32, y as u32, color);
    }
    DrawStats {
        painted,
        clipped,
        ..DrawStats::default()
    }
}
