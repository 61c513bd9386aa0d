use std::cmp::Ordering;

use super::Point;

/// Pixels of the segment between two points, one per step along the major axis.
///
/// The major axis is the one with the larger absolute delta (x wins ties) and
/// is always walked in ascending order. The minor coordinate is the floor of the
/// exact interpolation, computed in integers, so a segment yields the same
/// pixels whichever endpoint it starts from.
#[derive(Debug, Clone)]
pub struct LinePixels {
    steep: bool,
    major: i64,
    major_end: i64,
    major_start: i64,
    minor_start: i64,
    minor_delta: i64,
    major_delta: i64,
}

impl LinePixels {
    pub fn new(p0: Point, p1: Point) -> Self {
        let steep = (p0.x as i64 - p1.x as i64).abs() < (p0.y as i64 - p1.y as i64).abs();
        let transpose = |p: Point| {
            if steep {
                (p.y as i64, p.x as i64)
            } else {
                (p.x as i64, p.y as i64)
            }
        };
        let (mut a, mut b) = (transpose(p0), transpose(p1));
        // left to right along the major axis
        if a.0 > b.0 {
            std::mem::swap(&mut a, &mut b);
        }
        Self {
            steep,
            major: a.0,
            major_end: b.0,
            major_start: a.0,
            minor_start: a.1,
            minor_delta: b.1 - a.1,
            major_delta: b.0 - a.0,
        }
    }

    pub fn is_steep(&self) -> bool {
        self.steep
    }

    /// Pixels left to yield.
    pub fn remaining(&self) -> u64 {
        (self.major_end - self.major + 1).max(0) as u64
    }

    fn minor_at(&self, major: i64) -> i64 {
        if self.major_delta == 0 {
            return self.minor_start;
        }
        let step = (major - self.major_start) as i128;
        let offset = (self.minor_delta as i128 * step).div_euclid(self.major_delta as i128);
        self.minor_start + offset as i64
    }

    /// Remaining major coordinates whose minor coordinate lies in `lo..=hi`.
    ///
    /// The minor coordinate is monotonic along the line, so these form one
    /// inclusive range.
    fn major_range(&self, lo: i64, hi: i64) -> Option<(i64, i64)> {
        if self.major > self.major_end || lo > hi {
            return None;
        }
        let (first, last) = (self.major as i128, self.major_end as i128);
        if self.major_delta == 0 {
            return if (lo..=hi).contains(&self.minor_start) {
                Some((self.major, self.major_end))
            } else {
                None
            };
        }

        // floor(m * t / d) in k_lo..=k_hi  <=>  k_lo * d <= m * t < (k_hi + 1) * d
        let m = self.minor_delta as i128;
        let d = self.major_delta as i128;
        let k_lo = (lo - self.minor_start) as i128;
        let k_hi = (hi - self.minor_start) as i128;
        let (t_lo, t_hi) = match m.cmp(&0) {
            Ordering::Greater => (ceil_div(k_lo * d, m), ceil_div((k_hi + 1) * d, m) - 1),
            Ordering::Less => (floor_div((k_hi + 1) * d, m) + 1, floor_div(k_lo * d, m)),
            Ordering::Equal if k_lo <= 0 && k_hi >= 0 => (0, d),
            Ordering::Equal => return None,
        };

        let start = self.major_start as i128;
        let lo = (start + t_lo).max(first);
        let hi = (start + t_hi).min(last);
        if lo > hi {
            return None;
        }
        Some((lo as i64, hi as i64))
    }

    /// Horizontal extent of the remaining pixels on row `y`.
    pub fn row_extent(&self, y: i32) -> Option<(i32, i32)> {
        let y = y as i64;
        if self.steep {
            if y < self.major || y > self.major_end {
                return None;
            }
            let x = self.minor_at(y) as i32;
            Some((x, x))
        } else {
            self.major_range(y, y)
                .map(|(left, right)| (left as i32, right as i32))
        }
    }

    /// Skips the pixels that fall outside a `width`x`height` canvas and returns
    /// how many were skipped.
    pub fn clip_to(&mut self, width: u32, height: u32) -> u64 {
        let before = self.remaining();
        let (major_size, minor_size) = if self.steep {
            (height as i64, width as i64)
        } else {
            (width as i64, height as i64)
        };
        let visible = self
            .major_range(0, minor_size - 1)
            .map(|(lo, hi)| (lo.max(0), hi.min(major_size - 1)))
            .filter(|(lo, hi)| lo <= hi);
        match visible {
            Some((lo, hi)) => {
                self.major = lo;
                self.major_end = hi;
            }
            None => self.major = self.major_end + 1,
        }
        before - self.remaining()
    }
}

impl Iterator for LinePixels {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.major > self.major_end {
            return None;
        }
        let major = self.major;
        let minor = self.minor_at(major);
        self.major += 1;
        let (x, y) = if self.steep {
            (minor, major)
        } else {
            (major, minor)
        };
        Some(Point::new(x as i32, y as i32))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining() as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LinePixels {}

fn floor_div(a: i128, b: i128) -> i128 {
    let q = a / b;
    if a % b != 0 && (a < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

fn ceil_div(a: i128, b: i128) -> i128 {
    -floor_div(-a, b)
}
