use std::ops::Range;

use itertools::Itertools;

use super::Color;

/// A pixel write that fell outside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pixel ({x}, {y}) is outside the {width}x{height} canvas")]
pub struct OutOfBoundsWrite {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// Anything the rasterizer can paint on.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Writes a pixel that is known to be inside the canvas.
    fn set_pixel(&mut self, x: u32, y: u32, color: Color);

    /// Rows this canvas accepts writes for. Rows of the canvas outside this
    /// range are owned by someone else and are skipped, not clipped.
    fn scanlines(&self) -> Range<u32> {
        0..self.height()
    }

    fn try_set_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), OutOfBoundsWrite> {
        if x < 0 || y < 0 || x as u32 >= self.width() || y as u32 >= self.height() {
            return Err(OutOfBoundsWrite {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        if self.scanlines().contains(&(y as u32)) {
            self.set_pixel(x as u32, y as u32, color);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) color: Vec<Color>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_color(width, height, Color::BLACK)
    }

    pub fn with_color(width: u32, height: u32, color: Color) -> Self {
        let size = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![color; size],
        }
    }

    pub(crate) fn from_pixels(width: u32, height: u32, color: Vec<Color>) -> Self {
        debug_assert_eq!(color.len(), width as usize * height as usize);
        Self {
            width,
            height,
            color,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_coords(&self) -> impl Iterator<Item = (u32, u32)> {
        (0..self.height)
            .cartesian_product(0..self.width)
            .map(|(y, x)| (x, y))
    }

    /// Pixels in row-major order together with their coordinates.
    pub fn color(&self) -> impl Iterator<Item = (u32, u32, &Color)> {
        self.pixel_coords()
            .zip(self.color.iter())
            .map(|((x, y), c)| (x, y, c))
    }

    pub fn pixels(&self) -> &[Color] {
        &self.color
    }

    pub fn get_color(&self, x: u32, y: u32) -> Option<&Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.color.get(self.coords_to_index(x, y))
    }

    pub fn clear(&mut self, color: Color) {
        self.color.fill(color);
    }

    /// Raw `r g b` bytes, row-major.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.color.iter().flat_map(|c| c.to_array()).collect()
    }

    fn coords_to_index(&self, x: u32, y: u32) -> usize {
        x as usize + y as usize * self.width as usize
    }
}

impl Canvas for Framebuffer {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let index = self.coords_to_index(x, y);
        self.color[index] = color;
    }
}

/// A run of whole scanlines borrowed from a [`Framebuffer`].
pub struct Band<'a> {
    width: u32,
    height: u32,
    first_row: u32,
    pixels: &'a mut [Color],
}

impl<'a> Band<'a> {
    pub(super) fn new(width: u32, height: u32, first_row: u32, pixels: &'a mut [Color]) -> Self {
        Self {
            width,
            height,
            first_row,
            pixels,
        }
    }

    fn row_count(&self) -> u32 {
        if self.width == 0 {
            0
        } else {
            (self.pixels.len() / self.width as usize) as u32
        }
    }
}

impl Canvas for Band<'_> {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn scanlines(&self) -> Range<u32> {
        self.first_row..self.first_row + self.row_count()
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if !self.scanlines().contains(&y) {
            return;
        }
        let index = x as usize + (y - self.first_row) as usize * self.width as usize;
        self.pixels[index] = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_set_pixel_reports_out_of_bounds() {
        let mut fb = Framebuffer::new(4, 3);
        assert!(fb.try_set_pixel(3, 2, Color::RED).is_ok());
        let err = fb.try_set_pixel(4, 0, Color::RED).unwrap_err();
        assert_eq!((err.x, err.y), (4, 0));
        assert!(fb.try_set_pixel(0, -1, Color::RED).is_err());
        assert_eq!(fb.get_color(3, 2), Some(&Color::RED));
        assert_eq!(fb.get_color(4, 0), None);
    }

    #[test]
    fn color_iterates_row_major() {
        let mut fb = Framebuffer::new(3, 2);
        fb.set_pixel(1, 0, Color::WHITE);
        let coords: Vec<_> = fb.color().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords[0..4], [(0, 0), (1, 0), (2, 0), (0, 1)]);
        assert_eq!(fb.to_rgb_bytes()[3..6], [255, 255, 255]);
    }

    #[test]
    fn band_ignores_rows_it_does_not_own() {
        let mut fb = Framebuffer::new(2, 4);
        for (index, pixels) in fb.color.chunks_mut(4).enumerate() {
            let mut band = Band::new(2, 4, index as u32 * 2, pixels);
            assert_eq!(band.scanlines(), index as u32 * 2..index as u32 * 2 + 2);
            band.try_set_pixel(1, 3, Color::RED).unwrap();
        }
        assert_eq!(fb.get_color(1, 3), Some(&Color::RED));
        assert_eq!(fb.color().filter(|(_, _, c)| **c == Color::RED).count(), 1);
    }
}
