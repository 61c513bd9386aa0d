use crate::math_prelude::*;

/// Integer pixel coordinate. `y` grows downwards.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Maps normalized device coordinates (`-1..=1` on both axes, y up) to a pixel.
    /// Values outside that range land outside the screen and get clipped when drawn.
    pub fn from_normalized(mut x: f32, mut y: f32, width: u32, height: u32) -> Self {
        x = (x + 1.0) / 2.0;
        y = (-y + 1.0) / 2.0;

        let x = ((x * width as f32).floor() as i32).min(width as i32 - 1);
        let y = ((y * height as f32).floor() as i32).min(height as i32 - 1);

        Point::new(x, y)
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}
