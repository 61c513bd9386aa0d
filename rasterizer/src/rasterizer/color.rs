use crate::math_prelude::*;

/// 8-bit RGB color.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const OCEAN: Color = Color::new(14, 71, 73);
    pub const LIME: Color = Color::new(149, 198, 35);
    pub const FLAME: Color = Color::new(229, 88, 18);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts a `0.0..=1.0` color, clamping out of range channels.
    pub fn from_vec3(color: Vec3) -> Self {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(channel(color.x), channel(color.y), channel(color.z))
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}
