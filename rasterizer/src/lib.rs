pub mod ppm;
pub mod rasterizer;
pub use rasterizer::*;

pub mod math_prelude {
    pub use glam::{Vec2, Vec3};
}
