use std::cmp::Ordering;

use glam::Vec3;
use itertools::Itertools;
use model::IndexedMesh;
use rand::Rng;
use rasterizer::{Color, Point, Triangle};

/// The first lab's picture: one line and three filled triangles on a 320x320 canvas.
pub struct LabScene {
    pub line: (Point, Point, Color),
    pub triangles: Vec<(Triangle, Color)>,
}

impl LabScene {
    pub fn new() -> Self {
        let t = |a: (i32, i32), b: (i32, i32), c: (i32, i32)| Triangle::new(a.into(), b.into(), c.into());
        Self {
            line: (Point::new(0, 0), Point::new(100, 100), Color::RED),
            triangles: vec![
                (t((160, 60), (150, 10), (75, 190)), Color::OCEAN),
                (t((20, 250), (250, 175), (300, 300)), Color::LIME),
                (t((225, 30), (290, 125), (250, 150)), Color::FLAME),
            ],
        }
    }
}

/// `count` random triangles whose vertices may fall a quarter screen outside
/// the canvas on every side.
pub fn random_triangles<R: Rng>(rng: &mut R, count: usize, width: u32, height: u32) -> Vec<(Triangle, Color)> {
    let (w, h) = (width as i32, height as i32);
    let point = |rng: &mut R| Point::new(rng.gen_range(-w / 4..=w + w / 4), rng.gen_range(-h / 4..=h + h / 4));
    (0..count)
        .map(|_| {
            let triangle = Triangle::new(point(&mut *rng), point(&mut *rng), point(&mut *rng));
            let color = Color::new(rng.gen(), rng.gen(), rng.gen());
            (triangle, color)
        })
        .collect()
}

/// Orthographic view down `-z` of a mesh scaled to fit the canvas.
///
/// Faces are sorted back to front. With `shade` faces pointing away from the
/// viewer are dropped and the rest take a gray level from their facing ratio,
/// otherwise every face is drawn white.
pub fn mesh_triangles(mesh: &IndexedMesh, width: u32, height: u32, shade: bool) -> Vec<(Triangle, Color)> {
    let vertices = mesh.vertices();
    let extent = vertices
        .iter()
        .map(|v| v.position.x.abs().max(v.position.y.abs()))
        .fold(0.0f32, f32::max);
    let scale = if extent > 0.0 { 0.95 / extent } else { 1.0 };
    let project = |p: Vec3| Point::from_normalized(p.x * scale, p.y * scale, width, height);

    mesh.faces()
        .iter()
        .map(|face| {
            let [a, b, c] = [
                vertices[face.a as usize].position,
                vertices[face.b as usize].position,
                vertices[face.c as usize].position,
            ];
            let normal = (b - a).cross(c - a).normalize_or_zero();
            let depth = (a.z + b.z + c.z) / 3.0;
            (Triangle::new(project(a), project(b), project(c)), normal.dot(Vec3::Z), depth)
        })
        .filter(|&(_, facing, _)| !shade || facing > 0.0)
        .sorted_by(|x, y| x.2.partial_cmp(&y.2).unwrap_or(Ordering::Equal))
        .map(|(triangle, facing, _)| {
            let color = if shade {
                Color::from_vec3(Vec3::splat(0.15 + 0.85 * facing))
            } else {
                Color::WHITE
            };
            (triangle, color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::UvSphere;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_triangles_are_reproducible() {
        let a = random_triangles(&mut StdRng::seed_from_u64(3), 10, 64, 48);
        let b = random_triangles(&mut StdRng::seed_from_u64(3), 10, 64, 48);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
    }

    #[test]
    fn sphere_fits_the_canvas() {
        let mesh = UvSphere::default().build();
        let shaded = mesh_triangles(&mesh, 100, 100, true);
        let all = mesh_triangles(&mesh, 100, 100, false);
        assert_eq!(all.len(), mesh.faces().len());
        assert!(!shaded.is_empty() && shaded.len() < all.len());
        for (t, _) in all.iter() {
            for p in t.vertices().iter() {
                assert!(p.x >= 0 && p.x < 100 && p.y >= 0 && p.y < 100, "{:?}", p);
            }
        }
    }
}
