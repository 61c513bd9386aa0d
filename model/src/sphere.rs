use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use crate::tangent::compute_tangents;
use crate::{Face, IndexedMesh, Vertex};

/// A latitude/longitude sphere centered on the origin.
///
/// Rings run from the north pole (`+y`) to the south pole. Each ring has
/// `sectors + 1` vertices, the first and last sharing a position but not a
/// texture coordinate. The pole rings are made of one triangle per sector.
///
/// A sphere needs at least one sector and one stack and a finite positive
/// radius. Anything else builds an empty mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct UvSphere {
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
}

impl Default for UvSphere {
    fn default() -> Self {
        Self {
            radius: 1.0,
            sectors: 30,
            stacks: 30,
        }
    }
}

impl UvSphere {
    pub fn is_valid(&self) -> bool {
        self.sectors > 0 && self.stacks > 0 && self.radius.is_finite() && self.radius > 0.0
    }

    pub fn vertex_count(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        (self.stacks as usize + 1) * (self.sectors as usize + 1)
    }

    pub fn face_count(&self) -> usize {
        if !self.is_valid() {
            return 0;
        }
        2 * self.sectors as usize * (self.stacks as usize - 1)
    }

    pub fn build(&self) -> IndexedMesh {
        if !self.is_valid() {
            return IndexedMesh::default();
        }
        let mut vertices = Vec::with_capacity(self.vertex_count());
        let mut faces = Vec::with_capacity(self.face_count());
        let sector_step = 2.0 * PI / self.sectors as f32;
        let stack_step = PI / self.stacks as f32;

        for i in 0..=self.stacks {
            let stack_angle = FRAC_PI_2 - i as f32 * stack_step;
            let ring = self.radius * stack_angle.cos();
            let y = self.radius * stack_angle.sin();

            for j in 0..=self.sectors {
                let sector_angle = j as f32 * sector_step;
                let position = Vec3::new(ring * sector_angle.cos(), y, ring * sector_angle.sin());
                let tex_coord = Vec2::new(
                    1.0 - j as f32 / self.sectors as f32,
                    i as f32 / self.stacks as f32,
                );
                vertices.push(Vertex::new(position, tex_coord, position / self.radius));
            }
        }

        let row = self.sectors + 1;
        for i in 0..self.stacks {
            let mut k1 = i * row;
            let mut k2 = k1 + row;
            for _ in 0..self.sectors {
                if i != 0 {
                    faces.push(Face::new(k1, k2, k1 + 1));
                }
                if i != self.stacks - 1 {
                    faces.push(Face::new(k1 + 1, k2, k2 + 1));
                }
                k1 += 1;
                k2 += 1;
            }
        }

        compute_tangents(&mut vertices, &faces);
        IndexedMesh { vertices, faces }
    }
}
