use std::ops::Index;

use glam::{Vec2, Vec3};

/// A mesh vertex. Two vertices are the same vertex when every field matches.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
    pub normal: Vec3,
    pub tangent: Vec3,
}

impl Vertex {
    /// Floats per vertex in [`crate::IndexedMesh::vertex_buffer`].
    pub const FLOATS: usize = 11;

    pub fn new(position: Vec3, tex_coord: Vec2, normal: Vec3) -> Self {
        Self {
            position,
            tex_coord,
            normal,
            tangent: Vec3::ZERO,
        }
    }

    /// `position, tex_coord, normal, tangent` as one flat array.
    pub fn to_array(&self) -> [f32; Self::FLOATS] {
        let p = self.position;
        let t = self.tex_coord;
        let n = self.normal;
        let g = self.tangent;
        [p.x, p.y, p.z, t.x, t.y, n.x, n.y, n.z, g.x, g.y, g.z]
    }
}

/// Three indices into a vertex list.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Face {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

impl Face {
    pub fn new(a: u32, b: u32, c: u32) -> Self {
        Self { a, b, c }
    }

    pub fn indices(&self) -> [u32; 3] {
        [self.a, self.b, self.c]
    }

    /// Two corners share a vertex.
    pub fn is_degenerate(&self) -> bool {
        self.a == self.b || self.b == self.c || self.a == self.c
    }
}

impl Index<usize> for Face {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        match index {
            0 => &self.a,
            1 => &self.b,
            2 => &self.c,
            _ => panic!("face index {} out of range 0..3", index),
        }
    }
}
