use fxhash::FxHashMap;

use crate::{Face, Vertex};

/// Hash key for a vertex. Every float is stored as its bit pattern after
/// adding `0.0`, which folds `-0.0` into `0.0`. For finite values two keys are
/// equal exactly when the vertices compare equal.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct VertexKey([u32; Vertex::FLOATS]);

impl VertexKey {
    fn of(vertex: &Vertex) -> Self {
        let mut bits = [0u32; Vertex::FLOATS];
        for (b, f) in bits.iter_mut().zip(vertex.to_array().iter()) {
            *b = (f + 0.0).to_bits();
        }
        Self(bits)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("face {face:?} refers to vertex {index} but only {available} vertices exist")]
pub struct FaceOutOfRange {
    pub face: Face,
    pub index: u32,
    pub available: usize,
}

/// Accumulates unique vertices and faces.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    vertices: Vec<Vertex>,
    faces: Vec<Face>,
    lookup: FxHashMap<VertexKey, u32>,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `vertex`, adding it if no equal vertex was seen before.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> u32 {
        let vertices = &mut self.vertices;
        *self.lookup.entry(VertexKey::of(&vertex)).or_insert_with(|| {
            vertices.push(vertex);
            (vertices.len() - 1) as u32
        })
    }

    /// Appends a vertex without deduplication.
    pub fn push_vertex(&mut self, vertex: Vertex) -> u32 {
        self.vertices.push(vertex);
        (self.vertices.len() - 1) as u32
    }

    pub fn push_face(&mut self, face: Face) -> Result<(), FaceOutOfRange> {
        let available = self.vertices.len();
        if let Some(&index) = face.indices().iter().find(|&&i| i as usize >= available) {
            return Err(FaceOutOfRange {
                face,
                index,
                available,
            });
        }
        self.faces.push(face);
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn build(self) -> IndexedMesh {
        IndexedMesh {
            vertices: self.vertices,
            faces: self.faces,
        }
    }
}

/// Unique vertices in first-seen order plus the faces indexing them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexedMesh {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) faces: Vec<Face>,
}

impl IndexedMesh {
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Flat `a, b, c` list, ready for an element buffer.
    pub fn index_buffer(&self) -> Vec<u32> {
        self.faces.iter().flat_map(|f| f.indices()).collect()
    }

    /// Interleaved `position, tex_coord, normal, tangent` floats, [`Vertex::FLOATS`] per vertex.
    pub fn vertex_buffer(&self) -> Vec<f32> {
        self.vertices.iter().flat_map(|v| v.to_array()).collect()
    }

    pub fn into_parts(self) -> (Vec<Vertex>, Vec<Face>) {
        (self.vertices, self.faces)
    }
}
