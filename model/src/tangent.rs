use glam::Vec3;
use tracing::warn;

use crate::{Face, Vertex};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TangentError {
    #[error("face {face} has degenerate texture coordinates")]
    DegenerateUv { face: usize },
}

/// Outcome of [`compute_tangents`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TangentReport {
    /// Faces that contributed a tangent.
    pub accumulated: usize,
    /// Faces left out, in face order.
    pub skipped: Vec<TangentError>,
}

impl TangentReport {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Unit tangent of face number `face_index`, the direction of increasing `u`
/// across the triangle.
pub fn face_tangent(vertices: &[Vertex], face: &Face, face_index: usize) -> Result<Vec3, TangentError> {
    let degenerate = TangentError::DegenerateUv { face: face_index };
    let (v0, v1, v2) = (
        &vertices[face.a as usize],
        &vertices[face.b as usize],
        &vertices[face.c as usize],
    );

    let edge1 = v1.position - v0.position;
    let edge2 = v2.position - v0.position;
    let delta_uv1 = v1.tex_coord - v0.tex_coord;
    let delta_uv2 = v2.tex_coord - v0.tex_coord;

    let det = delta_uv1.x * delta_uv2.y - delta_uv2.x * delta_uv1.y;
    if det == 0.0 || !det.is_finite() {
        return Err(degenerate);
    }
    let f = 1.0 / det;
    let tangent = (edge1 * delta_uv2.y - edge2 * delta_uv1.y) * f;

    let length = tangent.length();
    if length == 0.0 || !length.is_finite() {
        return Err(degenerate);
    }
    Ok(tangent / length)
}

/// Overwrites every vertex tangent with the normalized sum of the tangents of
/// the faces using it. Vertices no usable face touches end up with a zero tangent.
///
/// Face indices must be in range for `vertices`.
pub fn compute_tangents(vertices: &mut [Vertex], faces: &[Face]) -> TangentReport {
    let mut report = TangentReport::default();
    let mut sums = vec![Vec3::ZERO; vertices.len()];

    for (i, face) in faces.iter().enumerate() {
        match face_tangent(vertices, face, i) {
            Ok(tangent) => {
                for &index in face.indices().iter() {
                    sums[index as usize] += tangent;
                }
                report.accumulated += 1;
            }
            Err(err) => {
                warn!(%err, ?face, "skipping face in tangent accumulation");
                report.skipped.push(err);
            }
        }
    }

    for (vertex, sum) in vertices.iter_mut().zip(sums) {
        vertex.tangent = sum.normalize_or_zero();
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn v(p: (f32, f32, f32), uv: (f32, f32)) -> Vertex {
        Vertex::new(Vec3::new(p.0, p.1, p.2), Vec2::new(uv.0, uv.1), Vec3::Z)
    }

    #[test]
    fn tangent_follows_u() {
        let vertices = [
            v((0.0, 0.0, 0.0), (0.0, 0.0)),
            v((2.0, 0.0, 0.0), (1.0, 0.0)),
            v((0.0, 2.0, 0.0), (0.0, 1.0)),
        ];
        let t = face_tangent(&vertices, &Face::new(0, 1, 2), 0).unwrap();
        assert!((t - Vec3::X).length() < 1e-6);
    }

    #[test]
    fn rotated_uvs() {
        // u runs along -y
        let vertices = [
            v((0.0, 0.0, 0.0), (0.0, 0.0)),
            v((1.0, 0.0, 0.0), (0.0, 1.0)),
            v((0.0, -1.0, 0.0), (1.0, 0.0)),
        ];
        let t = face_tangent(&vertices, &Face::new(0, 1, 2), 0).unwrap();
        assert!((t - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn collinear_uvs_are_skipped() {
        let mut vertices = vec![
            v((0.0, 0.0, 0.0), (0.0, 0.0)),
            v((1.0, 0.0, 0.0), (0.5, 0.5)),
            v((0.0, 1.0, 0.0), (1.0, 1.0)),
            v((1.0, 1.0, 0.0), (1.0, 0.0)),
        ];
        let faces = [Face::new(0, 1, 2), Face::new(1, 3, 2)];
        let report = compute_tangents(&mut vertices, &faces);
        assert_eq!(report.skipped, vec![TangentError::DegenerateUv { face: 0 }]);
        assert_eq!(report.accumulated, 1);
        assert!(!report.is_complete());
        assert_eq!(vertices[0].tangent, Vec3::ZERO);
        for vertex in &vertices[1..] {
            assert!((vertex.tangent.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn shared_vertices_average_their_faces() {
        let mut vertices = vec![
            v((0.0, 0.0, 0.0), (0.0, 0.0)),
            v((1.0, 0.0, 0.0), (1.0, 0.0)),
            v((0.0, 1.0, 0.0), (0.0, 1.0)),
            v((0.0, 0.0, 1.0), (1.0, 0.0)),
        ];
        let faces = [Face::new(0, 1, 2), Face::new(0, 2, 3)];
        let report = compute_tangents(&mut vertices, &faces);
        assert!(report.is_complete());
        let expected = (Vec3::X + Vec3::Z).normalize();
        assert!((vertices[0].tangent - expected).length() < 1e-6);
        assert!((vertices[1].tangent - Vec3::X).length() < 1e-6);
        assert!((vertices[3].tangent - Vec3::Z).length() < 1e-6);
    }
}
