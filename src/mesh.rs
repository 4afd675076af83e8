//! The mesh provider contract.
//!
//! Geometry comes from outside this crate: anything that can hand out
//! positions, texture coordinates, and triangle faces as contiguous slices
//! implements [`TexturedMesh`]. [`MeshData`] is the plain owned
//! implementation used by the demo and the tests.

use glam::{Vec2, Vec4};

/// Read-only geometry source consumed by
/// [`TextureRenderer::load_mesh`](crate::TextureRenderer::load_mesh).
///
/// Ownership of the arrays stays with the provider; the renderer copies the
/// data into GPU buffers while loading and never touches it again. Providers
/// must hand out exactly one texture coordinate per vertex position.
pub trait TexturedMesh {
    /// Vertex positions as 4-component homogeneous coordinates.
    fn vertices(&self) -> &[Vec4];

    /// One texture coordinate per vertex.
    fn texcoords(&self) -> &[Vec2];

    /// Counter-clockwise triangles as triples of vertex indices.
    fn faces(&self) -> &[[u32; 3]];

    /// Number of vertices.
    fn vertex_count(&self) -> usize {
        self.vertices().len()
    }

    /// Number of triangle faces.
    fn face_count(&self) -> usize {
        self.faces().len()
    }
}

/// Owned mesh data.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<Vec4>,
    pub texcoords: Vec<Vec2>,
    pub faces: Vec<[u32; 3]>,
}

impl MeshData {
    /// A square centered at the origin with side length 1 in the z = 0
    /// plane, texture coordinates covering [0, 1]².
    pub fn unit_square() -> Self {
        let h = 0.5_f32;
        Self {
            vertices: vec![
                Vec4::new(-h, -h, 0.0, 1.0),
                Vec4::new(h, -h, 0.0, 1.0),
                Vec4::new(h, h, 0.0, 1.0),
                Vec4::new(-h, h, 0.0, 1.0),
            ],
            texcoords: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
            faces: vec![[0, 1, 2], [0, 2, 3]],
        }
    }
}

impl TexturedMesh for MeshData {
    fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_shape() {
        let square = MeshData::unit_square();
        assert_eq!(square.vertex_count(), 4);
        assert_eq!(square.texcoords().len(), 4);
        assert_eq!(square.face_count(), 2);
        for face in square.faces() {
            for &index in face {
                assert!((index as usize) < square.vertex_count());
            }
        }
    }

    #[test]
    fn unit_square_spans_unit_uv_range() {
        let square = MeshData::unit_square();
        let min = square
            .texcoords()
            .iter()
            .fold(Vec2::splat(f32::MAX), |acc, uv| acc.min(*uv));
        let max = square
            .texcoords()
            .iter()
            .fold(Vec2::splat(f32::MIN), |acc, uv| acc.max(*uv));
        assert_eq!(min, Vec2::ZERO);
        assert_eq!(max, Vec2::ONE);
    }

    #[test]
    fn counts_follow_slice_lengths() {
        let mesh = MeshData {
            vertices: vec![Vec4::W; 3],
            texcoords: vec![Vec2::ZERO; 3],
            faces: vec![[0, 1, 2]],
        };
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.face_count(), 1);
    }
}
