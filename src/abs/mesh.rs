//! GPU-side mesh buffers.
//!
//! This module defines the [`GpuMesh`] struct: three static GL buffers
//! (positions, texture coordinates, triangle indices) tied together by one
//! vertex array object. The shader attribute slots the VAO wires up are
//! passed in explicitly via [`AttribLocations`] instead of being looked up
//! against whatever program happens to be bound.

use std::sync::Arc;

use glam::{Vec2, Vec4};
use glow::HasContext;

use crate::error::RenderError;

/// Resolved shader attribute slots a mesh's vertex array is wired to.
#[derive(Debug, Clone, Copy)]
pub struct AttribLocations {
    pub position: u32,
    pub texcoord: u32,
}

/// Reinterprets a slice of plain vertex data as bytes for buffer upload.
fn raw_bytes<T: Copy>(data: &[T]) -> &[u8] {
    unsafe { std::slice::from_raw_parts(data.as_ptr().cast(), std::mem::size_of_val(data)) }
}

/// Rejects geometry the index buffer could read out of bounds.
fn check_mesh_input(
    positions: &[Vec4],
    texcoords: &[Vec2],
    faces: &[[u32; 3]],
) -> Result<(), RenderError> {
    if positions.is_empty() {
        return Err(RenderError::InvalidArgument("mesh has no vertices".into()));
    }
    if faces.is_empty() {
        return Err(RenderError::InvalidArgument("mesh has no faces".into()));
    }
    if texcoords.len() != positions.len() {
        return Err(RenderError::InvalidArgument(format!(
            "texcoord count {} does not match vertex count {}",
            texcoords.len(),
            positions.len()
        )));
    }
    for (face_index, face) in faces.iter().enumerate() {
        for &index in face {
            if index as usize >= positions.len() {
                return Err(RenderError::InvalidArgument(format!(
                    "face {face_index} references vertex {index}, mesh has {}",
                    positions.len()
                )));
            }
        }
    }
    Ok(())
}

/// A triangle mesh stored on the GPU side, deleted when dropped.
pub struct GpuMesh {
    gl: Arc<glow::Context>,
    vao: glow::VertexArray,
    position_buffer: glow::Buffer,
    texcoord_buffer: glow::Buffer,
    index_buffer: glow::Buffer,
    face_count: usize,
}

impl GpuMesh {
    /// Uploads geometry as static (upload-once, read-many) GL buffers and
    /// records the vertex array wiring `attribs.position` to the 4-component
    /// position buffer and `attribs.texcoord` to the 2-component texcoord
    /// buffer, with the index buffer selected for indexed drawing.
    ///
    /// The geometry is validated first: nonempty arrays, one texture
    /// coordinate per vertex, and every index in range, otherwise
    /// [`RenderError::InvalidArgument`] is returned before any GL call.
    pub fn new(
        gl: &Arc<glow::Context>,
        attribs: AttribLocations,
        positions: &[Vec4],
        texcoords: &[Vec2],
        faces: &[[u32; 3]],
    ) -> Result<Self, RenderError> {
        check_mesh_input(positions, texcoords, faces)?;
        unsafe {
            let vao = gl.create_vertex_array().map_err(RenderError::Gpu)?;
            let position_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_vertex_array(vao);
                    return Err(RenderError::Gpu(e));
                }
            };
            let texcoord_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_buffer(position_buffer);
                    gl.delete_vertex_array(vao);
                    return Err(RenderError::Gpu(e));
                }
            };
            let index_buffer = match gl.create_buffer() {
                Ok(buffer) => buffer,
                Err(e) => {
                    gl.delete_buffer(texcoord_buffer);
                    gl.delete_buffer(position_buffer);
                    gl.delete_vertex_array(vao);
                    return Err(RenderError::Gpu(e));
                }
            };

            gl.bind_vertex_array(Some(vao));

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(position_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, raw_bytes(positions), glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(attribs.position, 4, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(attribs.position);

            gl.bind_buffer(glow::ARRAY_BUFFER, Some(texcoord_buffer));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, raw_bytes(texcoords), glow::STATIC_DRAW);
            gl.vertex_attrib_pointer_f32(attribs.texcoord, 2, glow::FLOAT, false, 0, 0);
            gl.enable_vertex_attrib_array(attribs.texcoord);

            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(index_buffer));
            gl.buffer_data_u8_slice(glow::ELEMENT_ARRAY_BUFFER, raw_bytes(faces), glow::STATIC_DRAW);

            // The VAO must be unbound before the element buffer, or the VAO
            // would record the unbind.
            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);
            gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                vao,
                position_buffer,
                texcoord_buffer,
                index_buffer,
                face_count: faces.len(),
            })
        }
    }

    /// Number of triangle faces in the index buffer.
    pub fn face_count(&self) -> usize {
        self.face_count
    }

    /// Issues an indexed draw over all `face_count * 3` indices.
    ///
    /// The shader program and texture must already be bound.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_elements(
                glow::TRIANGLES,
                (self.face_count * 3) as i32,
                glow::UNSIGNED_INT,
                0,
            );
            self.gl.bind_vertex_array(None);
        }
    }
}

impl Drop for GpuMesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.position_buffer);
            self.gl.delete_buffer(self.texcoord_buffer);
            self.gl.delete_buffer(self.index_buffer);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> (Vec<Vec4>, Vec<Vec2>, Vec<[u32; 3]>) {
        (
            vec![
                Vec4::new(0.0, 0.0, 0.0, 1.0),
                Vec4::new(1.0, 0.0, 0.0, 1.0),
                Vec4::new(0.0, 1.0, 0.0, 1.0),
            ],
            vec![Vec2::ZERO, Vec2::X, Vec2::Y],
            vec![[0, 1, 2]],
        )
    }

    #[test]
    fn valid_triangle_passes() {
        let (positions, texcoords, faces) = triangle();
        assert!(check_mesh_input(&positions, &texcoords, &faces).is_ok());
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let (positions, texcoords, _) = triangle();
        let err = check_mesh_input(&positions, &texcoords, &[[0, 1, 3]]).unwrap_err();
        assert!(matches!(err, RenderError::InvalidArgument(_)));
        assert!(err.to_string().contains("vertex 3"));
    }

    #[test]
    fn texcoord_count_mismatch_is_rejected() {
        let (positions, mut texcoords, faces) = triangle();
        texcoords.pop();
        assert!(matches!(
            check_mesh_input(&positions, &texcoords, &faces),
            Err(RenderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn empty_geometry_is_rejected() {
        let (positions, texcoords, faces) = triangle();
        assert!(check_mesh_input(&[], &[], &faces).is_err());
        assert!(check_mesh_input(&positions, &texcoords, &[]).is_err());
    }

    #[test]
    fn face_bytes_are_tightly_packed() {
        // Three u32 indices per face, nothing more. The GL upload size
        // depends on this.
        let faces = [[0u32, 1, 2], [0, 2, 3]];
        assert_eq!(raw_bytes(&faces).len(), 2 * 3 * std::mem::size_of::<u32>());
    }
}
