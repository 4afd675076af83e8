//! The textured-mesh renderer façade.
//!
//! [`TextureRenderer`] owns one shader program, one mesh's GPU buffers, and
//! one 2D texture, and draws the mesh with the texture sampled per fragment.
//! Mesh and texture are loaded independently in any order; drawing requires
//! both.

use std::sync::Arc;

use glam::{Mat4, Vec4};
use glow::HasContext;

use crate::abs::{AttribLocations, GpuMesh, Shader, ShaderProgram, ShaderStage, Texture};
use crate::error::RenderError;
use crate::mesh::TexturedMesh;

const VERTEX_SHADER: &str = include_str!("shaders/texture/vertex_shader.glsl");
const FRAGMENT_SHADER: &str = include_str!("shaders/texture/fragment_shader.glsl");

fn require_attrib(program: &ShaderProgram, name: &str) -> Result<u32, RenderError> {
    program
        .attrib_location(name)
        .ok_or_else(|| RenderError::Gpu(format!("attribute '{name}' missing from linked program")))
}

/// Renders a textured triangle mesh through a fixed vertex/fragment pair.
///
/// The vertex stage transforms each position by a 4×4 matrix uniform; the
/// fragment stage samples the bound texture at the interpolated texture
/// coordinate. All GL objects the renderer creates are exclusively owned by
/// it and released when it drops. The GL context passed to [`Self::new`]
/// must be current on the calling thread for every call, including the drop.
pub struct TextureRenderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    transform_loc: Option<glow::UniformLocation>,
    sampler_loc: Option<glow::UniformLocation>,
    attribs: AttribLocations,
    mesh: Option<GpuMesh>,
    texture: Option<Texture>,
}

impl TextureRenderer {
    /// Compiles and links the fixed shader pair and caches the uniform and
    /// attribute locations the draw path needs.
    ///
    /// Fails with [`RenderError::ShaderCompile`] or
    /// [`RenderError::ShaderLink`] carrying the driver diagnostics; the
    /// sources are compiled in, so a failure indicates a broken environment
    /// rather than bad input, and nothing is retried. No partially
    /// constructed renderer escapes: stage and program objects created
    /// before the failure are released on the way out.
    pub fn new(gl: &Arc<glow::Context>) -> Result<Self, RenderError> {
        let vertex = Shader::new(gl, ShaderStage::Vertex, VERTEX_SHADER)?;
        let fragment = Shader::new(gl, ShaderStage::Fragment, FRAGMENT_SHADER)?;
        let program = ShaderProgram::new(gl, &[&vertex, &fragment])?;

        let transform_loc = program.uniform_location("u_transform");
        let sampler_loc = program.uniform_location("u_tex");
        let attribs = AttribLocations {
            position: require_attrib(&program, "position")?,
            texcoord: require_attrib(&program, "texcoord")?,
        };

        log::debug!("texture pipeline compiled and linked");

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            transform_loc,
            sampler_loc,
            attribs,
            mesh: None,
            texture: None,
        })
    }

    /// Sets the clear color and clears the color buffer of the active
    /// framebuffer.
    pub fn clear_frame(&self, color: Vec4) {
        unsafe {
            self.gl.clear_color(color.x, color.y, color.z, color.w);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    /// Uploads a tightly packed RGB pixel buffer as the active texture.
    ///
    /// Replaces any previously loaded texture; the old GL object is released
    /// by the swap. See [`Texture::from_rgb`] for the validation rules.
    pub fn load_texture(&mut self, width: u32, height: u32, rgb: &[u8]) -> Result<(), RenderError> {
        self.texture = Some(Texture::from_rgb(&self.gl, width, height, rgb)?);
        Ok(())
    }

    /// Releases the active texture and clears the 2D texture binding.
    ///
    /// Afterwards [`Self::display_faces`] fails with
    /// [`RenderError::NotReady`] until a texture is loaded again. No-op if
    /// no texture is loaded.
    pub fn unload_texture(&mut self) {
        if self.texture.take().is_some() {
            unsafe {
                self.gl.bind_texture(glow::TEXTURE_2D, None);
            }
        }
    }

    /// Uploads a 4×4 transform to the vertex stage, column-major.
    ///
    /// The value lives in the GPU uniform register only; call again whenever
    /// the transform changes.
    pub fn set_transform(&self, transform: Mat4) {
        self.program.use_program();
        self.program
            .set_uniform_at(self.transform_loc.as_ref(), transform);
    }

    /// Reads the provider's geometry and uploads it as the active mesh.
    ///
    /// Replaces any previously loaded mesh; the old buffers and vertex array
    /// are released by the swap. The provider's arrays are only read during
    /// this call. Geometry is validated before upload, see [`GpuMesh::new`].
    pub fn load_mesh(&mut self, mesh: &impl TexturedMesh) -> Result<(), RenderError> {
        let uploaded = GpuMesh::new(
            &self.gl,
            self.attribs,
            mesh.vertices(),
            mesh.texcoords(),
            mesh.faces(),
        )?;
        log::debug!(
            "loaded mesh: {} vertices, {} faces",
            mesh.vertex_count(),
            uploaded.face_count()
        );
        self.mesh = Some(uploaded);
        Ok(())
    }

    /// Releases the active mesh and clears the vertex-array binding.
    ///
    /// Afterwards [`Self::display_faces`] fails with
    /// [`RenderError::NotReady`] until a mesh is loaded again. No-op if no
    /// mesh is loaded.
    pub fn unload_mesh(&mut self) {
        if self.mesh.take().is_some() {
            unsafe {
                self.gl.bind_vertex_array(None);
            }
        }
    }

    /// Draws the active mesh with the active texture.
    ///
    /// Binds the program, the texture on unit 0, and the mesh's vertex
    /// array, then issues one indexed draw over `face_count() * 3` indices.
    /// Fails with [`RenderError::NotReady`] naming the missing resource if
    /// no mesh or no texture is loaded.
    pub fn display_faces(&self) -> Result<(), RenderError> {
        let mesh = self
            .mesh
            .as_ref()
            .ok_or(RenderError::NotReady("no mesh loaded"))?;
        let texture = self
            .texture
            .as_ref()
            .ok_or(RenderError::NotReady("no texture loaded"))?;

        self.program.use_program();
        self.program.set_uniform_at(self.sampler_loc.as_ref(), 0i32);
        texture.bind(0);
        mesh.draw();
        Ok(())
    }

    /// Face count recorded at the most recent [`Self::load_mesh`], 0 if no
    /// mesh is loaded.
    pub fn face_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, GpuMesh::face_count)
    }

    /// Whether both a mesh and a texture are loaded, i.e. whether
    /// [`Self::display_faces`] would draw.
    pub fn is_ready(&self) -> bool {
        self.mesh.is_some() && self.texture.is_some()
    }
}

impl Drop for TextureRenderer {
    fn drop(&mut self) {
        // Member drops delete the program, buffers, and texture; clear the
        // context bindings that could still name them.
        unsafe {
            self.gl.use_program(None);
            self.gl.bind_vertex_array(None);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shader_sources_target_gl33_core() {
        assert!(VERTEX_SHADER.starts_with("#version 330 core"));
        assert!(FRAGMENT_SHADER.starts_with("#version 330 core"));
    }

    #[test]
    fn vertex_stage_declares_the_attribute_contract() {
        assert!(VERTEX_SHADER.contains("in vec4 position"));
        assert!(VERTEX_SHADER.contains("in vec2 texcoord"));
        assert!(VERTEX_SHADER.contains("uniform mat4 u_transform"));
    }

    #[test]
    fn fragment_stage_samples_the_bound_texture() {
        assert!(FRAGMENT_SHADER.contains("uniform sampler2D u_tex"));
        assert!(FRAGMENT_SHADER.contains("texture(u_tex, v_texcoord)"));
    }

    #[test]
    fn stages_agree_on_the_varying() {
        assert!(VERTEX_SHADER.contains("out vec2 v_texcoord"));
        assert!(FRAGMENT_SHADER.contains("in vec2 v_texcoord"));
    }
}
