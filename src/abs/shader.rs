//! OpenGL shader stages and programs.
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for
//! compiling and linking GLSL sources, and the [`Uniform`] trait for uploading
//! typed values to resolved uniform locations. Locations are looked up once
//! and handed around explicitly rather than re-resolved on every upload.

use std::fmt;
use std::sync::Arc;

use glam::{Mat4, Vec2, Vec3, Vec4};
use glow::HasContext;

use crate::error::RenderError;

/// The pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_type(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// A compiled shader stage, deleted when dropped.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
    stage: ShaderStage,
}

impl Shader {
    /// Compiles a shader of the given stage from GLSL source.
    ///
    /// On compile failure the shader object is deleted and the driver's
    /// info log is returned in [`RenderError::ShaderCompile`].
    pub fn new(
        gl: &Arc<glow::Context>,
        stage: ShaderStage,
        source: &str,
    ) -> Result<Self, RenderError> {
        unsafe {
            let shader = gl.create_shader(stage.gl_type()).map_err(RenderError::Gpu)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(RenderError::ShaderCompile { stage, log });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
                stage,
            })
        }
    }

    /// The stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// A linked shader program, deleted when dropped.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
}

impl ShaderProgram {
    /// Links the given stages into a program.
    ///
    /// The stage objects stay owned by the caller and are detached after a
    /// successful link, so dropping them afterwards frees them for real. On
    /// link failure the program object is deleted and the driver's info log
    /// is returned in [`RenderError::ShaderLink`].
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, RenderError> {
        unsafe {
            let program = gl.create_program().map_err(RenderError::Gpu)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(RenderError::ShaderLink(log));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
            })
        }
    }

    /// Binds the program for subsequent uniform uploads and draws.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Resolves a uniform location by name.
    ///
    /// Returns `None` for names the linker optimized out or never saw, which
    /// uploads then silently skip, matching GL's location `-1` behavior.
    pub fn uniform_location(&self, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(self.id, name) }
    }

    /// Resolves a vertex attribute slot by name.
    pub fn attrib_location(&self, name: &str) -> Option<u32> {
        unsafe { self.gl.get_attrib_location(self.id, name) }
    }

    /// Uploads a value to a previously resolved location.
    ///
    /// The program must currently be bound.
    pub fn set_uniform_at<T: Uniform>(&self, location: Option<&glow::UniformLocation>, value: T) {
        if let Some(location) = location {
            value.apply(&self.gl, location);
        }
    }

    /// Resolves `name` and uploads a value to it, skipping unknown names.
    ///
    /// The program must currently be bound. Prefer [`Self::set_uniform_at`]
    /// with a cached location on per-frame paths.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        self.set_uniform_at(self.uniform_location(name).as_ref(), value);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

/// A value that can be uploaded to a shader uniform slot.
pub trait Uniform {
    /// Uploads the value to `location` of the currently bound program.
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for i32 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for f32 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for Vec2 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_2_f32(Some(location), self.x, self.y);
        }
    }
}

impl Uniform for Vec3 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_3_f32(Some(location), self.x, self.y, self.z);
        }
    }
}

impl Uniform for Vec4 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_4_f32(Some(location), self.x, self.y, self.z, self.w);
        }
    }
}

impl Uniform for Mat4 {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        // glam matrices are stored column-major, which is what GL expects.
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn apply(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).apply(gl, location);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_display_matches_gl_terms() {
        assert_eq!(ShaderStage::Vertex.to_string(), "vertex");
        assert_eq!(ShaderStage::Fragment.to_string(), "fragment");
    }

    #[test]
    fn stage_maps_to_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_type(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_type(), glow::FRAGMENT_SHADER);
    }
}
