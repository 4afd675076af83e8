//! Textured triangle mesh rendering over OpenGL 3.3 core.
//!
//! The crate is a single façade: [`TextureRenderer`] compiles a fixed
//! vertex/fragment shader pair at construction, uploads geometry from a
//! [`TexturedMesh`] provider and raw RGB pixels into GPU memory, and issues
//! indexed draws that sample the texture per fragment. Mesh file parsing,
//! image decoding, windowing, and input all live outside this crate; the
//! demo binary (`quad_demo`) shows the intended wiring against SDL2.
//!
//! A valid OpenGL context must be current on the calling thread for every
//! operation, including drops. A renderer instance is single-threaded:
//! calls on it must be serialized by the caller. Every GL object the crate
//! creates is owned by exactly one wrapper and released exactly once when
//! that wrapper drops.

pub mod abs;
pub mod error;
pub mod mesh;
pub mod renderer;

pub use error::RenderError;
pub use mesh::{MeshData, TexturedMesh};
pub use renderer::TextureRenderer;
