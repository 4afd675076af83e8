//! Safe wrappers over the raw GL objects the renderer is built from:
//! shader compilation and linking, texture upload, and mesh buffers.
//! Every wrapper owns its GL handle and releases it exactly once on drop.

pub mod mesh;
pub mod shader;
pub mod texture;

pub use mesh::*;
pub use shader::*;
pub use texture::*;
