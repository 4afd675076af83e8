//! Error types for the renderer.
//!
//! Every fallible operation in this crate returns [`RenderError`]. Shader
//! failures carry the driver's diagnostic text verbatim, since the shader
//! sources are fixed and a failure points at the environment, not the caller.

use crate::abs::ShaderStage;

/// Errors surfaced by the renderer and the GL abstraction layer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A shader stage failed to compile. Carries the GL info log.
    #[error("{stage} shader compilation failed: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    /// The vertex and fragment stages failed to link into a program.
    #[error("shader program link failed: {0}")]
    ShaderLink(String),

    /// Malformed mesh or pixel input, rejected before it reaches the driver.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A draw was attempted before the required resources were loaded.
    #[error("renderer not ready: {0}")]
    NotReady(&'static str),

    /// The driver refused to allocate a GL object.
    #[error("GPU object allocation failed: {0}")]
    Gpu(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_error_carries_stage_and_log() {
        let err = RenderError::ShaderCompile {
            stage: ShaderStage::Fragment,
            log: "0:3: 'usampler' : undeclared identifier".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("fragment"));
        assert!(text.contains("undeclared identifier"));
    }

    #[test]
    fn not_ready_names_the_missing_resource() {
        let err = RenderError::NotReady("no mesh loaded");
        assert_eq!(err.to_string(), "renderer not ready: no mesh loaded");
    }

    #[test]
    fn link_error_carries_log() {
        let err = RenderError::ShaderLink("error: varying vtexcoord not written".to_string());
        assert!(err.to_string().contains("vtexcoord"));
    }
}
