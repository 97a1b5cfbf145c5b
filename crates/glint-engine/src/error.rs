use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Shader stage a compile error originated from.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Error taxonomy for the graphics layer.
///
/// Two propagation paths exist:
/// - at init, every variant is fatal: it bubbles out of `Runtime::run`
/// - during shader hot reload, `Io`/`Compile`/`Link` are recoverable: the
///   caller logs them and the previously linked program stays active
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Shader rejected by the driver. Carries the driver info log and the
    /// offending source text so the full diagnostic can be surfaced.
    #[error("{stage} shader compilation failed:\n{log}\n--- source ---\n{source_text}")]
    Compile {
        stage: ShaderStage,
        log: String,
        source_text: String,
    },

    #[error("shader program link failed:\n{log}")]
    Link { log: String },

    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// GL object allocation failure (buffer, texture, program, ...).
    #[error("OpenGL resource allocation failed: {0}")]
    Resource(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── diagnostics ───────────────────────────────────────────────────────

    #[test]
    fn compile_error_surfaces_info_log_and_source() {
        let err = GraphicsError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3(1): error: syntax error, unexpected IDENTIFIER".to_string(),
            source_text: "void main() { bogus }".to_string(),
        };
        let rendered = err.to_string();
        assert!(rendered.contains("fragment shader compilation failed"));
        assert!(rendered.contains("unexpected IDENTIFIER"));
        assert!(rendered.contains("void main() { bogus }"));
    }

    #[test]
    fn link_error_surfaces_info_log() {
        let err = GraphicsError::Link {
            log: "error: vertex shader output not read by fragment shader".to_string(),
        };
        assert!(err.to_string().contains("output not read"));
    }

    #[test]
    fn io_error_names_the_path() {
        let err = GraphicsError::Io {
            path: PathBuf::from("shaders/default-vert.glsl"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        assert!(err.to_string().contains("shaders/default-vert.glsl"));
    }
}
