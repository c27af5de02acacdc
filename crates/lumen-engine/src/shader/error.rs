use std::fmt;
use std::path::PathBuf;

use super::uniforms::UniformKind;

/// Pipeline stage a shader source belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read {stage} shader {}: {source}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{stage} shader failed to compile:\n{message}")]
    Compile { stage: Stage, message: String },

    #[error("shader program failed validation:\n{0}")]
    Link(String),

    #[error("no uniform named `{0}`")]
    UnknownUniform(String),

    #[error("uniform `{name}` is {expected}, not {got}")]
    KindMismatch {
        name: String,
        expected: UniformKind,
        got: UniformKind,
    },

    #[error("uniform `{0}` declared twice")]
    DuplicateUniform(String),
}
