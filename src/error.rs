use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GlError {
    #[error("could not compile {stage} shader: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("could not link shader program: {0}")]
    Link(String),

    #[error("shader program has no attribute named `{0}`")]
    MissingAttribute(&'static str),

    #[error("shader program has no uniform named `{0}`")]
    MissingUniform(&'static str),

    #[error("shader source contains a NUL byte")]
    InvalidSource(#[from] std::ffi::NulError),
}
