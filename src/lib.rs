//! Turns vector paths into constant-width stroke meshes and draws them with OpenGL.

mod buffer;
mod color;
mod error;
mod flatten;
mod frame;
mod geom;
mod path;
mod renderer;
mod settings;
mod stroke;

pub mod renderers {
    mod gl;

    pub use self::gl::GlRenderer;
}

pub use crate::buffer::{BufferStorage, GrowableBuffer};
pub use crate::color::{background_at, Color, ColorSequence};
pub use crate::error::{GlError, ShaderStage};
pub use crate::flatten::{flatten, Flatten, FlattenedSubpath, COINCIDENT_DISTANCE, MAX_TOLERANCE};
pub use crate::frame::{Frame, FrameMesh};
pub use crate::geom::Vec2;
pub use crate::path::{Path, PathBuilder, PathCommand, Segment, Subpath};
pub use crate::renderer::{DrawCall, Renderer};
pub use crate::settings::StrokeSettings;
pub use crate::stroke::{stroke, EndCapStyle, JointStyle};
