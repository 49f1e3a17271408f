use crate::color::Color;

/// Draws `count` vertices starting at `first` in a single color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub first: usize,
    pub count: usize,
    pub color: Color,
}

pub trait Renderer {
    fn clear(&mut self, color: Color);

    /// Replaces the vertex data with `vertices`: tightly packed native-endian `f32` pairs.
    fn upload(&mut self, vertices: &[u8]);

    fn draw(&mut self, draws: &[DrawCall]);
}
