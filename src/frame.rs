use crate::color::*;
use crate::flatten::*;
use crate::geom::*;
use crate::path::*;
use crate::renderer::*;
use crate::settings::*;
use crate::stroke::*;

use std::ops::Range;

///
/// Stroke triangles for a whole path, with the vertices of each subpath kept contiguous
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMesh {
    vertices: Vec<Vec2>,
    subpath_vertex_counts: Vec<usize>,
}

impl FrameMesh {
    ///
    /// Flattens `path` and strokes every resulting subpath as soon as it is produced
    ///
    pub fn build(path: &Path, settings: &StrokeSettings) -> FrameMesh {
        settings.validate();

        let mut mesh = FrameMesh::default();
        for subpath in flatten(path, settings.tolerance) {
            let end_cap = settings.end_cap(subpath.closed);
            let count = stroke(&subpath.points, settings.thickness, settings.joint, end_cap, &mut mesh.vertices);
            if count > 0 {
                mesh.subpath_vertex_counts.push(count);
            }
        }
        mesh
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn subpath_vertex_counts(&self) -> &[usize] {
        &self.subpath_vertex_counts
    }

    pub fn subpath_count(&self) -> usize {
        self.subpath_vertex_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex range occupied by each subpath, in order.
    pub fn ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.subpath_vertex_counts.iter().scan(0, |first, &count| {
            let range = *first..*first + count;
            *first += count;
            Some(range)
        })
    }

    /// The vertices as tightly packed native-endian `f32` pairs.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.vertices.as_slice())
    }
}

///
/// Renders a path once per call, handing each subpath the same color every frame
///
pub struct Frame<'r> {
    renderer: &'r mut dyn Renderer,
}

impl<'r> Frame<'r> {
    pub fn new(renderer: &'r mut dyn Renderer) -> Frame<'r> {
        Frame { renderer }
    }

    pub fn clear(&mut self, color: Color) {
        self.renderer.clear(color);
    }

    pub fn draw_path(&mut self, path: &Path, settings: &StrokeSettings, colors: &mut ColorSequence) -> FrameMesh {
        let mesh = FrameMesh::build(path, settings);
        self.draw_mesh(&mesh, colors);
        mesh
    }

    pub fn draw_mesh(&mut self, mesh: &FrameMesh, colors: &mut ColorSequence) {
        colors.reset();

        let draws: Vec<DrawCall> = mesh.ranges()
            .zip(colors)
            .map(|(range, color)| DrawCall { first: range.start, count: range.len(), color })
            .collect();

        self.renderer.upload(mesh.as_bytes());
        self.renderer.draw(&draws);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_contiguous() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .move_to(0.0, 1.0)
            .line_to(1.0, 1.0)
            .line_to(1.0, 2.0)
            .build();

        let mesh = FrameMesh::build(&path, &StrokeSettings::default().with_thickness(0.1));
        let ranges: Vec<_> = mesh.ranges().collect();

        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0].start, 0);
        assert_eq!(ranges[0].end, ranges[1].start);
        assert_eq!(ranges[1].end, mesh.vertices().len());
        assert_eq!(mesh.subpath_vertex_counts().iter().sum::<usize>(), mesh.vertices().len());
    }

    #[test]
    fn bytes_are_packed_float_pairs() {
        let path = Path::builder().move_to(0.0, 0.0).line_to(1.0, 0.0).build();
        let settings = StrokeSettings::default()
            .with_caps(EndCapStyle::Butt, EndCapStyle::Joined)
            .with_thickness(1.0);
        let mesh = FrameMesh::build(&path, &settings);

        let bytes = mesh.as_bytes();
        assert_eq!(bytes.len(), mesh.vertices().len() * 8);

        let first = mesh.vertices()[0];
        let mut expected = Vec::new();
        expected.extend_from_slice(&first.x.to_ne_bytes());
        expected.extend_from_slice(&first.y.to_ne_bytes());
        assert_eq!(&bytes[..8], &expected[..]);
    }

    #[test]
    fn empty_path_builds_empty_mesh() {
        let mesh = FrameMesh::build(&Path::default(), &StrokeSettings::default());
        assert!(mesh.is_empty());
        assert_eq!(mesh.subpath_count(), 0);
    }
}
