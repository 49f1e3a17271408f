use crate::geom::*;

use std::f32::consts::PI;

/// A single drawing command, as replayed from a `Path`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PathCommand {
    MoveTo(Vec2),
    LineTo(Vec2),
    QuadraticTo(Vec2, Vec2),
    Close,
}

/// A segment continuing from the end point of the previous one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Segment {
    Line(Vec2),
    Quadratic { control: Vec2, end: Vec2 },
}

impl Segment {
    pub fn end(&self) -> Vec2 {
        match *self {
            Segment::Line(end) => end,
            Segment::Quadratic { end, .. } => end,
        }
    }
}

/// A run of segments starting at a `MoveTo`, optionally closed.
#[derive(Clone, Debug, PartialEq)]
pub struct Subpath {
    start: Vec2,
    segments: Vec<Segment>,
    closed: bool,
}

impl Subpath {
    fn new(start: Vec2) -> Subpath {
        Subpath { start, segments: Vec::new(), closed: false }
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn end(&self) -> Vec2 {
        self.segments.last().map(Segment::end).unwrap_or(self.start)
    }

    pub fn commands(&self) -> impl Iterator<Item = PathCommand> + '_ {
        let start = std::iter::once(PathCommand::MoveTo(self.start));
        let segments = self.segments.iter().map(|segment| match *segment {
            Segment::Line(end) => PathCommand::LineTo(end),
            Segment::Quadratic { control, end } => PathCommand::QuadraticTo(control, end),
        });
        let close = if self.closed { Some(PathCommand::Close) } else { None };
        start.chain(segments).chain(close)
    }
}

/// An immutable vector path made of subpaths.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    subpaths: Vec<Subpath>,
}

impl Path {
    pub fn builder() -> PathBuilder {
        PathBuilder::new()
    }

    pub fn subpaths(&self) -> &[Subpath] {
        &self.subpaths
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn commands(&self) -> impl Iterator<Item = PathCommand> + '_ {
        self.subpaths.iter().flat_map(Subpath::commands)
    }
}

impl std::iter::FromIterator<PathCommand> for Path {
    fn from_iter<I: IntoIterator<Item = PathCommand>>(commands: I) -> Path {
        let mut builder = PathBuilder::new();
        for command in commands {
            builder.command(command);
        }
        builder.build()
    }
}

pub struct PathBuilder {
    subpaths: Vec<Subpath>,
    current: Option<Subpath>,
    last: Vec2,
}

impl PathBuilder {
    pub fn new() -> PathBuilder {
        PathBuilder {
            subpaths: Vec::new(),
            current: None,
            last: Vec2::new(0.0, 0.0),
        }
    }

    pub fn command(&mut self, command: PathCommand) -> &mut Self {
        match command {
            PathCommand::MoveTo(point) => self.move_to(point.x, point.y),
            PathCommand::LineTo(point) => self.line_to(point.x, point.y),
            PathCommand::QuadraticTo(control, end) => self.quadratic_to(control.x, control.y, end.x, end.y),
            PathCommand::Close => self.close(),
        }
    }

    pub fn move_to(&mut self, x: f32, y: f32) -> &mut Self {
        self.finish_subpath();
        self.last = Vec2::new(x, y);
        self.current = Some(Subpath::new(self.last));
        self
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> &mut Self {
        let point = Vec2::new(x, y);
        self.push(Segment::Line(point));
        self
    }

    pub fn quadratic_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) -> &mut Self {
        self.push(Segment::Quadratic {
            control: Vec2::new(x1, y1),
            end: Vec2::new(x2, y2),
        });
        self
    }

    pub fn close(&mut self) -> &mut Self {
        if let Some(mut subpath) = self.current.take() {
            if !subpath.segments.is_empty() {
                subpath.closed = true;
                self.last = subpath.start;
            }
            self.subpaths.push(subpath);
        }
        self
    }

    /// Adds a closed star whose outer tips start straight up from `center`.
    pub fn add_star(&mut self, center: Vec2, points: usize, inner_radius: f32, outer_radius: f32) -> &mut Self {
        if points == 0 {
            return self;
        }

        let step = 2.0 * PI / points as f32;
        let on_circle = |radius: f32, angle: f32| {
            center + radius * Vec2::new(angle.sin(), angle.cos())
        };

        for i in 0..points {
            let angle = i as f32 * step;
            let tip = on_circle(outer_radius, angle);
            if i == 0 {
                self.move_to(tip.x, tip.y);
            } else {
                self.line_to(tip.x, tip.y);
            }
            let notch = on_circle(inner_radius, angle + 0.5 * step);
            self.line_to(notch.x, notch.y);
        }

        self.close()
    }

    /// Adds a closed ellipse filling the box with corner (`x`, `y`).
    pub fn add_ellipse(&mut self, x: f32, y: f32, width: f32, height: f32) -> &mut Self {
        const NUM_SEGMENTS: usize = 8;

        let radius = Vec2::new(0.5 * width, 0.5 * height);
        let center = Vec2::new(x, y) + radius;
        let step = 2.0 * PI / NUM_SEGMENTS as f32;

        // each control point sits where the tangents at both ends of the arc meet
        let control_scale = 1.0 / (0.5 * step).cos();
        let on_ellipse = |angle: f32, scale: f32| {
            center + Vec2::new(scale * radius.x * angle.cos(), scale * radius.y * angle.sin())
        };

        let start = on_ellipse(0.0, 1.0);
        self.move_to(start.x, start.y);
        for i in 0..NUM_SEGMENTS {
            let angle = i as f32 * step;
            let control = on_ellipse(angle + 0.5 * step, control_scale);
            let end = if i + 1 == NUM_SEGMENTS { start } else { on_ellipse(angle + step, 1.0) };
            self.quadratic_to(control.x, control.y, end.x, end.y);
        }

        self.close()
    }

    pub fn build(&mut self) -> Path {
        self.finish_subpath();
        self.last = Vec2::new(0.0, 0.0);
        Path { subpaths: std::mem::replace(&mut self.subpaths, Vec::new()) }
    }

    fn push(&mut self, segment: Segment) {
        let last = self.last;
        let current = self.current.get_or_insert_with(|| Subpath::new(last));
        current.segments.push(segment);
        self.last = segment.end();
    }

    fn finish_subpath(&mut self) {
        if let Some(subpath) = self.current.take() {
            self.subpaths.push(subpath);
        }
    }
}

impl Default for PathBuilder {
    fn default() -> PathBuilder {
        PathBuilder::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn move_to_separates_adjacent_subpaths() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .move_to(1.0, 0.0)
            .line_to(1.0, 1.0)
            .build();

        assert_eq!(path.subpaths().len(), 2);
        assert_eq!(path.subpaths()[1].start(), Vec2::new(1.0, 0.0));
        assert!(!path.subpaths()[0].is_closed());
    }

    #[test]
    fn drawing_after_close_restarts_at_subpath_start() {
        let path = Path::builder()
            .move_to(2.0, 2.0)
            .line_to(3.0, 2.0)
            .line_to(3.0, 3.0)
            .close()
            .line_to(5.0, 5.0)
            .build();

        assert_eq!(path.subpaths().len(), 2);
        assert!(path.subpaths()[0].is_closed());
        assert_eq!(path.subpaths()[1].start(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn drawing_without_move_to_starts_at_origin() {
        let path = Path::builder().line_to(1.0, 1.0).build();
        assert_eq!(path.subpaths()[0].start(), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn closing_empty_subpath_does_not_mark_it_closed() {
        let path = Path::builder().move_to(1.0, 1.0).close().build();
        assert_eq!(path.subpaths().len(), 1);
        assert!(!path.subpaths()[0].is_closed());
    }

    #[test]
    fn commands_replay_into_equal_path() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .quadratic_to(1.0, 1.0, 2.0, 0.0)
            .close()
            .move_to(5.0, 5.0)
            .line_to(6.0, 5.0)
            .build();

        let commands: Vec<_> = path.commands().collect();
        assert_eq!(commands[0], PathCommand::MoveTo(Vec2::new(0.0, 0.0)));
        assert_eq!(commands[2], PathCommand::Close);

        let replayed: Path = commands.into_iter().collect();
        assert_eq!(replayed, path);
    }

    #[test]
    fn star_alternates_between_radii() {
        let center = Vec2::new(-0.5, 0.5);
        let path = Path::builder().add_star(center, 8, 0.2, 0.3).build();
        let subpath = &path.subpaths()[0];

        assert!(subpath.is_closed());
        assert_eq!(subpath.segments().len(), 15);
        assert_relative_eq!(subpath.start().distance(center), 0.3, epsilon = 1.0e-6);
        for (i, segment) in subpath.segments().iter().enumerate() {
            let expected = if i % 2 == 0 { 0.2 } else { 0.3 };
            assert_relative_eq!(segment.end().distance(center), expected, epsilon = 1.0e-6);
        }
    }

    #[test]
    fn ellipse_ends_where_it_starts() {
        let path = Path::builder().add_ellipse(0.3, -0.75, 0.4, 0.6).build();
        let subpath = &path.subpaths()[0];

        assert!(subpath.is_closed());
        assert_eq!(subpath.end(), subpath.start());
        assert_relative_eq!(subpath.start().x, 0.7, epsilon = 1.0e-6);
        assert_relative_eq!(subpath.start().y, -0.45, epsilon = 1.0e-6);
    }
}
