use crate::flatten::COINCIDENT_DISTANCE;
use crate::geom::*;

use std::f32::consts::PI;

/// Corners sharper than this are beveled even when a miter is requested.
const MITER_MIN_ANGLE: f32 = 20.0 * PI / 180.0;

/// Angle covered by each triangle of a round joint or cap.
const ROUND_STEP: f32 = PI / 18.0;

/// Turns smaller than this are treated as straight continuations.
const STRAIGHT_ANGLE: f32 = 1.0e-4;

/// How far outside `[0, 1]` an edge parameter may fall and still count as a hit.
const INTERSECTION_SLACK: f32 = 1.0e-6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JointStyle {
    Miter,
    Bevel,
    Round,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EndCapStyle {
    Butt,
    /// Extends each end by half the thickness.
    Square,
    Round,
    /// Connects the last point back to the first, forming a loop.
    Joined,
}

#[derive(Copy, Clone, Debug)]
struct Edge {
    a: Vec2,
    b: Vec2,
}

impl Edge {
    fn direction(&self) -> Vec2 {
        (self.b - self.a).normalized()
    }

    fn offset(&self, by: Vec2) -> Edge {
        Edge { a: self.a + by, b: self.b + by }
    }
}

/// One polyline segment together with its offset edges on either side.
#[derive(Copy, Clone, Debug)]
struct Band {
    center: Edge,
    left: Edge,
    right: Edge,
}

impl Band {
    fn new(a: Vec2, b: Vec2, half_thickness: f32) -> Band {
        let center = Edge { a, b };
        let normal = half_thickness * center.direction().perp();
        Band {
            center,
            left: center.offset(normal),
            right: center.offset(-normal),
        }
    }
}

/// Where the band before a joint ends and the band after it starts.
struct Joint {
    prev_left: Vec2,
    prev_right: Vec2,
    next_left: Vec2,
    next_right: Vec2,
}

///
/// Tessellates a stroke of constant `thickness` along `points` and appends it to `output` as a
/// triangle list.
///
/// `EndCapStyle::Joined` treats the points as a closed loop. Returns the number of vertices
/// appended, which is always a multiple of three and zero when there are fewer than two
/// distinct points.
///
pub fn stroke(points: &[Vec2], thickness: f32, joint: JointStyle, end_cap: EndCapStyle, output: &mut Vec<Vec2>) -> usize {
    assert!(thickness.is_finite() && thickness > 0.0, "stroke thickness must be positive and finite, got {}", thickness);

    let initial_len = output.len();

    let mut points = distinct_points(points);
    let mut closed = end_cap == EndCapStyle::Joined;
    if closed && points.len() > 2 && points[0].distance(points[points.len() - 1]) <= COINCIDENT_DISTANCE {
        points.pop();
    }
    if points.len() < 2 {
        return 0;
    }

    // a two point loop doubles back on itself, which reads as an open stroke
    let mut end_cap = end_cap;
    if closed && points.len() < 3 {
        closed = false;
        end_cap = if joint == JointStyle::Round { EndCapStyle::Round } else { EndCapStyle::Butt };
    }

    let half_thickness = 0.5 * thickness;
    let mut bands: Vec<Band> = points.windows(2)
        .map(|pair| Band::new(pair[0], pair[1], half_thickness))
        .collect();
    if closed {
        bands.push(Band::new(points[points.len() - 1], points[0], half_thickness));
    }

    if !closed {
        add_caps(&mut bands, end_cap, half_thickness, output);
    }

    let last = bands.len() - 1;
    let (mut start_left, mut start_right) = (bands[0].left.a, bands[0].right.a);
    let mut loop_end = None;
    if closed {
        let closing = join(&bands[last], &bands[0], joint, output);
        start_left = closing.next_left;
        start_right = closing.next_right;
        loop_end = Some((closing.prev_left, closing.prev_right));
    }

    for i in 0..bands.len() {
        let band = &bands[i];
        let (end_left, end_right, next) = if i < last {
            let corner = join(band, &bands[i + 1], joint, output);
            (corner.prev_left, corner.prev_right, Some((corner.next_left, corner.next_right)))
        } else if let Some((left, right)) = loop_end {
            (left, right, None)
        } else {
            (band.left.b, band.right.b, None)
        };

        output.extend_from_slice(&[
            start_left, end_left, end_right,
            start_left, end_right, start_right,
        ]);

        if let Some((left, right)) = next {
            start_left = left;
            start_right = right;
        }
    }

    output.len() - initial_len
}

fn distinct_points(points: &[Vec2]) -> Vec<Vec2> {
    let mut distinct: Vec<Vec2> = Vec::with_capacity(points.len());
    for &point in points {
        match distinct.last() {
            Some(last) if last.distance(point) <= COINCIDENT_DISTANCE => {}
            _ => distinct.push(point),
        }
    }
    distinct
}

fn add_caps(bands: &mut [Band], end_cap: EndCapStyle, half_thickness: f32, output: &mut Vec<Vec2>) {
    let last = bands.len() - 1;
    match end_cap {
        EndCapStyle::Square => {
            let back = -half_thickness * bands[0].center.direction();
            bands[0].left.a += back;
            bands[0].right.a += back;

            let forward = half_thickness * bands[last].center.direction();
            bands[last].left.b += forward;
            bands[last].right.b += forward;
        }
        EndCapStyle::Round => {
            let first = &bands[0];
            fan(output, first.center.a, first.center.a, first.left.a - first.center.a, PI);

            let end = &bands[last];
            fan(output, end.center.b, end.center.b, end.right.b - end.center.b, PI);
        }
        EndCapStyle::Butt | EndCapStyle::Joined => {}
    }
}

fn join(prev: &Band, next: &Band, style: JointStyle, output: &mut Vec<Vec2>) -> Joint {
    let d0 = prev.center.direction();
    let d1 = next.center.direction();
    let turn = d0.cross(d1).atan2(d0.dot(d1));

    if turn.abs() < STRAIGHT_ANGLE {
        return Joint {
            prev_left: prev.left.b,
            prev_right: prev.right.b,
            next_left: next.left.a,
            next_right: next.right.a,
        };
    }

    // turning left puts the outside of the corner on the right
    let turns_left = turn > 0.0;
    let (outer0, outer1, inner0, inner1) = if turns_left {
        (prev.right, next.right, prev.left, next.left)
    } else {
        (prev.left, next.left, prev.right, next.right)
    };
    let pivot = prev.center.b;

    let (inner_end, inner_start, anchor) = match segment_intersection(&inner0, &inner1) {
        Some(point) => (point, point, point),
        None => (inner0.b, inner1.a, pivot),
    };

    let style = if style == JointStyle::Miter && PI - turn.abs() < MITER_MIN_ANGLE {
        JointStyle::Bevel
    } else {
        style
    };

    let (outer_end, outer_start) = match style {
        JointStyle::Miter => {
            let miter = line_intersection(&outer0, &outer1).unwrap_or(outer0.b);
            (miter, miter)
        }
        JointStyle::Bevel => {
            output.extend_from_slice(&[outer0.b, outer1.a, anchor]);
            (outer0.b, outer1.a)
        }
        JointStyle::Round => {
            fan(output, anchor, pivot, outer0.b - pivot, turn);
            (outer0.b, outer1.a)
        }
    };

    if turns_left {
        Joint { prev_left: inner_end, prev_right: outer_end, next_left: inner_start, next_right: outer_start }
    } else {
        Joint { prev_left: outer_end, prev_right: inner_end, next_left: outer_start, next_right: inner_start }
    }
}

///
/// Appends triangles approximating the arc that starts at `center + from` and sweeps `sweep`
/// radians, each connected to `anchor`.
///
fn fan(output: &mut Vec<Vec2>, anchor: Vec2, center: Vec2, from: Vec2, sweep: f32) {
    let steps = ((sweep.abs() / ROUND_STEP).ceil() as usize).max(1);
    let step = sweep / steps as f32;

    let mut previous = center + from;
    for i in 1..=steps {
        let point = center + from.rotate(step * i as f32);
        output.extend_from_slice(&[anchor, previous, point]);
        previous = point;
    }
}

fn intersection_params(e0: &Edge, e1: &Edge) -> Option<(f32, f32)> {
    let r = e0.b - e0.a;
    let s = e1.b - e1.a;
    let denominator = r.cross(s);
    if denominator.abs() <= std::f32::EPSILON * r.length() * s.length() {
        return None;
    }

    let offset = e1.a - e0.a;
    Some((offset.cross(s) / denominator, offset.cross(r) / denominator))
}

fn segment_intersection(e0: &Edge, e1: &Edge) -> Option<Vec2> {
    let (t, u) = intersection_params(e0, e1)?;
    let within = |x: f32| x >= -INTERSECTION_SLACK && x <= 1.0 + INTERSECTION_SLACK;
    if within(t) && within(u) {
        Some(e0.a + t * (e0.b - e0.a))
    } else {
        None
    }
}

fn line_intersection(e0: &Edge, e1: &Edge) -> Option<Vec2> {
    let (t, _) = intersection_params(e0, e1)?;
    Some(e0.a + t * (e0.b - e0.a))
}
