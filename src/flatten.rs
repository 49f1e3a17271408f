use crate::geom::*;
use crate::path::*;

/// Points closer together than this are merged into one.
pub const COINCIDENT_DISTANCE: f32 = 1.0e-6;

/// Largest flattening tolerance accepted.
pub const MAX_TOLERANCE: f32 = 1.0e6;

/// Most chords a single quadratic may be split into.
const MAX_QUADRATIC_CHORDS: usize = 1 << 16;

/// A polyline approximating one subpath.
#[derive(Clone, Debug, PartialEq)]
pub struct FlattenedSubpath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

///
/// Flattens every subpath of `path` into polylines that stay within `tolerance` of the curve.
///
/// Subpaths with fewer than two distinct points are skipped. Panics if `tolerance` is not in
/// `(0, MAX_TOLERANCE]`, or if it is so fine that some quadratic would need an unreasonable
/// number of chords.
///
pub fn flatten(path: &Path, tolerance: f32) -> Flatten<'_> {
    assert!(tolerance > 0.0 && tolerance <= MAX_TOLERANCE, "flattening tolerance must be in (0, {}], got {}", MAX_TOLERANCE, tolerance);

    for subpath in path.subpaths() {
        let mut last = subpath.start();
        for segment in subpath.segments() {
            if let Segment::Quadratic { control, end } = *segment {
                let count = quadratic_chord_count(last, control, end, tolerance);
                assert!(count <= MAX_QUADRATIC_CHORDS, "flattening tolerance {} needs {} chords for one curve", tolerance, count);
            }
            last = segment.end();
        }
    }

    Flatten {
        subpaths: path.subpaths().iter(),
        tolerance,
    }
}

pub struct Flatten<'a> {
    subpaths: std::slice::Iter<'a, Subpath>,
    tolerance: f32,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = FlattenedSubpath;

    fn next(&mut self) -> Option<FlattenedSubpath> {
        for subpath in &mut self.subpaths {
            if let Some(flattened) = flatten_subpath(subpath, self.tolerance) {
                return Some(flattened);
            }
            log::trace!("skipping degenerate subpath starting at {:?}", subpath.start());
        }
        None
    }
}

fn flatten_subpath(subpath: &Subpath, tolerance: f32) -> Option<FlattenedSubpath> {
    let mut points = vec![subpath.start()];
    let mut last = subpath.start();

    for segment in subpath.segments() {
        match *segment {
            Segment::Line(end) => push_distinct(&mut points, end),
            Segment::Quadratic { control, end } => {
                let count = quadratic_chord_count(last, control, end, tolerance);
                for i in 1..=count {
                    let t = i as f32 / count as f32;
                    push_distinct(&mut points, quadratic_point(last, control, end, t));
                }
                // land exactly on the end point regardless of rounding in the last step
                if let Some(point) = points.last_mut() {
                    if point.distance(end) <= COINCIDENT_DISTANCE {
                        *point = end;
                    }
                }
            }
        }
        last = segment.end();
    }

    if subpath.is_closed() && points.len() > 1 {
        if let Some(&end) = points.last() {
            if end.distance(points[0]) <= COINCIDENT_DISTANCE {
                points.pop();
            }
        }
    }

    if points.len() < 2 {
        return None;
    }

    Some(FlattenedSubpath { points, closed: subpath.is_closed() })
}

fn push_distinct(points: &mut Vec<Vec2>, point: Vec2) {
    match points.last() {
        Some(last) if last.distance(point) <= COINCIDENT_DISTANCE => {}
        _ => points.push(point),
    }
}

///
/// Number of equal parameter steps needed so that no chord strays further than `tolerance`
/// from the quadratic.
///
/// A quadratic has the constant second derivative `2 (p1 - 2 c + p2)`, so the chord over a
/// parameter interval `h` deviates by at most `|p1 - 2 c + p2| h² / 4`.
///
fn quadratic_chord_count(p1: Vec2, control: Vec2, p2: Vec2, tolerance: f32) -> usize {
    let deviation = (p1 - 2.0 * control + p2).length();
    ((deviation / (4.0 * tolerance)).sqrt().ceil() as usize).max(1)
}

fn quadratic_point(p1: Vec2, control: Vec2, p2: Vec2, t: f32) -> Vec2 {
    let a = Vec2::lerp(t, p1, control);
    let b = Vec2::lerp(t, control, p2);
    Vec2::lerp(t, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance_to_quadratic(point: Vec2, p1: Vec2, control: Vec2, p2: Vec2) -> f32 {
        const SAMPLES: usize = 16384;
        (0..=SAMPLES)
            .map(|i| point.distance(quadratic_point(p1, control, p2, i as f32 / SAMPLES as f32)))
            .fold(std::f32::INFINITY, f32::min)
    }

    #[test]
    fn lines_pass_through_unchanged() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .line_to(1.0, 1.0)
            .build();

        let flattened: Vec<_> = flatten(&path, 0.01).collect();
        assert_eq!(flattened.len(), 1);
        assert_eq!(flattened[0].points, vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)]);
        assert!(!flattened[0].closed);
    }

    #[test]
    fn quadratic_stays_within_tolerance() {
        let p1 = Vec2::new(0.5, 0.5);
        let control = Vec2::new(0.25, 0.0);
        let p2 = Vec2::new(0.0, 0.0);

        for &tolerance in &[0.05, 0.01, 0.001] {
            let path = Path::builder()
                .move_to(p1.x, p1.y)
                .quadratic_to(control.x, control.y, p2.x, p2.y)
                .build();
            let points = flatten(&path, tolerance).next().unwrap().points;

            assert_eq!(points[0], p1);
            assert_eq!(*points.last().unwrap(), p2);

            // every chord spans the same parameter step, so compare it with the arc it replaces
            let step = 1.0 / (points.len() - 1) as f32;
            for (i, pair) in points.windows(2).enumerate() {
                assert!(distance_to_quadratic(pair[0], p1, control, p2) <= 1.0e-4);
                for j in 1..8 {
                    let s = j as f32 / 8.0;
                    let on_chord = Vec2::lerp(s, pair[0], pair[1]);
                    let on_curve = quadratic_point(p1, control, p2, (i as f32 + s) * step);
                    assert!(on_chord.distance(on_curve) <= tolerance + 1.0e-6);
                    assert!(distance_to_quadratic(on_chord, p1, control, p2) <= tolerance + 1.0e-4);
                }
            }
        }
    }

    #[test]
    fn finer_tolerance_produces_more_points() {
        let path = Path::builder().move_to(0.0, 0.0).quadratic_to(1.0, 2.0, 2.0, 0.0).build();
        let coarse = flatten(&path, 0.1).next().unwrap().points.len();
        let fine = flatten(&path, 0.001).next().unwrap().points.len();
        assert!(fine > coarse);
    }

    #[test]
    fn close_drops_repeated_start_point() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .line_to(1.0, 1.0)
            .line_to(0.0, 0.0)
            .close()
            .build();

        let flattened = flatten(&path, 0.01).next().unwrap();
        assert!(flattened.closed);
        assert_eq!(flattened.points.len(), 3);
    }

    #[test]
    fn degenerate_subpaths_are_dropped_without_merging_neighbours() {
        let path = Path::builder()
            .move_to(0.0, 0.0)
            .line_to(1.0, 0.0)
            .move_to(5.0, 5.0)
            .line_to(5.0, 5.0)
            .move_to(7.0, 7.0)
            .move_to(2.0, 0.0)
            .line_to(3.0, 0.0)
            .build();

        let flattened: Vec<_> = flatten(&path, 0.01).collect();
        assert_eq!(flattened.len(), 2);
        assert_eq!(flattened[0].points, vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0)]);
        assert_eq!(flattened[1].points, vec![Vec2::new(2.0, 0.0), Vec2::new(3.0, 0.0)]);
    }

    #[test]
    #[should_panic]
    fn rejects_non_positive_tolerance() {
        let path = Path::builder().move_to(0.0, 0.0).line_to(1.0, 0.0).build();
        let _ = flatten(&path, 0.0);
    }

    #[test]
    #[should_panic]
    fn rejects_nan_tolerance() {
        let path = Path::builder().move_to(0.0, 0.0).line_to(1.0, 0.0).build();
        let _ = flatten(&path, std::f32::NAN);
    }

    #[test]
    #[should_panic]
    fn rejects_huge_tolerance() {
        let path = Path::builder().move_to(0.0, 0.0).quadratic_to(1.0, 2.0, 2.0, 0.0).build();
        let _ = flatten(&path, 1.0e30);
    }

    #[test]
    #[should_panic]
    fn rejects_tolerance_too_fine_for_a_curve() {
        let path = Path::builder().move_to(0.0, 0.0).quadratic_to(1.0, 2.0, 2.0, 0.0).build();
        let _ = flatten(&path, 1.0e-20);
    }

    #[test]
    fn fine_tolerance_on_lines_is_accepted() {
        let path = Path::builder().move_to(0.0, 0.0).line_to(2.0, 0.0).build();
        let flattened: Vec<_> = flatten(&path, 1.0e-20).collect();
        assert_eq!(flattened[0].points.len(), 2);
    }

    #[test]
    fn chord_count_is_bounded_for_default_tolerance() {
        let count = quadratic_chord_count(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), Vec2::new(-1.0, 1.0), 0.001);
        assert!(count > 1 && count <= MAX_QUADRATIC_CHORDS);
    }
}
