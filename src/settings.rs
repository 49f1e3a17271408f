use crate::flatten::MAX_TOLERANCE;
use crate::stroke::*;

///
/// How a path is turned into stroke geometry
///
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StrokeSettings {
    /// Maximum distance between a curve and its flattened polyline
    pub tolerance: f32,
    pub thickness: f32,
    pub joint: JointStyle,

    /// End treatment for subpaths that are not closed
    pub open_cap: EndCapStyle,

    /// End treatment for closed subpaths
    pub closed_cap: EndCapStyle,
}

impl StrokeSettings {
    ///
    /// Settings suited to paths expressed in normalized device coordinates
    ///
    pub fn new() -> StrokeSettings {
        StrokeSettings {
            tolerance: 0.001,
            thickness: 0.03,
            joint: JointStyle::Round,
            open_cap: EndCapStyle::Round,
            closed_cap: EndCapStyle::Joined,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> StrokeSettings {
        self.tolerance = tolerance;
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> StrokeSettings {
        self.thickness = thickness;
        self
    }

    pub fn with_joint(mut self, joint: JointStyle) -> StrokeSettings {
        self.joint = joint;
        self
    }

    pub fn with_caps(mut self, open_cap: EndCapStyle, closed_cap: EndCapStyle) -> StrokeSettings {
        self.open_cap = open_cap;
        self.closed_cap = closed_cap;
        self
    }

    pub fn end_cap(&self, closed: bool) -> EndCapStyle {
        if closed { self.closed_cap } else { self.open_cap }
    }

    ///
    /// Panics if the tolerance or thickness could not describe real geometry
    ///
    pub fn validate(&self) {
        assert!(self.tolerance > 0.0 && self.tolerance <= MAX_TOLERANCE, "tolerance must be in (0, {}], got {}", MAX_TOLERANCE, self.tolerance);
        assert!(self.thickness.is_finite() && self.thickness > 0.0, "thickness must be positive and finite, got {}", self.thickness);
    }
}

impl Default for StrokeSettings {
    fn default() -> StrokeSettings {
        StrokeSettings::new()
    }
}
