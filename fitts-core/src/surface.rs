use crate::geometry::Point;

/// Home shrinks to this fraction of its diameter while pressed, and the
/// shrunken circle is what a release is classified against.
pub const HOME_PRESSED_SCALE: f64 = 0.9;

/// Where the target ended up on whatever surface draws it.
///
/// Hit testing asks the surface rather than trusting the placement point, since
/// layout can shift the drawn circle.
pub trait TargetSurface {
    fn rendered_target_center(&self, placed: Point, diameter: f64) -> Point;
}

/// A surface that draws exactly where it is told.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactSurface;

impl TargetSurface for ExactSurface {
    fn rendered_target_center(&self, placed: Point, _diameter: f64) -> Point {
        placed
    }
}
