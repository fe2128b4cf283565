use serde::{Deserialize, Serialize};

/// A position in lab-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn offset(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// True iff `p` lies inside or on the circle of radius `r` around `center`.
///
/// Compares squared distances, so a zero radius only accepts the exact center.
pub fn within_circle(p: Point, center: Point, r: f64) -> bool {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    dx * dx + dy * dy <= r * r
}

/// Shannon formulation of the Fitts index of difficulty, `log2(D/W + 1)`.
///
/// `width` must be positive; callers only pass condition diameters, which
/// `ExperimentConfig::validate` guarantees are.
pub fn shannon_id(distance: f64, width: f64) -> f64 {
    (distance / width + 1.0).log2()
}

/// Sums Euclidean distances between consecutive pointer samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathAccumulator {
    last: Option<Point>,
    length: f64,
    samples: usize,
}

impl PathAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sample and returns the segment length it contributed.
    /// The first sample only establishes the baseline.
    pub fn push(&mut self, p: Point) -> f64 {
        let segment = self.last.map_or(0.0, |last| last.distance_to(p));
        self.length += segment;
        self.last = Some(p);
        self.samples += 1;
        segment
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn last(&self) -> Option<Point> {
        self.last
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn edge_of_circle_is_inside() {
        let c = Point::new(100.0, 50.0);
        assert!(within_circle(Point::new(120.0, 50.0), c, 20.0));
        assert!(!within_circle(Point::new(120.0 + 1e-6, 50.0), c, 20.0));
        assert!(!within_circle(Point::new(100.0, 70.5), c, 20.0));
    }

    #[test]
    fn zero_radius_accepts_only_center() {
        let c = Point::new(3.0, 4.0);
        assert!(within_circle(c, c, 0.0));
        assert!(!within_circle(Point::new(3.0, 4.000_001), c, 0.0));
    }

    #[test]
    fn shannon_id_matches_log2() {
        let id = shannon_id(200.0, 40.0);
        assert!((id - 6f64.log2()).abs() < 1e-12);
        assert!((id - 2.585).abs() < 1e-3);
        assert_eq!(shannon_id(0.0, 30.0), 0.0);
    }

    #[test]
    fn path_accumulates_consecutive_segments() {
        let mut path = PathAccumulator::new();
        assert_eq!(path.push(Point::new(0.0, 0.0)), 0.0);
        assert_eq!(path.length(), 0.0);
        path.push(Point::new(3.0, 4.0));
        path.push(Point::new(3.0, 4.0));
        path.push(Point::new(6.0, 8.0));
        assert!((path.length() - 10.0).abs() < 1e-12);
        assert_eq!(path.samples(), 4);
        assert_eq!(path.last(), Some(Point::new(6.0, 8.0)));

        path.reset();
        assert_eq!(path, PathAccumulator::default());
    }

    proptest! {
        #[test]
        fn center_is_always_inside(x in -1e4f64..1e4, y in -1e4f64..1e4, r in 0f64..500.0) {
            let c = Point::new(x, y);
            prop_assert!(within_circle(c, c, r));
        }

        #[test]
        fn path_length_never_decreases(samples in prop::collection::vec((-2e3f64..2e3, -2e3f64..2e3), 1..64)) {
            let mut path = PathAccumulator::new();
            let mut previous = 0.0;
            for s in samples {
                path.push(s.into());
                prop_assert!(path.length() >= previous);
                previous = path.length();
            }
        }
    }
}
