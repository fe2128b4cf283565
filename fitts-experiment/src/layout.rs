use fitts_core::{Condition, HOME_PRESSED_SCALE, Point, within_circle};

/// Geometry of the lab area: the home circle sits at the center and targets
/// are placed horizontally around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabLayout {
    pub width: f64,
    pub height: f64,
    pub home_diameter: f64,
}

impl LabLayout {
    pub fn new(width: f64, height: f64, home_diameter: f64) -> Self {
        Self {
            width,
            height,
            home_diameter,
        }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn home_radius(&self) -> f64 {
        self.home_diameter / 2.0
    }

    pub fn contains_home(&self, p: Point) -> bool {
        within_circle(p, self.center(), self.home_radius())
    }

    /// Hit area of home while it is held down and drawn shrunken.
    pub fn contains_pressed_home(&self, p: Point) -> bool {
        within_circle(p, self.center(), self.home_radius() * HOME_PRESSED_SCALE)
    }

    /// Nominal target center for `condition`: the lab center shifted by the
    /// signed condition distance along x.
    pub fn target_center(&self, condition: &Condition) -> Point {
        self.center().offset(condition.offset_x(), 0.0)
    }
}
