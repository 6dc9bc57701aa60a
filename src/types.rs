use crate::utils::normalize_angle;

/// Continuous position in map pixel coordinates (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Integer pixel sampled by the lidar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelPoint {
    pub x: i64,
    pub y: i64,
}

impl PixelPoint {
    pub fn new(x: i64, y: i64) -> Self {
        PixelPoint { x, y }
    }

    /// Truncates toward zero, the same way the sensor rasterizes samples.
    pub fn from_point(point: Point) -> Self {
        PixelPoint {
            x: point.x.trunc() as i64,
            y: point.y.trunc() as i64,
        }
    }

    pub fn to_point(self) -> Point {
        Point {
            x: self.x as f64,
            y: self.y as f64,
        }
    }
}

// Agent pose: position plus heading in radians, normalized to (-PI, PI]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub heading: f64,
}

impl Pose {
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose {
            x,
            y,
            heading: normalize_angle(heading),
        }
    }

    pub fn position(&self) -> Point {
        Point {
            x: self.x,
            y: self.y,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_finite()
    }
}

/// Velocity command supplied by the driver each tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Action {
    pub linear: f64,  // Forward speed, pixels/second
    pub angular: f64, // Turn rate, radians/second (positive = counter-clockwise on screen)
}

impl Action {
    pub fn new(linear: f64, angular: f64) -> Self {
        Action { linear, angular }
    }

    pub fn is_finite(&self) -> bool {
        self.linear.is_finite() && self.angular.is_finite()
    }
}

impl From<(f64, f64)> for Action {
    fn from((linear, angular): (f64, f64)) -> Self {
        Action { linear, angular }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_approx_eq!(a.distance(&b), 5.0);
        assert_approx_eq!(b.distance(&a), 5.0);
    }

    #[test]
    fn test_pixel_point_truncates_toward_zero() {
        assert_eq!(
            PixelPoint::from_point(Point::new(2.9, -0.7)),
            PixelPoint::new(2, 0)
        );
        assert_eq!(
            PixelPoint::from_point(Point::new(-1.5, 7.0)),
            PixelPoint::new(-1, 7)
        );
    }

    #[test]
    fn test_pose_new_normalizes_heading() {
        let pose = Pose::new(1.0, 2.0, 3.0 * PI / 2.0);
        assert_approx_eq!(pose.heading, -PI / 2.0);
        assert_eq!(pose.position(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_action_finiteness() {
        assert!(Action::new(1.0, -0.5).is_finite());
        assert!(!Action::new(f64::NAN, 0.0).is_finite());
        assert!(!Action::from((0.0, f64::INFINITY)).is_finite());
    }
}
