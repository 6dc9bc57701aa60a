use crate::types::Point;
use std::f64::consts::{PI, TAU};

/// Linear interpolation between two f64 values, exact at both ends
pub fn lerp_f64(start: f64, end: f64, alpha: f64) -> f64 {
    start * (1.0 - alpha) + end * alpha
}

/// Linear interpolation between two Point values
pub fn lerp_point(start: Point, end: Point, alpha: f64) -> Point {
    Point {
        x: lerp_f64(start.x, end.x, alpha),
        y: lerp_f64(start.y, end.y, alpha),
    }
}

/// Wraps an angle in radians into (-PI, PI].
/// Values already inside the range come back bit-identical.
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > -PI && angle <= PI {
        return angle;
    }
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Signed shortest rotation from `from` to `to`, in (-PI, PI]
pub fn angle_diff(from: f64, to: f64) -> f64 {
    normalize_angle(to - from)
}

/// Screen bearing from `from` to `to`; y is flipped so that counter-clockwise is positive
pub fn bearing(from: Point, to: Point) -> f64 {
    (-(to.y - from.y)).atan2(to.x - from.x)
}

/// `count` equally spaced values from `start` to `end`, both endpoints included.
/// A single value yields `start`.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count).map(|i| start + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_lerp_f64() {
        assert_approx_eq!(lerp_f64(0.0, 10.0, 0.5), 5.0);
        assert_approx_eq!(lerp_f64(0.0, 10.0, 0.0), 0.0);
        assert_approx_eq!(lerp_f64(0.0, 10.0, 1.0), 10.0);
        assert_approx_eq!(lerp_f64(5.0, 10.0, 0.5), 7.5);
    }

    #[test]
    fn test_lerp_point() {
        let start = Point { x: 0.0, y: 0.0 };
        let end = Point { x: 10.0, y: 20.0 };
        let result = lerp_point(start, end, 0.5);
        assert_approx_eq!(result.x, 5.0);
        assert_approx_eq!(result.y, 10.0);
    }

    #[test]
    fn test_normalize_angle() {
        assert_eq!(normalize_angle(0.3), 0.3);
        assert_eq!(normalize_angle(PI), PI);
        assert_approx_eq!(normalize_angle(-PI), PI);
        assert_approx_eq!(normalize_angle(3.0 * PI / 2.0), -PI / 2.0);
        assert_approx_eq!(normalize_angle(-3.0 * PI / 2.0), PI / 2.0);
        assert_approx_eq!(normalize_angle(TAU + 0.01), 0.01);
        assert_approx_eq!(normalize_angle(5.0 * TAU + 1.0), 1.0);
    }

    #[test]
    fn test_angle_diff_takes_shortest_path() {
        assert_approx_eq!(angle_diff(0.0, PI / 2.0), PI / 2.0);
        assert_approx_eq!(angle_diff(3.0, -3.0), TAU - 6.0);
        assert_approx_eq!(angle_diff(-3.0, 3.0), 6.0 - TAU);
    }

    #[test]
    fn test_bearing_flips_screen_y() {
        let origin = Point::new(10.0, 10.0);
        assert_approx_eq!(bearing(origin, Point::new(20.0, 10.0)), 0.0);
        // Smaller y is "up" on screen, which is +PI/2
        assert_approx_eq!(bearing(origin, Point::new(10.0, 0.0)), PI / 2.0);
        assert_approx_eq!(bearing(origin, Point::new(10.0, 20.0)), -PI / 2.0);
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(-1.0, 1.0, 1), vec![-1.0]);
        let values = linspace(-1.0, 1.0, 5);
        assert_eq!(values.len(), 5);
        assert_approx_eq!(values[0], -1.0);
        assert_approx_eq!(values[2], 0.0);
        assert_approx_eq!(values[4], 1.0);
    }
}
