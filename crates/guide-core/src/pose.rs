//! Planar poses.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in millimeters plus heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub theta: f64,
}

impl Pose {
    /// Creates a pose.
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }

    /// Goal pose offset from this one along its own heading.
    ///
    /// The position is `(x - offset·cos θ, y - offset·sin θ)`; the heading is
    /// taken from `heading`, normally the robot's current one.
    pub fn standoff(&self, offset_mm: f64, heading: f64) -> Pose {
        Pose {
            x: self.x - offset_mm * self.theta.cos(),
            y: self.y - offset_mm * self.theta.sin(),
            theta: heading,
        }
    }

    /// Straight-line distance to another pose.
    pub fn distance_to(&self, other: &Pose) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading that points from this pose toward `other`.
    pub fn bearing_to(&self, other: &Pose) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Pose after moving `forward_mm` along the heading and `left_mm` to its left.
    pub fn translated(&self, forward_mm: f64, left_mm: f64) -> Pose {
        let (sin, cos) = self.theta.sin_cos();
        Pose {
            x: self.x + forward_mm * cos - left_mm * sin,
            y: self.y + forward_mm * sin + left_mm * cos,
            theta: self.theta,
        }
    }

    /// Pose after turning counter-clockwise by `angle_deg`.
    pub fn rotated(&self, angle_deg: f64) -> Pose {
        Pose {
            theta: normalize_angle(self.theta + angle_deg.to_radians()),
            ..*self
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1}) @ {:.1} deg",
            self.x,
            self.y,
            self.theta.to_degrees()
        )
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn normalize_angle(theta: f64) -> f64 {
    let wrapped = (theta + PI).rem_euclid(2.0 * PI) - PI;
    if wrapped == -PI {
        PI
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_standoff_uses_marker_heading_and_robot_heading() {
        let marker = Pose::new(500.0, 200.0, 0.0);
        let goal = marker.standoff(-100.0, PI / 2.0);
        assert!((goal.x - 600.0).abs() < EPS);
        assert!((goal.y - 200.0).abs() < EPS);
        assert_eq!(goal.theta, PI / 2.0);
    }

    #[test]
    fn test_standoff_rotated_marker() {
        let marker = Pose::new(0.0, 0.0, PI / 2.0);
        let goal = marker.standoff(100.0, 0.25);
        assert!(goal.x.abs() < EPS);
        assert!((goal.y + 100.0).abs() < EPS);
        assert_eq!(goal.theta, 0.25);
    }

    #[test]
    fn test_translated_and_rotated() {
        let pose = Pose::new(0.0, 0.0, 0.0).rotated(90.0);
        assert!((pose.theta - PI / 2.0).abs() < EPS);

        let moved = pose.translated(100.0, 50.0);
        assert!((moved.x + 50.0).abs() < EPS);
        assert!((moved.y - 100.0).abs() < EPS);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(1.5 * PI) + PI / 2.0).abs() < EPS);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < EPS);
        assert!(normalize_angle(2.0 * PI).abs() < EPS);
    }

    #[test]
    fn test_distance_and_bearing() {
        let a = Pose::new(0.0, 0.0, 0.0);
        let b = Pose::new(300.0, 400.0, 0.0);
        assert!((a.distance_to(&b) - 500.0).abs() < EPS);
        assert!((a.bearing_to(&Pose::new(0.0, 10.0, 0.0)) - PI / 2.0).abs() < EPS);
    }
}
