//! Turret tracking: rotates a secondary heading toward a target bearing by a
//! fixed step per tick, holding still inside a dead-zone.

use crate::config;
use crate::error::{Result, SimError};
use crate::types::{Point, Pose};
use crate::utils::{angle_diff, bearing, normalize_angle};

/// Outcome of one tracking tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadMotion {
    Hold, // Inside the dead-zone
    CounterClockwise,
    Clockwise,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadTracker {
    pub heading: f64, // Absolute turret heading in radians, (-PI, PI]
    step: f64,
    dead_zone: f64,
}

impl HeadTracker {
    /// A step of `2 * dead_zone` or more can jump across the dead-zone every
    /// tick and never settle, so it is rejected.
    pub fn new(heading: f64, step: f64, dead_zone: f64) -> Result<Self> {
        if !heading.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "head heading must be finite, got {}",
                heading
            )));
        }
        if !dead_zone.is_finite() || dead_zone < 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "head dead-zone must be non-negative, got {}",
                dead_zone
            )));
        }
        if !step.is_finite() || step <= 0.0 || step >= 2.0 * dead_zone {
            return Err(SimError::InvalidConfiguration(format!(
                "head step must be in (0, {:.3}), got {}",
                2.0 * dead_zone,
                step
            )));
        }
        Ok(HeadTracker {
            heading: normalize_angle(heading),
            step,
            dead_zone,
        })
    }

    pub fn with_heading(heading: f64) -> Result<Self> {
        Self::new(heading, config::HEAD_STEP, config::HEAD_DEAD_ZONE)
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn dead_zone(&self) -> f64 {
        self.dead_zone
    }

    /// Signed error from the turret heading to the bearing of `target` seen from `pose`
    pub fn error_to(&self, pose: &Pose, target: Point) -> f64 {
        angle_diff(self.heading, bearing(pose.position(), target))
    }

    /// Advances the turret one step toward `target`
    pub fn track(&mut self, pose: &Pose, target: Point) -> Result<HeadMotion> {
        if !target.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "head target must be finite, got ({}, {})",
                target.x, target.y
            )));
        }

        let error = self.error_to(pose, target);
        if error.abs() <= self.dead_zone {
            return Ok(HeadMotion::Hold);
        }

        let motion = if error > 0.0 {
            self.heading += self.step;
            HeadMotion::CounterClockwise
        } else {
            self.heading -= self.step;
            HeadMotion::Clockwise
        };
        self.heading = normalize_angle(self.heading);
        Ok(motion)
    }
}

impl Default for HeadTracker {
    fn default() -> Self {
        HeadTracker {
            heading: 0.0,
            step: config::HEAD_STEP,
            dead_zone: config::HEAD_DEAD_ZONE,
        }
    }
}
