//! Unicycle integration of velocity commands into a pose.

use crate::error::{Result, SimError};
use crate::types::{Action, Pose};
use crate::utils::normalize_angle;

/// Integrates `(linear, angular)` commands with a fixed time step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicUpdater {
    dt: f64,
}

impl KinematicUpdater {
    pub fn new(dt: f64) -> Result<Self> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::InvalidConfiguration(format!(
                "time step must be positive and finite, got {}",
                dt
            )));
        }
        Ok(KinematicUpdater { dt })
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// Returns the pose after one step.
    ///
    /// Screen coordinates: +x right, +y down, so forward motion subtracts
    /// `sin(heading)` from y. The heading is wrapped into (-PI, PI].
    pub fn integrate(&self, pose: Pose, action: Action) -> Result<Pose> {
        if !action.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "action must be finite, got ({}, {})",
                action.linear, action.angular
            )));
        }

        let distance = action.linear * self.dt;
        Ok(Pose {
            x: pose.x + distance * pose.heading.cos(),
            y: pose.y - distance * pose.heading.sin(),
            heading: normalize_angle(pose.heading + action.angular * self.dt),
        })
    }
}

impl Default for KinematicUpdater {
    fn default() -> Self {
        KinematicUpdater {
            dt: crate::config::DT,
        }
    }
}
