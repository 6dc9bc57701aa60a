use crate::config;
use crate::error::{Result, SimError};
use crate::head::{HeadMotion, HeadTracker};
use crate::kinematics::KinematicUpdater;
use crate::lidar::{LidarConfig, LidarScanner, ScanResult};
use crate::surface::OccupancySurface;
use crate::types::*;
use crate::utils::normalize_angle;
use rand::prelude::*;
use rand::rngs::StdRng;
use std::f64::consts::PI;

// Represents the possible states of an agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentStatus {
    Active,
    Destroyed, // Terminal; the renderer swaps in the wreck marker
}

// Construction parameters for an agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    pub dt: f64,
    pub linear_speed: f64,  // Nominal forward command, pixels/second
    pub angular_speed: f64, // Nominal turn command, radians/second
    pub lidar: LidarConfig,
    pub head_step: f64,
    pub head_dead_zone: f64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            dt: config::DT,
            linear_speed: config::LINEAR_SPEED,
            angular_speed: config::ANGULAR_SPEED,
            lidar: LidarConfig::default(),
            head_step: config::HEAD_STEP,
            head_dead_zone: config::HEAD_DEAD_ZONE,
        }
    }
}

// A simulated RTK unit: drive base, tracking head, and lidar
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: u32,
    pub pose: Pose,
    pub last_position: Point, // Position before the latest kinematic step
    pub linear_speed: f64,
    pub angular_speed: f64,
    pub head: HeadTracker,
    pub status: AgentStatus,
    pub tick: u32, // Kinematic steps taken since the last reset
    kinematics: KinematicUpdater,
    lidar: LidarScanner,
    last_scan: ScanResult,
    rng: StdRng,
}

impl Agent {
    /// Creates an agent at `position` with a random heading
    pub fn new(id: u32, position: Point, config: AgentConfig) -> Result<Self> {
        Self::with_rng(id, position, config, StdRng::from_entropy())
    }

    /// Like `new`, but every heading draw is reproducible from `seed`
    pub fn with_seed(id: u32, position: Point, config: AgentConfig, seed: u64) -> Result<Self> {
        Self::with_rng(id, position, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(id: u32, position: Point, config: AgentConfig, mut rng: StdRng) -> Result<Self> {
        if !position.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "start position must be finite, got ({}, {})",
                position.x, position.y
            )));
        }
        if !config.linear_speed.is_finite() || !config.angular_speed.is_finite() {
            return Err(SimError::InvalidConfiguration(format!(
                "agent speeds must be finite, got ({}, {})",
                config.linear_speed, config.angular_speed
            )));
        }
        let kinematics = KinematicUpdater::new(config.dt)?;
        let lidar = LidarScanner::new(config.lidar)?;

        let heading = random_heading(&mut rng);
        let head = HeadTracker::new(heading, config.head_step, config.head_dead_zone)?;

        crate::debug_agent!(
            id,
            0,
            "Created at ({:.1}, {:.1}) heading {:.3}",
            position.x,
            position.y,
            heading
        );

        Ok(Agent {
            id,
            pose: Pose::new(position.x, position.y, heading),
            last_position: position,
            linear_speed: config.linear_speed,
            angular_speed: config.angular_speed,
            head,
            status: AgentStatus::Active,
            tick: 0,
            kinematics,
            lidar,
            last_scan: ScanResult::default(),
            rng,
        })
    }

    pub fn position(&self) -> Point {
        self.pose.position()
    }

    pub fn heading(&self) -> f64 {
        self.pose.heading
    }

    pub fn lidar(&self) -> &LidarScanner {
        &self.lidar
    }

    pub fn last_scan(&self) -> &ScanResult {
        &self.last_scan
    }

    pub fn is_active(&self) -> bool {
        self.status == AgentStatus::Active
    }

    pub fn distance(&self, point: Point) -> f64 {
        self.position().distance(&point)
    }

    /// Nominal command scaled by `(throttle, steer)` in [-1, 1]
    pub fn scaled_action(&self, throttle: f64, steer: f64) -> Action {
        Action {
            linear: self.linear_speed * throttle.clamp(-1.0, 1.0),
            angular: self.angular_speed * steer.clamp(-1.0, 1.0),
        }
    }

    /// Applies one kinematic step, remembering the previous position
    pub fn update(&mut self, action: Action) -> Result<()> {
        self.ensure_active()?;
        let next = self.kinematics.integrate(self.pose, action)?;

        self.last_position = self.position();
        self.pose = next;
        self.tick += 1;

        crate::debug_drive!(
            self.id,
            self.tick,
            "Action ({:.2}, {:.2}) moved ({:.2},{:.2}) -> ({:.2},{:.2}), heading {:.3}",
            action.linear,
            action.angular,
            self.last_position.x,
            self.last_position.y,
            self.pose.x,
            self.pose.y,
            self.pose.heading
        );
        Ok(())
    }

    /// Returns to the position held before the latest `update`; heading is kept.
    pub fn rollback(&mut self) {
        crate::debug_drive!(
            self.id,
            self.tick,
            "Rolled back ({:.2},{:.2}) -> ({:.2},{:.2})",
            self.pose.x,
            self.pose.y,
            self.last_position.x,
            self.last_position.y
        );
        self.pose.x = self.last_position.x;
        self.pose.y = self.last_position.y;
    }

    /// Turns the head one step toward `target`
    pub fn update_head(&mut self, target: Point) -> Result<HeadMotion> {
        self.ensure_active()?;
        let before = self.head.heading;
        let motion = self.head.track(&self.pose, target)?;
        if motion != HeadMotion::Hold {
            crate::debug_turret!(
                self.id,
                self.tick,
                "{:?}: {:.3} -> {:.3} tracking ({:.1},{:.1})",
                motion,
                before,
                self.head.heading,
                target.x,
                target.y
            );
        }
        Ok(motion)
    }

    /// Scans `surface` from the current pose and stores the result
    pub fn scan<S: OccupancySurface + ?Sized>(&mut self, surface: &S) -> Result<&ScanResult> {
        self.last_scan = self.lidar.scan(&self.pose, surface)?;
        if let Some(nearest) = self.last_scan.nearest() {
            crate::debug_scan!(
                self.id,
                self.tick,
                "{} rays, nearest {:.1} at ({}, {}) [{:?}]",
                self.last_scan.len(),
                nearest.distance,
                nearest.point.x,
                nearest.point.y,
                nearest.kind
            );
        }
        Ok(&self.last_scan)
    }

    /// Teleports to `position` with a fresh random heading, shared by body and
    /// turret, and reactivates the agent
    pub fn reset(&mut self, position: Point) -> Result<()> {
        if !position.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "reset position must be finite, got ({}, {})",
                position.x, position.y
            )));
        }
        let heading = random_heading(&mut self.rng);
        self.pose = Pose::new(position.x, position.y, heading);
        self.head.heading = self.pose.heading;
        self.last_position = position;
        self.status = AgentStatus::Active;
        self.tick = 0;
        self.last_scan = ScanResult::default();

        crate::debug_agent!(
            self.id,
            self.tick,
            "Reset to ({:.1}, {:.1}) heading {:.3}",
            position.x,
            position.y,
            heading
        );
        Ok(())
    }

    /// Marks the agent destroyed. Returns false if it already was.
    pub fn destroy(&mut self) -> bool {
        if self.status == AgentStatus::Destroyed {
            return false;
        }
        self.status = AgentStatus::Destroyed;
        log::info!(
            "Robot {} destroyed at ({:.1}, {:.1})",
            self.id,
            self.pose.x,
            self.pose.y
        );
        true
    }

    fn ensure_active(&self) -> Result<()> {
        match self.status {
            AgentStatus::Active => Ok(()),
            AgentStatus::Destroyed => Err(SimError::AgentDestroyed(self.id)),
        }
    }
}

// Uniform in (-PI, PI]; gen_range's closed lower end maps onto PI.
fn random_heading<R: Rng>(rng: &mut R) -> f64 {
    normalize_angle(rng.gen_range(-PI..PI))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MapImage;
    use assert_approx_eq::assert_approx_eq;

    fn test_agent(position: Point) -> Agent {
        let config = AgentConfig {
            lidar: LidarConfig {
                range: 40,
                rays: 7,
                ..Default::default()
            },
            ..Default::default()
        };
        Agent::with_seed(1, position, config, 42).unwrap()
    }

    #[test]
    fn test_new_agent_has_random_heading_in_range() {
        for seed in 0..50 {
            let agent =
                Agent::with_seed(0, Point::new(10.0, 10.0), AgentConfig::default(), seed).unwrap();
            assert!(agent.heading() > -PI && agent.heading() <= PI);
            assert_eq!(agent.status, AgentStatus::Active);
        }
    }

    #[test]
    fn test_update_remembers_last_position() {
        let mut agent = test_agent(Point::new(100.0, 100.0));
        agent.pose.heading = 0.0;
        agent.update(Action::new(10.0, 0.0)).unwrap();

        assert_eq!(agent.last_position, Point::new(100.0, 100.0));
        assert_approx_eq!(agent.pose.x, 101.0);
        assert_approx_eq!(agent.pose.y, 100.0);
        assert_eq!(agent.tick, 1);

        agent.rollback();
        assert_eq!(agent.position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_scaled_action_clamps() {
        let agent = test_agent(Point::new(0.0, 0.0));
        let action = agent.scaled_action(2.0, -0.5);
        assert_approx_eq!(action.linear, config::LINEAR_SPEED);
        assert_approx_eq!(action.angular, -0.5 * config::ANGULAR_SPEED);
    }

    #[test]
    fn test_nan_action_is_rejected_and_pose_kept() {
        let mut agent = test_agent(Point::new(50.0, 50.0));
        let before = agent.pose;
        assert!(matches!(
            agent.update(Action::new(f64::NAN, 0.0)),
            Err(SimError::InvalidInput(_))
        ));
        assert_eq!(agent.pose, before);
        assert_eq!(agent.tick, 0);
    }

    #[test]
    fn test_reset_places_agent_exactly() {
        let mut agent = test_agent(Point::new(5.0, 5.0));
        agent.update(Action::new(10.0, 1.0)).unwrap();
        agent.destroy();

        for _ in 0..100 {
            agent.reset(Point::new(321.5, 12.25)).unwrap();
            assert_eq!(agent.pose.x, 321.5);
            assert_eq!(agent.pose.y, 12.25);
            assert!(agent.heading() > -PI && agent.heading() <= PI);
            assert_eq!(agent.status, AgentStatus::Active);
            assert_eq!(agent.tick, 0);
        }
        assert!(agent.reset(Point::new(f64::INFINITY, 0.0)).is_err());
    }

    #[test]
    fn test_reset_aligns_turret_with_body() {
        let mut agent = test_agent(Point::new(50.0, 50.0));
        agent.update_head(Point::new(50.0, 0.0)).unwrap();
        agent.update_head(Point::new(50.0, 0.0)).unwrap();

        for _ in 0..20 {
            agent.reset(Point::new(10.0, 10.0)).unwrap();
            assert_eq!(agent.head.heading, agent.heading());
        }
    }

    #[test]
    fn test_reset_is_reproducible_with_seed() {
        let mut a = test_agent(Point::new(5.0, 5.0));
        let mut b = test_agent(Point::new(5.0, 5.0));
        assert_eq!(a.heading(), b.heading());
        a.reset(Point::new(1.0, 1.0)).unwrap();
        b.reset(Point::new(1.0, 1.0)).unwrap();
        assert_eq!(a.heading(), b.heading());
    }

    #[test]
    fn test_destroyed_agent_refuses_motion() {
        let mut agent = test_agent(Point::new(5.0, 5.0));
        assert!(agent.destroy());
        assert!(!agent.destroy());
        assert_eq!(
            agent.update(Action::new(1.0, 0.0)),
            Err(SimError::AgentDestroyed(1))
        );
        assert_eq!(
            agent.update_head(Point::new(0.0, 0.0)),
            Err(SimError::AgentDestroyed(1))
        );
    }

    #[test]
    fn test_scan_is_stored() {
        let map = MapImage::blank(100, 100);
        let mut agent = test_agent(Point::new(50.0, 50.0));
        assert!(agent.last_scan().is_empty());

        let rays = agent.scan(&map).unwrap().len();
        assert_eq!(rays, 7);
        assert_eq!(agent.last_scan().points().len(), 8);
        assert_eq!(agent.last_scan().origin, PixelPoint::new(50, 50));
    }

    #[test]
    fn test_head_tracks_target() {
        let mut agent = test_agent(Point::new(50.0, 50.0));
        agent.head.heading = 0.0;
        let motion = agent.update_head(Point::new(50.0, 0.0)).unwrap();
        assert_eq!(motion, HeadMotion::CounterClockwise);
        assert_approx_eq!(agent.head.heading, config::HEAD_STEP);
    }

    #[test]
    fn test_distance() {
        let agent = test_agent(Point::new(0.0, 0.0));
        assert_approx_eq!(agent.distance(Point::new(6.0, 8.0)), 10.0);
    }
}
