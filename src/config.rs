//! Configuration constants for the RTK agent simulation.

use std::f64::consts::FRAC_PI_4;

// Kinematics
pub const DT: f64 = 0.1; // Fixed integration step (seconds per tick)
pub const LINEAR_SPEED: f64 = 10.0; // Default linear speed command (pixels/second)
pub const ANGULAR_SPEED: f64 = 0.1; // Default angular speed command (radians/second)

// Lidar configuration
pub const LIDAR_FOV_MIN: f64 = -FRAC_PI_4; // Leftmost ray offset relative to heading
pub const LIDAR_FOV_MAX: f64 = FRAC_PI_4; // Rightmost ray offset relative to heading
pub const LIDAR_RAYS: usize = 90; // Number of equally spaced rays (endpoints included)
pub const LIDAR_RANGE: u32 = 200; // Maximum range in map pixels

// Occupancy surface
pub const OBSTACLE_COLOR: [u8; 3] = [0, 0, 0]; // Pure black marks an obstacle pixel
pub const FREE_COLOR: [u8; 4] = [255, 255, 255, 255];
pub const MAP_WIDTH: u32 = 800; // Size of the generated fallback map
pub const MAP_HEIGHT: u32 = 600;
pub const DEFAULT_MAP_ASSET: &str = "maps/arena.png";

// Head / turret tracking
pub const HEAD_DEAD_ZONE: f64 = 0.17; // ~9.7 degrees of tolerated bearing error
pub const HEAD_STEP: f64 = 0.05; // Radians rotated per tracking tick

// Simulation driver
pub const MAX_TICKS: u32 = 1000; // Ticks before the headless run stops
pub const CAPTURE_RADIUS: f64 = 20.0; // Opponent closer than this destroys the agent
pub const FREE_CELL_ATTEMPTS: u32 = 1000; // Random draws before giving up on a start cell
