//! RTK agent core: unicycle kinematics, turret tracking, and a ray-marched
//! lidar over a rasterized occupancy map.

pub mod agent;
pub mod arena;
pub mod assets;
pub mod config;
pub mod error;
pub mod head;
pub mod kinematics;
pub mod lidar;
pub mod logging;
pub mod simulation;
pub mod surface;
pub mod types;
pub mod utils;

pub use agent::{Agent, AgentConfig, AgentStatus};
pub use arena::Arena;
pub use error::{Result, SimError};
pub use head::{HeadMotion, HeadTracker};
pub use kinematics::KinematicUpdater;
pub use lidar::{HitKind, LidarConfig, LidarScanner, Reading, ScanResult};
pub use surface::{MapImage, OccupancySurface};
pub use types::{Action, PixelPoint, Point, Pose};
