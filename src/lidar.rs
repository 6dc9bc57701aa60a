//! Ray-marched 2D range sensor.
//!
//! Each ray is sampled `range + 1` times between the agent and the ray
//! endpoint. The first sample that leaves the surface or lands on an obstacle
//! pixel ends the ray; a ray that stays clear reports its final sample.

use crate::config;
use crate::error::{Result, SimError};
use crate::surface::OccupancySurface;
use crate::types::{PixelPoint, Point, Pose};
use crate::utils::{lerp_point, linspace};

/// How a ray terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Obstacle,
    Boundary,
    MaxRange,
}

/// Single ray return
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub distance: f64,
    pub point: PixelPoint,
    pub kind: HitKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScanResult {
    pub origin: PixelPoint,
    pub readings: Vec<Reading>,
}

impl ScanResult {
    pub fn distances(&self) -> Vec<f64> {
        self.readings.iter().map(|r| r.distance).collect()
    }

    /// Origin followed by every ray's end point
    pub fn points(&self) -> Vec<PixelPoint> {
        std::iter::once(self.origin)
            .chain(self.readings.iter().map(|r| r.point))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Closest return, if any ray was cast
    pub fn nearest(&self) -> Option<&Reading> {
        self.readings
            .iter()
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LidarConfig {
    pub range: u32,      // Max range in pixels; also the number of march steps
    pub fov: (f64, f64), // Ray offsets relative to heading, radians
    pub rays: usize,
}

impl Default for LidarConfig {
    fn default() -> Self {
        LidarConfig {
            range: config::LIDAR_RANGE,
            fov: (config::LIDAR_FOV_MIN, config::LIDAR_FOV_MAX),
            rays: config::LIDAR_RAYS,
        }
    }
}

impl LidarConfig {
    pub fn with_range(range: u32) -> Self {
        LidarConfig {
            range,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.range == 0 {
            return Err(SimError::InvalidConfiguration(
                "lidar range must be greater than zero".to_string(),
            ));
        }
        if self.rays == 0 {
            return Err(SimError::InvalidConfiguration(
                "lidar needs at least one ray".to_string(),
            ));
        }
        let (start, end) = self.fov;
        if !start.is_finite() || !end.is_finite() || start > end {
            return Err(SimError::InvalidConfiguration(format!(
                "lidar field of view ({}, {}) is not a finite ascending interval",
                start, end
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LidarScanner {
    config: LidarConfig,
    offsets: Vec<f64>, // Precomputed ray angles relative to heading
}

impl LidarScanner {
    pub fn new(config: LidarConfig) -> Result<Self> {
        config.validate()?;
        let offsets = linspace(config.fov.0, config.fov.1, config.rays);
        Ok(LidarScanner { config, offsets })
    }

    pub fn config(&self) -> &LidarConfig {
        &self.config
    }

    pub fn offsets(&self) -> &[f64] {
        &self.offsets
    }

    /// Casts every ray from `pose` against `surface`
    pub fn scan<S: OccupancySurface + ?Sized>(
        &self,
        pose: &Pose,
        surface: &S,
    ) -> Result<ScanResult> {
        surface.validate()?;
        if !pose.is_finite() {
            return Err(SimError::InvalidInput(format!(
                "scan pose must be finite, got ({}, {}, {})",
                pose.x, pose.y, pose.heading
            )));
        }

        let origin = pose.position();
        let readings = self
            .offsets
            .iter()
            .map(|offset| self.cast_ray(origin, pose.heading + offset, surface))
            .collect();

        Ok(ScanResult {
            origin: PixelPoint::from_point(origin),
            readings,
        })
    }

    /// Marches one ray at absolute `angle`
    pub fn cast_ray<S: OccupancySurface + ?Sized>(
        &self,
        origin: Point,
        angle: f64,
        surface: &S,
    ) -> Reading {
        let range = self.config.range;
        let end = Point {
            x: origin.x + range as f64 * angle.cos(),
            y: origin.y - range as f64 * angle.sin(),
        };

        let mut last = PixelPoint::from_point(origin);
        for step in 0..=range {
            let alpha = step as f64 / range as f64;
            let sample = PixelPoint::from_point(lerp_point(origin, end, alpha));
            last = sample;

            if !surface.contains(sample.x, sample.y) {
                return Self::reading(origin, sample, HitKind::Boundary);
            }
            if surface.is_obstacle(sample.x as u32, sample.y as u32) {
                return Self::reading(origin, sample, HitKind::Obstacle);
            }
        }

        Self::reading(origin, last, HitKind::MaxRange)
    }

    fn reading(origin: Point, point: PixelPoint, kind: HitKind) -> Reading {
        Reading {
            distance: origin.distance(&point.to_point()),
            point,
            kind,
        }
    }
}

impl Default for LidarScanner {
    fn default() -> Self {
        let config = LidarConfig::default();
        let offsets = linspace(config.fov.0, config.fov.1, config.rays);
        LidarScanner { config, offsets }
    }
}
