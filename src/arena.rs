use crate::assets;
use crate::config::*;
use crate::error::{Result, SimError};
use crate::surface::{MapImage, OccupancySurface};
use crate::types::*;
use rand::Rng;
use std::path::Path;

// The environment the agents live in: an occupancy map and its bounds
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: u32,  // Map width in pixels
    pub height: u32, // Map height in pixels
    map: MapImage,
}

impl Arena {
    /// Rejects maps without at least one interior pixel to spawn on
    pub fn new(map: MapImage) -> Result<Self> {
        map.validate()?;
        if map.width() < 2 || map.height() < 2 {
            return Err(SimError::InvalidSurface {
                width: map.width(),
                height: map.height(),
            });
        }
        Ok(Arena {
            width: map.width(),
            height: map.height(),
            map,
        })
    }

    /// Arena from the embedded default map, or a walled empty room if the
    /// asset is missing.
    pub fn from_default_map() -> Result<Self> {
        match assets::default_map_bytes() {
            Some(bytes) => Self::new(MapImage::from_bytes(&bytes)?),
            None => {
                log::warn!("Embedded map '{}' not found, using empty room", DEFAULT_MAP_ASSET);
                Self::walled_room(MAP_WIDTH as u16, MAP_HEIGHT as u16)
            }
        }
    }

    /// Arena from an embedded map such as `maps/arena.png`
    pub fn from_asset(name: &str) -> Result<Self> {
        match assets::get_asset_bytes(name) {
            Some(bytes) => Self::new(MapImage::from_bytes(&bytes)?),
            None => Err(SimError::MapLoad(format!(
                "no embedded map '{}' (available: {})",
                name,
                assets::map_names().join(", ")
            ))),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::new(MapImage::load(path)?)
    }

    /// Empty map with a one-pixel obstacle border
    pub fn walled_room(width: u16, height: u16) -> Result<Self> {
        let mut map = MapImage::blank(width, height);
        let (w, h) = (width as u32, height as u32);
        map.add_wall(0, 0, w, 1);
        map.add_wall(0, h.saturating_sub(1), w, 1);
        map.add_wall(0, 0, 1, h);
        map.add_wall(w.saturating_sub(1), 0, 1, h);
        Self::new(map)
    }

    pub fn map(&self) -> &MapImage {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapImage {
        &mut self.map
    }

    pub fn center(&self) -> Point {
        Point {
            x: self.width as f64 / 2.0,
            y: self.height as f64 / 2.0,
        }
    }

    // True when a body at `point` would be off the map or on an obstacle pixel
    pub fn is_blocked(&self, point: Point) -> bool {
        let cell = PixelPoint::from_point(point);
        if point.x < 0.0 || point.y < 0.0 || !self.map.contains(cell.x, cell.y) {
            return true;
        }
        self.map.is_obstacle(cell.x as u32, cell.y as u32)
    }

    /// Picks a random unblocked position at least `clearance` pixels from
    /// every obstacle, checked on a small ring around it.
    pub fn random_free_position<R: Rng>(&self, rng: &mut R, clearance: f64) -> Result<Point> {
        if self.width < 2 || self.height < 2 {
            return Err(SimError::InvalidSurface {
                width: self.width,
                height: self.height,
            });
        }
        for _ in 0..FREE_CELL_ATTEMPTS {
            let candidate = Point {
                x: rng.gen_range(1.0..self.width as f64),
                y: rng.gen_range(1.0..self.height as f64),
            };
            if self.is_clear_around(candidate, clearance) {
                return Ok(candidate);
            }
        }
        Err(SimError::InvalidConfiguration(format!(
            "no free position with clearance {:.1} found after {} attempts",
            clearance, FREE_CELL_ATTEMPTS
        )))
    }

    fn is_clear_around(&self, center: Point, clearance: f64) -> bool {
        if self.is_blocked(center) {
            return false;
        }
        if clearance <= 0.0 {
            return true;
        }
        (0..16).all(|i| {
            let angle = i as f64 * std::f64::consts::TAU / 16.0;
            let edge = Point {
                x: center.x + clearance * angle.cos(),
                y: center.y + clearance * angle.sin(),
            };
            !self.is_blocked(edge)
        })
    }
}

impl OccupancySurface for Arena {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn color_at(&self, x: u32, y: u32) -> [u8; 4] {
        self.map.color_at(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_walled_room_has_border() {
        let arena = Arena::walled_room(50, 40).unwrap();
        assert_eq!(arena.width, 50);
        assert_eq!(arena.height, 40);
        assert!(arena.map().is_obstacle(0, 10));
        assert!(arena.map().is_obstacle(49, 10));
        assert!(arena.map().is_obstacle(10, 39));
        assert!(!arena.map().is_obstacle(25, 20));
    }

    #[test]
    fn test_is_blocked() {
        let mut arena = Arena::walled_room(100, 100).unwrap();
        arena.map_mut().add_wall(40, 40, 10, 10);
        assert!(!arena.is_blocked(Point::new(20.0, 20.0)));
        assert!(arena.is_blocked(Point::new(45.5, 45.5)));
        assert!(arena.is_blocked(Point::new(-0.5, 20.0)));
        assert!(arena.is_blocked(Point::new(20.0, 150.0)));
    }

    #[test]
    fn test_random_free_position_avoids_obstacles() {
        let mut arena = Arena::walled_room(100, 100).unwrap();
        arena.map_mut().add_wall(0, 0, 100, 50);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let p = arena.random_free_position(&mut rng, 3.0).unwrap();
            assert!(!arena.is_blocked(p));
            assert!(p.y >= 52.9, "too close to the wall: {:?}", p);
        }
    }

    #[test]
    fn test_random_free_position_fails_when_full() {
        let mut arena = Arena::walled_room(20, 20).unwrap();
        arena.map_mut().add_wall(0, 0, 20, 20);
        let mut rng = StdRng::seed_from_u64(1);
        assert!(arena.random_free_position(&mut rng, 0.0).is_err());
    }

    #[test]
    fn test_zero_sized_map_rejected() {
        assert!(matches!(
            Arena::new(MapImage::blank(0, 5)),
            Err(SimError::InvalidSurface { .. })
        ));
    }

    #[test]
    fn test_degenerate_map_has_no_spawn_area() {
        for (w, h) in [(1, 5), (5, 1), (1, 1)] {
            assert_eq!(
                Arena::new(MapImage::blank(w, h)).unwrap_err(),
                SimError::InvalidSurface {
                    width: w as u32,
                    height: h as u32
                }
            );
        }
        assert!(Arena::walled_room(0, 0).is_err());
        assert!(Arena::walled_room(1, 8).is_err());

        // Shrinking the public bounds afterwards must not reach the sampler
        let mut arena = Arena::walled_room(10, 10).unwrap();
        arena.width = 1;
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            arena.random_free_position(&mut rng, 0.0),
            Err(SimError::InvalidSurface { .. })
        ));
    }

    #[test]
    fn test_smallest_map_still_spawns() {
        let arena = Arena::new(MapImage::blank(2, 2)).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let p = arena.random_free_position(&mut rng, 0.0).unwrap();
        assert_eq!(PixelPoint::from_point(p), PixelPoint::new(1, 1));
    }

    #[test]
    fn test_embedded_map_by_name() {
        let arena = Arena::from_asset(DEFAULT_MAP_ASSET).unwrap();
        assert_eq!(arena.width, MAP_WIDTH);

        match Arena::from_asset("maps/missing.png") {
            Err(SimError::MapLoad(msg)) => assert!(msg.contains(DEFAULT_MAP_ASSET), "{}", msg),
            other => panic!("expected MapLoad, got {:?}", other),
        }
    }

    #[test]
    fn test_default_map_loads() {
        let arena = Arena::from_default_map().unwrap();
        assert_eq!(arena.width, MAP_WIDTH);
        assert_eq!(arena.height, MAP_HEIGHT);
        assert!(arena.map().obstacle_count() > 0);
        assert!(!arena.is_blocked(arena.center()));
    }
}
