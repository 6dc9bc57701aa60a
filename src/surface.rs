//! Occupancy surfaces the lidar samples. A surface is a read-only RGBA raster
//! where pixels of `config::OBSTACLE_COLOR` are impassable.

use crate::config;
use crate::error::{Result, SimError};
use macroquad::texture::Image;
use std::fmt;
use std::path::Path;

/// Read-only pixel access used by the lidar and the arena
pub trait OccupancySurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// RGBA color at an in-bounds pixel
    fn color_at(&self, x: u32, y: u32) -> [u8; 4];

    /// Alpha is ignored; only the color channels mark an obstacle.
    fn is_obstacle(&self, x: u32, y: u32) -> bool {
        let [r, g, b, _] = self.color_at(x, y);
        [r, g, b] == config::OBSTACLE_COLOR
    }

    /// Strict interior test: row 0 and column 0 count as the border.
    fn contains(&self, x: i64, y: i64) -> bool {
        0 < x && x < self.width() as i64 && 0 < y && y < self.height() as i64
    }

    fn validate(&self) -> Result<()> {
        if self.width() == 0 || self.height() == 0 {
            return Err(SimError::InvalidSurface {
                width: self.width(),
                height: self.height(),
            });
        }
        Ok(())
    }
}

/// Map raster backed by a macroquad `Image` (RGBA8, row-major)
#[derive(Clone)]
pub struct MapImage {
    image: Image,
}

impl fmt::Debug for MapImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapImage")
            .field("width", &self.image.width)
            .field("height", &self.image.height)
            .finish()
    }
}

impl MapImage {
    /// All-free map of the given size
    pub fn blank(width: u16, height: u16) -> Self {
        let pixels = width as usize * height as usize;
        MapImage {
            image: Image {
                bytes: config::FREE_COLOR.repeat(pixels),
                width,
                height,
            },
        }
    }

    pub fn from_image(image: Image) -> Result<Self> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.bytes.len() != expected {
            return Err(SimError::MapLoad(format!(
                "image buffer holds {} bytes, expected {} for {}x{} RGBA",
                image.bytes.len(),
                expected,
                image.width,
                image.height
            )));
        }
        Ok(MapImage { image })
    }

    /// Decodes an encoded image (PNG, BMP, ...) into a map
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let image = Image::from_file_with_format(bytes, None)
            .map_err(|e| SimError::MapLoad(format!("{:?}", e)))?;
        Self::from_image(image)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)
            .map_err(|e| SimError::MapLoad(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded map file {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.image.width as usize + x as usize) * 4
    }

    /// Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        let offset = self.offset(x, y);
        self.image.bytes[offset..offset + 4].copy_from_slice(&color);
    }

    /// Paints an axis-aligned rectangle, clipped to the map
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 4]) {
        let x_end = x.saturating_add(width).min(self.width());
        let y_end = y.saturating_add(height).min(self.height());
        for py in y..y_end {
            for px in x..x_end {
                self.set_pixel(px, py, color);
            }
        }
    }

    /// Marks a rectangle as obstacle
    pub fn add_wall(&mut self, x: u32, y: u32, width: u32, height: u32) {
        let [r, g, b] = config::OBSTACLE_COLOR;
        self.fill_rect(x, y, width, height, [r, g, b, 255]);
    }

    pub fn obstacle_count(&self) -> usize {
        self.image
            .bytes
            .chunks_exact(4)
            .filter(|px| px[..3] == config::OBSTACLE_COLOR)
            .count()
    }
}

impl OccupancySurface for MapImage {
    fn width(&self) -> u32 {
        self.image.width as u32
    }

    fn height(&self) -> u32 {
        self.image.height as u32
    }

    fn color_at(&self, x: u32, y: u32) -> [u8; 4] {
        let offset = self.offset(x, y);
        let mut color = [0u8; 4];
        color.copy_from_slice(&self.image.bytes[offset..offset + 4]);
        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_map_is_free() {
        let map = MapImage::blank(16, 8);
        assert_eq!(map.width(), 16);
        assert_eq!(map.height(), 8);
        assert_eq!(map.color_at(3, 5), config::FREE_COLOR);
        assert!(!map.is_obstacle(3, 5));
        assert_eq!(map.obstacle_count(), 0);
    }

    #[test]
    fn test_wall_marks_obstacles() {
        let mut map = MapImage::blank(20, 20);
        map.add_wall(5, 5, 2, 3);
        assert!(map.is_obstacle(5, 5));
        assert!(map.is_obstacle(6, 7));
        assert!(!map.is_obstacle(7, 5));
        assert!(!map.is_obstacle(5, 8));
        assert_eq!(map.obstacle_count(), 6);
    }

    #[test]
    fn test_obstacle_ignores_alpha() {
        let mut map = MapImage::blank(4, 4);
        map.set_pixel(1, 1, [0, 0, 0, 0]);
        map.set_pixel(2, 2, [0, 0, 1, 255]);
        assert!(map.is_obstacle(1, 1));
        assert!(!map.is_obstacle(2, 2));
    }

    #[test]
    fn test_fill_rect_is_clipped() {
        let mut map = MapImage::blank(10, 10);
        map.add_wall(8, 8, 50, 50);
        assert_eq!(map.obstacle_count(), 4);
    }

    #[test]
    fn test_contains_treats_first_row_and_column_as_border() {
        let map = MapImage::blank(10, 10);
        assert!(map.contains(1, 1));
        assert!(map.contains(9, 9));
        assert!(!map.contains(0, 5));
        assert!(!map.contains(5, 0));
        assert!(!map.contains(10, 5));
        assert!(!map.contains(-3, 5));
    }

    #[test]
    fn test_zero_sized_surface_fails_validation() {
        let map = MapImage::blank(0, 10);
        assert_eq!(
            map.validate(),
            Err(SimError::InvalidSurface {
                width: 0,
                height: 10
            })
        );
        assert!(MapImage::blank(3, 3).validate().is_ok());
    }

    #[test]
    fn test_from_image_rejects_short_buffer() {
        let image = Image {
            bytes: vec![0; 10],
            width: 2,
            height: 2,
        };
        assert!(matches!(
            MapImage::from_image(image),
            Err(SimError::MapLoad(_))
        ));
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        assert!(matches!(
            MapImage::from_bytes(b"not an image"),
            Err(SimError::MapLoad(_))
        ));
    }
}
