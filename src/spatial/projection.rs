use serde::Deserialize;

fn default_tile_width() -> f32 {
    64.0
}

fn default_tile_height() -> f32 {
    32.0
}

fn default_height_offset() -> f32 {
    16.0
}

/// 2:1 isometric projection from map coordinates to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Projection {
    #[serde(default = "default_tile_width")]
    pub tile_width: f32,
    #[serde(default = "default_tile_height")]
    pub tile_height: f32,
    /// Pixels each elevation level lifts a tile.
    #[serde(default = "default_height_offset")]
    pub height_offset: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            tile_width: default_tile_width(),
            tile_height: default_tile_height(),
            height_offset: default_height_offset(),
        }
    }
}

impl Projection {
    pub fn to_screen(&self, map_x: f32, map_y: f32) -> (f32, f32) {
        (
            (map_x - map_y) * self.tile_width / 2.0,
            (map_x + map_y) * self.tile_height / 2.0,
        )
    }

    pub fn to_screen_elevated(&self, map_x: f32, map_y: f32, level: u8) -> (f32, f32) {
        let (sx, sy) = self.to_screen(map_x, map_y);
        (sx, sy - level as f32 * self.height_offset)
    }

    /// Converts a radius in tiles to screen pixels.
    pub fn radius_px(&self, radius_tiles: f32) -> f32 {
        radius_tiles * self.tile_width / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projects_diamond_grid() {
        let p = Projection::default();
        assert_eq!(p.to_screen(0.0, 0.0), (0.0, 0.0));
        assert_eq!(p.to_screen(1.0, 0.0), (32.0, 16.0));
        assert_eq!(p.to_screen(0.0, 1.0), (-32.0, 16.0));
        assert_eq!(p.to_screen_elevated(1.0, 1.0, 2), (0.0, 0.0));
        assert_eq!(p.radius_px(1.5), 48.0);
    }
}
