use serde::{Deserialize, Serialize};

use crate::error::{TileError, TileResult};
use crate::tile::Tile;
use crate::tile_grid::{calc_tiles_min_overlap, sort_tiles};

/// Tiling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Tile edge length in pixels. Zero or negative disables tiling and the
    /// whole image is processed as one tile.
    pub tile_size: i64,
    /// Minimum number of pixels shared by neighboring tiles.
    pub min_overlap: usize,
}

impl TileConfig {
    pub const DEFAULT_TILE_SIZE: i64 = 512;
    pub const DEFAULT_MIN_OVERLAP: usize = 20;

    pub fn with_tile_size(tile_size: i64) -> Self {
        Self {
            tile_size,
            ..Self::default()
        }
    }

    pub fn untiled() -> Self {
        Self::with_tile_size(0)
    }

    pub fn is_tiled(&self) -> bool {
        self.tile_size > 0
    }

    /// Overlap the plan is checked against; an untiled plan has none.
    pub fn effective_min_overlap(&self) -> usize {
        if self.is_tiled() { self.min_overlap } else { 0 }
    }

    pub fn validate(&self) -> TileResult<()> {
        if self.is_tiled() && self.min_overlap as i64 >= self.tile_size {
            return Err(TileError::InvalidConfig(format!(
                "min_overlap {} must be smaller than tile_size {}",
                self.min_overlap, self.tile_size
            )));
        }
        Ok(())
    }

    /// Tiles covering a `image_height x image_width` image, in processing
    /// order.
    pub fn plan(&self, image_height: usize, image_width: usize) -> TileResult<Vec<Tile>> {
        self.validate()?;
        if image_height == 0 || image_width == 0 {
            return Err(TileError::InvalidConfig(format!(
                "cannot tile an empty {}x{} image",
                image_width, image_height
            )));
        }

        if !self.is_tiled() {
            return Ok(vec![Tile::whole(image_height, image_width)]);
        }

        let tile_size = self.tile_size as usize;
        let mut tiles = calc_tiles_min_overlap(
            image_height,
            image_width,
            tile_size,
            tile_size,
            self.min_overlap,
        );
        sort_tiles(&mut tiles);
        Ok(tiles)
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_size: Self::DEFAULT_TILE_SIZE,
            min_overlap: Self::DEFAULT_MIN_OVERLAP,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::Tblr;

    #[test]
    fn defaults() {
        let config = TileConfig::default();
        assert_eq!(config.tile_size, 512);
        assert_eq!(config.min_overlap, 20);
        assert!(config.is_tiled());
    }

    #[test]
    fn disabled_tiling_plans_one_tile() {
        for tile_size in [0, -1, -512] {
            let tiles = TileConfig::with_tile_size(tile_size)
                .plan(300, 700)
                .expect("untiled plan");
            assert_eq!(tiles.len(), 1);
            assert_eq!(tiles[0].coords, Tblr::new(0, 300, 0, 700));
            assert_eq!(tiles[0].overlap, Tblr::ZERO);
        }
    }

    #[test]
    fn untiled_ignores_overlap() {
        let config = TileConfig {
            tile_size: 0,
            min_overlap: 100,
        };
        assert!(config.validate().is_ok());
        assert_eq!(config.effective_min_overlap(), 0);
    }

    #[test]
    fn overlap_not_below_tile_size_is_rejected() {
        let config = TileConfig {
            tile_size: 16,
            min_overlap: 16,
        };
        assert!(matches!(
            config.plan(100, 100),
            Err(TileError::InvalidConfig(_))
        ));
    }

    #[test]
    fn empty_image_is_rejected() {
        assert!(matches!(
            TileConfig::default().plan(0, 10),
            Err(TileError::InvalidConfig(_))
        ));
    }

    #[test]
    fn plan_is_sorted() {
        let tiles = TileConfig::default().plan(1000, 1000).expect("plan");
        let origins: Vec<(usize, usize)> = tiles
            .iter()
            .map(|t| (t.coords.top, t.coords.left))
            .collect();
        assert_eq!(origins, vec![(0, 0), (0, 488), (488, 0), (488, 488)]);
    }

    #[test]
    fn loads_from_toml_with_defaults() {
        let config: TileConfig = toml::from_str("tile_size = 256").expect("valid toml");
        assert_eq!(
            config,
            TileConfig {
                tile_size: 256,
                min_overlap: 20
            }
        );
    }
}
