use serde::{Deserialize, Serialize};

/// Top/bottom/left/right pixel offsets. `bottom` and `right` are exclusive
/// when used as bounds; as overlap amounts each field is a width in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tblr {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Tblr {
    pub const ZERO: Tblr = Tblr {
        top: 0,
        bottom: 0,
        left: 0,
        right: 0,
    };

    pub const fn new(top: usize, bottom: usize, left: usize, right: usize) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.right - self.left
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top >= self.bottom || self.left >= self.right
    }

    pub fn scaled(&self, scale: usize) -> Tblr {
        Tblr {
            top: self.top * scale,
            bottom: self.bottom * scale,
            left: self.left * scale,
            right: self.right * scale,
        }
    }
}

/// Rectangular region of an image plus how much it shares with each neighbor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    pub coords: Tblr,
    pub overlap: Tblr,
}

impl Tile {
    pub const fn new(coords: Tblr, overlap: Tblr) -> Self {
        Self { coords, overlap }
    }

    /// One tile spanning the whole image with no overlap.
    pub fn whole(image_height: usize, image_width: usize) -> Self {
        Self {
            coords: Tblr::new(0, image_height, 0, image_width),
            overlap: Tblr::ZERO,
        }
    }

    /// Projects the tile into an image `scale` times larger.
    pub fn scaled(&self, scale: usize) -> Tile {
        assert!(scale >= 1, "scale factor must be at least 1, got {}", scale);
        Tile {
            coords: self.coords.scaled(scale),
            overlap: self.overlap.scaled(scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_accessors() {
        let rect = Tblr::new(10, 30, 5, 45);
        assert_eq!(rect.height(), 20);
        assert_eq!(rect.width(), 40);
        assert!(!rect.is_empty());
        assert!(Tblr::ZERO.is_empty());
    }

    #[test]
    fn scaled_multiplies_coords_and_overlap() {
        let tile = Tile::new(Tblr::new(488, 1000, 0, 512), Tblr::new(24, 0, 0, 24));

        for scale in [1, 2, 4] {
            let scaled = tile.scaled(scale);
            assert_eq!(
                scaled.coords,
                Tblr::new(488 * scale, 1000 * scale, 0, 512 * scale)
            );
            assert_eq!(scaled.overlap, Tblr::new(24 * scale, 0, 0, 24 * scale));
        }
    }

    #[test]
    fn scale_one_is_identity() {
        let tile = Tile::new(Tblr::new(3, 9, 1, 7), Tblr::new(2, 0, 1, 0));
        assert_eq!(tile.scaled(1), tile);
    }

    #[test]
    #[should_panic(expected = "scale factor must be at least 1")]
    fn scale_zero_panics() {
        Tile::whole(4, 4).scaled(0);
    }

    #[test]
    fn whole_tile_has_no_overlap() {
        let tile = Tile::whole(300, 200);
        assert_eq!(tile.coords, Tblr::new(0, 300, 0, 200));
        assert_eq!(tile.overlap, Tblr::ZERO);
    }
}
