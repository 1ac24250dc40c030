use common::Buffer3;

use crate::tile::Tile;

/// Writes a transformed tile into `dest` at the position of `scaled_tile`.
///
/// Half of the top and left overlap is dropped; the bottom and right overlap
/// is written and later overwritten by the next tile in row-major order. No
/// blending is done, so a seam may be visible at the cut.
pub fn stitch_tile(dest: &mut Buffer3<u8>, tile_pixels: &Buffer3<u8>, scaled_tile: &Tile) {
    let coords = &scaled_tile.coords;
    assert_eq!(
        (tile_pixels.height(), tile_pixels.width()),
        (coords.height(), coords.width()),
        "tile pixels do not match the scaled tile {:?}",
        coords
    );
    assert!(
        coords.bottom <= dest.height() && coords.right <= dest.width(),
        "scaled tile {:?} exceeds destination {}x{}",
        coords,
        dest.width(),
        dest.height()
    );

    let top_trim = scaled_tile.overlap.top / 2;
    let left_trim = scaled_tile.overlap.left / 2;

    dest.copy_region_from(
        tile_pixels,
        left_trim,
        top_trim,
        coords.width() - left_trim,
        coords.height() - top_trim,
        coords.left + left_trim,
        coords.top + top_trim,
    );
}
