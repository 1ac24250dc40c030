//! Overlapping tile grid covering an image.


use std::ops::Range;

use crate::tile::{Tblr, Tile};

// ============================================================================
// Grid generation
// ============================================================================

/// Computes a grid of `tile_height x tile_width` tiles covering the image,
/// with at least `min_overlap` pixels shared between neighboring tiles.
///
/// A tile dimension larger than the image is clamped to the image. Tiles on
/// an axis are spread evenly between the two image borders, so every tile has
/// the full tile size and the extra overlap from a non-exact fit is shared by
/// all gaps instead of landing on the last tile.
///
/// The returned tiles are in row-major grid order.
pub fn calc_tiles_min_overlap(
    image_height: usize,
    image_width: usize,
    tile_height: usize,
    tile_width: usize,
    min_overlap: usize,
) -> Vec<Tile> {
    assert!(
        image_height > 0 && image_width > 0,
        "image must not be empty, got {}x{}",
        image_width,
        image_height
    );
    assert!(
        tile_height > 0 && tile_width > 0,
        "tile must not be empty, got {}x{}",
        tile_width,
        tile_height
    );
    assert!(
        min_overlap < tile_height && min_overlap < tile_width,
        "min_overlap {} must be smaller than the tile size {}x{}",
        min_overlap,
        tile_width,
        tile_height
    );

    let rows = axis_spans(image_height, tile_height, min_overlap);
    let cols = axis_spans(image_width, tile_width, min_overlap);

    let mut tiles = Vec::with_capacity(rows.len() * cols.len());
    for (row_idx, row) in rows.iter().enumerate() {
        let (top, bottom) = span_overlaps(&rows, row_idx);
        for (col_idx, col) in cols.iter().enumerate() {
            let (left, right) = span_overlaps(&cols, col_idx);
            tiles.push(Tile {
                coords: Tblr::new(row.start, row.end, col.start, col.end),
                overlap: Tblr::new(top, bottom, left, right),
            });
        }
    }

    tiles
}

/// Start/end of every tile along one axis.
fn axis_spans(image: usize, tile: usize, min_overlap: usize) -> Vec<Range<usize>> {
    if tile >= image {
        return vec![0..image];
    }

    // tile > min_overlap and image > tile, so count >= 2
    let count = (image - min_overlap).div_ceil(tile - min_overlap);
    let travel = image - tile;

    (0..count)
        .map(|idx| {
            let start = idx * travel / (count - 1);
            start..start + tile
        })
        .collect()
}

/// Overlap of span `idx` with its previous and next neighbor.
fn span_overlaps(spans: &[Range<usize>], idx: usize) -> (usize, usize) {
    let before = idx
        .checked_sub(1)
        .map(|prev| spans[prev].end.saturating_sub(spans[idx].start))
        .unwrap_or(0);
    let after = spans
        .get(idx + 1)
        .map(|next| spans[idx].end.saturating_sub(next.start))
        .unwrap_or(0);
    (before, after)
}

// ============================================================================
// Ordering
// ============================================================================

/// Sorts tiles top-to-bottom, then left-to-right.
///
/// Stitching relies on this order: when a tile is written, its top and left
/// neighbors are already in place.
pub fn sort_tiles(tiles: &mut [Tile]) {
    tiles.sort_by_key(|tile| tile.coords.left);
    tiles.sort_by_key(|tile| tile.coords.top);
}

// ============================================================================
// Validation
// ============================================================================

/// Panics unless `tiles` is a sorted grid exactly covering the image with
/// consistent shared-edge overlaps of at least `min_overlap`.
pub fn assert_valid_tiling(
    tiles: &[Tile],
    image_height: usize,
    image_width: usize,
    min_overlap: usize,
) {
    assert!(!tiles.is_empty(), "tile plan is empty");

    let rows = unique_spans(tiles.iter().map(|t| t.coords.top..t.coords.bottom));
    let cols = unique_spans(tiles.iter().map(|t| t.coords.left..t.coords.right));

    assert_eq!(
        rows.len() * cols.len(),
        tiles.len(),
        "tiles do not form a grid: {} rows x {} columns for {} tiles",
        rows.len(),
        cols.len(),
        tiles.len()
    );
    assert_spans_cover(&rows, image_height, "rows");
    assert_spans_cover(&cols, image_width, "columns");

    for (idx, tile) in tiles.iter().enumerate() {
        let row_idx = idx / cols.len();
        let col_idx = idx % cols.len();
        assert_eq!(
            tile.coords.top..tile.coords.bottom,
            rows[row_idx],
            "tile {} is out of row-major order",
            idx
        );
        assert_eq!(
            tile.coords.left..tile.coords.right,
            cols[col_idx],
            "tile {} is out of row-major order",
            idx
        );

        let (top, bottom) = span_overlaps(&rows, row_idx);
        let (left, right) = span_overlaps(&cols, col_idx);
        assert_eq!(
            tile.overlap,
            Tblr::new(top, bottom, left, right),
            "tile {} records overlaps inconsistent with its neighbors",
            idx
        );

        for (shared, has_neighbor) in [
            (top, row_idx > 0),
            (bottom, row_idx + 1 < rows.len()),
            (left, col_idx > 0),
            (right, col_idx + 1 < cols.len()),
        ] {
            assert!(
                !has_neighbor || shared >= min_overlap,
                "tile {} overlaps a neighbor by {} px, less than the minimum {}",
                idx,
                shared,
                min_overlap
            );
        }
    }
}

fn unique_spans(spans: impl Iterator<Item = Range<usize>>) -> Vec<Range<usize>> {
    let mut spans: Vec<(usize, usize)> = spans.map(|s| (s.start, s.end)).collect();
    spans.sort_unstable();
    spans.dedup();
    spans.into_iter().map(|(start, end)| start..end).collect()
}

fn assert_spans_cover(spans: &[Range<usize>], extent: usize, axis: &str) {
    assert_eq!(spans[0].start, 0, "{} do not start at the image border", axis);
    assert_eq!(
        spans[spans.len() - 1].end,
        extent,
        "{} do not reach the image border",
        axis
    );

    for span in spans {
        assert!(span.start < span.end, "{} contain an empty span", axis);
    }
    for pair in spans.windows(2) {
        assert!(
            pair[0].start < pair[1].start && pair[0].end < pair[1].end,
            "{} are not strictly increasing",
            axis
        );
        assert!(
            pair[1].start <= pair[0].end,
            "{} leave a gap between {} and {}",
            axis,
            pair[0].end,
            pair[1].start
        );
    }
}
