
use common::{Buffer3, CancelSource};

use crate::config::TileConfig;
use crate::error::{TileError, TileResult};
use crate::stitch::stitch_tile;
use crate::tile::Tile;
use crate::tile_grid::assert_valid_tiling;
use crate::transform::{Transform, TransformSource};

/// Runs a transform over an image tile by tile and stitches the results into
/// one buffer `scale` times larger.
///
/// Tiles are processed one after another in row-major order. The cancel
/// source is polled before every tile; a canceled or failed run returns an
/// error and the partially written output is dropped.
#[derive(Debug, Clone, Default)]
pub struct TiledProcessor {
    config: TileConfig,
}

impl TiledProcessor {
    pub fn new(config: TileConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Acquires a transform from `source` for the duration of this call and
    /// processes `image` with it.
    pub fn run<S, C>(&self, image: &Buffer3<u8>, source: &S, cancel: &C) -> TileResult<Buffer3<u8>>
    where
        S: TransformSource + ?Sized,
        C: CancelSource + ?Sized,
    {
        let tiles = self.plan(image)?;

        // Released on every return path below.
        let mut transform = source.acquire().map_err(TileError::Acquire)?;
        self.process(image, &tiles, &mut transform, cancel)
    }

    /// Processes `image` with a transform the caller already holds.
    pub fn run_with<T, C>(
        &self,
        image: &Buffer3<u8>,
        transform: &mut T,
        cancel: &C,
    ) -> TileResult<Buffer3<u8>>
    where
        T: Transform + ?Sized,
        C: CancelSource + ?Sized,
    {
        let tiles = self.plan(image)?;
        self.process(image, &tiles, transform, cancel)
    }

    /// Sorted, validated tiles for `image`.
    pub fn plan(&self, image: &Buffer3<u8>) -> TileResult<Vec<Tile>> {
        let tiles = self.config.plan(image.height(), image.width())?;
        assert_valid_tiling(
            &tiles,
            image.height(),
            image.width(),
            self.config.effective_min_overlap(),
        );
        Ok(tiles)
    }

    fn process<T, C>(
        &self,
        image: &Buffer3<u8>,
        tiles: &[Tile],
        transform: &mut T,
        cancel: &C,
    ) -> TileResult<Buffer3<u8>>
    where
        T: Transform + ?Sized,
        C: CancelSource + ?Sized,
    {
        let scale = transform.scale();
        if scale == 0 {
            return Err(TileError::InvalidConfig(
                "transform reports a scale factor of 0".to_string(),
            ));
        }

        let scaled_tiles: Vec<Tile> = tiles.iter().map(|tile| tile.scaled(scale)).collect();
        let channels = image.channels();
        let mut output =
            Buffer3::<u8>::new_default(image.width() * scale, image.height() * scale, channels);

        tracing::info!(
            "Processing {} tiles: {}x{} -> {}x{} (scale {})",
            tiles.len(),
            image.width(),
            image.height(),
            output.width(),
            output.height(),
            scale
        );

        let total = tiles.len();
        for (index, (tile, scaled_tile)) in tiles.iter().zip(scaled_tiles.iter()).enumerate() {
            if cancel.is_canceled() {
                tracing::info!("Canceled before tile {}/{}", index + 1, total);
                return Err(TileError::Canceled);
            }

            tracing::debug!(
                index = index + 1,
                total,
                "Transforming tile {:?}",
                tile.coords
            );

            let input = image
                .crop(
                    tile.coords.left,
                    tile.coords.top,
                    tile.coords.width(),
                    tile.coords.height(),
                )
                .map(|&v| v as f32 / 255.0);

            let transformed = transform
                .run(&input)
                .map_err(|source| TileError::Transform { index, source })?;

            let expected = (
                scaled_tile.coords.height(),
                scaled_tile.coords.width(),
                channels,
            );
            if transformed.shape() != expected {
                return Err(TileError::OutputShape {
                    index,
                    expected,
                    actual: transformed.shape(),
                });
            }

            let quantized = transformed.map(|&v| quantize(v));
            stitch_tile(&mut output, &quantized, scaled_tile);
        }

        tracing::info!("Processed {} tiles", total);

        Ok(output)
    }
}

/// Maps `[0, 1]` to `0..=255`; out-of-range values are clamped and NaN
/// becomes 0.
#[inline]
pub fn quantize(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
