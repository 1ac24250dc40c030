use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use common::CancelSource;
use tiler::{ModelCache, ModelKind, TiledProcessor};

use crate::config::UpscaleConfig;
use crate::image_io;

/// Loads, upscales and saves image files, keeping the model loaded between
/// files.
#[derive(Debug)]
pub struct Upscaler {
    processor: TiledProcessor,
    cache: ModelCache,
    model: ModelKind,
}

impl Upscaler {
    pub fn new(config: &UpscaleConfig) -> Self {
        Self {
            processor: TiledProcessor::new(config.tiles),
            cache: ModelCache::new(),
            model: config.model,
        }
    }

    pub fn model(&self) -> ModelKind {
        self.model
    }

    /// Upscales `input` into `output`. Nothing is written unless every tile
    /// was processed.
    pub fn upscale_file<C>(&self, input: &Path, output: &Path, cancel: &C) -> Result<()>
    where
        C: CancelSource + ?Sized,
    {
        let started = Instant::now();
        let image = image_io::load_rgb(input)?;
        tracing::info!(
            "Upscaling {} ({}x{}) with {:?}",
            input.display(),
            image.width(),
            image.height(),
            self.model
        );

        let upscaled = self
            .processor
            .run(&image, &self.cache.source(self.model), cancel)
            .with_context(|| format!("Failed to upscale {}", input.display()))?;

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        image_io::save(&upscaled, output)?;

        tracing::info!(
            "Wrote {} ({}x{}) in {:.2?}",
            output.display(),
            upscaled.width(),
            upscaled.height(),
            started.elapsed()
        );
        Ok(())
    }
}

/// `<dir>/<stem>_x<scale>.<ext>`, next to the input when `output_dir` is
/// `None`. PNG is used when the input has no extension.
pub fn output_path_for(input: &Path, output_dir: Option<&Path>, scale: usize) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "png".to_string());
    let file_name = format!("{}_x{}.{}", stem, scale, extension);

    match output_dir {
        Some(dir) => dir.join(file_name),
        None => input.with_file_name(file_name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::test_utils::{fresh_test_output_path, test_output_path};
    use common::{Buffer3, CancelToken, NeverCancel};
    use tiler::TileConfig;

    fn write_input(name: &str, width: usize, height: usize) -> PathBuf {
        let pixels = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
        let path = test_output_path(name);
        image_io::save(&Buffer3::new(width, height, 3, pixels), &path).expect("write input");
        path
    }

    #[test]
    fn output_path_naming() {
        assert_eq!(
            output_path_for(Path::new("shots/cat.jpg"), None, 4),
            PathBuf::from("shots/cat_x4.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("shots/cat.jpg"), Some(Path::new("out")), 2),
            PathBuf::from("out/cat_x2.jpg")
        );
        assert_eq!(
            output_path_for(Path::new("raw"), None, 2),
            PathBuf::from("raw_x2.png")
        );
    }

    #[test]
    fn upscales_file_end_to_end() {
        let input = write_input("upscaler_input.png", 70, 50);
        let output = fresh_test_output_path("upscaler_input_x2.png");
        let config = UpscaleConfig {
            tiles: TileConfig::with_tile_size(32),
            model: ModelKind::Nearest { scale: 2 },
            ..UpscaleConfig::default()
        };

        Upscaler::new(&config)
            .upscale_file(&input, &output, &NeverCancel)
            .expect("upscale");

        let original = image_io::load_rgb(&input).expect("reload input");
        let upscaled = image_io::load_rgb(&output).expect("load output");
        assert_eq!(upscaled.shape(), (100, 140, 3));
        assert_eq!(upscaled.pixel(139, 99), original.pixel(69, 49));
    }

    #[test]
    fn canceled_run_writes_nothing() {
        let input = write_input("upscaler_canceled.png", 40, 40);
        let output = fresh_test_output_path("upscaler_canceled_x2.png");

        let token = CancelToken::new();
        token.cancel();
        let result = Upscaler::new(&UpscaleConfig::default()).upscale_file(&input, &output, &token);

        let err = result.expect_err("canceled run must fail");
        assert!(
            err.downcast_ref::<tiler::TileError>()
                .is_some_and(tiler::TileError::is_canceled)
        );
        assert!(!output.exists());
    }
}
