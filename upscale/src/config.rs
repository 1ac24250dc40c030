use std::path::Path;

use serde::{Deserialize, Serialize};
use tiler::{ModelKind, TileConfig};

use crate::args::{Args, ModelFamily};

pub const DEFAULT_CONFIG_FILE: &str = "upscale.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpscaleConfig {
    pub log_level: String,
    pub log_dir: String,
    pub tiles: TileConfig,
    pub model: ModelKind,
}

impl Default for UpscaleConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "logs".to_string(),
            tiles: TileConfig::default(),
            model: ModelKind::default(),
        }
    }
}

impl UpscaleConfig {
    /// Reads `path` (or the default file when present) and applies command
    /// line overrides on top.
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let mut config: UpscaleConfig = match &args.config {
            Some(path) => common::config::load_toml(path)?,
            None => common::config::load_toml_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
        };
        config.apply_overrides(args);
        Ok(config)
    }

    fn apply_overrides(&mut self, args: &Args) {
        if let Some(tile_size) = args.tile_size {
            self.tiles.tile_size = tile_size;
        }
        if let Some(min_overlap) = args.min_overlap {
            self.tiles.min_overlap = min_overlap;
        }
        if args.model.is_some() || args.scale.is_some() {
            let family = args.model.unwrap_or_else(|| ModelFamily::of(&self.model));
            let scale = args
                .scale
                .map(|scale| scale as usize)
                .unwrap_or_else(|| self.model.scale());
            self.model = family.kind(scale);
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: UpscaleConfig = common::config::from_toml_str(
            "[tiles]\ntile_size = 256\n\n[model]\nfamily = \"nearest\"\nscale = 4\n",
        )
        .expect("valid config");

        assert_eq!(config.tiles.tile_size, 256);
        assert_eq!(config.tiles.min_overlap, 20);
        assert_eq!(config.model, ModelKind::Nearest { scale: 4 });
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn cli_overrides_file_values() {
        let args = Args::parse_from([
            "upscale",
            "in.png",
            "--tile-size",
            "0",
            "--model",
            "bilinear",
            "--scale",
            "3",
        ]);
        let mut config = UpscaleConfig::default();
        config.apply_overrides(&args);

        assert!(!config.tiles.is_tiled());
        assert_eq!(config.model, ModelKind::Bilinear { scale: 3 });
    }

    #[test]
    fn scale_alone_keeps_family() {
        let args = Args::parse_from(["upscale", "in.png", "--scale", "4"]);
        let mut config = UpscaleConfig {
            model: ModelKind::Nearest { scale: 2 },
            ..UpscaleConfig::default()
        };
        config.apply_overrides(&args);

        assert_eq!(config.model, ModelKind::Nearest { scale: 4 });
        assert_eq!(config.tiles, TileConfig::default());
    }

    #[test]
    fn default_round_trips_through_toml() {
        let text = toml::to_string(&UpscaleConfig::default()).expect("serialize");
        let parsed: UpscaleConfig = common::config::from_toml_str(&text).expect("parse");
        assert_eq!(parsed, UpscaleConfig::default());
    }
}
