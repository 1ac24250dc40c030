use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tiler::ModelKind;

/// Upscales images tile by tile so large inputs fit the model's limits.
#[derive(Parser, Debug)]
#[command(name = "upscale", version, about)]
pub struct Args {
    /// Input image file(s).
    #[arg(required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output file. Only valid for a single input.
    #[arg(short, long, value_name = "FILE", conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for outputs; files keep their stem and get a `_x<scale>` suffix.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Config file (TOML). Defaults to `upscale.toml` when present.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Tile edge length in pixels; 0 or less disables tiling.
    #[arg(short, long, allow_negative_numbers = true)]
    pub tile_size: Option<i64>,

    /// Minimum overlap between neighboring tiles in pixels.
    #[arg(long)]
    pub min_overlap: Option<usize>,

    /// Transform family.
    #[arg(short, long, value_enum)]
    pub model: Option<ModelFamily>,

    /// Integer scale factor of the transform.
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=16))]
    pub scale: Option<u32>,

    /// Cancel processing after this many seconds; nothing is written.
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Log filter, e.g. `info` or `tiler=debug`.
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModelFamily {
    Identity,
    Nearest,
    Bilinear,
}

impl ModelFamily {
    pub fn of(kind: &ModelKind) -> Self {
        match kind {
            ModelKind::Identity => ModelFamily::Identity,
            ModelKind::Nearest { .. } => ModelFamily::Nearest,
            ModelKind::Bilinear { .. } => ModelFamily::Bilinear,
        }
    }

    pub fn kind(self, scale: usize) -> ModelKind {
        match self {
            ModelFamily::Identity => ModelKind::Identity,
            ModelFamily::Nearest => ModelKind::Nearest { scale },
            ModelFamily::Bilinear => ModelKind::Bilinear { scale },
        }
    }
}
