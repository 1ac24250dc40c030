//! Built-in transform families.

mod cache;

pub use cache::{CachedModel, ModelCache, ModelCacheError, ModelCacheSource};

use anyhow::ensure;
use common::Buffer3;
use serde::{Deserialize, Serialize};

use crate::transform::{Transform, TransformSource};

pub type DynTransform = Box<dyn Transform + Send>;

/// Describes one transform family and its parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum ModelKind {
    Identity,
    Nearest { scale: usize },
    Bilinear { scale: usize },
}

impl ModelKind {
    pub fn scale(&self) -> usize {
        match self {
            ModelKind::Identity => 1,
            ModelKind::Nearest { scale } | ModelKind::Bilinear { scale } => *scale,
        }
    }

    pub fn build(&self) -> anyhow::Result<DynTransform> {
        ensure!(self.scale() >= 1, "{:?}: scale must be at least 1", self);

        Ok(match *self {
            ModelKind::Identity => Box::new(Identity),
            ModelKind::Nearest { scale } => Box::new(Nearest { scale }),
            ModelKind::Bilinear { scale } => Box::new(Bilinear { scale }),
        })
    }
}

impl Default for ModelKind {
    fn default() -> Self {
        ModelKind::Bilinear { scale: 2 }
    }
}

/// Builds a fresh model on every acquisition.
impl TransformSource for ModelKind {
    type Transform = DynTransform;

    fn acquire(&self) -> anyhow::Result<DynTransform> {
        self.build()
    }
}

// ============================================================================
// Families
// ============================================================================

/// Returns the input unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Transform for Identity {
    fn scale(&self) -> usize {
        1
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        Ok(input.clone())
    }
}

/// Pixel replication.
#[derive(Clone, Copy, Debug)]
pub struct Nearest {
    scale: usize,
}

impl Nearest {
    pub fn new(scale: usize) -> Self {
        assert!(scale >= 1, "scale must be at least 1");
        Self { scale }
    }
}

impl Transform for Nearest {
    fn scale(&self) -> usize {
        self.scale
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        let scale = self.scale;
        let width = input.width() * scale;
        let height = input.height() * scale;
        let channels = input.channels();

        let mut pixels = Vec::with_capacity(width * height * channels);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(input.pixel(x / scale, y / scale));
            }
        }

        Ok(Buffer3::new(width, height, channels, pixels))
    }
}

/// Bilinear resampling by an integer factor, sampling pixel centers and
/// clamping at the tile border.
#[derive(Clone, Copy, Debug)]
pub struct Bilinear {
    scale: usize,
}

impl Bilinear {
    pub fn new(scale: usize) -> Self {
        assert!(scale >= 1, "scale must be at least 1");
        Self { scale }
    }
}

impl Transform for Bilinear {
    fn scale(&self) -> usize {
        self.scale
    }

    fn run(&mut self, input: &Buffer3<f32>) -> anyhow::Result<Buffer3<f32>> {
        ensure!(!input.is_empty(), "bilinear input is empty");

        let scale = self.scale;
        let width = input.width() * scale;
        let height = input.height() * scale;
        let channels = input.channels();

        let xs: Vec<Sample> = (0..width)
            .map(|x| Sample::new(x, scale, input.width()))
            .collect();

        let mut output = Buffer3::new_default(width, height, channels);
        for y in 0..height {
            let sy = Sample::new(y, scale, input.height());
            for (x, sx) in xs.iter().enumerate() {
                let p00 = input.pixel(sx.lo, sy.lo);
                let p10 = input.pixel(sx.hi, sy.lo);
                let p01 = input.pixel(sx.lo, sy.hi);
                let p11 = input.pixel(sx.hi, sy.hi);
                let out = output.pixel_mut(x, y);
                for c in 0..channels {
                    let top = p00[c] + (p10[c] - p00[c]) * sx.t;
                    let bottom = p01[c] + (p11[c] - p01[c]) * sx.t;
                    out[c] = top + (bottom - top) * sy.t;
                }
            }
        }

        Ok(output)
    }
}

/// Source indices and weight for one output coordinate.
#[derive(Clone, Copy, Debug)]
struct Sample {
    lo: usize,
    hi: usize,
    t: f32,
}

impl Sample {
    fn new(dst: usize, scale: usize, src_len: usize) -> Self {
        let pos = ((dst as f32 + 0.5) / scale as f32 - 0.5).max(0.0);
        let lo = (pos.floor() as usize).min(src_len - 1);
        let hi = (lo + 1).min(src_len - 1);
        Self {
            lo,
            hi,
            t: pos - lo as f32,
        }
    }
}
