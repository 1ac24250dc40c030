//! Tiled processing of images with transforms that cannot take the whole
//! image at once.
//!
//! An image is split into overlapping tiles ([`tile_grid`]), every tile is
//! run through a [`Transform`] and the results are stitched into one output
//! buffer ([`stitch`]). [`TiledProcessor`] drives the loop.

pub mod config;
pub mod error;
pub mod models;
pub mod processor;
pub mod stitch;
pub mod tile;
pub mod tile_grid;
pub mod transform;

pub use config::TileConfig;
pub use error::{TileError, TileResult};
pub use models::{ModelCache, ModelKind};
pub use processor::TiledProcessor;
pub use tile::{Tblr, Tile};
pub use tile_grid::{assert_valid_tiling, calc_tiles_min_overlap, sort_tiles};
pub use transform::{Transform, TransformSource};
