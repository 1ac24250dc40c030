use thiserror::Error;

#[derive(Debug, Error)]
pub enum TileError {
    /// The cancel source fired at a tile boundary. Output produced so far is
    /// dropped; the whole operation has to be resubmitted.
    #[error("Tiled processing was canceled")]
    Canceled,
    #[error("Invalid tile configuration: {0}")]
    InvalidConfig(String),
    #[error("Failed to acquire transform: {0}")]
    Acquire(#[source] anyhow::Error),
    #[error("Transform failed on tile {index}: {source}")]
    Transform {
        index: usize,
        #[source]
        source: anyhow::Error,
    },
    #[error(
        "Transform output for tile {index} has shape {actual:?}, expected {expected:?} (height, width, channels)"
    )]
    OutputShape {
        index: usize,
        expected: (usize, usize, usize),
        actual: (usize, usize, usize),
    },
}

impl TileError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, TileError::Canceled)
    }
}

pub type TileResult<T> = std::result::Result<T, TileError>;
