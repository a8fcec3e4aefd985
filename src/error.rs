//! Crate-wide error type

use std::path::PathBuf;

/// Everything that can go wrong while setting up or running the demo.
///
/// The first three variants are configuration errors: they are detected once
/// at setup and should abort startup. Inside the animation loop the same
/// variants mean "skip this frame".
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("working canvas must be non-empty, got {width}x{height}")]
    EmptyCanvas { width: u32, height: u32 },

    #[error(
        "buffer is {buffer_width}x{buffer_height} but the lookup table is \
         {table_width}x{table_height}"
    )]
    DimensionMismatch {
        table_width: u32,
        table_height: u32,
        buffer_width: u32,
        buffer_height: u32,
    },

    #[error(
        "replication target {target_width}x{target_height} is smaller than twice the \
         {quadrant_width}x{quadrant_height} quadrant"
    )]
    TargetTooSmall {
        quadrant_width: u32,
        quadrant_height: u32,
        target_width: u32,
        target_height: u32,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config JSON error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save frame {}: {source}", path.display())]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
