//! Error types shared by the viewport engine, export and command layers.

use shared::ObjectId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ViewerError {
    /// Render surface has no usable area (zero, negative or non-finite size)
    #[error("invalid render surface {width}x{height}")]
    InvalidSurface { width: f32, height: f32 },

    #[error("object {0} not found")]
    ObjectNotFound(ObjectId),

    /// Frame could not be rendered or read back
    #[error("frame capture failed: {0}")]
    Capture(String),

    #[error("image encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("command failed: {0}")]
    Command(String),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
