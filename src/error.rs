//! Error type shared by every operation in the crate.
//!
//! All errors are surfaced synchronously to the caller of the failing
//! operation — nothing is retried internally, since every input is either
//! fully in memory or a local file. A failed decode or resize produces no
//! output buffer rather than a corrupted one.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CanvasError {
    /// The byte stream does not start with the `BM` BMP signature.
    #[error("not a BMP stream: expected signature 0x4d42, found {found:#06x}")]
    BadSignature { found: u16 },

    /// BMP bit depth outside the supported set {1, 4, 8, 16, 24}.
    #[error("unsupported BMP bit depth: {0}")]
    UnsupportedDepth(u16),

    /// The stream ended before the bytes its headers declare.
    #[error("truncated BMP data: needed {needed} bytes, only {available} available")]
    TruncatedData { needed: usize, available: usize },

    /// Non-positive or unresolvable target dimensions, or a zero-sized
    /// crop window.
    #[error("invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Unrecognized anchor token, malformed hex color, or similar caller
    /// configuration mistake.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised by the raster codec collaborator (JPEG/PNG/GIF decode-encode).
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, CanvasError>;
