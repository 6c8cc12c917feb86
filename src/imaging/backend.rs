//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the three operations every backend must
//! support: read_metadata, resize, and rasterize.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust decoders and
//! encoders from the `image` crate, `kamadak-exif` for tag tables and `resvg`
//! for vector sources.

use super::params::{RasterizeParams, ResizeParams};
use crate::metadata::ImageMetadata;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("SVG rasterization failed: {0}")]
    Rasterize(String),
}

/// Trait for image processing backends.
///
/// Backends do no path derivation and no branching on file type; the
/// [`operations`](super::operations) layer decides which call to make.
pub trait ImageBackend {
    /// Open a raster file and describe it.
    fn read_metadata(&self, path: &Path) -> Result<ImageMetadata, BackendError>;

    /// Resample a raster file to exact dimensions and re-encode it.
    fn resize(&self, params: &ResizeParams) -> Result<(), BackendError>;

    /// Rasterize a vector file to PNG at its intrinsic size.
    fn rasterize(&self, params: &RasterizeParams) -> Result<(), BackendError>;
}
