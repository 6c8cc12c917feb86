//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides output names and which branch to take) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 95). Clamped on construction.
//! - [`TargetFormat`]: The six encodable output formats offered to the user.
//! - [`ResizeParams`]: Everything needed for a raster resize + re-encode.
//! - [`RasterizeParams`]: Source and output for an SVG → PNG rasterization.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Smallest accepted target width or height.
pub const MIN_DIMENSION: u32 = 1;
/// Largest accepted target width or height.
pub const MAX_DIMENSION: u32 = 10_000;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Output encodings the user can pick from.
///
/// Displayed upper-case (`JPEG`, `PNG`, ...) because that is the encoder name
/// shown to the user. The `--format` flag accepts any case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    #[default]
    Jpeg,
    Png,
    Gif,
    Bmp,
    Tiff,
    Webp,
}

impl TargetFormat {
    pub const ALL: [TargetFormat; 6] = [
        TargetFormat::Jpeg,
        TargetFormat::Png,
        TargetFormat::Gif,
        TargetFormat::Bmp,
        TargetFormat::Tiff,
        TargetFormat::Webp,
    ];

    /// The `image` crate format used to encode this target.
    pub fn image_format(self) -> ImageFormat {
        match self {
            TargetFormat::Jpeg => ImageFormat::Jpeg,
            TargetFormat::Png => ImageFormat::Png,
            TargetFormat::Gif => ImageFormat::Gif,
            TargetFormat::Bmp => ImageFormat::Bmp,
            TargetFormat::Tiff => ImageFormat::Tiff,
            TargetFormat::Webp => ImageFormat::WebP,
        }
    }

    /// Lower-case option name, as offered in the format picker.
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
            TargetFormat::Gif => "gif",
            TargetFormat::Bmp => "bmp",
            TargetFormat::Tiff => "tiff",
            TargetFormat::Webp => "webp",
        }
    }
}

impl fmt::Display for TargetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Parameters for a raster resize + re-encode.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
    pub quality: Quality,
    /// Spend more effort on compression where the encoder supports it.
    pub optimize: bool,
    /// Recorded for diagnostics only: a target larger than the source is
    /// always honored.
    pub allow_upscale: bool,
}

/// Parameters for rasterizing a vector source to PNG at its intrinsic size.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
}
