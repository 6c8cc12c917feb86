//! High-level image operations.
//!
//! These functions decide *which* backend call to make (vector vs raster),
//! derive output paths, validate parameter ranges, and log failures through
//! the logger the caller hands in. Nothing here installs a global subscriber:
//! each operation runs inside [`tracing::dispatcher::with_default`] for the
//! given [`Dispatch`].

use super::backend::{BackendError, ImageBackend};
use super::params::{
    MAX_DIMENSION, MIN_DIMENSION, Quality, RasterizeParams, ResizeParams, TargetFormat,
};
use crate::metadata::ImageMetadata;
use crate::naming;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{Dispatch, debug, error, info};

#[derive(Error, Debug)]
pub enum OperationError {
    #[error("No image selected")]
    NoSelection,
    #[error("Unsupported file type: {}", .0.display())]
    UnsupportedExtension(PathBuf),
    #[error("Path has no file name: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, OperationError>;

/// Everything needed for one resize/convert run.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeRequest {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub format: TargetFormat,
    pub quality: Quality,
    pub optimize: bool,
    pub allow_upscale: bool,
    /// Directory the output is written into.
    pub output_dir: PathBuf,
}

impl ResizeRequest {
    /// Check width and height against [`MIN_DIMENSION`]..=[`MAX_DIMENSION`].
    ///
    /// Quality needs no check: [`Quality`] clamps on construction.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("width", self.width), ("height", self.height)] {
            if !(MIN_DIMENSION..=MAX_DIMENSION).contains(&value) {
                return Err(OperationError::OutOfRange {
                    field,
                    value,
                    min: MIN_DIMENSION,
                    max: MAX_DIMENSION,
                });
            }
        }
        Ok(())
    }
}

/// The single backend call a request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionPlan {
    Rasterize(RasterizeParams),
    Resize(ResizeParams),
}

impl ConversionPlan {
    pub fn output(&self) -> &Path {
        match self {
            ConversionPlan::Rasterize(p) => &p.output,
            ConversionPlan::Resize(p) => &p.output,
        }
    }
}

/// Plan a conversion without executing it.
///
/// Vector sources ignore the requested size and format entirely.
pub fn plan_conversion(request: &ResizeRequest) -> Result<ConversionPlan> {
    let output = naming::output_path(&request.source, &request.output_dir)
        .ok_or_else(|| OperationError::InvalidPath(request.source.clone()))?;

    if naming::is_vector(&request.source) {
        return Ok(ConversionPlan::Rasterize(RasterizeParams {
            source: request.source.clone(),
            output,
        }));
    }

    request.validate()?;
    Ok(ConversionPlan::Resize(ResizeParams {
        source: request.source.clone(),
        output,
        width: request.width,
        height: request.height,
        format: request.format,
        quality: request.quality,
        optimize: request.optimize,
        allow_upscale: request.allow_upscale,
    }))
}

/// Describe an image file.
///
/// Vector files get the fixed SVG record without being opened. Failures are
/// logged at error level before being returned.
pub fn extract_metadata(
    backend: &impl ImageBackend,
    path: &Path,
    logger: &Dispatch,
) -> Result<ImageMetadata> {
    tracing::dispatcher::with_default(logger, || {
        if naming::is_vector(path) {
            debug!(path = %path.display(), "Vector source, skipping raster metadata");
            return Ok(ImageMetadata::vector());
        }

        backend.read_metadata(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Error extracting metadata");
            OperationError::from(e)
        })
    })
}

/// Resize/re-encode a raster source or rasterize a vector one.
///
/// Returns the path of the written file.
pub fn resize_or_convert(
    backend: &impl ImageBackend,
    request: &ResizeRequest,
    logger: &Dispatch,
) -> Result<PathBuf> {
    tracing::dispatcher::with_default(logger, || {
        let plan = plan_conversion(request).inspect_err(|e| {
            error!(source = %request.source.display(), error = %e, "Rejected resize request");
        })?;
        let output = plan.output().to_path_buf();

        let result = match &plan {
            ConversionPlan::Rasterize(params) => {
                debug!(
                    source = %params.source.display(),
                    output = %output.display(),
                    "Rasterizing SVG to PNG"
                );
                backend.rasterize(params).inspect_err(|e| {
                    error!(source = %params.source.display(), error = %e, "Error converting SVG");
                })
            }
            ConversionPlan::Resize(params) => {
                debug!(
                    source = %params.source.display(),
                    output = %output.display(),
                    width = params.width,
                    height = params.height,
                    format = %params.format,
                    "Resizing image"
                );
                backend.resize(params).inspect_err(|e| {
                    error!(source = %params.source.display(), error = %e, "Error resizing image");
                })
            }
        };
        result?;

        info!(output = %output.display(), "Image saved");
        Ok(output)
    })
}
