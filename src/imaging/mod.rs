//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Describe** | `image` decoder + `kamadak-exif` + container header readers (mode, DPI) |
//! | **Resize** | `resize_exact` with Lanczos3, re-encoded by the `image` encoders |
//! | **SVG → PNG** | `resvg` at the document's intrinsic size |
//!
//! The module is split into:
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions that pick a branch, name the output and log failures

pub mod backend;
mod color_mode;
mod container;
pub mod operations;
mod params;
mod resolution;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{
    ConversionPlan, OperationError, ResizeRequest, extract_metadata, plan_conversion,
    resize_or_convert,
};
pub use params::{
    MAX_DIMENSION, MIN_DIMENSION, Quality, RasterizeParams, ResizeParams, TargetFormat,
};
pub use rust_backend::RustBackend;
