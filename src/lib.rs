//! # Image Resizer
//!
//! Inspect an image, then resize and re-encode it to a chosen size and format.
//! SVG sources are rasterized to PNG instead.
//!
//! # Workflow
//!
//! ```text
//! select   photo.jpg            (extension checked against the selection filter)
//! inspect  → ImageMetadata      (format, mode, size, DPI, bit depth, ICC, EXIF)
//! resize   → resized_photo.jpg  (Lanczos3 to exactly width × height)
//! ```
//!
//! The selection lives in a [`session::Session`]; the operations themselves are
//! plain functions in [`imaging::operations`] and can be called directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Holds the selected file and configured defaults, guards operations |
//! | [`imaging`] | Backend trait, pure-Rust backend, and the metadata/resize operations |
//! | [`metadata`] | The ordered metadata record and its value type |
//! | [`naming`] | Selectable extensions, vector detection, `resized_` output names |
//! | [`config`] | `resizer.toml` loading, merging, and validation |
//! | [`logging`] | Builds the `tracing` logger each operation reports through |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Explicit Logger
//!
//! The library never installs a global `tracing` subscriber. A
//! [`tracing::Dispatch`] is built by the caller and passed into every
//! operation, which scopes its events to it with
//! [`tracing::dispatcher::with_default`]. Tests capture logs in memory this way
//! without interfering with each other.
//!
//! ## Errors Are Values
//!
//! Every failure is logged at error level with its underlying message and then
//! returned as an [`imaging::OperationError`]. Nothing is fatal to the process;
//! the CLI turns an error into a short notice and a non-zero exit code.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding use the `image` crate, EXIF tags are named
//! by `kamadak-exif`, and SVG is rendered by `resvg`. No system libraries are
//! needed, so the binary is self-contained.
//!
//! ## No Partial Outputs
//!
//! Output bytes are encoded fully in memory and written in one call. A decode
//! or encode failure never leaves a truncated `resized_` file behind.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
