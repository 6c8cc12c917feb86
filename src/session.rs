//! The single-selection workflow: pick a file, inspect it, resize it.
//!
//! A [`Session`] owns a backend, the logger every operation reports through,
//! and the configured defaults. It holds at most one selected path at a time;
//! operations on an empty session fail with [`OperationError::NoSelection`]
//! before touching the filesystem.
//!
//! ```ignore
//! let logger = logging::build_logger(LevelFilter::ERROR);
//! let mut session = Session::new(RustBackend::new(), logger, ResizerConfig::default());
//! session.select("photo.jpg")?;
//! let written = session.resize(&ResizeOptions { width: Some(200), ..Default::default() })?;
//! ```

use crate::config::ResizerConfig;
use crate::imaging::{
    ImageBackend, OperationError, Quality, ResizeRequest, TargetFormat, extract_metadata,
    resize_or_convert,
};
use crate::metadata::ImageMetadata;
use crate::naming;
use std::path::{Path, PathBuf};
use tracing::{Dispatch, debug};

type Result<T> = std::result::Result<T, OperationError>;

/// Per-run overrides. `None` falls back to the session defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResizeOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub format: Option<TargetFormat>,
    pub quality: Option<u32>,
    pub optimize: Option<bool>,
    pub allow_upscale: Option<bool>,
    pub output_dir: Option<PathBuf>,
}

pub struct Session<B: ImageBackend> {
    backend: B,
    logger: Dispatch,
    defaults: ResizerConfig,
    selected: Option<PathBuf>,
}

impl<B: ImageBackend> Session<B> {
    pub fn new(backend: B, logger: Dispatch, defaults: ResizerConfig) -> Self {
        Self {
            backend,
            logger,
            defaults,
            selected: None,
        }
    }

    /// Select a file, replacing any previous selection.
    ///
    /// Only the extension is checked; the file is not opened. Returns the
    /// previously selected path. A rejected path leaves the selection as it was.
    pub fn select(&mut self, path: impl Into<PathBuf>) -> Result<Option<PathBuf>> {
        let path = path.into();
        if !naming::is_selectable(&path) {
            return Err(OperationError::UnsupportedExtension(path));
        }
        tracing::dispatcher::with_default(&self.logger, || {
            debug!(path = %path.display(), "Selected image");
        });
        Ok(self.selected.replace(path))
    }

    pub fn selected(&self) -> Option<&Path> {
        self.selected.as_deref()
    }

    /// Describe the selected file.
    pub fn metadata(&self) -> Result<ImageMetadata> {
        let path = self.selected.as_deref().ok_or(OperationError::NoSelection)?;
        extract_metadata(&self.backend, path, &self.logger)
    }

    /// Resize or convert the selected file, returning the written path.
    pub fn resize(&self, options: &ResizeOptions) -> Result<PathBuf> {
        let source = self.selected.as_ref().ok_or(OperationError::NoSelection)?;
        let request = self.request_for(source, options);
        resize_or_convert(&self.backend, &request, &self.logger)
    }

    fn request_for(&self, source: &Path, options: &ResizeOptions) -> ResizeRequest {
        let d = &self.defaults.resize;
        ResizeRequest {
            source: source.to_path_buf(),
            width: options.width.unwrap_or(d.width),
            height: options.height.unwrap_or(d.height),
            format: options.format.unwrap_or(d.format),
            quality: Quality::new(options.quality.unwrap_or(d.quality)),
            optimize: options.optimize.unwrap_or(d.optimize),
            allow_upscale: options.allow_upscale.unwrap_or(d.allow_upscale),
            output_dir: options
                .output_dir
                .clone()
                .unwrap_or_else(|| self.defaults.output.dir.clone()),
        }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }
}
