//! Filename conventions: which files can be selected, which are vectors, and
//! what an output file is called.
//!
//! ## Output Names
//!
//! Outputs are named after the source's file name with a `resized_` prefix:
//! - `photo.jpg` → `resized_photo.jpg` (raster: extension kept as-is, even
//!   when the bytes are re-encoded to another format)
//! - `logo.svg` → `resized_logo.png` (vector: always rasterized to PNG)
//!
//! Extensions are compared case-insensitively everywhere. Nothing here looks
//! at file contents.

use std::path::{Path, PathBuf};

pub const OUTPUT_PREFIX: &str = "resized_";
pub const VECTOR_EXTENSION: &str = "svg";
pub const RASTERIZED_EXTENSION: &str = "png";

/// Extensions offered by the file selection filter.
pub const SELECTABLE_EXTENSIONS: &[&str] =
    &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp", "svg"];

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
}

/// Whether the path names a vector (SVG) file.
pub fn is_vector(path: &Path) -> bool {
    extension_lowercase(path).as_deref() == Some(VECTOR_EXTENSION)
}

/// Whether the selection filter would offer this path.
pub fn is_selectable(path: &Path) -> bool {
    extension_lowercase(path).is_some_and(|ext| SELECTABLE_EXTENSIONS.contains(&ext.as_str()))
}

/// Output file name for a source, or `None` if the path has no file name.
pub fn output_file_name(source: &Path) -> Option<String> {
    let name = source.file_name()?;
    let name = if is_vector(source) {
        Path::new(name).with_extension(RASTERIZED_EXTENSION)
    } else {
        PathBuf::from(name)
    };
    Some(format!("{}{}", OUTPUT_PREFIX, name.to_string_lossy()))
}

/// Full output path for a source inside `output_dir`.
pub fn output_path(source: &Path, output_dir: &Path) -> Option<PathBuf> {
    output_file_name(source).map(|name| output_dir.join(name))
}
