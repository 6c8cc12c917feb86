//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Metadata
//!
//! ```text
//! photo.png
//!     Format: PNG
//!     Mode: RGB
//!     Size: (400, 400)
//!     DPI: Unknown
//!     Bit Depth: 8-bit or higher
//!     ICC_Profile: Not Present
//! ```
//!
//! Entries appear in record order: embedded EXIF tags first, then the fixed
//! attributes.
//!
//! ## Resize
//!
//! ```text
//! photo.png → resized_photo.png
//!     Saved: out/resized_photo.png
//! ```
//!
//! ## Formats
//!
//! ```text
//! Input
//!     png jpg jpeg bmp gif tiff webp svg
//! Output
//!     JPEG (jpeg)
//!     PNG (png)
//!     ...
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::imaging::TargetFormat;
use crate::metadata::ImageMetadata;
use crate::naming::SELECTABLE_EXTENSIONS;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display name of a path: its file name, or the whole path if it has none.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Metadata
// ============================================================================

/// Format a metadata record as a header line plus one indented line per entry.
pub fn format_metadata(path: &Path, metadata: &ImageMetadata) -> Vec<String> {
    let mut lines = vec![display_name(path)];
    lines.extend(
        metadata
            .iter()
            .map(|(key, value)| format!("{}{}: {}", indent(1), key, value)),
    );
    lines
}

pub fn print_metadata(path: &Path, metadata: &ImageMetadata) {
    for line in format_metadata(path, metadata) {
        println!("{}", line);
    }
}

// ============================================================================
// Resize
// ============================================================================

/// Format a successful resize: source → output name, then the full path.
pub fn format_saved(source: &Path, output: &Path) -> Vec<String> {
    vec![
        format!("{} → {}", display_name(source), display_name(output)),
        format!("{}Saved: {}", indent(1), output.display()),
    ]
}

pub fn print_saved(source: &Path, output: &Path) {
    for line in format_saved(source, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Formats
// ============================================================================

/// Format the accepted input extensions and the available output encodings.
pub fn format_formats() -> Vec<String> {
    let mut lines = vec![
        "Input".to_string(),
        format!("{}{}", indent(1), SELECTABLE_EXTENSIONS.join(" ")),
        "Output".to_string(),
    ];
    lines.extend(
        TargetFormat::ALL
            .iter()
            .map(|f| format!("{}{} ({})", indent(1), f, f.as_str())),
    );
    lines
}

pub fn print_formats() {
    for line in format_formats() {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
