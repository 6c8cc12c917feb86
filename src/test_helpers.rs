//! Shared test utilities for the image-resizer test suite.
//!
//! Synthetic fixtures are generated on the fly with the `image` encoders so
//! no binary files live in the repository.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = tmp.path().join("photo.png");
//! create_test_png(&path, 400, 400);
//!
//! let (logger, logs) = capture_logger();
//! // ... run an operation with &logger ...
//! assert!(logs.contents().contains("Error resizing image"));
//! ```

use image::{ImageEncoder, RgbImage};
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::Dispatch;
use tracing::level_filters::LevelFilter;

// =========================================================================
// Image fixtures
// =========================================================================

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    })
}

/// Create a small valid RGB PNG file with the given dimensions.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    gradient(width, height)
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Create a single-channel (mode `L`) PNG.
pub fn create_test_gray_png(path: &Path, width: u32, height: u32) {
    image::GrayImage::from_fn(width, height, |x, _| image::Luma([(x % 256) as u8]))
        .save_with_format(path, image::ImageFormat::Png)
        .unwrap();
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create a grayscale (single-component) JPEG.
pub fn create_test_gray_jpeg(path: &Path, width: u32, height: u32) {
    let img = image::GrayImage::from_fn(width, height, |x, y| {
        image::Luma([((x + y) % 256) as u8])
    });
    let file = std::fs::File::create(path).unwrap();
    image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file))
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::L8)
        .unwrap();
}

/// Big-endian TIFF-structured EXIF block holding a single `Make` tag.
pub fn exif_with_make(make: &str) -> Vec<u8> {
    let mut value = make.as_bytes().to_vec();
    value.push(0);
    assert!(value.len() > 4, "short values would be stored inline");

    let mut exif = b"MM\0\x2a".to_vec();
    exif.extend_from_slice(&8u32.to_be_bytes()); // first IFD offset
    exif.extend_from_slice(&1u16.to_be_bytes()); // entry count
    exif.extend_from_slice(&0x010Fu16.to_be_bytes()); // Make
    exif.extend_from_slice(&2u16.to_be_bytes()); // ASCII
    exif.extend_from_slice(&(value.len() as u32).to_be_bytes());
    exif.extend_from_slice(&26u32.to_be_bytes()); // value offset, after the IFD
    exif.extend_from_slice(&0u32.to_be_bytes()); // no next IFD
    exif.extend_from_slice(&value);
    exif
}

/// Create a JPEG carrying an EXIF `Make` tag and an embedded ICC profile.
pub fn create_test_jpeg_with_metadata(path: &Path, width: u32, height: u32, make: &str) {
    let img = gradient(width, height);
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new(std::io::BufWriter::new(file));
    encoder.set_exif_metadata(exif_with_make(make)).unwrap();
    encoder.set_icc_profile(vec![0x42; 128]).unwrap();
    encoder
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}

/// Create an 8-bit palette PNG with a two-colour palette.
pub fn create_indexed_png(path: &Path, width: u32, height: u32) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
    let mut writer = encoder.write_header().unwrap();
    let pixels: Vec<u8> = (0..width * height).map(|i| (i % 2) as u8).collect();
    writer.write_image_data(&pixels).unwrap();
}

/// Create a 1-bit grayscale PNG.
pub fn create_bilevel_png(path: &Path, width: u32, height: u32) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = png::Encoder::new(std::io::BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Grayscale);
    encoder.set_depth(png::BitDepth::One);
    let mut writer = encoder.write_header().unwrap();
    let row_bytes = width.div_ceil(8) as usize;
    writer
        .write_image_data(&vec![0b1010_1010; row_bytes * height as usize])
        .unwrap();
}

/// Create a 2×2 8-bit palette BMP (black and white checkerboard).
pub fn create_palette_bmp(path: &Path) {
    let palette: &[u8] = &[0, 0, 0, 0, 255, 255, 255, 0];
    // Rows are padded to 4 bytes, stored bottom-up
    let pixels: &[u8] = &[0, 1, 0, 0, 1, 0, 0, 0];
    let pixel_offset = 14 + 40 + palette.len() as u32;

    let mut bmp = b"BM".to_vec();
    bmp.extend_from_slice(&(pixel_offset + pixels.len() as u32).to_le_bytes());
    bmp.extend_from_slice(&[0; 4]);
    bmp.extend_from_slice(&pixel_offset.to_le_bytes());
    bmp.extend_from_slice(&40u32.to_le_bytes());
    bmp.extend_from_slice(&2i32.to_le_bytes()); // width
    bmp.extend_from_slice(&2i32.to_le_bytes()); // height
    bmp.extend_from_slice(&1u16.to_le_bytes()); // planes
    bmp.extend_from_slice(&8u16.to_le_bytes()); // bits per pixel
    bmp.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    bmp.extend_from_slice(&(pixels.len() as u32).to_le_bytes());
    bmp.extend_from_slice(&[0; 8]); // pels per metre
    bmp.extend_from_slice(&2u32.to_le_bytes()); // colours used
    bmp.extend_from_slice(&0u32.to_le_bytes());
    bmp.extend_from_slice(palette);
    bmp.extend_from_slice(pixels);
    std::fs::write(path, bmp).unwrap();
}

/// Create an RGB BMP declaring `pels` pixels per metre in both directions.
pub fn create_test_bmp_with_resolution(path: &Path, width: u32, height: u32, pels: i32) {
    let mut bytes = Vec::new();
    gradient(width, height)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Bmp)
        .unwrap();
    bytes[38..42].copy_from_slice(&pels.to_le_bytes());
    bytes[42..46].copy_from_slice(&pels.to_le_bytes());
    std::fs::write(path, bytes).unwrap();
}

/// Create an RGB TIFF declaring `dpi` dots per inch.
pub fn create_test_tiff_with_dpi(path: &Path, width: u32, height: u32, dpi: u32) {
    use tiff::encoder::{Rational, TiffEncoder, colortype};

    let file = std::fs::File::create(path).unwrap();
    let mut tiff = TiffEncoder::new(file).unwrap();
    let mut image = tiff.new_image::<colortype::RGB8>(width, height).unwrap();
    image.resolution(tiff::tags::ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    image.write_data(gradient(width, height).as_raw()).unwrap();
}

/// Write a minimal SVG document with the given intrinsic size.
pub fn write_svg(path: &Path, width: u32, height: u32) {
    let svg = format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg"
     width="{width}" height="{height}" viewBox="0 0 {width} {height}">
  <rect x="0" y="0" width="{width}" height="{height}" fill="#3366cc"/>
  <circle cx="{cx}" cy="{cy}" r="{r}" fill="#ffcc00"/>
</svg>
"##,
        cx = width / 2,
        cy = height / 2,
        r = width.min(height) / 4,
    );
    std::fs::write(path, svg).unwrap();
}

// =========================================================================
// Log capture
// =========================================================================

/// In-memory log sink shared between a logger and the test asserting on it.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A debug-level logger writing into a [`LogBuffer`].
pub fn capture_logger() -> (Dispatch, LogBuffer) {
    let buf = LogBuffer::default();
    let sink = buf.clone();
    let logger =
        crate::logging::logger_with_writer(LevelFilter::DEBUG, move || sink.clone(), false);
    (logger, buf)
}
